// Copyright 2026-present Talpa contributors
// SPDX-License-Identifier: Apache-2.0

//! Binary format header and footer structures.
//!
//! The header is 24 bytes of fixed-size fields, parsed in one read before
//! anything else. It carries the node and stop-word counts plus the byte
//! length of each section, so the decoder can validate the whole layout
//! before touching section data.
//!
//! The footer is 8 bytes: a CRC32 checksum over everything before it, plus
//! a magic number ("PLAT", the header magic reversed). If the footer is
//! wrong, something got corrupted or truncated. Don't trust the data.

use std::io;

use crc32fast::Hasher as Crc32Hasher;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Magic bytes: "TALP" in ASCII (header)
pub const MAGIC: [u8; 4] = [0x54, 0x41, 0x4C, 0x50];

/// Footer magic: "PLAT" (reversed, marks valid file end)
pub const FOOTER_MAGIC: [u8; 4] = [0x50, 0x4C, 0x41, 0x54];

/// Current format version
pub const VERSION: u8 = 1;

// ============================================================================
// SECURITY LIMITS (prevent resource exhaustion from malicious input)
// ============================================================================

/// Maximum file size: 100 MB (prevents huge allocations)
pub const MAX_FILE_SIZE: usize = 100 * 1024 * 1024;

/// Maximum number of trie nodes
pub const MAX_NODE_COUNT: u32 = 10_000_000;

/// Maximum number of stop words
pub const MAX_STOP_WORDS: u32 = 65_536;

/// Maximum varint bytes (u64 needs at most 10 bytes)
pub const MAX_VARINT_BYTES: usize = 10;

/// Maximum trie depth (bounds codec recursion; one level per token).
///
/// Enforced on BOTH sides: the encoder refuses an index deeper than this,
/// and the decoder refuses a stream claiming to be. Keeping the two in
/// lockstep is what makes every successfully saved index loadable.
pub const MAX_DEPTH: usize = 10_000;

// ============================================================================
// FLAGS
// ============================================================================

/// Format flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags(pub(crate) u8);

impl FormatFlags {
    /// Stop-word filtering was enabled at build time; a stop-word section
    /// is present (possibly with zero entries).
    pub const HAS_STOP_WORDS: u8 = 0b0000_0001;

    pub fn new() -> Self {
        Self(0)
    }

    pub fn with_stop_words(mut self) -> Self {
        self.0 |= Self::HAS_STOP_WORDS;
        self
    }

    pub fn has_stop_words(self) -> bool {
        self.0 & Self::HAS_STOP_WORDS != 0
    }
}

// ============================================================================
// HEADER
// ============================================================================

/// Binary format header (24 bytes fixed size)
#[derive(Debug, Clone)]
pub struct IndexHeader {
    pub version: u8,
    pub flags: FormatFlags,
    /// Total trie nodes in the NODES section, root included.
    pub node_count: u32,
    /// Entries in the STOP_WORDS section (0 when flags say absent).
    pub stop_count: u32,
    /// Byte length of the STOP_WORDS section.
    pub stop_len: u32,
    /// Byte length of the NODES section.
    pub nodes_len: u32,
}

impl IndexHeader {
    // 4 (magic) + 1 (version) + 1 (flags) + 4*4 (u32s) + 2 (reserved) = 24
    pub const SIZE: usize = 24;

    pub fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&MAGIC);
        buf.push(self.version);
        buf.push(self.flags.0);
        buf.extend_from_slice(&self.node_count.to_le_bytes());
        buf.extend_from_slice(&self.stop_count.to_le_bytes());
        buf.extend_from_slice(&self.stop_len.to_le_bytes());
        buf.extend_from_slice(&self.nodes_len.to_le_bytes());
        buf.extend_from_slice(&[0u8; 2]); // reserved
    }

    pub fn read(bytes: &[u8]) -> io::Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "File too short for header",
            ));
        }

        if bytes[..4] != MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid magic: expected TALP, got {:?}", &bytes[..4]),
            ));
        }

        Ok(Self {
            version: bytes[4],
            flags: FormatFlags(bytes[5]),
            node_count: u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]),
            stop_count: u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]),
            stop_len: u32::from_le_bytes([bytes[14], bytes[15], bytes[16], bytes[17]]),
            nodes_len: u32::from_le_bytes([bytes[18], bytes[19], bytes[20], bytes[21]]),
            // bytes[22..24] is reserved
        })
    }

    /// Expected content size (header + sections, everything before footer).
    pub fn content_size(&self) -> usize {
        Self::SIZE + self.stop_len as usize + self.nodes_len as usize
    }
}

// ============================================================================
// FOOTER (8 bytes)
// ============================================================================

/// Footer with CRC32 checksum and magic number
#[derive(Debug, Clone)]
pub struct IndexFooter {
    /// CRC32 checksum of header + all sections (everything before footer)
    pub crc32: u32,
}

impl IndexFooter {
    pub const SIZE: usize = 8; // 4 bytes CRC32 + 4 bytes magic

    pub fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.crc32.to_le_bytes());
        buf.extend_from_slice(&FOOTER_MAGIC);
    }

    pub fn read(bytes: &[u8]) -> io::Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "File too short for footer",
            ));
        }

        let footer_start = bytes.len() - Self::SIZE;

        let magic = &bytes[footer_start + 4..];
        if magic != FOOTER_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid footer magic: expected PLAT, got {:?}", magic),
            ));
        }

        let crc32 = u32::from_le_bytes([
            bytes[footer_start],
            bytes[footer_start + 1],
            bytes[footer_start + 2],
            bytes[footer_start + 3],
        ]);

        Ok(Self { crc32 })
    }

    /// Compute CRC32 over the given bytes
    pub fn compute_crc32(data: &[u8]) -> u32 {
        let mut hasher = Crc32Hasher::new();
        hasher.update(data);
        hasher.finalize()
    }
}
