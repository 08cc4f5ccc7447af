// Copyright 2026-present Talpa contributors
// SPDX-License-Identifier: Apache-2.0

//! Binary format for persisted completion indexes.
//!
//! A saved index is fully self-contained: the node graph *and* the
//! stop-word configuration round-trip together, so a loaded index answers
//! every query exactly like the one that was saved. Compact before saving
//! to minimize the stored size.
//!
//! This format is designed to be safely parsed from untrusted sources:
//! - All size fields are validated against MAX_* constants
//! - Bounds checking prevents buffer overreads
//! - CRC32 footer detects corruption/truncation
//! - Varint decoder has maximum iteration limits
//!
//! The same MAX_* limits bind the encoder, so [`TrieIndex::to_bytes`]
//! refuses any index the decoder would reject. Every byte stream this
//! module produces, it also accepts.
//!
//! # Format Overview (v1)
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ HEADER (24 bytes)                                          │
//! │   magic: [u8; 4] = "TALP"                                  │
//! │   version: u8 = 1                                          │
//! │   flags: u8 (HAS_STOP_WORDS)                               │
//! │   node_count: u32, stop_count: u32                         │
//! │   stop_len: u32, nodes_len: u32                            │
//! │   reserved: [u8; 2]                                        │
//! ├────────────────────────────────────────────────────────────┤
//! │ 1. STOP_WORDS (length-prefixed strings, sorted)            │
//! ├────────────────────────────────────────────────────────────┤
//! │ 2. NODES (depth-first node graph, children sorted by token)│
//! ├────────────────────────────────────────────────────────────┤
//! │ FOOTER (8 bytes): crc32 + magic "PLAT"                     │
//! └────────────────────────────────────────────────────────────┘
//! ```

mod encoding;
mod header;

pub use encoding::{decode_varint, encode_varint};
pub use header::{
    FormatFlags, IndexFooter, IndexHeader, FOOTER_MAGIC, MAGIC, MAX_DEPTH, MAX_FILE_SIZE,
    MAX_NODE_COUNT, MAX_STOP_WORDS, MAX_VARINT_BYTES, VERSION,
};

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::TrieIndex;
use encoding::{decode_node_graph, decode_stop_words, encode_node_graph, encode_stop_words};

impl TrieIndex {
    /// Serialize to bytes (with CRC32 footer).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if the index exceeds a format limit
    /// ([`MAX_NODE_COUNT`] nodes, [`MAX_STOP_WORDS`] stop words,
    /// [`MAX_DEPTH`] levels, or [`MAX_FILE_SIZE`] serialized bytes). These
    /// are the exact limits the decoder enforces, so any bytes returned
    /// here will decode.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode_index(self).map_err(|e| Error::Encode(e.to_string()))
    }

    /// Deserialize from bytes (with CRC32 validation).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] for any truncated or malformed input. On
    /// failure nothing is produced; no existing index is ever mutated.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        decode_index(bytes).map_err(|e| Error::Decode(e.to_string()))
    }

    /// Write the index to a file, truncating any prior content.
    ///
    /// Not safe for concurrent writers to the same destination. Remember
    /// to [`compact`](TrieIndex::compact) first if stored size matters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if the index exceeds a format limit (see
    /// [`to_bytes`](TrieIndex::to_bytes)), [`Error::Io`] if the destination
    /// cannot be created or written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_bytes()?;
        fs::write(path.as_ref(), &bytes)?;
        log::debug!(
            "saved index: {} bytes to {}",
            bytes.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Read an index back from a file.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the file cannot be opened or read (resource
    /// failure); [`Error::Decode`] if its contents are truncated or
    /// malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        let index = Self::from_bytes(&bytes)?;
        log::debug!(
            "loaded index: {} nodes from {}",
            index.node_count(),
            path.as_ref().display()
        );
        Ok(index)
    }
}

/// Full encode pipeline. `io::Result` internally; the public boundary maps
/// everything here to [`Error::Encode`].
///
/// Every limit the decoder enforces on counts and sizes is checked here
/// first, against the in-memory index. An index that passes produces bytes
/// [`decode_index`] accepts; one that fails never produces bytes at all.
fn encode_index(index: &TrieIndex) -> io::Result<Vec<u8>> {
    let node_count = u32::try_from(index.node_count())
        .ok()
        .filter(|&n| n <= MAX_NODE_COUNT)
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Too many nodes: {} (max {})", index.node_count(), MAX_NODE_COUNT),
            )
        })?;

    let mut stop_bytes = Vec::new();
    let stop_count = match &index.stop_words {
        Some(set) => {
            let count = u32::try_from(set.len())
                .ok()
                .filter(|&n| n <= MAX_STOP_WORDS)
                .ok_or_else(|| {
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("Too many stop words: {} (max {})", set.len(), MAX_STOP_WORDS),
                    )
                })?;
            let mut words: Vec<&str> = set.iter().map(String::as_str).collect();
            words.sort_unstable();
            encode_stop_words(&words, &mut stop_bytes);
            count
        }
        None => 0,
    };

    let mut node_bytes = Vec::new();
    encode_node_graph(&index.root, &mut node_bytes)?;

    let flags = if index.stop_words.is_some() {
        FormatFlags::new().with_stop_words()
    } else {
        FormatFlags::new()
    };

    let section_len = |len: usize, name: &str| {
        u32::try_from(len).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} section does not fit a u32 length: {} bytes", name, len),
            )
        })
    };

    let header = IndexHeader {
        version: VERSION,
        flags,
        node_count,
        stop_count,
        stop_len: section_len(stop_bytes.len(), "Stop-word")?,
        nodes_len: section_len(node_bytes.len(), "Node")?,
    };

    let total = header.content_size() + IndexFooter::SIZE;
    if total > MAX_FILE_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Serialized index too large: {} bytes (max {})", total, MAX_FILE_SIZE),
        ));
    }

    let mut buf = Vec::with_capacity(total);
    header.write(&mut buf);
    buf.extend_from_slice(&stop_bytes);
    buf.extend_from_slice(&node_bytes);

    let crc32 = IndexFooter::compute_crc32(&buf);
    IndexFooter { crc32 }.write(&mut buf);

    Ok(buf)
}

/// Full decode pipeline. `io::Result` internally; the public boundary maps
/// everything here to [`Error::Decode`].
fn decode_index(bytes: &[u8]) -> io::Result<TrieIndex> {
    if bytes.len() > MAX_FILE_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("File too large: {} bytes (max {})", bytes.len(), MAX_FILE_SIZE),
        ));
    }

    let min_size = IndexHeader::SIZE + IndexFooter::SIZE;
    if bytes.len() < min_size {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("File too small: {} bytes (minimum {})", bytes.len(), min_size),
        ));
    }

    // Verify footer magic and CRC32 before trusting anything else.
    let footer = IndexFooter::read(bytes)?;
    let content = &bytes[..bytes.len() - IndexFooter::SIZE];
    let computed_crc32 = IndexFooter::compute_crc32(content);
    if footer.crc32 != computed_crc32 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "CRC32 mismatch: expected {:#010x}, got {:#010x} (file corrupted)",
                footer.crc32, computed_crc32
            ),
        ));
    }

    let header = IndexHeader::read(content)?;

    if header.version != VERSION {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Unsupported version: {} (expected {})", header.version, VERSION),
        ));
    }
    if header.node_count > MAX_NODE_COUNT {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Too many nodes: {} (max {})", header.node_count, MAX_NODE_COUNT),
        ));
    }
    if header.stop_count > MAX_STOP_WORDS {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Too many stop words: {} (max {})", header.stop_count, MAX_STOP_WORDS),
        ));
    }
    if header.content_size() != content.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Section lengths mismatch: header claims {} bytes, got {} bytes",
                header.content_size(),
                content.len()
            ),
        ));
    }

    let stop_start = IndexHeader::SIZE;
    let nodes_start = stop_start + header.stop_len as usize;
    let stop_section = &content[stop_start..nodes_start];
    let node_section = &content[nodes_start..];

    let stop_words: Option<HashSet<String>> = if header.flags.has_stop_words() {
        let words = decode_stop_words(stop_section, header.stop_count as usize)?;
        Some(words.into_iter().collect())
    } else {
        if header.stop_count != 0 || header.stop_len != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Stop-word section present but flag unset",
            ));
        }
        None
    };

    let (root, consumed, node_count) = decode_node_graph(node_section, header.node_count)?;
    if consumed != node_section.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Node section has {} trailing bytes",
                node_section.len() - consumed
            ),
        ));
    }
    if node_count != header.node_count {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Node count mismatch: header claims {}, decoded {}",
                header.node_count, node_count
            ),
        ));
    }

    Ok(TrieIndex { root, stop_words })
}
