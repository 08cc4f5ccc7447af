// Copyright 2026-present Talpa contributors
// SPDX-License-Identifier: Apache-2.0

//! Binary encoding primitives: varint, string sections, and the node graph.
//!
//! Nothing fancy here, just the classics done right. Varint (LEB128) for
//! integers that are usually small — phrase IDs, counts, token lengths.
//! Length-prefixed UTF-8 for tokens and stop words. The node graph is
//! written depth-first, children sorted by token so the same index always
//! encodes to the same bytes.
//!
//! Every decoder validates before it allocates: counts are bounded by the
//! remaining input, lengths use checked arithmetic, strings are UTF-8
//! checked, and recursion depth is capped. Malformed input gets an error,
//! never a panic.
//!
//! The depth cap is symmetric: the encoder refuses to write a trie the
//! decoder would refuse to read, so a serialized index always loads.

use std::collections::HashMap;
use std::io;

use super::header::{MAX_DEPTH, MAX_VARINT_BYTES};
use crate::types::{PhraseId, TrieNode};

// ============================================================================
// VARINT ENCODING
// ============================================================================

/// Encode a varint to bytes
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        } else {
            buf.push(byte | 0x80);
        }
    }
}

/// Decode a varint from bytes, returning (value, bytes_consumed)
///
/// Returns an error if:
/// - Buffer is empty
/// - Varint exceeds MAX_VARINT_BYTES (malformed/malicious input)
pub fn decode_varint(bytes: &[u8]) -> io::Result<(u64, usize)> {
    if bytes.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Empty buffer for varint",
        ));
    }

    let mut result: u64 = 0;
    let mut shift = 0;
    let mut i = 0;

    while i < bytes.len() && i < MAX_VARINT_BYTES {
        let byte = bytes[i];
        result |= ((byte & 0x7F) as u64) << shift;
        i += 1;
        if byte & 0x80 == 0 {
            return Ok((result, i));
        }
        shift += 7;
    }

    if i >= MAX_VARINT_BYTES {
        Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "Varint exceeds maximum length (possible corruption)",
        ))
    } else {
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Incomplete varint",
        ))
    }
}

// ============================================================================
// STOP-WORD SECTION
// ============================================================================

/// Encode the stop-word set (length-prefixed strings, sorted for
/// deterministic output). The entry count lives in the header.
pub fn encode_stop_words(words: &[&str], buf: &mut Vec<u8>) {
    for word in words {
        let bytes = word.as_bytes();
        encode_varint(bytes.len() as u64, buf);
        buf.extend_from_slice(bytes);
    }
}

/// Decode `count` stop words from a section slice.
pub fn decode_stop_words(bytes: &[u8], count: usize) -> io::Result<Vec<String>> {
    // Each entry needs at least its 1-byte length prefix.
    if count > bytes.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Stop-word count {} exceeds section size {}",
                count,
                bytes.len()
            ),
        ));
    }

    let mut words = Vec::with_capacity(count);
    let mut pos = 0;

    for i in 0..count {
        if pos >= bytes.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("Truncated stop-word section at entry {}", i),
            ));
        }
        let (len, consumed) = decode_varint(&bytes[pos..])?;
        pos += consumed;

        let len = len as usize;
        let end_pos = pos.checked_add(len).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Stop word {} length {} causes overflow", i, len),
            )
        })?;
        if end_pos > bytes.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("Truncated stop word {} (expected {} bytes)", i, len),
            ));
        }

        let word = String::from_utf8(bytes[pos..end_pos].to_vec()).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid UTF-8 in stop word {}: {}", i, e),
            )
        })?;
        words.push(word);
        pos = end_pos;
    }

    if pos != bytes.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Stop-word section has {} trailing bytes",
                bytes.len() - pos
            ),
        ));
    }

    Ok(words)
}

// ============================================================================
// NODE GRAPH (depth-first, deterministic)
// ============================================================================

/// Encode a node graph depth-first, starting at `root`.
///
/// Per node: varint contained count, contained IDs as varints, varint child
/// count, then each child as varint token length + token bytes + subtree.
/// Children are written in sorted token order so encoding is deterministic
/// even though the in-memory map is not.
///
/// Fails only if the trie is deeper than [`MAX_DEPTH`] — the one in-memory
/// shape the decoder could not read back.
pub fn encode_node_graph(root: &TrieNode, buf: &mut Vec<u8>) -> io::Result<()> {
    encode_node(root, 0, buf)
}

fn encode_node(node: &TrieNode, depth: usize, buf: &mut Vec<u8>) -> io::Result<()> {
    if depth > MAX_DEPTH {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Trie deeper than {} levels", MAX_DEPTH),
        ));
    }

    encode_varint(node.contained.len() as u64, buf);
    for &id in &node.contained {
        encode_varint(u64::from(id), buf);
    }

    let mut tokens: Vec<&String> = node.children.keys().collect();
    tokens.sort_unstable();

    encode_varint(tokens.len() as u64, buf);
    for token in tokens {
        let token_bytes = token.as_bytes();
        encode_varint(token_bytes.len() as u64, buf);
        buf.extend_from_slice(token_bytes);
        encode_node(&node.children[token], depth + 1, buf)?;
    }
    Ok(())
}

/// Decode a node graph from a section slice.
///
/// `budget` is the header-declared node count; decoding more nodes than
/// declared (or fewer — checked by the caller) is malformed input. Returns
/// the root, the bytes consumed, and the nodes decoded.
pub fn decode_node_graph(bytes: &[u8], budget: u32) -> io::Result<(TrieNode, usize, u32)> {
    let mut decoded: u32 = 0;
    let mut pos = 0;
    let root = decode_node(bytes, &mut pos, 0, budget, &mut decoded)?;
    Ok((root, pos, decoded))
}

fn decode_node(
    bytes: &[u8],
    pos: &mut usize,
    depth: usize,
    budget: u32,
    decoded: &mut u32,
) -> io::Result<TrieNode> {
    if depth > MAX_DEPTH {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Trie deeper than {} levels (possible corruption)", MAX_DEPTH),
        ));
    }
    if *decoded >= budget {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("More nodes than the header's {} (possible corruption)", budget),
        ));
    }
    *decoded += 1;

    let (contained_count, consumed) = decode_varint(&bytes[*pos..])?;
    *pos += consumed;
    let contained_count = contained_count as usize;

    // Each ID is at least one byte; bound the allocation by the input.
    if contained_count > bytes.len() - *pos {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Contained-ID count {} exceeds remaining {} bytes",
                contained_count,
                bytes.len() - *pos
            ),
        ));
    }

    let mut contained = Vec::with_capacity(contained_count);
    for _ in 0..contained_count {
        let (id, consumed) = decode_varint(&bytes[*pos..])?;
        *pos += consumed;
        let id = PhraseId::try_from(id).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Phrase ID {} out of range", id),
            )
        })?;
        contained.push(id);
    }

    let (child_count, consumed) = decode_varint(&bytes[*pos..])?;
    *pos += consumed;
    let child_count = child_count as usize;

    if child_count > bytes.len() - *pos {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Child count {} exceeds remaining {} bytes",
                child_count,
                bytes.len() - *pos
            ),
        ));
    }

    let mut children = HashMap::with_capacity(child_count);
    for i in 0..child_count {
        let (token_len, consumed) = decode_varint(&bytes[*pos..])?;
        *pos += consumed;
        let token_len = token_len as usize;

        // No length cap here: the bounds check below limits the token to
        // the remaining input, which the file-size limit already bounds.
        let end_pos = pos.checked_add(token_len).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Token length {} causes overflow", token_len),
            )
        })?;
        if end_pos > bytes.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("Truncated token (expected {} bytes)", token_len),
            ));
        }

        let token = String::from_utf8(bytes[*pos..end_pos].to_vec()).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid UTF-8 in token {}: {}", i, e),
            )
        })?;
        *pos = end_pos;

        let child = decode_node(bytes, pos, depth + 1, budget, decoded)?;
        if children.insert(token, child).is_some() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Duplicate child token (keys must be unique)",
            ));
        }
    }

    Ok(TrieNode { children, contained })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_roundtrip() {
        for value in [0u64, 1, 127, 128, 300, 16_383, 16_384, u64::MAX] {
            let mut buf = Vec::new();
            encode_varint(value, &mut buf);
            let (decoded, consumed) = decode_varint(&buf).unwrap();
            assert_eq!(decoded, value);
            assert_eq!(consumed, buf.len());
        }
    }

    #[test]
    fn varint_error_on_empty() {
        assert!(decode_varint(&[]).is_err());
    }

    #[test]
    fn varint_error_on_overlong() {
        let bytes = [0x80u8; 11];
        let err = decode_varint(&bytes).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn stop_words_roundtrip() {
        let words = vec!["I", "a", "the", "www"];
        let mut buf = Vec::new();
        encode_stop_words(&words, &mut buf);
        let decoded = decode_stop_words(&buf, words.len()).unwrap();
        assert_eq!(decoded, words);
    }

    #[test]
    fn stop_words_trailing_bytes_rejected() {
        let mut buf = Vec::new();
        encode_stop_words(&["the"], &mut buf);
        buf.push(0);
        assert!(decode_stop_words(&buf, 1).is_err());
    }

    #[test]
    fn node_graph_roundtrip() {
        let index = crate::testing::index_from_phrases(
            &["american idol", "american pie", "the batman"],
            true,
        );
        let root = index.root();

        let mut buf = Vec::new();
        encode_node_graph(root, &mut buf).unwrap();

        let expected = index.node_count() as u32;
        let (decoded, consumed, node_count) = decode_node_graph(&buf, expected).unwrap();
        assert_eq!(&decoded, root);
        assert_eq!(consumed, buf.len());
        assert_eq!(node_count, expected);
    }

    #[test]
    fn node_graph_encoding_is_deterministic() {
        let index =
            crate::testing::index_from_phrases(&["b c", "a c", "c a", "a b"], false);
        let mut first = Vec::new();
        encode_node_graph(index.root(), &mut first).unwrap();
        let mut second = Vec::new();
        encode_node_graph(index.root(), &mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn long_token_roundtrips() {
        let phrase = "x".repeat(600);
        let index = crate::testing::index_from_phrases(&[&phrase], false);

        let mut buf = Vec::new();
        encode_node_graph(index.root(), &mut buf).unwrap();
        let (decoded, _, _) = decode_node_graph(&buf, 2).unwrap();
        assert_eq!(&decoded, index.root());
    }

    #[test]
    fn node_budget_enforced() {
        let index = crate::testing::index_from_phrases(&["a b c"], false);
        let mut buf = Vec::new();
        encode_node_graph(index.root(), &mut buf).unwrap();

        // Claim fewer nodes than the stream actually holds.
        let err = decode_node_graph(&buf, 2).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn truncated_node_stream_rejected() {
        let index = crate::testing::index_from_phrases(&["a b c"], false);
        let mut buf = Vec::new();
        encode_node_graph(index.root(), &mut buf).unwrap();
        buf.truncate(buf.len() - 1);
        assert!(decode_node_graph(&buf, 4).is_err());
    }

    #[test]
    fn depth_limit_is_symmetric() {
        // A chain one level past the cap must be refused by the encoder,
        // not written and then refused by the decoder.
        let mut root = TrieNode::default();
        let mut node = &mut root;
        for i in 0..=MAX_DEPTH {
            node = node
                .children
                .entry(format!("t{}", i))
                .or_default();
            node.contained.push(0);
        }

        let mut buf = Vec::new();
        let err = encode_node_graph(&root, &mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
