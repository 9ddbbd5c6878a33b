use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::memory::ReadMemory;

/// Chunk size used when scanning the module image
const SCAN_CHUNK_SIZE: usize = 1024 * 1024; // 1MB

/// A code signature locating a RIP-relative reference.
///
/// The resolved address is
/// `hit + instr_offset + instr_len + disp32(hit + instr_offset + disp_offset)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSignature {
    pub pattern: String,
    /// Start of the referencing instruction relative to the match
    #[serde(default)]
    pub instr_offset: usize,
    /// Position of the 32-bit displacement relative to the instruction
    pub disp_offset: usize,
    /// Length of the instruction (displacement base)
    pub instr_len: usize,
}

impl CodeSignature {
    pub fn new(pattern: &str, disp_offset: usize, instr_len: usize) -> Self {
        Self {
            pattern: pattern.to_string(),
            instr_offset: 0,
            disp_offset,
            instr_len,
        }
    }

    pub fn pattern_bytes(&self) -> Result<Vec<Option<u8>>> {
        parse_pattern(&self.pattern)
    }
}

pub fn parse_pattern(pattern: &str) -> Result<Vec<Option<u8>>> {
    let mut bytes = Vec::new();
    for token in pattern.split_whitespace() {
        if token == "??" || token == "?" {
            bytes.push(None);
            continue;
        }

        let value = u8::from_str_radix(token, 16).map_err(|e| {
            Error::InvalidSignature(format!("Invalid signature token '{}': {}", token, e))
        })?;
        bytes.push(Some(value));
    }

    if bytes.is_empty() {
        return Err(Error::InvalidSignature(
            "Signature pattern is empty".to_string(),
        ));
    }
    if bytes.iter().all(Option::is_none) {
        return Err(Error::InvalidSignature(
            "Signature pattern has no fixed bytes".to_string(),
        ));
    }

    Ok(bytes)
}

pub fn format_pattern(bytes: &[Option<u8>]) -> String {
    bytes
        .iter()
        .map(|b| match b {
            Some(value) => format!("{:02X}", value),
            None => "??".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Find the first match of `pattern` in `buffer`.
///
/// Jumps between occurrences of the first fixed byte with `memchr`.
pub fn find_pattern_in_buffer(buffer: &[u8], pattern: &[Option<u8>]) -> Option<usize> {
    if pattern.is_empty() || buffer.len() < pattern.len() {
        return None;
    }

    let (anchor_index, anchor) = pattern
        .iter()
        .enumerate()
        .find_map(|(i, b)| b.map(|value| (i, value)))?;
    let last_start = buffer.len() - pattern.len();

    let mut search_from = anchor_index;
    while search_from < buffer.len() {
        let found = memchr::memchr(anchor, &buffer[search_from..])? + search_from;
        let start = found - anchor_index;
        if start > last_start {
            return None;
        }

        let window = &buffer[start..start + pattern.len()];
        let matched = window
            .iter()
            .zip(pattern)
            .all(|(byte, expected)| expected.is_none_or(|value| *byte == value));
        if matched {
            return Some(start);
        }
        search_from = found + 1;
    }

    None
}

/// Scan the main module image for `pattern`, returning the offset of the
/// first match from the module base.
pub fn find_pattern<R: ReadMemory + ?Sized>(reader: &R, pattern: &[Option<u8>]) -> Result<u64> {
    let base = reader.base_address();
    let module_size = reader.module_size();
    if pattern.is_empty() || module_size < pattern.len() as u64 {
        return Err(Error::PatternNotFound(format_pattern(pattern)));
    }

    let overlap = pattern.len() as u64 - 1;
    let mut offset = 0u64;
    while offset < module_size {
        let chunk_len = (SCAN_CHUNK_SIZE as u64).min(module_size - offset);
        match reader.read_bytes(base + offset, chunk_len as usize) {
            Ok(chunk) => {
                if let Some(pos) = find_pattern_in_buffer(&chunk, pattern) {
                    return Ok(offset + pos as u64);
                }
            }
            Err(e) => debug!("Skipping unreadable chunk at 0x{:X}: {}", base + offset, e),
        }

        if offset + chunk_len >= module_size {
            break;
        }
        offset += chunk_len - overlap.min(chunk_len - 1);
    }

    Err(Error::PatternNotFound(format_pattern(pattern)))
}

/// Resolve the absolute address referenced by `signature`.
pub fn resolve_signature<R: ReadMemory + ?Sized>(reader: &R, signature: &CodeSignature) -> Result<u64> {
    let pattern = signature.pattern_bytes()?;
    let hit = find_pattern(reader, &pattern)?;

    let instr = reader.base_address() + hit + signature.instr_offset as u64;
    let disp = reader.read_i32(instr + signature.disp_offset as u64)?;
    let address = (instr + signature.instr_len as u64).wrapping_add_signed(disp as i64);

    debug!(
        "Signature '{}' matched at +0x{:X}, disp {} -> 0x{:X}",
        signature.pattern, hit, disp, address
    );
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MockMemoryBuilder;

    #[test]
    fn test_parse_pattern_with_wildcards() {
        let bytes = parse_pattern("48 8D ?? ?? ?? ?? ?? 8B D1").unwrap();
        assert_eq!(bytes.len(), 9);
        assert_eq!(bytes[0], Some(0x48));
        assert_eq!(bytes[1], Some(0x8D));
        assert_eq!(bytes[2], None);
        assert_eq!(bytes[8], Some(0xD1));
    }

    #[test]
    fn test_parse_pattern_rejects_garbage() {
        assert!(parse_pattern("48 XY").is_err());
        assert!(parse_pattern("   ").is_err());
        assert!(parse_pattern("?? ??").is_err());
    }

    #[test]
    fn test_format_pattern_roundtrip() {
        let pattern = vec![Some(0x40), Some(0x84), Some(0xED), None, Some(0x0F)];
        let formatted = format_pattern(&pattern);
        assert_eq!(formatted, "40 84 ED ?? 0F");
        let parsed = parse_pattern(&formatted).unwrap();
        assert_eq!(parsed, pattern);
    }

    #[test]
    fn test_find_pattern_in_buffer_skips_partial_matches() {
        let buffer = [0x48, 0x8D, 0x00, 0x48, 0x8D, 0x0D, 0x11, 0x8B, 0xD1];
        let pattern = parse_pattern("48 8D ?? ?? 8B D1").unwrap();
        assert_eq!(find_pattern_in_buffer(&buffer, &pattern), Some(3));
    }

    #[test]
    fn test_find_pattern_in_buffer_with_leading_wildcard() {
        let buffer = [0x00, 0xAA, 0xBB, 0xCC];
        let pattern = parse_pattern("?? BB CC").unwrap();
        assert_eq!(find_pattern_in_buffer(&buffer, &pattern), Some(1));
    }

    #[test]
    fn test_find_pattern_in_buffer_no_match_near_end() {
        let buffer = [0x00, 0x00, 0x8B];
        let pattern = parse_pattern("8B D1").unwrap();
        assert_eq!(find_pattern_in_buffer(&buffer, &pattern), None);
    }

    #[test]
    fn test_find_pattern_across_chunk_boundary() {
        let base = 0x1_4000_0000u64;
        let mut image = vec![0u8; SCAN_CHUNK_SIZE + 64];
        let at = SCAN_CHUNK_SIZE - 2;
        image[at..at + 4].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        let reader = MockMemoryBuilder::new().module(base, &image).build();

        let pattern = parse_pattern("DE AD BE EF").unwrap();
        assert_eq!(find_pattern(&reader, &pattern).unwrap(), at as u64);
    }

    #[test]
    fn test_find_pattern_not_found() {
        let reader = MockMemoryBuilder::new().module(0x1000, &[0u8; 64]).build();
        let pattern = parse_pattern("DE AD").unwrap();
        assert!(matches!(
            find_pattern(&reader, &pattern),
            Err(Error::PatternNotFound(_))
        ));
    }

    #[test]
    fn test_resolve_signature_applies_displacement() {
        let base = 0x1_4000_0000u64;
        let mut image = vec![0u8; 0x100];
        // lea rcx, [rip + disp]; mov edx, ecx
        let hit = 0x40usize;
        let target = base + 0x2000;
        let disp = (target - (base + hit as u64 + 7)) as i32;
        image[hit..hit + 3].copy_from_slice(&[0x48, 0x8D, 0x0D]);
        image[hit + 3..hit + 7].copy_from_slice(&disp.to_le_bytes());
        image[hit + 7..hit + 9].copy_from_slice(&[0x8B, 0xD1]);
        let reader = MockMemoryBuilder::new().module(base, &image).build();

        let signature = CodeSignature::new("48 8D ?? ?? ?? ?? ?? 8B D1", 3, 7);
        assert_eq!(resolve_signature(&reader, &signature).unwrap(), target);
    }

    #[test]
    fn test_resolve_signature_negative_displacement() {
        let base = 0x1_4000_0000u64;
        let mut image = vec![0u8; 0x100];
        let hit = 0x80usize;
        let disp: i32 = -0x50;
        image[hit..hit + 6].copy_from_slice(&[0x40, 0x84, 0xED, 0x0F, 0x94, 0x05]);
        image[hit + 6..hit + 10].copy_from_slice(&disp.to_le_bytes());
        let reader = MockMemoryBuilder::new().module(base, &image).build();

        let signature = CodeSignature::new("40 84 ED 0F 94 05", 6, 9);
        assert_eq!(
            resolve_signature(&reader, &signature).unwrap(),
            base + hit as u64 + 9 - 0x50
        );
    }
}
