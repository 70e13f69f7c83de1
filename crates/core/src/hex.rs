//! Lowercase hex encoding for binary payloads.

use std::fmt;

/// Hex decoding failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HexError {
    /// Input length is odd
    OddLength,
    /// Character outside `[0-9a-fA-F]` at the given byte offset
    InvalidChar(usize),
}

impl fmt::Display for HexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HexError::OddLength => f.write_str("odd number of hex digits"),
            HexError::InvalidChar(at) => write!(f, "invalid hex digit at offset {}", at),
        }
    }
}

const DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Encode bytes as lowercase hex.
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push(DIGITS[(b >> 4) as usize] as char);
        out.push(DIGITS[(b & 0x0f) as usize] as char);
    }
    out
}

/// Decode hex (either case) into bytes.
pub fn decode(s: &str) -> Result<Vec<u8>, HexError> {
    let raw = s.as_bytes();
    if raw.len() % 2 != 0 {
        return Err(HexError::OddLength);
    }
    raw.chunks(2)
        .enumerate()
        .map(|(i, pair)| {
            let hi = nibble(pair[0]).ok_or(HexError::InvalidChar(i * 2))?;
            let lo = nibble(pair[1]).ok_or(HexError::InvalidChar(i * 2 + 1))?;
            Ok((hi << 4) | lo)
        })
        .collect()
}

fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}
