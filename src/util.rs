//! Hexadecimal helpers used for diagnostics and byte fixtures

use std::fmt::Write;

/// Formats a sequence of bytes as a `String` containing a hexadecimal blob
///
/// # Examples
///
/// ```
/// # use rowbin::util::hex_of_bytes;
/// assert_eq!(hex_of_bytes(vec![0xde, 0xad, 0xbe, 0xef]), String::from("deadbeef"));
/// ```
#[must_use]
pub fn hex_of_bytes<T>(val: T) -> String
where
    T: AsRef<[u8]>,
{
    let bytes = val.as_ref();
    let mut hex: String = String::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        // writing into a String cannot fail
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

/// Error returned by [`bytes_of_hex`] for strings that are not a hex blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HexError {
    /// Odd number of hex digits
    OddParity(usize),
    /// Character outside `[0-9a-fA-F]` (ASCII whitespace is skipped)
    NonHex(char),
}

impl std::fmt::Display for HexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HexError::OddParity(len) => write!(f, "odd number of hex digits ({len})"),
            HexError::NonHex(c) => write!(f, "non-hex character {c:?}"),
        }
    }
}

impl std::error::Error for HexError {}

/// Attempt to parse a string as a hexadecimal blob, returning the encoded
/// bytes. ASCII whitespace between digits is ignored, so that fixtures can be
/// grouped for readability.
///
/// # Examples
///
/// ```
/// # use rowbin::util::bytes_of_hex;
/// assert_eq!(Ok(vec![0xde, 0xad, 0xbe, 0xef]), bytes_of_hex("dead beef"));
/// ```
pub fn bytes_of_hex<T>(src: &T) -> Result<Vec<u8>, HexError>
where
    T: AsRef<str> + ?Sized,
{
    let mut digits = Vec::with_capacity(src.as_ref().len());
    for c in src.as_ref().chars() {
        if c.is_ascii_whitespace() {
            continue;
        }
        match c.to_digit(16) {
            Some(d) => digits.push(d as u8),
            None => return Err(HexError::NonHex(c)),
        }
    }
    if digits.len() % 2 != 0 {
        return Err(HexError::OddParity(digits.len()));
    }
    Ok(digits
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}

/// Parses a string literal as a hex blob into a `Vec<u8>`, panicking on
/// malformed input. Intended for test fixtures.
#[macro_export]
macro_rules! hex {
    ($s:expr) => {{
        $crate::util::bytes_of_hex($s).expect("hex! macro encountered error")
    }};
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hex_roundtrip_with_spacing() {
        assert_eq!(hex!("00 ff 7f"), vec![0x00, 0xff, 0x7f]);
        assert_eq!(hex_of_bytes([0x00u8, 0xff, 0x7f]), "00ff7f");
        assert_eq!(bytes_of_hex("abc"), Err(HexError::OddParity(3)));
        assert_eq!(bytes_of_hex("zz"), Err(HexError::NonHex('z')));
    }
}
