//! Unsigned LEB128 integers
//!
//! Element counts, string lengths and row-header sizes are written as
//! little-endian base-128 integers: seven payload bits per byte, least
//! significant group first, with the high bit of every byte but the last
//! set. A `u64` needs at most ten bytes.

use crate::conv::target::{Target, WriteResult};
use crate::parse::{ParseResult, Parser, TokenError};

/// Longest legal encoding of a `u64`.
pub const MAX_VARINT_LEN: usize = 10;

/// Reads one LEB128 integer from `p`.
///
/// # Errors
///
/// Truncated input is reported by the parser; a continuation bit still set
/// on the tenth byte, or payload bits beyond the 64th, are
/// [`TokenError::VarintOverflow`].
pub fn read_varint<P: Parser + ?Sized>(p: &mut P) -> ParseResult<u64> {
    let mut value: u64 = 0;
    for ix in 0..MAX_VARINT_LEN {
        let byte = p.consume_byte()?;
        let group = u64::from(byte & 0x7f);
        if ix == MAX_VARINT_LEN - 1 && group > 1 {
            return Err(TokenError::VarintOverflow.into());
        }
        value |= group << (7 * ix);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(TokenError::VarintOverflow.into())
}

/// Serializes `value` into a stack buffer, returning it with its used length.
#[must_use]
pub fn encode_varint(mut value: u64) -> ([u8; MAX_VARINT_LEN], usize) {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let mut len = 0;
    loop {
        let group = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf[len] = group;
            return (buf, len + 1);
        }
        buf[len] = group | 0x80;
        len += 1;
    }
}

/// Appends the LEB128 encoding of `value` to `buf`, returning the byte count.
pub fn write_varint<U: Target + ?Sized>(buf: &mut U, value: u64) -> WriteResult<usize> {
    let (bytes, len) = encode_varint(value);
    buf.push_all(&bytes[..len])
}

/// Number of bytes [`write_varint`] would emit for `value`.
#[must_use]
pub const fn varint_len(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    (bits + 6) / 7
}

/// LEB128-coded `u64` usable wherever an [`Encode`](crate::Encode) or
/// [`Decode`](crate::Decode) value is expected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Leb128(pub u64);

impl crate::Encode for Leb128 {
    fn write_to<U: Target>(&self, buf: &mut U) -> WriteResult<usize> {
        write_varint(buf, self.0)
    }
}

impl crate::Decode for Leb128 {
    fn parse<P: Parser>(p: &mut P) -> ParseResult<Self> {
        read_varint(p).map(Leb128)
    }
}

impl From<u64> for Leb128 {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{hex, Decode, Encode};

    #[test]
    fn leb128_conv() {
        assert_eq!(Leb128(0), Leb128::decode(&hex!("00")).unwrap());
        assert_eq!(Leb128(1), Leb128::decode(&hex!("01")).unwrap());
        assert_eq!(Leb128(128), Leb128::decode(&hex!("8001")).unwrap());
        assert_eq!(Leb128(300).to_bytes(), hex!("ac02"));
        assert_eq!(
            Leb128(u64::MAX).to_bytes(),
            hex!("ffffffffffffffffff01")
        );
        assert_eq!(
            Leb128(u64::MAX),
            Leb128::decode(&hex!("ffffffffffffffffff01")).unwrap()
        );
    }

    #[test]
    fn overlong_rejected() {
        let err = Leb128::decode(&hex!("ffffffffffffffffff02")).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::MalformedEncoding);
        let err = Leb128::decode(&hex!("8080808080808080808001")).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::MalformedEncoding);
    }

    #[test]
    fn predicted_lengths() {
        for value in [0u64, 1, 127, 128, 16_383, 16_384, u32::MAX as u64, u64::MAX] {
            assert_eq!(varint_len(value), encode_varint(value).1, "{value}");
        }
    }
}
