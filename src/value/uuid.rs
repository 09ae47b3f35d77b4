//! 128-bit UUIDs in the server's two-word layout
//!
//! The server stores a UUID as two little-endian 64-bit words, the high
//! half first. This is neither the RFC 4122 byte order nor the byte-swapped
//! Microsoft order, so [`Uuid`] keeps the two halves explicitly.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::conv::target::{Target, WriteResult};
use crate::parse::{ParseResult, Parser};
use crate::{Decode, Encode};

use super::error::ConvError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uuid {
    pub high: u64,
    pub low: u64,
}

impl Uuid {
    pub const fn new(high: u64, low: u64) -> Self {
        Self { high, low }
    }

    pub const fn from_u128(value: u128) -> Self {
        Self {
            high: (value >> 64) as u64,
            low: value as u64,
        }
    }

    pub const fn as_u128(&self) -> u128 {
        ((self.high as u128) << 64) | self.low as u128
    }

    /// RFC 4122 byte order, most significant byte first.
    pub const fn to_rfc_bytes(&self) -> [u8; 16] {
        self.as_u128().to_be_bytes()
    }
}

impl Display for Uuid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let v = self.as_u128();
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
            (v >> 96) as u32,
            (v >> 80) as u16,
            (v >> 64) as u16,
            (v >> 48) as u16,
            v & 0xffff_ffff_ffff
        )
    }
}

impl FromStr for Uuid {
    type Err = ConvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConvError::invalid(format!("string '{s}'"), "UUID");
        let groups: Vec<&str> = s.split('-').collect();
        let lengths: &[usize] = &[8, 4, 4, 4, 12];
        if groups.len() != lengths.len()
            || groups.iter().zip(lengths).any(|(g, len)| g.len() != *len)
        {
            return Err(invalid());
        }
        let hex: String = groups.concat();
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        u128::from_str_radix(&hex, 16)
            .map(Self::from_u128)
            .map_err(|_| invalid())
    }
}

impl Encode for Uuid {
    fn write_to<U: Target>(&self, buf: &mut U) -> WriteResult<usize> {
        Ok(self.high.write_to(buf)? + self.low.write_to(buf)?)
    }
}

impl Decode for Uuid {
    fn parse<P: Parser>(p: &mut P) -> ParseResult<Self> {
        let high = p.take_u64()?;
        let low = p.take_u64()?;
        Ok(Self { high, low })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hex;

    #[test]
    fn text_form() {
        let uuid: Uuid = "61f0c404-5cb3-11e7-907b-a6006ad3dba0".parse().unwrap();
        assert_eq!(uuid.high, 0x61f0c4045cb311e7);
        assert_eq!(uuid.low, 0x907ba6006ad3dba0);
        assert_eq!(uuid.to_string(), "61f0c404-5cb3-11e7-907b-a6006ad3dba0");
        assert!("61f0c404-5cb3-11e7-907b".parse::<Uuid>().is_err());
        assert!("61f0c404-5cb3-11e7-907b-a6006ad3dbaz".parse::<Uuid>().is_err());
    }

    #[test]
    fn wire_words_are_little_endian() {
        let uuid = Uuid::new(0x0102030405060708, 0x1112131415161718);
        assert_eq!(
            uuid.to_rfc_bytes().to_vec(),
            hex!("0102030405060708 1112131415161718")
        );
        let wire = hex!("0807060504030201 1817161514131211");
        assert_eq!(uuid.to_bytes(), wire);
        assert_eq!(Uuid::decode(&wire).unwrap(), uuid);
    }
}
