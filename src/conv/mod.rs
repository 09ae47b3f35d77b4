//! Schema-less transcoding of host primitives
//!
//! This module contains definitions for the transcoding traits `Encode` and
//! `Decode`, which are motivationally equivalent to the `Serialize` and
//! `Deserialize` traits defined in `serde`, restricted to the RowBinary wire
//! format.
//!
//! A type implements `Encode`/`Decode` when its RowBinary form does not
//! depend on any column parameters: fixed-width integers and floats,
//! booleans, IP addresses, UUIDs, LEB128 integers, and length-prefixed
//! strings. The row codec in [`crate::codec`] uses these for its leaves and
//! handles everything that needs a [`TypeDescriptor`](crate::schema::TypeDescriptor)
//! (decimals, dates with declared scale, enums, composites) itself.
//!
//! Callers that know their row layout statically can use the traits directly
//! against any [`Parser`] or [`Target`], bypassing the dynamic value model.
//!
//! The submodule [`target`] offers an abstraction along the lines of
//! [`std::io::Write`], namely the [`target::Target`] trait. This is the dual
//! to [`crate::parse::Parser`], acting as the generic bound for serialization
//! in the [`Encode::write_to`] method.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::parse::{ParseResult, Parser, SliceParser};

use self::target::{ByteCounter, Target, WriteResult};

pub mod error;
pub mod target;

pub use error::{EncodeError, EncodeResult};

/// Trait for types that support serialization into RowBinary form
///
/// Implementing [`Encode`] can be as simple as providing a definition of the
/// required method [`write_to`](Encode::write_to); the remaining methods are
/// conveniences defined in terms of it.
pub trait Encode {
    /// Appends the serialized bytes of this value to a generic buffer,
    /// returning the exact number of bytes written
    ///
    /// Morally related to [`std::io::Write::write_all`]; the only failures
    /// are those of the target itself.
    fn write_to<U: Target>(&self, buf: &mut U) -> WriteResult<usize>;

    /// Creates a [`Vec<u8>`] and fills it with the serialized bytes of this value.
    #[must_use]
    #[inline]
    fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        // Vec targets are infallible
        let _ = self.write_to(&mut buf);
        buf
    }

    /// Computes, without allocation, the number of bytes in the serialized
    /// form of `self`, by writing it to a [`ByteCounter`].
    #[must_use]
    #[inline]
    fn encoded_len(&self) -> usize {
        let mut counter: ByteCounter = std::io::sink();
        self.write_to(&mut counter).unwrap_or(0)
    }
}

/// Trait for types that support deserialization from RowBinary form
pub trait Decode: Sized {
    /// Consumes exactly the bytes of one value from `p`.
    fn parse<P: Parser>(p: &mut P) -> ParseResult<Self>;

    /// Decodes one value from the start of an in-memory buffer.
    ///
    /// With the feature `check_complete_parse` enabled, bytes left over after
    /// the value are reported as [`TokenError::TrailingBytes`](crate::parse::TokenError::TrailingBytes).
    fn decode<B: AsRef<[u8]> + ?Sized>(bytes: &B) -> ParseResult<Self> {
        let mut p = SliceParser::new(bytes.as_ref());
        let ret = Self::parse(&mut p)?;
        cfg_if::cfg_if! {
            if #[cfg(feature = "check_complete_parse")] {
                if p.remainder() != 0 {
                    return Err(crate::parse::TokenError::TrailingBytes(p.remainder()).into());
                }
            }
        }
        Ok(ret)
    }
}

macro_rules! impl_le_primitive {
    ($($t:ty => $take:ident),* $(,)?) => {
        $(
            impl Encode for $t {
                #[inline]
                fn write_to<U: Target>(&self, buf: &mut U) -> WriteResult<usize> {
                    buf.push_many(self.to_le_bytes())
                }
            }

            impl Decode for $t {
                #[inline]
                fn parse<P: Parser>(p: &mut P) -> ParseResult<Self> {
                    p.$take()
                }
            }
        )*
    };
}

impl_le_primitive!(
    u8 => take_u8,
    i8 => take_i8,
    u16 => take_u16,
    i16 => take_i16,
    u32 => take_u32,
    i32 => take_i32,
    u64 => take_u64,
    i64 => take_i64,
    u128 => take_u128,
    i128 => take_i128,
    f32 => take_f32,
    f64 => take_f64,
);

impl Encode for bool {
    #[inline]
    fn write_to<U: Target>(&self, buf: &mut U) -> WriteResult<usize> {
        buf.push_one(u8::from(*self))
    }
}

impl Decode for bool {
    #[inline]
    fn parse<P: Parser>(p: &mut P) -> ParseResult<Self> {
        p.take_bool()
    }
}

/// IPv4 travels as a little-endian `u32`, i.e. with its octets reversed.
impl Encode for Ipv4Addr {
    fn write_to<U: Target>(&self, buf: &mut U) -> WriteResult<usize> {
        u32::from(*self).write_to(buf)
    }
}

impl Decode for Ipv4Addr {
    fn parse<P: Parser>(p: &mut P) -> ParseResult<Self> {
        p.take_u32().map(Ipv4Addr::from)
    }
}

/// IPv6 travels as its sixteen octets in network order.
impl Encode for Ipv6Addr {
    fn write_to<U: Target>(&self, buf: &mut U) -> WriteResult<usize> {
        buf.push_many(self.octets())
    }
}

impl Decode for Ipv6Addr {
    fn parse<P: Parser>(p: &mut P) -> ParseResult<Self> {
        p.consume_arr::<16>().map(Ipv6Addr::from)
    }
}

impl Encode for [u8] {
    fn write_to<U: Target>(&self, buf: &mut U) -> WriteResult<usize> {
        Ok(crate::varint::write_varint(buf, self.len() as u64)? + buf.push_all(self)?)
    }
}

impl Encode for str {
    fn write_to<U: Target>(&self, buf: &mut U) -> WriteResult<usize> {
        self.as_bytes().write_to(buf)
    }
}

impl Encode for Vec<u8> {
    fn write_to<U: Target>(&self, buf: &mut U) -> WriteResult<usize> {
        self.as_slice().write_to(buf)
    }
}

impl Decode for Vec<u8> {
    fn parse<P: Parser>(p: &mut P) -> ParseResult<Self> {
        p.take_string()
    }
}

impl Encode for String {
    fn write_to<U: Target>(&self, buf: &mut U) -> WriteResult<usize> {
        self.as_bytes().write_to(buf)
    }
}

/// Strict: invalid UTF-8 is a [`TokenError::InvalidUtf8`](crate::parse::TokenError::InvalidUtf8).
/// Use `Vec<u8>` for columns holding arbitrary bytes.
impl Decode for String {
    fn parse<P: Parser>(p: &mut P) -> ParseResult<Self> {
        let bytes = p.take_string()?;
        String::from_utf8(bytes)
            .map_err(|err| crate::parse::TokenError::from(err).into())
    }
}
