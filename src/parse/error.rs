//! Error types used to report failure in low-level parsing
//!
//! This module contains the types representing the classes of error that
//! may arise from calls to [`Parser`](super::Parser) methods and from the
//! decode half of the row codec built on top of them.
//!
//! # Layout
//!
//! This module defines the primary type `ParseError` and the alias
//! `ParseResult<T>`; failures are grouped by provenance:
//!   * [`StreamError`] when the byte source itself ran dry, was closed, or failed
//!   * [`TokenError`] when bytes were available but did not form a legal encoding
//!   * [`TypeError`] when a type string embedded in the stream (a row header) was unusable

use std::error::Error;
use std::fmt::{Display, Formatter, Result};
use std::string::FromUtf8Error;

use crate::error::{ErrorKind, StreamError};
use crate::schema::error::TypeError;

/// Enumeration type over all errors that may be encountered when calling
/// methods on `Parser` types, or when decoding a value cell through one.
#[derive(Debug)]
pub enum ParseError {
    /// The byte source failed, was closed, or ended mid-value
    Stream(StreamError),
    /// Bytes were read successfully but violate the wire format
    Token(TokenError),
    /// A type string read from the stream could not be parsed
    Type(TypeError),
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Stream(err) => err.kind(),
            ParseError::Token(_) => ErrorKind::MalformedEncoding,
            ParseError::Type(err) => err.kind(),
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            ParseError::Stream(err) => Display::fmt(err, f),
            ParseError::Token(err) => Display::fmt(err, f),
            ParseError::Type(err) => write!(f, "unusable type in stream header: {err}"),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParseError::Stream(err) => Some(err),
            ParseError::Token(err) => Some(err),
            ParseError::Type(err) => Some(err),
        }
    }
}

impl From<StreamError> for ParseError {
    fn from(err: StreamError) -> Self {
        Self::Stream(err)
    }
}

impl From<TokenError> for ParseError {
    fn from(err: TokenError) -> Self {
        Self::Token(err)
    }
}

impl From<TypeError> for ParseError {
    fn from(err: TypeError) -> Self {
        Self::Type(err)
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        Self::Stream(StreamError::from_io(err))
    }
}

/// Type alias for Result with an error type of [`ParseError`]
///
/// Most `Parser` methods, and every decode function of the row codec,
/// have a return type of `ParseResult<T>` for various `T`
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Errors raised when the binary-lexical contents of the buffer do not
/// form a legal encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Nullable marker byte other than `0` (present) or `1` (absent)
    InvalidNullMarker(u8),
    /// Boolean byte other than `0` or `1`
    InvalidBoolean(u8),
    /// LEB128 integer did not terminate within ten bytes
    VarintOverflow,
    /// LEB128 length prefix does not fit in the address space
    LengthOverflow(u64),
    /// Variant discriminator outside the declared alternatives
    InvalidDiscriminator { value: u8, alternatives: usize },
    /// Header text (column name or type) was not valid UTF-8
    InvalidUtf8(FromUtf8Error),
    /// Non-null value encountered for a column of type `Nothing`
    NonNullNothing,
    /// Implausible element count for a collection whose elements carry no bytes
    ZeroWidthElements(usize),
    /// Bytes left over after a complete value
    TrailingBytes(usize),
    /// Stream still holds data after the last expected row
    UnconsumedInput { offset: usize },
}

impl Display for TokenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            TokenError::InvalidNullMarker(byte) => {
                write!(f, "expected nullable marker 0x00 or 0x01, found 0x{byte:02x}")
            }
            TokenError::InvalidBoolean(byte) => {
                write!(f, "expected boolean byte 0x00 or 0x01, found 0x{byte:02x}")
            }
            TokenError::VarintOverflow => {
                write!(f, "variable-length integer exceeds ten bytes")
            }
            TokenError::LengthOverflow(len) => {
                write!(f, "length prefix {len} does not fit in memory")
            }
            TokenError::InvalidDiscriminator {
                value,
                alternatives,
            } => write!(
                f,
                "variant discriminator {value} out of range for {alternatives} alternatives"
            ),
            TokenError::InvalidUtf8(err) => write!(f, "header text is not UTF-8: {err}"),
            TokenError::NonNullNothing => write!(f, "non-null value for type Nothing"),
            TokenError::ZeroWidthElements(n) => {
                write!(f, "{n} elements declared for a type with no payload")
            }
            TokenError::TrailingBytes(n) => write!(f, "{n} bytes left over after value"),
            TokenError::UnconsumedInput { offset } => {
                write!(f, "input continues past offset {offset}")
            }
        }
    }
}

impl Error for TokenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TokenError::InvalidUtf8(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FromUtf8Error> for TokenError {
    fn from(err: FromUtf8Error) -> Self {
        Self::InvalidUtf8(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn dummy<T: Send + Sync>() {}

    #[test]
    fn parse_error_threadsafe() {
        dummy::<ParseError>()
    }

    #[test]
    fn token_errors_are_malformed_encoding() {
        let err = ParseError::from(TokenError::InvalidNullMarker(2));
        assert_eq!(err.kind(), ErrorKind::MalformedEncoding);
        let err = ParseError::from(StreamError::UnexpectedEnd {
            requested: 4,
            available: 1,
        });
        assert_eq!(err.kind(), ErrorKind::UnexpectedEndOfStream);
    }
}
