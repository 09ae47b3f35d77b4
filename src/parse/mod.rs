//! Read-side byte cursor with byte-level precision
//!
//! This module, along with its submodules, provides the fundamental
//! definitions related to processing a raw sequence of RowBinary bytes into
//! the leaf values of an arbitrarily nested column type.
//!
//! For type-aware parsing, see [`codec::decode`](crate::codec::decode), which
//! drives a `Parser` according to a [`TypeDescriptor`](crate::schema::TypeDescriptor).
//!
//! # Layout
//!
//! The top-level of this module defines the [`Parser`] trait. Two implementing
//! types are packaged in accordingly-named modules:
//!   * `slice` for [`SliceParser`], a zero-copy cursor over an in-memory buffer
//!   * `stream` for [`StreamParser`], a cursor over any [`std::io::BufRead`],
//!     including the decompressing [`BlockReader`](crate::block::BlockReader)
//!
//! The `error` module defines the hierarchy of error cases that can be returned
//! when something goes wrong during a call to a `Parser` method.

pub mod error;
pub mod slice;
pub mod stream;

pub use error::{ParseError, ParseResult, TokenError};
pub use slice::SliceParser;
pub use stream::StreamParser;

/// # Parser
///
/// This trait is an abstraction over types representing a stateful
/// parse-object, with default implementations for the little-endian
/// fixed-width `take_*` functions of the RowBinary format.
///
/// ## Model
///
/// * All parsing is done in a non-backtracking fashion; a byte can only be
///   viewed by consuming it, and after a byte is consumed it cannot be
///   consumed again.
/// * The only lookahead permitted is [`is_exhausted`](Parser::is_exhausted),
///   which probes for end-of-input at a value boundary without consuming.
/// * A failed call leaves [`offset`](Parser::offset) pointing at or after the
///   last byte that was successfully consumed; the cursor is then only good
///   for diagnostics.
pub trait Parser {
    /// Number of bytes consumed so far.
    fn offset(&self) -> usize;

    /// Consumes and returns a single byte.
    ///
    /// Functionally equivalent to a [`consume`](Parser::consume) of length `1`.
    fn consume_byte(&mut self) -> ParseResult<u8>;

    /// Attempts to consume and return a slice of length `nbytes`.
    ///
    /// # Invariants
    ///
    /// This method **MUST** return `Ok(s)` when and only when `nbytes` bytes
    /// were available, and in such cases `s.len() == nbytes`. When fewer bytes
    /// remain, the error is [`StreamError::UnexpectedEnd`](crate::error::StreamError::UnexpectedEnd).
    fn consume(&mut self, nbytes: usize) -> ParseResult<&[u8]>;

    /// Returns `true` when no further byte can be read.
    ///
    /// May block on a streamed source until at least one byte is buffered or
    /// the source reports its end.
    fn is_exhausted(&mut self) -> ParseResult<bool>;

    /// Consumes `N` bytes and returns them in array-form
    fn consume_arr<const N: usize>(&mut self) -> ParseResult<[u8; N]> {
        let mut arr = [0u8; N];
        arr.copy_from_slice(self.consume(N)?);
        Ok(arr)
    }

    #[inline]
    fn take_u8(&mut self) -> ParseResult<u8> {
        self.consume_byte()
    }

    #[inline]
    fn take_i8(&mut self) -> ParseResult<i8> {
        Ok(self.consume_byte()? as i8)
    }

    /// Consumes two bytes and returns the corresponding `u16` value
    ///
    /// As with all fixed-width multi-byte numeric `take_X` methods,
    /// this method performs a little-endian conversion with
    /// respect to the individual bytes consumed.
    #[inline]
    fn take_u16(&mut self) -> ParseResult<u16> {
        self.consume_arr::<2>().map(u16::from_le_bytes)
    }

    #[inline]
    fn take_i16(&mut self) -> ParseResult<i16> {
        self.consume_arr::<2>().map(i16::from_le_bytes)
    }

    #[inline]
    fn take_u32(&mut self) -> ParseResult<u32> {
        self.consume_arr::<4>().map(u32::from_le_bytes)
    }

    #[inline]
    fn take_i32(&mut self) -> ParseResult<i32> {
        self.consume_arr::<4>().map(i32::from_le_bytes)
    }

    #[inline]
    fn take_u64(&mut self) -> ParseResult<u64> {
        self.consume_arr::<8>().map(u64::from_le_bytes)
    }

    #[inline]
    fn take_i64(&mut self) -> ParseResult<i64> {
        self.consume_arr::<8>().map(i64::from_le_bytes)
    }

    #[inline]
    fn take_u128(&mut self) -> ParseResult<u128> {
        self.consume_arr::<16>().map(u128::from_le_bytes)
    }

    #[inline]
    fn take_i128(&mut self) -> ParseResult<i128> {
        self.consume_arr::<16>().map(i128::from_le_bytes)
    }

    #[inline]
    fn take_f32(&mut self) -> ParseResult<f32> {
        self.consume_arr::<4>().map(f32::from_le_bytes)
    }

    #[inline]
    fn take_f64(&mut self) -> ParseResult<f64> {
        self.consume_arr::<8>().map(f64::from_le_bytes)
    }

    /// Consumes a single byte and returns the boolean value it represents
    ///
    /// The only valid boolean encodings are `0x01` for `true`
    /// and `0x00` for `false`.
    ///
    /// # Errors
    ///
    /// If the consume operation itself fails, returns the original error.
    ///
    /// Otherwise, returns `InvalidBoolean` containing the invalid byte.
    #[inline]
    fn take_bool(&mut self) -> ParseResult<bool> {
        match self.consume_byte()? {
            0x01 => Ok(true),
            0x00 => Ok(false),
            byte => Err(TokenError::InvalidBoolean(byte).into()),
        }
    }

    /// Consumes the marker byte preceding every `Nullable` payload,
    /// returning `true` when the value is absent.
    #[inline]
    fn take_null_marker(&mut self) -> ParseResult<bool> {
        match self.consume_byte()? {
            0x00 => Ok(false),
            0x01 => Ok(true),
            byte => Err(TokenError::InvalidNullMarker(byte).into()),
        }
    }

    /// Consumes an unsigned LEB128 integer of at most ten bytes.
    fn take_varint(&mut self) -> ParseResult<u64>
    where
        Self: Sized,
    {
        crate::varint::read_varint(self)
    }

    /// Consumes a LEB128 length or count prefix.
    fn take_length(&mut self) -> ParseResult<usize>
    where
        Self: Sized,
    {
        let raw = self.take_varint()?;
        usize::try_from(raw).map_err(|_| TokenError::LengthOverflow(raw).into())
    }

    /// Consumes and returns a `Vec<u8>` of length `nbytes`, following
    /// the same behavioral guarantees as [`consume`](Parser::consume).
    ///
    /// Implementations over streamed sources should override this to avoid
    /// trusting an unverified length for a single up-front allocation.
    #[inline]
    fn take_dynamic(&mut self, nbytes: usize) -> ParseResult<Vec<u8>> {
        self.consume(nbytes).map(Vec::from)
    }

    /// Consumes a LEB128 length prefix followed by that many raw bytes.
    fn take_string(&mut self) -> ParseResult<Vec<u8>>
    where
        Self: Sized,
    {
        let len = self.take_length()?;
        self.take_dynamic(len)
    }
}
