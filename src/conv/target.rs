//! Write-side byte cursor
//!
//! [`Target`] is the dual of [`Parser`](crate::parse::Parser): the row codec
//! appends the bytes of each value to a `Target` and receives back the number
//! of bytes written.

use std::io::Write;

use crate::error::StreamError;

/// Result of a [`Target`] operation
pub type WriteResult<T> = Result<T, StreamError>;

/// Trait for byte-oriented sinks with incremental append operations
///
/// In most ways, it is convenient to think of `Target` as an analogous trait to
/// [`std::io::Write`]. The differences are that a successful `push_XXX` call
/// always appends the whole input (there is no partial write), and that the
/// `usize` it returns is used for book-keeping by the caller, for instance to
/// compute the encoded length of a value through [`ByteCounter`].
///
/// In-memory targets never fail; [`IoTarget`] reports failures of the
/// wrapped writer, including [`StreamError::Closed`] when it sits on top of a
/// closed block or pipe writer.
pub trait Target {
    /// Performs any necessary operations that amortize the cost incurred by
    /// writing a certain number of additional bytes, over the course of an
    /// unknown number of push operations.
    ///
    /// For many implementors, this may simply be a no-op. For underlying structures
    /// with a notion of capacity, such as `Vec<u8>`, this reserves the extra room.
    fn anticipate(&mut self, extra: usize);

    /// Appends a single byte, returning `1` on success.
    fn push_one(&mut self, b: u8) -> WriteResult<usize>;

    /// Appends the bytes in a known-length array.
    ///
    /// The operational semantics of this method should be indistinguishable from repeated
    /// calls to `push_one` over every element of the array in order:
    ///
    /// ```ignore
    /// x.push_many(*b"Rust") === x.push_one(b'R') + x.push_one(b'u') + x.push_one(b's') + x.push_one(b't')
    /// ```
    ///
    /// On success the return value must be `N`.
    fn push_many<const N: usize>(&mut self, arr: [u8; N]) -> WriteResult<usize>;

    /// Appends the bytes in an arbitrary-length byte-slice.
    ///
    /// On success the return value must be the total length of the slice.
    fn push_all(&mut self, buf: &[u8]) -> WriteResult<usize>;
}

/// Alias for `std::io::Sink` that is used to count the number of
/// bytes required to serialize a value, without performing any memory
/// operations.
pub type ByteCounter = std::io::Sink;

impl Target for ByteCounter {
    #[inline(always)]
    fn anticipate(&mut self, _: usize) {}

    #[inline(always)]
    fn push_one(&mut self, _: u8) -> WriteResult<usize> {
        Ok(1)
    }

    #[inline(always)]
    fn push_many<const N: usize>(&mut self, _: [u8; N]) -> WriteResult<usize> {
        Ok(N)
    }

    #[inline(always)]
    fn push_all(&mut self, buf: &[u8]) -> WriteResult<usize> {
        Ok(buf.len())
    }
}

impl Target for Vec<u8> {
    #[inline]
    fn anticipate(&mut self, extra: usize) {
        self.reserve(extra)
    }

    #[inline]
    fn push_one(&mut self, b: u8) -> WriteResult<usize> {
        self.push(b);
        Ok(1)
    }

    #[inline]
    fn push_many<const N: usize>(&mut self, arr: [u8; N]) -> WriteResult<usize> {
        self.extend_from_slice(&arr);
        Ok(N)
    }

    #[inline]
    fn push_all(&mut self, buf: &[u8]) -> WriteResult<usize> {
        self.extend_from_slice(buf);
        Ok(buf.len())
    }
}

impl<T: Target + ?Sized> Target for &mut T {
    #[inline]
    fn anticipate(&mut self, extra: usize) {
        (**self).anticipate(extra)
    }

    #[inline]
    fn push_one(&mut self, b: u8) -> WriteResult<usize> {
        (**self).push_one(b)
    }

    #[inline]
    fn push_many<const N: usize>(&mut self, arr: [u8; N]) -> WriteResult<usize> {
        (**self).push_many(arr)
    }

    #[inline]
    fn push_all(&mut self, buf: &[u8]) -> WriteResult<usize> {
        (**self).push_all(buf)
    }
}

/// Adapter presenting any [`std::io::Write`] as a [`Target`].
///
/// A blanket `impl<W: Write> Target for W` would overlap with the
/// `Vec<u8>` implementation, hence the newtype.
#[derive(Debug)]
pub struct IoTarget<W> {
    inner: W,
}

impl<W: Write> IoTarget<W> {
    pub const fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Flushes the wrapped writer.
    pub fn flush(&mut self) -> WriteResult<()> {
        self.inner.flush().map_err(StreamError::from_io)
    }
}

impl<W: Write> Target for IoTarget<W> {
    #[inline(always)]
    fn anticipate(&mut self, _: usize) {}

    fn push_one(&mut self, b: u8) -> WriteResult<usize> {
        self.push_all(&[b])
    }

    fn push_many<const N: usize>(&mut self, arr: [u8; N]) -> WriteResult<usize> {
        self.push_all(&arr)
    }

    fn push_all(&mut self, buf: &[u8]) -> WriteResult<usize> {
        self.inner.write_all(buf).map_err(StreamError::from_io)?;
        Ok(buf.len())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn targets_agree_on_counts() {
        let mut vec: Vec<u8> = Vec::new();
        let mut sink = std::io::sink();
        let mut io = IoTarget::new(Vec::new());
        assert_eq!(vec.push_many(*b"Rust").unwrap(), 4);
        assert_eq!(sink.push_many(*b"Rust").unwrap(), 4);
        assert_eq!(io.push_all(b"Rust").unwrap(), 4);
        assert_eq!(io.push_one(b'!').unwrap(), 1);
        assert_eq!(vec, b"Rust");
        assert_eq!(io.into_inner(), b"Rust!");
    }
}
