//! Zero-copy parser over an in-memory buffer

use super::{ParseResult, Parser};
use crate::error::StreamError;

/// Parser over a borrowed byte slice.
///
/// Consumed bytes are returned as sub-slices of the original buffer, so
/// no copying takes place until a decoded value takes ownership.
#[derive(Clone, Debug)]
pub struct SliceParser<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> SliceParser<'a> {
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    /// Number of bytes that can still be consumed.
    pub const fn remainder(&self) -> usize {
        self.buf.len() - self.offset
    }

    /// Unconsumed tail of the buffer.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.offset..]
    }

    fn underflow(&self, requested: usize) -> StreamError {
        StreamError::UnexpectedEnd {
            requested,
            available: self.remainder(),
        }
    }
}

impl<'a> From<&'a [u8]> for SliceParser<'a> {
    fn from(buf: &'a [u8]) -> Self {
        Self::new(buf)
    }
}

impl<'a> From<&'a Vec<u8>> for SliceParser<'a> {
    fn from(buf: &'a Vec<u8>) -> Self {
        Self::new(buf.as_slice())
    }
}

impl<'a> Parser for SliceParser<'a> {
    #[inline]
    fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    fn consume_byte(&mut self) -> ParseResult<u8> {
        match self.buf.get(self.offset) {
            Some(&byte) => {
                self.offset += 1;
                Ok(byte)
            }
            None => Err(self.underflow(1).into()),
        }
    }

    fn consume(&mut self, nbytes: usize) -> ParseResult<&[u8]> {
        if nbytes > self.remainder() {
            return Err(self.underflow(nbytes).into());
        }
        let start = self.offset;
        self.offset += nbytes;
        Ok(&self.buf[start..self.offset])
    }

    #[inline]
    fn is_exhausted(&mut self) -> ParseResult<bool> {
        Ok(self.remainder() == 0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn failed_consume_leaves_offset() {
        let mut p = SliceParser::new(&[1, 2, 3]);
        assert_eq!(p.consume(2).unwrap(), &[1, 2]);
        assert!(p.consume(2).is_err());
        assert_eq!(p.offset(), 2);
        assert_eq!(p.rest(), &[3]);
    }
}
