//! Parser over a buffered byte stream

use std::io::{BufRead, Read};

use super::{ParseResult, Parser};
use crate::error::StreamError;

/// Growth step used when reading a length-prefixed payload of unverified size.
const DYNAMIC_CHUNK: usize = 64 * 1024;

/// Parser over any [`BufRead`] source.
///
/// Bytes returned by [`consume`](Parser::consume) are copied into an
/// internal scratch buffer, which is reused between calls. End-of-input
/// probing goes through [`BufRead::fill_buf`] so that a source such as
/// [`BlockReader`](crate::block::BlockReader) decodes its next block only
/// when asked for more bytes at a value boundary.
#[derive(Debug)]
pub struct StreamParser<R> {
    inner: R,
    offset: usize,
    scratch: Vec<u8>,
}

impl<R: BufRead> StreamParser<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            offset: 0,
            scratch: Vec::new(),
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Copies exactly `nbytes` into `scratch`, reporting how many bytes
    /// were actually available if the source ends first.
    fn fill_scratch(&mut self, nbytes: usize) -> ParseResult<()> {
        self.scratch.clear();
        self.scratch.reserve(nbytes.min(DYNAMIC_CHUNK));
        while self.scratch.len() < nbytes {
            let available = self.inner.fill_buf().map_err(StreamError::from_io)?;
            if available.is_empty() {
                return Err(StreamError::UnexpectedEnd {
                    requested: nbytes,
                    available: self.scratch.len(),
                }
                .into());
            }
            let take = available.len().min(nbytes - self.scratch.len());
            self.scratch.extend_from_slice(&available[..take]);
            self.inner.consume(take);
            self.offset += take;
        }
        Ok(())
    }
}

impl<R: BufRead> Parser for StreamParser<R> {
    #[inline]
    fn offset(&self) -> usize {
        self.offset
    }

    fn consume_byte(&mut self) -> ParseResult<u8> {
        let available = self.inner.fill_buf().map_err(StreamError::from_io)?;
        match available.first() {
            Some(&byte) => {
                self.inner.consume(1);
                self.offset += 1;
                Ok(byte)
            }
            None => Err(StreamError::UnexpectedEnd {
                requested: 1,
                available: 0,
            }
            .into()),
        }
    }

    fn consume(&mut self, nbytes: usize) -> ParseResult<&[u8]> {
        self.fill_scratch(nbytes)?;
        Ok(&self.scratch)
    }

    fn is_exhausted(&mut self) -> ParseResult<bool> {
        Ok(self
            .inner
            .fill_buf()
            .map_err(StreamError::from_io)?
            .is_empty())
    }

    fn take_dynamic(&mut self, nbytes: usize) -> ParseResult<Vec<u8>> {
        let mut out = Vec::with_capacity(nbytes.min(DYNAMIC_CHUNK));
        let got = (&mut self.inner)
            .take(nbytes as u64)
            .read_to_end(&mut out)
            .map_err(StreamError::from_io)?;
        self.offset += got;
        if got < nbytes {
            return Err(StreamError::UnexpectedEnd {
                requested: nbytes,
                available: got,
            }
            .into());
        }
        Ok(out)
    }
}
