use std::io::{self, Write};

use super::cityhash::city_hash128;
use super::{CompressionMethod, CHECKSUM_SIZE, HEADER_SIZE};
use crate::config::Config;
use crate::error::StreamError;

/// Buffers bytes and writes them to `inner` as checksummed blocks.
///
/// A block is emitted as soon as the buffer reaches its capacity, and on
/// [`flush`](Write::flush) or [`close`](BlockWriter::close) for whatever is
/// pending. Dropping the writer without closing it discards buffered bytes.
#[derive(Debug)]
pub struct BlockWriter<W: Write> {
    inner: W,
    method: CompressionMethod,
    buf: Vec<u8>,
    capacity: usize,
    blocks: usize,
    closed: bool,
}

impl<W: Write> BlockWriter<W> {
    /// Creates a writer emitting blocks of at most `capacity` uncompressed
    /// bytes (at least one).
    pub fn new(inner: W, method: CompressionMethod, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner,
            method,
            buf: Vec::with_capacity(capacity),
            capacity,
            blocks: 0,
            closed: false,
        }
    }

    pub fn with_config(inner: W, config: &Config) -> Self {
        Self::new(inner, config.compression(), config.block_size())
    }

    pub fn method(&self) -> CompressionMethod {
        self.method
    }

    /// Number of blocks written so far.
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    fn emit(&mut self) -> Result<(), StreamError> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let payload = self.method.compress(&self.buf);
        let compressed_size = payload.len() + HEADER_SIZE;
        let too_large = || StreamError::CorruptBlock(format!("{compressed_size}-byte block"));
        let compressed = u32::try_from(compressed_size).map_err(|_| too_large())?;
        let uncompressed = u32::try_from(self.buf.len()).map_err(|_| too_large())?;

        let mut block = Vec::with_capacity(CHECKSUM_SIZE + compressed_size);
        block.extend_from_slice(&[0u8; CHECKSUM_SIZE]);
        block.push(self.method.marker());
        block.extend_from_slice(&compressed.to_le_bytes());
        block.extend_from_slice(&uncompressed.to_le_bytes());
        block.extend_from_slice(&payload);
        let [low, high] = city_hash128(&block[CHECKSUM_SIZE..]);
        block[..8].copy_from_slice(&low.to_le_bytes());
        block[8..CHECKSUM_SIZE].copy_from_slice(&high.to_le_bytes());

        self.inner.write_all(&block)?;
        tracing::debug!(
            method = %self.method,
            compressed = compressed_size,
            uncompressed = self.buf.len(),
            "emitted block"
        );
        self.blocks += 1;
        self.buf.clear();
        Ok(())
    }

    /// Emits any pending bytes and flushes `inner`. Further writes fail with
    /// `StreamClosed`; closing twice is harmless.
    pub fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.emit().map_err(StreamError::into_io)?;
        self.inner.flush()?;
        self.closed = true;
        Ok(())
    }

    /// Closes the writer and returns the underlying sink.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.close()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for BlockWriter<W> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if self.closed {
            return Err(StreamError::Closed.into_io());
        }
        let mut rest = data;
        while !rest.is_empty() {
            let take = rest.len().min(self.capacity - self.buf.len());
            self.buf.extend_from_slice(&rest[..take]);
            rest = &rest[take..];
            if self.buf.len() == self.capacity {
                self.emit().map_err(StreamError::into_io)?;
            }
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.closed {
            return Err(StreamError::Closed.into_io());
        }
        self.emit().map_err(StreamError::into_io)?;
        self.inner.flush()
    }
}
