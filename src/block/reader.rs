use std::io::{self, BufRead, Read};

use super::cityhash::city_hash128;
use super::{CompressionMethod, CHECKSUM_SIZE, HEADER_SIZE, MAX_COMPRESSED_SIZE};
use crate::error::StreamError;
use crate::util::hex_of_bytes;

const PREAMBLE_SIZE: usize = CHECKSUM_SIZE + HEADER_SIZE;

/// Initial payload buffer; larger payloads grow it as bytes arrive.
const READ_CHUNK: usize = 64 * 1024;

/// Reads until `buf` is full or the source ends, returning the count read.
fn read_full<R: Read>(inner: &mut R, buf: &mut [u8]) -> Result<usize, StreamError> {
    let mut got = 0;
    while got < buf.len() {
        match inner.read(&mut buf[got..]) {
            Ok(0) => break,
            Ok(n) => got += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(StreamError::from_io(err)),
        }
    }
    Ok(got)
}

fn le_u32(bytes: &[u8]) -> usize {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(word) as usize
}

fn le_u64(bytes: &[u8]) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(word)
}

fn checksum_hex(words: [u64; 2]) -> String {
    let mut bytes = words[0].to_le_bytes().to_vec();
    bytes.extend_from_slice(&words[1].to_le_bytes());
    hex_of_bytes(bytes)
}

/// Serves the decompressed contents of a block stream.
///
/// Blocks are decoded one at a time, when the previous window is used up.
/// The stream ends cleanly only where a block would begin; a source that
/// stops inside a block header or payload is an `UnexpectedEndOfStream`.
#[derive(Debug)]
pub struct BlockReader<R: Read> {
    inner: R,
    window: Vec<u8>,
    pos: usize,
    blocks: usize,
    closed: bool,
}

impl<R: Read> BlockReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            window: Vec::new(),
            pos: 0,
            blocks: 0,
            closed: false,
        }
    }

    /// Number of blocks decoded so far.
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Discards the current window; further reads fail with `StreamClosed`.
    pub fn close(&mut self) {
        self.closed = true;
        self.window = Vec::new();
        self.pos = 0;
    }

    /// Loads the next block into the window, returning `false` at a clean
    /// end of stream.
    fn next_block(&mut self) -> Result<bool, StreamError> {
        let mut preamble = [0u8; PREAMBLE_SIZE];
        let got = read_full(&mut self.inner, &mut preamble)?;
        if got == 0 {
            return Ok(false);
        }
        if got < PREAMBLE_SIZE {
            return Err(StreamError::UnexpectedEnd {
                requested: PREAMBLE_SIZE,
                available: got,
            });
        }
        let expected = [le_u64(&preamble[..8]), le_u64(&preamble[8..CHECKSUM_SIZE])];
        let header = &preamble[CHECKSUM_SIZE..];
        let compressed = le_u32(&header[1..5]);
        let uncompressed = le_u32(&header[5..9]);
        if !(HEADER_SIZE..=MAX_COMPRESSED_SIZE).contains(&compressed) {
            return Err(StreamError::CorruptBlock(format!(
                "compressed size {compressed} out of range"
            )));
        }
        if uncompressed > MAX_COMPRESSED_SIZE {
            return Err(StreamError::CorruptBlock(format!(
                "uncompressed size {uncompressed} out of range"
            )));
        }

        let payload_len = compressed - HEADER_SIZE;
        let mut body = Vec::with_capacity(HEADER_SIZE + payload_len.min(READ_CHUNK));
        body.extend_from_slice(header);
        let got = (&mut self.inner)
            .take(payload_len as u64)
            .read_to_end(&mut body)
            .map_err(StreamError::from_io)?;
        if got < payload_len {
            return Err(StreamError::UnexpectedEnd {
                requested: payload_len,
                available: got,
            });
        }

        let actual = city_hash128(&body);
        if actual != expected {
            tracing::warn!(
                expected = %checksum_hex(expected),
                actual = %checksum_hex(actual),
                block = self.blocks,
                "block checksum mismatch"
            );
            return Err(StreamError::ChecksumMismatch { expected, actual });
        }

        let method = CompressionMethod::from_marker(header[0])?;
        self.window = method.decompress(&body[HEADER_SIZE..], uncompressed)?;
        self.pos = 0;
        self.blocks += 1;
        tracing::debug!(
            %method,
            compressed,
            uncompressed,
            "decoded block"
        );
        Ok(true)
    }
}

impl<R: Read> Read for BlockReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl<R: Read> BufRead for BlockReader<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.closed {
            return Err(StreamError::Closed.into_io());
        }
        while self.pos == self.window.len() {
            if !self.next_block().map_err(StreamError::into_io)? {
                break;
            }
        }
        Ok(&self.window[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.window.len());
    }
}
