//! Bounded byte pipe between a producer and a consumer thread
//!
//! [`pipe`] returns the two ends of a bounded queue of byte buffers. The
//! writer half implements [`Write`], cutting its input into buffers of the
//! configured block size; the reader half implements [`Read`] and
//! [`BufRead`], so a [`StreamParser`](crate::parse::StreamParser) or a
//! [`BlockReader`](crate::block::BlockReader) can consume it directly.
//!
//! Neither side waits forever. A writer facing a full queue, or a reader
//! facing an empty one, gives up after the configured timeout with a
//! `TimedOut` error. The end of the stream is an empty buffer, sent by
//! [`PipeWriter::close`] or when the writer is dropped.

use std::io::{self, BufRead, Read, Write};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, SendTimeoutError, Sender};

use crate::config::Config;
use crate::error::StreamError;

/// Creates a connected writer/reader pair bounded by `config`.
pub fn pipe(config: &Config) -> (PipeWriter, PipeReader) {
    let (tx, rx) = crossbeam_channel::bounded(config.pipe_capacity());
    let timeout = config.pipe_timeout();
    let writer = PipeWriter {
        tx: Some(tx),
        buf: Vec::new(),
        chunk: config.block_size(),
        timeout,
    };
    let reader = PipeReader {
        rx: Some(rx),
        current: Vec::new(),
        pos: 0,
        finished: false,
        timeout,
    };
    (writer, reader)
}

fn timed_out(timeout: Duration, what: &'static str) -> StreamError {
    let millis = timeout.as_millis();
    tracing::debug!(timeout_ms = %millis, "pipe {what} timed out");
    StreamError::TimedOut { millis }
}

/// Producer half of a [`pipe`].
#[derive(Debug)]
pub struct PipeWriter {
    tx: Option<Sender<Vec<u8>>>,
    buf: Vec<u8>,
    chunk: usize,
    timeout: Duration,
}

impl PipeWriter {
    fn send(&self, data: Vec<u8>) -> Result<(), StreamError> {
        let tx = self.tx.as_ref().ok_or(StreamError::Closed)?;
        tx.send_timeout(data, self.timeout).map_err(|err| match err {
            SendTimeoutError::Timeout(_) => timed_out(self.timeout, "write"),
            SendTimeoutError::Disconnected(_) => StreamError::Closed,
        })
    }

    fn send_pending(&mut self) -> Result<(), StreamError> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let data = std::mem::replace(&mut self.buf, Vec::with_capacity(self.chunk));
        self.send(data)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_none()
    }

    /// Sends pending bytes and the end-of-stream marker, then releases the
    /// queue. Closing twice is harmless.
    pub fn close(&mut self) -> Result<(), StreamError> {
        if self.tx.is_none() {
            return Ok(());
        }
        let ret = self.send_pending().and_then(|()| self.send(Vec::new()));
        self.tx = None;
        ret
    }
}

impl Write for PipeWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if self.tx.is_none() {
            return Err(StreamError::Closed.into_io());
        }
        let mut rest = data;
        while !rest.is_empty() {
            let take = rest.len().min(self.chunk - self.buf.len());
            self.buf.extend_from_slice(&rest[..take]);
            rest = &rest[take..];
            if self.buf.len() == self.chunk {
                self.send_pending().map_err(StreamError::into_io)?;
            }
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.tx.is_none() {
            return Err(StreamError::Closed.into_io());
        }
        self.send_pending().map_err(StreamError::into_io)
    }
}

impl Drop for PipeWriter {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            tracing::debug!(error = %err, "pipe writer dropped without a clean close");
        }
    }
}

/// Consumer half of a [`pipe`].
#[derive(Debug)]
pub struct PipeReader {
    rx: Option<Receiver<Vec<u8>>>,
    current: Vec<u8>,
    pos: usize,
    finished: bool,
    timeout: Duration,
}

impl PipeReader {
    /// Stops consuming; the writer's next send fails with `StreamClosed`
    /// once the queue has no reader.
    pub fn close(&mut self) {
        self.rx = None;
        self.current = Vec::new();
        self.pos = 0;
    }

    pub fn is_closed(&self) -> bool {
        self.rx.is_none()
    }
}

impl BufRead for PipeReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        let rx = match &self.rx {
            Some(rx) => rx,
            None => return Err(StreamError::Closed.into_io()),
        };
        while self.pos == self.current.len() && !self.finished {
            match rx.recv_timeout(self.timeout) {
                Ok(data) if data.is_empty() => self.finished = true,
                Ok(data) => {
                    self.current = data;
                    self.pos = 0;
                }
                Err(RecvTimeoutError::Timeout) => {
                    return Err(timed_out(self.timeout, "read").into_io())
                }
                Err(RecvTimeoutError::Disconnected) => self.finished = true,
            }
        }
        Ok(&self.current[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.current.len());
    }
}

impl Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

#[cfg(test)]
mod test {
    use std::thread;

    use super::*;
    use crate::block::{BlockReader, BlockWriter};
    use crate::codec::{RowReader, RowWriter};
    use crate::conv::target::IoTarget;
    use crate::error::ErrorKind;
    use crate::parse::{ParseResult, StreamParser};
    use crate::schema::parse_columns;
    use crate::value::Value;

    fn dummy<T: Send + Sync>() {}

    fn fast() -> Config {
        Config::default()
            .with_block_size(4)
            .with_pipe_capacity(2)
            .with_pipe_timeout(Duration::from_millis(50))
    }

    fn kind(err: io::Error) -> ErrorKind {
        StreamError::from_io(err).kind()
    }

    #[test]
    fn pipe_threadsafe() {
        dummy::<PipeWriter>();
        dummy::<PipeReader>();
    }

    #[test]
    fn bytes_cross_threads_in_order() {
        let (mut writer, mut reader) = pipe(&fast().with_pipe_timeout(Duration::from_secs(5)));
        let producer = thread::spawn(move || {
            for i in 0..100u8 {
                writer.write_all(&[i; 3]).unwrap();
            }
            writer.close().unwrap();
        });
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        producer.join().unwrap();
        let expected: Vec<u8> = (0..100u8).flat_map(|i| [i; 3]).collect();
        assert_eq!(out, expected);
    }

    #[test]
    fn full_queue_times_out() {
        let (mut writer, _reader) = pipe(&fast().with_block_size(1).with_pipe_capacity(1));
        writer.write_all(&[1]).unwrap();
        let err = writer.write_all(&[2]).unwrap_err();
        assert_eq!(kind(err), ErrorKind::TimedOut);
    }

    #[test]
    fn empty_queue_times_out() {
        let (_writer, mut reader) = pipe(&fast());
        let err = reader.read(&mut [0u8; 4]).unwrap_err();
        assert_eq!(kind(err), ErrorKind::TimedOut);
    }

    #[test]
    fn closed_ends() {
        let (mut writer, mut reader) = pipe(&fast());
        writer.write_all(b"ab").unwrap();
        writer.close().unwrap();
        writer.close().unwrap();
        assert_eq!(kind(writer.write(b"c").unwrap_err()), ErrorKind::StreamClosed);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"ab");

        let (mut writer, mut reader) = pipe(&fast());
        reader.close();
        assert!(reader.is_closed());
        assert_eq!(kind(reader.read(&mut [0u8; 1]).unwrap_err()), ErrorKind::StreamClosed);
        assert_eq!(kind(writer.write(b"abcd").unwrap_err()), ErrorKind::StreamClosed);
    }

    #[test]
    fn dropped_writer_ends_stream() {
        let (mut writer, mut reader) = pipe(&fast());
        writer.write_all(b"xyz").unwrap();
        drop(writer);
        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        assert_eq!(out, "xyz");
    }

    #[test]
    fn rows_through_compressed_pipe() {
        let config = Config::default()
            .with_block_size(16)
            .with_pipe_capacity(4)
            .with_pipe_timeout(Duration::from_secs(5));
        let columns = parse_columns("id UInt64, tags Array(String), score Nullable(Float64)").unwrap();
        let rows: Vec<Vec<Value>> = (0..50u64)
            .map(|i| {
                vec![
                    Value::UInt64(i),
                    Value::array((0..i % 4).map(|j| format!("t{j}"))),
                    if i % 3 == 0 {
                        Value::Null
                    } else {
                        Value::Float64(i as f64 / 2.0)
                    },
                ]
            })
            .collect();

        let (pipe_writer, pipe_reader) = pipe(&config);
        let producer = {
            let columns = columns.clone();
            let rows = rows.clone();
            let config = config.clone();
            thread::spawn(move || {
                let blocks = BlockWriter::with_config(pipe_writer, &config);
                let mut writer = RowWriter::new(IoTarget::new(blocks), columns);
                writer.write_header().unwrap();
                for row in &rows {
                    writer.write_row(row).unwrap();
                }
                let blocks = writer.into_inner().into_inner();
                let mut pipe_writer = blocks.into_inner().unwrap();
                pipe_writer.close().unwrap();
            })
        };

        let parser = StreamParser::new(BlockReader::new(pipe_reader));
        let reader = RowReader::with_header(parser).unwrap();
        assert_eq!(reader.columns(), columns.as_slice());
        let decoded = reader.collect::<ParseResult<Vec<_>>>().unwrap();
        producer.join().unwrap();
        assert_eq!(decoded, rows);
    }
}
