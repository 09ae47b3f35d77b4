//! Crate-wide error types
//!
//! Every failure this crate can report is classified by exactly one
//! [`ErrorKind`]. The individual layers (type parsing, value conversion,
//! decoding, encoding, block streaming) each define their own error type
//! close to the code that raises it; all of them convert into the
//! umbrella [`Error`] through `From`, so callers that only care about the
//! class of failure can match on [`Error::kind`].
//!
//! [`StreamError`] lives here rather than alongside the block stream
//! because it is shared by both directions of the byte cursor: the
//! parse side reports truncation through it, the write side reports
//! closed sinks through it, and the block and pipe layers report
//! integrity and timeout failures through it.

use std::error::Error as StdError;
use std::fmt::{Display, Formatter};
use std::io;

use crate::conv::error::EncodeError;
use crate::parse::error::ParseError;
use crate::schema::error::TypeError;
use crate::util::hex_of_bytes;
use crate::value::error::ConvError;

/// Classification of every failure the codec can report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Type string could not be parsed
    MalformedType,
    /// Type name was syntactically fine but is not a known type
    UnknownType,
    /// Narrowing conversion or out-of-domain date/time value
    RangeOverflow,
    /// Accessor is not legal for the value at hand
    InvalidConversion,
    /// Input ended in the middle of a value or block
    UnexpectedEndOfStream,
    /// Structurally invalid byte pattern (marker byte, discriminator, block body)
    MalformedEncoding,
    /// Block checksum did not match its contents
    ChecksumFailure,
    /// Operation on a stream after it was closed
    StreamClosed,
    /// Bounded queue did not make progress within its deadline
    TimedOut,
    /// Failure reported by the underlying byte source or sink
    Io,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedType => "malformed type",
            ErrorKind::UnknownType => "unknown type",
            ErrorKind::RangeOverflow => "range overflow",
            ErrorKind::InvalidConversion => "invalid conversion",
            ErrorKind::UnexpectedEndOfStream => "unexpected end of stream",
            ErrorKind::MalformedEncoding => "malformed encoding",
            ErrorKind::ChecksumFailure => "checksum failure",
            ErrorKind::StreamClosed => "stream closed",
            ErrorKind::TimedOut => "timed out",
            ErrorKind::Io => "i/o error",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures of the byte source or sink underneath a cursor.
///
/// This is the error type of [`Target`](crate::conv::target::Target) operations
/// and the lowest layer of [`ParseError`]. When a `StreamError` has to travel
/// through a `std::io::Read` or `std::io::Write` implementation it is boxed
/// into an [`io::Error`] by [`StreamError::into_io`] and recovered on the
/// other side with [`StreamError::from_io`].
#[derive(Debug)]
pub enum StreamError {
    /// Fewer bytes remained in the source than a read required
    UnexpectedEnd { requested: usize, available: usize },
    /// Read or write attempted after the stream was closed
    Closed,
    /// Block checksum read from the header differs from the one computed over the block
    ChecksumMismatch { expected: [u64; 2], actual: [u64; 2] },
    /// Block header carried a compression marker this crate does not know
    UnknownMethod(u8),
    /// Block header carried a known compression marker with no decoder available
    UnsupportedMethod(&'static str),
    /// Block body or header failed a structural check
    CorruptBlock(String),
    /// Bounded queue did not accept or yield a buffer in time
    TimedOut { millis: u128 },
    /// Raw I/O failure from the collaborator's source or sink
    Io(io::Error),
}

impl StreamError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StreamError::UnexpectedEnd { .. } => ErrorKind::UnexpectedEndOfStream,
            StreamError::Closed => ErrorKind::StreamClosed,
            StreamError::ChecksumMismatch { .. } => ErrorKind::ChecksumFailure,
            StreamError::UnknownMethod(_)
            | StreamError::UnsupportedMethod(_)
            | StreamError::CorruptBlock(_) => ErrorKind::MalformedEncoding,
            StreamError::TimedOut { .. } => ErrorKind::TimedOut,
            StreamError::Io(err) => match err.kind() {
                io::ErrorKind::UnexpectedEof => ErrorKind::UnexpectedEndOfStream,
                io::ErrorKind::TimedOut => ErrorKind::TimedOut,
                _ => ErrorKind::Io,
            },
        }
    }

    /// Wraps `self` in an [`io::Error`] whose `io::ErrorKind` mirrors the
    /// classification, so that generic `Read`/`Write` consumers still see a
    /// sensible kind.
    pub fn into_io(self) -> io::Error {
        let kind = match self {
            StreamError::Io(err) => return err,
            StreamError::UnexpectedEnd { .. } => io::ErrorKind::UnexpectedEof,
            StreamError::Closed => io::ErrorKind::BrokenPipe,
            StreamError::TimedOut { .. } => io::ErrorKind::TimedOut,
            _ => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, self)
    }

    /// Recovers a `StreamError` previously boxed by [`into_io`](Self::into_io),
    /// or wraps a foreign `io::Error` as [`StreamError::Io`].
    pub fn from_io(err: io::Error) -> Self {
        if err.get_ref().map_or(false, |inner| inner.is::<StreamError>()) {
            match err.into_inner().map(|inner| inner.downcast::<StreamError>()) {
                Some(Ok(inner)) => *inner,
                // checked by `is` above
                _ => StreamError::CorruptBlock(String::from("lost stream error payload")),
            }
        } else {
            StreamError::Io(err)
        }
    }
}

impl Display for StreamError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamError::UnexpectedEnd {
                requested,
                available,
            } => write!(
                f,
                "unexpected end of stream: needed {requested} bytes but only {available} remained"
            ),
            StreamError::Closed => write!(f, "stream has been closed"),
            StreamError::ChecksumMismatch { expected, actual } => {
                let le = |words: &[u64; 2]| {
                    let mut bytes = words[0].to_le_bytes().to_vec();
                    bytes.extend_from_slice(&words[1].to_le_bytes());
                    hex_of_bytes(bytes)
                };
                write!(
                    f,
                    "block checksum mismatch: header says {} but contents hash to {}",
                    le(expected),
                    le(actual)
                )
            }
            StreamError::UnknownMethod(byte) => {
                write!(f, "unknown block compression marker 0x{byte:02x}")
            }
            StreamError::UnsupportedMethod(name) => {
                write!(f, "block compression method {name} is not supported")
            }
            StreamError::CorruptBlock(reason) => write!(f, "corrupt block: {reason}"),
            StreamError::TimedOut { millis } => write!(f, "timed out after {millis} ms"),
            StreamError::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl StdError for StreamError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            StreamError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for StreamError {
    fn from(err: io::Error) -> Self {
        Self::from_io(err)
    }
}

/// Umbrella error over every layer of the crate.
#[derive(Debug)]
pub enum Error {
    Type(TypeError),
    Conv(ConvError),
    Parse(ParseError),
    Encode(EncodeError),
    Stream(StreamError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Type(err) => err.kind(),
            Error::Conv(err) => err.kind(),
            Error::Parse(err) => err.kind(),
            Error::Encode(err) => err.kind(),
            Error::Stream(err) => err.kind(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Type(err) => Display::fmt(err, f),
            Error::Conv(err) => Display::fmt(err, f),
            Error::Parse(err) => Display::fmt(err, f),
            Error::Encode(err) => Display::fmt(err, f),
            Error::Stream(err) => Display::fmt(err, f),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Type(err) => Some(err),
            Error::Conv(err) => Some(err),
            Error::Parse(err) => Some(err),
            Error::Encode(err) => Some(err),
            Error::Stream(err) => Some(err),
        }
    }
}

macro_rules! impl_from_layer {
    ($($variant:ident($err:ty)),* $(,)?) => {
        $(
            impl From<$err> for Error {
                fn from(err: $err) -> Self {
                    Self::$variant(err)
                }
            }
        )*
    };
}

impl_from_layer!(
    Type(TypeError),
    Conv(ConvError),
    Parse(ParseError),
    Encode(EncodeError),
    Stream(StreamError),
);

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Stream(StreamError::from_io(err))
    }
}

/// Type alias for Result with an error type of [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use super::*;

    fn dummy<T: Send + Sync>() {}

    #[test]
    fn errors_threadsafe() {
        dummy::<Error>();
        dummy::<StreamError>();
    }

    #[test]
    fn stream_error_survives_io_boxing() {
        let boxed = StreamError::ChecksumMismatch {
            expected: [1, 2],
            actual: [3, 4],
        }
        .into_io();
        assert_eq!(boxed.kind(), io::ErrorKind::InvalidData);
        let back = StreamError::from_io(boxed);
        assert_eq!(back.kind(), ErrorKind::ChecksumFailure);
        assert!(matches!(
            back,
            StreamError::ChecksumMismatch {
                expected: [1, 2],
                actual: [3, 4]
            }
        ));
    }

    #[test]
    fn foreign_eof_is_end_of_stream() {
        let err = StreamError::from_io(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert_eq!(err.kind(), ErrorKind::UnexpectedEndOfStream);
        let err: Error = io::Error::from(io::ErrorKind::PermissionDenied).into();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
