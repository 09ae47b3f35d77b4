use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::error::{ErrorKind, StreamError};
use crate::value::error::ConvError;

/// Failures of the encode half of the row codec.
#[derive(Debug)]
#[non_exhaustive]
pub enum EncodeError {
    /// Value could not be converted to the column's host representation
    Conv(ConvError),
    /// The target rejected the bytes
    Stream(StreamError),
    /// Null supplied for a column that is not `Nullable`
    UnexpectedNull { ty: String },
    /// Value shape does not fit the column type at all
    Shape { ty: String, found: &'static str },
    /// Composite value has the wrong number of members
    Arity {
        ty: String,
        expected: usize,
        actual: usize,
    },
    /// Payload longer than a fixed-width column allows
    TooLong {
        ty: String,
        limit: usize,
        actual: usize,
    },
}

impl EncodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EncodeError::Conv(err) => err.kind(),
            EncodeError::Stream(err) => err.kind(),
            EncodeError::TooLong { .. } => ErrorKind::RangeOverflow,
            EncodeError::UnexpectedNull { .. }
            | EncodeError::Shape { .. }
            | EncodeError::Arity { .. } => ErrorKind::InvalidConversion,
        }
    }
}

impl From<ConvError> for EncodeError {
    fn from(err: ConvError) -> Self {
        Self::Conv(err)
    }
}

impl From<StreamError> for EncodeError {
    fn from(err: StreamError) -> Self {
        Self::Stream(err)
    }
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeError::Conv(err) => write!(f, "cannot encode value: {err}"),
            EncodeError::Stream(err) => write!(f, "cannot write value: {err}"),
            EncodeError::UnexpectedNull { ty } => {
                write!(f, "null value for non-nullable column of type {ty}")
            }
            EncodeError::Shape { ty, found } => {
                write!(f, "{found} value cannot be written as {ty}")
            }
            EncodeError::Arity {
                ty,
                expected,
                actual,
            } => write!(
                f,
                "{ty} expects {expected} members but the value has {actual}"
            ),
            EncodeError::TooLong { ty, limit, actual } => write!(
                f,
                "{actual}-byte value exceeds the {limit}-byte width of {ty}"
            ),
        }
    }
}

impl Error for EncodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EncodeError::Conv(err) => Some(err),
            EncodeError::Stream(err) => Some(err),
            _ => None,
        }
    }
}

pub type EncodeResult<T> = std::result::Result<T, EncodeError>;
