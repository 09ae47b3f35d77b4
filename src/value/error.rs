use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::error::ErrorKind;

/// Failures of the value accessors and of value-to-column coercion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConvError {
    /// Value lies outside the range of the requested representation
    RangeOverflow { value: String, target: &'static str },
    /// No conversion from this kind of value to the requested representation
    InvalidConversion { from: String, to: &'static str },
}

impl ConvError {
    pub(crate) fn overflow(value: impl Display, target: &'static str) -> Self {
        Self::RangeOverflow {
            value: value.to_string(),
            target,
        }
    }

    pub(crate) fn invalid(from: impl Into<String>, to: &'static str) -> Self {
        Self::InvalidConversion {
            from: from.into(),
            to,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvError::RangeOverflow { .. } => ErrorKind::RangeOverflow,
            ConvError::InvalidConversion { .. } => ErrorKind::InvalidConversion,
        }
    }
}

impl Display for ConvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvError::RangeOverflow { value, target } => {
                write!(f, "value {value} is out of range for {target}")
            }
            ConvError::InvalidConversion { from, to } => {
                write!(f, "cannot convert {from} to {to}")
            }
        }
    }
}

impl Error for ConvError {}

pub type ConvResult<T> = std::result::Result<T, ConvError>;
