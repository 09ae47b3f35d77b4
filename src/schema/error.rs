use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::error::ErrorKind;

/// Failures of the type-string parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeError {
    /// The text is not a well-formed type expression
    Malformed { input: String, reason: String },
    /// The text names no type this crate knows
    Unknown(String),
}

impl TypeError {
    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            input: input.to_owned(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TypeError::Malformed { .. } => ErrorKind::MalformedType,
            TypeError::Unknown(_) => ErrorKind::UnknownType,
        }
    }
}

impl Display for TypeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeError::Malformed { input, reason } => {
                write!(f, "malformed type `{input}`: {reason}")
            }
            TypeError::Unknown(name) => write!(f, "unknown type `{name}`"),
        }
    }
}

impl Error for TypeError {}

pub type TypeResult<T> = std::result::Result<T, TypeError>;
