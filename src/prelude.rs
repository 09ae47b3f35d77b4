//! Glob-importable names for code that reads and writes rows
//!
//! ```
//! use rowbin::prelude::*;
//!
//! let columns = parse_columns("id UInt32").unwrap();
//! let mut writer = RowWriter::new(Vec::new(), columns);
//! writer.write_row(&[Value::UInt32(7)]).unwrap();
//! assert_eq!(writer.into_inner(), vec![7, 0, 0, 0]);
//! ```

pub use crate::block::{BlockReader, BlockWriter, CompressionMethod};
pub use crate::codec::{Codec, RowReader, RowWriter};
pub use crate::config::Config;
pub use crate::conv::target::{IoTarget, Target};
pub use crate::conv::{Decode, Encode};
pub use crate::error::{Error, ErrorKind};
pub use crate::parse::{Parser, SliceParser, StreamParser};
pub use crate::pipe::{pipe, PipeReader, PipeWriter};
pub use crate::schema::{parse, parse_columns, Field, TypeDescriptor};
pub use crate::value::{Decimal, Uuid, Value};
