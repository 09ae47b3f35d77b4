//! Type model and wire codec for the ClickHouse RowBinary format
//!
//! # Overview
//!
//! A ClickHouse client exchanges result sets and insert batches with the
//! server as RowBinary: a dense, schema-directed byte layout in which every
//! cell is written back to back with no per-cell tags. Reading it requires
//! knowing each column's type, and writing it requires turning host values
//! into the exact widths and encodings those types prescribe.
//!
//! `rowbin` provides the pieces a client needs for that exchange, bottom-up:
//!
//! * [`schema`] parses ClickHouse type strings such as
//!   `Map(String, Array(Nullable(Decimal(18, 4))))` into a
//!   [`TypeDescriptor`] tree, and prints them back in canonical form.
//! * [`value`] defines the dynamic [`Value`] cell, together with the
//!   conversion matrix that governs which host types can be read out of
//!   which cells and when a conversion overflows.
//! * [`codec`] reads and writes single cells and whole rows against a byte
//!   cursor, driven by a descriptor. Rows can be preceded by a header naming
//!   the columns and their types.
//! * [`block`] frames the byte stream as CityHash128-checksummed blocks,
//!   optionally LZ4-compressed, and [`pipe`] connects a producing thread to
//!   a consuming one through a bounded queue with timeouts.
//!
//! The byte cursors themselves are the [`Parser`] trait on the read side and
//! the [`Target`] trait on the write side. Types whose RowBinary form does
//! not depend on column parameters implement [`Decode`] and [`Encode`]
//! directly against them.
//!
//! # Example
//!
//! ```
//! use rowbin::schema::parse;
//! use rowbin::{codec, SliceParser, Value};
//!
//! let ty = parse("Array(Nullable(Int32))").unwrap();
//! let cell = Value::array([Value::Int32(1), Value::Null]);
//! let mut bytes = Vec::new();
//! codec::encode(&mut bytes, &ty, &cell).unwrap();
//! assert_eq!(bytes, vec![0x02, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01]);
//!
//! let mut p = SliceParser::new(&bytes);
//! assert_eq!(codec::decode(&mut p, &ty).unwrap(), cell);
//! ```

pub mod block;
pub mod codec;
pub mod config;
pub mod conv;
pub mod error;
pub mod parse;
pub mod pipe;
pub mod prelude;
pub mod schema;
pub mod util;
pub mod value;
pub mod varint;

pub use crate::block::{BlockReader, BlockWriter, CompressionMethod};
pub use crate::codec::{Codec, RowReader, RowWriter};
pub use crate::config::Config;
pub use crate::conv::{target::Target, Decode, Encode};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::parse::{ParseResult, Parser, SliceParser, StreamParser};
pub use crate::pipe::{pipe, PipeReader, PipeWriter};
pub use crate::schema::{Field, TypeDescriptor};
pub use crate::value::{Decimal, Uuid, Value};
