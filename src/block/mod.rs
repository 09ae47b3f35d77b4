//! Checksummed, compressed block framing
//!
//! With compression enabled, the RowBinary byte stream travels as a sequence
//! of self-describing blocks:
//!
//! | bytes | contents |
//! |---|---|
//! | 16 | CityHash128 v1.0.2 of everything after it, as two little-endian words |
//! | 1 | compression marker (see [`CompressionMethod`]) |
//! | 4 | little-endian size of marker, sizes and payload |
//! | 4 | little-endian uncompressed size |
//! | n | payload |
//!
//! [`BlockWriter`] produces this framing from any [`Write`](std::io::Write)
//! sink and [`BlockReader`] consumes it from any [`Read`](std::io::Read)
//! source, presenting the decompressed bytes through `Read` and `BufRead` so
//! that a [`StreamParser`](crate::parse::StreamParser) can sit on top.

pub mod cityhash;
pub mod method;
pub mod reader;
pub mod writer;

pub use cityhash::city_hash128;
pub use method::CompressionMethod;
pub use reader::BlockReader;
pub use writer::BlockWriter;

/// Width of the checksum preceding each block.
pub const CHECKSUM_SIZE: usize = 16;

/// Width of the marker byte and the two size fields.
pub const HEADER_SIZE: usize = 9;

/// Largest block a reader accepts before treating the header as corrupt.
pub const MAX_COMPRESSED_SIZE: usize = 1 << 30;
