//! Row-at-a-time reading and writing
//!
//! A row is one value per column, in column order, with nothing between
//! them. The `RowBinaryWithNamesAndTypes` variant of the format precedes the
//! rows with a header: a LEB128 column count, that many names, then that many
//! type strings, each a length-prefixed string.

use crate::conv::error::{EncodeError, EncodeResult};
use crate::conv::target::Target;
use crate::parse::{ParseResult, Parser, TokenError};
use crate::schema::{Field, TypeDescriptor};
use crate::value::Value;
use crate::varint::write_varint;
use crate::Encode;

use super::Codec;

fn header_text<P: Parser>(p: &mut P) -> ParseResult<String> {
    let bytes = p.take_string()?;
    String::from_utf8(bytes).map_err(|err| TokenError::from(err).into())
}

/// Pulls rows of a known column layout out of a [`Parser`].
#[derive(Debug)]
pub struct RowReader<P> {
    parser: P,
    columns: Vec<Field>,
    codec: Codec,
    rows: usize,
    failed: bool,
}

impl<P: Parser> RowReader<P> {
    pub fn new(parser: P, columns: Vec<Field>) -> Self {
        Self {
            parser,
            columns,
            codec: Codec::new(),
            rows: 0,
            failed: false,
        }
    }

    /// Reads the `RowBinaryWithNamesAndTypes` header from `parser` and
    /// returns a reader for the columns it declares.
    ///
    /// An input with no bytes at all has no columns and no rows.
    pub fn with_header(mut parser: P) -> ParseResult<Self> {
        if parser.is_exhausted()? {
            return Ok(Self::new(parser, Vec::new()));
        }
        let count = parser.take_length()?;
        let mut names = Vec::with_capacity(count.min(super::PREALLOC_LIMIT));
        for _ in 0..count {
            names.push(header_text(&mut parser)?);
        }
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let ty: TypeDescriptor = header_text(&mut parser)?.parse()?;
            columns.push(Field::new(name, ty));
        }
        tracing::trace!(columns = columns.len(), "read row header");
        Ok(Self::new(parser, columns))
    }

    #[must_use]
    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    pub fn columns(&self) -> &[Field] {
        &self.columns
    }

    /// Number of rows returned so far.
    pub fn rows_read(&self) -> usize {
        self.rows
    }

    /// Decodes the next row, or returns `None` when the input ends cleanly at
    /// a row boundary.
    ///
    /// # Errors
    ///
    /// Input that ends partway through a row is an `UnexpectedEndOfStream`.
    pub fn next_row(&mut self) -> ParseResult<Option<Vec<Value>>> {
        if self.parser.is_exhausted()? {
            return Ok(None);
        }
        let mut row = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            row.push(self.codec.decode(&mut self.parser, &column.ty)?);
        }
        self.rows += 1;
        Ok(Some(row))
    }

    pub fn get_mut(&mut self) -> &mut P {
        &mut self.parser
    }

    pub fn into_inner(self) -> P {
        self.parser
    }

    /// Releases the parser once every row has been read.
    ///
    /// With the feature `check_complete_parse` enabled, input left over
    /// is reported as [`TokenError::UnconsumedInput`].
    #[cfg_attr(not(feature = "check_complete_parse"), allow(unused_mut))]
    pub fn finish(mut self) -> ParseResult<P> {
        cfg_if::cfg_if! {
            if #[cfg(feature = "check_complete_parse")] {
                if !self.parser.is_exhausted()? {
                    let offset = self.parser.offset();
                    return Err(TokenError::UnconsumedInput { offset }.into());
                }
            }
        }
        Ok(self.parser)
    }
}

/// Yields rows until the input ends or a row fails to decode; after the
/// first error the iterator is exhausted.
impl<P: Parser> Iterator for RowReader<P> {
    type Item = ParseResult<Vec<Value>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let ret = self.next_row().transpose();
        if matches!(ret, Some(Err(_))) {
            self.failed = true;
        }
        ret
    }
}

/// Appends rows of a known column layout to a [`Target`].
///
/// Each row is encoded into a scratch buffer first, so a row that fails to
/// encode leaves the target untouched.
#[derive(Debug)]
pub struct RowWriter<U> {
    target: U,
    columns: Vec<Field>,
    codec: Codec,
    scratch: Vec<u8>,
    rows: usize,
}

impl<U: Target> RowWriter<U> {
    pub fn new(target: U, columns: Vec<Field>) -> Self {
        Self {
            target,
            columns,
            codec: Codec::new(),
            scratch: Vec::new(),
            rows: 0,
        }
    }

    #[must_use]
    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    pub fn columns(&self) -> &[Field] {
        &self.columns
    }

    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Writes the `RowBinaryWithNamesAndTypes` header for the columns.
    pub fn write_header(&mut self) -> EncodeResult<usize> {
        let mut written = write_varint(&mut self.target, self.columns.len() as u64)?;
        for column in &self.columns {
            written += column.name.write_to(&mut self.target)?;
        }
        for column in &self.columns {
            written += column.ty.to_string().write_to(&mut self.target)?;
        }
        Ok(written)
    }

    /// Encodes one row, returning the number of bytes appended.
    pub fn write_row(&mut self, row: &[Value]) -> EncodeResult<usize> {
        if row.len() != self.columns.len() {
            return Err(EncodeError::Arity {
                ty: String::from("row"),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.scratch.clear();
        for (column, value) in self.columns.iter().zip(row) {
            self.codec.encode(&mut self.scratch, &column.ty, value)?;
        }
        let written = self.target.push_all(&self.scratch)?;
        self.rows += 1;
        Ok(written)
    }

    pub fn get_mut(&mut self) -> &mut U {
        &mut self.target
    }

    pub fn into_inner(self) -> U {
        self.target
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;
    use crate::hex;
    use crate::parse::{SliceParser, StreamParser};
    use crate::schema::parse_columns;

    fn columns() -> Vec<Field> {
        parse_columns("id UInt32, name Nullable(String)").unwrap()
    }

    #[test]
    fn header_round_trip() {
        let mut writer = RowWriter::new(Vec::new(), columns());
        writer.write_header().unwrap();
        writer
            .write_row(&[Value::UInt32(1), Value::from("a")])
            .unwrap();
        writer.write_row(&[Value::UInt32(2), Value::Null]).unwrap();
        assert_eq!(writer.rows_written(), 2);
        let bytes = writer.into_inner();
        assert_eq!(
            &bytes[..33],
            hex!("02 02 6964 04 6e616d65 06 55496e743332 10 4e756c6c61626c6528537472696e6729")
                .as_slice()
        );

        let mut reader = RowReader::with_header(SliceParser::new(&bytes)).unwrap();
        assert_eq!(reader.columns(), columns().as_slice());
        let rows: Vec<_> = reader.by_ref().collect::<ParseResult<_>>().unwrap();
        assert_eq!(
            rows,
            vec![
                vec![Value::UInt32(1), Value::from("a")],
                vec![Value::UInt32(2), Value::Null],
            ]
        );
        assert_eq!(reader.rows_read(), 2);
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn empty_input_has_no_rows() {
        let mut reader = RowReader::with_header(SliceParser::new(&[])).unwrap();
        assert!(reader.columns().is_empty());
        assert!(reader.next_row().unwrap().is_none());
    }

    #[test]
    fn partial_row_is_end_of_stream() {
        let bytes = hex!("01000000 00 02 61");
        let mut reader = RowReader::new(StreamParser::new(&bytes[..]), columns());
        let err = reader.next().unwrap().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEndOfStream);
        assert!(reader.next().is_none());
    }

    #[test]
    fn failed_rows_leave_target_untouched() {
        let mut writer = RowWriter::new(Vec::new(), columns());
        let err = writer
            .write_row(&[Value::UInt32(1), Value::Int8(1), Value::Null])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConversion);
        let err = writer
            .write_row(&[Value::Int64(-1), Value::from("x")])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RangeOverflow);
        assert_eq!(writer.rows_written(), 0);
        assert!(writer.into_inner().is_empty());
    }

    #[test]
    fn bad_header_type() {
        let bytes = hex!("01 0161 04 4e6f7065");
        let err = RowReader::with_header(SliceParser::new(&bytes)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownType);
    }
}
