//! Schema-driven transcoding of value cells
//!
//! Where [`Encode`](crate::Encode) and [`Decode`](crate::Decode) cover the
//! types whose wire form is fixed, the functions in this module walk a
//! [`TypeDescriptor`] to read or write one [`Value`] of any column type.
//! Decoding is exact: each call consumes precisely the bytes of one value.
//! Encoding coerces the supplied value through the accessor matrix of
//! [`crate::value::conv`] before writing it, so that for instance an
//! `Int64` value can fill a `UInt8` column when it is in range.
//!
//! [`row`] builds on these to read and write whole rows, optionally
//! preceded by the `RowBinaryWithNamesAndTypes` header.

use chrono_tz::Tz;

use crate::conv::error::EncodeResult;
use crate::conv::target::{ByteCounter, Target};
use crate::parse::{ParseResult, Parser};
use crate::schema::TypeDescriptor;
use crate::value::Value;

mod decode;
mod encode;
pub mod row;

pub use row::{RowReader, RowWriter};

/// Upper bound on speculative allocation for a length read off the wire.
const PREALLOC_LIMIT: usize = 4096;

/// Discriminator standing for a null `Variant` cell.
pub const NULL_DISCRIMINATOR: u8 = 0xff;

/// Session-level settings shared by every cell the codec touches.
///
/// The only setting is the default time zone: decoded `DateTime` and
/// `DateTime64` cells of columns without a declared zone are tagged with it,
/// and wall-clock values written to such columns are read as local times of
/// it. When unset, UTC is used and decoded cells carry no zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Codec {
    timezone: Option<Tz>,
}

impl Codec {
    pub const fn new() -> Self {
        Self { timezone: None }
    }

    #[must_use]
    pub const fn with_timezone(mut self, timezone: Option<Tz>) -> Self {
        self.timezone = timezone;
        self
    }

    pub const fn timezone(&self) -> Option<Tz> {
        self.timezone
    }

    /// Zone in effect for a column that declares `column`.
    fn zone(&self, column: Option<Tz>) -> Tz {
        column.or(self.timezone).unwrap_or(Tz::UTC)
    }

    /// Reads one value of type `ty`.
    ///
    /// # Errors
    ///
    /// Truncated input is reported with kind `UnexpectedEndOfStream`; marker
    /// bytes, booleans and discriminators outside their legal range with kind
    /// `MalformedEncoding`. Nothing decoded before the failure is returned.
    pub fn decode<P: Parser>(&self, p: &mut P, ty: &TypeDescriptor) -> ParseResult<Value> {
        self.decode_value(p, ty)
    }

    /// Writes `value` as a cell of type `ty`, returning the number of bytes
    /// written.
    ///
    /// On error, `buf` may hold the leading bytes of the cell; use
    /// [`RowWriter`] when writes must be all-or-nothing.
    pub fn encode<U: Target>(
        &self,
        buf: &mut U,
        ty: &TypeDescriptor,
        value: &Value,
    ) -> EncodeResult<usize> {
        self.encode_value(buf, ty, value)
    }

    /// Number of bytes [`encode`](Codec::encode) would write, computed
    /// without allocating.
    pub fn encoded_len(&self, ty: &TypeDescriptor, value: &Value) -> EncodeResult<usize> {
        let mut counter: ByteCounter = std::io::sink();
        self.encode_value(&mut counter, ty, value)
    }
}

/// Reads one value of type `ty` with default settings.
pub fn decode<P: Parser>(p: &mut P, ty: &TypeDescriptor) -> ParseResult<Value> {
    Codec::new().decode(p, ty)
}

/// Writes `value` as a cell of type `ty` with default settings.
pub fn encode<U: Target>(buf: &mut U, ty: &TypeDescriptor, value: &Value) -> EncodeResult<usize> {
    Codec::new().encode(buf, ty, value)
}

pub fn encoded_len(ty: &TypeDescriptor, value: &Value) -> EncodeResult<usize> {
    Codec::new().encoded_len(ty, value)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;
    use crate::parse::SliceParser;
    use crate::value::Decimal;
    use crate::{hex, Uuid};

    fn ty(s: &str) -> TypeDescriptor {
        s.parse().unwrap()
    }

    fn to_bytes(t: &str, value: &Value) -> Vec<u8> {
        let mut buf = Vec::new();
        let n = encode(&mut buf, &ty(t), value).unwrap();
        assert_eq!(n, buf.len());
        assert_eq!(encoded_len(&ty(t), value).unwrap(), n);
        buf
    }

    fn from_bytes(t: &str, bytes: &[u8]) -> Value {
        let mut p = SliceParser::new(bytes);
        let value = decode(&mut p, &ty(t)).unwrap();
        assert_eq!(p.remainder(), 0, "{t} left bytes unread");
        value
    }

    fn round_trip(t: &str, value: Value) {
        let bytes = to_bytes(t, &value);
        assert_eq!(from_bytes(t, &bytes), value, "{t}");
    }

    fn dummy<T: Send + Sync>() {}

    #[test]
    fn codec_threadsafe() {
        dummy::<Codec>()
    }

    #[test]
    fn integer_boundaries() {
        round_trip("Int8", Value::Int8(i8::MIN));
        round_trip("Int8", Value::Int8(i8::MAX));
        round_trip("UInt8", Value::UInt8(u8::MAX));
        round_trip("Int16", Value::Int16(i16::MIN));
        round_trip("UInt16", Value::UInt16(u16::MAX));
        round_trip("Int32", Value::Int32(i32::MIN));
        round_trip("UInt32", Value::UInt32(u32::MAX));
        round_trip("Int64", Value::Int64(i64::MIN));
        round_trip("UInt64", Value::UInt64(u64::MAX));
        round_trip("Int128", Value::Int128(i128::MIN));
        round_trip("UInt128", Value::UInt128(u128::MAX));
        assert_eq!(to_bytes("Int32", &Value::Int32(-2)), hex!("feffffff"));
    }

    #[test]
    fn unsigned_64_max_widens_to_big_int() {
        let cell = from_bytes("UInt64", &hex!("ffffffffffffffff"));
        assert_eq!(cell, Value::UInt64(u64::MAX));
        assert_eq!(
            cell.as_big_int().unwrap(),
            Some("18446744073709551615".parse().unwrap())
        );
        assert_eq!(cell.as_i64().unwrap_err().kind(), ErrorKind::RangeOverflow);
    }

    #[test]
    fn wide_integers() {
        let min: num_bigint::BigInt = -(num_bigint::BigInt::from(1u8) << 255usize);
        round_trip("Int256", Value::Int256(min.clone()));
        round_trip("Int256", Value::Int256(-min.clone() - 1));
        round_trip("UInt256", Value::UInt256((num_bigint::BigUint::from(1u8) << 256usize) - 1u8));
        assert_eq!(to_bytes("Int256", &Value::Int8(-1)), vec![0xff; 32]);
        let mut one = vec![0u8; 32];
        one[0] = 1;
        assert_eq!(to_bytes("UInt256", &Value::UInt8(1)), one);
        let err = encode(&mut Vec::new(), &ty("Int256"), &Value::Int256(min - 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RangeOverflow);
        let err = encode(&mut Vec::new(), &ty("UInt256"), &Value::Int8(-1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RangeOverflow);
    }

    #[test]
    fn narrowing_on_encode() {
        assert_eq!(to_bytes("UInt8", &Value::Int64(200)), hex!("c8"));
        let err = encode(&mut Vec::new(), &ty("UInt8"), &Value::Int64(256)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RangeOverflow);
        let err = encode(&mut Vec::new(), &ty("UInt32"), &Value::Int8(-1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RangeOverflow);
    }

    #[test]
    fn floats_and_booleans() {
        round_trip("Float32", Value::Float32(1.5));
        round_trip("Float64", Value::Float64(-0.25));
        assert_eq!(to_bytes("Float64", &Value::Float64(1.0)), hex!("000000000000f03f"));
        round_trip("Bool", Value::Bool(true));
        let mut p = SliceParser::new(&[2u8]);
        let err = decode(&mut p, &ty("Bool")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedEncoding);
    }

    #[test]
    fn decimals_by_width() {
        round_trip("Decimal(9, 2)", Value::Decimal(Decimal::new(-12345, 2)));
        round_trip("Decimal(18, 4)", Value::Decimal(Decimal::new(i64::MAX / 10, 4)));
        round_trip("Decimal(38, 10)", Value::Decimal(Decimal::new(1, 10)));
        round_trip(
            "Decimal(76, 0)",
            Value::Decimal("-9999999999999999999999999999999999999999".parse().unwrap()),
        );
        assert_eq!(
            to_bytes("Decimal(9, 2)", &Value::Decimal("1.239".parse().unwrap())),
            hex!("7b000000")
        );
        assert_eq!(to_bytes("Decimal(9, 2)", &Value::Int8(-1)), hex!("9cffffff"));
        let err = encode(
            &mut Vec::new(),
            &ty("Decimal(3, 2)"),
            &Value::Decimal("10.00".parse().unwrap()),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RangeOverflow);
    }

    #[test]
    fn strings() {
        assert_eq!(to_bytes("String", &Value::from("ab")), hex!("026162"));
        round_trip("String", Value::String(vec![0xff, 0x00]));
        assert_eq!(to_bytes("String", &Value::Int32(-5)), hex!("022d35"));
        assert_eq!(to_bytes("FixedString(4)", &Value::from("ab")), hex!("61620000"));
        round_trip("FixedString(2)", Value::from("xy"));
        let err = encode(&mut Vec::new(), &ty("FixedString(1)"), &Value::from("ab")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RangeOverflow);
    }

    #[test]
    fn dates_and_times() {
        round_trip("Date", Value::Date(19_000));
        round_trip("Date32", Value::Date(-25_000));
        assert_eq!(to_bytes("Date", &Value::from("1970-01-02")), hex!("0100"));
        let err = encode(&mut Vec::new(), &ty("Date"), &Value::Date(-1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RangeOverflow);

        round_trip(
            "DateTime",
            Value::DateTime {
                seconds: 1_700_000_000,
                timezone: None,
            },
        );
        round_trip(
            "DateTime('Asia/Tokyo')",
            Value::DateTime {
                seconds: 0,
                timezone: Some(Tz::Asia__Tokyo),
            },
        );
        assert_eq!(to_bytes("DateTime", &Value::Int64(1)), hex!("01000000"));
        assert_eq!(
            to_bytes("DateTime('Asia/Tokyo')", &Value::from("1970-01-01 09:00:01")),
            hex!("01000000")
        );

        round_trip(
            "DateTime64(3)",
            Value::DateTime64 {
                ticks: -1,
                scale: 3,
                timezone: None,
            },
        );
        let nanos = Value::DateTime64 {
            ticks: 1_500_000_001,
            scale: 9,
            timezone: None,
        };
        assert_eq!(to_bytes("DateTime64(3)", &nanos), hex!("dc05000000000000"));
    }

    #[test]
    fn codec_zone_tags_undeclared_columns() {
        let codec = Codec::new().with_timezone(Some(Tz::Europe__Berlin));
        let mut p = SliceParser::new(&[0u8; 4]);
        assert_eq!(
            codec.decode(&mut p, &ty("DateTime")).unwrap(),
            Value::DateTime {
                seconds: 0,
                timezone: Some(Tz::Europe__Berlin)
            }
        );
        let mut p = SliceParser::new(&[0u8; 4]);
        assert_eq!(
            codec.decode(&mut p, &ty("DateTime('UTC')")).unwrap(),
            Value::DateTime {
                seconds: 0,
                timezone: Some(Tz::UTC)
            }
        );
        let mut buf = Vec::new();
        codec
            .encode(&mut buf, &ty("DateTime"), &Value::from("1970-01-01 01:00:00"))
            .unwrap();
        assert_eq!(buf, hex!("00000000"));
    }

    #[test]
    fn addresses_and_uuids() {
        let v4: std::net::Ipv4Addr = "1.2.3.4".parse().unwrap();
        assert_eq!(to_bytes("IPv4", &Value::IPv4(v4)), hex!("04030201"));
        round_trip("IPv4", Value::IPv4(v4));
        let v6: std::net::Ipv6Addr = "2001:db8::1".parse().unwrap();
        assert_eq!(
            to_bytes("IPv6", &Value::IPv6(v6)),
            hex!("20010db8000000000000000000000001")
        );
        round_trip("IPv6", Value::IPv6(v6));
        round_trip("UUID", Value::Uuid(Uuid::new(1, 2)));
        assert_eq!(
            to_bytes("UUID", &Value::from("00000000-0000-0001-0000-000000000002")),
            hex!("0100000000000000 0200000000000000")
        );
    }

    #[test]
    fn enums() {
        let t = "Enum8('a' = 1, 'b' = -2)";
        assert_eq!(
            from_bytes(t, &hex!("fe")),
            Value::Enum {
                code: -2,
                name: Some("b".into())
            }
        );
        assert_eq!(
            from_bytes(t, &hex!("05")),
            Value::Enum {
                code: 5,
                name: None
            }
        );
        assert_eq!(to_bytes(t, &Value::from("a")), hex!("01"));
        assert_eq!(to_bytes(t, &Value::Int32(-2)), hex!("fe"));
        let err = encode(&mut Vec::new(), &ty(t), &Value::from("c")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConversion);
        round_trip(
            "Enum16('big' = 1000)",
            Value::Enum {
                code: 1000,
                name: Some("big".into()),
            },
        );
    }

    #[test]
    fn nullable_markers() {
        assert_eq!(to_bytes("Nullable(Int8)", &Value::Null), hex!("01"));
        assert_eq!(to_bytes("Nullable(Int8)", &Value::Int8(7)), hex!("0007"));
        round_trip("Nullable(String)", Value::Null);
        let mut p = SliceParser::new(&[2u8, 0]);
        let err = decode(&mut p, &ty("Nullable(Int8)")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedEncoding);
        let err = encode(&mut Vec::new(), &ty("Int8"), &Value::Null).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConversion);
    }

    #[test]
    fn nothing_has_no_payload() {
        assert_eq!(from_bytes("Nullable(Nothing)", &hex!("01")), Value::Null);
        let mut p = SliceParser::new(&[0u8]);
        let err = decode(&mut p, &ty("Nullable(Nothing)")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedEncoding);
        assert_eq!(from_bytes("Nothing", &[]), Value::Null);
    }

    #[test]
    fn empty_elements_need_a_plausible_count() {
        assert_eq!(
            from_bytes("Array(Nothing)", &hex!("02")),
            Value::Array(vec![Value::Null, Value::Null])
        );
        let cases: &[(&str, &[u8])] = &[
            ("Array(Tuple(Nothing))", &[0x80, 0xe1, 0xeb, 0x17]),
            ("Array(Nothing)", &[0xff, 0xff, 0xff, 0xff, 0x0f]),
            ("Array(LowCardinality(Nothing))", &[0x80, 0xe1, 0xeb, 0x17]),
            ("Map(Nothing, Tuple(Nothing))", &[0x80, 0xe1, 0xeb, 0x17]),
            ("Nested(a Nothing, b UInt8)", &[0x80, 0xe1, 0xeb, 0x17]),
        ];
        for &(t, bytes) in cases {
            let mut p = SliceParser::new(bytes);
            let err = decode(&mut p, &ty(t)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedEncoding, "{t}");
        }
    }

    #[test]
    fn arrays_of_nullables() {
        let value = Value::array([Some(1i32), None, Some(3), None, Some(5)]);
        let bytes = to_bytes("Array(Nullable(Int32))", &value);
        assert_eq!(
            bytes,
            hex!("05 0001000000 01 0003000000 01 0005000000")
        );
        assert_eq!(from_bytes("Array(Nullable(Int32))", &bytes), value);
        round_trip("Array(String)", Value::Array(vec![]));
    }

    #[test]
    fn maps_keep_pair_order() {
        let value = Value::map([(2u8, 2u8), (1, 1)]);
        let bytes = to_bytes("Map(UInt8, UInt8)", &value);
        assert_eq!(bytes, hex!("02 0202 0101"));
        assert_eq!(from_bytes("Map(UInt8, UInt8)", &bytes), value);
    }

    #[test]
    fn tuples() {
        let t = "Tuple(a Int8, b String)";
        let value = Value::tuple([Value::Int8(1), Value::from("x")]);
        assert_eq!(to_bytes(t, &value), hex!("01 0178"));
        round_trip(t, value);
        let err = encode(&mut Vec::new(), &ty(t), &Value::tuple([1i8])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConversion);
    }

    #[test]
    fn nested_is_columnar() {
        let t = "Nested(n1 UInt8, n2 Nullable(String), n3 Int16)";
        let value = Value::nested([
            ("n1", vec![Value::UInt8(1)]),
            ("n2", vec![Value::from("2")]),
            ("n3", vec![Value::Int16(3)]),
        ]);
        let bytes = to_bytes(t, &value);
        assert_eq!(bytes, hex!("01 01 000132 0300"));
        assert_eq!(from_bytes(t, &bytes), value);

        let two = Value::nested([
            ("n1", vec![Value::UInt8(1), Value::UInt8(2)]),
            ("n2", vec![Value::Null, Value::from("b")]),
            ("n3", vec![Value::Int16(3), Value::Int16(4)]),
        ]);
        assert_eq!(to_bytes(t, &two), hex!("02 0102 01000162 03000400"));
        round_trip(t, two);

        let ragged = Value::nested([
            ("n1", vec![Value::UInt8(1)]),
            ("n2", vec![]),
            ("n3", vec![Value::Int16(3)]),
        ]);
        let err = encode(&mut Vec::new(), &ty(t), &ragged).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConversion);
    }

    #[test]
    fn geo_types_expand() {
        let point = Value::tuple([1.0f64, 2.0]);
        assert_eq!(
            to_bytes("Point", &point),
            hex!("000000000000f03f 0000000000000040")
        );
        round_trip("Point", point.clone());
        round_trip("Ring", Value::array([point.clone(), point.clone()]));
        round_trip("MultiPolygon", Value::array([Value::array([Value::array([point])])]));
    }

    #[test]
    fn transparent_wrappers() {
        assert_eq!(to_bytes("LowCardinality(String)", &Value::from("a")), hex!("0161"));
        assert_eq!(
            to_bytes("LowCardinality(Nullable(String))", &Value::Null),
            hex!("01")
        );
        round_trip("SimpleAggregateFunction(sum, UInt64)", Value::UInt64(9));
        assert_eq!(from_bytes("IntervalDay", &hex!("0200000000000000")), Value::Int64(2));
    }

    #[test]
    fn variants_discriminate_by_sorted_name() {
        // wire order: Array(UInt8), String, UInt64
        let t = "Variant(UInt64, String, Array(UInt8))";
        assert_eq!(to_bytes(t, &Value::Null), hex!("ff"));
        assert_eq!(to_bytes(t, &Value::UInt64(1)), hex!("02 0100000000000000"));
        assert_eq!(
            from_bytes(t, &hex!("01 0161")),
            Value::Variant {
                alternative: 1,
                value: Box::new(Value::from("a"))
            }
        );
        round_trip(
            t,
            Value::Variant {
                alternative: 2,
                value: Box::new(Value::array([1u8])),
            },
        );
        let mut p = SliceParser::new(&[3u8]);
        let err = decode(&mut p, &ty(t)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedEncoding);
    }

    #[test]
    fn truncation_is_end_of_stream() {
        let cases: &[(&str, &[u8])] = &[
            ("Int32", &[1, 2]),
            ("String", &[5, b'a']),
            ("Array(Int8)", &[3, 1]),
            ("Nullable(Int64)", &[0]),
            ("Map(UInt8, String)", &[1, 1]),
        ];
        for &(t, bytes) in cases {
            let mut p = SliceParser::new(bytes);
            let err = decode(&mut p, &ty(t)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnexpectedEndOfStream, "{t}");
        }
    }

    #[test]
    fn shape_mismatch() {
        let err = encode(&mut Vec::new(), &ty("Array(Int8)"), &Value::Int8(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConversion);
        let err = encode(&mut Vec::new(), &ty("Int8"), &Value::array([1i8])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConversion);
    }
}
