//! Value cells
//!
//! A [`Value`] is one decoded (or to-be-encoded) unit of data. Its variants
//! mirror the shapes of [`TypeDescriptor`](crate::schema::TypeDescriptor)
//! rather than the host types a caller wants; conversion to host types goes
//! through the `as_*` accessors defined in [`conv`], which enforce the
//! widening/narrowing rules uniformly for every variant.
//!
//! Some column types share a variant:
//!
//! * `String` and `FixedString(N)` cells are both [`Value::String`], holding
//!   raw bytes that need not be UTF-8
//! * `Date` and `Date32` cells are both [`Value::Date`]
//! * `Interval*` cells are [`Value::Int64`]
//! * geo cells are the tuples and arrays they are defined as
//! * `LowCardinality(T)` and `SimpleAggregateFunction(f, T)` cells are `T` cells
//!
//! Values are plain data with structural equality; nothing in this module
//! mutates a value after construction.

use std::fmt::{Display, Formatter};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use num_bigint::{BigInt, BigUint};

pub mod conv;
pub mod decimal;
pub mod error;
pub mod uuid;

pub use decimal::Decimal;
pub use error::{ConvError, ConvResult};
pub use uuid::Uuid;

use crate::schema::enums::write_quoted;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Int128(i128),
    Int256(BigInt),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    UInt128(u128),
    UInt256(BigUint),
    Float32(f32),
    Float64(f64),
    Decimal(Decimal),
    String(Vec<u8>),
    /// Days since 1970-01-01
    Date(i32),
    /// Whole seconds since the epoch
    DateTime {
        seconds: i64,
        timezone: Option<Tz>,
    },
    /// Ticks of `10^-scale` seconds since the epoch
    DateTime64 {
        ticks: i64,
        scale: u8,
        timezone: Option<Tz>,
    },
    Uuid(Uuid),
    IPv4(Ipv4Addr),
    IPv6(Ipv6Addr),
    /// Stored code and, when the column's table knows it, its name
    Enum {
        code: i16,
        name: Option<String>,
    },
    Array(Vec<Value>),
    Tuple(Vec<Value>),
    /// Pairs in wire order; duplicate keys are kept
    Map(Vec<(Value, Value)>),
    /// Named columns of equal length
    Nested(Vec<(String, Vec<Value>)>),
    /// Payload of a `Variant` column, tagged with the index of its
    /// alternative in declared order
    Variant {
        alternative: usize,
        value: Box<Value>,
    },
}

impl Value {
    pub fn array<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }

    pub fn tuple<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }

    pub fn map<K: Into<Value>, V: Into<Value>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Value::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn nested<S: Into<String>>(columns: impl IntoIterator<Item = (S, Vec<Value>)>) -> Self {
        Value::Nested(
            columns
                .into_iter()
                .map(|(name, values)| (name.into(), values))
                .collect(),
        )
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Looks through `Variant` tags to the payload.
    pub fn inner(&self) -> &Value {
        match self {
            Value::Variant { value, .. } => value.inner(),
            other => other,
        }
    }

    /// Name of the variant, used in diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int8(_) => "Int8",
            Value::Int16(_) => "Int16",
            Value::Int32(_) => "Int32",
            Value::Int64(_) => "Int64",
            Value::Int128(_) => "Int128",
            Value::Int256(_) => "Int256",
            Value::UInt8(_) => "UInt8",
            Value::UInt16(_) => "UInt16",
            Value::UInt32(_) => "UInt32",
            Value::UInt64(_) => "UInt64",
            Value::UInt128(_) => "UInt128",
            Value::UInt256(_) => "UInt256",
            Value::Float32(_) => "Float32",
            Value::Float64(_) => "Float64",
            Value::Decimal(_) => "Decimal",
            Value::String(_) => "String",
            Value::Date(_) => "Date",
            Value::DateTime { .. } => "DateTime",
            Value::DateTime64 { .. } => "DateTime64",
            Value::Uuid(_) => "UUID",
            Value::IPv4(_) => "IPv4",
            Value::IPv6(_) => "IPv6",
            Value::Enum { .. } => "Enum",
            Value::Array(_) => "Array",
            Value::Tuple(_) => "Tuple",
            Value::Map(_) => "Map",
            Value::Nested(_) => "Nested",
            Value::Variant { .. } => "Variant",
        }
    }

    /// Short description for error messages: the kind plus, for scalars,
    /// the rendered value.
    pub(crate) fn describe(&self) -> String {
        match self {
            Value::Array(_)
            | Value::Tuple(_)
            | Value::Map(_)
            | Value::Nested(_)
            | Value::Null => self.kind_name().to_owned(),
            Value::Variant { value, .. } => value.describe(),
            Value::String(bytes) if bytes.len() > 64 => {
                format!("String of {} bytes", bytes.len())
            }
            scalar => format!("{} {scalar}", scalar.kind_name()),
        }
    }

    /// Renders the value as an element of a composite: strings and
    /// temporal values are single-quoted.
    fn fmt_element(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.inner() {
            Value::String(bytes) => write_quoted(f, &String::from_utf8_lossy(bytes)),
            v @ (Value::Date(_)
            | Value::DateTime { .. }
            | Value::DateTime64 { .. }
            | Value::Uuid(_)
            | Value::IPv4(_)
            | Value::IPv6(_)) => write_quoted(f, &v.to_string()),
            Value::Enum {
                name: Some(name), ..
            } => write_quoted(f, name),
            other => Display::fmt(other, f),
        }
    }
}

fn write_elements<'a>(
    f: &mut Formatter<'_>,
    open: &str,
    items: impl IntoIterator<Item = &'a Value>,
    close: &str,
) -> std::fmt::Result {
    f.write_str(open)?;
    for (ix, item) in items.into_iter().enumerate() {
        if ix > 0 {
            f.write_str(",")?;
        }
        item.fmt_element(f)?;
    }
    f.write_str(close)
}

/// Text form close to the server's `TabSeparated` output.
impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(v) => Display::fmt(v, f),
            Value::Int8(v) => Display::fmt(v, f),
            Value::Int16(v) => Display::fmt(v, f),
            Value::Int32(v) => Display::fmt(v, f),
            Value::Int64(v) => Display::fmt(v, f),
            Value::Int128(v) => Display::fmt(v, f),
            Value::Int256(v) => Display::fmt(v, f),
            Value::UInt8(v) => Display::fmt(v, f),
            Value::UInt16(v) => Display::fmt(v, f),
            Value::UInt32(v) => Display::fmt(v, f),
            Value::UInt64(v) => Display::fmt(v, f),
            Value::UInt128(v) => Display::fmt(v, f),
            Value::UInt256(v) => Display::fmt(v, f),
            Value::Float32(v) => Display::fmt(v, f),
            Value::Float64(v) => Display::fmt(v, f),
            Value::Decimal(v) => Display::fmt(v, f),
            Value::String(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
            Value::Date(days) => match conv::date_of_days(i64::from(*days)) {
                Some(date) => write!(f, "{}", date.format("%Y-%m-%d")),
                None => Display::fmt(days, f),
            },
            Value::DateTime { seconds, timezone } => {
                match conv::zoned(*seconds, 0, timezone.unwrap_or(Tz::UTC)) {
                    Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
                    None => Display::fmt(seconds, f),
                }
            }
            Value::DateTime64 {
                ticks,
                scale,
                timezone,
            } => {
                let dt = conv::split_ticks(*ticks, *scale)
                    .and_then(|(secs, nanos)| conv::zoned(secs, nanos, timezone.unwrap_or(Tz::UTC)));
                match dt {
                    Some(dt) if *scale == 0 => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
                    Some(dt) => {
                        let frac = format!("{:09}", dt.timestamp_subsec_nanos());
                        write!(
                            f,
                            "{}.{}",
                            dt.format("%Y-%m-%d %H:%M:%S"),
                            &frac[..usize::from(*scale)]
                        )
                    }
                    None => Display::fmt(ticks, f),
                }
            }
            Value::Uuid(v) => Display::fmt(v, f),
            Value::IPv4(v) => Display::fmt(v, f),
            Value::IPv6(v) => Display::fmt(v, f),
            Value::Enum {
                name: Some(name), ..
            } => f.write_str(name),
            Value::Enum { code, name: None } => Display::fmt(code, f),
            Value::Array(items) => write_elements(f, "[", items, "]"),
            Value::Tuple(items) => write_elements(f, "(", items, ")"),
            Value::Map(pairs) => {
                f.write_str("{")?;
                for (ix, (key, value)) in pairs.iter().enumerate() {
                    if ix > 0 {
                        f.write_str(",")?;
                    }
                    key.fmt_element(f)?;
                    f.write_str(":")?;
                    value.fmt_element(f)?;
                }
                f.write_str("}")
            }
            Value::Nested(columns) => {
                f.write_str("(")?;
                for (ix, (_, values)) in columns.iter().enumerate() {
                    if ix > 0 {
                        f.write_str(",")?;
                    }
                    write_elements(f, "[", values, "]")?;
                }
                f.write_str(")")
            }
            Value::Variant { value, .. } => Display::fmt(value, f),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

impl_from_scalar!(
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    i128 => Int128,
    BigInt => Int256,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    u128 => UInt128,
    BigUint => UInt256,
    f32 => Float32,
    f64 => Float64,
    Decimal => Decimal,
    Uuid => Uuid,
    Ipv4Addr => IPv4,
    Ipv6Addr => IPv6,
);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value.into_bytes())
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::String(value.to_vec())
    }
}

/// Raw bytes for a `String` or `FixedString` column; use [`Value::array`]
/// for an `Array(UInt8)` cell.
impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::String(value)
    }
}

impl From<IpAddr> for Value {
    fn from(value: IpAddr) -> Self {
        match value {
            IpAddr::V4(addr) => Value::IPv4(addr),
            IpAddr::V6(addr) => Value::IPv6(addr),
        }
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        // every chrono date lies within +/- 2^31 days of the epoch
        Value::Date(conv::days_of_date(value) as i32)
    }
}

fn instant_value(seconds: i64, nanos: u32, timezone: Option<Tz>) -> Value {
    match seconds
        .checked_mul(1_000_000_000)
        .and_then(|n| n.checked_add(i64::from(nanos)))
    {
        Some(ticks) => Value::DateTime64 {
            ticks,
            scale: 9,
            timezone,
        },
        None => Value::DateTime64 {
            ticks: seconds.saturating_mul(1_000_000) + i64::from(nanos / 1_000),
            scale: 6,
            timezone,
        },
    }
}

/// Nanosecond `DateTime64` without a zone, or microseconds outside the
/// nanosecond range.
impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        let utc = value.and_utc();
        instant_value(utc.timestamp(), utc.timestamp_subsec_nanos(), None)
    }
}

impl From<DateTime<Tz>> for Value {
    fn from(value: DateTime<Tz>) -> Self {
        instant_value(
            value.timestamp(),
            value.timestamp_subsec_nanos(),
            Some(value.timezone()),
        )
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        instant_value(value.timestamp(), value.timestamp_subsec_nanos(), Some(Tz::UTC))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::array(iter)
    }
}
