//! Host conversions of [`Value`] cells
//!
//! Every accessor follows the same rules, whatever the variant:
//!
//! * widening never fails; integer to float may round above 2^24 (`f32`)
//!   or 2^53 (`f64`)
//! * narrowing fails with [`ConvError::RangeOverflow`] instead of truncating
//! * floats and decimals convert to integers only when they have no
//!   fractional part ([`ConvError::InvalidConversion`] otherwise)
//! * `as_bool` accepts only the numeric values 0 and 1
//! * address accessors reinterpret integers of matching width only
//!   (32-bit for IPv4, 128-bit for IPv6), in network byte order
//!
//! Null handling differs by accessor and is part of each contract:
//!
//! | accessor | on `Null` |
//! |---|---|
//! | `as_bool` | `false` |
//! | `as_i8` ... `as_u128`, `as_f32`, `as_f64` | `0` |
//! | `as_string` | `""` |
//! | every other accessor | `Ok(None)` |
//!
//! `Variant` cells are transparent: accessors look at their payload.

use std::net::{Ipv4Addr, Ipv6Addr};

use chrono::{DateTime, Datelike, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use num_bigint::BigInt;

use super::decimal::Decimal;
use super::error::{ConvError, ConvResult};
use super::uuid::Uuid;
use super::Value;

/// CE day number of 1970-01-01.
const UNIX_EPOCH_DAY_CE: i64 = 719_163;
const NANOS_PER_SECOND: i64 = 1_000_000_000;
pub(crate) const SECONDS_PER_DAY: i64 = 86_400;
/// Largest `DateTime64` scale.
const MAX_TICK_SCALE: u8 = 9;

pub(crate) fn date_of_days(days: i64) -> Option<NaiveDate> {
    let ce = i32::try_from(days.checked_add(UNIX_EPOCH_DAY_CE)?).ok()?;
    NaiveDate::from_num_days_from_ce_opt(ce)
}

pub(crate) fn days_of_date(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) - UNIX_EPOCH_DAY_CE
}

/// Number of ticks per second at `scale`, for scales `DateTime64` allows.
pub(crate) fn tick_factor(scale: u8) -> Option<i64> {
    (scale <= MAX_TICK_SCALE).then(|| 10i64.pow(u32::from(scale)))
}

/// Splits ticks of `10^-scale` seconds into whole seconds and a
/// non-negative nanosecond remainder; pre-epoch ticks borrow a second.
pub(crate) fn split_ticks(ticks: i64, scale: u8) -> Option<(i64, u32)> {
    let factor = tick_factor(scale)?;
    let seconds = ticks.div_euclid(factor);
    let rem = ticks.rem_euclid(factor);
    let nanos = rem * (NANOS_PER_SECOND / factor);
    Some((seconds, nanos as u32))
}

pub(crate) fn zoned(seconds: i64, nanos: u32, tz: Tz) -> Option<DateTime<Tz>> {
    DateTime::from_timestamp(seconds, nanos).map(|utc| utc.with_timezone(&tz))
}

/// Resolves a wall-clock time in `tz`, taking the earlier instant across a
/// backward transition.
fn localize(naive: &NaiveDateTime, tz: Tz) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earlier, _) => Some(earlier),
        LocalResult::None => None,
    }
}

/// Integer view of a numeric cell.
enum Wide {
    Small(i128),
    Big(BigInt),
}

impl Wide {
    fn of_big(v: BigInt) -> Self {
        match i128::try_from(&v) {
            Ok(small) => Wide::Small(small),
            Err(_) => Wide::Big(v),
        }
    }

    fn of_u128(v: u128) -> Self {
        match i128::try_from(v) {
            Ok(small) => Wide::Small(small),
            Err(_) => Wide::Big(BigInt::from(v)),
        }
    }

    fn into_big(self) -> BigInt {
        match self {
            Wide::Small(v) => BigInt::from(v),
            Wide::Big(v) => v,
        }
    }
}

/// Temporal view of a cell: either an instant, or a wall-clock reading
/// that still needs a zone.
enum Temporal {
    Instant {
        seconds: i64,
        nanos: u32,
        timezone: Option<Tz>,
    },
    Naive(NaiveDateTime),
}

const TEXT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    TEXT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

fn float_wide(v: f64, from: &Value, to: &'static str) -> ConvResult<Wide> {
    if !v.is_finite() || v.fract() != 0.0 {
        return Err(ConvError::invalid(from.describe(), to));
    }
    // 2^127
    if v.abs() < 1.7014118346046923e38 {
        Ok(Wide::Small(v as i128))
    } else {
        format!("{v:.0}")
            .parse::<BigInt>()
            .map(Wide::Big)
            .map_err(|_| ConvError::invalid(from.describe(), to))
    }
}

macro_rules! narrowing_accessors {
    ($($(#[$doc:meta])* $name:ident -> $t:ty),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name(&self) -> ConvResult<$t> {
                const TARGET: &str = stringify!($t);
                match self.wide(TARGET)? {
                    Wide::Small(v) => <$t>::try_from(v).map_err(|_| ConvError::overflow(v, TARGET)),
                    Wide::Big(v) => Err(ConvError::overflow(v, TARGET)),
                }
            }
        )*
    };
}

macro_rules! object_accessor {
    ($(#[$doc:meta])* $name:ident, $variant:ident -> $t:ty) => {
        $(#[$doc])*
        pub fn $name(&self) -> ConvResult<Option<&$t>> {
            match self.inner() {
                Value::Null => Ok(None),
                Value::$variant(items) => Ok(Some(items.as_slice())),
                other => Err(ConvError::invalid(other.describe(), stringify!($variant))),
            }
        }
    };
}

impl Value {
    fn is_numeric(&self) -> bool {
        matches!(
            self,
            Value::Bool(_)
                | Value::Int8(_)
                | Value::Int16(_)
                | Value::Int32(_)
                | Value::Int64(_)
                | Value::Int128(_)
                | Value::Int256(_)
                | Value::UInt8(_)
                | Value::UInt16(_)
                | Value::UInt32(_)
                | Value::UInt64(_)
                | Value::UInt128(_)
                | Value::UInt256(_)
                | Value::Float32(_)
                | Value::Float64(_)
                | Value::Decimal(_)
        )
    }

    /// Exact integer reading of the cell. Dates read as day numbers,
    /// `DateTime` as seconds, `DateTime64` as ticks, enums as codes and
    /// addresses as their network-order integer.
    fn wide(&self, to: &'static str) -> ConvResult<Wide> {
        Ok(match self.inner() {
            Value::Null => Wide::Small(0),
            Value::Bool(v) => Wide::Small(i128::from(*v)),
            Value::Int8(v) => Wide::Small(i128::from(*v)),
            Value::Int16(v) => Wide::Small(i128::from(*v)),
            Value::Int32(v) => Wide::Small(i128::from(*v)),
            Value::Int64(v) => Wide::Small(i128::from(*v)),
            Value::Int128(v) => Wide::Small(*v),
            Value::UInt8(v) => Wide::Small(i128::from(*v)),
            Value::UInt16(v) => Wide::Small(i128::from(*v)),
            Value::UInt32(v) => Wide::Small(i128::from(*v)),
            Value::UInt64(v) => Wide::Small(i128::from(*v)),
            Value::UInt128(v) => Wide::of_u128(*v),
            Value::Int256(v) => Wide::of_big(v.clone()),
            Value::UInt256(v) => Wide::of_big(BigInt::from(v.clone())),
            cell @ Value::Float32(v) => float_wide(f64::from(*v), cell, to)?,
            cell @ Value::Float64(v) => float_wide(*v, cell, to)?,
            cell @ Value::Decimal(d) => {
                if !d.is_integral() {
                    return Err(ConvError::invalid(cell.describe(), to));
                }
                Wide::of_big(d.trunc())
            }
            Value::Enum { code, .. } => Wide::Small(i128::from(*code)),
            Value::Date(days) => Wide::Small(i128::from(*days)),
            Value::DateTime { seconds, .. } => Wide::Small(i128::from(*seconds)),
            Value::DateTime64 { ticks, .. } => Wide::Small(i128::from(*ticks)),
            Value::IPv4(addr) => Wide::Small(i128::from(u32::from(*addr))),
            Value::IPv6(addr) => Wide::of_u128(u128::from(*addr)),
            cell @ Value::String(bytes) => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|_| ConvError::invalid(cell.describe(), to))?
                    .trim();
                match text.parse::<i128>() {
                    Ok(v) => Wide::Small(v),
                    Err(_) => text
                        .parse::<BigInt>()
                        .map(Wide::of_big)
                        .map_err(|_| ConvError::invalid(cell.describe(), to))?,
                }
            }
            other => return Err(ConvError::invalid(other.describe(), to)),
        })
    }

    /// `false` on null; otherwise only `0` and `1` (of any numeric kind, or
    /// the strings `"0"`, `"1"`, `"false"`, `"true"`) convert.
    pub fn as_bool(&self) -> ConvResult<bool> {
        match self.inner() {
            Value::Null => Ok(false),
            Value::Bool(v) => Ok(*v),
            Value::String(bytes) => match bytes.as_slice() {
                b"1" | b"true" => Ok(true),
                b"0" | b"false" => Ok(false),
                _ => Err(ConvError::invalid(self.describe(), "bool")),
            },
            num if num.is_numeric() => match num.wide("bool") {
                Ok(Wide::Small(0)) => Ok(false),
                Ok(Wide::Small(1)) => Ok(true),
                _ => Err(ConvError::invalid(num.describe(), "bool")),
            },
            other => Err(ConvError::invalid(other.describe(), "bool")),
        }
    }

    narrowing_accessors!(
        /// `0` on null.
        as_i8 -> i8,
        /// `0` on null.
        as_i16 -> i16,
        /// `0` on null.
        as_i32 -> i32,
        /// `0` on null.
        as_i64 -> i64,
        /// `0` on null.
        as_i128 -> i128,
        /// `0` on null.
        as_u8 -> u8,
        /// `0` on null.
        as_u16 -> u16,
        /// `0` on null.
        as_u32 -> u32,
        /// `0` on null. `UInt64` cells above `i64::MAX` are exact here and
        /// through [`as_big_int`](Value::as_big_int), never through `as_i64`.
        as_u64 -> u64,
    );

    /// `0` on null.
    pub fn as_u128(&self) -> ConvResult<u128> {
        match self.wide("u128")? {
            Wide::Small(v) => u128::try_from(v).map_err(|_| ConvError::overflow(v, "u128")),
            Wide::Big(v) => u128::try_from(&v).map_err(|_| ConvError::overflow(v, "u128")),
        }
    }

    /// Exact integer of any width; `None` on null.
    pub fn as_big_int(&self) -> ConvResult<Option<BigInt>> {
        if self.inner().is_null() {
            return Ok(None);
        }
        self.wide("BigInt").map(|w| Some(w.into_big()))
    }

    /// Exact decimal; floats expand to their shortest representation.
    /// `None` on null.
    pub fn as_decimal(&self) -> ConvResult<Option<Decimal>> {
        match self.inner() {
            Value::Null => Ok(None),
            Value::Decimal(d) => Ok(Some(d.clone())),
            Value::Float32(v) => {
                if v.is_finite() {
                    v.to_string().parse().map(Some)
                } else {
                    Err(ConvError::invalid(self.describe(), "Decimal"))
                }
            }
            Value::Float64(v) => Decimal::from_f64(*v).map(Some),
            cell @ Value::String(bytes) => std::str::from_utf8(bytes)
                .map_err(|_| ConvError::invalid(cell.describe(), "Decimal"))?
                .parse()
                .map(Some),
            other => other.wide("Decimal").map(|w| Some(Decimal::from(w.into_big()))),
        }
    }

    /// `0.0` on null. Never fails for integers, rounding to nearest.
    pub fn as_f64(&self) -> ConvResult<f64> {
        match self.inner() {
            Value::Float32(v) => Ok(f64::from(*v)),
            Value::Float64(v) => Ok(*v),
            Value::Decimal(d) => Ok(d.to_f64()),
            cell @ Value::String(bytes) => std::str::from_utf8(bytes)
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .ok_or_else(|| ConvError::invalid(cell.describe(), "f64")),
            other => match other.wide("f64")? {
                Wide::Small(v) => Ok(v as f64),
                Wide::Big(v) => Ok(v.to_string().parse().unwrap_or(f64::NAN)),
            },
        }
    }

    /// `0.0` on null. Finite values beyond `f32::MAX` overflow.
    pub fn as_f32(&self) -> ConvResult<f32> {
        if let Value::Float32(v) = self.inner() {
            return Ok(*v);
        }
        let wide = self.as_f64()?;
        if wide.is_finite() && wide.abs() > f64::from(f32::MAX) {
            return Err(ConvError::overflow(wide, "f32"));
        }
        Ok(wide as f32)
    }

    /// `""` on null; bytes that are not UTF-8 are replaced with U+FFFD. Other
    /// cells render in their text form, enums by name when known.
    pub fn as_string(&self) -> ConvResult<String> {
        Ok(match self.inner() {
            Value::Null => String::new(),
            Value::String(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            other => other.to_string(),
        })
    }

    /// Raw bytes; addresses and UUIDs yield their network-order octets and
    /// other cells their text form. `None` on null.
    pub fn as_bytes(&self) -> ConvResult<Option<Vec<u8>>> {
        Ok(match self.inner() {
            Value::Null => None,
            Value::String(bytes) => Some(bytes.clone()),
            Value::IPv4(addr) => Some(addr.octets().to_vec()),
            Value::IPv6(addr) => Some(addr.octets().to_vec()),
            Value::Uuid(uuid) => Some(uuid.to_rfc_bytes().to_vec()),
            other => Some(other.to_string().into_bytes()),
        })
    }

    fn temporal(&self, to: &'static str) -> ConvResult<Temporal> {
        match self.inner() {
            Value::Date(days) => date_of_days(i64::from(*days))
                .map(|d| Temporal::Naive(d.and_time(NaiveTime::MIN)))
                .ok_or_else(|| ConvError::overflow(days, to)),
            Value::DateTime { seconds, timezone } => Ok(Temporal::Instant {
                seconds: *seconds,
                nanos: 0,
                timezone: *timezone,
            }),
            Value::DateTime64 {
                ticks,
                scale,
                timezone,
            } => {
                let (seconds, nanos) =
                    split_ticks(*ticks, *scale).ok_or_else(|| ConvError::overflow(scale, "DateTime64 scale"))?;
                Ok(Temporal::Instant {
                    seconds,
                    nanos,
                    timezone: *timezone,
                })
            }
            cell @ Value::String(bytes) => std::str::from_utf8(bytes)
                .ok()
                .and_then(parse_naive)
                .map(Temporal::Naive)
                .ok_or_else(|| ConvError::invalid(cell.describe(), to)),
            num if num.is_numeric() => {
                let seconds = num.as_i64()?;
                Ok(Temporal::Instant {
                    seconds,
                    nanos: 0,
                    timezone: None,
                })
            }
            other => Err(ConvError::invalid(other.describe(), to)),
        }
    }

    /// Instant in `zone`; wall-clock cells (dates and strings) are read as
    /// local times of `zone`.
    fn in_zone(&self, zone: Option<Tz>, to: &'static str) -> ConvResult<DateTime<Tz>> {
        match self.temporal(to)? {
            Temporal::Instant {
                seconds,
                nanos,
                timezone,
            } => {
                let tz = zone.or(timezone).unwrap_or(Tz::UTC);
                zoned(seconds, nanos, tz).ok_or_else(|| ConvError::overflow(seconds, to))
            }
            Temporal::Naive(naive) => localize(&naive, zone.unwrap_or(Tz::UTC))
                .ok_or_else(|| ConvError::invalid(self.describe(), to)),
        }
    }

    /// Calendar date, in the cell's zone for instants. `None` on null.
    pub fn as_date(&self) -> ConvResult<Option<NaiveDate>> {
        Ok(self.as_naive_datetime()?.map(|dt| dt.date()))
    }

    /// Time of day. Numeric cells are seconds into the day and must lie in
    /// `0..86400`. `None` on null.
    pub fn as_time(&self) -> ConvResult<Option<NaiveTime>> {
        let cell = self.inner();
        if cell.is_null() {
            return Ok(None);
        }
        if cell.is_numeric() {
            let seconds = cell.as_i64()?;
            return u32::try_from(seconds)
                .ok()
                .filter(|s| i64::from(*s) < SECONDS_PER_DAY)
                .and_then(|s| NaiveTime::from_num_seconds_from_midnight_opt(s, 0))
                .map(Some)
                .ok_or_else(|| ConvError::overflow(seconds, "time of day"));
        }
        Ok(self.as_naive_datetime()?.map(|dt| dt.time()))
    }

    /// Wall-clock reading, in the cell's zone (UTC if it has none). `None`
    /// on null.
    pub fn as_naive_datetime(&self) -> ConvResult<Option<NaiveDateTime>> {
        if self.inner().is_null() {
            return Ok(None);
        }
        match self.temporal("NaiveDateTime")? {
            Temporal::Naive(naive) => Ok(Some(naive)),
            Temporal::Instant {
                seconds,
                nanos,
                timezone,
            } => zoned(seconds, nanos, timezone.unwrap_or(Tz::UTC))
                .map(|dt| Some(dt.naive_local()))
                .ok_or_else(|| ConvError::overflow(seconds, "NaiveDateTime")),
        }
    }

    /// Instant in the cell's own zone, or UTC. `None` on null.
    pub fn as_datetime(&self) -> ConvResult<Option<DateTime<Tz>>> {
        if self.inner().is_null() {
            return Ok(None);
        }
        self.in_zone(None, "DateTime").map(Some)
    }

    /// Instant converted to `zone`; dates and strings are read as local
    /// times of `zone`. `None` on null.
    pub fn as_datetime_in(&self, zone: Tz) -> ConvResult<Option<DateTime<Tz>>> {
        if self.inner().is_null() {
            return Ok(None);
        }
        self.in_zone(Some(zone), "DateTime").map(Some)
    }

    /// Day number for a `Date`/`Date32` column whose instants are read in
    /// `tz`; bare integers are day numbers.
    pub(crate) fn epoch_days(&self, tz: Tz) -> ConvResult<i64> {
        match self.inner() {
            Value::Date(days) => Ok(i64::from(*days)),
            num if num.is_numeric() => num.as_i64(),
            cell => {
                let dt = match cell.temporal("Date")? {
                    Temporal::Naive(naive) => naive,
                    Temporal::Instant {
                        seconds,
                        nanos,
                        timezone,
                    } => zoned(seconds, nanos, timezone.unwrap_or(tz))
                        .ok_or_else(|| ConvError::overflow(seconds, "Date"))?
                        .naive_local(),
                };
                Ok(days_of_date(dt.date()))
            }
        }
    }

    /// Seconds and nanoseconds since the epoch for a column in zone `tz`;
    /// wall-clock cells are read as local times of `tz`, bare integers as
    /// seconds.
    pub(crate) fn epoch_instant(&self, tz: Tz) -> ConvResult<(i64, u32)> {
        match self.temporal("DateTime")? {
            Temporal::Instant { seconds, nanos, .. } => Ok((seconds, nanos)),
            Temporal::Naive(naive) => localize(&naive, tz)
                .map(|dt| (dt.timestamp(), dt.timestamp_subsec_nanos()))
                .ok_or_else(|| ConvError::invalid(self.describe(), "DateTime")),
        }
    }

    /// Ticks at `scale` for a `DateTime64(scale)` column in zone `tz`;
    /// finer ticks are truncated toward the past.
    pub(crate) fn epoch_ticks(&self, scale: u8, tz: Tz) -> ConvResult<i64> {
        let factor = tick_factor(scale).ok_or_else(|| ConvError::overflow(scale, "DateTime64 scale"))?;
        if let Value::DateTime64 {
            ticks,
            scale: own,
            ..
        } = self.inner()
        {
            if *own == scale {
                return Ok(*ticks);
            }
        }
        let (seconds, nanos) = self.epoch_instant(tz)?;
        seconds
            .checked_mul(factor)
            .and_then(|t| t.checked_add(i64::from(nanos) / (NANOS_PER_SECOND / factor)))
            .ok_or_else(|| ConvError::overflow(self.describe(), "DateTime64"))
    }

    /// IPv4 address; also accepts 32-bit integers and IPv4-mapped IPv6
    /// addresses. `None` on null.
    pub fn as_ipv4(&self) -> ConvResult<Option<Ipv4Addr>> {
        match self.inner() {
            Value::Null => Ok(None),
            Value::IPv4(addr) => Ok(Some(*addr)),
            Value::UInt32(v) => Ok(Some(Ipv4Addr::from(*v))),
            Value::Int32(v) => Ok(Some(Ipv4Addr::from(*v as u32))),
            cell @ Value::IPv6(addr) => addr
                .to_ipv4_mapped()
                .map(Some)
                .ok_or_else(|| ConvError::invalid(cell.describe(), "IPv4")),
            cell @ Value::String(bytes) => std::str::from_utf8(bytes)
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .map(Some)
                .ok_or_else(|| ConvError::invalid(cell.describe(), "IPv4")),
            other => Err(ConvError::invalid(other.describe(), "IPv4")),
        }
    }

    /// IPv6 address; IPv4 addresses are mapped, 128-bit integers
    /// reinterpreted. `None` on null.
    pub fn as_ipv6(&self) -> ConvResult<Option<Ipv6Addr>> {
        match self.inner() {
            Value::Null => Ok(None),
            Value::IPv6(addr) => Ok(Some(*addr)),
            Value::IPv4(addr) => Ok(Some(addr.to_ipv6_mapped())),
            Value::UInt128(v) => Ok(Some(Ipv6Addr::from(*v))),
            Value::Int128(v) => Ok(Some(Ipv6Addr::from(*v as u128))),
            cell @ Value::String(bytes) => std::str::from_utf8(bytes)
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .map(Some)
                .ok_or_else(|| ConvError::invalid(cell.describe(), "IPv6")),
            other => Err(ConvError::invalid(other.describe(), "IPv6")),
        }
    }

    /// `None` on null.
    pub fn as_uuid(&self) -> ConvResult<Option<Uuid>> {
        match self.inner() {
            Value::Null => Ok(None),
            Value::Uuid(uuid) => Ok(Some(*uuid)),
            Value::UInt128(v) => Ok(Some(Uuid::from_u128(*v))),
            Value::Int128(v) => Ok(Some(Uuid::from_u128(*v as u128))),
            cell @ Value::String(bytes) => std::str::from_utf8(bytes)
                .map_err(|_| ConvError::invalid(cell.describe(), "UUID"))?
                .trim()
                .parse()
                .map(Some),
            other => Err(ConvError::invalid(other.describe(), "UUID")),
        }
    }

    object_accessor!(
        /// Elements of an array cell. `None` on null.
        as_array, Array -> [Value]
    );
    object_accessor!(
        /// Members of a tuple cell. `None` on null.
        as_tuple, Tuple -> [Value]
    );
    object_accessor!(
        /// Pairs of a map cell in wire order. `None` on null.
        as_map, Map -> [(Value, Value)]
    );
    object_accessor!(
        /// Named columns of a nested cell. `None` on null.
        as_nested, Nested -> [(String, Vec<Value>)]
    );
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    fn kind<T: std::fmt::Debug>(r: ConvResult<T>) -> ErrorKind {
        r.unwrap_err().kind()
    }

    #[test]
    fn narrowing_boundaries() {
        assert_eq!(Value::Int16(127).as_i8().unwrap(), 127);
        assert_eq!(kind(Value::Int16(128).as_i8()), ErrorKind::RangeOverflow);
        assert_eq!(kind(Value::Int16(-129).as_i8()), ErrorKind::RangeOverflow);
        assert_eq!(kind(Value::Int8(-1).as_u64()), ErrorKind::RangeOverflow);
        assert_eq!(Value::UInt8(200).as_i64().unwrap(), 200);
        assert_eq!(Value::Int64(-5).as_i128().unwrap(), -5);
    }

    #[test]
    fn unsigned_64_is_not_negative_one() {
        let v = Value::UInt64(u64::MAX);
        assert_eq!(
            v.as_big_int().unwrap().unwrap().to_string(),
            "18446744073709551615"
        );
        assert_eq!(v.as_u64().unwrap(), u64::MAX);
        assert_eq!(kind(v.as_i64()), ErrorKind::RangeOverflow);
        assert_eq!(v.as_u128().unwrap(), u128::from(u64::MAX));
    }

    #[test]
    fn wide_integers() {
        let big = Value::UInt256("115792089237316195423570985008687907853269984665640564039457584007913129639935".parse().unwrap());
        assert_eq!(kind(big.as_u128()), ErrorKind::RangeOverflow);
        assert!(big.as_big_int().unwrap().is_some());
        assert_eq!(Value::UInt128(u128::MAX).as_u128().unwrap(), u128::MAX);
        assert_eq!(kind(Value::UInt128(u128::MAX).as_i128()), ErrorKind::RangeOverflow);
        assert_eq!(Value::Int256(BigInt::from(-7)).as_i8().unwrap(), -7);
    }

    #[test]
    fn booleans_only_from_zero_and_one() {
        assert!(Value::UInt8(1).as_bool().unwrap());
        assert!(!Value::Int64(0).as_bool().unwrap());
        assert!(Value::Float64(1.0).as_bool().unwrap());
        assert!(Value::from("true").as_bool().unwrap());
        assert_eq!(kind(Value::Int32(2).as_bool()), ErrorKind::InvalidConversion);
        assert_eq!(kind(Value::Float64(0.5).as_bool()), ErrorKind::InvalidConversion);
        assert_eq!(kind(Value::from("yes").as_bool()), ErrorKind::InvalidConversion);
    }

    #[test]
    fn fractions_do_not_truncate() {
        let dec = Value::Decimal(Decimal::new(1250, 2));
        assert_eq!(kind(dec.as_i32()), ErrorKind::InvalidConversion);
        let dec = Value::Decimal(Decimal::new(1200, 2));
        assert_eq!(dec.as_i32().unwrap(), 12);
        assert_eq!(kind(Value::Float64(2.5).as_i64()), ErrorKind::InvalidConversion);
        assert_eq!(Value::Float64(-3.0).as_i64().unwrap(), -3);
        assert_eq!(kind(Value::Float64(1e20).as_i64()), ErrorKind::RangeOverflow);
    }

    #[test]
    fn widening_to_floats_and_decimals() {
        assert_eq!(Value::Int64(i64::MAX).as_f64().unwrap(), 9.223372036854776e18);
        assert_eq!(Value::Int32(-3).as_f32().unwrap(), -3.0);
        assert_eq!(kind(Value::Float64(1e300).as_f32()), ErrorKind::RangeOverflow);
        assert_eq!(
            Value::UInt64(u64::MAX).as_decimal().unwrap().unwrap(),
            Decimal::from(u64::MAX)
        );
        assert_eq!(
            Value::Float32(0.1).as_decimal().unwrap().unwrap(),
            Decimal::new(1, 1)
        );
    }

    #[test]
    fn null_defaults_differ_by_accessor() {
        let null = Value::Null;
        assert!(!null.as_bool().unwrap());
        assert_eq!(null.as_i32().unwrap(), 0);
        assert_eq!(null.as_u64().unwrap(), 0);
        assert_eq!(null.as_f64().unwrap(), 0.0);
        assert_eq!(null.as_string().unwrap(), "");
        assert_eq!(null.as_big_int().unwrap(), None);
        assert_eq!(null.as_decimal().unwrap(), None);
        assert_eq!(null.as_bytes().unwrap(), None);
        assert_eq!(null.as_date().unwrap(), None);
        assert_eq!(null.as_time().unwrap(), None);
        assert_eq!(null.as_datetime().unwrap(), None);
        assert_eq!(null.as_ipv4().unwrap(), None);
        assert_eq!(null.as_uuid().unwrap(), None);
        assert_eq!(null.as_array().unwrap(), None);
        assert_eq!(null.as_map().unwrap(), None);
    }

    #[test]
    fn dates_and_times() {
        let date = Value::Date(-1);
        assert_eq!(
            date.as_date().unwrap(),
            NaiveDate::from_ymd_opt(1969, 12, 31)
        );
        let dt = Value::DateTime {
            seconds: 3600,
            timezone: Some(chrono_tz::Asia::Tokyo),
        };
        assert_eq!(
            dt.as_naive_datetime().unwrap().unwrap().to_string(),
            "1970-01-01 10:00:00"
        );
        let utc = dt.as_datetime_in(Tz::UTC).unwrap().unwrap();
        assert_eq!(utc.timestamp(), 3600);
        assert_eq!(
            Value::Int32(3661).as_time().unwrap(),
            NaiveTime::from_hms_opt(1, 1, 1)
        );
        assert_eq!(kind(Value::Int32(-1).as_time()), ErrorKind::RangeOverflow);
        assert_eq!(kind(Value::Int32(86_400).as_time()), ErrorKind::RangeOverflow);
        let ticks = Value::DateTime64 {
            ticks: -1,
            scale: 3,
            timezone: None,
        };
        assert_eq!(ticks.as_datetime().unwrap().unwrap().timestamp_millis(), -1);
        assert_eq!(ticks.epoch_ticks(6, Tz::UTC).unwrap(), -1000);
    }

    #[test]
    fn temporal_column_coercions() {
        let berlin = chrono_tz::Europe::Berlin;
        let text = Value::from("2020-01-01 00:00:00");
        assert_eq!(text.epoch_instant(Tz::UTC).unwrap(), (1_577_836_800, 0));
        assert_eq!(text.epoch_instant(berlin).unwrap(), (1_577_833_200, 0));
        assert_eq!(Value::from("2020-01-01").epoch_days(Tz::UTC).unwrap(), 18_262);
        let late = Value::DateTime {
            seconds: 1_577_833_200,
            timezone: None,
        };
        assert_eq!(late.epoch_days(berlin).unwrap(), 18_262);
        assert_eq!(late.epoch_days(Tz::UTC).unwrap(), 18_261);
    }

    #[test]
    fn addresses_need_matching_width() {
        assert_eq!(
            Value::UInt32(0x7f00_0001).as_ipv4().unwrap(),
            Some(Ipv4Addr::LOCALHOST)
        );
        assert_eq!(kind(Value::UInt64(1).as_ipv4()), ErrorKind::InvalidConversion);
        assert_eq!(
            Value::UInt128(1).as_ipv6().unwrap(),
            Some(Ipv6Addr::LOCALHOST)
        );
        assert_eq!(kind(Value::UInt32(1).as_ipv6()), ErrorKind::InvalidConversion);
        assert_eq!(
            Value::IPv4(Ipv4Addr::LOCALHOST).as_u32().unwrap(),
            0x7f00_0001
        );
    }

    #[test]
    fn strings_and_bytes() {
        assert_eq!(Value::Int8(-3).as_string().unwrap(), "-3");
        assert_eq!(
            Value::Enum {
                code: 1,
                name: Some(String::from("a"))
            }
            .as_string()
            .unwrap(),
            "a"
        );
        assert_eq!(Value::from(" 42 ").as_i32().unwrap(), 42);
        assert_eq!(kind(Value::from("4x").as_i32()), ErrorKind::InvalidConversion);
        assert_eq!(
            Value::IPv4(Ipv4Addr::new(10, 0, 0, 1)).as_bytes().unwrap(),
            Some(vec![10, 0, 0, 1])
        );
    }

    #[test]
    fn variants_are_transparent() {
        let v = Value::Variant {
            alternative: 1,
            value: Box::new(Value::UInt64(7)),
        };
        assert_eq!(v.as_u8().unwrap(), 7);
        assert_eq!(v.as_string().unwrap(), "7");
    }

    #[test]
    fn composites() {
        let arr = Value::array([1i32, 2]);
        assert_eq!(arr.as_array().unwrap().unwrap().len(), 2);
        assert_eq!(kind(arr.as_tuple()), ErrorKind::InvalidConversion);
        let nested = Value::nested([("n", vec![Value::UInt8(1)])]);
        assert_eq!(nested.as_nested().unwrap().unwrap()[0].0, "n");
    }
}
