use std::borrow::Cow;

use num_bigint::{BigInt, Sign};

use super::{Codec, NULL_DISCRIMINATOR};
use crate::conv::error::{EncodeError, EncodeResult};
use crate::conv::target::{ByteCounter, Target};
use crate::schema::{DecimalWidth, EnumTable, Field, TypeDescriptor};
use crate::value::decimal::pow10;
use crate::value::{ConvError, Value};
use crate::varint::write_varint;
use crate::Encode;

const WIDE_BYTES: usize = 32;

fn shape(ty: &TypeDescriptor, value: &Value) -> EncodeError {
    EncodeError::Shape {
        ty: ty.to_string(),
        found: value.kind_name(),
    }
}

fn required<T>(value: Option<T>, ty: &TypeDescriptor) -> EncodeResult<T> {
    value.ok_or_else(|| EncodeError::UnexpectedNull { ty: ty.to_string() })
}

/// Writes `v` as a 256-bit little-endian integer, two's complement when
/// `signed`.
fn write_wide<U: Target>(
    buf: &mut U,
    v: &BigInt,
    signed: bool,
    target: &'static str,
) -> EncodeResult<usize> {
    let (mut bytes, fill) = if signed {
        let fill = if v.sign() == Sign::Minus { 0xff } else { 0x00 };
        (v.to_signed_bytes_le(), fill)
    } else {
        if v.sign() == Sign::Minus {
            return Err(ConvError::overflow(v, target).into());
        }
        (v.magnitude().to_bytes_le(), 0x00)
    };
    if bytes.len() > WIDE_BYTES {
        return Err(ConvError::overflow(v, target).into());
    }
    bytes.resize(WIDE_BYTES, fill);
    Ok(buf.push_all(&bytes)?)
}

/// Text of a `String` cell, or the rendered form of any other scalar.
fn text_bytes(value: &Value) -> EncodeResult<Cow<'_, [u8]>> {
    match value.inner() {
        Value::String(bytes) => Ok(Cow::Borrowed(bytes)),
        other => Ok(Cow::Owned(other.as_string()?.into_bytes())),
    }
}

/// Raw bytes for a fixed-width column: addresses and UUIDs contribute their
/// octets rather than their text.
fn raw_bytes(value: &Value) -> EncodeResult<Cow<'_, [u8]>> {
    match value.inner() {
        Value::String(bytes) => Ok(Cow::Borrowed(bytes)),
        other => Ok(Cow::Owned(other.as_bytes()?.unwrap_or_default())),
    }
}

fn enum_code(table: &EnumTable, value: &Value) -> EncodeResult<i16> {
    match value.inner() {
        Value::Enum { code, .. } => Ok(*code),
        cell @ Value::String(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|name| table.code_of(name))
            .ok_or_else(|| ConvError::invalid(cell.describe(), "Enum").into()),
        other => Ok(other.as_i16()?),
    }
}

fn check_arity(ty: &TypeDescriptor, expected: usize, actual: usize) -> EncodeResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(EncodeError::Arity {
            ty: ty.to_string(),
            expected,
            actual,
        })
    }
}

impl Codec {
    pub(super) fn encode_value<U: Target>(
        &self,
        buf: &mut U,
        ty: &TypeDescriptor,
        value: &Value,
    ) -> EncodeResult<usize> {
        use TypeDescriptor as T;
        if value.is_null() {
            return match ty {
                T::Nullable(_) => Ok(buf.push_one(1)?),
                T::LowCardinality(inner) | T::SimpleAggregateFunction { inner, .. } => {
                    self.encode_value(buf, inner, value)
                }
                T::Variant(_) => Ok(buf.push_one(NULL_DISCRIMINATOR)?),
                T::Nothing => Ok(0),
                _ => Err(EncodeError::UnexpectedNull { ty: ty.to_string() }),
            };
        }
        match ty {
            T::Int8 => Ok(value.as_i8()?.write_to(buf)?),
            T::Int16 => Ok(value.as_i16()?.write_to(buf)?),
            T::Int32 => Ok(value.as_i32()?.write_to(buf)?),
            T::Int64 | T::Interval(_) => Ok(value.as_i64()?.write_to(buf)?),
            T::Int128 => Ok(value.as_i128()?.write_to(buf)?),
            T::Int256 => write_wide(buf, &required(value.as_big_int()?, ty)?, true, "Int256"),
            T::UInt8 => Ok(value.as_u8()?.write_to(buf)?),
            T::UInt16 => Ok(value.as_u16()?.write_to(buf)?),
            T::UInt32 => Ok(value.as_u32()?.write_to(buf)?),
            T::UInt64 => Ok(value.as_u64()?.write_to(buf)?),
            T::UInt128 => Ok(value.as_u128()?.write_to(buf)?),
            T::UInt256 => write_wide(buf, &required(value.as_big_int()?, ty)?, false, "UInt256"),
            T::Float32 => Ok(value.as_f32()?.write_to(buf)?),
            T::Float64 => Ok(value.as_f64()?.write_to(buf)?),
            T::Bool => Ok(value.as_bool()?.write_to(buf)?),
            T::Decimal { precision, scale } => {
                let decimal = required(value.as_decimal()?, ty)?.rescale(*scale);
                let unscaled = decimal.unscaled();
                if unscaled.magnitude() >= pow10(u32::from(*precision)).magnitude() {
                    return Err(ConvError::overflow(&decimal, "Decimal").into());
                }
                let overflow = || EncodeError::from(ConvError::overflow(&decimal, "Decimal"));
                match DecimalWidth::for_precision(*precision) {
                    DecimalWidth::W32 => Ok(i32::try_from(unscaled)
                        .map_err(|_| overflow())?
                        .write_to(buf)?),
                    DecimalWidth::W64 => Ok(i64::try_from(unscaled)
                        .map_err(|_| overflow())?
                        .write_to(buf)?),
                    DecimalWidth::W128 => Ok(i128::try_from(unscaled)
                        .map_err(|_| overflow())?
                        .write_to(buf)?),
                    DecimalWidth::W256 => write_wide(buf, unscaled, true, "Decimal"),
                }
            }
            T::String => Ok(text_bytes(value)?.write_to(buf)?),
            T::FixedString(width) => {
                let bytes = raw_bytes(value)?;
                if bytes.len() > *width {
                    return Err(EncodeError::TooLong {
                        ty: ty.to_string(),
                        limit: *width,
                        actual: bytes.len(),
                    });
                }
                buf.anticipate(*width);
                let mut written = buf.push_all(&bytes)?;
                for _ in bytes.len()..*width {
                    written += buf.push_one(0)?;
                }
                Ok(written)
            }
            T::Date => {
                let days = value.epoch_days(self.zone(None))?;
                let days = u16::try_from(days).map_err(|_| ConvError::overflow(days, "Date"))?;
                Ok(days.write_to(buf)?)
            }
            T::Date32 => {
                let days = value.epoch_days(self.zone(None))?;
                let days = i32::try_from(days).map_err(|_| ConvError::overflow(days, "Date32"))?;
                Ok(days.write_to(buf)?)
            }
            T::DateTime(timezone) => {
                let (seconds, _) = value.epoch_instant(self.zone(*timezone))?;
                let seconds = u32::try_from(seconds)
                    .map_err(|_| ConvError::overflow(seconds, "DateTime"))?;
                Ok(seconds.write_to(buf)?)
            }
            T::DateTime64 { scale, timezone } => {
                Ok(value.epoch_ticks(*scale, self.zone(*timezone))?.write_to(buf)?)
            }
            T::Uuid => Ok(required(value.as_uuid()?, ty)?.write_to(buf)?),
            T::IPv4 => Ok(required(value.as_ipv4()?, ty)?.write_to(buf)?),
            T::IPv6 => Ok(required(value.as_ipv6()?, ty)?.write_to(buf)?),
            T::Enum8(table) => {
                let code = enum_code(table, value)?;
                let code = i8::try_from(code).map_err(|_| ConvError::overflow(code, "Enum8"))?;
                Ok(code.write_to(buf)?)
            }
            T::Enum16(table) => Ok(enum_code(table, value)?.write_to(buf)?),
            T::Point
            | T::Ring
            | T::LineString
            | T::Polygon
            | T::MultiLineString
            | T::MultiPolygon => match ty.geo_expansion() {
                Some(expanded) => self.encode_value(buf, expanded, value),
                None => Err(shape(ty, value)),
            },
            T::Nothing => Err(shape(ty, value)),
            T::Nullable(inner) => Ok(buf.push_one(0)? + self.encode_value(buf, inner, value)?),
            T::LowCardinality(inner) | T::SimpleAggregateFunction { inner, .. } => {
                self.encode_value(buf, inner, value)
            }
            T::Array(inner) => {
                let items = match value.inner() {
                    Value::Array(items) => items,
                    other => return Err(shape(ty, other)),
                };
                let mut written = write_varint(buf, items.len() as u64)?;
                for item in items {
                    written += self.encode_value(buf, inner, item)?;
                }
                Ok(written)
            }
            T::Map(key_ty, value_ty) => {
                let pairs = match value.inner() {
                    Value::Map(pairs) => pairs,
                    other => return Err(shape(ty, other)),
                };
                let mut written = write_varint(buf, pairs.len() as u64)?;
                for (k, v) in pairs {
                    written += self.encode_value(buf, key_ty, k)?;
                    written += self.encode_value(buf, value_ty, v)?;
                }
                Ok(written)
            }
            T::Tuple { fields, .. } => {
                let items = match value.inner() {
                    Value::Tuple(items) => items,
                    other => return Err(shape(ty, other)),
                };
                check_arity(ty, fields.len(), items.len())?;
                let mut written = 0;
                for (field, item) in fields.iter().zip(items) {
                    written += self.encode_value(buf, &field.ty, item)?;
                }
                Ok(written)
            }
            T::Nested(fields) => {
                let columns = match value.inner() {
                    Value::Nested(columns) => columns,
                    other => return Err(shape(ty, other)),
                };
                self.encode_nested(buf, ty, fields, columns)
            }
            T::Variant(alternatives) => self.encode_variant(buf, ty, alternatives, value),
        }
    }

    fn encode_nested<U: Target>(
        &self,
        buf: &mut U,
        ty: &TypeDescriptor,
        fields: &[Field],
        columns: &[(String, Vec<Value>)],
    ) -> EncodeResult<usize> {
        check_arity(ty, fields.len(), columns.len())?;
        let rows = columns.first().map_or(0, |(_, values)| values.len());
        for (field, (name, values)) in fields.iter().zip(columns) {
            if *name != field.name {
                return Err(EncodeError::Shape {
                    ty: ty.to_string(),
                    found: "Nested with different column names",
                });
            }
            check_arity(&field.ty, rows, values.len())?;
        }
        let mut written = write_varint(buf, rows as u64)?;
        for (field, (_, values)) in fields.iter().zip(columns) {
            for item in values {
                written += self.encode_value(buf, &field.ty, item)?;
            }
        }
        Ok(written)
    }

    /// A tagged value keeps its alternative; an untagged one takes the first
    /// declared alternative able to hold it.
    fn encode_variant<U: Target>(
        &self,
        buf: &mut U,
        ty: &TypeDescriptor,
        alternatives: &[TypeDescriptor],
        value: &Value,
    ) -> EncodeResult<usize> {
        let (alternative, payload) = match value {
            Value::Variant {
                alternative,
                value: payload,
            } => {
                if *alternative >= alternatives.len() {
                    return Err(EncodeError::Arity {
                        ty: ty.to_string(),
                        expected: alternatives.len(),
                        actual: *alternative + 1,
                    });
                }
                (*alternative, payload.as_ref())
            }
            untagged => {
                let mut counter: ByteCounter = std::io::sink();
                let found = alternatives
                    .iter()
                    .position(|alt| self.encode_value(&mut counter, alt, untagged).is_ok());
                match found {
                    Some(ix) => (ix, untagged),
                    None => return Err(shape(ty, untagged)),
                }
            }
        };
        let order = TypeDescriptor::variant_wire_order(alternatives);
        let discriminator = order
            .iter()
            .position(|&ix| ix == alternative)
            .and_then(|pos| u8::try_from(pos).ok())
            .ok_or_else(|| shape(ty, value))?;
        Ok(buf.push_one(discriminator)? + self.encode_value(buf, &alternatives[alternative], payload)?)
    }
}
