use num_bigint::{BigInt, BigUint};

use super::{Codec, NULL_DISCRIMINATOR, PREALLOC_LIMIT};
use crate::parse::{ParseResult, Parser, TokenError};
use crate::schema::{DecimalWidth, EnumTable, TypeDescriptor};
use crate::value::{Decimal, Uuid, Value};
use crate::Decode;

/// Element count accepted for element types that occupy no bytes, where no
/// read would otherwise bound the loop.
const ZERO_WIDTH_LIMIT: usize = PREALLOC_LIMIT;

fn bounded_count(len: usize, zero_width: bool) -> ParseResult<usize> {
    if zero_width && len > ZERO_WIDTH_LIMIT {
        return Err(TokenError::ZeroWidthElements(len).into());
    }
    Ok(len)
}

fn is_zero_width(ty: &TypeDescriptor) -> bool {
    ty.fixed_width() == Some(0)
}

fn enum_cell(table: &EnumTable, code: i16) -> Value {
    Value::Enum {
        code,
        name: table.name_of(code).map(str::to_owned),
    }
}

impl Codec {
    pub(super) fn decode_value<P: Parser>(
        &self,
        p: &mut P,
        ty: &TypeDescriptor,
    ) -> ParseResult<Value> {
        use TypeDescriptor as T;
        Ok(match ty {
            T::Int8 => Value::Int8(p.take_i8()?),
            T::Int16 => Value::Int16(p.take_i16()?),
            T::Int32 => Value::Int32(p.take_i32()?),
            T::Int64 => Value::Int64(p.take_i64()?),
            T::Int128 => Value::Int128(p.take_i128()?),
            T::Int256 => Value::Int256(BigInt::from_signed_bytes_le(&p.consume_arr::<32>()?)),
            T::UInt8 => Value::UInt8(p.take_u8()?),
            T::UInt16 => Value::UInt16(p.take_u16()?),
            T::UInt32 => Value::UInt32(p.take_u32()?),
            T::UInt64 => Value::UInt64(p.take_u64()?),
            T::UInt128 => Value::UInt128(p.take_u128()?),
            T::UInt256 => Value::UInt256(BigUint::from_bytes_le(&p.consume_arr::<32>()?)),
            T::Float32 => Value::Float32(p.take_f32()?),
            T::Float64 => Value::Float64(p.take_f64()?),
            T::Bool => Value::Bool(p.take_bool()?),
            T::Decimal { precision, scale } => {
                let unscaled = match DecimalWidth::for_precision(*precision) {
                    DecimalWidth::W32 => BigInt::from(p.take_i32()?),
                    DecimalWidth::W64 => BigInt::from(p.take_i64()?),
                    DecimalWidth::W128 => BigInt::from(p.take_i128()?),
                    DecimalWidth::W256 => BigInt::from_signed_bytes_le(&p.consume_arr::<32>()?),
                };
                Value::Decimal(Decimal::new(unscaled, *scale))
            }
            T::String => Value::String(p.take_string()?),
            T::FixedString(n) => Value::String(p.take_dynamic(*n)?),
            T::Date => Value::Date(i32::from(p.take_u16()?)),
            T::Date32 => Value::Date(p.take_i32()?),
            T::DateTime(timezone) => Value::DateTime {
                seconds: i64::from(p.take_u32()?),
                timezone: timezone.or(self.timezone),
            },
            T::DateTime64 { scale, timezone } => Value::DateTime64 {
                ticks: p.take_i64()?,
                scale: *scale,
                timezone: timezone.or(self.timezone),
            },
            T::Uuid => Value::Uuid(Uuid::parse(p)?),
            T::IPv4 => Value::IPv4(Decode::parse(p)?),
            T::IPv6 => Value::IPv6(Decode::parse(p)?),
            T::Enum8(table) => enum_cell(table, i16::from(p.take_i8()?)),
            T::Enum16(table) => enum_cell(table, p.take_i16()?),
            T::Interval(_) => Value::Int64(p.take_i64()?),
            T::Point
            | T::Ring
            | T::LineString
            | T::Polygon
            | T::MultiLineString
            | T::MultiPolygon => match ty.geo_expansion() {
                Some(expanded) => self.decode_value(p, expanded)?,
                None => Value::Null,
            },
            T::Nothing => Value::Null,
            T::Nullable(inner) => {
                if p.take_null_marker()? {
                    Value::Null
                } else if matches!(inner.transparent(), T::Nothing) {
                    return Err(TokenError::NonNullNothing.into());
                } else {
                    self.decode_value(p, inner)?
                }
            }
            T::LowCardinality(inner) | T::SimpleAggregateFunction { inner, .. } => {
                self.decode_value(p, inner)?
            }
            T::Array(inner) => {
                let len = bounded_count(p.take_length()?, is_zero_width(inner))?;
                let mut items = Vec::with_capacity(len.min(PREALLOC_LIMIT));
                for _ in 0..len {
                    items.push(self.decode_value(p, inner)?);
                }
                Value::Array(items)
            }
            T::Map(key, value) => {
                let len = bounded_count(
                    p.take_length()?,
                    is_zero_width(key) && is_zero_width(value),
                )?;
                let mut pairs = Vec::with_capacity(len.min(PREALLOC_LIMIT));
                for _ in 0..len {
                    let k = self.decode_value(p, key)?;
                    let v = self.decode_value(p, value)?;
                    pairs.push((k, v));
                }
                Value::Map(pairs)
            }
            T::Tuple { fields, .. } => Value::Tuple(
                fields
                    .iter()
                    .map(|field| self.decode_value(p, &field.ty))
                    .collect::<ParseResult<_>>()?,
            ),
            T::Nested(fields) => {
                // columns are decoded one after another, so a single empty
                // column ahead of the others must not run unbounded
                let rows = bounded_count(
                    p.take_length()?,
                    fields.iter().any(|field| is_zero_width(&field.ty)),
                )?;
                let mut columns = Vec::with_capacity(fields.len());
                for field in fields {
                    let mut values = Vec::with_capacity(rows.min(PREALLOC_LIMIT));
                    for _ in 0..rows {
                        values.push(self.decode_value(p, &field.ty)?);
                    }
                    columns.push((field.name.clone(), values));
                }
                Value::Nested(columns)
            }
            T::Variant(alternatives) => {
                let discriminator = p.take_u8()?;
                if discriminator == NULL_DISCRIMINATOR {
                    return Ok(Value::Null);
                }
                let order = TypeDescriptor::variant_wire_order(alternatives);
                let alternative = *order.get(usize::from(discriminator)).ok_or(
                    TokenError::InvalidDiscriminator {
                        value: discriminator,
                        alternatives: alternatives.len(),
                    },
                )?;
                Value::Variant {
                    alternative,
                    value: Box::new(self.decode_value(p, &alternatives[alternative])?),
                }
            }
        })
    }
}
