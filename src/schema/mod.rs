//! Recursive model of column types
//!
//! A [`TypeDescriptor`] is parsed once from the text the server reports for a
//! column (`DESCRIBE` output, a `RowBinaryWithNamesAndTypes` header, or a
//! prepared statement's parameter list) and is then shared read-only by every
//! encode and decode call for that column. Descriptors are plain data: they
//! are `Send + Sync` and cheap to clone, and their [`Display`] output is the
//! canonical spelling of the type, which parses back to an equal descriptor.
//!
//! ```
//! use rowbin::schema::TypeDescriptor;
//!
//! let ty: TypeDescriptor = "Array(Nullable(Decimal64(4)))".parse().unwrap();
//! assert_eq!(ty.to_string(), "Array(Nullable(Decimal(18, 4)))");
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono_tz::Tz;

pub mod defaults;
pub mod enums;
pub mod error;
mod parser;

pub use enums::EnumTable;
pub use error::{TypeError, TypeResult};
pub use parser::{parse, parse_columns};

/// Time unit of an `Interval*` column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntervalUnit {
    Nanosecond,
    Microsecond,
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl IntervalUnit {
    pub const fn as_str(&self) -> &'static str {
        match self {
            IntervalUnit::Nanosecond => "Nanosecond",
            IntervalUnit::Microsecond => "Microsecond",
            IntervalUnit::Millisecond => "Millisecond",
            IntervalUnit::Second => "Second",
            IntervalUnit::Minute => "Minute",
            IntervalUnit::Hour => "Hour",
            IntervalUnit::Day => "Day",
            IntervalUnit::Week => "Week",
            IntervalUnit::Month => "Month",
            IntervalUnit::Quarter => "Quarter",
            IntervalUnit::Year => "Year",
        }
    }
}

/// Named member of a `Tuple`, a `Nested` structure, or a column list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: String,
    pub ty: TypeDescriptor,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let plain = !self.name.is_empty()
            && !self.name.starts_with(|c: char| c.is_ascii_digit())
            && self
                .name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
        if plain {
            write!(f, "{} {}", self.name, self.ty)
        } else {
            write!(f, "`{}` {}", self.name.replace('`', "\\`"), self.ty)
        }
    }
}

/// Byte width of the unscaled integer of a decimal column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DecimalWidth {
    W32,
    W64,
    W128,
    W256,
}

impl DecimalWidth {
    /// Narrowest width that holds `precision` decimal digits.
    pub const fn for_precision(precision: u8) -> Self {
        match precision {
            0..=9 => DecimalWidth::W32,
            10..=18 => DecimalWidth::W64,
            19..=38 => DecimalWidth::W128,
            _ => DecimalWidth::W256,
        }
    }

    pub const fn bytes(&self) -> usize {
        match self {
            DecimalWidth::W32 => 4,
            DecimalWidth::W64 => 8,
            DecimalWidth::W128 => 16,
            DecimalWidth::W256 => 32,
        }
    }

    /// Largest precision this width can carry.
    pub const fn max_precision(&self) -> u8 {
        match self {
            DecimalWidth::W32 => 9,
            DecimalWidth::W64 => 18,
            DecimalWidth::W128 => 38,
            DecimalWidth::W256 => 76,
        }
    }
}

lazy_static::lazy_static! {
    static ref GEO_POINT: TypeDescriptor =
        TypeDescriptor::tuple([TypeDescriptor::Float64, TypeDescriptor::Float64]);
    static ref GEO_RING: TypeDescriptor = TypeDescriptor::array(GEO_POINT.clone());
    static ref GEO_POLYGON: TypeDescriptor = TypeDescriptor::array(GEO_RING.clone());
    static ref GEO_MULTI_POLYGON: TypeDescriptor = TypeDescriptor::array(GEO_POLYGON.clone());
}

/// Parsed column type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    Int256,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    UInt128,
    UInt256,
    Float32,
    Float64,
    Bool,
    /// `precision` in `1..=76`, `scale <= precision`
    Decimal { precision: u8, scale: u8 },
    String,
    /// Exactly `N` bytes, `N >= 1`
    FixedString(usize),
    /// Days since epoch as `u16`
    Date,
    /// Days since epoch as `i32`
    Date32,
    /// Seconds since epoch as `u32`, optionally scoped to a zone
    DateTime(Option<Tz>),
    /// Ticks of `10^-scale` seconds since epoch as `i64`
    DateTime64 { scale: u8, timezone: Option<Tz> },
    Uuid,
    IPv4,
    IPv6,
    Enum8(EnumTable),
    Enum16(EnumTable),
    Interval(IntervalUnit),
    /// `Tuple(Float64, Float64)`
    Point,
    /// `Array(Point)`
    Ring,
    /// `Array(Point)`
    LineString,
    /// `Array(Ring)`
    Polygon,
    /// `Array(Ring)`
    MultiLineString,
    /// `Array(Polygon)`
    MultiPolygon,
    Nothing,
    Nullable(Box<TypeDescriptor>),
    LowCardinality(Box<TypeDescriptor>),
    Array(Box<TypeDescriptor>),
    Map(Box<TypeDescriptor>, Box<TypeDescriptor>),
    /// Ordered members; `named` is false when the names were synthesized
    /// from positions (`"1"`, `"2"`, ...)
    Tuple { fields: Vec<Field>, named: bool },
    /// Named columns stored as parallel arrays
    Nested(Vec<Field>),
    SimpleAggregateFunction {
        function: String,
        inner: Box<TypeDescriptor>,
    },
    /// Alternatives in declared order; see [`TypeDescriptor::variant_wire_order`]
    Variant(Vec<TypeDescriptor>),
}

impl TypeDescriptor {
    /// Builds an unnamed tuple, synthesizing positional names.
    pub fn tuple(members: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        let fields = members
            .into_iter()
            .enumerate()
            .map(|(ix, ty)| Field::new((ix + 1).to_string(), ty))
            .collect();
        TypeDescriptor::Tuple {
            fields,
            named: false,
        }
    }

    pub fn nullable(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Nullable(Box::new(inner))
    }

    pub fn array(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Array(Box::new(inner))
    }

    /// `true` when null is a legal value, looking through `LowCardinality`.
    pub fn is_nullable(&self) -> bool {
        match self {
            TypeDescriptor::Nullable(_) => true,
            TypeDescriptor::LowCardinality(inner) => inner.is_nullable(),
            _ => false,
        }
    }

    /// Strips `LowCardinality` and `SimpleAggregateFunction` wrappers, which
    /// do not change the row encoding.
    pub fn transparent(&self) -> &TypeDescriptor {
        match self {
            TypeDescriptor::LowCardinality(inner) => inner.transparent(),
            TypeDescriptor::SimpleAggregateFunction { inner, .. } => inner.transparent(),
            other => other,
        }
    }

    /// Geo types expressed in terms of tuples and arrays, `None` otherwise.
    pub fn geo_expansion(&self) -> Option<&'static TypeDescriptor> {
        match self {
            TypeDescriptor::Point => Some(&*GEO_POINT),
            TypeDescriptor::Ring | TypeDescriptor::LineString => Some(&*GEO_RING),
            TypeDescriptor::Polygon | TypeDescriptor::MultiLineString => Some(&*GEO_POLYGON),
            TypeDescriptor::MultiPolygon => Some(&*GEO_MULTI_POLYGON),
            _ => None,
        }
    }

    /// For a decimal column, the width of its unscaled integer.
    pub fn decimal_width(&self) -> Option<DecimalWidth> {
        match self {
            TypeDescriptor::Decimal { precision, .. } => {
                Some(DecimalWidth::for_precision(*precision))
            }
            _ => None,
        }
    }

    /// Number of bytes every value of this type occupies, or `None` for
    /// variable-length types.
    pub fn fixed_width(&self) -> Option<usize> {
        use TypeDescriptor as T;
        Some(match self {
            T::Int8 | T::UInt8 | T::Bool => 1,
            T::Int16 | T::UInt16 | T::Date => 2,
            T::Int32 | T::UInt32 | T::Float32 | T::Date32 | T::DateTime(_) | T::IPv4 => 4,
            T::Int64 | T::UInt64 | T::Float64 | T::DateTime64 { .. } | T::Interval(_) => 8,
            T::Int128 | T::UInt128 | T::Uuid | T::IPv6 => 16,
            T::Int256 | T::UInt256 => 32,
            T::Point => 16,
            T::Enum8(_) => 1,
            T::Enum16(_) => 2,
            T::Nothing => 0,
            T::Decimal { precision, .. } => DecimalWidth::for_precision(*precision).bytes(),
            T::FixedString(n) => *n,
            T::LowCardinality(inner) | T::SimpleAggregateFunction { inner, .. } => {
                return inner.fixed_width()
            }
            T::Tuple { fields, .. } => {
                let mut total = 0;
                for field in fields {
                    total += field.ty.fixed_width()?;
                }
                total
            }
            _ => return None,
        })
    }

    /// Indices into the declared alternatives of a `Variant`, in the order the
    /// server assigns discriminators: sorted by canonical type name.
    pub fn variant_wire_order(alternatives: &[TypeDescriptor]) -> Vec<usize> {
        let mut order: Vec<(String, usize)> = alternatives
            .iter()
            .enumerate()
            .map(|(ix, ty)| (ty.to_string(), ix))
            .collect();
        order.sort();
        order.into_iter().map(|(_, ix)| ix).collect()
    }
}

fn write_list<T: Display>(f: &mut Formatter<'_>, items: &[T]) -> std::fmt::Result {
    for (ix, item) in items.iter().enumerate() {
        if ix > 0 {
            f.write_str(", ")?;
        }
        Display::fmt(item, f)?;
    }
    Ok(())
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use TypeDescriptor as T;
        match self {
            T::Int8 => f.write_str("Int8"),
            T::Int16 => f.write_str("Int16"),
            T::Int32 => f.write_str("Int32"),
            T::Int64 => f.write_str("Int64"),
            T::Int128 => f.write_str("Int128"),
            T::Int256 => f.write_str("Int256"),
            T::UInt8 => f.write_str("UInt8"),
            T::UInt16 => f.write_str("UInt16"),
            T::UInt32 => f.write_str("UInt32"),
            T::UInt64 => f.write_str("UInt64"),
            T::UInt128 => f.write_str("UInt128"),
            T::UInt256 => f.write_str("UInt256"),
            T::Float32 => f.write_str("Float32"),
            T::Float64 => f.write_str("Float64"),
            T::Bool => f.write_str("Bool"),
            T::Decimal { precision, scale } => write!(f, "Decimal({precision}, {scale})"),
            T::String => f.write_str("String"),
            T::FixedString(n) => write!(f, "FixedString({n})"),
            T::Date => f.write_str("Date"),
            T::Date32 => f.write_str("Date32"),
            T::DateTime(None) => f.write_str("DateTime"),
            T::DateTime(Some(tz)) => write!(f, "DateTime('{}')", tz.name()),
            T::DateTime64 {
                scale,
                timezone: None,
            } => write!(f, "DateTime64({scale})"),
            T::DateTime64 {
                scale,
                timezone: Some(tz),
            } => write!(f, "DateTime64({scale}, '{}')", tz.name()),
            T::Uuid => f.write_str("UUID"),
            T::IPv4 => f.write_str("IPv4"),
            T::IPv6 => f.write_str("IPv6"),
            T::Enum8(table) => write!(f, "Enum8({table})"),
            T::Enum16(table) => write!(f, "Enum16({table})"),
            T::Interval(unit) => write!(f, "Interval{}", unit.as_str()),
            T::Point => f.write_str("Point"),
            T::Ring => f.write_str("Ring"),
            T::LineString => f.write_str("LineString"),
            T::Polygon => f.write_str("Polygon"),
            T::MultiLineString => f.write_str("MultiLineString"),
            T::MultiPolygon => f.write_str("MultiPolygon"),
            T::Nothing => f.write_str("Nothing"),
            T::Nullable(inner) => write!(f, "Nullable({inner})"),
            T::LowCardinality(inner) => write!(f, "LowCardinality({inner})"),
            T::Array(inner) => write!(f, "Array({inner})"),
            T::Map(key, value) => write!(f, "Map({key}, {value})"),
            T::Tuple { fields, named } => {
                f.write_str("Tuple(")?;
                if *named {
                    write_list(f, fields)?;
                } else {
                    let members: Vec<&TypeDescriptor> = fields.iter().map(|fd| &fd.ty).collect();
                    write_list(f, &members)?;
                }
                f.write_str(")")
            }
            T::Nested(fields) => {
                f.write_str("Nested(")?;
                write_list(f, fields)?;
                f.write_str(")")
            }
            T::SimpleAggregateFunction { function, inner } => {
                write!(f, "SimpleAggregateFunction({function}, {inner})")
            }
            T::Variant(alternatives) => {
                f.write_str("Variant(")?;
                write_list(f, alternatives)?;
                f.write_str(")")
            }
        }
    }
}

impl FromStr for TypeDescriptor {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
