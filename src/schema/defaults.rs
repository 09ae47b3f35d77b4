//! Static tables consulted by the type parser
//!
//! * canonical type names, matched case-sensitively
//! * SQL-standard and compatibility aliases, matched case-insensitively
//! * precision and scale defaults for types whose parameters may be omitted

use std::collections::{HashMap, HashSet};

/// Precision and scale assumed when a parametric type is written without
/// (some of) its arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeDefaults {
    pub max_precision: u8,
    pub default_scale: u8,
    pub max_scale: u8,
}

/// Largest scale accepted by `DateTime64`.
pub const MAX_DATETIME64_SCALE: u8 = 9;

lazy_static::lazy_static! {
    pub static ref CANONICAL_NAMES: HashSet<&'static str> = [
        "Int8", "Int16", "Int32", "Int64", "Int128", "Int256",
        "UInt8", "UInt16", "UInt32", "UInt64", "UInt128", "UInt256",
        "Float32", "Float64", "Bool",
        "Decimal", "Decimal32", "Decimal64", "Decimal128", "Decimal256",
        "String", "FixedString",
        "Date", "Date32", "DateTime", "DateTime32", "DateTime64",
        "UUID", "IPv4", "IPv6",
        "Enum", "Enum8", "Enum16",
        "IntervalYear", "IntervalQuarter", "IntervalMonth", "IntervalWeek",
        "IntervalDay", "IntervalHour", "IntervalMinute", "IntervalSecond",
        "IntervalMillisecond", "IntervalMicrosecond", "IntervalNanosecond",
        "Point", "Ring", "LineString", "Polygon", "MultiLineString", "MultiPolygon",
        "Nothing", "Nullable", "LowCardinality", "Array", "Map", "Tuple", "Nested",
        "SimpleAggregateFunction", "AggregateFunction", "Variant",
        "JSON", "Object", "Dynamic",
    ]
    .into_iter()
    .collect();

    /// Upper-cased alias to canonical name.
    pub static ref ALIASES: HashMap<&'static str, &'static str> = {
        let groups: &[(&'static str, &[&'static str])] = &[
            ("Bool", &["BOOL", "BOOLEAN"]),
            ("Int8", &["BYTE", "INT1", "INT1 SIGNED", "TINYINT", "TINYINT SIGNED"]),
            ("UInt8", &["INT1 UNSIGNED", "TINYINT UNSIGNED"]),
            ("Int16", &["SMALLINT", "SMALLINT SIGNED"]),
            ("UInt16", &["SMALLINT UNSIGNED", "YEAR"]),
            ("Int32", &["INT", "INT SIGNED", "INTEGER", "INTEGER SIGNED", "MEDIUMINT", "MEDIUMINT SIGNED"]),
            ("UInt32", &["INT UNSIGNED", "INTEGER UNSIGNED", "MEDIUMINT UNSIGNED"]),
            ("Int64", &["BIGINT", "BIGINT SIGNED", "TIME"]),
            ("UInt64", &["BIGINT UNSIGNED", "BIT", "SET"]),
            ("Float32", &["FLOAT", "REAL", "SINGLE"]),
            ("Float64", &["DOUBLE", "DOUBLE PRECISION"]),
            ("Decimal", &["DECIMAL", "DEC", "FIXED", "NUMERIC"]),
            ("Decimal32", &["DECIMAL32"]),
            ("Decimal64", &["DECIMAL64"]),
            ("Decimal128", &["DECIMAL128"]),
            ("Decimal256", &["DECIMAL256"]),
            ("Date", &["DATE"]),
            ("Date32", &["DATE32"]),
            ("DateTime", &["DATETIME", "TIMESTAMP"]),
            ("DateTime32", &["DATETIME32"]),
            ("DateTime64", &["DATETIME64"]),
            ("Enum8", &["ENUM"]),
            ("FixedString", &["BINARY"]),
            ("IPv4", &["INET4"]),
            ("IPv6", &["INET6"]),
            ("String", &[
                "BINARY LARGE OBJECT", "BINARY VARYING", "BLOB", "BYTEA", "CHAR",
                "CHAR LARGE OBJECT", "CHAR VARYING", "CHARACTER", "CHARACTER LARGE OBJECT",
                "CHARACTER VARYING", "CLOB", "GEOMETRY", "LONGBLOB", "LONGTEXT", "MEDIUMBLOB",
                "MEDIUMTEXT", "NATIONAL CHAR", "NATIONAL CHAR VARYING", "NATIONAL CHARACTER",
                "NATIONAL CHARACTER LARGE OBJECT", "NATIONAL CHARACTER VARYING", "NCHAR",
                "NCHAR LARGE OBJECT", "NCHAR VARYING", "NVARCHAR", "TEXT", "TINYBLOB",
                "TINYTEXT", "VARBINARY", "VARCHAR", "VARCHAR2",
            ]),
        ];
        groups
            .iter()
            .flat_map(|(canonical, aliases)| aliases.iter().map(move |alias| (*alias, *canonical)))
            .collect()
    };

    pub static ref DEFAULTS: HashMap<&'static str, TypeDefaults> = [
        ("Decimal", TypeDefaults { max_precision: 76, default_scale: 0, max_scale: 76 }),
        ("Decimal32", TypeDefaults { max_precision: 9, default_scale: 0, max_scale: 9 }),
        ("Decimal64", TypeDefaults { max_precision: 18, default_scale: 0, max_scale: 18 }),
        ("Decimal128", TypeDefaults { max_precision: 38, default_scale: 0, max_scale: 38 }),
        ("Decimal256", TypeDefaults { max_precision: 76, default_scale: 0, max_scale: 76 }),
        ("DateTime64", TypeDefaults { max_precision: 0, default_scale: 3, max_scale: MAX_DATETIME64_SCALE }),
    ]
    .into_iter()
    .collect();
}

/// Resolves a (whitespace-normalized) type name to its canonical spelling.
///
/// Canonical names are matched exactly; aliases ignore case.
pub fn resolve_name(name: &str) -> Option<&'static str> {
    if let Some(canonical) = CANONICAL_NAMES.get(name) {
        return Some(*canonical);
    }
    ALIASES.get(name.to_ascii_uppercase().as_str()).copied()
}
