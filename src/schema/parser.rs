//! Type-string parser
//!
//! The grammar is the one the server prints: a type name, optionally followed
//! by a parenthesized, comma-separated argument list. Depending on the name,
//! arguments are nested types, integers, quoted literals (time zones, enum
//! names), or `name Type` pairs. Splitting the argument list only looks at
//! parentheses and commas outside quoted literals, so enum names such as
//! `'a(b,'` are not mistaken for structure.

use chrono_tz::Tz;

use super::defaults::{resolve_name, DEFAULTS, MAX_DATETIME64_SCALE};
use super::enums::EnumTable;
use super::error::{TypeError, TypeResult};
use super::{Field, IntervalUnit, TypeDescriptor};

/// Parses a type string such as `Array(Nullable(Decimal64(4)))`.
///
/// # Errors
///
/// [`TypeError::Malformed`] for unbalanced parentheses, bad arguments, or
/// trailing text; [`TypeError::Unknown`] for names that resolve to no type.
pub fn parse(text: &str) -> TypeResult<TypeDescriptor> {
    parse_type(text)
}

/// Parses a column list such as ``a UInt8, `b c` Nullable(String)``.
pub fn parse_columns(text: &str) -> TypeResult<Vec<Field>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    split_args(text, text)?
        .into_iter()
        .map(parse_field)
        .collect()
}

/// Reads a literal quoted with `'`, `"` or `` ` `` from the start of `s`,
/// returning its unescaped contents and the text after the closing quote.
///
/// Both backslash escapes and doubled quotes are understood.
pub(crate) fn read_quoted(s: &str) -> Option<(String, &str)> {
    let mut chars = s.char_indices();
    let (_, quote) = chars.next()?;
    if !matches!(quote, '\'' | '"' | '`') {
        return None;
    }
    let mut out = String::new();
    while let Some((ix, c)) = chars.next() {
        if c == '\\' {
            let (_, escaped) = chars.next()?;
            out.push(match escaped {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                '0' => '\0',
                'b' => '\x08',
                'f' => '\x0c',
                other => other,
            });
        } else if c == quote {
            let rest = &s[ix + c.len_utf8()..];
            if rest.starts_with(quote) {
                out.push(quote);
                chars.next();
            } else {
                return Some((out, rest));
            }
        } else {
            out.push(c);
        }
    }
    None
}

/// Byte offsets and characters of `s` that lie outside quoted literals.
fn structural(input: &str, s: &str) -> TypeResult<Vec<(usize, char)>> {
    let mut out = Vec::new();
    let mut chars = s.char_indices().peekable();
    while let Some((ix, c)) = chars.next() {
        if !matches!(c, '\'' | '"' | '`') {
            out.push((ix, c));
            continue;
        }
        let mut closed = false;
        while let Some((_, d)) = chars.next() {
            if d == '\\' {
                chars.next();
            } else if d == c {
                if matches!(chars.peek(), Some(&(_, e)) if e == c) {
                    chars.next();
                } else {
                    closed = true;
                    break;
                }
            }
        }
        if !closed {
            return Err(TypeError::malformed(input, "unterminated quoted literal"));
        }
    }
    Ok(out)
}

/// Splits `text` into its name and the contents of its outermost
/// parenthesized argument list, if any.
fn split_head(text: &str) -> TypeResult<(&str, Option<&str>)> {
    let chars = structural(text, text)?;
    let open = match chars.iter().find(|(_, c)| matches!(c, '(' | ')')) {
        None => return Ok((text, None)),
        Some(&(_, ')')) => return Err(TypeError::malformed(text, "unbalanced parentheses")),
        Some(&(ix, _)) => ix,
    };
    let mut depth = 0usize;
    for &(ix, c) in chars.iter().filter(|(ix, _)| *ix >= open) {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    if !text[ix + 1..].trim().is_empty() {
                        return Err(TypeError::malformed(
                            text,
                            format!("unexpected trailing text `{}`", text[ix + 1..].trim()),
                        ));
                    }
                    return Ok((&text[..open], Some(&text[open + 1..ix])));
                }
            }
            _ => {}
        }
    }
    Err(TypeError::malformed(text, "unbalanced parentheses"))
}

/// Splits an argument list at its top-level commas.
fn split_args<'a>(input: &str, inner: &'a str) -> TypeResult<Vec<&'a str>> {
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (ix, c) in structural(input, inner)? {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| TypeError::malformed(input, "unbalanced parentheses"))?
            }
            ',' if depth == 0 => {
                args.push(inner[start..ix].trim());
                start = ix + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(TypeError::malformed(input, "unbalanced parentheses"));
    }
    args.push(inner[start..].trim());
    if args.iter().any(|arg| arg.is_empty()) {
        return Err(TypeError::malformed(input, "empty argument"));
    }
    Ok(args)
}

fn parse_type(text: &str) -> TypeResult<TypeDescriptor> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TypeError::malformed(text, "empty type"));
    }
    let (raw_name, inner) = split_head(text)?;
    if !raw_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c.is_ascii_whitespace())
    {
        return Err(TypeError::malformed(text, "invalid character in type name"));
    }
    let name = raw_name.split_ascii_whitespace().collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        return Err(TypeError::malformed(text, "missing type name"));
    }
    let canonical = resolve_name(&name).ok_or(TypeError::Unknown(name.clone()))?;
    let args = match inner {
        Some(inner) => split_args(text, inner)?,
        None => Vec::new(),
    };
    build(text, canonical, canonical != name, &args)
}

fn build(
    text: &str,
    canonical: &'static str,
    via_alias: bool,
    args: &[&str],
) -> TypeResult<TypeDescriptor> {
    use TypeDescriptor as T;

    // SQL aliases such as VARCHAR(255) carry parameters the server ignores
    let plain = |ty: TypeDescriptor| {
        if args.is_empty() || via_alias {
            Ok(ty)
        } else {
            Err(TypeError::malformed(
                text,
                format!("{canonical} takes no parameters"),
            ))
        }
    };
    let one = || match args {
        [arg] => parse_type(arg).map(Box::new),
        _ => Err(TypeError::malformed(
            text,
            format!("{canonical} takes exactly one type argument"),
        )),
    };

    match canonical {
        "Int8" => plain(T::Int8),
        "Int16" => plain(T::Int16),
        "Int32" => plain(T::Int32),
        "Int64" => plain(T::Int64),
        "Int128" => plain(T::Int128),
        "Int256" => plain(T::Int256),
        "UInt8" => plain(T::UInt8),
        "UInt16" => plain(T::UInt16),
        "UInt32" => plain(T::UInt32),
        "UInt64" => plain(T::UInt64),
        "UInt128" => plain(T::UInt128),
        "UInt256" => plain(T::UInt256),
        "Float32" => plain(T::Float32),
        "Float64" => plain(T::Float64),
        "Bool" => plain(T::Bool),
        "String" => plain(T::String),
        "Date" => plain(T::Date),
        "Date32" => plain(T::Date32),
        "UUID" => plain(T::Uuid),
        "IPv4" => plain(T::IPv4),
        "IPv6" => plain(T::IPv6),
        "Nothing" => plain(T::Nothing),
        "Point" => plain(T::Point),
        "Ring" => plain(T::Ring),
        "LineString" => plain(T::LineString),
        "Polygon" => plain(T::Polygon),
        "MultiLineString" => plain(T::MultiLineString),
        "MultiPolygon" => plain(T::MultiPolygon),
        "IntervalNanosecond" => plain(T::Interval(IntervalUnit::Nanosecond)),
        "IntervalMicrosecond" => plain(T::Interval(IntervalUnit::Microsecond)),
        "IntervalMillisecond" => plain(T::Interval(IntervalUnit::Millisecond)),
        "IntervalSecond" => plain(T::Interval(IntervalUnit::Second)),
        "IntervalMinute" => plain(T::Interval(IntervalUnit::Minute)),
        "IntervalHour" => plain(T::Interval(IntervalUnit::Hour)),
        "IntervalDay" => plain(T::Interval(IntervalUnit::Day)),
        "IntervalWeek" => plain(T::Interval(IntervalUnit::Week)),
        "IntervalMonth" => plain(T::Interval(IntervalUnit::Month)),
        "IntervalQuarter" => plain(T::Interval(IntervalUnit::Quarter)),
        "IntervalYear" => plain(T::Interval(IntervalUnit::Year)),
        "FixedString" => match args {
            [len] => match len.parse::<usize>() {
                Ok(n) if n > 0 => Ok(T::FixedString(n)),
                _ => Err(TypeError::malformed(
                    text,
                    format!("invalid FixedString length `{len}`"),
                )),
            },
            _ => Err(TypeError::malformed(
                text,
                "FixedString takes exactly one length argument",
            )),
        },
        "Decimal" | "Decimal32" | "Decimal64" | "Decimal128" | "Decimal256" => {
            decimal(text, canonical, args)
        }
        "DateTime" | "DateTime32" => match args {
            [] => Ok(T::DateTime(None)),
            [tz] => Ok(T::DateTime(Some(timezone(text, tz)?))),
            [scale, tz] if canonical == "DateTime" => Ok(T::DateTime64 {
                scale: datetime64_scale(text, scale)?,
                timezone: Some(timezone(text, tz)?),
            }),
            _ => Err(TypeError::malformed(text, "too many DateTime arguments")),
        },
        "DateTime64" => match args {
            [] => Ok(T::DateTime64 {
                scale: DEFAULTS["DateTime64"].default_scale,
                timezone: None,
            }),
            [scale] => Ok(T::DateTime64 {
                scale: datetime64_scale(text, scale)?,
                timezone: None,
            }),
            [scale, tz] => Ok(T::DateTime64 {
                scale: datetime64_scale(text, scale)?,
                timezone: Some(timezone(text, tz)?),
            }),
            _ => Err(TypeError::malformed(text, "too many DateTime64 arguments")),
        },
        "Enum" | "Enum8" => EnumTable::parse(text, args, i8::MIN.into(), i8::MAX.into()).map(T::Enum8),
        "Enum16" => EnumTable::parse(text, args, i16::MIN, i16::MAX).map(T::Enum16),
        "Nullable" => {
            let inner = one()?;
            let composite = matches!(
                inner.transparent(),
                T::Nullable(_)
                    | T::Array(_)
                    | T::Map(..)
                    | T::Tuple { .. }
                    | T::Nested(_)
                    | T::Variant(_)
            );
            if composite {
                Err(TypeError::malformed(
                    text,
                    format!("{inner} cannot be inside Nullable"),
                ))
            } else {
                Ok(T::Nullable(inner))
            }
        }
        "LowCardinality" => one().map(T::LowCardinality),
        "Array" => one().map(T::Array),
        "Map" => match args {
            [key, value] => Ok(T::Map(
                Box::new(parse_type(key)?),
                Box::new(parse_type(value)?),
            )),
            _ => Err(TypeError::malformed(
                text,
                "Map takes exactly two type arguments",
            )),
        },
        "Tuple" => tuple(text, args),
        "Nested" => {
            if args.is_empty() {
                return Err(TypeError::malformed(text, "Nested without columns"));
            }
            args.iter()
                .map(|arg| parse_field(arg))
                .collect::<TypeResult<Vec<_>>>()
                .map(T::Nested)
        }
        "SimpleAggregateFunction" => match args {
            [function, inner] => Ok(T::SimpleAggregateFunction {
                function: (*function).to_owned(),
                inner: Box::new(parse_type(inner)?),
            }),
            _ => Err(TypeError::malformed(
                text,
                "SimpleAggregateFunction takes a function and a type",
            )),
        },
        "Variant" => {
            if args.is_empty() {
                return Err(TypeError::malformed(text, "Variant without alternatives"));
            }
            if args.len() > 255 {
                return Err(TypeError::malformed(text, "Variant with more than 255 alternatives"));
            }
            args.iter()
                .map(|arg| parse_type(arg))
                .collect::<TypeResult<Vec<_>>>()
                .map(T::Variant)
        }
        // names the server knows but whose row encoding is out of scope
        _ => Err(TypeError::Unknown(text.to_owned())),
    }
}

fn decimal(text: &str, canonical: &'static str, args: &[&str]) -> TypeResult<TypeDescriptor> {
    let defaults = DEFAULTS[canonical];
    let (precision, scale) = match (canonical, args) {
        (_, []) => (defaults.max_precision, defaults.default_scale),
        ("Decimal", [p]) => (decimal_arg(text, p, "precision")?, defaults.default_scale),
        ("Decimal", [p, s]) => (
            decimal_arg(text, p, "precision")?,
            decimal_arg(text, s, "scale")?,
        ),
        (_, [s]) => (defaults.max_precision, decimal_arg(text, s, "scale")?),
        _ => {
            return Err(TypeError::malformed(
                text,
                format!("too many {canonical} arguments"),
            ))
        }
    };
    if precision == 0 || precision > defaults.max_precision {
        return Err(TypeError::malformed(
            text,
            format!(
                "precision {precision} outside [1, {}]",
                defaults.max_precision
            ),
        ));
    }
    if scale > precision || scale > defaults.max_scale {
        return Err(TypeError::malformed(
            text,
            format!("scale {scale} exceeds precision {precision}"),
        ));
    }
    Ok(TypeDescriptor::Decimal { precision, scale })
}

fn decimal_arg(text: &str, arg: &str, what: &str) -> TypeResult<u8> {
    arg.parse::<u8>()
        .map_err(|_| TypeError::malformed(text, format!("invalid decimal {what} `{arg}`")))
}

fn datetime64_scale(text: &str, arg: &str) -> TypeResult<u8> {
    match arg.parse::<u8>() {
        Ok(scale) if scale <= MAX_DATETIME64_SCALE => Ok(scale),
        _ => Err(TypeError::malformed(
            text,
            format!("DateTime64 scale `{arg}` outside [0, {MAX_DATETIME64_SCALE}]"),
        )),
    }
}

fn timezone(text: &str, arg: &str) -> TypeResult<Tz> {
    let name = match read_quoted(arg) {
        Some((name, rest)) if rest.trim().is_empty() => name,
        _ => {
            return Err(TypeError::malformed(
                text,
                format!("time zone `{arg}` must be a quoted literal"),
            ))
        }
    };
    name.parse::<Tz>()
        .map_err(|_| TypeError::malformed(text, format!("unknown time zone '{name}'")))
}

fn tuple(text: &str, args: &[&str]) -> TypeResult<TypeDescriptor> {
    if args.is_empty() {
        return Err(TypeError::malformed(text, "Tuple without members"));
    }
    let mut named: Option<bool> = None;
    let mut fields = Vec::with_capacity(args.len());
    for (ix, arg) in args.iter().enumerate() {
        let (field, is_named) = tuple_member(ix, arg)?;
        if *named.get_or_insert(is_named) != is_named {
            return Err(TypeError::malformed(
                text,
                "Tuple mixes named and unnamed members",
            ));
        }
        fields.push(field);
    }
    Ok(TypeDescriptor::Tuple {
        fields,
        named: named.unwrap_or(false),
    })
}

/// A tuple member is a bare type unless it only parses as `name Type`.
fn tuple_member(ix: usize, arg: &str) -> TypeResult<(Field, bool)> {
    if arg.starts_with(['`', '"']) {
        return parse_field(arg).map(|field| (field, true));
    }
    match parse_type(arg) {
        Ok(ty) => Ok((Field::new((ix + 1).to_string(), ty), false)),
        Err(type_err) => match parse_field(arg) {
            Ok(field) => Ok((field, true)),
            Err(_) => Err(type_err),
        },
    }
}

fn parse_field(seg: &str) -> TypeResult<Field> {
    let seg = seg.trim();
    let (name, rest) = if seg.starts_with(['`', '"']) {
        read_quoted(seg)
            .ok_or_else(|| TypeError::malformed(seg, "unterminated quoted column name"))?
    } else {
        let split = seg
            .find(|c: char| c.is_ascii_whitespace())
            .ok_or_else(|| TypeError::malformed(seg, "expected `name Type`"))?;
        let name = &seg[..split];
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            return Err(TypeError::malformed(seg, format!("invalid column name `{name}`")));
        }
        (name.to_owned(), &seg[split..])
    };
    if name.is_empty() {
        return Err(TypeError::malformed(seg, "empty column name"));
    }
    Ok(Field::new(name, parse_type(rest)?))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;
    use TypeDescriptor as T;

    fn ok(text: &str) -> TypeDescriptor {
        match parse(text) {
            Ok(ty) => ty,
            Err(err) => panic!("{text}: {err}"),
        }
    }

    fn kind(text: &str) -> ErrorKind {
        parse(text).unwrap_err().kind()
    }

    #[test]
    fn nested_wrappers() {
        assert_eq!(
            ok("Array(Nullable(Decimal64(4)))"),
            T::array(T::nullable(T::Decimal {
                precision: 18,
                scale: 4
            }))
        );
        assert_eq!(
            ok("LowCardinality(Nullable(String))"),
            T::LowCardinality(Box::new(T::nullable(T::String)))
        );
        assert_eq!(
            ok("Nullable(LowCardinality(String))"),
            T::nullable(T::LowCardinality(Box::new(T::String)))
        );
        assert_eq!(
            ok("Array(Array(Array(UInt8)))"),
            T::array(T::array(T::array(T::UInt8)))
        );
    }

    #[test]
    fn decimal_defaults() {
        assert_eq!(ok("Decimal"), T::Decimal { precision: 76, scale: 0 });
        assert_eq!(ok("Decimal(10)"), T::Decimal { precision: 10, scale: 0 });
        assert_eq!(ok("Decimal(10, 2)"), T::Decimal { precision: 10, scale: 2 });
        assert_eq!(ok("Decimal32(3)"), T::Decimal { precision: 9, scale: 3 });
        assert_eq!(ok("Decimal128(0)"), T::Decimal { precision: 38, scale: 0 });
        assert_eq!(ok("Decimal256(20)"), T::Decimal { precision: 76, scale: 20 });
        assert_eq!(ok("numeric(5,1)"), T::Decimal { precision: 5, scale: 1 });
        assert_eq!(kind("Decimal32(10)"), ErrorKind::MalformedType);
        assert_eq!(kind("Decimal(77, 0)"), ErrorKind::MalformedType);
        assert_eq!(kind("Decimal(4, 5)"), ErrorKind::MalformedType);
    }

    #[test]
    fn dates_and_zones() {
        assert_eq!(ok("DateTime"), T::DateTime(None));
        assert_eq!(
            ok("DateTime('Europe/Berlin')"),
            T::DateTime(Some(chrono_tz::Europe::Berlin))
        );
        assert_eq!(
            ok("DateTime64"),
            T::DateTime64 {
                scale: 3,
                timezone: None
            }
        );
        assert_eq!(
            ok("DateTime64(6, 'Asia/Tokyo')"),
            T::DateTime64 {
                scale: 6,
                timezone: Some(chrono_tz::Asia::Tokyo)
            }
        );
        assert_eq!(
            ok("DateTime(9, 'UTC')"),
            T::DateTime64 {
                scale: 9,
                timezone: Some(chrono_tz::UTC)
            }
        );
        assert_eq!(ok("DateTime32"), T::DateTime(None));
        assert_eq!(kind("DateTime64(10)"), ErrorKind::MalformedType);
        assert_eq!(kind("DateTime('Mars/Olympus')"), ErrorKind::MalformedType);
        assert_eq!(kind("DateTime(UTC)"), ErrorKind::MalformedType);
    }

    #[test]
    fn enums_with_structural_names() {
        let ty = ok("Enum8('a,b' = 1, 'c)d' = 2, 'e''f' = 3)");
        match ty {
            T::Enum8(table) => {
                assert_eq!(table.name_of(1), Some("a,b"));
                assert_eq!(table.name_of(2), Some("c)d"));
                assert_eq!(table.name_of(3), Some("e'f"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(ok("Enum16('x' = 1000)"), T::Enum16(_)));
        assert_eq!(kind("Enum8('x' = 1000)"), ErrorKind::MalformedType);
    }

    #[test]
    fn composites() {
        assert_eq!(
            ok("Map(String, Array(UInt8))"),
            T::Map(Box::new(T::String), Box::new(T::array(T::UInt8)))
        );
        assert_eq!(ok("Tuple(Int8, String)"), T::tuple([T::Int8, T::String]));
        assert_eq!(
            ok("Tuple(a Int8, `b c` Nullable(String))"),
            T::Tuple {
                fields: vec![
                    Field::new("a", T::Int8),
                    Field::new("b c", T::nullable(T::String))
                ],
                named: true
            }
        );
        assert_eq!(
            ok("Nested(n1 UInt8, n2 Nullable(String), n3 Int16)"),
            T::Nested(vec![
                Field::new("n1", T::UInt8),
                Field::new("n2", T::nullable(T::String)),
                Field::new("n3", T::Int16),
            ])
        );
        assert_eq!(
            ok("SimpleAggregateFunction(anyLast, Nullable(UInt64))"),
            T::SimpleAggregateFunction {
                function: String::from("anyLast"),
                inner: Box::new(T::nullable(T::UInt64))
            }
        );
        assert_eq!(ok("Variant(String, UInt64)"), T::Variant(vec![T::String, T::UInt64]));
    }

    #[test]
    fn aliases_ignore_case() {
        assert_eq!(ok("int unsigned"), T::UInt32);
        assert_eq!(ok("DOUBLE PRECISION"), T::Float64);
        assert_eq!(ok("VARCHAR(255)"), T::String);
        assert_eq!(ok("Tuple(x DOUBLE PRECISION)").to_string(), "Tuple(x Float64)");
        assert_eq!(kind("int32"), ErrorKind::UnknownType);
    }

    #[test]
    fn malformed_input() {
        assert_eq!(kind("Array(Int32"), ErrorKind::MalformedType);
        assert_eq!(kind("Array(Int32))"), ErrorKind::MalformedType);
        assert_eq!(kind("Array(Int32) x"), ErrorKind::MalformedType);
        assert_eq!(kind("Map(String)"), ErrorKind::MalformedType);
        assert_eq!(kind("Nullable(Array(Int8))"), ErrorKind::MalformedType);
        assert_eq!(kind("Tuple(a Int8, String)"), ErrorKind::MalformedType);
        assert_eq!(kind("Int32(3)"), ErrorKind::MalformedType);
        assert_eq!(kind("FixedString"), ErrorKind::MalformedType);
        assert_eq!(kind("Enum8('open = 1)"), ErrorKind::MalformedType);
        assert_eq!(kind(""), ErrorKind::MalformedType);
        assert_eq!(kind("Foo"), ErrorKind::UnknownType);
        assert_eq!(kind("Array(Foo)"), ErrorKind::UnknownType);
        assert_eq!(kind("AggregateFunction(sum, UInt64)"), ErrorKind::UnknownType);
    }

    #[test]
    fn display_round_trips() {
        for text in [
            "Array(Nullable(Decimal(18, 4)))",
            "Map(LowCardinality(String), Tuple(UInt8, Float64))",
            "Tuple(a Int8, `b c` String)",
            "Nested(n1 UInt8, n2 Nullable(String))",
            "Enum8('a' = 1, 'it\\'s' = 2)",
            "DateTime64(3, 'Europe/Berlin')",
            "IntervalSecond",
            "Variant(Array(UInt8), String)",
            "SimpleAggregateFunction(sum, UInt64)",
            "FixedString(16)",
        ] {
            let ty = ok(text);
            assert_eq!(ty.to_string(), text);
            assert_eq!(ok(&ty.to_string()), ty);
        }
    }

    #[test]
    fn column_lists() {
        let cols = parse_columns("a UInt8, `b c` Nullable(String), \"d\" Map(String, String)").unwrap();
        assert_eq!(cols.len(), 3);
        assert_eq!(cols[1], Field::new("b c", T::nullable(T::String)));
        assert_eq!(cols[2].name, "d");
        assert!(parse_columns("").unwrap().is_empty());
        assert!(parse_columns("a").is_err());
    }

    #[test]
    fn quoted_literal_reader() {
        assert_eq!(
            read_quoted(r"'a\'b' = 1"),
            Some((String::from("a'b"), " = 1"))
        );
        assert_eq!(read_quoted("`x``y` T"), Some((String::from("x`y"), " T")));
        assert_eq!(read_quoted("'open"), None);
        assert_eq!(read_quoted("plain"), None);
    }
}
