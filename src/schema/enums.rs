//! Name-to-code tables of `Enum8`/`Enum16` columns

use std::fmt::{Display, Formatter};

use super::error::{TypeError, TypeResult};
use super::parser::read_quoted;

/// Ordered `(name, code)` pairs of an enum column.
///
/// Codes are stored as `i16`; for `Enum8` columns every code fits in an `i8`,
/// which the parser checks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct EnumTable {
    entries: Vec<(String, i16)>,
}

impl EnumTable {
    /// Builds a table from explicit pairs.
    ///
    /// # Errors
    ///
    /// Duplicate names or duplicate codes.
    pub fn new<S: Into<String>>(pairs: impl IntoIterator<Item = (S, i16)>) -> TypeResult<Self> {
        let mut entries: Vec<(String, i16)> = Vec::new();
        for (name, code) in pairs {
            let name = name.into();
            if entries.iter().any(|(n, c)| *n == name || *c == code) {
                return Err(TypeError::malformed(
                    &name,
                    format!("duplicate enum entry '{name}' = {code}"),
                ));
            }
            entries.push((name, code));
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[(String, i16)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn name_of(&self, code: i16) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(n, _)| n.as_str())
    }

    pub fn code_of(&self, name: &str) -> Option<i16> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, c)| *c)
    }

    /// Parses the argument list of `Enum8(...)`/`Enum16(...)`.
    ///
    /// Each argument is `'name' = code` or a bare `'name'`; bare names are
    /// numbered consecutively, starting at 1 or after the preceding code.
    pub(crate) fn parse(input: &str, args: &[&str], min: i16, max: i16) -> TypeResult<Self> {
        if args.is_empty() {
            return Err(TypeError::malformed(input, "enum without values"));
        }
        let mut pairs = Vec::with_capacity(args.len());
        let mut next: i32 = 1;
        for arg in args {
            let (name, rest) = read_quoted(arg.trim_start())
                .ok_or_else(|| TypeError::malformed(input, format!("expected quoted enum name in `{arg}`")))?;
            let rest = rest.trim();
            let code: i32 = if rest.is_empty() {
                next
            } else {
                let digits = rest
                    .strip_prefix('=')
                    .ok_or_else(|| TypeError::malformed(input, format!("expected `=` after '{name}'")))?
                    .trim();
                digits
                    .parse()
                    .map_err(|_| TypeError::malformed(input, format!("invalid enum code `{digits}`")))?
            };
            if code < i32::from(min) || code > i32::from(max) {
                return Err(TypeError::malformed(
                    input,
                    format!("enum code {code} outside [{min}, {max}]"),
                ));
            }
            next = code + 1;
            pairs.push((name, code as i16));
        }
        Self::new(pairs).map_err(|err| match err {
            TypeError::Malformed { reason, .. } => TypeError::malformed(input, reason),
            other => other,
        })
    }
}

/// Writes a single-quoted literal, escaping quotes and backslashes.
pub(crate) fn write_quoted(f: &mut Formatter<'_>, s: &str) -> std::fmt::Result {
    f.write_str("'")?;
    for c in s.chars() {
        match c {
            '\'' => f.write_str("\\'")?,
            '\\' => f.write_str("\\\\")?,
            _ => std::fmt::Write::write_char(f, c)?,
        }
    }
    f.write_str("'")
}

impl Display for EnumTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (ix, (name, code)) in self.entries.iter().enumerate() {
            if ix > 0 {
                f.write_str(", ")?;
            }
            write_quoted(f, name)?;
            write!(f, " = {code}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn explicit_and_implicit_codes() {
        let table =
            EnumTable::parse("e", &["'a' = -1", " 'b'", "'c'=5", "'d'"], -128, 127).unwrap();
        assert_eq!(
            table.entries(),
            &[
                (String::from("a"), -1),
                (String::from("b"), 0),
                (String::from("c"), 5),
                (String::from("d"), 6)
            ]
        );
        assert_eq!(table.name_of(5), Some("c"));
        assert_eq!(table.code_of("a"), Some(-1));
        assert_eq!(table.name_of(42), None);
    }

    #[test]
    fn quoted_names_keep_parens_and_quotes() {
        let table = EnumTable::parse("e", &[r"'x(y' = 1", r"'it\'s' = 2"], -128, 127).unwrap();
        assert_eq!(table.name_of(1), Some("x(y"));
        assert_eq!(table.name_of(2), Some("it's"));
        assert_eq!(table.to_string(), r"'x(y' = 1, 'it\'s' = 2");
    }

    #[test]
    fn codes_must_fit_width() {
        assert!(EnumTable::parse("e", &["'a' = 128"], -128, 127).is_err());
        assert!(EnumTable::parse("e", &["'a' = 1", "'b' = 1"], -128, 127).is_err());
    }
}
