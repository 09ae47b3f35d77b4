//! Arbitrary-precision decimal values
//!
//! A [`Decimal`] is an unscaled [`BigInt`] paired with a base-10 scale, so
//! that `Decimal::new(-5, 2)` denotes `-0.05`. Equality is structural: `1.0`
//! at scale 1 and `1` at scale 0 are different values, just as they are
//! different cells of differently-typed columns.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use num_integer::Integer;

use super::error::{ConvError, ConvResult};

/// Largest scale any decimal column can declare.
pub const MAX_SCALE: u8 = 76;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Decimal {
    unscaled: BigInt,
    scale: u8,
}

pub(crate) fn pow10(exp: u32) -> BigInt {
    BigInt::from(10u8).pow(exp)
}

impl Decimal {
    pub fn new(unscaled: impl Into<BigInt>, scale: u8) -> Self {
        Self {
            unscaled: unscaled.into(),
            scale,
        }
    }

    pub const fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    pub const fn scale(&self) -> u8 {
        self.scale
    }

    pub fn into_parts(self) -> (BigInt, u8) {
        (self.unscaled, self.scale)
    }

    /// Re-expresses the value at `scale`, discarding excess fractional
    /// digits (rounding toward zero).
    #[must_use]
    pub fn rescale(&self, scale: u8) -> Self {
        let unscaled = match scale.cmp(&self.scale) {
            Ordering::Equal => self.unscaled.clone(),
            Ordering::Greater => &self.unscaled * pow10(u32::from(scale - self.scale)),
            Ordering::Less => &self.unscaled / pow10(u32::from(self.scale - scale)),
        };
        Self { unscaled, scale }
    }

    /// Returns `true` if the fractional part is zero.
    pub fn is_integral(&self) -> bool {
        self.scale == 0 || self.unscaled.is_multiple_of(&pow10(u32::from(self.scale)))
    }

    /// Integral part, truncated toward zero.
    pub fn trunc(&self) -> BigInt {
        if self.scale == 0 {
            self.unscaled.clone()
        } else {
            &self.unscaled / pow10(u32::from(self.scale))
        }
    }

    /// Number of decimal digits of the unscaled magnitude.
    pub fn digits(&self) -> usize {
        if self.unscaled.sign() == Sign::NoSign {
            0
        } else {
            self.unscaled.magnitude().to_string().len()
        }
    }

    /// Nearest `f64`; precision is lost beyond 17 significant digits.
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }

    /// Exact decimal expansion of the shortest representation of `value`,
    /// truncated at [`MAX_SCALE`] fractional digits.
    pub fn from_f64(value: f64) -> ConvResult<Self> {
        if !value.is_finite() {
            return Err(ConvError::invalid(format!("Float64 {value}"), "Decimal"));
        }
        let (unscaled, scale) = parse_parts(&value.to_string())
            .ok_or_else(|| ConvError::invalid(format!("Float64 {value}"), "Decimal"))?;
        Ok(normalize(unscaled, scale, MAX_SCALE))
    }
}

/// Splits `[+-]digits[.digits][e[+-]digits]` into an unscaled integer and a
/// (possibly negative) scale.
fn parse_parts(s: &str) -> Option<(BigInt, i64)> {
    let (mantissa, exp) = match s.find(['e', 'E']) {
        Some(ix) => (&s[..ix], s[ix + 1..].parse::<i64>().ok()?),
        None => (s, 0),
    };
    let (negative, digits) = match mantissa.as_bytes().first() {
        Some(b'-') => (true, &mantissa[1..]),
        Some(b'+') => (false, &mantissa[1..]),
        _ => (false, mantissa),
    };
    let (int, frac) = digits.split_once('.').unwrap_or((digits, ""));
    if int.is_empty() && frac.is_empty() {
        return None;
    }
    if !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let scale = i64::try_from(frac.len()).ok()?.checked_sub(exp)?;
    // no column holds more than 76 integral digits
    if scale < -i64::from(MAX_SCALE) {
        return None;
    }
    let magnitude: BigInt = format!("{int}{frac}").parse().ok()?;
    Some((if negative { -magnitude } else { magnitude }, scale))
}

/// Brings a scale into `0..=max_scale`, padding negative scales with zeros
/// and truncating digits beyond `max_scale`.
fn normalize(unscaled: BigInt, scale: i64, max_scale: u8) -> Decimal {
    if scale < 0 {
        return Decimal::new(unscaled * pow10(scale.unsigned_abs() as u32), 0);
    }
    let max = i64::from(max_scale);
    if scale > max {
        return Decimal::new(unscaled / pow10((scale - max) as u32), max_scale);
    }
    Decimal::new(unscaled, scale as u8)
}

impl FromStr for Decimal {
    type Err = ConvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConvError::invalid(format!("string '{s}'"), "Decimal");
        let (unscaled, scale) = parse_parts(s.trim()).ok_or_else(invalid)?;
        if scale > i64::from(u8::MAX) {
            return Err(invalid());
        }
        Ok(normalize(unscaled, scale, u8::MAX))
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let digits = self.unscaled.magnitude().to_string();
        let scale = usize::from(self.scale);
        if self.unscaled.sign() == Sign::Minus {
            f.write_str("-")?;
        }
        if scale == 0 {
            f.write_str(&digits)
        } else if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{int}.{frac}")
        } else {
            write!(f, "0.{}{digits}", "0".repeat(scale - digits.len()))
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Decimal {
                fn from(value: $t) -> Self {
                    Self::new(value, 0)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128);

impl From<BigInt> for Decimal {
    fn from(value: BigInt) -> Self {
        Self::new(value, 0)
    }
}
