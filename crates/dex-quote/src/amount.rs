use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AmountError;

/// Rounding applied when a value loses fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Floor,
    Ceil,
    HalfUp,
}

/// Non-negative fixed-point decimal: `units / 10^scale`.
///
/// All quote arithmetic goes through this type so that repeated
/// quote/trade cycles never accumulate floating-point error.
#[derive(Debug, Clone, Default)]
pub struct Decimal {
    units: BigUint,
    scale: u32,
}

pub(crate) fn pow10(exp: u32) -> BigUint {
    BigUint::from(10u32).pow(exp)
}

pub(crate) fn is_zero(n: &BigUint) -> bool {
    n.bits() == 0
}

/// Integer division with an explicit rounding mode.
pub(crate) fn div_round(n: &BigUint, d: &BigUint, rounding: Rounding) -> BigUint {
    let q = n / d;
    let r = n % d;
    if is_zero(&r) {
        return q;
    }
    match rounding {
        Rounding::Floor => q,
        Rounding::Ceil => q + 1u32,
        Rounding::HalfUp => {
            if r * 2u32 >= *d {
                q + 1u32
            } else {
                q
            }
        }
    }
}

impl Decimal {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build a decimal from raw integer units at the given scale.
    pub fn from_units(units: BigUint, scale: u32) -> Self {
        Self { units, scale }
    }

    pub fn units(&self) -> &BigUint {
        &self.units
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        is_zero(&self.units)
    }

    /// Parse a plain decimal string (`"12"`, `"0.5"`, `".5"`, `"5."`).
    ///
    /// Signs, exponents, and separators are rejected.
    pub fn parse(input: &str) -> Result<Self, AmountError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(AmountError::Empty);
        }

        let (int_part, frac_part) = s.split_once('.').unwrap_or((s, ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty())
            || !all_digits(int_part)
            || !all_digits(frac_part)
        {
            return Err(AmountError::Invalid(s.to_string()));
        }

        let digits = format!("{int_part}{frac_part}");
        let units = BigUint::parse_bytes(digits.as_bytes(), 10)
            .ok_or_else(|| AmountError::Invalid(s.to_string()))?;
        let scale =
            u32::try_from(frac_part.len()).map_err(|_| AmountError::Invalid(s.to_string()))?;

        Ok(Self { units, scale })
    }

    /// Exact decimal expansion of a finite, non-negative float.
    pub fn from_f64(value: f64) -> Result<Self, AmountError> {
        if !value.is_finite() || value < 0.0 {
            return Err(AmountError::InvalidPrice(value.to_string()));
        }
        // `Display` for f64 never uses exponent notation.
        Self::parse(&value.to_string())
    }

    /// Change the number of fractional digits, rounding when digits are dropped.
    pub fn rescale(&self, scale: u32, rounding: Rounding) -> Self {
        match scale.cmp(&self.scale) {
            Ordering::Equal => self.clone(),
            Ordering::Greater => Self {
                units: &self.units * pow10(scale - self.scale),
                scale,
            },
            Ordering::Less => Self {
                units: div_round(&self.units, &pow10(self.scale - scale), rounding),
                scale,
            },
        }
    }

    /// Integer chain units at `decimals` precision.
    pub fn to_units(&self, decimals: u32, rounding: Rounding) -> BigUint {
        self.rescale(decimals, rounding).units
    }

    /// Drop trailing fractional zeros.
    pub fn normalized(&self) -> Self {
        let ten = BigUint::from(10u32);
        let mut units = self.units.clone();
        let mut scale = self.scale;
        while scale > 0 && is_zero(&(&units % &ten)) {
            units /= &ten;
            scale -= 1;
        }
        Self { units, scale }
    }

    /// Render with exactly `digits` fractional digits, rounding half-up.
    pub fn to_fixed(&self, digits: u32) -> String {
        let rounded = self.rescale(digits, Rounding::HalfUp);
        render(&rounded.units, digits)
    }

    /// Exact product; the result scale is the sum of both scales.
    pub fn mul_exact(&self, other: &Decimal) -> Decimal {
        Self {
            units: &self.units * &other.units,
            scale: self.scale + other.scale,
        }
    }

    /// Divide by `10^exp` without losing digits.
    pub fn div_pow10(&self, exp: u32) -> Decimal {
        Self {
            units: self.units.clone(),
            scale: self.scale + exp,
        }
    }

    pub fn checked_add(&self, other: &Decimal) -> Decimal {
        let (a, b, scale) = align(self, other);
        Self { units: a + b, scale }
    }

    /// Subtraction; `None` when the result would be negative.
    pub fn checked_sub(&self, other: &Decimal) -> Option<Decimal> {
        let (a, b, scale) = align(self, other);
        if a < b {
            return None;
        }
        Some(Self { units: a - b, scale })
    }

    pub fn saturating_sub(&self, other: &Decimal) -> Decimal {
        self.checked_sub(other).unwrap_or_default()
    }
}

fn align(a: &Decimal, b: &Decimal) -> (BigUint, BigUint, u32) {
    let scale = a.scale.max(b.scale);
    let a_units = &a.units * pow10(scale - a.scale);
    let b_units = &b.units * pow10(scale - b.scale);
    (a_units, b_units, scale)
}

fn render(units: &BigUint, scale: u32) -> String {
    let s = units.to_string();
    let scale = scale as usize;

    if scale == 0 {
        return s;
    }

    if s.len() <= scale {
        let mut result = String::from("0.");
        result.push_str(&"0".repeat(scale - s.len()));
        result.push_str(&s);
        return result;
    }

    let (integer_part, decimal_part) = s.split_at(s.len() - scale);
    format!("{integer_part}.{decimal_part}")
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = align(self, other);
        a.cmp(&b)
    }
}

impl From<u64> for Decimal {
    fn from(value: u64) -> Self {
        Self {
            units: BigUint::from(value),
            scale: 0,
        }
    }
}

impl FromStr for Decimal {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Trimmed rendering: `"7.5"`, `"5"`, `"0"`.
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.normalized();
        f.write_str(&render(&n.units, n.scale))
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Accepts decimal strings and non-negative JSON numbers.
impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DecimalVisitor)
    }
}

struct DecimalVisitor;

impl Visitor<'_> for DecimalVisitor {
    type Value = Decimal;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative decimal string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
        Decimal::parse(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
        u64::try_from(v)
            .map(Decimal::from)
            .map_err(|_| E::custom(format!("negative amount: {v}")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
        Decimal::from_f64(v).map_err(E::custom)
    }
}

/// Clean raw text typed into an amount field.
///
/// Keeps digits and the first decimal point, truncates the fraction to
/// `max_decimals`, and collapses redundant leading zeros. Returns an empty
/// string when nothing numeric remains.
pub fn sanitize_input(input: &str, max_decimals: u32) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return String::new();
    }

    let mut parts = cleaned.split('.');
    let int_part = strip_leading_zeros(parts.next().unwrap_or_default());
    match parts.next() {
        None => int_part,
        Some(frac) => {
            let frac: String = frac.chars().take(max_decimals as usize).collect();
            format!("{int_part}.{frac}")
        }
    }
}

fn strip_leading_zeros(s: &str) -> String {
    let trimmed = s.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
