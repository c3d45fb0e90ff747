//! Exact Rupiah amounts and the parser that turns user or backend input into
//! them.
//!
//! Rupiah has no subdivision in practice, so one minor unit is one Rupiah and
//! amounts are plain `u64` counts. Arithmetic saturates instead of wrapping.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_traits::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::errors::DomainError;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn new(minor_units: u64) -> Self {
        Self(minor_units)
    }

    pub const fn minor_units(self) -> u64 {
        self.0
    }

    pub fn times(self, quantity: u32) -> Money {
        Money(self.0.saturating_mul(u64::from(quantity)))
    }

    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

/// Formats as `Rp 57.000`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }
        write!(f, "Rp {}", grouped)
    }
}

/// A price as it arrives from a form field or a loosely typed API: either a
/// JSON number or a formatted string such as `"Rp 18.000"`.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum MoneyInput {
    Whole(u64),
    Number(f64),
    Text(String),
}

impl From<u64> for MoneyInput {
    fn from(value: u64) -> Self {
        MoneyInput::Whole(value)
    }
}

impl From<&str> for MoneyInput {
    fn from(value: &str) -> Self {
        MoneyInput::Text(value.to_string())
    }
}

pub fn parse_money(input: &MoneyInput) -> Result<Money, DomainError> {
    match input {
        MoneyInput::Whole(value) => Ok(Money(*value)),
        MoneyInput::Number(value) => parse_number(*value),
        MoneyInput::Text(raw) => parse_text(raw),
    }
}

/// Serde adapter for fields that may hold either a number or a formatted
/// price string.
pub fn deserialize_money<'de, D>(deserializer: D) -> Result<Money, D::Error>
where
    D: Deserializer<'de>,
{
    let input = MoneyInput::deserialize(deserializer)?;
    parse_money(&input).map_err(serde::de::Error::custom)
}

fn parse_number(value: f64) -> Result<Money, DomainError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::InvalidAmount(value.to_string()));
    }
    BigDecimal::from_f64(value)
        .and_then(|decimal| round_to_minor(&decimal))
        .ok_or_else(|| DomainError::InvalidAmount(value.to_string()))
}

fn parse_text(raw: &str) -> Result<Money, DomainError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return Ok(Money::ZERO);
    }

    let normalized =
        normalize_separators(&cleaned).ok_or_else(|| DomainError::InvalidAmount(raw.to_string()))?;
    let decimal = BigDecimal::from_str(&normalized)
        .map_err(|e| DomainError::InvalidAmount(format!("'{}': {}", raw, e)))?;

    round_to_minor(&decimal).ok_or_else(|| DomainError::InvalidAmount(raw.to_string()))
}

/// Rewrites a digits-and-separators string into plain `123.45` notation.
///
/// Returns `None` when more than one decimal separator would remain.
fn normalize_separators(cleaned: &str) -> Option<String> {
    let decimal = decimal_separator(cleaned);

    let mut int_part = String::new();
    let mut frac_part = String::new();
    let mut seen_decimal = false;
    for c in cleaned.chars() {
        if Some(c) == decimal {
            if seen_decimal {
                return None;
            }
            seen_decimal = true;
        } else if c.is_ascii_digit() {
            if seen_decimal {
                frac_part.push(c);
            } else {
                int_part.push(c);
            }
        }
    }

    if int_part.is_empty() {
        int_part.push('0');
    }
    if frac_part.is_empty() {
        Some(int_part)
    } else {
        Some(format!("{}.{}", int_part, frac_part))
    }
}

/// Decides which separator, if any, marks the decimal point.
fn decimal_separator(cleaned: &str) -> Option<char> {
    let dots = cleaned.matches('.').count();
    let commas = cleaned.matches(',').count();

    match (dots, commas) {
        (0, 0) => None,
        (_, 0) => lone_separator_role(cleaned, '.', dots),
        (0, _) => lone_separator_role(cleaned, ',', commas),
        _ => cleaned
            .rfind(|c: char| c == '.' || c == ',')
            .and_then(|i| cleaned[i..].chars().next()),
    }
}

/// A single separator groups thousands only when it reads like `57.000`: a
/// leading group of one to three digits not starting with `0`, then exactly
/// three digits. `0.125` and `12345.678` are decimals.
fn lone_separator_role(cleaned: &str, separator: char, count: usize) -> Option<char> {
    if count > 1 {
        return None;
    }
    let (head, tail) = cleaned.split_once(separator)?;
    let leading_group = (1..=3).contains(&head.len()) && !head.starts_with('0');
    if leading_group && tail.len() == 3 {
        None
    } else {
        Some(separator)
    }
}

/// Rounds half away from zero to a whole minor unit.
fn round_to_minor(value: &BigDecimal) -> Option<Money> {
    if *value < BigDecimal::from(0) {
        return None;
    }
    let whole = value.with_scale(0);
    let fraction = value.clone() - whole.clone();
    let rounded = if fraction * BigDecimal::from(2) >= BigDecimal::from(1) {
        whole + BigDecimal::from(1)
    } else {
        whole
    };
    rounded.to_u64().map(Money)
}
