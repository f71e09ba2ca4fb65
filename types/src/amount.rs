//! Token amount type.
//!
//! Amounts are represented as fixed-point integers (u128) to avoid floating-point drift
//! in the supply invariant. The smallest unit is one micro-token.
//!
//! On the wire an amount is a plain JSON number whenever that number reads back
//! to the same micro-token count. Amounts an f64 cannot carry exactly are
//! written as a decimal string instead (`"9007199254.740993"`). Both forms are
//! accepted on input.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::TypesError;

/// Raw units per whole token.
pub const TOKEN_UNIT: u128 = 1_000_000;

/// A non-negative token amount.
///
/// Internally stored as raw micro-token units (u128) for precision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    pub fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// Convert a decimal token value, rounding to the nearest micro-token.
    ///
    /// Returns `None` for negative, non-finite or out-of-range values.
    pub fn from_tokens(tokens: f64) -> Option<Self> {
        if !tokens.is_finite() || tokens < 0.0 {
            return None;
        }
        let raw = (tokens * TOKEN_UNIT as f64).round();
        if raw >= u128::MAX as f64 {
            return None;
        }
        Some(Self(raw as u128))
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn as_tokens(&self) -> f64 {
        self.0 as f64 / TOKEN_UNIT as f64
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl Add for TokenAmount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for TokenAmount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sum for TokenAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a TokenAmount> for TokenAmount {
    fn sum<I: Iterator<Item = &'a TokenAmount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Exact decimal parse: `"12"`, `"12.5"`, at most six fractional digits.
impl FromStr for TokenAmount {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypesError::UnparsableAmount(s.to_string());
        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || frac.len() > 6 || !digits(whole) || !digits(frac) {
            return Err(invalid());
        }
        let whole: u128 = whole.parse().map_err(|_| invalid())?;
        let frac: u128 = if frac.is_empty() {
            0
        } else {
            format!("{frac:0<6}").parse().map_err(|_| invalid())?
        };
        whole
            .checked_mul(TOKEN_UNIT)
            .and_then(|w| w.checked_add(frac))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tokens = self.as_tokens();
        if Self::from_tokens(tokens) == Some(*self) {
            serializer.serialize_f64(tokens)
        } else {
            serializer.collect_str(self)
        }
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = TokenAmount;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative token amount as a number or decimal string")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<TokenAmount, E> {
        TokenAmount::try_from(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<TokenAmount, E> {
        Ok(TokenAmount(v as u128 * TOKEN_UNIT))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<TokenAmount, E> {
        u64::try_from(v)
            .map_err(|_| E::custom(TypesError::InvalidAmount(v as f64)))
            .and_then(|v| self.visit_u64(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<TokenAmount, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

impl TryFrom<f64> for TokenAmount {
    type Error = TypesError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_tokens(value).ok_or(TypesError::InvalidAmount(value))
    }
}

impl From<TokenAmount> for f64 {
    fn from(amount: TokenAmount) -> Self {
        amount.as_tokens()
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / TOKEN_UNIT;
        let frac = self.0 % TOKEN_UNIT;
        if frac == 0 {
            write!(f, "{whole}")
        } else {
            let digits = format!("{frac:06}");
            write!(f, "{whole}.{}", digits.trim_end_matches('0'))
        }
    }
}
