//! Fixed-point token amount with eight fractional digits.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Rounding;
use crate::error::DexError;
use crate::math::div_round;

/// A non-negative decimal quantity with exactly eight fractional digits.
///
/// Internally the value is stored as a raw `u64` count of `10^-8` units,
/// so `Amount::from_raw(150_000_000)` is `1.50000000`. Every quantity in
/// the exchange (reserves, LP shares, fees, stakes, reward accumulators and
/// timestamps) uses this type.
///
/// Arithmetic methods are checked: they return `None` on overflow,
/// underflow, or division by zero instead of panicking. Products and
/// quotients go through a `u128` intermediate and are rounded explicitly.
///
/// # Examples
///
/// ```
/// use hydra_dex::domain::{Amount, Rounding};
///
/// let a: Amount = "100.0".parse().expect("valid amount");
/// let b: Amount = "0.1".parse().expect("valid amount");
/// assert_eq!(a.checked_add(&b).map(|v| v.to_string()).as_deref(), Some("100.10000000"));
/// assert_eq!(
///     a.checked_mul(&b, Rounding::Down).map(|v| v.to_string()).as_deref(),
///     Some("10.00000000")
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[must_use]
pub struct Amount(u64);

impl Amount {
    /// Number of fractional digits.
    pub const DECIMALS: u32 = 8;

    /// Raw units per whole token (`10^8`).
    pub const SCALE: u64 = 100_000_000;

    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Exactly `1.00000000`.
    pub const ONE: Self = Self(Self::SCALE);

    /// Maximum representable amount.
    pub const MAX: Self = Self(u64::MAX);

    /// Creates an amount from raw `10^-8` units.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Creates an amount from a whole number of tokens.
    ///
    /// Returns `None` if `units * 10^8` does not fit.
    #[must_use]
    pub const fn from_units(units: u64) -> Option<Self> {
        match units.checked_mul(Self::SCALE) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Returns the raw `10^-8` unit count.
    #[must_use]
    pub const fn raw(&self) -> u64 {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Addition capped at [`Amount::MAX`].
    pub const fn saturating_add(&self, other: &Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtraction floored at zero.
    pub const fn saturating_sub(&self, other: &Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Fixed-point multiplication `self * other` with explicit rounding.
    ///
    /// Returns `None` if the result does not fit.
    #[must_use]
    pub const fn checked_mul(&self, other: &Self, rounding: Rounding) -> Option<Self> {
        let product = self.0 as u128 * other.0 as u128;
        match div_round(product, Self::SCALE as u128, rounding) {
            Some(v) => narrow(v),
            None => None,
        }
    }

    /// Fixed-point division `self / divisor` with explicit rounding.
    ///
    /// Returns `None` if `divisor` is zero or the result does not fit.
    #[must_use]
    pub const fn checked_div(&self, divisor: &Self, rounding: Rounding) -> Option<Self> {
        let numerator = self.0 as u128 * Self::SCALE as u128;
        match div_round(numerator, divisor.0 as u128, rounding) {
            Some(v) => narrow(v),
            None => None,
        }
    }

    /// Computes `self * numerator / denominator` with a single rounding step.
    ///
    /// This keeps full precision for ratios such as
    /// `reserve * lp_amount / total_supply`.
    #[must_use]
    pub const fn mul_div(
        &self,
        numerator: &Self,
        denominator: &Self,
        rounding: Rounding,
    ) -> Option<Self> {
        let product = self.0 as u128 * numerator.0 as u128;
        match div_round(product, denominator.0 as u128, rounding) {
            Some(v) => narrow(v),
            None => None,
        }
    }

    /// Returns the smaller of two amounts.
    pub const fn min(self, other: Self) -> Self {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }
}

const fn narrow(value: u128) -> Option<Amount> {
    if value > u64::MAX as u128 {
        None
    } else {
        Some(Amount(value as u64))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:08}", self.0 / Self::SCALE, self.0 % Self::SCALE)
    }
}

impl FromStr for Amount {
    type Err = DexError;

    /// Parses `"12"`, `"12.5"` or `"12.50000000"`.
    ///
    /// More than eight fractional digits, signs, exponents and empty
    /// components are rejected rather than silently rounded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DexError::InvalidAmount("malformed integer part"));
        }
        if s.contains('.') && frac.is_empty() {
            return Err(DexError::InvalidAmount("missing fractional digits"));
        }
        if frac.len() > Self::DECIMALS as usize || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DexError::InvalidAmount(
                "at most eight fractional digits are allowed",
            ));
        }

        let units: u64 = whole
            .parse()
            .map_err(|_| DexError::InvalidAmount("integer part out of range"))?;
        let mut frac_raw: u64 = 0;
        for (i, b) in frac.bytes().enumerate() {
            let digit = u64::from(b - b'0');
            frac_raw += digit * 10u64.pow(Self::DECIMALS - 1 - i as u32);
        }

        let whole_raw = units
            .checked_mul(Self::SCALE)
            .ok_or(DexError::Overflow("amount literal too large"))?;
        whole_raw
            .checked_add(frac_raw)
            .map(Self)
            .ok_or(DexError::Overflow("amount literal too large"))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
