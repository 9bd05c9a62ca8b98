//! Fee fractions applied to swap inputs.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, Rounding};
use crate::error::DexError;

/// A fee expressed as a fraction of the input amount, `0 <= rate <= 1`.
///
/// `FeeRate::new("0.0025")` is a 0.25% fee. Applying a rate floors to the
/// eighth decimal.
///
/// # Examples
///
/// ```
/// use hydra_dex::domain::{Amount, FeeRate};
///
/// let fee = FeeRate::parse("0.0025").expect("valid fee");
/// let amount: Amount = "0.1".parse().expect("valid amount");
/// assert_eq!(fee.apply(amount).expect("no overflow").to_string(), "0.00025000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Amount", into = "Amount")]
pub struct FeeRate(Amount);

impl FeeRate {
    /// No fee.
    pub const ZERO: Self = Self(Amount::ZERO);

    /// 0.25%, the default for both the DAO and the LP fee.
    pub const DEFAULT: Self = Self(Amount::from_raw(250_000));

    /// Creates a fee rate from a fraction.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidFee`] if `fraction > 1`.
    pub const fn new(fraction: Amount) -> Result<Self, DexError> {
        if fraction.raw() > Amount::ONE.raw() {
            return Err(DexError::InvalidFee("fee fraction must not exceed 1.0"));
        }
        Ok(Self(fraction))
    }

    /// Parses a decimal fraction such as `"0.003"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the literal is not a valid [`Amount`] or exceeds `1.0`.
    pub fn parse(fraction: &str) -> Result<Self, DexError> {
        Self::new(fraction.parse()?)
    }

    /// Returns the fraction.
    pub const fn fraction(&self) -> Amount {
        self.0
    }

    /// Computes `amount * rate`, floored.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Overflow`] if the product does not fit.
    pub fn apply(&self, amount: Amount) -> Result<Amount, DexError> {
        amount
            .checked_mul(&self.0, Rounding::Down)
            .ok_or(DexError::Overflow("fee application overflow"))
    }

    /// Sum of two rates, rejected when it exceeds `1.0`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidFee`] if the combined fraction exceeds `1.0`.
    pub fn combined(&self, other: &Self) -> Result<Self, DexError> {
        let sum = self
            .0
            .checked_add(&other.0)
            .ok_or(DexError::InvalidFee("combined fee overflow"))?;
        Self::new(sum)
    }
}

impl TryFrom<Amount> for FeeRate {
    type Error = DexError;

    fn try_from(fraction: Amount) -> Result<Self, Self::Error> {
        Self::new(fraction)
    }
}

impl From<FeeRate> for Amount {
    fn from(rate: FeeRate) -> Self {
        rate.0
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
