//! `Result`-returning arithmetic on [`Amount`].
//!
//! [`CheckedArithmetic`] lifts the `Option`-returning methods of
//! [`Amount`] into [`DexError`] values so engine code can chain them with
//! `?`.

use crate::domain::{Amount, Rounding};
use crate::error::DexError;

/// Fallible arithmetic for fixed-point domain types.
///
/// # Contract
///
/// - **No panics**: all error conditions produce `Err`.
/// - **No saturation**: errors propagate instead.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Overflow`] if the result does not fit.
    fn safe_add(&self, other: &Self) -> Result<Self, DexError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Underflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self, DexError>;

    /// Checked fixed-point multiplication.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Overflow`] if the result does not fit.
    fn safe_mul(&self, other: &Self, rounding: Rounding) -> Result<Self, DexError>;

    /// Checked fixed-point division.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::DivisionByZero`] if `other` is zero and
    /// [`DexError::Overflow`] if the quotient does not fit.
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, DexError>;

    /// Checked `self * numerator / denominator` with one rounding step.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::DivisionByZero`] if `denominator` is zero and
    /// [`DexError::Overflow`] if the result does not fit.
    fn safe_mul_div(
        &self,
        numerator: &Self,
        denominator: &Self,
        rounding: Rounding,
    ) -> Result<Self, DexError>;
}

impl CheckedArithmetic for Amount {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, DexError> {
        self.checked_add(other)
            .ok_or(DexError::Overflow("amount addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, DexError> {
        self.checked_sub(other)
            .ok_or(DexError::Underflow("amount subtraction underflow"))
    }

    #[inline]
    fn safe_mul(&self, other: &Self, rounding: Rounding) -> Result<Self, DexError> {
        self.checked_mul(other, rounding)
            .ok_or(DexError::Overflow("amount multiplication overflow"))
    }

    #[inline]
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self, DexError> {
        if other.is_zero() {
            return Err(DexError::DivisionByZero);
        }
        self.checked_div(other, rounding)
            .ok_or(DexError::Overflow("amount division overflow"))
    }

    #[inline]
    fn safe_mul_div(
        &self,
        numerator: &Self,
        denominator: &Self,
        rounding: Rounding,
    ) -> Result<Self, DexError> {
        if denominator.is_zero() {
            return Err(DexError::DivisionByZero);
        }
        self.mul_div(numerator, denominator, rounding)
            .ok_or(DexError::Overflow("amount mul_div overflow"))
    }
}
