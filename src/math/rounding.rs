//! Integer helpers behind the fixed-point types.
//!
//! [`div_round`] performs `u128` division with an explicit [`Rounding`]
//! direction and [`isqrt`] computes a floored square root. Both operate on
//! raw `10^-8` units, so they are the building blocks of
//! [`Amount`](crate::domain::Amount) arithmetic.
//!
//! # Convention
//!
//! **Always round against the party receiving value:**
//!
//! | Quantity | Direction |
//! |----------|-----------|
//! | Swap output, LP withdrawal | [`Rounding::Down`] |
//! | Required swap input | [`Rounding::Up`] |
//! | Fee amounts | [`Rounding::Down`] |
//! | Pending reward / reward debt | [`Rounding::Down`] / [`Rounding::Up`] |
//!
//! # Examples
//!
//! ```
//! use hydra_dex::domain::Rounding;
//! use hydra_dex::math::{div_round, isqrt};
//!
//! assert_eq!(div_round(10, 3, Rounding::Down), Some(3));
//! assert_eq!(div_round(10, 3, Rounding::Up), Some(4));
//! assert_eq!(div_round(10, 0, Rounding::Down), None);
//! assert_eq!(isqrt(99), 9);
//! ```

use crate::domain::Rounding;

/// Integer division of `u128` values with explicit rounding direction.
///
/// Returns [`None`] if `denominator` is zero.
#[must_use]
pub const fn div_round(numerator: u128, denominator: u128, rounding: Rounding) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let quotient = numerator / denominator;
    match rounding {
        Rounding::Down => Some(quotient),
        // quotient + 1 cannot overflow: a nonzero remainder implies
        // quotient < u128::MAX.
        Rounding::Up if numerator % denominator != 0 => Some(quotient + 1),
        Rounding::Up => Some(quotient),
    }
}

/// Floored integer square root via Newton's method.
#[must_use]
pub const fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    let mut x = n;
    let mut y = x.div_ceil(2);
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- div_round ----------------------------------------------------------

    #[test]
    fn div_by_zero_returns_none() {
        assert_eq!(div_round(100, 0, Rounding::Down), None);
        assert_eq!(div_round(0, 0, Rounding::Up), None);
    }

    #[test]
    fn exact_division_agrees() {
        assert_eq!(div_round(100, 10, Rounding::Down), Some(10));
        assert_eq!(div_round(100, 10, Rounding::Up), Some(10));
    }

    #[test]
    fn remainder_rounds() {
        assert_eq!(div_round(9, 10, Rounding::Down), Some(0));
        assert_eq!(div_round(9, 10, Rounding::Up), Some(1));
    }

    #[test]
    fn max_numerator_round_up() {
        assert_eq!(div_round(u128::MAX, 2, Rounding::Up), Some(u128::MAX / 2 + 1));
        assert_eq!(div_round(u128::MAX, 1, Rounding::Up), Some(u128::MAX));
    }

    // -- isqrt --------------------------------------------------------------

    #[test]
    fn isqrt_small_values() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(3), 1);
        assert_eq!(isqrt(4), 2);
        assert_eq!(isqrt(1_000_000), 1_000);
    }

    #[test]
    fn isqrt_large_value() {
        let r = isqrt(u128::MAX);
        assert!(r * r <= u128::MAX);
        assert_eq!(r, u64::MAX as u128);
    }
}
