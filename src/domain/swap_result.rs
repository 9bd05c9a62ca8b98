//! Outcome of a fee-split swap.

use core::fmt;

use super::{Amount, Side};
use crate::error::DexError;

/// The amounts moved by one swap.
///
/// The input is split three ways: the DAO fee goes to the treasury, the
/// LP fee stays in the pool without moving the price, and the remainder
/// (`amount_in_after_fee`) is priced by the constant-product formula.
///
/// # Invariants
///
/// - `amount_in > 0` and `amount_out > 0`.
/// - `dao_fee + lp_fee < amount_in`.
///
/// # Examples
///
/// ```
/// use hydra_dex::domain::{Amount, Side, SwapResult};
///
/// let r = SwapResult::new(
///     Side::AToB,
///     Amount::from_raw(1_000),
///     Amount::from_raw(2),
///     Amount::from_raw(3),
///     Amount::from_raw(990),
/// )
/// .expect("valid result");
/// assert_eq!(r.amount_in_after_fee(), Amount::from_raw(995));
/// assert_eq!(r.pool_deposit(), Amount::from_raw(998));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SwapResult {
    side: Side,
    amount_in: Amount,
    dao_fee: Amount,
    lp_fee: Amount,
    amount_out: Amount,
}

impl SwapResult {
    /// Creates a new `SwapResult` with validated invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidAmount`] if either amount is zero or the
    /// fees consume the whole input.
    pub const fn new(
        side: Side,
        amount_in: Amount,
        dao_fee: Amount,
        lp_fee: Amount,
        amount_out: Amount,
    ) -> Result<Self, DexError> {
        if amount_in.is_zero() {
            return Err(DexError::InvalidAmount("swap input must be positive"));
        }
        if amount_out.is_zero() {
            return Err(DexError::InvalidAmount("swap output rounds to zero"));
        }
        match dao_fee.checked_add(&lp_fee) {
            Some(fees) if fees.raw() < amount_in.raw() => {}
            _ => return Err(DexError::InvalidAmount("fees must be less than the swap input")),
        }
        Ok(Self {
            side,
            amount_in,
            dao_fee,
            lp_fee,
            amount_out,
        })
    }

    /// Returns the swap direction.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Returns the gross input amount.
    pub const fn amount_in(&self) -> Amount {
        self.amount_in
    }

    /// Returns the fee routed to the treasury.
    pub const fn dao_fee(&self) -> Amount {
        self.dao_fee
    }

    /// Returns the fee retained by the pool.
    pub const fn lp_fee(&self) -> Amount {
        self.lp_fee
    }

    /// Returns the input priced by the curve: `amount_in - dao_fee - lp_fee`.
    pub const fn amount_in_after_fee(&self) -> Amount {
        Amount::from_raw(self.amount_in.raw() - self.dao_fee.raw() - self.lp_fee.raw())
    }

    /// Returns what the pool's input reserve grows by: `amount_in - dao_fee`.
    pub const fn pool_deposit(&self) -> Amount {
        Amount::from_raw(self.amount_in.raw() - self.dao_fee.raw())
    }

    /// Returns the output amount.
    pub const fn amount_out(&self) -> Amount {
        self.amount_out
    }

    /// Returns `(token_a_amount, token_b_amount)` as reported in trade
    /// events: the priced input on the input side, the output on the other.
    pub const fn trade_amounts(&self) -> (Amount, Amount) {
        match self.side {
            Side::AToB => (self.amount_in_after_fee(), self.amount_out),
            Side::BToA => (self.amount_out, self.amount_in_after_fee()),
        }
    }
}

impl fmt::Display for SwapResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SwapResult(side={}, in={}, dao_fee={}, lp_fee={}, out={})",
            self.side.code(),
            self.amount_in,
            self.dao_fee,
            self.lp_fee,
            self.amount_out
        )
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn raw(v: u64) -> Amount {
        Amount::from_raw(v)
    }

    #[test]
    fn valid_result() {
        let Ok(r) = SwapResult::new(Side::BToA, raw(1_000), raw(2), raw(3), raw(400)) else {
            panic!("expected Ok");
        };
        assert_eq!(r.amount_in_after_fee(), raw(995));
        assert_eq!(r.trade_amounts(), (raw(400), raw(995)));
    }

    #[test]
    fn zero_fees_allowed() {
        assert!(SwapResult::new(Side::AToB, raw(10), Amount::ZERO, Amount::ZERO, raw(9)).is_ok());
    }

    #[test]
    fn zero_output_rejected() {
        let r = SwapResult::new(Side::AToB, raw(10), raw(1), raw(1), Amount::ZERO);
        assert!(matches!(r, Err(DexError::InvalidAmount(_))));
    }

    #[test]
    fn fees_consuming_input_rejected() {
        let r = SwapResult::new(Side::AToB, raw(10), raw(5), raw(5), raw(1));
        assert!(matches!(r, Err(DexError::InvalidAmount(_))));
    }

    #[test]
    fn display() {
        let Ok(r) = SwapResult::new(Side::AToB, raw(100), raw(1), raw(1), raw(50)) else {
            panic!("expected Ok");
        };
        assert!(r.to_string().starts_with("SwapResult(side=1"));
    }
}
