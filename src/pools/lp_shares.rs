//! LP share balances per `(pool, account)`.

use std::collections::BTreeMap;

use crate::domain::{AccountId, Amount, PoolId};
use crate::error::DexError;
use crate::math::CheckedArithmetic;

/// Holdings of every pool's LP share token.
///
/// Shares staked in a farm are debited here and held by the farm until
/// unstaked.
#[derive(Debug, Default)]
pub struct LpShareBook {
    balances: BTreeMap<(PoolId, AccountId), Amount>,
}

impl LpShareBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shares of `pool` held by `owner`.
    pub fn balance(&self, pool: PoolId, owner: &AccountId) -> Amount {
        self.balances
            .get(&(pool, owner.clone()))
            .copied()
            .unwrap_or_default()
    }

    /// Fails unless `owner` holds at least `amount` shares of `pool`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InsufficientBalance`] naming the LP asset.
    pub fn ensure_covers(&self, pool: PoolId, owner: &AccountId, amount: Amount) -> Result<(), DexError> {
        let available = self.balance(pool, owner);
        if available < amount {
            return Err(DexError::InsufficientBalance {
                holder: owner.to_string(),
                asset: format!("lp:{pool}"),
                requested: amount,
                available,
            });
        }
        Ok(())
    }

    /// Adds shares to `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Overflow`] if the balance does not fit.
    pub fn credit(&mut self, pool: PoolId, owner: &AccountId, amount: Amount) -> Result<(), DexError> {
        let updated = self.balance(pool, owner).safe_add(&amount)?;
        self.balances.insert((pool, owner.clone()), updated);
        Ok(())
    }

    /// Removes shares from `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InsufficientBalance`] if `owner` holds fewer.
    pub fn debit(&mut self, pool: PoolId, owner: &AccountId, amount: Amount) -> Result<(), DexError> {
        self.ensure_covers(pool, owner, amount)?;
        let updated = self.balance(pool, owner).saturating_sub(&amount);
        self.balances.insert((pool, owner.clone()), updated);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn alice() -> AccountId {
        let Ok(a) = AccountId::new("0x01") else {
            panic!("valid address");
        };
        a
    }

    #[test]
    fn credit_then_debit() {
        let mut book = LpShareBook::new();
        let pool = PoolId::new(0);
        let Ok(()) = book.credit(pool, &alice(), Amount::ONE) else {
            panic!("expected Ok");
        };
        let Ok(()) = book.debit(pool, &alice(), Amount::from_raw(25_000_000)) else {
            panic!("expected Ok");
        };
        assert_eq!(book.balance(pool, &alice()), Amount::from_raw(75_000_000));
        assert_eq!(book.balance(PoolId::new(1), &alice()), Amount::ZERO);
    }

    #[test]
    fn overdraw_names_lp_asset() {
        let mut book = LpShareBook::new();
        let result = book.debit(PoolId::new(3), &alice(), Amount::ONE);
        let Err(DexError::InsufficientBalance { asset, .. }) = result else {
            panic!("expected InsufficientBalance");
        };
        assert_eq!(asset, "lp:3");
    }
}
