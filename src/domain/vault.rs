//! Move-only token containers.

use super::{Amount, TokenId};
use crate::error::DexError;

/// A balance of one token type in transit or in custody.
///
/// `Vault` is deliberately not `Clone`: ledger withdrawals create vaults,
/// deposits consume them, and pools, the treasury and reward pools hold
/// them. Tokens can therefore only move, never be duplicated.
///
/// # Examples
///
/// ```
/// use hydra_dex::domain::{Amount, TokenId, Vault};
///
/// let token = TokenId::new("A.1.Alpha").expect("valid id");
/// let mut vault = Vault::new(token, Amount::ONE);
/// let part = vault.split(Amount::from_raw(25_000_000)).expect("enough balance");
/// assert_eq!(part.balance().to_string(), "0.25000000");
/// assert_eq!(vault.balance().to_string(), "0.75000000");
/// ```
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct Vault {
    token: TokenId,
    balance: Amount,
}

impl Vault {
    /// Creates a vault holding `balance` of `token`.
    ///
    /// Only [`Ledger`](crate::traits::Ledger) implementations and the
    /// exchange itself should mint vaults out of thin air.
    pub const fn new(token: TokenId, balance: Amount) -> Self {
        Self { token, balance }
    }

    /// Creates an empty vault for `token`.
    pub const fn empty(token: TokenId) -> Self {
        Self::new(token, Amount::ZERO)
    }

    /// Returns the token type held.
    #[must_use]
    pub const fn token(&self) -> &TokenId {
        &self.token
    }

    /// Returns the balance held.
    pub const fn balance(&self) -> Amount {
        self.balance
    }

    /// Moves `amount` out of this vault into a new one.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InsufficientBalance`] if `amount` exceeds the
    /// balance.
    pub fn split(&mut self, amount: Amount) -> Result<Self, DexError> {
        let remaining = self
            .balance
            .checked_sub(&amount)
            .ok_or_else(|| DexError::InsufficientBalance {
                holder: "vault".into(),
                asset: self.token.to_string(),
                requested: amount,
                available: self.balance,
            })?;
        self.balance = remaining;
        Ok(Self::new(self.token.clone(), amount))
    }

    /// Empties this vault into a new one.
    pub fn take_all(&mut self) -> Self {
        let balance = core::mem::take(&mut self.balance);
        Self::new(self.token.clone(), balance)
    }

    /// Absorbs `other` into this vault.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidToken`] on a token mismatch and
    /// [`DexError::Overflow`] if the sum does not fit.
    pub fn merge(&mut self, other: Self) -> Result<(), DexError> {
        if other.token != self.token {
            return Err(DexError::InvalidToken("cannot merge vaults of different tokens"));
        }
        self.balance = self
            .balance
            .checked_add(&other.balance)
            .ok_or(DexError::Overflow("vault balance overflow"))?;
        Ok(())
    }
}
