//! Per-token accumulation of DAO swap fees.

use std::collections::BTreeMap;

use crate::domain::{Amount, TokenId, Vault};
use crate::error::DexError;

/// Fee buckets keyed by token identifier.
///
/// Swaps [`deposit`](Self::deposit) their DAO fee into the bucket of the
/// input token; the admin drains a bucket with
/// [`withdraw_all`](Self::withdraw_all).
#[derive(Debug, Default)]
pub struct Treasury {
    buckets: BTreeMap<TokenId, Vault>,
}

impl Treasury {
    /// Creates an empty treasury.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fee vault to its token's bucket.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Overflow`] if the bucket balance does not fit.
    pub fn deposit(&mut self, fee: Vault) -> Result<(), DexError> {
        match self.buckets.get_mut(fee.token()) {
            Some(bucket) => bucket.merge(fee),
            None => {
                self.buckets.insert(fee.token().clone(), fee);
                Ok(())
            }
        }
    }

    /// Returns the fees collected for `token`.
    pub fn balance(&self, token: &TokenId) -> Amount {
        self.buckets.get(token).map_or(Amount::ZERO, Vault::balance)
    }

    /// Returns all buckets with their balances, including drained ones.
    #[must_use]
    pub fn fees_collected(&self) -> BTreeMap<TokenId, Amount> {
        self.buckets
            .iter()
            .map(|(token, vault)| (token.clone(), vault.balance()))
            .collect()
    }

    /// Returns the tokens whose buckets hold a nonzero balance.
    #[must_use]
    pub fn nonempty_tokens(&self) -> Vec<TokenId> {
        self.buckets
            .iter()
            .filter(|(_, vault)| !vault.balance().is_zero())
            .map(|(token, _)| token.clone())
            .collect()
    }

    /// Empties the bucket of `token`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::NoFeesCollected`] if the bucket is missing or empty.
    pub fn withdraw_all(&mut self, token: &TokenId) -> Result<Vault, DexError> {
        match self.buckets.get_mut(token) {
            Some(bucket) if !bucket.balance().is_zero() => Ok(bucket.take_all()),
            _ => Err(DexError::NoFeesCollected(token.clone())),
        }
    }
}
