//! In-memory [`Ledger`] for tests, simulations and embedding.

use std::collections::BTreeMap;

use crate::domain::{AccountId, Amount, TokenId, Vault};
use crate::error::DexError;
use crate::math::CheckedArithmetic;
use crate::traits::Ledger;

/// Account balances keyed by `(account, token)`.
///
/// [`mint`](Self::mint) acts as a faucet for setting up accounts; every
/// other balance change goes through the [`Ledger`] trait.
///
/// # Examples
///
/// ```
/// use hydra_dex::domain::{AccountId, Amount, TokenId};
/// use hydra_dex::ledger::InMemoryLedger;
/// use hydra_dex::traits::Ledger;
///
/// let alice = AccountId::new("0x01").expect("valid address");
/// let fusd = TokenId::resolve("fusdVault").expect("alias");
/// let mut ledger = InMemoryLedger::new();
/// ledger.mint(&alice, &fusd, Amount::ONE).expect("no overflow");
///
/// let vault = ledger.withdraw(&alice, &fusd, Amount::ONE).expect("funded");
/// assert_eq!(ledger.balance(&alice, &fusd), Amount::ZERO);
/// ledger.deposit(&alice, vault).expect("no overflow");
/// assert_eq!(ledger.balance(&alice, &fusd), Amount::ONE);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    balances: BTreeMap<(AccountId, TokenId), Amount>,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates `amount` of `token` out of thin air for `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Overflow`] if the balance does not fit.
    pub fn mint(&mut self, owner: &AccountId, token: &TokenId, amount: Amount) -> Result<(), DexError> {
        self.credit(owner, token, amount)
    }

    /// Returns every nonzero balance of `owner`.
    #[must_use]
    pub fn balances_of(&self, owner: &AccountId) -> BTreeMap<TokenId, Amount> {
        self.balances
            .iter()
            .filter(|((account, _), amount)| account == owner && !amount.is_zero())
            .map(|((_, token), amount)| (token.clone(), *amount))
            .collect()
    }

    fn credit(&mut self, owner: &AccountId, token: &TokenId, amount: Amount) -> Result<(), DexError> {
        let entry = self
            .balances
            .entry((owner.clone(), token.clone()))
            .or_default();
        *entry = entry.safe_add(&amount)?;
        Ok(())
    }
}

impl Ledger for InMemoryLedger {
    fn balance(&self, owner: &AccountId, token: &TokenId) -> Amount {
        self.balances
            .get(&(owner.clone(), token.clone()))
            .copied()
            .unwrap_or_default()
    }

    fn withdraw(
        &mut self,
        owner: &AccountId,
        token: &TokenId,
        amount: Amount,
    ) -> Result<Vault, DexError> {
        let available = self.balance(owner, token);
        let remaining = available
            .checked_sub(&amount)
            .ok_or_else(|| DexError::InsufficientBalance {
                holder: owner.to_string(),
                asset: token.to_string(),
                requested: amount,
                available,
            })?;
        self.balances
            .insert((owner.clone(), token.clone()), remaining);
        Ok(Vault::new(token.clone(), amount))
    }

    fn deposit(&mut self, owner: &AccountId, vault: Vault) -> Result<(), DexError> {
        let token = vault.token().clone();
        self.credit(owner, &token, vault.balance())
    }
}
