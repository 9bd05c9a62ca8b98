//! Token custody capability.

use crate::domain::{AccountId, Amount, TokenId, Vault};
use crate::error::DexError;

/// Where a staker wants claimed rewards delivered.
///
/// Registered per farm with
/// [`Exchange::add_reward_receiver`](crate::exchange::Exchange::add_reward_receiver).
/// The paths name a receiving capability and the vault behind it inside the
/// staker's account; ledgers that do not distinguish vaults may ignore them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardReceiver {
    /// Public receiver path, e.g. `/public/fusdReceiver`.
    pub public_path: String,
    /// Storage path of the vault, e.g. `/storage/fusdVault`.
    pub storage_path: String,
}

/// Fungible-token custody used by the exchange.
///
/// The exchange only moves tokens through this trait: it withdraws from
/// callers into [`Vault`]s, keeps vaults in pools, the treasury and reward
/// pools, and deposits vaults back into accounts.
///
/// Callers check [`balance`](Self::balance) before withdrawing so that an
/// operation never fails halfway through its transfers.
pub trait Ledger {
    /// Returns the balance of `token` held by `owner`.
    fn balance(&self, owner: &AccountId, token: &TokenId) -> Amount;

    /// Removes `amount` of `token` from `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InsufficientBalance`] if `owner` holds less than
    /// `amount`.
    fn withdraw(&mut self, owner: &AccountId, token: &TokenId, amount: Amount)
        -> Result<Vault, DexError>;

    /// Credits the vault's balance to `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Overflow`] if the resulting balance does not fit.
    fn deposit(&mut self, owner: &AccountId, vault: Vault) -> Result<(), DexError>;

    /// Credits the vault to `owner` through a registered reward receiver.
    ///
    /// # Errors
    ///
    /// Same as [`deposit`](Self::deposit).
    fn deposit_to_receiver(
        &mut self,
        owner: &AccountId,
        _receiver: &RewardReceiver,
        vault: Vault,
    ) -> Result<(), DexError> {
        self.deposit(owner, vault)
    }
}
