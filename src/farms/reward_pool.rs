//! Exchange-wide reward token pools.

use serde::Serialize;

use crate::domain::{Amount, RewardId, TokenId, Vault};
use crate::error::DexError;

/// Funds and emission schedule for one reward token.
///
/// `remaining` counts rewards not yet emitted into any farm's accumulator.
/// Emitted rewards stay in the vault until stakers claim them, so the vault
/// balance never falls below `remaining`.
#[derive(Debug)]
pub struct RewardPool {
    id: RewardId,
    vault: Vault,
    tokens_per_second: Amount,
    remaining: Amount,
    accepted_collateral: Vec<String>,
}

impl RewardPool {
    pub(crate) fn new(
        id: RewardId,
        vault: Vault,
        tokens_per_second: Amount,
        accepted_collateral: Vec<String>,
    ) -> Self {
        let remaining = vault.balance();
        Self {
            id,
            vault,
            tokens_per_second,
            remaining,
            accepted_collateral,
        }
    }

    /// Reward id.
    #[must_use]
    pub const fn id(&self) -> RewardId {
        self.id
    }

    /// Reward token.
    #[must_use]
    pub const fn token(&self) -> &TokenId {
        self.vault.token()
    }

    /// Emission rate shared by all farms, before weighting.
    pub const fn tokens_per_second(&self) -> Amount {
        self.tokens_per_second
    }

    /// Rewards not yet emitted.
    pub const fn remaining(&self) -> Amount {
        self.remaining
    }

    /// Tokens held, emitted or not.
    pub const fn balance(&self) -> Amount {
        self.vault.balance()
    }

    /// NFT collections accepted as boosting collateral.
    #[must_use]
    pub fn accepted_collateral(&self) -> &[String] {
        &self.accepted_collateral
    }

    pub(crate) fn set_tokens_per_second(&mut self, rate: Amount) {
        self.tokens_per_second = rate;
    }

    pub(crate) fn record_emission(&mut self, emitted: Amount) {
        self.remaining = self.remaining.saturating_sub(&emitted);
    }

    pub(crate) fn pay(&mut self, amount: Amount) -> Result<Vault, DexError> {
        self.vault.split(amount)
    }

    /// Snapshot of the pool.
    #[must_use]
    pub fn meta(&self) -> RewardPoolMeta {
        RewardPoolMeta {
            reward_id: self.id,
            token: self.token().clone(),
            tokens_per_second: self.tokens_per_second,
            remaining: self.remaining,
            balance: self.balance(),
            accepted_collateral: self.accepted_collateral.clone(),
        }
    }
}

/// Public view of a reward pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardPoolMeta {
    /// Reward id.
    pub reward_id: RewardId,
    /// Reward token.
    pub token: TokenId,
    /// Emission rate before weighting.
    pub tokens_per_second: Amount,
    /// Unemitted rewards.
    pub remaining: Amount,
    /// Tokens held.
    pub balance: Amount,
    /// Accepted boosting collections.
    pub accepted_collateral: Vec<String>,
}
