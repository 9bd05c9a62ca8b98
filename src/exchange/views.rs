//! Read-only views. Farm views project accrual to the current time without
//! persisting it.

use std::collections::BTreeMap;

use super::Exchange;
use crate::domain::{AccountId, Amount, FarmId, FeeRate, PoolId, RewardId, TokenId};
use crate::error::DexError;
use crate::farms::{FarmMeta, RewardPoolMeta, StakeMeta};
use crate::pools::PoolMeta;
use crate::traits::Ledger;

impl<L: Ledger> Exchange<L> {
    // -- Pools ----------------------------------------------------------------

    /// Snapshot of one pool.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownPool`].
    pub fn get_pool_meta(&self, pool_id: PoolId) -> Result<PoolMeta, DexError> {
        Ok(self.pools.get(pool_id)?.meta())
    }

    /// Snapshots of every pool in id order.
    #[must_use]
    pub fn get_pools_meta(&self) -> Vec<PoolMeta> {
        self.pools.iter().map(|pool| pool.meta()).collect()
    }

    /// Every pool id in ascending order.
    #[must_use]
    pub fn get_pool_ids(&self) -> Vec<PoolId> {
        self.pools.ids()
    }

    /// The pool trading `token_x` against `token_y`, in either order.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownPair`] if no such pool exists.
    pub fn get_pool_id(&self, token_x: &TokenId, token_y: &TokenId) -> Result<PoolId, DexError> {
        self.pools.pool_id_for(token_x, token_y)
    }

    /// Tokens `token` can be swapped into, with the pool for each.
    #[must_use]
    pub fn get_swaps_available(&self, token: &TokenId) -> BTreeMap<TokenId, PoolId> {
        self.pools.swaps_available(token)
    }

    /// LP shares of `pool_id` held (unstaked) by `owner`.
    pub fn get_lp_balance(&self, pool_id: PoolId, owner: &AccountId) -> Amount {
        self.lp_shares.balance(pool_id, owner)
    }

    // -- Fees -----------------------------------------------------------------

    /// Current DAO fee.
    pub const fn get_dao_fee_percentage(&self) -> FeeRate {
        self.fees.dao_fee
    }

    /// Current LP fee.
    pub const fn get_lp_fee_percentage(&self) -> FeeRate {
        self.fees.lp_fee
    }

    /// Treasury balance per token, including drained buckets.
    #[must_use]
    pub fn read_fees_collected(&self) -> BTreeMap<TokenId, Amount> {
        self.treasury.fees_collected()
    }

    // -- Farms ----------------------------------------------------------------

    /// Every farm id in ascending order.
    #[must_use]
    pub fn get_farm_ids(&self) -> Vec<FarmId> {
        self.farms.farm_ids()
    }

    /// Snapshot of a farm as of now.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownFarm`].
    pub fn get_farm_meta(&self, farm_id: FarmId) -> Result<FarmMeta, DexError> {
        self.farms.farm_meta(farm_id, self.now())
    }

    /// Rewards `address` could claim from `farm_id` right now.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownFarm`].
    pub fn get_pending_rewards(
        &self,
        farm_id: FarmId,
        address: &AccountId,
    ) -> Result<BTreeMap<RewardId, Amount>, DexError> {
        self.farms.pending_rewards(farm_id, address, self.now())
    }

    /// Snapshot of `address`'s stake in `farm_id` as of now.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownFarm`].
    pub fn get_stake_meta(&self, farm_id: FarmId, address: &AccountId) -> Result<StakeMeta, DexError> {
        self.farms.stake_meta(farm_id, address, self.now())
    }

    /// Snapshots of every stake in `farm_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownFarm`].
    pub fn get_stakes(&self, farm_id: FarmId) -> Result<Vec<StakeMeta>, DexError> {
        self.farms.stakes(farm_id, self.now())
    }

    /// Snapshots of every reward pool in id order.
    #[must_use]
    pub fn get_reward_pools(&self) -> Vec<RewardPoolMeta> {
        self.farms.reward_pools().map(|pool| pool.meta()).collect()
    }
}
