//! Farm and reward-pool store with transactional staking plans.
//!
//! Every staking operation is split into a `preview_*` step that validates
//! and computes the complete new state from a read-only registry, and a
//! `commit_*` step that installs it. The exchange moves LP shares and reward
//! tokens between the two, so a failed preview leaves nothing behind.

use std::collections::BTreeMap;

use tracing::debug;

use super::{Accrual, Farm, FarmMeta, RewardPool, Stake, StakeMeta};
use crate::config::FarmingDefaults;
use crate::domain::{AccountId, Amount, FarmId, RewardId, TokenId, Timestamp, Vault};
use crate::error::DexError;
use crate::math::CheckedArithmetic;
use crate::traits::RewardReceiver;

/// A validated stake or unstake, ready to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeChange {
    accrual: Accrual,
    owner: AccountId,
    stake: Stake,
    total_staked: Amount,
    first_stake: bool,
}

impl StakeChange {
    /// Farm being staked into.
    #[must_use]
    pub const fn farm_id(&self) -> FarmId {
        self.accrual.farm_id()
    }

    /// `true` if the owner never staked in this farm before.
    #[must_use]
    pub const fn first_stake(&self) -> bool {
        self.first_stake
    }

    /// Farm total after the change.
    pub const fn total_staked(&self) -> Amount {
        self.total_staked
    }

    /// Owner balance after the change.
    pub const fn balance(&self) -> Amount {
        self.stake.balance()
    }
}

/// One reward id's payout in a claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardPayout {
    /// Reward id.
    pub reward_id: RewardId,
    /// Reward token.
    pub token: TokenId,
    /// Amount paid.
    pub amount: Amount,
    /// Claimer's reward debt after the claim.
    pub reward_debt: Amount,
    /// Reward vault balance once this payout has left it.
    pub total_remaining: Amount,
}

/// A validated claim, ready to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimPlan {
    accrual: Accrual,
    owner: AccountId,
    stake: Option<Stake>,
    claimed: BTreeMap<RewardId, Amount>,
    payouts: Vec<RewardPayout>,
}

impl ClaimPlan {
    /// Amount claimed per reward id, zeros included.
    #[must_use]
    pub const fn claimed(&self) -> &BTreeMap<RewardId, Amount> {
        &self.claimed
    }

    /// Nonzero payouts in reward id order.
    #[must_use]
    pub fn payouts(&self) -> &[RewardPayout] {
        &self.payouts
    }
}

/// Owns every farm and reward pool.
#[derive(Debug)]
pub struct FarmRegistry {
    farms: BTreeMap<FarmId, Farm>,
    reward_pools: BTreeMap<RewardId, RewardPool>,
    next_reward_id: RewardId,
    defaults: FarmingDefaults,
}

impl FarmRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new(defaults: FarmingDefaults) -> Self {
        Self {
            farms: BTreeMap::new(),
            reward_pools: BTreeMap::new(),
            next_reward_id: RewardId::new(0),
            defaults,
        }
    }

    /// Looks up a farm.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownFarm`] if no farm has this id.
    pub fn farm(&self, id: FarmId) -> Result<&Farm, DexError> {
        self.farms.get(&id).ok_or(DexError::UnknownFarm(id))
    }

    /// All farm ids in ascending order.
    #[must_use]
    pub fn farm_ids(&self) -> Vec<FarmId> {
        self.farms.keys().copied().collect()
    }

    /// Looks up a reward pool.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownRewardPool`] if no pool has this id.
    pub fn reward_pool(&self, id: RewardId) -> Result<&RewardPool, DexError> {
        self.reward_pools.get(&id).ok_or(DexError::UnknownRewardPool(id))
    }

    /// Iterates reward pools in id order.
    pub fn reward_pools(&self) -> impl Iterator<Item = &RewardPool> {
        self.reward_pools.values()
    }

    /// Sum of every farm's weight for `reward`.
    pub fn total_weight(&self, reward: RewardId) -> Amount {
        self.farms
            .values()
            .filter_map(|farm| farm.reward(reward).map(|r| r.weight()))
            .fold(Amount::ZERO, |total, w| total.saturating_add(&w))
    }

    fn total_weights(&self) -> BTreeMap<RewardId, Amount> {
        self.reward_pools
            .keys()
            .map(|id| (*id, self.total_weight(*id)))
            .collect()
    }

    /// Projects `farm_id`'s accumulators to `now` without persisting them.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownFarm`] if no farm has this id.
    pub fn accrual(&self, farm_id: FarmId, now: Timestamp) -> Result<Accrual, DexError> {
        let farm = self.farm(farm_id)?;
        Ok(farm.accrual(now, &self.reward_pools, &self.total_weights()))
    }

    fn apply(&mut self, accrual: &Accrual) {
        if let Some(farm) = self.farms.get_mut(&accrual.farm_id()) {
            farm.apply_accrual(accrual);
            for reward in farm.reward_ids() {
                let emitted = accrual.emitted(reward);
                if let Some(pool) = self.reward_pools.get_mut(&reward) {
                    pool.record_emission(emitted);
                }
            }
        }
        debug!(farm_id = %accrual.farm_id(), now = %accrual.now(), "accrual settled");
    }

    /// Brings every farm up to `now`, in id order.
    ///
    /// Runs before anything that changes how emissions are shared (new
    /// farms, new reward pools, rates, weights) so past intervals keep the
    /// parameters they ran under.
    pub fn settle_all(&mut self, now: Timestamp) {
        let weights = self.total_weights();
        for id in self.farm_ids() {
            let accrual = match self.farms.get(&id) {
                Some(farm) => farm.accrual(now, &self.reward_pools, &weights),
                None => continue,
            };
            self.apply(&accrual);
        }
    }

    // -- Administration -------------------------------------------------------

    /// Registers farm `id`, joining every existing reward pool at the
    /// default weight.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::DuplicateFarm`] if the id is taken.
    pub fn create_farm(&mut self, id: FarmId, now: Timestamp) -> Result<(), DexError> {
        if self.farms.contains_key(&id) {
            return Err(DexError::DuplicateFarm(id));
        }
        self.settle_all(now);
        let mut farm = Farm::new(id, now);
        for reward in self.reward_pools.keys() {
            farm.register_reward(*reward, self.defaults.weight);
        }
        self.farms.insert(id, farm);
        Ok(())
    }

    /// Adds a reward pool funded by `vault` and registers it with every farm.
    ///
    /// The caller validates the funding amount before withdrawing it.
    pub fn create_reward_pool(
        &mut self,
        vault: Vault,
        accepted_collateral: Vec<String>,
        now: Timestamp,
    ) -> RewardId {
        self.settle_all(now);
        let id = self.next_reward_id;
        let pool = RewardPool::new(id, vault, self.defaults.tokens_per_second, accepted_collateral);
        self.reward_pools.insert(id, pool);
        for farm in self.farms.values_mut() {
            farm.register_reward(id, self.defaults.weight);
        }
        self.next_reward_id = id.next();
        id
    }

    /// Changes a reward pool's emission rate from `now` on.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownRewardPool`] if no pool has this id.
    pub fn set_reward_rate(&mut self, reward: RewardId, rate: Amount, now: Timestamp) -> Result<(), DexError> {
        self.reward_pool(reward)?;
        self.settle_all(now);
        if let Some(pool) = self.reward_pools.get_mut(&reward) {
            pool.set_tokens_per_second(rate);
        }
        Ok(())
    }

    /// Changes a farm's weight in a reward pool from `now` on.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownFarm`] or [`DexError::UnknownRewardPool`].
    pub fn set_farm_weight(
        &mut self,
        farm_id: FarmId,
        reward: RewardId,
        weight: Amount,
        now: Timestamp,
    ) -> Result<(), DexError> {
        if self.farm(farm_id)?.reward(reward).is_none() {
            return Err(DexError::UnknownRewardPool(reward));
        }
        self.settle_all(now);
        match self.farms.get_mut(&farm_id) {
            Some(farm) => farm.set_weight(reward, weight),
            None => Err(DexError::UnknownFarm(farm_id)),
        }
    }

    /// Stores where `owner` wants future claims on `farm_id` delivered.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownFarm`] if no farm has this id.
    pub fn set_receiver(
        &mut self,
        farm_id: FarmId,
        owner: AccountId,
        receiver: RewardReceiver,
    ) -> Result<(), DexError> {
        let farm = self
            .farms
            .get_mut(&farm_id)
            .ok_or(DexError::UnknownFarm(farm_id))?;
        farm.set_receiver(owner, receiver);
        Ok(())
    }

    // -- Staking --------------------------------------------------------------

    /// Validates staking `amount` more LP shares for `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidAmount`] for a zero amount,
    /// [`DexError::UnknownFarm`] and arithmetic errors.
    pub fn preview_stake(
        &self,
        farm_id: FarmId,
        owner: &AccountId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<StakeChange, DexError> {
        if amount.is_zero() {
            return Err(DexError::InvalidAmount("stake amount must be positive"));
        }
        let farm = self.farm(farm_id)?;
        let accrual = self.accrual(farm_id, now)?;
        let existing = farm.stake(owner);
        let current = existing.cloned().unwrap_or_default();
        let balance = current.balance().safe_add(&amount)?;
        Ok(StakeChange {
            stake: current.rebalanced(balance, &accrual)?,
            total_staked: farm.total_staked().safe_add(&amount)?,
            first_stake: existing.is_none(),
            owner: owner.clone(),
            accrual,
        })
    }

    /// Validates returning `amount` staked LP shares to `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidAmount`] for a zero amount,
    /// [`DexError::UnknownFarm`], and [`DexError::InsufficientBalance`] if
    /// `owner` has fewer shares staked.
    pub fn preview_unstake(
        &self,
        farm_id: FarmId,
        owner: &AccountId,
        amount: Amount,
        now: Timestamp,
    ) -> Result<StakeChange, DexError> {
        if amount.is_zero() {
            return Err(DexError::InvalidAmount("unstake amount must be positive"));
        }
        let farm = self.farm(farm_id)?;
        let current = farm.stake(owner).cloned().unwrap_or_default();
        let balance = current
            .balance()
            .checked_sub(&amount)
            .ok_or_else(|| DexError::InsufficientBalance {
                holder: owner.to_string(),
                asset: format!("staked lp:{}", farm.lp_pool()),
                requested: amount,
                available: current.balance(),
            })?;
        let accrual = self.accrual(farm_id, now)?;
        Ok(StakeChange {
            stake: current.rebalanced(balance, &accrual)?,
            total_staked: farm.total_staked().saturating_sub(&amount),
            first_stake: false,
            owner: owner.clone(),
            accrual,
        })
    }

    /// Installs a previewed stake or unstake.
    pub fn commit_stake(&mut self, change: StakeChange) {
        self.apply(&change.accrual);
        if let Some(farm) = self.farms.get_mut(&change.accrual.farm_id()) {
            farm.put_stake(change.owner, change.stake, change.total_staked);
        }
    }

    /// Validates a claim of everything `owner` is owed on `farm_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownFarm`], [`DexError::NoRewardPools`] if the
    /// farm pays no rewards, and [`DexError::InsufficientBalance`] if a
    /// reward vault cannot cover the payout.
    pub fn preview_claim(
        &self,
        farm_id: FarmId,
        owner: &AccountId,
        now: Timestamp,
    ) -> Result<ClaimPlan, DexError> {
        let farm = self.farm(farm_id)?;
        if !farm.has_rewards() {
            return Err(DexError::NoRewardPools(farm_id));
        }
        let accrual = self.accrual(farm_id, now)?;
        let Some(current) = farm.stake(owner) else {
            let claimed = farm.reward_ids().map(|id| (id, Amount::ZERO)).collect();
            return Ok(ClaimPlan {
                accrual,
                owner: owner.clone(),
                stake: None,
                claimed,
                payouts: Vec::new(),
            });
        };

        let (stake, claimed) = current.claimed(&accrual)?;
        let mut payouts = Vec::new();
        for (reward, amount) in &claimed {
            if amount.is_zero() {
                continue;
            }
            let pool = self.reward_pool(*reward)?;
            if *amount > pool.balance() {
                return Err(DexError::InsufficientBalance {
                    holder: format!("reward pool {reward}"),
                    asset: pool.token().to_string(),
                    requested: *amount,
                    available: pool.balance(),
                });
            }
            payouts.push(RewardPayout {
                reward_id: *reward,
                token: pool.token().clone(),
                amount: *amount,
                reward_debt: stake.reward_debt(*reward),
                total_remaining: pool.balance().saturating_sub(amount),
            });
        }
        Ok(ClaimPlan {
            accrual,
            owner: owner.clone(),
            stake: Some(stake),
            claimed,
            payouts,
        })
    }

    /// Installs a previewed claim and releases the payout vaults.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InsufficientBalance`] if a reward vault no longer
    /// covers its payout; nothing is changed in that case.
    pub fn commit_claim(&mut self, plan: ClaimPlan) -> Result<Vec<(RewardPayout, Vault)>, DexError> {
        for payout in &plan.payouts {
            let pool = self.reward_pool(payout.reward_id)?;
            if payout.amount > pool.balance() {
                return Err(DexError::InsufficientBalance {
                    holder: format!("reward pool {}", payout.reward_id),
                    asset: pool.token().to_string(),
                    requested: payout.amount,
                    available: pool.balance(),
                });
            }
        }
        self.apply(&plan.accrual);
        if let (Some(stake), Some(farm)) = (plan.stake, self.farms.get_mut(&plan.accrual.farm_id())) {
            let total = farm.total_staked();
            farm.put_stake(plan.owner, stake, total);
        }
        let mut released = Vec::with_capacity(plan.payouts.len());
        for payout in plan.payouts {
            let pool = self
                .reward_pools
                .get_mut(&payout.reward_id)
                .ok_or(DexError::UnknownRewardPool(payout.reward_id))?;
            let vault = pool.pay(payout.amount)?;
            released.push((payout, vault));
        }
        Ok(released)
    }

    // -- Views ----------------------------------------------------------------

    /// Claimable rewards of `owner` per reward id as of `now`; empty for an
    /// account that never staked in the farm.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownFarm`] and arithmetic errors.
    pub fn pending_rewards(
        &self,
        farm_id: FarmId,
        owner: &AccountId,
        now: Timestamp,
    ) -> Result<BTreeMap<RewardId, Amount>, DexError> {
        let farm = self.farm(farm_id)?;
        let Some(stake) = farm.stake(owner) else {
            return Ok(BTreeMap::new());
        };
        let accrual = self.accrual(farm_id, now)?;
        accrual
            .accumulators()
            .map(|(reward, acc)| Ok((reward, stake.owed(reward, acc)?)))
            .collect()
    }

    /// Snapshot of `farm_id` projected to `now`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownFarm`] and arithmetic errors.
    pub fn farm_meta(&self, farm_id: FarmId, now: Timestamp) -> Result<FarmMeta, DexError> {
        let farm = self.farm(farm_id)?;
        let accrual = self.accrual(farm_id, now)?;
        farm.meta(&accrual, &self.reward_pools)
    }

    /// Snapshot of `owner`'s stake projected to `now`; an account that never
    /// staked reads as an empty stake.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownFarm`] and arithmetic errors.
    pub fn stake_meta(
        &self,
        farm_id: FarmId,
        owner: &AccountId,
        now: Timestamp,
    ) -> Result<StakeMeta, DexError> {
        let farm = self.farm(farm_id)?;
        let accrual = self.accrual(farm_id, now)?;
        let stake = farm.stake(owner).cloned().unwrap_or_default();
        stake.meta(owner, farm.receiver(owner), &accrual)
    }

    /// Snapshots of every stake in `farm_id`, in address order.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownFarm`] and arithmetic errors.
    pub fn stakes(&self, farm_id: FarmId, now: Timestamp) -> Result<Vec<StakeMeta>, DexError> {
        let farm = self.farm(farm_id)?;
        let accrual = self.accrual(farm_id, now)?;
        farm.stakes()
            .map(|(owner, stake)| stake.meta(owner, farm.receiver(owner), &accrual))
            .collect()
    }
}
