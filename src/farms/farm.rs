//! A farm: staked LP shares, per-reward accumulators and stakes.
//!
//! Accrual is computed as a value ([`Accrual`]) from a read-only farm and
//! applied separately. Operations build their whole effect against the
//! projected accumulators before committing anything, and views use the
//! same projection without persisting it.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{RewardPool, Stake, StakeMeta};
use crate::domain::{AccountId, Amount, FarmId, PoolId, RewardId, Rounding, Timestamp};
use crate::error::DexError;
use crate::traits::RewardReceiver;

/// One reward id's state inside a farm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FarmReward {
    weight: Amount,
    acc_per_share: Amount,
}

impl FarmReward {
    /// Share of the reward pool's emission this farm competes for.
    pub const fn weight(&self) -> Amount {
        self.weight
    }

    /// Rewards accumulated per staked LP share.
    pub const fn acc_per_share(&self) -> Amount {
        self.acc_per_share
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AccrualStep {
    pub(crate) emitted: Amount,
    pub(crate) acc_per_share: Amount,
}

/// The result of bringing a farm's accumulators up to `now`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accrual {
    farm_id: FarmId,
    now: Timestamp,
    steps: BTreeMap<RewardId, AccrualStep>,
}

impl Accrual {
    pub(crate) const fn new(
        farm_id: FarmId,
        now: Timestamp,
        steps: BTreeMap<RewardId, AccrualStep>,
    ) -> Self {
        Self {
            farm_id,
            now,
            steps,
        }
    }

    /// Farm the accrual belongs to.
    #[must_use]
    pub const fn farm_id(&self) -> FarmId {
        self.farm_id
    }

    /// Time the accumulators were brought up to.
    #[must_use]
    pub const fn now(&self) -> Timestamp {
        self.now
    }

    /// `(reward id, accumulator)` pairs after accrual.
    pub fn accumulators(&self) -> impl Iterator<Item = (RewardId, Amount)> + '_ {
        self.steps.iter().map(|(id, step)| (*id, step.acc_per_share))
    }

    /// Rewards emitted for `reward` during this accrual.
    pub fn emitted(&self, reward: RewardId) -> Amount {
        self.steps.get(&reward).map_or(Amount::ZERO, |s| s.emitted)
    }
}

/// Yield-distribution unit paying stakers of one pool's LP shares.
#[derive(Debug)]
pub struct Farm {
    id: FarmId,
    rewards: BTreeMap<RewardId, FarmReward>,
    total_staked: Amount,
    last_reward_timestamp: Timestamp,
    stakes: BTreeMap<AccountId, Stake>,
    receivers: BTreeMap<AccountId, RewardReceiver>,
}

impl Farm {
    pub(crate) const fn new(id: FarmId, now: Timestamp) -> Self {
        Self {
            id,
            rewards: BTreeMap::new(),
            total_staked: Amount::ZERO,
            last_reward_timestamp: now,
            stakes: BTreeMap::new(),
            receivers: BTreeMap::new(),
        }
    }

    /// Farm id.
    #[must_use]
    pub const fn id(&self) -> FarmId {
        self.id
    }

    /// Pool whose LP shares this farm stakes.
    #[must_use]
    pub const fn lp_pool(&self) -> PoolId {
        self.id.lp_pool()
    }

    /// Total LP shares staked.
    pub const fn total_staked(&self) -> Amount {
        self.total_staked
    }

    /// Time of the last persisted accrual.
    pub const fn last_reward_timestamp(&self) -> Timestamp {
        self.last_reward_timestamp
    }

    /// Returns the reward ids registered with this farm.
    pub fn reward_ids(&self) -> impl Iterator<Item = RewardId> + '_ {
        self.rewards.keys().copied()
    }

    /// Returns `true` if at least one reward pool is registered.
    #[must_use]
    pub fn has_rewards(&self) -> bool {
        !self.rewards.is_empty()
    }

    /// State of `reward` in this farm.
    #[must_use]
    pub fn reward(&self, reward: RewardId) -> Option<&FarmReward> {
        self.rewards.get(&reward)
    }

    /// Stake of `owner`, if it ever staked.
    #[must_use]
    pub fn stake(&self, owner: &AccountId) -> Option<&Stake> {
        self.stakes.get(owner)
    }

    /// Every stake in address order.
    pub fn stakes(&self) -> impl Iterator<Item = (&AccountId, &Stake)> {
        self.stakes.iter()
    }

    /// Alternate claim destination registered by `owner`.
    #[must_use]
    pub fn receiver(&self, owner: &AccountId) -> Option<&RewardReceiver> {
        self.receivers.get(owner)
    }

    pub(crate) fn register_reward(&mut self, reward: RewardId, weight: Amount) {
        self.rewards.entry(reward).or_insert(FarmReward {
            weight,
            acc_per_share: Amount::ZERO,
        });
    }

    pub(crate) fn set_weight(&mut self, reward: RewardId, weight: Amount) -> Result<(), DexError> {
        let entry = self
            .rewards
            .get_mut(&reward)
            .ok_or(DexError::UnknownRewardPool(reward))?;
        entry.weight = weight;
        Ok(())
    }

    pub(crate) fn set_receiver(&mut self, owner: AccountId, receiver: RewardReceiver) {
        self.receivers.insert(owner, receiver);
    }

    /// Projects every accumulator forward to `now`.
    ///
    /// For each reward id, `offered = min(remaining, elapsed × rate ×
    /// weight / total_weight)`, the accumulator grows by
    /// `floor(offered / total_staked)` and `emitted` is that increment times
    /// `total_staked`. Nothing is emitted while nothing is staked. Values too
    /// large to represent saturate rather than fail.
    pub(crate) fn accrual(
        &self,
        now: Timestamp,
        reward_pools: &BTreeMap<RewardId, RewardPool>,
        total_weights: &BTreeMap<RewardId, Amount>,
    ) -> Accrual {
        let elapsed = now.elapsed_since(self.last_reward_timestamp);
        let steps = self
            .rewards
            .iter()
            .map(|(id, reward)| {
                let pool = reward_pools.get(id);
                let total_weight = total_weights.get(id).copied().unwrap_or_default();
                let offered = match pool {
                    Some(pool)
                        if !self.total_staked.is_zero()
                            && !elapsed.is_zero()
                            && !total_weight.is_zero() =>
                    {
                        let gross = elapsed
                            .checked_mul(&pool.tokens_per_second(), Rounding::Down)
                            .unwrap_or(Amount::MAX);
                        gross
                            .mul_div(&reward.weight, &total_weight, Rounding::Down)
                            .unwrap_or(Amount::MAX)
                            .min(pool.remaining())
                    }
                    _ => Amount::ZERO,
                };
                let increment = if offered.is_zero() {
                    Amount::ZERO
                } else {
                    offered
                        .checked_div(&self.total_staked, Rounding::Down)
                        .unwrap_or(Amount::MAX)
                };
                // Only what the accumulator can represent leaves the pool; the
                // rounding dust stays emittable.
                let emitted = increment
                    .checked_mul(&self.total_staked, Rounding::Down)
                    .unwrap_or(Amount::MAX)
                    .min(offered);
                let acc_per_share = reward
                    .acc_per_share
                    .checked_add(&increment)
                    .unwrap_or(Amount::MAX);
                (
                    *id,
                    AccrualStep {
                        emitted,
                        acc_per_share,
                    },
                )
            })
            .collect();
        let now = now.max(self.last_reward_timestamp);
        Accrual::new(self.id, now, steps)
    }

    pub(crate) fn apply_accrual(&mut self, accrual: &Accrual) {
        for (id, acc) in accrual.accumulators() {
            if let Some(reward) = self.rewards.get_mut(&id) {
                reward.acc_per_share = acc;
            }
        }
        self.last_reward_timestamp = accrual.now();
    }

    pub(crate) fn put_stake(&mut self, owner: AccountId, stake: Stake, total_staked: Amount) {
        self.stakes.insert(owner, stake);
        self.total_staked = total_staked;
    }

    pub(crate) fn meta(
        &self,
        accrual: &Accrual,
        reward_pools: &BTreeMap<RewardId, RewardPool>,
    ) -> Result<FarmMeta, DexError> {
        let mut meta = FarmMeta {
            id: self.id,
            total_staked: self.total_staked,
            last_reward_timestamp: accrual.now(),
            reward_tokens_per_second_by_id: BTreeMap::new(),
            total_accumulated_tokens_per_share_by_id: BTreeMap::new(),
            farm_weights_by_id: BTreeMap::new(),
            rewards_remaining_by_id: BTreeMap::new(),
            rewards_unemitted_by_id: BTreeMap::new(),
            stakes: BTreeMap::new(),
        };
        for (id, reward) in &self.rewards {
            let (rate, balance, unemitted) = reward_pools
                .get(id)
                .map_or((Amount::ZERO, Amount::ZERO, Amount::ZERO), |p| {
                    (p.tokens_per_second(), p.balance(), p.remaining())
                });
            meta.reward_tokens_per_second_by_id.insert(*id, rate);
            meta.farm_weights_by_id.insert(*id, reward.weight);
            meta.rewards_remaining_by_id.insert(*id, balance);
            meta.rewards_unemitted_by_id
                .insert(*id, unemitted.saturating_sub(&accrual.emitted(*id)));
        }
        for (id, acc) in accrual.accumulators() {
            meta.total_accumulated_tokens_per_share_by_id.insert(id, acc);
        }
        for (address, stake) in &self.stakes {
            meta.stakes.insert(
                address.clone(),
                stake.meta(address, self.receivers.get(address), accrual)?,
            );
        }
        Ok(meta)
    }
}

/// Public view of a farm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmMeta {
    /// Farm id.
    pub id: FarmId,
    /// Total LP shares staked.
    pub total_staked: Amount,
    /// Accrual time the view was projected to.
    pub last_reward_timestamp: Timestamp,
    /// Emission rate per reward id.
    #[serde(rename = "rewardTokensPerSecondByID")]
    pub reward_tokens_per_second_by_id: BTreeMap<RewardId, Amount>,
    /// Accumulator per reward id.
    #[serde(rename = "totalAccumulatedTokensPerShareByID")]
    pub total_accumulated_tokens_per_share_by_id: BTreeMap<RewardId, Amount>,
    /// This farm's weight per reward id.
    #[serde(rename = "farmWeightsByID")]
    pub farm_weights_by_id: BTreeMap<RewardId, Amount>,
    /// Reward vault balance per reward id: emitted but unclaimed rewards
    /// included, claimed rewards excluded.
    #[serde(rename = "rewardsRemainingByID")]
    pub rewards_remaining_by_id: BTreeMap<RewardId, Amount>,
    /// Rewards still to be emitted per reward id.
    #[serde(rename = "rewardsUnemittedByID")]
    pub rewards_unemitted_by_id: BTreeMap<RewardId, Amount>,
    /// Every stake, by address.
    pub stakes: BTreeMap<AccountId, StakeMeta>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{TokenId, Vault};

    fn amt(s: &str) -> Amount {
        let Ok(a) = s.parse::<Amount>() else {
            panic!("invalid amount literal in test: {s}");
        };
        a
    }

    fn at(secs: &str) -> Timestamp {
        Timestamp::from_secs(amt(secs))
    }

    fn reward_pools(remaining: &str) -> BTreeMap<RewardId, RewardPool> {
        let Ok(token) = TokenId::resolve("emuTokenVault") else {
            panic!("valid alias");
        };
        let pool = RewardPool::new(
            RewardId::new(0),
            Vault::new(token, amt(remaining)),
            Amount::ONE,
            Vec::new(),
        );
        BTreeMap::from([(RewardId::new(0), pool)])
    }

    fn weights(total: &str) -> BTreeMap<RewardId, Amount> {
        BTreeMap::from([(RewardId::new(0), amt(total))])
    }

    fn staked_farm(total: &str) -> Farm {
        let mut farm = Farm::new(FarmId::new(0), at("0"));
        farm.register_reward(RewardId::new(0), Amount::ONE);
        let stake = Stake::default();
        let Ok(stake) = stake.rebalanced(amt(total), &farm.accrual(at("0"), &reward_pools("1000"), &weights("1")))
        else {
            panic!("expected Ok");
        };
        let Ok(owner) = AccountId::new("0x01") else {
            panic!("valid address");
        };
        farm.put_stake(owner, stake, amt(total));
        farm
    }

    #[test]
    fn accrual_spreads_emission_over_stake() {
        let farm = staked_farm("4");
        let accrual = farm.accrual(at("10"), &reward_pools("1000"), &weights("1"));
        assert_eq!(accrual.emitted(RewardId::new(0)), amt("10"));
        assert_eq!(accrual.accumulators().next(), Some((RewardId::new(0), amt("2.5"))));
        assert_eq!(accrual.now(), at("10"));
    }

    #[test]
    fn accrual_splits_by_weight() {
        let farm = staked_farm("1");
        let accrual = farm.accrual(at("10"), &reward_pools("1000"), &weights("4"));
        assert_eq!(accrual.emitted(RewardId::new(0)), amt("2.5"));
    }

    #[test]
    fn accrual_capped_by_remaining() {
        let farm = staked_farm("1");
        let accrual = farm.accrual(at("100"), &reward_pools("7"), &weights("1"));
        assert_eq!(accrual.emitted(RewardId::new(0)), amt("7"));
    }

    #[test]
    fn rounding_dust_is_not_emitted() {
        let farm = staked_farm("3");
        let accrual = farm.accrual(at("10"), &reward_pools("1000"), &weights("1"));
        assert_eq!(accrual.accumulators().next(), Some((RewardId::new(0), amt("3.33333333"))));
        assert_eq!(accrual.emitted(RewardId::new(0)), amt("9.99999999"));
    }

    #[test]
    fn emission_below_accumulator_precision_stays_in_pool() {
        let farm = staked_farm("2000000000");
        let accrual = farm.accrual(at("1"), &reward_pools("1000"), &weights("1"));
        assert_eq!(accrual.emitted(RewardId::new(0)), Amount::ZERO);
        assert_eq!(accrual.accumulators().next(), Some((RewardId::new(0), Amount::ZERO)));
    }

    #[test]
    fn nothing_emitted_without_stake() {
        let mut farm = Farm::new(FarmId::new(0), at("0"));
        farm.register_reward(RewardId::new(0), Amount::ONE);
        let accrual = farm.accrual(at("50"), &reward_pools("1000"), &weights("1"));
        assert_eq!(accrual.emitted(RewardId::new(0)), Amount::ZERO);
        farm.apply_accrual(&accrual);
        assert_eq!(farm.last_reward_timestamp(), at("50"));
        assert_eq!(farm.reward(RewardId::new(0)).map(FarmReward::acc_per_share), Some(Amount::ZERO));
    }

    #[test]
    fn apply_persists_accumulators() {
        let mut farm = staked_farm("2");
        let accrual = farm.accrual(at("3"), &reward_pools("1000"), &weights("1"));
        farm.apply_accrual(&accrual);
        assert_eq!(farm.reward(RewardId::new(0)).map(FarmReward::acc_per_share), Some(amt("1.5")));
        // Re-accruing at the same instant changes nothing.
        let again = farm.accrual(at("3"), &reward_pools("1000"), &weights("1"));
        assert_eq!(again.emitted(RewardId::new(0)), Amount::ZERO);
    }

    #[test]
    fn set_weight_on_unknown_reward_rejected() {
        let mut farm = Farm::new(FarmId::new(0), at("0"));
        assert!(matches!(
            farm.set_weight(RewardId::new(3), Amount::ONE),
            Err(DexError::UnknownRewardPool(_))
        ));
    }
}
