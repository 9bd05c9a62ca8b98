//! Yield farming: reward pools, farms, stakes and their registry.
//!
//! A farm pays stakers of one pool's LP shares from every exchange-wide
//! reward pool. Rewards accrue through a per-share accumulator: each
//! reward id's accumulator grows by `emitted / total_staked`, and a stake
//! is owed `balance × accumulator − reward_debt`.

mod farm;
mod registry;
mod reward_pool;
mod stake;

#[cfg(test)]
mod proptest_properties;

pub use farm::{Accrual, Farm, FarmMeta, FarmReward};
pub use registry::{ClaimPlan, FarmRegistry, RewardPayout, StakeChange};
pub use reward_pool::{RewardPool, RewardPoolMeta};
pub use stake::{Stake, StakeMeta};
