//! Per-account staking position and its reward-debt bookkeeping.

use std::collections::BTreeMap;

use serde::Serialize;

use super::Accrual;
use crate::domain::{AccountId, Amount, RewardId, Rounding};
use crate::error::DexError;
use crate::math::CheckedArithmetic;
use crate::traits::RewardReceiver;

/// One account's stake in a farm.
///
/// For every reward id the amount owed is
/// `pending_rewards[id] + floor(balance × acc[id]) − reward_debt[id]`.
/// Debts round up and accrued amounts round down, so rounding never pays
/// out more than the farm emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stake {
    balance: Amount,
    reward_debt: BTreeMap<RewardId, Amount>,
    pending_rewards: BTreeMap<RewardId, Amount>,
}

impl Stake {
    /// LP shares staked.
    pub const fn balance(&self) -> Amount {
        self.balance
    }

    /// Reward debt for `reward`.
    pub fn reward_debt(&self, reward: RewardId) -> Amount {
        self.reward_debt.get(&reward).copied().unwrap_or_default()
    }

    /// Rewards earned since the last debt reset, under accumulator `acc`.
    fn accrued(&self, reward: RewardId, acc: Amount) -> Result<Amount, DexError> {
        let earned = self.balance.safe_mul(&acc, Rounding::Down)?;
        Ok(earned.saturating_sub(&self.reward_debt(reward)))
    }

    /// Everything owed for `reward`: held rewards plus newly accrued ones.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Overflow`] if the totals do not fit.
    pub fn owed(&self, reward: RewardId, acc: Amount) -> Result<Amount, DexError> {
        let held = self.pending_rewards.get(&reward).copied().unwrap_or_default();
        held.safe_add(&self.accrued(reward, acc)?)
    }

    /// The stake after moving to `balance`: accrued rewards are held for the
    /// next claim and every debt is reset against the new balance.
    pub(crate) fn rebalanced(&self, balance: Amount, accrual: &Accrual) -> Result<Self, DexError> {
        let mut next = self.clone();
        for (reward, acc) in accrual.accumulators() {
            let held = self.owed(reward, acc)?;
            if held.is_zero() {
                next.pending_rewards.remove(&reward);
            } else {
                next.pending_rewards.insert(reward, held);
            }
            next.reward_debt
                .insert(reward, balance.safe_mul(&acc, Rounding::Up)?);
        }
        next.balance = balance;
        Ok(next)
    }

    /// The stake after paying out everything owed, with the amounts paid.
    pub(crate) fn claimed(
        &self,
        accrual: &Accrual,
    ) -> Result<(Self, BTreeMap<RewardId, Amount>), DexError> {
        let mut next = self.clone();
        let mut paid = BTreeMap::new();
        for (reward, acc) in accrual.accumulators() {
            paid.insert(reward, self.owed(reward, acc)?);
            next.pending_rewards.remove(&reward);
            next.reward_debt
                .insert(reward, self.balance.safe_mul(&acc, Rounding::Up)?);
        }
        Ok((next, paid))
    }

    /// Snapshot with pending rewards projected under `accrual`.
    pub(crate) fn meta(
        &self,
        address: &AccountId,
        receiver: Option<&RewardReceiver>,
        accrual: &Accrual,
    ) -> Result<StakeMeta, DexError> {
        let pending_rewards = accrual
            .accumulators()
            .map(|(reward, acc)| Ok((reward, self.owed(reward, acc)?)))
            .collect::<Result<_, DexError>>()?;
        Ok(StakeMeta {
            address: address.clone(),
            balance: self.balance,
            reward_debt_by_id: self.reward_debt.clone(),
            pending_rewards,
            receiver: receiver.cloned(),
        })
    }
}

/// Public view of a stake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeMeta {
    /// Staker.
    pub address: AccountId,
    /// LP shares staked.
    pub balance: Amount,
    /// Reward debt per reward id.
    #[serde(rename = "rewardDebtByID")]
    pub reward_debt_by_id: BTreeMap<RewardId, Amount>,
    /// Claimable rewards per reward id as of the view's timestamp.
    pub pending_rewards: BTreeMap<RewardId, Amount>,
    /// Alternate claim destination, if registered.
    pub receiver: Option<RewardReceiver>,
}
