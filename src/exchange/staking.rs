//! Staking LP shares in farms and claiming rewards.

use std::collections::BTreeMap;

use tracing::info;

use super::Exchange;
use crate::domain::{AccountId, Amount, FarmId, PoolId, RewardId, TokenId};
use crate::error::DexError;
use crate::events::{Event, Receipt};
use crate::farms::StakeChange;
use crate::traits::{Ledger, RewardReceiver};

impl<L: Ledger> Exchange<L> {
    /// Stakes `amount` of the caller's LP shares in `farm_id` and returns
    /// the caller's staked balance afterwards.
    ///
    /// A farm accepts the LP shares of the pool with the same id. Rewards
    /// owed on the previous balance are held until the next claim.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownFarm`], [`DexError::InvalidAmount`] for a
    /// zero amount and [`DexError::InsufficientBalance`] if the caller holds
    /// fewer LP shares.
    pub fn stake(
        &mut self,
        caller: &AccountId,
        farm_id: FarmId,
        amount: Amount,
    ) -> Result<Receipt<Amount>, DexError> {
        let change = self.farms.preview_stake(farm_id, caller, amount, self.now())?;
        self.lp_shares.ensure_covers(farm_id.lp_pool(), caller, amount)?;

        self.lp_shares.debit(farm_id.lp_pool(), caller, amount)?;
        let events = Self::stake_events(caller, &change, amount);
        let balance = change.balance();
        self.farms.commit_stake(change);

        info!(farm_id = %farm_id, caller = %caller, %amount, %balance, "LP shares staked");
        Ok(Receipt::new(balance, events))
    }

    /// Returns `amount` staked LP shares to the caller and returns the
    /// caller's remaining staked balance.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownFarm`], [`DexError::InvalidAmount`] for a
    /// zero amount and [`DexError::InsufficientBalance`] if the caller has
    /// fewer shares staked.
    pub fn unstake(
        &mut self,
        caller: &AccountId,
        farm_id: FarmId,
        amount: Amount,
    ) -> Result<Receipt<Amount>, DexError> {
        let change = self.farms.preview_unstake(farm_id, caller, amount, self.now())?;
        let lp_pool = farm_id.lp_pool();
        if self.lp_shares.balance(lp_pool, caller).checked_add(&amount).is_none() {
            return Err(DexError::Overflow("LP balance overflow"));
        }

        self.lp_shares.credit(lp_pool, caller, amount)?;
        let balance = change.balance();
        let total_staked = change.total_staked();
        self.farms.commit_stake(change);

        info!(farm_id = %farm_id, caller = %caller, %amount, %balance, "LP shares unstaked");

        let events = vec![
            Event::LpTokensWithdrawn {
                pool_id: lp_pool,
                amount,
                from: None,
            },
            Event::LpTokensDeposited {
                pool_id: lp_pool,
                amount,
                to: Some(caller.clone()),
            },
            Event::TokensUnstaked {
                address: caller.clone(),
                pool_id: farm_id,
                amount_unstaked: amount,
                total_staked,
            },
        ];
        Ok(Receipt::new(balance, events))
    }

    /// Adds liquidity and stakes the minted shares in the farm with the
    /// pool's id, as one operation. Returns the shares minted and staked.
    ///
    /// # Errors
    ///
    /// Any error of [`add_liquidity`](Self::add_liquidity) or
    /// [`stake`](Self::stake); nothing changes on error.
    pub fn add_liquidity_and_stake(
        &mut self,
        caller: &AccountId,
        pool_id: PoolId,
        amount_a: Amount,
        amount_b: Amount,
    ) -> Result<Receipt<Amount>, DexError> {
        let minted = self.pools.get(pool_id)?.preview_add_liquidity(
            amount_a,
            amount_b,
            self.config.lp_bootstrap(),
        )?;
        let change = self
            .farms
            .preview_stake(pool_id.farm(), caller, minted, self.now())?;

        let (minted, mut events) = self
            .add_liquidity(caller, pool_id, amount_a, amount_b)?
            .into_parts();
        self.lp_shares.debit(pool_id, caller, minted)?;
        events.extend(Self::stake_events(caller, &change, minted));
        self.farms.commit_stake(change);

        info!(pool_id = %pool_id, caller = %caller, %minted, "liquidity added and staked");
        Ok(Receipt::new(minted, events))
    }

    /// Pays the caller everything owed on `farm_id`, per reward id.
    ///
    /// Reward ids with nothing owed report zero and emit no events. Tokens
    /// go through the caller's registered [`RewardReceiver`], if any.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownFarm`] and [`DexError::NoRewardPools`] if
    /// no reward pool exists yet.
    pub fn claim_rewards(
        &mut self,
        caller: &AccountId,
        farm_id: FarmId,
    ) -> Result<Receipt<BTreeMap<RewardId, Amount>>, DexError> {
        let plan = self.farms.preview_claim(farm_id, caller, self.now())?;
        let mut per_token: BTreeMap<TokenId, Amount> = BTreeMap::new();
        for payout in plan.payouts() {
            let total = per_token.entry(payout.token.clone()).or_insert(Amount::ZERO);
            *total = total
                .checked_add(&payout.amount)
                .ok_or(DexError::Overflow("claim total overflow"))?;
        }
        for (token, total) in &per_token {
            self.ensure_receivable(caller, token, *total)?;
        }
        let receiver = self.farms.farm(farm_id)?.receiver(caller).cloned();
        let claimed = plan.claimed().clone();

        let custody = self.custody();
        let mut events = Vec::new();
        for (payout, vault) in self.farms.commit_claim(plan)? {
            match &receiver {
                Some(receiver) => self.ledger.deposit_to_receiver(caller, receiver, vault)?,
                None => self.ledger.deposit(caller, vault)?,
            }
            info!(
                farm_id = %farm_id,
                caller = %caller,
                reward_id = %payout.reward_id,
                amount = %payout.amount,
                "rewards claimed"
            );
            events.push(Event::TokensWithdrawn {
                token: payout.token.clone(),
                amount: payout.amount,
                from: custody.clone(),
            });
            events.push(Event::TokensDeposited {
                token: payout.token.clone(),
                amount: payout.amount,
                to: Some(caller.clone()),
            });
            events.push(Event::RewardsClaimed {
                address: caller.clone(),
                farm_id,
                reward_id: payout.reward_id,
                amount_claimed: payout.amount,
                reward_debt: payout.reward_debt,
                token_type: payout.token.vault_type(),
                total_remaining: payout.total_remaining,
            });
        }
        Ok(Receipt::new(claimed, events))
    }

    /// Registers where future claims on `farm_id` are delivered for the
    /// caller. Emits no events.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::UnknownFarm`].
    pub fn add_reward_receiver(
        &mut self,
        caller: &AccountId,
        farm_id: FarmId,
        public_path: impl Into<String>,
        storage_path: impl Into<String>,
    ) -> Result<Receipt<()>, DexError> {
        let receiver = RewardReceiver {
            public_path: public_path.into(),
            storage_path: storage_path.into(),
        };
        self.farms.set_receiver(farm_id, caller.clone(), receiver)?;
        info!(farm_id = %farm_id, caller = %caller, "reward receiver registered");
        Ok(Receipt::new((), Vec::new()))
    }

    fn stake_events(caller: &AccountId, change: &StakeChange, amount: Amount) -> Vec<Event> {
        let farm_id = change.farm_id();
        let mut events = vec![Event::LpTokensWithdrawn {
            pool_id: farm_id.lp_pool(),
            amount,
            from: Some(caller.clone()),
        }];
        if change.first_stake() {
            events.push(Event::LpTokensDeposited {
                pool_id: farm_id.lp_pool(),
                amount,
                to: None,
            });
        }
        events.push(Event::TokensStaked {
            address: caller.clone(),
            pool_id: farm_id,
            amount_staked: amount,
            total_staked: change.total_staked(),
        });
        if change.first_stake() {
            events.push(Event::StakingControllerDeposited {
                farm_id,
                to: caller.clone(),
            });
        }
        events
    }
}
