//! Admin-only operations: freezing, fees, farms, reward pools, mock time.

use std::collections::BTreeMap;

use tracing::info;

use super::Exchange;
use crate::domain::{AccountId, Amount, FarmId, FeeRate, PoolId, RewardId, Timestamp, TokenId};
use crate::error::DexError;
use crate::events::{Event, FeeKind, Receipt};
use crate::traits::Ledger;

impl<L: Ledger> Exchange<L> {
    /// Flips a pool between active and frozen and returns the new state.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Unauthorized`] and [`DexError::UnknownPool`].
    pub fn toggle_freeze(&mut self, caller: &AccountId, pool_id: PoolId) -> Result<Receipt<bool>, DexError> {
        self.ensure_admin(caller, "toggle a pool freeze")?;
        let is_frozen = self.pools.get_mut(pool_id)?.toggle_frozen();
        info!(pool_id = %pool_id, is_frozen, "pool freeze toggled");
        Ok(Receipt::new(
            is_frozen,
            vec![Event::PoolFreezeChanged { pool_id, is_frozen }],
        ))
    }

    /// Pays the whole treasury bucket of `token` to the fee sink.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Unauthorized`] and [`DexError::NoFeesCollected`]
    /// if the bucket is empty.
    pub fn withdraw_fees(&mut self, caller: &AccountId, token: &TokenId) -> Result<Receipt<Amount>, DexError> {
        self.ensure_admin(caller, "withdraw fees")?;
        let amount = self.treasury.balance(token);
        if amount.is_zero() {
            return Err(DexError::NoFeesCollected(token.clone()));
        }
        let sink = self.config.fee_sink().clone();
        self.ensure_receivable(&sink, token, amount)?;

        let vault = self.treasury.withdraw_all(token)?;
        self.ledger.deposit(&sink, vault)?;

        info!(token = %token, %amount, sink = %sink, "fees withdrawn");
        let events = vec![
            Event::TokensDeposited {
                token: token.clone(),
                amount,
                to: Some(sink.clone()),
            },
            Event::FeesReceived {
                token: token.clone(),
                amount,
                to: sink,
            },
        ];
        Ok(Receipt::new(amount, events))
    }

    /// Pays every nonempty treasury bucket to the fee sink.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Unauthorized`].
    pub fn withdraw_all_fees(
        &mut self,
        caller: &AccountId,
    ) -> Result<Receipt<BTreeMap<TokenId, Amount>>, DexError> {
        self.ensure_admin(caller, "withdraw fees")?;
        let tokens = self.treasury.nonempty_tokens();
        let sink = self.config.fee_sink().clone();
        for token in &tokens {
            self.ensure_receivable(&sink, token, self.treasury.balance(token))?;
        }

        let mut paid = BTreeMap::new();
        let mut events = Vec::with_capacity(tokens.len() * 2);
        for token in tokens {
            let (amount, mut bucket_events) = self.withdraw_fees(caller, &token)?.into_parts();
            paid.insert(token, amount);
            events.append(&mut bucket_events);
        }
        Ok(Receipt::new(paid, events))
    }

    /// Sets the LP fee charged on every swap.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Unauthorized`] and [`DexError::InvalidFee`] if
    /// the two fees would reach `1.0`.
    pub fn update_lp_fee(&mut self, caller: &AccountId, fee: FeeRate) -> Result<Receipt<()>, DexError> {
        self.ensure_admin(caller, "update the LP fee")?;
        ensure_fees_below_one(self.fees.dao_fee, fee)?;
        self.fees.lp_fee = fee;
        info!(%fee, "LP fee updated");
        Ok(Receipt::new(
            (),
            vec![Event::FeeUpdated {
                kind: FeeKind::Lp,
                fee,
            }],
        ))
    }

    /// Sets the DAO fee charged on every swap.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Unauthorized`] and [`DexError::InvalidFee`] if
    /// the two fees would reach `1.0`.
    pub fn update_dao_fee(&mut self, caller: &AccountId, fee: FeeRate) -> Result<Receipt<()>, DexError> {
        self.ensure_admin(caller, "update the DAO fee")?;
        ensure_fees_below_one(fee, self.fees.lp_fee)?;
        self.fees.dao_fee = fee;
        info!(%fee, "DAO fee updated");
        Ok(Receipt::new(
            (),
            vec![Event::FeeUpdated {
                kind: FeeKind::Dao,
                fee,
            }],
        ))
    }

    // -- Farming --------------------------------------------------------------

    /// Registers farm `farm_id`, which stakes the LP shares of the pool with
    /// the same id and joins every existing reward pool.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Unauthorized`] and [`DexError::DuplicateFarm`].
    pub fn create_farm(&mut self, caller: &AccountId, farm_id: FarmId) -> Result<Receipt<FarmId>, DexError> {
        self.ensure_admin(caller, "create a farm")?;
        self.farms.create_farm(farm_id, self.now())?;
        info!(farm_id = %farm_id, "farm created");
        Ok(Receipt::new(
            farm_id,
            vec![Event::NewFarmCreated { farm_id }],
        ))
    }

    /// Funds a new reward pool with `amount` of the caller's `token`.
    ///
    /// The pool emits at the configured default rate and every farm joins
    /// it at the default weight.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Unauthorized`], [`DexError::InvalidAmount`] for a
    /// zero amount and [`DexError::InsufficientBalance`].
    pub fn create_reward_pool(
        &mut self,
        caller: &AccountId,
        token: &TokenId,
        amount: Amount,
        accepted_collateral: Vec<String>,
    ) -> Result<Receipt<RewardId>, DexError> {
        self.ensure_admin(caller, "create a reward pool")?;
        if amount.is_zero() {
            return Err(DexError::InvalidAmount("reward pool funding must be positive"));
        }
        self.ensure_funds(caller, token, amount)?;

        let now = self.now();
        let vault = self.ledger.withdraw(caller, token, amount)?;
        let reward_id = self.farms.create_reward_pool(vault, accepted_collateral, now);

        info!(reward_id = %reward_id, token = %token, %amount, "reward pool created");
        let events = vec![
            Event::TokensWithdrawn {
                token: token.clone(),
                amount,
                from: Some(caller.clone()),
            },
            Event::RewardPoolCreated {
                reward_id,
                token: token.clone(),
                amount,
            },
        ];
        Ok(Receipt::new(reward_id, events))
    }

    /// Changes a reward pool's emission rate from now on.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Unauthorized`] and [`DexError::UnknownRewardPool`].
    pub fn set_reward_rate(
        &mut self,
        caller: &AccountId,
        reward_id: RewardId,
        tokens_per_second: Amount,
    ) -> Result<Receipt<()>, DexError> {
        self.ensure_admin(caller, "set a reward rate")?;
        self.farms
            .set_reward_rate(reward_id, tokens_per_second, self.now())?;
        info!(reward_id = %reward_id, %tokens_per_second, "reward rate updated");
        Ok(Receipt::new(
            (),
            vec![Event::RewardRateUpdated {
                reward_id,
                tokens_per_second,
            }],
        ))
    }

    /// Changes a farm's share of a reward pool from now on. A zero weight
    /// stops the farm's emission for that reward.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Unauthorized`], [`DexError::UnknownFarm`] and
    /// [`DexError::UnknownRewardPool`].
    pub fn set_farm_weight(
        &mut self,
        caller: &AccountId,
        farm_id: FarmId,
        reward_id: RewardId,
        weight: Amount,
    ) -> Result<Receipt<()>, DexError> {
        self.ensure_admin(caller, "set a farm weight")?;
        self.farms
            .set_farm_weight(farm_id, reward_id, weight, self.now())?;
        info!(farm_id = %farm_id, reward_id = %reward_id, %weight, "farm weight updated");
        Ok(Receipt::new(
            (),
            vec![Event::FarmWeightUpdated {
                farm_id,
                reward_id,
                weight,
            }],
        ))
    }

    // -- Mock time ------------------------------------------------------------

    /// Switches the injected mock clock between mock and system time and
    /// returns whether mock time is now in effect.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Unauthorized`] and [`DexError::ClockNotMockable`]
    /// if the exchange runs on a system clock.
    pub fn toggle_mock_time(&mut self, caller: &AccountId) -> Result<Receipt<bool>, DexError> {
        self.ensure_admin(caller, "toggle mock time")?;
        let enabled = self.clock.as_mock().ok_or(DexError::ClockNotMockable)?.toggle();
        info!(enabled, "mock time toggled");
        Ok(Receipt::new(enabled, Vec::new()))
    }

    /// Moves mock time forward by `delta` seconds and returns the new mock
    /// time.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Unauthorized`], [`DexError::ClockNotMockable`]
    /// and [`DexError::Overflow`].
    pub fn advance_mock_time(
        &mut self,
        caller: &AccountId,
        delta: Amount,
    ) -> Result<Receipt<Timestamp>, DexError> {
        self.ensure_admin(caller, "advance mock time")?;
        let now = self
            .clock
            .as_mock()
            .ok_or(DexError::ClockNotMockable)?
            .advance(delta)?;
        info!(%delta, %now, "mock time advanced");
        Ok(Receipt::new(now, Vec::new()))
    }
}

fn ensure_fees_below_one(dao_fee: FeeRate, lp_fee: FeeRate) -> Result<(), DexError> {
    if dao_fee.combined(&lp_fee)?.fraction() >= Amount::ONE {
        return Err(DexError::InvalidFee("dao_fee + lp_fee must be below 1.0"));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use super::super::staking::tests::farming_exchange;
    use super::super::tests::{admin, amt, exchange, token, user};
    use super::*;
    use crate::clock::SystemClock;
    use crate::config::{ClockConfig, ExchangeConfig};
    use crate::error::ErrorKind;
    use crate::ledger::InMemoryLedger;

    fn fee(s: &str) -> FeeRate {
        let Ok(f) = FeeRate::parse(s) else {
            panic!("valid fee literal: {s}");
        };
        f
    }

    // -- Freezing -------------------------------------------------------------

    #[test]
    fn toggle_freeze_flips_state() {
        let (mut dex, _clock) = farming_exchange();
        let Ok(receipt) = dex.toggle_freeze(&admin(), PoolId::new(0)) else {
            panic!("expected Ok");
        };
        assert!(receipt.value);
        assert_eq!(receipt.event_names(), vec!["PoolFreezeChanged"]);
        let r = dex.add_liquidity(&user(), PoolId::new(0), amt("1"), amt("1.5"));
        assert!(matches!(r, Err(ref e) if e.kind() == ErrorKind::FrozenPool));
        let Ok(receipt) = dex.toggle_freeze(&admin(), PoolId::new(0)) else {
            panic!("expected Ok");
        };
        assert!(!receipt.value);
    }

    #[test]
    fn non_admin_cannot_freeze() {
        let (mut dex, _clock) = farming_exchange();
        let r = dex.toggle_freeze(&user(), PoolId::new(0));
        assert!(matches!(r, Err(DexError::Unauthorized { .. })));
    }

    // -- Fees -----------------------------------------------------------------

    #[test]
    fn withdraw_fees_pays_sink() {
        let (mut dex, _clock) = farming_exchange();
        let flow = token("flowTokenVault");
        let Ok(_) = dex.swap(&user(), PoolId::new(0), &flow, amt("10")) else {
            panic!("expected Ok");
        };
        let before = dex.ledger().balance(&admin(), &flow);
        let Ok(receipt) = dex.withdraw_fees(&admin(), &flow) else {
            panic!("expected Ok");
        };
        assert_eq!(receipt.value, amt("0.025"));
        assert_eq!(receipt.event_names(), vec!["TokensDeposited", "FeesReceived"]);
        // The fee sink defaults to the admin.
        assert_eq!(dex.ledger().balance(&admin(), &flow), before.saturating_add(&amt("0.025")));
        assert_eq!(dex.read_fees_collected().get(&flow), Some(&Amount::ZERO));
        assert!(matches!(
            dex.withdraw_fees(&admin(), &flow),
            Err(DexError::NoFeesCollected(_))
        ));
    }

    #[test]
    fn withdraw_all_fees_drains_every_bucket() {
        let (mut dex, _clock) = farming_exchange();
        let Ok(_) = dex.swap(&user(), PoolId::new(0), &token("flowTokenVault"), amt("4")) else {
            panic!("expected Ok");
        };
        let Ok(_) = dex.swap(&user(), PoolId::new(0), &token("fusdVault"), amt("4")) else {
            panic!("expected Ok");
        };
        let Ok(receipt) = dex.withdraw_all_fees(&admin()) else {
            panic!("expected Ok");
        };
        assert_eq!(receipt.value.len(), 2);
        assert_eq!(receipt.events.len(), 4);
        assert!(dex.read_fees_collected().values().all(|a| a.is_zero()));
    }

    #[test]
    fn fee_updates_respect_combined_limit() {
        let (mut dex, _clock) = exchange();
        let Ok(receipt) = dex.update_lp_fee(&admin(), fee("0.003")) else {
            panic!("expected Ok");
        };
        assert_eq!(receipt.event_names(), vec!["FeeUpdated"]);
        assert_eq!(dex.get_lp_fee_percentage(), fee("0.003"));
        assert!(matches!(
            dex.update_dao_fee(&admin(), fee("0.997")),
            Err(DexError::InvalidFee(_))
        ));
        assert!(matches!(
            dex.update_dao_fee(&user(), fee("0.001")),
            Err(DexError::Unauthorized { .. })
        ));
        assert_eq!(dex.get_dao_fee_percentage(), FeeRate::DEFAULT);
    }

    #[test]
    fn zero_dao_fee_still_emits_fee_events() {
        let (mut dex, _clock) = farming_exchange();
        let Ok(_) = dex.update_dao_fee(&admin(), FeeRate::ZERO) else {
            panic!("expected Ok");
        };
        let Ok(receipt) = dex.swap(&user(), PoolId::new(0), &token("flowTokenVault"), amt("1")) else {
            panic!("expected Ok");
        };
        assert_eq!(receipt.events.len(), 7);
        assert_eq!(receipt.value.dao_fee(), Amount::ZERO);
    }

    // -- Farming --------------------------------------------------------------

    #[test]
    fn create_reward_pool_withdraws_funding() {
        let (mut dex, _clock) = exchange();
        let emu = token("emuTokenVault");
        let Ok(receipt) = dex.create_reward_pool(&admin(), &emu, amt("200"), vec!["EmuNFT".into()]) else {
            panic!("expected Ok");
        };
        assert_eq!(receipt.value, RewardId::new(0));
        assert_eq!(receipt.event_names(), vec!["TokensWithdrawn", "RewardPoolCreated"]);
        assert_eq!(dex.ledger().balance(&admin(), &emu), amt("800"));
        let pools = dex.get_reward_pools();
        assert_eq!(pools.len(), 1);
        assert_eq!(pools[0].remaining, amt("200"));

        assert!(matches!(
            dex.create_reward_pool(&admin(), &emu, Amount::ZERO, Vec::new()),
            Err(DexError::InvalidAmount(_))
        ));
        assert!(matches!(
            dex.create_reward_pool(&admin(), &emu, amt("900"), Vec::new()),
            Err(DexError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn duplicate_farm_rejected() {
        let (mut dex, _clock) = farming_exchange();
        let Ok(receipt) = dex.create_farm(&admin(), FarmId::new(1)) else {
            panic!("expected Ok");
        };
        assert_eq!(receipt.event_names(), vec!["NewFarmCreated"]);
        assert!(matches!(
            dex.create_farm(&admin(), FarmId::new(1)),
            Err(DexError::DuplicateFarm(_))
        ));
        assert_eq!(dex.get_farm_ids(), vec![FarmId::new(0), FarmId::new(1)]);
    }

    #[test]
    fn rate_and_weight_changes_settle_first() {
        let (mut dex, clock) = farming_exchange();
        let Ok(_) = dex.stake(&user(), FarmId::new(0), amt("1")) else {
            panic!("expected Ok");
        };
        let Ok(_) = clock.advance(amt("10")) else {
            panic!("advance");
        };
        let Ok(receipt) = dex.set_reward_rate(&admin(), RewardId::new(0), amt("2")) else {
            panic!("expected Ok");
        };
        assert_eq!(receipt.event_names(), vec!["RewardRateUpdated"]);
        let Ok(_) = clock.advance(amt("10")) else {
            panic!("advance");
        };
        let Ok(receipt) = dex.set_farm_weight(&admin(), FarmId::new(0), RewardId::new(0), Amount::ZERO)
        else {
            panic!("expected Ok");
        };
        assert_eq!(receipt.event_names(), vec!["FarmWeightUpdated"]);
        let Ok(_) = clock.advance(amt("10")) else {
            panic!("advance");
        };
        // 10 s at 1/s, 10 s at 2/s, then nothing at weight zero.
        let Ok(pending) = dex.get_pending_rewards(FarmId::new(0), &user()) else {
            panic!("expected Ok");
        };
        assert_eq!(pending.get(&RewardId::new(0)), Some(&amt("30")));
    }

    // -- Mock time ------------------------------------------------------------

    #[test]
    fn mock_time_controls() {
        let (mut dex, _clock) = exchange();
        let Ok(receipt) = dex.advance_mock_time(&admin(), amt("12.5")) else {
            panic!("expected Ok");
        };
        assert_eq!(receipt.value, dex.now());
        assert_eq!(dex.now().as_secs(), amt("12.5"));
        let Ok(receipt) = dex.toggle_mock_time(&admin()) else {
            panic!("expected Ok");
        };
        assert!(!receipt.value);
        assert!(dex.now().as_secs() > amt("1000000"));
    }

    #[test]
    fn configured_mock_clock_starts_enabled() {
        let config = ExchangeConfig::new(admin()).with_clock(ClockConfig::Mock {
            start: Timestamp::ZERO,
        });
        let Ok(mut dex) = Exchange::new(config, InMemoryLedger::new()) else {
            panic!("valid config");
        };
        assert_eq!(dex.now(), Timestamp::ZERO);
        // Mock time is already on, so the first toggle switches to system time.
        let Ok(receipt) = dex.toggle_mock_time(&admin()) else {
            panic!("expected Ok");
        };
        assert!(!receipt.value);
        let Ok(advanced) = dex.advance_mock_time(&admin(), amt("5")) else {
            panic!("expected Ok");
        };
        assert_eq!(advanced.value.as_secs(), amt("5"));
        assert!(dex.now().as_secs() > amt("1000000"));
        let Ok(receipt) = dex.toggle_mock_time(&admin()) else {
            panic!("expected Ok");
        };
        assert!(receipt.value);
        assert_eq!(dex.now().as_secs(), amt("5"));
    }

    #[test]
    fn system_clock_is_not_mockable() {
        let Ok(mut dex) = Exchange::with_clock(
            ExchangeConfig::new(admin()),
            InMemoryLedger::new(),
            Arc::new(SystemClock::new()),
        ) else {
            panic!("valid config");
        };
        assert!(matches!(
            dex.advance_mock_time(&admin(), amt("1")),
            Err(DexError::ClockNotMockable)
        ));
        assert!(matches!(
            dex.toggle_mock_time(&admin()),
            Err(DexError::ClockNotMockable)
        ));
    }
}
