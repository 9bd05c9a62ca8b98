//! The top-level exchange context.
//!
//! [`Exchange`] owns every pool, farm, reward pool and the fee treasury,
//! and moves tokens through an injected [`Ledger`]. Its operations are
//! grouped by concern:
//!
//! | File | Operations |
//! |------|------------|
//! | `liquidity` | pool creation, adding and removing liquidity |
//! | `swap` | swaps and quotes |
//! | `staking` | stake, unstake, claims, reward receivers |
//! | `admin` | freezing, fees, farms, reward pools, mock time |
//! | `views` | read-only metadata |
//!
//! Every mutating operation takes the caller's account, runs all of its
//! validation before the first transfer, and returns a
//! [`Receipt`](crate::events::Receipt) with the events it emitted. A failed
//! operation changes nothing and emits nothing. Writes take `&mut self`, so
//! the borrow checker serializes them; views take `&self` and always see
//! the last committed state.

mod admin;
mod liquidity;
mod staking;
mod swap;
mod views;

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::ExchangeConfig;
use crate::domain::{AccountId, Amount, TokenId, Timestamp};
use crate::error::DexError;
use crate::farms::FarmRegistry;
use crate::pools::{FeeSchedule, LpShareBook, PoolRegistry};
use crate::traits::{Clock, Ledger};
use crate::treasury::Treasury;

/// Constant-product DEX with yield farming.
///
/// # Examples
///
/// ```
/// use hydra_dex::config::{ClockConfig, ExchangeConfig};
/// use hydra_dex::domain::{AccountId, Amount, TokenId, Timestamp};
/// use hydra_dex::exchange::Exchange;
/// use hydra_dex::ledger::InMemoryLedger;
///
/// let admin = AccountId::new("0xf8d6e0586b0a20c7").expect("valid");
/// let flow = TokenId::resolve("flowTokenVault").expect("alias");
/// let fusd = TokenId::resolve("fusdVault").expect("alias");
///
/// let mut ledger = InMemoryLedger::new();
/// ledger.mint(&admin, &flow, Amount::from_units(1_000).expect("fits")).expect("mint");
/// ledger.mint(&admin, &fusd, Amount::from_units(1_000).expect("fits")).expect("mint");
///
/// let config = ExchangeConfig::new(admin.clone())
///     .with_clock(ClockConfig::Mock { start: Timestamp::ZERO });
/// let mut dex = Exchange::new(config, ledger).expect("valid config");
///
/// let receipt = dex
///     .create_pool(&admin, &flow, "100".parse().expect("amount"), &fusd, "150".parse().expect("amount"))
///     .expect("pool created");
/// assert_eq!(receipt.events.len(), 9);
///
/// let meta = dex.get_pool_meta(receipt.value).expect("pool exists");
/// assert_eq!(meta.reserve_b.to_string(), "150.00000000");
/// assert_eq!(meta.total_supply.to_string(), "1.00000000");
/// ```
#[derive(Debug)]
pub struct Exchange<L: Ledger> {
    config: ExchangeConfig,
    clock: Arc<dyn Clock>,
    ledger: L,
    pools: PoolRegistry,
    lp_shares: LpShareBook,
    treasury: Treasury,
    farms: FarmRegistry,
    fees: FeeSchedule,
}

impl<L: Ledger> Exchange<L> {
    /// Creates an exchange with the clock selected in `config`.
    ///
    /// # Errors
    ///
    /// Returns the configuration's validation error.
    pub fn new(config: ExchangeConfig, ledger: L) -> Result<Self, DexError> {
        let clock = config.clock().build();
        Self::with_clock(config, ledger, clock)
    }

    /// Creates an exchange reading time from `clock`.
    ///
    /// A configured genesis reward pool is funded from the ledger here and
    /// takes reward id `0`.
    ///
    /// # Errors
    ///
    /// Returns the configuration's validation error, or
    /// [`DexError::InsufficientBalance`] if the genesis funder cannot cover
    /// the funding.
    pub fn with_clock(
        config: ExchangeConfig,
        ledger: L,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DexError> {
        config.validate()?;
        let fees = FeeSchedule {
            dao_fee: config.dao_fee(),
            lp_fee: config.lp_fee(),
        };
        let mut exchange = Self {
            farms: FarmRegistry::new(config.farming()),
            config,
            clock,
            ledger,
            pools: PoolRegistry::new(),
            lp_shares: LpShareBook::new(),
            treasury: Treasury::new(),
            fees,
        };
        exchange.open_genesis_reward_pool()?;
        Ok(exchange)
    }

    fn open_genesis_reward_pool(&mut self) -> Result<(), DexError> {
        let Some(genesis) = self.config.genesis_reward_pool().cloned() else {
            return Ok(());
        };
        let funder = genesis.funder.unwrap_or_else(|| self.config.admin().clone());
        self.ensure_funds(&funder, &genesis.token, genesis.funding)?;
        let now = self.now();
        let vault = self.ledger.withdraw(&funder, &genesis.token, genesis.funding)?;
        let reward_id = self
            .farms
            .create_reward_pool(vault, genesis.accepted_collateral, now);
        info!(
            reward_id = %reward_id,
            token = %genesis.token,
            funding = %genesis.funding,
            "genesis reward pool opened"
        );
        Ok(())
    }

    /// The configuration the exchange was built with.
    #[must_use]
    pub const fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// The token ledger.
    #[must_use]
    pub const fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Mutable access to the token ledger, e.g. for funding accounts.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// Current time as read from the injected clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    fn ensure_admin(&self, caller: &AccountId, action: &'static str) -> Result<(), DexError> {
        if caller != self.config.admin() {
            warn!(caller = %caller, action, "rejected admin operation");
            return Err(DexError::Unauthorized {
                caller: caller.clone(),
                action,
            });
        }
        Ok(())
    }

    fn ensure_funds(&self, owner: &AccountId, token: &TokenId, amount: Amount) -> Result<(), DexError> {
        let available = self.ledger.balance(owner, token);
        if available < amount {
            return Err(DexError::InsufficientBalance {
                holder: owner.to_string(),
                asset: token.to_string(),
                requested: amount,
                available,
            });
        }
        Ok(())
    }

    fn ensure_receivable(&self, owner: &AccountId, token: &TokenId, amount: Amount) -> Result<(), DexError> {
        if self.ledger.balance(owner, token).checked_add(&amount).is_none() {
            return Err(DexError::Overflow("recipient balance overflow"));
        }
        Ok(())
    }

    fn custody(&self) -> Option<AccountId> {
        Some(self.config.custody_account().clone())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) mod tests {
    use super::*;
    use crate::clock::MockClock;
    use crate::config::GenesisRewardPool;
    use crate::domain::RewardId;
    use crate::ledger::InMemoryLedger;

    pub(crate) fn amt(s: &str) -> Amount {
        let Ok(a) = s.parse::<Amount>() else {
            panic!("invalid amount literal in test: {s}");
        };
        a
    }

    pub(crate) fn account(address: &str) -> AccountId {
        let Ok(a) = AccountId::new(address) else {
            panic!("valid address");
        };
        a
    }

    pub(crate) fn token(name: &str) -> TokenId {
        let Ok(t) = TokenId::resolve(name) else {
            panic!("valid token: {name}");
        };
        t
    }

    pub(crate) fn admin() -> AccountId {
        account("0xf8d6e0586b0a20c7")
    }

    pub(crate) fn user() -> AccountId {
        account("0x01cf0e2f2f715450")
    }

    /// Exchange with funded admin and user accounts and a mock clock at 0.
    pub(crate) fn exchange() -> (Exchange<InMemoryLedger>, Arc<MockClock>) {
        let mut ledger = InMemoryLedger::new();
        for who in [admin(), user()] {
            for name in ["flowTokenVault", "fusdVault", "emuTokenVault"] {
                let Ok(()) = ledger.mint(&who, &token(name), amt("1000")) else {
                    panic!("mint failed");
                };
            }
        }
        let clock = Arc::new(MockClock::new(Timestamp::ZERO));
        let Ok(dex) = Exchange::with_clock(ExchangeConfig::new(admin()), ledger, clock.clone()) else {
            panic!("valid config");
        };
        (dex, clock)
    }

    #[test]
    fn invalid_config_rejected() {
        let json = r#"{"admin":"0x01","dao_fee":"0.6","lp_fee":"0.4"}"#;
        let Ok(bad) = serde_json::from_str::<ExchangeConfig>(json) else {
            panic!("parses");
        };
        assert!(matches!(
            Exchange::new(bad, InMemoryLedger::new()),
            Err(DexError::InvalidFee(_))
        ));
    }

    fn genesis_exchange() -> (Exchange<InMemoryLedger>, Arc<MockClock>) {
        let mut ledger = InMemoryLedger::new();
        for name in ["flowTokenVault", "fusdVault", "emuTokenVault"] {
            let Ok(()) = ledger.mint(&admin(), &token(name), amt("1000")) else {
                panic!("mint failed");
            };
        }
        let config = ExchangeConfig::new(admin())
            .with_genesis_reward_pool(GenesisRewardPool::new(token("emuTokenVault"), amt("500")));
        let clock = Arc::new(MockClock::new(Timestamp::ZERO));
        let Ok(dex) = Exchange::with_clock(config, ledger, clock.clone()) else {
            panic!("valid config");
        };
        (dex, clock)
    }

    #[test]
    fn genesis_reward_pool_takes_id_zero() {
        let (mut dex, _clock) = genesis_exchange();
        assert_eq!(dex.ledger().balance(&admin(), &token("emuTokenVault")), amt("500"));
        let pools = dex.get_reward_pools();
        assert_eq!(pools.len(), 1);
        assert_eq!(pools[0].reward_id, RewardId::new(0));
        assert_eq!(pools[0].balance, amt("500"));

        let Ok(receipt) = dex.create_reward_pool(&admin(), &token("fusdVault"), amt("100"), Vec::new())
        else {
            panic!("expected Ok");
        };
        assert_eq!(receipt.value, RewardId::new(1));
    }

    #[test]
    fn fresh_farm_pays_genesis_rewards() {
        let (mut dex, clock) = genesis_exchange();
        let Ok(pool) = dex.create_pool(
            &admin(),
            &token("flowTokenVault"),
            amt("100"),
            &token("fusdVault"),
            amt("150"),
        ) else {
            panic!("pool");
        };
        let Ok(_) = dex.create_farm(&admin(), pool.value.farm()) else {
            panic!("farm");
        };
        let Ok(_) = dex.stake(&admin(), pool.value.farm(), amt("1")) else {
            panic!("stake");
        };
        let Ok(_) = clock.advance(amt("10")) else {
            panic!("advance");
        };
        let Ok(claim) = dex.claim_rewards(&admin(), pool.value.farm()) else {
            panic!("claim");
        };
        assert_eq!(claim.value.get(&RewardId::new(0)), Some(&amt("10")));
    }

    #[test]
    fn unfunded_genesis_reward_pool_rejected() {
        let config = ExchangeConfig::new(admin())
            .with_genesis_reward_pool(GenesisRewardPool::new(token("emuTokenVault"), amt("5")));
        assert!(matches!(
            Exchange::new(config, InMemoryLedger::new()),
            Err(DexError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn now_reads_injected_clock() {
        let (dex, clock) = exchange();
        let Ok(_) = clock.advance(amt("42")) else {
            panic!("expected Ok");
        };
        assert_eq!(dex.now().as_secs(), amt("42"));
    }
}
