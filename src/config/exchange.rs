//! Exchange-wide configuration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::clock::{MockClock, SystemClock};
use crate::domain::{AccountId, Amount, FeeRate, Timestamp, TokenId};
use crate::error::DexError;
use crate::math::isqrt;
use crate::traits::Clock;

/// How a new pool's initial LP supply is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum LpBootstrap {
    /// Mint a fixed supply regardless of the deposit (default `1.0`).
    Fixed {
        /// Shares minted to the pool creator.
        supply: Amount,
    },
    /// Mint `sqrt(amount_a * amount_b)`.
    GeometricMean,
}

impl Default for LpBootstrap {
    fn default() -> Self {
        Self::Fixed {
            supply: Amount::ONE,
        }
    }
}

impl LpBootstrap {
    /// Shares to mint for a first deposit of `(amount_a, amount_b)`.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidAmount`] if the result is zero.
    pub fn initial_supply(&self, amount_a: Amount, amount_b: Amount) -> Result<Amount, DexError> {
        let supply = match self {
            Self::Fixed { supply } => *supply,
            // sqrt(a * 10^8 * b * 10^8) = sqrt(a * b) * 10^8, already in raw units.
            Self::GeometricMean => {
                let root = isqrt(u128::from(amount_a.raw()) * u128::from(amount_b.raw()));
                // root <= sqrt(u64::MAX^2) = u64::MAX
                Amount::from_raw(u64::try_from(root).map_err(|_| DexError::Overflow("lp bootstrap"))?)
            }
        };
        if supply.is_zero() {
            return Err(DexError::InvalidAmount("initial LP supply rounds to zero"));
        }
        Ok(supply)
    }
}

/// Defaults applied to reward pools and farm weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmingDefaults {
    /// Emission rate of a new reward pool.
    pub tokens_per_second: Amount,
    /// Weight of a farm in a reward pool it joins.
    pub weight: Amount,
}

impl Default for FarmingDefaults {
    fn default() -> Self {
        Self {
            tokens_per_second: Amount::ONE,
            weight: Amount::ONE,
        }
    }
}

/// A reward pool the exchange opens with, taking id `0`.
///
/// Its funding is withdrawn from `funder` (the admin when unset) while the
/// exchange is built, so admin-created reward pools are numbered from `1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenesisRewardPool {
    /// Reward token.
    pub token: TokenId,
    /// Tokens moved into the reward vault.
    pub funding: Amount,
    /// Account the funding is withdrawn from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funder: Option<AccountId>,
    /// NFT collections accepted as boosting collateral.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accepted_collateral: Vec<String>,
}

impl GenesisRewardPool {
    /// Funds a genesis pool of `funding` units of `token` from the admin.
    #[must_use]
    pub const fn new(token: TokenId, funding: Amount) -> Self {
        Self {
            token,
            funding,
            funder: None,
            accepted_collateral: Vec::new(),
        }
    }

    /// Withdraws the funding from `funder` instead of the admin.
    #[must_use]
    pub fn with_funder(mut self, funder: AccountId) -> Self {
        self.funder = Some(funder);
        self
    }
}

/// Time source selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClockConfig {
    /// Wall-clock time.
    #[default]
    System,
    /// A [`MockClock`] starting at `start`, with mock time already enabled.
    ///
    /// Because mock time starts on, the first
    /// [`toggle_mock_time`](crate::exchange::Exchange::toggle_mock_time)
    /// switches to system time. [`advance_mock_time`](crate::exchange::Exchange::advance_mock_time)
    /// works in either state; toggling back resumes the advanced mock time.
    Mock {
        /// Initial mock time.
        start: Timestamp,
    },
}

impl ClockConfig {
    /// Builds the configured clock.
    #[must_use]
    pub fn build(&self) -> Arc<dyn Clock> {
        match self {
            Self::System => Arc::new(SystemClock::new()),
            Self::Mock { start } => Arc::new(MockClock::new(*start)),
        }
    }
}

/// Configuration of an [`Exchange`](crate::exchange::Exchange).
///
/// Only `admin` is required; the custody account and fee sink default to
/// the admin account.
///
/// # Validation
///
/// - `dao_fee + lp_fee` must be below `1.0`.
/// - A fixed LP bootstrap supply must be positive.
/// - The default farm weight must be positive.
///
/// # Examples
///
/// ```
/// use hydra_dex::config::ExchangeConfig;
///
/// let config = ExchangeConfig::from_json(r#"{
///     "admin": "0xf8d6e0586b0a20c7",
///     "fee_sink": "0x045a1763c93006ca",
///     "dao_fee": "0.001",
///     "lp_fee": "0.002"
/// }"#).expect("valid config");
/// assert_eq!(config.custody_account().as_str(), "0xf8d6e0586b0a20c7");
/// assert_eq!(config.dao_fee().to_string(), "0.00100000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExchangeConfig {
    admin: AccountId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custody_account: Option<AccountId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fee_sink: Option<AccountId>,
    #[serde(default = "default_fee")]
    dao_fee: FeeRate,
    #[serde(default = "default_fee")]
    lp_fee: FeeRate,
    #[serde(default)]
    lp_bootstrap: LpBootstrap,
    #[serde(default)]
    farming: FarmingDefaults,
    #[serde(default)]
    clock: ClockConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    genesis_reward_pool: Option<GenesisRewardPool>,
}

const fn default_fee() -> FeeRate {
    FeeRate::DEFAULT
}

impl ExchangeConfig {
    /// Creates a configuration with defaults for everything but the admin.
    #[must_use]
    pub const fn new(admin: AccountId) -> Self {
        Self {
            admin,
            custody_account: None,
            fee_sink: None,
            dao_fee: FeeRate::DEFAULT,
            lp_fee: FeeRate::DEFAULT,
            lp_bootstrap: LpBootstrap::Fixed {
                supply: Amount::ONE,
            },
            farming: FarmingDefaults {
                tokens_per_second: Amount::ONE,
                weight: Amount::ONE,
            },
            clock: ClockConfig::System,
            genesis_reward_pool: None,
        }
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidConfiguration`] if the document does not
    /// parse or fails [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self, DexError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| DexError::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the account that holds pool, reward and staking custody.
    #[must_use]
    pub fn with_custody_account(mut self, account: AccountId) -> Self {
        self.custody_account = Some(account);
        self
    }

    /// Sets the account that receives withdrawn DAO fees.
    #[must_use]
    pub fn with_fee_sink(mut self, account: AccountId) -> Self {
        self.fee_sink = Some(account);
        self
    }

    /// Sets both swap fees.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidFee`] if the fees sum to `1.0` or more.
    pub fn with_fees(mut self, dao_fee: FeeRate, lp_fee: FeeRate) -> Result<Self, DexError> {
        self.dao_fee = dao_fee;
        self.lp_fee = lp_fee;
        self.validate()?;
        Ok(self)
    }

    /// Sets the initial LP supply rule.
    #[must_use]
    pub fn with_lp_bootstrap(mut self, rule: LpBootstrap) -> Self {
        self.lp_bootstrap = rule;
        self
    }

    /// Sets farming defaults.
    #[must_use]
    pub fn with_farming(mut self, farming: FarmingDefaults) -> Self {
        self.farming = farming;
        self
    }

    /// Sets the clock selection used by [`Exchange::new`](crate::exchange::Exchange::new).
    #[must_use]
    pub fn with_clock(mut self, clock: ClockConfig) -> Self {
        self.clock = clock;
        self
    }

    /// Opens the exchange with a funded reward pool at id `0`.
    #[must_use]
    pub fn with_genesis_reward_pool(mut self, pool: GenesisRewardPool) -> Self {
        self.genesis_reward_pool = Some(pool);
        self
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::InvalidFee`] for fees summing to `1.0` or more and
    /// [`DexError::InvalidConfiguration`] for a zero bootstrap supply, a
    /// zero default weight or an unfunded genesis reward pool.
    pub fn validate(&self) -> Result<(), DexError> {
        let total = self.dao_fee.combined(&self.lp_fee)?;
        if total.fraction() >= Amount::ONE {
            return Err(DexError::InvalidFee("dao_fee + lp_fee must be below 1.0"));
        }
        if let LpBootstrap::Fixed { supply } = self.lp_bootstrap {
            if supply.is_zero() {
                return Err(DexError::InvalidConfiguration(
                    "fixed LP bootstrap supply must be positive".into(),
                ));
            }
        }
        if self.farming.weight.is_zero() {
            return Err(DexError::InvalidConfiguration(
                "default farm weight must be positive".into(),
            ));
        }
        if self.genesis_reward_pool.as_ref().is_some_and(|p| p.funding.is_zero()) {
            return Err(DexError::InvalidConfiguration(
                "genesis reward pool funding must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Returns the admin account.
    #[must_use]
    pub const fn admin(&self) -> &AccountId {
        &self.admin
    }

    /// Returns the custody account, defaulting to the admin.
    #[must_use]
    pub fn custody_account(&self) -> &AccountId {
        self.custody_account.as_ref().unwrap_or(&self.admin)
    }

    /// Returns the fee sink, defaulting to the admin.
    #[must_use]
    pub fn fee_sink(&self) -> &AccountId {
        self.fee_sink.as_ref().unwrap_or(&self.admin)
    }

    /// Returns the initial DAO fee.
    #[must_use]
    pub const fn dao_fee(&self) -> FeeRate {
        self.dao_fee
    }

    /// Returns the initial LP fee.
    #[must_use]
    pub const fn lp_fee(&self) -> FeeRate {
        self.lp_fee
    }

    /// Returns the LP bootstrap rule.
    #[must_use]
    pub const fn lp_bootstrap(&self) -> LpBootstrap {
        self.lp_bootstrap
    }

    /// Returns the farming defaults.
    #[must_use]
    pub const fn farming(&self) -> FarmingDefaults {
        self.farming
    }

    /// Returns the clock selection.
    #[must_use]
    pub const fn clock(&self) -> ClockConfig {
        self.clock
    }

    /// Returns the genesis reward pool, if any.
    #[must_use]
    pub const fn genesis_reward_pool(&self) -> Option<&GenesisRewardPool> {
        self.genesis_reward_pool.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn admin() -> AccountId {
        let Ok(a) = AccountId::new("0xf8d6e0586b0a20c7") else {
            panic!("valid address");
        };
        a
    }

    fn rate(s: &str) -> FeeRate {
        let Ok(r) = FeeRate::parse(s) else {
            panic!("valid rate");
        };
        r
    }

    #[test]
    fn defaults() {
        let config = ExchangeConfig::new(admin());
        assert!(config.validate().is_ok());
        assert_eq!(config.custody_account(), &admin());
        assert_eq!(config.fee_sink(), &admin());
        assert_eq!(config.dao_fee(), FeeRate::DEFAULT);
        assert_eq!(config.lp_bootstrap(), LpBootstrap::default());
        assert_eq!(config.farming(), FarmingDefaults::default());
        assert_eq!(config.clock(), ClockConfig::System);
    }

    #[test]
    fn fees_must_leave_input() {
        let result = ExchangeConfig::new(admin()).with_fees(rate("0.5"), rate("0.5"));
        assert!(matches!(result, Err(DexError::InvalidFee(_))));
        assert!(ExchangeConfig::new(admin()).with_fees(rate("0.003"), rate("0.0")).is_ok());
    }

    #[test]
    fn zero_bootstrap_rejected() {
        let config = ExchangeConfig::new(admin()).with_lp_bootstrap(LpBootstrap::Fixed {
            supply: Amount::ZERO,
        });
        assert!(matches!(config.validate(), Err(DexError::InvalidConfiguration(_))));
    }

    #[test]
    fn zero_weight_rejected() {
        let config = ExchangeConfig::new(admin()).with_farming(FarmingDefaults {
            tokens_per_second: Amount::ONE,
            weight: Amount::ZERO,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn geometric_mean_bootstrap() {
        let (Ok(a), Ok(b)) = ("100".parse::<Amount>(), "400".parse::<Amount>()) else {
            panic!("valid amounts");
        };
        let Ok(supply) = LpBootstrap::GeometricMean.initial_supply(a, b) else {
            panic!("expected Ok");
        };
        assert_eq!(supply.to_string(), "200.00000000");
        assert!(LpBootstrap::GeometricMean
            .initial_supply(Amount::ZERO, b)
            .is_err());
    }

    #[test]
    fn json_round_trip_with_mock_clock() {
        let json = r#"{
            "admin": "0xf8d6e0586b0a20c7",
            "lp_bootstrap": { "rule": "geometric_mean" },
            "farming": { "tokens_per_second": "2.5", "weight": "1.0" },
            "clock": { "kind": "mock", "start": "1000.0" }
        }"#;
        let Ok(config) = ExchangeConfig::from_json(json) else {
            panic!("expected Ok");
        };
        assert_eq!(config.lp_bootstrap(), LpBootstrap::GeometricMean);
        assert_eq!(config.farming().tokens_per_second.to_string(), "2.50000000");
        let clock = config.clock().build();
        assert_eq!(clock.now().to_string(), "1000.00000000");
        assert!(clock.as_mock().is_some());
    }

    #[test]
    fn genesis_reward_pool_from_json() {
        let json = r#"{
            "admin": "0xf8d6e0586b0a20c7",
            "genesis_reward_pool": {
                "token": "A.f8d6e0586b0a20c7.EmuToken",
                "funding": "1000",
                "funder": "0x045a1763c93006ca"
            }
        }"#;
        let Ok(config) = ExchangeConfig::from_json(json) else {
            panic!("expected Ok");
        };
        let Some(pool) = config.genesis_reward_pool() else {
            panic!("genesis pool configured");
        };
        assert_eq!(pool.token.as_str(), "A.f8d6e0586b0a20c7.EmuToken");
        assert_eq!(pool.funding.to_string(), "1000.00000000");
        assert!(pool.accepted_collateral.is_empty());

        let unfunded = r#"{
            "admin": "0x01",
            "genesis_reward_pool": { "token": "A.1.Emu", "funding": "0" }
        }"#;
        assert!(matches!(
            ExchangeConfig::from_json(unfunded),
            Err(DexError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn json_rejects_unknown_fields_and_bad_fees() {
        let unknown = r#"{ "admin": "0x01", "colour": "blue" }"#;
        assert!(matches!(
            ExchangeConfig::from_json(unknown),
            Err(DexError::InvalidConfiguration(_))
        ));
        let bad_fee = r#"{ "admin": "0x01", "dao_fee": "0.6", "lp_fee": "0.6" }"#;
        assert!(ExchangeConfig::from_json(bad_fee).is_err());
    }
}
