//! Declarative exchange configuration.
//!
//! [`ExchangeConfig`] carries the admin and custody accounts, the global
//! swap fees, the LP bootstrap rule, farming defaults, an optional genesis
//! reward pool and the clock choice.
//! It validates on construction and can be loaded from JSON.

mod exchange;

pub use exchange::{ClockConfig, ExchangeConfig, FarmingDefaults, GenesisRewardPool, LpBootstrap};
