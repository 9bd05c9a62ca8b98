//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use hydra_dex::prelude::*;
//! ```
//!
//! Brings the exchange, its configuration, the value types every operation
//! takes, the capability traits and the error type into scope.

pub use crate::config::{ClockConfig, ExchangeConfig, FarmingDefaults, GenesisRewardPool, LpBootstrap};
pub use crate::domain::{
    AccountId, Amount, FarmId, FeeRate, PoolId, RewardId, Rounding, Side, SwapResult, Timestamp,
    TokenId, TokenPair, Vault,
};
pub use crate::error::{DexError, ErrorKind, Result};
pub use crate::events::{Event, Receipt};
pub use crate::exchange::Exchange;
pub use crate::ledger::InMemoryLedger;
pub use crate::math::CheckedArithmetic;
pub use crate::traits::{Clock, Ledger, RewardReceiver};
