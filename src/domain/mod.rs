//! Fundamental domain value types used throughout the exchange.
//!
//! This module contains the value types that model the exchange domain:
//! fixed-point amounts, fee rates, token and account identifiers, token
//! pairs, vaults, timestamps and swap outcomes. Newtypes with validated
//! constructors enforce invariants at the edges.

mod amount;
mod fee_rate;
mod ids;
mod rounding;
mod swap_result;
mod timestamp;
mod token_id;
mod token_pair;
mod vault;

pub use amount::Amount;
pub use fee_rate::FeeRate;
pub use ids::{FarmId, PoolId, RewardId};
pub use rounding::Rounding;
pub use swap_result::SwapResult;
pub use timestamp::Timestamp;
pub use token_id::{AccountId, TokenId};
pub use token_pair::{Side, TokenPair};
pub use vault::Vault;
