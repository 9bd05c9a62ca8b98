//! Capability seams between the exchange and its environment.
//!
//! The exchange core does not own time or token custody. It reaches both
//! through these traits:
//!
//! - [`Clock`]: current time for reward accrual.
//! - [`Ledger`]: withdraw and deposit of fungible tokens by identifier.

mod clock;
mod ledger;

pub use clock::Clock;
pub use ledger::{Ledger, RewardReceiver};
