//! Constant-product pools, their registry and LP share balances.
//!
//! | Type | Role |
//! |------|------|
//! | [`ConstantProductPool`] | One token pair, its reserves and LP supply |
//! | [`PoolRegistry`] | Sequential ids, unique unordered pairs |
//! | [`LpShareBook`] | LP share balances per `(pool, account)` |

pub mod constant_product;
mod lp_shares;
mod registry;

#[cfg(test)]
mod proptest_properties;

pub use constant_product::{ConstantProductPool, FeeSchedule, PoolMeta, Quotes};
pub use lp_shares::LpShareBook;
pub use registry::PoolRegistry;
