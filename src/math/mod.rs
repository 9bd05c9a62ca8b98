//! Arithmetic utilities for exchange calculations.
//!
//! [`CheckedArithmetic`] turns overflow, underflow and division by zero into
//! [`DexError`](crate::error::DexError) values; [`div_round`] and [`isqrt`]
//! are the raw-integer primitives behind them.

mod checked;
mod rounding;

pub use checked::CheckedArithmetic;
pub use rounding::{div_round, isqrt};
