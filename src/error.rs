//! Unified error type for the exchange.
//!
//! Every fallible operation returns [`DexError`]. Each variant belongs to
//! one [`ErrorKind`], which is what callers branch on when they only care
//! whether a request was malformed, unauthorized, underfunded or blocked by
//! a frozen pool. A failed operation never leaves partial state behind and
//! never emits events.

use thiserror::Error;

use crate::domain::{AccountId, Amount, FarmId, PoolId, RewardId, TokenId};

/// Broad failure category of a [`DexError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed request: non-positive amounts, unknown ids, duplicates.
    Validation,
    /// A non-admin caller invoked an admin-only operation.
    Authorization,
    /// A withdrawal or unstake exceeded holdings.
    InsufficientBalance,
    /// Swap or liquidity operation on a frozen pool.
    FrozenPool,
    /// Fixed-point overflow, underflow or division by zero.
    Arithmetic,
}

/// Errors produced by exchange, pool and farm operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DexError {
    /// Amount is zero, malformed or otherwise unusable.
    #[error("invalid amount: {0}")]
    InvalidAmount(&'static str),

    /// Token identifier is malformed or not part of the pool.
    #[error("invalid token: {0}")]
    InvalidToken(&'static str),

    /// Fee fraction out of range.
    #[error("invalid fee: {0}")]
    InvalidFee(&'static str),

    /// Configuration failed validation or could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No pool with this id.
    #[error("unknown pool {0}")]
    UnknownPool(PoolId),

    /// No pool trades this pair.
    #[error("no pool for pair {token_x}/{token_y}")]
    UnknownPair {
        /// First token as given by the caller.
        token_x: TokenId,
        /// Second token as given by the caller.
        token_y: TokenId,
    },

    /// A pool for this unordered pair already exists.
    #[error("pool {existing} already trades {token_a}/{token_b}")]
    DuplicatePool {
        /// Canonical token A.
        token_a: TokenId,
        /// Canonical token B.
        token_b: TokenId,
        /// The pool already registered for the pair.
        existing: PoolId,
    },

    /// No farm with this id.
    #[error("unknown farm {0}")]
    UnknownFarm(FarmId),

    /// A farm with this id already exists.
    #[error("farm {0} already exists")]
    DuplicateFarm(FarmId),

    /// No reward pool with this id.
    #[error("unknown reward pool {0}")]
    UnknownRewardPool(RewardId),

    /// Claim on a farm without reward pools.
    #[error("farm {0} has no reward pools")]
    NoRewardPools(FarmId),

    /// Fee withdrawal for a token with an empty treasury bucket.
    #[error("no fees collected for {0}")]
    NoFeesCollected(TokenId),

    /// Requested output is not below the available reserve.
    #[error("insufficient pool liquidity")]
    InsufficientLiquidity,

    /// Pool reserves are empty.
    #[error("pool reserves are zero")]
    ZeroReserve,

    /// Mock-time operation on a clock that is not a mock.
    #[error("the configured clock does not support mock time")]
    ClockNotMockable,

    /// Caller is not the exchange admin.
    #[error("{caller} is not authorized to {action}")]
    Unauthorized {
        /// Rejected caller.
        caller: AccountId,
        /// Operation attempted.
        action: &'static str,
    },

    /// Holdings do not cover a withdrawal.
    #[error("{holder} holds {available} {asset}, {requested} requested")]
    InsufficientBalance {
        /// Account or custody holding the asset.
        holder: String,
        /// Token identifier or LP share label.
        asset: String,
        /// Amount asked for.
        requested: Amount,
        /// Amount actually held.
        available: Amount,
    },

    /// Pool is frozen.
    #[error("pool {0} is frozen")]
    PoolFrozen(PoolId),

    /// Arithmetic overflow.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Arithmetic underflow.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,
}

impl DexError {
    /// Returns the failure category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Authorization,
            Self::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            Self::PoolFrozen(_) => ErrorKind::FrozenPool,
            Self::Overflow(_) | Self::Underflow(_) | Self::DivisionByZero => ErrorKind::Arithmetic,
            Self::InvalidAmount(_)
            | Self::InvalidToken(_)
            | Self::InvalidFee(_)
            | Self::InvalidConfiguration(_)
            | Self::UnknownPool(_)
            | Self::UnknownPair { .. }
            | Self::DuplicatePool { .. }
            | Self::UnknownFarm(_)
            | Self::DuplicateFarm(_)
            | Self::UnknownRewardPool(_)
            | Self::NoRewardPools(_)
            | Self::NoFeesCollected(_)
            | Self::InsufficientLiquidity
            | Self::ZeroReserve
            | Self::ClockNotMockable => ErrorKind::Validation,
        }
    }
}

/// Convenience alias used across the crate.
pub type Result<T> = core::result::Result<T, DexError>;
