//! Sequential identifiers for pools, farms and reward pools.

use core::fmt;

use serde::{Deserialize, Serialize};

macro_rules! sequential_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw identifier.
            #[must_use]
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the raw identifier.
            #[must_use]
            pub const fn get(&self) -> u64 {
                self.0
            }

            /// Returns the identifier that follows this one.
            #[must_use]
            pub const fn next(&self) -> Self {
                Self(self.0 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

sequential_id!(
    /// Identifier of a swap pool, assigned in creation order starting at `0`.
    ///
    /// The same number identifies the pool's LP share token.
    PoolId
);

sequential_id!(
    /// Identifier of a farm. A farm stakes the LP shares of the pool with the
    /// same number.
    FarmId
);

sequential_id!(
    /// Identifier of an exchange-wide reward pool.
    RewardId
);

impl FarmId {
    /// The pool whose LP shares this farm accepts.
    #[must_use]
    pub const fn lp_pool(&self) -> PoolId {
        PoolId::new(self.0)
    }
}

impl PoolId {
    /// The farm that stakes this pool's LP shares.
    #[must_use]
    pub const fn farm(&self) -> FarmId {
        FarmId::new(self.0)
    }
}
