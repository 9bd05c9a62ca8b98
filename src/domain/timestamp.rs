//! Clock readings in fixed-point seconds.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::Amount;

/// Seconds since the Unix epoch with eight fractional digits.
///
/// Reward emission multiplies elapsed seconds by a per-second rate, so
/// timestamps share the [`Amount`] representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(Amount);

impl Timestamp {
    /// The epoch.
    pub const ZERO: Self = Self(Amount::ZERO);

    /// Creates a timestamp from fixed-point seconds.
    #[must_use]
    pub const fn from_secs(seconds: Amount) -> Self {
        Self(seconds)
    }

    /// Returns the fixed-point seconds.
    pub const fn as_secs(&self) -> Amount {
        self.0
    }

    /// Seconds elapsed since `earlier`, or zero if `earlier` is later.
    pub const fn elapsed_since(&self, earlier: Self) -> Amount {
        self.0.saturating_sub(&earlier.0)
    }

    /// Returns this timestamp moved forward by `delta` seconds.
    #[must_use]
    pub const fn checked_add(&self, delta: Amount) -> Option<Self> {
        match self.0.checked_add(&delta) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
