//! Real and mock implementations of [`Clock`].

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::{Amount, Timestamp};
use crate::error::DexError;
use crate::traits::Clock;

/// Wall-clock time, clamped so it never moves backwards.
#[derive(Debug, Default)]
pub struct SystemClock {
    last_raw: AtomicU64,
}

impl SystemClock {
    /// Creates a system clock.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_raw: AtomicU64::new(0),
        }
    }

    fn wall_raw() -> u64 {
        // A clock set before the epoch reads as the epoch.
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        since_epoch
            .as_secs()
            .saturating_mul(Amount::SCALE)
            .saturating_add(u64::from(since_epoch.subsec_nanos() / 10))
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let wall = Self::wall_raw();
        let previous = self.last_raw.fetch_max(wall, Ordering::AcqRel);
        Timestamp::from_secs(Amount::from_raw(previous.max(wall)))
    }
}

/// A clock whose time only moves when told to.
///
/// While enabled, [`now`](Clock::now) returns the mock time, which starts at
/// the value given to [`MockClock::new`] and moves forward only through
/// [`advance`](Self::advance). When toggled off the clock reads system time
/// again, keeping the mock time for when it is toggled back on.
///
/// # Examples
///
/// ```
/// use hydra_dex::clock::MockClock;
/// use hydra_dex::domain::{Amount, Timestamp};
/// use hydra_dex::traits::Clock;
///
/// let clock = MockClock::new(Timestamp::ZERO);
/// clock.advance(Amount::from_units(100).expect("fits")).expect("no overflow");
/// assert_eq!(clock.now().to_string(), "100.00000000");
/// ```
#[derive(Debug)]
pub struct MockClock {
    enabled: AtomicBool,
    mock_raw: AtomicU64,
    system: SystemClock,
}

impl MockClock {
    /// Creates an enabled mock clock reading `start`.
    #[must_use]
    pub const fn new(start: Timestamp) -> Self {
        Self {
            enabled: AtomicBool::new(true),
            mock_raw: AtomicU64::new(start.as_secs().raw()),
            system: SystemClock::new(),
        }
    }

    /// Returns `true` while mock time is in effect.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Switches between mock and system time and returns the new state.
    pub fn toggle(&self) -> bool {
        !self.enabled.fetch_xor(true, Ordering::AcqRel)
    }

    /// Moves mock time forward by `delta` seconds and returns the new time.
    ///
    /// # Errors
    ///
    /// Returns [`DexError::Overflow`] if the new time does not fit.
    pub fn advance(&self, delta: Amount) -> Result<Timestamp, DexError> {
        let mut current = self.mock_raw.load(Ordering::Acquire);
        loop {
            let next = current
                .checked_add(delta.raw())
                .ok_or(DexError::Overflow("mock clock overflow"))?;
            match self.mock_raw.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    tracing::debug!(now = %Amount::from_raw(next), "mock clock advanced");
                    return Ok(Timestamp::from_secs(Amount::from_raw(next)));
                }
                Err(observed) => current = observed,
            }
        }
    }

    /// Returns the mock time regardless of whether it is enabled.
    pub fn mock_time(&self) -> Timestamp {
        Timestamp::from_secs(Amount::from_raw(self.mock_raw.load(Ordering::Acquire)))
    }
}

impl Clock for MockClock {
    fn now(&self) -> Timestamp {
        if self.is_enabled() {
            self.mock_time()
        } else {
            self.system.now()
        }
    }

    fn as_mock(&self) -> Option<&MockClock> {
        Some(self)
    }
}
