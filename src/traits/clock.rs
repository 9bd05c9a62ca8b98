//! Time source capability.

use core::fmt::Debug;

use crate::clock::MockClock;
use crate::domain::Timestamp;

/// A source of the current time.
///
/// Farm accrual reads the clock once at the start of every operation. The
/// exchange receives its clock at construction as an `Arc<dyn Clock>`, so
/// production code and tests choose between [`SystemClock`] and
/// [`MockClock`] without any global switch.
///
/// Implementations must never report a time earlier than one they already
/// reported.
///
/// [`SystemClock`]: crate::clock::SystemClock
pub trait Clock: Debug + Send + Sync {
    /// Returns the current time.
    fn now(&self) -> Timestamp;

    /// Returns the mock controls if this clock supports them.
    fn as_mock(&self) -> Option<&MockClock> {
        None
    }
}
