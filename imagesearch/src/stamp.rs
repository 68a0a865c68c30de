//! Monotonic stamps used to discard superseded asynchronous work.
//!
//! Every search request carries a [`Generation`] and every tile load carries a
//! [`LoadToken`]. When the work completes, its stamp is compared against the
//! owner's current stamp; anything older is dropped. Cancellation of the
//! underlying work is only an optimization on top of this check.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identifies one search request. Strictly increasing per coordinator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Generation before any request has been issued.
    pub const ZERO: Generation = Generation(0);

    /// Creates a generation from a raw value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the following generation.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw counter value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Identifies one load request within a single gallery slot.
///
/// Tokens are local to a slot: two slots may hand out the same token value
/// without any relation between them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadToken(u64);

impl LoadToken {
    /// Creates a token from a raw value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the following token.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw counter value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LoadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Shared view of the latest issued generation.
///
/// The coordinator is the only writer. Search workers hold clones and may ask
/// [`is_current`](Self::is_current) to skip work whose result would be
/// discarded anyway. The coordinator still performs the authoritative check
/// when an outcome is applied.
#[derive(Debug, Clone, Default)]
pub struct GenerationCounter {
    latest: Arc<AtomicU64>,
}

impl GenerationCounter {
    /// Creates a counter at [`Generation::ZERO`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next generation and returns it.
    pub fn advance(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Returns the latest issued generation.
    pub fn current(&self) -> Generation {
        Generation(self.latest.load(Ordering::Acquire))
    }

    /// Returns true if `generation` is still the latest issued one.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.current() == generation
    }
}
