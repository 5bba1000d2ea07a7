use std::fmt;
use std::num::NonZeroU32;

// Rotation granularity for QR tokens (15 seconds).
pub const WINDOW_MS: u64 = 15_000;

// Current slot plus the next one.
pub const DEFAULT_LOOKAHEAD: NonZeroU32 = match NonZeroU32::new(2) {
    Some(value) => value,
    None => unreachable!(),
};

/// Discretized point in wall-clock time: `floor(epoch_millis / WINDOW_MS)`.
///
/// Every instant inside the same window maps to the same slot, so tokens for a
/// given identity and secret are byte-identical for the whole window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot(u64);

impl TimeSlot {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    // Slot containing the given instant.
    pub const fn containing(epoch_millis: u64) -> Self {
        Self(epoch_millis / WINDOW_MS)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    pub const fn offset(self, by: u64) -> Self {
        Self(self.0.saturating_add(by))
    }

    // Instant after which a token for this slot must no longer be accepted.
    pub const fn expires_at(self) -> u64 {
        self.0.saturating_add(1).saturating_mul(WINDOW_MS)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
