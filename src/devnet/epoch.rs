use std::num::NonZeroU64;

/// Fixed-length time windows starting at `first_epoch_start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochClock {
    first_epoch_start: u64,
    duration: NonZeroU64,
}

impl EpochClock {
    /// Create a clock whose epoch 0 starts at `first_epoch_start`
    pub fn new(first_epoch_start: u64, duration: NonZeroU64) -> Self {
        Self { first_epoch_start, duration }
    }

    /// Epoch length in seconds
    pub fn duration(&self) -> u64 {
        self.duration.get()
    }

    /// Epoch containing `timestamp`. Timestamps before the first epoch map to 0.
    pub fn epoch_of(&self, timestamp: u64) -> u64 {
        timestamp.saturating_sub(self.first_epoch_start) / self.duration.get()
    }

    /// First second of `epoch`
    pub fn epoch_start(&self, epoch: u64) -> u64 {
        self.first_epoch_start.saturating_add(epoch.saturating_mul(self.duration.get()))
    }

    /// First second after `epoch`
    pub fn epoch_end(&self, epoch: u64) -> u64 {
        self.epoch_start(epoch.saturating_add(1))
    }

    /// Seconds left in the epoch containing `timestamp`
    pub fn remaining(&self, timestamp: u64) -> u64 {
        self.epoch_end(self.epoch_of(timestamp)).saturating_sub(timestamp)
    }
}
