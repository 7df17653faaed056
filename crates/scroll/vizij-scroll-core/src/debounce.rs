//! Trailing debounce keyed by generation.
//!
//! Every trigger bumps the generation and the host schedules one delayed callback
//! carrying it. Only the callback holding the latest generation fires; older ones
//! arrive stale and are dropped.

#[derive(Debug, Default, Clone)]
pub struct Debounce {
    delay_ms: u32,
    generation: u64,
    pending: bool,
}

impl Debounce {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            generation: 0,
            pending: false,
        }
    }

    #[inline]
    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Restart the quiet period. Returns the generation the delayed callback must carry.
    pub fn trigger(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.pending = true;
        self.generation
    }

    /// Consume a delayed callback. True only for the latest pending generation.
    pub fn fire(&mut self, generation: u64) -> bool {
        if self.pending && generation == self.generation {
            self.pending = false;
            true
        } else {
            false
        }
    }

    /// Drop any pending callback.
    pub fn cancel(&mut self) {
        if self.pending {
            self.generation = self.generation.wrapping_add(1);
            self.pending = false;
        }
    }
}
