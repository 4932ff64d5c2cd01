//! Bounded processing buffer with fixed-rate draining.

use std::time::Duration;

/// Bounded FIFO-capacity abstraction for the processing buffer.
///
/// Tracks depth only; the simulator never needs the buffered items
/// themselves. Invariant: `0 <= depth <= capacity` at all times.
#[derive(Debug, Clone)]
pub struct BoundedQueue {
    depth: usize,
    capacity: usize,
    /// Drain rate in transactions per second
    service_tps: u32,
}

impl BoundedQueue {
    /// Creates an empty queue.
    pub fn new(capacity: usize, service_tps: u32) -> Self {
        Self {
            depth: 0,
            capacity,
            service_tps,
        }
    }

    /// Admits one unit if there is room.
    ///
    /// Returns false on overflow; the caller must count that as a drop even
    /// when admission control already accepted the transaction — admission
    /// and buffering are independent gates.
    pub fn try_enqueue(&mut self) -> bool {
        if self.depth < self.capacity {
            self.depth += 1;
            true
        } else {
            false
        }
    }

    /// Admits one unit, saturating at capacity.
    pub fn force_enqueue(&mut self) {
        self.depth = (self.depth + 1).min(self.capacity);
    }

    /// Drains up to `service_tps * step` units, never below zero.
    ///
    /// Returns the number of units actually processed.
    pub fn drain(&mut self, step: Duration) -> usize {
        let serviceable = (f64::from(self.service_tps) * step.as_secs_f64()) as usize;
        let processed = self.depth.min(serviceable);
        self.depth -= processed;
        debug_assert!(self.depth <= self.capacity);
        processed
    }

    /// Current queue depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Maximum depth before overflow.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the next `try_enqueue` would overflow.
    pub fn is_full(&self) -> bool {
        self.depth >= self.capacity
    }
}
