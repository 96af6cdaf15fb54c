//! Wall-clock sources
//!
//! The click scheduler is the one component that paces itself by real time
//! instead of ticks. Everything that reads time goes through [`Clock`] so a
//! headless run can substitute simulated time.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use crate::core::types::Millis;

/// A monotonic millisecond source
pub trait Clock {
    fn now_ms(&self) -> Millis;
}

/// Real time, measured from the moment the clock was created
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }
}

/// Simulated time, advanced explicitly by the caller
///
/// Clones share the same underlying counter, so the runner can keep one
/// handle while the click channel owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Millis>>,
}

impl ManualClock {
    pub fn new(start: Millis) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, ms: Millis) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: Millis) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}
