//! The shared input channel every click scheduler competes for
//!
//! The host drains one queue of inputs, so the time of the last click is a
//! single resource: a click from one scheduler delays every other. The
//! channel is handed out as `Rc`, which keeps it (and therefore every
//! scheduler using it) on the simulation thread.

use std::cell::Cell;
use std::rc::Rc;

use crate::core::clock::{Clock, SystemClock};
use crate::core::types::Millis;

pub struct ClickChannel {
    clock: Box<dyn Clock>,
    last_click: Cell<Millis>,
}

impl ClickChannel {
    pub fn new(clock: impl Clock + 'static) -> Rc<Self> {
        Rc::new(Self {
            clock: Box::new(clock),
            last_click: Cell::new(0),
        })
    }

    pub fn now_ms(&self) -> Millis {
        self.clock.now_ms()
    }

    pub fn last_click(&self) -> Millis {
        self.last_click.get()
    }

    /// Milliseconds since the last click on this channel
    pub fn elapsed_ms(&self) -> i64 {
        self.now_ms() as i64 - self.last_click.get() as i64
    }

    pub(crate) fn record_click(&self) {
        self.last_click.set(self.now_ms());
    }
}

thread_local! {
    static SHARED: Rc<ClickChannel> = ClickChannel::new(SystemClock::new());
}

/// The real-time channel of the current simulation thread
pub fn shared_channel() -> Rc<ClickChannel> {
    SHARED.with(Rc::clone)
}
