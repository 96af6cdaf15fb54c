//! Server-side hotbar slot override
//!
//! A feature can make the server see a different selected slot than the
//! client shows. The override expires after a number of host ticks unless it
//! is renewed; the timer is a tick counter, not wall-clock time.

use crate::core::config::timing;
use crate::core::types::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HotbarState {
    slot: u8,
    requester: NodeId,
    ticks_until_reset: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SilentHotbar {
    state: Option<HotbarState>,
    ticks_since_update: u32,
}

impl SilentHotbar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the server-side slot on behalf of `requester`
    ///
    /// Replaces any previous override and restarts the timer.
    pub fn select_slot_silently(&mut self, requester: NodeId, slot: u8, ticks_until_reset: u32) {
        self.state = Some(HotbarState {
            slot,
            requester,
            ticks_until_reset,
        });
        self.ticks_since_update = 0;
    }

    /// [`SilentHotbar::select_slot_silently`] with the default expiry
    pub fn select_slot(&mut self, requester: NodeId, slot: u8) {
        self.select_slot_silently(requester, slot, timing().hotbar_reset_ticks);
    }

    /// Drop the override, but only if `requester` owns it
    pub fn reset_slot(&mut self, requester: NodeId) {
        if self.requester() == Some(requester) {
            self.state = None;
        }
    }

    pub fn requester(&self) -> Option<NodeId> {
        self.state.map(|state| state.requester)
    }

    /// The slot interactions take place with
    pub fn serverside_slot(&self, client_slot: u8) -> u8 {
        self.state.map_or(client_slot, |state| state.slot)
    }

    pub fn on_tick(&mut self) {
        let Some(state) = self.state else {
            return;
        };

        if self.ticks_since_update >= state.ticks_until_reset {
            self.state = None;
            return;
        }
        self.ticks_since_update += 1;
    }
}
