//! Action timing: how many clicks to queue each tick

pub mod channel;
pub mod cps;

pub use channel::{shared_channel, ClickChannel};
pub use cps::{CpsScheduler, SchedulerSettings};
