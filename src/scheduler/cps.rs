//! Humanized click scheduler
//!
//! The host counts every queued click until it has handled them all, so a
//! client that wants N clicks per second must decide, once per tick, how
//! many clicks to queue. The rate is resampled after every click for
//! jitter, and can be throttled by a stamina pool to imitate fatigue.

use std::ops::RangeInclusive;
use std::rc::Rc;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::timing;
use crate::core::error::Result;
use crate::core::types::{Millis, NodeId};
use crate::scheduler::channel::ClickChannel;
use crate::settings::tree::{ConfigTree, IntId, IntRangeId};

pub struct CpsScheduler {
    channel: Rc<ClickChannel>,
    rng: ChaCha8Rng,
    cps: RangeInclusive<u32>,
    /// Stamina change per click; 0 disables fatigue
    stamina_decrement: u32,
    /// Current click interval, unset until the first click
    click_time: Option<Millis>,
    stamina: i32,
    /// true while stamina is being depleted
    stamina_switch: bool,
}

impl CpsScheduler {
    pub fn new(channel: Rc<ClickChannel>, cps: RangeInclusive<u32>) -> Self {
        Self::with_seed(channel, cps, rand::random())
    }

    pub fn with_seed(channel: Rc<ClickChannel>, cps: RangeInclusive<u32>, seed: u64) -> Self {
        let mut scheduler = Self {
            channel,
            rng: ChaCha8Rng::seed_from_u64(seed),
            cps: 1..=1,
            stamina_decrement: 0,
            click_time: None,
            stamina: timing().stamina_baseline,
            stamina_switch: false,
        };
        scheduler.set_cps(cps);
        scheduler
    }

    /// Set the target rate range; a zero lower bound is raised to 1 and an
    /// inverted range collapses onto its lower bound
    pub fn set_cps(&mut self, cps: RangeInclusive<u32>) {
        let low = (*cps.start()).max(1);
        let high = (*cps.end()).max(low);
        self.cps = low..=high;
    }

    pub fn set_stamina_decrement(&mut self, decrement: u32) {
        self.stamina_decrement = decrement;
    }

    pub fn cps(&self) -> RangeInclusive<u32> {
        self.cps.clone()
    }

    pub fn stamina(&self) -> i32 {
        self.stamina
    }

    pub fn click_time(&self) -> Option<Millis> {
        self.click_time
    }

    pub fn channel(&self) -> &Rc<ClickChannel> {
        &self.channel
    }

    /// Whether a click will be due within the next `ticks` host ticks
    pub fn is_click_on_next_tick(&self, ticks: u32) -> bool {
        let Some(click_time) = self.click_time else {
            return false;
        };
        let lookahead = (timing().host_tick_ms * ticks as u64) as i64;
        self.channel.elapsed_ms() + lookahead >= click_time as i64
    }

    /// Number of clicks to queue this tick
    ///
    /// Call at most once per tick. `condition` is re-evaluated before every
    /// click; returning false withholds clicks without resetting the pacing.
    pub fn clicks(&mut self, mut condition: impl FnMut() -> bool) -> u32 {
        if self.should_update_click_time() {
            self.perform_click();
            return if condition() { 1 } else { 0 };
        }

        let mut clicks = 0;
        while self.can_click(&mut condition) {
            self.perform_click();
            clicks += 1;
        }

        tracing::trace!(clicks, stamina = self.stamina, "clicks scheduled");
        clicks
    }

    /// First call, or a gap of more than one tick past the due time
    fn should_update_click_time(&self) -> bool {
        match self.click_time {
            None => true,
            Some(click_time) => {
                let overdue = self.channel.elapsed_ms() - click_time as i64;
                overdue / timing().host_tick_ms as i64 > 1
            }
        }
    }

    fn can_click(&self, condition: &mut impl FnMut() -> bool) -> bool {
        let Some(click_time) = self.click_time else {
            return false;
        };
        let progress = self.channel.elapsed_ms() as f64 / click_time as f64;
        progress > timing().early_fire_ratio && condition() && self.stamina > 0
    }

    fn perform_click(&mut self) {
        let sample = self.rng.gen_range(self.cps.clone());

        let rate = if self.stamina_decrement > 0 {
            // Direction flips only once stamina is strictly past a bound
            if self.stamina > timing().stamina_baseline {
                self.stamina_switch = true;
            } else if self.stamina < 0 {
                self.stamina_switch = false;
            }

            let step = self.stamina_decrement as i32;
            if self.stamina_switch {
                self.stamina -= step;
            } else {
                self.stamina += step;
            }

            let factor = self.stamina as f64 / timing().stamina_baseline as f64;
            let scaled = (sample as f64 * factor).round() as i64;
            scaled.clamp(*self.cps.start() as i64, *self.cps.end() as i64) as u64
        } else {
            sample as u64
        };

        self.click_time = Some(1000 / rate);
        self.channel.record_click();
    }
}

/// Scheduler knobs registered in the config tree
#[derive(Debug, Clone, Copy)]
pub struct SchedulerSettings {
    pub node: NodeId,
    pub cps: IntRangeId,
    pub stamina_decrement: IntId,
}

impl SchedulerSettings {
    pub const NODE: &'static str = "CpsScheduler";

    /// Register `CPS` and `StaminaDecrement` under a `CpsScheduler` node
    pub fn register(tree: &mut ConfigTree, parent: NodeId, cps: RangeInclusive<i32>) -> Result<Self> {
        let node = tree.add_node(parent, Self::NODE)?;
        let cps = tree.add_int_range(node, "CPS", cps, 1..=20)?;
        let stamina_decrement = tree.add_int(node, "StaminaDecrement", 0, 0..=10)?;
        Ok(Self {
            node,
            cps,
            stamina_decrement,
        })
    }

    /// Copy the current settings into `scheduler`
    pub fn apply(&self, tree: &ConfigTree, scheduler: &mut CpsScheduler) {
        let cps = tree.get_int_range(self.cps);
        scheduler.set_cps((*cps.start()).max(1) as u32..=(*cps.end()).max(1) as u32);
        scheduler.set_stamina_decrement(tree.get_int(self.stamina_decrement).max(0) as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;

    fn scheduler(cps: RangeInclusive<u32>) -> (ManualClock, CpsScheduler) {
        let clock = ManualClock::new(10_000);
        let channel = ClickChannel::new(clock.clone());
        (clock, CpsScheduler::with_seed(channel, cps, 7))
    }

    #[test]
    fn test_first_call_is_a_fresh_decision() {
        let (_, mut scheduler) = scheduler(6..=8);
        assert_eq!(scheduler.click_time(), None);
        assert_eq!(scheduler.clicks(|| true), 1);
        let interval = scheduler.click_time().unwrap();
        assert!((125..=166).contains(&interval));
    }

    #[test]
    fn test_fresh_decision_respects_condition() {
        let (_, mut scheduler) = scheduler(6..=8);
        assert_eq!(scheduler.clicks(|| false), 0);
        // The slot was still evaluated
        assert!(scheduler.click_time().is_some());
    }

    #[test]
    fn test_no_click_before_interval() {
        let (clock, mut scheduler) = scheduler(10..=10);
        scheduler.clicks(|| true);
        clock.advance(50);
        assert_eq!(scheduler.clicks(|| true), 0);
        clock.advance(50);
        assert_eq!(scheduler.clicks(|| true), 1);
    }

    #[test]
    fn test_early_fire_tolerance() {
        let (clock, mut scheduler) = scheduler(10..=10);
        scheduler.clicks(|| true);
        // 96ms of a 100ms interval is past the 0.95 threshold
        clock.advance(96);
        assert_eq!(scheduler.clicks(|| true), 1);
    }

    #[test]
    fn test_condition_withholds_clicks() {
        let (clock, mut scheduler) = scheduler(10..=10);
        scheduler.clicks(|| true);
        clock.advance(100);
        assert_eq!(scheduler.clicks(|| false), 0);
        assert_eq!(scheduler.clicks(|| true), 1);
    }

    #[test]
    fn test_long_gap_resets_to_fresh_decision() {
        let (clock, mut scheduler) = scheduler(20..=20);
        scheduler.clicks(|| true);
        // A 50ms interval overdue by a full second would otherwise burst
        clock.advance(1_050);
        assert_eq!(scheduler.clicks(|| true), 1);
    }

    #[test]
    fn test_click_on_next_tick() {
        let (clock, mut scheduler) = scheduler(10..=10);
        assert!(!scheduler.is_click_on_next_tick(1));
        scheduler.clicks(|| true);
        assert!(!scheduler.is_click_on_next_tick(1));
        clock.advance(50);
        assert!(scheduler.is_click_on_next_tick(1));
    }

    #[test]
    fn test_stamina_rises_first_then_depletes() {
        let (clock, mut scheduler) = scheduler(6..=10);
        scheduler.set_stamina_decrement(10);

        scheduler.clicks(|| true);
        assert_eq!(scheduler.stamina(), 110);

        clock.advance(200);
        scheduler.clicks(|| true);
        assert_eq!(scheduler.stamina(), 100);
    }

    #[test]
    fn test_shared_channel_couples_schedulers() {
        let clock = ManualClock::new(10_000);
        let channel = ClickChannel::new(clock.clone());
        let mut a = CpsScheduler::with_seed(channel.clone(), 10..=10, 1);
        let mut b = CpsScheduler::with_seed(channel, 10..=10, 2);

        a.clicks(|| true);
        b.clicks(|| true);
        clock.advance(60);
        // b clicked at the same instant, so a's interval restarted too
        assert_eq!(a.clicks(|| true), 0);
        clock.advance(40);
        assert_eq!(a.clicks(|| true), 1);
        assert_eq!(b.clicks(|| true), 0);
    }

    #[test]
    fn test_zero_cps_raised_to_one() {
        let (_, scheduler) = scheduler(0..=0);
        assert_eq!(scheduler.cps(), 1..=1);
    }

    #[test]
    fn test_settings_apply() {
        let mut tree = ConfigTree::new();
        let root = tree.add_root("Aura").unwrap();
        let settings = SchedulerSettings::register(&mut tree, root, 6..=10).unwrap();
        tree.set_int(settings.stamina_decrement, 4).unwrap();
        tree.set_int_range(settings.cps, 12..=14).unwrap();

        let (_, mut scheduler) = scheduler(1..=1);
        settings.apply(&tree, &mut scheduler);
        assert_eq!(scheduler.cps(), 12..=14);
        assert_eq!(scheduler.stamina_decrement, 4);
    }
}
