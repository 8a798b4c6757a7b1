use log::{debug, info};
use std::time::Instant;

use crate::clock::{LevelReveal, PhaseClock, PhaseTimings};
use crate::timer::TimerSlot;

/// Drives a [`PhaseClock`] from wall-clock deadlines
///
/// The owner calls [`poll`](Self::poll) whenever it wakes up and sleeps no
/// longer than [`next_deadline`](Self::next_deadline). Only one tick is ever
/// scheduled.
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    clock: PhaseClock,
    timings: PhaseTimings,
    tick: TimerSlot<()>,
}

impl Sequencer {
    pub fn new(timings: PhaseTimings) -> Self {
        Self {
            clock: PhaseClock::new(),
            timings,
            tick: TimerSlot::new(),
        }
    }

    /// Replay `levels` levels from the beginning
    ///
    /// Any tick still scheduled from an earlier replay is dropped first.
    pub fn start(&mut self, levels: usize, now: Instant) {
        self.tick.cancel();
        self.clock.start(levels);
        info!(
            "Replay started: levels={} duration={:?}",
            levels,
            self.timings.total(levels)
        );
        self.schedule_from(now);
    }

    /// Apply every tick that is due at `now`
    ///
    /// A late caller catches up: each missed tick is applied and the next
    /// one is scheduled from the instant the missed one was due, not from
    /// `now`. Returns true if the clock moved.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut advanced = false;

        while let Some(due) = self.tick.deadline().filter(|due| *due <= now) {
            self.tick.cancel();
            if !self.clock.tick() {
                break;
            }
            advanced = true;
            self.schedule_from(due);
        }

        if advanced && self.clock.is_complete() {
            info!("Replay complete after {} steps", self.clock.step());
        }
        advanced
    }

    /// Halt the replay and drop the pending tick
    pub fn stop(&mut self) {
        if self.tick.cancel().is_some() || self.clock.is_running() {
            debug!("Replay stopped at step {}", self.clock.step());
        }
        self.clock.stop();
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.tick.deadline()
    }

    pub fn clock(&self) -> &PhaseClock {
        &self.clock
    }

    pub fn timings(&self) -> &PhaseTimings {
        &self.timings
    }

    pub fn set_timings(&mut self, timings: PhaseTimings) {
        self.timings = timings;
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn reveal(&self, level: usize) -> LevelReveal {
        self.clock.reveal(level)
    }

    fn schedule_from(&mut self, at: Instant) {
        if let Some(phase) = self.clock.phase() {
            self.tick.arm_after(at, self.timings.delay(phase), ());
        }
    }
}
