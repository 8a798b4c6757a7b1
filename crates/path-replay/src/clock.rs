//! Replay pacing as a pure value
//!
//! Each level of a replayed path takes four steps. The clock only counts
//! steps; it knows nothing about time. [`Sequencer`](crate::Sequencer) is
//! what turns deadlines into ticks.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Steps per path level
pub const PHASES_PER_LEVEL: usize = 4;

/// Phase within one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    RevealAlternatives,
    Pause,
    RevealChosenEdge,
    RevealChosenNode,
}

impl Phase {
    pub const ALL: [Phase; PHASES_PER_LEVEL] = [
        Phase::RevealAlternatives,
        Phase::Pause,
        Phase::RevealChosenEdge,
        Phase::RevealChosenNode,
    ];

    /// Phase for a global step
    pub fn of_step(step: usize) -> Phase {
        Phase::ALL[step % PHASES_PER_LEVEL]
    }
}

/// What of one level is visible at the current step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelReveal {
    /// The sibling options at this level
    pub alternatives: bool,
    /// The edge leading to the chosen option
    pub chosen_edge: bool,
    /// The chosen option itself
    pub chosen_node: bool,
}

impl LevelReveal {
    pub const ALL: LevelReveal = LevelReveal {
        alternatives: true,
        chosen_edge: true,
        chosen_node: true,
    };

    pub const NONE: LevelReveal = LevelReveal {
        alternatives: false,
        chosen_edge: false,
        chosen_node: false,
    };
}

/// Step counter for a replay of `levels` levels
///
/// While running, `step` only grows and never passes `4 * levels`. When it
/// gets there the clock stops by itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseClock {
    levels: usize,
    step: usize,
    running: bool,
}

impl PhaseClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart from step zero
    ///
    /// A zero-level replay is complete immediately.
    pub fn start(&mut self, levels: usize) {
        self.levels = levels;
        self.step = 0;
        self.running = levels > 0;
    }

    /// Advance one step
    ///
    /// Returns false if the clock was not running.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.step += 1;
        if self.step >= self.total_steps() {
            self.step = self.total_steps();
            self.running = false;
        }
        true
    }

    /// Halt and rewind to step zero
    pub fn stop(&mut self) {
        self.running = false;
        self.step = 0;
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_complete(&self) -> bool {
        !self.running && self.step >= self.total_steps()
    }

    pub fn total_steps(&self) -> usize {
        self.levels * PHASES_PER_LEVEL
    }

    /// Level the running clock is working on
    pub fn current_level(&self) -> Option<usize> {
        self.running.then(|| self.step / PHASES_PER_LEVEL)
    }

    /// Phase the running clock is in
    pub fn phase(&self) -> Option<Phase> {
        self.running.then(|| Phase::of_step(self.step))
    }

    /// Visibility of `level` at the current step
    ///
    /// Everything is visible when the clock is not running, so a stopped or
    /// finished replay shows the whole path.
    pub fn reveal(&self, level: usize) -> LevelReveal {
        if !self.running {
            return LevelReveal::ALL;
        }

        let start = level * PHASES_PER_LEVEL;
        let Some(local) = self.step.checked_sub(start) else {
            return LevelReveal::NONE;
        };

        LevelReveal {
            alternatives: local >= 1,
            chosen_edge: local >= 3,
            chosen_node: local >= 4,
        }
    }
}

/// How long each phase lasts, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseTimings {
    pub reveal_alternatives_ms: u64,
    pub pause_ms: u64,
    pub reveal_chosen_edge_ms: u64,
    pub reveal_chosen_node_ms: u64,
}

impl PhaseTimings {
    /// Pacing for replays opened while exploring
    pub const fn explore() -> Self {
        Self {
            reveal_alternatives_ms: 125,
            pause_ms: 100,
            reveal_chosen_edge_ms: 150,
            reveal_chosen_node_ms: 75,
        }
    }

    /// Slower pacing for replays opened from a share link
    pub const fn replay() -> Self {
        Self {
            reveal_alternatives_ms: 150,
            pause_ms: 100,
            reveal_chosen_edge_ms: 200,
            reveal_chosen_node_ms: 50,
        }
    }

    /// Time spent in `phase` before the next tick
    pub fn delay(&self, phase: Phase) -> Duration {
        Duration::from_millis(match phase {
            Phase::RevealAlternatives => self.reveal_alternatives_ms,
            Phase::Pause => self.pause_ms,
            Phase::RevealChosenEdge => self.reveal_chosen_edge_ms,
            Phase::RevealChosenNode => self.reveal_chosen_node_ms,
        })
    }

    /// Wall time for a whole replay of `levels` levels
    ///
    /// Saturates at [`Duration::MAX`].
    pub fn total(&self, levels: usize) -> Duration {
        let per_level = Phase::ALL
            .iter()
            .map(|phase| self.delay(*phase))
            .fold(Duration::ZERO, Duration::saturating_add);
        u32::try_from(levels)
            .ok()
            .and_then(|levels| per_level.checked_mul(levels))
            .unwrap_or(Duration::MAX)
    }
}

impl Default for PhaseTimings {
    fn default() -> Self {
        Self::explore()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_levels_is_complete() {
        let mut clock = PhaseClock::new();
        clock.start(0);
        assert!(!clock.is_running());
        assert!(clock.is_complete());
        assert!(!clock.tick());
    }

    #[test]
    fn test_reveal_thresholds() {
        let mut clock = PhaseClock::new();
        clock.start(2);

        assert_eq!(clock.reveal(0), LevelReveal::NONE);
        clock.tick();
        assert!(clock.reveal(0).alternatives);
        assert!(!clock.reveal(0).chosen_edge);
        clock.tick();
        clock.tick();
        assert!(clock.reveal(0).chosen_edge);
        assert!(!clock.reveal(0).chosen_node);
        clock.tick();
        assert!(clock.reveal(0).chosen_node);
        assert_eq!(clock.reveal(1), LevelReveal::NONE);
        assert_eq!(clock.current_level(), Some(1));
        assert_eq!(clock.phase(), Some(Phase::RevealAlternatives));
    }

    #[test]
    fn test_stopped_clock_reveals_everything() {
        let mut clock = PhaseClock::new();
        clock.start(3);
        clock.tick();
        clock.stop();

        assert_eq!(clock.reveal(2), LevelReveal::ALL);
        assert_eq!(clock.step(), 0);
        assert_eq!(clock.phase(), None);
    }

    #[test]
    fn test_timings_total() {
        assert_eq!(PhaseTimings::explore().total(2), Duration::from_millis(900));
        assert_eq!(PhaseTimings::replay().delay(Phase::RevealChosenEdge), Duration::from_millis(200));
    }

    #[test]
    fn test_timings_total_saturates() {
        let slow = PhaseTimings {
            reveal_alternatives_ms: u64::MAX,
            ..PhaseTimings::explore()
        };
        assert_eq!(slow.total(u32::MAX as usize), Duration::MAX);
        assert!(slow.total(3) < Duration::MAX);
        assert_eq!(
            PhaseTimings::explore().total(u32::MAX as usize),
            Duration::from_millis(450 * u64::from(u32::MAX))
        );
    }
}
