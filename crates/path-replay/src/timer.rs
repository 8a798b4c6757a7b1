//! Single-slot deadlines
//!
//! The engine only ever waits for two things: the settle delay after a
//! choice and the next replay tick. Each gets one slot. Arming a slot drops
//! whatever it held, so there is never more than one deadline per purpose.

use log::trace;
use std::time::{Duration, Instant};

/// One cancellable deadline carrying a payload
#[derive(Debug, Clone)]
pub struct TimerSlot<T> {
    armed: Option<(Instant, T)>,
}

impl<T> Default for TimerSlot<T> {
    fn default() -> Self {
        Self { armed: None }
    }
}

impl<T> TimerSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm for `deadline`, returning the payload this replaces
    pub fn arm(&mut self, deadline: Instant, payload: T) -> Option<T> {
        let replaced = self.armed.replace((deadline, payload)).map(|(_, old)| old);
        if replaced.is_some() {
            trace!("Timer re-armed; previous deadline dropped");
        }
        replaced
    }

    /// Arm for `delay` after `now`
    pub fn arm_after(&mut self, now: Instant, delay: Duration, payload: T) -> Option<T> {
        self.arm(now + delay, payload)
    }

    /// Disarm, returning the payload if one was pending
    pub fn cancel(&mut self) -> Option<T> {
        self.armed.take().map(|(_, payload)| payload)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.armed.as_ref().map(|(deadline, _)| *deadline)
    }

    pub fn payload(&self) -> Option<&T> {
        self.armed.as_ref().map(|(_, payload)| payload)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Disarm and return the payload if the deadline has passed
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.armed {
            Some((deadline, _)) if *deadline <= now => self.cancel(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rearm_replaces() {
        let now = Instant::now();
        let mut slot = TimerSlot::new();

        assert_eq!(slot.arm_after(now, Duration::from_millis(10), "a"), None);
        assert_eq!(slot.arm_after(now, Duration::from_millis(50), "b"), Some("a"));
        assert_eq!(slot.payload(), Some(&"b"));
    }

    #[test]
    fn test_take_due() {
        let now = Instant::now();
        let mut slot = TimerSlot::new();
        slot.arm_after(now, Duration::from_millis(300), 7);

        assert_eq!(slot.take_due(now + Duration::from_millis(299)), None);
        assert!(slot.is_armed());
        assert_eq!(slot.take_due(now + Duration::from_millis(300)), Some(7));
        assert!(!slot.is_armed());
        assert_eq!(slot.take_due(now + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_cancel() {
        let mut slot = TimerSlot::new();
        slot.arm(Instant::now(), ());
        assert_eq!(slot.cancel(), Some(()));
        assert_eq!(slot.deadline(), None);
    }
}
