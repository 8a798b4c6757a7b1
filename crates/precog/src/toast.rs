//! Short-lived notifications with TTL and dedupe

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Toast severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Warn,
    Error,
}

/// A queued notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    /// Short title line
    pub title: String,
    /// Optional detail, e.g. a URL to copy by hand
    pub body: Option<String>,
    pub created: Instant,
    pub ttl: Duration,
}

impl Toast {
    pub fn expires(&self) -> Instant {
        self.created + self.ttl
    }

    /// 1.0 just after creation, 0.0 at expiry
    pub fn remaining(&self, now: Instant) -> f32 {
        if self.ttl.is_zero() {
            return 0.0;
        }
        let left = self.expires().saturating_duration_since(now);
        (left.as_secs_f32() / self.ttl.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Bounded toast queue
///
/// Pushing an identical toast within the dedupe window refreshes the
/// existing one instead of stacking a copy.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    queue: VecDeque<Toast>,
    max: usize,
    dedupe_window: Duration,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(3)
    }
}

impl ToastQueue {
    /// Create a queue holding at most `max` toasts
    pub fn new(max: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            max: max.max(1),
            dedupe_window: Duration::from_millis(500),
        }
    }

    pub fn push(
        &mut self,
        kind: ToastKind,
        title: impl Into<String>,
        body: Option<String>,
        ttl: Duration,
        now: Instant,
    ) {
        let title = title.into();

        if let Some(existing) = self.queue.iter_mut().find(|t| {
            t.kind == kind
                && t.title == title
                && t.body == body
                && now.saturating_duration_since(t.created) <= self.dedupe_window
        }) {
            existing.created = now;
            existing.ttl = ttl;
            return;
        }

        if self.queue.len() == self.max {
            self.queue.pop_front();
        }
        self.queue.push_back(Toast {
            kind,
            title,
            body,
            created: now,
            ttl,
        });
    }

    /// Drop expired toasts
    pub fn retain_visible(&mut self, now: Instant) {
        self.queue.retain(|t| t.expires() > now);
    }

    /// Toasts still on screen at `now`, oldest first
    pub fn visible(&self, now: Instant) -> impl Iterator<Item = &Toast> {
        self.queue.iter().filter(move |t| t.expires() > now)
    }

    /// When the next toast disappears
    pub fn next_expiry(&self) -> Option<Instant> {
        self.queue.iter().map(Toast::expires).min()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
