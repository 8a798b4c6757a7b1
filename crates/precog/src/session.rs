//! Session state and the reducer that changes it
//!
//! All state for one view lives in [`Session`]. The event loop only talks to
//! it through [`Session::handle`] / [`Session::apply`] for user input and
//! [`Session::poll_timers`] for elapsed deadlines. Side effects that need
//! the outside world come back as [`Effect`]s.

use log::{debug, info, warn};
use path_replay::{
    codec, journey, PhaseTimings, ResolvedPath, Sequencer, ShareLink, ShareToken, TimerSlot,
};
use scenario_tree::{NodeId, PendingChoice, ScenarioTree, Traversal, TreeNode};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::input::{route, Action, InputEvent, RouteContext};
use crate::toast::{ToastKind, ToastQueue};

/// What the session is showing
#[derive(Debug, Clone)]
pub enum Mode {
    /// Walking the tree interactively
    Explore(Traversal),
    /// Watching a path from a share link
    Shared(ResolvedPath),
}

/// Work for the event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CopyToClipboard(String),
    Quit,
}

/// Session tunables, taken from [`AppConfig`]
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub share_origin: String,
    pub settle_delay: Duration,
    pub explore_timings: PhaseTimings,
    pub replay_timings: PhaseTimings,
    pub toast_ttl: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for SessionSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            share_origin: config.share_origin.clone(),
            settle_delay: config.settle_delay(),
            explore_timings: config.explore_timings,
            replay_timings: config.replay_timings,
            toast_ttl: config.toast_ttl(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    tree: Arc<ScenarioTree>,
    mode: Mode,
    settle: TimerSlot<PendingChoice>,
    replay_open: bool,
    sequencer: Sequencer,
    toasts: ToastQueue,
    settings: SessionSettings,
    /// Token a shared path was opened from
    received: Option<ShareToken>,
}

impl Session {
    /// Start exploring from the world state
    pub fn explore(tree: Arc<ScenarioTree>, settings: SessionSettings) -> Self {
        info!("Exploring {:?}", tree.scenario());
        Self {
            sequencer: Sequencer::new(settings.explore_timings),
            tree,
            mode: Mode::Explore(Traversal::new()),
            settle: TimerSlot::new(),
            replay_open: false,
            toasts: ToastQueue::default(),
            settings,
            received: None,
        }
    }

    /// Open a shared path with the replay already playing
    ///
    /// Ids that no longer resolve are skipped and reported in a toast.
    pub fn shared(
        tree: Arc<ScenarioTree>,
        ids: Vec<NodeId>,
        settings: SessionSettings,
        now: Instant,
    ) -> Self {
        let received = Some(codec::encode(&ids));
        let path = ResolvedPath::resolve(&tree, ids);
        info!(
            "Opening shared path: levels={} skipped={}",
            path.len(),
            path.skipped().len()
        );

        let mut session = Self {
            sequencer: Sequencer::new(settings.replay_timings),
            tree,
            mode: Mode::Shared(path),
            settle: TimerSlot::new(),
            replay_open: false,
            toasts: ToastQueue::default(),
            settings,
            received,
        };

        let skipped = session.shared_path().map_or(0, |p| p.skipped().len());
        if skipped > 0 {
            session.toasts.push(
                ToastKind::Warn,
                format!("{skipped} step(s) of this journey are no longer in the tree"),
                None,
                session.settings.toast_ttl,
                now,
            );
        }

        session.open_replay(now);
        session
    }

    /// Share the exact token a shared path was opened from
    ///
    /// Without it the link is re-encoded from every received id, skipped
    /// ones included. Ignored while exploring.
    pub fn with_share_token(mut self, token: ShareToken) -> Self {
        if !self.is_exploring() {
            self.received = Some(token);
        }
        self
    }

    pub fn tree(&self) -> &ScenarioTree {
        &self.tree
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_exploring(&self) -> bool {
        matches!(self.mode, Mode::Explore(_))
    }

    pub fn traversal(&self) -> Option<&Traversal> {
        match &self.mode {
            Mode::Explore(traversal) => Some(traversal),
            Mode::Shared(_) => None,
        }
    }

    pub fn shared_path(&self) -> Option<&ResolvedPath> {
        match &self.mode {
            Mode::Explore(_) => None,
            Mode::Shared(path) => Some(path),
        }
    }

    /// The visited (or shared) path
    pub fn path(&self) -> &[NodeId] {
        match &self.mode {
            Mode::Explore(traversal) => traversal.path(),
            Mode::Shared(path) => path.ids(),
        }
    }

    /// The node at the end of the path
    pub fn current_node(&self) -> Option<&TreeNode> {
        self.path().last().and_then(|id| self.tree.node_by_id(id))
    }

    /// Choices on offer; always empty for a shared path
    pub fn current_choices(&self) -> Vec<&TreeNode> {
        match &self.mode {
            Mode::Explore(traversal) => traversal.current_choices(&self.tree),
            Mode::Shared(_) => Vec::new(),
        }
    }

    /// Index of the choice that is settling
    pub fn pending_index(&self) -> Option<usize> {
        self.traversal()
            .and_then(Traversal::pending)
            .map(PendingChoice::index)
    }

    pub fn is_replay_open(&self) -> bool {
        self.replay_open
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Branch ordinals of the path, e.g. `2 → 1 → 3`
    pub fn numeric_path(&self) -> String {
        journey::numeric_path(&self.tree, self.path())
    }

    /// Share link for the current path
    ///
    /// A shared path is passed on as it was received.
    pub fn share_link(&self) -> ShareLink {
        match &self.received {
            Some(token) => ShareLink::new(&self.settings.share_origin, token.clone()),
            None => ShareLink::for_path(&self.settings.share_origin, self.path()),
        }
    }

    pub fn route_context(&self) -> RouteContext {
        RouteContext {
            choice_count: self.current_choices().len(),
            path_len: self.path().len(),
            replay_open: self.replay_open,
            pending: self.pending_index().is_some(),
            exploring: self.is_exploring(),
        }
    }

    /// Route and apply a raw input
    pub fn handle(&mut self, event: InputEvent, now: Instant) -> Option<Effect> {
        let action = route(event, &self.route_context())?;
        self.apply(action, now)
    }

    /// Apply a validated action
    pub fn apply(&mut self, action: Action, now: Instant) -> Option<Effect> {
        debug!("Applying {action:?}");

        match action {
            Action::Choose(index) => {
                let Mode::Explore(traversal) = &mut self.mode else {
                    return None;
                };
                if let Some(ticket) = traversal.choose(&self.tree, index) {
                    self.settle
                        .arm_after(now, self.settings.settle_delay, ticket);
                }
                None
            }
            Action::GoBack => {
                self.settle.cancel();
                self.close_replay();
                if let Mode::Explore(traversal) = &mut self.mode {
                    traversal.go_back();
                }
                None
            }
            Action::Reset => {
                self.settle.cancel();
                self.close_replay();
                if let Mode::Explore(traversal) = &mut self.mode {
                    traversal.reset();
                }
                None
            }
            Action::OpenReplay => {
                self.open_replay(now);
                None
            }
            Action::CloseReplay => {
                self.close_replay();
                None
            }
            Action::Share => {
                if self.path().is_empty() {
                    return None;
                }
                let url = self.share_link().url();
                info!("Sharing path of {} steps: {url}", self.path().len());
                Some(Effect::CopyToClipboard(url))
            }
            Action::Quit => {
                self.settle.cancel();
                self.sequencer.stop();
                info!("Quit requested");
                Some(Effect::Quit)
            }
        }
    }

    /// Fire whatever deadlines have passed
    ///
    /// Returns true if anything visible changed.
    pub fn poll_timers(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if let Some(ticket) = self.settle.take_due(now) {
            let committed = match &mut self.mode {
                Mode::Explore(traversal) => traversal.commit(&ticket),
                Mode::Shared(_) => false,
            };
            if committed {
                self.close_replay();
                changed = true;
            }
        }

        changed |= self.sequencer.poll(now);

        let before = self.toasts.visible(now).count();
        self.toasts.retain_visible(now);
        changed |= self.toasts.visible(now).count() != before;

        changed
    }

    /// Earliest moment [`poll_timers`](Self::poll_timers) has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.settle.deadline(),
            self.sequencer.next_deadline(),
            self.toasts.next_expiry(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Report the outcome of a clipboard write to the user
    ///
    /// The URL is part of the toast either way so it can be copied by hand.
    pub fn record_clipboard<E: std::fmt::Display>(
        &mut self,
        result: Result<(), E>,
        url: &str,
        now: Instant,
    ) {
        let ttl = self.settings.toast_ttl;
        match result {
            Ok(()) => {
                info!("Share URL copied to clipboard");
                self.toasts.push(
                    ToastKind::Info,
                    "Share link copied",
                    Some(url.to_string()),
                    ttl,
                    now,
                );
            }
            Err(e) => {
                warn!("Clipboard write failed: {e}");
                self.toasts.push(
                    ToastKind::Error,
                    "Clipboard write failed; copy the link below",
                    Some(url.to_string()),
                    ttl,
                    now,
                );
            }
        }
    }

    fn open_replay(&mut self, now: Instant) {
        let timings = if self.is_exploring() {
            self.settings.explore_timings
        } else {
            self.settings.replay_timings
        };
        self.sequencer.set_timings(timings);
        self.replay_open = true;
        self.sequencer.start(self.path().len(), now);
    }

    fn close_replay(&mut self) {
        if self.replay_open {
            debug!("Replay closed");
        }
        self.replay_open = false;
        self.sequencer.stop();
    }
}
