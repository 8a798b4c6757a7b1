//! Input routing
//!
//! Raw terminal events become [`InputEvent`]s through the [`KeyMap`] and the
//! [`HitMap`] recorded while drawing. [`route`] then decides whether the
//! event means anything in the current state. Inputs that are not valid
//! right now are dropped here, so the session never sees them.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use log::trace;
use ratatui::layout::Rect;

use crate::config::{ConfigError, KeyBindings};

/// A user intent, before validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Number key, 1-based
    Digit(u8),
    /// Click on a rendered choice, 0-based
    Pick(usize),
    Back,
    OpenReplay,
    Close,
    Share,
    Reset,
    Quit,
}

/// A validated request for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Choose(usize),
    GoBack,
    OpenReplay,
    CloseReplay,
    Share,
    Reset,
    Quit,
}

/// The parts of session state routing depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteContext {
    /// Size of the current choice set
    pub choice_count: usize,
    /// Length of the visited path
    pub path_len: usize,
    /// Whether the replay overlay is showing
    pub replay_open: bool,
    /// Whether a choice is settling
    pub pending: bool,
    /// False for a session opened from a share link
    pub exploring: bool,
}

/// Validate an input against the current state
pub fn route(event: InputEvent, cx: &RouteContext) -> Option<Action> {
    let can_choose = |index: usize| {
        cx.exploring && !cx.replay_open && !cx.pending && index < cx.choice_count
    };

    let action = match event {
        InputEvent::Digit(k) => {
            let index = usize::from(k).checked_sub(1)?;
            can_choose(index).then_some(Action::Choose(index))
        }
        InputEvent::Pick(index) => can_choose(index).then_some(Action::Choose(index)),
        InputEvent::Back => {
            (cx.exploring && !cx.replay_open && cx.path_len > 0).then_some(Action::GoBack)
        }
        InputEvent::OpenReplay => {
            (!cx.replay_open && cx.path_len > 0).then_some(Action::OpenReplay)
        }
        InputEvent::Close => cx.replay_open.then_some(Action::CloseReplay),
        InputEvent::Share => (cx.replay_open && cx.path_len > 0).then_some(Action::Share),
        InputEvent::Reset => (cx.exploring && !cx.replay_open).then_some(Action::Reset),
        InputEvent::Quit => Some(Action::Quit),
    };

    if action.is_none() {
        trace!("Ignored {event:?} in {cx:?}");
    }
    action
}

/// Parse a key name from the config
pub fn parse_key(name: &str) -> Option<KeyCode> {
    let name = name.trim();
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }

    let code = match name.to_ascii_lowercase().as_str() {
        "backspace" => KeyCode::Backspace,
        "esc" | "escape" => KeyCode::Esc,
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "space" => KeyCode::Char(' '),
        "delete" | "del" => KeyCode::Delete,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        _ => return None,
    };
    Some(code)
}

/// Key codes for the rebindable inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap {
    back: KeyCode,
    open_replay: KeyCode,
    close: KeyCode,
    share: KeyCode,
    reset: KeyCode,
    quit: KeyCode,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            back: KeyCode::Backspace,
            open_replay: KeyCode::Char('v'),
            close: KeyCode::Esc,
            share: KeyCode::Char('s'),
            reset: KeyCode::Char('r'),
            quit: KeyCode::Char('q'),
        }
    }
}

impl KeyMap {
    /// Build a key map from configured names
    pub fn from_bindings(bindings: &KeyBindings) -> Result<Self, ConfigError> {
        let key = |action: &'static str, name: &str| match parse_key(name) {
            Some(KeyCode::Char('1'..='9')) => Err(ConfigError::ReservedKey {
                action,
                key: name.to_string(),
            }),
            Some(code) => Ok(code),
            None => Err(ConfigError::UnknownKey {
                action,
                key: name.to_string(),
            }),
        };

        Ok(Self {
            back: key("back", &bindings.back)?,
            open_replay: key("open_replay", &bindings.open_replay)?,
            close: key("close", &bindings.close)?,
            share: key("share", &bindings.share)?,
            reset: key("reset", &bindings.reset)?,
            quit: key("quit", &bindings.quit)?,
        })
    }

    /// Translate a key press
    pub fn translate_key(&self, key: &KeyEvent) -> Option<InputEvent> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(InputEvent::Quit);
        }

        let code = key.code;
        let event = if code == KeyCode::Esc || code == self.close {
            InputEvent::Close
        } else if code == self.back {
            InputEvent::Back
        } else if code == self.open_replay {
            InputEvent::OpenReplay
        } else if code == self.share {
            InputEvent::Share
        } else if code == self.reset {
            InputEvent::Reset
        } else if code == self.quit {
            InputEvent::Quit
        } else {
            match code {
                KeyCode::Char(c @ '1'..='9') => InputEvent::Digit(c as u8 - b'0'),
                _ => return None,
            }
        };
        Some(event)
    }

    /// Translate any terminal event, using `hits` for mouse clicks
    pub fn translate(&self, event: &Event, hits: &HitMap) -> Option<InputEvent> {
        match event {
            Event::Key(key) => self.translate_key(key),
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => hits.pick(*column, *row).map(InputEvent::Pick),
            _ => None,
        }
    }

    /// Display name of the key bound to an input, for hints
    pub fn label(&self, event: InputEvent) -> String {
        let code = match event {
            InputEvent::Back => self.back,
            InputEvent::OpenReplay => self.open_replay,
            InputEvent::Close => self.close,
            InputEvent::Share => self.share,
            InputEvent::Reset => self.reset,
            InputEvent::Quit => self.quit,
            InputEvent::Digit(k) => return k.to_string(),
            InputEvent::Pick(i) => return (i + 1).to_string(),
        };
        match code {
            KeyCode::Char(' ') => "space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Esc => "esc".to_string(),
            KeyCode::Backspace => "backspace".to_string(),
            other => format!("{other:?}").to_lowercase(),
        }
    }
}

/// Screen regions of the choices drawn in the last frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitMap {
    regions: Vec<(Rect, usize)>,
}

impl HitMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, area: Rect, index: usize) {
        self.regions.push((area, index));
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Choice index under a cell, if any
    pub fn pick(&self, column: u16, row: u16) -> Option<usize> {
        self.regions
            .iter()
            .find(|(area, _)| {
                column >= area.x
                    && column < area.x.saturating_add(area.width)
                    && row >= area.y
                    && row < area.y.saturating_add(area.height)
            })
            .map(|(_, index)| *index)
    }
}
