//! PreCog
//!
//! Terminal browser for trees of possible futures. Walk from the current
//! world one fork at a time, watch the path replayed level by level, and
//! share it as a link that opens the same replay elsewhere.
//!
//! The state lives in [`Session`]; the terminal shell around it ([`app`],
//! [`ui`]) only draws and forwards input.

pub mod app;
pub mod clipboard;
pub mod config;
mod error;
pub mod input;
pub mod logging;
pub mod session;
pub mod theme;
pub mod toast;
pub mod ui;

pub use clipboard::{Clipboard, Osc52Clipboard};
pub use config::{AppConfig, ConfigError, KeyBindings, ThemeChoice};
pub use error::ViewError;
pub use input::{route, Action, HitMap, InputEvent, KeyMap, RouteContext};
pub use session::{Effect, Mode, Session, SessionSettings};
pub use theme::Theme;
pub use toast::{Toast, ToastKind, ToastQueue};
