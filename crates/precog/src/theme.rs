//! Color definitions for the terminal UI

use ratatui::style::{Color, Modifier, Style};
use scenario_tree::BranchType;

use crate::config::ThemeChoice;
use crate::toast::ToastKind;

/// Colors for the terminal UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Default text color
    pub text: Color,

    /// Muted text color (dates, hints, separators)
    pub text_muted: Color,

    /// Panel borders
    pub border: Color,

    /// Headings and the numeric path
    pub accent: Color,

    /// Highlight for a choice that is settling
    pub pending: Color,

    /// Error screen and failed notifications
    pub error: Color,

    pub optimistic: Color,
    pub moderate: Color,
    pub pessimistic: Color,
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            text: Color::Rgb(0xd9, 0xd9, 0xd9),
            text_muted: Color::Rgb(0x80, 0x80, 0x80),
            border: Color::Rgb(0x40, 0x40, 0x48),
            accent: Color::Rgb(0xb3, 0x8b, 0xfa),
            pending: Color::Rgb(0xfa, 0xcc, 0x15),
            error: Color::Rgb(0xf8, 0x71, 0x71),
            optimistic: Color::Rgb(0x4a, 0xde, 0x80),
            moderate: Color::Rgb(0x60, 0xa5, 0xfa),
            pessimistic: Color::Rgb(0xf8, 0x71, 0x71),
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            text: Color::Rgb(0x1f, 0x1f, 0x1f),
            text_muted: Color::Rgb(0x6b, 0x6b, 0x6b),
            border: Color::Rgb(0xc8, 0xc8, 0xd0),
            accent: Color::Rgb(0x6d, 0x28, 0xd9),
            pending: Color::Rgb(0xb4, 0x53, 0x09),
            error: Color::Rgb(0xb9, 0x1c, 0x1c),
            optimistic: Color::Rgb(0x15, 0x80, 0x3d),
            moderate: Color::Rgb(0x1d, 0x4e, 0xd8),
            pessimistic: Color::Rgb(0xb9, 0x1c, 0x1c),
        }
    }

    pub fn from_choice(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Dark => Self::dark(),
            ThemeChoice::Light => Self::light(),
        }
    }

    /// Color of a branch class
    pub fn branch(&self, branch: BranchType) -> Color {
        match branch {
            BranchType::Optimistic => self.optimistic,
            BranchType::Moderate => self.moderate,
            BranchType::Pessimistic => self.pessimistic,
        }
    }

    pub fn toast(&self, kind: ToastKind) -> Color {
        match kind {
            ToastKind::Info => self.accent,
            ToastKind::Warn => self.pending,
            ToastKind::Error => self.error,
        }
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    pub fn heading_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
