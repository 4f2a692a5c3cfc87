//! Component trait pattern for TUI components.
//!
//! Components are self-contained UI elements that manage their own state,
//! handle keyboard input, and emit events to communicate with the parent.

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::tui::theme::Theme;

/// A component that can be rendered and handle input.
pub trait Component {
    /// Event type this component can emit
    type Event;

    /// Handle keyboard input.
    ///
    /// Returns `Some(Event)` if the component wants to signal something to
    /// the parent. Returns `None` if input was handled internally.
    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event>;

    /// Render the component within the provided area.
    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme);
}

/// A component that needs read access to shared context (here: the
/// transliteration state its text fields consult).
pub trait ContextualComponent {
    /// The type of context this component needs
    type Context;

    /// Event type this component can emit
    type Event;

    /// Handle keyboard input with access to shared context.
    fn handle_input(&mut self, key: KeyEvent, context: &Self::Context) -> Option<Self::Event>;

    /// Render the component with access to shared context.
    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme, context: &Self::Context);
}

/// Outcome banner shown inside dialogs after a backend call resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    /// Whether this is a success or an error banner.
    pub kind: BannerKind,
    /// Message text.
    pub message: String,
}

/// Banner flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
}

impl Banner {
    /// Creates a success banner.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            message: message.into(),
        }
    }

    /// Creates an error banner.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            message: message.into(),
        }
    }
}
