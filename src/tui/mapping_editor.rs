//! Keyboard mapping editor dialog.
//!
//! Mirrors the mapping modal of the original web client: the dialog
//! re-fetches the current mapping when opened, shows one from/to row per
//! entry plus a trailing empty row, and offers Save and Reset-to-default
//! actions. Entry fields are plain inputs; transliteration is deliberately
//! not applied while editing the table itself.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::models::{KeyboardUpdate, MappingEntry, MappingState};
use crate::tui::component::{Banner, BannerKind, Component};
use crate::tui::text_field::TextField;
use crate::tui::theme::Theme;

/// One editable from/to row.
#[derive(Debug, Clone, Default)]
struct EditorRow {
    from: TextField,
    to: TextField,
}

impl EditorRow {
    fn with_values(from: &str, to: &str) -> Self {
        let mut row = Self::default();
        row.from.set_value(from);
        row.to.set_value(to);
        row
    }

    fn to_entry(&self) -> MappingEntry {
        MappingEntry {
            from: self.from.value().to_string(),
            to: self.to.value().to_string(),
        }
    }
}

/// Which part of the editor has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditorFocus {
    /// The enabled checkbox.
    Enabled,
    /// A from/to cell.
    Cell {
        /// Row index.
        row: usize,
        /// True when the "to" cell is focused.
        to: bool,
    },
}

/// Events emitted by the mapping editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingEditorEvent {
    /// Save the edited rows.
    Submitted(KeyboardUpdate),
    /// Reset to the configured default mapping.
    ResetRequested,
    /// The dialog was dismissed.
    Closed,
}

/// Keyboard mapping editor dialog state.
#[derive(Debug, Clone)]
pub struct MappingEditor {
    rows: Vec<EditorRow>,
    enabled: bool,
    focus: EditorFocus,
    loading: bool,
    banner: Option<Banner>,
}

impl Default for MappingEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingEditor {
    /// Creates an editor in the loading state; call [`populate`] once the
    /// current mapping arrives.
    ///
    /// [`populate`]: MappingEditor::populate
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            enabled: false,
            focus: EditorFocus::Enabled,
            loading: true,
            banner: None,
        }
    }

    /// Fills the editor from a freshly fetched mapping state.
    pub fn populate(&mut self, state: &MappingState) {
        self.rows = state
            .mapping
            .iter()
            .map(|(from, to)| EditorRow::with_values(&from.to_string(), to))
            .collect();
        // Trailing empty row for adding a new entry.
        self.rows.push(EditorRow::default());
        self.enabled = state.enabled;
        self.loading = false;
    }

    /// Shows an outcome banner.
    pub fn set_banner(&mut self, banner: Banner) {
        self.banner = Some(banner);
    }

    /// Whether the editor is still waiting for the current mapping.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn to_update(&self) -> KeyboardUpdate {
        KeyboardUpdate::save(
            self.rows.iter().map(EditorRow::to_entry).collect(),
            self.enabled,
        )
    }

    fn add_row(&mut self) {
        self.rows.push(EditorRow::default());
        self.focus = EditorFocus::Cell {
            row: self.rows.len() - 1,
            to: false,
        };
    }

    fn remove_current_row(&mut self) {
        if let EditorFocus::Cell { row, .. } = self.focus {
            if self.rows.len() > 1 {
                self.rows.remove(row);
                let row = row.min(self.rows.len() - 1);
                self.focus = EditorFocus::Cell { row, to: false };
            }
        }
    }

    fn move_focus_vertical(&mut self, down: bool) {
        self.focus = match (self.focus, down) {
            (EditorFocus::Enabled, true) if !self.rows.is_empty() => {
                EditorFocus::Cell { row: 0, to: false }
            }
            (EditorFocus::Enabled, _) => EditorFocus::Enabled,
            (EditorFocus::Cell { row, to }, true) => {
                if row + 1 < self.rows.len() {
                    EditorFocus::Cell { row: row + 1, to }
                } else {
                    EditorFocus::Cell { row, to }
                }
            }
            (EditorFocus::Cell { row, to }, false) => {
                if row == 0 {
                    EditorFocus::Enabled
                } else {
                    EditorFocus::Cell { row: row - 1, to }
                }
            }
        };
    }

    fn cycle_cell(&mut self) {
        self.focus = match self.focus {
            EditorFocus::Enabled => {
                if self.rows.is_empty() {
                    EditorFocus::Enabled
                } else {
                    EditorFocus::Cell { row: 0, to: false }
                }
            }
            EditorFocus::Cell { row, to: false } => EditorFocus::Cell { row, to: true },
            EditorFocus::Cell { row, to: true } => {
                if row + 1 < self.rows.len() {
                    EditorFocus::Cell {
                        row: row + 1,
                        to: false,
                    }
                } else {
                    EditorFocus::Enabled
                }
            }
        };
    }
}

impl Component for MappingEditor {
    type Event = MappingEditorEvent;

    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event> {
        if key.code == KeyCode::Esc {
            return Some(MappingEditorEvent::Closed);
        }
        if self.loading {
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') => return Some(MappingEditorEvent::Submitted(self.to_update())),
                KeyCode::Char('r') => return Some(MappingEditorEvent::ResetRequested),
                KeyCode::Char('n') => {
                    self.add_row();
                    return None;
                }
                KeyCode::Char('d') => {
                    self.remove_current_row();
                    return None;
                }
                _ => return None,
            }
        }

        match key.code {
            KeyCode::Tab => self.cycle_cell(),
            KeyCode::Down => self.move_focus_vertical(true),
            KeyCode::Up => self.move_focus_vertical(false),
            KeyCode::Char(' ') if self.focus == EditorFocus::Enabled => {
                self.enabled = !self.enabled;
            }
            _ => {
                if let EditorFocus::Cell { row, to } = self.focus {
                    if let Some(entry) = self.rows.get_mut(row) {
                        // Editing the table itself never transliterates.
                        let plain = MappingState::new();
                        let field = if to { &mut entry.to } else { &mut entry.from };
                        field.handle_key(key, &plain);
                    }
                }
            }
        }
        None
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let dialog_area = super::centered_rect(60, 70, area);
        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Keyboard Mapping ")
            .border_style(Style::default().fg(theme.accent));
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Enabled checkbox
                Constraint::Min(3),    // Rows
                Constraint::Length(1), // Banner
                Constraint::Length(1), // Help
            ])
            .split(inner);

        // Enabled checkbox
        let checked = if self.enabled { "[x]" } else { "[ ]" };
        let enabled_style = if self.focus == EditorFocus::Enabled {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("{checked} Transliteration enabled"),
                enabled_style,
            ))),
            chunks[0],
        );

        if self.loading {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "Loading current mapping...",
                    Style::default().fg(theme.text_muted),
                ))),
                chunks[1],
            );
        } else {
            self.render_rows(frame, chunks[1], theme);
        }

        if let Some(banner) = &self.banner {
            let color = match banner.kind {
                BannerKind::Success => theme.success,
                BannerKind::Error => theme.error,
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    banner.message.clone(),
                    Style::default().fg(color),
                ))),
                chunks[2],
            );
        }

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "Tab next cell  Space toggle  ^N add  ^D delete  ^S save  ^R default  Esc close",
                Style::default().fg(theme.text_muted),
            ))),
            chunks[3],
        );
    }
}

impl MappingEditor {
    fn render_rows(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        // Each bordered field is three lines tall; show as many rows as fit.
        let visible = (area.height / 3) as usize;
        let first = match self.focus {
            EditorFocus::Cell { row, .. } if row + 1 > visible => row + 1 - visible,
            _ => 0,
        };

        let mut y = area.y;
        for (i, row) in self.rows.iter().enumerate().skip(first).take(visible) {
            let row_area = Rect::new(area.x, y, area.width, 3);
            let halves = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
                .split(row_area);

            let (from_focused, to_focused) = match self.focus {
                EditorFocus::Cell { row, to } if row == i => (!to, to),
                _ => (false, false),
            };
            row.from.render(frame, halves[0], theme, "From", from_focused);
            row.to.render(frame, halves[1], theme, "To", to_focused);
            y += 3;
        }
    }
}
