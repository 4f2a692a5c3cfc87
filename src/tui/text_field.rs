//! Single-line text input with caret, selection, and transliteration.
//!
//! Printable keystrokes are first offered to the transliterator; when a
//! replacement applies, the field takes the spliced value and the default
//! insertion is suppressed. Control and alt chords are never consumed, so
//! the parent can use them as shortcuts. Offsets are character offsets.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::MappingState;
use crate::translit::{transliterate, KeyDisposition};
use crate::tui::theme::Theme;

/// Editable single-line text field.
#[derive(Debug, Clone, Default)]
pub struct TextField {
    value: String,
    /// Caret position in characters.
    cursor: usize,
    /// Selection anchor in characters; `None` means no selection.
    anchor: Option<usize>,
}

impl TextField {
    /// Creates an empty field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the value, moving the caret to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.char_len();
        self.anchor = None;
    }

    /// Clears the field.
    pub fn clear(&mut self) {
        self.set_value(String::new());
    }

    /// Value length in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Current selection as (start, end) character offsets. Equal offsets
    /// mean a plain caret.
    #[must_use]
    pub fn selection(&self) -> (usize, usize) {
        match self.anchor {
            Some(anchor) => (anchor.min(self.cursor), anchor.max(self.cursor)),
            None => (self.cursor, self.cursor),
        }
    }

    /// Replaces the character range `start..end` with `insert`, placing the
    /// caret after the inserted text.
    fn splice(&mut self, start: usize, end: usize, insert: &str) {
        let chars: Vec<char> = self.value.chars().collect();
        let start = start.min(chars.len());
        let end = end.clamp(start, chars.len());

        let mut new_value: String = chars[..start].iter().collect();
        new_value.push_str(insert);
        new_value.extend(&chars[end..]);

        self.value = new_value;
        self.cursor = start + insert.chars().count();
        self.anchor = None;
    }

    /// Handles a keystroke. Returns whether the field consumed it.
    pub fn handle_key(&mut self, key: KeyEvent, state: &MappingState) -> bool {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);

        match key.code {
            KeyCode::Char(c) => {
                if key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    // Leave chords to the parent as shortcuts.
                    return false;
                }
                let (start, end) = self.selection();
                match transliterate(&self.value, start, end, c, state) {
                    KeyDisposition::Replaced { value, caret } => {
                        self.value = value;
                        self.cursor = caret;
                        self.anchor = None;
                    }
                    KeyDisposition::PassThrough => {
                        self.splice(start, end, &c.to_string());
                    }
                }
                true
            }
            KeyCode::Backspace => {
                let (start, end) = self.selection();
                if start < end {
                    self.splice(start, end, "");
                } else if self.cursor > 0 {
                    self.splice(self.cursor - 1, self.cursor, "");
                }
                true
            }
            KeyCode::Delete => {
                let (start, end) = self.selection();
                if start < end {
                    self.splice(start, end, "");
                } else if self.cursor < self.char_len() {
                    self.splice(self.cursor, self.cursor + 1, "");
                }
                true
            }
            KeyCode::Left => {
                self.move_cursor(self.cursor.saturating_sub(1), shift);
                true
            }
            KeyCode::Right => {
                self.move_cursor((self.cursor + 1).min(self.char_len()), shift);
                true
            }
            KeyCode::Home => {
                self.move_cursor(0, shift);
                true
            }
            KeyCode::End => {
                self.move_cursor(self.char_len(), shift);
                true
            }
            _ => false,
        }
    }

    /// Moves the caret, extending or collapsing the selection.
    fn move_cursor(&mut self, to: usize, extend: bool) {
        if extend {
            if self.anchor.is_none() {
                self.anchor = Some(self.cursor);
            }
        } else {
            self.anchor = None;
        }
        self.cursor = to;
        if self.anchor == Some(self.cursor) {
            self.anchor = None;
        }
    }

    /// Renders the field as a bordered one-line paragraph.
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme, title: &str, focused: bool) {
        let border_style = if focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text_muted)
        };

        let (sel_start, sel_end) = self.selection();
        let mut spans: Vec<Span> = Vec::new();
        for (i, c) in self.value.chars().enumerate() {
            let mut style = Style::default().fg(theme.text);
            if sel_start <= i && i < sel_end {
                style = style.bg(theme.highlight_bg);
            }
            if focused && i == self.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(c.to_string(), style));
        }
        if focused && self.cursor >= self.char_len() {
            spans.push(Span::styled(
                "█",
                Style::default().fg(theme.text_secondary),
            ));
        }

        let paragraph = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {title} "))
                .border_style(border_style),
        );
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeyboardMapping;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn shifted(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::SHIFT)
    }

    fn plain() -> MappingState {
        MappingState::new()
    }

    fn hebrew() -> MappingState {
        MappingState::enabled(KeyboardMapping::from_entries([('a', "א".to_string())]))
    }

    #[test]
    fn test_typing_without_mapping() {
        let mut field = TextField::new();
        assert!(field.handle_key(key(KeyCode::Char('h')), &plain()));
        assert!(field.handle_key(key(KeyCode::Char('i')), &plain()));
        assert_eq!(field.value(), "hi");
        assert_eq!(field.selection(), (2, 2));
    }

    #[test]
    fn test_typing_with_mapping() {
        let mut field = TextField::new();
        field.set_value("bd");
        field.handle_key(key(KeyCode::Left), &hebrew());
        assert!(field.handle_key(key(KeyCode::Char('a')), &hebrew()));
        assert_eq!(field.value(), "bאd");
        assert_eq!(field.selection(), (2, 2));
    }

    #[test]
    fn test_control_chord_is_not_consumed() {
        let mut field = TextField::new();
        let chord = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert!(!field.handle_key(chord, &hebrew()));
        assert_eq!(field.value(), "");
    }

    #[test]
    fn test_selection_replaced_by_typing() {
        let mut field = TextField::new();
        field.set_value("hello");
        field.handle_key(key(KeyCode::Home), &plain());
        field.handle_key(shifted(KeyCode::Right), &plain());
        field.handle_key(shifted(KeyCode::Right), &plain());
        assert_eq!(field.selection(), (0, 2));
        field.handle_key(key(KeyCode::Char('y')), &plain());
        assert_eq!(field.value(), "yllo");
        assert_eq!(field.selection(), (1, 1));
    }

    #[test]
    fn test_selection_transliterated() {
        let mut field = TextField::new();
        field.set_value("hello");
        field.handle_key(key(KeyCode::Home), &hebrew());
        field.handle_key(shifted(KeyCode::End), &hebrew());
        field.handle_key(key(KeyCode::Char('a')), &hebrew());
        assert_eq!(field.value(), "א");
        assert_eq!(field.selection(), (1, 1));
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut field = TextField::new();
        field.set_value("abc");
        field.handle_key(key(KeyCode::Backspace), &plain());
        assert_eq!(field.value(), "ab");
        field.handle_key(key(KeyCode::Home), &plain());
        field.handle_key(key(KeyCode::Delete), &plain());
        assert_eq!(field.value(), "b");
    }

    #[test]
    fn test_space_inserts_even_when_mapped() {
        let state = MappingState::enabled(KeyboardMapping::from_entries([(' ', "_".to_string())]));
        let mut field = TextField::new();
        field.handle_key(key(KeyCode::Char(' ')), &state);
        assert_eq!(field.value(), " ");
    }

    #[test]
    fn test_key_event_kind_is_irrelevant_here() {
        // The run loop filters on KeyEventKind::Press; the field itself
        // only looks at code and modifiers.
        let mut field = TextField::new();
        let mut event = key(KeyCode::Char('x'));
        event.kind = KeyEventKind::Press;
        assert!(field.handle_key(event, &plain()));
        assert_eq!(field.value(), "x");
    }
}
