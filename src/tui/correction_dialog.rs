//! OCR word correction dialog.
//!
//! Mirrors the fix-word modal of the original web client: the dialog targets
//! a (document, word offset) pair, prefills the suggestion field with the
//! word currently stored by the backend (and a second field when the word is
//! hyphenated across lines), and submits the correction with a font and
//! language code. Suggestion fields transliterate; the numeric target fields
//! do not.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::models::{Correction, MappingState, WordInfo};
use crate::tui::component::{Banner, BannerKind, ContextualComponent};
use crate::tui::text_field::TextField;
use crate::tui::theme::Theme;

/// Which row of the dialog has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CorrectionFocus {
    DocId,
    Offset,
    Suggestion,
    Suggestion2,
    Font,
    Language,
}

/// Events emitted by the correction dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectionDialogEvent {
    /// Fetch the word at the given target.
    WordRequested {
        /// Backend document identifier.
        doc_id: i64,
        /// Character offset of the word.
        word_offset: u64,
    },
    /// Submit the correction.
    Submitted(Correction),
    /// The dialog was dismissed.
    Closed,
}

/// Correction dialog state.
#[derive(Debug, Clone)]
pub struct CorrectionDialog {
    doc_id: TextField,
    offset: TextField,
    suggestion: TextField,
    suggestion2: TextField,
    has_word2: bool,
    fonts: Vec<String>,
    languages: Vec<String>,
    font_index: usize,
    language_index: usize,
    image_url: Option<String>,
    loading: bool,
    banner: Option<Banner>,
    focus: CorrectionFocus,
}

impl CorrectionDialog {
    /// Creates a dialog offering the configured font and language codes.
    #[must_use]
    pub fn new(fonts: Vec<String>, languages: Vec<String>) -> Self {
        Self {
            doc_id: TextField::new(),
            offset: TextField::new(),
            suggestion: TextField::new(),
            suggestion2: TextField::new(),
            has_word2: false,
            fonts,
            languages,
            font_index: 0,
            language_index: 0,
            image_url: None,
            loading: false,
            banner: None,
            focus: CorrectionFocus::DocId,
        }
    }

    /// Fills the suggestion fields from a fetched word.
    pub fn set_word(&mut self, info: &WordInfo, image_url: Option<String>) {
        self.suggestion.set_value(info.word.clone());
        self.has_word2 = info.word2.is_some();
        self.suggestion2
            .set_value(info.word2.clone().unwrap_or_default());
        self.image_url = image_url;
        self.loading = false;
        self.focus = CorrectionFocus::Suggestion;
    }

    /// Shows an outcome banner and leaves the loading state.
    pub fn set_banner(&mut self, banner: Banner) {
        self.banner = Some(banner);
        self.loading = false;
    }

    /// Parses the target fields.
    fn target(&self) -> Result<(i64, u64), String> {
        let doc_id = self
            .doc_id
            .value()
            .trim()
            .parse::<i64>()
            .map_err(|_| "Document id must be a number".to_string())?;
        let offset = self
            .offset
            .value()
            .trim()
            .parse::<u64>()
            .map_err(|_| "Word offset must be a non-negative number".to_string())?;
        Ok((doc_id, offset))
    }

    fn request_word(&mut self) -> Option<CorrectionDialogEvent> {
        match self.target() {
            Ok((doc_id, word_offset)) => {
                self.loading = true;
                self.banner = None;
                Some(CorrectionDialogEvent::WordRequested {
                    doc_id,
                    word_offset,
                })
            }
            Err(message) => {
                self.set_banner(Banner::error(message));
                None
            }
        }
    }

    fn submit(&mut self) -> Option<CorrectionDialogEvent> {
        let (doc_id, word_offset) = match self.target() {
            Ok(target) => target,
            Err(message) => {
                self.set_banner(Banner::error(message));
                return None;
            }
        };

        let correction = Correction {
            doc_id,
            word_offset,
            suggestion: self.suggestion.value().to_string(),
            suggestion2: if self.has_word2 {
                Some(self.suggestion2.value().to_string())
            } else {
                None
            },
            font_code: self.fonts.get(self.font_index).cloned().unwrap_or_default(),
            language_code: self
                .languages
                .get(self.language_index)
                .cloned()
                .unwrap_or_default(),
        };

        if !correction.has_suggestion() {
            self.set_banner(Banner::error("Suggestion must not be empty"));
            return None;
        }

        self.loading = true;
        self.banner = None;
        Some(CorrectionDialogEvent::Submitted(correction))
    }

    fn cycle_focus(&mut self, forward: bool) {
        let order = [
            CorrectionFocus::DocId,
            CorrectionFocus::Offset,
            CorrectionFocus::Suggestion,
            CorrectionFocus::Suggestion2,
            CorrectionFocus::Font,
            CorrectionFocus::Language,
        ];
        let mut index = order
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or_default();
        loop {
            index = if forward {
                (index + 1) % order.len()
            } else {
                (index + order.len() - 1) % order.len()
            };
            if order[index] != CorrectionFocus::Suggestion2 || self.has_word2 {
                break;
            }
        }
        self.focus = order[index];
    }

    fn cycle_choice(&mut self, forward: bool) {
        let (index, len) = match self.focus {
            CorrectionFocus::Font => (&mut self.font_index, self.fonts.len()),
            CorrectionFocus::Language => (&mut self.language_index, self.languages.len()),
            _ => return,
        };
        if len == 0 {
            return;
        }
        *index = if forward {
            (*index + 1) % len
        } else {
            (*index + len - 1) % len
        };
    }
}

impl ContextualComponent for CorrectionDialog {
    type Context = MappingState;
    type Event = CorrectionDialogEvent;

    fn handle_input(&mut self, key: KeyEvent, context: &Self::Context) -> Option<Self::Event> {
        if key.code == KeyCode::Esc {
            return Some(CorrectionDialogEvent::Closed);
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('l') => self.request_word(),
                KeyCode::Char('s') => self.submit(),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Tab => {
                self.cycle_focus(true);
                None
            }
            KeyCode::BackTab => {
                self.cycle_focus(false);
                None
            }
            _ => {
                match self.focus {
                    CorrectionFocus::DocId | CorrectionFocus::Offset => {
                        // Target fields are numeric; never transliterate.
                        let plain = MappingState::new();
                        let field = if self.focus == CorrectionFocus::DocId {
                            &mut self.doc_id
                        } else {
                            &mut self.offset
                        };
                        field.handle_key(key, &plain);
                    }
                    CorrectionFocus::Suggestion => {
                        self.suggestion.handle_key(key, context);
                    }
                    CorrectionFocus::Suggestion2 => {
                        self.suggestion2.handle_key(key, context);
                    }
                    CorrectionFocus::Font | CorrectionFocus::Language => match key.code {
                        KeyCode::Left => self.cycle_choice(false),
                        KeyCode::Right => self.cycle_choice(true),
                        _ => {}
                    },
                }
                None
            }
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme, _context: &Self::Context) {
        let dialog_area = super::centered_rect(70, 80, area);
        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Fix Word ")
            .border_style(Style::default().fg(theme.accent));
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // DocId + Offset
                Constraint::Length(3), // Suggestion
                Constraint::Length(3), // Suggestion2
                Constraint::Length(1), // Font
                Constraint::Length(1), // Language
                Constraint::Length(1), // Image URL / loading
                Constraint::Length(1), // Banner
                Constraint::Min(1),    // Help
            ])
            .split(inner);

        let target = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[0]);
        self.doc_id.render(
            frame,
            target[0],
            theme,
            "Document",
            self.focus == CorrectionFocus::DocId,
        );
        self.offset.render(
            frame,
            target[1],
            theme,
            "Offset",
            self.focus == CorrectionFocus::Offset,
        );

        self.suggestion.render(
            frame,
            chunks[1],
            theme,
            "Suggestion",
            self.focus == CorrectionFocus::Suggestion,
        );
        if self.has_word2 {
            self.suggestion2.render(
                frame,
                chunks[2],
                theme,
                "Second word",
                self.focus == CorrectionFocus::Suggestion2,
            );
        }

        self.render_choice(
            frame,
            chunks[3],
            theme,
            "Font",
            &self.fonts,
            self.font_index,
            self.focus == CorrectionFocus::Font,
        );
        self.render_choice(
            frame,
            chunks[4],
            theme,
            "Language",
            &self.languages,
            self.language_index,
            self.focus == CorrectionFocus::Language,
        );

        if self.loading {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "Working...",
                    Style::default().fg(theme.text_muted),
                ))),
                chunks[5],
            );
        } else if let Some(url) = &self.image_url {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!("Scan: {url}"),
                    Style::default().fg(theme.text_secondary),
                ))),
                chunks[5],
            );
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
                chunks[6],
            );
        }

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "Tab next field  \u{2190}/\u{2192} choose  ^L load word  ^S submit  Esc close",
                Style::default().fg(theme.text_muted),
            ))),
            chunks[7],
        );
    }
}

impl CorrectionDialog {
    #[allow(clippy::too_many_arguments)]
    fn render_choice(
        &self,
        frame: &mut Frame,
        area: Rect,
        theme: &Theme,
        label: &str,
        choices: &[String],
        index: usize,
        focused: bool,
    ) {
        let value = choices.get(index).map_or("-", String::as_str);
        let style = if focused {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("{label}: < {value} >"),
                style,
            ))),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn dialog() -> CorrectionDialog {
        CorrectionDialog::new(
            vec!["serif".to_string(), "serifItalic".to_string()],
            vec!["yi".to_string()],
        )
    }

    fn type_digits(dialog: &mut CorrectionDialog, state: &MappingState, digits: &str) {
        for c in digits.chars() {
            dialog.handle_input(key(KeyCode::Char(c)), state);
        }
    }

    #[test]
    fn test_load_requires_numeric_target() {
        let mut d = dialog();
        let state = MappingState::new();
        assert_eq!(d.handle_input(ctrl('l'), &state), None);
        assert_eq!(d.banner.as_ref().map(|b| b.kind), Some(BannerKind::Error));
    }

    #[test]
    fn test_load_emits_word_request() {
        let mut d = dialog();
        let state = MappingState::new();
        type_digits(&mut d, &state, "42");
        d.handle_input(key(KeyCode::Tab), &state);
        type_digits(&mut d, &state, "1700");
        assert_eq!(
            d.handle_input(ctrl('l'), &state),
            Some(CorrectionDialogEvent::WordRequested {
                doc_id: 42,
                word_offset: 1700,
            })
        );
        assert!(d.loading);
    }

    #[test]
    fn test_set_word_prefills_suggestions() {
        let mut d = dialog();
        d.set_word(
            &WordInfo {
                word: "אַרבעט".to_string(),
                word2: Some("ער".to_string()),
            },
            Some("http://example.com/img".to_string()),
        );
        assert_eq!(d.suggestion.value(), "אַרבעט");
        assert!(d.has_word2);
        assert_eq!(d.suggestion2.value(), "ער");
        assert_eq!(d.focus, CorrectionFocus::Suggestion);
    }

    #[test]
    fn test_submit_builds_correction() {
        let mut d = dialog();
        let state = MappingState::new();
        type_digits(&mut d, &state, "42");
        d.handle_input(key(KeyCode::Tab), &state);
        type_digits(&mut d, &state, "1700");
        d.set_word(
            &WordInfo {
                word: "ward".to_string(),
                word2: None,
            },
            None,
        );
        // Cycle the font choice once.
        d.handle_input(key(KeyCode::Tab), &state); // Font (no word2)
        d.handle_input(key(KeyCode::Right), &state);

        match d.handle_input(ctrl('s'), &state) {
            Some(CorrectionDialogEvent::Submitted(correction)) => {
                assert_eq!(correction.doc_id, 42);
                assert_eq!(correction.word_offset, 1700);
                assert_eq!(correction.suggestion, "ward");
                assert_eq!(correction.suggestion2, None);
                assert_eq!(correction.font_code, "serifItalic");
                assert_eq!(correction.language_code, "yi");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_submit_rejects_empty_suggestion() {
        let mut d = dialog();
        let state = MappingState::new();
        type_digits(&mut d, &state, "1");
        d.handle_input(key(KeyCode::Tab), &state);
        type_digits(&mut d, &state, "0");
        assert_eq!(d.handle_input(ctrl('s'), &state), None);
        assert_eq!(d.banner.as_ref().map(|b| b.kind), Some(BannerKind::Error));
    }

    #[test]
    fn test_suggestion2_skipped_without_second_word() {
        let mut d = dialog();
        d.focus = CorrectionFocus::Suggestion;
        d.cycle_focus(true);
        assert_eq!(d.focus, CorrectionFocus::Font);
    }

    #[test]
    fn test_esc_closes() {
        let mut d = dialog();
        let state = MappingState::new();
        assert_eq!(
            d.handle_input(key(KeyCode::Esc), &state),
            Some(CorrectionDialogEvent::Closed)
        );
    }
}
