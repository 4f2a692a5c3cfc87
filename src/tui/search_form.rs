//! Search form: query, title, and author fields with typeahead.
//!
//! All three fields route keystrokes through the transliterator. The author
//! field behaves like the original typeahead: suggestions are requested from
//! the first character on, Up/Down walks the suggestion list, and Enter adds
//! the highlighted suggestion (or the raw text) to the author filter rather
//! than submitting the search.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::constants::TYPEAHEAD_MIN_PREFIX;
use crate::models::{AuthorFilter, MappingState};
use crate::tui::component::ContextualComponent;
use crate::tui::text_field::TextField;
use crate::tui::theme::Theme;

/// Which part of the form has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchFocus {
    Query,
    Title,
    Author,
    AuthorList,
}

/// Events emitted by the search form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFormEvent {
    /// The author prefix changed; the parent should fetch suggestions.
    SuggestionsRequested(String),
    /// The user submitted the search.
    SearchSubmitted {
        /// Free-text query.
        query: String,
        /// Title filter.
        title: String,
        /// Pipe-joined author filter.
        authors: String,
    },
}

/// The main search form.
#[derive(Debug, Clone)]
pub struct SearchForm {
    query: TextField,
    title: TextField,
    author: TextField,
    authors: AuthorFilter,
    suggestions: Vec<String>,
    selected_suggestion: Option<usize>,
    selected_author: usize,
    focus: SearchFocus,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchForm {
    /// Creates an empty search form with focus on the query field.
    #[must_use]
    pub fn new() -> Self {
        Self {
            query: TextField::new(),
            title: TextField::new(),
            author: TextField::new(),
            authors: AuthorFilter::new(),
            suggestions: Vec::new(),
            selected_suggestion: None,
            selected_author: 0,
            focus: SearchFocus::Query,
        }
    }

    /// Current author filter.
    #[must_use]
    pub fn authors(&self) -> &AuthorFilter {
        &self.authors
    }

    /// Current query field value.
    #[must_use]
    pub fn query_value(&self) -> &str {
        self.query.value()
    }

    /// Replaces the suggestion list (latest fetch wins).
    pub fn set_suggestions(&mut self, suggestions: Vec<String>) {
        self.selected_suggestion = None;
        self.suggestions = suggestions;
    }

    fn cycle_focus(&mut self, forward: bool) {
        let order = [
            SearchFocus::Query,
            SearchFocus::Title,
            SearchFocus::Author,
            SearchFocus::AuthorList,
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
            // The author list is only reachable when it has entries.
            if order[index] != SearchFocus::AuthorList || !self.authors.is_empty() {
                break;
            }
        }
        self.focus = order[index];
        self.selected_author = 0;
    }

    fn add_author(&mut self) {
        let author = match self.selected_suggestion {
            Some(i) => self.suggestions.get(i).cloned().unwrap_or_default(),
            None => self.author.value().to_string(),
        };
        self.authors.add(&author);
        self.author.clear();
        self.set_suggestions(Vec::new());
    }

    fn move_suggestion(&mut self, down: bool) {
        if self.suggestions.is_empty() {
            return;
        }
        let last = self.suggestions.len() - 1;
        self.selected_suggestion = Some(match (self.selected_suggestion, down) {
            (None, true) => 0,
            (None, false) => last,
            (Some(i), true) => {
                if i >= last {
                    0
                } else {
                    i + 1
                }
            }
            (Some(i), false) => {
                if i == 0 {
                    last
                } else {
                    i - 1
                }
            }
        });
    }

    fn submit_event(&self) -> SearchFormEvent {
        SearchFormEvent::SearchSubmitted {
            query: self.query.value().to_string(),
            title: self.title.value().to_string(),
            authors: self.authors.as_query(),
        }
    }

    fn handle_author_key(&mut self, key: KeyEvent, state: &MappingState) -> Option<SearchFormEvent> {
        match key.code {
            KeyCode::Enter => {
                // Enter in the author field adds the author instead of
                // submitting the search.
                self.add_author();
                None
            }
            KeyCode::Down => {
                self.move_suggestion(true);
                None
            }
            KeyCode::Up => {
                self.move_suggestion(false);
                None
            }
            _ => {
                let before = self.author.value().to_string();
                if self.author.handle_key(key, state) {
                    let value = self.author.value();
                    if value != before {
                        if value.chars().count() >= TYPEAHEAD_MIN_PREFIX {
                            return Some(SearchFormEvent::SuggestionsRequested(value.to_string()));
                        }
                        self.set_suggestions(Vec::new());
                    }
                }
                None
            }
        }
    }

    fn handle_author_list_key(&mut self, key: KeyEvent) -> Option<SearchFormEvent> {
        match key.code {
            KeyCode::Up => {
                self.selected_author = self.selected_author.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_author + 1 < self.authors.len() {
                    self.selected_author += 1;
                }
            }
            KeyCode::Backspace | KeyCode::Delete => {
                self.authors.remove_at(self.selected_author);
                if self.authors.is_empty() {
                    self.focus = SearchFocus::Author;
                } else if self.selected_author >= self.authors.len() {
                    self.selected_author = self.authors.len() - 1;
                }
            }
            KeyCode::Enter => return Some(self.submit_event()),
            _ => {}
        }
        None
    }
}

impl ContextualComponent for SearchForm {
    type Context = MappingState;
    type Event = SearchFormEvent;

    fn handle_input(&mut self, key: KeyEvent, context: &Self::Context) -> Option<Self::Event> {
        match key.code {
            KeyCode::Tab => {
                self.cycle_focus(true);
                None
            }
            KeyCode::BackTab => {
                self.cycle_focus(false);
                None
            }
            _ => match self.focus {
                SearchFocus::Query => match key.code {
                    KeyCode::Enter => Some(self.submit_event()),
                    _ => {
                        self.query.handle_key(key, context);
                        None
                    }
                },
                SearchFocus::Title => match key.code {
                    KeyCode::Enter => Some(self.submit_event()),
                    _ => {
                        self.title.handle_key(key, context);
                        None
                    }
                },
                SearchFocus::Author => self.handle_author_key(key, context),
                SearchFocus::AuthorList => self.handle_author_list_key(key),
            },
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme, _context: &Self::Context) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Query
                Constraint::Length(3), // Title
                Constraint::Length(3), // Author
                Constraint::Min(3),    // Suggestions / author list
            ])
            .split(area);

        self.query
            .render(frame, chunks[0], theme, "Query", self.focus == SearchFocus::Query);
        self.title
            .render(frame, chunks[1], theme, "Title", self.focus == SearchFocus::Title);
        self.author.render(
            frame,
            chunks[2],
            theme,
            "Author",
            self.focus == SearchFocus::Author,
        );

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[3]);

        self.render_suggestions(frame, bottom[0], theme);
        self.render_author_list(frame, bottom[1], theme);
    }
}

impl SearchForm {
    fn render_suggestions(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let lines: Vec<Line> = if self.suggestions.is_empty() {
            vec![Line::from(Span::styled(
                "(type in the author field to search)",
                Style::default().fg(theme.text_muted),
            ))]
        } else {
            self.suggestions
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let style = if self.selected_suggestion == Some(i) {
                        Style::default()
                            .fg(theme.accent)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(theme.text)
                    };
                    Line::from(Span::styled(s.clone(), style))
                })
                .collect()
        };

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Suggestions ")
                .border_style(Style::default().fg(theme.text_muted)),
        );
        frame.render_widget(paragraph, area);
    }

    fn render_author_list(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let focused = self.focus == SearchFocus::AuthorList;
        let lines: Vec<Line> = if self.authors.is_empty() {
            vec![Line::from(Span::styled(
                "(no authors selected)",
                Style::default().fg(theme.text_muted),
            ))]
        } else {
            self.authors
                .iter()
                .enumerate()
                .map(|(i, a)| {
                    let style = if focused && i == self.selected_author {
                        Style::default().fg(theme.text).bg(theme.highlight_bg)
                    } else {
                        Style::default().fg(theme.text)
                    };
                    Line::from(Span::styled(a.to_string(), style))
                })
                .collect()
        };

        let border_style = if focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text_muted)
        };
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Authors ")
                .border_style(border_style),
        );
        frame.render_widget(paragraph, area);
    }
}
