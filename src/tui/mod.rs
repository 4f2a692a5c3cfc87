//! Terminal user interface.
//!
//! This module contains the main event loop, the application state, and the
//! UI components. The loop polls pending backend fetches between input
//! events, so the transliterator keeps working (initially disabled, with an
//! empty mapping) until the first `/keyboard` fetch resolves.

pub mod component;
pub mod correction_dialog;
pub mod mapping_editor;
pub mod search_form;
pub mod text_field;
pub mod theme;

use std::io;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tracing::debug;

use crate::client::{background, SearchClient};
use crate::config::Config;
use crate::constants::APP_NAME;
use crate::models::{KeyboardUpdate, MappingState, WordInfo};

// Re-export TUI components
pub use component::{Banner, BannerKind, Component, ContextualComponent};
pub use correction_dialog::{CorrectionDialog, CorrectionDialogEvent};
pub use mapping_editor::{MappingEditor, MappingEditorEvent};
pub use search_form::{SearchForm, SearchFormEvent};
pub use text_field::TextField;
pub use theme::Theme;

/// A resolved word fetch, tagged with its target so the image URL can be
/// rebuilt for display.
struct WordFetch {
    doc_id: i64,
    word_offset: u64,
    result: Result<WordInfo>,
}

/// Top-level application state.
pub struct App {
    config: Config,
    client: SearchClient,
    theme: Theme,
    /// Current transliteration state; replaced wholesale by reloads.
    mapping_state: MappingState,
    search_form: SearchForm,
    mapping_editor: Option<MappingEditor>,
    correction_dialog: Option<CorrectionDialog>,
    status: String,
    show_help: bool,
    should_quit: bool,
    // Pending backend calls (one-shot; last write wins on races)
    mapping_rx: Option<Receiver<Result<MappingState>>>,
    editor_reload_rx: Option<Receiver<Result<MappingState>>>,
    suggestions_rx: Option<Receiver<Result<Vec<String>>>>,
    update_rx: Option<Receiver<Result<()>>>,
    update_message: String,
    word_rx: Option<Receiver<WordFetch>>,
    suggest_rx: Option<Receiver<Result<()>>>,
}

impl App {
    /// Creates the application state and starts the initial mapping fetch.
    pub fn new(config: Config) -> Result<Self> {
        let client = SearchClient::new(&config.backend)?;
        let theme = Theme::from_mode(config.ui.theme_mode);
        let show_help = config.ui.show_help_on_startup;
        let status = if Config::exists() {
            String::new()
        } else {
            format!(
                "No config file found; using default backend {}",
                config.backend.site_url
            )
        };

        let mut app = Self {
            config,
            client,
            theme,
            mapping_state: MappingState::new(),
            search_form: SearchForm::new(),
            mapping_editor: None,
            correction_dialog: None,
            status,
            show_help,
            should_quit: false,
            mapping_rx: None,
            editor_reload_rx: None,
            suggestions_rx: None,
            update_rx: None,
            update_message: String::new(),
            word_rx: None,
            suggest_rx: None,
        };
        app.reload_mapping();
        Ok(app)
    }

    /// Whether the application wants to exit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Current transliteration state (for tests and the status line).
    #[must_use]
    pub fn mapping_state(&self) -> &MappingState {
        &self.mapping_state
    }

    /// Starts a background reload of the mapping state. Until it resolves,
    /// the previous state stays in effect.
    pub fn reload_mapping(&mut self) {
        let client = self.client.clone();
        self.mapping_rx = Some(background::spawn_fetch(move || client.keyboard()));
    }

    fn open_mapping_editor(&mut self) {
        self.mapping_editor = Some(MappingEditor::new());
        // The editor always shows a fresh copy of what the backend has.
        let client = self.client.clone();
        self.editor_reload_rx = Some(background::spawn_fetch(move || client.keyboard()));
    }

    fn open_correction_dialog(&mut self) {
        self.correction_dialog = Some(CorrectionDialog::new(
            self.config.correction.fonts.clone(),
            self.config.correction.languages.clone(),
        ));
    }

    /// Handles a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            self.show_help = false;
            return;
        }

        if self.mapping_editor.is_some() {
            let event = self
                .mapping_editor
                .as_mut()
                .and_then(|editor| editor.handle_input(key));
            if let Some(event) = event {
                self.on_editor_event(event);
            }
            return;
        }

        if self.correction_dialog.is_some() {
            let state = self.mapping_state.clone();
            let event = self
                .correction_dialog
                .as_mut()
                .and_then(|dialog| dialog.handle_input(key, &state));
            if let Some(event) = event {
                self.on_correction_event(event);
            }
            return;
        }

        match key.code {
            KeyCode::F(1) => {
                self.show_help = true;
            }
            KeyCode::F(2) => {
                self.open_mapping_editor();
            }
            KeyCode::F(3) => {
                self.open_correction_dialog();
            }
            KeyCode::F(5) => {
                self.status = "Reloading keyboard mapping...".to_string();
                self.reload_mapping();
            }
            KeyCode::Esc => {
                self.should_quit = true;
            }
            _ => {
                let state = self.mapping_state.clone();
                let event = self.search_form.handle_input(key, &state);
                if let Some(event) = event {
                    self.on_search_event(event);
                }
            }
        }
    }

    fn on_search_event(&mut self, event: SearchFormEvent) {
        match event {
            SearchFormEvent::SuggestionsRequested(prefix) => {
                let client = self.client.clone();
                self.suggestions_rx =
                    Some(background::spawn_fetch(move || {
                        client.author_suggestions(&prefix)
                    }));
            }
            SearchFormEvent::SearchSubmitted {
                query,
                title,
                authors,
            } => {
                match self.client.search_page_url(&query, &title, &authors) {
                    Ok(url) => self.status = format!("Search: {url}"),
                    Err(e) => self.status = format!("Failed to build search URL: {e}"),
                }
            }
        }
    }

    fn on_editor_event(&mut self, event: MappingEditorEvent) {
        match event {
            MappingEditorEvent::Submitted(update) => {
                self.spawn_keyboard_update(update, "Mapping saved");
            }
            MappingEditorEvent::ResetRequested => {
                self.spawn_keyboard_update(KeyboardUpdate::reset(), "Mapping reset to default");
            }
            MappingEditorEvent::Closed => {
                self.mapping_editor = None;
            }
        }
    }

    fn spawn_keyboard_update(&mut self, update: KeyboardUpdate, message: &str) {
        let client = self.client.clone();
        self.update_message = message.to_string();
        self.update_rx = Some(background::spawn_fetch(move || {
            client.update_keyboard(&update)
        }));
    }

    fn on_correction_event(&mut self, event: CorrectionDialogEvent) {
        match event {
            CorrectionDialogEvent::WordRequested {
                doc_id,
                word_offset,
            } => {
                let client = self.client.clone();
                self.word_rx = Some(background::spawn_fetch(move || WordFetch {
                    doc_id,
                    word_offset,
                    result: client.word(doc_id, word_offset),
                }));
            }
            CorrectionDialogEvent::Submitted(correction) => {
                let client = self.client.clone();
                self.suggest_rx =
                    Some(background::spawn_fetch(move || client.suggest(&correction)));
            }
            CorrectionDialogEvent::Closed => {
                self.correction_dialog = None;
            }
        }
    }

    /// Applies results of resolved background calls.
    pub fn poll_fetches(&mut self) {
        if let Some(result) = background::poll(&mut self.mapping_rx) {
            match result {
                // The whole state is replaced at once; keystrokes never see
                // a partially loaded mapping.
                Ok(state) => {
                    self.status = if state.enabled {
                        format!("Keyboard mapping active ({} entries)", state.mapping.len())
                    } else {
                        "Keyboard mapping disabled".to_string()
                    };
                    self.mapping_state = state;
                }
                // A failed fetch leaves the previous state in effect.
                Err(e) => debug!("keyboard mapping fetch failed: {e:#}"),
            }
        }

        if let Some(result) = background::poll(&mut self.editor_reload_rx) {
            if let Some(editor) = self.mapping_editor.as_mut() {
                match result {
                    Ok(state) => editor.populate(&state),
                    Err(e) => {
                        editor.set_banner(Banner::error(format!("Failed to load mapping: {e}")));
                    }
                }
            }
        }

        if let Some(result) = background::poll(&mut self.suggestions_rx) {
            match result {
                Ok(suggestions) => self.search_form.set_suggestions(suggestions),
                Err(e) => debug!("author suggestion fetch failed: {e:#}"),
            }
        }

        if let Some(result) = background::poll(&mut self.update_rx) {
            match result {
                Ok(()) => {
                    let message = self.update_message.clone();
                    if let Some(editor) = self.mapping_editor.as_mut() {
                        editor.set_banner(Banner::success(message));
                    }
                    // Pick up the saved mapping for subsequent keystrokes.
                    self.reload_mapping();
                }
                Err(e) => {
                    if let Some(editor) = self.mapping_editor.as_mut() {
                        editor
                            .set_banner(Banner::error(format!("Failed to update mapping: {e}")));
                    }
                }
            }
        }

        if let Some(fetch) = background::poll(&mut self.word_rx) {
            let image_url = self
                .client
                .word_image_url(fetch.doc_id, fetch.word_offset)
                .ok();
            if let Some(dialog) = self.correction_dialog.as_mut() {
                match fetch.result {
                    Ok(info) => dialog.set_word(&info, image_url),
                    Err(e) => {
                        dialog.set_banner(Banner::error(format!("Failed to load word: {e}")));
                    }
                }
            }
        }

        if let Some(result) = background::poll(&mut self.suggest_rx) {
            if let Some(dialog) = self.correction_dialog.as_mut() {
                match result {
                    Ok(()) => dialog.set_banner(Banner::success("Correction submitted")),
                    Err(e) => {
                        dialog
                            .set_banner(Banner::error(format!("Failed to submit correction: {e}")));
                    }
                }
            }
        }
    }

    /// Renders the whole screen.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Min(10),   // Search form
                Constraint::Length(1), // Status
                Constraint::Length(1), // Key hints
            ])
            .split(area);

        let mapping_summary = if self.mapping_state.enabled {
            format!("mapping on ({})", self.mapping_state.mapping.len())
        } else {
            "mapping off".to_string()
        };
        let title = Line::from(vec![
            Span::styled(
                format!("{APP_NAME} v{}", env!("CARGO_PKG_VERSION")),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(mapping_summary, Style::default().fg(self.theme.text_muted)),
        ]);
        frame.render_widget(Paragraph::new(title), chunks[0]);

        self.search_form
            .render(frame, chunks[1], &self.theme, &self.mapping_state);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                self.status.clone(),
                Style::default().fg(self.theme.text_secondary),
            ))),
            chunks[2],
        );

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "F1 help  F2 keyboard  F3 fix word  F5 reload mapping  Esc quit",
                Style::default().fg(self.theme.text_muted),
            ))),
            chunks[3],
        );

        if let Some(editor) = &self.mapping_editor {
            editor.render(frame, area, &self.theme);
        }
        if let Some(dialog) = &self.correction_dialog {
            dialog.render(frame, area, &self.theme, &self.mapping_state);
        }
        if self.show_help {
            self.render_help(frame, area);
        }
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let dialog_area = centered_rect(60, 60, area);
        frame.render_widget(Clear, dialog_area);

        let lines = vec![
            Line::from("Type in any text field; mapped characters are"),
            Line::from("replaced with their configured script on the fly."),
            Line::from(""),
            Line::from("Tab / Shift-Tab   move between fields"),
            Line::from("Enter             submit search (add author in the author field)"),
            Line::from("F2                edit the keyboard mapping"),
            Line::from("F3                fix an OCR'd word"),
            Line::from("F5                reload the keyboard mapping"),
            Line::from("Esc               quit"),
            Line::from(""),
            Line::from("Press any key to close this help."),
        ];

        let paragraph = Paragraph::new(lines)
            .style(Style::default().fg(self.theme.text))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {APP_NAME} "))
                    .border_style(Style::default().fg(self.theme.accent)),
            );
        frame.render_widget(paragraph, dialog_area);
    }
}

/// Sets up the terminal for TUI rendering.
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore terminal to normal state
pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main event loop
pub fn run(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    while !app.should_quit() {
        app.poll_fetches();

        terminal
            .draw(|frame| app.render(frame))
            .context("Failed to draw frame")?;

        if event::poll(Duration::from_millis(100)).context("Failed to poll events")? {
            if let Event::Key(key) = event::read().context("Failed to read event")? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }
    Ok(())
}

/// Loads the configuration and runs the TUI until the user quits.
pub fn launch() -> Result<()> {
    let config = Config::load().unwrap_or_default();
    let mut app = App::new(config)?;

    let mut terminal = setup_terminal()?;
    let result = run(&mut app, &mut terminal);
    restore_terminal(terminal)?;

    result
}

/// Helper to create a centered rectangle
#[must_use]
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
