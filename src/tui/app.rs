//! Application state and event loop

use std::sync::mpsc::{self, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    DefaultTerminal, Frame,
};
use tracing::{info, warn};

use crate::config::Config;
use crate::services::{Dashboard, FetchResult, HttpQuoteSource, JsonFileStore, QuoteSource};
use crate::types::{Mark, SortColumn};

use super::theme::Theme;
use super::widgets::{
    help::HelpPopup,
    quote_table::{QuoteTable, TableRow},
    search_bar::{Focus, SearchBar, SearchBarState},
    spinner::Spinner,
    stats::StatsHeader,
    tabs::TokenTabs,
};

/// Maximum content width (consistent across views)
const MAX_CONTENT_WIDTH: u16 = 120;

/// A fetch running on the background thread
struct PendingFetch {
    fragment: String,
    rx: mpsc::Receiver<FetchResult>,
}

/// Main application
pub struct App {
    dashboard: Dashboard,
    source: Arc<dyn QuoteSource>,
    theme: Theme,
    focus: Focus,
    fragment_input: String,
    selected_row: usize,
    show_help: bool,
    should_quit: bool,
    pending: Option<PendingFetch>,
    spinner_frame: usize,
}

impl App {
    /// Create a new app with the fragment input focused
    pub fn new(dashboard: Dashboard, source: Arc<dyn QuoteSource>, theme: Theme) -> Self {
        Self {
            dashboard,
            source,
            theme,
            focus: Focus::Search,
            fragment_input: String::new(),
            selected_row: 0,
            show_help: false,
            should_quit: false,
            pending: None,
            spinner_frame: 0,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Whether a fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                self.handle_key(key);
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.show_help = false;
            }
            return;
        }

        match self.focus {
            Focus::Search => self.handle_search_key(key.code),
            Focus::Threshold => self.handle_threshold_key(key.code),
            Focus::Table => self.handle_table_key(key.code),
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.start_search(),
            KeyCode::Esc => self.focus = Focus::Table,
            KeyCode::Tab => self.focus = Focus::Threshold,
            KeyCode::Backspace => {
                self.fragment_input.pop();
            }
            KeyCode::Char(c) => self.fragment_input.push(c),
            _ => {}
        }
    }

    fn handle_threshold_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter | KeyCode::Esc => self.focus = Focus::Table,
            KeyCode::Tab => self.focus = Focus::Search,
            KeyCode::Backspace => {
                self.dashboard.threshold_input_mut().pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || matches!(c, '.' | ',') => {
                self.dashboard.threshold_input_mut().push(c);
            }
            _ => {}
        }
    }

    fn handle_table_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('/') | KeyCode::Char('s') => self.focus = Focus::Search,
            KeyCode::Char('t') => self.focus = Focus::Threshold,
            KeyCode::Char('?') => self.show_help = !self.show_help,
            KeyCode::Tab => {
                self.dashboard.select_next();
                self.selected_row = 0;
            }
            KeyCode::BackTab => {
                self.dashboard.select_prev();
                self.selected_row = 0;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_row = self.selected_row.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = self.visible_row_count().saturating_sub(1);
                self.selected_row = (self.selected_row + 1).min(last);
            }
            KeyCode::Char('b') => self.toggle_selected(Mark::Bought),
            KeyCode::Char('a') => self.toggle_selected(Mark::OnSale),
            KeyCode::Char(c @ '1'..='5') => {
                if let Some(column) = SortColumn::from_number(c as u8 - b'0') {
                    self.dashboard.sort_by(column);
                }
            }
            KeyCode::Char('p') => {
                self.dashboard.toggle_hide_low_pop();
                self.clamp_selection();
            }
            KeyCode::Char('o') => self.dashboard.toggle_show_all_servers(),
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(id) = self.dashboard.active_id().map(String::from) {
                    self.dashboard.remove_token(&id);
                    self.selected_row = 0;
                }
            }
            _ => {}
        }
    }

    /// Start a background fetch for the typed fragment.
    /// Ignored while another fetch is pending or when the fragment is blank.
    pub fn start_search(&mut self) {
        if self.pending.is_some() || self.fragment_input.trim().is_empty() {
            return;
        }

        let fragment = self.fragment_input.clone();
        let source = Arc::clone(&self.source);
        let (tx, rx) = mpsc::channel();
        let query = fragment.clone();
        thread::spawn(move || {
            let result = source.fetch(&query);
            let _ = tx.send(result);
        });

        info!(fragment = %fragment, "search started");
        self.pending = Some(PendingFetch { fragment, rx });
        self.spinner_frame = 0;
    }

    /// Apply a finished fetch, if any (non-blocking). Returns true when one was applied.
    pub fn poll_fetch(&mut self) -> bool {
        let Some(pending) = &self.pending else {
            return false;
        };

        match pending.rx.try_recv() {
            Ok(result) => {
                let fragment = pending.fragment.clone();
                self.pending = None;
                self.dashboard.ingest(&fragment, result);
                self.fragment_input.clear();
                self.selected_row = 0;
                self.focus = Focus::Table;
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                warn!(fragment = %pending.fragment, "fetch worker exited without a result");
                self.pending = None;
                false
            }
        }
    }

    /// Update spinner animation
    pub fn tick(&mut self) {
        if self.pending.is_some() {
            self.spinner_frame = Spinner::next_frame(self.spinner_frame);
        }
    }

    fn visible_row_count(&self) -> usize {
        self.dashboard
            .active_token()
            .map(|t| self.dashboard.view(t).rows.len())
            .unwrap_or(0)
    }

    fn clamp_selection(&mut self) {
        let last = self.visible_row_count().saturating_sub(1);
        self.selected_row = self.selected_row.min(last);
    }

    /// Server name of the selected row in the current view
    fn selected_server(&self) -> Option<(String, String)> {
        let token = self.dashboard.active_token()?;
        let view = self.dashboard.view(token);
        let row = view.rows.get(self.selected_row)?;
        Some((token.id.clone(), row.row.server.clone()))
    }

    fn toggle_selected(&mut self, mark: Mark) {
        if let Some((token_id, server)) = self.selected_server() {
            self.dashboard.toggle_mark(&token_id, &server, mark);
        }
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Apply max width constraint and center the content
        let content_width = area.width.min(MAX_CONTENT_WIDTH);
        let x_offset = (area.width.saturating_sub(content_width)) / 2;
        let centered_area = Rect {
            x: area.x + x_offset,
            y: area.y,
            width: content_width,
            height: area.height,
        };

        let chunks = Layout::vertical([
            Constraint::Length(1), // Title
            Constraint::Length(2), // Search bar + filters
            Constraint::Length(1), // Separator
            Constraint::Length(1), // Token tabs
            Constraint::Length(1), // Separator
            Constraint::Length(2), // Stats header
            Constraint::Length(1), // Padding
            Constraint::Min(2),    // Table
            Constraint::Length(1), // Separator
            Constraint::Length(1), // Keybindings
        ])
        .split(centered_area);

        self.render_title(chunks[0], buf);

        SearchBar::new(
            SearchBarState {
                fragment: &self.fragment_input,
                threshold: self.dashboard.threshold_input(),
                focus: self.focus,
                loading: self.is_loading(),
                show_low_pop: !self.dashboard.hide_low_pop(),
                show_all_servers: self.dashboard.show_all_servers(),
            },
            self.theme,
        )
        .render(chunks[1], buf);

        self.render_separator(chunks[2], buf);
        self.render_separator(chunks[4], buf);
        self.render_separator(chunks[8], buf);

        if let Some(pending) = &self.pending {
            let body = Rect {
                height: chunks[7].y + chunks[7].height - chunks[3].y,
                ..chunks[3]
            };
            Spinner::new(self.spinner_frame, &pending.fragment).render(body, buf);
        } else {
            let names: Vec<&str> = self
                .dashboard
                .tokens()
                .iter()
                .map(|t| t.name.as_str())
                .collect();
            TokenTabs::new(names, self.dashboard.active_index(), self.theme)
                .render(chunks[3], buf);

            if let Some(token) = self.dashboard.active_token() {
                let view = self.dashboard.view(token);
                StatsHeader::new(&token.name, token.fetched_at, view.stats, self.theme)
                    .render(chunks[5], buf);

                let rows = view
                    .rows
                    .iter()
                    .map(|quote| TableRow {
                        quote,
                        flags: self.dashboard.flags(&token.id, &quote.row.server),
                    })
                    .collect();
                QuoteTable::new(rows, self.selected_row, self.dashboard.sort(), self.theme)
                    .render(chunks[7], buf);
            }
        }

        self.render_keybindings(chunks[9], buf);

        if self.show_help {
            let popup_area = HelpPopup::centered_area(area);
            HelpPopup::new(self.theme).render(popup_area, buf);
        }
    }
}

impl App {
    fn render_title(&self, area: Rect, buf: &mut Buffer) {
        let title = Line::from(vec![
            Span::styled(
                "Undermine Token Checker",
                Style::default()
                    .fg(self.theme.text())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "  token prices across servers",
                Style::default().fg(self.theme.muted()),
            ),
        ]);
        Paragraph::new(title)
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    fn render_separator(&self, area: Rect, buf: &mut Buffer) {
        let line = "─".repeat(area.width as usize);
        buf.set_string(
            area.x,
            area.y,
            &line,
            Style::default().fg(self.theme.muted()),
        );
    }

    fn render_keybindings(&self, area: Rect, buf: &mut Buffer) {
        let key = Style::default().fg(self.theme.accent());
        let desc = Style::default().fg(self.theme.muted());
        let spans = match self.focus {
            Focus::Search => vec![
                Span::styled("Enter", key),
                Span::styled(": Search", desc),
                Span::raw("  "),
                Span::styled("Tab", key),
                Span::styled(": Threshold", desc),
                Span::raw("  "),
                Span::styled("Esc", key),
                Span::styled(": Table", desc),
            ],
            Focus::Threshold => vec![
                Span::styled("Enter/Esc", key),
                Span::styled(": Done", desc),
                Span::raw("  "),
                Span::styled("Tab", key),
                Span::styled(": Fragment", desc),
            ],
            Focus::Table => vec![
                Span::styled("q", key),
                Span::styled(": Quit", desc),
                Span::raw("  "),
                Span::styled("/", key),
                Span::styled(": Search", desc),
                Span::raw("  "),
                Span::styled("b/a", key),
                Span::styled(": Mark", desc),
                Span::raw("  "),
                Span::styled("1-5", key),
                Span::styled(": Sort", desc),
                Span::raw("  "),
                Span::styled("?", key),
                Span::styled(": Help", desc),
            ],
        };
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

/// Run the TUI application
pub fn run(config: &Config) -> anyhow::Result<()> {
    // Detect before raw mode
    let theme = Theme::detect();

    let store = JsonFileStore::new(&config.data_dir);
    let source = HttpQuoteSource::new(&config.endpoint, config.timeout)?;
    let dashboard = Dashboard::new(Box::new(store), config.threshold);
    let mut app = App::new(dashboard, Arc::new(source), theme);
    info!(endpoint = %config.endpoint, "tui started");

    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, &mut app);
    ratatui::restore();
    result
}

fn run_app(terminal: &mut DefaultTerminal, app: &mut App) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        // Check for fetch completion (non-blocking)
        app.poll_fetch();

        // Poll for events with 100ms timeout for spinner animation
        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            app.handle_event(ev);
        } else {
            app.tick();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::checkbox_store::MemoryStore;
    use crate::services::servers::REFERENCE_SERVERS;
    use crate::types::{RawRow, SortDirection};
    use std::time::Instant;

    struct FakeSource {
        result: FetchResult,
        delay: Duration,
    }

    impl QuoteSource for FakeSource {
        fn fetch(&self, _fragment: &str) -> FetchResult {
            thread::sleep(self.delay);
            self.result.clone()
        }
    }

    fn make_app(result: FetchResult, delay: Duration) -> App {
        let dashboard = Dashboard::new(Box::new(MemoryStore::default()), 20.0);
        App::new(
            dashboard,
            Arc::new(FakeSource { result, delay }),
            Theme::Dark,
        )
    }

    fn sample_result() -> FetchResult {
        FetchResult {
            item_name: Some("Mana Token".to_string()),
            rows: vec![
                RawRow::new("Twisting Nether", "100", "1"),
                RawRow::new("Tarren Mill", "50", "2"),
                RawRow::new("Kazzak", "150", "3"),
            ],
        }
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_event(key(KeyCode::Char(c)));
        }
    }

    fn wait_for_fetch(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if app.poll_fetch() {
                return;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("fetch did not complete");
    }

    /// App with one fetched token and the table focused
    fn ready_app() -> App {
        let mut app = make_app(sample_result(), Duration::ZERO);
        type_text(&mut app, "#eu-draenor/1");
        app.handle_event(key(KeyCode::Enter));
        wait_for_fetch(&mut app);
        app
    }

    #[test]
    fn test_app_initial_state() {
        let app = make_app(FetchResult::empty(), Duration::ZERO);
        assert_eq!(app.focus, Focus::Search);
        assert!(!app.is_loading());
        assert!(!app.should_quit());
    }

    #[test]
    fn test_ctrl_c_quits_from_any_focus() {
        let mut app = make_app(FetchResult::empty(), Duration::ZERO);
        app.handle_event(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(app.should_quit());
    }

    #[test]
    fn test_q_types_into_search_but_quits_table() {
        let mut app = make_app(FetchResult::empty(), Duration::ZERO);
        app.handle_event(key(KeyCode::Char('q')));
        assert!(!app.should_quit());
        assert_eq!(app.fragment_input, "q");

        app.handle_event(key(KeyCode::Esc));
        assert_eq!(app.focus, Focus::Table);
        app.handle_event(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[test]
    fn test_search_flow_adds_token() {
        let app = ready_app();

        assert!(!app.is_loading());
        assert_eq!(app.focus, Focus::Table);
        assert!(app.fragment_input.is_empty());
        assert_eq!(app.dashboard().active_id(), Some("Mana Token"));
        assert_eq!(
            app.dashboard().active_token().unwrap().rows.len(),
            REFERENCE_SERVERS.len()
        );
    }

    #[test]
    fn test_blank_fragment_does_not_search() {
        let mut app = make_app(sample_result(), Duration::ZERO);
        type_text(&mut app, "   ");
        app.handle_event(key(KeyCode::Enter));
        assert!(!app.is_loading());
    }

    #[test]
    fn test_search_disabled_while_loading() {
        let mut app = make_app(sample_result(), Duration::from_millis(100));
        type_text(&mut app, "first");
        app.start_search();
        assert!(app.is_loading());

        app.fragment_input = "second".to_string();
        app.start_search();
        assert_eq!(app.pending.as_ref().unwrap().fragment, "first");

        wait_for_fetch(&mut app);
        assert_eq!(app.dashboard().tokens().len(), 1);
    }

    #[test]
    fn test_backspace_edits_fragment() {
        let mut app = make_app(FetchResult::empty(), Duration::ZERO);
        type_text(&mut app, "abc");
        app.handle_event(key(KeyCode::Backspace));
        assert_eq!(app.fragment_input, "ab");
    }

    #[test]
    fn test_threshold_input_accepts_numbers_only() {
        let mut app = make_app(FetchResult::empty(), Duration::ZERO);
        app.handle_event(key(KeyCode::Esc));
        app.handle_event(key(KeyCode::Char('t')));
        assert_eq!(app.focus, Focus::Threshold);

        app.handle_event(key(KeyCode::Backspace));
        app.handle_event(key(KeyCode::Backspace));
        type_text(&mut app, "-1x5");
        assert_eq!(app.dashboard().threshold_input(), "15");
        assert_eq!(app.dashboard().threshold(), 15.0);

        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.focus, Focus::Table);
    }

    #[test]
    fn test_row_navigation_clamps() {
        let mut app = ready_app();
        app.handle_event(key(KeyCode::Up));
        assert_eq!(app.selected_row, 0);

        for _ in 0..50 {
            app.handle_event(key(KeyCode::Char('j')));
        }
        assert_eq!(app.selected_row, REFERENCE_SERVERS.len() - 1);

        // Hiding low-pop servers shrinks the table
        app.handle_event(key(KeyCode::Char('p')));
        assert_eq!(app.selected_row, REFERENCE_SERVERS.len() - 8 - 1);
    }

    #[test]
    fn test_toggle_marks_on_selected_row() {
        let mut app = ready_app();
        app.handle_event(key(KeyCode::Down)); // Tarren Mill
        app.handle_event(key(KeyCode::Char('b')));
        app.handle_event(key(KeyCode::Char('a')));

        let flags = app.dashboard().flags("Mana Token", "Tarren Mill");
        assert!(flags.bought);
        assert!(flags.on_sale);
        assert!(app.dashboard().checkboxes().contains_key("Mana Token_Tarren Mill"));

        app.handle_event(key(KeyCode::Char('b')));
        assert!(!app.dashboard().flags("Mana Token", "Tarren Mill").bought);
    }

    #[test]
    fn test_marks_follow_sorted_order() {
        let mut app = ready_app();
        // Sort by gold ascending: unpriced rows first, then 50, 100, 150
        app.handle_event(key(KeyCode::Char('3')));
        let last = REFERENCE_SERVERS.len() - 1;
        for _ in 0..last {
            app.handle_event(key(KeyCode::Down));
        }
        app.handle_event(key(KeyCode::Char('b')));
        assert!(app.dashboard().flags("Mana Token", "Kazzak").bought);
    }

    #[test]
    fn test_number_keys_sort_and_flip() {
        let mut app = ready_app();
        app.handle_event(key(KeyCode::Char('5')));
        let sort = app.dashboard().sort().unwrap();
        assert_eq!(sort.column, SortColumn::Profit);
        assert_eq!(sort.direction, SortDirection::Asc);

        app.handle_event(key(KeyCode::Char('5')));
        assert_eq!(app.dashboard().sort().unwrap().direction, SortDirection::Desc);
    }

    #[test]
    fn test_remove_token_key() {
        let mut app = ready_app();
        app.handle_event(key(KeyCode::Char('x')));
        assert!(app.dashboard().tokens().is_empty());
        assert_eq!(app.dashboard().active_id(), None);
    }

    #[test]
    fn test_help_toggle_swallows_keys() {
        let mut app = ready_app();
        app.handle_event(key(KeyCode::Char('?')));
        assert!(app.show_help);

        // While help is open, table keys are ignored
        app.handle_event(key(KeyCode::Char('x')));
        assert_eq!(app.dashboard().tokens().len(), 1);

        app.handle_event(key(KeyCode::Esc));
        assert!(!app.show_help);
        assert!(!app.should_quit());
    }

    #[test]
    fn test_tick_advances_spinner_only_while_loading() {
        let mut app = make_app(sample_result(), Duration::from_millis(50));
        app.tick();
        assert_eq!(app.spinner_frame, 0);

        type_text(&mut app, "frag");
        app.start_search();
        app.tick();
        assert_eq!(app.spinner_frame, 1);
        wait_for_fetch(&mut app);
    }

    #[test]
    fn test_render_ready_app() {
        let app = ready_app();
        let area = Rect::new(0, 0, 120, 40);
        let mut buf = Buffer::empty(area);
        (&app).render(area, &mut buf);

        let screen: String = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");

        assert!(screen.contains("Undermine Token Checker"));
        assert!(screen.contains("[Mana Token]"));
        assert!(screen.contains("Twisting Nether"));
        assert!(screen.contains("200.00%"));
    }
}
