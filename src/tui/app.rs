use crate::catalog::{AppId, AppRecord};
use crate::clipboard::{self, Clipboard};
use crate::session::{Fetcher, Session};
use crate::source::AppSource;
use crate::tui::search::SearchState;
use crate::tui::table::TableState;
use crate::tui::ui;
use crate::AppConfig;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::Stdout;
use std::sync::Arc;
use std::time::Instant;

pub struct App {
    pub session: Session,
    fetcher: Fetcher,

    // Sub-states
    pub search: SearchState,
    pub table: TableState,

    pub status_message: String,
    pub source_label: String,
    copied: Option<(AppId, Instant)>,
    clipboard: Clipboard,
    config: AppConfig,

    // Quit flag
    pub should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig, source: Arc<dyn AppSource>) -> Self {
        let source_label = source.describe();
        let mut app = Self {
            session: Session::new(config.filter_mode),
            fetcher: Fetcher::new(source),
            search: SearchState::default(),
            table: TableState::default(),
            status_message: "Ready".to_string(),
            source_label,
            copied: None,
            clipboard: Clipboard::default(),
            config,
            should_quit: false,
        };
        app.reload();
        app
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> crate::Result<()> {
        let tick_rate = self.config.tick_rate;
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            if last_tick.elapsed() >= tick_rate {
                self.tick();
                last_tick = Instant::now();
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    /// Work done once per tick: collect fetch results, apply the query
    pub fn tick(&mut self) {
        self.process_messages();
        if self.search.needs_search {
            self.perform_search();
            self.search.needs_search = false;
        }
    }

    /// Manual retry; the only recovery from the error state
    pub fn reload(&mut self) {
        tracing::info!(source = %self.source_label, mode = ?self.session.mode(), "loading catalog");
        self.status_message = format!("Loading from {}", self.source_label);
        let requests = self.session.reload();
        self.fetcher.submit_all(requests);
    }

    fn process_messages(&mut self) {
        let mut changed = false;
        for response in self.fetcher.drain() {
            changed |= self.session.apply(response);
        }
        if !changed {
            return;
        }

        if let Some(reason) = self.session.error() {
            self.status_message = format!("Error: {}", reason);
        } else if !self.session.is_loading() {
            self.status_message = format!("{} apps from {}", self.session.total_count(), self.source_label);
        }
        self.table.clamp(self.session.filtered_count());
    }

    fn perform_search(&mut self) {
        if let Some(request) = self.session.set_query(self.search.query.clone()) {
            self.fetcher.submit(request);
        }
        self.table.reset(self.session.filtered_count());
    }

    pub fn selected_record(&self) -> Option<AppRecord> {
        let index = self.table.selected?;
        self.session.view().get(index).map(|r| (*r).clone())
    }

    /// Whether the card for `id` should still show "Copied!"
    pub fn is_copied(&self, id: &AppId) -> bool {
        match &self.copied {
            Some((copied_id, at)) => copied_id == id && at.elapsed() < self.config.copy_feedback,
            None => false,
        }
    }

    fn copy_selected(&mut self) {
        let Some(record) = self.selected_record() else {
            return;
        };
        match self.clipboard.copy_to_clipboard(&record.api) {
            Ok(backend) => {
                tracing::info!(app = %record.name, backend, "copied api url");
                self.status_message = format!("Copied {}", record.api);
                self.copied = Some((record.id, Instant::now()));
            }
            Err(_) => {
                // Already logged; the card just never shows "Copied!"
                self.copied = None;
            }
        }
    }

    fn open_selected(&mut self) {
        if let Some(record) = self.selected_record() {
            if clipboard::open_url(&record.api).is_ok() {
                self.status_message = format!("Opened {}", record.api);
            }
        }
    }

    fn clear_search(&mut self) {
        if self.search.clear() {
            self.search.focused = true;
        }
    }

    // --- Key handling ---

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Global keys
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.should_quit = true;
                return;
            }
            KeyCode::Esc => {
                if !self.search.query.is_empty() {
                    self.clear_search();
                } else if self.search.focused {
                    self.search.focused = false;
                } else {
                    self.should_quit = true;
                }
                return;
            }
            KeyCode::F(5) => {
                self.reload();
                return;
            }
            _ => {}
        }

        if self.search.focused {
            self.handle_search_key(key);
        } else {
            self.handle_table_key(key);
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.insert_char(c)
            }
            KeyCode::Backspace => self.search.backspace(),
            KeyCode::Delete => self.search.delete(),
            KeyCode::Left => self.search.move_left(),
            KeyCode::Right => self.search.move_right(),
            KeyCode::Home => self.search.home(),
            KeyCode::End => self.search.end(),
            KeyCode::Tab | KeyCode::Down | KeyCode::Enter => {
                self.search.focused = false;
            }
            _ => {}
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) {
        let total = self.session.filtered_count();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.table.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.table.select_next(total),
            KeyCode::PageUp => self.table.page_up(),
            KeyCode::PageDown => self.table.page_down(total),
            KeyCode::Home => self.table.select_first(total),
            KeyCode::End => self.table.select_last(total),

            KeyCode::Enter | KeyCode::Char('c') => self.copy_selected(),
            KeyCode::Char('o') => self.open_selected(),

            KeyCode::Tab | KeyCode::BackTab | KeyCode::Char('/') => {
                self.search.focused = true;
            }

            // Any other printable char focuses search and types it
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.focused = true;
                self.search.push_char(c);
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::FilterMode;
    use crate::source::StaticSource;
    use std::time::Duration;

    fn catalog() -> Vec<AppRecord> {
        vec![
            AppRecord::new(1, "Agriculture API", "https://agri.example"),
            AppRecord::new(2, "Academy App", "https://academy.example"),
            AppRecord::new(3, "Weather", "https://weather.example"),
        ]
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    /// Wait for `pending` fetch responses, then let a tick pick them up
    fn settle(app: &mut App, pending: usize) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.fetcher.receiver().len() < pending {
            assert!(Instant::now() < deadline, "fetch did not finish");
            std::thread::sleep(Duration::from_millis(5));
        }
        app.tick();
    }

    fn loaded_app(mode: FilterMode) -> App {
        let config = AppConfig {
            filter_mode: mode,
            ..Default::default()
        };
        let mut app = App::new(config, Arc::new(StaticSource::new(catalog(), "test")));
        settle(&mut app, 1);
        app
    }

    #[test]
    fn starts_with_full_catalog() {
        let app = loaded_app(FilterMode::Client);
        assert_eq!(app.session.counter_text(), "3 apps available");
        assert!(app.search.focused);
    }

    #[test]
    fn typing_filters_on_next_tick() {
        let mut app = loaded_app(FilterMode::Client);
        type_text(&mut app, "aca");
        assert!(app.search.needs_search);
        app.tick();
        assert_eq!(app.session.counter_text(), "1 of 3 apps found");
        assert_eq!(app.table.selected, Some(0));
        assert_eq!(app.selected_record().unwrap().name, "Academy App");
    }

    #[test]
    fn server_mode_round_trip() {
        let mut app = loaded_app(FilterMode::Server);
        type_text(&mut app, "weather");
        app.tick();
        settle(&mut app, 1);
        assert_eq!(app.session.filtered_count(), 1);
        assert_eq!(app.selected_record().unwrap().name, "Weather");
    }

    #[test]
    fn escape_clears_then_unfocuses_then_quits() {
        let mut app = loaded_app(FilterMode::Client);
        type_text(&mut app, "we");
        app.tick();

        press(&mut app, KeyCode::Esc);
        assert!(app.search.query.is_empty());
        app.tick();
        assert_eq!(app.session.filtered_count(), 3);

        press(&mut app, KeyCode::Esc);
        assert!(!app.search.focused);
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn list_navigation_and_refocus() {
        let mut app = loaded_app(FilterMode::Client);
        assert_eq!(app.table.selected, Some(0));
        press(&mut app, KeyCode::Tab);
        assert!(!app.search.focused);

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_record().unwrap().name, "Weather");
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.selected_record().unwrap().name, "Academy App");

        press(&mut app, KeyCode::Char('w'));
        assert!(app.search.focused);
        assert_eq!(app.search.query, "w");
    }

    #[test]
    fn ctrl_c_quits_from_search() {
        let mut app = loaded_app(FilterMode::Client);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
        assert!(app.search.query.is_empty());
    }

    #[test]
    fn copied_flag_expires() {
        let mut app = loaded_app(FilterMode::Client);
        app.config.copy_feedback = Duration::from_millis(0);
        app.copied = Some((AppId::Number(1), Instant::now()));
        assert!(!app.is_copied(&AppId::Number(1)));

        app.config.copy_feedback = Duration::from_secs(60);
        assert!(app.is_copied(&AppId::Number(1)));
        assert!(!app.is_copied(&AppId::Number(2)));
    }

    #[test]
    fn reload_goes_back_to_loading() {
        let mut app = loaded_app(FilterMode::Client);
        press(&mut app, KeyCode::F(5));
        assert!(app.session.is_loading());
        settle(&mut app, 1);
        assert_eq!(app.session.total_count(), 3);
    }
}
