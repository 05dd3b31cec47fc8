use crate::audio::Pronouncer;
use crate::catalog::{self, resolve_audio_path};
use crate::config::Config;
use crate::db::progress::{self, RunSummary};
use crate::logger;
use crate::models::{AppState, Category};
use crate::session::{handle_drill_input, Advance, DrillAction, DrillSession};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rusqlite::Connection;
use std::time::{Duration, Instant};

/// Poll timeout while nothing is scheduled.
pub const IDLE_POLL: Duration = Duration::from_millis(250);

/// Everything the screens render from, plus the services they trigger.
pub struct App {
    pub config: Config,
    pub state: AppState,
    pub categories: Vec<String>,
    pub selected_category: usize,
    pub runs: Vec<RunSummary>,
    pub session: Option<DrillSession>,
    pub error: Option<String>,
    pub sound_enabled: bool,
    pub should_quit: bool,
    pronouncer: Box<dyn Pronouncer>,
    conn: Option<Connection>,
    rng: StdRng,
}

impl App {
    pub fn new(
        config: Config,
        pronouncer: Box<dyn Pronouncer>,
        conn: Option<Connection>,
        rng: StdRng,
    ) -> Self {
        let sound_enabled = config.sound_enabled;
        Self {
            config,
            state: AppState::Categories,
            categories: Vec::new(),
            selected_category: 0,
            runs: Vec::new(),
            session: None,
            error: None,
            sound_enabled,
            should_quit: false,
            pronouncer,
            conn,
            rng,
        }
    }

    /// Re-reads sheet names from the workbook. On failure the previous list is kept.
    pub fn reload_categories(&mut self) {
        match catalog::list_categories(&self.config.workbook_path) {
            Ok(categories) => {
                logger::log(&format!("Found {} categories", categories.len()));
                self.categories = categories;
                self.selected_category = self
                    .selected_category
                    .min(self.categories.len().saturating_sub(1));
            }
            Err(e) => self.report(format!("Could not load categories: {}", e)),
        }
        self.refresh_runs();
    }

    fn refresh_runs(&mut self) {
        let Some(conn) = &self.conn else {
            return;
        };
        match progress::latest_runs(conn) {
            Ok(runs) => self.runs = runs,
            Err(e) => logger::log(&format!("Failed to read progress: {}", e)),
        }
    }

    fn report(&mut self, message: String) {
        logger::log(&message);
        self.error = Some(message);
    }

    /// How long the event loop may block waiting for input.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        self.session
            .as_ref()
            .and_then(|s| s.time_until_advance(now))
            .map_or(IDLE_POLL, |left| left.min(IDLE_POLL))
    }

    /// Fires the auto-advance when it is due.
    pub fn tick(&mut self, now: Instant) {
        if self.state != AppState::Drill {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.poll_advance(now, &mut self.rng) {
            Some(Advance::NextWord) => self.play_current_word(),
            Some(Advance::Completed) => self.finish_session(),
            None => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.error.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.error = None;
            }
            return;
        }

        match self.state {
            AppState::Categories => self.handle_categories_key(key),
            AppState::Drill => self.handle_drill_key(key, now),
            AppState::Completed => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                    self.back_to_categories();
                }
            }
        }
    }

    fn handle_categories_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => {
                self.selected_category = self.selected_category.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_category + 1 < self.categories.len() {
                    self.selected_category += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(name) = self.categories.get(self.selected_category).cloned() {
                    self.open_category(&name);
                }
            }
            KeyCode::Char('r') => self.reload_categories(),
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_drill_key(&mut self, key: KeyEvent, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match handle_drill_input(session, key, now) {
            DrillAction::Back => self.back_to_categories(),
            DrillAction::Replay => self.play_current_word(),
            DrillAction::ToggleSound => {
                self.sound_enabled = !self.sound_enabled;
                if !self.sound_enabled {
                    self.pronouncer.stop();
                }
            }
            DrillAction::Correct => {
                self.play_current_word();
                self.record_correct();
            }
            DrillAction::None => {}
        }
    }

    /// Loads a category from the workbook; on failure the picker stays as it was.
    pub fn open_category(&mut self, name: &str) {
        match catalog::load_category(&self.config.workbook_path, name) {
            Ok(category) => self.start_session(category),
            Err(e) => self.report(format!("Could not open \"{}\": {}", name, e)),
        }
    }

    pub fn start_session(&mut self, category: Category) {
        let mut session = DrillSession::start(
            category,
            self.config.option_count,
            self.config.advance_delay(),
            &mut self.rng,
        );

        if let Some(conn) = &self.conn {
            match progress::create_run(conn, &session.category, session.total()) {
                Ok(id) => session.run_id = Some(id),
                Err(e) => logger::log(&format!("Failed to record run: {}", e)),
            }
        }

        logger::log(&format!(
            "Started \"{}\" with {} words",
            session.category,
            session.total()
        ));
        self.session = Some(session);
        self.state = AppState::Drill;
        self.play_current_word();
    }

    /// Drops the session (cancelling any pending advance) and shows the picker.
    pub fn back_to_categories(&mut self) {
        if self.session.take().is_some() {
            self.pronouncer.stop();
        }
        self.state = AppState::Categories;
        self.refresh_runs();
    }

    fn finish_session(&mut self) {
        self.state = AppState::Completed;
        let Some(session) = &self.session else {
            return;
        };
        logger::log(&format!(
            "Finished \"{}\": {}/{}",
            session.category,
            session.correct_count,
            session.total()
        ));
        if let (Some(conn), Some(run_id)) = (&self.conn, session.run_id)
            && let Err(e) = progress::complete_run(conn, run_id)
        {
            logger::log(&format!("Failed to complete run: {}", e));
        }
    }

    fn record_correct(&self) {
        let Some(session) = &self.session else {
            return;
        };
        if let (Some(conn), Some(run_id)) = (&self.conn, session.run_id)
            && let Err(e) = progress::update_correct(conn, run_id, session.correct_count)
        {
            logger::log(&format!("Failed to save progress: {}", e));
        }
    }

    pub fn play_current_word(&self) {
        if !self.sound_enabled {
            return;
        }
        let Some(word) = self.session.as_ref().and_then(|s| s.current_word()) else {
            return;
        };
        match resolve_audio_path(&word.audio_ref, &self.config.sound_dir) {
            Some(path) => self.pronouncer.play(&path),
            None => logger::log(&format!("No audio for \"{}\"", word.spelling)),
        }
    }
}
