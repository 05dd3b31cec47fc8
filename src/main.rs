use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Instant;

use spelling_drill::audio::{AudioWorker, Pronouncer, SilentPronouncer};
use spelling_drill::{config, db, logger, ui, App, Config};

fn open_progress_store() -> Option<rusqlite::Connection> {
    let Some(data_dir) = config::data_dir() else {
        logger::log("No data directory available, progress will not be saved");
        return None;
    };
    match db::init_db(&data_dir) {
        Ok(conn) => Some(conn),
        Err(e) => {
            logger::log(&format!("Failed to open progress database: {}", e));
            None
        }
    }
}

fn start_audio() -> Box<dyn Pronouncer> {
    match AudioWorker::spawn() {
        Ok(worker) => Box::new(worker),
        Err(e) => {
            logger::log(&format!("Failed to start audio thread: {}", e));
            Box::new(SilentPronouncer)
        }
    }
}

fn main() -> io::Result<()> {
    let (config, config_error) = Config::load();
    logger::init(&config.log_file);
    logger::log("Starting spelling drill");
    if let Some(e) = config_error {
        logger::log(&format!("Using default config: {}", e));
    }

    let conn = open_progress_store();
    let pronouncer = start_audio();

    let mut app = App::new(config, pronouncer, conn, StdRng::from_entropy());
    app.reload_categories();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        logger::log(&format!("Terminal error: {}", e));
    }
    logger::log("Exiting");
    result
}

fn run<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(app.poll_timeout(Instant::now()))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key, Instant::now());
        }

        app.tick(Instant::now());
    }
    Ok(())
}
