use rusqlite::{Connection, Result};
use std::path::{Path, PathBuf};

pub mod progress;

pub const DB_FILE: &str = "progress.db";

pub fn get_db_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DB_FILE)
}

pub fn init_db(data_dir: &Path) -> Result<Connection> {
    let db_path = get_db_path(data_dir);

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let conn = Connection::open(&db_path)?;

    run_migrations(&conn)?;

    Ok(conn)
}

pub(crate) fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS runs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category TEXT NOT NULL,
            started_at INTEGER NOT NULL,
            completed_at INTEGER,
            words_total INTEGER NOT NULL,
            correct_count INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_runs_category ON runs(category)",
        [],
    )?;

    Ok(())
}
