use rusqlite::{Connection, OptionalExtension, Result};

/// One drill pass through a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub id: i64,
    pub category: String,
    pub started_at: i64,
    pub completed_at: Option<i64>,
    pub words_total: usize,
    pub correct_count: usize,
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn create_run(conn: &Connection, category: &str, words_total: usize) -> Result<i64> {
    let created_at = now();

    conn.execute(
        "INSERT INTO runs (category, started_at, words_total, correct_count, created_at, updated_at)
         VALUES (?, ?, ?, 0, ?, ?)",
        rusqlite::params![category, created_at, words_total, created_at, created_at],
    )?;

    Ok(conn.last_insert_rowid())
}

pub fn update_correct(conn: &Connection, run_id: i64, correct_count: usize) -> Result<()> {
    conn.execute(
        "UPDATE runs SET updated_at = ?, correct_count = ? WHERE id = ?",
        rusqlite::params![now(), correct_count, run_id],
    )?;
    Ok(())
}

pub fn complete_run(conn: &Connection, run_id: i64) -> Result<()> {
    let completed_at = now();
    conn.execute(
        "UPDATE runs SET updated_at = ?, completed_at = ? WHERE id = ?",
        rusqlite::params![completed_at, completed_at, run_id],
    )?;
    Ok(())
}

fn map_run(row: &rusqlite::Row<'_>) -> Result<RunSummary> {
    Ok(RunSummary {
        id: row.get(0)?,
        category: row.get(1)?,
        started_at: row.get(2)?,
        completed_at: row.get(3)?,
        words_total: row.get(4)?,
        correct_count: row.get(5)?,
    })
}

pub fn get_run(conn: &Connection, id: i64) -> Result<Option<RunSummary>> {
    conn.query_row(
        "SELECT id, category, started_at, completed_at, words_total, correct_count
         FROM runs WHERE id = ?",
        [id],
        map_run,
    )
    .optional()
}

/// The most recent run of every category that has one.
pub fn latest_runs(conn: &Connection) -> Result<Vec<RunSummary>> {
    let mut stmt = conn.prepare(
        "SELECT id, category, started_at, completed_at, words_total, correct_count
         FROM runs r
         WHERE id = (SELECT MAX(id) FROM runs WHERE category = r.category)
         ORDER BY category",
    )?;

    let runs = stmt
        .query_map([], map_run)?
        .filter_map(|r| r.ok())
        .collect();

    Ok(runs)
}
