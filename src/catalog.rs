use crate::logger;
use crate::models::{Category, WordEntry};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const COLUMN_TRANSLATION: &str = "chinese";
pub const COLUMN_SPELLING: &str = "word";
pub const COLUMN_SEGMENTS: &str = "pronunciation";
pub const COLUMN_SYLLABLES: &str = "syllables";
pub const COLUMN_AUDIO: &str = "sound";

pub const REQUIRED_COLUMNS: [&str; 5] = [
    COLUMN_TRANSLATION,
    COLUMN_SPELLING,
    COLUMN_SEGMENTS,
    COLUMN_SYLLABLES,
    COLUMN_AUDIO,
];

const DEFAULT_AUDIO_EXTENSION: &str = "wav";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("workbook not found: {}", .0.display())]
    WorkbookNotFound(PathBuf),
    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("category \"{0}\" not found in workbook")]
    SheetNotFound(String),
    #[error("category \"{category}\" is missing columns: {}", .missing.join(", "))]
    MissingColumns {
        category: String,
        missing: Vec<String>,
    },
    #[error("category \"{0}\" has no words")]
    Empty(String),
}

/// Sheet names of the workbook, in workbook order.
pub fn list_categories(path: &Path) -> Result<Vec<String>, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::WorkbookNotFound(path.to_path_buf()));
    }
    let workbook = open_workbook_auto(path)?;
    Ok(workbook.sheet_names())
}

pub fn load_category(path: &Path, name: &str) -> Result<Category, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::WorkbookNotFound(path.to_path_buf()));
    }
    let mut workbook = open_workbook_auto(path)?;
    if !workbook.sheet_names().iter().any(|sheet| sheet == name) {
        return Err(CatalogError::SheetNotFound(name.to_string()));
    }
    let range = workbook.worksheet_range(name)?;
    let category = parse_sheet(name, &range)?;
    logger::log(&format!(
        "Loaded category \"{}\" with {} words and {} distinct segments",
        category.name,
        category.words.len(),
        category.segment_pool.len()
    ));
    Ok(category)
}

/// Turns a sheet's cell grid (header row first) into a category.
pub fn parse_sheet(name: &str, range: &Range<Data>) -> Result<Category, CatalogError> {
    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(cell_text).collect())
        .unwrap_or_default();

    let column = |wanted: &str| header.iter().position(|h| h == wanted);
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|&&c| column(c).is_none())
        .map(|&c| c.to_string())
        .collect();
    if !missing.is_empty() {
        logger::log(&format!(
            "Category \"{}\" is missing columns {:?}; required: {:?}",
            name, missing, REQUIRED_COLUMNS
        ));
        return Err(CatalogError::MissingColumns {
            category: name.to_string(),
            missing,
        });
    }

    // All five were found above.
    let [translation_col, spelling_col, segments_col, syllables_col, audio_col] =
        REQUIRED_COLUMNS.map(|c| column(c).unwrap_or_default());

    let mut words = Vec::new();
    for (offset, row) in rows.enumerate() {
        let text = |col: usize| row.get(col).map(cell_text).unwrap_or_default();

        if row.iter().all(|cell| cell_text(cell).is_empty()) {
            continue;
        }

        let spelling = text(spelling_col);
        if spelling.is_empty() {
            logger::log(&format!(
                "Skipping row {} of \"{}\": empty spelling",
                offset + 2,
                name
            ));
            continue;
        }

        words.push(WordEntry {
            translation: text(translation_col),
            spelling,
            segments: split_segments(&text(segments_col)),
            syllables: text(syllables_col),
            audio_ref: text(audio_col),
        });
    }

    if words.is_empty() {
        return Err(CatalogError::Empty(name.to_string()));
    }

    let segment_pool = pool_segments(&words);
    Ok(Category {
        name: name.to_string(),
        words,
        segment_pool,
    })
}

/// Splits a comma-separated segment cell, trimming each part and dropping blanks.
pub fn split_segments(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Distinct segments across all words, in first-seen order.
pub fn pool_segments(words: &[WordEntry]) -> Vec<String> {
    let mut seen = HashSet::new();
    words
        .iter()
        .flat_map(|w| w.segments.iter())
        .filter(|s| seen.insert(s.as_str()))
        .cloned()
        .collect()
}

/// Maps an audio reference from the sheet to a file path.
///
/// A reference without an extension gets `.wav`; a bare file name (no `/` or
/// `\`) is looked up in `sound_dir`.
pub fn resolve_audio_path(audio_ref: &str, sound_dir: &Path) -> Option<PathBuf> {
    let audio_ref = audio_ref.trim();
    if audio_ref.is_empty() {
        return None;
    }

    let mut file = PathBuf::from(audio_ref);
    if file.extension().is_none() {
        file.set_extension(DEFAULT_AUDIO_EXTENSION);
    }

    if audio_ref.contains('/') || audio_ref.contains('\\') {
        Some(file)
    } else {
        Some(sound_dir.join(file))
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}
