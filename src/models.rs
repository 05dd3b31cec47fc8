/// One vocabulary row of a category sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    /// Prompt shown to the learner (the Chinese word).
    pub translation: String,
    /// Expected answer.
    pub spelling: String,
    /// Answer segments offered as options and revealed by hints.
    pub segments: Vec<String>,
    /// Display-only syllable string; never used for checking.
    pub syllables: String,
    pub audio_ref: String,
}

/// A named sheet of the workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub words: Vec<WordEntry>,
    /// Every distinct segment of the sheet in first-seen order, used for distractors.
    pub segment_pool: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerState {
    Awaiting,
    Correct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Categories,
    Drill,
    Completed,
}

/// Result of feeding new answer text to the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Text does not match; nothing changed.
    Incorrect,
    /// Text matched; the correct count went up and an advance is scheduled.
    Correct,
    /// Input ignored because the word was already answered or the run is over.
    Ignored,
}
