use crate::deferred::Deferred;
use crate::models::{AnswerState, Category, CheckOutcome, WordEntry};
use crate::options::generate_options;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::{Duration, Instant};

/// Options are laid out in rows of this many buttons.
pub const OPTION_COLUMNS: usize = 5;

/// What the deferred advance did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    NextWord,
    Completed,
}

/// Side effects the drill screen asks the app to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillAction {
    None,
    Back,
    Replay,
    Correct,
    ToggleSound,
}

/// State of one pass through a category.
#[derive(Debug)]
pub struct DrillSession {
    pub category: String,
    pub words: Vec<WordEntry>,
    pub current_index: usize,
    pub correct_count: usize,
    pub segment_pool: Vec<String>,
    pub input: String,
    pub hint_index: usize,
    pub options: Vec<String>,
    pub selected_option: usize,
    pub answer_state: AnswerState,
    pub pending_advance: Option<Deferred<()>>,
    pub run_id: Option<i64>,
    option_count: usize,
    advance_delay: Duration,
}

impl DrillSession {
    /// Shuffles the category's words and prepares the first one.
    pub fn start<R: Rng + ?Sized>(
        category: Category,
        option_count: usize,
        advance_delay: Duration,
        rng: &mut R,
    ) -> Self {
        let Category {
            name,
            mut words,
            segment_pool,
        } = category;
        words.shuffle(rng);

        let mut session = Self {
            category: name,
            words,
            current_index: 0,
            correct_count: 0,
            segment_pool,
            input: String::new(),
            hint_index: 0,
            options: Vec::new(),
            selected_option: 0,
            answer_state: AnswerState::Awaiting,
            pending_advance: None,
            run_id: None,
            option_count,
            advance_delay,
        };
        session.load_current_word(rng);
        session
    }

    pub fn total(&self) -> usize {
        self.words.len()
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.words.len()
    }

    pub fn current_word(&self) -> Option<&WordEntry> {
        self.words.get(self.current_index)
    }

    fn accepts_input(&self) -> bool {
        self.answer_state == AnswerState::Awaiting && !self.is_complete()
    }

    fn load_current_word<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.input.clear();
        self.hint_index = 0;
        self.selected_option = 0;
        self.answer_state = AnswerState::Awaiting;
        self.options = match self.words.get(self.current_index) {
            Some(word) => generate_options(&word.segments, &self.segment_pool, self.option_count, rng),
            None => Vec::new(),
        };
    }

    /// Compares the trimmed input with the expected spelling.
    pub fn check_answer(&mut self, now: Instant) -> CheckOutcome {
        if !self.accepts_input() {
            return CheckOutcome::Ignored;
        }
        let Some(word) = self.current_word() else {
            return CheckOutcome::Ignored;
        };

        if self.input.trim() == word.spelling.trim() {
            self.correct_count += 1;
            self.answer_state = AnswerState::Correct;
            self.pending_advance = Some(Deferred::schedule(self.advance_delay, (), now));
            CheckOutcome::Correct
        } else {
            CheckOutcome::Incorrect
        }
    }

    pub fn tap_option(&mut self, index: usize, now: Instant) -> CheckOutcome {
        if !self.accepts_input() {
            return CheckOutcome::Ignored;
        }
        let Some(option) = self.options.get(index) else {
            return CheckOutcome::Ignored;
        };
        self.input.push_str(option);
        self.selected_option = index;
        self.check_answer(now)
    }

    pub fn push_char(&mut self, c: char, now: Instant) -> CheckOutcome {
        if !self.accepts_input() {
            return CheckOutcome::Ignored;
        }
        self.input.push(c);
        self.check_answer(now)
    }

    pub fn backspace(&mut self, now: Instant) -> CheckOutcome {
        if !self.accepts_input() || self.input.pop().is_none() {
            return CheckOutcome::Ignored;
        }
        self.check_answer(now)
    }

    /// Appends the next unrevealed segment, or reveals the whole spelling once
    /// every segment has been shown.
    pub fn hint(&mut self, now: Instant) -> CheckOutcome {
        if !self.accepts_input() {
            return CheckOutcome::Ignored;
        }
        let Some(word) = self.current_word() else {
            return CheckOutcome::Ignored;
        };

        match word.segments.get(self.hint_index) {
            Some(segment) => {
                let segment = segment.clone();
                self.input.push_str(&segment);
                self.hint_index += 1;
            }
            None => self.input = word.spelling.clone(),
        }
        self.check_answer(now)
    }

    pub fn clear(&mut self) {
        if self.accepts_input() {
            self.input.clear();
        }
    }

    pub fn select_left(&mut self) {
        self.selected_option = self.selected_option.saturating_sub(1);
    }

    pub fn select_right(&mut self) {
        if self.selected_option + 1 < self.options.len() {
            self.selected_option += 1;
        }
    }

    pub fn select_up(&mut self) {
        if self.selected_option >= OPTION_COLUMNS {
            self.selected_option -= OPTION_COLUMNS;
        }
    }

    pub fn select_down(&mut self) {
        if self.selected_option + OPTION_COLUMNS < self.options.len() {
            self.selected_option += OPTION_COLUMNS;
        }
    }

    pub fn time_until_advance(&self, now: Instant) -> Option<Duration> {
        self.pending_advance.as_ref().map(|task| task.remaining(now))
    }

    /// Runs the scheduled advance once it is due.
    pub fn poll_advance<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) -> Option<Advance> {
        if !self.pending_advance.as_ref()?.is_due(now) {
            return None;
        }
        self.pending_advance.take()?.fire();
        Some(self.advance(rng))
    }

    fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Advance {
        self.current_index = (self.current_index + 1).min(self.words.len());
        self.load_current_word(rng);
        if self.is_complete() {
            Advance::Completed
        } else {
            Advance::NextWord
        }
    }
}

/// Option index for a digit key: 1..9 then 0 for the tenth button.
fn digit_option_index(c: char) -> Option<usize> {
    c.to_digit(10).map(|d| (d as usize + 9) % 10)
}

pub fn handle_drill_input(session: &mut DrillSession, key: KeyEvent, now: Instant) -> DrillAction {
    // AltGr arrives as Ctrl+Alt on Windows and produces ordinary characters.
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL)
        && !key.modifiers.contains(KeyModifiers::ALT);
    let outcome = match key.code {
        KeyCode::Esc => return DrillAction::Back,
        KeyCode::Char('s') if ctrl => return DrillAction::ToggleSound,
        KeyCode::Char('p') if ctrl => return DrillAction::Replay,
        KeyCode::Char('l') if ctrl => {
            session.clear();
            CheckOutcome::Ignored
        }
        KeyCode::Delete => {
            session.clear();
            CheckOutcome::Ignored
        }
        KeyCode::Char('t') if ctrl => session.hint(now),
        KeyCode::Tab => session.hint(now),
        KeyCode::Left => {
            session.select_left();
            CheckOutcome::Ignored
        }
        KeyCode::Right => {
            session.select_right();
            CheckOutcome::Ignored
        }
        KeyCode::Up => {
            session.select_up();
            CheckOutcome::Ignored
        }
        KeyCode::Down => {
            session.select_down();
            CheckOutcome::Ignored
        }
        KeyCode::Enter => session.tap_option(session.selected_option, now),
        KeyCode::Backspace => session.backspace(now),
        KeyCode::Char(c)
            if !ctrl && digit_option_index(c).is_some_and(|i| i < session.options.len()) =>
        {
            session.tap_option(digit_option_index(c).unwrap_or_default(), now)
        }
        KeyCode::Char(c) if !ctrl => session.push_char(c, now),
        _ => CheckOutcome::Ignored,
    };

    match outcome {
        CheckOutcome::Correct => DrillAction::Correct,
        CheckOutcome::Incorrect | CheckOutcome::Ignored => DrillAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DELAY: Duration = Duration::from_millis(1000);

    fn word(translation: &str, spelling: &str, segments: &[&str]) -> WordEntry {
        WordEntry {
            translation: translation.to_string(),
            spelling: spelling.to_string(),
            segments: segments.iter().map(|s| s.to_string()).collect(),
            syllables: segments.join("-"),
            audio_ref: spelling.to_string(),
        }
    }

    fn fruits() -> Category {
        let words = vec![word("苹果", "apple", &["ap", "ple"]), word("梨", "pear", &["pear"])];
        let segment_pool = crate::catalog::pool_segments(&words);
        Category {
            name: "Fruits".to_string(),
            words,
            segment_pool,
        }
    }

    fn start(category: Category) -> (DrillSession, StdRng) {
        let mut rng = StdRng::seed_from_u64(42);
        let session = DrillSession::start(category, 10, DELAY, &mut rng);
        (session, rng)
    }

    fn tap(session: &mut DrillSession, segment: &str, now: Instant) -> CheckOutcome {
        let index = session
            .options
            .iter()
            .position(|o| o == segment)
            .expect("segment is offered");
        session.tap_option(index, now)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Answers the current word by tapping its segments in order.
    fn answer_current(session: &mut DrillSession, now: Instant) -> CheckOutcome {
        let segments = session.current_word().unwrap().segments.clone();
        let mut outcome = CheckOutcome::Ignored;
        for segment in &segments {
            outcome = tap(session, segment, now);
        }
        outcome
    }

    #[test]
    fn test_start_resets_state() {
        let (session, _) = start(fruits());

        assert_eq!(session.category, "Fruits");
        assert_eq!(session.total(), 2);
        assert_eq!(session.current_index, 0);
        assert_eq!(session.correct_count, 0);
        assert!(session.input.is_empty());
        assert_eq!(session.answer_state, AnswerState::Awaiting);
        assert!(session.pending_advance.is_none());
        assert!(!session.is_complete());
    }

    #[test]
    fn test_options_contain_current_segments() {
        let (mut session, mut rng) = start(fruits());
        let now = Instant::now();

        loop {
            let word = session.current_word().unwrap().clone();
            for segment in &word.segments {
                assert!(session.options.contains(segment));
            }
            answer_current(&mut session, now);
            if session.poll_advance(now + DELAY, &mut rng) == Some(Advance::Completed) {
                break;
            }
        }
    }

    #[test]
    fn test_fruits_example_tap_ap_then_ple() {
        let (mut session, _) = start(fruits());
        let now = Instant::now();

        // Move to "apple" regardless of shuffle order.
        if session.current_word().unwrap().spelling != "apple" {
            session.words.swap(0, 1);
            session.options = vec!["ap".into(), "ple".into(), "pear".into()];
        }

        assert_eq!(tap(&mut session, "ap", now), CheckOutcome::Incorrect);
        assert_eq!(session.input, "ap");
        assert_eq!(session.correct_count, 0);

        assert_eq!(tap(&mut session, "ple", now), CheckOutcome::Correct);
        assert_eq!(session.input, "apple");
        assert_eq!(session.answer_state, AnswerState::Correct);
        assert_eq!(session.correct_count, 1);
        assert_eq!(session.total(), 2);
    }

    #[test]
    fn test_trimmed_input_matches() {
        let (mut session, _) = start(fruits());
        let now = Instant::now();
        let spelling = session.current_word().unwrap().spelling.clone();

        session.input = format!("  {}", spelling);
        assert_eq!(session.push_char(' ', now), CheckOutcome::Correct);
        assert_eq!(session.correct_count, 1);
    }

    #[test]
    fn test_check_is_case_sensitive() {
        let (mut session, _) = start(fruits());
        let now = Instant::now();
        let spelling = session.current_word().unwrap().spelling.to_uppercase();

        session.input = spelling;
        assert_eq!(session.check_answer(now), CheckOutcome::Incorrect);
        assert_eq!(session.correct_count, 0);
    }

    #[test]
    fn test_wrong_text_leaves_count_unchanged() {
        let (mut session, _) = start(fruits());
        let now = Instant::now();

        for c in "xyz".chars() {
            assert_eq!(session.push_char(c, now), CheckOutcome::Incorrect);
        }
        assert_eq!(session.correct_count, 0);
        assert_eq!(session.answer_state, AnswerState::Awaiting);
        assert!(session.pending_advance.is_none());
    }

    #[test]
    fn test_input_ignored_after_correct_answer() {
        let (mut session, _) = start(fruits());
        let now = Instant::now();

        assert_eq!(answer_current(&mut session, now), CheckOutcome::Correct);
        let input = session.input.clone();

        assert_eq!(session.push_char('x', now), CheckOutcome::Ignored);
        assert_eq!(session.hint(now), CheckOutcome::Ignored);
        assert_eq!(session.tap_option(0, now), CheckOutcome::Ignored);
        assert_eq!(session.backspace(now), CheckOutcome::Ignored);
        session.clear();

        assert_eq!(session.input, input);
        assert_eq!(session.correct_count, 1);
    }

    #[test]
    fn test_advance_waits_for_delay() {
        let (mut session, mut rng) = start(fruits());
        let now = Instant::now();

        answer_current(&mut session, now);
        assert_eq!(session.time_until_advance(now), Some(DELAY));
        assert_eq!(session.poll_advance(now + Duration::from_millis(500), &mut rng), None);
        assert_eq!(session.current_index, 0);

        assert_eq!(session.poll_advance(now + DELAY, &mut rng), Some(Advance::NextWord));
        assert_eq!(session.current_index, 1);
        assert!(session.input.is_empty());
        assert_eq!(session.hint_index, 0);
        assert_eq!(session.answer_state, AnswerState::Awaiting);
        assert!(session.pending_advance.is_none());
    }

    #[test]
    fn test_completion_after_last_word() {
        let (mut session, mut rng) = start(fruits());
        let now = Instant::now();

        answer_current(&mut session, now);
        assert_eq!(session.poll_advance(now + DELAY, &mut rng), Some(Advance::NextWord));
        answer_current(&mut session, now + DELAY);
        assert_eq!(
            session.poll_advance(now + DELAY * 2, &mut rng),
            Some(Advance::Completed)
        );

        assert!(session.is_complete());
        assert_eq!(session.current_index, session.total());
        assert_eq!(session.correct_count, 2);
        assert!(session.current_word().is_none());
        assert!(session.options.is_empty());

        // Nothing further happens once complete.
        assert_eq!(session.poll_advance(now + DELAY * 10, &mut rng), None);
        assert_eq!(session.push_char('a', now), CheckOutcome::Ignored);
        assert_eq!(session.current_index, session.total());
    }

    #[test]
    fn test_hint_reveals_segments_then_spelling() {
        let category = Category {
            name: "Fruits".to_string(),
            words: vec![word("香蕉", "banana", &["ba", "na", "na"])],
            segment_pool: vec!["ba".into(), "na".into()],
        };
        let (mut session, _) = start(category);
        let now = Instant::now();

        session.input = "x".to_string();
        assert_eq!(session.hint(now), CheckOutcome::Incorrect);
        assert_eq!(session.input, "xba");
        assert_eq!(session.hint(now), CheckOutcome::Incorrect);
        assert_eq!(session.hint(now), CheckOutcome::Incorrect);
        assert_eq!(session.input, "xbanana");
        assert_eq!(session.hint_index, 3);

        // All segments shown: the full spelling replaces the input.
        assert_eq!(session.hint(now), CheckOutcome::Correct);
        assert_eq!(session.input, "banana");
        assert_eq!(session.correct_count, 1);
    }

    #[test]
    fn test_hint_from_empty_input_completes_word() {
        let (mut session, _) = start(fruits());
        let now = Instant::now();
        let segments = session.current_word().unwrap().segments.len();

        for _ in 1..segments {
            assert_eq!(session.hint(now), CheckOutcome::Incorrect);
        }
        assert_eq!(session.hint(now), CheckOutcome::Correct);
    }

    #[test]
    fn test_hint_without_segments_reveals_spelling() {
        let category = Category {
            name: "Misc".to_string(),
            words: vec![word("是", "yes", &[])],
            segment_pool: vec![],
        };
        let (mut session, _) = start(category);

        assert!(session.options.is_empty());
        assert_eq!(session.hint(Instant::now()), CheckOutcome::Correct);
        assert_eq!(session.input, "yes");
    }

    #[test]
    fn test_clear_keeps_hint_index() {
        let (mut session, _) = start(fruits());
        let now = Instant::now();

        session.hint(now);
        let hint_index = session.hint_index;
        session.clear();

        assert!(session.input.is_empty());
        assert_eq!(session.hint_index, hint_index);
    }

    #[test]
    fn test_backspace() {
        let (mut session, _) = start(fruits());
        let now = Instant::now();

        assert_eq!(session.backspace(now), CheckOutcome::Ignored);
        session.push_char('a', now);
        session.push_char('b', now);
        assert_eq!(session.backspace(now), CheckOutcome::Incorrect);
        assert_eq!(session.input, "a");
    }

    #[test]
    fn test_option_grid_navigation() {
        let (mut session, _) = start(fruits());
        session.options = (0..10).map(|i| format!("o{}", i)).collect();
        session.selected_option = 0;

        session.select_left();
        assert_eq!(session.selected_option, 0);
        session.select_right();
        assert_eq!(session.selected_option, 1);
        session.select_down();
        assert_eq!(session.selected_option, 6);
        session.select_down();
        assert_eq!(session.selected_option, 6);
        session.select_up();
        assert_eq!(session.selected_option, 1);
        session.select_up();
        assert_eq!(session.selected_option, 1);

        session.selected_option = 9;
        session.select_right();
        assert_eq!(session.selected_option, 9);
    }

    #[test]
    fn test_handle_input_digits_tap_options() {
        let (mut session, _) = start(fruits());
        session.options = (0..10).map(|i| format!("o{}", i)).collect();
        let now = Instant::now();

        handle_drill_input(&mut session, key(KeyCode::Char('1')), now);
        handle_drill_input(&mut session, key(KeyCode::Char('0')), now);
        assert_eq!(session.input, "o0o9");
    }

    #[test]
    fn test_handle_input_digit_without_option_is_typed() {
        let (mut session, _) = start(fruits());
        session.options = vec!["a".into(), "b".into()];
        let now = Instant::now();

        handle_drill_input(&mut session, key(KeyCode::Char('2')), now);
        handle_drill_input(&mut session, key(KeyCode::Char('3')), now);
        handle_drill_input(&mut session, key(KeyCode::Char('0')), now);
        assert_eq!(session.input, "b30");
    }

    #[test]
    fn test_digit_spelling_can_be_typed() {
        let words = vec![word("第一", "1st", &["1", "st"])];
        let segment_pool = crate::catalog::pool_segments(&words);
        let (mut session, _) = start(Category {
            name: "Ordinals".to_string(),
            words,
            segment_pool,
        });
        session.options.clear();
        let now = Instant::now();

        for c in "1st".chars() {
            handle_drill_input(&mut session, key(KeyCode::Char(c)), now);
        }
        assert_eq!(session.correct_count, 1);
    }

    #[test]
    fn test_handle_input_altgr_chars_are_typed() {
        let (mut session, _) = start(fruits());
        let now = Instant::now();
        let altgr = KeyModifiers::CONTROL | KeyModifiers::ALT;

        let action = handle_drill_input(&mut session, KeyEvent::new(KeyCode::Char('@'), altgr), now);
        assert_eq!(action, DrillAction::None);
        handle_drill_input(&mut session, KeyEvent::new(KeyCode::Char('s'), altgr), now);
        assert_eq!(session.input, "@s");
    }

    #[test]
    fn test_handle_input_enter_taps_selected() {
        let (mut session, _) = start(fruits());
        session.options = vec!["a".into(), "b".into(), "c".into()];
        let now = Instant::now();

        handle_drill_input(&mut session, key(KeyCode::Right), now);
        handle_drill_input(&mut session, key(KeyCode::Right), now);
        handle_drill_input(&mut session, key(KeyCode::Enter), now);
        assert_eq!(session.input, "c");
    }

    #[test]
    fn test_handle_input_controls() {
        let (mut session, _) = start(fruits());
        let now = Instant::now();

        assert_eq!(handle_drill_input(&mut session, key(KeyCode::Esc), now), DrillAction::Back);
        assert_eq!(handle_drill_input(&mut session, ctrl('s'), now), DrillAction::ToggleSound);
        assert_eq!(handle_drill_input(&mut session, ctrl('p'), now), DrillAction::Replay);

        handle_drill_input(&mut session, key(KeyCode::Char('q')), now);
        assert_eq!(session.input, "q");
        handle_drill_input(&mut session, ctrl('l'), now);
        assert!(session.input.is_empty());

        handle_drill_input(&mut session, key(KeyCode::Tab), now);
        assert_eq!(session.hint_index, 1);
    }

    #[test]
    fn test_handle_input_reports_correct_answer() {
        let (mut session, _) = start(fruits());
        let now = Instant::now();
        let spelling = session.current_word().unwrap().spelling.clone();

        let mut last = DrillAction::None;
        for c in spelling.chars() {
            last = handle_drill_input(&mut session, key(KeyCode::Char(c)), now);
        }
        assert_eq!(last, DrillAction::Correct);
        assert_eq!(session.correct_count, 1);
    }

    #[test]
    fn test_correct_count_never_exceeds_total() {
        let (mut session, mut rng) = start(fruits());
        let mut now = Instant::now();

        while !session.is_complete() {
            for _ in 0..5 {
                session.hint(now);
            }
            now += DELAY;
            session.poll_advance(now, &mut rng);
            assert!(session.correct_count <= session.total());
            assert!(session.current_index <= session.total());
        }
        assert_eq!(session.correct_count, session.total());
    }
}
