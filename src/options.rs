use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

pub const DEFAULT_OPTION_COUNT: usize = 10;

/// Builds the shuffled option list for one word.
///
/// Every entry of `segments` is kept (including legitimate repeats). Distinct
/// pool values that are not one of the word's segments fill the list up to
/// `target`; each is offered at most once.
pub fn generate_options<R: Rng + ?Sized>(
    segments: &[String],
    pool: &[String],
    target: usize,
    rng: &mut R,
) -> Vec<String> {
    let correct: HashSet<&str> = segments.iter().map(String::as_str).collect();

    let mut seen = HashSet::new();
    let distractors: Vec<&String> = pool
        .iter()
        .filter(|s| !correct.contains(s.as_str()) && seen.insert(s.as_str()))
        .collect();

    let wanted = target.saturating_sub(segments.len());
    let mut options: Vec<String> = segments.to_vec();
    options.extend(
        distractors
            .choose_multiple(rng, wanted)
            .map(|s| (*s).clone()),
    );
    options.shuffle(rng);
    options
}
