use crate::domain::ports::SuggestionPicker;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// An option of a requirement slot, resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub prereq: Vec<String>,
}

pub fn is_takeable(candidate: &Candidate, completed: &HashSet<String>) -> bool {
    !completed.contains(&candidate.name)
        && candidate.prereq.iter().all(|p| completed.contains(p))
}

/// Uniform pick among the takeable candidates. `None` means the slot has
/// nothing to offer this round, which is a normal outcome.
pub fn choose_suggestion<'a>(
    candidates: &'a [Candidate],
    completed: &HashSet<String>,
    picker: &mut dyn SuggestionPicker,
) -> Option<&'a str> {
    let takeable: Vec<&Candidate> = candidates
        .iter()
        .filter(|candidate| is_takeable(candidate, completed))
        .collect();

    if takeable.is_empty() {
        return None;
    }

    let index = picker.pick(takeable.len()).min(takeable.len() - 1);
    Some(takeable[index].name.as_str())
}

/// Production picker backed by `rand`.
pub struct RandomPicker<R: Rng + Send = StdRng> {
    rng: R,
}

impl RandomPicker<StdRng> {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng + Send> RandomPicker<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> SuggestionPicker for RandomPicker<R> {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Always takes the first takeable option.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstPicker;

impl SuggestionPicker for FirstPicker {
    fn pick(&mut self, _len: usize) -> usize {
        0
    }
}
