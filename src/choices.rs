use crate::fact::Question;
use rand::{seq::SliceRandom, Rng};
use std::collections::HashSet;

/// Number of options offered in multiple-choice mode
pub const CHOICE_COUNT: usize = 4;

const OFFSETS: [i64; 14] = [-12, -9, -6, -4, -3, -2, -1, 1, 2, 3, 4, 6, 9, 12];
const NEIGHBOUR_TABLE_PROBABILITY: f64 = 0.25;

/// Four distinct non-negative options including the right answer, in random order.
pub fn multiple_choice(question: &Question) -> Vec<u32> {
    multiple_choice_with_rng(question, &mut rand::thread_rng())
}

pub fn multiple_choice_with_rng<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Vec<u32> {
    let correct = question.answer() as i64;
    let mut seen = HashSet::with_capacity(CHOICE_COUNT);
    let mut options = Vec::with_capacity(CHOICE_COUNT);
    seen.insert(correct);
    options.push(correct);

    while options.len() < CHOICE_COUNT {
        let candidate = if rng.gen_bool(NEIGHBOUR_TABLE_PROBABILITY) {
            // the same b from a neighbouring table, e.g. 6 × 7 offered for 7 × 7
            let step = if rng.gen_bool(0.5) { -1 } else { 1 };
            (question.a() as i64 + step) * question.b() as i64
        } else {
            let delta = OFFSETS.choose(rng).copied().unwrap_or(1);
            correct + delta
        };
        let candidate = candidate.max(0);

        if seen.insert(candidate) {
            options.push(candidate);
        }
    }

    let mut options: Vec<u32> = options.into_iter().map(|v| v as u32).collect();
    options.shuffle(rng);
    options
}
