//! Number statistics over draws ordered newest first.

use crate::types::{Draw, MAX_NUMBER, MIN_NUMBER};
use serde::{Deserialize, Serialize};

/// Numbers absent for at least this many consecutive draws are reported as streaks.
pub const STREAK_THRESHOLD: u32 = 10;

/// A number and how many of the given draws it is absent from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingStreak {
    pub number: u8,
    pub streak: u32,
}

/// A draw containing a searched number, with the draw that followed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberHit {
    pub draw: Draw,
    pub next_draw: Option<Draw>,
}

/// Missing-number summary over a window of draws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingReport {
    /// How many of the newest draws `missing` looks at.
    pub weeks: usize,
    pub missing: Vec<u8>,
    pub streaks: Vec<MissingStreak>,
}

impl MissingReport {
    /// Build from draws ordered newest first.
    pub fn new(draws: &[Draw], weeks: usize) -> Self {
        Self {
            weeks,
            missing: find_missing(draws, weeks),
            streaks: find_consecutive_missing(draws),
        }
    }
}

/// Numbers in [1,45] that did not appear in the first `weeks` draws, ascending.
pub fn find_missing(draws: &[Draw], weeks: usize) -> Vec<u8> {
    let mut seen = [false; MAX_NUMBER as usize + 1];
    for draw in draws.iter().take(weeks) {
        for &n in &draw.numbers {
            seen[n as usize] = true;
        }
    }

    (MIN_NUMBER..=MAX_NUMBER)
        .filter(|&n| !seen[n as usize])
        .collect()
}

/// Absence count of every number over all of `draws`. Appearances do not
/// reset the count.
pub fn missing_streaks(draws: &[Draw]) -> Vec<MissingStreak> {
    (MIN_NUMBER..=MAX_NUMBER)
        .map(|number| MissingStreak {
            number,
            streak: draws.iter().filter(|d| !d.contains(number)).count() as u32,
        })
        .collect()
}

/// Numbers absent from [`STREAK_THRESHOLD`] or more of `draws`, highest count
/// first, ties by number.
pub fn find_consecutive_missing(draws: &[Draw]) -> Vec<MissingStreak> {
    let mut streaks: Vec<MissingStreak> = missing_streaks(draws)
        .into_iter()
        .filter(|s| s.streak >= STREAK_THRESHOLD)
        .collect();
    streaks.sort_by(|a, b| b.streak.cmp(&a.streak).then(a.number.cmp(&b.number)));
    streaks
}

/// Draws containing `number`, each paired with the next newer draw if there is one.
pub fn search_number(draws: &[Draw], number: u8) -> Vec<NumberHit> {
    draws
        .iter()
        .enumerate()
        .filter(|(_, d)| d.contains(number))
        .map(|(i, d)| NumberHit {
            draw: d.clone(),
            next_draw: i.checked_sub(1).map(|j| draws[j].clone()),
        })
        .collect()
}
