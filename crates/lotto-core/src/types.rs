use crate::error::{LottoError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Type alias for draw round identifiers
pub type Round = u32;

/// Lowest ball number.
pub const MIN_NUMBER: u8 = 1;

/// Highest ball number.
pub const MAX_NUMBER: u8 = 45;

/// Main numbers drawn per round.
pub const NUMBERS_PER_DRAW: usize = 6;

/// One official Lotto 6/45 draw result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Draw {
    /// Sequential round. Round 1 was drawn on 2002-12-07, one round per week since.
    pub round: Round,

    /// Calendar date of the draw, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,

    /// Main winning numbers in the order the origin reported them.
    pub numbers: [u8; NUMBERS_PER_DRAW],

    /// Bonus number. Drawn independently of `numbers`.
    pub bonus: u8,
}

impl Draw {
    /// Build a draw, rejecting values no real round can have.
    pub fn new(
        round: Round,
        date: NaiveDate,
        numbers: [u8; NUMBERS_PER_DRAW],
        bonus: u8,
    ) -> Result<Self> {
        if round == 0 {
            return Err(LottoError::InvalidDraw {
                reason: "round must be positive".into(),
            });
        }

        for (i, n) in numbers.iter().enumerate() {
            if !is_ball(*n) {
                return Err(LottoError::InvalidDraw {
                    reason: format!("number {} out of range in round {}", n, round),
                });
            }
            if numbers[..i].contains(n) {
                return Err(LottoError::InvalidDraw {
                    reason: format!("number {} repeated in round {}", n, round),
                });
            }
        }

        if !is_ball(bonus) {
            return Err(LottoError::InvalidDraw {
                reason: format!("bonus {} out of range in round {}", bonus, round),
            });
        }

        Ok(Self {
            round,
            date,
            numbers,
            bonus,
        })
    }

    /// Whether `number` is one of the main winning numbers.
    pub fn contains(&self, number: u8) -> bool {
        self.numbers.contains(&number)
    }
}

/// Whether `n` is a valid ball number.
pub fn is_ball(n: u8) -> bool {
    (MIN_NUMBER..=MAX_NUMBER).contains(&n)
}

/// Cache key for a round's draw.
pub fn draw_key(round: Round) -> String {
    format!("draw-{}", round)
}
