//! Hand scoring.
//!
//! Every evaluator takes a five-card [`Hand`] whose last card is the cut and fails with
//! [`CribError::InvalidHandSize`] for any other size. [`score_hand`] sums the five categories;
//! only the flush depends on whether the hand is a crib.

mod rules;
mod runs;

use serde::Serialize;

use crate::error::CribError;
use crate::model::card::Card;
use crate::model::hand::Hand;

pub use runs::{Gap, RUN_PATTERNS, RunPattern};

/// Cards in a scored hand: four held (or crib) cards plus the cut.
pub const SCORED_HAND_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub fifteens: i32,
    pub pairs: i32,
    pub runs: i32,
    pub flush: i32,
    pub nobs: i32,
    pub total: i32,
}

impl ScoreBreakdown {
    fn from_cards(cards: &[Card; 5], is_crib: bool) -> Self {
        let fifteens = rules::fifteens(cards);
        let pairs = rules::pairs(cards);
        let runs = runs::runs(cards);
        let flush = rules::flush(cards, is_crib);
        let nobs = rules::nobs(cards);
        Self {
            fifteens,
            pairs,
            runs,
            flush,
            nobs,
            total: fifteens + pairs + runs + flush + nobs,
        }
    }
}

fn scored_cards(hand: &Hand) -> Result<&[Card; 5], CribError> {
    hand.cards()
        .try_into()
        .map_err(|_| CribError::InvalidHandSize {
            expected: SCORED_HAND_SIZE,
            found: hand.len(),
        })
}

pub fn score_fifteens(hand: &Hand) -> Result<i32, CribError> {
    scored_cards(hand).map(rules::fifteens)
}

pub fn score_pairs(hand: &Hand) -> Result<i32, CribError> {
    scored_cards(hand).map(rules::pairs)
}

pub fn score_runs(hand: &Hand) -> Result<i32, CribError> {
    scored_cards(hand).map(runs::runs)
}

pub fn score_flush(hand: &Hand, is_crib: bool) -> Result<i32, CribError> {
    scored_cards(hand).map(|cards| rules::flush(cards, is_crib))
}

pub fn score_nobs(hand: &Hand) -> Result<i32, CribError> {
    scored_cards(hand).map(rules::nobs)
}

pub fn score_breakdown(hand: &Hand, is_crib: bool) -> Result<ScoreBreakdown, CribError> {
    scored_cards(hand).map(|cards| ScoreBreakdown::from_cards(cards, is_crib))
}

pub fn score_hand(hand: &Hand, is_crib: bool) -> Result<i32, CribError> {
    score_breakdown(hand, is_crib).map(|breakdown| breakdown.total)
}
