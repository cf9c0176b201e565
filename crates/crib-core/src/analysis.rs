//! Exhaustive discard evaluation.
//!
//! For a dealt six-card hand every two-card discard is tried. The unseen 46 cards are walked
//! exhaustively to fill the crib and pick the cut, and each held hand and crib is scored.
//! Two tallies are kept per discard: held + crib (the crib is ours) and held - crib (the crib
//! belongs to the opponent).

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::combinations::{Combinations, binomial};
use crate::error::CribError;
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::scoring::score_hand;
use crate::tally::{Statistics, Tally};

pub const DEALT_HAND_SIZE: usize = 6;
pub const DISCARD_SIZE: usize = 2;
pub const KEEP_SIZE: usize = DEALT_HAND_SIZE - DISCARD_SIZE;

/// How the unseen cards of a draw are split between crib fillers and the cut.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutMode {
    /// Each unseen 3-combination is scored once, its last card being the cut (C(46,3) samples).
    #[default]
    Fixed,
    /// Each unseen pair fills the crib and every other unseen card is tried as the cut
    /// (C(46,2) * 44 samples).
    Every,
}

impl CutMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            CutMode::Fixed => "fixed",
            CutMode::Every => "every",
        }
    }

    /// Sample count a full pass over `unseen` cards produces.
    pub const fn expected_samples(self, unseen: usize) -> u64 {
        match self {
            CutMode::Fixed => binomial(unseen, 3) as u64,
            CutMode::Every => (binomial(unseen, 2) * unseen.saturating_sub(2)) as u64,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyzerConfig {
    pub cut_mode: CutMode,
    /// Evaluate discards on the rayon pool. Results keep discard order either way.
    pub parallel: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub stats: Statistics,
    pub tally: Tally,
}

impl Distribution {
    fn new(tally: Tally, samples: u64) -> Self {
        Self {
            stats: Statistics::from_tally(&tally, samples),
            tally,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscardOutcome {
    pub discard: Hand,
    pub keep: Hand,
    pub samples: u64,
    /// Held hand plus crib: the value when the crib is ours.
    pub mine: Distribution,
    /// Held hand minus crib: the value when the crib is the opponent's.
    pub theirs: Distribution,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandAnalysis {
    pub hand: Hand,
    pub cut_mode: CutMode,
    pub unseen: usize,
    pub outcomes: Vec<DiscardOutcome>,
}

impl HandAnalysis {
    /// Discard with the best mean when the crib is ours. Ties go to the earlier discard.
    pub fn best_for_dealer(&self) -> Option<&DiscardOutcome> {
        best_by(&self.outcomes, |outcome| outcome.mine.stats.mean)
    }

    /// Discard with the best mean when the crib is the opponent's.
    pub fn best_for_pone(&self) -> Option<&DiscardOutcome> {
        best_by(&self.outcomes, |outcome| outcome.theirs.stats.mean)
    }

    pub fn outcome_for(&self, discard: &Hand) -> Option<&DiscardOutcome> {
        self.outcomes.iter().find(|outcome| {
            outcome.discard.len() == discard.len()
                && discard.iter().all(|card| outcome.discard.has(*card))
        })
    }
}

fn best_by<F>(outcomes: &[DiscardOutcome], key: F) -> Option<&DiscardOutcome>
where
    F: Fn(&DiscardOutcome) -> f64,
{
    outcomes
        .iter()
        .reduce(|best, outcome| if key(outcome) > key(best) { outcome } else { best })
}

/// Every two-card discard of `hand`, in generator order.
pub fn discard_pairs(hand: &Hand) -> Vec<[Card; DISCARD_SIZE]> {
    let mut pairs = Vec::with_capacity(binomial(hand.len(), DISCARD_SIZE));
    let mut combos = Combinations::new(hand.cards(), DISCARD_SIZE);
    while let Some(&[a, b]) = combos.next_combination() {
        pairs.push([a, b]);
    }
    pairs
}

#[derive(Debug, Clone, Default)]
pub struct DiscardAnalyzer {
    config: AnalyzerConfig,
}

impl DiscardAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Evaluates all fifteen discards of a dealt six-card hand.
    pub fn analyze(&self, hand: &Hand) -> Result<HandAnalysis, CribError> {
        hand.require_len(DEALT_HAND_SIZE)?;
        let start = Instant::now();
        let unseen = Deck::unseen(hand);
        let discards = discard_pairs(hand);

        let outcomes = if self.config.parallel {
            discards
                .par_iter()
                .map(|discard| self.evaluate(hand, &unseen, discard))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            discards
                .iter()
                .map(|discard| self.evaluate(hand, &unseen, discard))
                .collect::<Result<Vec<_>, _>>()?
        };

        info!(
            target: "crib_core::analysis",
            hand = %hand,
            cut_mode = self.config.cut_mode.as_str(),
            parallel = self.config.parallel,
            discards = outcomes.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "analyzed hand"
        );

        Ok(HandAnalysis {
            hand: hand.clone(),
            cut_mode: self.config.cut_mode,
            unseen: unseen.len(),
            outcomes,
        })
    }

    fn evaluate(
        &self,
        hand: &Hand,
        unseen: &Hand,
        discard: &[Card; DISCARD_SIZE],
    ) -> Result<DiscardOutcome, CribError> {
        let keep = hand.without(discard);
        let discard = Hand::from_cards(discard.iter().copied())?;
        let mut sampler = Sampler::new(&keep, &discard);

        match self.config.cut_mode {
            CutMode::Fixed => {
                let mut draws = Combinations::new(unseen.cards(), 3);
                while let Some(&[x, y, cut]) = draws.next_combination() {
                    sampler.record(x, y, cut)?;
                }
            }
            CutMode::Every => {
                let mut fillers = Combinations::new(unseen.cards(), 2);
                while let Some(&[x, y]) = fillers.next_combination() {
                    for &cut in unseen.cards() {
                        if cut != x && cut != y {
                            sampler.record(x, y, cut)?;
                        }
                    }
                }
            }
        }

        debug_assert_eq!(
            sampler.samples,
            self.config.cut_mode.expected_samples(unseen.len())
        );

        let samples = sampler.samples;
        let mine = Distribution::new(sampler.mine, samples);
        let theirs = Distribution::new(sampler.theirs, samples);
        debug!(
            target: "crib_core::analysis",
            discard = %discard,
            samples,
            mine = %mine.stats,
            theirs = %theirs.stats,
            "evaluated discard"
        );

        Ok(DiscardOutcome {
            discard,
            keep,
            samples,
            mine,
            theirs,
        })
    }
}

/// Reusable scratch hands and tallies for one discard.
struct Sampler {
    held: Hand,
    crib: Hand,
    mine: Tally,
    theirs: Tally,
    samples: u64,
}

impl Sampler {
    fn new(keep: &Hand, discard: &Hand) -> Self {
        Self {
            held: keep.clone(),
            crib: discard.clone(),
            mine: Tally::new(),
            theirs: Tally::new(),
            samples: 0,
        }
    }

    fn record(&mut self, x: Card, y: Card, cut: Card) -> Result<(), CribError> {
        self.held.push(cut)?;
        let held_score = score_hand(&self.held, false);
        self.held.pop();

        self.crib.push(x)?;
        self.crib.push(y)?;
        self.crib.push(cut)?;
        let crib_score = score_hand(&self.crib, true);
        for _ in 0..3 {
            self.crib.pop();
        }

        let (held_score, crib_score) = (held_score?, crib_score?);
        self.mine.increment(held_score + crib_score)?;
        self.theirs.increment(held_score - crib_score)?;
        self.samples += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dealt() -> Hand {
        "5H 5C JD 4S 6C KH".parse().expect("valid hand")
    }

    #[test]
    fn discard_pairs_follow_hand_order() {
        let pairs = discard_pairs(&dealt());
        assert_eq!(pairs.len(), 15);
        assert_eq!(pairs[0].map(|c| c.to_string()), ["5H", "5C"]);
        assert_eq!(pairs[1].map(|c| c.to_string()), ["5H", "JD"]);
        assert_eq!(pairs[14].map(|c| c.to_string()), ["6C", "KH"]);
    }

    #[test]
    fn every_discard_sees_all_draws() {
        let analysis = DiscardAnalyzer::default()
            .analyze(&dealt())
            .expect("analysis");
        assert_eq!(analysis.unseen, 46);
        assert_eq!(analysis.outcomes.len(), 15);
        for outcome in &analysis.outcomes {
            assert_eq!(outcome.samples, 15_180);
            assert_eq!(outcome.mine.tally.total(), 15_180);
            assert_eq!(outcome.theirs.tally.total(), 15_180);
            assert_eq!(outcome.keep.len(), KEEP_SIZE);
            assert_eq!(outcome.discard.len(), DISCARD_SIZE);
            assert!(outcome.keep.iter().all(|card| !outcome.discard.has(*card)));
        }
    }

    #[test]
    fn rejects_hands_that_are_not_six_cards() {
        let hand: Hand = "5H 5C JD 4S 6C".parse().expect("hand");
        let err = DiscardAnalyzer::default().analyze(&hand).expect_err("five cards");
        assert_eq!(
            err,
            CribError::InvalidHandSize {
                expected: 6,
                found: 5
            }
        );
    }

    #[test]
    fn expected_samples_per_mode() {
        assert_eq!(CutMode::Fixed.expected_samples(46), 15_180);
        assert_eq!(CutMode::Every.expected_samples(46), 45_540);
    }

    #[test]
    fn best_discards_prefer_highest_mean() {
        let analysis = DiscardAnalyzer::default()
            .analyze(&dealt())
            .expect("analysis");
        let dealer = analysis.best_for_dealer().expect("dealer pick");
        assert_eq!(dealer.discard.to_string(), "JD KH");
        let pone = analysis.best_for_pone().expect("pone pick");
        assert_eq!(pone.discard.to_string(), "JD KH");
        let lookup: Hand = "KH JD".parse().expect("hand");
        assert_eq!(
            analysis.outcome_for(&lookup).map(|o| o.discard.to_string()),
            Some("JD KH".to_string())
        );
    }
}
