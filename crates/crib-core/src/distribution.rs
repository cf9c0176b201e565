//! Score frequencies over every possible hand.
//!
//! Each card of the deck is taken in turn as the cut, and every 4-card hand drawn from the
//! remaining cards is scored with it. The standard deck gives 52 * C(51,4) = 12,994,800 hands.
//! Cuts are independent, so they are spread over the rayon pool and merged at the end.

use rayon::prelude::*;
use tracing::info;

use crate::combinations::{Combinations, binomial};
use crate::error::CribError;
use crate::model::card::Card;
use crate::model::deck::Deck;
use crate::model::hand::Hand;
use crate::scoring::score_hand;
use crate::tally::Tally;

const HELD: usize = 4;

/// Number of hands [`score_distribution`] scores for a deck of `deck_len` cards.
pub const fn hand_count(deck_len: usize) -> u64 {
    if deck_len == 0 {
        return 0;
    }
    (deck_len * binomial(deck_len - 1, HELD)) as u64
}

/// Distribution over the full 52-card deck.
pub fn full_deck_distribution(is_crib: bool) -> Result<Tally, CribError> {
    score_distribution(&Deck::standard().into_hand(), is_crib)
}

/// Tallies `score_hand` for every (4 held cards, cut) drawn from `deck`.
pub fn score_distribution(deck: &Hand, is_crib: bool) -> Result<Tally, CribError> {
    let tally = deck
        .cards()
        .par_iter()
        .map(|&cut| tally_for_cut(deck, cut, is_crib))
        .try_reduce(Tally::new, |mut acc, part| {
            acc.merge(&part);
            Ok(acc)
        })?;

    info!(
        target: "crib_core::distribution",
        deck = deck.len(),
        is_crib,
        hands = tally.total(),
        "scored every hand"
    );
    Ok(tally)
}

fn tally_for_cut(deck: &Hand, cut: Card, is_crib: bool) -> Result<Tally, CribError> {
    let rest = deck.without(&[cut]);
    let mut tally = Tally::new();
    let mut hand = Hand::with_capacity(HELD + 1);
    let mut combos = Combinations::new(rest.cards(), HELD);
    while let Some(held) = combos.next_combination() {
        for &card in held {
            hand.push(card)?;
        }
        hand.push(cut)?;
        let score = score_hand(&hand, is_crib);
        while hand.pop().is_some() {}
        tally.increment(score?)?;
    }
    Ok(tally)
}
