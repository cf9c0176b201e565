use crate::model::card::Card;

const FIFTEEN: u8 = 15;

/// Two points for every subset of two or more cards whose counting values total fifteen.
pub(crate) fn fifteens(cards: &[Card; 5]) -> i32 {
    let points = cards.map(Card::points);
    let mut combos = 0;
    for mask in 0u32..(1 << 5) {
        if mask.count_ones() < 2 {
            continue;
        }
        let total: u8 = points
            .iter()
            .enumerate()
            .filter(|(index, _)| mask & (1u32 << *index) != 0)
            .map(|(_, value)| *value)
            .sum();
        if total == FIFTEEN {
            combos += 1;
        }
    }
    2 * combos
}

/// Two points for every pair of equal ranks; trips and quads fall out as three and six pairs.
pub(crate) fn pairs(cards: &[Card; 5]) -> i32 {
    let mut count = 0;
    for (index, a) in cards.iter().enumerate() {
        for b in &cards[index + 1..] {
            if a.rank == b.rank {
                count += 1;
            }
        }
    }
    2 * count
}

/// Four points when the four held cards share a suit, five when the cut matches too. A crib
/// only scores the five-card flush.
pub(crate) fn flush(cards: &[Card; 5], is_crib: bool) -> i32 {
    let suit = cards[0].suit;
    if cards[1..4].iter().any(|card| card.suit != suit) {
        return 0;
    }
    if cards[4].suit == suit {
        5
    } else if is_crib {
        0
    } else {
        4
    }
}

/// One point for holding the jack of the cut card's suit.
pub(crate) fn nobs(cards: &[Card; 5]) -> i32 {
    let cut_suit = cards[4].suit;
    let has_nobs = cards[..4]
        .iter()
        .any(|card| card.is_jack() && card.suit == cut_suit);
    i32::from(has_nobs)
}
