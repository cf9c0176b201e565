use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::rank::Rank;
use crate::model::suit::Suit;

pub const DECK_SIZE: usize = 52;

#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// All 52 cards, suit by suit (hearts, clubs, diamonds, spades), ace to king within a suit.
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }

    /// Cards of a standard deck that are not in `seen`, in deck order.
    pub fn unseen(seen: &Hand) -> Hand {
        Self::standard().into_hand().without(seen.cards())
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn into_hand(self) -> Hand {
        Hand::from_cards(self.cards).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{DECK_SIZE, Deck};
    use crate::model::hand::Hand;
    use std::collections::HashSet;

    #[test]
    fn standard_deck_has_52_unique_cards() {
        let deck = Deck::standard();
        assert_eq!(deck.cards().len(), DECK_SIZE);
        let unique: HashSet<_> = deck.cards().iter().copied().collect();
        assert_eq!(unique.len(), DECK_SIZE);
    }

    #[test]
    fn deck_starts_with_ace_of_hearts_and_ends_with_king_of_spades() {
        let deck = Deck::standard();
        assert_eq!(deck.cards()[0].to_string(), "AH");
        assert_eq!(deck.cards()[13].to_string(), "AC");
        assert_eq!(deck.cards()[DECK_SIZE - 1].to_string(), "KS");
    }

    #[test]
    fn unseen_deck_excludes_dealt_cards() {
        let dealt: Hand = "5H 5C JD 4S 6C KH".parse().expect("hand");
        let unseen = Deck::unseen(&dealt);
        assert_eq!(unseen.len(), 46);
        assert!(dealt.iter().all(|card| !unseen.has(*card)));
    }
}
