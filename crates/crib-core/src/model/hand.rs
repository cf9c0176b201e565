use crate::error::{CribError, ParseError};
use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Serialize, Serializer};
use std::str::FromStr;

/// Ordered set of distinct cards. Insertion order is kept because scoring treats the last
/// card of a five-card hand as the cut.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cards: Vec::with_capacity(capacity),
        }
    }

    /// Builds a hand from cards in order, rejecting repeats.
    pub fn from_cards<I>(cards: I) -> Result<Self, CribError>
    where
        I: IntoIterator<Item = Card>,
    {
        let iter = cards.into_iter();
        let mut hand = Self::with_capacity(iter.size_hint().0);
        for card in iter {
            hand.push(card)?;
        }
        Ok(hand)
    }

    pub fn has(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub fn push(&mut self, card: Card) -> Result<(), CribError> {
        if self.has(card) {
            return Err(CribError::DuplicateCard(card));
        }
        self.cards.push(card);
        Ok(())
    }

    /// Removes the most recently pushed card.
    pub fn pop(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Fails with `InvalidHandSize` unless the hand holds exactly `expected` cards.
    pub fn require_len(&self, expected: usize) -> Result<(), CribError> {
        if self.cards.len() != expected {
            return Err(CribError::InvalidHandSize {
                expected,
                found: self.cards.len(),
            });
        }
        Ok(())
    }

    /// Cards of `self` that are not in `other`, in `self`'s order.
    pub fn without(&self, other: &[Card]) -> Hand {
        Hand {
            cards: self
                .cards
                .iter()
                .copied()
                .filter(|card| !other.contains(card))
                .collect(),
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, card) in self.cards.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{card}")?;
        }
        Ok(())
    }
}

/// Reads `5H 5C 5S JD 5D`, `5h5c5sjd5d` or `ah-as-jh`: a rank symbol followed by a suit
/// symbol, with spaces and hyphens allowed anywhere between cards.
impl FromStr for Hand {
    type Err = CribError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut hand = Hand::new();
        let mut pending: Option<(Rank, char, usize)> = None;

        for (position, symbol) in s.chars().enumerate() {
            if let Some(suit) = Suit::from_char(symbol) {
                let Some((rank, _, _)) = pending.take() else {
                    return Err(CribError::parse(
                        s,
                        ParseError::MissingRank { suit: symbol, position },
                    ));
                };
                hand.push(Card::new(rank, suit))?;
            } else if let Some(rank) = Rank::from_char(symbol) {
                if let Some((_, previous, at)) = pending {
                    return Err(CribError::parse(
                        s,
                        ParseError::MissingSuit {
                            rank: previous,
                            position: at,
                        },
                    ));
                }
                pending = Some((rank, symbol, position));
            } else if symbol != ' ' && symbol != '-' {
                return Err(CribError::parse(
                    s,
                    ParseError::UnexpectedChar {
                        found: symbol,
                        position,
                    },
                ));
            }
        }

        if let Some((_, rank, position)) = pending {
            return Err(CribError::parse(s, ParseError::MissingSuit { rank, position }));
        }
        Ok(hand)
    }
}

impl Serialize for Hand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::Hand;
    use crate::error::{CribError, ParseError};
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn push_and_pop_follow_stack_order() {
        let mut hand = Hand::new();
        let first = Card::new(Rank::Three, Suit::Clubs);
        let second = Card::new(Rank::King, Suit::Hearts);
        hand.push(first).expect("first push");
        hand.push(second).expect("second push");
        assert!(hand.has(first));
        assert_eq!(hand.pop(), Some(second));
        assert!(!hand.has(second));
        assert_eq!(hand.pop(), Some(first));
        assert_eq!(hand.pop(), None);
    }

    #[test]
    fn duplicate_push_is_rejected() {
        let mut hand = Hand::new();
        let card = Card::new(Rank::Five, Suit::Spades);
        hand.push(card).expect("first push");
        assert_eq!(hand.push(card), Err(CribError::DuplicateCard(card)));
        assert_eq!(hand.len(), 1);
    }

    #[test]
    fn parses_all_separator_styles() {
        assert_eq!(
            "5H 5C 5S JD 5D".parse::<Hand>().expect("spaced").to_string(),
            "5H 5C 5S JD 5D"
        );
        assert_eq!(
            "5h5c5sjd5d".parse::<Hand>().expect("packed").to_string(),
            "5H 5C 5S JD 5D"
        );
        assert_eq!(
            "ah-as-jh-ac-ad".parse::<Hand>().expect("hyphens").to_string(),
            "AH AS JH AC AD"
        );
    }

    #[test]
    fn lone_rank_is_a_parse_error() {
        let err = "5H 5".parse::<Hand>().expect_err("trailing rank");
        assert!(matches!(
            err,
            CribError::Parse {
                source: ParseError::MissingSuit { rank: '5', position: 3 },
                ..
            }
        ));
        let err = "55H".parse::<Hand>().expect_err("two ranks");
        assert!(matches!(
            err,
            CribError::Parse {
                source: ParseError::MissingSuit { rank: '5', position: 0 },
                ..
            }
        ));
    }

    #[test]
    fn suit_without_rank_is_a_parse_error() {
        let err = "H5".parse::<Hand>().expect_err("leading suit");
        assert!(matches!(
            err,
            CribError::Parse {
                source: ParseError::MissingRank { suit: 'H', position: 0 },
                ..
            }
        ));
    }

    #[test]
    fn unknown_characters_are_rejected() {
        let err = "5H,5C".parse::<Hand>().expect_err("comma");
        assert!(matches!(
            err,
            CribError::Parse {
                source: ParseError::UnexpectedChar { found: ',', position: 2 },
                ..
            }
        ));
    }

    #[test]
    fn repeated_card_in_text_is_a_duplicate() {
        let err = "5H 6C 5h".parse::<Hand>().expect_err("duplicate");
        assert_eq!(
            err,
            CribError::DuplicateCard(Card::new(Rank::Five, Suit::Hearts))
        );
    }

    #[test]
    fn require_len_reports_both_sizes() {
        let hand: Hand = "AH 2H 3H".parse().expect("hand");
        assert!(hand.require_len(3).is_ok());
        assert_eq!(
            hand.require_len(5),
            Err(CribError::InvalidHandSize {
                expected: 5,
                found: 3
            })
        );
    }

    #[test]
    fn without_keeps_source_order() {
        let hand: Hand = "AH 2H 3H 4H".parse().expect("hand");
        let removed = [Card::new(Rank::Two, Suit::Hearts)];
        assert_eq!(hand.without(&removed).to_string(), "AH 3H 4H");
    }
}
