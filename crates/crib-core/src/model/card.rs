use crate::error::{CribError, ParseError};
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use serde::{Serialize, Serializer};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn points(self) -> u8 {
        self.rank.points()
    }

    pub const fn order(self) -> u8 {
        self.rank.order()
    }

    pub const fn is_jack(self) -> bool {
        matches!(self.rank, Rank::Jack)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// Parses exactly one two-character token such as `5h` or `JD`.
impl FromStr for Card {
    type Err = CribError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.trim().chars().collect();
        let [rank_char, suit_char] = chars[..] else {
            return Err(CribError::parse(s, ParseError::NotACard { found: chars.len() }));
        };
        let rank = Rank::from_char(rank_char).ok_or_else(|| {
            CribError::parse(
                s,
                ParseError::UnexpectedChar {
                    found: rank_char,
                    position: 0,
                },
            )
        })?;
        let suit = Suit::from_char(suit_char).ok_or_else(|| {
            CribError::parse(
                s,
                ParseError::UnexpectedChar {
                    found: suit_char,
                    position: 1,
                },
            )
        })?;
        Ok(Card::new(rank, suit))
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
