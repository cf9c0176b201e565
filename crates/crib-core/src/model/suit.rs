use core::fmt;

/// Suits only compare for equality during scoring; the declaration order is the deck order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Suit {
    Hearts = 0,
    Clubs = 1,
    Diamonds = 2,
    Spades = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Clubs, Suit::Diamonds, Suit::Spades];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Suit::Hearts),
            1 => Some(Suit::Clubs),
            2 => Some(Suit::Diamonds),
            3 => Some(Suit::Spades),
            _ => None,
        }
    }

    pub const fn from_char(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'H' => Some(Suit::Hearts),
            'C' => Some(Suit::Clubs),
            'D' => Some(Suit::Diamonds),
            'S' => Some(Suit::Spades),
            _ => None,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Suit::Hearts => 'H',
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Spades => 'S',
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::Suit;

    #[test]
    fn display_returns_ascii_symbols() {
        assert_eq!(Suit::Clubs.to_string(), "C");
        assert_eq!(Suit::Hearts.to_string(), "H");
    }

    #[test]
    fn from_index_maps_valid_values() {
        assert_eq!(Suit::from_index(2), Some(Suit::Diamonds));
        assert_eq!(Suit::from_index(4), None);
    }

    #[test]
    fn from_char_accepts_lowercase() {
        assert_eq!(Suit::from_char('s'), Some(Suit::Spades));
        assert_eq!(Suit::from_char('D'), Some(Suit::Diamonds));
        assert_eq!(Suit::from_char('X'), None);
    }
}
