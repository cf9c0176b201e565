pub mod card;
pub mod deck;
pub mod hand;
pub mod rank;
pub mod suit;

pub use card::Card;
pub use deck::{DECK_SIZE, Deck};
pub use hand::Hand;
pub use rank::Rank;
pub use suit::Suit;
