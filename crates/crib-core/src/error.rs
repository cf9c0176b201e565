use thiserror::Error;

use crate::model::card::Card;

/// Failures raised while reading card tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected character '{found}' at position {position}")]
    UnexpectedChar { found: char, position: usize },
    #[error("rank '{rank}' at position {position} has no suit")]
    MissingSuit { rank: char, position: usize },
    #[error("suit '{suit}' at position {position} has no rank")]
    MissingRank { suit: char, position: usize },
    #[error("expected a single card but found {found} characters")]
    NotACard { found: usize },
}

/// Every failure the engine can surface. All of them abort the hand being analysed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CribError {
    #[error("malformed hand '{input}': {source}")]
    Parse {
        input: String,
        #[source]
        source: ParseError,
    },
    #[error("card {0} is already in the hand")]
    DuplicateCard(Card),
    #[error("expected {expected} cards but the hand holds {found}")]
    InvalidHandSize { expected: usize, found: usize },
    #[error("score {score} falls outside the tally range {min}..={max}")]
    ScoreOutOfRange { score: i32, min: i32, max: i32 },
}

impl CribError {
    pub(crate) fn parse(input: &str, source: ParseError) -> Self {
        CribError::Parse {
            input: input.to_string(),
            source,
        }
    }
}
