pub mod analysis;
pub mod combinations;
pub mod distribution;
pub mod error;
pub mod model;
pub mod scoring;
pub mod tally;

pub use analysis::{AnalyzerConfig, CutMode, DiscardAnalyzer, DiscardOutcome, HandAnalysis};
pub use error::{CribError, ParseError};
pub use model::{Card, Deck, Hand, Rank, Suit};
pub use scoring::{ScoreBreakdown, score_breakdown, score_hand};
pub use tally::{Statistics, Tally};

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "crib-advisor"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
