use crate::model::card::Card;

/// Required difference between two adjacent sorted rank orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gap {
    Exact(u8),
    Any,
}

impl Gap {
    const fn matches(self, gap: u8) -> bool {
        match self {
            Gap::Exact(required) => required == gap,
            Gap::Any => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPattern {
    pub score: i32,
    pub gaps: [Gap; 4],
}

impl RunPattern {
    const fn new(score: i32, gaps: [Gap; 4]) -> Self {
        Self { score, gaps }
    }

    fn matches(&self, orders: &[u8; 5]) -> bool {
        self.gaps
            .iter()
            .zip(orders.windows(2))
            .all(|(gap, pair)| gap.matches(pair[1] - pair[0]))
    }
}

const X: Gap = Gap::Any;
const Z: Gap = Gap::Exact(0);
const I: Gap = Gap::Exact(1);

/// Every run shape a five-card hand can hold, most specific first. A double or triple run is
/// also a structural match for the plain runs further down, so this order must not change.
pub const RUN_PATTERNS: [RunPattern; 20] = [
    RunPattern::new(12, [Z, I, I, Z]), // AA233
    RunPattern::new(9, [I, I, Z, Z]),  // A2333
    RunPattern::new(9, [I, Z, Z, I]),  // A2223
    RunPattern::new(9, [Z, Z, I, I]),  // AAA23
    RunPattern::new(8, [I, I, I, Z]),  // A2344
    RunPattern::new(8, [I, I, Z, I]),  // A2334
    RunPattern::new(8, [I, Z, I, I]),  // A2234
    RunPattern::new(8, [Z, I, I, I]),  // AA234
    RunPattern::new(6, [X, I, I, Z]),  // xA233
    RunPattern::new(6, [X, I, Z, I]),  // xA223
    RunPattern::new(6, [X, Z, I, I]),  // xAA23
    RunPattern::new(6, [I, I, Z, X]),  // A233x
    RunPattern::new(6, [I, Z, I, X]),  // A223x
    RunPattern::new(6, [Z, I, I, X]),  // AA23x
    RunPattern::new(5, [I, I, I, I]),  // A2345
    RunPattern::new(4, [X, I, I, I]),  // xA234
    RunPattern::new(4, [I, I, I, X]),  // A234x
    RunPattern::new(3, [X, X, I, I]),  // xxA23
    RunPattern::new(3, [X, I, I, X]),  // xA23x
    RunPattern::new(3, [I, I, X, X]),  // A23xx
];

pub(crate) fn runs(cards: &[Card; 5]) -> i32 {
    let mut orders = cards.map(Card::order);
    orders.sort_unstable();
    RUN_PATTERNS
        .iter()
        .find(|pattern| pattern.matches(&orders))
        .map_or(0, |pattern| pattern.score)
}

#[cfg(test)]
mod tests {
    use super::{Gap, RUN_PATTERNS};
    use crate::model::hand::Hand;
    use crate::scoring::score_runs;

    fn runs(text: &str) -> i32 {
        let hand: Hand = text.parse().expect("valid hand");
        score_runs(&hand).expect("five cards")
    }

    #[test]
    fn multiple_runs() {
        assert_eq!(runs("6C 6D 4D 4S 5D"), 12);
        assert_eq!(runs("AH 2H 3H 3D 3C"), 9);
        assert_eq!(runs("KH KD KC JH QH"), 9);
        assert_eq!(runs("AH 2H 2D 2C 3H"), 9);
        assert_eq!(runs("AH AD AC 2H 3H"), 9);
        assert_eq!(runs("AH 2H 3H 4H 4D"), 8);
        assert_eq!(runs("AH 2H 3H 3D 4H"), 8);
        assert_eq!(runs("AH 2H 2C 3H 4H"), 8);
        assert_eq!(runs("AS AH 2H 3H 4H"), 8);
    }

    #[test]
    fn double_runs_of_three_with_a_stray_card() {
        assert_eq!(runs("JH AH 2H 3D 3H"), 6);
        assert_eq!(runs("JH AH 2S 2H 3H"), 6);
        assert_eq!(runs("JH AH AS 2H 3H"), 6);
        assert_eq!(runs("AH 2H 3S 3H JH"), 6);
        assert_eq!(runs("AH 2H 2S 3H JH"), 6);
        assert_eq!(runs("AH AS 2H 3H JH"), 6);
    }

    #[test]
    fn single_runs() {
        assert_eq!(runs("AH 2H 3H 4H 5H"), 5);
        assert_eq!(runs("JH AH 2H 3H 4H"), 4);
        assert_eq!(runs("AH 2H 3H 4H JH"), 4);
        assert_eq!(runs("JH QH AH 2H 3H"), 3);
        assert_eq!(runs("JH AH 2H 3H TH"), 3);
        assert_eq!(runs("AH 2H 3H JH TH"), 3);
        assert_eq!(runs("AH 8H 3H JH TH"), 0);
    }

    #[test]
    fn king_does_not_wrap_to_ace() {
        assert_eq!(runs("QH KH AH 5C 9D"), 0);
        assert_eq!(runs("JH QH KH 5C 9D"), 3);
    }

    #[test]
    fn catalog_scores_never_increase() {
        assert!(RUN_PATTERNS.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(RUN_PATTERNS.iter().all(|p| p.gaps.contains(&Gap::Exact(1))));
    }
}
