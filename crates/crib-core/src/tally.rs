use core::fmt;

use serde::Serialize;

use crate::error::CribError;

/// Best held hand (29) plus best crib (24).
pub const MAX_SCORE: i32 = 29 + 24;
/// Empty held hand against a 29-point opposing crib.
pub const MIN_SCORE: i32 = -29;
pub const NUM_SCORES: usize = (MAX_SCORE - MIN_SCORE + 1) as usize;

/// Dense histogram over `MIN_SCORE..=MAX_SCORE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    counts: [u32; NUM_SCORES],
}

impl Default for Tally {
    fn default() -> Self {
        Self::new()
    }
}

impl Tally {
    pub const fn new() -> Self {
        Self {
            counts: [0; NUM_SCORES],
        }
    }

    /// Builds a tally from raw bucket counts; index 0 holds `MIN_SCORE`.
    pub const fn from_counts(counts: [u32; NUM_SCORES]) -> Self {
        Self { counts }
    }

    pub fn increment(&mut self, score: i32) -> Result<(), CribError> {
        let index = Self::index(score)?;
        self.counts[index] += 1;
        Ok(())
    }

    pub fn count(&self, score: i32) -> u32 {
        Self::index(score).map_or(0, |index| self.counts[index])
    }

    pub fn counts(&self) -> &[u32; NUM_SCORES] {
        &self.counts
    }

    /// Number of recorded samples.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&count| u64::from(count)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }

    /// `(score, count)` for every bucket, lowest score first.
    pub fn iter(&self) -> impl Iterator<Item = (i32, u32)> + '_ {
        (MIN_SCORE..=MAX_SCORE).zip(self.counts.iter().copied())
    }

    /// Lowest score seen at least once.
    pub fn min(&self) -> Option<i32> {
        self.iter().find(|&(_, count)| count != 0).map(|(score, _)| score)
    }

    /// Highest score seen at least once.
    pub fn max(&self) -> Option<i32> {
        self.iter()
            .filter(|&(_, count)| count != 0)
            .last()
            .map(|(score, _)| score)
    }

    pub fn merge(&mut self, other: &Tally) {
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts.iter()) {
            *mine += *theirs;
        }
    }

    fn index(score: i32) -> Result<usize, CribError> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(CribError::ScoreOutOfRange {
                score,
                min: MIN_SCORE,
                max: MAX_SCORE,
            });
        }
        Ok((score - MIN_SCORE) as usize)
    }
}

impl Serialize for Tally {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.counts.iter())
    }
}

/// Summary of a tally, printed as `mean stdev min..max` with one decimal.
///
/// `mean` is weighted by bucket counts over `num_hands`. `stdev` is the square root of the
/// summed squared distance of each score between `min` and `max` from the mean, divided by
/// `num_hands`; this measures how far the occupied score range spreads around the mean and
/// is kept as-is so reports stay comparable with earlier runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub mean: f64,
    pub stdev: f64,
    pub min: i32,
    pub max: i32,
}

impl Statistics {
    /// Summarises `tally` over `num_hands` samples. An empty tally (or zero samples) yields
    /// all zeros.
    pub fn from_tally(tally: &Tally, num_hands: u64) -> Self {
        let min = tally.min().unwrap_or(0);
        let max = tally.max().unwrap_or(0);
        if num_hands == 0 || tally.is_empty() {
            return Self {
                mean: 0.0,
                stdev: 0.0,
                min,
                max,
            };
        }

        let samples = num_hands as f64;
        let sum: f64 = (min..=max)
            .map(|score| f64::from(score) * f64::from(tally.count(score)))
            .sum();
        let mean = sum / samples;

        let sumdev: f64 = (min..=max)
            .map(|score| {
                let d = f64::from(score) - mean;
                d * d
            })
            .sum();
        let stdev = (sumdev / samples).sqrt();

        Self {
            mean,
            stdev,
            min,
            max,
        }
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} {:.1} {}..{}",
            self.mean, self.stdev, self.min, self.max
        )
    }
}
