use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use crib_core::analysis::{DiscardOutcome, Distribution, HandAnalysis};
use crib_core::model::Hand;
use crib_core::scoring::ScoreBreakdown;
use crib_core::tally::{Statistics, Tally};
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest score a single five-card hand can make; the distribution table always covers 0..=29.
const HAND_SCORE_CEILING: i32 = 29;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode report row: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to render plot: {0}")]
    Plot(String),
}

fn io_error(context: &'static str) -> impl FnOnce(std::io::Error) -> ReportError {
    move |source| ReportError::Io { context, source }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// `[ hand ]` followed by one `discard [mine] [theirs]` line per discard.
    #[default]
    Text,
    /// One JSON object per discard.
    Json,
    /// A table per hand with the recommended discards.
    Markdown,
}

impl ReportFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            ReportFormat::Text => "text",
            ReportFormat::Json => "json",
            ReportFormat::Markdown => "markdown",
        }
    }
}

/// Writes one analyzed hand in `format`.
pub fn write_analysis<W: Write>(
    writer: &mut W,
    format: ReportFormat,
    run_id: &str,
    analysis: &HandAnalysis,
) -> Result<(), ReportError> {
    match format {
        ReportFormat::Text => write_text(writer, analysis),
        ReportFormat::Json => write_jsonl(writer, run_id, analysis),
        ReportFormat::Markdown => write_markdown(writer, analysis),
    }
}

pub fn write_text<W: Write>(writer: &mut W, analysis: &HandAnalysis) -> Result<(), ReportError> {
    let context = "writing text report";
    writeln!(writer, "[ {} ]", analysis.hand).map_err(io_error(context))?;
    for outcome in &analysis.outcomes {
        writeln!(
            writer,
            "{} [{}] [{}]",
            outcome.discard, outcome.mine.stats, outcome.theirs.stats
        )
        .map_err(io_error(context))?;
    }
    writeln!(writer).map_err(io_error(context))?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct DiscardRow<'a> {
    run_id: &'a str,
    hand: &'a Hand,
    discard: &'a Hand,
    keep: &'a Hand,
    cut_mode: &'static str,
    samples: u64,
    mine: &'a Distribution,
    theirs: &'a Distribution,
    dealer_pick: bool,
    pone_pick: bool,
}

pub fn write_jsonl<W: Write>(
    writer: &mut W,
    run_id: &str,
    analysis: &HandAnalysis,
) -> Result<(), ReportError> {
    let dealer = analysis.best_for_dealer();
    let pone = analysis.best_for_pone();
    for outcome in &analysis.outcomes {
        let row = DiscardRow {
            run_id,
            hand: &analysis.hand,
            discard: &outcome.discard,
            keep: &outcome.keep,
            cut_mode: analysis.cut_mode.as_str(),
            samples: outcome.samples,
            mine: &outcome.mine,
            theirs: &outcome.theirs,
            dealer_pick: dealer.is_some_and(|best| std::ptr::eq(best, outcome)),
            pone_pick: pone.is_some_and(|best| std::ptr::eq(best, outcome)),
        };
        serde_json::to_writer(&mut *writer, &row)?;
        writer
            .write_all(b"\n")
            .map_err(io_error("writing json report"))?;
    }
    Ok(())
}

pub fn write_markdown<W: Write>(
    writer: &mut W,
    analysis: &HandAnalysis,
) -> Result<(), ReportError> {
    let mut rows = String::new();
    rows.push_str(&format!("## Hand `{}`\n\n", analysis.hand));
    rows.push_str(&format!(
        "Cut mode: {} ({} unseen cards)\n\n",
        analysis.cut_mode.as_str(),
        analysis.unseen
    ));
    rows.push_str("| Discard | Keep | Samples | Mine mean | Mine σ | Mine weighted σ | Mine range | Theirs mean | Theirs σ | Theirs weighted σ | Theirs range |\n");
    rows.push_str("|---------|------|---------|-----------|--------|-----------------|------------|-------------|----------|-------------------|--------------|\n");

    for outcome in &analysis.outcomes {
        rows.push_str(&format!(
            "| {discard} | {keep} | {samples} | {m_mean:.1} | {m_sd:.1} | {m_wsd:.2} | {m_min}..{m_max} | {t_mean:.1} | {t_sd:.1} | {t_wsd:.2} | {t_min}..{t_max} |\n",
            discard = outcome.discard,
            keep = outcome.keep,
            samples = outcome.samples,
            m_mean = outcome.mine.stats.mean,
            m_sd = outcome.mine.stats.stdev,
            m_wsd = weighted_stdev(&outcome.mine.tally),
            m_min = outcome.mine.stats.min,
            m_max = outcome.mine.stats.max,
            t_mean = outcome.theirs.stats.mean,
            t_sd = outcome.theirs.stats.stdev,
            t_wsd = weighted_stdev(&outcome.theirs.tally),
            t_min = outcome.theirs.stats.min,
            t_max = outcome.theirs.stats.max,
        ));
    }

    rows.push('\n');
    rows.push_str(&recommendation_line("Dealer", analysis.best_for_dealer(), |o| {
        &o.mine.stats
    }));
    rows.push_str(&recommendation_line("Pone", analysis.best_for_pone(), |o| {
        &o.theirs.stats
    }));
    rows.push('\n');

    writer
        .write_all(rows.as_bytes())
        .map_err(io_error("writing markdown report"))?;
    Ok(())
}

fn recommendation_line(
    role: &str,
    pick: Option<&DiscardOutcome>,
    stats: impl Fn(&DiscardOutcome) -> &Statistics,
) -> String {
    match pick {
        Some(outcome) => format!(
            "- {role}: discard **{}**, keep {} (mean {:.1})\n",
            outcome.discard,
            outcome.keep,
            stats(outcome).mean
        ),
        None => format!("- {role}: no discard available\n"),
    }
}

/// Frequency-weighted population standard deviation of the tallied scores.
pub fn weighted_stdev(tally: &Tally) -> f64 {
    use statrs::statistics::Statistics as _;

    if tally.is_empty() {
        return 0.0;
    }
    tally
        .iter()
        .flat_map(|(score, count)| std::iter::repeat_n(f64::from(score), count as usize))
        .population_std_dev()
}

/// Classic score table: `score count percent% |||`, one `|` per quarter percent, then the total.
pub fn write_distribution<W: Write>(writer: &mut W, tally: &Tally) -> Result<(), ReportError> {
    let context = "writing distribution table";
    let total = tally.total();
    let low = tally.min().map_or(0, |min| min.min(0));
    let high = tally
        .max()
        .map_or(HAND_SCORE_CEILING, |max| max.max(HAND_SCORE_CEILING));

    for score in low..=high {
        let count = tally.count(score);
        let perc = if total == 0 {
            0.0
        } else {
            f64::from(count) * 100.0 / total as f64
        };
        let hashmarks = "|".repeat((4.0 * perc).round() as usize);
        writeln!(writer, "{score:2} {count:8} {perc:6.2}% {hashmarks}")
            .map_err(io_error(context))?;
    }
    writeln!(writer, "   {total:8} 100.00%").map_err(io_error(context))?;
    Ok(())
}

/// `<hand>: <total>`, optionally followed by the per-category scores.
pub fn write_breakdown<W: Write>(
    writer: &mut W,
    hand: &Hand,
    breakdown: &ScoreBreakdown,
    detailed: bool,
) -> Result<(), ReportError> {
    let written = if detailed {
        writeln!(
            writer,
            "{hand}: {} (fifteens {}, pairs {}, runs {}, flush {}, nobs {})",
            breakdown.total,
            breakdown.fifteens,
            breakdown.pairs,
            breakdown.runs,
            breakdown.flush,
            breakdown.nobs
        )
    } else {
        writeln!(writer, "{hand}: {}", breakdown.total)
    };
    written.map_err(io_error("writing score"))
}

/// Renders the "mine" histogram of the dealer pick to `<dir>/hand_<index>.png`.
pub fn render_histogram(
    dir: impl AsRef<Path>,
    index: usize,
    analysis: &HandAnalysis,
) -> Result<PathBuf, ReportError> {
    let dir = dir.as_ref();
    let best = analysis
        .best_for_dealer()
        .ok_or_else(|| ReportError::Plot("hand has no discards".into()))?;
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir).map_err(io_error("creating plots directory"))?;
    }

    let output_path = dir.join(format!("hand_{index:02}.png"));
    let caption = format!(
        "{}: keep {} (discard {})",
        analysis.hand, best.keep, best.discard
    );
    let bars: Vec<(i32, u32)> = best.mine.tally.iter().filter(|&(_, c)| c != 0).collect();
    let low = best.mine.stats.min;
    let high = best.mine.stats.max + 1;
    let peak = bars.iter().map(|&(_, count)| count).max().unwrap_or(0);

    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(|_| {}));

    let plot_attempt = std::panic::catch_unwind(move || {
        let root = BitMapBackend::new(&output_path, (800, 480)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| ReportError::Plot(e.to_string()))?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .caption(caption, ("sans-serif", 22))
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(low..high, 0u32..(peak + peak / 10 + 1))
            .map_err(|e| ReportError::Plot(e.to_string()))?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Hand + crib score")
            .y_desc("Draws")
            .draw()
            .map_err(|e| ReportError::Plot(e.to_string()))?;

        chart
            .draw_series(
                bars.iter()
                    .map(|&(score, count)| {
                        Rectangle::new([(score, 0), (score + 1, count)], BLUE.filled())
                    }),
            )
            .map_err(|e| ReportError::Plot(e.to_string()))?;

        drop(chart);

        root.present()
            .map_err(|e| ReportError::Plot(e.to_string()))?;

        drop(root);

        Ok(output_path)
    });

    std::panic::set_hook(prev_hook);

    match plot_attempt {
        Ok(result) => result,
        Err(_) => Err(ReportError::Plot(
            "plotters panicked while rendering (missing font support?)".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crib_core::analysis::{AnalyzerConfig, DiscardAnalyzer};
    use crib_core::scoring::score_breakdown;
    use crib_core::tally::NUM_SCORES;

    fn analysis() -> HandAnalysis {
        let hand: Hand = "5H 5C JD 4S 6C KH".parse().expect("hand");
        DiscardAnalyzer::new(AnalyzerConfig::default())
            .analyze(&hand)
            .expect("analysis")
    }

    #[test]
    fn text_report_lists_hand_then_discards() {
        let mut out = Vec::new();
        write_text(&mut out, &analysis()).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 17);
        assert_eq!(lines[0], "[ 5H 5C JD 4S 6C KH ]");
        assert_eq!(lines[1], "5H 5C [10.9 0.7 2..37] [-6.6 0.5 -28..3]");
        assert_eq!(lines[12], "JD KH [19.4 0.5 12..40] [11.5 0.2 -1..19]");
        assert_eq!(lines[16], "");
    }

    #[test]
    fn json_rows_flag_recommendations() {
        let mut out = Vec::new();
        write_jsonl(&mut out, "unit", &analysis()).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        let rows: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).expect("json row"))
            .collect();
        assert_eq!(rows.len(), 15);
        assert_eq!(rows[0]["run_id"], "unit");
        assert_eq!(rows[0]["hand"], "5H 5C JD 4S 6C KH");
        assert_eq!(rows[0]["cut_mode"], "fixed");
        assert_eq!(rows[0]["samples"], 15_180);
        assert_eq!(
            rows[0]["mine"]["tally"].as_array().map(Vec::len),
            Some(NUM_SCORES)
        );

        let picks: Vec<&str> = rows
            .iter()
            .filter(|row| row["dealer_pick"] == true)
            .filter_map(|row| row["discard"].as_str())
            .collect();
        assert_eq!(picks, vec!["JD KH"]);
    }

    #[test]
    fn markdown_lists_every_discard_and_picks() {
        let mut out = Vec::new();
        write_markdown(&mut out, &analysis()).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with("## Hand `5H 5C JD 4S 6C KH`"));
        assert_eq!(text.lines().filter(|l| l.starts_with("| ")).count(), 16);
        assert!(text.contains("- Dealer: discard **JD KH**, keep 5H 5C 4S 6C (mean 19.4)"));
        assert!(text.contains("- Pone: discard **JD KH**"));
    }

    #[test]
    fn weighted_stdev_uses_bucket_counts() {
        assert_eq!(weighted_stdev(&Tally::new()), 0.0);

        let mut tally = Tally::new();
        for score in [2, 4, 4, 4, 5, 5, 7, 9] {
            tally.increment(score).expect("in range");
        }
        assert!((weighted_stdev(&tally) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn distribution_table_covers_hand_scores() {
        let mut tally = Tally::new();
        for _ in 0..3 {
            tally.increment(0).expect("in range");
        }
        tally.increment(2).expect("in range");

        let mut out = Vec::new();
        write_distribution(&mut out, &tally).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 31);
        assert_eq!(lines[0], format!(" 0        3  75.00% {}", "|".repeat(300)));
        assert_eq!(lines[1], " 1        0   0.00% ");
        assert_eq!(lines[2], format!(" 2        1  25.00% {}", "|".repeat(100)));
        assert_eq!(lines[30], "          4 100.00%");
    }

    #[test]
    fn breakdown_lines() {
        let hand: Hand = "5H 5C 5S JD 5D".parse().expect("hand");
        let breakdown = score_breakdown(&hand, false).expect("score");
        let mut out = Vec::new();
        write_breakdown(&mut out, &hand, &breakdown, false).expect("write");
        write_breakdown(&mut out, &hand, &breakdown, true).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(
            text,
            "5H 5C 5S JD 5D: 29\n\
             5H 5C 5S JD 5D: 29 (fifteens 16, pairs 12, runs 0, flush 0, nobs 1)\n"
        );
    }
}
