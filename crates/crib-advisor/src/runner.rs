use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crib_core::AppInfo;
use crib_core::analysis::{DEALT_HAND_SIZE, DiscardAnalyzer, HandAnalysis};
use crib_core::error::CribError;
use crib_core::model::Hand;
use thiserror::Error;
use tracing::{Level, event, warn};

use crate::config::{AdvisorConfig, ResolvedOutputs};
use crate::report::{self, ReportError, ReportFormat};

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub hand: String,
    pub dealer: Option<String>,
    pub pone: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub hands_analyzed: usize,
    pub discards_evaluated: usize,
    pub report_path: Option<PathBuf>,
    pub plot_paths: Vec<PathBuf>,
    pub recommendations: Vec<Recommendation>,
}

/// Analyzes every configured hand and writes the report.
pub struct AdvisorRunner {
    config: AdvisorConfig,
    outputs: ResolvedOutputs,
    hands: Vec<Hand>,
    analyzer: DiscardAnalyzer,
}

impl AdvisorRunner {
    /// Parses and checks every hand up front, so a bad hand fails the run before any analysis.
    pub fn new(config: AdvisorConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let hands = config
            .hands
            .iter()
            .map(|text| parse_dealt_hand(text))
            .collect::<Result<Vec<_>, _>>()?;
        let analyzer = DiscardAnalyzer::new(config.analyzer_config());

        Ok(Self {
            config,
            outputs,
            hands,
            analyzer,
        })
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    /// Writes to the configured report path, or stdout when none is set.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        match self.outputs.report.as_deref() {
            Some(path) => {
                ensure_parent(path.parent())?;
                let mut writer = BufWriter::new(File::create(path)?);
                self.run_to(&mut writer)
            }
            None => {
                let stdout = io::stdout();
                let mut writer = stdout.lock();
                self.run_to(&mut writer)
            }
        }
    }

    pub fn run_to<W: Write>(&self, writer: &mut W) -> Result<RunSummary, RunnerError> {
        let format = self.config.output.format;
        let run_id = self.config.run_id.as_str();
        let start = Instant::now();

        if format == ReportFormat::Markdown {
            writeln!(
                writer,
                "# Discard analysis `{run_id}`\n\nGenerated by {} {}\n",
                AppInfo::name(),
                AppInfo::version()
            )?;
        }

        let mut discards_evaluated = 0usize;
        let mut plot_paths = Vec::new();
        let mut recommendations = Vec::with_capacity(self.hands.len());

        for (index, hand) in self.hands.iter().enumerate() {
            let analysis = self
                .analyzer
                .analyze(hand)
                .map_err(|source| RunnerError::Analysis {
                    hand: hand.to_string(),
                    source,
                })?;
            report::write_analysis(writer, format, run_id, &analysis)?;
            discards_evaluated += analysis.outcomes.len();

            let recommendation = recommend(&analysis);
            event!(
                target: "crib_advisor::hand",
                Level::INFO,
                run_id = %run_id,
                hand_index = index as u32,
                hand = %hand,
                cut_mode = analysis.cut_mode.as_str(),
                dealer = recommendation.dealer.as_deref().unwrap_or("-"),
                pone = recommendation.pone.as_deref().unwrap_or("-")
            );
            recommendations.push(recommendation);

            if let Some(dir) = self.outputs.plots_dir.as_ref() {
                match report::render_histogram(dir, index, &analysis) {
                    Ok(path) => plot_paths.push(path),
                    Err(err) => {
                        warn!(target: "crib_advisor::plot", hand = %hand, error = %err, "plot skipped");
                        eprintln!("WARN: {}", err);
                    }
                }
            }
        }

        writer.flush()?;

        event!(
            target: "crib_advisor::run",
            Level::INFO,
            run_id = %run_id,
            hands = self.hands.len() as u32,
            discards = discards_evaluated as u32,
            format = format.as_str(),
            elapsed_ms = start.elapsed().as_millis() as u64
        );

        Ok(RunSummary {
            hands_analyzed: self.hands.len(),
            discards_evaluated,
            report_path: self.outputs.report.clone(),
            plot_paths,
            recommendations,
        })
    }
}

fn parse_dealt_hand(text: &str) -> Result<Hand, RunnerError> {
    let hand_error = |source| RunnerError::Hand {
        input: text.to_string(),
        source,
    };
    let hand: Hand = text.parse().map_err(hand_error)?;
    hand.require_len(DEALT_HAND_SIZE).map_err(hand_error)?;
    Ok(hand)
}

fn recommend(analysis: &HandAnalysis) -> Recommendation {
    Recommendation {
        hand: analysis.hand.to_string(),
        dealer: analysis
            .best_for_dealer()
            .map(|outcome| outcome.discard.to_string()),
        pone: analysis
            .best_for_pone()
            .map(|outcome| outcome.discard.to_string()),
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid hand '{input}': {source}")]
    Hand {
        input: String,
        #[source]
        source: CribError,
    },
    #[error("analysis of '{hand}' failed: {source}")]
    Analysis {
        hand: String,
        #[source]
        source: CribError,
    },
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("report error: {0}")]
    Report(#[from] ReportError),
}
