use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crib_advisor::config::{AdvisorConfig, ResolvedOutputs};
use crib_advisor::logging::init_logging;
use crib_advisor::report::{self, ReportFormat};
use crib_advisor::runner::AdvisorRunner;
use crib_core::analysis::CutMode;
use crib_core::distribution::{full_deck_distribution, hand_count};
use crib_core::model::{DECK_SIZE, Hand};
use crib_core::scoring::{SCORED_HAND_SIZE, score_breakdown};

/// Cribbage hand scorer and discard advisor.
#[derive(Debug, Parser)]
#[command(
    name = "crib-advisor",
    author,
    version,
    about = "Scores cribbage hands and ranks every discard of a dealt hand"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate all fifteen discards of each dealt six-card hand.
    Analyze(AnalyzeArgs),
    /// Score five-card hands; the last card is the cut.
    Score(ScoreArgs),
    /// Print how often each score occurs over every hand of the full deck.
    Distribution(DistributionArgs),
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    /// Dealt hands such as "5H 5C JD 4S 6C KH"; added after any hands from the config file.
    #[arg(value_name = "HAND")]
    hands: Vec<String>,

    /// Path to a YAML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// How the unseen cards are split between the crib and the cut.
    #[arg(long, value_enum, value_name = "MODE")]
    cut_mode: Option<CutModeArg>,

    /// Evaluate discards in parallel.
    #[arg(long)]
    parallel: bool,

    /// Report format.
    #[arg(long, value_enum, value_name = "FORMAT")]
    format: Option<ReportFormat>,

    /// Write the report to this file instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Render a score histogram per hand into this directory.
    #[arg(long, value_name = "DIR")]
    plots_dir: Option<String>,

    /// Write structured JSON telemetry next to the report.
    #[arg(long)]
    log_structured: bool,

    /// Exit after validating the configuration and hands (no analysis is run).
    #[arg(long)]
    validate_only: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CutModeArg {
    Fixed,
    Every,
}

impl From<CutModeArg> for CutMode {
    fn from(arg: CutModeArg) -> Self {
        match arg {
            CutModeArg::Fixed => CutMode::Fixed,
            CutModeArg::Every => CutMode::Every,
        }
    }
}

#[derive(Debug, Args)]
struct ScoreArgs {
    /// Five-card hands such as "5H 5C 5S JD 5D".
    #[arg(value_name = "HAND", required = true)]
    hands: Vec<String>,

    /// Score as a crib (flush needs all five cards).
    #[arg(long)]
    crib: bool,

    /// Show the score of each category.
    #[arg(long)]
    breakdown: bool,
}

#[derive(Debug, Args)]
struct DistributionArgs {
    /// Score every hand as a crib.
    #[arg(long)]
    crib: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Analyze(args) => analyze(args),
        Command::Score(args) => score(args),
        Command::Distribution(args) => distribution(args),
    }
}

fn analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let mut config = match args.config.as_ref() {
        Some(path) => AdvisorConfig::from_path(path)?,
        None => AdvisorConfig::default(),
    };

    config.hands.extend(args.hands);

    if let Some(run_id) = args.run_id {
        config.run_id = run_id;
    }

    if let Some(cut_mode) = args.cut_mode {
        config.analysis.cut_mode = cut_mode.into();
    }

    if args.parallel {
        config.analysis.parallel = true;
    }

    if let Some(format) = args.format {
        config.output.format = format;
    }

    if let Some(output) = args.output {
        config.output.path = Some(output);
    }

    if let Some(plots_dir) = args.plots_dir {
        config.output.plots_dir = Some(plots_dir);
    }

    if args.log_structured {
        config.logging.enable_structured = true;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let hand_count = config.hands.len();

    eprintln!(
        "Loaded configuration '{run_id}' with {hand_count} hand{} (cut mode {}, {})",
        if hand_count == 1 { "" } else { "s" },
        config.analysis.cut_mode.as_str(),
        if config.analysis.parallel {
            "parallel"
        } else {
            "sequential"
        }
    );

    let logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = AdvisorRunner::new(config, outputs)?;

    if args.validate_only {
        eprintln!("Validation-only mode: analysis skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    eprintln!(
        "Analysis complete for '{run_id}': {} hands, {} discards evaluated",
        summary.hands_analyzed, summary.discards_evaluated
    );
    for pick in &summary.recommendations {
        eprintln!(
            "  {}: dealer discards {}, pone discards {}",
            pick.hand,
            pick.dealer.as_deref().unwrap_or("-"),
            pick.pone.as_deref().unwrap_or("-")
        );
    }
    if let Some(path) = summary.report_path.as_ref() {
        eprintln!("Report: {}", path.display());
    }
    for path in &summary.plot_paths {
        eprintln!("Histogram: {}", path.display());
    }
    if let Some(guard) = logging_guard.as_ref() {
        eprintln!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}

fn score(args: ScoreArgs) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for text in &args.hands {
        let hand: Hand = text
            .parse()
            .with_context(|| format!("parsing hand '{text}'"))?;
        hand.require_len(SCORED_HAND_SIZE)
            .with_context(|| format!("scoring hand '{text}'"))?;
        let breakdown = score_breakdown(&hand, args.crib)?;
        report::write_breakdown(&mut out, &hand, &breakdown, args.breakdown)?;
    }
    out.flush()?;
    Ok(())
}

fn distribution(args: DistributionArgs) -> anyhow::Result<()> {
    eprintln!(
        "Scoring {} hands{}...",
        hand_count(DECK_SIZE),
        if args.crib { " as cribs" } else { "" }
    );
    let tally = full_deck_distribution(args.crib)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    report::write_distribution(&mut out, &tally)?;
    out.flush()?;
    Ok(())
}
