//! Lintel CLI entrypoint: scores a file of detection results and writes the
//! ranked deficiency report.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use mimalloc::MiMalloc;
use serde::Deserialize;

use lintel::config::Config;
use lintel::generation::GenAiClient;
use lintel::pipeline::RunReport;
use lintel::scoring::{DeficiencyRanker, DeficiencyRecord, ScoringConfig};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "lintel", about = "Rank loan-document compliance deficiencies")]
struct Cli {
    /// Detection results JSON: either `{"results": [...]}` or a bare array.
    input: PathBuf,

    /// Where to write the run report (stdout when omitted).
    #[arg(long)]
    output: Option<PathBuf>,

    /// How many top-priority deficiencies to include.
    #[arg(long, default_value_t = 10)]
    top_n: usize,

    /// Suppress the human-readable summary on stderr.
    #[arg(long)]
    quiet: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DetectionInput {
    Envelope { results: Vec<DeficiencyRecord> },
    Bare(Vec<DeficiencyRecord>),
}

impl DetectionInput {
    fn into_records(self) -> Vec<DeficiencyRecord> {
        match self {
            DetectionInput::Envelope { results } => results,
            DetectionInput::Bare(records) => records,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    config.validate()?;

    let scoring_config = match &config.scoring_config_path {
        Some(path) => ScoringConfig::from_path(path)
            .with_context(|| format!("loading scoring config from {}", path.display()))?,
        None => ScoringConfig::default(),
    };
    scoring_config.validate();

    let raw = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("reading detection results from {}", cli.input.display()))?;
    let records = serde_json::from_str::<DetectionInput>(&raw)
        .context("parsing detection results")?
        .into_records();

    tracing::info!(
        records = records.len(),
        model = %config.generation_model,
        top_n = cli.top_n,
        "scoring run starting"
    );

    let client = GenAiClient::new(config.generation_model.clone());
    let ranker = DeficiencyRanker::new(scoring_config, client);

    let started_at = Utc::now();
    let clock = Instant::now();
    let (report, usage) = ranker.score_all(records, cli.top_n).await;
    let run = RunReport::new(started_at, clock.elapsed(), usage, report);

    if !cli.quiet {
        print_summary(&run);
    }

    let serialized = serde_json::to_string_pretty(&run)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, serialized)
                .with_context(|| format!("writing report to {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => println!("{serialized}"),
    }

    Ok(())
}

fn print_summary(run: &RunReport) {
    let summary = &run.report.summary;
    eprintln!(
        "Scored {} deficiencies in {} ms ({} tokens)",
        summary.total_deficiencies_evaluated, run.latencies.scoring_ms, run.tokens.grand_total
    );
    eprintln!(
        "Priority distribution: {} high / {} medium / {} low",
        summary.high_priority_count, summary.medium_priority_count, summary.low_priority_count
    );
    for (i, item) in run.report.top_n.iter().enumerate() {
        eprintln!(
            "{:>2}. [{:.3}] {} (confidence {:.3})",
            i + 1,
            item.priority_score,
            item.condition_id,
            item.detection_confidence
        );
        if !item.actionable_instruction.is_empty() {
            eprintln!("    action: {}", item.actionable_instruction);
        }
    }
}
