//! Scores the predictions of a named entity recognition model against a gold standard. Both
//! inputs are tab-separated files with the columns `filename`, `ann_id`, `label`, `start_span`,
//! `end_span` and `text`.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use spaneval::{evaluate_conf, read_annotations_from_path, EvalConfigBuilder, LabelFilter};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Plain text. The corpus metrics, or a table with `--per-document`.
    Text,
    /// The whole report as JSON.
    Json,
}

/// Evaluate NER model predictions against a gold standard.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the gold standard TSV file.
    #[arg(short, long)]
    gold_standard: PathBuf,
    /// Path to the predictions TSV file.
    #[arg(short, long)]
    predictions: PathBuf,
    /// Only evaluate this label. Can be given several times. All labels are evaluated by default.
    #[arg(short, long = "label")]
    labels: Option<Vec<String>>,
    /// Also print the metrics of every document.
    #[arg(long)]
    per_document: bool,
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// Compute the per-document metrics on several threads.
    #[arg(long)]
    parallel: bool,
    /// More logging. Repeat for debug output.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "spaneval=warn",
        1 => "spaneval=info",
        _ => "spaneval=debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let reference = read_annotations_from_path(&args.gold_standard).with_context(|| {
        format!(
            "loading the gold standard from {}",
            args.gold_standard.display()
        )
    })?;
    let predicted = read_annotations_from_path(&args.predictions).with_context(|| {
        format!("loading the predictions from {}", args.predictions.display())
    })?;
    tracing::info!(
        reference = reference.len(),
        predicted = predicted.len(),
        "loaded annotation records"
    );

    let config = EvalConfigBuilder::new()
        .label_filter(LabelFilter::from(args.labels))
        .parallel(args.parallel)
        .build();
    tracing::info!("{config}");
    let report = evaluate_conf(reference, predicted, config);
    for warning in report.dedup_warnings() {
        tracing::warn!(
            collection = %warning.collection,
            removed = warning.removed,
            conflicting = warning.conflicting,
            "{warning}"
        );
    }

    match args.format {
        Format::Text if args.per_document => print!("{report}"),
        Format::Text => print!("{}", report.summary()),
        Format::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serializing the report")?
        ),
    }
    Ok(())
}
