use anyhow::Result;
use clap::Parser;
use hescore_lookup::compare::{AggregateFunction, CompareAction, ResultsComparer};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "compare-results")]
#[command(about = "Diff a feature run's result tables against a base run", long_about = None)]
struct Cli {
    /// The path of the base folder
    #[arg(short, long = "base_folder", default_value = "workflow/tests/base_results")]
    base_folder: PathBuf,

    /// The path of the feature folder
    #[arg(short, long = "feature_folder", default_value = "workflow/tests/results")]
    feature_folder: PathBuf,

    /// The path of the export folder
    #[arg(short, long = "export_folder", default_value = "workflow/tests/comparisons")]
    export_folder: PathBuf,

    /// The comparison to run (repeatable)
    #[arg(short, long = "actions", value_enum)]
    actions: Vec<CompareAction>,

    /// Function to use for aggregating data
    #[arg(long = "aggregate_function", value_enum)]
    aggregate_function: Option<AggregateFunction>,

    /// Base file names to skip (repeatable)
    #[arg(short = 'x', long)]
    exclude: Vec<String>,
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let comparer = ResultsComparer::new(&cli.base_folder, &cli.feature_folder, &cli.export_folder)?;

    if cli.actions.is_empty() {
        tracing::info!("no actions given; nothing to compare");
    }
    for action in &cli.actions {
        match action {
            CompareAction::Results => {
                comparer.results(cli.aggregate_function, &cli.exclude)?;
            }
            CompareAction::Visualize => {
                comparer.visualize(&cli.exclude)?;
            }
        }
    }

    Ok(())
}
