mod aggregate;
mod config;
mod convention;
mod error;
mod loader;
mod report;
mod scan;
mod table;
mod writer;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::{AggregateConfig, Overrides, Settings, DEFAULT_CONFIG_FILE};
use convention::{MethodFilter, Mode};
use report::{Reporter, TracingReporter};

/// Aggregate per-run benchmark results into one CSV table.
///
/// `main` mode reads `<network>_<label>_<method>_<runid>.json` files from a
/// flat directory; `hp_tune` mode walks `<method>/<settings>/<dataset>/<runid>/score.json`.
#[derive(Parser, Debug)]
#[command(name = "obnbench-aggregate", version, about)]
pub struct Cli {
    /// Which experiment layout to aggregate
    #[arg(short, long, value_enum)]
    mode: Mode,

    /// Results directory, or "auto" to infer it from the mode
    #[arg(short = 'p', long = "results_path", default_value = "auto")]
    results_path: String,

    /// Aggregate and print results, but do not save to disk
    #[arg(short = 'n', long = "dry_run")]
    dry_run: bool,

    /// Output directory (overrides config)
    #[arg(short, long = "output_path")]
    output_path: Option<PathBuf>,

    /// Methods to keep when aggregating (default: full configured roster)
    #[arg(long, num_args = 1..)]
    methods: Option<Vec<String>>,

    /// Log level (TRACE, DEBUG, INFO, WARNING, ERROR)
    #[arg(short = 'v', long = "log_level", default_value = "INFO")]
    log_level: String,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            mode: self.mode,
            results_path: self.results_path.clone(),
            output_path: self.output_path.clone(),
            methods: self.methods.clone(),
            dry_run: self.dry_run,
            log_level: self.log_level.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = AggregateConfig::load(&config_path, cli.config.is_some())?;
    let settings = Settings::resolve(cli.overrides(), &config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(settings.log_level.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .with_thread_ids(false)
        .init();

    tracing::debug!(?cli, "parsed CLI arguments");
    run(&settings, &TracingReporter)?;
    Ok(())
}

/// Aggregate according to `settings`, then write or report the result.
fn run(settings: &Settings, reporter: &dyn Reporter) -> Result<PathBuf> {
    reporter.info(&settings.to_string());
    reporter.info(&format!(
        "Raw results path to aggregate from: {}",
        settings.results_path.display()
    ));
    reporter.info(&format!(
        "Start aggregating results for methods: {}",
        settings.methods.join(", ")
    ));

    let filter = MethodFilter::new(settings.methods.iter().cloned());
    let frame = aggregate::aggregate(settings.mode, &settings.results_path, &filter, reporter)?;
    reporter.info(&format!("Aggregated results:\n{}", frame.preview(5)));

    let target = writer::write(
        frame,
        &settings.output_path,
        settings.mode,
        settings.dry_run,
        reporter,
    )?;
    Ok(target)
}
