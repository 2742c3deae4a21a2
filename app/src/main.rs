use std::path::PathBuf;

use clap::Parser;
use common::{
    config::Settings,
    plot::{PlotOutcome, default_plots, render_plots},
    result::load_results,
};
use eyre::{Result, bail};
use tracing::{debug, error};
use tracing_subscriber::{
    EnvFilter,
    fmt::{layer, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Plot Google Benchmark results of the bitonic sorters
#[derive(Parser)]
struct Cli {
    /// YAML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Benchmark CSV, overrides the settings file
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Directory for the generated charts, overrides the settings file
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
    #[arg(short, long)]
    log: Vec<String>,
}

fn main() -> Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or("warn".to_owned());
    let args = Cli::parse();

    let mut env_filter = EnvFilter::new(format!("bench_plot={log_level}"));
    for log in &args.log {
        env_filter = env_filter.add_directive(log.parse()?);
    }
    if !args.log.iter().any(|x| x.starts_with("common")) {
        env_filter = env_filter.add_directive(format!("common={log_level}").parse()?);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            layer()
                .with_timer(ChronoLocal::new("%v %k:%M:%S %z".to_owned()))
                .compact(),
        )
        .init();

    let mut settings = match &args.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    if let Some(input) = args.input {
        settings.input = input;
    }
    if let Some(output_dir) = args.output_dir {
        settings.output_dir = output_dir;
    }
    debug!("Settings: {settings:#?}");

    let records = match load_results(&settings.input, &settings.threaded_variant) {
        Ok(records) => records,
        Err(err) if err.is_recoverable() => {
            error!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    debug!("Loaded {} benchmark records", records.len());

    let outcomes = render_plots(&default_plots(), &records, &settings)?;
    let failed = outcomes
        .iter()
        .filter(|x| matches!(x, PlotOutcome::Failed(_)))
        .count();
    if failed > 0 {
        bail!("{failed} plot(s) failed");
    }

    Ok(())
}
