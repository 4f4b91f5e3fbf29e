use clap::Parser;
use elecciones_scraper::config::Config;
use elecciones_scraper::error::*;
use elecciones_scraper::run::run;
use elecciones_scraper::source::{DocumentSource, SnapshotSource};
use std::path::PathBuf;
use std::process;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "elecciones-scraper", about = "Appends a department's election results to a CSV file")]
struct Cli {
    /// TOML file overriding the built-in configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Extract from a saved results page instead of launching a browser
    #[arg(short, long)]
    snapshot: Option<PathBuf>
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into())
        )
        .init();

    let cli = Cli::parse();

    match actual_main(cli) {
        Ok(()) => info!("scraping completed successfully"),
        Err(e) => {
            for (i, cause) in e.iter().enumerate() {
                if i == 0 {
                    error!("{}", cause);
                } else {
                    error!("caused by: {}", cause);
                }
            }
            process::exit(1);
        }
    }
}

// We write a function so that we can return a `Result` and use `?`
fn actual_main(cli: Cli) -> Result<()> {
    let config = match cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default()
    };

    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    info!(department = config.department.name.as_str(), at = now.as_str(), "starting scrape");

    let source = document_source(&config, cli.snapshot)?;
    let record = run(&config, source.as_ref())?;

    let json = serde_json::to_string(&record)?;
    info!(record = %json, "extracted data");
    Ok(())
}

fn document_source(config: &Config, snapshot: Option<PathBuf>) -> Result<Box<dyn DocumentSource>> {
    match snapshot {
        Some(path) => Ok(Box::new(SnapshotSource::new(path))),
        None => live_source(config)
    }
}

#[cfg(feature = "browser")]
fn live_source(config: &Config) -> Result<Box<dyn DocumentSource>> {
    Ok(Box::new(elecciones_scraper::browser::ChromeSource::from_config(config)))
}

#[cfg(not(feature = "browser"))]
fn live_source(_: &Config) -> Result<Box<dyn DocumentSource>> {
    Err(ErrorKind::InvalidConfig("built without the `browser` feature; pass --snapshot".into()).into())
}
