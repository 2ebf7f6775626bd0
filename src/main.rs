mod config;
mod scenario;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use config::{ConfigFallback, InspectorConfig, DEFAULT_CONFIG_PATH};
use scenario::{Scenario, ViewReport};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Build inventory views from a scenario file and print them", long_about = None)]
struct Args {
    /// Scenario TOML file; falls back to `default_scenario` from the config
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Inspector config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Print views as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    views: &'a [ViewReport],
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (config, fallback) = InspectorConfig::load_from_path(&args.config);

    // RUST_LOG wins over the configured filter.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match fallback {
        None => {}
        Some(ConfigFallback::NotFound(path)) => {
            if path != PathBuf::from(DEFAULT_CONFIG_PATH) {
                warn!("Config not found at {}. Using defaults", path.display());
            }
        }
        Some(ConfigFallback::Unreadable(err)) => {
            warn!("Failed to read {}: {err:#}. Using defaults", args.config.display());
        }
    }

    info!("Starting slotlens v{}", env!("CARGO_PKG_VERSION"));

    let scenario_path = args
        .scenario
        .or(config.default_scenario)
        .context("No scenario given (pass --scenario or set default_scenario in the config)")?;
    let reports = Scenario::load(&scenario_path)?.run()?;

    if args.json || config.json {
        let json = serde_json::to_string_pretty(&JsonOutput { views: &reports })
            .context("Failed to serialize views")?;
        println!("{json}");
    } else {
        print!("{}", scenario::render_text(&reports));
    }
    Ok(())
}
