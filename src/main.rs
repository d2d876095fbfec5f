use floodline::adapters::outbound::{init_combined_logger, init_console_logger};
use floodline::application::run_configured;
use floodline::common::ApplicationError;
use floodline::Config;
use std::error::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // set_global_default leaves the `log` facade to fast_log
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let path = std::env::args().nth(1).unwrap_or_else(|| "floodline.toml".to_string());
    let config = Config::load(&path).map_err(ApplicationError::Configuration)?;
    info!(%path, agents = config.simulation.agents.len(), "configuration loaded");

    let logger = match &config.logging.file {
        Some(file) => init_combined_logger(file, config.logging.level_filter()),
        None => init_console_logger(),
    };

    println!("{}", run_configured(&config, logger)?);
    Ok(())
}
