pub mod cli;
pub mod core;
pub mod dashboard;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{RateProvider, Selection};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Convert(Selection),
    Currencies,
    Watch(Selection),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxdash starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider: Arc<dyn RateProvider> =
        Arc::new(providers::FrankfurterProvider::new(&config.provider)?);

    match command {
        AppCommand::Convert(selection) => cli::convert::run(provider, selection).await,
        AppCommand::Currencies => cli::currencies::run(provider.as_ref()).await,
        AppCommand::Watch(selection) => cli::watch::run(provider, selection).await,
    }
}
