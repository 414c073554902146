pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::catalog::ListQuery;
use crate::core::config::AppConfig;
use crate::providers::HttpFeedProvider;
use crate::store::FjallStore;
use anyhow::Result;
use tracing::{debug, info};

/// Operations exposed by the command line front-end.
#[derive(Debug, Clone)]
pub enum AppCommand {
    Refresh,
    List(ListQuery),
    Show(String),
    Delete(String),
    Status,
    Image,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("countrystat starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?.with_env_overrides(),
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let cache_dir = config.cache_path()?;
    match command {
        AppCommand::Refresh => {
            let store = open_store(&config)?;
            let feed = HttpFeedProvider::from_config(&config.providers)?;
            cli::refresh::run(&feed, &store, &cache_dir).await
        }
        AppCommand::List(query) => cli::countries::list(&open_store(&config)?, &query),
        AppCommand::Show(name) => cli::countries::show(&open_store(&config)?, &name),
        AppCommand::Delete(name) => cli::countries::delete(&open_store(&config)?, &name),
        AppCommand::Status => cli::status::status(&open_store(&config)?),
        AppCommand::Image => cli::status::image(&cache_dir),
    }
}

fn open_store(config: &AppConfig) -> Result<FjallStore> {
    Ok(FjallStore::open(&config.store_path()?)?)
}
