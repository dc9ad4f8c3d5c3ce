pub mod cli;
pub mod core;
pub mod providers;
pub mod server;
pub mod service;

use crate::cli::query::Query;
use crate::core::config::AppConfig;
use crate::core::{CurrencySet, RateSource, Validators};
use crate::providers::NbpProvider;
use crate::service::RateService;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Serve,
    Query(Query),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Serve => serve(&config).await,
        AppCommand::Query(query) => {
            let service = build_service(&config).await?;
            cli::query::run(&service, query).await
        }
    }
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    match config_path {
        Some(path) => AppConfig::load_from_path(path),
        None => AppConfig::load(),
    }
}

/// Resolves the accepted currencies once: the configured list if present,
/// otherwise the provider's current table.
pub async fn load_currency_set(config: &AppConfig, source: &dyn RateSource) -> Result<CurrencySet> {
    let set = match &config.currencies {
        Some(codes) => CurrencySet::new(codes),
        None => {
            info!("Loading currency table from provider");
            let codes = source
                .fetch_currency_codes()
                .await
                .context("Failed to load currency table")?;
            CurrencySet::new(codes)
        }
    };
    anyhow::ensure!(!set.is_empty(), "No accepted currencies configured");
    debug!(count = set.len(), "Currency set ready");
    Ok(set)
}

pub async fn build_service(config: &AppConfig) -> Result<RateService> {
    let provider = Arc::new(NbpProvider::new(
        &config.provider.base_url,
        config.provider.timeout(),
    )?);
    let currencies = load_currency_set(config, &*provider).await?;
    let validators = Validators::new(Arc::new(currencies), config.validation.clone());
    Ok(RateService::new(validators, provider))
}

pub async fn serve(config: &AppConfig) -> Result<()> {
    let service = build_service(config).await?;
    let state = Arc::new(server::AppState { service });
    let router = server::app_router(state, &config.server);

    let listener = tokio::net::TcpListener::bind(config.server.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen_addr))?;
    info!("Listening on {}", config.server.listen_addr);
    axum::serve(listener, router).await?;
    Ok(())
}
