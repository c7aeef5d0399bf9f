//! Contacts server entry-point: loads settings, wires storage, and serves the
//! REST API with OpenAPI docs in debug builds.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use contacts::inbound::http::health::HealthState;
use contacts::inbound::http::state::HttpState;
use contacts::outbound::persistence::DbPool;
use server::{ServerConfig, ServerSettings, build_http_state, create_server, seed_dev_account};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let (config, http_state) = prepare(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = %config.bind_addr, "starting contacts server");
    let server = create_server(health_state, http_state, config)?;
    server.await?;
    Ok(())
}

/// Build the server configuration and handler state, seeding the dev account
/// when no database is configured.
async fn prepare(settings: &ServerSettings) -> Result<(ServerConfig, web::Data<HttpState>)> {
    let config = build_config(settings).await?;
    let http_state = build_http_state(&config);

    if !config.uses_database() {
        let email = settings.dev_account_email()?;
        seed_dev_account(http_state.accounts.as_ref(), &email)
            .await
            .wrap_err("failed to seed the in-memory dev account")?;
    }
    Ok((config, http_state))
}

async fn build_config(settings: &ServerSettings) -> Result<ServerConfig> {
    let mut config = ServerConfig::new(settings.bind_addr()?)
        .with_birthday_policy(settings.birthday_policy()?);
    if let Some(pool_config) = settings.pool_config()? {
        let pool = DbPool::new(pool_config)
            .await
            .wrap_err("failed to create database pool")?;
        config = config.with_db_pool(pool);
    }
    Ok(config)
}
