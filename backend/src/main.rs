//! Backend entry-point: loads settings, prepares storage, seeds example data
//! and serves the REST API.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use blog_backend::domain::ExamplePostsOutcome;
use blog_backend::inbound::http::health::HealthState;
use blog_backend::outbound::persistence::{DbPool, PoolConfig, apply_migrations};
use blog_backend::settings::ServerSettings;
use server::{ServerConfig, create_server, seed_example_posts};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let request_timeout = settings.request_timeout().map_err(std::io::Error::other)?;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let mut config = ServerConfig::new(bind_addr, request_timeout, clock.clone());
    if let Some(database_url) = settings.database_url() {
        if settings.run_migrations() {
            run_migrations(database_url.to_owned()).await?;
        }
        let pool_config =
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections());
        let pool = DbPool::new(pool_config)
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    }
    info!(storage = config.storage().label(), "storage selected");

    if settings.seed_example_posts() {
        match seed_example_posts(config.storage(), &clock).await {
            Ok(ExamplePostsOutcome::Seeded { users, posts }) => {
                info!(users, posts, "example posts seeded");
            }
            Ok(ExamplePostsOutcome::Skipped { existing_posts }) => {
                info!(existing_posts, "example posts already present; seeding skipped");
            }
            Err(e) => return Err(std::io::Error::other(e)),
        }
    }

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %config.bind_addr(), "starting HTTP server");
    create_server(health_state, config)?.await
}

/// Apply embedded migrations on a blocking thread.
async fn run_migrations(database_url: String) -> std::io::Result<()> {
    let applied = tokio::task::spawn_blocking(move || apply_migrations(&database_url))
        .await
        .map_err(std::io::Error::other)?
        .map_err(std::io::Error::other)?;
    info!(applied, "migrations complete");
    Ok(())
}
