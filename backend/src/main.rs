//! Backend entry-point: loads settings, prepares persistence and serves the
//! REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use pawsplay::inbound::http::health::HealthState;
use pawsplay::inbound::http::session_config::BuildMode;
use pawsplay::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{AppSettings, AvatarBackend, ServerConfig, create_server, session_settings};

/// Apply migrations on a blocking thread, then open the async pool.
async fn prepare_database(database_url: &str) -> std::io::Result<DbPool> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .map_err(|err| std::io::Error::other(format!("migration task failed: {err}")))?
        .map_err(std::io::Error::other)?;
    info!(applied, "database migrations complete");

    DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(std::io::Error::other)
}

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

    let settings = AppSettings::load().map_err(|err| std::io::Error::other(err.to_string()))?;
    let mode = BuildMode::from_debug_assertions();
    let session = session_settings(mode)?;
    let bind_addr = settings.bind_addr()?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    )
    .with_avatars(AvatarBackend::from_settings(&settings)?)
    .with_max_avatar_bytes(settings.max_avatar_bytes())
    .with_fixture_login(settings.fixture_login(mode));

    match settings.database_url() {
        Some(url) => config = config.with_db_pool(prepare_database(url).await?),
        None => warn!("PAWSPLAY_DATABASE_URL unset; serving in-memory fixtures"),
    }

    let health_state = web::Data::new(HealthState::new(config.store_backend()));
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "pawsplay listening");
    server.await
}
