//! Backend entry point: loads settings, prepares storage and serves the API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::fingerprint::key_fingerprint;
use backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use backend::outbound::persistence::{DbPool, run_pending_migrations};
use server::{ServerConfig, ServerSettings, create_server};

async fn connect(settings: &ServerSettings, database_url: &str) -> Result<DbPool> {
    if settings.run_migrations {
        run_pending_migrations(database_url)
            .await
            .wrap_err("failed to apply database migrations")?;
    }
    DbPool::new(settings.pool_config(database_url))
        .await
        .wrap_err("failed to build database pool")
}

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

    let settings = ServerSettings::load().wrap_err("failed to load server settings")?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        cookie_secure = session.cookie_secure,
        "session key loaded"
    );

    let bind_addr = settings
        .bind_addr()
        .wrap_err("BLOG_BIND_ADDR is not a socket address")?;
    let mut config = ServerConfig::new(session, bind_addr);
    if let Some(database_url) = settings.database_url() {
        let pool = connect(&settings, database_url).await?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, "listening");
    server.await.wrap_err("server terminated abnormally")?;
    health_state.mark_unhealthy();
    Ok(())
}
