//! Service entry-point: loads settings, picks the user store and serves the
//! auth routes.

mod server;

use std::sync::Arc;

use mockable::{DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use authgate::domain::ports::UserRepository;
use authgate::domain::{AccessGate, CredentialService};
use authgate::inbound::http::session::SessionManager;
use authgate::inbound::http::session_config::{BuildMode, session_settings_from_env};
use authgate::inbound::http::state::HttpState;
use authgate::outbound::crypto::BcryptPasswordHasher;
use authgate::outbound::memory::InMemoryUserRepository;
use authgate::outbound::persistence::{
    DbPool, DieselUserRepository, PoolConfig, run_migrations,
};
use authgate::settings::AppSettings;
use server::{ServerConfig, create_server};

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {err}"))
}

async fn build_user_repository(
    settings: &AppSettings,
) -> std::io::Result<Arc<dyn UserRepository>> {
    let Some(database_url) = settings.database_url() else {
        warn!("no database configured; users are kept in memory and lost on restart");
        return Ok(Arc::new(InMemoryUserRepository::new()));
    };
    run_migrations(database_url)
        .await
        .map_err(|err| startup_error("database migration failed", err))?;
    let max_size = settings
        .pool_max_size()
        .map_err(|err| startup_error("invalid settings", err))?;
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(max_size))
        .await
        .map_err(|err| startup_error("database pool failed", err))?;
    Ok(Arc::new(DieselUserRepository::new(pool)))
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

    let settings = AppSettings::load().map_err(|err| startup_error("invalid settings", err))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| startup_error("invalid settings", err))?;

    let session_settings =
        session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
            .map_err(|err| startup_error("session configuration rejected", err))?;
    info!(
        fingerprint = %session_settings.fingerprint(),
        cookie_secure = session_settings.cookie_secure,
        "session key loaded"
    );

    let hasher = BcryptPasswordHasher::new(settings.bcrypt_cost())
        .map_err(|err| startup_error("invalid bcrypt cost", err))?;
    let users = build_user_repository(&settings).await?;

    let state = HttpState::new(
        CredentialService::new(users.clone(), Arc::new(hasher)),
        AccessGate::new(users),
        SessionManager::new(session_settings, Arc::new(DefaultClock)),
    );
    create_server(ServerConfig::new(state, bind_addr))?.await
}
