//! Service settings loaded via OrthoConfig.
//!
//! Values come from `AUTHGATE_*` environment variables, command-line flags or
//! a configuration file. Session secrets are deliberately not part of this
//! struct; see [`crate::inbound::http::session_config`].

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Settings rejected at start-up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address '{value}': {message}")]
    BindAddr { value: String, message: String },
    /// `pool_max_size` must admit at least one connection.
    #[error("pool_max_size must be at least 1")]
    EmptyPool,
}

/// Process-wide configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "AUTHGATE")]
pub struct AppSettings {
    /// Listen address, e.g. `127.0.0.1:8080`.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; users are kept in memory when unset.
    pub database_url: Option<String>,
    /// bcrypt work factor (4 to 31).
    #[ortho_config(default = 10)]
    pub bcrypt_cost: u32,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub pool_max_size: u32,
}

impl AppSettings {
    /// Parsed listen address, defaulting to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// [`SettingsError::BindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: value.to_owned(),
            message: err.to_string(),
        })
    }

    /// Database URL, if persistence is configured.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// bcrypt cost, ten unless configured. Range is checked by the hasher.
    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }

    /// Pool size, ten unless configured.
    ///
    /// # Errors
    /// [`SettingsError::EmptyPool`] for zero.
    pub fn pool_max_size(&self) -> Result<u32, SettingsError> {
        match self.pool_max_size {
            0 => Err(SettingsError::EmptyPool),
            size => Ok(size),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    use super::*;
    use crate::outbound::crypto::DEFAULT_COST;

    const VARS: [&str; 4] = [
        "AUTHGATE_BIND_ADDR",
        "AUTHGATE_DATABASE_URL",
        "AUTHGATE_BCRYPT_COST",
        "AUTHGATE_POOL_MAX_SIZE",
    ];

    fn load() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("authgate")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load();
        assert_eq!(
            settings.bind_addr(),
            Ok(DEFAULT_BIND_ADDR.parse().expect("default parses"))
        );
        assert_eq!(settings.database_url(), None);
        assert_eq!(settings.bcrypt_cost(), DEFAULT_COST);
        assert_eq!(settings.pool_max_size(), Ok(10));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("AUTHGATE_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "AUTHGATE_DATABASE_URL",
                Some("postgres://localhost/authgate".to_owned()),
            ),
            ("AUTHGATE_BCRYPT_COST", Some("12".to_owned())),
            ("AUTHGATE_POOL_MAX_SIZE", Some("3".to_owned())),
        ]);

        let settings = load();
        assert_eq!(
            settings.bind_addr(),
            Ok("127.0.0.1:9000".parse().expect("addr parses"))
        );
        assert_eq!(settings.database_url(), Some("postgres://localhost/authgate"));
        assert_eq!(settings.bcrypt_cost(), 12);
        assert_eq!(settings.pool_max_size(), Ok(3));
    }

    #[rstest]
    fn blank_database_url_means_in_memory() {
        let settings = AppSettings {
            bind_addr: None,
            database_url: Some("  ".into()),
            bcrypt_cost: DEFAULT_COST,
            pool_max_size: 10,
        };
        assert_eq!(settings.database_url(), None);
    }

    #[rstest]
    #[case(Some("not-an-address".to_owned()), 10)]
    #[case(None, 0)]
    fn invalid_values_are_reported(#[case] bind_addr: Option<String>, #[case] pool_max_size: u32) {
        let settings = AppSettings {
            bind_addr,
            database_url: None,
            bcrypt_cost: DEFAULT_COST,
            pool_max_size,
        };
        assert!(settings.bind_addr().is_err() || settings.pool_max_size().is_err());
    }
}
