//! HTTP server settings and the configuration object passed to the builder.
//!
//! [`ServerSettings`] is layered by OrthoConfig from CLI flags, `CONTACTS_*`
//! environment variables, and configuration files. Raw values stay strings
//! until the accessors parse them, so a bad value is reported with its
//! setting name rather than as a generic deserialisation failure.

use std::net::{AddrParseError, SocketAddr};
use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use serde::Deserialize;

use contacts::domain::{
    BirthdayWindowPolicy, EmailAddress, EmailValidationError, UnknownBirthdayWindowPolicy,
};
use contacts::outbound::persistence::{DbPool, PoolConfig};

pub(crate) const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub(crate) const DEFAULT_DEV_ACCOUNT_EMAIL: &str = "dev@contacts.local";

/// Failures turning raw settings into typed values.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` was not a socket address.
    #[error("invalid bind address `{value}`: {source}")]
    BindAddr {
        /// Configured value.
        value: String,
        /// Parser failure.
        #[source]
        source: AddrParseError,
    },
    /// `birthday_window` named an unknown policy.
    #[error(transparent)]
    BirthdayWindow(#[from] UnknownBirthdayWindowPolicy),
    /// `dev_account_email` was not a valid address.
    #[error("invalid dev account email: {0}")]
    DevAccountEmail(#[from] EmailValidationError),
    /// `pool_max_size` was zero.
    #[error("pool_max_size must be at least 1")]
    PoolSize,
}

/// Server settings loaded at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CONTACTS")]
pub struct ServerSettings {
    /// Socket address to listen on.
    #[ortho_config(default = String::from(DEFAULT_BIND_ADDR))]
    pub bind_addr: String,
    /// PostgreSQL URL. When absent the server keeps data in memory.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// `birth-year` (default) or `anniversary`.
    pub birthday_window: Option<String>,
    /// Email of the account seeded in memory mode.
    pub dev_account_email: Option<String>,
}

impl ServerSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr
            .parse()
            .map_err(|source| SettingsError::BindAddr {
                value: self.bind_addr.clone(),
                source,
            })
    }

    /// Selected birthday window policy.
    pub fn birthday_policy(&self) -> Result<BirthdayWindowPolicy, SettingsError> {
        self.birthday_window
            .as_deref()
            .map_or(Ok(BirthdayWindowPolicy::default()), str::parse)
            .map_err(SettingsError::from)
    }

    /// Pool settings when a non-empty database URL is configured.
    pub fn pool_config(&self) -> Result<Option<PoolConfig>, SettingsError> {
        let Some(url) = self
            .database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
        else {
            return Ok(None);
        };
        let mut config = PoolConfig::new(url);
        if let Some(size) = self.pool_max_size {
            if size == 0 {
                return Err(SettingsError::PoolSize);
            }
            config = config.with_max_size(size);
        }
        Ok(Some(config))
    }

    /// Email of the dev account seeded when running without a database.
    pub fn dev_account_email(&self) -> Result<EmailAddress, SettingsError> {
        let raw = self
            .dev_account_email
            .as_deref()
            .unwrap_or(DEFAULT_DEV_ACCOUNT_EMAIL);
        Ok(EmailAddress::new(raw)?)
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) birthday_policy: BirthdayWindowPolicy,
    pub(crate) clock: Arc<dyn Clock>,
}

impl ServerConfig {
    /// Construct a configuration that stores data in memory.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            birthday_policy: BirthdayWindowPolicy::default(),
            clock: Arc::new(DefaultClock),
        }
    }

    /// Attach a database connection pool for the Diesel adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Select the birthday window policy.
    #[must_use]
    pub fn with_birthday_policy(mut self, policy: BirthdayWindowPolicy) -> Self {
        self.birthday_policy = policy;
        self
    }

    /// Replace the clock used by the domain services.
    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "Clock injection is only used by tests")
    )]
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Whether the server persists to PostgreSQL.
    #[must_use]
    pub fn uses_database(&self) -> bool {
        self.db_pool.is_some()
    }
}
