use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::domain::role::AdminAllowList;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable `{0}` is not set")]
    Missing(&'static str),
    #[error("invalid value for `{key}`: `{value}`")]
    Invalid { key: &'static str, value: String },
}

/// Where order notifications are sent.
#[derive(Clone, Debug)]
pub struct NotifyConfig {
    pub url: String,
    pub token: String,
    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub admins: AdminAllowList,
    /// `None` disables notifications.
    pub notify: Option<NotifyConfig>,
}

impl AppConfig {
    /// Read the configuration from the process environment (after `.env`
    /// has been loaded by the caller).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match get("PORT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: v.clone(),
            })?,
            None => 8080,
        };

        let admins = AdminAllowList::new(
            get("ADMIN_EMAILS")
                .unwrap_or_default()
                .split(',')
                .map(str::to_string)
                .collect::<Vec<_>>(),
        );

        let notify = match get("NOTIFY_URL") {
            Some(url) => {
                let token = get("NOTIFY_TOKEN").ok_or(ConfigError::Missing("NOTIFY_TOKEN"))?;
                let timeout_secs = match get("NOTIFY_TIMEOUT_SECS") {
                    Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid {
                        key: "NOTIFY_TIMEOUT_SECS",
                        value: v.clone(),
                    })?,
                    None => 10,
                };
                Some(NotifyConfig {
                    url,
                    token,
                    timeout: Duration::from_secs(timeout_secs),
                })
            }
            None => None,
        };

        Ok(Self {
            database_url,
            host,
            port,
            admins,
            notify,
        })
    }
}
