//! Process settings from the environment (after `.env` is loaded by the binary).

use crate::error::ConfigError;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/biztime";
pub const DEFAULT_TEST_DATABASE_URL: &str = "postgres://localhost/biztime_test";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    pub ensure_schema: bool,
    pub store: StoreKind,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup. `APP_ENV=test` switches to
    /// `TEST_DATABASE_URL`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let testing = lookup("APP_ENV").as_deref() == Some("test");
        let database_url = if testing {
            lookup("TEST_DATABASE_URL").unwrap_or_else(|| DEFAULT_TEST_DATABASE_URL.into())
        } else {
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into())
        };
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(v) => match v.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "DB_MAX_CONNECTIONS",
                        value: v,
                    })
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };
        let ensure_schema = match lookup("ENSURE_SCHEMA") {
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid {
                key: "ENSURE_SCHEMA",
                value: v,
            })?,
            None => true,
        };
        let store = match lookup("STORE").as_deref().map(str::trim) {
            None | Some("postgres") => StoreKind::Postgres,
            Some("memory") => StoreKind::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "STORE",
                    value: other.to_string(),
                })
            }
        };
        Ok(Settings {
            database_url,
            bind_addr,
            max_connections,
            ensure_schema,
            store,
        })
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
