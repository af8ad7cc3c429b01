use std::{env, num::ParseIntError, path::PathBuf};

use thiserror::Error;
use tracing::info;

const DATABASE_URL: &str = "DataBase_URL";
const PORT: &str = "PORT";
const DEFAULT_PORT: u16 = 5000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {0} is required")]
    Missing(&'static str),

    #[error("invalid {key} value {value:?}: {source}")]
    Invalid {
        key: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path of the sled database directory.
    pub database_url: String,
    pub port: u16,
}

/// Loads `.env` from the working directory or one of its parents into the
/// process environment. Variables that are already set win. `Ok(None)` means
/// there was no file.
pub fn load_env_file() -> Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL)
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::Missing(DATABASE_URL))?;

        let port = match lookup(PORT) {
            Some(value) => value.parse().map_err(|source| ConfigError::Invalid {
                key: PORT,
                value,
                source,
            })?,
            None => {
                info!("{PORT} not set, using default: {DEFAULT_PORT}");
                DEFAULT_PORT
            }
        };

        Ok(Self { database_url, port })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn port_defaults_to_5000() {
        let config = Config::from_lookup(lookup(&[("DataBase_URL", "./db")])).unwrap();
        assert_eq!(
            config,
            Config {
                database_url: "./db".into(),
                port: 5000,
            }
        );
    }

    #[test]
    fn reads_port_from_environment() {
        let config =
            Config::from_lookup(lookup(&[("DataBase_URL", "./db"), ("PORT", "8080")])).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn database_url_is_required() {
        let err = Config::from_lookup(lookup(&[("PORT", "8080")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DataBase_URL")));
    }

    // The only test that touches the process environment.
    #[test]
    fn loads_from_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "DataBase_URL=./from-dotenv\nPORT=6123\n").unwrap();

        dotenvy::from_path(&path).unwrap();
        let config = Config::load().unwrap();
        if env::var("PORT").as_deref() == Ok("6123") {
            assert_eq!(config.port, 6123);
        }
        assert_eq!(config.database_url, env::var("DataBase_URL").unwrap());
        assert!(!config.database_url.is_empty());
    }

    #[test]
    fn rejects_invalid_port() {
        let err = Config::from_lookup(lookup(&[("DataBase_URL", "./db"), ("PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }
}
