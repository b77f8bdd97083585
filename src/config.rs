use std::path::PathBuf;

use anyhow::{Context, Result};

/// Server configuration loaded from environment variables.
///
/// A `.env` file in the working directory is read first if present. CLI flags
/// in `main` take precedence over anything set here.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Bind address (`STAFFING_HOST`, default `127.0.0.1`).
    pub host: String,
    /// Bind port (`STAFFING_PORT`, default `3000`).
    pub port: u16,
    /// SQLite file (`STAFFING_DATABASE_PATH`). `None` means the platform data directory.
    pub database_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            database_path: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let host = lookup("STAFFING_HOST").unwrap_or(defaults.host);

        let port = match lookup("STAFFING_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("STAFFING_PORT must be a valid port, got {raw:?}"))?,
            None => defaults.port,
        };

        let database_path = lookup("STAFFING_DATABASE_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            host,
            port,
            database_path,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<ServerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn reads_all_variables() {
        let config = config_from(&[
            ("STAFFING_HOST", "0.0.0.0"),
            ("STAFFING_PORT", "8080"),
            ("STAFFING_DATABASE_PATH", "/tmp/staffing.db"),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/staffing.db")));
    }

    #[test]
    fn rejects_invalid_port() {
        let err = config_from(&[("STAFFING_PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("STAFFING_PORT"));
    }

    #[test]
    fn blank_database_path_means_default() {
        let config = config_from(&[("STAFFING_DATABASE_PATH", "  ")]).unwrap();
        assert!(config.database_path.is_none());
    }
}
