//! Server configuration
//!
//! Read from an optional TOML file, then overridden by the environment:
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 3001
//! database_url = "file:///var/lib/sourdough/db.json"
//! static_dir = "dist"
//! log_filter = "sourdough=debug"
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use tokio::net::TcpListener;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_LOG_FILTER: &str =
    "sourdough=info,sourdough_api=info,sourdough_core=info,tower_http=info";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Backend connection string; unset leaves the gateway unconfigured
    pub database_url: Option<String>,
    /// Built site to serve for every non-API path
    pub static_dir: Option<PathBuf>,
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            database_url: None,
            static_dir: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    server: ServerConfig,
}

impl ServerConfig {
    /// Parse the `[server]` table of a TOML document
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.server)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Apply `PORT`, `DATABASE_URL` and `STATIC_DIR` from `lookup`.
    ///
    /// Empty values are ignored.
    pub fn apply_overrides<F>(mut self, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = var("PORT") {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT '{}'", port))?;
        }
        if let Some(url) = var("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Some(dir) = var("STATIC_DIR") {
            self.static_dir = Some(PathBuf::from(dir));
        }
        Ok(self)
    }

    /// Bind the configured address. `host` may be a name (`localhost`), an
    /// IPv4 address or an IPv6 address with or without brackets.
    pub async fn bind(&self) -> anyhow::Result<TcpListener> {
        let host = self.host.trim_start_matches('[').trim_end_matches(']');
        TcpListener::bind((host, self.port))
            .await
            .with_context(|| format!("Failed to bind {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3001);
        assert_eq!(config.database_url, None);
        assert!(config.log_filter.contains("tower_http=info"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ServerConfig::from_toml(
            r#"
            [server]
            port = 8080
            static_dir = "dist"
            "#,
        )
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.static_dir, Some(PathBuf::from("dist")));
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);

        assert_eq!(ServerConfig::from_toml("").unwrap(), ServerConfig::default());
    }

    #[test]
    fn test_environment_overrides_file() {
        let config = ServerConfig::from_toml("[server]\nport = 8080\ndatabase_url = \"memory://\"")
            .unwrap()
            .apply_overrides(env(&[
                ("PORT", "9000"),
                ("DATABASE_URL", "file:///tmp/db.json"),
                ("STATIC_DIR", ""),
            ]))
            .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.database_url.as_deref(), Some("file:///tmp/db.json"));
        assert_eq!(config.static_dir, None);
    }

    #[test]
    fn test_bad_port_is_an_error() {
        let result = ServerConfig::default().apply_overrides(env(&[("PORT", "http")]));
        assert!(result.is_err());
        assert!(ServerConfig::from_toml("[server]\nport = \"x\"").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sourdough.toml");
        std::fs::write(&path, "[server]\nhost = \"127.0.0.1\"\n").unwrap();
        let config = ServerConfig::from_file(&path).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3001);

        assert!(ServerConfig::from_file(&dir.path().join("missing.toml")).is_err());
    }

    #[tokio::test]
    async fn test_bind_accepts_host_names() {
        for host in ["localhost", "127.0.0.1"] {
            let config = ServerConfig {
                host: host.to_string(),
                port: 0,
                ..ServerConfig::default()
            };
            let listener = config.bind().await.unwrap();
            assert!(listener.local_addr().unwrap().ip().is_loopback());
        }
    }
}
