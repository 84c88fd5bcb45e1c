//! Startup configuration for both services.
//!
//! Values come from an optional TOML file (`CONFIG_PATH`, default
//! `config.toml`) and are then overridden by environment variables. Each
//! service validates only the sections it needs, once, before serving.

use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "ServerConfig::rest_default")]
    pub server: ServerConfig,
    #[serde(default = "ServerConfig::graphql_default")]
    pub graphql: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub docstore: DocumentStoreConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::rest_default(),
            graphql: ServerConfig::graphql_default(),
            database: DatabaseConfig::default(),
            docstore: DocumentStoreConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl ServerConfig {
    fn rest_default() -> Self {
        Self { host: "0.0.0.0".into(), port: 8000, worker_threads: Some(4) }
    }

    fn graphql_default() -> Self {
        Self { host: "0.0.0.0".into(), port: 8080, worker_threads: Some(4) }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
    /// Startup connection attempts before giving up.
    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,
    /// Backoff unit; attempt `n` waits `n * retry_backoff_secs`.
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_secs: u64,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_connect_attempts() -> u32 { 5 }
fn default_retry_backoff() -> u64 { 1 }

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
            connect_attempts: default_connect_attempts(),
            retry_backoff_secs: default_retry_backoff(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentStoreConfig {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub users_collection: String,
    #[serde(default)]
    pub recipes_collection: String,
    #[serde(default = "default_doc_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_doc_ping_timeout")]
    pub ping_timeout_secs: u64,
    #[serde(default = "default_doc_disconnect_timeout")]
    pub disconnect_timeout_secs: u64,
    #[serde(default = "default_doc_query_timeout")]
    pub query_timeout_secs: u64,
}

fn default_doc_connect_timeout() -> u64 { 10 }
fn default_doc_ping_timeout() -> u64 { 5 }
fn default_doc_disconnect_timeout() -> u64 { 5 }
fn default_doc_query_timeout() -> u64 { 5 }

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self {
            uri: String::new(),
            database: String::new(),
            users_collection: String::new(),
            recipes_collection: String::new(),
            connect_timeout_secs: default_doc_connect_timeout(),
            ping_timeout_secs: default_doc_ping_timeout(),
            disconnect_timeout_secs: default_doc_disconnect_timeout(),
            query_timeout_secs: default_doc_query_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_origins() -> Vec<String> {
    vec!["http://localhost:4200".into(), "http://localhost:5173".into()]
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self { allowed_origins: default_origins() }
    }
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// File settings (if the file exists) overridden by the process environment.
    pub fn load() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path).map_err(|e| anyhow!("cannot read config file {path}: {e}"))?
        } else {
            AppConfig::default()
        };
        cfg.apply_env_with(common::env::optional_var)?;
        Ok(cfg)
    }

    /// Configuration for the REST service: server + relational database.
    pub fn load_for_rest() -> Result<Self> {
        let mut cfg = Self::load()?;
        cfg.server.normalize()?;
        cfg.database.validate()?;
        Ok(cfg)
    }

    /// Configuration for the GraphQL service: graphql server + document store.
    pub fn load_for_graphql() -> Result<Self> {
        let mut cfg = Self::load()?;
        cfg.graphql.normalize()?;
        cfg.docstore.validate()?;
        Ok(cfg)
    }

    /// Override file values with environment values. `get` returns `None` for
    /// unset variables.
    pub fn apply_env_with<F>(&mut self, get: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = get("SERVER_HOST") { self.server.host = v; }
        if let Some(v) = get("SERVER_PORT") { self.server.port = parse_port("SERVER_PORT", &v)?; }
        if let Some(v) = get("GRAPHQL_HOST") { self.graphql.host = v; }
        if let Some(v) = get("GRAPHQL_PORT") { self.graphql.port = parse_port("GRAPHQL_PORT", &v)?; }
        if let Some(v) = get("TOKIO_WORKER_THREADS") {
            let n = v.parse::<usize>().map_err(|e| anyhow!("TOKIO_WORKER_THREADS={v:?} is invalid: {e}"))?;
            self.server.worker_threads = Some(n);
            self.graphql.worker_threads = Some(n);
        }
        if let Some(v) = get("DATABASE_URL") { self.database.url = v; }
        if let Some(v) = get("MONGODB_URI") { self.docstore.uri = v; }
        if let Some(v) = get("MONGODB_DATABASE") { self.docstore.database = v; }
        if let Some(v) = get("MONGODB_COLLECTION_USERS") { self.docstore.users_collection = v; }
        if let Some(v) = get("MONGODB_COLLECTION_RECIPES") { self.docstore.recipes_collection = v; }
        if let Some(v) = get("CORS_ORIGINS") {
            self.cors.allowed_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        Ok(())
    }
}

fn parse_port(name: &str, raw: &str) -> Result<u16> {
    raw.parse::<u16>().map_err(|e| anyhow!("{name}={raw:?} is not a valid port: {e}"))
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database url is empty; set DATABASE_URL or database.url in config.toml"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
            return Err(anyhow!("database url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        if self.connect_attempts == 0 {
            return Err(anyhow!("database.connect_attempts must be >= 1"));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration { Duration::from_secs(self.connect_timeout_secs) }
    pub fn acquire_timeout(&self) -> Duration { Duration::from_secs(self.acquire_timeout_secs) }
    pub fn idle_timeout(&self) -> Duration { Duration::from_secs(self.idle_timeout_secs) }
    pub fn max_lifetime(&self) -> Duration { Duration::from_secs(self.max_lifetime_secs) }
    pub fn retry_backoff(&self) -> Duration { Duration::from_secs(self.retry_backoff_secs) }
}

impl DocumentStoreConfig {
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("MONGODB_URI", &self.uri),
            ("MONGODB_DATABASE", &self.database),
            ("MONGODB_COLLECTION_USERS", &self.users_collection),
            ("MONGODB_COLLECTION_RECIPES", &self.recipes_collection),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, v)| v.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(anyhow!("document store configuration incomplete; missing {}", missing.join(", ")));
        }
        if !(self.uri.starts_with("mongodb://") || self.uri.starts_with("mongodb+srv://")) {
            return Err(anyhow!("MONGODB_URI must start with mongodb:// or mongodb+srv://"));
        }
        if self.query_timeout_secs == 0 || self.ping_timeout_secs == 0 {
            return Err(anyhow!("document store timeouts must be positive seconds"));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration { Duration::from_secs(self.connect_timeout_secs) }
    pub fn ping_timeout(&self) -> Duration { Duration::from_secs(self.ping_timeout_secs) }
    pub fn disconnect_timeout(&self) -> Duration { Duration::from_secs(self.disconnect_timeout_secs) }
    pub fn query_timeout(&self) -> Duration { Duration::from_secs(self.query_timeout_secs) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_match_service_ports() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.graphql.port, 8080);
        assert_eq!(cfg.database.connect_attempts, 5);
        assert_eq!(cfg.docstore.query_timeout(), Duration::from_secs(5));
        assert!(cfg.docstore.disconnect_timeout() < cfg.docstore.connect_timeout());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg: AppConfig = toml::from_str("[database]\nurl = \"postgres://file/db\"\n").unwrap();
        cfg.apply_env_with(env_of(&[
            ("DATABASE_URL", "postgres://env/db"),
            ("SERVER_PORT", "9000"),
            ("CORS_ORIGINS", "http://a, http://b,"),
        ]))
        .unwrap();
        assert_eq!(cfg.database.url, "postgres://env/db");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.cors.allowed_origins, vec!["http://a", "http://b"]);
        // untouched sections keep their defaults
        assert_eq!(cfg.database.max_connections, 10);
    }

    #[test]
    fn invalid_port_is_reported() {
        let mut cfg = AppConfig::default();
        let err = cfg.apply_env_with(env_of(&[("GRAPHQL_PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("GRAPHQL_PORT"));
    }

    #[test]
    fn database_requires_url() {
        let db = DatabaseConfig::default();
        assert!(db.validate().is_err());
        let db = DatabaseConfig { url: "mysql://x".into(), ..DatabaseConfig::default() };
        assert!(db.validate().is_err());
        let db = DatabaseConfig { url: "postgres://u:p@localhost/haushalt".into(), ..DatabaseConfig::default() };
        assert!(db.validate().is_ok());
    }

    #[test]
    fn docstore_lists_every_missing_variable() {
        let ds = DocumentStoreConfig { uri: "mongodb://localhost:27017".into(), ..DocumentStoreConfig::default() };
        let msg = ds.validate().unwrap_err().to_string();
        assert!(msg.contains("MONGODB_DATABASE"));
        assert!(msg.contains("MONGODB_COLLECTION_USERS"));
        assert!(msg.contains("MONGODB_COLLECTION_RECIPES"));
        assert!(!msg.contains("MONGODB_URI"));
    }

    #[test]
    fn complete_docstore_config_validates() {
        let ds = DocumentStoreConfig {
            uri: "mongodb://localhost:27017".into(),
            database: "app".into(),
            users_collection: "users".into(),
            recipes_collection: "recipes".into(),
            ..DocumentStoreConfig::default()
        };
        assert!(ds.validate().is_ok());
    }
}
