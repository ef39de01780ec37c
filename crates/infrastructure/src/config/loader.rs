use anyhow::{bail, Context, Result};
use domain::config::*;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::fs;
use tracing::{debug, info, warn};

/// Откуда пришла итоговая конфигурация
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Default,
}

pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    explicit_path: Option<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_paths: Self::default_config_paths(),
            explicit_path: None,
            env_prefix: "KCLOUD_".to_string(),
        }
    }

    /// Явный путь (`--config`): обязан существовать и имеет приоритет
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.explicit_path = Some(path);
        self
    }

    /// Заменить список путей поиска по умолчанию
    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.config_paths = paths;
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("kcloud.toml"), PathBuf::from("kcloud.json")];

        // User home directory
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".config").join("kcloud").join("config.toml"));
        }

        // System config directory
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("kcloud").join("config.toml");
            if !paths.contains(&path) {
                paths.push(path);
            }
        }

        paths
    }

    pub async fn load(&self) -> Result<DashboardConfig> {
        let (config, _) = self.load_with_source().await?;
        Ok(config)
    }

    pub async fn load_with_source(&self) -> Result<(DashboardConfig, ConfigSource)> {
        let (mut config, source) = self.load_base_config().await?;

        if let Some(profile) = self.detect_profile() {
            config.profile = profile;
        }
        debug!("Active profile: {}", config.profile.name());

        config = self.apply_env_overrides(config);
        config.apply_profile();

        Ok((config, source))
    }

    /// Профиль из `<PREFIX>ENV`, если задан
    pub fn detect_profile(&self) -> Option<Profile> {
        env::var(format!("{}ENV", self.env_prefix))
            .ok()
            .and_then(|value| Profile::from_str(&value).ok())
    }

    async fn load_base_config(&self) -> Result<(DashboardConfig, ConfigSource)> {
        if let Some(path) = &self.explicit_path {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            let config = self.load_file(path).await?;
            info!("Loaded configuration from: {}", path.display());
            return Ok((config, ConfigSource::File(path.clone())));
        }

        for path in &self.config_paths {
            if !path.exists() {
                continue;
            }
            match self.load_file(path).await {
                Ok(config) => {
                    info!("Loaded configuration from: {}", path.display());
                    return Ok((config, ConfigSource::File(path.clone())));
                }
                Err(e) => {
                    warn!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }

        debug!("No config file found, using defaults");
        Ok((DashboardConfig::default(), ConfigSource::Default))
    }

    async fn load_file(&self, path: &Path) -> Result<DashboardConfig> {
        let content = fs::read_to_string(path)
            .await
            .context("Failed to read config file")?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" | "" => toml::from_str(&content).context("Failed to parse TOML config"),
            "json" => serde_json::from_str(&content).context("Failed to parse JSON config"),
            _ => {
                // Try TOML first, then JSON
                toml::from_str(&content)
                    .or_else(|_| serde_json::from_str(&content))
                    .context("Failed to parse config file")
            }
        }
    }

    fn env_var(&self, name: &str) -> Option<String> {
        env::var(format!("{}{}", self.env_prefix, name)).ok()
    }

    fn apply_env_overrides(&self, mut config: DashboardConfig) -> DashboardConfig {
        // Server
        if let Some(host) = self.env_var("HOST") {
            config.server.host = host;
        }
        if let Some(port) = self.env_var("PORT").and_then(|v| v.parse().ok()) {
            config.server.port = port;
        }

        // Storage
        if let Some(db_path) = self.env_var("DB_PATH") {
            config.storage.db_path = PathBuf::from(db_path);
        }
        if let Some(size) = self.env_var("POOL_SIZE").and_then(|v| v.parse().ok()) {
            config.storage.pool_size = size;
        }

        // Client
        if let Some(endpoint) = self.env_var("ENDPOINT") {
            config.client.endpoint = endpoint;
        }
        if let Some(secs) = self.env_var("STALE_TIME_SECS").and_then(|v| v.parse().ok()) {
            config.client.stale_time_secs = secs;
        }
        if let Some(retries) = self.env_var("QUERY_RETRIES").and_then(|v| v.parse().ok()) {
            config.client.query_retries = retries;
        }
        if let Some(session_file) = self.env_var("SESSION_FILE") {
            config.client.session_file = Some(PathBuf::from(session_file));
        }

        // Outcall
        if let Some(secs) = self.env_var("OUTCALL_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            config.outcall.timeout_secs = secs;
        }

        // Logging
        if let Some(level) = self.env_var("LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(json) = self.env_var("LOG_JSON") {
            config.logging.json = matches!(json.to_lowercase().as_str(), "true" | "1" | "yes");
        }

        config
    }

    pub async fn save_config(&self, config: &DashboardConfig, path: &Path) -> Result<()> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("toml");

        let content = match extension {
            "json" => serde_json::to_string_pretty(config)?,
            _ => toml::to_string_pretty(config)?,
        };

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(path, content).await?;
        info!("Configuration saved to: {}", path.display());

        Ok(())
    }

    pub fn generate_example_config() -> String {
        let config = DashboardConfig {
            client: ClientConfig {
                session_file: Some(PathBuf::from(".kcloud/session.json")),
                ..ClientConfig::default()
            },
            ..DashboardConfig::default()
        };

        toml::to_string_pretty(&config)
            .unwrap_or_else(|_| "Failed to generate example config".to_string())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
