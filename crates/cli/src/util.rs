use anyhow::Result;
use client::Dashboard;
use colored::*;
use common::{init_structured_logging, LoggingConfig};
use domain::config::DashboardConfig;
use infrastructure::config::{ConfigLoader, ConfigSource, ConfigValidator};
use std::path::PathBuf;
use tracing::Level;

pub const ENV_PREFIX: &str = "KCLOUD_";

/// Файл (явный или найденный) + переменные окружения `KCLOUD_*`
pub async fn load_config(path: Option<PathBuf>) -> Result<(DashboardConfig, ConfigSource)> {
    let mut loader = ConfigLoader::new().with_env_prefix(ENV_PREFIX);
    if let Some(path) = path {
        loader = loader.with_path(path);
    }
    loader.load_with_source().await
}

/// В тихом режиме только предупреждения, чтобы не мешать выводу команд
pub fn init_logging(config: &DashboardConfig, quiet: bool) -> Result<()> {
    let mut logging = LoggingConfig::from_settings(&config.logging);
    if quiet {
        logging.level = Level::WARN;
    }
    init_structured_logging(logging)
}

/// Клиент дашборда поверх HTTP транспорта
pub fn connect(config: &DashboardConfig) -> Result<Dashboard> {
    ConfigValidator::new().validate(config)?;
    Ok(Dashboard::connect(&config.client)?)
}

pub fn success(message: impl AsRef<str>) {
    println!("{} {}", "✓".green(), message.as_ref());
}

pub fn heading(title: impl AsRef<str>) {
    println!("{}", title.as_ref().bold());
}

pub fn yes_no(value: bool) -> ColoredString {
    if value {
        "yes".green()
    } else {
        "no".yellow()
    }
}
