use crate::util;
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use domain::config::DashboardConfig;
use infrastructure::config::{ConfigLoader, ConfigSource, ConfigValidator};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
enum ConfigSubcommand {
    /// Пример конфигурации (в stdout или в файл)
    #[command(alias = "gen")]
    Example {
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Перезаписать существующий файл
        #[arg(short, long)]
        force: bool,
    },
    /// Итоговая конфигурация с учётом профиля и KCLOUD_* переменных
    Show,
    /// Проверить конфигурацию
    #[command(alias = "check")]
    Validate,
}

impl ConfigCommand {
    pub async fn execute(self, config: &DashboardConfig, source: &ConfigSource) -> Result<()> {
        match self.command {
            ConfigSubcommand::Example { output, force } => {
                let example = ConfigLoader::generate_example_config();
                match output {
                    None => print!("{example}"),
                    Some(path) => {
                        if path.exists() && !force {
                            anyhow::bail!(
                                "{} already exists, use --force to overwrite",
                                path.display()
                            );
                        }
                        tokio::fs::write(&path, example).await?;
                        util::success(format!("Configuration written to {}", path.display()));
                    }
                }
            }
            ConfigSubcommand::Show => {
                let source = match source {
                    ConfigSource::File(path) => path.display().to_string(),
                    ConfigSource::Default => "defaults".to_string(),
                };
                println!("# profile: {}", config.profile.name());
                println!("# source: {source}");
                println!("{}", toml::to_string_pretty(config)?);
            }
            ConfigSubcommand::Validate => match ConfigValidator::new().validate(config) {
                Ok(()) => util::success("Configuration is valid"),
                Err(e) => {
                    println!("{} Configuration validation failed:", "✗".red());
                    println!("   {e}");
                    return Err(e);
                }
            },
        }

        Ok(())
    }
}
