use anyhow::Result;
use backend::DashboardService;
use clap::Args;
use domain::config::DashboardConfig;
use infrastructure::config::ConfigValidator;
use server::State;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Адрес для прослушивания (перекрывает server.host)
    #[arg(long)]
    host: Option<String>,

    /// Порт (перекрывает server.port)
    #[arg(long)]
    port: Option<u16>,

    /// Файл базы данных (перекрывает storage.db_path)
    #[arg(long)]
    db: Option<PathBuf>,
}

impl ServeCommand {
    pub async fn execute(self, config: &DashboardConfig) -> Result<()> {
        let mut config = config.clone();
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(db) = self.db {
            config.storage.db_path = db;
        }
        ConfigValidator::new().validate(&config)?;

        let service = DashboardService::from_config(&config).await?;
        info!(
            profile = config.profile.name(),
            db = %config.storage.db_path.display(),
            "Dashboard service ready"
        );

        server::start_server(State::new(service), &config.server).await?;
        Ok(())
    }
}
