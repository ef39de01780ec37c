use crate::util;
use anyhow::Result;
use clap::Subcommand;
use colored::*;
use domain::config::DashboardConfig;
use domain::Principal;

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Войти под principal'ом, выданным identity provider'ом
    Login {
        #[arg(long)]
        principal: String,
    },
    /// Выйти и сбросить кэш
    Logout,
    /// Показать текущего пользователя и его роль
    Whoami {
        /// Не запрашивать роль у сервера
        #[arg(long)]
        offline: bool,
    },
}

impl SessionCommand {
    pub async fn execute(self, config: &DashboardConfig) -> Result<()> {
        let dashboard = util::connect(config)?;

        match self {
            SessionCommand::Login { principal } => {
                let principal = Principal::new(principal);
                dashboard.login(principal.clone())?;
                util::success(format!("Logged in as {}", principal.to_string().bold()));
            }
            SessionCommand::Logout => {
                dashboard.logout()?;
                util::success("Logged out");
            }
            SessionCommand::Whoami { offline } => match dashboard.session().principal() {
                None => println!("{} Not logged in", "✗".red()),
                Some(principal) => {
                    println!("principal: {}", principal.to_string().bold());
                    if !offline {
                        let role = dashboard.caller_role().await?;
                        println!("role: {}", role.to_string().cyan());
                    }
                }
            },
        }

        Ok(())
    }
}
