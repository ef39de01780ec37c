use crate::util;
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use domain::config::DashboardConfig;
use domain::{Principal, UserRole};

#[derive(Debug, Args)]
pub struct RoleCommand {
    #[command(subcommand)]
    command: RoleSubcommand,
}

#[derive(Debug, Subcommand)]
enum RoleSubcommand {
    /// Роль текущего пользователя
    Show,
    /// Назначить роль (только admin)
    Assign {
        user: String,
        /// admin, user или guest
        role: UserRole,
    },
}

impl RoleCommand {
    pub async fn execute(self, config: &DashboardConfig) -> Result<()> {
        let dashboard = util::connect(config)?;

        match self.command {
            RoleSubcommand::Show => {
                let role = dashboard.caller_role().await?;
                let is_admin = dashboard.actor().is_caller_admin().await?;
                println!("role:  {}", role.to_string().cyan());
                println!("admin: {}", util::yes_no(is_admin));
            }
            RoleSubcommand::Assign { user, role } => {
                let user = Principal::new(user);
                dashboard.assign_role(user.clone(), role).await?;
                util::success(format!("Assigned {} to {}", role.to_string().bold(), user));
            }
        }

        Ok(())
    }
}
