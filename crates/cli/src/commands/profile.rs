use crate::util;
use anyhow::Result;
use clap::{Args, Subcommand};
use colored::*;
use domain::config::DashboardConfig;
use domain::{Principal, UserProfile};

#[derive(Debug, Args)]
pub struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProfileSubcommand {
    /// Показать профиль (свой или другого пользователя)
    Show {
        #[arg(long)]
        user: Option<String>,
    },
    /// Сохранить свой профиль
    Set {
        name: String,
        #[arg(long)]
        email: Option<String>,
    },
}

impl ProfileCommand {
    pub async fn execute(self, config: &DashboardConfig) -> Result<()> {
        let dashboard = util::connect(config)?;

        match self.command {
            ProfileSubcommand::Show { user } => {
                let profile = match user {
                    Some(user) => dashboard.actor().get_user_profile(Principal::new(user)).await?,
                    None => dashboard.profile().await?,
                };
                match profile {
                    Some(profile) => print_profile(&profile),
                    None => println!("{} No profile saved yet", "•".yellow()),
                }
            }
            ProfileSubcommand::Set { name, email } => {
                if name.trim().is_empty() {
                    anyhow::bail!("Please enter a name");
                }
                let profile = UserProfile {
                    name: name.trim().to_string(),
                    email: email.filter(|e| !e.trim().is_empty()),
                };
                dashboard.save_profile(profile).await?;
                util::success("Profile saved");
            }
        }

        Ok(())
    }
}

fn print_profile(profile: &UserProfile) {
    println!("name:  {}", profile.name.bold());
    if let Some(email) = &profile.email {
        println!("email: {email}");
    }
}
