use crate::util;
use anyhow::Result;
use clap::{Args, Subcommand};
use client::tabs::nns::{MaturityForm, NnsView, StakeForm, PROJECTION_DAYS};
use colored::*;
use domain::config::DashboardConfig;
use prettytable::{row, Table};

#[derive(Debug, Args)]
pub struct NnsCommand {
    #[command(subcommand)]
    command: NnsSubcommand,
}

#[derive(Debug, Subcommand)]
enum NnsSubcommand {
    /// Стейк, maturity и прогноз
    Show,
    /// Обновить количество застейканных ICP
    Stake { staked_icp: String },
    /// Обновить накопленную maturity и доход в день
    Maturity {
        earned: String,
        earned_per_day: String,
    },
    /// Загрузить живые данные по URL через outcall сервера
    Fetch { url: String },
}

impl NnsCommand {
    pub async fn execute(self, config: &DashboardConfig) -> Result<()> {
        let dashboard = util::connect(config)?;

        match self.command {
            NnsSubcommand::Show => {
                let data = dashboard.full_nns_data().await?;
                let view = NnsView::from(&data);

                let mut table = Table::new();
                table.add_row(row!["Metric", "Value", "Updated"]);
                table.add_row(row!["Staked", view.staked, view.staked_updated]);
                table.add_row(row!["Maturity earned", view.earned, view.maturity_updated]);
                table.add_row(row!["Earned per day", view.earned_per_day, ""]);
                table.add_row(row![
                    format!("Projected ({PROJECTION_DAYS} days)"),
                    view.projected,
                    ""
                ]);
                table.printstd();
            }
            NnsSubcommand::Stake { staked_icp } => {
                let state = StakeForm { staked_icp }.to_state()?;
                let saved = dashboard.update_nns_state(state).await?;
                util::success(format!("Staked ICP updated: {}", saved.staked_icp));
            }
            NnsSubcommand::Maturity {
                earned,
                earned_per_day,
            } => {
                let maturity = MaturityForm {
                    earned,
                    earned_per_day,
                }
                .to_maturity()?;
                let saved = dashboard.update_nns_maturity(maturity).await?;
                util::success(format!(
                    "Maturity updated: {} earned, {} per day",
                    saved.earned, saved.earned_per_day
                ));
            }
            NnsSubcommand::Fetch { url } => {
                let body = dashboard.actor().fetch_nns_live_data(url).await?;
                if body.is_empty() {
                    println!("{} Empty response", "•".yellow());
                } else {
                    println!("{body}");
                }
            }
        }

        Ok(())
    }
}
