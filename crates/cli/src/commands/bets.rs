use crate::util;
use anyhow::Result;
use clap::{Args, Subcommand};
use client::tabs::bets::{BetForm, StatsView};
use client::tabs::format_currency;
use colored::*;
use domain::config::DashboardConfig;
use domain::format_time;
use prettytable::{row, Table};

#[derive(Debug, Args)]
pub struct BetsCommand {
    #[command(subcommand)]
    command: BetsSubcommand,
}

#[derive(Debug, Subcommand)]
enum BetsSubcommand {
    /// Все ставки
    List,
    /// Записать ставку
    Add {
        horse_name: String,
        amount: String,
        odds: String,
        /// Ставка выиграла
        #[arg(long)]
        win: bool,
    },
    /// Статистика: win rate и прибыль
    Stats,
}

impl BetsCommand {
    pub async fn execute(self, config: &DashboardConfig) -> Result<()> {
        let dashboard = util::connect(config)?;

        match self.command {
            BetsSubcommand::List => {
                let bets = dashboard.horse_bets().await?;
                if bets.is_empty() {
                    println!("No bets yet");
                    return Ok(());
                }

                let mut table = Table::new();
                table.add_row(row!["ID", "Horse", "Amount", "Odds", "Result", "Net", "Date"]);
                for bet in &bets {
                    let result = if bet.is_win { "win" } else { "loss" };
                    table.add_row(row![
                        bet.id,
                        bet.horse_name,
                        format_currency(bet.amount),
                        format!("{:.2}", bet.odds),
                        result,
                        format_currency(bet.net_result()),
                        format_time(bet.timestamp)
                    ]);
                }
                table.printstd();
            }
            BetsSubcommand::Add {
                horse_name,
                amount,
                odds,
                win,
            } => {
                let bet = BetForm {
                    horse_name,
                    amount,
                    odds,
                    is_win: win,
                }
                .to_bet()?;
                let created = dashboard.add_horse_bet(bet).await?;
                util::success(format!(
                    "Bet #{} on {} recorded",
                    created.id,
                    created.horse_name.bold()
                ));
            }
            BetsSubcommand::Stats => {
                let stats = dashboard.bet_stats().await?;
                let view = StatsView::from(&stats);
                let profit = if view.in_profit {
                    view.profit_loss.green()
                } else {
                    view.profit_loss.red()
                };

                println!("bets:        {}", view.total_bets);
                println!("record:      {}", view.record);
                println!("wagered:     {}", view.total_amount);
                println!("profit/loss: {profit}");
                println!("win rate:    {}", view.win_rate);
            }
        }

        Ok(())
    }
}
