use crate::util;
use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use client::tabs::habits::{bump, HabitCounts, HabitForm};
use colored::*;
use domain::config::DashboardConfig;
use domain::EntityId;
use prettytable::{row, Table};

#[derive(Debug, Args)]
pub struct HabitsCommand {
    #[command(subcommand)]
    command: HabitsSubcommand,
}

#[derive(Debug, Subcommand)]
enum HabitsSubcommand {
    /// Привычки с прогрессом и серией
    List,
    /// Добавить привычку с целью на день
    Add { name: String, goal: String },
    /// Отметить ещё один шаг (+1 к прогрессу)
    Bump { id: EntityId },
    /// Установить прогресс вручную
    Set { id: EntityId, progress: u64 },
}

impl HabitsCommand {
    pub async fn execute(self, config: &DashboardConfig) -> Result<()> {
        let dashboard = util::connect(config)?;

        match self.command {
            HabitsSubcommand::List => {
                let habits = dashboard.habits().await?;
                let counts = HabitCounts::from_habits(&habits);
                util::heading(format!(
                    "{} habits: {} active, {} goal reached",
                    counts.total, counts.active, counts.goal_reached
                ));
                if habits.is_empty() {
                    return Ok(());
                }

                let mut table = Table::new();
                table.add_row(row!["ID", "Habit", "Progress", "Done", "Streak"]);
                for habit in &habits {
                    table.add_row(row![
                        habit.id,
                        habit.name,
                        format!("{}/{}", habit.progress, habit.goal),
                        format!("{:.0}%", habit.completion_percent()),
                        habit.streak
                    ]);
                }
                table.printstd();
            }
            HabitsSubcommand::Add { name, goal } => {
                let habit = HabitForm { name, goal }.to_habit()?;
                let created = dashboard.add_habit(habit).await?;
                util::success(format!(
                    "Habit #{} added: {} (goal {})",
                    created.id,
                    created.name.bold(),
                    created.goal
                ));
            }
            HabitsSubcommand::Bump { id } => {
                let habit = dashboard
                    .habits()
                    .await?
                    .into_iter()
                    .find(|habit| habit.id == id)
                    .ok_or_else(|| anyhow!("Habit #{id} not found"))?;
                let (next, message) = bump(&habit)?;
                let saved = dashboard.update_habit_progress(id, next).await?;
                util::success(format!(
                    "{message} {} {}/{}, streak {}",
                    saved.name.bold(),
                    saved.progress,
                    saved.goal,
                    saved.streak
                ));
            }
            HabitsSubcommand::Set { id, progress } => {
                let saved = dashboard.update_habit_progress(id, progress).await?;
                util::success(format!(
                    "{} {}/{}",
                    saved.name.bold(),
                    saved.progress,
                    saved.goal
                ));
            }
        }

        Ok(())
    }
}
