use crate::util;
use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use client::tabs::planning::{new_plan, PlanEditor};
use client::Dashboard;
use colored::*;
use domain::config::DashboardConfig;
use domain::{format_time, EntityId, Plan};

#[derive(Debug, Args)]
pub struct PlansCommand {
    #[command(subcommand)]
    command: PlansSubcommand,
}

#[derive(Debug, Subcommand)]
enum PlansSubcommand {
    /// Все планы
    List,
    /// Показать план с заметками и ссылками
    Show { id: EntityId },
    /// Создать план
    Add { title: String },
    /// Заменить заметки плана
    Note { id: EntityId, notes: String },
    /// Добавить ссылку (без схемы будет https://)
    Link { id: EntityId, url: String },
    /// Убрать ссылку по номеру из `plans show`
    Unlink { id: EntityId, index: usize },
    /// Удалить план
    Rm { id: EntityId },
}

impl PlansCommand {
    pub async fn execute(self, config: &DashboardConfig) -> Result<()> {
        let dashboard = util::connect(config)?;

        match self.command {
            PlansSubcommand::List => {
                let plans = dashboard.plans().await?;
                println!(
                    "{} {}",
                    "✓".green(),
                    format!("Plans: {}", plans.len()).bold()
                );
                for plan in &plans {
                    println!(
                        "- {} {} ({} links, {})",
                        plan.id,
                        plan.title.bold(),
                        plan.links.len(),
                        format_time(plan.timestamp)
                    );
                }
            }
            PlansSubcommand::Show { id } => {
                let plan = find_plan(&dashboard, id).await?;
                print_plan(&plan);
            }
            PlansSubcommand::Add { title } => {
                let created = dashboard.add_plan(new_plan(&title)?).await?;
                util::success(format!("Plan #{} created: {}", created.id, created.title.bold()));
            }
            PlansSubcommand::Note { id, notes } => {
                let plan = find_plan(&dashboard, id).await?;
                let mut editor = PlanEditor::open(&plan);
                editor.notes = notes;
                save(&dashboard, &plan, &editor).await?;
            }
            PlansSubcommand::Link { id, url } => {
                let plan = find_plan(&dashboard, id).await?;
                let mut editor = PlanEditor::open(&plan);
                editor.new_link = url;
                if editor.add_link().is_none() {
                    anyhow::bail!("Please enter a link");
                }
                save(&dashboard, &plan, &editor).await?;
            }
            PlansSubcommand::Unlink { id, index } => {
                let plan = find_plan(&dashboard, id).await?;
                let mut editor = PlanEditor::open(&plan);
                // номера в выводе начинаются с 1
                let removed = index
                    .checked_sub(1)
                    .and_then(|i| editor.remove_link(i))
                    .ok_or_else(|| anyhow!("Plan #{id} has no link #{index}"))?;
                save(&dashboard, &plan, &editor).await?;
                println!("  removed {}", removed.dimmed());
            }
            PlansSubcommand::Rm { id } => {
                dashboard.delete_plan(id).await?;
                util::success(format!("Plan #{id} deleted"));
            }
        }

        Ok(())
    }
}

async fn find_plan(dashboard: &Dashboard, id: EntityId) -> Result<Plan> {
    dashboard
        .plans()
        .await?
        .into_iter()
        .find(|plan| plan.id == id)
        .ok_or_else(|| anyhow!("Plan #{id} not found"))
}

async fn save(dashboard: &Dashboard, saved: &Plan, editor: &PlanEditor) -> Result<()> {
    if !editor.is_dirty(saved) {
        println!("{} Nothing changed", "•".yellow());
        return Ok(());
    }
    let plan = dashboard.update_plan(editor.plan_id, editor.to_plan()).await?;
    util::success(format!("Plan {} saved", plan.title.bold()));
    Ok(())
}

fn print_plan(plan: &Plan) {
    println!("{} {}", plan.title.bold(), format!("#{}", plan.id).dimmed());
    println!("updated: {}", format_time(plan.timestamp));
    if plan.notes.is_empty() {
        println!("{}", "(no notes)".dimmed());
    } else {
        println!("\n{}\n", plan.notes);
    }
    for (i, link) in plan.links.iter().enumerate() {
        println!("  {}. {}", i + 1, link.cyan());
    }
}
