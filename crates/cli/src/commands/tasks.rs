use crate::util;
use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use client::tabs::todo::{split_tasks, TaskForm};
use colored::*;
use domain::config::DashboardConfig;
use domain::{EntityId, Task, TaskPriority};

#[derive(Debug, Args)]
pub struct TasksCommand {
    #[command(subcommand)]
    command: TasksSubcommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PriorityArg {
    High,
    Medium,
    Low,
}

impl From<PriorityArg> for TaskPriority {
    fn from(value: PriorityArg) -> Self {
        match value {
            PriorityArg::High => TaskPriority::High,
            PriorityArg::Medium => TaskPriority::Medium,
            PriorityArg::Low => TaskPriority::Low,
        }
    }
}

#[derive(Debug, Subcommand)]
enum TasksSubcommand {
    /// Активные и выполненные задачи по приоритету
    List {
        /// Скрыть выполненные
        #[arg(long)]
        active: bool,
    },
    /// Добавить задачу
    Add {
        title: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_enum, default_value_t = PriorityArg::Medium)]
        priority: PriorityArg,
    },
    /// Отметить задачу выполненной
    Done { id: EntityId },
}

impl TasksCommand {
    pub async fn execute(self, config: &DashboardConfig) -> Result<()> {
        let dashboard = util::connect(config)?;

        match self.command {
            TasksSubcommand::List { active } => {
                let tasks = dashboard.tasks().await?;
                let (open, completed) = split_tasks(&tasks);

                println!(
                    "{} {}",
                    "☐".cyan(),
                    format!("Active tasks: {}", open.len()).bold()
                );
                for task in open {
                    print_task(task);
                }
                if !active {
                    println!(
                        "{} {}",
                        "✓".green(),
                        format!("Completed: {}", completed.len()).bold()
                    );
                    for task in completed {
                        print_task(task);
                    }
                }
            }
            TasksSubcommand::Add {
                title,
                category,
                description,
                priority,
            } => {
                let task = TaskForm {
                    title,
                    description,
                    category,
                    priority: priority.into(),
                }
                .to_task()?;
                let created = dashboard.add_task(task).await?;
                util::success(format!("Task #{} added: {}", created.id, created.title.bold()));
            }
            TasksSubcommand::Done { id } => {
                let task = dashboard.complete_task(id).await?;
                util::success(format!("Completed: {}", task.title.bold()));
            }
        }

        Ok(())
    }
}

fn print_task(task: &Task) {
    let priority = match task.priority() {
        TaskPriority::High => task.priority_label().red(),
        TaskPriority::Medium => task.priority_label().yellow(),
        TaskPriority::Low => task.priority_label().normal(),
    };
    println!("- {} {} [{}] ({})", task.id, task.title.bold(), priority, task.category);
    if !task.description.is_empty() {
        println!("    {}", task.description.dimmed());
    }
}
