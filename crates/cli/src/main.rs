use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod util;

use commands::{
    BetsCommand, BillsCommand, ConfigCommand, HabitsCommand, NnsCommand, PlansCommand,
    ProfileCommand, RoleCommand, ServeCommand, SessionCommand, TasksCommand,
};

#[derive(Parser)]
#[command(name = "kcloud")]
#[command(about = "KCloud - личный дашборд: NNS, счета, ставки, задачи, привычки и планы")]
#[command(version)]
struct Cli {
    /// Путь к файлу конфигурации (иначе kcloud.toml и ~/.config/kcloud)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Логи уровня из конфигурации вместо одних предупреждений
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Запустить RPC сервер
    Serve(ServeCommand),
    #[command(flatten)]
    Session(SessionCommand),
    /// Профиль текущего пользователя
    Profile(ProfileCommand),
    /// Роли и контроль доступа
    Role(RoleCommand),
    /// Стейкинг NNS и maturity
    Nns(NnsCommand),
    /// Счета и платежи
    Bills(BillsCommand),
    /// Ставки на скачки
    Bets(BetsCommand),
    /// To-Do список
    Tasks(TasksCommand),
    /// Трекер привычек
    Habits(HabitsCommand),
    /// Планы с заметками и ссылками
    Plans(PlansCommand),
    /// Интерактивный дашборд в терминале
    Tui,
    /// Работа с конфигурацией
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, source) = util::load_config(cli.config).await?;

    let quiet = !cli.verbose && !matches!(cli.command, Commands::Serve(_));
    util::init_logging(&config, quiet)?;

    match cli.command {
        Commands::Serve(cmd) => cmd.execute(&config).await,
        Commands::Session(cmd) => cmd.execute(&config).await,
        Commands::Profile(cmd) => cmd.execute(&config).await,
        Commands::Role(cmd) => cmd.execute(&config).await,
        Commands::Nns(cmd) => cmd.execute(&config).await,
        Commands::Bills(cmd) => cmd.execute(&config).await,
        Commands::Bets(cmd) => cmd.execute(&config).await,
        Commands::Tasks(cmd) => cmd.execute(&config).await,
        Commands::Habits(cmd) => cmd.execute(&config).await,
        Commands::Plans(cmd) => cmd.execute(&config).await,
        Commands::Tui => commands::tui::run(&config).await,
        Commands::Config(cmd) => cmd.execute(&config, &source).await,
    }
}
