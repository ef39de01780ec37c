pub mod bets;
pub mod bills;
pub mod config;
pub mod habits;
pub mod nns;
pub mod plans;
pub mod profile;
pub mod role;
pub mod serve;
pub mod session;
pub mod tasks;
pub mod tui;

pub use bets::BetsCommand;
pub use bills::BillsCommand;
pub use config::ConfigCommand;
pub use habits::HabitsCommand;
pub use nns::NnsCommand;
pub use plans::PlansCommand;
pub use profile::ProfileCommand;
pub use role::RoleCommand;
pub use serve::ServeCommand;
pub use session::SessionCommand;
pub use tasks::TasksCommand;
