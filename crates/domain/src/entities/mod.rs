//! Domain Entities - Core business objects
//!
//! Entities содержат identity и business rules.
//! Независимы от infrastructure concerns.
//!
//! Все сущности сериализуются в camelCase, как в RPC-интерфейсе backend'а.

mod bet;
mod bill;
mod habit;
mod nns;
mod outcall;
mod plan;
mod principal;
mod task;

pub use bet::{BetStats, HorseBet};
pub use bill::{round_cents, Bill, BillSummary, Payment};
pub use habit::Habit;
pub use nns::{FullNnsData, NnsMaturity, NnsState};
pub use outcall::{HttpHeader, HttpResponsePayload, TransformArgs};
pub use plan::{normalize_link, Plan};
pub use principal::{Principal, UserProfile, UserRole};
pub use task::{Task, TaskPriority};
