//! Domain Layer - KCloud dashboard business logic
//!
//! Содержит ТОЛЬКО чистую business logic без dependencies на:
//! - Infrastructure (databases, file systems, networks)
//! - Frameworks (web, CLI, UI)
//! - External systems (identity provider, HTTP outcalls)
//!
//! Принципы Clean Architecture:
//! - Entities: счета, привычки, ставки, задачи, планы, NNS
//! - RPC envelope: типизированные вызовы backend'а ([`Call`], [`Reply`])
//! - Business Rules: чистые функции без side effects (сводки, платежи, streak)

pub mod config;
pub mod entities;
pub mod errors;
pub mod rpc;
pub mod time;

// Re-export core domain types
pub use entities::{
    normalize_link, round_cents, BetStats, Bill, BillSummary, FullNnsData, Habit, HorseBet,
    HttpHeader, HttpResponsePayload, NnsMaturity, NnsState, Payment, Plan, Principal, Task,
    TaskPriority, TransformArgs, UserProfile, UserRole,
};
pub use errors::{DomainError, DomainResult};
pub use rpc::{Call, Reply, WireError};
pub use time::{format_time, now_nanos, Time};

/// Идентификатор записи (Nat на стороне backend'а)
pub type EntityId = u64;
