//! Backend KCloud: все операции RPC-интерфейса от имени вызывающего principal'а
//!
//! - контроль доступа (первый зарегистрированный становится admin)
//! - бизнес-правила домена поверх SQLite хранилища
//! - LRU кэши сводок по владельцу
//! - поток событий о мутациях
//! - HTTP outcall за живыми данными NNS

mod cache;
mod dispatch;
pub mod events;
pub mod outcall;
pub mod service;

pub use events::{DashboardEvent, DashboardEventStream};
pub use outcall::{transform, HttpOutcall, ReqwestOutcall};
pub use service::DashboardService;

use common::DashboardResult;
use std::sync::Arc;

/// Сервис поверх базы в памяти; для тестов и встроенного режима
pub fn in_memory_service(outcall: Arc<dyn HttpOutcall>) -> DashboardResult<DashboardService> {
    let store = store::DashboardStore::in_memory()?;
    Ok(DashboardService::new(store, outcall, 64))
}
