//! SQLite-хранилище KCloud
//!
//! Все записи принадлежат владельцу (`Principal`) и адресуются парой
//! `(owner, id)`. Идентификаторы выдаются хранилищем: `MAX(id) + 1` внутри
//! транзакции, отдельно для каждого владельца.

mod db_error;
mod rows;
mod schema;
mod store;

pub use store::{DashboardStore, DbPool};

/// Создать хранилище с настройками из `[storage]`
pub async fn open_store(config: &domain::config::StorageConfig) -> common::DashboardResult<DashboardStore> {
    DashboardStore::new(&config.db_path, config.pool_size).await
}
