//! Infrastructure: загрузка и валидация конфигурации KCloud

pub mod config;
