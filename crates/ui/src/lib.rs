//! Терминальный дашборд KCloud на ratatui

pub mod tui;

pub use tui::{DashboardApp, Exit};
