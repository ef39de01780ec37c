pub mod app;
pub mod events;
pub mod render;
pub mod state;

pub use app::{load_tab, DashboardApp, Exit};
pub use events::{EventHandler, TuiEvent};
pub use state::{Action, AppState, DashboardView, Tab, TabData};
