//! Клиент дашборда KCloud
//!
//! - `Transport`: доставка RPC (HTTP или в процессе)
//! - `Session`: вход/выход с файлом сессии
//! - `Actor`: типизированные вызовы backend'а
//! - `QueryClient`: кэш запросов с повторами и инвалидацией по мутациям
//! - `Dashboard`: всё вместе для CLI и TUI
//! - `tabs`: формы и представления вкладок

pub mod actor;
pub mod dashboard;
pub mod mutation;
pub mod query;
pub mod retry;
pub mod session;
pub mod tabs;
pub mod transport;

pub use actor::Actor;
pub use dashboard::Dashboard;
pub use mutation::Mutation;
pub use query::{CacheStats, QueryCache, QueryClient, QueryKey};
pub use retry::RetryPolicy;
pub use session::Session;
pub use transport::{HttpTransport, Transport};
