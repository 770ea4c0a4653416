//! BizTime: companies, invoices and industries over PostgreSQL.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod response;
pub mod routes;
pub mod schema;
pub mod settings;
pub mod state;
pub mod store;

pub use error::{AppError, ConfigError};
pub use routes::build_app;
pub use schema::{ensure_database_exists, ensure_schema};
pub use settings::{Settings, StoreKind};
pub use state::AppState;
pub use store::{MemoryStore, PgStore, Store};
