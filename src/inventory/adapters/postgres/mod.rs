//! `PostgreSQL` adapters for widget persistence and audit queries.
//!
//! Change capture lives in the database: a row trigger on `widgets` writes
//! one `widgets_audit` row per mutated row, attributing it to the
//! transaction-local `app.current_user` setting bound by
//! [`attributed_transaction`].

mod audit_repository;
mod binder;
mod blocking;
mod migrations;
mod models;
mod schema;
mod widget_repository;

pub use audit_repository::PostgresWidgetAuditRepository;
pub use binder::{attributed_transaction, bind_actor};
pub use blocking::InventoryPgPool;
pub use migrations::install_schema;
pub use widget_repository::PostgresWidgetRepository;
