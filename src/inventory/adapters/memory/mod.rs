//! In-memory inventory store for tests and embedding.
//!
//! A single store implements both [`WidgetRepository`] and
//! [`WidgetAuditRepository`] so that committed widget mutations can produce
//! audit records the way the `PostgreSQL` trigger does.
//!
//! [`WidgetRepository`]: crate::inventory::ports::WidgetRepository
//! [`WidgetAuditRepository`]: crate::inventory::ports::WidgetAuditRepository

mod store;
mod unit_of_work;

pub use store::InMemoryInventoryStore;
