//! Widget inventory with an attributed audit trail.
//!
//! Every committed widget mutation produces exactly one audit record naming
//! the acting user that was in scope when the unit of work was requested.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: widgets and immutable audit records
//! - **Ports**: repository traits for widget mutations and audit queries
//! - **Adapters**: `PostgreSQL` (trigger-based change capture) and in-memory
//!
//! # Modules
//!
//! - [`audit`]: thread-scoped actor context and transaction attribution
//! - [`inventory`]: widget persistence and the audit query surface
//! - [`config`]: environment-driven database configuration

pub mod audit;
pub mod config;
pub mod inventory;
