//! Port contracts for widget persistence and audit queries.

mod audit_repository;
mod widget_repository;

pub use audit_repository::{AuditRepositoryError, AuditRepositoryResult, WidgetAuditRepository};
#[cfg(test)]
pub(crate) use widget_repository::MockWidgetRepository;
pub use widget_repository::{WidgetRepository, WidgetRepositoryError, WidgetRepositoryResult};
