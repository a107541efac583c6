//! Read-only port over the widget audit trail.

use crate::inventory::domain::{AuditOperation, WidgetAudit, WidgetId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for audit queries.
pub type AuditRepositoryResult<T> = Result<T, AuditRepositoryError>;

/// Query contract for the append-only audit trail.
///
/// Lists are ordered most recent first: by `changed_at` descending, then by
/// audit identifier descending. The port has no write operations; records
/// are produced only by change capture on committed mutations.
#[async_trait]
pub trait WidgetAuditRepository: Send + Sync {
    /// Returns every record for a widget.
    async fn list_by_widget(&self, widget_id: WidgetId) -> AuditRepositoryResult<Vec<WidgetAudit>>;

    /// Returns every record of the given operation kind.
    async fn list_by_operation(
        &self,
        operation: AuditOperation,
    ) -> AuditRepositoryResult<Vec<WidgetAudit>>;

    /// Returns records written strictly after `instant`.
    async fn list_changed_after(
        &self,
        instant: DateTime<Utc>,
    ) -> AuditRepositoryResult<Vec<WidgetAudit>>;

    /// Returns records for a widget restricted to one operation kind.
    async fn list_by_widget_and_operation(
        &self,
        widget_id: WidgetId,
        operation: AuditOperation,
    ) -> AuditRepositoryResult<Vec<WidgetAudit>>;

    /// Counts records of the given operation kind across all widgets.
    async fn count_by_operation(&self, operation: AuditOperation) -> AuditRepositoryResult<u64>;

    /// Returns every record.
    async fn list_all(&self) -> AuditRepositoryResult<Vec<WidgetAudit>>;

    /// Counts every record.
    async fn count(&self) -> AuditRepositoryResult<u64>;
}

/// Errors returned by audit query implementations.
#[derive(Debug, Clone, Error)]
pub enum AuditRepositoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AuditRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
