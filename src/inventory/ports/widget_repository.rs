//! Repository port for widget persistence.

use crate::audit::TransactionActor;
use crate::inventory::domain::{NewWidget, Widget, WidgetId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for widget repository operations.
pub type WidgetRepositoryResult<T> = Result<T, WidgetRepositoryError>;

/// Widget persistence contract.
///
/// Every mutating operation runs in its own transaction, binds `actor` into
/// it before the mutation and, on commit, yields exactly one audit record.
/// Failed operations leave both the widget and audit stores unchanged.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WidgetRepository: Send + Sync {
    /// Inserts a new widget and returns it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetRepositoryError::MissingField`] when quantity or price
    /// is absent, or [`WidgetRepositoryError::ActorBinding`] when the actor
    /// cannot be bound to the transaction.
    async fn insert(
        &self,
        widget: &NewWidget,
        actor: &TransactionActor,
    ) -> WidgetRepositoryResult<Widget>;

    /// Persists in-place changes to an existing widget.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetRepositoryError::NotFound`] when the widget does not
    /// exist.
    async fn update(&self, widget: &Widget, actor: &TransactionActor)
    -> WidgetRepositoryResult<()>;

    /// Deletes a widget.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetRepositoryError::NotFound`] when the widget does not
    /// exist.
    async fn delete(&self, id: WidgetId, actor: &TransactionActor) -> WidgetRepositoryResult<()>;

    /// Finds a widget by identifier.
    ///
    /// Returns `None` when the widget does not exist.
    async fn find_by_id(&self, id: WidgetId) -> WidgetRepositoryResult<Option<Widget>>;

    /// Returns the number of stored widgets.
    async fn count(&self) -> WidgetRepositoryResult<u64>;
}

/// Errors returned by widget repository implementations.
#[derive(Debug, Clone, Error)]
pub enum WidgetRepositoryError {
    /// The widget was not found.
    #[error("widget not found: {0}")]
    NotFound(WidgetId),

    /// A required column was left empty.
    #[error("widget field '{0}' is required")]
    MissingField(String),

    /// The acting user could not be bound to the transaction.
    #[error("failed to bind acting user to transaction: {0}")]
    ActorBinding(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl WidgetRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Wraps an actor binding error.
    pub fn actor_binding(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::ActorBinding(Arc::new(err))
    }
}
