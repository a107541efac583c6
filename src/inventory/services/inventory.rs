//! Inventory orchestration with eager actor capture.

use crate::audit::TransactionActor;
use crate::inventory::{
    domain::{AuditOperation, NewWidget, Widget, WidgetId},
    ports::{WidgetRepository, WidgetRepositoryResult},
};
use std::future::Future;
use std::sync::Arc;

/// Widget inventory service.
///
/// Mutating methods resolve the acting user from
/// [`ActorContext`](crate::audit::ActorContext) when they are *called*, not
/// when the returned future is polled. A future created inside
/// `ActorContext::run_as("alice", ..)` is therefore attributed to `alice`
/// even if it is awaited after the scope has ended or on another thread.
pub struct InventoryService<R>
where
    R: WidgetRepository,
{
    repository: Arc<R>,
}

impl<R> Clone for InventoryService<R>
where
    R: WidgetRepository,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> InventoryService<R>
where
    R: WidgetRepository,
{
    /// Creates a new inventory service.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Inserts a widget attributed to the current actor.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the insert or actor binding fails.
    pub fn create(
        &self,
        widget: NewWidget,
    ) -> impl Future<Output = WidgetRepositoryResult<Widget>> + Send + use<R> {
        let actor = TransactionActor::from_context();
        let repository = Arc::clone(&self.repository);
        async move {
            let created = repository.insert(&widget, &actor).await?;
            tracing::info!(
                widget_id = %created.id(),
                operation = %AuditOperation::Insert,
                actor = %actor,
                "widget created"
            );
            Ok(created)
        }
    }

    /// Persists in-place changes attributed to the current actor.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetRepositoryError::NotFound`] when the widget no longer
    /// exists, or the repository error when persistence fails.
    ///
    /// [`WidgetRepositoryError::NotFound`]: crate::inventory::ports::WidgetRepositoryError::NotFound
    pub fn save(
        &self,
        widget: &Widget,
    ) -> impl Future<Output = WidgetRepositoryResult<()>> + Send + use<R> {
        let actor = TransactionActor::from_context();
        let repository = Arc::clone(&self.repository);
        let changed = widget.clone();
        async move {
            repository.update(&changed, &actor).await?;
            tracing::info!(
                widget_id = %changed.id(),
                operation = %AuditOperation::Update,
                actor = %actor,
                "widget updated"
            );
            Ok(())
        }
    }

    /// Deletes a widget attributed to the current actor.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetRepositoryError::NotFound`] when the widget does not
    /// exist, or the repository error when persistence fails.
    ///
    /// [`WidgetRepositoryError::NotFound`]: crate::inventory::ports::WidgetRepositoryError::NotFound
    pub fn delete(
        &self,
        id: WidgetId,
    ) -> impl Future<Output = WidgetRepositoryResult<()>> + Send + use<R> {
        let actor = TransactionActor::from_context();
        let repository = Arc::clone(&self.repository);
        async move {
            repository.delete(id, &actor).await?;
            tracing::info!(
                widget_id = %id,
                operation = %AuditOperation::Delete,
                actor = %actor,
                "widget deleted"
            );
            Ok(())
        }
    }

    /// Finds a widget by identifier.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the lookup fails.
    pub async fn find(&self, id: WidgetId) -> WidgetRepositoryResult<Option<Widget>> {
        self.repository.find_by_id(id).await
    }

    /// Returns the number of stored widgets.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the count fails.
    pub async fn count(&self) -> WidgetRepositoryResult<u64> {
        self.repository.count().await
    }
}
