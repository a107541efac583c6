//! In-memory widget and audit storage.

use super::unit_of_work::{InventoryState, PendingChange, UnitOfWork};
use crate::audit::TransactionActor;
use crate::inventory::{
    domain::{
        AuditOperation, NewWidget, PersistedWidgetData, STORED_SUBSEC_DIGITS, Widget,
        WidgetAudit, WidgetId,
    },
    ports::{
        AuditRepositoryError, AuditRepositoryResult, WidgetAuditRepository, WidgetRepository,
        WidgetRepositoryError, WidgetRepositoryResult,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use mockable::{Clock, DefaultClock};
use std::cmp::Ordering;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory widget store with an attached audit trail.
///
/// Mutations run through a single transaction entry point that binds the
/// acting user before any change is staged; audit records are captured only
/// when the transaction commits.
pub struct InMemoryInventoryStore<C = DefaultClock> {
    state: Arc<RwLock<InventoryState>>,
    clock: Arc<C>,
}

#[derive(Debug, thiserror::Error)]
#[error("in-memory inventory lock poisoned: {0}")]
struct PoisonedStore(String);

impl InMemoryInventoryStore<DefaultClock> {
    /// Creates an empty store using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for InMemoryInventoryStore<DefaultClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Clone for InMemoryInventoryStore<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> fmt::Debug for InMemoryInventoryStore<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryInventoryStore")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<C> InMemoryInventoryStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty store stamping audit records with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InventoryState::new())),
            clock,
        }
    }

    /// Controls whether transactions can bind an acting user.
    ///
    /// While unavailable, every mutation fails with
    /// [`WidgetRepositoryError::ActorBinding`] before touching the store.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetRepositoryError::Persistence`] if the store lock is
    /// poisoned.
    pub fn set_binding_available(&self, available: bool) -> WidgetRepositoryResult<()> {
        self.write_state()?.binding_available = available;
        Ok(())
    }

    fn write_state(&self) -> WidgetRepositoryResult<RwLockWriteGuard<'_, InventoryState>> {
        self.state
            .write()
            .map_err(|err| WidgetRepositoryError::persistence(PoisonedStore(err.to_string())))
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, InventoryState>, PoisonedStore> {
        self.state
            .read()
            .map_err(|err| PoisonedStore(err.to_string()))
    }

    /// Runs `body` in a transaction attributed to `actor`.
    fn attributed_transaction<T, F>(
        &self,
        actor: &TransactionActor,
        body: F,
    ) -> WidgetRepositoryResult<T>
    where
        F: FnOnce(&mut UnitOfWork<'_>) -> WidgetRepositoryResult<T>,
    {
        let mut state = self.write_state()?;
        let mut unit = UnitOfWork::begin(&mut state);

        if let Err(err) = unit.bind_actor(actor) {
            tracing::warn!(actor = %actor, error = %err, "failed to bind acting user");
            return Err(WidgetRepositoryError::actor_binding(err));
        }
        tracing::debug!(
            actor = %actor,
            fallback = actor.is_fallback(),
            "bound acting user to transaction"
        );

        let value = body(&mut unit)?;
        let captured = unit.commit(self.clock.utc().trunc_subsecs(STORED_SUBSEC_DIGITS));
        tracing::debug!(captured, "committed in-memory transaction");
        Ok(value)
    }

    fn select_audits<P>(&self, predicate: P) -> AuditRepositoryResult<Vec<WidgetAudit>>
    where
        P: Fn(&WidgetAudit) -> bool,
    {
        let state = self.read_state().map_err(AuditRepositoryError::persistence)?;
        let mut records: Vec<WidgetAudit> = state
            .audits
            .iter()
            .filter(|record| predicate(record))
            .cloned()
            .collect();
        records.sort_by(most_recent_first);
        Ok(records)
    }

    fn count_audits<P>(&self, predicate: P) -> AuditRepositoryResult<u64>
    where
        P: Fn(&WidgetAudit) -> bool,
    {
        let state = self.read_state().map_err(AuditRepositoryError::persistence)?;
        let matching = state.audits.iter().filter(|record| predicate(record)).count();
        u64::try_from(matching).map_err(AuditRepositoryError::persistence)
    }
}

fn most_recent_first(left: &WidgetAudit, right: &WidgetAudit) -> Ordering {
    right
        .changed_at()
        .cmp(&left.changed_at())
        .then_with(|| right.audit_id().cmp(&left.audit_id()))
}

fn required<T>(value: Option<T>, column: &str) -> WidgetRepositoryResult<T> {
    value.ok_or_else(|| WidgetRepositoryError::MissingField(column.to_owned()))
}

#[async_trait]
impl<C> WidgetRepository for InMemoryInventoryStore<C>
where
    C: Clock + Send + Sync,
{
    async fn insert(
        &self,
        widget: &NewWidget,
        actor: &TransactionActor,
    ) -> WidgetRepositoryResult<Widget> {
        self.attributed_transaction(actor, |unit| {
            let quantity = required(widget.quantity(), "quantity")?;
            let price = required(widget.price(), "price")?;

            let created = Widget::from_persisted(PersistedWidgetData {
                id: unit.next_widget_id(),
                name: widget.name().to_owned(),
                created_at: widget.created_at(),
                quantity,
                price,
            });
            unit.stage(PendingChange::Insert(created.clone()));
            Ok(created)
        })
    }

    async fn update(
        &self,
        widget: &Widget,
        actor: &TransactionActor,
    ) -> WidgetRepositoryResult<()> {
        self.attributed_transaction(actor, |unit| {
            let stored = unit
                .find(widget.id())
                .ok_or(WidgetRepositoryError::NotFound(widget.id()))?;

            // Creation instant is fixed at insert.
            let updated = Widget::from_persisted(PersistedWidgetData {
                id: widget.id(),
                name: widget.name().to_owned(),
                created_at: stored.created_at(),
                quantity: widget.quantity(),
                price: widget.price(),
            });
            unit.stage(PendingChange::Update(updated));
            Ok(())
        })
    }

    async fn delete(&self, id: WidgetId, actor: &TransactionActor) -> WidgetRepositoryResult<()> {
        self.attributed_transaction(actor, |unit| {
            let stored = unit
                .find(id)
                .cloned()
                .ok_or(WidgetRepositoryError::NotFound(id))?;
            unit.stage(PendingChange::Delete(stored));
            Ok(())
        })
    }

    async fn find_by_id(&self, id: WidgetId) -> WidgetRepositoryResult<Option<Widget>> {
        let state = self.read_state().map_err(WidgetRepositoryError::persistence)?;
        Ok(state.widgets.get(&id).cloned())
    }

    async fn count(&self) -> WidgetRepositoryResult<u64> {
        let state = self.read_state().map_err(WidgetRepositoryError::persistence)?;
        u64::try_from(state.widgets.len()).map_err(WidgetRepositoryError::persistence)
    }
}

#[async_trait]
impl<C> WidgetAuditRepository for InMemoryInventoryStore<C>
where
    C: Clock + Send + Sync,
{
    async fn list_by_widget(&self, widget_id: WidgetId) -> AuditRepositoryResult<Vec<WidgetAudit>> {
        self.select_audits(|record| record.widget_id() == Some(widget_id))
    }

    async fn list_by_operation(
        &self,
        operation: AuditOperation,
    ) -> AuditRepositoryResult<Vec<WidgetAudit>> {
        self.select_audits(|record| record.operation() == operation)
    }

    async fn list_changed_after(
        &self,
        instant: DateTime<Utc>,
    ) -> AuditRepositoryResult<Vec<WidgetAudit>> {
        self.select_audits(|record| record.changed_at() > instant)
    }

    async fn list_by_widget_and_operation(
        &self,
        widget_id: WidgetId,
        operation: AuditOperation,
    ) -> AuditRepositoryResult<Vec<WidgetAudit>> {
        self.select_audits(|record| {
            record.widget_id() == Some(widget_id) && record.operation() == operation
        })
    }

    async fn count_by_operation(&self, operation: AuditOperation) -> AuditRepositoryResult<u64> {
        self.count_audits(|record| record.operation() == operation)
    }

    async fn list_all(&self) -> AuditRepositoryResult<Vec<WidgetAudit>> {
        self.select_audits(|_| true)
    }

    async fn count(&self) -> AuditRepositoryResult<u64> {
        self.count_audits(|_| true)
    }
}
