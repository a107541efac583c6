//! Transaction emulation for the in-memory store.

use crate::audit::TransactionActor;
use crate::inventory::domain::{
    AuditId, AuditOperation, PersistedWidgetAudit, Widget, WidgetAudit, WidgetId,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Mutable store contents guarded by the store lock.
#[derive(Debug, Default)]
pub(super) struct InventoryState {
    pub widgets: BTreeMap<WidgetId, Widget>,
    pub audits: Vec<WidgetAudit>,
    pub last_widget_id: i64,
    pub last_audit_id: i64,
    pub binding_available: bool,
}

impl InventoryState {
    pub fn new() -> Self {
        Self {
            binding_available: true,
            ..Self::default()
        }
    }
}

/// Widget change staged until commit.
#[derive(Debug)]
pub(super) enum PendingChange {
    Insert(Widget),
    Update(Widget),
    Delete(Widget),
}

impl PendingChange {
    fn into_parts(self) -> (AuditOperation, Widget) {
        match self {
            Self::Insert(widget) => (AuditOperation::Insert, widget),
            Self::Update(widget) => (AuditOperation::Update, widget),
            Self::Delete(widget) => (AuditOperation::Delete, widget),
        }
    }
}

/// One open transaction against [`InventoryState`].
///
/// Changes are staged and only reach the store, together with their audit
/// records, in [`UnitOfWork::commit`]. Dropping the unit without committing
/// rolls everything back except consumed widget identifiers, matching
/// sequence behaviour in `PostgreSQL`.
pub(super) struct UnitOfWork<'s> {
    state: &'s mut InventoryState,
    bound_actor: Option<TransactionActor>,
    pending: Vec<PendingChange>,
}

/// Raised when the store is configured to refuse actor binding.
#[derive(Debug, thiserror::Error)]
#[error("transaction actor slot is unavailable")]
pub(super) struct BindingUnavailable;

impl<'s> UnitOfWork<'s> {
    pub const fn begin(state: &'s mut InventoryState) -> Self {
        Self {
            state,
            bound_actor: None,
            pending: Vec::new(),
        }
    }

    /// Stores the actor in the transaction slot read at commit.
    pub fn bind_actor(&mut self, actor: &TransactionActor) -> Result<(), BindingUnavailable> {
        if !self.state.binding_available {
            return Err(BindingUnavailable);
        }
        self.bound_actor = Some(actor.clone());
        Ok(())
    }

    pub fn find(&self, id: WidgetId) -> Option<&Widget> {
        self.state.widgets.get(&id)
    }

    pub fn next_widget_id(&mut self) -> WidgetId {
        self.state.last_widget_id += 1;
        WidgetId::new(self.state.last_widget_id)
    }

    pub fn stage(&mut self, change: PendingChange) {
        self.pending.push(change);
    }

    /// Applies staged changes and captures one audit record per change.
    ///
    /// Returns the number of captured records.
    pub fn commit(self, changed_at: DateTime<Utc>) -> usize {
        let changed_by = self.bound_actor.unwrap_or_else(TransactionActor::system);
        let captured = self.pending.len();

        for change in self.pending {
            let (operation, widget) = change.into_parts();
            self.state.last_audit_id += 1;
            let record = WidgetAudit::from_persisted(PersistedWidgetAudit {
                audit_id: AuditId::new(self.state.last_audit_id),
                operation,
                widget_id: Some(widget.id()),
                name: Some(widget.name().to_owned()),
                created_at: Some(widget.created_at()),
                quantity: Some(widget.quantity()),
                price: Some(widget.price()),
                changed_at,
                changed_by: Some(changed_by.as_str().to_owned()),
            });

            if operation == AuditOperation::Delete {
                self.state.widgets.remove(&widget.id());
            } else {
                self.state.widgets.insert(widget.id(), widget);
            }
            self.state.audits.push(record);
        }

        captured
    }
}
