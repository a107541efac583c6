//! Immutable audit records captured for widget mutations.

use super::{AuditId, ParseAuditOperationError, WidgetId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of widget mutation recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditOperation {
    /// A widget was inserted.
    Insert,
    /// A persisted widget was changed in place.
    Update,
    /// A widget was deleted.
    Delete,
}

impl AuditOperation {
    /// Returns the literal stored in the `operation` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl TryFrom<&str> for AuditOperation {
    type Error = ParseAuditOperationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "INSERT" => Ok(Self::Insert),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            _ => Err(ParseAuditOperationError(value.to_owned())),
        }
    }
}

impl fmt::Display for AuditOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the widget audit trail.
///
/// Records are written by change capture when a mutation commits and are
/// never modified afterwards, so this type only exposes accessors. Snapshot
/// columns are nullable in storage and surface as `Option`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetAudit {
    audit_id: AuditId,
    operation: AuditOperation,
    widget_id: Option<WidgetId>,
    name: Option<String>,
    created_at: Option<DateTime<Utc>>,
    quantity: Option<i32>,
    price: Option<Decimal>,
    changed_at: DateTime<Utc>,
    changed_by: Option<String>,
}

/// Parameter object for reconstructing a persisted audit record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedWidgetAudit {
    /// Storage-assigned audit identifier.
    pub audit_id: AuditId,
    /// Mutation kind.
    pub operation: AuditOperation,
    /// Widget the mutation applied to.
    pub widget_id: Option<WidgetId>,
    /// Widget name at the time of the mutation.
    pub name: Option<String>,
    /// Widget creation instant, copied from the widget.
    pub created_at: Option<DateTime<Utc>>,
    /// Widget quantity at the time of the mutation.
    pub quantity: Option<i32>,
    /// Widget price at the time of the mutation.
    pub price: Option<Decimal>,
    /// Instant the record was written.
    pub changed_at: DateTime<Utc>,
    /// Actor bound to the mutating transaction.
    pub changed_by: Option<String>,
}

impl WidgetAudit {
    /// Reconstructs an audit record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedWidgetAudit) -> Self {
        Self {
            audit_id: data.audit_id,
            operation: data.operation,
            widget_id: data.widget_id,
            name: data.name,
            created_at: data.created_at,
            quantity: data.quantity,
            price: data.price,
            changed_at: data.changed_at,
            changed_by: data.changed_by,
        }
    }

    /// Returns the audit identifier.
    #[must_use]
    pub const fn audit_id(&self) -> AuditId {
        self.audit_id
    }

    /// Returns the mutation kind.
    #[must_use]
    pub const fn operation(&self) -> AuditOperation {
        self.operation
    }

    /// Returns the audited widget identifier.
    #[must_use]
    pub const fn widget_id(&self) -> Option<WidgetId> {
        self.widget_id
    }

    /// Returns the snapshot name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the snapshot creation instant.
    #[must_use]
    pub const fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Returns the snapshot quantity.
    #[must_use]
    pub const fn quantity(&self) -> Option<i32> {
        self.quantity
    }

    /// Returns the snapshot price.
    #[must_use]
    pub const fn price(&self) -> Option<Decimal> {
        self.price
    }

    /// Returns the instant the record was written.
    #[must_use]
    pub const fn changed_at(&self) -> DateTime<Utc> {
        self.changed_at
    }

    /// Returns the actor attributed to the change.
    #[must_use]
    pub fn changed_by(&self) -> Option<&str> {
        self.changed_by.as_deref()
    }
}
