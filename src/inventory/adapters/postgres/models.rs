//! Diesel row models for widget persistence.

use super::schema::{widgets, widgets_audit};
use crate::inventory::domain::{
    AuditId, AuditOperation, ParseAuditOperationError, PersistedWidgetAudit,
    PersistedWidgetData, Widget, WidgetAudit, WidgetId,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

/// Query result row for widgets.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = widgets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(super) struct WidgetRow {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub quantity: i32,
    pub price: Decimal,
}

impl WidgetRow {
    pub fn into_domain(self) -> Widget {
        Widget::from_persisted(PersistedWidgetData {
            id: WidgetId::new(self.id),
            name: self.name,
            created_at: self.created_at,
            quantity: self.quantity,
            price: self.price,
        })
    }
}

/// Query result row for the audit trail.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = widgets_audit)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(super) struct WidgetAuditRow {
    pub audit_id: i64,
    pub operation: String,
    pub widget_id: Option<i64>,
    pub name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub quantity: Option<i32>,
    pub price: Option<Decimal>,
    pub changed_at: DateTime<Utc>,
    pub changed_by: Option<String>,
}

impl WidgetAuditRow {
    pub fn into_domain(self) -> Result<WidgetAudit, ParseAuditOperationError> {
        let operation = AuditOperation::try_from(self.operation.as_str())?;
        Ok(WidgetAudit::from_persisted(PersistedWidgetAudit {
            audit_id: AuditId::new(self.audit_id),
            operation,
            widget_id: self.widget_id.map(WidgetId::new),
            name: self.name,
            created_at: self.created_at,
            quantity: self.quantity,
            price: self.price,
            changed_at: self.changed_at,
            changed_by: self.changed_by,
        }))
    }
}
