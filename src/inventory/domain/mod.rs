//! Domain types for widgets and their audit trail.

mod audit;
mod error;
mod ids;
mod widget;

pub use audit::{AuditOperation, PersistedWidgetAudit, WidgetAudit};
pub use error::ParseAuditOperationError;
pub use ids::{AuditId, WidgetId};
pub use widget::{NewWidget, PersistedWidgetData, Widget};
pub(crate) use widget::STORED_SUBSEC_DIGITS;
