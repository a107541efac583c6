//! Bundled schema migrations.

use diesel::PgConnection;
use diesel::connection::SimpleConnection;
use diesel::result::QueryResult;

const CREATE_WIDGETS_SQL: &str =
    include_str!("../../../../migrations/2026-10-01-000000_create_widgets/up.sql");

const ADD_AUDIT_TRIGGER_SQL: &str =
    include_str!("../../../../migrations/2026-10-01-000001_add_widget_audit_trigger/up.sql");

/// Creates the widget tables and the audit trigger.
///
/// Every statement is idempotent, so calling this against an already
/// migrated database is harmless.
///
/// # Errors
///
/// Returns the Diesel error raised by the first failing statement.
pub fn install_schema(connection: &mut PgConnection) -> QueryResult<()> {
    connection.batch_execute(CREATE_WIDGETS_SQL)?;
    connection.batch_execute(ADD_AUDIT_TRIGGER_SQL)?;
    tracing::debug!("installed widget schema and audit trigger");
    Ok(())
}
