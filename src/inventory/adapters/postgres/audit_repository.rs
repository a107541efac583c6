//! `PostgreSQL` queries over the widget audit trail.

use super::{
    blocking::{InventoryPgPool, run_blocking_with},
    models::WidgetAuditRow,
    schema::widgets_audit,
};
use crate::inventory::{
    domain::{AuditOperation, WidgetAudit, WidgetId},
    ports::{AuditRepositoryError, AuditRepositoryResult, WidgetAuditRepository},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::Desc;
use diesel::pg::PgConnection;
use diesel::prelude::*;

/// `PostgreSQL`-backed audit trail reader.
#[derive(Debug, Clone)]
pub struct PostgresWidgetAuditRepository {
    pool: InventoryPgPool,
}

impl PostgresWidgetAuditRepository {
    /// Creates a new reader from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: InventoryPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> AuditRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> AuditRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking_with(&self.pool, f, AuditRepositoryError::persistence).await
    }
}

type MostRecentFirst = (Desc<widgets_audit::changed_at>, Desc<widgets_audit::audit_id>);

fn most_recent_first() -> MostRecentFirst {
    (
        widgets_audit::changed_at.desc(),
        widgets_audit::audit_id.desc(),
    )
}

fn into_records(rows: Vec<WidgetAuditRow>) -> AuditRepositoryResult<Vec<WidgetAudit>> {
    rows.into_iter()
        .map(|row| row.into_domain().map_err(AuditRepositoryError::persistence))
        .collect()
}

fn to_count(total: i64) -> AuditRepositoryResult<u64> {
    u64::try_from(total).map_err(AuditRepositoryError::persistence)
}

#[async_trait]
impl WidgetAuditRepository for PostgresWidgetAuditRepository {
    async fn list_by_widget(&self, widget_id: WidgetId) -> AuditRepositoryResult<Vec<WidgetAudit>> {
        self.run_blocking(move |connection| {
            let rows = widgets_audit::table
                .filter(widgets_audit::widget_id.eq(widget_id.into_inner()))
                .order(most_recent_first())
                .select(WidgetAuditRow::as_select())
                .load::<WidgetAuditRow>(connection)
                .map_err(AuditRepositoryError::persistence)?;
            into_records(rows)
        })
        .await
    }

    async fn list_by_operation(
        &self,
        operation: AuditOperation,
    ) -> AuditRepositoryResult<Vec<WidgetAudit>> {
        self.run_blocking(move |connection| {
            let rows = widgets_audit::table
                .filter(widgets_audit::operation.eq(operation.as_str()))
                .order(most_recent_first())
                .select(WidgetAuditRow::as_select())
                .load::<WidgetAuditRow>(connection)
                .map_err(AuditRepositoryError::persistence)?;
            into_records(rows)
        })
        .await
    }

    async fn list_changed_after(
        &self,
        instant: DateTime<Utc>,
    ) -> AuditRepositoryResult<Vec<WidgetAudit>> {
        self.run_blocking(move |connection| {
            let rows = widgets_audit::table
                .filter(widgets_audit::changed_at.gt(instant))
                .order(most_recent_first())
                .select(WidgetAuditRow::as_select())
                .load::<WidgetAuditRow>(connection)
                .map_err(AuditRepositoryError::persistence)?;
            into_records(rows)
        })
        .await
    }

    async fn list_by_widget_and_operation(
        &self,
        widget_id: WidgetId,
        operation: AuditOperation,
    ) -> AuditRepositoryResult<Vec<WidgetAudit>> {
        self.run_blocking(move |connection| {
            let rows = widgets_audit::table
                .filter(widgets_audit::widget_id.eq(widget_id.into_inner()))
                .filter(widgets_audit::operation.eq(operation.as_str()))
                .order(most_recent_first())
                .select(WidgetAuditRow::as_select())
                .load::<WidgetAuditRow>(connection)
                .map_err(AuditRepositoryError::persistence)?;
            into_records(rows)
        })
        .await
    }

    async fn count_by_operation(&self, operation: AuditOperation) -> AuditRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let total = widgets_audit::table
                .filter(widgets_audit::operation.eq(operation.as_str()))
                .count()
                .get_result::<i64>(connection)
                .map_err(AuditRepositoryError::persistence)?;
            to_count(total)
        })
        .await
    }

    async fn list_all(&self) -> AuditRepositoryResult<Vec<WidgetAudit>> {
        self.run_blocking(|connection| {
            let rows = widgets_audit::table
                .order(most_recent_first())
                .select(WidgetAuditRow::as_select())
                .load::<WidgetAuditRow>(connection)
                .map_err(AuditRepositoryError::persistence)?;
            into_records(rows)
        })
        .await
    }

    async fn count(&self) -> AuditRepositoryResult<u64> {
        self.run_blocking(|connection| {
            let total = widgets_audit::table
                .count()
                .get_result::<i64>(connection)
                .map_err(AuditRepositoryError::persistence)?;
            to_count(total)
        })
        .await
    }
}
