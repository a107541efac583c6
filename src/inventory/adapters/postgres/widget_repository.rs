//! `PostgreSQL` repository for widgets.

use super::{
    binder::attributed_transaction,
    blocking::{InventoryPgPool, run_blocking_with},
    models::WidgetRow,
    schema::widgets,
};
use crate::audit::TransactionActor;
use crate::inventory::{
    domain::{NewWidget, Widget, WidgetId},
    ports::{WidgetRepository, WidgetRepositoryError, WidgetRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed widget repository.
///
/// Each mutation runs in its own transaction through
/// [`attributed_transaction`]; the audit rows are written by the table
/// trigger.
#[derive(Debug, Clone)]
pub struct PostgresWidgetRepository {
    pool: InventoryPgPool,
}

impl PostgresWidgetRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: InventoryPgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &InventoryPgPool {
        &self.pool
    }

    async fn run_blocking<F, T>(&self, f: F) -> WidgetRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> WidgetRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking_with(&self.pool, f, WidgetRepositoryError::persistence).await
    }
}

#[async_trait]
impl WidgetRepository for PostgresWidgetRepository {
    async fn insert(
        &self,
        widget: &NewWidget,
        actor: &TransactionActor,
    ) -> WidgetRepositoryResult<Widget> {
        let draft = widget.clone();
        let bound_actor = actor.clone();
        self.run_blocking(move |connection| {
            attributed_transaction(connection, &bound_actor, |transaction| {
                // Absent values become DEFAULT and trip the NOT NULL constraint.
                let row = diesel::insert_into(widgets::table)
                    .values((
                        widgets::name.eq(draft.name()),
                        widgets::created_at.eq(draft.created_at()),
                        draft.quantity().map(|quantity| widgets::quantity.eq(quantity)),
                        draft.price().map(|price| widgets::price.eq(price)),
                    ))
                    .returning(WidgetRow::as_returning())
                    .get_result::<WidgetRow>(transaction)
                    .map_err(map_insert_error)?;
                Ok(row.into_domain())
            })
        })
        .await
    }

    async fn update(
        &self,
        widget: &Widget,
        actor: &TransactionActor,
    ) -> WidgetRepositoryResult<()> {
        let changed = widget.clone();
        let bound_actor = actor.clone();
        self.run_blocking(move |connection| {
            attributed_transaction(connection, &bound_actor, |transaction| {
                let affected = diesel::update(widgets::table.find(changed.id().into_inner()))
                    .set((
                        widgets::name.eq(changed.name()),
                        widgets::quantity.eq(changed.quantity()),
                        widgets::price.eq(changed.price()),
                    ))
                    .execute(transaction)?;
                if affected == 0 {
                    return Err(WidgetRepositoryError::NotFound(changed.id()));
                }
                Ok(())
            })
        })
        .await
    }

    async fn delete(&self, id: WidgetId, actor: &TransactionActor) -> WidgetRepositoryResult<()> {
        let bound_actor = actor.clone();
        self.run_blocking(move |connection| {
            attributed_transaction(connection, &bound_actor, |transaction| {
                let affected =
                    diesel::delete(widgets::table.find(id.into_inner())).execute(transaction)?;
                if affected == 0 {
                    return Err(WidgetRepositoryError::NotFound(id));
                }
                Ok(())
            })
        })
        .await
    }

    async fn find_by_id(&self, id: WidgetId) -> WidgetRepositoryResult<Option<Widget>> {
        self.run_blocking(move |connection| {
            let row = widgets::table
                .find(id.into_inner())
                .select(WidgetRow::as_select())
                .first::<WidgetRow>(connection)
                .optional()?;
            Ok(row.map(WidgetRow::into_domain))
        })
        .await
    }

    async fn count(&self) -> WidgetRepositoryResult<u64> {
        self.run_blocking(|connection| {
            let total = widgets::table.count().get_result::<i64>(connection)?;
            u64::try_from(total).map_err(WidgetRepositoryError::persistence)
        })
        .await
    }
}

fn map_insert_error(err: DieselError) -> WidgetRepositoryError {
    let missing_column = match &err {
        DieselError::DatabaseError(DatabaseErrorKind::NotNullViolation, info) => {
            info.column_name().map(str::to_owned)
        }
        _ => None,
    };
    missing_column.map_or_else(
        || WidgetRepositoryError::persistence(err),
        WidgetRepositoryError::MissingField,
    )
}
