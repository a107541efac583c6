//! Binds the acting user to `PostgreSQL` transactions.

use crate::audit::{ACTOR_SETTING, TransactionActor};
use crate::inventory::ports::{WidgetRepositoryError, WidgetRepositoryResult};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel::sql_types::Text;

#[derive(Debug, QueryableByName)]
struct BoundSetting {
    #[diesel(sql_type = Text)]
    bound: String,
}

/// Writes `actor` into the transaction-local `app.current_user` setting.
///
/// The value is passed as a bind parameter to `set_config` with
/// `is_local = true`, so it disappears at commit or rollback and never leaks
/// into a later transaction on the same pooled connection. Outside an open
/// transaction the setting only lasts for the implicit single-statement
/// transaction.
///
/// # Errors
///
/// Returns the Diesel error if the setting cannot be written.
pub fn bind_actor(connection: &mut PgConnection, actor: &TransactionActor) -> QueryResult<()> {
    let setting = diesel::sql_query("SELECT set_config($1, $2, true) AS bound")
        .bind::<Text, _>(ACTOR_SETTING)
        .bind::<Text, _>(actor.as_str())
        .get_result::<BoundSetting>(connection)?;
    tracing::debug!(
        actor = %setting.bound,
        fallback = actor.is_fallback(),
        "bound acting user to transaction"
    );
    Ok(())
}

/// Runs `body` in a new transaction attributed to `actor`.
///
/// The actor is bound before `body` runs; if binding fails the transaction
/// is rolled back without executing `body`. Any error from `body` also rolls
/// back, taking the trigger-written audit rows with it.
///
/// # Errors
///
/// Returns [`WidgetRepositoryError::ActorBinding`] when the actor cannot be
/// bound, otherwise whatever `body` returns.
pub fn attributed_transaction<T, F>(
    connection: &mut PgConnection,
    actor: &TransactionActor,
    body: F,
) -> WidgetRepositoryResult<T>
where
    F: FnOnce(&mut PgConnection) -> WidgetRepositoryResult<T>,
{
    connection.transaction::<T, WidgetRepositoryError, _>(|transaction| {
        bind_actor(transaction, actor).map_err(|err| {
            tracing::warn!(actor = %actor, error = %err, "failed to bind acting user");
            WidgetRepositoryError::actor_binding(err)
        })?;
        body(transaction)
    })
}

impl From<DieselError> for WidgetRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}
