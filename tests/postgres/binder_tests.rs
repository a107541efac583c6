//! Transaction-local actor binding against `PostgreSQL`.

use crate::postgres::helpers::prepared_store;
use crate::test_helpers::actor;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable, Text};
use rstest::rstest;
use widget_audit::inventory::{
    adapters::postgres::{attributed_transaction, bind_actor, install_schema},
    domain::WidgetId,
    ports::{WidgetAuditRepository, WidgetRepositoryError},
};

#[derive(Debug, QueryableByName)]
struct CurrentActor {
    #[diesel(sql_type = Nullable<Text>)]
    actor: Option<String>,
}

#[derive(Debug, QueryableByName)]
struct InsertedId {
    #[diesel(sql_type = BigInt)]
    id: i64,
}

fn current_actor(connection: &mut PgConnection) -> QueryResult<Option<String>> {
    diesel::sql_query("SELECT current_setting('app.current_user', true) AS actor")
        .get_result::<CurrentActor>(connection)
        .map(|row| row.actor)
}

#[rstest]
fn binding_is_visible_inside_and_gone_after_commit() -> eyre::Result<()> {
    let prepared = prepared_store()?;
    let mut connection = prepared.connection()?;

    let inside = attributed_transaction(&mut connection, &actor("alice"), |transaction| {
        Ok(current_actor(transaction)?)
    })?;
    let after = current_actor(&mut connection)?;

    assert_eq!(inside.as_deref(), Some("alice"));
    assert!(after.is_none_or(|value| value.is_empty()));
    Ok(())
}

#[rstest]
fn binding_outside_transaction_does_not_leak() -> eyre::Result<()> {
    let prepared = prepared_store()?;
    let mut connection = prepared.connection()?;

    bind_actor(&mut connection, &actor("bob"))?;
    let next = current_actor(&mut connection)?;

    assert!(next.is_none_or(|value| value.is_empty()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_body_rolls_back_trigger_rows() -> eyre::Result<()> {
    let prepared = prepared_store()?;
    let audits_before = prepared.audits.count().await?;
    let mut connection = prepared.connection()?;

    let result: Result<(), WidgetRepositoryError> =
        attributed_transaction(&mut connection, &actor("carol"), |transaction| {
            let inserted = diesel::sql_query(concat!(
                "INSERT INTO widgets (name, created_at, quantity, price) ",
                "VALUES ('Rolled back', now(), 1, 1.00) RETURNING id",
            ))
            .get_result::<InsertedId>(transaction)?;
            Err(WidgetRepositoryError::NotFound(WidgetId::new(inserted.id)))
        });
    drop(connection);

    assert!(matches!(result, Err(WidgetRepositoryError::NotFound(_))));
    assert_eq!(prepared.audits.count().await?, audits_before);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reinstalling_schema_through_pooled_connection_keeps_capture() -> eyre::Result<()> {
    let prepared = prepared_store()?;
    install_schema(&mut *prepared.connection()?)?;
    let audits_before = prepared.audits.count().await?;

    let mut connection = prepared.connection()?;
    attributed_transaction(&mut connection, &actor("dave"), |transaction| {
        diesel::sql_query(concat!(
            "INSERT INTO widgets (name, created_at, quantity, price) ",
            "VALUES ('Reinstalled', now(), 1, 1.00) RETURNING id",
        ))
        .get_result::<InsertedId>(transaction)?;
        Ok(())
    })?;
    drop(connection);

    assert_eq!(prepared.audits.count().await?, audits_before + 1);
    Ok(())
}
