//! Shared widget and audit behaviour against the in-memory store.

use crate::in_memory::helpers::store;
use crate::test_helpers::scenarios;
use rstest::rstest;
use widget_audit::inventory::adapters::memory::InMemoryInventoryStore;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lifecycle_records_every_mutation(store: InMemoryInventoryStore) -> eyre::Result<()> {
    scenarios::lifecycle_records_every_mutation(&store, &store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn records_name_the_bound_actor(store: InMemoryInventoryStore) -> eyre::Result<()> {
    scenarios::records_name_the_bound_actor(&store, &store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn count_by_operation_matches_scan(store: InMemoryInventoryStore) -> eyre::Result<()> {
    scenarios::count_by_operation_matches_scan(&store, &store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn widget_and_operation_filter(store: InMemoryInventoryStore) -> eyre::Result<()> {
    scenarios::widget_and_operation_filter(&store, &store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn changed_after_is_strict(store: InMemoryInventoryStore) -> eyre::Result<()> {
    scenarios::changed_after_is_strict(&store, &store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn price_survives_round_trip(store: InMemoryInventoryStore) -> eyre::Result<()> {
    scenarios::price_survives_round_trip(&store, &store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn timestamp_survives_round_trip(store: InMemoryInventoryStore) -> eyre::Result<()> {
    scenarios::timestamp_survives_round_trip(&store, &store).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_mutations_leave_no_trace(store: InMemoryInventoryStore) -> eyre::Result<()> {
    scenarios::rejected_mutations_leave_no_trace(&store, &store).await
}
