//! Shared fixtures and adapter-agnostic scenarios for integration tests.


use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use widget_audit::audit::TransactionActor;
use widget_audit::inventory::domain::NewWidget;

/// Builds a complete widget draft stamped now.
pub fn draft(name: &str, quantity: i32, price: Decimal) -> NewWidget {
    NewWidget::new(name, Utc::now())
        .with_quantity(quantity)
        .with_price(price)
}

/// Returns a resolved actor for `name`.
pub fn actor(name: &str) -> TransactionActor {
    TransactionActor::resolve(Some(name))
}

/// Returns `2026-02-19T15:30:00Z`.
pub fn reference_instant() -> eyre::Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2026, 2, 19, 15, 30, 0)
        .single()
        .ok_or_else(|| eyre::eyre!("reference instant is ambiguous"))
}
