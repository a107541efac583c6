//! Widget entity and its unpersisted draft form.

use super::WidgetId;
use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// `TIMESTAMPTZ` keeps microseconds, so timestamps are truncated to match.
pub(crate) const STORED_SUBSEC_DIGITS: u16 = 6;

/// A widget that has not been persisted yet.
///
/// Quantity and price are optional here so that storage, not the caller, is
/// the place where a missing value is rejected.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use rust_decimal::Decimal;
/// use widget_audit::inventory::domain::NewWidget;
///
/// let draft = NewWidget::new("Sprocket", Utc::now())
///     .with_quantity(10)
///     .with_price(Decimal::new(1999, 2));
///
/// assert_eq!(draft.quantity(), Some(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWidget {
    name: String,
    created_at: DateTime<Utc>,
    quantity: Option<i32>,
    price: Option<Decimal>,
}

impl NewWidget {
    /// Creates a draft with a name and creation instant.
    #[must_use]
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            created_at: created_at.trunc_subsecs(STORED_SUBSEC_DIGITS),
            quantity: None,
            price: None,
        }
    }

    /// Creates a draft stamped with the clock's current instant.
    #[must_use]
    pub fn stamped(name: impl Into<String>, clock: &impl Clock) -> Self {
        Self::new(name, clock.utc())
    }

    /// Sets the stock quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: i32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Sets the unit price.
    #[must_use]
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Returns the widget name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the creation instant.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the quantity, if set.
    #[must_use]
    pub const fn quantity(&self) -> Option<i32> {
        self.quantity
    }

    /// Returns the price, if set.
    #[must_use]
    pub const fn price(&self) -> Option<Decimal> {
        self.price
    }
}

/// A persisted widget.
///
/// The identifier and creation instant never change. Name, quantity and
/// price are edited in place with [`Widget::update_details`], so saving the
/// same value again is recorded as an update rather than a new insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Widget {
    id: WidgetId,
    name: String,
    created_at: DateTime<Utc>,
    quantity: i32,
    price: Decimal,
}

/// Parameter object for reconstructing a persisted widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedWidgetData {
    /// Storage-assigned identifier.
    pub id: WidgetId,
    /// Persisted name.
    pub name: String,
    /// Persisted creation instant.
    pub created_at: DateTime<Utc>,
    /// Persisted quantity.
    pub quantity: i32,
    /// Persisted price.
    pub price: Decimal,
}

impl Widget {
    /// Reconstructs a widget from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedWidgetData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            created_at: data.created_at,
            quantity: data.quantity,
            price: data.price,
        }
    }

    /// Replaces the mutable widget details.
    pub fn update_details(&mut self, name: impl Into<String>, quantity: i32, price: Decimal) {
        self.name = name.into();
        self.quantity = quantity;
        self.price = price;
    }

    /// Returns the widget identifier.
    #[must_use]
    pub const fn id(&self) -> WidgetId {
        self.id
    }

    /// Returns the widget name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the creation instant.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the stock quantity.
    #[must_use]
    pub const fn quantity(&self) -> i32 {
        self.quantity
    }

    /// Returns the unit price.
    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }
}
