//! Diesel schema for widget persistence.

diesel::table! {
    /// Widget inventory.
    widgets (id) {
        /// Storage-assigned widget identifier.
        id -> Int8,
        /// Display name.
        name -> Text,
        /// Creation instant.
        created_at -> Timestamptz,
        /// Units in stock.
        quantity -> Int4,
        /// Unit price.
        price -> Numeric,
    }
}

diesel::table! {
    /// Append-only audit trail written by the `widgets` row trigger.
    widgets_audit (audit_id) {
        /// Storage-assigned audit identifier.
        audit_id -> Int8,
        /// `INSERT`, `UPDATE` or `DELETE`.
        operation -> Text,
        /// Audited widget identifier.
        widget_id -> Nullable<Int8>,
        /// Snapshot name.
        name -> Nullable<Text>,
        /// Snapshot creation instant.
        created_at -> Nullable<Timestamptz>,
        /// Snapshot quantity.
        quantity -> Nullable<Int4>,
        /// Snapshot price.
        price -> Nullable<Numeric>,
        /// Instant the trigger fired.
        changed_at -> Timestamptz,
        /// Actor bound to the mutating transaction.
        changed_by -> Nullable<Text>,
    }
}
