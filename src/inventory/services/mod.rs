//! Application services for widget inventory.

mod inventory;

pub use inventory::InventoryService;
