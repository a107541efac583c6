//! Adapter implementations for inventory ports.

pub mod memory;
pub mod postgres;
