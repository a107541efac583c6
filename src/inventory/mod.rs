//! Widget inventory with an attributed audit trail.
//!
//! Every committed widget mutation yields exactly one audit record naming the
//! actor bound to its transaction. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
