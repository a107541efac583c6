//! Acting-user attribution for audited persistence.
//!
//! The application records who is acting in a thread-scoped stack
//! ([`context::ActorContext`]). When a unit of work starts, the current value
//! is resolved into a [`actor::TransactionActor`], which storage adapters bind
//! into the transaction before any mutating statement so that change capture
//! can attribute the resulting audit rows.

pub mod actor;
pub mod context;

pub use actor::{ACTOR_SETTING, SYSTEM_ACTOR, TransactionActor};
pub use context::{ActorContext, ActorScope};
