//! Actor value bound to a single unit of work.

use super::context::ActorContext;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Actor recorded for changes made without an acting user.
pub const SYSTEM_ACTOR: &str = "system_process";

/// Name of the transaction-local `PostgreSQL` setting read by the audit
/// trigger.
pub const ACTOR_SETTING: &str = "app.current_user";

/// Non-empty actor identifier attributed to every mutation in one
/// transaction.
///
/// # Examples
///
/// ```
/// use widget_audit::audit::{SYSTEM_ACTOR, TransactionActor};
///
/// assert_eq!(TransactionActor::resolve(Some("alice")).as_str(), "alice");
/// assert_eq!(TransactionActor::resolve(Some("   ")).as_str(), SYSTEM_ACTOR);
/// assert!(TransactionActor::resolve(None).is_fallback());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionActor(String);

impl TransactionActor {
    /// Resolves a candidate actor, substituting [`SYSTEM_ACTOR`] when the
    /// value is absent or blank.
    ///
    /// Non-blank values are kept exactly as given.
    #[must_use]
    pub fn resolve(candidate: Option<&str>) -> Self {
        match candidate {
            Some(actor) if !actor.trim().is_empty() => Self(actor.to_owned()),
            _ => Self::system(),
        }
    }

    /// Resolves the calling thread's current actor.
    #[must_use]
    pub fn from_context() -> Self {
        Self::resolve(ActorContext::current().as_deref())
    }

    /// Returns the fallback actor for unattributed changes.
    #[must_use]
    pub fn system() -> Self {
        Self(SYSTEM_ACTOR.to_owned())
    }

    /// Returns `true` when this is the fallback actor.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.0 == SYSTEM_ACTOR
    }

    /// Returns the actor as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TransactionActor {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TransactionActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
