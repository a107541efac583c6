//! Error types for inventory domain parsing.

use thiserror::Error;

/// Error returned while parsing an audit operation from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown audit operation: {0}")]
pub struct ParseAuditOperationError(pub String);
