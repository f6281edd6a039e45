//! Engine Error Types
//!
//! Error taxonomy for the editing engine. Structural errors (missing
//! session, missing operation, bad range) are returned synchronously to the
//! caller of the mutating operation. Persistence failures are propagated
//! from the injected save capability: background auto-save catches them and
//! keeps the session dirty, while manual saves hand them straight back.
//!
//! Exhausted undo/redo is deliberately *not* an error — those are routine
//! no-ops reported as `false` by the session API.

use thiserror::Error;
use uuid::Uuid;

/// Convenience alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// All failure modes surfaced by the editing engine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No session exists under the given ID
    #[error("session not found: {id}")]
    SessionNotFound {
        /// The session ID that was looked up
        id: Uuid,
    },

    /// The session's log holds no operation with the given ID
    #[error("operation not found: {id}")]
    OperationNotFound {
        /// The operation ID that was looked up
        id: Uuid,
    },

    /// An edit range or position does not fit the current text
    #[error("invalid range {start}..{end} for text of length {len}: {message}")]
    InvalidRange {
        /// Start of the offending range (or the position, for inserts)
        start: usize,
        /// End of the offending range
        end: usize,
        /// Length of the text the range was checked against
        len: usize,
        /// Human-readable detail
        message: String,
    },

    /// The save capability reported a failure
    #[error("persistence error: {message}")]
    Persistence {
        /// Human-readable error message
        message: String,
    },
}

impl EngineError {
    /// Create a session-not-found error
    pub fn session_not_found(id: Uuid) -> Self {
        Self::SessionNotFound { id }
    }

    /// Create an operation-not-found error
    pub fn operation_not_found(id: Uuid) -> Self {
        Self::OperationNotFound { id }
    }

    /// Create an invalid-range error
    pub fn invalid_range(start: usize, end: usize, len: usize, message: impl Into<String>) -> Self {
        Self::InvalidRange {
            start,
            end,
            len,
            message: message.into(),
        }
    }

    /// Create a persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_not_found_display() {
        let id = Uuid::new_v4();
        let error = EngineError::session_not_found(id);
        assert!(format!("{}", error).contains(&id.to_string()));
    }

    #[test]
    fn test_invalid_range_fields() {
        let error = EngineError::invalid_range(3, 1, 10, "start exceeds end");
        match error {
            EngineError::InvalidRange {
                start, end, len, ..
            } => {
                assert_eq!(start, 3);
                assert_eq!(end, 1);
                assert_eq!(len, 10);
            }
            _ => panic!("Expected InvalidRange"),
        }
    }

    #[test]
    fn test_persistence_display() {
        let error = EngineError::persistence("disk full");
        assert_eq!(format!("{}", error), "persistence error: disk full");
    }
}
