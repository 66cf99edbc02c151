//! Error types for the game tracker
//!
//! Domain failures are raised as [`TrackerError`] and carried through the
//! crate inside `anyhow::Error`, so callers that care about the kind can
//! recover it with `downcast_ref`.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific tracking scenarios
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Player not found: {name}")]
    PlayerNotFound { name: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Malformed score: {score:?} (expected \"W-L\")")]
    MalformedScore { score: String },

    #[error("Player already exists: {name}")]
    DuplicatePlayer { name: String },

    #[error("Partial write failure after {completed} write(s): {reason}")]
    PartialWriteFailure { completed: usize, reason: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl TrackerError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Short, stable label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            TrackerError::PlayerNotFound { .. } => "player_not_found",
            TrackerError::InvalidInput { .. } => "invalid_input",
            TrackerError::MalformedScore { .. } => "malformed_score",
            TrackerError::DuplicatePlayer { .. } => "duplicate_player",
            TrackerError::PartialWriteFailure { .. } => "partial_write",
            TrackerError::Storage { .. } => "storage",
            TrackerError::ConfigurationError { .. } => "configuration",
        }
    }
}

/// Classify any crate error for metrics, falling back to "internal"
pub fn error_kind(err: &anyhow::Error) -> &'static str {
    err.downcast_ref::<TrackerError>()
        .map(TrackerError::kind)
        .unwrap_or("internal")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_recovers_domain_error() {
        let err: anyhow::Error = TrackerError::PlayerNotFound {
            name: "Alice".to_string(),
        }
        .into();
        assert_eq!(error_kind(&err), "player_not_found");
        assert_eq!(err.to_string(), "Player not found: Alice");
    }

    #[test]
    fn test_error_kind_survives_context() {
        let err = anyhow::Error::from(TrackerError::invalid_input("empty winner list"))
            .context("recording set");
        assert_eq!(error_kind(&err), "invalid_input");
    }

    #[test]
    fn test_foreign_error_is_internal() {
        let err = anyhow::anyhow!("disk on fire");
        assert_eq!(error_kind(&err), "internal");
    }
}
