//! Error handling for the CyberAware core

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AwarenessError {
    #[error("Invalid state transition: cannot {operation}: {reason}")]
    InvalidStateTransition {
        operation: &'static str,
        reason: String,
    },

    #[error("Profile lookup failed for {user_id}: {message}")]
    ProfileLookupFailure { user_id: String, message: String },

    #[error("Profile not found: {user_id}")]
    ProfileNotFound { user_id: String },

    #[error("No content for cohort: {cohort}")]
    EmptyCohortCatalog { cohort: String },

    #[error("Unknown cohort: {value}")]
    UnknownCohort { value: String },

    #[error("Invalid catalog: {message}")]
    InvalidCatalog { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Data serialization error: {message}")]
    SerializationError { message: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Timeout occurred during operation: {operation}")]
    TimeoutError { operation: String },

    #[error("Telemetry error: {message}")]
    TelemetryError { message: String },
}

impl AwarenessError {
    pub(crate) fn invalid_transition(operation: &'static str, reason: impl Into<String>) -> Self {
        AwarenessError::InvalidStateTransition {
            operation,
            reason: reason.into(),
        }
    }

    /// Convert error to a message suitable for showing to a learner
    pub fn to_user_message(&self) -> String {
        match self {
            AwarenessError::InvalidStateTransition { .. } => {
                "That step is not available right now. Please continue the quiz.".to_string()
            }
            AwarenessError::ProfileLookupFailure { .. } | AwarenessError::TimeoutError { .. } => {
                "Could not load your profile. Showing general content instead.".to_string()
            }
            AwarenessError::ProfileNotFound { .. } => {
                "Please sign in to get personalized tips.".to_string()
            }
            AwarenessError::UnknownCohort { .. } => {
                "Please select one of the listed groups.".to_string()
            }
            AwarenessError::ConfigError { .. } => {
                "The app is misconfigured. Please contact support.".to_string()
            }
            _ => "An error occurred. Please try again or contact support.".to_string(),
        }
    }

    /// Check if error is recoverable (caller can retry)
    pub fn is_recoverable(&self) -> bool {
        match self {
            AwarenessError::ProfileLookupFailure { .. }
            | AwarenessError::TimeoutError { .. }
            | AwarenessError::StorageError { .. } => true,

            AwarenessError::InvalidStateTransition { .. }
            | AwarenessError::InvalidCatalog { .. }
            | AwarenessError::ConfigError { .. } => false,

            _ => false,
        }
    }

    /// Get severity level for logging
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AwarenessError::InvalidCatalog { .. } | AwarenessError::ConfigError { .. } => {
                ErrorSeverity::Critical
            }

            AwarenessError::InvalidStateTransition { .. }
            | AwarenessError::SerializationError { .. }
            | AwarenessError::StorageError { .. } => ErrorSeverity::High,

            AwarenessError::ProfileLookupFailure { .. } | AwarenessError::TimeoutError { .. } => {
                ErrorSeverity::Medium
            }

            _ => ErrorSeverity::Low,
        }
    }
}

impl From<serde_json::Error> for AwarenessError {
    fn from(err: serde_json::Error) -> Self {
        AwarenessError::SerializationError {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AwarenessError {
    fn from(err: std::io::Error) -> Self {
        AwarenessError::StorageError {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

// Convenience type alias
pub type Result<T> = std::result::Result<T, AwarenessError>;
