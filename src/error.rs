use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

/// Errors produced by the travel planner
#[derive(Error, Debug)]
pub enum TravelPlannerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Model service error{}: {message}", .status.map(|s| format!(" {s}")).unwrap_or_default())]
    Upstream { status: Option<u16>, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Model service timed out after {0:?}")]
    Timeout(Duration),

    #[error("Model response could not be parsed as JSON: {reason}")]
    MalformedModelResponse { raw: String, reason: String },

    #[error("Session {0} not found")]
    SessionNotFound(Uuid),

    #[error("No travel plan has been generated in this session yet")]
    NoCurrentPlan,

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TravelPlannerError {
    pub fn malformed(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedModelResponse {
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    /// Transient failures worth another attempt against the model service
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Network(_) => true,
            Self::Upstream {
                status: Some(status),
                ..
            } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Raw model text attached to the error, if any
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Self::MalformedModelResponse { raw, .. } => Some(raw.as_str()),
            _ => None,
        }
    }

    /// Stable machine-readable name used in HTTP error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::InvalidInput(_) => "invalid_input",
            Self::Upstream { .. } | Self::Network(_) => "upstream",
            Self::Timeout(_) => "timeout",
            Self::MalformedModelResponse { .. } => "malformed_model_response",
            Self::SessionNotFound(_) => "session_not_found",
            Self::NoCurrentPlan => "no_current_plan",
            Self::Json(_) => "serialization",
            Self::Internal(_) => "internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, TravelPlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        assert!(TravelPlannerError::Timeout(Duration::from_secs(60)).is_retryable());
        assert!(
            TravelPlannerError::Upstream {
                status: Some(503),
                message: "unavailable".to_string()
            }
            .is_retryable()
        );
        assert!(
            TravelPlannerError::Upstream {
                status: Some(429),
                message: "slow down".to_string()
            }
            .is_retryable()
        );

        // Client errors and bad replies are final
        assert!(
            !TravelPlannerError::Upstream {
                status: Some(400),
                message: "bad request".to_string()
            }
            .is_retryable()
        );
        assert!(
            !TravelPlannerError::Upstream {
                status: None,
                message: "empty candidates".to_string()
            }
            .is_retryable()
        );
        assert!(!TravelPlannerError::malformed("nope", "no braces").is_retryable());
        assert!(!TravelPlannerError::InvalidInput("empty source".to_string()).is_retryable());
    }

    #[test]
    fn test_raw_response_only_for_malformed() {
        let err = TravelPlannerError::malformed("```json\n{oops", "EOF while parsing");
        assert_eq!(err.raw_response(), Some("```json\n{oops"));
        assert_eq!(err.kind(), "malformed_model_response");

        assert_eq!(TravelPlannerError::NoCurrentPlan.raw_response(), None);
    }

    #[test]
    fn test_upstream_display_includes_status() {
        let err = TravelPlannerError::Upstream {
            status: Some(500),
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "Model service error 500: boom");

        let err = TravelPlannerError::Upstream {
            status: None,
            message: "no candidates".to_string(),
        };
        assert_eq!(err.to_string(), "Model service error: no candidates");
    }
}
