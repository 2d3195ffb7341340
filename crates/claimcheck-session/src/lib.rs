//! # claimcheck-session
//!
//! In-memory session layer over `claimcheck-core`, consumed by a UI.
//!
//! - [`ComplianceSession`]: mode A analysis with issue filters and a
//!   bounded history of past results.
//! - [`AuditWorkflow`]: the mode B upload → qualify → review → analyze →
//!   results progression as an explicit state machine.
//!
//! Everything is synchronous and single-owner. Nothing is persisted.

pub mod compliance;
pub mod history;
pub mod workflow;

pub use compliance::ComplianceSession;
pub use history::AnalysisHistory;
pub use workflow::{AuditWorkflow, WorkflowStage, WorkflowState};

use claimcheck_core::ContentLimits;
use thiserror::Error;

/// Errors reported back to the user of a session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Content is empty")]
    EmptyContent,

    #[error("Content must contain at least {min} characters (got {actual})")]
    ContentTooShort { min: usize, actual: usize },

    #[error("Content must contain at most {max} characters (got {actual})")]
    ContentTooLong { max: usize, actual: usize },

    #[error("Qualification required before analysis")]
    MissingQualification,

    #[error("Cannot {action} while in {from} stage")]
    InvalidTransition {
        from: WorkflowStage,
        action: &'static str,
    },

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),
}

impl SessionError {
    /// Whether the user can fix this by changing their input.
    pub fn is_user_correctable(&self) -> bool {
        !matches!(self, SessionError::AnalysisFailed(_))
    }
}

/// Reject empty or overlong content. Lengths count characters, not bytes.
pub fn validate_content(content: &str, limits: &ContentLimits) -> Result<usize, SessionError> {
    if content.trim().is_empty() {
        return Err(SessionError::EmptyContent);
    }

    let actual = content.chars().count();
    if actual > limits.max_content_chars {
        return Err(SessionError::ContentTooLong {
            max: limits.max_content_chars,
            actual,
        });
    }

    Ok(actual)
}

/// [`validate_content`] plus the minimum length.
pub fn validate_content_length(
    content: &str,
    limits: &ContentLimits,
) -> Result<usize, SessionError> {
    let actual = validate_content(content, limits)?;
    if actual < limits.min_content_chars {
        return Err(SessionError::ContentTooShort {
            min: limits.min_content_chars,
            actual,
        });
    }
    Ok(actual)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_content_is_empty() {
        let limits = ContentLimits::default();
        assert_eq!(validate_content("   \n\t", &limits), Err(SessionError::EmptyContent));
        assert_eq!(validate_content_length("", &limits), Err(SessionError::EmptyContent));
    }

    #[test]
    fn test_length_counts_characters() {
        let limits = ContentLimits {
            min_content_chars: 3,
            max_content_chars: 5,
        };
        // 5 characters, 10 bytes
        assert_eq!(validate_content_length("ééééé", &limits), Ok(5));
        assert_eq!(
            validate_content_length("éé", &limits),
            Err(SessionError::ContentTooShort { min: 3, actual: 2 })
        );
        assert_eq!(
            validate_content("éééééé", &limits),
            Err(SessionError::ContentTooLong { max: 5, actual: 6 })
        );
    }

    #[test]
    fn test_short_content_allowed_without_minimum() {
        assert_eq!(validate_content("Hi", &ContentLimits::default()), Ok(2));
    }

    #[test]
    fn test_user_correctable_classification() {
        assert!(SessionError::EmptyContent.is_user_correctable());
        assert!(SessionError::MissingQualification.is_user_correctable());
        assert!(SessionError::ContentTooShort { min: 100, actual: 5 }.is_user_correctable());
        assert!(!SessionError::AnalysisFailed("boom".to_string()).is_user_correctable());
    }

    #[test]
    fn test_error_messages() {
        let err = SessionError::ContentTooShort { min: 100, actual: 12 };
        assert_eq!(
            err.to_string(),
            "Content must contain at least 100 characters (got 12)"
        );
        let err = SessionError::InvalidTransition {
            from: WorkflowStage::Results,
            action: "qualify",
        };
        assert_eq!(err.to_string(), "Cannot qualify while in results stage");
    }
}
