//! Mode B workflow as a state machine.
//!
//! ```text
//! Upload ──qualify──▶ Qualifying ──▶ Review ──analyze──▶ Analyzing ──▶ Results
//!    ▲                    │            ▲                    │
//!    └──── on failure ────┘            └──── on failure ────┘
//! ```
//!
//! `reset` returns to Upload from any stage. Data lives in the state that
//! owns it: a qualification exists from Review on, a result only in Results.

use serde::{Deserialize, Serialize};
use std::fmt;

use claimcheck_core::audit::{AuditResult, Auditor, Qualification};
use claimcheck_core::{qualify, ContentLimits, EngineConfig};

use crate::{validate_content_length, SessionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    Upload,
    Qualifying,
    Review,
    Analyzing,
    Results,
}

impl WorkflowStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStage::Upload => "upload",
            WorkflowStage::Qualifying => "qualifying",
            WorkflowStage::Review => "review",
            WorkflowStage::Analyzing => "analyzing",
            WorkflowStage::Results => "results",
        }
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum WorkflowState {
    Upload,
    Qualifying,
    Review {
        qualification: Qualification,
    },
    Analyzing {
        qualification: Qualification,
    },
    Results {
        qualification: Qualification,
        result: Box<AuditResult>,
    },
}

impl WorkflowState {
    pub fn stage(&self) -> WorkflowStage {
        match self {
            WorkflowState::Upload => WorkflowStage::Upload,
            WorkflowState::Qualifying => WorkflowStage::Qualifying,
            WorkflowState::Review { .. } => WorkflowStage::Review,
            WorkflowState::Analyzing { .. } => WorkflowStage::Analyzing,
            WorkflowState::Results { .. } => WorkflowStage::Results,
        }
    }

    pub fn qualification(&self) -> Option<&Qualification> {
        match self {
            WorkflowState::Review { qualification }
            | WorkflowState::Analyzing { qualification }
            | WorkflowState::Results { qualification, .. } => Some(qualification),
            WorkflowState::Upload | WorkflowState::Qualifying => None,
        }
    }

    pub fn result(&self) -> Option<&AuditResult> {
        match self {
            WorkflowState::Results { result, .. } => Some(result),
            _ => None,
        }
    }
}

/// Whether the workflow may move directly from one stage to another.
/// `reset` is not a transition and is always allowed.
pub fn is_allowed(from: WorkflowStage, to: WorkflowStage) -> bool {
    matches!(
        (from, to),
        (WorkflowStage::Upload, WorkflowStage::Qualifying)
            | (WorkflowStage::Qualifying, WorkflowStage::Review)
            | (WorkflowStage::Qualifying, WorkflowStage::Upload)
            | (WorkflowStage::Review, WorkflowStage::Analyzing)
            | (WorkflowStage::Analyzing, WorkflowStage::Results)
            | (WorkflowStage::Analyzing, WorkflowStage::Review)
    )
}

/// Drives one document through qualification and audit.
#[derive(Debug, Clone)]
pub struct AuditWorkflow {
    content: String,
    state: WorkflowState,
    limits: ContentLimits,
    auditor: Auditor,
}

impl AuditWorkflow {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            content: String::new(),
            state: WorkflowState::Upload,
            limits: config.limits,
            auditor: Auditor::new(config.audit),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn stage(&self) -> WorkflowStage {
        self.state.stage()
    }

    pub fn qualification(&self) -> Option<&Qualification> {
        self.state.qualification()
    }

    pub fn result(&self) -> Option<&AuditResult> {
        self.state.result()
    }

    /// Replace the document. Only allowed in Upload.
    pub fn set_content(&mut self, content: impl Into<String>) -> Result<(), SessionError> {
        self.require_stage(WorkflowStage::Upload, "set content")?;
        self.content = content.into();
        Ok(())
    }

    /// Qualify the document and move to Review.
    ///
    /// Content shorter than the configured minimum is rejected without
    /// leaving Upload. A failed qualification reverts to Upload.
    pub fn qualify(&mut self) -> Result<&Qualification, SessionError> {
        self.require_stage(WorkflowStage::Upload, "qualify")?;
        validate_content_length(&self.content, &self.limits)?;

        self.transition(WorkflowState::Qualifying);

        let qualification = qualify(&self.content);
        if let Err(e) = qualification.validate() {
            tracing::warn!(error = %e, "Qualification failed, reverting to upload");
            self.transition(WorkflowState::Upload);
            return Err(SessionError::AnalysisFailed(e.to_string()));
        }

        self.transition(WorkflowState::Review { qualification });
        self.qualification().ok_or(SessionError::MissingQualification)
    }

    /// Replace the qualification with a user-edited one. Only in Review.
    pub fn update_qualification(&mut self, qualification: Qualification) -> Result<(), SessionError> {
        self.require_stage(WorkflowStage::Review, "update qualification")?;
        self.state = WorkflowState::Review { qualification };
        Ok(())
    }

    /// Audit the document against the reviewed qualification.
    ///
    /// A failed audit reverts to Review with the qualification intact.
    pub fn analyze(&mut self) -> Result<&AuditResult, SessionError> {
        let qualification = match &self.state {
            WorkflowState::Review { qualification } => qualification.clone(),
            WorkflowState::Upload | WorkflowState::Qualifying => {
                return Err(SessionError::MissingQualification)
            }
            other => {
                return Err(SessionError::InvalidTransition {
                    from: other.stage(),
                    action: "analyze",
                })
            }
        };

        self.transition(WorkflowState::Analyzing {
            qualification: qualification.clone(),
        });

        match self.auditor.audit(&self.content, &qualification) {
            Ok(result) => {
                self.transition(WorkflowState::Results {
                    qualification,
                    result: Box::new(result),
                });
                self.result().ok_or(SessionError::MissingQualification)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Audit failed, reverting to review");
                self.transition(WorkflowState::Review { qualification });
                Err(SessionError::AnalysisFailed(e.to_string()))
            }
        }
    }

    /// Back to an empty Upload stage.
    pub fn reset(&mut self) {
        tracing::info!(from = %self.stage(), "Workflow reset");
        self.content.clear();
        self.state = WorkflowState::Upload;
    }

    fn require_stage(&self, stage: WorkflowStage, action: &'static str) -> Result<(), SessionError> {
        if self.stage() != stage {
            return Err(SessionError::InvalidTransition {
                from: self.stage(),
                action,
            });
        }
        Ok(())
    }

    fn transition(&mut self, next: WorkflowState) {
        let (from, to) = (self.stage(), next.stage());
        debug_assert!(is_allowed(from, to), "illegal transition {from} -> {to}");
        tracing::info!(%from, %to, "Workflow transition");
        self.state = next;
    }
}

impl Default for AuditWorkflow {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
