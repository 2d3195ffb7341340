//! Obligation audit (mode B).
//!
//! Two phases: [`qualify`] classifies the document and selects applicable
//! regulatory texts, then [`Auditor::audit`] evaluates each text's
//! obligation checklist against the content. The qualification may be
//! edited by the user between the two phases.

pub mod evaluator;
pub mod keywords;
pub mod obligations;
pub mod qualification;

pub use evaluator::{
    compliance_score, AnalysisByText, AuditConfig, AuditReport, AuditResult, Auditor,
    CorrectiveAction, CorrectiveActionType, FallbackPolicy, Finding, FindingStatus,
    MissingMention, StatusCounts, Verdict,
};
pub use obligations::{
    checklist, mandatory_mention, regulatory_text, Criticality, Obligation, ObligationTopic,
    RegulatoryText, REGULATORY_TEXTS,
};
pub use qualification::{
    qualify, ApplicableSource, Characteristics, Condition, DocumentType, ProductCategory,
    ProductType, Qualification, TargetAudience,
};

use thiserror::Error;

/// Errors raised before an audit can run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    #[error("Qualification has no applicable regulatory text")]
    NoApplicableSource,
}
