//! # claimcheck-core
//!
//! Deterministic compliance analysis engine for marketing content.
//!
//! Two analysis modes share this crate:
//! - **Mode A** (rule scan): a catalog of regex rules flags positioned
//!   issues, which are scored and summarized.
//! - **Mode B** (obligation audit): the document is qualified, then
//!   checked against the obligation checklists of its applicable
//!   regulatory texts.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: same content, catalog and options give the same
//!    issues and score
//! 2. **No I/O in analysis**: only config and catalog loading touch files
//! 3. **Positioned**: every issue's span slices back to its matched text
//!
//! ## Example
//!
//! ```rust,ignore
//! use claimcheck_core::{detect_issues, qualify, audit, AnalysisOptions};
//!
//! let result = detect_issues("100% guaranteed results!", &AnalysisOptions::default());
//! println!("score {}: {} issues", result.score, result.issues.len());
//!
//! let qualification = qualify(brochure);
//! let audit = audit(brochure, &qualification)?;
//! println!("{:?}: {}", audit.report.verdict, audit.synthesis);
//! ```

pub mod audit;
pub mod catalog;
pub mod config;
pub mod grouping;
pub mod matcher;
pub mod report;
pub mod scoring;
pub mod types;

// Re-export main types at crate root
pub use audit::{
    qualify, AuditConfig, AuditError, AuditResult, Auditor, Criticality, FallbackPolicy, Finding,
    FindingStatus, Qualification, Verdict,
};
pub use catalog::{CatalogError, RuleCatalog};
pub use config::{ConfigError, ContentLimits, EngineConfig};
pub use grouping::{group_analyses, FindingGroup, GroupBy, SortBy, ViewOptions};
pub use matcher::PatternMatcher;
pub use report::ReportData;
pub use scoring::ScoringWeights;
pub use types::{
    AnalysisOptions, AnalysisResult, AnalysisSummary, Category, Issue, Position, Severity,
};

use chrono::Utc;
use thiserror::Error;

/// Errors surfaced by the engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),
}

/// Mode A analyzer: a catalog plus scoring weights.
#[derive(Debug, Clone, Copy)]
pub struct Analyzer<'a> {
    catalog: &'a RuleCatalog,
    weights: ScoringWeights,
}

impl<'a> Analyzer<'a> {
    pub fn new(catalog: &'a RuleCatalog, weights: ScoringWeights) -> Self {
        Self { catalog, weights }
    }

    pub fn catalog(&self) -> &'a RuleCatalog {
        self.catalog
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Detect, score and summarize issues in `content`.
    pub fn analyze(&self, content: &str, options: &AnalysisOptions) -> AnalysisResult {
        let issues = PatternMatcher::new(self.catalog).detect(content, options);
        let score = scoring::score(&issues, &self.weights);
        let summary = scoring::summarize(&issues);
        let timestamp = Utc::now();

        tracing::debug!(
            issues = issues.len(),
            score,
            content_type = %options.content_type,
            "Content analyzed"
        );

        AnalysisResult {
            id: types::next_result_id(&timestamp),
            content: content.to_string(),
            timestamp,
            issues,
            score,
            summary,
        }
    }
}

impl Analyzer<'static> {
    /// Built-in catalog with default weights.
    pub fn builtin() -> Self {
        Self::new(RuleCatalog::builtin(), ScoringWeights::default())
    }
}

impl Default for Analyzer<'static> {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Analyze content against the built-in catalog (mode A).
pub fn detect_issues(content: &str, options: &AnalysisOptions) -> AnalysisResult {
    Analyzer::builtin().analyze(content, options)
}

/// Audit content against a qualification with the default config (mode B).
pub fn audit(content: &str, qualification: &Qualification) -> Result<AuditResult, AuditError> {
    Auditor::default().audit(content, qualification)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guarantee_flagged() {
        let result = detect_issues(
            "Our product delivers 100% guaranteed results for every customer.",
            &AnalysisOptions::default(),
        );
        assert!(result.score < 100);
        assert!(result
            .issues
            .iter()
            .any(|i| i.category == Category::MisleadingClaims && i.severity <= Severity::High));
    }

    #[test]
    fn test_empty_content_is_clean() {
        let result = detect_issues("", &AnalysisOptions::default());
        assert!(result.issues.is_empty());
        assert_eq!(result.score, 100);
        assert_eq!(result.summary.total_issues, 0);
    }

    #[test]
    fn test_custom_weights_applied() {
        let analyzer = Analyzer::new(
            RuleCatalog::builtin(),
            ScoringWeights {
                high: 100,
                ..Default::default()
            },
        );
        let result = analyzer.analyze("100% guaranteed results", &AnalysisOptions::default());
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_qualify_then_audit() {
        let content = "Notre SCPI présente un risque de perte en capital. Document publicitaire.";
        let qualification = qualify(content);
        let result = audit(content, &qualification).unwrap();
        assert_eq!(result.qualification, qualification);
        assert_eq!(result.analyses_by_text.len(), qualification.applicable_sources.len());
    }

    #[test]
    fn test_engine_error_wraps_audit_error() {
        let err: EngineError = AuditError::NoApplicableSource.into();
        assert!(err.to_string().contains("no applicable regulatory text"));
    }
}
