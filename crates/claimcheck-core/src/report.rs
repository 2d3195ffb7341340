//! Report data for external exporters.
//!
//! Everything an exporter needs to render a report document from a mode A
//! result: date, score, severity counts and one section per issue. The
//! rendering format belongs to the exporter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AnalysisResult, Category, Severity};

/// One issue as it appears in an exported report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    /// 1-based position in the report
    pub index: usize,
    pub title: String,
    pub severity: Severity,
    pub category: Category,
    pub category_label: String,
    pub matched_text: String,
    pub description: String,
    pub suggestion: Option<String>,
    pub regulation: Option<String>,
}

/// Count of issues for one severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCount {
    pub severity: Severity,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    pub result_id: String,
    pub generated_at: DateTime<Utc>,
    pub score: u8,
    pub total_issues: usize,

    /// Every severity, most severe first
    pub severity_counts: Vec<SeverityCount>,

    /// Empty when the content is compliant
    pub sections: Vec<ReportSection>,
}

impl ReportData {
    pub fn is_clean(&self) -> bool {
        self.sections.is_empty()
    }
}

impl From<&AnalysisResult> for ReportData {
    fn from(result: &AnalysisResult) -> Self {
        let severity_counts = Severity::ALL
            .iter()
            .map(|severity| SeverityCount {
                severity: *severity,
                count: result.summary.count_for(*severity),
            })
            .collect();

        let sections = result
            .issues
            .iter()
            .enumerate()
            .map(|(i, issue)| ReportSection {
                index: i + 1,
                title: issue.title.clone(),
                severity: issue.severity,
                category: issue.category,
                category_label: issue.category.label().to_string(),
                matched_text: issue.matched_text.clone(),
                description: issue.description.clone(),
                suggestion: issue.suggestion.clone(),
                regulation: issue.regulation.clone(),
            })
            .collect();

        Self {
            result_id: result.id.clone(),
            generated_at: result.timestamp,
            score: result.score,
            total_issues: result.summary.total_issues,
            severity_counts,
            sections,
        }
    }
}
