//! Core types for rule-based issue detection (mode A).
//!
//! These types flow from the pattern matcher through the scorer to the
//! presentation layer. Every value here is immutable once produced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// How serious a detected issue is.
///
/// Declaration order is most to least severe, so the derived `Ord` sorts
/// critical issues first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    /// Every severity, most severe first.
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Info => "info",
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Info => "Info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Regulatory category a rule (and its issues) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    MisleadingClaims,
    UnsubstantiatedClaims,
    PricingIssues,
    DisclaimerMissing,
    ProhibitedTerms,
    ComparativeAdvertising,
    TestimonialIssues,
    UrgencyManipulation,
    HiddenConditions,
    DataPrivacy,
    EnvironmentalClaims,
    HealthClaims,
    FinancialClaims,
    TargetAudience,
}

impl Category {
    /// Every category, in catalog display order.
    pub const ALL: [Category; 14] = [
        Category::MisleadingClaims,
        Category::UnsubstantiatedClaims,
        Category::PricingIssues,
        Category::DisclaimerMissing,
        Category::ProhibitedTerms,
        Category::ComparativeAdvertising,
        Category::TestimonialIssues,
        Category::UrgencyManipulation,
        Category::HiddenConditions,
        Category::DataPrivacy,
        Category::EnvironmentalClaims,
        Category::HealthClaims,
        Category::FinancialClaims,
        Category::TargetAudience,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::MisleadingClaims => "misleading_claims",
            Category::UnsubstantiatedClaims => "unsubstantiated_claims",
            Category::PricingIssues => "pricing_issues",
            Category::DisclaimerMissing => "disclaimer_missing",
            Category::ProhibitedTerms => "prohibited_terms",
            Category::ComparativeAdvertising => "comparative_advertising",
            Category::TestimonialIssues => "testimonial_issues",
            Category::UrgencyManipulation => "urgency_manipulation",
            Category::HiddenConditions => "hidden_conditions",
            Category::DataPrivacy => "data_privacy",
            Category::EnvironmentalClaims => "environmental_claims",
            Category::HealthClaims => "health_claims",
            Category::FinancialClaims => "financial_claims",
            Category::TargetAudience => "target_audience",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::MisleadingClaims => "Misleading Claims",
            Category::UnsubstantiatedClaims => "Unsubstantiated Claims",
            Category::PricingIssues => "Pricing Issues",
            Category::DisclaimerMissing => "Missing Disclaimers",
            Category::ProhibitedTerms => "Prohibited Terms",
            Category::ComparativeAdvertising => "Comparative Advertising",
            Category::TestimonialIssues => "Testimonial Issues",
            Category::UrgencyManipulation => "Urgency Manipulation",
            Category::HiddenConditions => "Hidden Conditions",
            Category::DataPrivacy => "Data Privacy",
            Category::EnvironmentalClaims => "Environmental Claims",
            Category::HealthClaims => "Health Claims",
            Category::FinancialClaims => "Financial Claims",
            Category::TargetAudience => "Target Audience",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Byte range of a match inside the analyzed content.
///
/// Offsets always fall on UTF-8 character boundaries and `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub start: usize,
    pub end: usize,
}

impl Position {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A single rule match found in the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// `{rule_id}-{start}-{end}`, unique within one analysis
    pub id: String,

    /// Id of the rule that produced this issue
    pub rule_id: String,

    pub category: Category,
    pub severity: Severity,

    /// Rule name
    pub title: String,

    pub description: String,

    /// Exact text of the match (`&content[start..end]`)
    pub matched_text: String,

    pub position: Position,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulation: Option<String>,
}

/// Options controlling a mode A analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Free-form content type tag (e.g. "email", "social")
    pub content_type: String,

    /// Reserved: not used in scoring
    pub strict_mode: bool,

    /// Whether rules of `info` severity are applied
    pub include_info_level: bool,

    /// Reserved: target market tag
    pub target_market: Option<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            content_type: "general".to_string(),
            strict_mode: false,
            include_info_level: true,
            target_market: None,
        }
    }
}

impl AnalysisOptions {
    /// Whether rules of the given severity take part in this analysis.
    pub fn includes(&self, severity: Severity) -> bool {
        self.include_info_level || severity != Severity::Info
    }
}

/// Aggregate counts over a list of issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_issues: usize,
    pub critical_count: usize,
    pub high_count: usize,
    pub medium_count: usize,
    pub low_count: usize,
    pub info_count: usize,

    /// Always holds every category, zero when absent
    pub category_counts: BTreeMap<Category, usize>,
}

impl AnalysisSummary {
    /// Count of issues with the given severity.
    pub fn count_for(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical_count,
            Severity::High => self.high_count,
            Severity::Medium => self.medium_count,
            Severity::Low => self.low_count,
            Severity::Info => self.info_count,
        }
    }
}

/// Result of a mode A analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,

    /// Ordered by `position.start`
    pub issues: Vec<Issue>,

    /// 0 (worst) to 100 (best)
    pub score: u8,

    pub summary: AnalysisSummary,
}

static RESULT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate a result id from the timestamp and a process-wide sequence.
pub(crate) fn next_result_id(timestamp: &DateTime<Utc>) -> String {
    let seq = RESULT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}-{:06}", timestamp.timestamp_millis(), seq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }

    #[test]
    fn test_category_round_trips_through_snake_case() {
        let json = serde_json::to_string(&Category::UrgencyManipulation).unwrap();
        assert_eq!(json, "\"urgency_manipulation\"");
        let parsed: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Category::UrgencyManipulation);
    }

    #[test]
    fn test_severity_ordering_puts_critical_first() {
        let mut severities = vec![Severity::Info, Severity::Critical, Severity::Medium];
        severities.sort();
        assert_eq!(severities, vec![Severity::Critical, Severity::Medium, Severity::Info]);
    }

    #[test]
    fn test_options_exclude_info_when_disabled() {
        let options = AnalysisOptions {
            include_info_level: false,
            ..Default::default()
        };
        assert!(!options.includes(Severity::Info));
        assert!(options.includes(Severity::Low));
    }

    #[test]
    fn test_result_ids_are_unique() {
        let now = Utc::now();
        assert_ne!(next_result_id(&now), next_result_id(&now));
    }
}
