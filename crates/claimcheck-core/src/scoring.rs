//! Scoring and summarization of detected issues.
//!
//! The score starts at 100 and loses a fixed weight per issue according to
//! its severity, independent of category. It never drops below 0.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{AnalysisSummary, Category, Issue, Severity};

/// Per-severity score deductions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub critical: u32,
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    pub info: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            critical: 25,
            high: 15,
            medium: 8,
            low: 3,
            info: 1,
        }
    }
}

impl ScoringWeights {
    pub fn weight(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
            Severity::Info => self.info,
        }
    }
}

/// Sum of deductions for the given issues.
pub fn total_deduction(issues: &[Issue], weights: &ScoringWeights) -> u32 {
    issues
        .iter()
        .fold(0u32, |sum, issue| sum.saturating_add(weights.weight(issue.severity)))
}

/// Reduce issues to a score in `[0, 100]`.
pub fn score(issues: &[Issue], weights: &ScoringWeights) -> u8 {
    let remaining = 100u32.saturating_sub(total_deduction(issues, weights));
    remaining as u8
}

/// Count issues by severity and by category.
///
/// Every category is present in `category_counts`, zero when unused.
pub fn summarize(issues: &[Issue]) -> AnalysisSummary {
    let mut category_counts: BTreeMap<Category, usize> =
        Category::ALL.iter().map(|c| (*c, 0)).collect();

    let mut summary = AnalysisSummary {
        total_issues: issues.len(),
        critical_count: 0,
        high_count: 0,
        medium_count: 0,
        low_count: 0,
        info_count: 0,
        category_counts: BTreeMap::new(),
    };

    for issue in issues {
        *category_counts.entry(issue.category).or_insert(0) += 1;

        match issue.severity {
            Severity::Critical => summary.critical_count += 1,
            Severity::High => summary.high_count += 1,
            Severity::Medium => summary.medium_count += 1,
            Severity::Low => summary.low_count += 1,
            Severity::Info => summary.info_count += 1,
        }
    }

    summary.category_counts = category_counts;
    summary
}

/// Keep issues whose severity is listed. Order is preserved.
pub fn filter_by_severity(issues: &[Issue], severities: &[Severity]) -> Vec<Issue> {
    issues
        .iter()
        .filter(|issue| severities.contains(&issue.severity))
        .cloned()
        .collect()
}

/// Keep issues whose category is listed. Order is preserved.
pub fn filter_by_category(issues: &[Issue], categories: &[Category]) -> Vec<Issue> {
    issues
        .iter()
        .filter(|issue| categories.contains(&issue.category))
        .cloned()
        .collect()
}

/// A span to highlight in the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRange {
    pub start: usize,
    pub end: usize,
    pub severity: Severity,
    pub issue_id: String,
}

pub fn highlight_ranges(issues: &[Issue]) -> Vec<HighlightRange> {
    issues
        .iter()
        .map(|issue| HighlightRange {
            start: issue.position.start,
            end: issue.position.end,
            severity: issue.severity,
            issue_id: issue.id.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    fn issue(severity: Severity, category: Category, start: usize) -> Issue {
        Issue {
            id: format!("test-{}-{}", start, start + 1),
            rule_id: "test".to_string(),
            category,
            severity,
            title: "Test".to_string(),
            description: "Test issue".to_string(),
            matched_text: "x".to_string(),
            position: Position::new(start, start + 1),
            suggestion: None,
            regulation: None,
        }
    }

    #[test]
    fn test_no_issues_scores_100() {
        assert_eq!(score(&[], &ScoringWeights::default()), 100);
    }

    #[test]
    fn test_deductions_by_severity() {
        let issues = vec![
            issue(Severity::Critical, Category::FinancialClaims, 0),
            issue(Severity::High, Category::MisleadingClaims, 1),
            issue(Severity::Medium, Category::PricingIssues, 2),
            issue(Severity::Low, Category::UrgencyManipulation, 3),
            issue(Severity::Info, Category::DataPrivacy, 4),
        ];
        // 100 - (25 + 15 + 8 + 3 + 1)
        assert_eq!(score(&issues, &ScoringWeights::default()), 48);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let issues: Vec<_> = (0..10)
            .map(|i| issue(Severity::Critical, Category::HealthClaims, i))
            .collect();
        assert_eq!(score(&issues, &ScoringWeights::default()), 0);
    }

    #[test]
    fn test_custom_weights() {
        let weights = ScoringWeights {
            high: 50,
            ..Default::default()
        };
        let issues = vec![issue(Severity::High, Category::MisleadingClaims, 0)];
        assert_eq!(score(&issues, &weights), 50);
    }

    #[test]
    fn test_summary_initializes_every_category() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_issues, 0);
        assert_eq!(summary.category_counts.len(), Category::ALL.len());
        assert!(summary.category_counts.values().all(|c| *c == 0));
    }

    #[test]
    fn test_summary_counts_sum_to_total() {
        let issues = vec![
            issue(Severity::High, Category::MisleadingClaims, 0),
            issue(Severity::High, Category::MisleadingClaims, 5),
            issue(Severity::Low, Category::UrgencyManipulation, 9),
        ];
        let summary = summarize(&issues);

        let by_severity: usize = Severity::ALL.iter().map(|s| summary.count_for(*s)).sum();
        let by_category: usize = summary.category_counts.values().sum();
        assert_eq!(by_severity, 3);
        assert_eq!(by_category, 3);
        assert_eq!(summary.category_counts[&Category::MisleadingClaims], 2);
    }

    #[test]
    fn test_filter_by_all_severities_is_identity() {
        let issues = vec![
            issue(Severity::Low, Category::DataPrivacy, 0),
            issue(Severity::Critical, Category::HealthClaims, 3),
        ];
        assert_eq!(filter_by_severity(&issues, &Severity::ALL), issues);
    }

    #[test]
    fn test_filter_by_category() {
        let issues = vec![
            issue(Severity::Low, Category::DataPrivacy, 0),
            issue(Severity::Critical, Category::HealthClaims, 3),
        ];
        let filtered = filter_by_category(&issues, &[Category::HealthClaims]);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].position.start, 3);
    }

    #[test]
    fn test_highlight_ranges_mirror_issues() {
        let issues = vec![issue(Severity::Medium, Category::PricingIssues, 7)];
        let ranges = highlight_ranges(&issues);
        assert_eq!(ranges[0].start, 7);
        assert_eq!(ranges[0].end, 8);
        assert_eq!(ranges[0].issue_id, issues[0].id);
    }
}
