//! Finding aggregation for display: enrich, filter, sort and group.
//!
//! Views are derived data. They are rebuilt on every view-option change
//! and never stored.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::audit::{AnalysisByText, Criticality, Finding, FindingStatus, StatusCounts};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    #[default]
    SourceText,
    Status,
    Criticality,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    CriticalityDesc,
    CriticalityAsc,
    Status,
    Alphabetical,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    pub group_by: GroupBy,
    pub show_not_applicable: bool,
    pub sort_by: SortBy,
}

/// A finding tagged with the regulatory text it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedFinding {
    #[serde(flatten)]
    pub finding: Finding,
    pub source_code: String,
    pub source_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingGroup {
    pub key: String,
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub findings: Vec<EnrichedFinding>,
    pub stats: StatusCounts,
}

impl FindingGroup {
    /// Stats count every member, hidden or not. `None` when nothing is
    /// left to display.
    fn new(
        key: &str,
        label: &str,
        description: Option<String>,
        mut findings: Vec<EnrichedFinding>,
        show_not_applicable: bool,
    ) -> Option<Self> {
        let stats = StatusCounts::from_statuses(findings.iter().map(|f| f.finding.status));
        if !show_not_applicable {
            findings.retain(|f| f.finding.status != FindingStatus::NotApplicable);
        }
        if findings.is_empty() {
            return None;
        }

        Some(Self {
            key: key.to_string(),
            label: label.to_string(),
            description,
            findings,
            stats,
        })
    }
}

/// Flatten per-text analyses, tagging each finding with its source.
pub fn enrich_findings(analyses: &[AnalysisByText]) -> Vec<EnrichedFinding> {
    analyses
        .iter()
        .flat_map(|analysis| {
            analysis.findings.iter().map(move |finding| EnrichedFinding {
                finding: finding.clone(),
                source_code: analysis.source_code.clone(),
                source_title: analysis.title.clone(),
            })
        })
        .collect()
}

/// Stable sort; equal keys keep their input order.
pub fn sort_findings(findings: &mut [EnrichedFinding], sort_by: SortBy) {
    findings.sort_by(|a, b| compare(a, b, sort_by));
}

fn compare(a: &EnrichedFinding, b: &EnrichedFinding, sort_by: SortBy) -> Ordering {
    match sort_by {
        SortBy::CriticalityDesc => b
            .finding
            .criticality_level
            .cmp(&a.finding.criticality_level),
        SortBy::CriticalityAsc => a
            .finding
            .criticality_level
            .cmp(&b.finding.criticality_level),
        SortBy::Status => a.finding.status.as_str().cmp(b.finding.status.as_str()),
        SortBy::Alphabetical => a.finding.obligation_id.cmp(&b.finding.obligation_id),
    }
}

/// Sort, group and filter findings for display.
///
/// Members keep their sorted order within each group. Group stats are
/// computed before NOT_APPLICABLE members are hidden, so they do not
/// depend on the view options. Only groups with visible members are
/// returned.
pub fn group_findings(mut findings: Vec<EnrichedFinding>, options: &ViewOptions) -> Vec<FindingGroup> {
    sort_findings(&mut findings, options.sort_by);

    let show = options.show_not_applicable;
    match options.group_by {
        GroupBy::SourceText => group_by_source(findings, show),
        GroupBy::Status => group_by_status(findings, show),
        GroupBy::Criticality => group_by_criticality(findings, show),
    }
}

/// Enrich then group, straight from an audit result.
pub fn group_analyses(analyses: &[AnalysisByText], options: &ViewOptions) -> Vec<FindingGroup> {
    group_findings(enrich_findings(analyses), options)
}

/// Findings hidden when NOT_APPLICABLE ones are filtered out.
pub fn count_not_applicable(analyses: &[AnalysisByText]) -> usize {
    analyses.iter().map(|a| a.counts.not_applicable).sum()
}

fn group_by_source(findings: Vec<EnrichedFinding>, show_not_applicable: bool) -> Vec<FindingGroup> {
    // Groups appear in order of first member.
    let mut buckets: Vec<(String, Vec<EnrichedFinding>)> = Vec::new();
    for finding in findings {
        match buckets.iter_mut().find(|(code, _)| *code == finding.source_code) {
            Some((_, members)) => members.push(finding),
            None => buckets.push((finding.source_code.clone(), vec![finding])),
        }
    }

    buckets
        .into_iter()
        .filter_map(|(code, members)| {
            let description = members.first().map(|f| f.source_title.clone());
            FindingGroup::new(&code, &code, description, members, show_not_applicable)
        })
        .collect()
}

fn group_by_status(findings: Vec<EnrichedFinding>, show_not_applicable: bool) -> Vec<FindingGroup> {
    FindingStatus::DISPLAY_ORDER
        .iter()
        .filter_map(|status| {
            let members: Vec<_> = findings
                .iter()
                .filter(|f| f.finding.status == *status)
                .cloned()
                .collect();
            FindingGroup::new(status.as_str(), status.label(), None, members, show_not_applicable)
        })
        .collect()
}

fn group_by_criticality(findings: Vec<EnrichedFinding>, show_not_applicable: bool) -> Vec<FindingGroup> {
    Criticality::DISPLAY_ORDER
        .iter()
        .filter_map(|criticality| {
            let members: Vec<_> = findings
                .iter()
                .filter(|f| f.finding.criticality == *criticality)
                .cloned()
                .collect();
            FindingGroup::new(
                criticality.as_str(),
                criticality.label(),
                None,
                members,
                show_not_applicable,
            )
        })
        .collect()
}
