//! Obligation audit: evaluates every applicable checklist against a
//! document and rolls findings up into a report.
//!
//! Each obligation goes through a fixed chain of keyword heuristics:
//! 1. Topic checks (risk, promotional character, fees) decide on their own.
//! 2. A misleading term anywhere makes a general obligation NON_COMPLIANT.
//! 3. Any positive compliance keyword makes it COMPLIANT.
//! 4. Otherwise the configured [`FallbackPolicy`] decides.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::keywords::{
    find_misleading_term, has_positive_indicator, mentions_fees, mentions_promotional_character,
    risk_excerpt,
};
use super::obligations::{checklist, mandatory_mention, Criticality, Obligation, ObligationTopic};
use super::qualification::Qualification;
use super::AuditError;

const MENTION_LOCATION: &str = "En-tête ou pied de document";
const MENTION_FORMAT: &str = "Lisible et visible";
const CORRECTIVE_LOCATION: &str = "À définir selon le format du document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingStatus {
    Compliant,
    NonCompliant,
    Improvement,
    NotApplicable,
    NotVerifiable,
}

impl FindingStatus {
    /// Display order used by status grouping.
    pub const DISPLAY_ORDER: [FindingStatus; 5] = [
        FindingStatus::NonCompliant,
        FindingStatus::Improvement,
        FindingStatus::Compliant,
        FindingStatus::NotApplicable,
        FindingStatus::NotVerifiable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FindingStatus::Compliant => "COMPLIANT",
            FindingStatus::NonCompliant => "NON_COMPLIANT",
            FindingStatus::Improvement => "IMPROVEMENT",
            FindingStatus::NotApplicable => "NOT_APPLICABLE",
            FindingStatus::NotVerifiable => "NOT_VERIFIABLE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FindingStatus::Compliant => "Compliant",
            FindingStatus::NonCompliant => "Non-compliant",
            FindingStatus::Improvement => "Suggested improvement",
            FindingStatus::NotApplicable => "Not applicable",
            FindingStatus::NotVerifiable => "Not verifiable",
        }
    }
}

impl fmt::Display for FindingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CorrectiveActionType {
    Add,
    Modify,
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectiveAction {
    #[serde(rename = "type")]
    pub action_type: CorrectiveActionType,
    pub full_text: String,
    pub location: String,
}

/// Evaluated outcome of one obligation against one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub obligation_id: String,
    pub status: FindingStatus,
    pub criticality: Criticality,

    /// Ordinal of `criticality`, 4 for Critical down to 1 for Info
    pub criticality_level: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    pub comment: String,

    /// Present on every NON_COMPLIANT finding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrective_action: Option<CorrectiveAction>,
}

/// Per-status counts. Shared by per-text rollups and group stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: usize,
    pub compliant: usize,
    pub non_compliant: usize,
    pub improvement: usize,
    pub not_applicable: usize,
    pub not_verifiable: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: FindingStatus) {
        self.total += 1;
        match status {
            FindingStatus::Compliant => self.compliant += 1,
            FindingStatus::NonCompliant => self.non_compliant += 1,
            FindingStatus::Improvement => self.improvement += 1,
            FindingStatus::NotApplicable => self.not_applicable += 1,
            FindingStatus::NotVerifiable => self.not_verifiable += 1,
        }
    }

    pub fn from_statuses<I: IntoIterator<Item = FindingStatus>>(statuses: I) -> Self {
        let mut counts = Self::default();
        for status in statuses {
            counts.record(status);
        }
        counts
    }

    pub fn count_for(&self, status: FindingStatus) -> usize {
        match status {
            FindingStatus::Compliant => self.compliant,
            FindingStatus::NonCompliant => self.non_compliant,
            FindingStatus::Improvement => self.improvement,
            FindingStatus::NotApplicable => self.not_applicable,
            FindingStatus::NotVerifiable => self.not_verifiable,
        }
    }
}

/// Findings for one regulatory text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisByText {
    pub source_code: String,
    pub title: String,
    pub counts: StatusCounts,
    pub findings: Vec<Finding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Compliant,
    NeedsReview,
    NonCompliant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub verdict: Verdict,
    pub obligations_checked: usize,
    pub counts: StatusCounts,

    /// Share of compliant findings among decided ones, 0 when none decided
    pub score: u8,
}

/// A mandatory mention the document lacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingMention {
    pub obligation_id: String,
    pub full_text: String,
    pub location: String,
    pub format: String,
}

/// Mode B result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditResult {
    pub qualification: Qualification,
    pub report: AuditReport,
    pub analyses_by_text: Vec<AnalysisByText>,
    pub missing_mentions: Vec<MissingMention>,
    pub synthesis: String,
}

/// How to decide obligations that no heuristic resolves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Always NOT_VERIFIABLE
    #[default]
    NotVerifiable,

    /// 60% COMPLIANT, 20% IMPROVEMENT, 20% NOT_APPLICABLE, bucketed by a
    /// stable hash of the obligation and content
    WeightedSplit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Minimum score for a COMPLIANT verdict
    pub compliant_threshold: u8,

    /// Minimum score for NEEDS_REVIEW; below is NON_COMPLIANT
    pub review_threshold: u8,

    pub fallback: FallbackPolicy,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            compliant_threshold: 80,
            review_threshold: 50,
            fallback: FallbackPolicy::default(),
        }
    }
}

impl AuditConfig {
    pub fn verdict(&self, score: u8) -> Verdict {
        if score >= self.compliant_threshold {
            Verdict::Compliant
        } else if score >= self.review_threshold {
            Verdict::NeedsReview
        } else {
            Verdict::NonCompliant
        }
    }
}

/// Runs obligation checklists against documents.
#[derive(Debug, Clone, Default)]
pub struct Auditor {
    config: AuditConfig,
}

impl Auditor {
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Audit `content` against every source in `qualification`.
    pub fn audit(
        &self,
        content: &str,
        qualification: &Qualification,
    ) -> Result<AuditResult, AuditError> {
        qualification.validate()?;

        let mut analyses_by_text = Vec::with_capacity(qualification.applicable_sources.len());
        let mut missing_mentions = Vec::new();
        let mut totals = StatusCounts::default();

        for source in &qualification.applicable_sources {
            let obligations = checklist(&source.code);
            if obligations.is_empty() {
                tracing::warn!(code = %source.code, "No checklist for regulatory text");
            }

            let findings: Vec<Finding> = obligations
                .iter()
                .map(|obligation| self.evaluate(obligation, content))
                .collect();

            for finding in &findings {
                totals.record(finding.status);

                if finding.status == FindingStatus::NonCompliant && finding.criticality_level >= 3
                {
                    missing_mentions.push(MissingMention {
                        obligation_id: finding.obligation_id.clone(),
                        full_text: mandatory_mention(&finding.obligation_id).to_string(),
                        location: MENTION_LOCATION.to_string(),
                        format: MENTION_FORMAT.to_string(),
                    });
                }
            }

            analyses_by_text.push(AnalysisByText {
                source_code: source.code.clone(),
                title: source.title.clone(),
                counts: StatusCounts::from_statuses(findings.iter().map(|f| f.status)),
                findings,
            });
        }

        let score = compliance_score(&totals);
        let report = AuditReport {
            verdict: self.config.verdict(score),
            obligations_checked: totals.total,
            counts: totals,
            score,
        };
        let synthesis = self.synthesize(&report, qualification);

        tracing::debug!(
            score,
            verdict = ?report.verdict,
            obligations = totals.total,
            missing = missing_mentions.len(),
            "Audit complete"
        );

        Ok(AuditResult {
            qualification: qualification.clone(),
            report,
            analyses_by_text,
            missing_mentions,
            synthesis,
        })
    }

    /// Evaluate one obligation against the content.
    pub fn evaluate(&self, obligation: &Obligation, content: &str) -> Finding {
        let (status, comment, excerpt) = match obligation.topic {
            ObligationTopic::RiskDisclosure => match risk_excerpt(content) {
                Some(excerpt) => (
                    FindingStatus::Compliant,
                    "Le risque est mentionné dans le document.".to_string(),
                    Some(excerpt.to_string()),
                ),
                None => (
                    FindingStatus::NonCompliant,
                    "Aucune mention du risque n'a été identifiée dans le document.".to_string(),
                    None,
                ),
            },
            ObligationTopic::PromotionalCharacter => {
                if mentions_promotional_character(content) {
                    (
                        FindingStatus::Compliant,
                        "Le caractère promotionnel est indiqué.".to_string(),
                        None,
                    )
                } else {
                    (
                        FindingStatus::NonCompliant,
                        "Le caractère promotionnel du document n'est pas mentionné.".to_string(),
                        None,
                    )
                }
            }
            ObligationTopic::FeeDisclosure => {
                if mentions_fees(content) {
                    (
                        FindingStatus::Compliant,
                        "Les frais sont mentionnés.".to_string(),
                        None,
                    )
                } else {
                    (
                        FindingStatus::Improvement,
                        "Les frais ne sont pas explicitement mentionnés.".to_string(),
                        None,
                    )
                }
            }
            ObligationTopic::General => self.evaluate_general(obligation, content),
        };

        let corrective_action = (status == FindingStatus::NonCompliant).then(|| CorrectiveAction {
            action_type: CorrectiveActionType::Add,
            full_text: mandatory_mention(obligation.id).to_string(),
            location: CORRECTIVE_LOCATION.to_string(),
        });

        Finding {
            obligation_id: obligation.id.to_string(),
            status,
            criticality: obligation.criticality,
            criticality_level: obligation.criticality.level(),
            excerpt,
            comment,
            corrective_action,
        }
    }

    fn evaluate_general(
        &self,
        obligation: &Obligation,
        content: &str,
    ) -> (FindingStatus, String, Option<String>) {
        if let Some((term, excerpt)) = find_misleading_term(content) {
            return (
                FindingStatus::NonCompliant,
                format!("Terme potentiellement trompeur détecté: \"{}\"", term),
                Some(excerpt.to_string()),
            );
        }

        if has_positive_indicator(content) {
            return (
                FindingStatus::Compliant,
                "Les éléments requis semblent présents.".to_string(),
                None,
            );
        }

        let status = match self.config.fallback {
            FallbackPolicy::NotVerifiable => FindingStatus::NotVerifiable,
            FallbackPolicy::WeightedSplit => match stable_bucket(obligation.id, content) {
                0..=5 => FindingStatus::Compliant,
                6..=7 => FindingStatus::Improvement,
                _ => FindingStatus::NotApplicable,
            },
        };

        let comment = match status {
            FindingStatus::Compliant => "Obligation respectée.",
            FindingStatus::Improvement => {
                "Une amélioration pourrait être apportée pour plus de clarté."
            }
            FindingStatus::NotApplicable => "Non applicable dans ce contexte.",
            _ => "Aucun indice exploitable dans le document pour cette obligation.",
        };

        (status, comment.to_string(), None)
    }

    fn synthesize(&self, report: &AuditReport, qualification: &Qualification) -> String {
        let score = report.score;
        let mut synthesis = match report.verdict {
            Verdict::Compliant => format!(
                "Ce document marketing pour {} présente un bon niveau de conformité ({}%). ",
                qualification.product.category, score
            ),
            Verdict::NeedsReview => format!(
                "Ce document marketing nécessite des ajustements. Score de conformité: {}%. ",
                score
            ),
            Verdict::NonCompliant => format!(
                "ATTENTION: Ce document présente des non-conformités significatives (score: {}%). \
                 Une révision approfondie est recommandée. ",
                score
            ),
        };

        if report.counts.non_compliant > 0 {
            synthesis.push_str(&format!(
                "{} non-conformité(s) identifiée(s) nécessitant une correction. ",
                report.counts.non_compliant
            ));
        }

        if report.counts.improvement > 0 {
            synthesis.push_str(&format!(
                "{} amélioration(s) suggérée(s) pour optimiser la conformité.",
                report.counts.improvement
            ));
        }

        synthesis.trim().to_string()
    }
}

/// round(100 * compliant / (compliant + non_compliant + improvement)).
pub fn compliance_score(counts: &StatusCounts) -> u8 {
    let decided = counts.compliant + counts.non_compliant + counts.improvement;
    if decided == 0 {
        return 0;
    }
    ((counts.compliant as f64 / decided as f64) * 100.0).round() as u8
}

/// Bucket in `0..10`, stable across runs for the same inputs.
fn stable_bucket(obligation_id: &str, content: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    obligation_id.hash(&mut hasher);
    content.hash(&mut hasher);
    hasher.finish() % 10
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::qualification::qualify;

    const NEUTRAL: &str = "Découvrez notre solution d'épargne pour préparer demain.";

    fn obligation(topic: ObligationTopic) -> Obligation {
        Obligation {
            id: "TEST-1",
            description: "Test",
            criticality: Criticality::Major,
            topic,
        }
    }

    #[test]
    fn test_risk_obligation() {
        let auditor = Auditor::default();
        let missing = auditor.evaluate(&obligation(ObligationTopic::RiskDisclosure), NEUTRAL);
        assert_eq!(missing.status, FindingStatus::NonCompliant);
        assert!(missing.corrective_action.is_some());

        let present = auditor.evaluate(
            &obligation(ObligationTopic::RiskDisclosure),
            "Attention : risque de perte en capital.",
        );
        assert_eq!(present.status, FindingStatus::Compliant);
        assert!(present.excerpt.unwrap().contains("risque"));
        assert!(present.corrective_action.is_none());
    }

    #[test]
    fn test_finding_serializes_criticality_level() {
        let finding = Auditor::default().evaluate(&obligation(ObligationTopic::RiskDisclosure), NEUTRAL);
        assert_eq!(finding.criticality_level, 3);

        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["criticality"], "Major");
        assert_eq!(json["criticality_level"], 3);
    }

    #[test]
    fn test_missing_fees_is_only_an_improvement() {
        let finding = Auditor::default().evaluate(&obligation(ObligationTopic::FeeDisclosure), NEUTRAL);
        assert_eq!(finding.status, FindingStatus::Improvement);
        assert!(finding.corrective_action.is_none());
    }

    #[test]
    fn test_promotional_obligation() {
        let auditor = Auditor::default();
        let topic = obligation(ObligationTopic::PromotionalCharacter);
        assert_eq!(auditor.evaluate(&topic, NEUTRAL).status, FindingStatus::NonCompliant);
        assert_eq!(
            auditor.evaluate(&topic, "Document publicitaire.").status,
            FindingStatus::Compliant
        );
    }

    #[test]
    fn test_misleading_term_quoted_in_comment() {
        let finding = Auditor::default().evaluate(
            &obligation(ObligationTopic::General),
            "Un rendement garanti pour tous.",
        );
        assert_eq!(finding.status, FindingStatus::NonCompliant);
        assert!(finding.comment.contains("\"garanti\""));
        assert!(finding.excerpt.unwrap().contains("garanti"));
    }

    #[test]
    fn test_positive_keyword_makes_general_compliant() {
        let finding = Auditor::default().evaluate(
            &obligation(ObligationTopic::General),
            "Consultez le prospectus avant d'investir.",
        );
        assert_eq!(finding.status, FindingStatus::Compliant);
    }

    #[test]
    fn test_default_fallback_is_not_verifiable() {
        let finding = Auditor::default().evaluate(&obligation(ObligationTopic::General), NEUTRAL);
        assert_eq!(finding.status, FindingStatus::NotVerifiable);
    }

    #[test]
    fn test_weighted_split_is_stable() {
        let auditor = Auditor::new(AuditConfig {
            fallback: FallbackPolicy::WeightedSplit,
            ..Default::default()
        });
        let topic = obligation(ObligationTopic::General);
        let first = auditor.evaluate(&topic, NEUTRAL);
        let second = auditor.evaluate(&topic, NEUTRAL);
        assert_eq!(first, second);
        assert!(matches!(
            first.status,
            FindingStatus::Compliant | FindingStatus::Improvement | FindingStatus::NotApplicable
        ));
    }

    #[test]
    fn test_score_ignores_undecided() {
        let counts = StatusCounts {
            total: 6,
            compliant: 2,
            non_compliant: 1,
            improvement: 1,
            not_applicable: 1,
            not_verifiable: 1,
        };
        assert_eq!(compliance_score(&counts), 50);
        assert_eq!(compliance_score(&StatusCounts::default()), 0);
    }

    #[test]
    fn test_verdict_thresholds() {
        let config = AuditConfig::default();
        assert_eq!(config.verdict(100), Verdict::Compliant);
        assert_eq!(config.verdict(80), Verdict::Compliant);
        assert_eq!(config.verdict(79), Verdict::NeedsReview);
        assert_eq!(config.verdict(50), Verdict::NeedsReview);
        assert_eq!(config.verdict(49), Verdict::NonCompliant);
    }

    #[test]
    fn test_rollup_counts_sum_to_total() {
        let content = "Notre SCPI offre un rendement garanti. Frais d'entrée 10%.";
        let result = Auditor::default().audit(content, &qualify(content)).unwrap();

        for analysis in &result.analyses_by_text {
            let c = analysis.counts;
            assert_eq!(c.total, analysis.findings.len());
            assert_eq!(
                c.compliant + c.non_compliant + c.improvement + c.not_applicable + c.not_verifiable,
                c.total
            );
        }
        assert_eq!(result.report.obligations_checked, 7 + 3);
    }

    #[test]
    fn test_missing_mentions_only_for_major_and_above() {
        let content = "Notre SCPI offre un rendement garanti à tous nos clients.";
        let result = Auditor::default().audit(content, &qualify(content)).unwrap();

        assert!(!result.missing_mentions.is_empty());
        for mention in &result.missing_mentions {
            let finding = result
                .analyses_by_text
                .iter()
                .flat_map(|a| &a.findings)
                .find(|f| f.obligation_id == mention.obligation_id)
                .unwrap();
            assert_eq!(finding.status, FindingStatus::NonCompliant);
            assert!(finding.criticality_level >= 3);
        }
        assert!(result
            .missing_mentions
            .iter()
            .any(|m| m.full_text == "Document à caractère promotionnel"));
    }

    #[test]
    fn test_audit_rejects_qualification_without_sources() {
        let mut qualification = qualify(NEUTRAL);
        qualification.applicable_sources.clear();
        assert!(matches!(
            Auditor::default().audit(NEUTRAL, &qualification),
            Err(AuditError::NoApplicableSource)
        ));
    }

    #[test]
    fn test_synthesis_mentions_counts() {
        let content = "Notre SCPI offre un rendement garanti à tous nos clients.";
        let result = Auditor::default().audit(content, &qualify(content)).unwrap();
        assert_eq!(result.report.verdict, Verdict::NonCompliant);
        assert!(result.synthesis.starts_with("ATTENTION"));
        assert!(result.synthesis.contains("non-conformité(s)"));
    }
}
