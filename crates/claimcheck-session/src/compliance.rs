//! Mode A session: analyze, keep the current result, filter its issues.

use std::sync::Arc;

use claimcheck_core::scoring::{filter_by_category, filter_by_severity};
use claimcheck_core::{
    AnalysisOptions, AnalysisResult, Analyzer, Category, ContentLimits, EngineConfig, Issue,
    ReportData, RuleCatalog, Severity,
};

use crate::history::AnalysisHistory;
use crate::{validate_content, SessionError};

pub struct ComplianceSession<'a> {
    analyzer: Analyzer<'a>,
    limits: ContentLimits,
    default_options: AnalysisOptions,
    result: Option<Arc<AnalysisResult>>,
    history: AnalysisHistory,
    severity_filter: Vec<Severity>,
    category_filter: Vec<Category>,
}

impl ComplianceSession<'static> {
    /// Session over the built-in catalog.
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_catalog(RuleCatalog::builtin(), config)
    }
}

impl Default for ComplianceSession<'static> {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl<'a> ComplianceSession<'a> {
    pub fn with_catalog(catalog: &'a RuleCatalog, config: &EngineConfig) -> Self {
        Self {
            analyzer: Analyzer::new(catalog, config.scoring),
            limits: config.limits,
            default_options: AnalysisOptions::default(),
            result: None,
            history: AnalysisHistory::new(config.history_capacity),
            severity_filter: Severity::ALL.to_vec(),
            category_filter: Vec::new(),
        }
    }

    /// Analyze with the session's default options.
    pub fn analyze(&mut self, content: &str) -> Result<Arc<AnalysisResult>, SessionError> {
        let options = self.default_options.clone();
        self.analyze_with(content, &options)
    }

    /// Analyze, make the result current and record it in history.
    ///
    /// On error the previous result stays current.
    pub fn analyze_with(
        &mut self,
        content: &str,
        options: &AnalysisOptions,
    ) -> Result<Arc<AnalysisResult>, SessionError> {
        validate_content(content, &self.limits)?;

        let result = Arc::new(self.analyzer.analyze(content, options));
        self.history.push(Arc::clone(&result));
        self.result = Some(Arc::clone(&result));

        tracing::debug!(
            result_id = %result.id,
            score = result.score,
            history = self.history.len(),
            "Session analysis stored"
        );

        Ok(result)
    }

    pub fn set_default_options(&mut self, options: AnalysisOptions) {
        self.default_options = options;
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_deref()
    }

    pub fn history(&self) -> &AnalysisHistory {
        &self.history
    }

    pub fn severity_filter(&self) -> &[Severity] {
        &self.severity_filter
    }

    /// Empty, or every severity, means no filtering.
    pub fn set_severity_filter(&mut self, severities: Vec<Severity>) {
        self.severity_filter = severities;
    }

    pub fn category_filter(&self) -> &[Category] {
        &self.category_filter
    }

    /// Empty means every category.
    pub fn set_category_filter(&mut self, categories: Vec<Category>) {
        self.category_filter = categories;
    }

    /// Issues of the current result that pass both filters, in order.
    pub fn filtered_issues(&self) -> Vec<Issue> {
        let Some(result) = &self.result else {
            return Vec::new();
        };

        let mut issues = result.issues.clone();

        let selects_all = Severity::ALL.iter().all(|s| self.severity_filter.contains(s));
        if !self.severity_filter.is_empty() && !selects_all {
            issues = filter_by_severity(&issues, &self.severity_filter);
        }

        if !self.category_filter.is_empty() {
            issues = filter_by_category(&issues, &self.category_filter);
        }

        issues
    }

    /// Report data for the current result.
    pub fn report(&self) -> Option<ReportData> {
        self.result.as_deref().map(ReportData::from)
    }

    pub fn clear_result(&mut self) {
        self.result = None;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COPY: &str = "Act now! Our miracle formula is clinically proven. Starting at $19.99.";

    #[test]
    fn test_analyze_stores_result_and_history() {
        let mut session = ComplianceSession::default();
        let result = session.analyze(COPY).unwrap();

        assert_eq!(session.result().unwrap().id, result.id);
        assert_eq!(session.history().len(), 1);
        assert!(!session.filtered_issues().is_empty());
    }

    #[test]
    fn test_empty_content_rejected_and_previous_result_kept() {
        let mut session = ComplianceSession::default();
        let first = session.analyze(COPY).unwrap();

        assert_eq!(session.analyze("   "), Err(SessionError::EmptyContent));
        assert_eq!(session.result().unwrap().id, first.id);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_history_capacity_from_config() {
        let config = EngineConfig {
            history_capacity: 2,
            ..Default::default()
        };
        let mut session = ComplianceSession::new(&config);
        for _ in 0..5 {
            session.analyze(COPY).unwrap();
        }
        assert_eq!(session.history().len(), 2);

        let latest = session.history().latest().unwrap();
        assert_eq!(latest.id, session.result().unwrap().id);
    }

    #[test]
    fn test_severity_filter() {
        let mut session = ComplianceSession::default();
        session.analyze(COPY).unwrap();
        let all = session.filtered_issues();

        session.set_severity_filter(vec![Severity::Critical]);
        let critical = session.filtered_issues();
        assert!(!critical.is_empty());
        assert!(critical.len() < all.len());
        assert!(critical.iter().all(|i| i.severity == Severity::Critical));

        session.set_severity_filter(Vec::new());
        assert_eq!(session.filtered_issues(), all);
    }

    #[test]
    fn test_category_filter() {
        let mut session = ComplianceSession::default();
        session.analyze(COPY).unwrap();

        session.set_category_filter(vec![Category::PricingIssues]);
        let pricing = session.filtered_issues();
        assert!(!pricing.is_empty());
        assert!(pricing.iter().all(|i| i.category == Category::PricingIssues));
    }

    #[test]
    fn test_report_and_clear() {
        let mut session = ComplianceSession::default();
        assert!(session.report().is_none());

        session.analyze(COPY).unwrap();
        let report = session.report().unwrap();
        assert_eq!(report.sections.len(), session.result().unwrap().issues.len());

        session.clear_result();
        assert!(session.result().is_none());
        assert!(session.filtered_issues().is_empty());
        assert_eq!(session.history().len(), 1);

        session.clear_history();
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_default_options_exclude_info() {
        let mut session = ComplianceSession::default();
        session.set_default_options(AnalysisOptions {
            include_info_level: false,
            ..Default::default()
        });
        let result = session.analyze(COPY).unwrap();
        assert_eq!(result.summary.info_count, 0);
    }

    #[test]
    fn test_overlong_content_rejected() {
        let config = EngineConfig {
            limits: ContentLimits {
                min_content_chars: 1,
                max_content_chars: 10,
            },
            ..Default::default()
        };
        let mut session = ComplianceSession::new(&config);
        assert!(matches!(
            session.analyze(COPY),
            Err(SessionError::ContentTooLong { max: 10, .. })
        ));
    }
}
