//! Pattern matcher: runs a rule catalog over free text.
//!
//! For each applicable rule, each pattern scans the content left to right
//! for successive non-overlapping matches. A match is dropped when:
//! - it is zero-width (the scan still advances past it),
//! - its pattern's suppressor matches the rest of the line,
//! - the same rule already produced an issue over the same span.
//!
//! The output is sorted by start offset; the sort is stable, so issues at
//! the same offset keep catalog order.

use std::collections::HashSet;

use crate::catalog::{Rule, RuleCatalog};
use crate::types::{AnalysisOptions, Issue, Position};

/// Runs a catalog against content. Holds no per-call state.
#[derive(Debug, Clone, Copy)]
pub struct PatternMatcher<'a> {
    catalog: &'a RuleCatalog,
}

impl<'a> PatternMatcher<'a> {
    pub fn new(catalog: &'a RuleCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a RuleCatalog {
        self.catalog
    }

    /// Detect every issue in `content`, ordered by position.
    pub fn detect(&self, content: &str, options: &AnalysisOptions) -> Vec<Issue> {
        let mut seen: HashSet<(&str, usize, usize)> = HashSet::new();
        let mut issues = Vec::new();
        let mut zero_width = 0usize;
        let mut suppressed = 0usize;

        for rule in self.catalog.iter().filter(|r| options.includes(r.severity)) {
            for pattern in &rule.patterns {
                for m in pattern.regex().find_iter(content) {
                    if m.start() == m.end() {
                        zero_width += 1;
                        continue;
                    }

                    if pattern.is_suppressed(content, m.end()) {
                        suppressed += 1;
                        continue;
                    }

                    if !seen.insert((rule.id.as_str(), m.start(), m.end())) {
                        continue;
                    }

                    issues.push(issue_from_match(
                        rule,
                        m.as_str(),
                        Position::new(m.start(), m.end()),
                    ));
                }
            }
        }

        issues.sort_by_key(|issue| issue.position.start);

        if zero_width > 0 {
            tracing::warn!(zero_width, "Catalog produced zero-width matches; skipped");
        }
        tracing::debug!(
            rules = self.catalog.len(),
            issues = issues.len(),
            suppressed,
            "Pattern scan complete"
        );

        issues
    }
}

fn issue_from_match(rule: &Rule, matched_text: &str, position: Position) -> Issue {
    Issue {
        id: format!("{}-{}-{}", rule.id, position.start, position.end),
        rule_id: rule.id.clone(),
        category: rule.category,
        severity: rule.severity,
        title: rule.name.clone(),
        description: rule.description.clone(),
        matched_text: matched_text.to_string(),
        position,
        suggestion: Some(rule.suggestion.clone()),
        regulation: rule.regulation.clone(),
    }
}

/// Detect issues with an injected catalog.
pub fn detect(content: &str, catalog: &RuleCatalog, options: &AnalysisOptions) -> Vec<Issue> {
    PatternMatcher::new(catalog).detect(content, options)
}
