//! Rule catalog parsing and compilation.
//!
//! Rule definitions are plain data (YAML/JSON or the built-in table).
//! Compiling them into a [`RuleCatalog`] turns every pattern into a
//! [`Regex`]; an invalid pattern rejects the whole catalog.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::schema::validate_catalog_schema;
use crate::types::{Category, Severity};

/// Errors that can occur when loading a rule catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Catalog does not match schema: {}", .0.join("; "))]
    SchemaError(Vec<String>),

    #[error("Rule {rule_id}: invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        rule_id: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Catalog validation failed: {0}")]
    ValidationError(String),
}

/// A pattern as written in a catalog document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatternDefinition {
    /// Regular expression (use `(?i)` for case-insensitive matching)
    pub regex: String,

    /// Discard a match when the rest of its line matches this expression
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unless_followed_by: Option<String>,
}

impl PatternDefinition {
    pub fn new(regex: impl Into<String>) -> Self {
        Self {
            regex: regex.into(),
            unless_followed_by: None,
        }
    }

    pub fn unless_followed_by(mut self, suppressor: impl Into<String>) -> Self {
        self.unless_followed_by = Some(suppressor.into());
        self
    }
}

/// A detection rule as written in a catalog document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleDefinition {
    pub id: String,
    pub category: Category,
    pub severity: Severity,
    pub name: String,
    pub description: String,
    pub patterns: Vec<PatternDefinition>,
    pub suggestion: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    rules: Vec<RuleDefinition>,
}

/// A compiled pattern with its optional suppressor.
#[derive(Debug, Clone)]
pub struct RulePattern {
    regex: Regex,
    suppressor: Option<Regex>,
}

impl RulePattern {
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Whether the line remainder after `end` cancels a match ending there.
    pub fn is_suppressed(&self, content: &str, end: usize) -> bool {
        let Some(suppressor) = &self.suppressor else {
            return false;
        };

        let line_end = content[end..]
            .find(['\n', '\r', '\u{2028}', '\u{2029}'])
            .map(|offset| end + offset)
            .unwrap_or(content.len());

        suppressor.find_at(&content[..line_end], end).is_some()
    }
}

/// A compiled detection rule. Identity is `id`.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    pub category: Category,
    pub severity: Severity,
    pub name: String,
    pub description: String,
    pub patterns: Vec<RulePattern>,
    pub suggestion: String,
    pub regulation: Option<String>,
}

impl Rule {
    fn compile(definition: RuleDefinition) -> Result<Self, CatalogError> {
        if definition.id.trim().is_empty() {
            return Err(CatalogError::ValidationError(
                "Rule with empty id".to_string(),
            ));
        }

        if definition.patterns.is_empty() {
            return Err(CatalogError::ValidationError(format!(
                "Rule {} has no patterns",
                definition.id
            )));
        }

        let mut patterns = Vec::with_capacity(definition.patterns.len());
        for pattern in &definition.patterns {
            let regex = compile_pattern(&definition.id, &pattern.regex)?;
            let suppressor = pattern
                .unless_followed_by
                .as_deref()
                .map(|s| compile_pattern(&definition.id, s))
                .transpose()?;
            patterns.push(RulePattern { regex, suppressor });
        }

        Ok(Self {
            id: definition.id,
            category: definition.category,
            severity: definition.severity,
            name: definition.name,
            description: definition.description,
            patterns,
            suggestion: definition.suggestion,
            regulation: definition.regulation,
        })
    }
}

fn compile_pattern(rule_id: &str, pattern: &str) -> Result<Regex, CatalogError> {
    Regex::new(pattern).map_err(|source| CatalogError::InvalidPattern {
        rule_id: rule_id.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}

/// An ordered, immutable set of compiled rules.
///
/// Catalog order is significant: issues starting at the same position are
/// reported in the order their rules appear here.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
}

impl RuleCatalog {
    /// Compile rule definitions into a catalog.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = RuleDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut rules = Vec::new();

        for definition in definitions {
            if !seen.insert(definition.id.clone()) {
                return Err(CatalogError::ValidationError(format!(
                    "Duplicate rule ID: {}",
                    definition.id
                )));
            }
            rules.push(Rule::compile(definition)?);
        }

        Ok(Self { rules })
    }

    /// Parse and compile a catalog from a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse and compile a catalog from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    fn from_value(value: serde_json::Value) -> Result<Self, CatalogError> {
        validate_catalog_schema(&value).map_err(CatalogError::SchemaError)?;
        let document: CatalogDocument = serde_json::from_value(value)?;
        Self::from_definitions(document.rules)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Look up a rule by id.
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn by_category(&self, category: Category) -> Vec<&Rule> {
        self.rules.iter().filter(|r| r.category == category).collect()
    }

    pub fn by_severity(&self, severity: Severity) -> Vec<&Rule> {
        self.rules.iter().filter(|r| r.severity == severity).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CATALOG: &str = r#"
rules:
  - id: "urgency-test"
    category: urgency_manipulation
    severity: medium
    name: "Test urgency"
    description: "Urgency wording"
    patterns:
      - regex: '(?i)\bact\s+now\b'
    suggestion: "Give a real deadline."
  - id: "free-test"
    category: misleading_claims
    severity: high
    name: "Test free"
    description: "Free wording"
    patterns:
      - regex: '(?i)\bfree\b'
        unless_followed_by: '(?i)\bconditions\s+apply\b'
    suggestion: "Disclose conditions."
    regulation: "FTC Free Offers Rule"
"#;

    #[test]
    fn test_parse_valid_catalog() {
        let catalog = RuleCatalog::from_yaml(VALID_CATALOG).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.rules()[0].id, "urgency-test");
        assert_eq!(
            catalog.get("free-test").unwrap().regulation.as_deref(),
            Some("FTC Free Offers Rule")
        );
    }

    #[test]
    fn test_invalid_regex_fails_at_load() {
        let definitions = vec![RuleDefinition {
            id: "broken".to_string(),
            category: Category::PricingIssues,
            severity: Severity::Low,
            name: "Broken".to_string(),
            description: "Unbalanced group".to_string(),
            patterns: vec![PatternDefinition::new("(unclosed")],
            suggestion: "Fix it".to_string(),
            regulation: None,
        }];

        let result = RuleCatalog::from_definitions(definitions);
        assert!(matches!(result, Err(CatalogError::InvalidPattern { .. })));
    }

    #[test]
    fn test_duplicate_rule_ids() {
        let yaml = r#"
rules:
  - id: "dup"
    category: pricing_issues
    severity: low
    name: "One"
    description: "One"
    patterns: [{ regex: 'a' }]
    suggestion: "x"
  - id: "dup"
    category: pricing_issues
    severity: low
    name: "Two"
    description: "Two"
    patterns: [{ regex: 'b' }]
    suggestion: "y"
"#;
        let result = RuleCatalog::from_yaml(yaml);
        assert!(matches!(result, Err(CatalogError::ValidationError(_))));
    }

    #[test]
    fn test_schema_rejects_unknown_severity() {
        let yaml = r#"
rules:
  - id: "bad"
    category: pricing_issues
    severity: catastrophic
    name: "Bad"
    description: "Bad"
    patterns: [{ regex: 'a' }]
    suggestion: "x"
"#;
        let result = RuleCatalog::from_yaml(yaml);
        assert!(matches!(result, Err(CatalogError::SchemaError(_))));
    }

    #[test]
    fn test_suppressor_only_reads_rest_of_line() {
        let catalog = RuleCatalog::from_yaml(VALID_CATALOG).unwrap();
        let pattern = &catalog.get("free-test").unwrap().patterns[0];

        let same_line = "Get it free today, conditions apply.";
        let m = pattern.regex().find(same_line).unwrap();
        assert!(pattern.is_suppressed(same_line, m.end()));

        let next_line = "Get it free today.\nConditions apply.";
        let m = pattern.regex().find(next_line).unwrap();
        assert!(!pattern.is_suppressed(next_line, m.end()));
    }

    #[test]
    fn test_lookup_by_category_and_severity() {
        let catalog = RuleCatalog::from_yaml(VALID_CATALOG).unwrap();
        assert_eq!(catalog.by_category(Category::MisleadingClaims).len(), 1);
        assert_eq!(catalog.by_severity(Severity::Medium).len(), 1);
        assert!(catalog.by_severity(Severity::Critical).is_empty());
    }
}
