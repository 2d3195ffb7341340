//! Keyword detectors shared by qualification and the obligation audit.
//!
//! Keywords are matched case-insensitively from a word start, so
//! `risque` also matches `risques` but `perte` does not match `experte`.
//! French terms come first; English equivalents follow.

use lazy_static::lazy_static;
use regex::Regex;

use super::qualification::{DocumentType, ProductCategory};

lazy_static! {
    // =========================================================================
    // OBLIGATION TOPICS
    // =========================================================================

    /// Risk or capital-loss wording, with up to 50 characters of context.
    pub static ref RISK_EXCERPT: Regex = Regex::new(
        r"(?i).{0,50}\b(?:risque|perte|risk|loss)\w*.{0,50}"
    ).unwrap();

    /// Promotional character disclosure
    pub static ref PROMOTIONAL_PATTERN: Regex = Regex::new(
        r"(?i)\b(?:promotionnel|publicitaire|publicité|promotional|advertis|marketing communication)"
    ).unwrap();

    /// Fee disclosure
    pub static ref FEES_PATTERN: Regex = Regex::new(
        r"(?i)\b(?:frais|commission|coût|fees?\b|costs?\b|charges\b)"
    ).unwrap();

    /// Wording that suggests the document complies somewhere.
    pub static ref POSITIVE_PATTERN: Regex = Regex::new(
        r"(?i)\b(?:risque|perte|capital|frais|commission|avertissement|attention|dici?\b|prospectus|disclaimer|performances? passées?|société de gestion|agrément|amf\b|promotionnel|publicitaire)"
    ).unwrap();

    /// Misleading or too-good-to-be-true terms, checked in list order.
    pub static ref MISLEADING_TERMS: Vec<(&'static str, Regex)> = [
        "garanti",
        "sans risque",
        "rendement assuré",
        "opportunité unique",
        "meilleur",
        "exceptionnel",
        "inratable",
        "fortune",
        "enrichissement",
        "risk-free",
        "guaranteed return",
        "once in a lifetime",
    ]
    .iter()
    .map(|term| {
        let pattern = format!(r"(?i).{{0,30}}\b{}.{{0,30}}", regex::escape(term));
        (*term, Regex::new(&pattern).unwrap())
    })
    .collect();

    // =========================================================================
    // QUALIFICATION
    // =========================================================================

    /// Product categories, first match wins.
    pub static ref CATEGORY_PATTERNS: Vec<(ProductCategory, Regex)> = vec![
        (ProductCategory::Scpi, Regex::new(r"(?i)\bscpi\b").unwrap()),
        (ProductCategory::Opcvm, Regex::new(r"(?i)\bopcvm\b").unwrap()),
        (ProductCategory::Fia, Regex::new(r"(?i)\bfia\b").unwrap()),
        (ProductCategory::Etf, Regex::new(r"(?i)\betf\b").unwrap()),
        (ProductCategory::StructuredProduct, Regex::new(r"(?i)\bstructur(?:é|e|ed)").unwrap()),
        (ProductCategory::Emtn, Regex::new(r"(?i)\bemtn\b").unwrap()),
        (ProductCategory::Opci, Regex::new(r"(?i)\bopci\b").unwrap()),
        (ProductCategory::Sofica, Regex::new(r"(?i)\bsofica\b").unwrap()),
        (ProductCategory::Fcpr, Regex::new(r"(?i)\bfcpr\b").unwrap()),
        (ProductCategory::Fcpi, Regex::new(r"(?i)\bfcpi\b").unwrap()),
        (ProductCategory::Fip, Regex::new(r"(?i)\bfip\b").unwrap()),
        (ProductCategory::Gfi, Regex::new(r"(?i)\bgfi\b").unwrap()),
        (ProductCategory::ComplexDebtSecurity, Regex::new(r"(?i)\btitres? de créance complexes?").unwrap()),
    ];

    /// Document types, first match wins.
    pub static ref DOCUMENT_TYPE_PATTERNS: Vec<(DocumentType, Regex)> = vec![
        (DocumentType::Email, Regex::new(r"(?i)\b(?:e-?mail|newsletter)").unwrap()),
        (DocumentType::WebPage, Regex::new(r"(?i)\bsite\b|\bpage web\b|\bweb ?page\b|\bwebsite\b").unwrap()),
        (DocumentType::SocialMedia, Regex::new(r"(?i)\bréseaux sociaux\b|\blinkedin\b|\bsocial media\b").unwrap()),
        (DocumentType::Presentation, Regex::new(r"(?i)\bprésentation investisseurs?\b|\bslide ?deck\b").unwrap()),
        (DocumentType::ProductSheet, Regex::new(r"(?i)\bfiche produit\b|\bproduct sheet\b|\bfact ?sheet\b").unwrap()),
    ];

    pub static ref PROFESSIONAL_PATTERN: Regex = Regex::new(
        r"(?i)\bprofessionnel|\bprofessional"
    ).unwrap();

    pub static ref RETAIL_PATTERN: Regex = Regex::new(
        r"(?i)\bnon[- ]professionnel|\bnon[- ]professional|\bretail\b"
    ).unwrap();

    /// Displayed performance: a percentage or the word itself.
    pub static ref PERFORMANCE_PATTERN: Regex = Regex::new(
        r"(?i)\d+\s*%|\bperformance"
    ).unwrap();

    pub static ref ESG_PATTERN: Regex = Regex::new(
        r"(?i)\besg\b|\bdurable|\bresponsable|\bsustainab"
    ).unwrap();

    /// Title-cased product name after a trigger word, optionally quoted.
    pub static ref NAME_AFTER_TRIGGER: Regex = Regex::new(
        r#"\b(?i:fonds|fund|opcvm|fia|scpi|opci|etf|emtn)\b[ \t]+["«]?[ \t]*([A-Z][A-Za-zÀ-ÿ \t]+)["»]?"#
    ).unwrap();

    /// Quoted title-cased name followed by a verb of offering.
    pub static ref QUOTED_NAME_BEFORE_VERB: Regex = Regex::new(
        r#"["«]([A-Z][A-Za-zÀ-ÿ \t]+)["»][ \t]+(?:est|propose|offre|is|offers)\b"#
    ).unwrap();
}

/// Risk wording around the first risk keyword, if any.
pub fn risk_excerpt(content: &str) -> Option<&str> {
    RISK_EXCERPT.find(content).map(|m| m.as_str().trim())
}

pub fn mentions_promotional_character(content: &str) -> bool {
    PROMOTIONAL_PATTERN.is_match(content)
}

pub fn mentions_fees(content: &str) -> bool {
    FEES_PATTERN.is_match(content)
}

pub fn has_positive_indicator(content: &str) -> bool {
    POSITIVE_PATTERN.is_match(content)
}

/// First misleading term (in list order) and the text around it.
pub fn find_misleading_term(content: &str) -> Option<(&'static str, &str)> {
    MISLEADING_TERMS
        .iter()
        .find_map(|(term, regex)| regex.find(content).map(|m| (*term, m.as_str().trim())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_excerpt_captures_context() {
        let content = "AVERTISSEMENT : Ce fonds présente un risque de perte en capital.";
        let excerpt = risk_excerpt(content).unwrap();
        assert!(excerpt.contains("risque"));
        assert!(content.contains(excerpt));
    }

    #[test]
    fn test_risk_keyword_requires_word_start() {
        assert!(risk_excerpt("Une équipe experte à votre écoute.").is_none());
        assert!(risk_excerpt("Les risques sont décrits ci-dessous.").is_some());
    }

    #[test]
    fn test_fees_detection() {
        assert!(mentions_fees("Frais de gestion annuels de 1,5% TTC."));
        assert!(mentions_fees("Annual fees apply."));
        assert!(!mentions_fees("Aucune mention ici."));
    }

    #[test]
    fn test_positive_indicator_is_case_insensitive() {
        assert!(has_positive_indicator("Société agréée par l'AMF"));
        assert!(has_positive_indicator("Consultez le DIC"));
        assert!(!has_positive_indicator("Un dictionnaire"));
    }

    #[test]
    fn test_misleading_terms_checked_in_list_order() {
        let content = "Le meilleur placement, rendement garanti !";
        let (term, excerpt) = find_misleading_term(content).unwrap();
        assert_eq!(term, "garanti");
        assert!(excerpt.contains("garanti"));
    }

    #[test]
    fn test_promotional_detection() {
        assert!(mentions_promotional_character("Document à caractère promotionnel"));
        assert!(mentions_promotional_character("This is a marketing communication."));
        assert!(!mentions_promotional_character("Rapport annuel"));
    }
}
