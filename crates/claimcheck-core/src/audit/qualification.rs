//! Document qualification: the classified profile that decides which
//! obligations apply.
//!
//! Qualification is a pure function of the content. Every detector is a
//! first-match keyword rule with an explicit default, so the same text
//! always yields the same profile.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::keywords::{
    CATEGORY_PATTERNS, DOCUMENT_TYPE_PATTERNS, ESG_PATTERN, FEES_PATTERN, NAME_AFTER_TRIGGER,
    PERFORMANCE_PATTERN, PROFESSIONAL_PATTERN, QUOTED_NAME_BEFORE_VERB, RETAIL_PATTERN,
    RISK_EXCERPT,
};
use super::obligations::{DOC_2010_05, DOC_2011_24, DOC_2020_03, ESMA_MIFID_GUIDELINES};
use super::AuditError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    #[serde(rename = "OPCVM")]
    Opcvm,
    #[serde(rename = "FIA")]
    Fia,
    #[serde(rename = "SCPI")]
    Scpi,
    #[serde(rename = "OPCI")]
    Opci,
    #[serde(rename = "GFI")]
    Gfi,
    #[serde(rename = "SOFICA")]
    Sofica,
    #[serde(rename = "FCPR")]
    Fcpr,
    #[serde(rename = "FCPI")]
    Fcpi,
    #[serde(rename = "FIP")]
    Fip,
    #[serde(rename = "ETF")]
    Etf,
    #[serde(rename = "titre_creance_complexe")]
    ComplexDebtSecurity,
    #[serde(rename = "EMTN")]
    Emtn,
    #[serde(rename = "produit_structure")]
    StructuredProduct,
    #[serde(rename = "autre")]
    Other,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 14] = [
        ProductCategory::Opcvm,
        ProductCategory::Fia,
        ProductCategory::Scpi,
        ProductCategory::Opci,
        ProductCategory::Gfi,
        ProductCategory::Sofica,
        ProductCategory::Fcpr,
        ProductCategory::Fcpi,
        ProductCategory::Fip,
        ProductCategory::Etf,
        ProductCategory::ComplexDebtSecurity,
        ProductCategory::Emtn,
        ProductCategory::StructuredProduct,
        ProductCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Opcvm => "OPCVM",
            ProductCategory::Fia => "FIA",
            ProductCategory::Scpi => "SCPI",
            ProductCategory::Opci => "OPCI",
            ProductCategory::Gfi => "GFI",
            ProductCategory::Sofica => "SOFICA",
            ProductCategory::Fcpr => "FCPR",
            ProductCategory::Fcpi => "FCPI",
            ProductCategory::Fip => "FIP",
            ProductCategory::Etf => "ETF",
            ProductCategory::ComplexDebtSecurity => "titre_creance_complexe",
            ProductCategory::Emtn => "EMTN",
            ProductCategory::StructuredProduct => "produit_structure",
            ProductCategory::Other => "autre",
        }
    }

    /// Collective investment schemes, covered by the OPC marketing rules.
    pub fn is_collective_investment(&self) -> bool {
        matches!(
            self,
            ProductCategory::Opcvm
                | ProductCategory::Fia
                | ProductCategory::Scpi
                | ProductCategory::Opci
                | ProductCategory::Etf
                | ProductCategory::Gfi
                | ProductCategory::Sofica
                | ProductCategory::Fcpr
                | ProductCategory::Fcpi
                | ProductCategory::Fip
        )
    }

    /// Structured products and complex debt, covered by the complex
    /// instruments rules.
    pub fn is_complex_instrument(&self) -> bool {
        matches!(
            self,
            ProductCategory::StructuredProduct
                | ProductCategory::Emtn
                | ProductCategory::ComplexDebtSecurity
        )
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "brochure")]
    Brochure,
    #[serde(rename = "page_web")]
    WebPage,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "reseaux_sociaux")]
    SocialMedia,
    #[serde(rename = "presentation")]
    Presentation,
    #[serde(rename = "fiche_produit")]
    ProductSheet,
    #[serde(rename = "autre")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetAudience {
    #[serde(rename = "non_professionnel")]
    Retail,
    #[serde(rename = "professionnel")]
    Professional,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductType {
    pub category: ProductCategory,

    /// Best-effort capture, absent when nothing looks like a product name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commercial_name: Option<String>,
}

/// Boolean content detectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Characteristics {
    pub performance_displayed: bool,
    pub fees_displayed: bool,
    pub capital_loss_risk: bool,
    pub esg: bool,
}

/// Active condition tags derived from a qualification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "TOUJOURS")]
    Always,
    #[serde(rename = "SI_OPCVM")]
    Opcvm,
    #[serde(rename = "SI_FIA")]
    Fia,
    #[serde(rename = "SI_SCPI")]
    Scpi,
    #[serde(rename = "SI_OPCI")]
    Opci,
    #[serde(rename = "SI_GFI")]
    Gfi,
    #[serde(rename = "SI_SOFICA")]
    Sofica,
    #[serde(rename = "SI_ETF")]
    Etf,
    #[serde(rename = "SI_FCPR_FCPI_FIP")]
    InnovationFund,
    #[serde(rename = "SI_PRODUIT_STRUCTURE")]
    StructuredProduct,
    #[serde(rename = "SI_TITRE_CREANCE_COMPLEXE")]
    ComplexDebtSecurity,
    #[serde(rename = "SI_PUBLIC_NON_PROFESSIONNEL")]
    RetailAudience,
    #[serde(rename = "SI_PUBLIC_PROFESSIONNEL")]
    ProfessionalAudience,
    #[serde(rename = "SI_PERFORMANCES_AFFICHEES")]
    PerformanceDisplayed,
    #[serde(rename = "SI_FRAIS_AFFICHES")]
    FeesDisplayed,
    #[serde(rename = "SI_RISQUE_PERTE_CAPITAL")]
    CapitalLossRisk,
    #[serde(rename = "SI_ESG")]
    Esg,
    #[serde(rename = "SI_SUPPORT_WEB")]
    WebChannel,
    #[serde(rename = "SI_SUPPORT_EMAIL")]
    EmailChannel,
    #[serde(rename = "SI_SUPPORT_RESEAUX_SOCIAUX")]
    SocialMediaChannel,
}

/// A regulatory text that applies to the document, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicableSource {
    pub code: String,
    pub title: String,
    pub reason: String,
}

impl ApplicableSource {
    fn new(code: &str, title: &str, reason: &str) -> Self {
        Self {
            code: code.to_string(),
            title: title.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qualification {
    pub document_type: DocumentType,
    pub product: ProductType,
    pub audience: TargetAudience,
    pub characteristics: Characteristics,
    pub conditions: Vec<Condition>,

    /// In assembly order, never empty
    pub applicable_sources: Vec<ApplicableSource>,
}

impl Qualification {
    /// Check a (possibly user-edited) qualification before an audit.
    pub fn validate(&self) -> Result<(), AuditError> {
        if self.applicable_sources.is_empty() {
            return Err(AuditError::NoApplicableSource);
        }
        Ok(())
    }

    /// Change the product category and re-derive sources and conditions.
    pub fn with_category(mut self, category: ProductCategory) -> Self {
        self.product.category = category;
        self.rederive();
        self
    }

    /// Change the audience and re-derive conditions.
    pub fn with_audience(mut self, audience: TargetAudience) -> Self {
        self.audience = audience;
        self.rederive();
        self
    }

    pub fn has_source(&self, code: &str) -> bool {
        self.applicable_sources.iter().any(|s| s.code == code)
    }

    pub fn has_condition(&self, condition: Condition) -> bool {
        self.conditions.contains(&condition)
    }

    fn rederive(&mut self) {
        self.applicable_sources =
            applicable_sources(self.product.category, &self.characteristics);
        self.conditions = active_conditions(
            self.document_type,
            self.product.category,
            self.audience,
            &self.characteristics,
        );
    }
}

/// Classify a document from its content.
pub fn qualify(content: &str) -> Qualification {
    let category = CATEGORY_PATTERNS
        .iter()
        .find(|(_, regex)| regex.is_match(content))
        .map(|(category, _)| *category)
        .unwrap_or(ProductCategory::Opcvm);

    let document_type = DOCUMENT_TYPE_PATTERNS
        .iter()
        .find(|(_, regex)| regex.is_match(content))
        .map(|(doc_type, _)| *doc_type)
        .unwrap_or(DocumentType::Brochure);

    let audience = if PROFESSIONAL_PATTERN.is_match(content) && !RETAIL_PATTERN.is_match(content) {
        TargetAudience::Professional
    } else {
        TargetAudience::Retail
    };

    let characteristics = Characteristics {
        performance_displayed: PERFORMANCE_PATTERN.is_match(content),
        fees_displayed: FEES_PATTERN.is_match(content),
        capital_loss_risk: RISK_EXCERPT.is_match(content),
        esg: ESG_PATTERN.is_match(content),
    };

    let qualification = Qualification {
        document_type,
        product: ProductType {
            category,
            commercial_name: extract_commercial_name(content),
        },
        audience,
        characteristics,
        conditions: active_conditions(document_type, category, audience, &characteristics),
        applicable_sources: applicable_sources(category, &characteristics),
    };

    tracing::debug!(
        category = %qualification.product.category,
        document_type = ?qualification.document_type,
        sources = qualification.applicable_sources.len(),
        "Document qualified"
    );

    qualification
}

/// Assemble applicable sources in category-check order.
pub fn applicable_sources(
    category: ProductCategory,
    characteristics: &Characteristics,
) -> Vec<ApplicableSource> {
    let mut sources = Vec::new();

    if category.is_collective_investment() {
        sources.push(ApplicableSource::new(
            DOC_2011_24,
            "Communications publicitaires OPC",
            "Produit de placement collectif",
        ));
    }

    if category.is_complex_instrument() {
        sources.push(ApplicableSource::new(
            DOC_2010_05,
            "Instruments complexes",
            "Produit structuré ou titre de créance",
        ));
    }

    sources.push(ApplicableSource::new(
        ESMA_MIFID_GUIDELINES,
        "Guidelines MiFID II",
        "Applicable à toute communication marketing",
    ));

    if characteristics.esg {
        sources.push(ApplicableSource::new(
            DOC_2020_03,
            "ESG / Finance durable",
            "Allégations ESG détectées",
        ));
    }

    sources
}

pub fn active_conditions(
    document_type: DocumentType,
    category: ProductCategory,
    audience: TargetAudience,
    characteristics: &Characteristics,
) -> Vec<Condition> {
    let mut conditions = vec![Condition::Always];

    let category_condition = match category {
        ProductCategory::Opcvm => Some(Condition::Opcvm),
        ProductCategory::Fia => Some(Condition::Fia),
        ProductCategory::Scpi => Some(Condition::Scpi),
        ProductCategory::Opci => Some(Condition::Opci),
        ProductCategory::Gfi => Some(Condition::Gfi),
        ProductCategory::Sofica => Some(Condition::Sofica),
        ProductCategory::Etf => Some(Condition::Etf),
        ProductCategory::Fcpr | ProductCategory::Fcpi | ProductCategory::Fip => {
            Some(Condition::InnovationFund)
        }
        ProductCategory::StructuredProduct => Some(Condition::StructuredProduct),
        ProductCategory::ComplexDebtSecurity | ProductCategory::Emtn => {
            Some(Condition::ComplexDebtSecurity)
        }
        ProductCategory::Other => None,
    };
    conditions.extend(category_condition);

    conditions.push(match audience {
        TargetAudience::Retail => Condition::RetailAudience,
        TargetAudience::Professional => Condition::ProfessionalAudience,
    });

    if characteristics.performance_displayed {
        conditions.push(Condition::PerformanceDisplayed);
    }
    if characteristics.fees_displayed {
        conditions.push(Condition::FeesDisplayed);
    }
    if characteristics.capital_loss_risk {
        conditions.push(Condition::CapitalLossRisk);
    }
    if characteristics.esg {
        conditions.push(Condition::Esg);
    }

    let channel = match document_type {
        DocumentType::WebPage => Some(Condition::WebChannel),
        DocumentType::Email => Some(Condition::EmailChannel),
        DocumentType::SocialMedia => Some(Condition::SocialMediaChannel),
        _ => None,
    };
    conditions.extend(channel);

    conditions
}

fn extract_commercial_name(content: &str) -> Option<String> {
    [&*NAME_AFTER_TRIGGER, &*QUOTED_NAME_BEFORE_VERB]
        .iter()
        .find_map(|regex| regex.captures(content))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
}
