//! Regulatory text registry and obligation checklists.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal importance of an obligation, distinct from issue severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Criticality {
    Info,
    Minor,
    Major,
    Critical,
}

impl Criticality {
    /// Display order used by criticality grouping.
    pub const DISPLAY_ORDER: [Criticality; 4] = [
        Criticality::Critical,
        Criticality::Major,
        Criticality::Minor,
        Criticality::Info,
    ];

    pub fn level(&self) -> u8 {
        match self {
            Criticality::Critical => 4,
            Criticality::Major => 3,
            Criticality::Minor => 2,
            Criticality::Info => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Criticality::Critical => "Critical",
            Criticality::Major => "Major",
            Criticality::Minor => "Minor",
            Criticality::Info => "Info",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Criticality::Critical => "Critical",
            Criticality::Major => "Major",
            Criticality::Minor => "Minor",
            Criticality::Info => "Information",
        }
    }
}

impl fmt::Display for Criticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What an obligation checks for. Selects the heuristic used to evaluate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObligationTopic {
    RiskDisclosure,
    PromotionalCharacter,
    FeeDisclosure,
    General,
}

/// A single regulatory requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Obligation {
    pub id: &'static str,
    pub description: &'static str,
    pub criticality: Criticality,
    pub topic: ObligationTopic,
}

/// Metadata for a known regulatory text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegulatoryText {
    pub code: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

pub const DOC_2011_24: &str = "DOC-2011-24";
pub const DOC_2010_05: &str = "DOC-2010-05";
pub const ESMA_MIFID_GUIDELINES: &str = "ESMA34-45-1272";
pub const DOC_2020_03: &str = "DOC-2020-03";

pub const REGULATORY_TEXTS: [RegulatoryText; 10] = [
    RegulatoryText {
        code: DOC_2011_24,
        title: "Communications publicitaires OPC",
        description: "Placements collectifs et SOFICA",
    },
    RegulatoryText {
        code: DOC_2010_05,
        title: "Instruments complexes",
        description: "Produits structurés, EMTN, titres de créance",
    },
    RegulatoryText {
        code: "DOC-2017-06",
        title: "Biens divers",
        description: "Art, vin, forêts, diamants, IBD",
    },
    RegulatoryText {
        code: ESMA_MIFID_GUIDELINES,
        title: "Guidelines MiFID II publicités",
        description: "Communications marketing instruments financiers",
    },
    RegulatoryText {
        code: DOC_2020_03,
        title: "ESG / Finance durable",
        description: "Allégations extra-financières et durables",
    },
    RegulatoryText {
        code: "DOC-2017-01",
        title: "PRIIPS / KID",
        description: "Documents d'informations clés produits packagés",
    },
    RegulatoryText {
        code: "DOC-2013-12",
        title: "Démarchage et conseils",
        description: "Règles de démarchage bancaire et financier",
    },
    RegulatoryText {
        code: "DOC-2014-03",
        title: "Crowdfunding",
        description: "Financement participatif et plateformes",
    },
    RegulatoryText {
        code: "DOC-2024-06",
        title: "Crypto-actifs / MiCA",
        description: "Communications sur actifs numériques",
    },
    RegulatoryText {
        code: "DOC-2017-07",
        title: "Influenceurs financiers",
        description: "Publicité par influenceurs et réseaux sociaux",
    },
];

pub fn regulatory_text(code: &str) -> Option<&'static RegulatoryText> {
    REGULATORY_TEXTS.iter().find(|t| t.code == code)
}

const fn obligation(
    id: &'static str,
    description: &'static str,
    criticality: Criticality,
    topic: ObligationTopic,
) -> Obligation {
    Obligation {
        id,
        description,
        criticality,
        topic,
    }
}

use Criticality::{Critical, Major, Minor};
use ObligationTopic::{FeeDisclosure, General, PromotionalCharacter, RiskDisclosure};

static COLLECTIVE_INVESTMENT: [Obligation; 7] = [
    obligation("DOC-2011-24-1", "Mention du caractère promotionnel", Major, PromotionalCharacter),
    obligation("DOC-2011-24-2", "Équilibre entre avantages et risques", Critical, RiskDisclosure),
    obligation("DOC-2011-24-3", "Avertissement sur le risque de perte en capital", Critical, RiskDisclosure),
    obligation("DOC-2011-24-4", "Mention des frais", Major, FeeDisclosure),
    obligation("DOC-2011-24-5", "Référence au DIC/DICI", Major, General),
    obligation("DOC-2011-24-6", "Performances passées avec disclaimer", Major, General),
    obligation("DOC-2011-24-7", "Identification de la société de gestion", Minor, General),
];

static COMPLEX_INSTRUMENTS: [Obligation; 4] = [
    obligation("DOC-2010-05-1", "Mention du risque de perte totale", Critical, RiskDisclosure),
    obligation("DOC-2010-05-2", "Explication du mécanisme du produit", Major, General),
    obligation("DOC-2010-05-3", "Scénarios de performance", Major, General),
    obligation("DOC-2010-05-4", "Mention de la complexité du produit", Major, General),
];

static MIFID_MARKETING: [Obligation; 3] = [
    obligation("ESMA-1", "Information claire et non trompeuse", Critical, General),
    obligation("ESMA-2", "Identification comme communication marketing", Major, General),
    obligation("ESMA-3", "Cohérence avec documentation réglementaire", Major, General),
];

static SUSTAINABLE_FINANCE: [Obligation; 3] = [
    obligation("DOC-2020-03-1", "Proportionnalité des allégations extra-financières", Major, General),
    obligation("DOC-2020-03-2", "Cohérence avec la documentation SFDR du produit", Major, General),
    obligation("DOC-2020-03-3", "Référence à la méthodologie ESG", Minor, General),
];

/// Obligation checklist for a regulatory text, empty for unknown codes.
pub fn checklist(code: &str) -> &'static [Obligation] {
    match code {
        DOC_2011_24 => &COLLECTIVE_INVESTMENT,
        DOC_2010_05 => &COMPLEX_INSTRUMENTS,
        ESMA_MIFID_GUIDELINES => &MIFID_MARKETING,
        DOC_2020_03 => &SUSTAINABLE_FINANCE,
        _ => &[],
    }
}

/// Placeholder used when an obligation has no canned mention.
pub const GENERIC_MENTION: &str = "Mention réglementaire requise";

/// Canned text that remedies a missing mandatory mention.
pub fn mandatory_mention(obligation_id: &str) -> &'static str {
    match obligation_id {
        "DOC-2011-24-1" => "Document à caractère promotionnel",
        "DOC-2011-24-2" => "Les performances passées ne préjugent pas des performances futures.",
        "DOC-2011-24-3" => "Risque de perte en capital. Le capital investi n'est pas garanti.",
        "DOC-2011-24-5" => {
            "Avant tout investissement, veuillez consulter le Document d'Information Clé (DIC)."
        }
        "DOC-2010-05-1" => "Ce produit présente un risque de perte totale du capital investi.",
        "ESMA-2" => "Communication à caractère promotionnel",
        _ => GENERIC_MENTION,
    }
}
