//! Built-in marketing compliance rules.
//!
//! Based on FTC, GDPR, CAN-SPAM and general advertising standards. Order
//! matters: it breaks ties between issues starting at the same offset.

use super::parser::{PatternDefinition, RuleDefinition};
use crate::types::{Category, Severity};

struct RuleTemplate {
    id: &'static str,
    category: Category,
    severity: Severity,
    name: &'static str,
    description: &'static str,
    patterns: &'static [&'static str],
    suggestion: &'static str,
    regulation: &'static str,
}

impl RuleTemplate {
    fn into_definition(self) -> RuleDefinition {
        RuleDefinition {
            id: self.id.to_string(),
            category: self.category,
            severity: self.severity,
            name: self.name.to_string(),
            description: self.description.to_string(),
            patterns: self.patterns.iter().map(|p| PatternDefinition::new(*p)).collect(),
            suggestion: self.suggestion.to_string(),
            regulation: Some(self.regulation.to_string()),
        }
    }
}

/// "free" is fine when the same line states the offer carries no strings.
const FREE_OFFER_DISCLOSURE: &str =
    r"(?i)\b(no\s+credit\s+card|no\s+obligation|no\s+strings|conditions\s+apply)\b";

/// Definitions of every built-in rule, in catalog order.
pub(crate) fn definitions() -> Vec<RuleDefinition> {
    let mut rules: Vec<RuleDefinition> = Vec::new();

    // Misleading claims
    rules.push(
        RuleTemplate {
            id: "misleading-guarantee",
            category: Category::MisleadingClaims,
            severity: Severity::High,
            name: "Absolute Guarantee",
            description: "Claims of absolute guarantees without conditions may be misleading",
            patterns: &[
                r"(?i)\b(100%|100 percent)\s*(guarantee|guaranteed|satisfaction|money.?back|effective|success|safe)\b",
                r"(?i)\bguarantee[ds]?\s*(results?|success|satisfaction|cure|work)\b",
                r"(?i)\balways\s+works?\b",
            ],
            suggestion: "Add specific conditions or limitations to guarantee claims. Consider using \"satisfaction guarantee with conditions\" instead.",
            regulation: "FTC Act Section 5",
        }
        .into_definition(),
    );
    rules.push(
        RuleTemplate {
            id: "misleading-best",
            category: Category::MisleadingClaims,
            severity: Severity::Medium,
            name: "Unqualified Superlatives",
            description: "Using \"best\", \"number one\", or \"#1\" without substantiation",
            patterns: &[
                r"(?i)\b(the\s+)?best\s+(in\s+class|in\s+the\s+world|on\s+the\s+market|available|choice|option|solution)\b",
                r"(?i)\b#1\s*(rated|choice|solution|product|service|brand)\b",
                r"(?i)\bnumber\s*one\s*(rated|choice|solution|product)\b",
                r"(?i)\bworld'?s?\s*(best|leading|finest|greatest)\b",
            ],
            suggestion: "Qualify superlative claims with source, date, and methodology. Example: \"Rated #1 by [Source] in [Year]\"",
            regulation: "FTC Advertising Guidelines",
        }
        .into_definition(),
    );

    let mut free = RuleTemplate {
        id: "misleading-free",
        category: Category::MisleadingClaims,
        severity: Severity::High,
        name: "Misleading Free Offers",
        description: "\"Free\" claims that may have hidden costs or conditions",
        patterns: &[
            r"(?i)\bfree\b",
            r"(?i)\bcompletely\s+free\b",
            r"(?i)(?:\bfree|\$0)\s*(?:trial|sample|gift|bonus)\b",
        ],
        suggestion: "Clearly disclose all conditions, requirements, or future charges associated with \"free\" offers.",
        regulation: "FTC Free Offers Rule",
    }
    .into_definition();
    free.patterns[0].unless_followed_by = Some(FREE_OFFER_DISCLOSURE.to_string());
    rules.push(free);

    // Unsubstantiated claims
    rules.push(
        RuleTemplate {
            id: "unsubstantiated-clinical",
            category: Category::UnsubstantiatedClaims,
            severity: Severity::Critical,
            name: "Clinical Study Claims",
            description: "References to clinical studies or scientific proof without citation",
            patterns: &[
                r"(?i)\b(clinically|scientifically|medically)\s*(proven|tested|shown|demonstrated)\b",
                r"(?i)\b(studies|research|trials)\s*(show|prove|demonstrate|confirm)\b",
                r"(?i)\bdoctors?\s*(recommend|approve|endorse)\b",
                r"(?i)\blab(oratory)?\s*tested\b",
            ],
            suggestion: "Provide specific study citations including source, date, sample size, and methodology.",
            regulation: "FTC Substantiation Doctrine",
        }
        .into_definition(),
    );
    rules.push(
        RuleTemplate {
            id: "unsubstantiated-statistics",
            category: Category::UnsubstantiatedClaims,
            severity: Severity::High,
            name: "Unattributed Statistics",
            description: "Percentage claims or statistics without source",
            patterns: &[
                r"(?i)\b\d{1,3}%\s*(of\s+)?(users?|customers?|people|clients?|patients?)\s*(say|report|agree|saw|experienced|noticed)\b",
                r"(?i)\b(9\s*out\s*of\s*10|8\s*out\s*of\s*10)\b",
                r"(?i)\bstatistics\s+show\b",
            ],
            suggestion: "Include source, sample size, date, and methodology for all statistics.",
            regulation: "FTC Truth in Advertising",
        }
        .into_definition(),
    );

    // Pricing
    rules.push(
        RuleTemplate {
            id: "pricing-hidden",
            category: Category::PricingIssues,
            severity: Severity::High,
            name: "Hidden Pricing",
            description: "Pricing that may hide additional fees or conditions",
            patterns: &[
                r"(?i)\bstarting\s*(at|from)\s*\$?\d",
                r"(?i)\bas\s+low\s+as\s*\$?\d",
                r"(?i)\bfrom\s+only\s*\$?\d",
                // any price: check for hidden fees disclosure
                r"\$",
            ],
            suggestion: "Clearly display all fees, conditions, and the total cost. Use \"starting at\" only with clear disclosure of price range.",
            regulation: "FTC Pricing Guidelines",
        }
        .into_definition(),
    );
    rules.push(
        RuleTemplate {
            id: "pricing-comparison",
            category: Category::PricingIssues,
            severity: Severity::Medium,
            name: "Price Comparison Claims",
            description: "Comparative pricing without substantiation",
            patterns: &[
                r"(?i)\bsave\s*(up\s+to\s+)?\d+%",
                r"(?i)\b\d+%\s*(off|discount|savings?)\b",
                r"(?i)\bcompared?\s+to\s+(retail|competitors?|others?)\b",
                r"(?i)\b(was|originally|regularly)\s*\$\d+",
            ],
            suggestion: "Substantiate comparison prices with actual market data. Disclose the basis for comparison.",
            regulation: "FTC Price Comparison Guidelines",
        }
        .into_definition(),
    );

    // Missing disclaimers
    rules.push(
        RuleTemplate {
            id: "disclaimer-affiliate",
            category: Category::DisclaimerMissing,
            severity: Severity::High,
            name: "Affiliate Disclosure Missing",
            description: "Potential affiliate content without disclosure",
            patterns: &[
                r"(?i)\b(affiliate\s+link|partner\s+link|sponsored)\b",
                r"(?i)\bwe\s+(may\s+)?earn\s+(a\s+)?commission\b",
                r"(?i)\b(click|use)\s+(this|my|our)\s+link\b",
            ],
            suggestion: "Add clear affiliate disclosure: \"This post contains affiliate links. We may earn a commission at no extra cost to you.\"",
            regulation: "FTC Endorsement Guidelines",
        }
        .into_definition(),
    );
    rules.push(
        RuleTemplate {
            id: "disclaimer-results",
            category: Category::DisclaimerMissing,
            severity: Severity::Medium,
            name: "Results Disclaimer Missing",
            description: "Claims of results without typical results disclaimer",
            patterns: &[
                r"(?i)\b(lost|lose)\s+\d+\s*(lbs?|pounds?|kg|kilos?)\b",
                r"(?i)\b(made|earned|earn)\s*\$[\d,]+\b",
                r"(?i)\b(results|outcomes?)\s+(may\s+)?vary\b",
                r"(?i)\breal\s+(results|customers?|stories)\b",
            ],
            suggestion: "Add disclaimer: \"Results may vary. Individual results depend on many factors.\"",
            regulation: "FTC Testimonial Guidelines",
        }
        .into_definition(),
    );

    // Prohibited terms
    rules.push(
        RuleTemplate {
            id: "prohibited-cure",
            category: Category::ProhibitedTerms,
            severity: Severity::Critical,
            name: "Cure Claims",
            description: "Claims of curing diseases or conditions",
            patterns: &[
                r"(?i)\b(cure[sd]?|curing|heal[sd]?|healing)\s+(disease|cancer|diabetes|illness|condition)\b",
                r"(?i)\b(eliminate|eradicate|destroy)[sd]?\s+(disease|virus|bacteria|cancer)\b",
                r"(?i)\bpermanent\s+(cure|solution|fix|remedy)\b",
            ],
            suggestion: "Remove cure claims. Use \"may help support\" or \"traditionally used for\" instead.",
            regulation: "FDA Drug Claims Regulations",
        }
        .into_definition(),
    );
    rules.push(
        RuleTemplate {
            id: "prohibited-miracle",
            category: Category::ProhibitedTerms,
            severity: Severity::High,
            name: "Miracle Language",
            description: "Use of exaggerated \"miracle\" terminology",
            patterns: &[
                r"(?i)\b(miracle|magical|magic|revolutionary|breakthrough)\s*(product|solution|cure|treatment|formula)\b",
                r"(?i)\bsecret\s*(formula|ingredient|method|technique)\b",
                r"(?i)\binstant\s*(results?|cure|relief|fix|solution)\b",
            ],
            suggestion: "Use factual language instead of exaggerated claims. Focus on specific, verifiable benefits.",
            regulation: "FTC Deceptive Advertising Standards",
        }
        .into_definition(),
    );

    // Urgency manipulation
    rules.push(
        RuleTemplate {
            id: "urgency-false",
            category: Category::UrgencyManipulation,
            severity: Severity::Medium,
            name: "False Urgency",
            description: "Potentially false urgency or scarcity claims",
            patterns: &[
                r"(?i)\b(limited\s+time|act\s+now|hurry|last\s+chance|ending\s+soon)\b",
                r"(?i)\b(only\s+)?\d+\s*(left|remaining|available|in\s+stock)\b",
                r"(?i)\b(offer|deal|sale)\s+(expires?|ends?)\s+(soon|today|tonight|midnight)\b",
                r"(?i)\bdon'?t\s+miss\s+(out|this)\b",
            ],
            suggestion: "Only use urgency claims when genuinely true. Provide specific end dates for time-limited offers.",
            regulation: "FTC Deceptive Practices",
        }
        .into_definition(),
    );
    rules.push(
        RuleTemplate {
            id: "urgency-fomo",
            category: Category::UrgencyManipulation,
            severity: Severity::Low,
            name: "FOMO Tactics",
            description: "Fear of missing out manipulation",
            patterns: &[
                r"(?i)\beveryone\s+(is\s+)?(buying|getting|using|joining)\b",
                r"(?i)\bselling\s+fast\b",
                r"(?i)\b(popular|trending|viral|selling\s+out)\b",
                r"(?i)\bbefore\s+it'?s?\s+(gone|too\s+late|sold\s+out)\b",
            ],
            suggestion: "Ensure popularity claims are substantiated with data. Avoid psychological pressure tactics.",
            regulation: "Consumer Protection Standards",
        }
        .into_definition(),
    );

    // Testimonials (capitalized-name patterns are case-sensitive)
    rules.push(
        RuleTemplate {
            id: "testimonial-unverified",
            category: Category::TestimonialIssues,
            severity: Severity::Medium,
            name: "Unverified Testimonials",
            description: "Testimonials that may not represent typical results",
            patterns: &[
                r#"["“”][^"“”]*["“”].*[-–—]\s*[A-Z][a-z]+"#,
                r"(?i)\b(testimonial|review|feedback)\s+from\b",
                r"(?i)\bcustomer\s+(said|says|wrote|reports?)\b",
                r"(?i)\b(real\s+)?customer\s+(stories|reviews?|testimonials?)\b",
            ],
            suggestion: "Ensure testimonials are genuine and include \"Results may vary\" disclaimer.",
            regulation: "FTC Endorsement Guides",
        }
        .into_definition(),
    );
    rules.push(
        RuleTemplate {
            id: "testimonial-celebrity",
            category: Category::TestimonialIssues,
            severity: Severity::High,
            name: "Celebrity/Influencer Endorsement",
            description: "Celebrity mentions that may require disclosure",
            patterns: &[
                r"\b(endorsed|recommended|used|loved)\s+by\s+[A-Z][a-z]+\s+[A-Z][a-z]+",
                r"(?i)\bas\s+seen\s+(on|in)\s+(TV|television|magazine|news)\b",
                r"\bfeatured\s+(on|in)\s+[A-Z]",
            ],
            suggestion: "Disclose material connections with endorsers. Celebrity endorsements must reflect genuine use and opinion.",
            regulation: "FTC Endorsement Guidelines",
        }
        .into_definition(),
    );

    // Environmental
    rules.push(
        RuleTemplate {
            id: "environmental-green",
            category: Category::EnvironmentalClaims,
            severity: Severity::High,
            name: "Greenwashing",
            description: "Environmental claims that may be unsubstantiated",
            patterns: &[
                r"(?i)\b(eco-?friendly|environmentally\s+friendly|green|sustainable|carbon\s+neutral)\b",
                r"(?i)\b(100%|fully)\s*(natural|organic|biodegradable|recyclable)\b",
                r"(?i)\b(save[sd]?\s+the\s+(planet|earth|environment))\b",
                r"(?i)\bzero\s*(carbon|emissions?|waste)\b",
            ],
            suggestion: "Substantiate environmental claims with certifications or data. Be specific about which aspects are eco-friendly.",
            regulation: "FTC Green Guides",
        }
        .into_definition(),
    );

    // Health
    rules.push(
        RuleTemplate {
            id: "health-weight",
            category: Category::HealthClaims,
            severity: Severity::Critical,
            name: "Weight Loss Claims",
            description: "Weight loss claims that may be unrealistic",
            patterns: &[
                r"(?i)\blose\s+\d+\s*(lbs?|pounds?|kg)\s*(in|within|after)?\s*\d*\s*(days?|weeks?|month)?\b",
                r"(?i)\b(rapid|fast|quick|instant)\s+weight\s+loss\b",
                r"(?i)\bno\s+(diet|exercise)\s+(needed|required|necessary)\b",
                r"(?i)\bburn\s+fat\s+(fast|quickly|instantly)\b",
            ],
            suggestion: "Weight loss claims must be substantiated. Include \"Results vary based on diet and exercise.\"",
            regulation: "FTC Weight Loss Advertising Guidelines",
        }
        .into_definition(),
    );
    rules.push(
        RuleTemplate {
            id: "health-supplement",
            category: Category::HealthClaims,
            severity: Severity::High,
            name: "Supplement Health Claims",
            description: "Health benefit claims for supplements",
            patterns: &[
                r"(?i)\b(boost[sd]?|improve[sd]?|enhance[sd]?)\s*(immunity|immune\s+system|brain|memory|energy)\b",
                r"(?i)\b(anti-?aging|anti-?inflammatory|antioxidant)\s*(benefits?|properties|effects?)\b",
                r"(?i)\b(detox|cleanse|purify)\s*(your)?\s*(body|system|liver|kidney)\b",
            ],
            suggestion: "Add FDA disclaimer: \"These statements have not been evaluated by the FDA. Not intended to diagnose, treat, cure, or prevent any disease.\"",
            regulation: "DSHEA / FDA Regulations",
        }
        .into_definition(),
    );

    // Financial
    rules.push(
        RuleTemplate {
            id: "financial-income",
            category: Category::FinancialClaims,
            severity: Severity::Critical,
            name: "Income Claims",
            description: "Claims about potential income or earnings",
            patterns: &[
                r"(?i)\b(make|earn|generate)\s*\$[\d,]+\s*(per|a|each)\s*(day|week|month|year)?\b",
                r"(?i)\b(passive|residual)\s+income\b",
                r"(?i)\b(financial|money)\s+freedom\b",
                r"(?i)\bget\s+rich\b",
                r"(?i)\bquit\s+your\s+job\b",
            ],
            suggestion: "Include income disclaimer with typical results. Provide verifiable income documentation.",
            regulation: "FTC Business Opportunity Rule",
        }
        .into_definition(),
    );
    rules.push(
        RuleTemplate {
            id: "financial-guaranteed",
            category: Category::FinancialClaims,
            severity: Severity::Critical,
            name: "Guaranteed Returns",
            description: "Claims of guaranteed financial returns",
            patterns: &[
                r"(?i)\bguaranteed\s+(returns?|income|profit|ROI)\b",
                r"(?i)\b(risk-?free|no\s+risk)\s+(investment|opportunity)\b",
                r"(?i)\b\d+%\s*(guaranteed|annual|monthly)\s*(return|ROI|yield)\b",
            ],
            suggestion: "Remove guaranteed return claims. All investments carry risk - disclose this clearly.",
            regulation: "SEC/FTC Investment Advertising Rules",
        }
        .into_definition(),
    );

    // Data privacy
    rules.push(
        RuleTemplate {
            id: "privacy-collection",
            category: Category::DataPrivacy,
            severity: Severity::Medium,
            name: "Data Collection Notice",
            description: "Content that implies data collection without disclosure",
            patterns: &[
                r"(?i)\b(sign\s+up|subscribe|register|join)\s+(for|to|now)\b",
                r"(?i)\b(enter|submit)\s+(your)?\s*(email|phone|info|information)\b",
                r"(?i)\bwe'?ll\s+(send|email|contact)\b",
            ],
            suggestion: "Include privacy policy link and data usage disclosure near sign-up forms.",
            regulation: "GDPR / CCPA / CAN-SPAM",
        }
        .into_definition(),
    );

    // Comparative advertising
    rules.push(
        RuleTemplate {
            id: "comparative-unsubstantiated",
            category: Category::ComparativeAdvertising,
            severity: Severity::High,
            name: "Unsubstantiated Comparison",
            description: "Comparative claims without substantiation",
            patterns: &[
                r"(?i)\bbetter\s+than\s+([A-Z][a-z]+|the\s+competition|competitors?|others?|the\s+rest)\b",
                r"(?i)\bunlike\s+(other|competitor|[A-Z][a-z]+)\s*(products?|brands?|companies?)?\b",
                r"(?i)\b(outperforms?|beats?|exceeds?)\s+(all|every|any)\s*(other)?\b",
            ],
            suggestion: "Substantiate comparative claims with objective data. Consider naming specific competitors carefully.",
            regulation: "Lanham Act / Comparative Advertising Guidelines",
        }
        .into_definition(),
    );

    // Target audience
    rules.push(
        RuleTemplate {
            id: "audience-children",
            category: Category::TargetAudience,
            severity: Severity::High,
            name: "Child-Directed Marketing",
            description: "Content that may be targeting children",
            patterns: &[
                r"(?i)\b(kids?|children|child|teen|teenager|young|youth)\s*(love|will\s+love|friendly)\b",
                r"(?i)\b(fun\s+for|great\s+for|perfect\s+for)\s*(kids?|children|the\s+whole\s+family)\b",
            ],
            suggestion: "Ensure COPPA compliance for child-directed content. Obtain parental consent for data collection.",
            regulation: "COPPA",
        }
        .into_definition(),
    );

    rules
}
