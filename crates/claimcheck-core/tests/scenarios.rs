use claimcheck_core::audit::{
    qualify, Auditor, DocumentType, FindingStatus, ProductCategory, TargetAudience, Verdict,
};
use claimcheck_core::grouping::{group_analyses, GroupBy, ViewOptions};
use claimcheck_core::report::ReportData;
use claimcheck_core::{audit, detect_issues, AnalysisOptions, Category, Severity};

const OPCVM_BROCHURE: &str = r#"Document promotionnel - OPCVM "Avenir Dynamique"

Ce fonds OPCVM géré par Exemple Asset Management, société de gestion agréée par l'AMF, vous propose une stratégie d'investissement diversifiée axée sur les marchés actions européens.

Performances passées :
- 2023 : +8,5%
- 2022 : -3,2%
- 2021 : +12,1%

Les performances passées ne préjugent pas des performances futures.

Frais : Frais de gestion annuels de 1,5% TTC. Frais d'entrée : 2% maximum.

AVERTISSEMENT : Ce fonds présente un risque de perte en capital. Avant tout investissement, veuillez consulter le Document d'Information Clé (DIC) disponible sur notre site ou auprès de votre conseiller.

Ce document à caractère promotionnel ne constitue pas un conseil en investissement."#;

const STRUCTURED_OFFER: &str = r#"Offre exclusive - Produit structuré EMTN "Rendement Plus 2026"

Investissez dans notre nouveau produit structuré indexé sur l'indice Euro Stoxx 50.

Caractéristiques :
- Durée : 5 ans
- Protection du capital à 90% à l'échéance
- Coupon conditionnel de 6% par an

Ce produit est un instrument complexe qui peut être difficile à comprendre. Il est réservé aux investisseurs avertis.

Risque de perte en capital : L'investisseur peut perdre une partie ou la totalité de son capital investi.

Pour plus d'informations, consultez le prospectus et le DIC disponibles sur demande."#;

const AGGRESSIVE_PITCH: &str = r#"INVESTISSEMENT GARANTI - Rendement exceptionnel !

Fonds "Super Gains" - L'opportunité unique à ne pas manquer !

Rendement garanti de 15% par an - Sans aucun risque !

C'est le meilleur placement du marché, tous nos clients sont satisfaits et deviennent riches rapidement.

Dépêchez-vous, offre limitée aux 100 premiers investisseurs !

Contactez-nous maintenant pour profiter de cette opportunité inratable."#;

// ── Scenario A: absolute guarantees are flagged ──────────────────────────

#[test]
fn guaranteed_results_flagged_as_misleading() {
    let result = detect_issues(
        "Join today and enjoy 100% guaranteed results within a week.",
        &AnalysisOptions::default(),
    );

    let issue = result
        .issues
        .iter()
        .find(|i| i.category == Category::MisleadingClaims)
        .expect("misleading claim detected");
    assert!(matches!(issue.severity, Severity::Critical | Severity::High));
    assert!(issue.regulation.is_some());
    assert!(issue.suggestion.is_some());
}

// ── Scenario B: clean content scores 100 ─────────────────────────────────

#[test]
fn clean_content_scores_full_marks() {
    let result = detect_issues(
        "Our team publishes a quarterly newsletter about office furniture.",
        &AnalysisOptions::default(),
    );
    assert_eq!(result.score, 100);
    assert_eq!(result.summary.total_issues, 0);
    assert!(result.summary.category_counts.values().all(|c| *c == 0));
    assert!(ReportData::from(&result).is_clean());
}

#[test]
fn aggressive_english_copy_loses_points() {
    let result = detect_issues(
        "Act now! Limited time offer. Our miracle formula is clinically proven. \
         Earn $5,000 per month in passive income. Starting at $19.99.",
        &AnalysisOptions::default(),
    );
    assert!(result.score < 50);
    assert!(result.summary.critical_count >= 1);

    let report = ReportData::from(&result);
    assert_eq!(report.sections.len(), result.issues.len());
    assert_eq!(report.total_issues, result.summary.total_issues);
}

// ── Scenario C: applicable sources follow the product category ───────────

#[test]
fn scpi_and_emtn_pull_their_regulatory_texts() {
    let scpi = qualify("Investissez dans notre SCPI de rendement, patrimoine immobilier diversifié.");
    assert_eq!(scpi.product.category, ProductCategory::Scpi);
    assert!(scpi.has_source("DOC-2011-24"));

    let emtn = qualify("Cet EMTN à capital partiellement protégé verse un coupon annuel.");
    assert_eq!(emtn.product.category, ProductCategory::Emtn);
    assert!(emtn.has_source("DOC-2010-05"));

    // user edit in the review stage
    let edited = scpi.with_category(ProductCategory::Emtn);
    assert!(edited.has_source("DOC-2010-05"));
}

#[test]
fn structured_offer_qualification() {
    let q = qualify(STRUCTURED_OFFER);
    assert_eq!(q.product.category, ProductCategory::StructuredProduct);
    assert!(q.has_source("DOC-2010-05"));
    assert!(!q.has_source("DOC-2011-24"));
    assert!(q.characteristics.capital_loss_risk);
    assert!(q.characteristics.performance_displayed);
}

#[test]
fn opcvm_brochure_qualification() {
    let q = qualify(OPCVM_BROCHURE);
    assert_eq!(q.product.category, ProductCategory::Opcvm);
    assert_eq!(q.product.commercial_name.as_deref(), Some("Avenir Dynamique"));
    assert_eq!(q.document_type, DocumentType::WebPage);
    assert_eq!(q.audience, TargetAudience::Retail);
    assert!(q.characteristics.fees_displayed);
}

// ── Scenario D: fully compliant audit ────────────────────────────────────

#[test]
fn compliant_brochure_passes_audit() {
    let result = audit(OPCVM_BROCHURE, &qualify(OPCVM_BROCHURE)).unwrap();

    assert!(result
        .analyses_by_text
        .iter()
        .flat_map(|a| &a.findings)
        .all(|f| f.status == FindingStatus::Compliant));
    assert_eq!(result.report.verdict, Verdict::Compliant);
    assert_eq!(result.report.score, 100);
    assert!(result.missing_mentions.is_empty());
    assert!(result.synthesis.contains("OPCVM"));
}

#[test]
fn aggressive_pitch_fails_audit() {
    let result = Auditor::default()
        .audit(AGGRESSIVE_PITCH, &qualify(AGGRESSIVE_PITCH))
        .unwrap();

    assert_eq!(result.report.verdict, Verdict::NonCompliant);
    assert!(result.report.score < 50);
    assert!(!result.missing_mentions.is_empty());

    let misleading = result
        .analyses_by_text
        .iter()
        .flat_map(|a| &a.findings)
        .find(|f| f.comment.contains("trompeur"))
        .expect("misleading term reported");
    assert!(misleading.corrective_action.is_some());
}

// ── Scenario E: revealing not-applicable findings ────────────────────────

#[test]
fn show_not_applicable_never_hides_findings() {
    let result = audit(STRUCTURED_OFFER, &qualify(STRUCTURED_OFFER)).unwrap();

    for group_by in [GroupBy::SourceText, GroupBy::Status, GroupBy::Criticality] {
        let hidden = ViewOptions {
            group_by,
            show_not_applicable: false,
            ..Default::default()
        };
        let shown = ViewOptions {
            show_not_applicable: true,
            ..hidden
        };

        let count = |options: &ViewOptions| -> usize {
            group_analyses(&result.analyses_by_text, options)
                .iter()
                .map(|g| g.findings.len())
                .sum()
        };
        assert!(count(&shown) >= count(&hidden));
    }
}
