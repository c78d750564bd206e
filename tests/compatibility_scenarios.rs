//! End-to-end scenarios across detection, analysis and recommendations
//!
//! Every scenario wires the real pattern catalog and the bundled dataset the way a
//! host would: one registry, one knowledge base and one config shared by the
//! analyzer and the recommendation engine.

use std::{sync::Arc, time::Duration};

use featurescope_analysis::{
    Document, InMemoryDocuments, ProjectAnalyzer, WorkspaceScope, NO_FEATURES_SCORE,
};
use featurescope_domain::{BaselineStatus, EngineConfig, RecommendationType};
use featurescope_knowledge::FeatureKnowledgeBase;
use featurescope_patterns::PatternRegistry;
use featurescope_recommend::{RecommendationContext, RecommendationEngine};

struct Host {
    registry: Arc<PatternRegistry>,
    analyzer: ProjectAnalyzer,
    recommendations: RecommendationEngine,
}

async fn host_with(config: EngineConfig) -> Host {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let registry = Arc::new(PatternRegistry::new());
    let knowledge = Arc::new(FeatureKnowledgeBase::bundled());
    knowledge.initialize().await;
    let config = Arc::new(config);

    let analyzer = ProjectAnalyzer::new(
        Arc::clone(&registry),
        Arc::clone(&knowledge),
        Arc::clone(&config),
    )
    .unwrap();
    let recommendations =
        RecommendationEngine::new(Arc::clone(&registry), knowledge, config).unwrap();

    Host {
        registry,
        analyzer,
        recommendations,
    }
}

async fn host() -> Host {
    host_with(EngineConfig::default()).await
}

#[tokio::test]
async fn grid_with_gap_is_fully_compatible() {
    let host = host().await;
    let text = ".layout { display: grid; gap: 1rem; }";

    let detected = host.registry.detect_features(text, Some("css"));
    assert_eq!(detected.get("grid"), Some(&1));
    assert_eq!(detected.get("gap"), Some(&1));

    let analysis = host
        .analyzer
        .analyze_documents(&[Document::new("layout.css", "css", text)])
        .await
        .unwrap();

    assert_eq!(analysis.compatibility_score, 100.0);
    assert!(analysis.risk_features.is_empty());
    assert_eq!(analysis.safe_features.len(), 2);
    for usage in analysis.features.values() {
        assert_eq!(usage.feature.baseline(), BaselineStatus::Widely);
        assert_eq!(usage.usage_count, 1);
    }
    assert!(analysis.suggestions[0].starts_with("Excellent"));
}

#[tokio::test]
async fn has_selector_is_flagged_and_gets_alternatives() {
    let host = host().await;
    let text = ".card:has(img) { padding: 0; }";

    let detected = host.registry.detect_features(text, Some("css"));
    assert_eq!(detected.get("has"), Some(&1));

    let analysis = host
        .analyzer
        .analyze_documents(&[Document::new("card.css", "css", text)])
        .await
        .unwrap();
    let risk = analysis
        .risk_features
        .iter()
        .find(|usage| usage.feature.id() == "has")
        .expect("has should be a risk feature");
    assert_eq!(risk.feature.baseline(), BaselineStatus::Limited);
    assert!(analysis.compatibility_score < 70.0);
    assert!(analysis
        .suggestions
        .iter()
        .any(|s| s.contains("limited browser support")));

    let recommendations = host
        .recommendations
        .get_recommendations(&RecommendationContext::new("has", "css"))
        .await;
    assert!(!recommendations.is_empty());
    assert_eq!(recommendations[0].kind, RecommendationType::Alternative);

    let alternatives: Vec<_> = recommendations
        .iter()
        .filter(|r| r.kind == RecommendationType::Alternative)
        .collect();
    assert!(alternatives.iter().all(|r| r.feature.id != "has"));
    assert!(alternatives.iter().all(|r| r.feature.is_widely()));
    assert!(alternatives.iter().any(|r| r.confidence >= 0.85));
}

#[tokio::test]
async fn empty_project_scores_perfectly() {
    let host = host().await;
    let provider = InMemoryDocuments::default();
    let scope = WorkspaceScope::new(["/empty"], Vec::<String>::new());

    let analysis = host.analyzer.analyze_project(&scope, &provider).await.unwrap();

    assert_eq!(analysis.compatibility_score, NO_FEATURES_SCORE);
    assert_eq!(analysis.total_features, 0);
    assert_eq!(analysis.total_usages, 0);
    assert!(analysis.features.is_empty());
    assert_eq!(analysis.total_files, 0);
}

#[tokio::test]
async fn undetectable_text_yields_nothing() {
    let host = host().await;
    assert!(host.registry.detect_features("", Some("css")).is_empty());
    assert!(host
        .registry
        .detect_features("plain prose with no syntax", Some("plaintext"))
        .is_empty());
}

#[tokio::test(start_paused = true)]
async fn project_analysis_reused_until_expiry() {
    let host = host().await;
    let provider = InMemoryDocuments::new(vec![
        Document::new("a.css", "css", ".a { display: grid; }"),
        Document::new("b.css", "css", ".b { display: flex; }"),
    ]);
    let scope = WorkspaceScope::new(["/project"], provider.file_names());

    let first = host.analyzer.analyze_project(&scope, &provider).await.unwrap();
    tokio::time::advance(Duration::from_secs(299)).await;
    let second = host.analyzer.analyze_project(&scope, &provider).await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    tokio::time::advance(Duration::from_secs(2)).await;
    let third = host.analyzer.analyze_project(&scope, &provider).await.unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(first.features, third.features);
    assert_eq!(first.compatibility_score, third.compatibility_score);
}

#[tokio::test(start_paused = true)]
async fn host_config_controls_limits_and_ttl() {
    let config = EngineConfig::from_toml_str(
        r#"
        target_browsers = ["chrome", "safari"]
        max_recommendations = 2
        cache_ttl = 60.0
        "#,
    )
    .unwrap();
    let host = host_with(config).await;
    let context = RecommendationContext::new("xhr", "javascript");

    let first = host.recommendations.get_recommendations(&context).await;
    assert!(!first.is_empty());
    assert!(first.len() <= 2);

    host.recommendations.get_recommendations(&context).await;
    assert_eq!(host.recommendations.cache_stats().await.hits, 1);

    tokio::time::advance(Duration::from_secs(61)).await;
    let refreshed = host.recommendations.get_recommendations(&context).await;
    assert_eq!(refreshed, first);
    assert_eq!(host.recommendations.cache_stats().await.hits, 1);
}
