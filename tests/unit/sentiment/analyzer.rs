//! Unit tests for per-article sentiment aggregation

use async_trait::async_trait;
use sentrix::models::sentiment::{SentimentLabel, SentimentScores};
use sentrix::sentiment::analyzer::analyze_articles;
use sentrix::sentiment::classifier::SentimentClassifier;
use sentrix::services::news::Article;
use sentrix::signals::SignalError;

/// Scores texts by keyword so tests can steer each article independently.
struct KeywordClassifier;

#[async_trait]
impl SentimentClassifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> SentimentScores {
        if text.contains("surge") {
            SentimentScores {
                positive: 0.8,
                negative: 0.1,
                neutral: 0.1,
            }
        } else if text.contains("crash") {
            SentimentScores {
                positive: 0.1,
                negative: 0.8,
                neutral: 0.1,
            }
        } else if text.contains("outage") {
            // Simulates the classifier being unavailable for this article.
            SentimentScores::unavailable()
        } else {
            SentimentScores {
                positive: 0.2,
                negative: 0.2,
                neutral: 0.6,
            }
        }
    }
}

fn article(title: &str) -> Article {
    Article {
        title: title.to_string(),
        description: None,
        content: None,
        url: format!("https://news.example/{}", title.replace(' ', "-")),
        published_at: None,
        source: Some("example".to_string()),
    }
}

#[test]
fn polarity_is_probability_margin_not_argmax() {
    let scores = SentimentScores {
        positive: 0.5,
        negative: 0.1,
        neutral: 0.4,
    };
    // Argmax says "positive with 0.5 confidence" but polarity is the margin.
    assert!((scores.polarity() - 0.4).abs() < 1e-9);
    assert_eq!(scores.label(), SentimentLabel::Positive);
    assert!((scores.confidence() - 0.5).abs() < 1e-9);
}

#[test]
fn unavailable_scores_are_neutral_with_zero_confidence() {
    let scores = SentimentScores::unavailable();
    assert_eq!(scores.polarity(), 0.0);
    assert_eq!(scores.label(), SentimentLabel::Neutral);
    assert_eq!(scores.confidence(), 0.0);
}

#[test]
fn zero_articles_fail_with_no_articles() {
    let err = tokio_test::block_on(analyze_articles(&KeywordClassifier, &[])).unwrap_err();
    assert!(matches!(err, SignalError::NoArticles(_)));
}

#[tokio::test]
async fn aggregate_polarity_is_the_arithmetic_mean() {
    let articles = vec![article("stocks surge on earnings"), article("markets crash hard")];
    let summary = analyze_articles(&KeywordClassifier, &articles).await.unwrap();
    assert!(summary.aggregate_polarity.abs() < 1e-9);
    assert_eq!(summary.distribution.positive, 1);
    assert_eq!(summary.distribution.negative, 1);
    assert_eq!(summary.per_article.len(), 2);
}

#[tokio::test]
async fn unavailable_classifier_dilutes_aggregate() {
    // One scored article (polarity 0.7) plus one the classifier could not
    // score: the failure counts as a neutral zero-confidence article and
    // halves the mean rather than being dropped.
    let articles = vec![article("stocks surge on earnings"), article("service outage")];
    let summary = analyze_articles(&KeywordClassifier, &articles).await.unwrap();
    assert!((summary.aggregate_polarity - 0.35).abs() < 1e-9);
    assert_eq!(summary.distribution.positive, 1);
    assert_eq!(summary.distribution.neutral, 1);
    assert!((summary.average_confidence - 0.4).abs() < 1e-9);
}

#[tokio::test]
async fn interpretation_reports_strength_bands() {
    let strongly = analyze_articles(&KeywordClassifier, &[article("big surge today")])
        .await
        .unwrap();
    assert!(strongly.interpretation.starts_with("Strongly positive"));
    assert!(strongly.interpretation.contains("1/1"));

    let neutral = analyze_articles(&KeywordClassifier, &[article("quiet market day")])
        .await
        .unwrap();
    assert!(neutral.interpretation.starts_with("Neutral sentiment"));

    let negative = analyze_articles(&KeywordClassifier, &[article("sudden crash wipes gains")])
        .await
        .unwrap();
    assert!(negative.interpretation.starts_with("Strongly negative"));
}

#[tokio::test]
async fn moderate_band_sits_between_point_one_and_point_three() {
    // Mean of 0.7 and a plain-neutral 0.0 article is 0.35; add one more
    // neutral to land inside the moderate band: (0.7 + 0 + 0) / 3 ≈ 0.233.
    let articles = vec![
        article("stocks surge on earnings"),
        article("quiet market day"),
        article("another quiet session"),
    ];
    let summary = analyze_articles(&KeywordClassifier, &articles).await.unwrap();
    assert!(summary.interpretation.starts_with("Moderately positive"));
}
