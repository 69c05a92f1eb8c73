//! Unit tests for the fundamental rule and hybrid aggregation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sentrix::models::candle::{Candle, Quote};
use sentrix::models::sentiment::{SentimentDistribution, SentimentScores, SentimentSummary};
use sentrix::models::signal::{Decision, SignalEvidence, TradeSignal};
use sentrix::sentiment::classifier::SentimentClassifier;
use sentrix::services::market_data::{Interval, MarketDataError, MarketDataProvider};
use sentrix::services::news::{Article, NewsError, NewsProvider};
use sentrix::signals::generator::{
    fundamental_decision, fundamental_fallback, hybrid_blend, FundamentalConfig, HybridConfig,
    SignalGenerator, TechnicalConfig,
};
use sentrix::signals::SignalError;
use sentrix::strategies::single::StrategyKind;
use std::sync::Arc;

fn branch_signal(decision: Decision, confidence: f64) -> TradeSignal {
    TradeSignal::new(
        "AAPL",
        "TEST_BRANCH",
        decision,
        confidence,
        "test branch",
        SignalEvidence::Votes(Vec::new()),
    )
}

fn summary(polarity: f64) -> SentimentSummary {
    SentimentSummary {
        per_article: Vec::new(),
        aggregate_polarity: polarity,
        distribution: SentimentDistribution::default(),
        average_confidence: 0.5,
        interpretation: "test".to_string(),
    }
}

#[test]
fn fundamental_buys_above_threshold() {
    let signal = fundamental_decision("AAPL", summary(0.3), 0.15);
    assert_eq!(signal.decision, Decision::Buy);
    assert!((signal.confidence - 0.3).abs() < 1e-9);
    assert_eq!(signal.strategy, "FUNDAMENTAL_SENTIMENT");
}

#[test]
fn fundamental_sells_below_negative_threshold() {
    let signal = fundamental_decision("AAPL", summary(-0.3), 0.15);
    assert_eq!(signal.decision, Decision::Sell);
    assert!((signal.confidence - 0.3).abs() < 1e-9);
}

#[test]
fn fundamental_holds_inside_threshold_band() {
    let signal = fundamental_decision("AAPL", summary(0.1), 0.15);
    assert_eq!(signal.decision, Decision::Hold);
    assert!((signal.confidence - 0.9).abs() < 1e-9);
}

#[test]
fn fundamental_fallback_is_zero_confidence_hold() {
    let err = SignalError::NoArticles("no articles retrieved".to_string());
    let signal = fundamental_fallback("AAPL", &err);
    assert_eq!(signal.decision, Decision::Hold);
    assert_eq!(signal.confidence, 0.0);
    assert!(signal.rationale.contains("Could not analyze sentiment"));
}

#[test]
fn hybrid_disagreement_scenario_buys_at_combined_score() {
    // tech BUY 0.8 at weight 0.6, fund SELL 0.5 at weight 0.4:
    // 0.48 - 0.20 = 0.28 > 0.2 -> BUY with confidence 0.28.
    let signal = hybrid_blend(
        "AAPL",
        branch_signal(Decision::Buy, 0.8),
        branch_signal(Decision::Sell, 0.5),
        0.6,
        0.4,
    )
    .unwrap();
    assert_eq!(signal.decision, Decision::Buy);
    assert!((signal.confidence - 0.28).abs() < 1e-9);
    assert!(signal.rationale.contains("Mixed signals"));
    assert!(signal.rationale.contains("Low confidence"));
}

#[test]
fn hybrid_agreement_is_annotated_as_strong() {
    let signal = hybrid_blend(
        "AAPL",
        branch_signal(Decision::Buy, 0.9),
        branch_signal(Decision::Buy, 0.8),
        0.6,
        0.4,
    )
    .unwrap();
    assert_eq!(signal.decision, Decision::Buy);
    assert!(signal.rationale.contains("Strong signal"));
    // 0.54 + 0.32 = 0.86 > 0.7 -> high band.
    assert!(signal.rationale.contains("High confidence"));
}

#[test]
fn hybrid_weights_are_scale_invariant() {
    let normalized = hybrid_blend(
        "AAPL",
        branch_signal(Decision::Buy, 0.8),
        branch_signal(Decision::Sell, 0.5),
        0.6,
        0.4,
    )
    .unwrap();
    let scaled = hybrid_blend(
        "AAPL",
        branch_signal(Decision::Buy, 0.8),
        branch_signal(Decision::Sell, 0.5),
        6.0,
        4.0,
    )
    .unwrap();
    assert_eq!(normalized.decision, scaled.decision);
    assert!((normalized.confidence - scaled.confidence).abs() < 1e-9);
}

#[test]
fn hybrid_holds_inside_score_band() {
    let signal = hybrid_blend(
        "AAPL",
        branch_signal(Decision::Buy, 0.2),
        branch_signal(Decision::Sell, 0.1),
        0.5,
        0.5,
    )
    .unwrap();
    assert_eq!(signal.decision, Decision::Hold);
    assert!((signal.confidence - 0.95).abs() < 1e-9);
}

#[test]
fn hybrid_rejects_zero_weights() {
    let err = hybrid_blend(
        "AAPL",
        branch_signal(Decision::Buy, 0.8),
        branch_signal(Decision::Sell, 0.5),
        0.0,
        0.0,
    )
    .unwrap_err();
    assert!(matches!(err, SignalError::InvalidWeights(_)));
}

#[test]
fn hybrid_rejects_negative_weights() {
    let err = hybrid_blend(
        "AAPL",
        branch_signal(Decision::Buy, 0.8),
        branch_signal(Decision::Sell, 0.5),
        -0.5,
        1.0,
    )
    .unwrap_err();
    assert!(matches!(err, SignalError::InvalidWeights(_)));
}

// --- generator wiring with injected fakes ---

struct FakeMarketData(Vec<Candle>);

#[async_trait]
impl MarketDataProvider for FakeMarketData {
    async fn fetch_price_series(
        &self,
        _symbol: &str,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
        _interval: Interval,
    ) -> Result<Vec<Candle>, MarketDataError> {
        Ok(self.0.clone())
    }

    async fn fetch_current_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        Ok(Quote {
            symbol: symbol.to_string(),
            price: self.0.last().map(|c| c.close).unwrap_or_default(),
            timestamp: Utc::now(),
        })
    }
}

struct FailingMarketData;

#[async_trait]
impl MarketDataProvider for FailingMarketData {
    async fn fetch_price_series(
        &self,
        symbol: &str,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
        _interval: Interval,
    ) -> Result<Vec<Candle>, MarketDataError> {
        Err(MarketDataError::NotFound(symbol.to_string()))
    }

    async fn fetch_current_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        Err(MarketDataError::NotFound(symbol.to_string()))
    }
}

struct FakeNews(Vec<Article>);

#[async_trait]
impl NewsProvider for FakeNews {
    async fn fetch_news(
        &self,
        _query: &str,
        limit: usize,
        _language: &str,
    ) -> Result<Vec<Article>, NewsError> {
        Ok(self.0.iter().take(limit).cloned().collect())
    }
}

struct FixedClassifier(SentimentScores);

#[async_trait]
impl SentimentClassifier for FixedClassifier {
    async fn classify(&self, _text: &str) -> SentimentScores {
        self.0
    }
}

fn declining_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| {
            let c = 500.0 - i as f64;
            Candle::new(c, c + 0.5, c - 0.5, c, 1000.0, Utc::now())
        })
        .collect()
}

fn positive_article(title: &str) -> Article {
    Article {
        title: title.to_string(),
        description: Some("earnings beat expectations".to_string()),
        content: None,
        url: "https://news.example/a".to_string(),
        published_at: None,
        source: Some("example".to_string()),
    }
}

fn generator(
    market_data: impl MarketDataProvider + 'static,
    news: impl NewsProvider + 'static,
    classifier: impl SentimentClassifier + 'static,
) -> SignalGenerator {
    SignalGenerator::new(Arc::new(market_data), Arc::new(news), Arc::new(classifier))
}

#[tokio::test]
async fn fundamental_signal_end_to_end() {
    let gen = generator(
        FakeMarketData(declining_candles(250)),
        FakeNews(vec![positive_article("a"), positive_article("b")]),
        FixedClassifier(SentimentScores {
            positive: 0.8,
            negative: 0.1,
            neutral: 0.1,
        }),
    );
    let signal = gen
        .fundamental_signal("AAPL", &FundamentalConfig::default())
        .await
        .unwrap();
    assert_eq!(signal.decision, Decision::Buy);
    assert!((signal.confidence - 0.7).abs() < 1e-9);
    assert!(matches!(signal.evidence, SignalEvidence::Sentiment(_)));
}

#[tokio::test]
async fn hybrid_degrades_fundamental_branch_without_articles() {
    let gen = generator(
        FakeMarketData(declining_candles(250)),
        FakeNews(Vec::new()),
        FixedClassifier(SentimentScores::unavailable()),
    );
    let config = HybridConfig {
        technical: TechnicalConfig::Simple {
            strategy: StrategyKind::Rsi,
            period: None,
        },
        ..HybridConfig::default()
    };
    let signal = gen.hybrid_signal("AAPL", &config).await.unwrap();

    // Monotonic decline pins RSI at 0 -> technical BUY at confidence 1.0.
    // The fundamental branch holds at zero confidence, so the combined
    // score is the technical weight alone: 0.6 -> BUY.
    assert_eq!(signal.decision, Decision::Buy);
    assert!((signal.confidence - 0.6).abs() < 1e-9);
    match &signal.evidence {
        SignalEvidence::Votes(votes) => {
            assert_eq!(votes.len(), 2);
            assert_eq!(votes[1].signal.strategy, "FUNDAMENTAL_SENTIMENT");
            assert_eq!(votes[1].signal.decision, Decision::Hold);
            assert_eq!(votes[1].signal.confidence, 0.0);
        }
        other => panic!("expected vote evidence, got {:?}", other),
    }
}

#[tokio::test]
async fn hybrid_propagates_technical_failure() {
    let gen = generator(
        FailingMarketData,
        FakeNews(vec![positive_article("a")]),
        FixedClassifier(SentimentScores {
            positive: 0.8,
            negative: 0.1,
            neutral: 0.1,
        }),
    );
    let err = gen
        .hybrid_signal("AAPL", &HybridConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SignalError::DataUnavailable(_)));
}

#[tokio::test]
async fn hybrid_validates_weights_before_fetching() {
    let gen = generator(
        FailingMarketData,
        FakeNews(Vec::new()),
        FixedClassifier(SentimentScores::unavailable()),
    );
    let err = gen
        .hybrid_signal("AAPL", &HybridConfig::with_weights(0.0, 0.0))
        .await
        .unwrap_err();
    assert!(matches!(err, SignalError::InvalidWeights(_)));
}
