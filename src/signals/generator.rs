//! Top-level signal generation combining technical and fundamental analysis.
//!
//! `SignalGenerator` owns the injected collaborators and exposes one
//! operation per strategy layer. Every data structure it produces is created
//! fresh for the request; nothing outlives a call.

use crate::models::candle::Candle;
use crate::models::sentiment::{SentimentDistribution, SentimentSummary};
use crate::models::signal::{Decision, SignalEvidence, TradeSignal, WeightedSignal};
use crate::sentiment::analyzer;
use crate::sentiment::classifier::SentimentClassifier;
use crate::services::market_data::{Interval, MarketDataProvider};
use crate::services::news::NewsProvider;
use crate::signals::error::SignalError;
use crate::strategies::compound::{self, CompoundConfig};
use crate::strategies::single::{self, StrategyKind};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

pub const FUNDAMENTAL_STRATEGY_ID: &str = "FUNDAMENTAL_SENTIMENT";
pub const HYBRID_STRATEGY_ID: &str = "HYBRID";

/// Combined score a hybrid blend must exceed to turn directional.
const HYBRID_DECISION_THRESHOLD: f64 = 0.2;
const HIGH_CONFIDENCE_BAND: f64 = 0.7;
const LOW_CONFIDENCE_BAND: f64 = 0.4;

/// Which technical strategy to run.
#[derive(Debug, Clone)]
pub enum TechnicalConfig {
    Simple {
        strategy: StrategyKind,
        period: Option<u32>,
    },
    Compound(CompoundConfig),
}

impl Default for TechnicalConfig {
    fn default() -> Self {
        Self::Compound(CompoundConfig::default())
    }
}

#[derive(Debug, Clone)]
pub struct FundamentalConfig {
    pub news_limit: usize,
    /// Aggregate polarity a fundamental signal must exceed (in magnitude)
    /// to turn directional.
    pub threshold: f64,
    pub language: String,
}

impl Default for FundamentalConfig {
    fn default() -> Self {
        Self {
            news_limit: 10,
            threshold: 0.15,
            language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HybridConfig {
    pub technical_weight: f64,
    pub fundamental_weight: f64,
    pub technical: TechnicalConfig,
    pub fundamental: FundamentalConfig,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            technical_weight: 0.6,
            fundamental_weight: 0.4,
            technical: TechnicalConfig::default(),
            fundamental: FundamentalConfig::default(),
        }
    }
}

impl HybridConfig {
    pub fn with_weights(technical_weight: f64, fundamental_weight: f64) -> Self {
        Self {
            technical_weight,
            fundamental_weight,
            ..Self::default()
        }
    }
}

pub struct SignalGenerator {
    market_data: Arc<dyn MarketDataProvider>,
    news: Arc<dyn NewsProvider>,
    classifier: Arc<dyn SentimentClassifier>,
    lookback_days: i64,
}

impl SignalGenerator {
    pub fn new(
        market_data: Arc<dyn MarketDataProvider>,
        news: Arc<dyn NewsProvider>,
        classifier: Arc<dyn SentimentClassifier>,
    ) -> Self {
        Self {
            market_data,
            news,
            classifier,
            lookback_days: crate::config::DEFAULT_LOOKBACK_DAYS,
        }
    }

    pub fn with_lookback_days(mut self, lookback_days: i64) -> Self {
        self.lookback_days = lookback_days;
        self
    }

    async fn candles(&self, symbol: &str) -> Result<Vec<Candle>, SignalError> {
        let end = Utc::now();
        let start = end - Duration::days(self.lookback_days);
        let candles = self
            .market_data
            .fetch_price_series(symbol, start, end, Interval::Daily)
            .await?;
        if candles.is_empty() {
            return Err(SignalError::DataUnavailable(format!(
                "no price history for {}",
                symbol
            )));
        }
        Ok(candles)
    }

    /// Technical signal: a single-indicator strategy or the compound vote.
    pub async fn technical_signal(
        &self,
        symbol: &str,
        config: &TechnicalConfig,
    ) -> Result<TradeSignal, SignalError> {
        let candles = self.candles(symbol).await?;
        let signal = match config {
            TechnicalConfig::Simple { strategy, period } => {
                single::evaluate(symbol, *strategy, &candles, *period)?
            }
            TechnicalConfig::Compound(compound_config) => {
                compound::evaluate(symbol, compound_config, &candles)?
            }
        };
        info!(
            symbol = %symbol,
            strategy = %signal.strategy,
            decision = signal.decision.name(),
            confidence = signal.confidence,
            "technical signal"
        );
        Ok(signal)
    }

    /// Fundamental signal from aggregated news sentiment.
    pub async fn fundamental_signal(
        &self,
        symbol: &str,
        config: &FundamentalConfig,
    ) -> Result<TradeSignal, SignalError> {
        let articles = self
            .news
            .fetch_news(symbol, config.news_limit, &config.language)
            .await?;
        let summary = analyzer::analyze_articles(&*self.classifier, &articles).await?;
        let signal = fundamental_decision(symbol, summary, config.threshold);
        info!(
            symbol = %symbol,
            decision = signal.decision.name(),
            confidence = signal.confidence,
            "fundamental signal"
        );
        Ok(signal)
    }

    /// Hybrid signal blending the technical and fundamental branches.
    ///
    /// The branches are independent and evaluated concurrently. A failed
    /// technical branch is a hard error; a fundamental branch with no
    /// articles degrades to a zero-confidence HOLD inside the blend.
    pub async fn hybrid_signal(
        &self,
        symbol: &str,
        config: &HybridConfig,
    ) -> Result<TradeSignal, SignalError> {
        validate_weights(config.technical_weight, config.fundamental_weight)?;

        let (technical, fundamental) = tokio::join!(
            self.technical_signal(symbol, &config.technical),
            self.fundamental_signal(symbol, &config.fundamental),
        );

        let technical = technical?;
        let fundamental = match fundamental {
            Ok(signal) => signal,
            Err(err @ SignalError::NoArticles(_)) => {
                warn!(symbol = %symbol, error = %err, "fundamental branch degraded to HOLD");
                fundamental_fallback(symbol, &err)
            }
            Err(err) => return Err(err),
        };

        hybrid_blend(
            symbol,
            technical,
            fundamental,
            config.technical_weight,
            config.fundamental_weight,
        )
    }
}

/// Threshold rule turning an aggregated sentiment summary into a signal.
pub fn fundamental_decision(
    symbol: &str,
    summary: SentimentSummary,
    threshold: f64,
) -> TradeSignal {
    let polarity = summary.aggregate_polarity;
    let (decision, confidence, rationale) = if polarity > threshold {
        (
            Decision::Buy,
            polarity.abs().min(1.0),
            format!("Positive news sentiment (score: {:.2})", polarity),
        )
    } else if polarity < -threshold {
        (
            Decision::Sell,
            polarity.abs().min(1.0),
            format!("Negative news sentiment (score: {:.2})", polarity),
        )
    } else {
        (
            Decision::Hold,
            1.0 - polarity.abs(),
            format!("Neutral news sentiment (score: {:.2})", polarity),
        )
    };

    TradeSignal::new(
        symbol,
        FUNDAMENTAL_STRATEGY_ID,
        decision,
        confidence,
        rationale,
        SignalEvidence::Sentiment(summary),
    )
}

/// Zero-confidence HOLD carrying the failure context, used when the
/// fundamental branch could not be analyzed. Never defaults to a direction.
pub fn fundamental_fallback(symbol: &str, err: &SignalError) -> TradeSignal {
    TradeSignal::new(
        symbol,
        FUNDAMENTAL_STRATEGY_ID,
        Decision::Hold,
        0.0,
        format!("Could not analyze sentiment: {}", err),
        SignalEvidence::Sentiment(SentimentSummary {
            per_article: Vec::new(),
            aggregate_polarity: 0.0,
            distribution: SentimentDistribution::default(),
            average_confidence: 0.0,
            interpretation: "No sentiment data available.".to_string(),
        }),
    )
}

fn validate_weights(technical_weight: f64, fundamental_weight: f64) -> Result<(), SignalError> {
    if technical_weight < 0.0 || fundamental_weight < 0.0 {
        return Err(SignalError::InvalidWeights(
            "weights must be non-negative".to_string(),
        ));
    }
    if technical_weight + fundamental_weight <= 0.0 {
        return Err(SignalError::InvalidWeights(
            "technical and fundamental weights are both zero".to_string(),
        ));
    }
    Ok(())
}

/// Blend the two branch signals into the final recommendation.
///
/// Weights are normalized by their sum; the combined score is the sum of the
/// signed, weighted confidences. The agreement and confidence-band sentences
/// are explanatory only — the decision is driven solely by the score
/// thresholds.
pub fn hybrid_blend(
    symbol: &str,
    technical: TradeSignal,
    fundamental: TradeSignal,
    technical_weight: f64,
    fundamental_weight: f64,
) -> Result<TradeSignal, SignalError> {
    validate_weights(technical_weight, fundamental_weight)?;
    let total = technical_weight + fundamental_weight;
    let tech_weight = technical_weight / total;
    let fund_weight = fundamental_weight / total;

    let tech_score = technical.decision.sign() * technical.confidence * tech_weight;
    let fund_score = fundamental.decision.sign() * fundamental.confidence * fund_weight;
    let combined_score = tech_score + fund_score;

    let (decision, confidence) = if combined_score > HYBRID_DECISION_THRESHOLD {
        (Decision::Buy, combined_score.min(1.0))
    } else if combined_score < -HYBRID_DECISION_THRESHOLD {
        (Decision::Sell, combined_score.abs().min(1.0))
    } else {
        (Decision::Hold, 1.0 - combined_score.abs())
    };

    let agreement = if technical.decision == fundamental.decision {
        format!(
            "Strong signal: both technical and fundamental analysis agree on {}.",
            decision.name()
        )
    } else {
        format!(
            "Mixed signals: technical suggests {}, fundamental suggests {}.",
            technical.decision.name(),
            fundamental.decision.name()
        )
    };

    let band = if confidence > HIGH_CONFIDENCE_BAND {
        " High confidence signal."
    } else if confidence < LOW_CONFIDENCE_BAND {
        " Low confidence signal - consider waiting for clearer signals."
    } else {
        ""
    };

    let rationale = format!(
        "Combined analysis suggests {} with {:.1}% confidence (score {:.3}). {}{}",
        decision.name(),
        confidence * 100.0,
        combined_score,
        agreement,
        band,
    );

    let votes = vec![
        WeightedSignal::new(technical, tech_weight),
        WeightedSignal::new(fundamental, fund_weight),
    ];

    Ok(TradeSignal::new(
        symbol,
        HYBRID_STRATEGY_ID,
        decision,
        confidence,
        rationale,
        SignalEvidence::Votes(votes),
    ))
}
