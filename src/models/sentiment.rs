//! Sentiment analysis records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Three-way probability distribution from the sentiment classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl SentimentScores {
    /// Degraded-service result: neutral with zero confidence. The engine
    /// treats an article scored this way as an abstaining vote that still
    /// dilutes the aggregate mean.
    pub fn unavailable() -> Self {
        Self {
            positive: 0.0,
            negative: 0.0,
            neutral: 0.0,
        }
    }

    /// Polarity is `P(positive) - P(negative)`, range [-1, 1]. Every
    /// downstream threshold decision is driven by this, not by the argmax
    /// label.
    pub fn polarity(&self) -> f64 {
        (self.positive - self.negative).clamp(-1.0, 1.0)
    }

    /// Dominant label. Ties and all-zero distributions resolve to neutral.
    pub fn label(&self) -> SentimentLabel {
        if self.positive > self.negative && self.positive > self.neutral {
            SentimentLabel::Positive
        } else if self.negative > self.positive && self.negative > self.neutral {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    /// Probability of the dominant label.
    pub fn confidence(&self) -> f64 {
        self.positive.max(self.negative).max(self.neutral).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

/// One classified article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleSentiment {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub sentiment: SentimentLabel,
    pub polarity: f64,
    pub confidence: f64,
}

/// Counts of articles per dominant label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentDistribution {
    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }
}

/// Aggregated sentiment over a batch of articles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub per_article: Vec<ArticleSentiment>,
    /// Arithmetic mean of per-article polarity; no recency or source
    /// weighting.
    pub aggregate_polarity: f64,
    pub distribution: SentimentDistribution,
    pub average_confidence: f64,
    pub interpretation: String,
}
