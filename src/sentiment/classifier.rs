//! Sentiment classifier interface and the FinBERT HTTP gateway.

use crate::models::sentiment::SentimentScores;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// A 3-way text classifier. The signature is infallible on purpose: a
/// degraded or unreachable model yields the neutral zero-confidence
/// distribution, which the aggregation treats as one abstaining article.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> SentimentScores;
}

/// HTTP gateway to a FinBERT inference service.
pub struct FinbertGateway {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ClassifyResponse {
    positive: f64,
    negative: f64,
    neutral: f64,
}

impl FinbertGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self::with_client(base_url, http)
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    async fn try_classify(&self, text: &str) -> Result<SentimentScores, reqwest::Error> {
        let response: ClassifyResponse = self
            .http
            .post(format!("{}/classify", self.base_url))
            .json(&ClassifyRequest { text })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(SentimentScores {
            positive: response.positive,
            negative: response.negative,
            neutral: response.neutral,
        })
    }
}

#[async_trait]
impl SentimentClassifier for FinbertGateway {
    async fn classify(&self, text: &str) -> SentimentScores {
        match self.try_classify(text).await {
            Ok(scores) => scores,
            Err(err) => {
                warn!(error = %err, "sentiment service unavailable, scoring neutral");
                SentimentScores::unavailable()
            }
        }
    }
}
