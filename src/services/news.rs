//! News provider interface and the Newsdata.io client.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("no results for query: {0}")]
    NotFound(String),
    #[error("rate limited by provider: {0}")]
    RateLimited(String),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// One retrieved article, prior to classification.
#[derive(Debug, Clone)]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    pub source: Option<String>,
}

impl Article {
    /// Text handed to the sentiment classifier: title plus description.
    pub fn classification_text(&self) -> String {
        match &self.description {
            Some(description) => format!("{} {}", self.title, description),
            None => self.title.clone(),
        }
    }
}

#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn fetch_news(
        &self,
        query: &str,
        limit: usize,
        language: &str,
    ) -> Result<Vec<Article>, NewsError>;
}

pub struct NewsdataClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct NewsdataResponse {
    status: String,
    #[serde(default)]
    results: Vec<NewsdataArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsdataArticle {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    content: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    source_id: Option<String>,
}

impl NewsdataClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(base_url, api_key, reqwest::Client::new())
    }

    pub fn with_client(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|dt| dt.and_utc())
    }
}

#[async_trait]
impl NewsProvider for NewsdataClient {
    async fn fetch_news(
        &self,
        query: &str,
        limit: usize,
        language: &str,
    ) -> Result<Vec<Article>, NewsError> {
        let size = limit.clamp(1, 50).to_string();
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("q", query),
                ("language", language),
                ("size", size.as_str()),
            ])
            .send()
            .await
            .map_err(|e| NewsError::Connection(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(NewsError::RateLimited(status.to_string()));
        }
        if !status.is_success() {
            return Err(NewsError::Connection(format!("unexpected status {}", status)));
        }

        let payload: NewsdataResponse = response
            .json()
            .await
            .map_err(|e| NewsError::Malformed(e.to_string()))?;
        if payload.status != "success" {
            return Err(NewsError::Malformed(format!(
                "provider status '{}'",
                payload.status
            )));
        }

        let articles: Vec<Article> = payload
            .results
            .into_iter()
            .filter_map(|raw| {
                let title = raw.title?;
                Some(Article {
                    title,
                    description: raw.description,
                    content: raw.content,
                    url: raw.link.unwrap_or_default(),
                    published_at: raw.pub_date.as_deref().and_then(Self::parse_pub_date),
                    source: raw.source_id,
                })
            })
            .take(limit)
            .collect();

        debug!(query = %query, count = articles.len(), "fetched news");
        Ok(articles)
    }
}
