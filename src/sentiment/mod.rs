//! News sentiment analysis: the classifier interface and per-article
//! aggregation.

pub mod analyzer;
pub mod classifier;

pub use analyzer::analyze_articles;
pub use classifier::{FinbertGateway, SentimentClassifier};
