//! Per-article sentiment aggregation.

use crate::models::sentiment::{
    ArticleSentiment, SentimentDistribution, SentimentLabel, SentimentSummary,
};
use crate::sentiment::classifier::SentimentClassifier;
use crate::services::news::Article;
use crate::signals::error::SignalError;

/// Classify every article and aggregate the results.
///
/// Each article is scored independently; the aggregate polarity is the plain
/// arithmetic mean, with no recency or source weighting. Articles the
/// classifier could not score arrive as neutral zero-confidence
/// distributions and dilute the mean rather than being dropped.
pub async fn analyze_articles(
    classifier: &dyn SentimentClassifier,
    articles: &[Article],
) -> Result<SentimentSummary, SignalError> {
    if articles.is_empty() {
        return Err(SignalError::NoArticles("no articles retrieved".to_string()));
    }

    let mut per_article = Vec::with_capacity(articles.len());
    for article in articles {
        let scores = classifier.classify(&article.classification_text()).await;
        per_article.push(ArticleSentiment {
            title: article.title.clone(),
            url: article.url.clone(),
            published_at: article.published_at,
            source: article.source.clone(),
            sentiment: scores.label(),
            polarity: scores.polarity(),
            confidence: scores.confidence(),
        });
    }

    let count = per_article.len() as f64;
    let aggregate_polarity = per_article.iter().map(|a| a.polarity).sum::<f64>() / count;
    let average_confidence = per_article.iter().map(|a| a.confidence).sum::<f64>() / count;

    let mut distribution = SentimentDistribution::default();
    for article in &per_article {
        match article.sentiment {
            SentimentLabel::Positive => distribution.positive += 1,
            SentimentLabel::Negative => distribution.negative += 1,
            SentimentLabel::Neutral => distribution.neutral += 1,
        }
    }

    let interpretation = interpret(aggregate_polarity, &distribution);

    Ok(SentimentSummary {
        per_article,
        aggregate_polarity,
        distribution,
        average_confidence,
        interpretation,
    })
}

/// Human-readable interpretation of the aggregate polarity.
fn interpret(polarity: f64, distribution: &SentimentDistribution) -> String {
    let total = distribution.total();
    if polarity > 0.3 {
        format!(
            "Strongly positive sentiment. {}/{} articles are positive.",
            distribution.positive, total
        )
    } else if polarity > 0.1 {
        format!(
            "Moderately positive sentiment. {}/{} articles are positive.",
            distribution.positive, total
        )
    } else if polarity < -0.3 {
        format!(
            "Strongly negative sentiment. {}/{} articles are negative.",
            distribution.negative, total
        )
    } else if polarity < -0.1 {
        format!(
            "Moderately negative sentiment. {}/{} articles are negative.",
            distribution.negative, total
        )
    } else {
        "Neutral sentiment. Market sentiment is mixed or unclear.".to_string()
    }
}
