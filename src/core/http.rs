//! HTTP endpoint server using Axum
//!
//! One route per signal-generation entry point. Handlers never panic and
//! never let an engine error escape raw: every failure is folded into a
//! structured `{error, context}` envelope the calling agent can relay.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use crate::config::Config;
use crate::metrics::Metrics;
use crate::sentiment::FinbertGateway;
use crate::services::{AlphaVantageClient, NewsdataClient};
use crate::signals::generator::{
    FundamentalConfig, HybridConfig, SignalGenerator, TechnicalConfig,
};
use crate::signals::SignalError;
use crate::strategies::compound::{CompoundConfig, IndicatorWeight};
use crate::strategies::single::StrategyKind;

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<SignalGenerator>,
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "sentrix-signal-engine"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    state.metrics.http_requests_in_flight.dec();

    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
struct IndicatorWeightRequest {
    weight: f64,
    period: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TechnicalSettings {
    strategy_type: Option<String>,
    strategy: Option<String>,
    period: Option<u32>,
    indicators: Option<BTreeMap<String, IndicatorWeightRequest>>,
}

#[derive(Debug, Deserialize)]
struct TechnicalRequest {
    symbol: String,
    #[serde(flatten)]
    settings: TechnicalSettings,
}

#[derive(Debug, Deserialize)]
struct FundamentalRequest {
    symbol: String,
    #[serde(flatten)]
    settings: NewsSettings,
}

#[derive(Debug, Deserialize, Default)]
struct NewsSettings {
    news_count: Option<usize>,
    threshold: Option<f64>,
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HybridRequest {
    symbol: String,
    technical_weight: Option<f64>,
    fundamental_weight: Option<f64>,
    technical_config: Option<TechnicalSettings>,
    news_config: Option<NewsSettings>,
}

/// Resolve the string-keyed API settings into the typed engine config.
/// Unknown names are rejected here, at the boundary; the engine itself
/// dispatches on exhaustive enums.
fn parse_technical(settings: &TechnicalSettings) -> Result<TechnicalConfig, SignalError> {
    let strategy_type = settings.strategy_type.as_deref().unwrap_or("compound");
    match strategy_type {
        "simple" => {
            let name = settings.strategy.as_deref().unwrap_or("RSI");
            let strategy = StrategyKind::parse(name)
                .ok_or_else(|| SignalError::UnknownStrategy(name.to_string()))?;
            Ok(TechnicalConfig::Simple {
                strategy,
                period: settings.period,
            })
        }
        "compound" => {
            let config = match &settings.indicators {
                Some(requested) => {
                    let mut indicators = BTreeMap::new();
                    for (name, member) in requested {
                        let kind = StrategyKind::parse(name)
                            .ok_or_else(|| SignalError::UnknownIndicator(name.clone()))?;
                        indicators.insert(
                            kind,
                            IndicatorWeight {
                                weight: member.weight,
                                period: member.period,
                            },
                        );
                    }
                    CompoundConfig { indicators }
                }
                None => CompoundConfig::default(),
            };
            Ok(TechnicalConfig::Compound(config))
        }
        other => Err(SignalError::UnknownStrategy(other.to_string())),
    }
}

fn parse_fundamental(settings: &NewsSettings) -> FundamentalConfig {
    let defaults = FundamentalConfig::default();
    FundamentalConfig {
        news_limit: settings.news_count.unwrap_or(defaults.news_limit),
        threshold: settings.threshold.unwrap_or(defaults.threshold),
        language: settings
            .language
            .clone()
            .unwrap_or(defaults.language),
    }
}

fn error_status(err: &SignalError) -> StatusCode {
    match err {
        SignalError::DataUnavailable(_) => StatusCode::BAD_GATEWAY,
        SignalError::UnknownIndicator(_)
        | SignalError::UnknownStrategy(_)
        | SignalError::InvalidWeights(_) => StatusCode::BAD_REQUEST,
        SignalError::InsufficientHistory { .. }
        | SignalError::AllVotesAbstained
        | SignalError::NoArticles(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn signal_response(
    state: &AppState,
    symbol: &str,
    result: Result<crate::models::signal::TradeSignal, SignalError>,
) -> Response {
    match result {
        Ok(signal) => {
            state
                .metrics
                .signals_generated_total
                .with_label_values(&[signal.strategy.as_str()])
                .inc();
            Json(json!(signal)).into_response()
        }
        Err(err) => {
            state
                .metrics
                .signal_errors_total
                .with_label_values(&[err.kind()])
                .inc();
            let body = json!({
                "error": {
                    "kind": err.kind(),
                    "message": err.to_string(),
                },
                "context": {
                    "symbol": symbol,
                },
            });
            (error_status(&err), Json(body)).into_response()
        }
    }
}

async fn technical_signal(
    State(state): State<AppState>,
    Json(request): Json<TechnicalRequest>,
) -> Response {
    let result = match parse_technical(&request.settings) {
        Ok(config) => {
            state
                .generator
                .technical_signal(&request.symbol, &config)
                .await
        }
        Err(err) => Err(err),
    };
    signal_response(&state, &request.symbol, result)
}

async fn fundamental_signal(
    State(state): State<AppState>,
    Json(request): Json<FundamentalRequest>,
) -> Response {
    let config = parse_fundamental(&request.settings);
    let result = state
        .generator
        .fundamental_signal(&request.symbol, &config)
        .await;
    signal_response(&state, &request.symbol, result)
}

async fn hybrid_signal(
    State(state): State<AppState>,
    Json(request): Json<HybridRequest>,
) -> Response {
    let technical = match &request.technical_config {
        Some(settings) => match parse_technical(settings) {
            Ok(config) => config,
            Err(err) => return signal_response(&state, &request.symbol, Err(err)),
        },
        None => TechnicalConfig::default(),
    };
    let fundamental = request
        .news_config
        .as_ref()
        .map(parse_fundamental)
        .unwrap_or_default();

    let defaults = HybridConfig::default();
    let config = HybridConfig {
        technical_weight: request.technical_weight.unwrap_or(defaults.technical_weight),
        fundamental_weight: request
            .fundamental_weight
            .unwrap_or(defaults.fundamental_weight),
        technical,
        fundamental,
    };

    let result = state.generator.hybrid_signal(&request.symbol, &config).await;
    signal_response(&state, &request.symbol, result)
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/signals/technical", post(technical_signal))
        .route("/api/signals/fundamental", post(fundamental_signal))
        .route("/api/signals/hybrid", post(hybrid_signal))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let start_time = Arc::new(Instant::now());

    let market_data = Arc::new(AlphaVantageClient::new(
        config.alpha_vantage_base_url.clone(),
        config.alpha_vantage_api_key.clone(),
    ));
    let news = Arc::new(NewsdataClient::new(
        config.newsdata_base_url.clone(),
        config.newsdata_api_key.clone(),
    ));
    let classifier = Arc::new(FinbertGateway::new(config.sentiment_base_url.clone()));

    let generator = Arc::new(
        SignalGenerator::new(market_data, news, classifier)
            .with_lookback_days(config.lookback_days),
    );

    let state = AppState {
        generator,
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics,
        start_time,
    };
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!(port = config.port, "HTTP server listening on port {}", config.port);
    axum::serve(listener, app).await?;

    Ok(())
}
