//! HTTP request handlers for web adapter.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::analysis_history::AnalysisRecord;
use crate::domain::chart_analysis::ChartAnalysis;
use crate::domain::price_series::PriceSeries;
use crate::domain::signal::SignalRecommendation;

use super::{AppState, WebError};

pub const DEFAULT_TIMEFRAME: &str = "H1";
pub const REALTIME_SOURCE: &str = "csv";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    #[serde(default)]
    pub timeframe: Option<String>,
    pub prices: Vec<f64>,
    #[serde(default)]
    pub current_price: Option<f64>,
}

pub async fn evaluate_signal(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<SignalRecommendation>, WebError> {
    let series = PriceSeries::new(req.prices)?;
    let current_price = req.current_price.unwrap_or_else(|| series.last());
    tracing::info!(
        timeframe = req.timeframe.as_deref().unwrap_or(DEFAULT_TIMEFRAME),
        closes = series.len(),
        "evaluating signal"
    );
    Ok(Json(state.generator.generate_signal(&series, current_price)))
}

#[derive(Debug, Deserialize)]
pub struct TimeframeQuery {
    pub timeframe: Option<String>,
}

impl TimeframeQuery {
    fn timeframe(&self) -> &str {
        self.timeframe.as_deref().unwrap_or(DEFAULT_TIMEFRAME)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairSignal {
    pub pair: String,
    pub timeframe: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub recommendation: SignalRecommendation,
}

#[derive(Debug, Serialize)]
pub struct RealtimeMetadata {
    pub source: &'static str,
    pub indicators: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RealtimeResponse {
    pub signals: Vec<PairSignal>,
    pub metadata: RealtimeMetadata,
}

pub async fn realtime_signals(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TimeframeQuery>,
) -> Result<Json<RealtimeResponse>, WebError> {
    let timeframe = query.timeframe();
    let pairs = state.market_data.list_pairs()?;
    let now = Utc::now();

    let mut signals = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let series = match state
            .market_data
            .fetch_closes(&pair, timeframe)
            .and_then(PriceSeries::new)
        {
            Ok(series) => series,
            Err(e) => {
                tracing::warn!(pair = %pair, timeframe, "skipping pair: {e}");
                continue;
            }
        };
        let recommendation = state.generator.generate_signal(&series, series.last());
        signals.push(PairSignal {
            pair,
            timeframe: timeframe.to_string(),
            timestamp: now,
            recommendation,
        });
    }

    let indicators = state
        .generator
        .engine()
        .indicator_types()
        .iter()
        .map(ToString::to_string)
        .collect();

    Ok(Json(RealtimeResponse {
        signals,
        metadata: RealtimeMetadata {
            source: REALTIME_SOURCE,
            indicators,
        },
    }))
}

pub async fn coerce_analysis(
    Query(query): Query<TimeframeQuery>,
    body: String,
) -> Json<ChartAnalysis> {
    Json(ChartAnalysis::from_model_output(
        &body,
        query.timeframe(),
        Utc::now(),
    ))
}

pub async fn save_analysis(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Response, WebError> {
    if !payload.is_object() {
        return Err(WebError::bad_request("analysis must be a JSON object"));
    }
    let analysis = ChartAnalysis::from_value(&payload, DEFAULT_TIMEFRAME, Utc::now());
    let record = state.repository.save(&user_id, analysis)?;
    tracing::info!(id = %record.id, user_id = %user_id, "analysis saved");
    Ok((StatusCode::CREATED, Json(record)).into_response())
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

pub async fn list_analyses(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<AnalysisRecord>>, WebError> {
    let limit = query.limit.unwrap_or(state.history_limit);
    Ok(Json(state.repository.list_for_user(&user_id, limit)?))
}

pub async fn delete_analysis(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, WebError> {
    state.repository.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn not_found() -> WebError {
    WebError::not_found("route not found")
}
