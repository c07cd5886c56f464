//! Web server adapter.
//!
//! JSON API over the signal generator, the chart-analysis coercion and the
//! analysis history.

mod error;
mod handlers;

pub use error::{WebError, status_from_error};
pub use handlers::*;

use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::domain::signal::SignalGenerator;
use crate::ports::analysis_repository::AnalysisRepository;
use crate::ports::market_data_port::MarketDataPort;

pub struct AppState {
    pub generator: Arc<SignalGenerator>,
    pub market_data: Arc<dyn MarketDataPort + Send + Sync>,
    pub repository: Arc<dyn AnalysisRepository + Send + Sync>,
    pub history_limit: usize,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/signals/evaluate", post(handlers::evaluate_signal))
        .route("/api/signals/realtime", get(handlers::realtime_signals))
        .route("/api/analysis/coerce", post(handlers::coerce_analysis))
        .route(
            "/api/users/{user_id}/analyses",
            get(handlers::list_analyses).post(handlers::save_analysis),
        )
        .route("/api/analyses/{id}", delete(handlers::delete_analysis))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
