//! Core domain types and logic.

pub mod analysis_history;
pub mod chart_analysis;
pub mod error;
pub mod indicator;
pub mod price_series;
pub mod settings;
pub mod signal;
