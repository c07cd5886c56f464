//! Port traits implemented by adapters.

pub mod analysis_repository;
pub mod config_port;
pub mod market_data_port;
