//! Market data port trait.

use crate::domain::error::SignaldeskError;

/// Source of closing prices, oldest first.
pub trait MarketDataPort {
    fn fetch_closes(&self, pair: &str, timeframe: &str) -> Result<Vec<f64>, SignaldeskError>;

    fn list_pairs(&self) -> Result<Vec<String>, SignaldeskError>;
}
