#![allow(dead_code)]

use signaldesk::domain::error::SignaldeskError;
use signaldesk::domain::price_series::PriceSeries;
use signaldesk::ports::market_data_port::MarketDataPort;
use std::collections::BTreeMap;

pub struct MockMarketDataPort {
    pub data: BTreeMap<String, Vec<f64>>,
    pub errors: BTreeMap<String, String>,
}

impl MockMarketDataPort {
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
            errors: BTreeMap::new(),
        }
    }

    pub fn with_closes(mut self, pair: &str, closes: Vec<f64>) -> Self {
        self.data.insert(pair.to_string(), closes);
        self
    }

    pub fn with_error(mut self, pair: &str, reason: &str) -> Self {
        self.errors.insert(pair.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockMarketDataPort {
    fn fetch_closes(&self, pair: &str, _timeframe: &str) -> Result<Vec<f64>, SignaldeskError> {
        if let Some(reason) = self.errors.get(pair) {
            return Err(SignaldeskError::MarketData {
                pair: pair.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(pair).cloned().unwrap_or_default())
    }

    fn list_pairs(&self) -> Result<Vec<String>, SignaldeskError> {
        let mut pairs: Vec<String> = self.data.keys().chain(self.errors.keys()).cloned().collect();
        pairs.sort();
        pairs.dedup();
        Ok(pairs)
    }
}

/// `count` closes starting at `start`, each `step` above the previous one.
pub fn linear(start: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + step * i as f64).collect()
}

pub fn flat(price: f64, count: usize) -> Vec<f64> {
    vec![price; count]
}

/// 30 closes falling from 100 by 2 each step.
pub fn falling_series() -> PriceSeries {
    PriceSeries::new(linear(100.0, -2.0, 30)).unwrap()
}

/// 30 closes rising from 100 by 2 each step.
pub fn rising_series() -> PriceSeries {
    PriceSeries::new(linear(100.0, 2.0, 30)).unwrap()
}

pub fn flat_series() -> PriceSeries {
    PriceSeries::new(flat(100.0, 30)).unwrap()
}
