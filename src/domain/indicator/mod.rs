//! Technical indicator implementations.
//!
//! Every indicator here reduces a close series (oldest first) to its latest
//! value. Nothing is retained between calls.
//! - `IndicatorParams`: lookback periods and band width
//! - `IndicatorEngine`: computes an `IndicatorSnapshot` from a close series
//! - `IndicatorType`: indicator identity + parameters, for display

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;

pub use bollinger::{calculate_bollinger, BollingerBands};
pub use ema::calculate_ema;
pub use macd::{calculate_macd, MacdValue};
pub use rsi::calculate_rsi;

use serde::Serialize;
use std::fmt;

/// Indicator values from one evaluation of a close series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub rsi: f64,
    pub macd: MacdValue,
    pub bollinger_bands: BollingerBands,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_stddev: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: rsi::DEFAULT_PERIOD,
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
            bollinger_period: bollinger::DEFAULT_PERIOD,
            bollinger_stddev: bollinger::DEFAULT_STDDEV_MULT,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    params: IndicatorParams,
}

impl IndicatorEngine {
    pub fn new(params: IndicatorParams) -> Self {
        Self { params }
    }

    pub fn snapshot(&self, prices: &[f64]) -> IndicatorSnapshot {
        let p = &self.params;
        let snapshot = IndicatorSnapshot {
            rsi: calculate_rsi(prices, p.rsi_period),
            macd: calculate_macd(prices, p.macd_fast, p.macd_slow, p.macd_signal),
            bollinger_bands: calculate_bollinger(prices, p.bollinger_period, p.bollinger_stddev),
        };
        tracing::debug!(
            closes = prices.len(),
            rsi = snapshot.rsi,
            macd = snapshot.macd.macd,
            bb_upper = snapshot.bollinger_bands.upper,
            bb_lower = snapshot.bollinger_bands.lower,
            "computed indicator snapshot"
        );
        snapshot
    }

    /// The indicators this engine evaluates, in snapshot order.
    pub fn indicator_types(&self) -> Vec<IndicatorType> {
        let p = &self.params;
        vec![
            IndicatorType::Rsi(p.rsi_period),
            IndicatorType::Macd {
                fast: p.macd_fast,
                slow: p.macd_slow,
                signal: p.macd_signal,
            },
            IndicatorType::Bollinger {
                period: p.bollinger_period,
                stddev_mult: p.bollinger_stddev,
            },
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorType {
    Rsi(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult: f64,
    },
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult,
            } => write!(f, "BOLLINGER({},{})", period, stddev_mult),
        }
    }
}
