//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over the last n closes
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//! A series shorter than n uses every close it has.
//!
//! Default parameters: period=20, multiplier=2.0

use serde::Serialize;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_STDDEV_MULT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

pub fn calculate_bollinger(prices: &[f64], period: usize, stddev_mult: f64) -> BollingerBands {
    if prices.is_empty() {
        return BollingerBands {
            upper: 0.0,
            middle: 0.0,
            lower: 0.0,
        };
    }

    // period 0 keeps the whole series, like a zero-length tail slice
    let start = if period == 0 {
        0
    } else {
        prices.len().saturating_sub(period)
    };
    let window = &prices[start..];
    let n = window.len() as f64;

    let middle = window.iter().sum::<f64>() / n;
    let variance = window
        .iter()
        .map(|p| {
            let diff = p - middle;
            diff * diff
        })
        .sum::<f64>()
        / n;
    let stddev = variance.sqrt();

    BollingerBands {
        upper: middle + stddev * stddev_mult,
        middle,
        lower: middle - stddev * stddev_mult,
    }
}
