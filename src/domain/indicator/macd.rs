//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) over a history holding only the current MACD value
//! Histogram = MACD Line - Signal Line
//!
//! No MACD history is retained between calls, so the signal line always
//! equals the MACD line and the histogram is always 0 for finite input.
//!
//! Default parameters: fast=12, slow=26, signal=9

use serde::Serialize;

use crate::domain::indicator::calculate_ema;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacdValue {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

pub fn calculate_macd(
    prices: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> MacdValue {
    let macd = calculate_ema(prices, fast) - calculate_ema(prices, slow);
    let signal = calculate_ema(&[macd], signal_period);

    MacdValue {
        macd,
        signal,
        histogram: macd - signal,
    }
}
