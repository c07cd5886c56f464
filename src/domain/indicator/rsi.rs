//! RSI (Relative Strength Index) indicator.
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - First average: the changes inside the first `period` closes, summed and divided by n
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100, or 50 when avg_gain == 0 as well.
//!
//! Fewer than n closes: RSI = 50 (neutral).

pub const DEFAULT_PERIOD: usize = 14;
pub const NEUTRAL_RSI: f64 = 50.0;

pub fn calculate_rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period {
        return NEUTRAL_RSI;
    }

    let n = period as f64;
    let (gains, losses) = prices[..period]
        .windows(2)
        .fold((0.0, 0.0), |(g, l), w| {
            let change = w[1] - w[0];
            if change > 0.0 {
                (g + change, l)
            } else {
                (g, l + change.abs())
            }
        });

    let mut avg_gain = gains / n;
    let mut avg_loss = losses / n;
    let mut rsi = rsi_from_averages(avg_gain, avg_loss);

    for w in prices[period - 1..].windows(2) {
        let change = w[1] - w[0];
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, change.abs())
        };
        avg_gain = (avg_gain * (n - 1.0) + gain) / n;
        avg_loss = (avg_loss * (n - 1.0) + loss) / n;
        rsi = rsi_from_averages(avg_gain, avg_loss);
    }

    rsi
}

/// NaN averages fall through to the formula and yield NaN.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 { NEUTRAL_RSI } else { 100.0 }
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
