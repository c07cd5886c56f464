//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seed with the SMA of the first n closes, then
//! EMA = C*k + EMA_prev*(1-k) for every later close.
//! Fewer than n closes: the seed averages whatever is there.

pub fn calculate_ema(prices: &[f64], period: usize) -> f64 {
    if prices.is_empty() {
        return 0.0;
    }

    let period = period.max(1);
    let seed_len = period.min(prices.len());
    let mut ema = prices[..seed_len].iter().sum::<f64>() / seed_len as f64;
    let k = 2.0 / (period as f64 + 1.0);

    for &price in prices.iter().skip(period) {
        ema = price * k + ema * (1.0 - k);
    }

    ema
}
