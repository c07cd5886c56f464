//! Closing-price series, oldest first.

use crate::domain::error::SignaldeskError;

/// A non-empty, ordered sequence of closing prices.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    closes: Vec<f64>,
}

impl PriceSeries {
    pub fn new(closes: Vec<f64>) -> Result<Self, SignaldeskError> {
        if closes.is_empty() {
            return Err(SignaldeskError::invalid_input(
                "price series must contain at least one price",
            ));
        }
        Ok(Self { closes })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.closes
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    /// Always false for a constructed series.
    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Most recent close.
    pub fn last(&self) -> f64 {
        // Non-empty by construction.
        self.closes[self.closes.len() - 1]
    }
}

impl TryFrom<Vec<f64>> for PriceSeries {
    type Error = SignaldeskError;

    fn try_from(closes: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(closes)
    }
}

/// Parse a comma-separated list of prices, e.g. `"1.08, 1.09,1.07"`.
pub fn parse_prices(input: &str) -> Result<PriceSeries, SignaldeskError> {
    let closes = input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| SignaldeskError::invalid_input(format!("invalid price '{}'", s)))
        })
        .collect::<Result<Vec<f64>, _>>()?;
    PriceSeries::new(closes)
}
