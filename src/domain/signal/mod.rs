//! Trading signal generation.
//!
//! `SignalGenerator` runs the indicator engine over a close series and folds
//! the rule outcomes into a `SignalRecommendation`:
//! 1. start at HOLD with confidence 50
//! 2. apply RSI, MACD and Bollinger rules in order
//! 3. cap confidence, then force HOLD below the minimum confidence

pub mod rules;

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::domain::error::SignaldeskError;
use crate::domain::indicator::{
    BollingerBands, IndicatorEngine, IndicatorParams, IndicatorSnapshot, MacdValue,
};
use crate::domain::price_series::PriceSeries;

use rules::{RuleContext, SignalRule, default_rules, fold_outcomes};

pub const BASE_CONFIDENCE: u32 = 50;
pub const NEUTRAL_REASONING: &str = "technical analysis neutral";
const REASON_SEPARATOR: &str = ". ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

impl FromStr for Signal {
    type Err = SignaldeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Ok(Signal::Buy),
            "SELL" => Ok(Signal::Sell),
            "HOLD" => Ok(Signal::Hold),
            other => Err(SignaldeskError::invalid_input(format!(
                "unknown signal '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalParams {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub confidence_cap: u32,
    pub min_confidence: u32,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            confidence_cap: 95,
            min_confidence: 40,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalRecommendation {
    pub signal: Signal,
    pub confidence: u8,
    pub reasoning: String,
    pub rsi: f64,
    pub macd: MacdValue,
    pub bollinger_bands: BollingerBands,
}

impl SignalRecommendation {
    pub fn snapshot(&self) -> IndicatorSnapshot {
        IndicatorSnapshot {
            rsi: self.rsi,
            macd: self.macd,
            bollinger_bands: self.bollinger_bands,
        }
    }
}

pub struct SignalGenerator {
    engine: IndicatorEngine,
    params: SignalParams,
    rules: Vec<Box<dyn SignalRule>>,
}

impl Default for SignalGenerator {
    fn default() -> Self {
        Self::new(IndicatorParams::default(), SignalParams::default())
    }
}

impl SignalGenerator {
    pub fn new(indicator_params: IndicatorParams, params: SignalParams) -> Self {
        Self {
            engine: IndicatorEngine::new(indicator_params),
            params,
            rules: default_rules(params.rsi_oversold, params.rsi_overbought),
        }
    }

    pub fn engine(&self) -> &IndicatorEngine {
        &self.engine
    }

    pub fn params(&self) -> &SignalParams {
        &self.params
    }

    pub fn generate_signal(&self, prices: &PriceSeries, current_price: f64) -> SignalRecommendation {
        let snapshot = self.engine.snapshot(prices.as_slice());
        self.evaluate(&snapshot, current_price)
    }

    /// Apply the rule cascade to an already computed snapshot.
    pub fn evaluate(&self, snapshot: &IndicatorSnapshot, current_price: f64) -> SignalRecommendation {
        let ctx = RuleContext {
            snapshot,
            current_price,
        };
        let tally = fold_outcomes(
            BASE_CONFIDENCE,
            self.rules.iter().filter_map(|rule| {
                let outcome = rule.evaluate(&ctx);
                if let Some(o) = &outcome {
                    tracing::debug!(rule = rule.name(), direction = %o.direction, "rule fired");
                }
                outcome
            }),
        );

        let confidence = tally.confidence.min(self.params.confidence_cap);
        let signal = if confidence < self.params.min_confidence {
            Signal::Hold
        } else {
            tally.signal
        };

        let reasoning = if tally.reasons.is_empty() {
            NEUTRAL_REASONING.to_string()
        } else {
            tally.reasons.join(REASON_SEPARATOR)
        };

        SignalRecommendation {
            signal,
            confidence: confidence.min(u8::MAX as u32) as u8,
            reasoning,
            rsi: snapshot.rsi,
            macd: snapshot.macd,
            bollinger_bands: snapshot.bollinger_bands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(rsi: f64, macd: f64, histogram: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            rsi,
            macd: MacdValue {
                macd,
                signal: macd - histogram,
                histogram,
            },
            bollinger_bands: BollingerBands {
                upper: 110.0,
                middle: 100.0,
                lower: 90.0,
            },
        }
    }

    #[test]
    fn signal_display_and_parse() {
        assert_eq!(Signal::Buy.to_string(), "BUY");
        assert_eq!("sell".parse::<Signal>().unwrap(), Signal::Sell);
        assert_eq!(" Hold ".parse::<Signal>().unwrap(), Signal::Hold);
        assert!("STRONG_BUY".parse::<Signal>().is_err());
    }

    #[test]
    fn signal_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Signal::Hold).unwrap(), "\"HOLD\"");
    }

    #[test]
    fn neutral_snapshot_is_hold() {
        let rec = SignalGenerator::default().evaluate(&snapshot(50.0, 0.0, 0.0), 100.0);
        assert_eq!(rec.signal, Signal::Hold);
        assert_eq!(rec.confidence, 50);
        assert_eq!(rec.reasoning, "technical analysis neutral");
    }

    #[test]
    fn all_sell_rules_cap_at_95() {
        let rec = SignalGenerator::default().evaluate(&snapshot(80.0, -1.0, -0.5), 120.0);
        assert_eq!(rec.signal, Signal::Sell);
        assert_eq!(rec.confidence, 95);
        assert_eq!(
            rec.reasoning,
            "RSI overbought. MACD negative and falling. price above upper band"
        );
    }

    #[test]
    fn cap_applies_before_overflowing_rules() {
        let generator = SignalGenerator::new(
            IndicatorParams::default(),
            SignalParams {
                confidence_cap: 70,
                ..SignalParams::default()
            },
        );
        let rec = generator.evaluate(&snapshot(20.0, 1.0, 0.5), 80.0);
        assert_eq!(rec.signal, Signal::Buy);
        assert_eq!(rec.confidence, 70);
    }

    #[test]
    fn bollinger_has_final_say_on_direction() {
        let rec = SignalGenerator::default().evaluate(&snapshot(20.0, 0.0, 0.0), 115.0);
        assert_eq!(rec.signal, Signal::Sell);
        assert_eq!(rec.confidence, 80);
        assert_eq!(rec.reasoning, "RSI oversold. price above upper band");
    }

    #[test]
    fn low_confidence_forces_hold() {
        let generator = SignalGenerator::new(
            IndicatorParams::default(),
            SignalParams {
                min_confidence: 75,
                ..SignalParams::default()
            },
        );
        let rec = generator.evaluate(&snapshot(20.0, 0.0, 0.0), 100.0);
        assert_eq!(rec.confidence, 70);
        assert_eq!(rec.signal, Signal::Hold);
        assert_eq!(rec.reasoning, "RSI oversold");
    }

    #[test]
    fn threshold_compares_capped_value() {
        let generator = SignalGenerator::new(
            IndicatorParams::default(),
            SignalParams {
                confidence_cap: 60,
                min_confidence: 65,
                ..SignalParams::default()
            },
        );
        let rec = generator.evaluate(&snapshot(20.0, 1.0, 0.5), 80.0);
        assert_eq!(rec.confidence, 60);
        assert_eq!(rec.signal, Signal::Hold);
    }

    #[test]
    fn nan_snapshot_is_neutral_hold() {
        let nan = IndicatorSnapshot {
            rsi: f64::NAN,
            macd: MacdValue {
                macd: f64::NAN,
                signal: f64::NAN,
                histogram: f64::NAN,
            },
            bollinger_bands: BollingerBands {
                upper: f64::NAN,
                middle: f64::NAN,
                lower: f64::NAN,
            },
        };
        let rec = SignalGenerator::default().evaluate(&nan, 100.0);
        assert_eq!(rec.signal, Signal::Hold);
        assert_eq!(rec.confidence, 50);
        assert_eq!(rec.reasoning, NEUTRAL_REASONING);
        assert!(rec.rsi.is_nan());
    }

    #[test]
    fn generate_signal_on_flat_series() {
        let prices = PriceSeries::new(vec![100.0; 30]).unwrap();
        let rec = SignalGenerator::default().generate_signal(&prices, 100.0);
        assert_eq!(rec.signal, Signal::Hold);
        assert_eq!(rec.confidence, 50);
        assert_eq!(rec.rsi, 50.0);
        assert_eq!(rec.snapshot().bollinger_bands.middle, 100.0);
    }

    #[test]
    fn recommendation_json_shape() {
        let rec = SignalGenerator::default().evaluate(&snapshot(50.0, 0.0, 0.0), 100.0);
        let json = serde_json::to_value(&rec).unwrap();
        for key in ["signal", "confidence", "reasoning", "rsi", "macd", "bollingerBands"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["bollingerBands"]["upper"], 110.0);
        assert_eq!(json["macd"]["signal"], 0.0);
    }

    #[test]
    fn generator_keeps_configured_params() {
        let params = SignalParams {
            min_confidence: 60,
            ..SignalParams::default()
        };
        let generator = SignalGenerator::new(IndicatorParams::default(), params);
        assert_eq!(*generator.params(), params);
        assert_eq!(SignalGenerator::default().params().confidence_cap, 95);
    }
}
