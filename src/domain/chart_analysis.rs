//! Validated chart analysis records.
//!
//! Chart analyses arrive as loosely shaped JSON written by a vision model (or
//! posted by a client). Nothing untyped leaves this module: every field is
//! checked, clamped or defaulted into a `ChartAnalysis`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::signal::Signal;

pub const DEFAULT_CONFIDENCE: u8 = 50;
pub const DEFAULT_PATTERN: &str = "Chart pattern analysis";
pub const FALLBACK_PATTERN: &str = "Chart analysis";
pub const DEFAULT_PAIR: &str = "Uploaded chart analysis";
pub const DEFAULT_PRICE: &str = "0.0000";
pub const DEFAULT_RISK_PCT: f64 = 2.0;
pub const DEFAULT_REWARD_PCT: f64 = 5.0;
pub const DEFAULT_ANALYSIS: &str = "Full analysis available";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndicatorStatus {
    Bullish,
    Bearish,
    Neutral,
}

impl IndicatorStatus {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "BULLISH" => Some(Self::Bullish),
            "BEARISH" => Some(Self::Bearish),
            "NEUTRAL" => Some(Self::Neutral),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnicalIndicator {
    pub name: String,
    pub status: IndicatorStatus,
    pub strength: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl TechnicalIndicator {
    fn neutral(name: &str, value: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            status: IndicatorStatus::Neutral,
            strength: DEFAULT_CONFIDENCE,
            value: value.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartAnalysis {
    pub signal: Signal,
    pub confidence: u8,
    pub pattern: String,
    pub pair: String,
    pub timeframe: String,
    pub entry_price: String,
    pub stop_loss: String,
    pub take_profit: String,
    pub risk_percentage: f64,
    pub reward_percentage: f64,
    pub technical_indicators: Vec<TechnicalIndicator>,
    pub analysis: String,
    pub ai_generated: bool,
    pub timestamp: DateTime<Utc>,
}

impl ChartAnalysis {
    /// Coerce raw model output. Text that holds no JSON becomes a HOLD record
    /// carrying the text itself as the analysis.
    pub fn from_model_output(text: &str, timeframe: &str, now: DateTime<Utc>) -> Self {
        match extract_json(text) {
            Some(value) => {
                let mut analysis = Self::from_value(&value, timeframe, now);
                analysis.timeframe = timeframe.to_string();
                analysis.ai_generated = true;
                analysis
            }
            None => {
                tracing::warn!(len = text.len(), "model output is not JSON, keeping raw text");
                Self {
                    signal: Signal::Hold,
                    confidence: DEFAULT_CONFIDENCE,
                    pattern: FALLBACK_PATTERN.to_string(),
                    pair: DEFAULT_PAIR.to_string(),
                    timeframe: timeframe.to_string(),
                    entry_price: DEFAULT_PRICE.to_string(),
                    stop_loss: DEFAULT_PRICE.to_string(),
                    take_profit: DEFAULT_PRICE.to_string(),
                    risk_percentage: DEFAULT_RISK_PCT,
                    reward_percentage: DEFAULT_REWARD_PCT,
                    technical_indicators: Vec::new(),
                    analysis: text.to_string(),
                    ai_generated: true,
                    timestamp: now,
                }
            }
        }
    }

    /// Coerce an already parsed JSON value. Non-object values yield all defaults.
    pub fn from_value(value: &Value, timeframe: &str, now: DateTime<Utc>) -> Self {
        let empty = Map::new();
        let obj = value.as_object().unwrap_or(&empty);

        let signal = obj
            .get("signal")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<Signal>().ok())
            .unwrap_or(Signal::Hold);

        let confidence = number_field(obj, "confidence")
            .filter(|c| *c != 0.0)
            .map(|c| c.clamp(0.0, 100.0).round() as u8)
            .unwrap_or(DEFAULT_CONFIDENCE);

        let timeframe = string_field(obj, "timeframe").unwrap_or_else(|| timeframe.to_string());

        Self {
            signal,
            confidence,
            pattern: string_field(obj, "pattern").unwrap_or_else(|| DEFAULT_PATTERN.to_string()),
            pair: string_field(obj, "pair").unwrap_or_else(|| DEFAULT_PAIR.to_string()),
            timeframe,
            entry_price: price_field(obj, "entryPrice"),
            stop_loss: price_field(obj, "stopLoss"),
            take_profit: price_field(obj, "takeProfit"),
            risk_percentage: number_field(obj, "riskPercentage")
                .filter(|v| *v != 0.0)
                .unwrap_or(DEFAULT_RISK_PCT),
            reward_percentage: number_field(obj, "rewardPercentage")
                .filter(|v| *v != 0.0)
                .unwrap_or(DEFAULT_REWARD_PCT),
            technical_indicators: indicators_field(obj),
            analysis: string_field(obj, "analysis").unwrap_or_else(|| DEFAULT_ANALYSIS.to_string()),
            ai_generated: obj
                .get("aiGenerated")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            timestamp: now,
        }
    }
}

/// Parse the text as JSON, falling back to a fenced block or the outermost
/// `{...}` span.
fn extract_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&trimmed[start..=end]).ok()
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn number_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

fn price_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => DEFAULT_PRICE.to_string(),
    }
}

fn indicators_field(obj: &Map<String, Value>) -> Vec<TechnicalIndicator> {
    let Some(items) = obj.get("technicalIndicators").and_then(Value::as_array) else {
        return vec![
            TechnicalIndicator::neutral("RSI", Some("50")),
            TechnicalIndicator::neutral("MACD", None),
            TechnicalIndicator::neutral("Bollinger Bands", None),
        ];
    };

    items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|item| {
            let name = string_field(item, "name")?;
            let status = item
                .get("status")
                .and_then(Value::as_str)
                .and_then(IndicatorStatus::parse)
                .unwrap_or(IndicatorStatus::Neutral);
            let strength = number_field(item, "strength")
                .map(|s| s.clamp(0.0, 100.0).round() as u8)
                .unwrap_or(DEFAULT_CONFIDENCE);
            let value = match item.get("value") {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            };
            Some(TechnicalIndicator {
                name,
                status,
                strength,
                value,
            })
        })
        .collect()
}
