//! Settings loading and validation.
//!
//! Reads every section through `ConfigPort`, falls back to defaults for
//! missing keys and rejects values the engine cannot use.

use std::path::PathBuf;

use crate::domain::analysis_history::DEFAULT_HISTORY_LIMIT;
use crate::domain::error::SignaldeskError;
use crate::domain::indicator::IndicatorParams;
use crate::domain::signal::SignalParams;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq)]
pub struct MarketDataSettings {
    pub csv_dir: Option<PathBuf>,
    pub pairs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub bind: String,
    pub history_limit: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub indicators: IndicatorParams,
    pub signal: SignalParams,
    pub market_data: MarketDataSettings,
    pub server: ServerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            indicators: IndicatorParams::default(),
            signal: SignalParams::default(),
            market_data: MarketDataSettings {
                csv_dir: None,
                pairs: Vec::new(),
            },
            server: ServerSettings {
                bind: DEFAULT_BIND.to_string(),
                history_limit: DEFAULT_HISTORY_LIMIT,
            },
        }
    }
}

impl Settings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SignaldeskError> {
        Ok(Self {
            indicators: load_indicator_params(config)?,
            signal: load_signal_params(config)?,
            market_data: MarketDataSettings {
                csv_dir: config.get_string("market_data", "csv_dir").map(PathBuf::from),
                pairs: config.get_list("market_data", "pairs"),
            },
            server: ServerSettings {
                bind: config
                    .get_string("server", "bind")
                    .unwrap_or_else(|| DEFAULT_BIND.to_string()),
                history_limit: positive(config, "server", "history_limit", DEFAULT_HISTORY_LIMIT)?,
            },
        })
    }
}

pub fn load_indicator_params(config: &dyn ConfigPort) -> Result<IndicatorParams, SignaldeskError> {
    let d = IndicatorParams::default();
    let params = IndicatorParams {
        rsi_period: positive(config, "indicators", "rsi_period", d.rsi_period)?,
        macd_fast: positive(config, "indicators", "macd_fast", d.macd_fast)?,
        macd_slow: positive(config, "indicators", "macd_slow", d.macd_slow)?,
        macd_signal: positive(config, "indicators", "macd_signal", d.macd_signal)?,
        bollinger_period: positive(config, "indicators", "bollinger_period", d.bollinger_period)?,
        bollinger_stddev: config.get_double("indicators", "bollinger_stddev", d.bollinger_stddev),
    };

    if params.macd_fast >= params.macd_slow {
        return Err(invalid(
            "indicators",
            "macd_fast",
            "macd_fast must be less than macd_slow",
        ));
    }
    if !(params.bollinger_stddev > 0.0 && params.bollinger_stddev.is_finite()) {
        return Err(invalid(
            "indicators",
            "bollinger_stddev",
            "bollinger_stddev must be positive",
        ));
    }
    Ok(params)
}

pub fn load_signal_params(config: &dyn ConfigPort) -> Result<SignalParams, SignaldeskError> {
    let d = SignalParams::default();
    let oversold = config.get_double("signal", "rsi_oversold", d.rsi_oversold);
    let overbought = config.get_double("signal", "rsi_overbought", d.rsi_overbought);

    for (key, value) in [("rsi_oversold", oversold), ("rsi_overbought", overbought)] {
        if !(0.0..=100.0).contains(&value) {
            return Err(invalid("signal", key, "must be between 0 and 100"));
        }
    }
    if oversold >= overbought {
        return Err(invalid(
            "signal",
            "rsi_oversold",
            "rsi_oversold must be below rsi_overbought",
        ));
    }

    let confidence_cap = percent(config, "confidence_cap", d.confidence_cap)?;
    let min_confidence = percent(config, "min_confidence", d.min_confidence)?;

    Ok(SignalParams {
        rsi_oversold: oversold,
        rsi_overbought: overbought,
        confidence_cap,
        min_confidence,
    })
}

fn positive(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, SignaldeskError> {
    let value = config.get_int(section, key, default as i64);
    if value <= 0 {
        return Err(invalid(section, key, &format!("{} must be positive", key)));
    }
    Ok(value as usize)
}

fn percent(config: &dyn ConfigPort, key: &str, default: u32) -> Result<u32, SignaldeskError> {
    let value = config.get_int("signal", key, default as i64);
    if !(0..=100).contains(&value) {
        return Err(invalid("signal", key, &format!("{} must be between 0 and 100", key)));
    }
    Ok(value as u32)
}

fn invalid(section: &str, key: &str, reason: &str) -> SignaldeskError {
    SignaldeskError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
