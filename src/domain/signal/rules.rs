//! Signal rules.
//!
//! Each rule looks at one indicator and either stays silent or emits a
//! `RuleOutcome`. Outcomes are folded in rule order: the last direction wins,
//! confidence deltas add up, and every reason is kept.

use crate::domain::indicator::IndicatorSnapshot;
use crate::domain::signal::Signal;

pub const RSI_DELTA: u32 = 20;
pub const MACD_DELTA: u32 = 15;
pub const BOLLINGER_DELTA: u32 = 10;

pub const RSI_OVERSOLD: &str = "RSI oversold";
pub const RSI_OVERBOUGHT: &str = "RSI overbought";
pub const MACD_RISING: &str = "MACD positive and rising";
pub const MACD_FALLING: &str = "MACD negative and falling";
pub const BELOW_LOWER_BAND: &str = "price below lower band";
pub const ABOVE_UPPER_BAND: &str = "price above upper band";

/// What a rule sees.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub snapshot: &'a IndicatorSnapshot,
    pub current_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleOutcome {
    pub direction: Signal,
    pub confidence_delta: u32,
    pub reason: &'static str,
}

pub trait SignalRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<RuleOutcome>;
}

#[derive(Debug, Clone, Copy)]
pub struct RsiRule {
    pub oversold: f64,
    pub overbought: f64,
}

impl SignalRule for RsiRule {
    fn name(&self) -> &'static str {
        "rsi"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<RuleOutcome> {
        let rsi = ctx.snapshot.rsi;
        if rsi < self.oversold {
            Some(RuleOutcome {
                direction: Signal::Buy,
                confidence_delta: RSI_DELTA,
                reason: RSI_OVERSOLD,
            })
        } else if rsi > self.overbought {
            Some(RuleOutcome {
                direction: Signal::Sell,
                confidence_delta: RSI_DELTA,
                reason: RSI_OVERBOUGHT,
            })
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MacdRule;

impl SignalRule for MacdRule {
    fn name(&self) -> &'static str {
        "macd"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<RuleOutcome> {
        let macd = &ctx.snapshot.macd;
        if macd.histogram > 0.0 && macd.macd > 0.0 {
            Some(RuleOutcome {
                direction: Signal::Buy,
                confidence_delta: MACD_DELTA,
                reason: MACD_RISING,
            })
        } else if macd.histogram < 0.0 && macd.macd < 0.0 {
            Some(RuleOutcome {
                direction: Signal::Sell,
                confidence_delta: MACD_DELTA,
                reason: MACD_FALLING,
            })
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BollingerRule;

impl SignalRule for BollingerRule {
    fn name(&self) -> &'static str {
        "bollinger"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<RuleOutcome> {
        let bands = &ctx.snapshot.bollinger_bands;
        if ctx.current_price < bands.lower {
            Some(RuleOutcome {
                direction: Signal::Buy,
                confidence_delta: BOLLINGER_DELTA,
                reason: BELOW_LOWER_BAND,
            })
        } else if ctx.current_price > bands.upper {
            Some(RuleOutcome {
                direction: Signal::Sell,
                confidence_delta: BOLLINGER_DELTA,
                reason: ABOVE_UPPER_BAND,
            })
        } else {
            None
        }
    }
}

/// RSI, then MACD, then Bollinger.
pub fn default_rules(oversold: f64, overbought: f64) -> Vec<Box<dyn SignalRule>> {
    vec![
        Box::new(RsiRule {
            oversold,
            overbought,
        }),
        Box::new(MacdRule),
        Box::new(BollingerRule),
    ]
}

/// Running state of the rule fold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    pub signal: Signal,
    pub confidence: u32,
    pub reasons: Vec<&'static str>,
}

impl Tally {
    pub fn new(base_confidence: u32) -> Self {
        Self {
            signal: Signal::Hold,
            confidence: base_confidence,
            reasons: Vec::new(),
        }
    }

    pub fn apply(mut self, outcome: RuleOutcome) -> Self {
        self.signal = outcome.direction;
        self.confidence += outcome.confidence_delta;
        self.reasons.push(outcome.reason);
        self
    }
}

pub fn fold_outcomes<I>(base_confidence: u32, outcomes: I) -> Tally
where
    I: IntoIterator<Item = RuleOutcome>,
{
    outcomes
        .into_iter()
        .fold(Tally::new(base_confidence), Tally::apply)
}
