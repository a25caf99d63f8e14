//! Technical indicator calculators.
//!
//! This module provides:
//! - One calculator per indicator family (SMA, EMA, RSI, MACD, Bollinger
//!   Bands, ATR, Stochastic, Ichimoku), each a pure function from a candle
//!   sequence and typed parameters to time-aligned output series
//! - `IndicatorKind` - closed sum type dispatching to the calculators
//! - `SeriesRole` / `SeriesSpec` - the series layout each indicator plots
//!
//! Common edge policy shared by every calculator: empty input or a
//! non-positive period yields empty output, a window that cannot be filled
//! is never partially computed, and degenerate windows produce the neutral
//! sentinel instead of NaN or infinity.

mod atr;
mod bollinger;
mod ema;
mod ichimoku;
mod macd;
mod rsi;
mod sma;
mod stochastic;

pub use atr::AtrParams;
pub use bollinger::{BollingerOutput, BollingerParams};
pub use ema::EmaParams;
pub use ichimoku::{IchimokuOutput, IchimokuParams};
pub use macd::{MacdOutput, MacdParams};
pub use rsi::{RsiOutput, RsiParams};
pub use sma::SmaParams;
pub use stochastic::{StochasticOutput, StochasticParams};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chart::base::{
    BAND_LINE_COLOR, BASE_LINE_COLOR, CONVERSION_LINE_COLOR, LAGGING_LINE_COLOR, MAIN_LINE_COLOR,
    PEN_WIDTH, REFERENCE_LINE_COLOR, REFERENCE_PEN_WIDTH, SIGNAL_LINE_COLOR, SPAN_A_COLOR,
    SPAN_B_COLOR, UP_COLOR,
};
use crate::chart::config::Parameters;
use crate::market::Candle;

/// Neutral level used as the sentinel for degenerate windows (RSI with no
/// movement, Stochastic with zero range) and as the RSI midline.
pub const NEUTRAL_LEVEL: f64 = 50.0;

/// One computed point of a plotted series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub time: DateTime<Utc>,
    pub value: f64,
    /// Per-bar color, set for histogram points only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl SeriesPoint {
    /// Create a line point
    pub fn new(time: DateTime<Utc>, value: f64) -> Self {
        Self {
            time,
            value,
            color: None,
        }
    }

    /// Create a histogram point carrying its own color
    pub fn colored(time: DateTime<Utc>, value: f64, color: impl Into<String>) -> Self {
        Self {
            time,
            value,
            color: Some(color.into()),
        }
    }
}

/// Rendering form of a plotted series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesKind {
    Line,
    Histogram,
}

/// Role of one plotted series within an indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesRole {
    Main,
    Signal,
    Histogram,
    Upper,
    Middle,
    Lower,
    PercentK,
    PercentD,
    Overbought,
    Oversold,
    Midline,
    Conversion,
    Base,
    SpanA,
    SpanB,
    Lagging,
}

impl SeriesRole {
    /// Title suffix for the series, empty for the main line
    pub fn label(&self) -> &'static str {
        match self {
            SeriesRole::Main => "",
            SeriesRole::Signal => "Signal",
            SeriesRole::Histogram => "Histogram",
            SeriesRole::Upper => "Upper",
            SeriesRole::Middle => "Middle",
            SeriesRole::Lower => "Lower",
            SeriesRole::PercentK => "%K",
            SeriesRole::PercentD => "%D",
            SeriesRole::Overbought => "Overbought",
            SeriesRole::Oversold => "Oversold",
            SeriesRole::Midline => "Midline",
            SeriesRole::Conversion => "Conversion",
            SeriesRole::Base => "Base",
            SeriesRole::SpanA => "Span A",
            SeriesRole::SpanB => "Span B",
            SeriesRole::Lagging => "Lagging",
        }
    }
}

/// Static description of one series an indicator plots
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSpec {
    pub role: SeriesRole,
    pub kind: SeriesKind,
    pub color: &'static str,
    pub line_width: f32,
}

impl SeriesSpec {
    const fn line(role: SeriesRole, color: &'static str, line_width: f32) -> Self {
        Self {
            role,
            kind: SeriesKind::Line,
            color,
            line_width,
        }
    }

    const fn histogram(role: SeriesRole, color: &'static str) -> Self {
        Self {
            role,
            kind: SeriesKind::Histogram,
            color,
            line_width: PEN_WIDTH,
        }
    }
}

/// Computed points for one series role
#[derive(Debug, Clone, PartialEq)]
pub struct RoleSeries {
    pub role: SeriesRole,
    pub points: Vec<SeriesPoint>,
}

impl RoleSeries {
    pub fn new(role: SeriesRole, points: Vec<SeriesPoint>) -> Self {
        Self { role, points }
    }
}

/// Full output of one indicator computation, one entry per layout series
pub type IndicatorOutput = Vec<RoleSeries>;

/// Indicator family enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndicatorType {
    Sma,
    Ema,
    Rsi,
    Macd,
    Bollinger,
    Atr,
    Stochastic,
    Ichimoku,
}

impl IndicatorType {
    /// All indicator types
    pub fn all() -> [IndicatorType; 8] {
        [
            IndicatorType::Sma,
            IndicatorType::Ema,
            IndicatorType::Rsi,
            IndicatorType::Macd,
            IndicatorType::Bollinger,
            IndicatorType::Atr,
            IndicatorType::Stochastic,
            IndicatorType::Ichimoku,
        ]
    }

    /// Canonical type name used in persisted configs
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorType::Sma => "SMA",
            IndicatorType::Ema => "EMA",
            IndicatorType::Rsi => "RSI",
            IndicatorType::Macd => "MACD",
            IndicatorType::Bollinger => "BOLLINGER",
            IndicatorType::Atr => "ATR",
            IndicatorType::Stochastic => "STOCHASTIC",
            IndicatorType::Ichimoku => "ICHIMOKU",
        }
    }

    /// Short label used when deriving display names
    pub fn display_name(&self) -> &'static str {
        match self {
            IndicatorType::Sma => "SMA",
            IndicatorType::Ema => "EMA",
            IndicatorType::Rsi => "RSI",
            IndicatorType::Macd => "MACD",
            IndicatorType::Bollinger => "BOLL",
            IndicatorType::Atr => "ATR",
            IndicatorType::Stochastic => "STOCH",
            IndicatorType::Ichimoku => "ICHIMOKU",
        }
    }

    /// Parse a type name, accepting legacy lowercase spellings and aliases.
    ///
    /// This is the only place an unknown type name can appear at runtime;
    /// everything past the factory boundary dispatches on the closed enum.
    pub fn parse(name: &str) -> Option<IndicatorType> {
        match name.to_ascii_lowercase().as_str() {
            "sma" | "ma" => Some(IndicatorType::Sma),
            "ema" => Some(IndicatorType::Ema),
            "rsi" => Some(IndicatorType::Rsi),
            "macd" => Some(IndicatorType::Macd),
            "bollinger" | "boll" | "bollingerbands" => Some(IndicatorType::Bollinger),
            "atr" => Some(IndicatorType::Atr),
            "stochastic" | "stoch" => Some(IndicatorType::Stochastic),
            "ichimoku" => Some(IndicatorType::Ichimoku),
            _ => None,
        }
    }
}

/// One indicator instance's typed calculator.
///
/// Each variant carries the parameter struct of its family; dispatch is an
/// exhaustive match, so adding a family extends every arm at compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorKind {
    Sma(SmaParams),
    Ema(EmaParams),
    Rsi(RsiParams),
    Macd(MacdParams),
    Bollinger(BollingerParams),
    Atr(AtrParams),
    Stochastic(StochasticParams),
    Ichimoku(IchimokuParams),
}

impl IndicatorKind {
    /// Build the typed calculator for a type from named parameters.
    ///
    /// Missing or malformed parameter values fall back to the family
    /// defaults; unknown parameters are ignored.
    pub fn from_config(indicator_type: IndicatorType, parameters: &Parameters) -> Self {
        match indicator_type {
            IndicatorType::Sma => IndicatorKind::Sma(SmaParams::from_parameters(parameters)),
            IndicatorType::Ema => IndicatorKind::Ema(EmaParams::from_parameters(parameters)),
            IndicatorType::Rsi => IndicatorKind::Rsi(RsiParams::from_parameters(parameters)),
            IndicatorType::Macd => IndicatorKind::Macd(MacdParams::from_parameters(parameters)),
            IndicatorType::Bollinger => {
                IndicatorKind::Bollinger(BollingerParams::from_parameters(parameters))
            }
            IndicatorType::Atr => IndicatorKind::Atr(AtrParams::from_parameters(parameters)),
            IndicatorType::Stochastic => {
                IndicatorKind::Stochastic(StochasticParams::from_parameters(parameters))
            }
            IndicatorType::Ichimoku => {
                IndicatorKind::Ichimoku(IchimokuParams::from_parameters(parameters))
            }
        }
    }

    /// The family of this calculator
    pub fn indicator_type(&self) -> IndicatorType {
        match self {
            IndicatorKind::Sma(_) => IndicatorType::Sma,
            IndicatorKind::Ema(_) => IndicatorType::Ema,
            IndicatorKind::Rsi(_) => IndicatorType::Rsi,
            IndicatorKind::Macd(_) => IndicatorType::Macd,
            IndicatorKind::Bollinger(_) => IndicatorType::Bollinger,
            IndicatorKind::Atr(_) => IndicatorType::Atr,
            IndicatorKind::Stochastic(_) => IndicatorType::Stochastic,
            IndicatorKind::Ichimoku(_) => IndicatorType::Ichimoku,
        }
    }

    /// The series this indicator plots, in the order `compute` emits them
    pub fn layout(&self) -> Vec<SeriesSpec> {
        match self {
            IndicatorKind::Sma(_) | IndicatorKind::Ema(_) | IndicatorKind::Atr(_) => {
                vec![SeriesSpec::line(SeriesRole::Main, MAIN_LINE_COLOR, PEN_WIDTH)]
            }
            IndicatorKind::Rsi(_) => vec![
                SeriesSpec::line(SeriesRole::Main, MAIN_LINE_COLOR, PEN_WIDTH),
                SeriesSpec::line(
                    SeriesRole::Overbought,
                    REFERENCE_LINE_COLOR,
                    REFERENCE_PEN_WIDTH,
                ),
                SeriesSpec::line(
                    SeriesRole::Oversold,
                    REFERENCE_LINE_COLOR,
                    REFERENCE_PEN_WIDTH,
                ),
                SeriesSpec::line(
                    SeriesRole::Midline,
                    REFERENCE_LINE_COLOR,
                    REFERENCE_PEN_WIDTH,
                ),
            ],
            IndicatorKind::Macd(_) => vec![
                SeriesSpec::line(SeriesRole::Main, MAIN_LINE_COLOR, PEN_WIDTH),
                SeriesSpec::line(SeriesRole::Signal, SIGNAL_LINE_COLOR, PEN_WIDTH),
                SeriesSpec::histogram(SeriesRole::Histogram, UP_COLOR),
            ],
            IndicatorKind::Bollinger(_) => vec![
                SeriesSpec::line(SeriesRole::Upper, BAND_LINE_COLOR, REFERENCE_PEN_WIDTH),
                SeriesSpec::line(SeriesRole::Middle, MAIN_LINE_COLOR, PEN_WIDTH),
                SeriesSpec::line(SeriesRole::Lower, BAND_LINE_COLOR, REFERENCE_PEN_WIDTH),
            ],
            IndicatorKind::Stochastic(_) => vec![
                SeriesSpec::line(SeriesRole::PercentK, MAIN_LINE_COLOR, PEN_WIDTH),
                SeriesSpec::line(SeriesRole::PercentD, SIGNAL_LINE_COLOR, PEN_WIDTH),
                SeriesSpec::line(
                    SeriesRole::Overbought,
                    REFERENCE_LINE_COLOR,
                    REFERENCE_PEN_WIDTH,
                ),
                SeriesSpec::line(
                    SeriesRole::Oversold,
                    REFERENCE_LINE_COLOR,
                    REFERENCE_PEN_WIDTH,
                ),
            ],
            IndicatorKind::Ichimoku(_) => vec![
                SeriesSpec::line(SeriesRole::Conversion, CONVERSION_LINE_COLOR, PEN_WIDTH),
                SeriesSpec::line(SeriesRole::Base, BASE_LINE_COLOR, PEN_WIDTH),
                SeriesSpec::line(SeriesRole::SpanA, SPAN_A_COLOR, REFERENCE_PEN_WIDTH),
                SeriesSpec::line(SeriesRole::SpanB, SPAN_B_COLOR, REFERENCE_PEN_WIDTH),
                SeriesSpec::line(SeriesRole::Lagging, LAGGING_LINE_COLOR, PEN_WIDTH),
            ],
        }
    }

    /// Compute all output series for the full candle history.
    ///
    /// Output entries match `layout()` one to one, in the same order.
    pub fn compute(&self, candles: &[Candle]) -> IndicatorOutput {
        match self {
            IndicatorKind::Sma(params) => vec![RoleSeries::new(
                SeriesRole::Main,
                sma::calculate(candles, params),
            )],
            IndicatorKind::Ema(params) => vec![RoleSeries::new(
                SeriesRole::Main,
                ema::calculate(candles, params),
            )],
            IndicatorKind::Rsi(params) => {
                let output = rsi::calculate(candles, params);
                vec![
                    RoleSeries::new(SeriesRole::Main, output.rsi),
                    RoleSeries::new(SeriesRole::Overbought, output.overbought),
                    RoleSeries::new(SeriesRole::Oversold, output.oversold),
                    RoleSeries::new(SeriesRole::Midline, output.midline),
                ]
            }
            IndicatorKind::Macd(params) => {
                let output = macd::calculate(candles, params);
                vec![
                    RoleSeries::new(SeriesRole::Main, output.macd),
                    RoleSeries::new(SeriesRole::Signal, output.signal),
                    RoleSeries::new(SeriesRole::Histogram, output.histogram),
                ]
            }
            IndicatorKind::Bollinger(params) => {
                let output = bollinger::calculate(candles, params);
                vec![
                    RoleSeries::new(SeriesRole::Upper, output.upper),
                    RoleSeries::new(SeriesRole::Middle, output.middle),
                    RoleSeries::new(SeriesRole::Lower, output.lower),
                ]
            }
            IndicatorKind::Atr(params) => vec![RoleSeries::new(
                SeriesRole::Main,
                atr::calculate(candles, params),
            )],
            IndicatorKind::Stochastic(params) => {
                let output = stochastic::calculate(candles, params);
                vec![
                    RoleSeries::new(SeriesRole::PercentK, output.percent_k),
                    RoleSeries::new(SeriesRole::PercentD, output.percent_d),
                    RoleSeries::new(SeriesRole::Overbought, output.overbought),
                    RoleSeries::new(SeriesRole::Oversold, output.oversold),
                ]
            }
            IndicatorKind::Ichimoku(params) => {
                let output = ichimoku::calculate(candles, params);
                vec![
                    RoleSeries::new(SeriesRole::Conversion, output.conversion),
                    RoleSeries::new(SeriesRole::Base, output.base),
                    RoleSeries::new(SeriesRole::SpanA, output.span_a),
                    RoleSeries::new(SeriesRole::SpanB, output.span_b),
                    RoleSeries::new(SeriesRole::Lagging, output.lagging),
                ]
            }
        }
    }

    /// Default display name derived from type and key parameters
    pub fn default_label(&self) -> String {
        let display = self.indicator_type().display_name();
        match self {
            IndicatorKind::Sma(p) => format!("{} {}", display, p.period),
            IndicatorKind::Ema(p) => format!("{} {}", display, p.period),
            IndicatorKind::Rsi(p) => format!("{} {}", display, p.period),
            IndicatorKind::Macd(p) => format!(
                "{} {},{},{}",
                display, p.fast_period, p.slow_period, p.signal_period
            ),
            IndicatorKind::Bollinger(p) => format!("{} {},{}", display, p.period, p.std_dev),
            IndicatorKind::Atr(p) => format!("{} {}", display, p.period),
            IndicatorKind::Stochastic(p) => {
                format!("{} {},{}", display, p.k_period, p.d_period)
            }
            IndicatorKind::Ichimoku(p) => format!(
                "{} {},{},{}",
                display, p.conversion_period, p.base_period, p.span_period
            ),
        }
    }
}

/// Zip candle times with a NaN-padded value array, skipping unfilled windows
pub(crate) fn collect_points(candles: &[Candle], values: &[f64]) -> Vec<SeriesPoint> {
    candles
        .iter()
        .zip(values.iter())
        .filter(|(_, value)| value.is_finite())
        .map(|(candle, value)| SeriesPoint::new(candle.datetime, *value))
        .collect()
}

/// Constant reference line aligned to an already-computed series
pub(crate) fn constant_points(aligned: &[SeriesPoint], level: f64) -> Vec<SeriesPoint> {
    aligned
        .iter()
        .map(|point| SeriesPoint::new(point.time, level))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_type_parse() {
        assert_eq!(IndicatorType::parse("sma"), Some(IndicatorType::Sma));
        assert_eq!(IndicatorType::parse("SMA"), Some(IndicatorType::Sma));
        assert_eq!(IndicatorType::parse("boll"), Some(IndicatorType::Bollinger));
        assert_eq!(
            IndicatorType::parse("stoch"),
            Some(IndicatorType::Stochastic)
        );
        assert_eq!(IndicatorType::parse("unknown"), None);
    }

    #[test]
    fn test_layout_matches_compute_roles() {
        let candles = test_support::candles_from_closes(&(1..=60).map(f64::from).collect::<Vec<_>>());

        for indicator_type in IndicatorType::all() {
            let kind = IndicatorKind::from_config(indicator_type, &Parameters::new());
            let layout = kind.layout();
            let output = kind.compute(&candles);

            assert_eq!(layout.len(), output.len(), "{:?}", indicator_type);
            for (spec, series) in layout.iter().zip(output.iter()) {
                assert_eq!(spec.role, series.role, "{:?}", indicator_type);
            }
        }
    }

    #[test]
    fn test_default_labels() {
        let kind = IndicatorKind::from_config(IndicatorType::Ema, &Parameters::new());
        assert_eq!(kind.default_label(), "EMA 20");

        let kind = IndicatorKind::from_config(IndicatorType::Macd, &Parameters::new());
        assert_eq!(kind.default_label(), "MACD 12,26,9");

        let kind = IndicatorKind::from_config(IndicatorType::Bollinger, &Parameters::new());
        assert_eq!(kind.default_label(), "BOLL 20,2");
    }

    #[test]
    fn test_type_serde_round_trip() {
        let json = serde_json::to_string(&IndicatorType::Stochastic).unwrap();
        assert_eq!(json, "\"STOCHASTIC\"");

        let parsed: IndicatorType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, IndicatorType::Stochastic);
    }
}
