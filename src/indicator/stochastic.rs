//! Stochastic oscillator indicator

use crate::chart::config::Parameters;
use crate::market::Candle;

use super::sma::sma_series;
use super::{constant_points, SeriesPoint, NEUTRAL_LEVEL};

/// Stochastic oscillator parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochasticParams {
    /// Lookback window for %K
    pub k_period: usize,
    /// SMA window for %D
    pub d_period: usize,
    /// Overbought reference level
    pub overbought_level: f64,
    /// Oversold reference level
    pub oversold_level: f64,
}

impl Default for StochasticParams {
    fn default() -> Self {
        Self {
            k_period: 14,
            d_period: 3,
            overbought_level: 80.0,
            oversold_level: 20.0,
        }
    }
}

impl StochasticParams {
    /// Read parameters from a named parameter set, falling back to defaults
    pub fn from_parameters(parameters: &Parameters) -> Self {
        let defaults = Self::default();
        Self {
            k_period: parameters
                .get_period("kPeriod")
                .unwrap_or(defaults.k_period),
            d_period: parameters
                .get_period("dPeriod")
                .unwrap_or(defaults.d_period),
            overbought_level: parameters
                .get_float("overboughtLevel")
                .unwrap_or(defaults.overbought_level),
            oversold_level: parameters
                .get_float("oversoldLevel")
                .unwrap_or(defaults.oversold_level),
        }
    }
}

/// Stochastic output: %K, %D and the constant reference lines aligned
/// to %K.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StochasticOutput {
    pub percent_k: Vec<SeriesPoint>,
    pub percent_d: Vec<SeriesPoint>,
    pub overbought: Vec<SeriesPoint>,
    pub oversold: Vec<SeriesPoint>,
}

/// Calculate the Stochastic oscillator.
///
/// `%K = 100 * (close - lowest_low) / (highest_high - lowest_low)` over the
/// %K window; a zero-range window maps to the neutral sentinel. `%D` is the
/// SMA of %K over the %D window.
pub fn calculate(candles: &[Candle], params: &StochasticParams) -> StochasticOutput {
    let k_period = params.k_period;
    let len = candles.len();

    if k_period == 0 || len < k_period {
        return StochasticOutput::default();
    }

    let mut k_values = vec![f64::NAN; len];
    for i in (k_period - 1)..len {
        let window = &candles[i + 1 - k_period..=i];
        let highest = window.iter().map(|c| c.high).fold(f64::MIN, f64::max);
        let lowest = window.iter().map(|c| c.low).fold(f64::MAX, f64::min);
        let range = highest - lowest;

        k_values[i] = if range <= 0.0 {
            NEUTRAL_LEVEL
        } else {
            100.0 * (candles[i].close - lowest) / range
        };
    }

    let start = k_period - 1;
    let percent_k: Vec<SeriesPoint> = (start..len)
        .map(|i| SeriesPoint::new(candles[i].datetime, k_values[i]))
        .collect();

    let d_values = sma_series(&k_values[start..], params.d_period);
    let percent_d: Vec<SeriesPoint> = d_values
        .iter()
        .enumerate()
        .filter(|(_, value)| value.is_finite())
        .map(|(offset, value)| SeriesPoint::new(candles[start + offset].datetime, *value))
        .collect();

    let overbought = constant_points(&percent_k, params.overbought_level);
    let oversold = constant_points(&percent_k, params.oversold_level);

    StochasticOutput {
        percent_k,
        percent_d,
        overbought,
        oversold,
    }
}
