//! Bollinger Bands indicator

use crate::chart::config::Parameters;
use crate::market::Candle;

use super::sma::sma_series;
use super::SeriesPoint;

/// Bollinger Bands parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerParams {
    /// Number of periods for the middle SMA and the deviation window
    pub period: usize,
    /// Standard deviation multiplier for the band width
    pub std_dev: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev: 2.0,
        }
    }
}

impl BollingerParams {
    /// Read parameters from a named parameter set, falling back to defaults
    pub fn from_parameters(parameters: &Parameters) -> Self {
        let defaults = Self::default();
        Self {
            period: parameters.get_period("period").unwrap_or(defaults.period),
            std_dev: parameters.get_float("stdDev").unwrap_or(defaults.std_dev),
        }
    }
}

/// Bollinger Bands output: three parallel series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BollingerOutput {
    pub upper: Vec<SeriesPoint>,
    pub middle: Vec<SeriesPoint>,
    pub lower: Vec<SeriesPoint>,
}

/// Calculate Bollinger Bands over close prices.
///
/// Middle band is the SMA; upper and lower bands offset it by `std_dev`
/// population standard deviations of the same window.
pub fn calculate(candles: &[Candle], params: &BollingerParams) -> BollingerOutput {
    let period = params.period;
    let len = candles.len();

    if period == 0 || len < period {
        return BollingerOutput::default();
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let means = sma_series(&closes, period);

    let count = len - period + 1;
    let mut upper = Vec::with_capacity(count);
    let mut middle = Vec::with_capacity(count);
    let mut lower = Vec::with_capacity(count);

    for i in (period - 1)..len {
        let mean = means[i];
        let window = &closes[i + 1 - period..=i];
        let variance =
            window.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / period as f64;
        let deviation = params.std_dev * variance.sqrt();

        let time = candles[i].datetime;
        upper.push(SeriesPoint::new(time, mean + deviation));
        middle.push(SeriesPoint::new(time, mean));
        lower.push(SeriesPoint::new(time, mean - deviation));
    }

    BollingerOutput {
        upper,
        middle,
        lower,
    }
}
