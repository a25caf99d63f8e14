//! Simple Moving Average (SMA) indicator

use crate::chart::config::Parameters;
use crate::market::Candle;

use super::{collect_points, SeriesPoint};

/// Simple Moving Average parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmaParams {
    /// Number of periods for the moving average
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl SmaParams {
    /// Read parameters from a named parameter set, falling back to defaults
    pub fn from_parameters(parameters: &Parameters) -> Self {
        let defaults = Self::default();
        Self {
            period: parameters.get_period("period").unwrap_or(defaults.period),
        }
    }
}

/// Rolling arithmetic mean over a value slice.
///
/// Returns a vector the same length as the input with `f64::NAN` before the
/// first fully-covered window.
pub(crate) fn sma_series(values: &[f64], period: usize) -> Vec<f64> {
    let len = values.len();
    let mut result = vec![f64::NAN; len];

    if period == 0 || len < period {
        return result;
    }

    let mut sum: f64 = values[..period].iter().sum();
    result[period - 1] = sum / period as f64;

    for i in period..len {
        sum += values[i] - values[i - period];
        result[i] = sum / period as f64;
    }

    result
}

/// Calculate the SMA of close prices.
///
/// The first output point corresponds to the candle at index `period - 1`.
pub fn calculate(candles: &[Candle], params: &SmaParams) -> Vec<SeriesPoint> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    collect_points(candles, &sma_series(&closes, params.period))
}
