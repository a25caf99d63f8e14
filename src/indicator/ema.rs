//! Exponential Moving Average (EMA) indicator

use crate::chart::config::Parameters;
use crate::market::Candle;

use super::{collect_points, SeriesPoint};

/// Exponential Moving Average parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmaParams {
    /// Number of periods for the moving average
    pub period: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl EmaParams {
    /// Read parameters from a named parameter set, falling back to defaults
    pub fn from_parameters(parameters: &Parameters) -> Self {
        let defaults = Self::default();
        Self {
            period: parameters.get_period("period").unwrap_or(defaults.period),
        }
    }
}

/// Exponential moving average over a value slice.
///
/// Seeded with the SMA of the first `period` values; thereafter
/// `ema[i] = value[i] * k + ema[i-1] * (1 - k)` with `k = 2 / (period + 1)`.
/// Returns a vector the same length as the input with `f64::NAN` before the
/// seed index.
pub(crate) fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let len = values.len();
    let mut result = vec![f64::NAN; len];

    if period == 0 || len < period {
        return result;
    }

    let seed: f64 = values[..period].iter().sum::<f64>() / period as f64;
    result[period - 1] = seed;

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = seed;

    for i in period..len {
        ema = values[i] * k + ema * (1.0 - k);
        result[i] = ema;
    }

    result
}

/// Calculate the EMA of close prices.
///
/// The first output point corresponds to the candle at index `period - 1`.
pub fn calculate(candles: &[Candle], params: &EmaParams) -> Vec<SeriesPoint> {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    collect_points(candles, &ema_series(&closes, params.period))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::test_support::candles_from_closes;

    #[test]
    fn test_ema_seed_is_sma() {
        let candles = candles_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let result = calculate(&candles, &EmaParams { period: 3 });

        assert_eq!(result.len(), 3);
        assert!((result[0].value - 2.0).abs() < 1e-10); // SMA(1,2,3)
        assert_eq!(result[0].time, candles[2].datetime);
    }

    #[test]
    fn test_ema_recursion() {
        let candles = candles_from_closes(&[1.0, 2.0, 3.0, 4.0]);
        let result = calculate(&candles, &EmaParams { period: 3 });

        // k = 0.5, seed = 2.0, next = 4*0.5 + 2*0.5 = 3.0
        assert!((result[1].value - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_ema_constant_input() {
        let candles = candles_from_closes(&[7.5; 12]);
        let result = calculate(&candles, &EmaParams { period: 4 });

        assert_eq!(result.len(), 9);
        for point in &result {
            assert!((point.value - 7.5).abs() < 1e-10);
        }
    }

    #[test]
    fn test_ema_insufficient_data() {
        let candles = candles_from_closes(&[1.0, 2.0]);
        let result = calculate(&candles, &EmaParams { period: 3 });
        assert!(result.is_empty());
    }

    #[test]
    fn test_ema_exact_window() {
        let candles = candles_from_closes(&[2.0, 4.0, 6.0]);
        let result = calculate(&candles, &EmaParams { period: 3 });

        assert_eq!(result.len(), 1);
        assert!((result[0].value - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_ema_period_zero() {
        let candles = candles_from_closes(&[1.0, 2.0, 3.0]);
        let result = calculate(&candles, &EmaParams { period: 0 });
        assert!(result.is_empty());
    }
}
