//! MACD (Moving Average Convergence Divergence) indicator

use crate::chart::base::{DOWN_COLOR, UP_COLOR};
use crate::chart::config::Parameters;
use crate::market::Candle;

use super::ema::ema_series;
use super::{collect_points, SeriesPoint};

/// MACD parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacdParams {
    /// Fast EMA period
    pub fast_period: usize,
    /// Slow EMA period
    pub slow_period: usize,
    /// Signal line EMA period
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl MacdParams {
    /// Read parameters from a named parameter set, falling back to defaults
    pub fn from_parameters(parameters: &Parameters) -> Self {
        let defaults = Self::default();
        Self {
            fast_period: parameters
                .get_period("fastPeriod")
                .unwrap_or(defaults.fast_period),
            slow_period: parameters
                .get_period("slowPeriod")
                .unwrap_or(defaults.slow_period),
            signal_period: parameters
                .get_period("signalPeriod")
                .unwrap_or(defaults.signal_period),
        }
    }
}

/// MACD output containing the MACD line, signal line, and histogram.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdOutput {
    /// MACD line (fast EMA - slow EMA)
    pub macd: Vec<SeriesPoint>,
    /// Signal line (EMA of the MACD line)
    pub signal: Vec<SeriesPoint>,
    /// Histogram (MACD - signal), each point tagged with its bar color
    pub histogram: Vec<SeriesPoint>,
}

/// Calculate MACD over close prices.
///
/// The MACD line starts where both EMAs are seeded; the signal line and
/// histogram start `signal_period - 1` points into the MACD line.
pub fn calculate(candles: &[Candle], params: &MacdParams) -> MacdOutput {
    let len = candles.len();

    if params.fast_period == 0 || params.slow_period == 0 || params.signal_period == 0 || len == 0
    {
        return MacdOutput::default();
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let fast = ema_series(&closes, params.fast_period);
    let slow = ema_series(&closes, params.slow_period);

    let mut macd_line = vec![f64::NAN; len];
    for i in 0..len {
        if fast[i].is_finite() && slow[i].is_finite() {
            macd_line[i] = fast[i] - slow[i];
        }
    }

    let Some(start) = macd_line.iter().position(|v| v.is_finite()) else {
        return MacdOutput::default();
    };

    let macd = collect_points(candles, &macd_line);

    let signal_values = ema_series(&macd_line[start..], params.signal_period);
    let mut signal = Vec::new();
    let mut histogram = Vec::new();

    for (offset, value) in signal_values.iter().enumerate() {
        if !value.is_finite() {
            continue;
        }
        let i = start + offset;
        signal.push(SeriesPoint::new(candles[i].datetime, *value));

        let bar = macd_line[i] - value;
        let color = if bar >= 0.0 { UP_COLOR } else { DOWN_COLOR };
        histogram.push(SeriesPoint::colored(candles[i].datetime, bar, color));
    }

    MacdOutput {
        macd,
        signal,
        histogram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::test_support::candles_from_closes;
    use approx::assert_relative_eq;

    #[test]
    fn test_macd_uptrend_is_positive() {
        let closes: Vec<f64> = (1..=60).map(|i| i as f64).collect();
        let candles = candles_from_closes(&closes);
        let output = calculate(&candles, &MacdParams::default());

        assert!(!output.macd.is_empty());
        assert!(output.macd.last().unwrap().value > 0.0);
    }

    #[test]
    fn test_macd_alignment() {
        let closes: Vec<f64> = (1..=60).map(|i| i as f64).collect();
        let candles = candles_from_closes(&closes);
        let params = MacdParams::default();
        let output = calculate(&candles, &params);

        // MACD starts once the slow EMA is seeded
        assert_eq!(output.macd.len(), 60 - params.slow_period + 1);
        assert_eq!(output.macd[0].time, candles[params.slow_period - 1].datetime);

        // Signal and histogram start signal_period - 1 points later
        let tail = output.macd.len() - params.signal_period + 1;
        assert_eq!(output.signal.len(), tail);
        assert_eq!(output.histogram.len(), tail);
    }

    #[test]
    fn test_macd_histogram_identity() {
        let closes: Vec<f64> = (0..80)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0)
            .collect();
        let candles = candles_from_closes(&closes);
        let output = calculate(&candles, &MacdParams::default());

        let offset = output.macd.len() - output.signal.len();
        for (j, histogram) in output.histogram.iter().enumerate() {
            let macd = &output.macd[offset + j];
            let signal = &output.signal[j];
            assert_eq!(histogram.time, macd.time);
            assert_relative_eq!(
                histogram.value,
                macd.value - signal.value,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_macd_histogram_colors() {
        let closes: Vec<f64> = (0..80)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0)
            .collect();
        let candles = candles_from_closes(&closes);
        let output = calculate(&candles, &MacdParams::default());

        for point in &output.histogram {
            let expected = if point.value >= 0.0 {
                UP_COLOR
            } else {
                DOWN_COLOR
            };
            assert_eq!(point.color.as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_macd_constant_price_is_zero() {
        let candles = candles_from_closes(&[100.0; 60]);
        let output = calculate(&candles, &MacdParams::default());

        for point in &output.macd {
            assert_relative_eq!(point.value, 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_macd_insufficient_data() {
        let candles = candles_from_closes(&[1.0; 10]);
        let output = calculate(&candles, &MacdParams::default());

        assert!(output.macd.is_empty());
        assert!(output.signal.is_empty());
        assert!(output.histogram.is_empty());
    }

    #[test]
    fn test_macd_zero_period_is_empty() {
        let candles = candles_from_closes(&[1.0; 40]);
        let params = MacdParams {
            fast_period: 0,
            ..MacdParams::default()
        };
        assert_eq!(calculate(&candles, &params), MacdOutput::default());
    }
}
