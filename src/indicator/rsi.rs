//! Relative Strength Index (RSI) indicator with Wilder smoothing

use crate::chart::config::Parameters;
use crate::market::Candle;

use super::{constant_points, SeriesPoint, NEUTRAL_LEVEL};

/// Relative Strength Index parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiParams {
    /// Number of periods for the averages
    pub period: usize,
    /// Overbought reference level
    pub overbought: f64,
    /// Oversold reference level
    pub oversold: f64,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self {
            period: 14,
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

impl RsiParams {
    /// Read parameters from a named parameter set, falling back to defaults
    pub fn from_parameters(parameters: &Parameters) -> Self {
        let defaults = Self::default();
        Self {
            period: parameters.get_period("period").unwrap_or(defaults.period),
            overbought: parameters
                .get_float("overbought")
                .unwrap_or(defaults.overbought),
            oversold: parameters
                .get_float("oversold")
                .unwrap_or(defaults.oversold),
        }
    }
}

/// RSI output: the oscillator line plus constant reference lines aligned
/// to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RsiOutput {
    pub rsi: Vec<SeriesPoint>,
    pub overbought: Vec<SeriesPoint>,
    pub oversold: Vec<SeriesPoint>,
    pub midline: Vec<SeriesPoint>,
}

/// RSI value from smoothed average gain and loss.
///
/// Zero loss with zero gain is the no-movement case and maps to the neutral
/// sentinel; zero loss with positive gain saturates at 100.
#[inline]
fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            NEUTRAL_LEVEL
        } else {
            100.0
        }
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    }
}

/// Calculate Wilder RSI over close prices.
///
/// The averages are seeded from the changes inside the first `period`
/// candles so the first output point corresponds to the candle at index
/// `period - 1`; subsequent values use Wilder smoothing
/// `avg = (avg * (period - 1) + change) / period`.
pub fn calculate(candles: &[Candle], params: &RsiParams) -> RsiOutput {
    let period = params.period;
    let len = candles.len();

    if period == 0 || len < period {
        return RsiOutput::default();
    }

    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for i in 1..period {
        let change = candles[i].close - candles[i - 1].close;
        if change > 0.0 {
            gain_sum += change;
        } else {
            loss_sum += -change;
        }
    }

    let seed_span = (period - 1).max(1) as f64;
    let mut avg_gain = gain_sum / seed_span;
    let mut avg_loss = loss_sum / seed_span;

    let mut rsi = Vec::with_capacity(len - period + 1);
    rsi.push(SeriesPoint::new(
        candles[period - 1].datetime,
        rsi_value(avg_gain, avg_loss),
    ));

    let smoothing = (period - 1) as f64;
    let period_f = period as f64;

    for i in period..len {
        let change = candles[i].close - candles[i - 1].close;
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };

        avg_gain = (avg_gain * smoothing + gain) / period_f;
        avg_loss = (avg_loss * smoothing + loss) / period_f;
        rsi.push(SeriesPoint::new(
            candles[i].datetime,
            rsi_value(avg_gain, avg_loss),
        ));
    }

    let overbought = constant_points(&rsi, params.overbought);
    let oversold = constant_points(&rsi, params.oversold);
    let midline = constant_points(&rsi, NEUTRAL_LEVEL);

    RsiOutput {
        rsi,
        overbought,
        oversold,
        midline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::test_support::candles_from_closes;
    use approx::assert_relative_eq;

    #[test]
    fn test_rsi_uptrend_saturates() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let candles = candles_from_closes(&closes);
        let output = calculate(&candles, &RsiParams::default());

        assert_eq!(output.rsi.len(), 17);
        for point in &output.rsi {
            assert_relative_eq!(point.value, 100.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_rsi_downtrend_saturates() {
        let closes: Vec<f64> = (0..30).map(|i| 200.0 - i as f64).collect();
        let candles = candles_from_closes(&closes);
        let output = calculate(&candles, &RsiParams::default());

        for point in &output.rsi {
            assert_relative_eq!(point.value, 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_rsi_flat_is_neutral() {
        let candles = candles_from_closes(&[100.0; 20]);
        let output = calculate(&candles, &RsiParams::default());

        for point in &output.rsi {
            assert_relative_eq!(point.value, NEUTRAL_LEVEL, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_rsi_bounds() {
        let closes = vec![
            44.0, 44.25, 44.5, 43.75, 44.5, 44.25, 44.0, 43.5, 44.0, 44.5, 45.0, 44.75, 44.5,
            44.25, 44.0, 44.5, 43.0, 45.5,
        ];
        let candles = candles_from_closes(&closes);
        let output = calculate(&candles, &RsiParams::default());

        assert!(!output.rsi.is_empty());
        for point in &output.rsi {
            assert!(point.value >= 0.0 && point.value <= 100.0);
        }
    }

    #[test]
    fn test_rsi_warmup() {
        let candles = candles_from_closes(&[1.0; 13]);
        let output = calculate(&candles, &RsiParams::default());
        assert!(output.rsi.is_empty());

        let candles = candles_from_closes(&[1.0; 14]);
        let output = calculate(&candles, &RsiParams::default());
        assert_eq!(output.rsi.len(), 1);
        assert_eq!(output.rsi[0].time, candles[13].datetime);
    }

    #[test]
    fn test_rsi_reference_lines_aligned() {
        let closes: Vec<f64> = (0..20).map(|i| 50.0 + (i % 3) as f64).collect();
        let candles = candles_from_closes(&closes);
        let output = calculate(&candles, &RsiParams::default());

        assert_eq!(output.overbought.len(), output.rsi.len());
        assert_eq!(output.oversold.len(), output.rsi.len());
        assert_eq!(output.midline.len(), output.rsi.len());

        for (reference, line) in output.overbought.iter().zip(output.rsi.iter()) {
            assert_eq!(reference.time, line.time);
            assert_eq!(reference.value, 70.0);
        }
    }
}
