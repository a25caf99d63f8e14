//! Average True Range (ATR) indicator with Wilder smoothing

use crate::chart::config::Parameters;
use crate::market::Candle;

use super::SeriesPoint;

/// Average True Range parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtrParams {
    /// Number of periods for the smoothed average
    pub period: usize,
}

impl Default for AtrParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl AtrParams {
    /// Read parameters from a named parameter set, falling back to defaults
    pub fn from_parameters(parameters: &Parameters) -> Self {
        let defaults = Self::default();
        Self {
            period: parameters.get_period("period").unwrap_or(defaults.period),
        }
    }
}

/// True Range for a candle given the previous close.
///
/// TR = max(high - low, |high - prev_close|, |low - prev_close|)
#[inline]
fn true_range(candle: &Candle, prev_close: f64) -> f64 {
    let hl = candle.high - candle.low;
    let hc = (candle.high - prev_close).abs();
    let lc = (candle.low - prev_close).abs();
    hl.max(hc).max(lc)
}

/// Calculate Wilder-smoothed ATR.
///
/// The first bar has no previous close, so its True Range is high - low.
/// The average is seeded with the mean of the first `period` True Ranges,
/// then smoothed as `atr = (atr * (period - 1) + tr) / period`.
pub fn calculate(candles: &[Candle], params: &AtrParams) -> Vec<SeriesPoint> {
    let period = params.period;
    let len = candles.len();

    if period == 0 || len < period {
        return Vec::new();
    }

    let mut tr = Vec::with_capacity(len);
    tr.push(candles[0].high - candles[0].low);
    for i in 1..len {
        tr.push(true_range(&candles[i], candles[i - 1].close));
    }

    let mut atr = tr[..period].iter().sum::<f64>() / period as f64;
    let mut result = Vec::with_capacity(len - period + 1);
    result.push(SeriesPoint::new(candles[period - 1].datetime, atr));

    let smoothing = (period - 1) as f64;
    for i in period..len {
        atr = (atr * smoothing + tr[i]) / period as f64;
        result.push(SeriesPoint::new(candles[i].datetime, atr));
    }

    result
}
