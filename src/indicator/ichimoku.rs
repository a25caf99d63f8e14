//! Ichimoku Cloud indicator

use chrono::{DateTime, Utc};

use crate::chart::config::Parameters;
use crate::market::Candle;

use super::{collect_points, SeriesPoint};

/// Ichimoku Cloud parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IchimokuParams {
    /// Window for the conversion line (tenkan-sen)
    pub conversion_period: usize,
    /// Window for the base line (kijun-sen)
    pub base_period: usize,
    /// Window for leading span B
    pub span_period: usize,
    /// Forward shift of the spans, backward shift of the lagging line
    pub displacement: usize,
}

impl Default for IchimokuParams {
    fn default() -> Self {
        Self {
            conversion_period: 9,
            base_period: 26,
            span_period: 52,
            displacement: 26,
        }
    }
}

impl IchimokuParams {
    /// Read parameters from a named parameter set, falling back to defaults
    pub fn from_parameters(parameters: &Parameters) -> Self {
        let defaults = Self::default();
        Self {
            conversion_period: parameters
                .get_period("conversionPeriod")
                .unwrap_or(defaults.conversion_period),
            base_period: parameters
                .get_period("basePeriod")
                .unwrap_or(defaults.base_period),
            span_period: parameters
                .get_period("spanPeriod")
                .unwrap_or(defaults.span_period),
            displacement: parameters
                .get_period("displacement")
                .unwrap_or(defaults.displacement),
        }
    }
}

/// Ichimoku output: conversion and base lines, the two leading spans and the
/// lagging line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IchimokuOutput {
    pub conversion: Vec<SeriesPoint>,
    pub base: Vec<SeriesPoint>,
    pub span_a: Vec<SeriesPoint>,
    pub span_b: Vec<SeriesPoint>,
    pub lagging: Vec<SeriesPoint>,
}

/// Rolling midpoint `(highest_high + lowest_low) / 2`, NaN before the first
/// full window.
fn midpoint_series(candles: &[Candle], period: usize) -> Vec<f64> {
    let len = candles.len();
    let mut result = vec![f64::NAN; len];

    if period == 0 || len < period {
        return result;
    }

    for i in (period - 1)..len {
        let window = &candles[i + 1 - period..=i];
        let highest = window.iter().map(|c| c.high).fold(f64::MIN, f64::max);
        let lowest = window.iter().map(|c| c.low).fold(f64::MAX, f64::min);
        result[i] = (highest + lowest) / 2.0;
    }

    result
}

/// Plot time for a bar index shifted past the end of the candle series.
///
/// Indexes inside the series use the actual candle time; indexes beyond it
/// extrapolate from the last observed bar interval. Candle gaps are left as
/// they are, only the projection past the last bar is synthesized.
fn shifted_time(candles: &[Candle], index: usize) -> Option<DateTime<Utc>> {
    let len = candles.len();
    if index < len {
        return Some(candles[index].datetime);
    }
    if len < 2 {
        return None;
    }

    let interval = candles[len - 1].datetime - candles[len - 2].datetime;
    let steps = (index - (len - 1)) as i32;
    Some(candles[len - 1].datetime + interval * steps)
}

/// Calculate the Ichimoku Cloud.
///
/// Span A and B are shifted forward by `displacement` bars, the lagging
/// line is the close shifted backward by `displacement` bars; lagging
/// points without a backing candle are dropped.
pub fn calculate(candles: &[Candle], params: &IchimokuParams) -> IchimokuOutput {
    let len = candles.len();
    if len == 0 {
        return IchimokuOutput::default();
    }

    let conversion_values = midpoint_series(candles, params.conversion_period);
    let base_values = midpoint_series(candles, params.base_period);
    let span_b_values = midpoint_series(candles, params.span_period);

    let conversion = collect_points(candles, &conversion_values);
    let base = collect_points(candles, &base_values);

    let mut span_a = Vec::new();
    let mut span_b = Vec::new();
    for i in 0..len {
        if conversion_values[i].is_finite() && base_values[i].is_finite() {
            if let Some(time) = shifted_time(candles, i + params.displacement) {
                span_a.push(SeriesPoint::new(
                    time,
                    (conversion_values[i] + base_values[i]) / 2.0,
                ));
            }
        }
        if span_b_values[i].is_finite() {
            if let Some(time) = shifted_time(candles, i + params.displacement) {
                span_b.push(SeriesPoint::new(time, span_b_values[i]));
            }
        }
    }

    let lagging = candles
        .iter()
        .enumerate()
        .skip(params.displacement)
        .map(|(i, candle)| {
            SeriesPoint::new(candles[i - params.displacement].datetime, candle.close)
        })
        .collect();

    IchimokuOutput {
        conversion,
        base,
        span_a,
        span_b,
        lagging,
    }
}
