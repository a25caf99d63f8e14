//! End-to-end tests driving the chart engine through the public API.

use chrono::{DateTime, Duration, TimeZone, Utc};

use chart_engine::chart::base::{FIRST_OSCILLATOR_PANE, PRICE_PANE, VOLUME_PANE};
use chart_engine::{
    Candle, ChartEngine, ChartError, ChartSurface, IndicatorKind, IndicatorType, MemorySurface,
    ParamValue, Parameters,
};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, close)| {
            Candle::new(
                base_time() + Duration::minutes(i as i64),
                *close,
                *close,
                *close,
                *close,
                100.0,
            )
        })
        .collect()
}

fn linear_closes(n: usize) -> Vec<f64> {
    (1..=n).map(|i| i as f64).collect()
}

fn period(n: i64) -> Parameters {
    let mut params = Parameters::new();
    params.set("period", ParamValue::Int(n));
    params
}

#[test]
fn sma_over_linear_closes_matches_known_values() {
    let candles = candles_from_closes(&linear_closes(30));
    let mut engine = ChartEngine::new(MemorySurface::new());
    engine.update_history(candles.clone());

    let id = engine.add_indicator("sma", period(5)).unwrap();
    let instance = engine.indicator(&id).unwrap();
    assert_eq!(instance.pane_index(), Some(PRICE_PANE));

    // Find the SMA series on the price pane and check its data.
    let kind = IndicatorKind::from_config(IndicatorType::Sma, &period(5));
    let output = kind.compute(&candles);
    let points = &output[0].points;

    assert_eq!(points.len(), 26);
    assert!((points[0].value - 3.0).abs() < 1e-10); // mean of 1..5
    assert_eq!(points[0].time, candles[4].datetime);
    assert!((points.last().unwrap().value - 28.0).abs() < 1e-10); // mean of 26..30
    assert_eq!(points.last().unwrap().time, candles[29].datetime);
}

#[test]
fn rsi_of_increasing_closes_saturates_at_100() {
    let candles = candles_from_closes(&linear_closes(50));
    let kind = IndicatorKind::from_config(IndicatorType::Rsi, &Parameters::new());
    let output = kind.compute(&candles);

    let rsi = &output[0].points;
    assert!(!rsi.is_empty());
    assert!((rsi.last().unwrap().value - 100.0).abs() < 1e-9);
    for point in rsi {
        assert!(point.value >= 0.0 && point.value <= 100.0);
    }
}

#[test]
fn warmup_invariant_holds_for_every_calculator() {
    for indicator_type in IndicatorType::all() {
        let kind = IndicatorKind::from_config(indicator_type, &Parameters::new());

        let empty = kind.compute(&[]);
        for series in &empty {
            assert!(series.points.is_empty(), "{:?}", indicator_type);
        }
    }

    // Single-window calculators: exactly one point at len == period.
    for (name, window) in [("sma", 20), ("ema", 20), ("rsi", 14), ("atr", 14)] {
        let candles = candles_from_closes(&linear_closes(window));
        let indicator_type = IndicatorType::parse(name).unwrap();
        let kind = IndicatorKind::from_config(indicator_type, &Parameters::new());
        let output = kind.compute(&candles);
        assert_eq!(output[0].points.len(), 1, "{}", name);

        let short = candles_from_closes(&linear_closes(window - 1));
        let output = kind.compute(&short);
        assert!(output[0].points.is_empty(), "{}", name);
    }
}

#[test]
fn calculators_are_deterministic() {
    let closes: Vec<f64> = (0..120)
        .map(|i| 100.0 + (i as f64 * 0.37).sin() * 9.0 + (i as f64 * 0.11).cos() * 4.0)
        .collect();
    let candles = candles_from_closes(&closes);

    for indicator_type in IndicatorType::all() {
        let kind = IndicatorKind::from_config(indicator_type, &Parameters::new());
        let first = kind.compute(&candles);
        let second = kind.compute(&candles);
        assert_eq!(first, second, "{:?}", indicator_type);
    }
}

#[test]
fn same_family_shares_pane_and_main_differs() {
    let mut engine = ChartEngine::new(MemorySurface::new());
    engine.update_history(candles_from_closes(&linear_closes(60)));

    let rsi_a = engine.add_indicator("rsi", Parameters::new()).unwrap();
    let rsi_b = engine.add_indicator("rsi", period(7)).unwrap();
    let sma = engine.add_indicator("sma", Parameters::new()).unwrap();

    let pane_a = engine.indicator(&rsi_a).unwrap().pane_index().unwrap();
    let pane_b = engine.indicator(&rsi_b).unwrap().pane_index().unwrap();
    let pane_sma = engine.indicator(&sma).unwrap().pane_index().unwrap();

    assert_eq!(pane_a, pane_b);
    assert_eq!(pane_a, FIRST_OSCILLATOR_PANE);
    assert_ne!(pane_a, pane_sma);
    assert_eq!(pane_sma, PRICE_PANE);
}

#[test]
fn unrelated_oscillators_never_collide() {
    let mut engine = ChartEngine::new(MemorySurface::new());
    engine.update_history(candles_from_closes(&linear_closes(80)));

    let rsi = engine.add_indicator("rsi", Parameters::new()).unwrap();
    let macd = engine.add_indicator("macd", Parameters::new()).unwrap();
    let stoch = engine.add_indicator("stoch", Parameters::new()).unwrap();
    let atr = engine.add_indicator("atr", Parameters::new()).unwrap();

    let panes: Vec<usize> = [&rsi, &macd, &stoch, &atr]
        .iter()
        .map(|id| engine.indicator(id).unwrap().pane_index().unwrap())
        .collect();

    let mut deduped = panes.clone();
    deduped.sort_unstable();
    deduped.dedup();
    assert_eq!(deduped.len(), panes.len(), "oscillator panes collided: {:?}", panes);
}

#[test]
fn destroy_decrements_series_count_exactly() {
    let mut engine = ChartEngine::new(MemorySurface::new());
    engine.update_history(candles_from_closes(&linear_closes(60)));

    let sma = engine.add_indicator("sma", Parameters::new()).unwrap();
    assert_eq!(engine.surface().series_count(PRICE_PANE), 1);
    engine.remove_indicator(&sma);
    assert_eq!(engine.surface().series_count(PRICE_PANE), 0);

    let stoch = engine.add_indicator("stoch", Parameters::new()).unwrap();
    let pane = engine.indicator(&stoch).unwrap().pane_index().unwrap();
    assert_eq!(engine.surface().series_count(pane), 4);
    engine.remove_indicator(&stoch);
    assert_eq!(engine.surface().series_count(pane), 0);
}

#[test]
fn teardown_is_idempotent_through_the_engine() {
    let mut engine = ChartEngine::new(MemorySurface::new());
    engine.update_history(candles_from_closes(&linear_closes(60)));

    let id = engine.add_indicator("rsi", Parameters::new()).unwrap();
    let total_before = engine.surface().total_series();

    assert!(engine.remove_indicator(&id));
    let total_after = engine.surface().total_series();
    assert_eq!(total_before - total_after, 4);

    // Second removal and post-removal operations are errors or no-ops, not
    // panics, and leave the surface untouched.
    assert!(!engine.remove_indicator(&id));
    assert!(matches!(
        engine.set_indicator_visible(&id, false),
        Err(ChartError::IndicatorNotFound(_))
    ));
    assert_eq!(engine.surface().total_series(), total_after);
}

#[test]
fn parameter_update_rewrites_series_data() {
    let candles = candles_from_closes(&linear_closes(30));
    let mut engine = ChartEngine::new(MemorySurface::new());
    engine.update_history(candles);

    let id = engine.add_indicator("sma", period(20)).unwrap();
    let mut partial = Parameters::new();
    partial.set("period", ParamValue::Int(5));
    engine.set_indicator_parameters(&id, partial).unwrap();

    let config = engine.indicator(&id).unwrap().config();
    assert_eq!(config.parameters.get_period("period"), Some(5));
    // Name keeps its original derivation; only the data changed.
    assert_eq!(config.name, "SMA 20");
}

#[test]
fn persisted_pane_index_survives_restore() {
    let mut engine = ChartEngine::new(MemorySurface::new());
    engine.update_history(candles_from_closes(&linear_closes(60)));

    let id = engine.add_indicator("rsi", Parameters::new()).unwrap();
    let mut pinned = engine.indicator(&id).unwrap().config().clone();
    pinned.pane_index = Some(5);

    let mut restored = ChartEngine::new(MemorySurface::new());
    restored.update_history(candles_from_closes(&linear_closes(60)));
    let restored_id = restored.restore_indicator(pinned).unwrap();

    // The explicit pane wins verbatim over the oscillator policy.
    assert_eq!(
        restored.indicator(&restored_id).unwrap().pane_index(),
        Some(5)
    );
}

#[test]
fn volume_histogram_colors_follow_direction() {
    let mut engine = ChartEngine::new(MemorySurface::new());

    let mut bars = candles_from_closes(&[10.0, 11.0]);
    // Make the second bar a down bar.
    bars[1].open = 12.0;
    engine.update_history(bars);

    assert_eq!(engine.surface().series_count(VOLUME_PANE), 1);
    let volume_id = (1..=64u64)
        .map(chart_engine::SeriesId)
        .find(|id| engine.surface().has_series(*id))
        .unwrap();
    let stored = engine.surface().get(volume_id).unwrap();

    assert_eq!(stored.data.len(), 2);
    assert!(stored.data[0].color.is_some());
    assert_ne!(stored.data[0].color, stored.data[1].color);
}
