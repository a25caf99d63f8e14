//! Chart engine orchestrating candles, indicators and panes.
//!
//! Owns the candle history, the pane allocator, the factory and every live
//! indicator instance, and drives them against the chart surface. This is
//! the layer UI code talks to: add and remove indicators, push candle
//! updates, toggle visibility, persist and restore the indicator setup.

use std::path::PathBuf;

use serde_json::Value;

use crate::indicator::{SeriesKind, SeriesPoint};
use crate::logger::Logger;
use crate::market::{Candle, CandleHistory};
use crate::setting::SETTINGS;
use crate::utility::{load_json, save_json};

use super::base::{DOWN_COLOR, PEN_WIDTH, UP_COLOR, VOLUME_PANE, VOLUME_PRICE_SCALE};
use super::config::{IndicatorConfig, Parameters};
use super::error::ChartError;
use super::factory::IndicatorFactory;
use super::instance::IndicatorInstance;
use super::pane::PaneAllocator;
use super::surface::{ChartSurface, SeriesId, SeriesOptions};

/// Main chart engine
pub struct ChartEngine<S: ChartSurface> {
    /// Chart surface backend
    surface: S,
    /// Candle history
    history: CandleHistory,
    /// Pane allocation policy
    allocator: PaneAllocator,
    /// Indicator factory
    factory: IndicatorFactory,
    /// Live indicator instances
    instances: Vec<IndicatorInstance>,
    /// Volume histogram on the volume pane, when shown
    volume_series: Option<SeriesId>,
    /// Injected lifecycle logger
    logger: Logger,
}

impl<S: ChartSurface> ChartEngine<S> {
    /// Create a new chart engine on a surface
    pub fn new(surface: S) -> Self {
        let mut engine = Self {
            surface,
            history: CandleHistory::new(),
            allocator: PaneAllocator::new(),
            factory: IndicatorFactory::new(),
            instances: Vec::new(),
            volume_series: None,
            logger: Logger::new("ChartEngine"),
        };

        let show_volume = SETTINGS.get_bool("chart.show_volume").unwrap_or(true);
        engine.set_show_volume(show_volume);
        engine
    }

    /// Update with historical bar data
    pub fn update_history(&mut self, history: Vec<Candle>) {
        self.history.update_history(history);
        self.logger
            .debug(&format!("history updated, {} bars", self.history.len()));
        self.refresh_all();
    }

    /// Update with a single bar
    pub fn update_candle(&mut self, bar: Candle) {
        self.history.update_candle(bar);
        self.refresh_all();
    }

    /// Number of stored bars
    pub fn candle_count(&self) -> usize {
        self.history.len()
    }

    /// Add an indicator by type name, returning its id.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::UnsupportedType`] for an unknown type name and
    /// [`ChartError::SurfaceRejected`] when the surface refuses the series
    /// (the indicator is not added and its pane reservation is rolled back).
    pub fn add_indicator(
        &mut self,
        type_name: &str,
        params: Parameters,
    ) -> Result<String, ChartError> {
        let instance = self.factory.create(type_name, params)?;
        self.attach(instance)
    }

    /// Re-attach an indicator from a persisted config.
    ///
    /// An explicit pane index stored in the config is honored verbatim.
    pub fn restore_indicator(&mut self, config: IndicatorConfig) -> Result<String, ChartError> {
        let instance = self.factory.create_from_config(config);
        self.attach(instance)
    }

    fn attach(&mut self, mut instance: IndicatorInstance) -> Result<String, ChartError> {
        let id = instance.id().to_string();
        let indicator_type = instance.config().indicator_type;
        let pane = self
            .allocator
            .resolve(indicator_type, &id, instance.config().pane_index);

        match instance.create_series(&mut self.surface, pane) {
            Some(_) => {
                instance.update_data(&mut self.surface, self.history.bars());
                self.logger.info(&format!(
                    "indicator added: {} ({}) on pane {}",
                    instance.config().name,
                    id,
                    pane
                ));
                self.instances.push(instance);
                Ok(id)
            }
            None => {
                self.allocator.release(&id);
                self.logger.warn(&format!(
                    "indicator not added: {} rejected by surface on pane {}",
                    instance.config().name,
                    pane
                ));
                Err(ChartError::surface_rejected(format!(
                    "pane {} refused {}",
                    pane,
                    indicator_type.as_str()
                )))
            }
        }
    }

    /// Remove an indicator, tearing down its series and freeing its pane
    /// slot. Returns false when the id is unknown.
    pub fn remove_indicator(&mut self, id: &str) -> bool {
        let Some(position) = self.instances.iter().position(|i| i.id() == id) else {
            return false;
        };

        let mut instance = self.instances.remove(position);
        instance.destroy(&mut self.surface);
        self.allocator.release(id);
        self.logger.info(&format!("indicator removed: {}", id));
        true
    }

    /// Remove all indicators
    pub fn clear_indicators(&mut self) {
        let ids: Vec<String> = self.instances.iter().map(|i| i.id().to_string()).collect();
        for id in ids {
            self.remove_indicator(&id);
        }
    }

    /// Toggle visibility of an indicator's series
    pub fn set_indicator_visible(&mut self, id: &str, visible: bool) -> Result<(), ChartError> {
        let instance = self
            .instances
            .iter_mut()
            .find(|i| i.id() == id)
            .ok_or_else(|| ChartError::IndicatorNotFound(id.to_string()))?;
        instance.set_visible(&mut self.surface, visible);
        Ok(())
    }

    /// Merge a partial parameter update into an indicator and recompute it
    pub fn set_indicator_parameters(
        &mut self,
        id: &str,
        partial: Parameters,
    ) -> Result<(), ChartError> {
        let instance = self
            .instances
            .iter_mut()
            .find(|i| i.id() == id)
            .ok_or_else(|| ChartError::IndicatorNotFound(id.to_string()))?;
        instance.set_parameters(&mut self.surface, partial, self.history.bars());
        self.logger.debug(&format!("indicator reconfigured: {}", id));
        Ok(())
    }

    /// Show or hide the volume histogram on the volume pane
    pub fn set_show_volume(&mut self, show: bool) {
        if show {
            if self.volume_series.is_none() {
                let options = SeriesOptions {
                    title: "Volume".to_string(),
                    color: UP_COLOR.to_string(),
                    line_width: PEN_WIDTH,
                    price_scale_id: VOLUME_PRICE_SCALE.to_string(),
                    visible: true,
                };
                match self
                    .surface
                    .add_series(SeriesKind::Histogram, options, VOLUME_PANE)
                {
                    Ok(id) => {
                        self.volume_series = Some(id);
                        self.refresh_volume();
                    }
                    Err(error) => {
                        self.logger
                            .warn(&format!("volume series rejected: {}", error));
                    }
                }
            }
        } else if let Some(id) = self.volume_series.take() {
            let _ = self.surface.remove_series(id);
        }
    }

    /// Recompute every indicator and the volume series from the full
    /// history
    fn refresh_all(&mut self) {
        self.refresh_volume();
        for instance in &mut self.instances {
            instance.update_data(&mut self.surface, self.history.bars());
        }
    }

    fn refresh_volume(&mut self) {
        let Some(id) = self.volume_series else {
            return;
        };
        let points: Vec<SeriesPoint> = self
            .history
            .bars()
            .iter()
            .map(|bar| {
                let color = if bar.is_up() { UP_COLOR } else { DOWN_COLOR };
                SeriesPoint::colored(bar.datetime, bar.volume, color)
            })
            .collect();
        let _ = self.surface.set_series_data(id, points);
    }

    /// Save every indicator config to a JSON file
    pub fn save_configs(&self, filepath: &PathBuf) -> Result<(), ChartError> {
        let configs: Vec<&IndicatorConfig> =
            self.instances.iter().map(|i| i.config()).collect();
        save_json(filepath, &configs)?;
        self.logger
            .info(&format!("saved {} indicator configs", configs.len()));
        Ok(())
    }

    /// Load indicator configs from a JSON file, migrating legacy shapes.
    ///
    /// Entries that fail migration are skipped with a warning; the count of
    /// restored indicators is returned.
    pub fn load_configs(&mut self, filepath: &PathBuf) -> Result<usize, ChartError> {
        let values: Vec<Value> = load_json(filepath)
            .ok_or_else(|| ChartError::invalid_config("unreadable indicator config file"))?;

        let mut restored = 0;
        for value in values {
            match self.factory.migrate_legacy_config(&value) {
                Ok(instance) => {
                    let config = instance.config().clone();
                    if self.restore_indicator(config).is_ok() {
                        restored += 1;
                    }
                }
                Err(error) => {
                    self.logger
                        .warn(&format!("skipping unmigratable config: {}", error));
                }
            }
        }
        Ok(restored)
    }

    /// Look up a live indicator by id
    pub fn indicator(&self, id: &str) -> Option<&IndicatorInstance> {
        self.instances.iter().find(|i| i.id() == id)
    }

    /// Ids of all live indicators, in add order
    pub fn indicator_ids(&self) -> Vec<String> {
        self.instances.iter().map(|i| i.id().to_string()).collect()
    }

    /// Number of live indicators
    pub fn indicator_count(&self) -> usize {
        self.instances.len()
    }

    /// The chart surface backend
    pub fn surface(&self) -> &S {
        &self.surface
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::base::{FIRST_OSCILLATOR_PANE, PRICE_PANE};
    use crate::chart::surface::MemorySurface;
    use crate::indicator::test_support::candles_from_closes;

    fn engine_with_history(closes: &[f64]) -> ChartEngine<MemorySurface> {
        let mut engine = ChartEngine::new(MemorySurface::new());
        engine.update_history(candles_from_closes(closes));
        engine
    }

    fn linear_closes(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64).collect()
    }

    #[test]
    fn test_add_indicator_places_and_loads() {
        let mut engine = engine_with_history(&linear_closes(30));
        let id = engine.add_indicator("sma", Parameters::new()).unwrap();

        let instance = engine.indicator(&id).unwrap();
        assert_eq!(instance.pane_index(), Some(PRICE_PANE));
        // Volume histogram plus the SMA line
        assert_eq!(engine.surface().series_count(PRICE_PANE), 1);
        assert_eq!(engine.surface().series_count(VOLUME_PANE), 1);
    }

    #[test]
    fn test_add_unknown_indicator_fails() {
        let mut engine = engine_with_history(&linear_closes(30));
        let result = engine.add_indicator("supertrend", Parameters::new());
        assert!(matches!(result, Err(ChartError::UnsupportedType(_))));
        assert_eq!(engine.indicator_count(), 0);
    }

    #[test]
    fn test_surface_rejection_rolls_back_pane() {
        // Only panes 0 and 1 exist on this surface: oscillators cannot be
        // placed.
        let mut engine = ChartEngine::new(MemorySurface::with_pane_limit(2));
        engine.update_history(candles_from_closes(&linear_closes(30)));

        let result = engine.add_indicator("rsi", Parameters::new());
        assert!(matches!(result, Err(ChartError::SurfaceRejected(_))));
        assert_eq!(engine.indicator_count(), 0);

        // The failed add released its pane: a later oscillator still gets
        // the first oscillator pane index.
        let mut allocator_probe = ChartEngine::new(MemorySurface::new());
        allocator_probe.update_history(candles_from_closes(&linear_closes(30)));
        let id = allocator_probe
            .add_indicator("macd", Parameters::new())
            .unwrap();
        assert_eq!(
            allocator_probe.indicator(&id).unwrap().pane_index(),
            Some(FIRST_OSCILLATOR_PANE)
        );
    }

    #[test]
    fn test_update_candle_refreshes_indicators() {
        let mut engine = engine_with_history(&linear_closes(30));
        let id = engine.add_indicator("sma", Parameters::new()).unwrap();

        let bars = candles_from_closes(&linear_closes(31));
        engine.update_candle(bars[30].clone());

        let instance = engine.indicator(&id).unwrap();
        assert_eq!(instance.series_count(), 1);
        assert_eq!(engine.candle_count(), 31);
    }

    #[test]
    fn test_remove_indicator_frees_series() {
        let mut engine = engine_with_history(&linear_closes(40));
        let id = engine.add_indicator("stoch", Parameters::new()).unwrap();
        let pane = engine.indicator(&id).unwrap().pane_index().unwrap();
        assert_eq!(engine.surface().series_count(pane), 4);

        assert!(engine.remove_indicator(&id));
        assert_eq!(engine.surface().series_count(pane), 0);
        assert!(!engine.remove_indicator(&id));
    }

    #[test]
    fn test_clear_indicators() {
        let mut engine = engine_with_history(&linear_closes(40));
        engine.add_indicator("sma", Parameters::new()).unwrap();
        engine.add_indicator("rsi", Parameters::new()).unwrap();
        engine.add_indicator("macd", Parameters::new()).unwrap();

        engine.clear_indicators();
        assert_eq!(engine.indicator_count(), 0);
        // Only the volume histogram remains
        assert_eq!(engine.surface().total_series(), 1);
    }

    #[test]
    fn test_volume_toggle() {
        let mut engine = engine_with_history(&linear_closes(10));
        assert_eq!(engine.surface().series_count(VOLUME_PANE), 1);

        engine.set_show_volume(false);
        assert_eq!(engine.surface().series_count(VOLUME_PANE), 0);

        engine.set_show_volume(true);
        assert_eq!(engine.surface().series_count(VOLUME_PANE), 1);
    }

    #[test]
    fn test_save_and_load_configs() {
        let dir = tempfile::tempdir().unwrap();
        let filepath = dir.path().join("indicators.json");

        let mut engine = engine_with_history(&linear_closes(40));
        engine.add_indicator("ema", Parameters::new()).unwrap();
        engine.add_indicator("rsi", Parameters::new()).unwrap();
        engine.save_configs(&filepath).unwrap();

        let mut restored = ChartEngine::new(MemorySurface::new());
        restored.update_history(candles_from_closes(&linear_closes(40)));
        let count = restored.load_configs(&filepath).unwrap();

        assert_eq!(count, 2);
        assert_eq!(restored.indicator_count(), 2);
    }

    #[test]
    fn test_load_legacy_configs() {
        let dir = tempfile::tempdir().unwrap();
        let filepath = dir.path().join("legacy.json");
        std::fs::write(
            &filepath,
            r#"[
                { "indicatorType": "macd", "fastPeriod": 8 },
                { "type": "unknown-kind" }
            ]"#,
        )
        .unwrap();

        let mut engine = engine_with_history(&linear_closes(40));
        let count = engine.load_configs(&filepath).unwrap();

        // The unknown entry is skipped, the MACD survives migration.
        assert_eq!(count, 1);
        let id = &engine.indicator_ids()[0];
        let config = engine.indicator(id).unwrap().config();
        assert_eq!(config.parameters.get_period("fastPeriod"), Some(8));
    }
}
