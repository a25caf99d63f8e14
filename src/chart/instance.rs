//! Live indicator instance bound to a chart surface.
//!
//! One generic struct covers every indicator family: per-type behavior comes
//! from the typed calculator (`IndicatorKind`) and its series layout, not
//! from subclassing. The instance owns the lifecycle of its plotted series:
//!
//! `Uninitialized -> SeriesCreated -> DataLoaded -> Destroyed`
//!
//! with data refresh, visibility toggling and parameter changes cycling
//! inside `DataLoaded`.

use crate::indicator::{IndicatorKind, SeriesRole};
use crate::market::Candle;

use super::config::{IndicatorConfig, Parameters};
use super::pane::{preference_for, price_scale_id};
use super::surface::{ChartSurface, SeriesId, SeriesOptions};

/// Lifecycle state of an indicator instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    /// Config bound, no series exist yet
    Uninitialized,
    /// Series allocated on the surface, no data written
    SeriesCreated,
    /// Series carry computed data
    DataLoaded,
    /// Series removed, instance inert
    Destroyed,
}

/// One chart series owned by the instance
#[derive(Debug, Clone)]
struct BoundSeries {
    role: SeriesRole,
    id: SeriesId,
    options: SeriesOptions,
}

/// A configured indicator bound to live chart series.
pub struct IndicatorInstance {
    config: IndicatorConfig,
    kind: IndicatorKind,
    state: InstanceState,
    pane_index: Option<usize>,
    series: Vec<BoundSeries>,
}

impl IndicatorInstance {
    /// Build an instance from a resolved config
    pub fn from_config(config: IndicatorConfig) -> Self {
        let kind = IndicatorKind::from_config(config.indicator_type, &config.parameters);
        Self {
            config,
            kind,
            state: InstanceState::Uninitialized,
            pane_index: None,
            series: Vec::new(),
        }
    }

    /// Stable instance id
    pub fn id(&self) -> &str {
        &self.config.id
    }

    /// Current configuration
    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> InstanceState {
        self.state
    }

    /// Pane the series live on, once created
    pub fn pane_index(&self) -> Option<usize> {
        self.pane_index
    }

    /// Number of chart series this instance owns
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Create one chart series per layout entry at the given pane.
    ///
    /// Returns the primary series handle, or None when the surface rejects
    /// any of the series. A rejection rolls back every series already
    /// created by this call, leaving the instance unchanged and retryable.
    pub fn create_series(
        &mut self,
        surface: &mut dyn ChartSurface,
        pane_index: usize,
    ) -> Option<SeriesId> {
        match self.state {
            InstanceState::Uninitialized => {}
            InstanceState::SeriesCreated | InstanceState::DataLoaded => {
                return self.series.first().map(|bound| bound.id);
            }
            InstanceState::Destroyed => return None,
        }

        let preference = preference_for(self.config.indicator_type);
        let scale_id = price_scale_id(preference, &self.config.id);

        let mut created = Vec::new();
        for (index, spec) in self.kind.layout().into_iter().enumerate() {
            let title = if spec.role.label().is_empty() {
                self.config.name.clone()
            } else {
                format!("{} {}", self.config.name, spec.role.label())
            };
            // The configured color styles the primary series; auxiliary
            // series keep their layout defaults.
            let color = if index == 0 {
                self.config.color.clone()
            } else {
                spec.color.to_string()
            };
            let options = SeriesOptions {
                title,
                color,
                line_width: spec.line_width,
                price_scale_id: scale_id.clone(),
                visible: self.config.visible,
            };

            match surface.add_series(spec.kind, options.clone(), pane_index) {
                Ok(id) => created.push(BoundSeries {
                    role: spec.role,
                    id,
                    options,
                }),
                Err(error) => {
                    tracing::warn!(
                        indicator = %self.config.id,
                        pane = pane_index,
                        %error,
                        "series creation rejected, rolling back"
                    );
                    for bound in created {
                        let _ = surface.remove_series(bound.id);
                    }
                    return None;
                }
            }
        }

        let primary = created.first().map(|bound| bound.id);
        self.series = created;
        self.pane_index = Some(pane_index);
        self.state = InstanceState::SeriesCreated;
        primary
    }

    /// Recompute from the full candle history and overwrite every owned
    /// series wholesale.
    ///
    /// Silently returns when the instance has no series, was destroyed, or
    /// the candle history is empty.
    pub fn update_data(&mut self, surface: &mut dyn ChartSurface, candles: &[Candle]) {
        if self.series.is_empty() || candles.is_empty() {
            return;
        }
        if matches!(
            self.state,
            InstanceState::Uninitialized | InstanceState::Destroyed
        ) {
            return;
        }

        let output = self.kind.compute(candles);
        for role_series in output {
            if let Some(bound) = self.series.iter().find(|b| b.role == role_series.role) {
                let _ = surface.set_series_data(bound.id, role_series.points);
            }
        }
        self.state = InstanceState::DataLoaded;
    }

    /// Propagate visibility to every owned series atomically.
    ///
    /// All series flip together or none do: the handles are validated
    /// before the first option write.
    pub fn set_visible(&mut self, surface: &mut dyn ChartSurface, visible: bool) {
        self.config.set_visible(visible);

        if self.series.is_empty() || self.state == InstanceState::Destroyed {
            return;
        }
        if !self.series.iter().all(|bound| surface.has_series(bound.id)) {
            return;
        }

        for bound in &mut self.series {
            bound.options.visible = visible;
            let _ = surface.apply_series_options(bound.id, bound.options.clone());
        }
    }

    /// Merge a partial parameter update, rebuild the calculator and rewrite
    /// the series data
    pub fn set_parameters(
        &mut self,
        surface: &mut dyn ChartSurface,
        partial: Parameters,
        candles: &[Candle],
    ) {
        self.config.set_parameters(partial);
        self.kind = IndicatorKind::from_config(self.config.indicator_type, &self.config.parameters);
        self.update_data(surface, candles);
    }

    /// Remove every owned series and release the bindings.
    ///
    /// Idempotent: destroying twice, or an instance that never created
    /// series, is a no-op.
    pub fn destroy(&mut self, surface: &mut dyn ChartSurface) {
        if self.state == InstanceState::Destroyed {
            return;
        }

        for bound in self.series.drain(..) {
            let _ = surface.remove_series(bound.id);
        }
        self.pane_index = None;
        self.state = InstanceState::Destroyed;
    }
}
