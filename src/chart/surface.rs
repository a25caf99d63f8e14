//! Abstract chart surface that indicator instances draw onto.
//!
//! The surface is the boundary to the external charting library. The engine
//! only assumes this narrow contract: series can be added to a pane, written
//! wholesale, restyled and removed. `MemorySurface` is the in-process
//! implementation used for testing and headless operation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::base::RIGHT_PRICE_SCALE;
use super::error::ChartError;
use crate::indicator::{SeriesKind, SeriesPoint};

/// Opaque handle of one plotted series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesId(pub u64);

/// Display options of one plotted series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesOptions {
    pub title: String,
    pub color: String,
    pub line_width: f32,
    /// Named vertical axis within the pane; series sharing a pane keep their
    /// value ranges independent by using distinct scale ids
    pub price_scale_id: String,
    pub visible: bool,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            color: "#FFFFFF".to_string(),
            line_width: 1.0,
            price_scale_id: RIGHT_PRICE_SCALE.to_string(),
            visible: true,
        }
    }
}

/// Abstract chart surface trait for connecting to different chart backends
pub trait ChartSurface {
    /// Add a series to a pane, returning its handle
    fn add_series(
        &mut self,
        kind: SeriesKind,
        options: SeriesOptions,
        pane_index: usize,
    ) -> Result<SeriesId, ChartError>;

    /// Remove a series from the surface
    fn remove_series(&mut self, series: SeriesId) -> Result<(), ChartError>;

    /// Overwrite the full data of a series
    fn set_series_data(
        &mut self,
        series: SeriesId,
        points: Vec<SeriesPoint>,
    ) -> Result<(), ChartError>;

    /// Replace the display options of a series
    fn apply_series_options(
        &mut self,
        series: SeriesId,
        options: SeriesOptions,
    ) -> Result<(), ChartError>;

    /// Whether the surface still knows this series
    fn has_series(&self, series: SeriesId) -> bool;

    /// Number of series currently attached to a pane
    fn series_count(&self, pane_index: usize) -> usize;
}

/// One series stored by the in-memory surface
#[derive(Debug, Clone)]
pub struct StoredSeries {
    pub kind: SeriesKind,
    pub options: SeriesOptions,
    pub pane_index: usize,
    pub data: Vec<SeriesPoint>,
}

/// In-memory chart surface implementation for testing
#[derive(Debug, Default)]
pub struct MemorySurface {
    series: HashMap<SeriesId, StoredSeries>,
    next_id: u64,
    pane_limit: Option<usize>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface that rejects panes at or above the given index,
    /// mimicking a backend with a fixed pane count
    pub fn with_pane_limit(pane_limit: usize) -> Self {
        Self {
            pane_limit: Some(pane_limit),
            ..Self::default()
        }
    }

    /// Look up a stored series
    pub fn get(&self, series: SeriesId) -> Option<&StoredSeries> {
        self.series.get(&series)
    }

    /// Total number of series on the surface
    pub fn total_series(&self) -> usize {
        self.series.len()
    }
}

impl ChartSurface for MemorySurface {
    fn add_series(
        &mut self,
        kind: SeriesKind,
        options: SeriesOptions,
        pane_index: usize,
    ) -> Result<SeriesId, ChartError> {
        if let Some(limit) = self.pane_limit {
            if pane_index >= limit {
                return Err(ChartError::InvalidPane(pane_index));
            }
        }

        self.next_id += 1;
        let id = SeriesId(self.next_id);
        self.series.insert(
            id,
            StoredSeries {
                kind,
                options,
                pane_index,
                data: Vec::new(),
            },
        );
        Ok(id)
    }

    fn remove_series(&mut self, series: SeriesId) -> Result<(), ChartError> {
        self.series
            .remove(&series)
            .map(|_| ())
            .ok_or(ChartError::SeriesNotFound(series.0))
    }

    fn set_series_data(
        &mut self,
        series: SeriesId,
        points: Vec<SeriesPoint>,
    ) -> Result<(), ChartError> {
        let stored = self
            .series
            .get_mut(&series)
            .ok_or(ChartError::SeriesNotFound(series.0))?;
        stored.data = points;
        Ok(())
    }

    fn apply_series_options(
        &mut self,
        series: SeriesId,
        options: SeriesOptions,
    ) -> Result<(), ChartError> {
        let stored = self
            .series
            .get_mut(&series)
            .ok_or(ChartError::SeriesNotFound(series.0))?;
        stored.options = options;
        Ok(())
    }

    fn has_series(&self, series: SeriesId) -> bool {
        self.series.contains_key(&series)
    }

    fn series_count(&self, pane_index: usize) -> usize {
        self.series
            .values()
            .filter(|stored| stored.pane_index == pane_index)
            .count()
    }
}
