//! Chart module for indicator placement and series lifecycle.
//!
//! This module provides:
//! - `ChartSurface` - abstract drawing surface trait plus `MemorySurface`
//! - `PaneAllocator` - pane assignment policy for indicator series
//! - `IndicatorInstance` - lifecycle of one indicator's plotted series
//! - `IndicatorFactory` - instance creation and legacy config migration
//! - `ChartEngine` - orchestration of candles, indicators and panes
//!
//! # Example
//!
//! ```ignore
//! use chart_engine::chart::{ChartEngine, MemorySurface, Parameters};
//!
//! let mut engine = ChartEngine::new(MemorySurface::new());
//! engine.update_history(bars);
//! let id = engine.add_indicator("ema", Parameters::new())?;
//! ```

pub mod base;
pub mod config;
pub mod engine;
pub mod error;
pub mod factory;
pub mod instance;
pub mod pane;
pub mod surface;

pub use config::{
    apply_defaults, default_parameters, IndicatorConfig, ParamValue, Parameters,
};
pub use engine::ChartEngine;
pub use error::ChartError;
pub use factory::IndicatorFactory;
pub use instance::{IndicatorInstance, InstanceState};
pub use pane::{preference_for, price_scale_id, PaneAllocator, PanePreference};
pub use surface::{ChartSurface, MemorySurface, SeriesId, SeriesOptions, StoredSeries};
