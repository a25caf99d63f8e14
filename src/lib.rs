//! Chart Engine - indicator computation and multi-pane chart series engine
//!
//! This crate provides the computation and placement core of a trading
//! chart:
//!
//! - Technical indicator calculators (SMA, EMA, RSI, MACD, Bollinger Bands,
//!   ATR, Stochastic, Ichimoku)
//! - Pane allocation policy keeping unrelated oscillators out of each
//!   other's panes
//! - Series lifecycle management against an abstract chart surface
//! - Indicator config persistence with legacy shape migration
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use chart_engine::chart::{ChartEngine, MemorySurface, Parameters};
//!
//! let mut engine = ChartEngine::new(MemorySurface::new());
//! // engine.update_history(bars);
//! let id = engine.add_indicator("ema", Parameters::new()).unwrap();
//! engine.set_indicator_visible(&id, false).unwrap();
//! ```

pub mod chart;
pub mod indicator;
pub mod logger;
pub mod market;
pub mod setting;
pub mod utility;

// Re-export commonly used types
pub use chart::{
    ChartEngine, ChartError, ChartSurface, IndicatorConfig, IndicatorFactory, IndicatorInstance,
    InstanceState, MemorySurface, PaneAllocator, PanePreference, ParamValue, Parameters, SeriesId,
    SeriesOptions,
};
pub use indicator::{
    IndicatorKind, IndicatorOutput, IndicatorType, RoleSeries, SeriesKind, SeriesPoint, SeriesRole,
};
pub use logger::{init_logger, Logger, CRITICAL, DEBUG, ERROR, INFO, WARNING};
pub use market::{Candle, CandleHistory};
pub use setting::{SettingValue, Settings, SETTINGS};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
