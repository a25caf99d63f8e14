//! Base constants for the chart module.

use crate::indicator::IndicatorType;

// Pane layout. Pane 0 is reserved for price candles, pane 1 is shared with
// volume bars, oscillator panes are allocated from pane 2 upwards.
pub const PRICE_PANE: usize = 0;
pub const VOLUME_PANE: usize = 1;
pub const FIRST_OSCILLATOR_PANE: usize = 2;

// Price scale identifiers. Main-pane overlays share the candle scale;
// everything else gets a per-instance scale id.
pub const RIGHT_PRICE_SCALE: &str = "right";
pub const VOLUME_PRICE_SCALE: &str = "volume";

// Price movement colors (Chinese style: red up, cyan down)
pub const UP_COLOR: &str = "#FF4B4B";
pub const DOWN_COLOR: &str = "#00FFFF";

// Default line colors
pub const MAIN_LINE_COLOR: &str = "#FFD700";
pub const SIGNAL_LINE_COLOR: &str = "#FF6400";
pub const BAND_LINE_COLOR: &str = "#6496FA";
pub const REFERENCE_LINE_COLOR: &str = "#646464";
pub const CONVERSION_LINE_COLOR: &str = "#2962FF";
pub const BASE_LINE_COLOR: &str = "#B71C1C";
pub const SPAN_A_COLOR: &str = "#00C853";
pub const SPAN_B_COLOR: &str = "#FF5252";
pub const LAGGING_LINE_COLOR: &str = "#9C27B0";

// Line widths
pub const PEN_WIDTH: f32 = 1.5;
pub const REFERENCE_PEN_WIDTH: f32 = 1.0;

/// Default display color for an indicator type
pub fn default_color(indicator_type: IndicatorType) -> &'static str {
    match indicator_type {
        IndicatorType::Sma => "#FFD700",
        IndicatorType::Ema => "#00FFFF",
        IndicatorType::Rsi => "#B864FA",
        IndicatorType::Macd => "#2962FF",
        IndicatorType::Bollinger => "#6496FA",
        IndicatorType::Atr => "#FF9800",
        IndicatorType::Stochastic => "#64C8FA",
        IndicatorType::Ichimoku => "#2962FF",
    }
}
