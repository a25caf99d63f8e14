//! Market data structures consumed by the chart engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Candlestick bar data of a certain trading period.
///
/// Candles are produced by an external market data collaborator and are
/// read-only inside the chart engine. The sequence handed to the engine is
/// strictly increasing in `datetime`; gaps are tolerated and never resampled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub datetime: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Create a new Candle
    pub fn new(
        datetime: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            datetime,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Whether the bar closed at or above its open
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}

/// Ordered candle store backing a chart.
///
/// Keeps bars sorted by datetime and supports both wholesale history
/// replacement and single-bar streaming updates, where an update with the
/// same datetime as the last stored bar overwrites it (a still-forming bar).
#[derive(Debug, Clone, Default)]
pub struct CandleHistory {
    bars: Vec<Candle>,
}

impl CandleHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self { bars: Vec::new() }
    }

    /// Replace all stored bars with new history data
    pub fn update_history(&mut self, mut history: Vec<Candle>) {
        history.sort_by_key(|bar| bar.datetime);
        self.bars = history;
    }

    /// Update with a single bar.
    ///
    /// Overwrites the last bar when the datetime matches, appends when the
    /// bar is newer, and ignores bars older than the stored tail.
    pub fn update_candle(&mut self, bar: Candle) {
        match self.bars.last() {
            None => self.bars.push(bar),
            Some(last) if bar.datetime == last.datetime => {
                let ix = self.bars.len() - 1;
                self.bars[ix] = bar;
            }
            Some(last) if bar.datetime > last.datetime => self.bars.push(bar),
            Some(_) => {}
        }
    }

    /// Get all stored bars
    pub fn bars(&self) -> &[Candle] {
        &self.bars
    }

    /// Get the number of stored bars
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether the history is empty
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Clear all stored bars
    pub fn clear(&mut self) {
        self.bars.clear();
    }
}
