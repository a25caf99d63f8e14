//! Indicator configuration model.
//!
//! Holds the persisted state of a single indicator instance: type, display
//! identity, visibility, parameters and the optional pinned pane. Parameter
//! values use the same untagged JSON representation as platform settings so
//! configs stored by older frontends deserialize without a schema.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::indicator::IndicatorType;

/// Parameter value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ParamValue {
    /// Get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(f) => Some(*f),
            ParamValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Named indicator parameters.
///
/// A thin map wrapper with typed getters and merge semantics. Unknown keys
/// are preserved verbatim so round-tripping a config never loses data;
/// calculators simply ignore parameters they do not recognize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters(HashMap<String, ParamValue>);

impl Parameters {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Get a raw parameter value
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Get a float parameter
    pub fn get_float(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(|v| v.as_float())
    }

    /// Get a bool parameter
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(|v| v.as_bool())
    }

    /// Get a string parameter
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_str())
    }

    /// Get a window-length parameter.
    ///
    /// Non-positive values map to zero so calculators see them as the
    /// "no valid window" case instead of silently falling back to defaults.
    pub fn get_period(&self, key: &str) -> Option<usize> {
        let value = self.get_float(key)?;
        if value <= 0.0 {
            Some(0)
        } else {
            Some(value as usize)
        }
    }

    /// Set a parameter value
    pub fn set(&mut self, key: impl Into<String>, value: ParamValue) {
        self.0.insert(key.into(), value);
    }

    /// Merge another parameter set into this one (other wins on conflicts)
    pub fn merge(&mut self, other: Parameters) {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
    }

    /// Whether a parameter is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the parameter set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over parameter entries
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }
}

impl FromIterator<(String, ParamValue)> for Parameters {
    fn from_iter<T: IntoIterator<Item = (String, ParamValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Per-type parameter defaults
static DEFAULT_PARAMETERS: Lazy<HashMap<IndicatorType, Parameters>> = Lazy::new(|| {
    let mut table = HashMap::new();

    let mut sma = Parameters::new();
    sma.set("period", ParamValue::Int(20));
    table.insert(IndicatorType::Sma, sma);

    let mut ema = Parameters::new();
    ema.set("period", ParamValue::Int(20));
    table.insert(IndicatorType::Ema, ema);

    let mut rsi = Parameters::new();
    rsi.set("period", ParamValue::Int(14));
    rsi.set("overbought", ParamValue::Int(70));
    rsi.set("oversold", ParamValue::Int(30));
    table.insert(IndicatorType::Rsi, rsi);

    let mut macd = Parameters::new();
    macd.set("fastPeriod", ParamValue::Int(12));
    macd.set("slowPeriod", ParamValue::Int(26));
    macd.set("signalPeriod", ParamValue::Int(9));
    table.insert(IndicatorType::Macd, macd);

    let mut bollinger = Parameters::new();
    bollinger.set("period", ParamValue::Int(20));
    bollinger.set("stdDev", ParamValue::Int(2));
    table.insert(IndicatorType::Bollinger, bollinger);

    let mut atr = Parameters::new();
    atr.set("period", ParamValue::Int(14));
    table.insert(IndicatorType::Atr, atr);

    let mut stochastic = Parameters::new();
    stochastic.set("kPeriod", ParamValue::Int(14));
    stochastic.set("dPeriod", ParamValue::Int(3));
    stochastic.set("overboughtLevel", ParamValue::Int(80));
    stochastic.set("oversoldLevel", ParamValue::Int(20));
    table.insert(IndicatorType::Stochastic, stochastic);

    let mut ichimoku = Parameters::new();
    ichimoku.set("conversionPeriod", ParamValue::Int(9));
    ichimoku.set("basePeriod", ParamValue::Int(26));
    ichimoku.set("spanPeriod", ParamValue::Int(52));
    ichimoku.set("displacement", ParamValue::Int(26));
    table.insert(IndicatorType::Ichimoku, ichimoku);

    table
});

/// Get the default parameters for an indicator type
pub fn default_parameters(indicator_type: IndicatorType) -> Parameters {
    DEFAULT_PARAMETERS
        .get(&indicator_type)
        .cloned()
        .unwrap_or_default()
}

/// Merge type defaults under user overrides (overrides win)
pub fn apply_defaults(indicator_type: IndicatorType, overrides: Parameters) -> Parameters {
    let mut params = default_parameters(indicator_type);
    params.merge(overrides);
    params
}

/// Configuration state of a single indicator instance.
///
/// `id` is stable for the instance's lifetime and is the join key between
/// the config and its live chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub indicator_type: IndicatorType,
    pub name: String,
    pub color: String,
    pub visible: bool,
    pub parameters: Parameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pane_index: Option<usize>,
}

impl IndicatorConfig {
    /// Create a new config with defaults applied under the given overrides
    pub fn new(
        id: impl Into<String>,
        indicator_type: IndicatorType,
        name: impl Into<String>,
        color: impl Into<String>,
        overrides: Parameters,
    ) -> Self {
        Self {
            id: id.into(),
            indicator_type,
            name: name.into(),
            color: color.into(),
            visible: true,
            parameters: apply_defaults(indicator_type, overrides),
            pane_index: None,
        }
    }

    /// Merge a partial parameter update into the existing parameters
    pub fn set_parameters(&mut self, partial: Parameters) {
        self.parameters.merge(partial);
    }

    /// Update the visibility flag.
    ///
    /// Propagation to live series is the instance's job, not the model's.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}
