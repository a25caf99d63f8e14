//! Indicator factory.
//!
//! Creates indicator instances from a type name and user parameters, and
//! migrates configs persisted by older frontends into the current shape.
//! The type-name lookup here is the only place an unknown indicator type
//! can surface at runtime; it fails loudly instead of defaulting.

use serde_json::Value;
use uuid::Uuid;

use crate::indicator::{IndicatorKind, IndicatorType};

use super::base::default_color;
use super::config::{apply_defaults, IndicatorConfig, ParamValue, Parameters};
use super::error::ChartError;
use super::instance::IndicatorInstance;

/// Bare numeric fields recognized when migrating legacy configs that stored
/// parameters at the top level instead of under a "parameters" object
const LEGACY_PARAMETER_KEYS: [&str; 15] = [
    "period",
    "fastPeriod",
    "slowPeriod",
    "signalPeriod",
    "stdDev",
    "kPeriod",
    "dPeriod",
    "overbought",
    "oversold",
    "overboughtLevel",
    "oversoldLevel",
    "conversionPeriod",
    "basePeriod",
    "spanPeriod",
    "displacement",
];

/// Factory for indicator instances
#[derive(Debug, Default)]
pub struct IndicatorFactory;

impl IndicatorFactory {
    pub fn new() -> Self {
        Self
    }

    /// Create an instance from a type name and user parameters.
    ///
    /// User parameters are merged over the type defaults; a fresh unique id
    /// and a derived display name ("EMA 20", "MACD 12,26,9") are assigned.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::UnsupportedType`] when the type name is
    /// unknown.
    pub fn create(
        &self,
        type_name: &str,
        user_params: Parameters,
    ) -> Result<IndicatorInstance, ChartError> {
        let indicator_type = IndicatorType::parse(type_name)
            .ok_or_else(|| ChartError::UnsupportedType(type_name.to_string()))?;
        Ok(self.create_typed(indicator_type, user_params))
    }

    /// Create an instance for an already-parsed indicator type
    pub fn create_typed(
        &self,
        indicator_type: IndicatorType,
        user_params: Parameters,
    ) -> IndicatorInstance {
        let parameters = apply_defaults(indicator_type, user_params);
        let kind = IndicatorKind::from_config(indicator_type, &parameters);

        let config = IndicatorConfig {
            id: Uuid::new_v4().to_string(),
            indicator_type,
            name: kind.default_label(),
            color: default_color(indicator_type).to_string(),
            visible: true,
            parameters,
            pane_index: None,
        };
        IndicatorInstance::from_config(config)
    }

    /// Rebuild an instance from a persisted config, keeping its identity
    /// and filling in defaults for any parameters the stored shape lacks
    pub fn create_from_config(&self, config: IndicatorConfig) -> IndicatorInstance {
        let mut restored = config;
        restored.parameters = apply_defaults(restored.indicator_type, restored.parameters.clone());
        IndicatorInstance::from_config(restored)
    }

    /// Migrate a config stored by an older frontend.
    ///
    /// Best-effort extraction of type, parameters, id, name, color,
    /// visibility and pane from the old shape; unrecognized fields are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::InvalidConfig`] when the value is not an
    /// object or carries no type field, and [`ChartError::UnsupportedType`]
    /// when the stored type name is unknown.
    pub fn migrate_legacy_config(&self, value: &Value) -> Result<IndicatorInstance, ChartError> {
        let object = value
            .as_object()
            .ok_or_else(|| ChartError::invalid_config("config is not an object"))?;

        let type_name = object
            .get("type")
            .or_else(|| object.get("indicatorType"))
            .or_else(|| object.get("indicator_type"))
            .and_then(Value::as_str)
            .ok_or_else(|| ChartError::invalid_config("missing indicator type"))?;

        let mut params = Parameters::new();
        if let Some(stored) = object
            .get("parameters")
            .or_else(|| object.get("params"))
            .and_then(Value::as_object)
        {
            for (key, raw) in stored {
                if let Some(value) = param_from_json(raw) {
                    params.set(key.clone(), value);
                }
            }
        }
        for key in LEGACY_PARAMETER_KEYS {
            if params.contains_key(key) {
                continue;
            }
            if let Some(value) = object.get(key).and_then(param_from_json) {
                params.set(key, value);
            }
        }

        let mut instance = self.create(type_name, params)?;
        let config = instance.config().clone();
        let mut migrated = config;

        if let Some(id) = object.get("id").and_then(Value::as_str) {
            migrated.id = id.to_string();
        }
        if let Some(name) = object.get("name").and_then(Value::as_str) {
            migrated.name = name.to_string();
        }
        if let Some(color) = object.get("color").and_then(Value::as_str) {
            migrated.color = color.to_string();
        }
        if let Some(visible) = object.get("visible").and_then(Value::as_bool) {
            migrated.visible = visible;
        }
        if let Some(pane) = object
            .get("paneIndex")
            .or_else(|| object.get("pane_index"))
            .and_then(Value::as_u64)
        {
            migrated.pane_index = Some(pane as usize);
        }

        instance = IndicatorInstance::from_config(migrated);
        Ok(instance)
    }
}

/// Convert a JSON value to a parameter value, dropping unsupported shapes
fn param_from_json(value: &Value) -> Option<ParamValue> {
    match value {
        Value::Bool(b) => Some(ParamValue::Bool(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(ParamValue::Int(i))
            } else {
                n.as_f64().map(ParamValue::Float)
            }
        }
        Value::String(s) => Some(ParamValue::String(s.clone())),
        _ => None,
    }
}
