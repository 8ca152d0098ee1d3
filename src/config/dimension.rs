use serde::{Deserialize, Serialize};

use crate::data::VariableId;

/// Visual channel a dimension binds its variable to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionProperty {
    #[default]
    Y,
    X,
    Size,
    Color,
}

/// Per-dimension display overrides carried through from the persisted config.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionDisplay {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion_factor: Option<f64>,
}

/// Configuration slot binding one visual channel to one variable id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
    pub variable_id: VariableId,
    #[serde(default)]
    pub property: DimensionProperty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<DimensionDisplay>,
}

impl Dimension {
    #[must_use]
    pub fn new(variable_id: VariableId, property: DimensionProperty) -> Self {
        Self {
            variable_id,
            property,
            display: None,
        }
    }

    /// Sole y-axis dimension, the shape `set_indicator` produces.
    #[must_use]
    pub fn y(variable_id: VariableId) -> Self {
        Self::new(variable_id, DimensionProperty::Y)
    }
}
