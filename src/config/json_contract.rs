use serde::{Deserialize, Serialize};

use crate::config::{ChartType, Dimension, Year};
use crate::data::VariableId;
use crate::error::{ChartError, ChartResult};

/// Schema version this crate reads and writes. Older persisted configs must
/// be migrated by the admin tooling before they reach this model.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// The `config` JSON column of a persisted chart.
///
/// Field names match the JS-origin persistence format, hence camelCase.
/// This is a transfer shape only; `ChartConfigStore::load` merges it
/// field-by-field onto live state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfigProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<ChartType>,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_time: Option<Year>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_time: Option<Year>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected_entities: Vec<String>,
}

fn default_version() -> u32 {
    CONFIG_SCHEMA_VERSION
}

impl Default for ChartConfigProps {
    fn default() -> Self {
        Self {
            title: None,
            slug: None,
            chart_type: None,
            version: CONFIG_SCHEMA_VERSION,
            dimensions: Vec::new(),
            min_time: None,
            max_time: None,
            selected_entities: Vec::new(),
        }
    }
}

impl ChartConfigProps {
    /// Parses persisted config JSON, gating on the schema version.
    ///
    /// A version older than [`CONFIG_SCHEMA_VERSION`] is surfaced as
    /// [`ChartError::SchemaVersionMismatch`]; migration belongs to the admin
    /// collaborator, not this model.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let props: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse chart config: {e}")))?;
        if props.version < CONFIG_SCHEMA_VERSION {
            return Err(ChartError::SchemaVersionMismatch {
                found: props.version,
                expected: CONFIG_SCHEMA_VERSION,
            });
        }
        Ok(props)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize chart config: {e}")))
    }

    /// Distinct variable ids referenced by dimensions, in dimension order.
    #[must_use]
    pub fn variable_ids(&self) -> Vec<VariableId> {
        let mut ids = Vec::with_capacity(self.dimensions.len());
        for dimension in &self.dimensions {
            if !ids.contains(&dimension.variable_id) {
                ids.push(dimension.variable_id);
            }
        }
        ids
    }
}

/// One row of the chart store: id, slug, and the parsed config payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedChartRecord {
    pub id: u64,
    pub slug: String,
    #[serde(default = "default_version")]
    pub version: u32,
    pub config: ChartConfigProps,
}
