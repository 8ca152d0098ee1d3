use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::Year;
use crate::error::{ChartError, ChartResult};

/// Integer id of a variable (a single named time-series metric).
pub type VariableId = u64;

/// Raw per-variable payload: flattened parallel arrays of rows.
///
/// Row `i` reads "entity `entities[i]` had value `values[i]` in year
/// `years[i]`"; a JSON `null` value is a gap, not a zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableData {
    pub id: VariableId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub years: Vec<Year>,
    pub entities: Vec<String>,
    pub values: Vec<Option<f64>>,
}

impl VariableData {
    /// Rejects payloads whose parallel arrays disagree in length; such a row
    /// set has no consistent reading.
    pub fn validate(&self) -> ChartResult<()> {
        if self.years.len() != self.entities.len() || self.years.len() != self.values.len() {
            return Err(ChartError::InvalidData(format!(
                "variable {} parallel arrays disagree: {} years, {} entities, {} values",
                self.id,
                self.years.len(),
                self.entities.len(),
                self.values.len()
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.years.len()
    }
}

/// Batch fetch response: one payload per requested variable id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDataPayload {
    pub variables: IndexMap<VariableId, VariableData>,
}

impl VariableDataPayload {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let payload: Self = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse variable payload: {e}"))
        })?;
        for variable in payload.variables.values() {
            variable.validate()?;
        }
        Ok(payload)
    }

    #[must_use]
    pub fn single(variable: VariableData) -> Self {
        let mut variables = IndexMap::new();
        variables.insert(variable.id, variable);
        Self { variables }
    }
}
