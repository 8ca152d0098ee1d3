use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::data::VariableId;

/// Catalog entry pointing at a single variable's metric.
/// Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    pub id: VariableId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The `{"indicators": [...]}` catalog document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorCatalog {
    indicators: IndexMap<VariableId, Indicator>,
}

impl IndicatorCatalog {
    pub fn from_json_str(input: &str) -> crate::ChartResult<Self> {
        #[derive(Deserialize)]
        struct Document {
            indicators: Vec<Indicator>,
        }
        let document: Document = serde_json::from_str(input).map_err(|e| {
            crate::ChartError::InvalidData(format!("failed to parse indicator catalog: {e}"))
        })?;
        Ok(Self::from_indicators(document.indicators))
    }

    #[must_use]
    pub fn from_indicators(indicators: Vec<Indicator>) -> Self {
        Self {
            indicators: indicators.into_iter().map(|i| (i.id, i)).collect(),
        }
    }

    #[must_use]
    pub fn by_id(&self, id: VariableId) -> Option<&Indicator> {
        self.indicators.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Indicator> {
        self.indicators.values()
    }
}
