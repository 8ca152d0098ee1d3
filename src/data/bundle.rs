use indexmap::IndexMap;
use tracing::warn;

use crate::config::Year;
use crate::data::{VariableData, VariableId};

/// One observation. `value: None` is an explicit gap carried through from a
/// JSON null; reshaping never interpolates (that is a renderer policy).
pub type TimeSeriesPoint = (Year, Option<f64>);

/// Reshaped time-series data: `(entity, variable)` → year-ascending series.
///
/// Built from one or more raw [`VariableData`] payloads; insertion order of
/// entities is preserved so rendering and tests are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeriesBundle {
    series: IndexMap<(String, VariableId), Vec<TimeSeriesPoint>>,
}

impl TimeSeriesBundle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reshapes one variable's parallel-array rows into the bundle: grouped
    /// by entity, sorted ascending by year, duplicate years last write wins.
    /// Years absent from the rows stay absent; no gap entries are inserted.
    pub fn ingest(&mut self, variable: &VariableData) {
        // Drop any series left over from a previous payload for this id.
        self.series.retain(|(_, id), _| *id != variable.id);

        let mut grouped: IndexMap<&str, Vec<TimeSeriesPoint>> = IndexMap::new();
        for ((year, entity), value) in variable
            .years
            .iter()
            .zip(&variable.entities)
            .zip(&variable.values)
        {
            grouped
                .entry(entity.as_str())
                .or_default()
                .push((*year, *value));
        }

        for (entity, mut points) in grouped {
            points.sort_by_key(|(year, _)| *year);
            let original_len = points.len();
            points.dedup_by(|next, prev| {
                if next.0 == prev.0 {
                    // Later row wins for a repeated year.
                    prev.1 = next.1;
                    true
                } else {
                    false
                }
            });
            if points.len() != original_len {
                warn!(
                    variable_id = variable.id,
                    entity,
                    duplicate_count = original_len - points.len(),
                    "collapsed duplicate years while reshaping"
                );
            }
            self.series
                .insert((entity.to_owned(), variable.id), points);
        }
    }

    #[must_use]
    pub fn series(&self, entity: &str, variable_id: VariableId) -> Option<&[TimeSeriesPoint]> {
        self.series
            .get(&(entity.to_owned(), variable_id))
            .map(Vec::as_slice)
    }

    /// All entities with a series for `variable_id`, in insertion order.
    #[must_use]
    pub fn entities_for(&self, variable_id: VariableId) -> Vec<&str> {
        self.series
            .keys()
            .filter(|(_, id)| *id == variable_id)
            .map(|(entity, _)| entity.as_str())
            .collect()
    }

    #[must_use]
    pub fn variable_ids(&self) -> Vec<VariableId> {
        let mut ids = Vec::new();
        for (_, id) in self.series.keys() {
            if !ids.contains(id) {
                ids.push(*id);
            }
        }
        ids
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// Union of observed years for a variable, ascending.
    #[must_use]
    pub fn year_range(&self, variable_id: VariableId) -> Option<(Year, Year)> {
        let mut range: Option<(Year, Year)> = None;
        for ((_, id), points) in &self.series {
            if *id != variable_id {
                continue;
            }
            for (year, _) in points {
                range = Some(match range {
                    Some((min, max)) => (min.min(*year), max.max(*year)),
                    None => (*year, *year),
                });
            }
        }
        range
    }
}
