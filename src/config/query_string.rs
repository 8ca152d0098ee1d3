use tracing::{debug, warn};

use crate::config::{ChartConfigStore, ChartType, TimeDomain, Year};
use crate::data::VariableId;

/// The subset of configuration a URL query string can carry.
///
/// Only whitelisted keys decode into this; everything else in the query
/// string is ignored so unrelated host-page parameters never become errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartialChartQuery {
    pub chart_type: Option<ChartType>,
    pub time_domain: Option<(Year, Year)>,
    pub indicator_id: Option<VariableId>,
}

impl PartialChartQuery {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.chart_type.is_none() && self.time_domain.is_none() && self.indicator_id.is_none()
    }
}

/// Parses a URL-encoded query string into the recognized subset.
///
/// A leading `?` is tolerated. Malformed fragments degrade to the field
/// staying unset: `time=abc..2005` leaves `time_domain` as `None` so the
/// receiving configuration keeps its prior value.
#[must_use]
pub fn decode(query_str: &str) -> PartialChartQuery {
    let mut partial = PartialChartQuery::default();
    let trimmed = query_str.trim_start_matches('?');
    if trimmed.is_empty() {
        return partial;
    }

    for fragment in trimmed.split('&') {
        let Some((raw_key, raw_value)) = fragment.split_once('=') else {
            continue;
        };
        let Ok(key) = urlencoding::decode(raw_key) else {
            warn!(fragment, "skipping undecodable query key");
            continue;
        };
        let Ok(value) = urlencoding::decode(raw_value) else {
            warn!(fragment, "skipping undecodable query value");
            continue;
        };
        match key.as_ref() {
            "type" => match ChartType::parse(&value) {
                Some(chart_type) => partial.chart_type = Some(chart_type),
                None => warn!(value = %value, "ignoring unknown chart type in query"),
            },
            "time" => match parse_time_range(&value) {
                Some(range) => partial.time_domain = Some(range),
                None => warn!(value = %value, "ignoring malformed time range in query"),
            },
            "indicator" => match value.parse::<VariableId>() {
                Ok(id) => partial.indicator_id = Some(id),
                Err(_) => warn!(value = %value, "ignoring malformed indicator id in query"),
            },
            _ => {}
        }
    }
    partial
}

/// Encodes the whitelisted fields of a configuration, sparsely.
///
/// Fields holding their default/unset sentinel are omitted, so a pristine
/// configuration encodes to the empty string.
#[must_use]
pub fn encode(store: &ChartConfigStore) -> String {
    let mut pairs: Vec<String> = Vec::new();

    if store.chart_type() != ChartType::default() {
        pairs.push(format!("type={}", store.chart_type().name()));
    }
    let domain = store.time_domain();
    if let (Some(min), Some(max)) = (domain.min, domain.max) {
        pairs.push(format!("time={min}..{max}"));
    }
    if let Some(id) = sole_indicator_id(store) {
        pairs.push(format!("indicator={id}"));
    }

    pairs.join("&")
}

/// Overlays decoded query values onto a configuration.
///
/// Query-string values win for every field they specify; the persisted
/// configuration is the base. Each landing field goes through the store's
/// own mutation path so observers fire with consistent derived state.
pub fn apply(partial: PartialChartQuery, store: &mut ChartConfigStore) {
    if let Some(chart_type) = partial.chart_type {
        store.set_chart_type(chart_type);
    }
    if let Some((min, max)) = partial.time_domain {
        store.set_time_domain(min, max);
    }
    if let Some(id) = partial.indicator_id {
        debug!(variable_id = id, "query string selects indicator");
        store.set_pending_indicator(id);
    }
}

/// `1960..2005` → `(1960, 2005)`; anything else (non-numeric endpoint,
/// missing endpoint, reversed range) is `None`.
fn parse_time_range(value: &str) -> Option<(Year, Year)> {
    let (start, end) = value.split_once("..")?;
    let start: Year = start.trim().parse().ok()?;
    let end: Year = end.trim().parse().ok()?;
    TimeDomain::new(start, end)?;
    Some((start, end))
}

/// The indicator id encoded into the query string, present only when the
/// configuration is exactly a sole-indicator chart.
fn sole_indicator_id(store: &ChartConfigStore) -> Option<VariableId> {
    match store.dimensions() {
        [only] => Some(only.variable_id),
        _ => store.pending_indicator_id(),
    }
}
