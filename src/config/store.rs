use tracing::{debug, trace, warn};

use crate::config::{
    ideal_bounds, Bounds, ChartConfigProps, ChartType, Dimension, RenderEnvironment, TimeDomain,
    Year, CONFIG_SCHEMA_VERSION,
};
use crate::data::{Indicator, IndicatorCatalog, VariableId};

/// Change notification emitted after a mutation batch has fully landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigEvent {
    Loaded,
    ChartTypeChanged,
    TimeDomainChanged,
    DimensionsChanged,
    EntitySelectionChanged,
}

/// Read-only state snapshot passed to observers.
///
/// Assembled after derived state (ideal bounds) is recomputed, so observers
/// never see a dimension change with stale bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigContext {
    pub chart_type: ChartType,
    pub time_domain: TimeDomain,
    pub dimension_count: usize,
    pub ideal_bounds: Bounds,
}

/// Observer hook for renderers subscribed to configuration changes.
///
/// Callbacks run synchronously inside the mutating call, before it returns,
/// so every subscriber sees the new state before the next render tick.
pub trait ConfigObserver {
    fn on_change(&mut self, event: ConfigEvent, context: ConfigContext);
}

/// Canonical chart configuration: the single source of truth renderers read.
///
/// Constructed once per chart instance from persisted JSON (or empty
/// defaults), mutated in place by user interaction or query-string overlay,
/// and never cloned per-render.
pub struct ChartConfigStore {
    title: Option<String>,
    slug: Option<String>,
    version: u32,
    chart_type: ChartType,
    dimensions: Vec<Dimension>,
    time_domain: TimeDomain,
    entity_selection: Vec<String>,
    pending_indicator_id: Option<VariableId>,
    env: RenderEnvironment,
    observers: Vec<Box<dyn ConfigObserver>>,
}

impl Default for ChartConfigStore {
    fn default() -> Self {
        Self::new(RenderEnvironment::default())
    }
}

impl ChartConfigStore {
    #[must_use]
    pub fn new(env: RenderEnvironment) -> Self {
        Self {
            title: None,
            slug: None,
            version: CONFIG_SCHEMA_VERSION,
            chart_type: ChartType::default(),
            dimensions: Vec::new(),
            time_domain: TimeDomain::default(),
            entity_selection: Vec::new(),
            pending_indicator_id: None,
            env,
            observers: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_props(props: ChartConfigProps, env: RenderEnvironment) -> Self {
        let mut store = Self::new(env);
        store.load(props);
        store
    }

    pub fn subscribe(&mut self, observer: Box<dyn ConfigObserver>) {
        self.observers.push(observer);
    }

    /// Merges persisted config onto live state, field by field.
    ///
    /// Only the enumerated whitelist of mutable fields is touched; absent
    /// optional fields leave the current value in place so existing
    /// subscribers observe an incremental change, not a teardown. One
    /// notification batch fires after every field has landed.
    pub fn load(&mut self, props: ChartConfigProps) {
        if let Some(title) = props.title {
            self.title = Some(title);
        }
        if let Some(slug) = props.slug {
            self.slug = Some(slug);
        }
        if let Some(chart_type) = props.chart_type {
            self.chart_type = chart_type;
        }
        self.version = props.version;
        if !props.dimensions.is_empty() {
            self.dimensions = canonicalize_dimensions(props.dimensions);
        }
        match (props.min_time, props.max_time) {
            (Some(min), Some(max)) => {
                if let Some(domain) = TimeDomain::new(min, max) {
                    self.time_domain = domain;
                } else {
                    warn!(min, max, "ignoring reversed time domain in loaded config");
                }
            }
            (Some(min), None) => {
                if self.time_domain.max.map_or(true, |max| min <= max) {
                    self.time_domain.min = Some(min);
                } else {
                    warn!(min, "ignoring min time beyond the current max");
                }
            }
            (None, Some(max)) => {
                if self.time_domain.min.map_or(true, |min| min <= max) {
                    self.time_domain.max = Some(max);
                } else {
                    warn!(max, "ignoring max time before the current min");
                }
            }
            (None, None) => {}
        }
        if !props.selected_entities.is_empty() {
            self.entity_selection = props.selected_entities;
        }
        debug!(
            chart_type = self.chart_type.name(),
            dimension_count = self.dimensions.len(),
            "loaded chart config"
        );
        self.notify(ConfigEvent::Loaded);
    }

    /// Snapshot of the whitelisted fields as a persistable transfer shape.
    #[must_use]
    pub fn to_props(&self) -> ChartConfigProps {
        ChartConfigProps {
            title: self.title.clone(),
            slug: self.slug.clone(),
            chart_type: Some(self.chart_type),
            version: self.version,
            dimensions: self.dimensions.clone(),
            min_time: self.time_domain.min,
            max_time: self.time_domain.max,
            selected_entities: self.entity_selection.clone(),
        }
    }

    /// Idempotent chart-type switch: re-setting the current type emits no
    /// event and leaves state untouched.
    pub fn set_chart_type(&mut self, chart_type: ChartType) {
        if self.chart_type == chart_type {
            return;
        }
        self.chart_type = chart_type;
        trace!(chart_type = chart_type.name(), "set chart type");
        self.notify(ConfigEvent::ChartTypeChanged);
    }

    /// Chart-type switch by external name. Unknown names are a logged no-op.
    pub fn set_chart_type_str(&mut self, name: &str) {
        match ChartType::parse(name) {
            Some(chart_type) => self.set_chart_type(chart_type),
            None => warn!(name, "ignoring unknown chart type"),
        }
    }

    /// Binds the chart to a single indicator: one y dimension carrying the
    /// indicator's variable id, and the indicator title as chart title.
    ///
    /// Deliberately leaves `time_domain` alone: a time bracket applied from
    /// the query string survives indicator switches.
    pub fn set_indicator(&mut self, indicator: &Indicator) {
        self.dimensions = vec![Dimension::y(indicator.id)];
        self.title = Some(indicator.title.clone());
        debug!(
            variable_id = indicator.id,
            title = %indicator.title,
            "set indicator"
        );
        self.notify(ConfigEvent::DimensionsChanged);
    }

    /// Records an indicator selection whose catalog entry is not resident
    /// yet. `resolve_indicator` turns it into the sole dimension once the
    /// catalog is available.
    pub fn set_pending_indicator(&mut self, id: VariableId) {
        self.pending_indicator_id = Some(id);
    }

    #[must_use]
    pub fn pending_indicator_id(&self) -> Option<VariableId> {
        self.pending_indicator_id
    }

    /// Resolves a pending indicator selection against the catalog.
    ///
    /// An unknown id is a logged no-op; the pending slot is cleared either
    /// way so resolution does not retry forever.
    pub fn resolve_indicator(&mut self, catalog: &IndicatorCatalog) {
        let Some(id) = self.pending_indicator_id.take() else {
            return;
        };
        match catalog.by_id(id) {
            Some(indicator) => {
                let indicator = indicator.clone();
                self.set_indicator(&indicator);
            }
            None => warn!(variable_id = id, "ignoring unknown indicator id"),
        }
    }

    /// Convenience for hosts with a resident catalog: select by id directly.
    pub fn set_indicator_by_id(&mut self, id: VariableId, catalog: &IndicatorCatalog) {
        self.set_pending_indicator(id);
        self.resolve_indicator(catalog);
    }

    /// Drops all dimensions and the title, returning to the empty-chart state.
    pub fn clear_indicator(&mut self) {
        self.pending_indicator_id = None;
        if self.dimensions.is_empty() && self.title.is_none() {
            return;
        }
        self.dimensions.clear();
        self.title = None;
        self.notify(ConfigEvent::DimensionsChanged);
    }

    /// Sets both time endpoints. A reversed range is a logged no-op so the
    /// `min <= max` invariant holds unconditionally.
    pub fn set_time_domain(&mut self, min: Year, max: Year) {
        let Some(domain) = TimeDomain::new(min, max) else {
            warn!(min, max, "ignoring reversed time domain");
            return;
        };
        if self.time_domain == domain {
            return;
        }
        self.time_domain = domain;
        trace!(min, max, "set time domain");
        self.notify(ConfigEvent::TimeDomainChanged);
    }

    pub fn select_entity(&mut self, entity: impl Into<String>) {
        let entity = entity.into();
        if self.entity_selection.contains(&entity) {
            return;
        }
        self.entity_selection.push(entity);
        self.notify(ConfigEvent::EntitySelectionChanged);
    }

    pub fn deselect_entity(&mut self, entity: &str) {
        let before = self.entity_selection.len();
        self.entity_selection.retain(|e| e != entity);
        if self.entity_selection.len() != before {
            self.notify(ConfigEvent::EntitySelectionChanged);
        }
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        self.slug.as_deref()
    }

    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    #[must_use]
    pub fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    #[must_use]
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    #[must_use]
    pub fn time_domain(&self) -> TimeDomain {
        self.time_domain
    }

    #[must_use]
    pub fn entity_selection(&self) -> &[String] {
        &self.entity_selection
    }

    #[must_use]
    pub fn render_env(&self) -> &RenderEnvironment {
        &self.env
    }

    /// Distinct variable ids referenced by dimensions, in dimension order.
    /// This set drives data loading: whenever it changes, the binder is asked
    /// to `ensure_loaded` it.
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

    /// Derived preferred export size; pure function of current state.
    #[must_use]
    pub fn ideal_bounds(&self) -> Bounds {
        ideal_bounds(self.chart_type, &self.env)
    }

    #[must_use]
    pub fn context(&self) -> ConfigContext {
        ConfigContext {
            chart_type: self.chart_type,
            time_domain: self.time_domain,
            dimension_count: self.dimensions.len(),
            ideal_bounds: self.ideal_bounds(),
        }
    }

    fn notify(&mut self, event: ConfigEvent) {
        // Context is built after the mutation landed, so derived state is
        // already consistent when observers run.
        let context = self.context();
        let mut observers = std::mem::take(&mut self.observers);
        for observer in &mut observers {
            observer.on_change(event, context);
        }
        self.observers = observers;
    }
}

/// Drops duplicate `(variable id, property)` slots, last write wins.
fn canonicalize_dimensions(dimensions: Vec<Dimension>) -> Vec<Dimension> {
    let original_len = dimensions.len();
    let mut canonical: Vec<Dimension> = Vec::with_capacity(original_len);
    for dimension in dimensions {
        if let Some(existing) = canonical
            .iter_mut()
            .find(|d| d.variable_id == dimension.variable_id && d.property == dimension.property)
        {
            *existing = dimension;
            continue;
        }
        canonical.push(dimension);
    }
    if canonical.len() != original_len {
        warn!(
            original_count = original_len,
            canonical_count = canonical.len(),
            "dropped duplicate dimension slots"
        );
    }
    canonical
}
