use crate::config::{Bounds, ChartConfigStore, RenderEnvironment};
use crate::data::{LoadTicket, VariableDataBinder};
use crate::error::ChartResult;
use crate::render::{build_frame, frame_to_svg};

/// Facade tying one chart's configuration to the shared data binder.
///
/// Renderer variants are presentation templates over this view-model; the
/// only rendering surface the crate itself exposes is the static SVG export
/// consumed by the baking pipeline.
pub struct ChartView {
    store: ChartConfigStore,
}

impl ChartView {
    #[must_use]
    pub fn new(store: ChartConfigStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &ChartConfigStore {
        &self.store
    }

    #[must_use]
    pub fn store_mut(&mut self) -> &mut ChartConfigStore {
        &mut self.store
    }

    /// Asks the shared binder to make this chart's referenced variables
    /// resident. Call whenever the dimension set changes.
    pub fn ensure_data(&self, binder: &mut VariableDataBinder) -> LoadTicket {
        binder.ensure_loaded(&self.store.variable_ids())
    }

    /// Preferred export size for the current configuration and environment.
    #[must_use]
    pub fn ideal_bounds(&self, env: &RenderEnvironment) -> Bounds {
        crate::config::ideal_bounds(self.store.chart_type(), env)
    }

    /// Serialized vector-graphics document for the current state.
    ///
    /// An empty configuration (zero dimensions) or absent data still
    /// produces a valid document: the empty-chart frame.
    pub fn static_markup(
        &self,
        binder: &VariableDataBinder,
        env: &RenderEnvironment,
    ) -> ChartResult<String> {
        let frame = build_frame(&self.store, binder.active_bundle(), env)?;
        frame_to_svg(&frame)
    }
}
