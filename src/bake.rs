//! Pure helpers for the offline baking pipeline.
//!
//! Database access, CLI argument handling, file writing, and PNG conversion
//! all stay with the caller; this module covers slug resolution, export
//! naming, and the configuration-to-markup path.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{query_string, ChartConfigProps, ChartConfigStore, RenderEnvironment};
use crate::data::{VariableDataBinder, VariableDataPayload};
use crate::error::ChartResult;
use crate::view::ChartView;

/// Row of the slug-redirect lookup table: an old slug pointing at a chart id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlugRedirect {
    pub slug: String,
    pub chart_id: u64,
}

/// Chart lookup by slug, with redirect slugs resolved through chart ids.
#[derive(Debug, Clone, Default)]
pub struct ChartIndex {
    by_slug: IndexMap<String, ChartConfigProps>,
}

impl ChartIndex {
    /// Builds the index the way the bake pipeline does: every chart under
    /// its own slug first, then redirect slugs aliased to the chart they
    /// point at. A redirect to an unknown chart id is dropped with a log.
    #[must_use]
    pub fn from_rows(
        charts: Vec<crate::config::PersistedChartRecord>,
        redirects: Vec<SlugRedirect>,
    ) -> Self {
        let mut by_id: IndexMap<u64, ChartConfigProps> = IndexMap::new();
        let mut by_slug: IndexMap<String, ChartConfigProps> = IndexMap::new();
        for record in charts {
            by_id.insert(record.id, record.config.clone());
            by_slug.insert(record.slug, record.config);
        }
        for redirect in redirects {
            match by_id.get(&redirect.chart_id) {
                Some(config) => {
                    by_slug.insert(redirect.slug, config.clone());
                }
                None => warn!(
                    slug = %redirect.slug,
                    chart_id = redirect.chart_id,
                    "dropping redirect to unknown chart"
                ),
            }
        }
        debug!(slugs = by_slug.len(), "built chart index");
        Self { by_slug }
    }

    #[must_use]
    pub fn by_slug(&self, slug: &str) -> Option<&ChartConfigProps> {
        self.by_slug.get(slug)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_slug.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_slug.is_empty()
    }
}

/// Output name for one baked chart: slug, optional sanitized query string,
/// and the config schema version.
#[must_use]
pub fn export_filename(slug: &str, query_str: Option<&str>, version: u32) -> String {
    match query_str.filter(|q| !q.is_empty()) {
        Some(query) => format!("{slug}_{}_v{version}.svg", sanitize_for_filename(query)),
        None => format!("{slug}_v{version}.svg"),
    }
}

/// Result of one static export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticExport {
    pub svg: String,
    pub width: u32,
    pub height: u32,
}

/// Builds a chart from persisted config, overlays an optional query string,
/// ingests the supplied data synchronously, and returns the markup with its
/// ideal bounds for the caller to persist or rasterize.
pub fn chart_to_svg(
    props: ChartConfigProps,
    payload: VariableDataPayload,
    query_str: Option<&str>,
    env: &RenderEnvironment,
) -> ChartResult<StaticExport> {
    let mut store = ChartConfigStore::from_props(props, env.clone());
    if let Some(query) = query_str {
        query_string::apply(query_string::decode(query), &mut store);
    }

    let mut binder = VariableDataBinder::new();
    binder.receive_data(payload)?;

    let view = ChartView::new(store);
    let bounds = view.ideal_bounds(env);
    let svg = view.static_markup(&binder, env)?;
    Ok(StaticExport {
        svg,
        width: bounds.width,
        height: bounds.height,
    })
}

/// Media-card variant: fixed card bounds, otherwise the same export path.
pub fn bake_media_card(
    props: ChartConfigProps,
    payload: VariableDataPayload,
    asset_root_url: &str,
) -> ChartResult<StaticExport> {
    let env = RenderEnvironment::for_export(asset_root_url).media_card();
    chart_to_svg(props, payload, None, &env)
}

/// Replaces anything outside `[A-Za-z0-9._-]` with `_` so query strings can
/// safely appear in output filenames.
fn sanitize_for_filename(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
