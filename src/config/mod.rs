mod bounds;
mod chart_type;
mod dimension;
mod json_contract;
pub mod query_string;
mod render_env;
mod store;
mod time_domain;

pub use bounds::{ideal_bounds, Bounds, DEFAULT_BOUNDS, MAP_BOUNDS, MEDIA_CARD_BOUNDS};
pub use chart_type::{ChartType, ALL_CHART_TYPES};
pub use dimension::{Dimension, DimensionDisplay, DimensionProperty};
pub use json_contract::{ChartConfigProps, PersistedChartRecord, CONFIG_SCHEMA_VERSION};
pub use query_string::PartialChartQuery;
pub use render_env::RenderEnvironment;
pub use store::{ChartConfigStore, ConfigContext, ConfigEvent, ConfigObserver};
pub use time_domain::{TimeDomain, Year};
