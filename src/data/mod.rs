mod binder;
mod bundle;
mod indicator;
mod variable;

pub use binder::{DataEvent, DataObserver, LoadStatus, LoadTicket, VariableDataBinder};
pub use bundle::{TimeSeriesBundle, TimeSeriesPoint};
pub use indicator::{Indicator, IndicatorCatalog};
pub use variable::{VariableData, VariableDataPayload, VariableId};
