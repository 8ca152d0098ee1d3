use thiserror::Error;

use crate::data::VariableId;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("persisted config schema version {found} is older than expected {expected}")]
    SchemaVersionMismatch { found: u32, expected: u32 },

    #[error("fetch failed for variable {variable_id}: {reason}")]
    FetchFailed {
        variable_id: VariableId,
        reason: String,
    },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid bounds: width={width}, height={height}")]
    InvalidBounds { width: u32, height: u32 },
}
