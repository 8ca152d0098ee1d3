mod frame;
mod null_backend;
mod primitives;
mod scene;
mod svg_backend;

pub use frame::RenderFrame;
pub use null_backend::NullBackend;
pub use primitives::{
    Color, PolygonPrimitive, PolylinePrimitive, RectPrimitive, TextHAlign, TextPrimitive,
};
pub use scene::{build_frame, interpolate_gaps};
pub use svg_backend::{frame_to_svg, SvgBackend};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from the configuration and data models.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}
