use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless hosts.
///
/// It still validates frame content so tests can catch invalid geometry
/// without serializing markup.
#[derive(Debug, Default)]
pub struct NullBackend {
    pub last_polyline_count: usize,
    pub last_polygon_count: usize,
    pub last_rect_count: usize,
    pub last_text_count: usize,
}

impl Renderer for NullBackend {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.last_polyline_count = frame.polylines.len();
        self.last_polygon_count = frame.polygons.len();
        self.last_rect_count = frame.rects.len();
        self.last_text_count = frame.texts.len();
        Ok(())
    }
}
