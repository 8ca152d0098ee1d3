use crate::config::Bounds;
use crate::error::ChartResult;
use crate::render::{PolygonPrimitive, PolylinePrimitive, RectPrimitive, TextPrimitive};

/// Backend-agnostic scene for one static export pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub bounds: Bounds,
    pub polylines: Vec<PolylinePrimitive>,
    pub polygons: Vec<PolygonPrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            polylines: Vec::new(),
            polygons: Vec::new(),
            rects: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_polyline(mut self, polyline: PolylinePrimitive) -> Self {
        self.polylines.push(polyline);
        self
    }

    #[must_use]
    pub fn with_polygon(mut self, polygon: PolygonPrimitive) -> Self {
        self.polygons.push(polygon);
        self
    }

    #[must_use]
    pub fn with_rect(mut self, rect: RectPrimitive) -> Self {
        self.rects.push(rect);
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: TextPrimitive) -> Self {
        self.texts.push(text);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.bounds.validate()?;

        for polyline in &self.polylines {
            polyline.validate()?;
        }
        for polygon in &self.polygons {
            polygon.validate()?;
        }
        for rect in &self.rects {
            rect.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.polylines.is_empty()
            && self.polygons.is_empty()
            && self.rects.is_empty()
            && self.texts.is_empty()
    }
}
