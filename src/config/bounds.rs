use serde::{Deserialize, Serialize};

use crate::config::{ChartType, RenderEnvironment};
use crate::error::{ChartError, ChartResult};

/// Pixel bounds of an exported or embedded chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn validate(self) -> ChartResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ChartError::InvalidBounds {
                width: self.width,
                height: self.height,
            })
        }
    }

    #[must_use]
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Default embed size shared by the time-axis chart variants.
pub const DEFAULT_BOUNDS: Bounds = Bounds {
    width: 850,
    height: 600,
};

/// Map charts favor a wider aspect so the projection fills the frame.
pub const MAP_BOUNDS: Bounds = Bounds {
    width: 850,
    height: 520,
};

/// Fixed social media card size.
pub const MEDIA_CARD_BOUNDS: Bounds = Bounds {
    width: 1200,
    height: 630,
};

/// Derives the preferred export bounds for a chart.
///
/// Pure function of chart type and environment; always a positive size.
#[must_use]
pub fn ideal_bounds(chart_type: ChartType, env: &RenderEnvironment) -> Bounds {
    if env.is_media_card {
        return MEDIA_CARD_BOUNDS;
    }
    match chart_type {
        ChartType::WorldMap => MAP_BOUNDS,
        _ => DEFAULT_BOUNDS,
    }
}
