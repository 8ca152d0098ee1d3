use serde::{Deserialize, Serialize};

/// Explicit rendering environment passed into export entry points.
///
/// Replaces ambient global flags: hosts state up front whether they render
/// server-side, inside the editor, or as a media card, and where static
/// assets live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderEnvironment {
    pub is_server_side: bool,
    pub is_editor_mode: bool,
    pub is_media_card: bool,
    pub asset_root_url: String,
}

impl Default for RenderEnvironment {
    fn default() -> Self {
        Self {
            is_server_side: false,
            is_editor_mode: false,
            is_media_card: false,
            asset_root_url: String::new(),
        }
    }
}

impl RenderEnvironment {
    /// Environment used by the baking pipeline for local static export.
    #[must_use]
    pub fn for_export(asset_root_url: impl Into<String>) -> Self {
        Self {
            is_server_side: true,
            is_editor_mode: false,
            is_media_card: false,
            asset_root_url: asset_root_url.into(),
        }
    }

    #[must_use]
    pub fn media_card(mut self) -> Self {
        self.is_media_card = true;
        self
    }
}
