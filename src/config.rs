use log::Level;
use serde::Deserialize;

use crate::types::Color;

/// Session settings, deserialized from the page's config object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// Side that plays first from the standard position.
    pub first_to_move: Color,
    /// Console log level for the browser build.
    pub log_level: Level,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            first_to_move: Color::White,
            log_level: Level::Info,
        }
    }
}
