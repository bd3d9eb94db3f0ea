//! Configuration for a layout session

use serde::Deserialize;

use super::types::EdgeInsets;

/// Reading direction, which decides where leading and trailing sit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutDirection {
    #[default]
    #[serde(alias = "ltr")]
    LeftToRight,
    #[serde(alias = "rtl")]
    RightToLeft,
}

/// Configuration options for a layout session
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Direction used to resolve leading/trailing attributes
    pub direction: LayoutDirection,

    /// Whether containers expose a safe-area guide; when false the legacy
    /// top/bottom guides are used instead
    pub safe_area_available: bool,

    /// Layout margins given to newly created views
    pub default_layout_margins: EdgeInsets,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: LayoutDirection::LeftToRight,
            safe_area_available: true,
            default_layout_margins: EdgeInsets::all(8.0),
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout direction
    pub fn with_direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set whether the host supports safe-area guides
    pub fn with_safe_area(mut self, available: bool) -> Self {
        self.safe_area_available = available;
        self
    }

    /// Set the layout margins for new views
    pub fn with_default_layout_margins(mut self, margins: EdgeInsets) -> Self {
        self.default_layout_margins = margins;
        self
    }
}
