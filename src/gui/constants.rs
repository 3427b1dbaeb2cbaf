//! GUI-specific constants for layout and colors

use egui;

/// Minimum window size
pub const WINDOW_MIN_WIDTH: f32 = 420.0;
pub const WINDOW_MIN_HEIGHT: f32 = 240.0;

/// Layout spacing
pub const SECTION_SPACING: f32 = 10.0;
pub const ITEM_SPACING: f32 = 6.0;

/// Status colors
pub const STATUS_OK: egui::Color32 = egui::Color32::from_rgb(0, 200, 0);
pub const STATUS_ERROR: egui::Color32 = egui::Color32::from_rgb(200, 0, 0);

/// Mode identifiers are drawn in red
pub const XID_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 40, 40);

/// Column markers
pub const PREFERRED_MARKER: &str = "\u{25CF}";
pub const CURRENT_MARKER: &str = "\u{2714}";
