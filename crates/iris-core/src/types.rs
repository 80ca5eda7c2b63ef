// File: crates/iris-core/src/types.rs
// Summary: Shared defaults and small value types (sizes, margins, extents).

use serde::Deserialize;

/// Default plot width in pixels.
pub const WIDTH: u32 = 1226;
/// Default plot height in pixels.
pub const HEIGHT: u32 = 717;
pub const FONT_FAMILY: &str = "Times New Roman";
/// Font size in points.
pub const FONT_SIZE: f32 = 16.0;
pub const ZEROLINE_COLOR: &str = "rgba(174,174,174,0.45)";
/// Raster drawing stops this many pixels short of the right edge of the plot interior.
pub const RIGHT_GUTTER_PX: f32 = 6.0;

/// Screen margins, in pixels. Host JSON uses the short keys `t`, `r`, `b`, `l`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Insets {
    #[serde(rename = "l")]
    pub left: u32,
    #[serde(rename = "r")]
    pub right: u32,
    #[serde(rename = "t")]
    pub top: u32,
    #[serde(rename = "b")]
    pub bottom: u32,
}

impl Insets {
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
    /// Total horizontal inset (left + right), widened so host-supplied margins cannot overflow.
    pub const fn hsum(&self) -> u64 { self.left as u64 + self.right as u64 }
    /// Total vertical inset (top + bottom).
    pub const fn vsum(&self) -> u64 { self.top as u64 + self.bottom as u64 }
}

impl Default for Insets {
    fn default() -> Self {
        Self::new(60, 25, 25, 60)
    }
}

/// Interior drawing rectangle size after subtracting margins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Extents {
    pub width: u32,
    pub height: u32,
}

impl Extents {
    pub fn width_f(&self) -> f64 { self.width as f64 }
    pub fn height_f(&self) -> f64 { self.height as f64 }
}

/// Pointer affordance requested from the host for the interactive surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorStyle {
    #[default]
    Grab,
    Grabbing,
}
