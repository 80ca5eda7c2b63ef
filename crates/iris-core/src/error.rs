// File: crates/iris-core/src/error.rs
// Summary: Error taxonomy for binding, scale construction, layout validation and rendering.

use thiserror::Error;

/// Malformed series input. The previously bound data stays untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    #[error("series {index} ({name:?}): x has {x_len} values but y has {y_len}")]
    LengthMismatch { index: usize, name: String, x_len: usize, y_len: usize },
    #[error("series {index} ({name:?}): mode requests lines but no line style was given")]
    MissingLine { index: usize, name: String },
    #[error("series {index} ({name:?}): marker style is required")]
    MissingMarker { index: usize, name: String },
    #[error("series {index} ({name:?}): unrecognised color {color:?}")]
    BadColor { index: usize, name: String, color: String },
    #[error("series {index} ({name:?}): {field} must be a finite, non-negative number")]
    BadSize { index: usize, name: String, field: &'static str },
}

/// A log scale was requested over a domain that touches zero or negative values.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("log scale domain [{min}, {max}] must be strictly positive")]
pub struct ScaleDomainError {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("plot size must be non-zero, got {width}x{height}")]
    EmptySize { width: u32, height: u32 },
    #[error("margins ({horizontal}px horizontal, {vertical}px vertical) exceed plot size {width}x{height}")]
    MarginsTooLarge { horizontal: u64, vertical: u64, width: u32, height: u32 },
    #[error("font size must be positive, got {0}")]
    BadFontSize(f32),
    #[error("{axis} zero line color {color:?} is not a valid color")]
    BadZerolineColor { axis: &'static str, color: String },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to allocate {width}x{height} raster surface")]
    Surface { width: i32, height: i32 },
    #[error(transparent)]
    Scale(#[from] ScaleDomainError),
    #[error("failed to read back surface pixels")]
    ReadPixels,
}

/// Umbrella error for the plot facade.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error(transparent)]
    Bind(#[from] BindError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("host data is malformed: {0}")]
    HostData(#[from] serde_json::Error),
}
