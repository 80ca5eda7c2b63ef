// File: crates/iris-core/src/layout.rs
// Summary: Plot layout (size, margins, font, per-axis config), defaults, validation and patching.

use serde::Deserialize;

use crate::error::LayoutError;
use crate::scale::ScaleKind;
use crate::theme::{parse_color, Rgba};
use crate::types::{Extents, Insets, FONT_FAMILY, FONT_SIZE, HEIGHT, WIDTH, ZEROLINE_COLOR};

#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    pub family: String,
    /// Size in points.
    pub size: f32,
}

impl Default for Font {
    fn default() -> Self {
        Self { family: FONT_FAMILY.to_string(), size: FONT_SIZE }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AxisConfig {
    pub title: String,
    pub zeroline: bool,
    pub zeroline_color: Rgba,
    pub scale: ScaleKind,
    pub grid: bool,
}

impl AxisConfig {
    fn with_title(title: &str) -> Self {
        Self {
            title: title.to_string(),
            zeroline: true,
            zeroline_color: parse_color(ZEROLINE_COLOR).unwrap_or(Rgba::new(174, 174, 174, 0.45)),
            scale: ScaleKind::Linear,
            grid: false,
        }
    }

    fn resolve(opts: &AxisOptions, axis: &'static str, default_title: &str) -> Result<Self, LayoutError> {
        let mut cfg = Self::with_title(opts.title.as_deref().unwrap_or(default_title));
        if let Some(color) = &opts.zerolinecolor {
            cfg.zeroline_color = parse_color(color)
                .ok_or_else(|| LayoutError::BadZerolineColor { axis, color: color.clone() })?;
        }
        cfg.zeroline = opts.zeroline.unwrap_or(true);
        cfg.scale = opts.scale.unwrap_or_default();
        cfg.grid = opts.grid.unwrap_or(false);
        Ok(cfg)
    }
}

/// Partial font config as supplied by a caller.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FontOptions {
    pub family: Option<String>,
    pub size: Option<f32>,
}

/// Partial axis config as supplied by a caller.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AxisOptions {
    pub title: Option<String>,
    pub zerolinecolor: Option<String>,
    pub zeroline: Option<bool>,
    pub scale: Option<ScaleKind>,
    pub grid: Option<bool>,
}

/// Layout options, used both for construction and as an `update` patch.
///
/// Top-level fields merge shallowly: a provided `xaxis` replaces the whole axis config,
/// and any field it leaves out falls back to its default rather than to the old value.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub margin: Option<Insets>,
    pub font: Option<FontOptions>,
    pub xaxis: Option<AxisOptions>,
    pub yaxis: Option<AxisOptions>,
}

impl LayoutOptions {
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn margin(mut self, margin: Insets) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn xaxis(mut self, axis: AxisOptions) -> Self {
        self.xaxis = Some(axis);
        self
    }

    pub fn yaxis(mut self, axis: AxisOptions) -> Self {
        self.yaxis = Some(axis);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub margin: Insets,
    pub font: Font,
    pub xaxis: AxisConfig,
    pub yaxis: AxisConfig,
    extents: Extents,
}

impl Default for Layout {
    fn default() -> Self {
        let mut layout = Self {
            width: WIDTH,
            height: HEIGHT,
            margin: Insets::default(),
            font: Font::default(),
            xaxis: AxisConfig::with_title("X"),
            yaxis: AxisConfig::with_title("Y"),
            extents: Extents::default(),
        };
        layout.extents = compute_extents(layout.width, layout.height, &layout.margin);
        layout
    }
}

impl Layout {
    /// Resolve every field of `opts` against the documented defaults and validate.
    pub fn from_options(opts: &LayoutOptions) -> Result<Self, LayoutError> {
        let mut layout = Self::default();
        layout.apply(opts)?;
        Ok(layout)
    }

    /// Shallow-merge `patch` into this layout. On error the layout is left unchanged.
    pub fn apply(&mut self, patch: &LayoutOptions) -> Result<(), LayoutError> {
        let mut next = self.clone();
        if let Some(w) = patch.width { next.width = w; }
        if let Some(h) = patch.height { next.height = h; }
        if let Some(m) = patch.margin { next.margin = m; }
        if let Some(f) = &patch.font {
            next.font = Font {
                family: f.family.clone().unwrap_or_else(|| FONT_FAMILY.to_string()),
                size: f.size.unwrap_or(FONT_SIZE),
            };
        }
        if let Some(x) = &patch.xaxis { next.xaxis = AxisConfig::resolve(x, "x", "X")?; }
        if let Some(y) = &patch.yaxis { next.yaxis = AxisConfig::resolve(y, "y", "Y")?; }
        next.validate()?;
        next.extents = compute_extents(next.width, next.height, &next.margin);
        *self = next;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.width == 0 || self.height == 0 {
            return Err(LayoutError::EmptySize { width: self.width, height: self.height });
        }
        if self.margin.hsum() > u64::from(self.width) || self.margin.vsum() > u64::from(self.height) {
            return Err(LayoutError::MarginsTooLarge {
                horizontal: self.margin.hsum(),
                vertical: self.margin.vsum(),
                width: self.width,
                height: self.height,
            });
        }
        if !(self.font.size.is_finite() && self.font.size > 0.0) {
            return Err(LayoutError::BadFontSize(self.font.size));
        }
        Ok(())
    }

    pub fn extents(&self) -> Extents {
        self.extents
    }
}

fn compute_extents(width: u32, height: u32, margin: &Insets) -> Extents {
    Extents {
        width: u64::from(width).saturating_sub(margin.hsum()) as u32,
        height: u64::from(height).saturating_sub(margin.vsum()) as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let l = Layout::from_options(&LayoutOptions::default()).unwrap();
        assert_eq!((l.width, l.height), (1226, 717));
        assert_eq!(l.margin, Insets::new(60, 25, 25, 60));
        assert_eq!(l.font.family, "Times New Roman");
        assert_eq!(l.xaxis.title, "X");
        assert_eq!(l.yaxis.title, "Y");
        assert!(l.xaxis.zeroline && !l.xaxis.grid);
        assert_eq!(l.yaxis.scale, ScaleKind::Linear);
        assert_eq!(l.extents(), Extents { width: 1141, height: 632 });
    }

    #[test]
    fn patch_recomputes_extents_and_defaults_nested_fields() {
        let mut l = Layout::default();
        l.apply(&LayoutOptions {
            xaxis: Some(AxisOptions { grid: Some(true), ..Default::default() }),
            ..Default::default()
        }
        .size(400, 300))
        .unwrap();
        assert_eq!(l.extents(), Extents { width: 315, height: 215 });
        assert!(l.xaxis.grid);
        assert_eq!(l.xaxis.title, "X");
    }

    #[test]
    fn oversized_margins_are_rejected_without_mutation() {
        let mut l = Layout::default();
        let err = l.apply(&LayoutOptions::default().size(50, 50)).unwrap_err();
        assert!(matches!(err, LayoutError::MarginsTooLarge { .. }));
        assert_eq!(l.width, 1226);
    }

    #[test]
    fn margin_sums_do_not_wrap() {
        let opts: LayoutOptions =
            serde_json::from_str(r#"{"width":400,"height":300,"margin":{"l":4294967295,"r":1}}"#).unwrap();
        let err = Layout::from_options(&opts).unwrap_err();
        assert_eq!(
            err,
            LayoutError::MarginsTooLarge { horizontal: 4_294_967_296, vertical: 85, width: 400, height: 300 }
        );
    }

    #[test]
    fn deserializes_host_json() {
        let opts: LayoutOptions = serde_json::from_str(
            r#"{"width":800,"margin":{"t":10,"r":10,"b":40,"l":40},
                "yaxis":{"title":"Amplitude","scale":"log","grid":true}}"#,
        )
        .unwrap();
        let l = Layout::from_options(&opts).unwrap();
        assert_eq!(l.width, 800);
        assert_eq!(l.margin, Insets::new(40, 10, 10, 40));
        assert_eq!(l.yaxis.scale, ScaleKind::Log);
        assert_eq!(l.yaxis.title, "Amplitude");
        assert!(l.yaxis.zeroline);
    }
}
