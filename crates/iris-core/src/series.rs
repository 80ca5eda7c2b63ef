// File: crates/iris-core/src/series.rs
// Summary: Series input model (mode, line and marker styles) with validation for binding.

use serde::Deserialize;

use crate::error::BindError;
use crate::theme::{parse_color, Rgba};

/// Which layers a series is drawn on. Parsed by keyword search, so `"lines+markers"`
/// enables both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct Mode {
    pub lines: bool,
    pub markers: bool,
}

impl Mode {
    pub const LINES: Mode = Mode { lines: true, markers: false };
    pub const MARKERS: Mode = Mode { lines: false, markers: true };
    pub const BOTH: Mode = Mode { lines: true, markers: true };

    pub fn parse(s: &str) -> Self {
        let s = s.to_ascii_lowercase();
        Self { lines: s.contains("lines"), markers: s.contains("markers") }
    }
}

impl From<String> for Mode {
    fn from(s: String) -> Self {
        Mode::parse(&s)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashedDotted,
}

impl StrokeStyle {
    /// Dash intervals in pixels at zoom 1. Empty means a continuous stroke.
    pub fn intervals(&self) -> &'static [f32] {
        match self {
            StrokeStyle::Solid => &[],
            StrokeStyle::Dashed => &[18.0, 12.0],
            StrokeStyle::Dotted => &[2.0, 8.0],
            StrokeStyle::DashedDotted => &[18.0, 10.0, 1.0, 8.0, 1.0, 10.0],
        }
    }
}

impl TryFrom<String> for StrokeStyle {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_ascii_lowercase().as_str() {
            "solid" => Ok(StrokeStyle::Solid),
            "dashed" => Ok(StrokeStyle::Dashed),
            "dotted" => Ok(StrokeStyle::Dotted),
            "dashed-dotted" => Ok(StrokeStyle::DashedDotted),
            other => Err(format!("unknown line style {other:?}")),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Symbol {
    #[default]
    Circle,
    Cross,
    Diamond,
    Square,
    Star,
    Triangle,
    Wye,
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "cross" => Symbol::Cross,
            "diamond" => Symbol::Diamond,
            "square" => Symbol::Square,
            "star" => Symbol::Star,
            "triangle" => Symbol::Triangle,
            "y" | "wye" => Symbol::Wye,
            _ => Symbol::Circle,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LineStyle {
    pub width: f64,
    pub color: String,
    #[serde(default)]
    pub style: StrokeStyle,
    #[serde(default)]
    pub opacity: Option<f64>,
}

impl LineStyle {
    pub fn new(width: f64, color: impl Into<String>) -> Self {
        Self { width, color: color.into(), style: StrokeStyle::Solid, opacity: None }
    }

    pub fn dashed(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MarkerStyle {
    #[serde(default)]
    pub symbol: Symbol,
    pub size: f64,
    pub color: String,
    #[serde(default)]
    pub opacity: Option<f64>,
}

impl MarkerStyle {
    pub fn new(symbol: Symbol, size: f64, color: impl Into<String>) -> Self {
        Self { symbol, size, color: color.into(), opacity: None }
    }
}

/// One named trace supplied by the caller.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Series {
    pub name: String,
    pub mode: Mode,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(default)]
    pub line: Option<LineStyle>,
    #[serde(default)]
    pub marker: Option<MarkerStyle>,
}

impl Series {
    pub fn new(name: impl Into<String>, mode: Mode, x: Vec<f64>, y: Vec<f64>) -> Self {
        Self { name: name.into(), mode, x, y, line: None, marker: None }
    }

    pub fn with_line(mut self, line: LineStyle) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_marker(mut self, marker: MarkerStyle) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Resolve styles and check shape. `index` is the series position, used in errors.
    pub(crate) fn resolve(&self, index: usize) -> Result<ResolvedStyle, BindError> {
        let name = || self.name.clone();
        if self.x.len() != self.y.len() {
            return Err(BindError::LengthMismatch { index, name: name(), x_len: self.x.len(), y_len: self.y.len() });
        }
        let marker = self.marker.as_ref().ok_or_else(|| BindError::MissingMarker { index, name: name() })?;
        let marker_color = parse_color(&marker.color)
            .ok_or_else(|| BindError::BadColor { index, name: name(), color: marker.color.clone() })?;
        check_size(marker.size, index, &self.name, "marker.size")?;
        let line = match (&self.line, self.mode.lines) {
            (Some(line), _) => {
                let color = parse_color(&line.color)
                    .ok_or_else(|| BindError::BadColor { index, name: name(), color: line.color.clone() })?;
                check_size(line.width, index, &self.name, "line.width")?;
                Some(ResolvedLine {
                    width: line.width,
                    color,
                    opacity: line.opacity.unwrap_or(1.0),
                    style: line.style,
                })
            }
            (None, true) => return Err(BindError::MissingLine { index, name: name() }),
            (None, false) => None,
        };
        Ok(ResolvedStyle {
            line,
            marker: ResolvedMarker {
                symbol: marker.symbol,
                size: marker.size,
                color: marker_color,
                opacity: marker.opacity.unwrap_or(1.0),
            },
        })
    }
}

fn check_size(v: f64, index: usize, name: &str, field: &'static str) -> Result<(), BindError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(BindError::BadSize { index, name: name.to_string(), field })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedLine {
    pub width: f64,
    pub color: Rgba,
    pub opacity: f64,
    pub style: StrokeStyle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedMarker {
    pub symbol: Symbol,
    pub size: f64,
    /// Color as given, alpha included; the tooltip text uses it unmodified.
    pub color: Rgba,
    pub opacity: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ResolvedStyle {
    pub line: Option<ResolvedLine>,
    pub marker: ResolvedMarker,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker() -> MarkerStyle {
        MarkerStyle::new(Symbol::Circle, 6.0, "rgb(200,30,30)")
    }

    #[test]
    fn mode_is_keyword_matched() {
        assert_eq!(Mode::parse("lines+markers"), Mode::BOTH);
        assert_eq!(Mode::parse("Markers"), Mode::MARKERS);
        assert_eq!(Mode::parse("none"), Mode::default());
    }

    #[test]
    fn unknown_symbol_falls_back_to_circle() {
        assert_eq!(Symbol::from("hexagon".to_string()), Symbol::Circle);
        assert_eq!(Symbol::from("y".to_string()), Symbol::Wye);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let s = Series::new("a", Mode::MARKERS, vec![1.0, 2.0], vec![1.0]).with_marker(marker());
        assert!(matches!(s.resolve(3), Err(BindError::LengthMismatch { index: 3, x_len: 2, y_len: 1, .. })));
    }

    #[test]
    fn lines_mode_requires_line_style() {
        let s = Series::new("a", Mode::LINES, vec![1.0], vec![1.0]).with_marker(marker());
        assert!(matches!(s.resolve(0), Err(BindError::MissingLine { .. })));
        let s = Series::new("a", Mode::LINES, vec![1.0], vec![1.0]).with_line(LineStyle::new(2.0, "rgb(0,0,0)"));
        assert!(matches!(s.resolve(0), Err(BindError::MissingMarker { .. })));
    }

    #[test]
    fn deserializes_series_json() {
        let s: Series = serde_json::from_str(
            r#"{"name":"A","mode":"lines+markers","x":[1,2],"y":[3,4],
                "line":{"width":2,"color":"rgb(0,0,255)","style":"dashed-dotted"},
                "marker":{"symbol":"star","size":8,"color":"rgb(0,0,255)","opacity":0.5}}"#,
        )
        .unwrap();
        assert_eq!(s.mode, Mode::BOTH);
        assert_eq!(s.line.as_ref().map(|l| l.style), Some(StrokeStyle::DashedDotted));
        let style = s.resolve(0).unwrap();
        assert_eq!(style.marker.symbol, Symbol::Star);
        assert_eq!(style.marker.opacity, 0.5);
    }
}
