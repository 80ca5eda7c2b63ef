// File: crates/iris-core/src/theme.rs
// Summary: Fixed plot colors and CSS color-string parsing with opacity override.

use skia_safe as skia;

/// An sRGB color parsed from a CSS-like string. Alpha in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same RGB with alpha replaced by `opacity`.
    pub fn with_opacity(self, opacity: f64) -> skia::Color {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        skia::Color::from_argb(a, self.r, self.g, self.b)
    }

    pub fn to_color(self) -> skia::Color {
        self.with_opacity(self.a as f64)
    }

    /// CSS serialisation used by the SVG export and the stylesheet.
    pub fn css(self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

/// CSS `rgba()` form of a backend color.
pub fn css_color(c: skia::Color) -> String {
    let a = (c.a() as f64 / 255.0 * 100.0).round() / 100.0;
    format!("rgba({},{},{},{})", c.r(), c.g(), c.b(), a)
}

/// Parse `rgb(r,g,b)`, `rgba(r,g,b,a)`, `#rrggbb` or `#rgb`.
pub fn parse_color(s: &str) -> Option<Rgba> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = s.to_ascii_lowercase();
    let inner = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() < 3 || parts.len() > 4 {
        return None;
    }
    let channel = |p: &str| p.parse::<f64>().ok().filter(|v| (0.0..=255.0).contains(v)).map(|v| v.round() as u8);
    let a = match parts.get(3) {
        Some(p) => p.parse::<f32>().ok().filter(|v| (0.0..=1.0).contains(v))?,
        None => 1.0,
    };
    Some(Rgba::new(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?, a))
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    let digit = |i: usize, len: usize| u8::from_str_radix(hex.get(i..i + len)?, 16).ok();
    match hex.len() {
        6 => Some(Rgba::new(digit(0, 2)?, digit(2, 2)?, digit(4, 2)?, 1.0)),
        3 => {
            let expand = |v: u8| v * 17;
            Some(Rgba::new(expand(digit(0, 1)?), expand(digit(1, 1)?), expand(digit(2, 1)?), 1.0))
        }
        _ => None,
    }
}

/// Colors for the non-data parts of the plot.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub name: &'static str,
    /// Backdrop used when layers are flattened to an opaque image.
    pub background: skia::Color,
    pub axis_domain: skia::Color,
    pub axis_tick: skia::Color,
    pub axis_text: skia::Color,
    pub axis_title: skia::Color,
    pub grid: skia::Color,
    pub line_shadow: skia::Color,
    pub tooltip_stroke: skia::Color,
    /// Alpha of each band in the tooltip background gradient.
    pub tooltip_band_opacity: f64,
}

impl Theme {
    pub fn iris() -> Self {
        Self {
            name: "iris",
            background: skia::Color::from_argb(255, 255, 255, 255),
            axis_domain: skia::Color::from_argb(255, 0, 0, 0),
            // rgb(60,60,60) at 0.6 stroke opacity
            axis_tick: skia::Color::from_argb(153, 60, 60, 60),
            axis_text: skia::Color::from_argb(255, 0, 0, 0),
            axis_title: skia::Color::from_argb(153, 30, 30, 30),
            grid: skia::Color::from_argb(26, 10, 10, 40),
            line_shadow: skia::Color::from_argb(64, 104, 104, 104),
            tooltip_stroke: skia::Color::from_argb(166, 150, 150, 150),
            tooltip_band_opacity: 0.16,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::iris()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rgb_and_rgba() {
        assert_eq!(parse_color("rgb(10, 20, 30)"), Some(Rgba::new(10, 20, 30, 1.0)));
        assert_eq!(parse_color("rgba(174,174,174,0.45)"), Some(Rgba::new(174, 174, 174, 0.45)));
        assert_eq!(parse_color("#ff8000"), Some(Rgba::new(255, 128, 0, 1.0)));
        assert_eq!(parse_color("#fff"), Some(Rgba::new(255, 255, 255, 1.0)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_color("blue").is_none());
        assert!(parse_color("rgb(300,0,0)").is_none());
        assert!(parse_color("rgba(1,2,3,4)").is_none());
    }

    #[test]
    fn opacity_replaces_alpha() {
        let c = Rgba::new(200, 100, 50, 0.3).with_opacity(0.5);
        assert_eq!(c.a(), 128);
        assert_eq!((c.r(), c.g(), c.b()), (200, 100, 50));
    }

    #[test]
    fn backend_colors_serialise_as_css() {
        assert_eq!(css_color(Theme::iris().axis_title), "rgba(30,30,30,0.6)");
        assert_eq!(css_color(skia::Color::BLACK), "rgba(0,0,0,1)");
    }
}
