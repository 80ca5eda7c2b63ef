// File: crates/iris-core/src/text.rs
// Summary: Paragraph shaping for labels and tooltip rows, plus the numeric label formatting they use.

use skia_safe as skia;
use skia::textlayout::{FontCollection, Paragraph, ParagraphBuilder, ParagraphStyle, TextAlign, TextStyle};

/// CSS points to pixels.
pub fn pt_to_px(pt: f32) -> f32 {
    pt * 4.0 / 3.0
}

/// Horizontal anchor of a drawn label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

pub struct TextShaper {
    fonts: FontCollection,
    family: String,
}

impl TextShaper {
    pub fn new(family: impl Into<String>) -> Self {
        let mut fc = FontCollection::new();
        // Use system manager fallback
        fc.set_default_font_manager(skia::FontMgr::default(), None);
        Self { fonts: fc, family: family.into() }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn set_family(&mut self, family: impl Into<String>) {
        self.family = family.into();
    }

    fn make_style(&self, size_px: f32, color: skia::Color) -> TextStyle {
        let mut ts = TextStyle::new();
        ts.set_font_size(size_px.max(1.0));
        ts.set_color(color);
        ts.set_font_families(&[self.family.as_str(), "Times New Roman", "Liberation Serif", "DejaVu Serif", "serif"]);
        ts
    }

    pub fn layout(&self, text: &str, size_px: f32, color: skia::Color) -> Paragraph {
        let mut pstyle = ParagraphStyle::new();
        pstyle.set_text_align(TextAlign::Left);
        let mut builder = ParagraphBuilder::new(&pstyle, &self.fonts);
        builder.push_style(&self.make_style(size_px, color));
        builder.add_text(text);
        let mut paragraph = builder.build();
        paragraph.layout(10_000.0);
        paragraph
    }

    pub fn measure_width(&self, text: &str, size_px: f32) -> f32 {
        self.layout(text, size_px, skia::Color::TRANSPARENT).longest_line()
    }

    /// Draw `text` with its vertical middle at `y`. When `max_width` is given and the text
    /// is wider, it is squeezed horizontally to fit, like canvas `fillText` does.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        canvas: &skia::Canvas,
        text: &str,
        x: f32,
        y: f32,
        size_px: f32,
        color: skia::Color,
        anchor: Anchor,
        max_width: Option<f32>,
    ) {
        let mut p = self.layout(text, size_px, color);
        let w = p.longest_line();
        let h = p.height();
        let squeeze = match max_width {
            Some(m) if w > m && w > 0.0 => m / w,
            _ => 1.0,
        };
        let dx = match anchor {
            Anchor::Start => 0.0,
            Anchor::Middle => -w / 2.0,
            Anchor::End => -w,
        };
        canvas.save();
        canvas.translate((x, y));
        canvas.scale((squeeze, 1.0));
        p.paint(canvas, (dx, -h / 2.0));
        canvas.restore();
    }
}

/// `Number.prototype.toPrecision` formatting: `p` significant digits, switching to
/// exponent form (`1.23e+4`) when the exponent is below -6 or at least `p`.
pub fn to_precision(v: f64, p: usize) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let p = p.clamp(1, 100);
    let sci = format!("{:.*e}", p - 1, v);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let e: i32 = exp.parse().unwrap_or(0);
    if e < -6 || e >= p as i32 {
        let sign = if e < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{}", e.abs());
    }
    let decimals = (p as i32 - 1 - e).max(0) as usize;
    format!("{:.*}", decimals, v)
}

/// Left-pad `s` with spaces and keep the last `width` characters.
pub fn right_align(s: &str, width: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() >= width {
        chars[chars.len() - width..].iter().collect()
    } else {
        let mut out = " ".repeat(width - chars.len());
        out.extend(chars);
        out
    }
}
