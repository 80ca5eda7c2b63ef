// File: crates/iris-core/src/axis.rs
// Summary: Vector axes layer (domain lines, ticks, tick labels, titles), painted with skia or exported as SVG.

use std::fmt::Write;

use skia_safe as skia;

use crate::layout::Layout;
use crate::scale::ContinuousScale;
use crate::text::{pt_to_px, Anchor, TextShaper};
use crate::theme::{css_color, Theme};

pub const X_TICKS: usize = 9;
pub const Y_TICKS: usize = 5;
pub const TICK_SIZE: f64 = 6.0;
pub const TICK_PADDING: f64 = 3.0;
/// Tick stroke width.
const TICK_WIDTH: f32 = 2.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub value: f64,
    /// Offset along the axis in interior pixels.
    pub pos: f64,
    pub label: String,
}

/// One frame of the axes layer, in interior coordinates (origin at the top-left of the
/// plotting area). `paint` and `to_svg` shift it by the left/top margins.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisScene {
    pub width: u32,
    pub height: u32,
    pub offset: (f64, f64),
    pub extent: (f64, f64),
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub x_title: String,
    pub y_title: String,
    pub family: String,
    /// Tick label size in points.
    pub tick_font_pt: f32,
    /// Title size in points.
    pub title_font_pt: f32,
}

fn make_ticks(scale: &ContinuousScale, count: usize) -> Vec<Tick> {
    let format = scale.tick_format(count);
    scale
        .ticks(count)
        .into_iter()
        .map(|value| Tick { value, pos: scale.map(value), label: format(value) })
        .collect()
}

impl AxisScene {
    /// Build the axes for the already rescaled `sx` / `sy`.
    pub fn build(layout: &Layout, sx: &ContinuousScale, sy: &ContinuousScale) -> Self {
        let ext = layout.extents();
        Self {
            width: layout.width,
            height: layout.height,
            offset: (layout.margin.left as f64, layout.margin.top as f64),
            extent: (ext.width_f(), ext.height_f()),
            x_range: sx.range(),
            y_range: sy.range(),
            x_ticks: make_ticks(sx, X_TICKS),
            y_ticks: make_ticks(sy, Y_TICKS),
            x_title: layout.xaxis.title.clone(),
            y_title: layout.yaxis.title.clone(),
            family: layout.font.family.clone(),
            tick_font_pt: layout.font.size * 0.9,
            title_font_pt: layout.font.size,
        }
    }

    /// Baseline anchor of the x title: `h/13` from the left, 5 px above the bottom.
    pub fn x_title_pos(&self) -> (f64, f64) {
        let h = self.extent.1;
        (h / 13.0, h - 5.0)
    }

    /// Position of the y title in its rotated (-90°) frame, before the 20 px `dy`.
    pub fn y_title_pos(&self) -> (f64, f64) {
        (-self.extent.1 * 12.0 / 13.0, 0.0)
    }

    pub fn paint(&self, canvas: &skia::Canvas, shaper: &TextShaper, theme: &Theme) {
        let h = self.extent.1 as f32;
        let tick_px = pt_to_px(self.tick_font_pt);
        let title_px = pt_to_px(self.title_font_pt);
        let size = TICK_SIZE as f32;
        let gap = (TICK_SIZE + TICK_PADDING) as f32;

        canvas.save();
        canvas.translate((self.offset.0 as f32, self.offset.1 as f32));

        let mut domain = skia::Paint::default();
        domain.set_anti_alias(true);
        domain.set_style(skia::paint::Style::Stroke);
        domain.set_stroke_width(1.0);
        domain.set_color(theme.axis_domain);
        let mut tick = domain.clone();
        tick.set_stroke_width(TICK_WIDTH);
        tick.set_color(theme.axis_tick);

        // x axis along the bottom edge
        let (x0, x1) = (self.x_range.0 as f32, self.x_range.1 as f32);
        let mut path = skia::Path::new();
        path.move_to((x0, h + size));
        path.line_to((x0, h));
        path.line_to((x1, h));
        path.line_to((x1, h + size));
        canvas.draw_path(&path, &domain);
        for t in &self.x_ticks {
            let x = t.pos as f32;
            canvas.draw_line((x, h), (x, h + size), &tick);
            shaper.draw(canvas, &t.label, x, h + gap + tick_px * 0.5, tick_px, theme.axis_text, Anchor::Middle, None);
        }

        // y axis along the left edge
        let (y0, y1) = (self.y_range.0 as f32, self.y_range.1 as f32);
        let mut path = skia::Path::new();
        path.move_to((-size, y0));
        path.line_to((0.0, y0));
        path.line_to((0.0, y1));
        path.line_to((-size, y1));
        canvas.draw_path(&path, &domain);
        for t in &self.y_ticks {
            let y = t.pos as f32;
            canvas.draw_line((0.0, y), (-size, y), &tick);
            shaper.draw(canvas, &t.label, -gap, y, tick_px, theme.axis_text, Anchor::End, None);
        }

        // titles sit on their baselines; shift up by roughly the descent-to-middle distance
        let (tx, ty) = self.x_title_pos();
        let lift = title_px * 0.35;
        shaper.draw(canvas, &self.x_title, tx as f32, ty as f32 - lift, title_px, theme.axis_title, Anchor::Start, None);
        canvas.save();
        canvas.rotate(-90.0, None);
        let (yx, yy) = self.y_title_pos();
        shaper.draw(canvas, &self.y_title, yx as f32, yy as f32 + 20.0 - lift, title_px, theme.axis_title, Anchor::Start, None);
        canvas.restore();

        canvas.restore();
    }

    /// Standalone SVG document of the axes layer, sized like the whole plot.
    pub fn to_svg(&self, theme: &Theme) -> String {
        let h = self.extent.1;
        let tick_stroke = css_color(theme.axis_tick);
        let domain = css_color(theme.axis_domain);
        let text = css_color(theme.axis_text);
        let title = css_color(theme.axis_title);
        let family = escape(&self.family);
        let mut s = String::new();
        let _ = writeln!(
            s,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}px" height="{}px" class="svg-container">"#,
            self.width, self.height
        );
        let _ = writeln!(s, r#"<g transform="translate({},{})">"#, num(self.offset.0), num(self.offset.1));

        let _ = writeln!(
            s,
            r#"<g class="axes x-axis" transform="translate(0,{})" fill="none" font-family="{family}" font-size="{}pt" text-anchor="middle">"#,
            num(h),
            num(self.tick_font_pt as f64)
        );
        let _ = writeln!(
            s,
            r#"<path class="domain" stroke="{domain}" d="M{x0},{t}V0H{x1}V{t}"/>"#,
            x0 = num(self.x_range.0),
            x1 = num(self.x_range.1),
            t = num(TICK_SIZE)
        );
        for t in &self.x_ticks {
            let _ = writeln!(
                s,
                r#"<g class="tick" transform="translate({},0)"><line stroke="{tick_stroke}" stroke-width="{TICK_WIDTH}" y2="{}"/><text fill="{text}" y="{}" dy="0.71em">{}</text></g>"#,
                num(t.pos),
                num(TICK_SIZE),
                num(TICK_SIZE + TICK_PADDING),
                escape(&t.label)
            );
        }
        s.push_str("</g>\n");

        let _ = writeln!(
            s,
            r#"<g class="axes y-axis" fill="none" font-family="{family}" font-size="{}pt" text-anchor="end">"#,
            num(self.tick_font_pt as f64)
        );
        let _ = writeln!(
            s,
            r#"<path class="domain" stroke="{domain}" d="M-{t},{y0}H0V{y1}H-{t}"/>"#,
            y0 = num(self.y_range.0),
            y1 = num(self.y_range.1),
            t = num(TICK_SIZE)
        );
        for t in &self.y_ticks {
            let _ = writeln!(
                s,
                r#"<g class="tick" transform="translate(0,{})"><line stroke="{tick_stroke}" stroke-width="{TICK_WIDTH}" x2="-{}"/><text fill="{text}" x="-{}" dy="0.32em">{}</text></g>"#,
                num(t.pos),
                num(TICK_SIZE),
                num(TICK_SIZE + TICK_PADDING),
                escape(&t.label)
            );
        }
        s.push_str("</g>\n");

        let (tx, ty) = self.x_title_pos();
        let _ = writeln!(
            s,
            r#"<g class="x-label" font-family="{family}" font-size="{}pt"><text x="{}" y="{}" fill="{title}" text-anchor="start">{}</text></g>"#,
            num(self.title_font_pt as f64),
            num(tx),
            num(ty),
            escape(&self.x_title)
        );
        let (yx, _) = self.y_title_pos();
        let _ = writeln!(
            s,
            r#"<g class="y-label" font-family="{family}" font-size="{}pt"><text transform="rotate(-90)" x="{}" dy="20" fill="{title}" text-anchor="start">{}</text></g>"#,
            num(self.title_font_pt as f64),
            num(yx),
            escape(&self.y_title)
        );
        s.push_str("</g>\n</svg>\n");
        s
    }
}

fn num(v: f64) -> String {
    let r = (v * 1000.0).round() / 1000.0;
    if r == 0.0 { "0".to_string() } else { format!("{r}") }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutOptions;

    fn scene() -> AxisScene {
        let layout = Layout::from_options(&LayoutOptions::default().size(400, 300)).unwrap();
        let ext = layout.extents();
        let sx = ContinuousScale::linear((0.0, 10.0), (0.0, ext.width_f()));
        let sy = ContinuousScale::linear((-1.0, 1.0), (ext.height_f(), 0.0));
        AxisScene::build(&layout, &sx, &sy)
    }

    #[test]
    fn tick_counts_and_positions() {
        let s = scene();
        assert_eq!(s.x_ticks.first().map(|t| t.label.as_str()), Some("0"));
        assert_eq!(s.x_ticks.len(), 11);
        assert_eq!(s.x_ticks.last().map(|t| t.pos), Some(315.0));
        let labels: Vec<&str> = s.y_ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["-1.0", "-0.5", "0.0", "0.5", "1.0"]);
        assert_eq!(s.y_ticks[0].pos, 215.0);
    }

    #[test]
    fn title_positions() {
        let s = scene();
        assert_eq!(s.x_title_pos(), (215.0 / 13.0, 210.0));
        assert_eq!(s.y_title_pos().0, -215.0 * 12.0 / 13.0);
        assert_eq!(s.tick_font_pt, 16.0 * 0.9);
    }

    #[test]
    fn svg_contains_axes_and_escaped_titles() {
        let mut s = scene();
        s.x_title = "a<b".into();
        let svg = s.to_svg(&Theme::iris());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"class="axes x-axis" transform="translate(0,215)""#));
        assert!(svg.contains("a&lt;b"));
        assert!(svg.contains(r#"transform="rotate(-90)""#));
        assert_eq!(svg.matches(r#"class="tick""#).count(), s.x_ticks.len() + s.y_ticks.len());
    }
}
