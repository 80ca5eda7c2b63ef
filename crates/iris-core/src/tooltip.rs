// File: crates/iris-core/src/tooltip.rs
// Summary: Hover hit testing and the animated multi-series tooltip box drawn on the point layer.

use std::collections::HashSet;
use std::time::Duration;

use skia_safe as skia;

use crate::animation::{AnimationTask, Easing};
use crate::binder::DataBinder;
use crate::geometry::{Affine, Point};
use crate::render::FrameScales;
use crate::text::{pt_to_px, right_align, to_precision, Anchor, TextShaper};
use crate::theme::{Rgba, Theme};
use crate::types::Extents;

pub const MORPH_DURATION: Duration = Duration::from_millis(200);

/// Gap between the anchor corner and the text fields.
const TIP_OFFSET: f64 = 19.0;
const FIELD_GAP: f64 = 10.0;
const TEXT_FIELD: f64 = 66.0;
const BOX_OFFSET: f64 = 10.0;
const RADIUS_OFFSET: f64 = 25.0;
const TIP_HEIGHT: f64 = 80.0;
/// Inner height: two box offsets and a 2 px border on each side removed.
const BOX_HEIGHT: f64 = TIP_HEIGHT - 2.0 * BOX_OFFSET - 4.0;
const TEXT_PAD: f64 = 10.0;
const R1: f64 = 7.0;
const R2: f64 = 12.0;
const STROKE_WIDTH: f32 = 2.0;
const ID_FONT_PT: f32 = 10.0;
const VALUE_FONT_PT: f32 = 12.0;

/// One series' row of the tooltip.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipEntry {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub color: Rgba,
}

impl TooltipEntry {
    pub fn id_label(&self) -> String {
        format!("ID:{}", right_align(&self.name, 9))
    }

    pub fn x_label(&self) -> String {
        format!("x:{}", right_align(&to_precision(self.x, 3), 7))
    }

    pub fn y_label(&self) -> String {
        format!("y:{}", right_align(&to_precision(self.y, 3), 7))
    }
}

/// Quadrant the box grows into from its anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    /// South in the upper half, east in the left half, so the box stays inside the plot.
    pub fn for_anchor(anchor: (i32, i32), extents: Extents) -> Self {
        let south = (anchor.1 as f64) < extents.height_f() / 2.0;
        let east = (anchor.0 as f64) < extents.width_f() / 2.0;
        match (south, east) {
            (true, true) => Direction::SouthEast,
            (true, false) => Direction::SouthWest,
            (false, true) => Direction::NorthEast,
            (false, false) => Direction::NorthWest,
        }
    }

    /// Axis flips applied to the box drawn in the south-east quadrant.
    pub fn flip(self) -> (f64, f64) {
        match self {
            Direction::SouthEast => (1.0, 1.0),
            Direction::SouthWest => (-1.0, 1.0),
            Direction::NorthEast => (1.0, -1.0),
            Direction::NorthWest => (-1.0, -1.0),
        }
    }
}

/// Every point within its marker radius of `cursor`, one per series name (first wins).
pub fn hit_test(binder: &DataBinder, scales: &FrameScales, cursor: Point) -> Vec<TooltipEntry> {
    let k = scales.damped();
    let progress = binder.transition_progress();
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for p in binder.points() {
        let (x, y) = p.position_at(progress);
        let px = scales.to_pixel(x, y);
        let reach = (p.marker.size * p.marker.size * k).sqrt();
        if !(px.distance(cursor) <= reach) {
            continue;
        }
        if seen.insert(p.name.as_str()) {
            out.push(TooltipEntry { name: p.name.clone(), x, y, color: p.marker.color });
        }
    }
    out
}

/// Static geometry of a box holding `n` entries, in the unflipped south-east frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TooltipGeometry {
    pub n: usize,
}

impl TooltipGeometry {
    pub fn width(&self) -> f64 {
        let n = self.n as f64;
        let text = n * TEXT_FIELD + (n - 1.0).max(0.0) * FIELD_GAP;
        text + 2.0 * TIP_OFFSET + 2.0 * BOX_OFFSET
    }

    pub fn height(&self) -> f64 {
        TIP_HEIGHT
    }

    /// Final positions of the ten outline vertices, starting and ending at the tip.
    pub fn keypoints(&self) -> [Point; 10] {
        let (w, h) = (self.width(), self.height());
        let p = Point::new;
        [
            p(3.0, 3.0),
            p(RADIUS_OFFSET, BOX_OFFSET),
            p(w - RADIUS_OFFSET, BOX_OFFSET),
            p(w - BOX_OFFSET, RADIUS_OFFSET),
            p(w - BOX_OFFSET, h - RADIUS_OFFSET),
            p(w - RADIUS_OFFSET, h - BOX_OFFSET),
            p(RADIUS_OFFSET, h - BOX_OFFSET),
            p(BOX_OFFSET, h - RADIUS_OFFSET),
            p(BOX_OFFSET, RADIUS_OFFSET),
            p(3.0, 3.0),
        ]
    }

    /// Outline at morph progress `t`, grown from the origin.
    pub fn outline(&self, t: f64) -> skia::Path {
        let kp = self.keypoints().map(|q| Point::ORIGIN.lerp(q, t));
        let p = |q: Point, dx: f64, dy: f64| skia::Point::new((q.x + dx) as f32, (q.y + dy) as f32);
        let mut path = skia::Path::new();
        path.move_to(p(kp[0], 0.0, 0.0));
        path.cubic_to(p(kp[0], R1 / 2.0, R1 / 2.0), p(kp[1], -R1 / 2.0, 0.0), p(kp[1], 0.0, 0.0));
        path.line_to(p(kp[2], 0.0, 0.0));
        path.cubic_to(p(kp[2], R2, 0.0), p(kp[3], 0.0, -R2), p(kp[3], 0.0, 0.0));
        path.line_to(p(kp[4], 0.0, 0.0));
        path.cubic_to(p(kp[4], 0.0, R2), p(kp[5], R2, 0.0), p(kp[5], 0.0, 0.0));
        path.line_to(p(kp[6], 0.0, 0.0));
        path.cubic_to(p(kp[6], -R2, 0.0), p(kp[7], 0.0, R2), p(kp[7], 0.0, 0.0));
        path.line_to(p(kp[8], 0.0, 0.0));
        path.cubic_to(p(kp[8], 0.0, -R1 / 2.0), p(kp[9], R1 / 2.0, 0.0), p(kp[9], 0.0, 0.0));
        path.close();
        path
    }

    /// Gradient stop pairs, one solid band per entry.
    pub fn band_stops(&self) -> Vec<(f32, f32)> {
        let n = self.n as f32;
        let mut stops: Vec<f32> = (0..self.n).flat_map(|v| {
            let v = v as f32;
            [v / n, v / n + 1.0 / (n * n)]
        }).collect();
        stops.push(1.0);
        stops.remove(stops.len() / 2);
        stops.chunks(2).filter_map(|c| match c {
            [a, b] => Some((*a, *b)),
            _ => None,
        }).collect()
    }

    /// Horizontal center of entry `i`'s text column.
    pub fn text_x(&self, i: usize) -> f64 {
        let i = i as f64;
        (TEXT_FIELD / 2.0 * (2.0 * i + 1.0) + i * FIELD_GAP + TIP_OFFSET + BOX_OFFSET).trunc()
    }

    /// Vertical centers of the ID / x / y rows.
    pub fn text_rows(&self) -> [f64; 3] {
        [0.0, 1.0, 2.0].map(|v| (BOX_HEIGHT - 2.0 * TEXT_PAD) * (4.0 * v + 1.0) / 9.0 + BOX_OFFSET + TEXT_PAD)
    }
}

/// A tooltip being shown: where, which way, what, and how far the morph has progressed.
#[derive(Clone, Debug)]
pub struct ActiveTooltip {
    pub anchor: (i32, i32),
    pub direction: Direction,
    pub entries: Vec<TooltipEntry>,
    task: AnimationTask,
}

impl ActiveTooltip {
    pub fn progress(&self) -> f64 {
        self.task.progress()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn geometry(&self) -> TooltipGeometry {
        TooltipGeometry { n: self.entries.len() }
    }

    /// Paint the current morph frame with the canvas origin at the anchor.
    pub fn paint(&self, canvas: &skia::Canvas, shaper: &TextShaper, theme: &Theme) {
        let geo = self.geometry();
        let (sx, sy) = self.direction.flip();
        let n = self.entries.len();

        canvas.save();
        canvas.concat(&Affine::translate(self.anchor.0 as f64, self.anchor.1 as f64).to_matrix());
        canvas.save();
        canvas.concat(&Affine::scale(sx, sy).to_matrix());
        canvas.clip_rect(skia::Rect::from_wh(geo.width() as f32, geo.height() as f32), None, true);

        let shadow = skia::image_filters::drop_shadow((1.5, 2.5), (2.5, 2.5), theme.line_shadow, None, None, None);
        let outline = geo.outline(self.progress());

        let mut stroke = skia::Paint::default();
        stroke.set_anti_alias(true);
        stroke.set_style(skia::paint::Style::Stroke);
        stroke.set_stroke_width(STROKE_WIDTH);
        stroke.set_color(theme.tooltip_stroke);
        if let Some(f) = &shadow {
            stroke.set_image_filter(f.clone());
        }
        canvas.draw_path(&outline, &stroke);

        let mut fill = skia::Paint::default();
        fill.set_anti_alias(true);
        fill.set_style(skia::paint::Style::Fill);
        let mut colors = Vec::with_capacity(2 * n);
        let mut pos = Vec::with_capacity(2 * n);
        for (i, (a, b)) in geo.band_stops().into_iter().enumerate() {
            let ind = if sx < 0.0 { n - 1 - i } else { i };
            let c = self.entries[ind].color.with_opacity(theme.tooltip_band_opacity);
            colors.extend([c, c]);
            pos.extend([a, b]);
        }
        let inset = (BOX_OFFSET + TIP_OFFSET) as f32;
        let span = (skia::Point::new(inset, 0.0), skia::Point::new(geo.width() as f32 - inset, 0.0));
        if let Some(shader) = skia::Shader::linear_gradient(span, colors.as_slice(), pos.as_slice(), skia::TileMode::Clamp, None, None) {
            fill.set_shader(shader);
        }
        if let Some(f) = shadow {
            fill.set_image_filter(f);
        }
        canvas.draw_path(&outline, &fill);

        // text is drawn unflipped so it reads normally
        canvas.restore();
        if self.is_finished() {
            let rows = geo.text_rows();
            let rows = if sy < 0.0 { [rows[2], rows[1], rows[0]] } else { rows };
            for i in 0..n {
                let ind = if sx < 0.0 { n - 1 - i } else { i };
                let e = &self.entries[ind];
                let x = (sx * geo.text_x(i)) as f32;
                let y = |r: f64| (sy * r) as f32;
                let color = e.color.to_color();
                shaper.draw(canvas, &e.id_label(), x, y(rows[0]), pt_to_px(ID_FONT_PT), color, Anchor::Middle, None);
                let max = Some(TEXT_FIELD as f32);
                shaper.draw(canvas, &e.x_label(), x, y(rows[1]), pt_to_px(VALUE_FONT_PT), color, Anchor::Middle, max);
                shaper.draw(canvas, &e.y_label(), x, y(rows[2]), pt_to_px(VALUE_FONT_PT), color, Anchor::Middle, max);
            }
        }
        canvas.restore();
    }
}

/// Outcome of a hover update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hover {
    /// Nothing under the cursor; the overlay should be wiped.
    Cleared,
    /// Same anchor as the tooltip already shown.
    Unchanged,
    /// A new tooltip was started at this anchor.
    Started { anchor: (i32, i32), entries: usize },
}

#[derive(Debug, Default)]
pub struct TooltipEngine {
    active: Option<ActiveTooltip>,
}

impl TooltipEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchor(&self) -> Option<(i32, i32)> {
        self.active.as_ref().map(|a| a.anchor)
    }

    pub fn active(&self) -> Option<&ActiveTooltip> {
        self.active.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.active.as_ref().is_some_and(|a| !a.is_finished())
    }

    pub fn hover(&mut self, binder: &DataBinder, scales: &FrameScales, extents: Extents, cursor: Point) -> Hover {
        let entries = hit_test(binder, scales, cursor);
        let Some(first) = entries.first() else {
            self.active = None;
            return Hover::Cleared;
        };
        let px = scales.to_pixel(first.x, first.y);
        let anchor = (px.x as i32, px.y as i32);
        if self.anchor() == Some(anchor) {
            return Hover::Unchanged;
        }
        let direction = Direction::for_anchor(anchor, extents);
        tracing::trace!(?anchor, ?direction, entries = entries.len(), "tooltip");
        let count = entries.len();
        // replacing the active tooltip stops its animation
        self.active = Some(ActiveTooltip {
            anchor,
            direction,
            entries,
            task: AnimationTask::new(MORPH_DURATION, Easing::Bounce),
        });
        Hover::Started { anchor, entries: count }
    }

    /// Forget the tooltip; the next hover over the same point starts a fresh one.
    pub fn invalidate(&mut self) {
        self.active = None;
    }

    /// Advance the morph. Returns true when a new frame should be painted.
    pub fn tick(&mut self, now: Duration) -> bool {
        match self.active.as_mut() {
            Some(a) if !a.task.is_finished() => {
                a.task.sample(now);
                true
            }
            _ => false,
        }
    }

    pub fn paint(&self, canvas: &skia::Canvas, shaper: &TextShaper, theme: &Theme) {
        if let Some(a) = &self.active {
            a.paint(canvas, shaper, theme);
        }
    }
}
