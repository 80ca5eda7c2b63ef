// File: crates/iris-core/src/render.rs
// Summary: Full-frame draw of the axes, grid, zero lines, data lines and markers for one view transform.

use skia_safe as skia;

use crate::axis::{AxisScene, X_TICKS, Y_TICKS};
use crate::binder::DataBinder;
use crate::container::Container;
use crate::curve;
use crate::error::{RenderError, ScaleDomainError};
use crate::geometry::Point;
use crate::host::HostNode;
use crate::layout::Layout;
use crate::scale::{domains, Axis, ContinuousScale, ScaleKind};
use crate::symbol;
use crate::theme::Theme;
use crate::view::{damp, ViewTransform};

/// Tick count the base scales are niced to.
const NICE_COUNT: usize = 10;
const ZERO_LINE_WIDTH: f64 = 1.5;
const GRID_WIDTH: f32 = 1.0;

/// Scales and zoom factor of one drawn frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameScales {
    pub x: ContinuousScale,
    pub y: ContinuousScale,
    pub k: f64,
}

impl FrameScales {
    pub fn to_pixel(&self, x: f64, y: f64) -> Point {
        Point::new(self.x.map(x), self.y.map(y))
    }

    /// Stroke and marker scale factor for this frame.
    pub fn damped(&self) -> f64 {
        damp(self.k)
    }
}

/// Data-to-pixel scales before any zoom: extents of the bound lines, niced.
pub fn base_scales(layout: &Layout, binder: &DataBinder) -> Result<(ContinuousScale, ContinuousScale), ScaleDomainError> {
    let ext = layout.extents();
    let d = domains(binder.line_data(), layout.yaxis.scale == ScaleKind::Log);
    let sx = ContinuousScale::new(layout.xaxis.scale, d.x, (0.0, ext.width_f()))?.nice(NICE_COUNT);
    let sy = ContinuousScale::new(layout.yaxis.scale, d.y, (ext.height_f(), 0.0))?.nice(NICE_COUNT);
    Ok((sx, sy))
}

pub fn frame_scales(layout: &Layout, binder: &DataBinder, t: &ViewTransform) -> Result<FrameScales, ScaleDomainError> {
    let (sx, sy) = base_scales(layout, binder)?;
    Ok(FrameScales { x: sx.rescale(t, Axis::X)?, y: sy.rescale(t, Axis::Y)?, k: t.k })
}

#[derive(Default)]
pub struct Renderer {
    marker_layer: Option<skia::Image>,
    last: Option<FrameScales>,
    frames: u64,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scales of the last successful frame.
    pub fn last_scales(&self) -> Option<&FrameScales> {
        self.last.as_ref()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draw one frame; failures are logged and the previous frame stays on screen.
    pub fn draw<H: HostNode>(&mut self, c: &mut Container<H>, binder: &DataBinder, t: &ViewTransform) -> bool {
        match self.try_draw(c, binder, t) {
            Ok(_) => true,
            Err(err) => {
                tracing::error!(%err, "draw failed; keeping previous frame");
                false
            }
        }
    }

    pub fn try_draw<H: HostNode>(
        &mut self,
        c: &mut Container<H>,
        binder: &DataBinder,
        t: &ViewTransform,
    ) -> Result<FrameScales, RenderError> {
        // nothing is cleared until the scales are known to be valid
        let scales = frame_scales(c.layout(), binder, t)?;
        let _span = tracing::trace_span!("draw", k = t.k, x = t.x, y = t.y).entered();

        c.set_axes(AxisScene::build(c.layout(), &scales.x, &scales.y));

        let layout = c.layout().clone();
        let theme = *c.theme();
        let clip = c.interior_clip();
        let progress = binder.transition_progress();

        let canvas = c.line_surface_mut().canvas();
        canvas.reset_matrix();
        canvas.clear(skia::Color::TRANSPARENT);
        canvas.save();
        canvas.clip_rect(clip, None, true);
        draw_grid(canvas, &layout, &scales, &theme);
        draw_zero_lines(canvas, &layout, &scales);
        if binder.is_bound() {
            draw_lines(canvas, binder, &scales, &theme, progress);
        }
        canvas.restore();

        let surface = c.point_surface_mut();
        let canvas = surface.canvas();
        canvas.reset_matrix();
        canvas.clear(skia::Color::TRANSPARENT);
        canvas.save();
        canvas.clip_rect(clip, None, true);
        if binder.is_bound() {
            draw_markers(canvas, binder, &scales, progress);
        }
        canvas.restore();
        self.marker_layer = Some(surface.image_snapshot());

        self.last = Some(scales);
        self.frames += 1;
        tracing::trace!(frame = self.frames, lines = binder.line_count(), points = binder.point_count(), "frame drawn");
        Ok(scales)
    }

    /// Wipe the point surface back to the markers of the last frame.
    pub fn restore_markers(&self, surface: &mut skia::Surface) {
        let canvas = surface.canvas();
        canvas.reset_matrix();
        canvas.clear(skia::Color::TRANSPARENT);
        if let Some(markers) = &self.marker_layer {
            canvas.draw_image(markers, (0.0, 0.0), None);
        }
    }
}

fn stroke_paint(color: skia::Color, width: f32) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(width);
    paint.set_color(color);
    paint
}

fn draw_grid(canvas: &skia::Canvas, layout: &Layout, s: &FrameScales, theme: &Theme) {
    let ext = layout.extents();
    let (w, h) = (ext.width as f32, ext.height as f32);
    let paint = stroke_paint(theme.grid, GRID_WIDTH);
    if layout.yaxis.grid {
        for v in s.y.ticks(Y_TICKS) {
            let y = s.y.map(v) as f32;
            canvas.draw_line((0.0, y), (w, y), &paint);
        }
    }
    if layout.xaxis.grid {
        for v in s.x.ticks(X_TICKS) {
            let x = s.x.map(v) as f32;
            canvas.draw_line((x, 0.0), (x, h), &paint);
        }
    }
}

fn draw_zero_lines(canvas: &skia::Canvas, layout: &Layout, s: &FrameScales) {
    let ext = layout.extents();
    let (w, h) = (ext.width as f32, ext.height as f32);
    let width = (ZERO_LINE_WIDTH * s.damped()) as f32;
    // zero is not on a log axis
    if layout.yaxis.zeroline && layout.yaxis.scale == ScaleKind::Linear {
        let y = s.y.map(0.0) as f32;
        canvas.draw_line((0.0, y), (w, y), &stroke_paint(layout.yaxis.zeroline_color.to_color(), width));
    }
    if layout.xaxis.zeroline && layout.xaxis.scale == ScaleKind::Linear {
        let x = s.x.map(0.0) as f32;
        canvas.draw_line((x, 0.0), (x, h), &stroke_paint(layout.xaxis.zeroline_color.to_color(), width));
    }
}

fn draw_lines(canvas: &skia::Canvas, binder: &DataBinder, s: &FrameScales, theme: &Theme, progress: f64) {
    let k = s.damped();
    let shadow = skia::image_filters::drop_shadow(
        ((1.5 * k) as f32, (2.5 * k) as f32),
        // canvas shadow blur is twice the gaussian sigma
        ((2.5 * k) as f32, (2.5 * k) as f32),
        theme.line_shadow,
        None,
        None,
        None,
    );
    for line in binder.lines().filter(|l| l.mode.lines) {
        let Some(style) = line.line else { continue };
        let pts: Vec<Point> = line.data_at(progress).into_iter().map(|(x, y)| s.to_pixel(x, y)).collect();
        let path = curve::to_skia_path(&curve::natural(&pts));
        let mut paint = stroke_paint(style.color.with_opacity(style.opacity), (style.width * k) as f32);
        paint.set_stroke_cap(skia::PaintCap::Round);
        let intervals: Vec<f32> = style.style.intervals().iter().map(|v| v * k as f32).collect();
        if !intervals.is_empty() {
            if let Some(effect) = skia::PathEffect::dash(&intervals, 0.0) {
                paint.set_path_effect(effect);
            }
        }
        if let Some(filter) = &shadow {
            paint.set_image_filter(filter.clone());
        }
        canvas.draw_path(&path, &paint);
    }
}

fn draw_markers(canvas: &skia::Canvas, binder: &DataBinder, s: &FrameScales, progress: f64) {
    let k = s.damped();
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Fill);
    for p in binder.points().filter(|p| p.mode.markers) {
        let (x, y) = p.position_at(progress);
        let center = s.to_pixel(x, y);
        if !center.is_finite() {
            continue;
        }
        paint.set_color(p.marker.color.with_opacity(p.marker.opacity));
        let area = p.marker.size * p.marker.size * k;
        canvas.draw_path(&symbol::path(p.marker.symbol, area, center), &paint);
    }
}
