// File: crates/iris-core/src/plot.rs
// Summary: Plot facades: the static plot (container + binder + renderer) and the annotated plot with pan/zoom and tooltips.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;

use crate::binder::{BindDiff, DataBinder};
use crate::container::Container;
use crate::error::PlotError;
use crate::geometry::Point;
use crate::host::HostNode;
use crate::interaction::{InteractionController, WheelMode};
use crate::layout::{Layout, LayoutOptions};
use crate::render::{FrameScales, Renderer};
use crate::series::Series;
use crate::tooltip::{Hover, TooltipEngine};
use crate::types::CursorStyle;
use crate::view::ViewTransform;

/// A plot without interaction: bind series, draw at a given view transform, export.
pub struct Plot<H: HostNode> {
    container: Container<H>,
    binder: DataBinder,
    renderer: Renderer,
}

impl<H: HostNode> Plot<H> {
    pub fn new(host: H, opts: &LayoutOptions) -> Result<Self, PlotError> {
        Ok(Self { container: Container::create(host, opts)?, binder: DataBinder::new(), renderer: Renderer::new() })
    }

    /// Bind and settle at once: a static plot has no clock to run the update transition.
    pub fn bind(&mut self, series: &[Series]) -> Result<BindDiff, PlotError> {
        let diff = self.binder.bind(series)?;
        self.binder.settle();
        Ok(diff)
    }

    pub fn update_layout(&mut self, patch: &LayoutOptions) -> Result<(), PlotError> {
        self.container.update(patch)
    }

    /// Redraw every layer. Returns false (and keeps the last frame) when the scales are invalid.
    pub fn draw(&mut self, t: &ViewTransform) -> bool {
        self.renderer.draw(&mut self.container, &self.binder, t)
    }

    pub fn try_draw(&mut self, t: &ViewTransform) -> Result<FrameScales, PlotError> {
        Ok(self.renderer.try_draw(&mut self.container, &self.binder, t)?)
    }

    pub fn layout(&self) -> &Layout {
        self.container.layout()
    }

    pub fn container(&self) -> &Container<H> {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut Container<H> {
        &mut self.container
    }

    pub fn binder(&self) -> &DataBinder {
        &self.binder
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn host(&self) -> &H {
        self.container.host()
    }

    pub fn render_to_rgba8(&mut self) -> Result<(Vec<u8>, i32, i32, usize), PlotError> {
        Ok(self.container.render_to_rgba8()?)
    }

    pub fn render_to_png_bytes(&mut self) -> Result<Vec<u8>> {
        self.container.render_to_png_bytes()
    }

    pub fn render_to_png(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.container.render_to_png(path)
    }

    pub fn axes_svg(&self) -> Option<String> {
        self.container.render_axes_svg()
    }
}

/// The interactive plot: drag to pan, wheel to zoom, double-click to reset, hover for
/// tooltips. Pointer positions are in interior (plot area) pixels.
pub struct AnnotatedPlot<H: HostNode> {
    plot: Plot<H>,
    interaction: InteractionController,
    tooltip: TooltipEngine,
}

impl<H: HostNode> AnnotatedPlot<H> {
    pub fn new(series: &[Series], host: H, opts: &LayoutOptions) -> Result<Self, PlotError> {
        let mut plot = Plot::new(host, opts)?;
        plot.bind(series)?;
        let mut this = Self { plot, interaction: InteractionController::new(), tooltip: TooltipEngine::new() };
        this.draw();
        Ok(this)
    }

    /// Replace the data (and optionally patch the layout), then redraw at identity.
    /// Everything is validated first, so a failed update leaves the plot untouched.
    pub fn update(&mut self, series: &[Series], layout: Option<&LayoutOptions>) -> Result<BindDiff, PlotError> {
        let prepared = DataBinder::prepare(series)?;
        if let Some(patch) = layout {
            self.plot.container.update(patch)?;
        }
        let diff = self.plot.binder.commit(prepared);
        self.interaction.reset_immediate();
        self.sync_cursor();
        self.draw();
        Ok(diff)
    }

    /// Full redraw at the current transform. Any tooltip is dropped with the old frame.
    pub fn draw(&mut self) -> bool {
        self.tooltip.invalidate();
        let t = self.interaction.transform();
        self.plot.draw(&t)
    }

    pub fn pointer_down(&mut self, at: Point) {
        self.interaction.pointer_down(at);
        self.sync_cursor();
    }

    /// Pan while dragging, otherwise update the tooltip. Returns true when anything repainted.
    pub fn pointer_move(&mut self, at: Point) -> bool {
        if self.interaction.is_dragging() {
            return self.interaction.pointer_move(at) && self.draw();
        }
        self.hover(at)
    }

    pub fn pointer_up(&mut self) {
        self.interaction.pointer_up();
        self.sync_cursor();
    }

    pub fn wheel(&mut self, at: Point, delta_y: f64, mode: WheelMode) -> bool {
        self.interaction.wheel(at, delta_y, mode) && self.draw()
    }

    pub fn double_click(&mut self) {
        self.interaction.double_click();
        self.sync_cursor();
    }

    /// Jump straight back to the identity view.
    pub fn reset(&mut self) -> bool {
        self.interaction.reset_immediate();
        self.sync_cursor();
        self.draw()
    }

    /// Advance every running animation to `now`. Returns true when a frame was painted.
    pub fn tick(&mut self, now: Duration) -> bool {
        let mut redraw = false;
        if self.plot.binder.is_transitioning() {
            self.plot.binder.tick(now);
            redraw = true;
        }
        if self.interaction.tick(now) {
            redraw = true;
        }
        if redraw {
            return self.draw();
        }
        if self.tooltip.tick(now) {
            self.paint_overlay();
            return true;
        }
        false
    }

    /// True while any animation still needs ticks.
    pub fn is_animating(&self) -> bool {
        self.plot.binder.is_transitioning() || self.interaction.is_resetting() || self.tooltip.is_animating()
    }

    fn hover(&mut self, at: Point) -> bool {
        let Some(scales) = self.plot.renderer.last_scales().copied() else {
            return false;
        };
        let extents = self.plot.layout().extents();
        match self.tooltip.hover(&self.plot.binder, &scales, extents, at) {
            Hover::Unchanged => false,
            Hover::Cleared => {
                self.plot.renderer.restore_markers(self.plot.container.point_surface_mut());
                true
            }
            Hover::Started { .. } => {
                self.paint_overlay();
                true
            }
        }
    }

    /// Markers of the last frame with the active tooltip on top, clipped to the interior.
    fn paint_overlay(&mut self) {
        let clip = self.plot.container.interior_clip();
        let (surface, shaper, theme) = self.plot.container.overlay_parts();
        self.plot.renderer.restore_markers(surface);
        let canvas = surface.canvas();
        canvas.save();
        canvas.clip_rect(clip, None, true);
        self.tooltip.paint(canvas, shaper, theme);
        canvas.restore();
    }

    fn sync_cursor(&mut self) {
        let cursor = self.interaction.cursor();
        self.plot.container.set_cursor(cursor);
    }

    pub fn transform(&self) -> ViewTransform {
        self.interaction.transform()
    }

    pub fn cursor(&self) -> CursorStyle {
        self.plot.container.cursor()
    }

    pub fn tooltip_anchor(&self) -> Option<(i32, i32)> {
        self.tooltip.anchor()
    }

    pub fn tooltip(&self) -> &TooltipEngine {
        &self.tooltip
    }

    pub fn layout(&self) -> &Layout {
        self.plot.layout()
    }

    pub fn binder(&self) -> &DataBinder {
        self.plot.binder()
    }

    pub fn plot(&self) -> &Plot<H> {
        &self.plot
    }

    pub fn host(&self) -> &H {
        self.plot.host()
    }

    pub fn render_to_rgba8(&mut self) -> Result<(Vec<u8>, i32, i32, usize), PlotError> {
        self.plot.render_to_rgba8()
    }

    pub fn render_to_png_bytes(&mut self) -> Result<Vec<u8>> {
        self.plot.render_to_png_bytes()
    }

    pub fn render_to_png(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.plot.render_to_png(path)
    }

    pub fn axes_svg(&self) -> Option<String> {
        self.plot.axes_svg()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HeadlessHost;
    use crate::series::{LineStyle, MarkerStyle, Mode, Series, Symbol};

    fn series() -> Vec<Series> {
        vec![Series::new("A", Mode::BOTH, vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.5])
            .with_line(LineStyle::new(2.0, "rgb(0,0,255)"))
            .with_marker(MarkerStyle::new(Symbol::Circle, 6.0, "rgb(0,0,255)"))]
    }

    fn plot() -> AnnotatedPlot<HeadlessHost> {
        AnnotatedPlot::new(&series(), HeadlessHost::default(), &LayoutOptions::default().size(400, 300)).unwrap()
    }

    #[test]
    fn static_rebind_draws_new_positions() {
        let mut p = Plot::new(HeadlessHost::default(), &LayoutOptions::default().size(400, 300)).unwrap();
        p.bind(&series()).unwrap();
        assert!(p.draw(&ViewTransform::IDENTITY));
        let moved = vec![Series::new("A", Mode::BOTH, vec![0.0, 1.0, 2.0], vec![10.0, 20.0, 15.0])
            .with_line(LineStyle::new(2.0, "rgb(0,0,255)"))
            .with_marker(MarkerStyle::new(Symbol::Circle, 6.0, "rgb(0,0,255)"))];
        p.bind(&moved).unwrap();
        assert!(!p.binder().is_transitioning());
        assert_eq!(p.binder().transition_progress(), 1.0);
        let b = p.binder().points().nth(1).unwrap();
        assert_eq!(b.position_at(p.binder().transition_progress()), (1.0, 20.0));
        assert_eq!(p.binder().lines().next().unwrap().data_at(0.0), vec![(0.0, 10.0), (1.0, 20.0), (2.0, 15.0)]);
    }

    #[test]
    fn new_binds_and_draws_once() {
        let p = plot();
        assert_eq!(p.plot().renderer().frames(), 1);
        assert!(p.axes_svg().is_some());
        assert_eq!(p.transform(), ViewTransform::IDENTITY);
    }

    #[test]
    fn drag_pans_and_toggles_cursor() {
        let mut p = plot();
        p.pointer_down(Point::new(50.0, 50.0));
        assert_eq!(p.host().cursor, CursorStyle::Grabbing);
        assert!(p.pointer_move(Point::new(70.0, 40.0)));
        p.pointer_up();
        assert_eq!(p.host().cursor, CursorStyle::Grab);
        assert_eq!(p.transform(), ViewTransform { x: 20.0, y: -10.0, k: 1.0 });
        assert_eq!(p.plot().renderer().frames(), 2);
    }

    #[test]
    fn reset_jumps_to_identity() {
        let mut p = plot();
        p.wheel(Point::new(10.0, 10.0), -500.0, WheelMode::Pixel);
        assert!(p.reset());
        assert_eq!(p.transform(), ViewTransform::IDENTITY);
        assert!(!p.is_animating());
    }

    #[test]
    fn hover_starts_and_clears_tooltip() {
        let mut p = plot();
        let scales = *p.plot().renderer().last_scales().unwrap();
        let at = scales.to_pixel(1.0, 1.0);
        assert!(p.pointer_move(at));
        assert!(p.tooltip_anchor().is_some());
        assert!(!p.pointer_move(at));
        assert!(p.pointer_move(Point::new(-500.0, -500.0)));
        assert!(p.tooltip_anchor().is_none());
    }

    #[test]
    fn update_resets_view_and_failed_update_keeps_state() {
        let mut p = plot();
        p.wheel(Point::new(10.0, 10.0), -500.0, WheelMode::Pixel);
        assert!(p.transform().k > 1.0);
        p.update(&series(), None).unwrap();
        assert_eq!(p.transform(), ViewTransform::IDENTITY);

        let bad = vec![Series::new("B", Mode::LINES, vec![0.0], vec![])];
        let patch = LayoutOptions::default().size(500, 400);
        assert!(p.update(&bad, Some(&patch)).is_err());
        assert_eq!(p.layout().width, 400);
        assert_eq!(p.binder().point_count(), 3);
    }
}
