// File: crates/iris-core/src/container.rs
// Summary: Plot container: layout ownership, the two clipped raster layers, host stylesheet and layer composition.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use skia_safe as skia;
use skia::image::CachingHint;
use skia::{AlphaType, ColorType, ImageInfo};

use crate::axis::AxisScene;
use crate::error::{PlotError, RenderError};
use crate::host::HostNode;
use crate::layout::{Layout, LayoutOptions};
use crate::text::TextShaper;
use crate::theme::Theme;
use crate::types::{CursorStyle, RIGHT_GUTTER_PX};

/// Scoped rules injected into the host node: typography, layer order and cursor affordances.
pub fn stylesheet(layout: &Layout) -> String {
    let family = &layout.font.family;
    let size = layout.font.size;
    format!(
        r#".iris-container {{
  width: {w}px;
  height: {h}px;
}}
.iris-container .axes text {{
  font-family: {family};
  font-size: {tick}pt;
  user-select: none;
}}
.iris-container .axes line {{
  stroke-opacity: 0.6;
  stroke: rgb(60,60,60);
  stroke-width: 2px;
  shape-rendering: crispEdges;
}}
.iris-container .line-layer, .iris-container .svg-container, .iris-container .point-layer {{
  position: absolute;
  background-color: transparent;
}}
.iris-container .line-layer {{
  z-index: 100;
}}
.iris-container .point-layer {{
  z-index: 101;
  cursor: grab;
}}
.iris-container .point-layer:active {{
  cursor: grabbing;
  outline: none;
}}
.iris-container .x-label, .iris-container .y-label {{
  font-family: {family};
  font-size: {size}pt;
  user-select: none;
}}
"#,
        w = layout.width,
        h = layout.height,
        tick = size * 0.9,
    )
}

fn raster(width: u32, height: u32) -> Result<skia::Surface, RenderError> {
    let (w, h) = (width as i32, height as i32);
    let surface = skia::surfaces::raster_n32_premul((w, h)).ok_or(RenderError::Surface { width: w, height: h })?;
    tracing::debug!(width, height, "allocated raster surface");
    Ok(surface)
}

/// Owns the layout and every drawing layer of one plot. The axes layer is a retained
/// [`AxisScene`]; lines and points live on two raster surfaces of the full plot size.
pub struct Container<H: HostNode> {
    host: H,
    layout: Layout,
    theme: Theme,
    shaper: TextShaper,
    line_surface: skia::Surface,
    point_surface: skia::Surface,
    axes: Option<AxisScene>,
    cursor: CursorStyle,
}

impl<H: HostNode> Container<H> {
    pub fn create(mut host: H, opts: &LayoutOptions) -> Result<Self, PlotError> {
        let layout = Layout::from_options(opts)?;
        let line_surface = raster(layout.width, layout.height)?;
        let point_surface = raster(layout.width, layout.height)?;
        host.resize(layout.width, layout.height);
        host.apply_stylesheet(&stylesheet(&layout));
        host.set_cursor(CursorStyle::Grab);
        let shaper = TextShaper::new(layout.font.family.clone());
        Ok(Self {
            host,
            layout,
            theme: Theme::iris(),
            shaper,
            line_surface,
            point_surface,
            axes: None,
            cursor: CursorStyle::Grab,
        })
    }

    /// Shallow-merge a layout patch. Raster layers are reallocated when the size changes;
    /// bound data and the last axes scene are kept until the next draw. On error nothing changes.
    pub fn update(&mut self, patch: &LayoutOptions) -> Result<(), PlotError> {
        let mut next = self.layout.clone();
        next.apply(patch)?;
        if (next.width, next.height) != (self.layout.width, self.layout.height) {
            let line = raster(next.width, next.height)?;
            let point = raster(next.width, next.height)?;
            self.line_surface = line;
            self.point_surface = point;
            self.host.resize(next.width, next.height);
        }
        if next.font.family != self.layout.font.family {
            self.shaper.set_family(next.font.family.clone());
        }
        self.layout = next;
        self.host.apply_stylesheet(&stylesheet(&self.layout));
        Ok(())
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn shaper(&self) -> &TextShaper {
        &self.shaper
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Drawing region of both raster layers: the interior minus a 1 px inset on the
    /// top/left and a 6 px gutter on the right.
    pub fn interior_clip(&self) -> skia::Rect {
        let ext = self.layout.extents();
        let w = (ext.width as f32 - 1.0 - RIGHT_GUTTER_PX).max(0.0);
        let h = (ext.height as f32 - 1.0).max(0.0);
        skia::Rect::from_xywh(1.0, 1.0, w, h)
    }

    pub fn line_surface_mut(&mut self) -> &mut skia::Surface {
        &mut self.line_surface
    }

    pub fn point_surface_mut(&mut self) -> &mut skia::Surface {
        &mut self.point_surface
    }

    /// Point surface together with the text shaper and theme, for overlay painting.
    pub fn overlay_parts(&mut self) -> (&mut skia::Surface, &TextShaper, &Theme) {
        (&mut self.point_surface, &self.shaper, &self.theme)
    }

    pub fn axes(&self) -> Option<&AxisScene> {
        self.axes.as_ref()
    }

    pub fn set_axes(&mut self, scene: AxisScene) {
        self.axes = Some(scene);
    }

    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: CursorStyle) {
        if cursor != self.cursor {
            self.cursor = cursor;
            self.host.set_cursor(cursor);
        }
    }

    /// Flatten axes, line layer and point layer onto one opaque image.
    fn compose(&mut self) -> Result<skia::Image, RenderError> {
        let mut surface = raster(self.layout.width, self.layout.height)?;
        let canvas = surface.canvas();
        canvas.clear(self.theme.background);
        if let Some(axes) = &self.axes {
            axes.paint(canvas, &self.shaper, &self.theme);
        }
        // raster layers sit one pixel below the top margin, like the stacked canvases
        let at = (self.layout.margin.left as f32, self.layout.margin.top as f32 + 1.0);
        let lines = self.line_surface.image_snapshot();
        let points = self.point_surface.image_snapshot();
        canvas.draw_image(&lines, at, None);
        canvas.draw_image(&points, at, None);
        Ok(surface.image_snapshot())
    }

    /// Composite image as unpremultiplied RGBA8: `(pixels, width, height, stride)`.
    pub fn render_to_rgba8(&mut self) -> Result<(Vec<u8>, i32, i32, usize), RenderError> {
        let image = self.compose()?;
        let (w, h) = (image.width(), image.height());
        let info = ImageInfo::new((w, h), ColorType::RGBA8888, AlphaType::Unpremul, None);
        let stride = w as usize * 4;
        let mut px = vec![0_u8; stride * h as usize];
        if !image.read_pixels(&info, px.as_mut_slice(), stride, (0, 0), CachingHint::Disallow) {
            return Err(RenderError::ReadPixels);
        }
        Ok((px, w, h, stride))
    }

    pub fn render_to_png_bytes(&mut self) -> Result<Vec<u8>> {
        let (px, w, h, _) = self.render_to_rgba8()?;
        let img = image::RgbaImage::from_raw(w as u32, h as u32, px).context("pixel buffer does not match image size")?;
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).context("encode PNG failed")?;
        Ok(out.into_inner())
    }

    pub fn render_to_png(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.render_to_png_bytes()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// SVG document of the axes layer as of the last draw.
    pub fn render_axes_svg(&self) -> Option<String> {
        self.axes.as_ref().map(|a| a.to_svg(&self.theme))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HeadlessHost;

    #[test]
    fn create_sizes_host_and_injects_styles() {
        let c = Container::create(HeadlessHost::default(), &LayoutOptions::default().size(400, 300)).unwrap();
        assert_eq!(c.host().size, (400, 300));
        assert!(c.host().stylesheet.contains("font-size: 14.4pt"));
        assert!(c.host().stylesheet.contains("z-index: 101"));
        let clip = c.interior_clip();
        assert_eq!((clip.left, clip.top, clip.width(), clip.height()), (1.0, 1.0, 308.0, 214.0));
    }

    #[test]
    fn update_reallocates_on_resize_only() {
        let mut c = Container::create(HeadlessHost::default(), &LayoutOptions::default().size(400, 300)).unwrap();
        c.update(&LayoutOptions::default().size(500, 320)).unwrap();
        assert_eq!(c.line_surface_mut().width(), 500);
        assert_eq!(c.point_surface_mut().height(), 320);
        assert_eq!(c.host().size, (500, 320));
        assert!(c.update(&LayoutOptions::default().size(10, 10)).is_err());
        assert_eq!(c.layout().width, 500);
    }

    #[test]
    fn empty_composite_is_opaque_white() {
        let mut c = Container::create(HeadlessHost::default(), &LayoutOptions::default().size(120, 100)).unwrap();
        let (px, w, h, stride) = c.render_to_rgba8().unwrap();
        assert_eq!((w, h, stride), (120, 100, 480));
        assert_eq!(&px[..4], &[255, 255, 255, 255]);
    }
}
