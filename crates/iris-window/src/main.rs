// File: crates/iris-window/src/main.rs
// Summary: Windowed demo that drives the annotated plot from winit events and blits it via softbuffer (CPU).

use anyhow::{anyhow, Context, Result};
use iris_core::{
    AnnotatedPlot, CursorStyle, HostNode, LayoutOptions, LineStyle, MarkerStyle, Mode, Point, Series, Symbol,
    WheelMode,
};
use std::num::NonZeroU32;
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use winit::event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{CursorIcon, Window, WindowBuilder};

/// Two presses closer than this count as a double click.
const DOUBLE_CLICK: Duration = Duration::from_millis(400);

/// The winit window as plot host: only the cursor affordance has a native counterpart.
struct WindowHost {
    window: Rc<Window>,
}

impl HostNode for WindowHost {
    fn apply_stylesheet(&mut self, css: &str) {
        tracing::trace!(bytes = css.len(), "stylesheet ignored by native host");
    }

    fn resize(&mut self, width: u32, height: u32) {
        tracing::debug!(width, height, "plot resized");
    }

    fn set_cursor(&mut self, cursor: CursorStyle) {
        let icon = match cursor {
            CursorStyle::Grab => CursorIcon::Grab,
            CursorStyle::Grabbing => CursorIcon::Grabbing,
        };
        self.window.set_cursor_icon(icon);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,iris_core=debug")))
        .init();

    let series = match std::env::args().nth(1) {
        Some(path) => load_series_csv(Path::new(&path)).with_context(|| format!("failed to load CSV '{path}'"))?,
        None => sample_series(),
    };

    let event_loop = EventLoop::new();
    let window = Rc::new(
        WindowBuilder::new()
            .with_title("Iris Plot - Window Demo")
            .with_inner_size(winit::dpi::PhysicalSize::new(1024u32, 640u32))
            .build(&event_loop)
            .context("build window")?,
    );

    let context = unsafe { softbuffer::Context::new(&*window) }.map_err(|e| anyhow!("softbuffer context: {e}"))?;
    let mut surface =
        unsafe { softbuffer::Surface::new(&context, &*window) }.map_err(|e| anyhow!("softbuffer surface: {e}"))?;

    let size = window.inner_size();
    let host = WindowHost { window: Rc::clone(&window) };
    let mut plot = AnnotatedPlot::new(&series, host, &LayoutOptions::default().size(size.width, size.height))?;

    let start = Instant::now();
    let mut cursor_at: Option<Point> = None;
    let mut last_press: Option<Instant> = None;

    event_loop.run(move |event, _, cf| {
        *cf = if plot.is_animating() { ControlFlow::Poll } else { ControlFlow::Wait };
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => *cf = ControlFlow::Exit,
                WindowEvent::Resized(new_size) => {
                    let patch = LayoutOptions::default().size(new_size.width.max(1), new_size.height.max(1));
                    match plot.update(&series, Some(&patch)) {
                        Ok(_) => window.request_redraw(),
                        Err(err) => tracing::warn!(%err, "resize rejected"),
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    let at = to_interior(&plot, position.x, position.y);
                    cursor_at = Some(at);
                    if plot.pointer_move(at) {
                        window.request_redraw();
                    }
                }
                WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => match state {
                    ElementState::Pressed => {
                        let now = Instant::now();
                        if last_press.is_some_and(|t| now.duration_since(t) < DOUBLE_CLICK) {
                            plot.double_click();
                            last_press = None;
                        } else {
                            plot.pointer_down(cursor_at.unwrap_or(Point::ORIGIN));
                            last_press = Some(now);
                        }
                    }
                    ElementState::Released => plot.pointer_up(),
                },
                WindowEvent::MouseWheel { delta, .. } => {
                    // winit reports scroll-up as positive; wheel deltas grow downwards
                    let (dy, mode) = match delta {
                        MouseScrollDelta::LineDelta(_, y) => (-(y as f64), WheelMode::Line),
                        MouseScrollDelta::PixelDelta(p) => (-p.y, WheelMode::Pixel),
                    };
                    if plot.wheel(cursor_at.unwrap_or(Point::ORIGIN), dy, mode) {
                        window.request_redraw();
                    }
                }
                _ => {}
            },
            Event::MainEventsCleared => {
                if plot.tick(start.elapsed()) {
                    window.request_redraw();
                }
            }
            Event::RedrawRequested(_) => {
                if let Err(err) = blit(&mut plot, &mut surface) {
                    tracing::error!(%err, "present failed");
                }
            }
            _ => {}
        }
    });
}

/// Window pixels to plot-interior pixels.
fn to_interior(plot: &AnnotatedPlot<WindowHost>, x: f64, y: f64) -> Point {
    let m = plot.layout().margin;
    Point::new(x - m.left as f64, y - m.top as f64 - 1.0)
}

fn blit(plot: &mut AnnotatedPlot<WindowHost>, surface: &mut softbuffer::Surface) -> Result<()> {
    let (rgba, w, h, _) = plot.render_to_rgba8()?;
    let (Some(nw), Some(nh)) = (NonZeroU32::new(w as u32), NonZeroU32::new(h as u32)) else {
        return Ok(());
    };
    surface.resize(nw, nh).map_err(|e| anyhow!("resize: {e}"))?;
    let mut frame = surface.buffer_mut().map_err(|e| anyhow!("buffer: {e}"))?;
    // softbuffer wants 0RGB
    for (dst, px) in frame.iter_mut().zip(rgba.chunks_exact(4)) {
        *dst = (px[0] as u32) << 16 | (px[1] as u32) << 8 | px[2] as u32;
    }
    frame.present().map_err(|e| anyhow!("present: {e}"))?;
    Ok(())
}

/// First column is x; every other column is one series.
fn load_series_csv(path: &Path) -> Result<Vec<Series>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_path(path)?;
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut x = Vec::new();
    let mut ys: Vec<Vec<f64>> = vec![Vec::new(); headers.len().saturating_sub(1)];
    for rec in rdr.records() {
        let rec = rec?;
        let parse = |i: usize| rec.get(i).and_then(|s| s.parse::<f64>().ok());
        let Some(xv) = parse(0) else { continue };
        x.push(xv);
        for (col, y) in ys.iter_mut().enumerate() {
            y.push(parse(col + 1).unwrap_or(f64::NAN));
        }
    }
    Ok(headers.iter().skip(1).zip(ys).enumerate().map(|(i, (name, y))| styled(name, i, x.clone(), y)).collect())
}

fn styled(name: &str, i: usize, x: Vec<f64>, y: Vec<f64>) -> Series {
    const COLORS: [&str; 4] = ["rgb(31,119,180)", "rgb(255,127,14)", "rgb(44,160,44)", "rgb(214,39,40)"];
    const SYMBOLS: [Symbol; 4] = [Symbol::Circle, Symbol::Square, Symbol::Star, Symbol::Wye];
    let color = COLORS[i % COLORS.len()];
    Series::new(name, Mode::BOTH, x, y)
        .with_line(LineStyle::new(2.0, color))
        .with_marker(MarkerStyle::new(SYMBOLS[i % SYMBOLS.len()], 6.0, color))
}

fn sample_series() -> Vec<Series> {
    let x: Vec<f64> = (0..60).map(|i| i as f64 * 0.2).collect();
    let a = x.iter().map(|v| (v * 0.8).sin() * 2.0 + 3.0).collect();
    let b = x.iter().map(|v| (v * 0.5).cos() * 1.5 + 1.0).collect();
    vec![styled("alpha", 0, x.clone(), a), styled("beta", 1, x, b)]
}
