// File: crates/iris-core/tests/binding.rs
// Purpose: Reconciliation behaviour across successive binds, through the public binder API.

use iris_core::binder::{LineKey, PointKey};
use iris_core::{
    BindError, DataBinder, HeadlessHost, LayoutOptions, LineStyle, MarkerStyle, Mode, Plot, Series, Symbol,
    ViewTransform,
};

fn series(name: &str, n: usize, mode: Mode) -> Series {
    let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let y: Vec<f64> = x.iter().map(|v| v * v).collect();
    Series::new(name, mode, x, y)
        .with_line(LineStyle::new(1.0, "rgb(0,0,0)"))
        .with_marker(MarkerStyle::new(Symbol::Square, 3.0, "rgba(0,0,0,0.5)"))
}

#[test]
fn record_counts_track_input() {
    let mut b = DataBinder::new();
    let diff = b.bind(&[series("a", 4, Mode::BOTH), series("b", 2, Mode::MARKERS)]).unwrap();
    assert_eq!((diff.lines.entered, diff.points.entered), (2, 6));
    assert_eq!((b.line_count(), b.point_count()), (2, 6));

    let diff = b.bind(&[series("a", 3, Mode::BOTH)]).unwrap();
    assert_eq!((diff.lines.updated, diff.lines.exited), (1, 1));
    assert_eq!((diff.points.updated, diff.points.exited), (3, 3));
    assert!(b.point(PointKey { series: 0, index: 3 }).is_none());
    assert_eq!(b.line(LineKey(0)).unwrap().data.len(), 3);
}

#[test]
fn empty_rebind_clears_everything() {
    let mut b = DataBinder::new();
    b.bind(&[series("a", 5, Mode::BOTH)]).unwrap();
    let diff = b.bind(&[]).unwrap();
    assert_eq!((diff.lines.exited, diff.points.exited), (1, 5));
    assert_eq!((b.line_count(), b.point_count()), (0, 0));
    assert!(b.is_bound());
}

#[test]
fn invalid_series_is_rejected_without_side_effects() {
    let mut b = DataBinder::new();
    b.bind(&[series("a", 3, Mode::BOTH)]).unwrap();
    let mut bad = series("b", 3, Mode::BOTH);
    bad.y.pop();
    let err = b.bind(&[series("a", 10, Mode::BOTH), bad]).unwrap_err();
    assert!(matches!(err, BindError::LengthMismatch { index: 1, .. }));
    assert_eq!(b.point_count(), 3);
}

#[test]
fn lines_mode_requires_a_line_style() {
    let mut s = series("a", 2, Mode::LINES);
    s.line = None;
    assert!(matches!(DataBinder::new().bind(&[s]), Err(BindError::MissingLine { .. })));

    let mut m = series("m", 2, Mode::MARKERS);
    m.line = None;
    let mut b = DataBinder::new();
    b.bind(&[m]).unwrap();
    assert!(b.line(LineKey(0)).unwrap().line.is_none());
}

#[test]
fn static_plot_redraws_rebound_data_in_place() {
    let mut plot = Plot::new(HeadlessHost::default(), &LayoutOptions::default().size(400, 300)).unwrap();
    let dot = |y: f64| {
        Series::new("dot", Mode::MARKERS, vec![0.0, 1.0], vec![y, y + 10.0])
            .with_marker(MarkerStyle::new(Symbol::Square, 10.0, "rgb(255,0,0)"))
    };
    plot.bind(&[dot(0.0)]).unwrap();
    assert!(plot.draw(&ViewTransform::IDENTITY));
    plot.bind(&[dot(100.0)]).unwrap();
    assert!(plot.draw(&ViewTransform::IDENTITY));

    let scales = *plot.renderer().last_scales().unwrap();
    let p = scales.to_pixel(0.0, 100.0);
    let m = plot.layout().margin;
    let (px, py) = ((m.left as f64 + p.x).round() as usize, (m.top as f64 + 1.0 + p.y).round() as usize);
    let (buf, _, _, stride) = plot.render_to_rgba8().unwrap();
    let i = py * stride + px * 4;
    assert!(buf[i] > 200 && buf[i + 1] < 80 && buf[i + 2] < 80, "marker should sit at its new position");
}
