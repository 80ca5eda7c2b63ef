// File: crates/iris-core/tests/interaction.rs
// Purpose: Pan/zoom/reset gestures and tooltip hit rules driven through the annotated plot.

use std::time::Duration;

use iris_core::tooltip::hit_test;
use iris_core::{
    AnnotatedPlot, CursorStyle, HeadlessHost, LayoutOptions, LineStyle, MarkerStyle, Mode, Point, Series, Symbol,
    ViewTransform, WheelMode,
};

fn plot(series: &[Series]) -> AnnotatedPlot<HeadlessHost> {
    AnnotatedPlot::new(series, HeadlessHost::default(), &LayoutOptions::default().size(400, 300)).unwrap()
}

fn trace(name: &str, y: f64, size: f64) -> Series {
    Series::new(name, Mode::BOTH, vec![0.0, 1.0, 2.0], vec![y, y + 1.0, y])
        .with_line(LineStyle::new(1.0, "rgb(10,10,10)"))
        .with_marker(MarkerStyle::new(Symbol::Circle, size, "rgb(10,10,10)"))
}

#[test]
fn zoom_stays_within_scale_extent() {
    let mut p = plot(&[trace("a", 0.0, 5.0)]);
    for _ in 0..40 {
        p.wheel(Point::new(100.0, 100.0), -2000.0, WheelMode::Pixel);
    }
    assert_eq!(p.transform().k, 100.0);
    assert!(!p.wheel(Point::new(100.0, 100.0), -2000.0, WheelMode::Pixel));
    for _ in 0..40 {
        p.wheel(Point::new(100.0, 100.0), 2000.0, WheelMode::Line);
    }
    assert_eq!(p.transform().k, 0.9);
}

#[test]
fn double_click_returns_to_identity_over_ticks() {
    let mut p = plot(&[trace("a", 0.0, 5.0)]);
    p.pointer_down(Point::new(10.0, 10.0));
    p.pointer_move(Point::new(60.0, 30.0));
    p.pointer_up();
    assert_eq!(p.cursor(), CursorStyle::Grab);
    p.double_click();
    let mut now = Duration::ZERO;
    while p.is_animating() {
        p.tick(now);
        now += Duration::from_millis(20);
    }
    assert_eq!(p.transform(), ViewTransform::IDENTITY);
}

#[test]
fn hit_radius_follows_marker_size() {
    let p = plot(&[trace("a", 0.0, 5.0)]);
    let scales = *p.plot().renderer().last_scales().unwrap();
    let c = scales.to_pixel(1.0, 1.0);
    assert_eq!(hit_test(p.binder(), &scales, Point::new(c.x + 4.99, c.y)).len(), 1);
    assert!(hit_test(p.binder(), &scales, Point::new(c.x + 5.01, c.y)).is_empty());
}

#[test]
fn overlapping_series_list_each_name_once() {
    let mut dup = trace("a", 0.0, 5.0);
    dup.x = vec![1.0, 1.0, 1.0];
    dup.y = vec![1.0, 1.0, 1.0];
    let p = plot(&[dup, trace("b", 0.0, 5.0)]);
    let scales = *p.plot().renderer().last_scales().unwrap();
    let hits = hit_test(p.binder(), &scales, scales.to_pixel(1.0, 1.0));
    let names: Vec<&str> = hits.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["a", "b"]);
}
