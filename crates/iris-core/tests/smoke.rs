// File: crates/iris-core/tests/smoke.rs
// Purpose: Basic end-to-end render smoke test writing a PNG and the axes SVG.

use iris_core::{AnnotatedPlot, HeadlessHost, LayoutOptions, LineStyle, MarkerStyle, Mode, Series, Symbol};

#[test]
fn render_smoke_png() {
    let series = vec![Series::new(
        "sine",
        Mode::BOTH,
        vec![0.0, 1.0, 2.0, 3.0, 4.0],
        vec![0.0, 2.0, 1.0, 3.5, 2.5],
    )
    .with_line(LineStyle::new(2.0, "rgb(31,119,180)"))
    .with_marker(MarkerStyle::new(Symbol::Circle, 6.0, "rgb(31,119,180)"))];

    let mut plot = AnnotatedPlot::new(&series, HeadlessHost::default(), &LayoutOptions::default().size(480, 320))
        .expect("plot should build");

    let out = std::path::PathBuf::from("target/test_out/smoke.png");
    plot.render_to_png(&out).expect("render should succeed");
    let meta = std::fs::metadata(&out).expect("output exists");
    assert!(meta.len() > 0, "png should be non-empty");

    // Also verify in-memory API works
    let bytes = plot.render_to_png_bytes().expect("render bytes");
    assert!(bytes.starts_with(&[137, 80, 78, 71]), "should be PNG header");

    let svg = plot.axes_svg().expect("axes drawn");
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(">X</text>") && svg.contains(">Y</text>"));
}
