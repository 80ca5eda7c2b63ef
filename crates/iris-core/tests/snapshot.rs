// File: crates/iris-core/tests/snapshot.rs
// Purpose: Golden snapshot harness with bless flow.
// Behavior:
// - Renders a deterministic small plot to PNG bytes.
// - If env UPDATE_SNAPSHOTS=1, (re)writes the snapshot file.
// - Else, if snapshot exists, compares decoded pixels within a small tolerance.
// - Else, logs a note and returns (skips) without failing to ease first run.

use iris_core::{AnnotatedPlot, HeadlessHost, LayoutOptions, LineStyle, MarkerStyle, Mode, Series, StrokeStyle, Symbol};

/// Fraction of channels allowed to differ; glyph rasterisation varies across font stacks.
const TOLERANCE: f64 = 0.01;

fn render_bytes() -> Vec<u8> {
    let series = vec![
        Series::new("a", Mode::BOTH, vec![0.0, 1.0, 2.0, 3.0, 4.0], vec![0.0, 1.0, 0.0, 1.5, 1.0])
            .with_line(LineStyle::new(2.0, "rgb(220,50,32)"))
            .with_marker(MarkerStyle::new(Symbol::Diamond, 8.0, "rgb(220,50,32)")),
        Series::new("b", Mode::LINES, vec![0.0, 2.0, 4.0], vec![-0.5, 0.5, 2.0])
            .with_line(LineStyle::new(1.5, "rgb(0,90,181)").dashed(StrokeStyle::Dashed))
            .with_marker(MarkerStyle::new(Symbol::Circle, 4.0, "rgb(0,90,181)")),
    ];
    let mut plot = AnnotatedPlot::new(&series, HeadlessHost::default(), &LayoutOptions::default().size(320, 240))
        .expect("plot");
    plot.render_to_png_bytes().expect("png bytes")
}

#[test]
fn golden_basic_plot() {
    let bytes = render_bytes();
    let snap_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/__snapshots__");
    let snap_path = snap_dir.join("basic_plot.png");

    let update = std::env::var("UPDATE_SNAPSHOTS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if update {
        std::fs::create_dir_all(&snap_dir).expect("create snapshots dir");
        std::fs::write(&snap_path, &bytes).expect("write snapshot");
        eprintln!("[snapshot] Updated {} ({} bytes)", snap_path.display(), bytes.len());
        return;
    }

    if snap_path.exists() {
        let want = std::fs::read(&snap_path).expect("read snapshot");
        let got_img = image::load_from_memory(&bytes).expect("decode got").to_rgba8();
        let want_img = image::load_from_memory(&want).expect("decode want").to_rgba8();
        assert_eq!(got_img.dimensions(), want_img.dimensions());
        let differing = got_img.as_raw().iter().zip(want_img.as_raw()).filter(|(a, b)| a.abs_diff(**b) > 8).count();
        let ratio = differing as f64 / got_img.as_raw().len() as f64;
        assert!(ratio <= TOLERANCE, "rendered pixels differ from golden snapshot {}: {:.4}", snap_path.display(), ratio);
    } else {
        eprintln!("[snapshot] Missing snapshot {}; set UPDATE_SNAPSHOTS=1 to bless.", snap_path.display());
    }
}
