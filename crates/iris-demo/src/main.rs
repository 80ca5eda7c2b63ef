// File: crates/iris-demo/src/main.rs
// Summary: Demo loads a wide CSV (x column + one column per series) and renders it to PNG and axes SVG.

use anyhow::{Context, Result};
use iris_core::{
    AnnotatedPlot, HeadlessHost, HostData, LayoutOptions, LineStyle, MarkerStyle, Mode, Series, Symbol,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Trace colors, cycled per column.
const PALETTE: [&str; 6] = [
    "rgb(31,119,180)",
    "rgb(255,127,14)",
    "rgb(44,160,44)",
    "rgb(214,39,40)",
    "rgb(148,103,189)",
    "rgb(140,86,75)",
];
const SYMBOLS: [Symbol; 4] = [Symbol::Circle, Symbol::Square, Symbol::Diamond, Symbol::Triangle];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,iris_core=debug")))
        .init();

    let mut args = std::env::args().skip(1);
    let csv_path = args.next().map(PathBuf::from);
    let layout_path = args.next().map(PathBuf::from);

    let series = match &csv_path {
        Some(path) => load_series_csv(path).with_context(|| format!("failed to load CSV '{}'", path.display()))?,
        None => {
            tracing::info!("no CSV given; plotting built-in sample");
            sample_series()
        }
    };
    if series.is_empty() {
        anyhow::bail!("no series loaded; expected an x column followed by at least one y column");
    }
    tracing::info!(series = series.len(), points = series.iter().map(Series::len).sum::<usize>(), "loaded");

    let layout = match &layout_path {
        Some(path) => load_layout(path)?,
        None => LayoutOptions::default().size(960, 540),
    };

    let mut plot = AnnotatedPlot::new(&series, HeadlessHost::default(), &layout)?;
    let stem = csv_path.as_deref().and_then(|p| p.file_stem()).and_then(|s| s.to_str()).unwrap_or("sample");

    let out_png = out_name_with(stem, "png")?;
    plot.render_to_png(&out_png)?;
    println!("Wrote {}", out_png.display());

    if let Some(svg) = plot.axes_svg() {
        let out_svg = out_name_with(stem, "svg")?;
        std::fs::write(&out_svg, svg).with_context(|| format!("writing {}", out_svg.display()))?;
        println!("Wrote {}", out_svg.display());
    }
    Ok(())
}

/// Layout from either a bare layout object or a full `{ "series", "layout" }` host payload.
fn load_layout(path: &Path) -> Result<LayoutOptions> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    if value.get("layout").is_some() {
        return Ok(HostData::from_value(&value)?.layout);
    }
    Ok(serde_json::from_value(value)?)
}

/// Produce output file name like target/out/iris_<stem>.<ext>
fn out_name_with(stem: &str, ext: &str) -> Result<PathBuf> {
    let out = PathBuf::from("target/out");
    std::fs::create_dir_all(&out).with_context(|| format!("creating {}", out.display()))?;
    Ok(out.join(format!("iris_{stem}.{ext}")))
}

/// First column is x; every other column becomes a lines+markers series named by its header.
fn load_series_csv(path: &Path) -> Result<Vec<Series>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    tracing::debug!(?headers, "csv headers");
    if headers.len() < 2 {
        return Ok(Vec::new());
    }

    let mut x = Vec::new();
    let mut ys: Vec<Vec<f64>> = vec![Vec::new(); headers.len() - 1];
    for (row, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let parse = |i: usize| rec.get(i).and_then(|s| s.parse::<f64>().ok());
        let Some(xv) = parse(0) else {
            tracing::warn!(row, "skipping row without numeric x");
            continue;
        };
        x.push(xv);
        for (col, y) in ys.iter_mut().enumerate() {
            // blanks become gaps in the curve
            y.push(parse(col + 1).unwrap_or(f64::NAN));
        }
    }

    Ok(headers[1..]
        .iter()
        .zip(ys)
        .enumerate()
        .map(|(i, (name, y))| styled(name, i, x.clone(), y))
        .collect())
}

fn styled(name: &str, i: usize, x: Vec<f64>, y: Vec<f64>) -> Series {
    let color = PALETTE[i % PALETTE.len()];
    Series::new(name, Mode::BOTH, x, y)
        .with_line(LineStyle::new(2.0, color))
        .with_marker(MarkerStyle::new(SYMBOLS[i % SYMBOLS.len()], 5.0, color))
}

fn sample_series() -> Vec<Series> {
    let x: Vec<f64> = (0..40).map(|i| i as f64 * 0.25).collect();
    let sin = x.iter().map(|v| v.sin() * 3.0).collect();
    let decay = x.iter().map(|v| 4.0 * (-v / 4.0).exp()).collect();
    vec![styled("sin", 0, x.clone(), sin), styled("decay", 1, x, decay)]
}
