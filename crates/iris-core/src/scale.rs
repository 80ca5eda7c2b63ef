// File: crates/iris-core/src/scale.rs
// Summary: Data extents and continuous (linear / log10) scales with nice domains, ticks and zoom rescaling.

use serde::Deserialize;

use crate::error::ScaleDomainError;
use crate::view::ViewTransform;

/// Fraction of the y span added above and below the data.
pub const Y_PADDING: f64 = 0.05;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    #[default]
    Linear,
    Log,
}

/// Logical data extents along both axes, as `(min, max)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domains {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

impl Default for Domains {
    fn default() -> Self {
        Self { x: (0.0, 1.0), y: (0.0, 1.0) }
    }
}

/// Compute x/y extents over every bound series. Non-finite values are ignored.
/// The y extent is padded by [`Y_PADDING`] of its span on each side; with `log_y` the
/// padding is applied to the decade span instead so a positive domain stays positive.
pub fn domains<'a, I>(series: I, log_y: bool) -> Domains
where
    I: IntoIterator<Item = &'a [(f64, f64)]>,
{
    let mut x = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y = (f64::INFINITY, f64::NEG_INFINITY);
    for data in series {
        for &(px, py) in data {
            if px.is_finite() {
                x = (x.0.min(px), x.1.max(px));
            }
            if py.is_finite() {
                y = (y.0.min(py), y.1.max(py));
            }
        }
    }
    let fallback = Domains::default();
    let x = if x.0 <= x.1 { x } else { fallback.x };
    let y = if y.0 <= y.1 {
        if log_y && y.0 > 0.0 { pad_log(y) } else { pad_linear(y) }
    } else {
        fallback.y
    };
    Domains { x, y }
}

fn pad_linear((min, max): (f64, f64)) -> (f64, f64) {
    let span = max - min;
    let pad = if span > 0.0 {
        span * Y_PADDING
    } else if min != 0.0 {
        min.abs() * Y_PADDING
    } else {
        0.5
    };
    (min - pad, max + pad)
}

fn pad_log((min, max): (f64, f64)) -> (f64, f64) {
    let (lo, hi) = pad_linear((min.log10(), max.log10()));
    (10f64.powf(lo), 10f64.powf(hi))
}

/// A continuous mapping from a logical domain to a pixel range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContinuousScale {
    kind: ScaleKind,
    domain: (f64, f64),
    range: (f64, f64),
}

impl ContinuousScale {
    /// Fails for a log scale whose domain is not strictly positive.
    pub fn new(kind: ScaleKind, domain: (f64, f64), range: (f64, f64)) -> Result<Self, ScaleDomainError> {
        if kind == ScaleKind::Log {
            let (a, b) = domain;
            if !(a > 0.0 && b > 0.0 && a.is_finite() && b.is_finite()) {
                return Err(ScaleDomainError { min: a.min(b), max: a.max(b) });
            }
        }
        Ok(Self { kind, domain, range })
    }

    pub fn linear(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { kind: ScaleKind::Linear, domain, range }
    }

    pub fn kind(&self) -> ScaleKind { self.kind }
    pub fn domain(&self) -> (f64, f64) { self.domain }
    pub fn range(&self) -> (f64, f64) { self.range }

    fn forward(&self, v: f64) -> f64 {
        match self.kind {
            ScaleKind::Linear => v,
            ScaleKind::Log => v.log10(),
        }
    }

    fn backward(&self, v: f64) -> f64 {
        match self.kind {
            ScaleKind::Linear => v,
            ScaleKind::Log => 10f64.powf(v),
        }
    }

    /// Map a domain value to pixels. A degenerate domain maps to the middle of the range.
    pub fn map(&self, v: f64) -> f64 {
        let d0 = self.forward(self.domain.0);
        let d1 = self.forward(self.domain.1);
        let span = d1 - d0;
        let t = if span == 0.0 { 0.5 } else { (self.forward(v) - d0) / span };
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    pub fn invert(&self, px: f64) -> f64 {
        let r = self.range.1 - self.range.0;
        let d0 = self.forward(self.domain.0);
        let d1 = self.forward(self.domain.1);
        let t = if r == 0.0 { 0.5 } else { (px - self.range.0) / r };
        self.backward(d0 + t * (d1 - d0))
    }

    /// Extend the domain to round tick boundaries.
    pub fn nice(mut self, count: usize) -> Self {
        self.domain = match self.kind {
            ScaleKind::Linear => nice_linear(self.domain, count),
            ScaleKind::Log => {
                let (a, b) = self.domain;
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                let lo = 10f64.powf(lo.log10().floor());
                let hi = 10f64.powf(hi.log10().ceil());
                if a <= b { (lo, hi) } else { (hi, lo) }
            }
        };
        self
    }

    /// Apply a zoom transform along one axis (d3 `rescaleX` / `rescaleY`).
    pub fn rescale(&self, t: &ViewTransform, axis: Axis) -> Result<Self, ScaleDomainError> {
        let (r0, r1) = self.range;
        let (p0, p1) = match axis {
            Axis::X => (t.invert_x(r0), t.invert_x(r1)),
            Axis::Y => (t.invert_y(r0), t.invert_y(r1)),
        };
        Self::new(self.kind, (self.invert(p0), self.invert(p1)), self.range)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        match self.kind {
            ScaleKind::Linear => ticks(self.domain.0, self.domain.1, count),
            ScaleKind::Log => log_ticks(self.domain.0, self.domain.1, count),
        }
    }

    /// Label formatter matching the tick density of `ticks(count)`.
    pub fn tick_format(&self, count: usize) -> impl Fn(f64) -> String {
        let kind = self.kind;
        let (a, b) = self.domain;
        let step = tick_increment(a.min(b), a.max(b), count);
        let precision = if step < 0.0 && step.is_finite() {
            (-step).log10().ceil().max(0.0) as usize
        } else {
            0
        };
        let dense_log = kind == ScaleKind::Log && log_ticks(a, b, count).len() > count;
        move |v: f64| match kind {
            ScaleKind::Linear => {
                let s = format!("{:.*}", precision, v);
                if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
                    s[1..].to_string()
                } else {
                    s
                }
            }
            ScaleKind::Log => {
                let mantissa = v / 10f64.powf(v.log10().floor());
                let keep = !dense_log || [1.0, 2.0, 5.0].iter().any(|m| (mantissa - m).abs() < 1e-6);
                if !keep {
                    String::new()
                } else if (1e-4..1e6).contains(&v.abs()) {
                    format!("{}", (v * 1e6).round() / 1e6)
                } else {
                    format!("{v:e}")
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Signed tick increment: positive = step, negative = 1/step (keeps small steps exact).
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let e10 = 50f64.sqrt();
    let e5 = 10f64.sqrt();
    let e2 = 2f64.sqrt();
    let step = (stop - start) / count.max(1) as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= e10 {
        10.0
    } else if error >= e5 {
        5.0
    } else if error >= e2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -10f64.powf(-power) / factor
    }
}

/// Round the domain out to tick boundaries. The domain is only replaced once the step
/// converges; a degenerate or non-finite domain comes back unchanged.
fn nice_linear(domain: (f64, f64), count: usize) -> (f64, f64) {
    let reversed = domain.1 < domain.0;
    let (mut start, mut stop) = if reversed { (domain.1, domain.0) } else { domain };
    if !(start < stop) || !start.is_finite() || !stop.is_finite() {
        return domain;
    }
    let mut prestep = f64::NAN;
    for _ in 0..10 {
        let step = tick_increment(start, stop, count);
        if step == prestep {
            return if reversed { (stop, start) } else { (start, stop) };
        }
        if step == 0.0 || !step.is_finite() {
            break;
        }
        if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        }
        prestep = step;
    }
    domain
}

/// Evenly spaced round values within `[start, stop]`, about `count` of them.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    let reversed = stop < start;
    let (start, stop) = if reversed { (stop, start) } else { (start, stop) };
    if start == stop && count > 0 {
        return vec![start];
    }
    let step = tick_increment(start, stop, count);
    if step == 0.0 || !step.is_finite() {
        return Vec::new();
    }
    let mut out: Vec<f64> = if step > 0.0 {
        let mut r0 = (start / step).round();
        let mut r1 = (stop / step).round();
        if r0 * step < start { r0 += 1.0; }
        if r1 * step > stop { r1 -= 1.0; }
        range_inclusive(r0, r1).map(|i| i * step).collect()
    } else {
        let inv = -step;
        let mut r0 = (start * inv).round();
        let mut r1 = (stop * inv).round();
        if r0 / inv < start { r0 += 1.0; }
        if r1 / inv > stop { r1 -= 1.0; }
        range_inclusive(r0, r1).map(|i| i / inv).collect()
    };
    if reversed {
        out.reverse();
    }
    out
}

fn range_inclusive(r0: f64, r1: f64) -> impl Iterator<Item = f64> {
    let n = if r1 >= r0 { (r1 - r0) as i64 + 1 } else { 0 };
    (0..n).map(move |i| r0 + i as f64)
}

fn log_ticks(a: f64, b: f64, count: usize) -> Vec<f64> {
    let reversed = b < a;
    let (u, v) = if reversed { (b, a) } else { (a, b) };
    let (i, j) = (u.log10(), v.log10());
    let mut out = Vec::new();
    if j - i < count as f64 {
        let (i, j) = (i.floor() as i32, j.ceil() as i32);
        'decades: for e in i..=j {
            for k in 1..10 {
                let t = 10f64.powi(e) * k as f64;
                if t < u {
                    continue;
                }
                if t > v {
                    break 'decades;
                }
                out.push(t);
            }
        }
        if out.len() * 2 < count {
            out = ticks(u, v, count);
        }
    } else {
        let n = ((j - i) as usize).min(count);
        out = ticks(i, j, n).into_iter().map(|e| 10f64.powf(e)).collect();
    }
    if reversed {
        out.reverse();
    }
    out
}
