// File: crates/iris-core/src/curve.rs
// Summary: Natural cubic spline through pixel vertices, emitted as path commands.

use skia_safe as skia;

use crate::geometry::Point;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo(Point, Point, Point),
}

/// Natural cubic spline through `points`. Non-finite vertices split the curve into
/// separate runs; a run of one vertex is a bare move, two vertices a straight segment.
pub fn natural(points: &[Point]) -> Vec<PathCommand> {
    let mut out = Vec::with_capacity(points.len() + 1);
    for run in points.split(|p| !p.is_finite()).filter(|r| !r.is_empty()) {
        natural_run(run, &mut out);
    }
    out
}

fn natural_run(run: &[Point], out: &mut Vec<PathCommand>) {
    out.push(PathCommand::MoveTo(run[0]));
    match run.len() {
        1 => {}
        2 => out.push(PathCommand::LineTo(run[1])),
        _ => {
            let xs: Vec<f64> = run.iter().map(|p| p.x).collect();
            let ys: Vec<f64> = run.iter().map(|p| p.y).collect();
            let (ax, bx) = control_points(&xs);
            let (ay, by) = control_points(&ys);
            for i in 0..run.len() - 1 {
                out.push(PathCommand::CubicTo(
                    Point::new(ax[i], ay[i]),
                    Point::new(bx[i], by[i]),
                    run[i + 1],
                ));
            }
        }
    }
}

/// First and second control coordinates of each segment, solved with the Thomas
/// algorithm for continuous second derivatives and zero curvature at both ends.
fn control_points(x: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = x.len() - 1;
    let mut a = vec![1.0; n];
    let mut b = vec![4.0; n];
    let mut r = vec![0.0; n];
    a[0] = 0.0;
    b[0] = 2.0;
    r[0] = x[0] + 2.0 * x[1];
    for i in 1..n - 1 {
        r[i] = 4.0 * x[i] + 2.0 * x[i + 1];
    }
    a[n - 1] = 2.0;
    b[n - 1] = 7.0;
    r[n - 1] = 8.0 * x[n - 1] + x[n];
    for i in 1..n {
        let m = a[i] / b[i - 1];
        b[i] -= m;
        r[i] -= m * r[i - 1];
    }
    a[n - 1] = r[n - 1] / b[n - 1];
    for i in (0..n - 1).rev() {
        a[i] = (r[i] - a[i + 1]) / b[i];
    }
    b[n - 1] = (x[n] + a[n - 1]) / 2.0;
    for i in 0..n - 1 {
        b[i] = 2.0 * x[i + 1] - a[i + 1];
    }
    (a, b)
}

pub fn to_skia_path(commands: &[PathCommand]) -> skia::Path {
    let mut path = skia::Path::new();
    for cmd in commands {
        match *cmd {
            PathCommand::MoveTo(p) => {
                path.move_to(p);
            }
            PathCommand::LineTo(p) => {
                path.line_to(p);
            }
            PathCommand::CubicTo(c1, c2, p) => {
                path.cubic_to(c1, c2, p);
            }
        }
    }
    path
}

/// SVG `d` attribute for the same commands.
pub fn to_svg_path(commands: &[PathCommand]) -> String {
    use std::fmt::Write;
    let mut d = String::new();
    for cmd in commands {
        let _ = match *cmd {
            PathCommand::MoveTo(p) => write!(d, "M{},{}", p.x, p.y),
            PathCommand::LineTo(p) => write!(d, "L{},{}", p.x, p.y),
            PathCommand::CubicTo(c1, c2, p) => {
                write!(d, "C{},{},{},{},{},{}", c1.x, c1.y, c2.x, c2.y, p.x, p.y)
            }
        };
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(v: &[(f64, f64)]) -> Vec<Point> {
        v.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn short_runs() {
        assert!(natural(&[]).is_empty());
        assert_eq!(natural(&pts(&[(1.0, 2.0)])), vec![PathCommand::MoveTo(Point::new(1.0, 2.0))]);
        let two = natural(&pts(&[(0.0, 0.0), (3.0, 4.0)]));
        assert_eq!(two[1], PathCommand::LineTo(Point::new(3.0, 4.0)));
    }

    #[test]
    fn collinear_points_stay_on_the_line() {
        let cmds = natural(&pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]));
        assert_eq!(cmds.len(), 4);
        for cmd in &cmds[1..] {
            let PathCommand::CubicTo(c1, c2, _) = cmd else { panic!("expected cubic") };
            assert!((c1.x - c1.y).abs() < 1e-9);
            assert!((c2.x - c2.y).abs() < 1e-9);
        }
        // thirds of each unit segment
        let PathCommand::CubicTo(c1, c2, _) = cmds[1] else { unreachable!() };
        assert!((c1.x - 1.0 / 3.0).abs() < 1e-9);
        assert!((c2.x - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn non_finite_vertex_splits_the_curve() {
        let cmds = natural(&pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, f64::NAN), (3.0, 1.0), (4.0, 0.0)]));
        let moves = cmds.iter().filter(|c| matches!(c, PathCommand::MoveTo(_))).count();
        assert_eq!(moves, 2);
        assert!(to_svg_path(&cmds).starts_with("M0,0L1,1M3,1"));
    }
}
