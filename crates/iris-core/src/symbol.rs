// File: crates/iris-core/src/symbol.rs
// Summary: Area-normalized marker shapes (circle, cross, diamond, square, star, triangle, wye).

use std::f64::consts::PI;

use skia_safe as skia;

use crate::geometry::Point;
use crate::series::Symbol;

const SQRT3: f64 = 1.732_050_807_568_877_2;
const TAN30: f64 = 0.577_350_269_189_625_8;
const STAR_KA: f64 = 0.890_813_091_529_285_2;

/// Radius of a circle marker with the given area in px².
pub fn circle_radius(area: f64) -> f64 {
    (area / PI).sqrt()
}

/// Polygon outline of a marker centered on the origin, or `None` for the circle.
pub fn outline(symbol: Symbol, area: f64) -> Option<Vec<Point>> {
    let area = area.max(0.0);
    let p = Point::new;
    let pts = match symbol {
        Symbol::Circle => return None,
        Symbol::Cross => {
            let r = (area / 5.0).sqrt() / 2.0;
            vec![
                p(-3.0 * r, -r), p(-r, -r), p(-r, -3.0 * r), p(r, -3.0 * r),
                p(r, -r), p(3.0 * r, -r), p(3.0 * r, r), p(r, r),
                p(r, 3.0 * r), p(-r, 3.0 * r), p(-r, r), p(-3.0 * r, r),
            ]
        }
        Symbol::Diamond => {
            let y = (area / (2.0 * TAN30)).sqrt();
            let x = y * TAN30;
            vec![p(0.0, -y), p(x, 0.0), p(0.0, y), p(-x, 0.0)]
        }
        Symbol::Square => {
            let h = area.sqrt() / 2.0;
            vec![p(-h, -h), p(h, -h), p(h, h), p(-h, h)]
        }
        Symbol::Star => {
            let kr = (PI / 10.0).sin() / (7.0 * PI / 10.0).sin();
            let kx = (2.0 * PI / 10.0).sin() * kr;
            let ky = -(2.0 * PI / 10.0).cos() * kr;
            let r = (area * STAR_KA).sqrt();
            let (x, y) = (kx * r, ky * r);
            let mut v = vec![p(0.0, -r), p(x, y)];
            for i in 1..5 {
                let a = 2.0 * PI * i as f64 / 5.0;
                let (s, c) = a.sin_cos();
                v.push(p(s * r, -c * r));
                v.push(p(c * x - s * y, s * x + c * y));
            }
            v
        }
        Symbol::Triangle => {
            let y = -(area / (SQRT3 * 3.0)).sqrt();
            vec![p(0.0, y * 2.0), p(-SQRT3 * y, -y), p(SQRT3 * y, -y)]
        }
        Symbol::Wye => {
            let (c, s) = (-0.5, SQRT3 / 2.0);
            let k = 1.0 / 12f64.sqrt();
            let a = (k / 2.0 + 1.0) * 3.0;
            let r = (area / a).sqrt();
            let (x0, y0) = (r / 2.0, r * k);
            let (x1, y1) = (x0, r * k + r);
            let (x2, y2) = (-x1, y1);
            vec![
                p(x0, y0), p(x1, y1), p(x2, y2),
                p(c * x0 - s * y0, s * x0 + c * y0),
                p(c * x1 - s * y1, s * x1 + c * y1),
                p(c * x2 - s * y2, s * x2 + c * y2),
                p(c * x0 + s * y0, c * y0 - s * x0),
                p(c * x1 + s * y1, c * y1 - s * x1),
                p(c * x2 + s * y2, c * y2 - s * x2),
            ]
        }
    };
    Some(pts)
}

/// Closed skia path for a marker of `area` px² centered at `center`.
pub fn path(symbol: Symbol, area: f64, center: Point) -> skia::Path {
    let mut path = skia::Path::new();
    match outline(symbol, area) {
        None => {
            path.add_circle(center, circle_radius(area.max(0.0)) as f32, None);
        }
        Some(pts) => {
            let at = |q: Point| Point::new(q.x + center.x, q.y + center.y);
            if let Some((first, rest)) = pts.split_first() {
                path.move_to(at(*first));
                for q in rest {
                    path.line_to(at(*q));
                }
                path.close();
            }
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polygon_area(pts: &[Point]) -> f64 {
        let n = pts.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let (a, b) = (pts[i], pts[(i + 1) % n]);
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice.abs() / 2.0
    }

    #[test]
    fn polygons_have_requested_area() {
        for sym in [Symbol::Cross, Symbol::Diamond, Symbol::Square, Symbol::Triangle, Symbol::Wye] {
            let pts = outline(sym, 64.0).unwrap();
            assert!((polygon_area(&pts) - 64.0).abs() < 1e-6, "{sym:?}");
        }
        let star = outline(Symbol::Star, 64.0).unwrap();
        assert_eq!(star.len(), 10);
        assert!((polygon_area(&star) - 64.0).abs() < 0.64);
    }

    #[test]
    fn circle_has_no_outline() {
        assert!(outline(Symbol::Circle, 10.0).is_none());
        assert!((circle_radius(PI * 9.0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn path_is_centered() {
        let p = path(Symbol::Square, 16.0, Point::new(10.0, 20.0));
        let b = p.bounds();
        assert_eq!((b.left, b.top, b.right, b.bottom), (8.0, 18.0, 12.0, 22.0));
    }
}
