// File: crates/iris-core/src/binder.rs
// Summary: Keyed reconciliation of incoming series into bound line and point records.
//
// Lines are keyed by series position and points by (series position, point index), so
// iteration order over both maps is the input order. A bind validates the whole list
// before touching any bound state.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::animation::{AnimationTask, Easing};
use crate::error::BindError;
use crate::series::{Mode, ResolvedLine, ResolvedMarker, Series};

/// How long updated records take to move from their old to their new values.
pub const UPDATE_TRANSITION: Duration = Duration::from_millis(10);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineKey(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointKey {
    pub series: usize,
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoundLine {
    pub name: String,
    pub mode: Mode,
    pub data: Vec<(f64, f64)>,
    /// Absent for markers-only series given no line style.
    pub line: Option<ResolvedLine>,
    previous: Option<Vec<(f64, f64)>>,
}

impl BoundLine {
    /// Vertices at transition progress `t`. Shape changes (different vertex count) snap.
    pub fn data_at(&self, t: f64) -> Vec<(f64, f64)> {
        match &self.previous {
            Some(prev) if t < 1.0 && prev.len() == self.data.len() => prev
                .iter()
                .zip(&self.data)
                .map(|(&(x0, y0), &(x1, y1))| (x0 + (x1 - x0) * t, y0 + (y1 - y0) * t))
                .collect(),
            _ => self.data.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoundPoint {
    pub name: String,
    pub mode: Mode,
    pub x: f64,
    pub y: f64,
    pub marker: ResolvedMarker,
    previous: Option<(f64, f64)>,
}

impl BoundPoint {
    pub fn position_at(&self, t: f64) -> (f64, f64) {
        match self.previous {
            Some((x0, y0)) if t < 1.0 => (x0 + (self.x - x0) * t, y0 + (self.y - y0) * t),
            _ => (self.x, self.y),
        }
    }
}

/// Records that carry an in-flight transition from a previous value.
trait Transitioned {
    /// Start this record from wherever `old` is displayed at progress `t`.
    fn inherit(&mut self, old: &Self, t: f64);
}

impl Transitioned for BoundLine {
    fn inherit(&mut self, old: &Self, t: f64) {
        self.previous = Some(old.data_at(t));
    }
}

impl Transitioned for BoundPoint {
    fn inherit(&mut self, old: &Self, t: f64) {
        self.previous = Some(old.position_at(t));
    }
}

/// Counts of entered / updated / exited records for one collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SetDiff {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BindDiff {
    pub lines: SetDiff,
    pub points: SetDiff,
}

/// A validated snapshot of a series list, ready to commit.
#[derive(Clone, Debug)]
pub struct PreparedBind {
    lines: Vec<(LineKey, BoundLine)>,
    points: Vec<(PointKey, BoundPoint)>,
}

impl PreparedBind {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }
}

#[derive(Debug, Default)]
pub struct DataBinder {
    lines: BTreeMap<LineKey, BoundLine>,
    points: BTreeMap<PointKey, BoundPoint>,
    transition: Option<AnimationTask>,
    data_bound: bool,
}

impl DataBinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `series` and copy it into bound records without touching current state.
    pub fn prepare(series: &[Series]) -> Result<PreparedBind, BindError> {
        let mut lines = Vec::with_capacity(series.len());
        let mut points = Vec::with_capacity(series.iter().map(Series::len).sum());
        for (si, s) in series.iter().enumerate() {
            let style = s.resolve(si)?;
            let data: Vec<(f64, f64)> = s.x.iter().copied().zip(s.y.iter().copied()).collect();
            points.extend(data.iter().enumerate().map(|(pi, &(x, y))| {
                let point = BoundPoint {
                    name: s.name.clone(),
                    mode: s.mode,
                    x,
                    y,
                    marker: style.marker,
                    previous: None,
                };
                (PointKey { series: si, index: pi }, point)
            }));
            let line = BoundLine { name: s.name.clone(), mode: s.mode, data, line: style.line, previous: None };
            lines.push((LineKey(si), line));
        }
        Ok(PreparedBind { lines, points })
    }

    /// Apply a prepared bind: delete missing keys, update existing ones, insert new ones.
    pub fn commit(&mut self, prepared: PreparedBind) -> BindDiff {
        self.data_bound = false;
        let t = self.transition_progress();
        let lines = reconcile(&mut self.lines, prepared.lines, t);
        let points = reconcile(&mut self.points, prepared.points, t);
        self.transition = (lines.updated + points.updated > 0)
            .then(|| AnimationTask::new(UPDATE_TRANSITION, Easing::Linear));
        self.data_bound = true;
        let diff = BindDiff { lines, points };
        tracing::debug!(?diff, lines = self.lines.len(), points = self.points.len(), "data bound");
        diff
    }

    pub fn bind(&mut self, series: &[Series]) -> Result<BindDiff, BindError> {
        let prepared = Self::prepare(series)?;
        Ok(self.commit(prepared))
    }

    /// True once a bind has fully reconciled both record sets.
    pub fn is_bound(&self) -> bool {
        self.data_bound
    }

    pub fn lines(&self) -> impl Iterator<Item = &BoundLine> {
        self.lines.values()
    }

    pub fn points(&self) -> impl Iterator<Item = &BoundPoint> {
        self.points.values()
    }

    pub fn line(&self, key: LineKey) -> Option<&BoundLine> {
        self.lines.get(&key)
    }

    pub fn point(&self, key: PointKey) -> Option<&BoundPoint> {
        self.points.get(&key)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Settled vertex data of every line, for extent computation.
    pub fn line_data(&self) -> impl Iterator<Item = &[(f64, f64)]> {
        self.lines.values().map(|l| l.data.as_slice())
    }

    pub fn transition_progress(&self) -> f64 {
        self.transition.map_or(1.0, |t| t.progress())
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some_and(|t| !t.is_finished())
    }

    /// Advance the update transition. Returns true while it is still running.
    pub fn tick(&mut self, now: Duration) -> bool {
        let Some(task) = self.transition.as_mut() else {
            return false;
        };
        task.sample(now);
        if task.is_finished() {
            self.settle();
            return false;
        }
        true
    }

    /// Finish any update transition now: every record shows its bound value.
    pub fn settle(&mut self) {
        self.transition = None;
        for line in self.lines.values_mut() {
            line.previous = None;
        }
        for point in self.points.values_mut() {
            point.previous = None;
        }
    }
}

fn reconcile<K: Ord + Copy, V: Transitioned>(map: &mut BTreeMap<K, V>, incoming: Vec<(K, V)>, t: f64) -> SetDiff {
    let mut next = BTreeMap::new();
    let mut diff = SetDiff::default();
    for (key, mut value) in incoming {
        match map.remove(&key) {
            Some(old) => {
                value.inherit(&old, t);
                diff.updated += 1;
            }
            None => diff.entered += 1,
        }
        next.insert(key, value);
    }
    diff.exited = map.len();
    *map = next;
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{LineStyle, MarkerStyle, Symbol};

    fn series(name: &str, n: usize, offset: f64) -> Series {
        let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| v * 2.0 + offset).collect();
        Series::new(name, Mode::BOTH, x, y)
            .with_line(LineStyle::new(2.0, "rgb(0,0,200)"))
            .with_marker(MarkerStyle::new(Symbol::Circle, 5.0, "rgb(0,0,200)"))
    }

    #[test]
    fn counts_match_input() {
        let mut b = DataBinder::new();
        let diff = b.bind(&[series("a", 3, 0.0), series("b", 5, 1.0)]).unwrap();
        assert!(b.is_bound());
        assert_eq!(b.line_count(), 2);
        assert_eq!(b.point_count(), 8);
        assert_eq!(diff.lines, SetDiff { entered: 2, updated: 0, exited: 0 });
        let names: Vec<&str> = b.points().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "a", "a", "b", "b", "b", "b", "b"]);
    }

    #[test]
    fn rebind_updates_and_removes() {
        let mut b = DataBinder::new();
        b.bind(&[series("a", 3, 0.0), series("b", 5, 1.0)]).unwrap();
        let diff = b.bind(&[series("c", 4, 0.0)]).unwrap();
        assert_eq!(diff.lines, SetDiff { entered: 0, updated: 1, exited: 1 });
        assert_eq!(diff.points, SetDiff { entered: 1, updated: 3, exited: 4 });
        assert_eq!(b.line(LineKey(0)).map(|l| l.name.as_str()), Some("c"));
        let diff = b.bind(&[]).unwrap();
        assert_eq!(diff.lines.exited, 1);
        assert_eq!((b.line_count(), b.point_count()), (0, 0));
    }

    #[test]
    fn failed_bind_keeps_previous_data() {
        let mut b = DataBinder::new();
        b.bind(&[series("a", 3, 0.0)]).unwrap();
        let mut bad = series("b", 2, 0.0);
        bad.y.pop();
        assert!(b.bind(&[series("ok", 2, 0.0), bad]).is_err());
        assert_eq!(b.line(LineKey(0)).map(|l| l.name.as_str()), Some("a"));
        assert_eq!(b.point_count(), 3);
    }

    #[test]
    fn updates_transition_then_settle() {
        let mut b = DataBinder::new();
        b.bind(&[series("a", 2, 0.0)]).unwrap();
        assert!(!b.is_transitioning());
        b.bind(&[series("a", 2, 10.0)]).unwrap();
        assert!(b.is_transitioning());
        let p = b.point(PointKey { series: 0, index: 1 }).unwrap();
        assert_eq!(p.position_at(0.0), (1.0, 2.0));
        assert_eq!(p.position_at(1.0), (1.0, 12.0));
        assert!(b.tick(Duration::from_millis(100)));
        assert!(!b.tick(Duration::from_millis(111)));
        assert_eq!(b.transition_progress(), 1.0);
        let line = b.line(LineKey(0)).unwrap();
        assert_eq!(line.data_at(0.0), vec![(0.0, 10.0), (1.0, 12.0)]);
    }

    #[test]
    fn caller_mutation_after_bind_has_no_effect() {
        let mut b = DataBinder::new();
        let mut input = vec![series("a", 2, 0.0)];
        b.bind(&input).unwrap();
        input[0].y[0] = 99.0;
        assert_eq!(b.point(PointKey { series: 0, index: 0 }).map(|p| p.y), Some(0.0));
    }
}
