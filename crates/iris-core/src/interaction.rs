// File: crates/iris-core/src/interaction.rs
// Summary: Pan/zoom gesture state machine producing the view transform, with an animated reset.

use std::time::Duration;

use crate::animation::{AnimationTask, Easing};
use crate::geometry::Point;
use crate::types::CursorStyle;
use crate::view::{clamp_scale, ViewTransform};

pub const RESET_DURATION: Duration = Duration::from_millis(200);

/// Unit of a wheel delta, as reported by the platform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WheelMode {
    #[default]
    Pixel,
    Line,
    Page,
}

/// Zoom exponent for a wheel event: `k' = k * 2^delta`.
pub fn wheel_delta(delta_y: f64, mode: WheelMode) -> f64 {
    let unit = match mode {
        WheelMode::Pixel => 0.002,
        WheelMode::Line => 0.05,
        WheelMode::Page => 1.0,
    };
    -delta_y * unit
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Transformed,
}

#[derive(Clone, Copy, Debug)]
struct Reset {
    from: ViewTransform,
    task: AnimationTask,
}

#[derive(Debug, Default)]
pub struct InteractionController {
    transform: ViewTransform,
    drag_from: Option<Point>,
    reset: Option<Reset>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn state(&self) -> InteractionState {
        if self.transform.is_identity() {
            InteractionState::Idle
        } else {
            InteractionState::Transformed
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_from.is_some()
    }

    pub fn is_resetting(&self) -> bool {
        self.reset.is_some()
    }

    pub fn cursor(&self) -> CursorStyle {
        if self.is_dragging() { CursorStyle::Grabbing } else { CursorStyle::Grab }
    }

    pub fn pointer_down(&mut self, at: Point) {
        self.reset = None;
        self.drag_from = Some(at);
    }

    /// Pan while a drag is active. Returns true when the transform changed.
    pub fn pointer_move(&mut self, at: Point) -> bool {
        let Some(from) = self.drag_from else {
            return false;
        };
        self.drag_from = Some(at);
        let (dx, dy) = (at.x - from.x, at.y - from.y);
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        self.transform = self.transform.translate_by(dx, dy);
        true
    }

    pub fn pointer_up(&mut self) {
        self.drag_from = None;
    }

    /// Zoom about `at`. Returns true when the transform changed (it may not at the clamp).
    pub fn wheel(&mut self, at: Point, delta_y: f64, mode: WheelMode) -> bool {
        self.reset = None;
        let k = clamp_scale(self.transform.k * 2f64.powf(wheel_delta(delta_y, mode)));
        if k == self.transform.k {
            return false;
        }
        let next = self.transform.scale_about(k, at);
        tracing::trace!(k = next.k, "zoom");
        self.transform = next;
        true
    }

    /// Start (or restart) the animated return to identity.
    pub fn double_click(&mut self) {
        self.drag_from = None;
        self.reset = Some(Reset { from: self.transform, task: AnimationTask::new(RESET_DURATION, Easing::Linear) });
    }

    /// Advance the reset animation. Returns true when the transform changed.
    /// The path interpolates `(x, y, k)` linearly, not along a van Wijk zoom curve.
    pub fn tick(&mut self, now: Duration) -> bool {
        let Some(reset) = self.reset.as_mut() else {
            return false;
        };
        let t = reset.task.sample(now);
        let next = reset.from.lerp(ViewTransform::IDENTITY, t);
        if reset.task.is_finished() {
            self.reset = None;
        }
        let changed = next != self.transform;
        self.transform = next;
        changed
    }

    /// Jump to identity, dropping any gesture or animation in progress.
    pub fn reset_immediate(&mut self) {
        self.drag_from = None;
        self.reset = None;
        self.transform = ViewTransform::IDENTITY;
    }
}
