//! Repulsion field for the start screen's "no" button.
//!
//! Every pointer sample near the button pushes it away along the separation
//! vector, harder the closer the pointer is. The accumulated offset is clamped
//! so the button box keeps `edge_margin` from every viewport edge.

use crate::config::{FLEE_EDGE_MARGIN, FLEE_PUSH_STRENGTH, FLEE_THRESHOLD};

/// Screen-space rectangle in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self { left: self.left + dx, top: self.top + dy, ..*self }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FleeButton {
    offset: (f64, f64),
    threshold: f64,
    push_strength: f64,
    edge_margin: f64,
}

impl Default for FleeButton {
    fn default() -> Self {
        Self {
            offset: (0.0, 0.0),
            threshold: FLEE_THRESHOLD,
            push_strength: FLEE_PUSH_STRENGTH,
            edge_margin: FLEE_EDGE_MARGIN,
        }
    }
}

impl FleeButton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current displacement from the button's layout position.
    pub fn offset(&self) -> (f64, f64) {
        self.offset
    }

    pub fn reset(&mut self) {
        self.offset = (0.0, 0.0);
    }

    /// Feed one pointer sample. `current` is the button's on-screen rect with
    /// the present offset already applied. Returns true if the button moved.
    pub fn on_pointer_move(&mut self, pointer: (f64, f64), current: Rect, viewport: (f64, f64)) -> bool {
        let (cx, cy) = current.center();
        let dx = cx - pointer.0;
        let dy = cy - pointer.1;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist <= 0.0 || dist >= self.threshold {
            return false;
        }
        let push = self.push_strength * (1.0 - dist / self.threshold);

        // Undo the current offset to find the layout position the clamp is
        // measured from.
        let base_left = current.left - self.offset.0;
        let base_top = current.top - self.offset.1;
        let m = self.edge_margin;
        let (w, h) = viewport;
        let nx = clamp_lenient(
            self.offset.0 + dx / dist * push,
            m - base_left,
            w - current.width - m - base_left,
        );
        let ny = clamp_lenient(
            self.offset.1 + dy / dist * push,
            m - base_top,
            h - current.height - m - base_top,
        );
        let moved = (nx, ny) != self.offset;
        self.offset = (nx, ny);
        moved
    }
}

// `f64::clamp` panics when min > max, which happens on viewports narrower than
// the button plus margins; prefer the upper bound then.
fn clamp_lenient(v: f64, min: f64, max: f64) -> f64 {
    v.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn far_pointer_leaves_button_alone() {
        let mut b = FleeButton::new();
        let rect = Rect::new(400.0, 300.0, 80.0, 40.0);
        assert!(!b.on_pointer_move((0.0, 0.0), rect, (1024.0, 768.0)));
        assert_eq!(b.offset(), (0.0, 0.0));
    }

    #[test]
    fn pointer_on_center_is_ignored() {
        let mut b = FleeButton::new();
        let rect = Rect::new(400.0, 300.0, 80.0, 40.0);
        assert!(!b.on_pointer_move(rect.center(), rect, (1024.0, 768.0)));
    }

    #[test]
    fn push_points_away_and_scales_with_proximity() {
        let rect = Rect::new(400.0, 300.0, 80.0, 40.0);
        let (cx, cy) = rect.center();

        let mut near = FleeButton::new();
        near.on_pointer_move((cx - 10.0, cy), rect, (1024.0, 768.0));
        let mut far = FleeButton::new();
        far.on_pointer_move((cx - 90.0, cy), rect, (1024.0, 768.0));

        assert!(near.offset().0 > far.offset().0);
        assert!(far.offset().0 > 0.0);
        assert_abs_diff_eq!(near.offset().0, 12.0 * 0.9, epsilon = 1e-9);
        assert_abs_diff_eq!(near.offset().1, 0.0);
    }

    #[test]
    fn clamp_uses_displaced_position() {
        let mut b = FleeButton::new();
        let layout = Rect::new(900.0, 300.0, 80.0, 40.0);
        let viewport = (1024.0, 768.0);
        for _ in 0..100 {
            let current = layout.translated(b.offset().0, b.offset().1);
            let (cx, cy) = current.center();
            b.on_pointer_move((cx - 5.0, cy), current, viewport);
        }
        let rect = layout.translated(b.offset().0, b.offset().1);
        assert_abs_diff_eq!(rect.left + rect.width, 1024.0 - 20.0, epsilon = 1e-9);
    }

    #[test]
    fn tiny_viewport_does_not_panic() {
        let mut b = FleeButton::new();
        let rect = Rect::new(0.0, 0.0, 80.0, 40.0);
        b.on_pointer_move((10.0, 10.0), rect, (50.0, 30.0));
    }
}
