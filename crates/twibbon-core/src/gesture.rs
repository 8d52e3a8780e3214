//! Wheel, pinch, and slider input to bounded zoom scale.
//!
//! Every input channel produces a candidate scale that is clamped into
//! the current [`ScaleBounds`]. All handling is synchronous and per
//! event; there is no inertia or smoothing.

use crate::types::{ScaleBounds, TouchPoint};

/// Compute the candidate scale for one wheel event.
///
/// Scrolling down (positive `delta_y`) zooms out.
#[must_use]
pub fn wheel_candidate(current: f64, delta_y: f64, sensitivity: f64) -> f64 {
    current + (-delta_y * sensitivity)
}

/// Distance between exactly two touches, or `None` for any other count.
#[must_use]
pub fn two_finger_distance(touches: &[TouchPoint]) -> Option<f64> {
    match touches {
        [a, b] => Some(a.distance(*b)),
        _ => None,
    }
}

/// Snapshot taken when a two-finger touch begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchGesture {
    /// Distance between the fingers at gesture start.
    pub start_distance: f64,
    /// Scale at gesture start.
    pub start_scale: f64,
}

impl PinchGesture {
    /// Start a pinch if exactly two touches are active.
    ///
    /// Returns `None` for any other touch count, and for coincident
    /// touches whose zero distance would make the ratio undefined.
    #[must_use]
    pub fn begin(touches: &[TouchPoint], current_scale: f64) -> Option<Self> {
        let start_distance = two_finger_distance(touches)?;
        if !(start_distance.is_finite() && start_distance > 0.0) {
            return None;
        }
        Some(Self {
            start_distance,
            start_scale: current_scale,
        })
    }

    /// Candidate scale for the current two-finger distance.
    #[must_use]
    pub fn candidate(&self, current_distance: f64) -> f64 {
        self.start_scale * (current_distance / self.start_distance)
    }
}

/// Gesture state for one upload.
///
/// Holds only the in-progress pinch; the scale itself lives on the
/// session's transform and is passed in by reference.
#[derive(Debug, Clone, Default)]
pub struct GestureController {
    pinch: Option<PinchGesture>,
}

impl GestureController {
    /// Create a controller with no gesture in progress.
    #[must_use]
    pub const fn new() -> Self {
        Self { pinch: None }
    }

    /// The pinch currently in progress, if any.
    #[must_use]
    pub const fn pinch(&self) -> Option<&PinchGesture> {
        self.pinch.as_ref()
    }

    /// Drop any in-progress gesture.
    pub const fn reset(&mut self) {
        self.pinch = None;
    }

    /// Apply a wheel event, returning the clamped new scale.
    ///
    /// Wheel zoom is stateless; it only needs the current scale.
    #[must_use]
    pub fn wheel(current: f64, delta_y: f64, sensitivity: f64, bounds: ScaleBounds) -> f64 {
        let candidate = wheel_candidate(current, delta_y, sensitivity);
        let scale = bounds.clamp(candidate);
        tracing::debug!(delta_y, candidate, scale, "wheel zoom");
        scale
    }

    /// Handle a touch-start event.
    ///
    /// Records the pinch start when exactly two touches are active.
    /// Other touch counts leave any existing pinch state untouched.
    pub fn touch_start(&mut self, touches: &[TouchPoint], current: f64) {
        if let Some(pinch) = PinchGesture::begin(touches, current) {
            tracing::debug!(
                start_distance = pinch.start_distance,
                start_scale = pinch.start_scale,
                "pinch started"
            );
            self.pinch = Some(pinch);
        }
    }

    /// Handle a touch-move event.
    ///
    /// Returns the clamped new scale while exactly two touches are
    /// active and a pinch has started; `None` otherwise.
    #[must_use]
    pub fn touch_move(&self, touches: &[TouchPoint], bounds: ScaleBounds) -> Option<f64> {
        let pinch = self.pinch.as_ref()?;
        let current_distance = two_finger_distance(touches)?;
        let candidate = pinch.candidate(current_distance);
        let scale = bounds.clamp(candidate);
        tracing::debug!(current_distance, candidate, scale, "pinch zoom");
        Some(scale)
    }

    /// Handle a touch-end event with `remaining` touches still active.
    ///
    /// Fewer than two remaining touches ends the pinch so the next one
    /// starts fresh.
    pub fn touch_end(&mut self, remaining: usize) {
        if remaining < 2 && self.pinch.take().is_some() {
            tracing::debug!("pinch ended");
        }
    }

    /// Apply a slider value, returning the clamped new scale.
    #[must_use]
    pub fn slider(value: f64, bounds: ScaleBounds) -> f64 {
        bounds.clamp(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const SENSITIVITY: f64 = 0.001;

    fn bounds() -> ScaleBounds {
        ScaleBounds::new(0.5, 3.0)
    }

    fn pair(distance: f64) -> [TouchPoint; 2] {
        [TouchPoint::new(10.0, 20.0), TouchPoint::new(10.0 + distance, 20.0)]
    }

    #[test]
    fn wheel_up_zooms_in() {
        // delta_y = -100 -> +0.1
        assert_relative_eq!(GestureController::wheel(1.0, -100.0, SENSITIVITY, bounds()), 1.1, epsilon = 1e-12);
    }

    #[test]
    fn wheel_down_zooms_out() {
        assert_relative_eq!(GestureController::wheel(1.0, 250.0, SENSITIVITY, bounds()), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn wheel_clamps_to_bounds() {
        assert_relative_eq!(GestureController::wheel(0.6, 10_000.0, SENSITIVITY, bounds()), 0.5, epsilon = 1e-12);
        assert_relative_eq!(GestureController::wheel(2.9, -10_000.0, SENSITIVITY, bounds()), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn pinch_doubling_distance_doubles_scale() {
        let mut c = GestureController::new();
        c.touch_start(&pair(100.0), 0.8);
        let scale = c.touch_move(&pair(200.0), bounds()).unwrap();
        assert_relative_eq!(scale, 1.6, epsilon = 1e-12);
    }

    #[test]
    fn pinch_result_is_clamped() {
        let mut c = GestureController::new();
        c.touch_start(&pair(50.0), 2.0);
        assert_relative_eq!(c.touch_move(&pair(500.0), bounds()).unwrap(), 3.0, epsilon = 1e-12);
        assert_relative_eq!(c.touch_move(&pair(1.0), bounds()).unwrap(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn pinch_is_relative_to_start_scale_not_latest() {
        let mut c = GestureController::new();
        c.touch_start(&pair(100.0), 1.0);
        let _ = c.touch_move(&pair(150.0), bounds());
        // Same distance as start -> back to start scale.
        assert_relative_eq!(c.touch_move(&pair(100.0), bounds()).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn move_without_start_is_ignored() {
        let c = GestureController::new();
        assert!(c.touch_move(&pair(100.0), bounds()).is_none());
    }

    #[test]
    fn single_touch_does_not_start_pinch() {
        let mut c = GestureController::new();
        c.touch_start(&[TouchPoint::new(0.0, 0.0)], 1.0);
        assert!(c.pinch().is_none());
    }

    #[test]
    fn three_touch_move_is_ignored() {
        let mut c = GestureController::new();
        c.touch_start(&pair(100.0), 1.0);
        let three = [
            TouchPoint::new(0.0, 0.0),
            TouchPoint::new(10.0, 0.0),
            TouchPoint::new(20.0, 0.0),
        ];
        assert!(c.touch_move(&three, bounds()).is_none());
    }

    #[test]
    fn coincident_touches_do_not_start_pinch() {
        let mut c = GestureController::new();
        let same = [TouchPoint::new(5.0, 5.0), TouchPoint::new(5.0, 5.0)];
        c.touch_start(&same, 1.0);
        assert!(c.pinch().is_none());
    }

    #[test]
    fn touch_end_below_two_discards_pinch() {
        let mut c = GestureController::new();
        c.touch_start(&pair(100.0), 1.0);
        c.touch_end(2);
        assert!(c.pinch().is_some());
        c.touch_end(1);
        assert!(c.pinch().is_none());
        assert!(c.touch_move(&pair(200.0), bounds()).is_none());
    }

    #[test]
    fn new_pinch_starts_fresh() {
        let mut c = GestureController::new();
        c.touch_start(&pair(100.0), 1.0);
        c.touch_end(0);
        c.touch_start(&pair(40.0), 2.0);
        assert_relative_eq!(c.touch_move(&pair(20.0), bounds()).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn slider_clamps_without_snapping() {
        assert_relative_eq!(GestureController::slider(1.23456, bounds()), 1.23456, epsilon = 1e-12);
        assert_relative_eq!(GestureController::slider(0.1, bounds()), 0.5, epsilon = 1e-12);
        assert_relative_eq!(GestureController::slider(9.0, bounds()), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn any_sequence_stays_in_bounds() {
        let b = ScaleBounds::new(0.73, 3.0);
        let mut c = GestureController::new();
        let mut scale = b.min;
        let deltas = [-500.0, 9000.0, -3.0, 120.0, -120.0, f64::MAX, -f64::MAX];
        for (i, &d) in deltas.iter().enumerate() {
            scale = GestureController::wheel(scale, d, SENSITIVITY, b);
            assert!(b.contains(scale), "wheel step {i}: {scale}");

            c.touch_start(&pair(1.0 + i as f64), scale);
            if let Some(s) = c.touch_move(&pair(d.abs().min(1e6)), b) {
                scale = s;
            }
            assert!(b.contains(scale), "pinch step {i}: {scale}");
            c.touch_end(0);

            scale = GestureController::slider(d, b);
            assert!(b.contains(scale), "slider step {i}: {scale}");
        }
    }
}
