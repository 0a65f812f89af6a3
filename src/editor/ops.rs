//! Waveform editing operations.
//!
//! Translates pointer gestures into buffer mutations: line-interpolated
//! freehand strokes, localized noise injection, and a weighted drag that
//! pulls samples toward a target amplitude. All operations are infallible;
//! callers pre-clamp `x` into `[0, LENGTH - 1]`.

use crate::editor::buffer::{WaveBuffer, LENGTH};
use rand::Rng;

/// Half-width of the noise window, in samples.
pub const NOISE_RADIUS: i32 = 4;

/// Half-width of the drag window, in samples.
pub const DRAG_RADIUS: i32 = 5 * NOISE_RADIUS;

/// One user-issued mutation, consumed immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Continue a freehand stroke to `(x, y)`, interpolating from the
    /// previous anchor point if one exists.
    StrokeTo { x: i32, y: i32 },
    /// Randomize samples in a small window around `x`.
    NoiseAt { x: i32 },
    /// Pull samples in a window around `x` partway toward `y`.
    DragAt { x: i32, y: i32 },
    /// Reset the whole buffer to neutral.
    Blank,
}

/// Which edit operation pointer motion currently maps to.
///
/// Selected by mouse button state in the input dispatcher; the modes are
/// mutually exclusive per gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Idle,
    Stroking,
    Noising,
    Dragging,
}

/// Applies gestures to a [`WaveBuffer`], tracking the stroke anchor.
#[derive(Debug, Default)]
pub struct WaveEditor {
    /// Last stroke endpoint, used as the interpolation anchor for the next
    /// stroke. `None` after a pointer-down or before any stroke.
    anchor: Option<(i32, i32)>,
}

impl WaveEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one gesture to the buffer.
    pub fn apply(&mut self, buf: &WaveBuffer, gesture: Gesture) {
        match gesture {
            Gesture::StrokeTo { x, y } => self.stroke(buf, x, y),
            Gesture::NoiseAt { x } => noise(buf, x),
            Gesture::DragAt { x, y } => drag(buf, x, y),
            Gesture::Blank => buf.blank(),
        }
    }

    /// Forgets the stroke anchor. Called on pointer-down so a new stroke
    /// does not connect to the end of the previous one.
    pub fn lift_pen(&mut self) {
        self.anchor = None;
    }

    /// The last stroke endpoint, exposed for display.
    pub fn anchor(&self) -> Option<(i32, i32)> {
        self.anchor
    }

    /// Freehand stroke: sets `buf[x] = y` and, when an anchor exists and the
    /// pointer moved horizontally, fills every index strictly between the
    /// anchor and `x` with the line through both endpoints.
    ///
    /// Values are truncated toward zero and stored with 8-bit wrap. Pure
    /// vertical movement (`x == lastx`) sets only the endpoint; horizontal
    /// motion interpolates but vertical does not. That asymmetry is the
    /// intended behavior.
    fn stroke(&mut self, buf: &WaveBuffer, x: i32, y: i32) {
        if let Some((lastx, lasty)) = self.anchor {
            if x != lastx {
                let m = (lasty - y) as f32 / (lastx - x) as f32;
                let b = (y as f32 - m * x as f32) as i32;
                let step = if x > lastx { 1 } else { -1 };
                let mut xp = lastx;
                while xp != x {
                    buf.set(xp as usize, (m * xp as f32 + b as f32) as i32 as u8);
                    xp += step;
                }
            }
        }
        buf.set(x as usize, y as u8);
        self.anchor = Some((x, y));
    }
}

/// Assigns an independent uniform random value in `[0, 254]` to every index
/// in the window `[max(0, x-4), min(LENGTH-1, x+4))`. The window is
/// half-open; the upper bound is exclusive.
fn noise(buf: &WaveBuffer, x: i32) {
    let start = (x - NOISE_RADIUS).max(0);
    let end = (x + NOISE_RADIUS).min(LENGTH as i32 - 1);
    let mut rng = rand::thread_rng();
    for i in start..end {
        buf.set(i as usize, (rng.gen::<u32>() % 255) as u8);
    }
}

/// Pulls every sample in the window `[max(0, x-20), min(LENGTH-1, x+20))`
/// one fifth of the way toward the midpoint between its current value and
/// `y`. Integer division truncates toward zero at each step, so repeated
/// application converges geometrically rather than instantly.
fn drag(buf: &WaveBuffer, x: i32, y: i32) {
    let start = (x - DRAG_RADIUS).max(0);
    let end = (x + DRAG_RADIUS).min(LENGTH as i32 - 1);
    for i in start..end {
        let v = buf.get(i as i64) as i32;
        let delta = v - (v + y) / 2;
        buf.set(i as usize, (v - delta / 5) as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::buffer::NEUTRAL;

    #[test]
    fn test_first_stroke_sets_only_endpoint() {
        let buf = WaveBuffer::new();
        let mut editor = WaveEditor::new();

        editor.apply(&buf, Gesture::StrokeTo { x: 0, y: 200 });

        assert_eq!(buf.get(0), 200);
        for i in 1..LENGTH {
            assert_eq!(buf.get(i as i64), NEUTRAL);
        }
        assert_eq!(editor.anchor(), Some((0, 200)));
    }

    #[test]
    fn test_stroke_interpolates_between_anchors() {
        let buf = WaveBuffer::new();
        let mut editor = WaveEditor::new();

        editor.apply(&buf, Gesture::StrokeTo { x: 0, y: 200 });
        editor.apply(&buf, Gesture::StrokeTo { x: 10, y: 100 });

        // Line through (0,200) and (10,100): value 200 - 10*xp, truncated.
        for xp in 0..10 {
            assert_eq!(buf.get(xp), (200 - 10 * xp) as u8, "index {xp}");
        }
        assert_eq!(buf.get(10), 100);
        for i in 11..LENGTH {
            assert_eq!(buf.get(i as i64), NEUTRAL);
        }
    }

    #[test]
    fn test_vertical_stroke_never_interpolates() {
        let buf = WaveBuffer::new();
        let mut editor = WaveEditor::new();

        editor.apply(&buf, Gesture::StrokeTo { x: 5, y: 10 });
        editor.apply(&buf, Gesture::StrokeTo { x: 5, y: 250 });

        assert_eq!(buf.get(5), 250);
        for i in 0..LENGTH {
            if i != 5 {
                assert_eq!(buf.get(i as i64), NEUTRAL, "index {i}");
            }
        }
    }

    #[test]
    fn test_stroke_leftward_interpolates() {
        let buf = WaveBuffer::new();
        let mut editor = WaveEditor::new();

        editor.apply(&buf, Gesture::StrokeTo { x: 20, y: 100 });
        editor.apply(&buf, Gesture::StrokeTo { x: 10, y: 200 });

        // Stepping from 20 down to 11; index 10 set directly.
        assert_eq!(buf.get(10), 200);
        assert_eq!(buf.get(20), 100);
        for xp in 11..20 {
            let expected = (200 - 10 * (xp - 10)) as u8;
            assert_eq!(buf.get(xp as i64), expected, "index {xp}");
        }
    }

    #[test]
    fn test_lift_pen_breaks_interpolation() {
        let buf = WaveBuffer::new();
        let mut editor = WaveEditor::new();

        editor.apply(&buf, Gesture::StrokeTo { x: 0, y: 0 });
        editor.lift_pen();
        editor.apply(&buf, Gesture::StrokeTo { x: 10, y: 0 });

        // No interpolation happened between 0 and 10.
        for i in 1..10 {
            assert_eq!(buf.get(i), NEUTRAL);
        }
    }

    #[test]
    fn test_stroke_wraps_out_of_range_amplitude() {
        let buf = WaveBuffer::new();
        let mut editor = WaveEditor::new();

        editor.apply(&buf, Gesture::StrokeTo { x: 0, y: 300 });
        assert_eq!(buf.get(0), 300i32 as u8); // 44, natural 8-bit truncation
    }

    #[test]
    fn test_noise_mutates_exactly_the_window() {
        let buf = WaveBuffer::new();
        let mut editor = WaveEditor::new();

        editor.apply(&buf, Gesture::NoiseAt { x: 100 });

        for i in 0..LENGTH as i64 {
            if !(96..104).contains(&i) {
                assert_eq!(buf.get(i), NEUTRAL, "index {i}");
            }
        }
        // Window values are in [0, 254].
        for i in 96..104 {
            assert!(buf.get(i) <= 254);
        }
    }

    #[test]
    fn test_noise_window_clamps_at_edges() {
        let buf = WaveBuffer::new();
        let mut editor = WaveEditor::new();

        // Window at x = 0 is [0, 4).
        editor.apply(&buf, Gesture::NoiseAt { x: 0 });
        for i in 4..LENGTH as i64 {
            assert_eq!(buf.get(i), NEUTRAL);
        }

        buf.blank();
        // Window at x = LENGTH-1 is [LENGTH-5, LENGTH-1): the upper bound
        // clamps to LENGTH-1 exclusive, so the last sample is untouched.
        editor.apply(&buf, Gesture::NoiseAt { x: LENGTH as i32 - 1 });
        assert_eq!(buf.get(LENGTH as i64 - 1), NEUTRAL);
        for i in 0..LENGTH as i64 - 5 {
            assert_eq!(buf.get(i), NEUTRAL);
        }
    }

    #[test]
    fn test_drag_converges_toward_target() {
        let buf = WaveBuffer::new();
        let mut editor = WaveEditor::new();
        buf.set(100, 0);

        let target = 200;
        let mut prev_dist = (0i32 - target).abs();
        for _ in 0..50 {
            editor.apply(&buf, Gesture::DragAt { x: 100, y: target });
            let dist = (buf.get(100) as i32 - target).abs();
            assert!(dist <= prev_dist);
            prev_dist = dist;
        }
        // Truncating division stalls within a few counts of the target.
        assert!(prev_dist < 10, "stalled at distance {prev_dist}");
    }

    #[test]
    fn test_drag_single_step_math() {
        let buf = WaveBuffer::new();
        let mut editor = WaveEditor::new();
        buf.set(100, 0);

        editor.apply(&buf, Gesture::DragAt { x: 100, y: 200 });
        // delta = 0 - (0+200)/2 = -100; v' = 0 - (-100/5) = 20
        assert_eq!(buf.get(100), 20);
    }

    #[test]
    fn test_drag_only_mutates_window() {
        let buf = WaveBuffer::new();
        let mut editor = WaveEditor::new();

        editor.apply(&buf, Gesture::DragAt { x: 250, y: 0 });
        for i in 0..LENGTH as i64 {
            let in_window = (230..270).contains(&i);
            if !in_window {
                assert_eq!(buf.get(i), NEUTRAL, "index {i}");
            } else {
                // 128 pulled toward 0: delta = 128-64 = 64, v' = 128-12
                assert_eq!(buf.get(i), 116, "index {i}");
            }
        }
    }

    #[test]
    fn test_blank_gesture_resets_buffer() {
        let buf = WaveBuffer::new();
        let mut editor = WaveEditor::new();
        editor.apply(&buf, Gesture::StrokeTo { x: 42, y: 7 });

        editor.apply(&buf, Gesture::Blank);
        assert!(buf.snapshot().iter().all(|&v| v == NEUTRAL));
    }
}
