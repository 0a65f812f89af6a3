//! Periodic waveform smoothing.
//!
//! Each smoothing pass replaces samples with local averages, flattening the
//! waveform toward its mean over time. Two numerically distinct algorithms
//! are available; the causal form is the default. They are never merged:
//! the causal pass reads its own freshly-written values and is biased in the
//! direction of travel, while the symmetric pass averages a pre-pass
//! snapshot with wrap-around at both ends.

use crate::editor::buffer::{WaveBuffer, LENGTH};
use serde::{Deserialize, Serialize};

/// Which averaging algorithm a smoothing pass uses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SmoothingKind {
    /// Left-to-right running average. Each interior sample is replaced by
    /// the mean of its already-updated left neighbor and its not-yet-updated
    /// right neighbor, giving a directional bias.
    #[default]
    Causal,
    /// Every sample is replaced by the mean of both pre-pass neighbors,
    /// computed from a snapshot with wrap-around indexing.
    Symmetric,
}

impl std::fmt::Display for SmoothingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Causal => write!(f, "causal"),
            Self::Symmetric => write!(f, "symmetric"),
        }
    }
}

/// Runs one smoothing pass over the buffer.
pub fn smooth(buf: &WaveBuffer, kind: SmoothingKind) {
    match kind {
        SmoothingKind::Causal => smooth_causal(buf),
        SmoothingKind::Symmetric => smooth_symmetric(buf),
    }
}

/// Causal recursive average.
///
/// `buf[0]` is averaged from the pre-update first and last samples. Interior
/// samples then read `buf[i-1]` after this pass already rewrote it, and
/// `buf[i+1]` before. The final sample averages the just-updated `buf[0]`
/// with `buf[LENGTH-2]`.
fn smooth_causal(buf: &WaveBuffer) {
    let len = LENGTH as i64;
    buf.set(0, ((buf.get(1) as u16 + buf.get(len - 1) as u16) / 2) as u8);
    for i in 1..LENGTH - 1 {
        let i = i as i64;
        buf.set(i as usize, ((buf.get(i - 1) as u16 + buf.get(i + 1) as u16) / 2) as u8);
    }
    buf.set(
        LENGTH - 1,
        ((buf.get(0) as u16 + buf.get(len - 2) as u16) / 2) as u8,
    );
}

/// Non-causal symmetric average over a pre-pass snapshot.
fn smooth_symmetric(buf: &WaveBuffer) {
    let prev = buf.snapshot();
    for i in 0..LENGTH {
        let left = prev[(i + LENGTH - 1) % LENGTH] as u16;
        let right = prev[(i + 1) % LENGTH] as u16;
        buf.set(i, ((left + right) / 2) as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::buffer::NEUTRAL;

    #[test]
    fn test_neutral_buffer_is_fixed_point_of_both_kinds() {
        for kind in [SmoothingKind::Causal, SmoothingKind::Symmetric] {
            let buf = WaveBuffer::new();
            smooth(&buf, kind);
            assert!(
                buf.snapshot().iter().all(|&v| v == NEUTRAL),
                "kind {kind}"
            );
        }
    }

    #[test]
    fn test_causal_pass_is_directionally_biased() {
        let buf = WaveBuffer::new();
        buf.set(10, 0);
        smooth(&buf, SmoothingKind::Causal);

        // The spike's influence propagates rightward within one pass: the
        // left neighbor only saw the pre-update spike, while updates to the
        // right keep reading freshly-written values.
        assert_eq!(buf.get(9), 64); // (128 + 0) / 2
        assert_eq!(buf.get(10), (64 + 128) / 2); // reads updated buf[9]
        assert_eq!(buf.get(11), (96 + 128) / 2); // reads updated buf[10]
    }

    #[test]
    fn test_causal_edges_use_reference_order() {
        let buf = WaveBuffer::new();
        buf.set(0, 200);
        buf.set(1, 100);
        buf.set(LENGTH - 1, 50);
        buf.set(LENGTH - 2, 20);

        smooth(&buf, SmoothingKind::Causal);

        // buf[0] from pre-update buf[1] and buf[LENGTH-1].
        assert_eq!(buf.get(0), (100 + 50) / 2);
        // buf[1] from updated buf[0] and pre-update buf[2].
        assert_eq!(buf.get(1), (75 + 128) / 2);
        // Last sample from the *updated* buf[0] and updated buf[LENGTH-2].
        let updated_second_last = buf.get(LENGTH as i64 - 2) as u16;
        assert_eq!(
            buf.get(LENGTH as i64 - 1),
            ((75 + updated_second_last) / 2) as u8
        );
    }

    #[test]
    fn test_symmetric_pass_wraps_around() {
        let buf = WaveBuffer::new();
        buf.set(0, 200);
        smooth(&buf, SmoothingKind::Symmetric);

        // Neighbors of the spike pick up its pre-pass value through wrap.
        assert_eq!(buf.get(1), ((200u16 + 128) / 2) as u8);
        assert_eq!(buf.get(LENGTH as i64 - 1), ((128u16 + 200) / 2) as u8);
        // The spike itself only sees neutral neighbors.
        assert_eq!(buf.get(0), NEUTRAL);
    }

    #[test]
    fn test_symmetric_uses_pre_pass_snapshot_only() {
        let buf = WaveBuffer::new();
        buf.set(10, 0);
        smooth(&buf, SmoothingKind::Symmetric);

        // Unlike the causal pass, the spike does not chain rightward.
        assert_eq!(buf.get(9), 64);
        assert_eq!(buf.get(11), 64);
        assert_eq!(buf.get(10), NEUTRAL);
        assert_eq!(buf.get(12), NEUTRAL);
    }
}
