//! The shared waveform buffer.
//!
//! A fixed-length array of 8-bit unsigned samples, logically circular. The
//! buffer is written by the control loop (gestures, smoothing, file load) and
//! read concurrently by the real-time audio callback. Each sample is an
//! `AtomicU8` accessed with relaxed ordering: tearing across samples is
//! tolerated (an audible glitch at worst), but the audio thread never blocks
//! on a lock the control loop could be holding.

use std::sync::atomic::{AtomicU8, Ordering};

/// Number of samples in the waveform. Never changes at runtime.
pub const LENGTH: usize = 500;

/// Mid-scale amplitude representing silence (a flat line).
pub const NEUTRAL: u8 = 128;

/// Fixed-length circular sample buffer shared between the control loop and
/// the audio callback.
pub struct WaveBuffer {
    samples: [AtomicU8; LENGTH],
}

impl WaveBuffer {
    /// Creates a buffer initialized to the neutral (silent) amplitude.
    pub fn new() -> Self {
        Self {
            samples: std::array::from_fn(|_| AtomicU8::new(NEUTRAL)),
        }
    }

    /// Reads the sample at `i`, wrapping the index into `[0, LENGTH)`.
    ///
    /// Defined for all integers: negative indices are normalized by adding
    /// LENGTH after the modulo, so `get(-1)` reads the last sample.
    pub fn get(&self, i: i64) -> u8 {
        let len = LENGTH as i64;
        let idx = ((i % len) + len) % len;
        self.samples[idx as usize].load(Ordering::Relaxed)
    }

    /// Writes `v` at index `i`. Callers pass indices already in range.
    pub fn set(&self, i: usize, v: u8) {
        self.samples[i].store(v, Ordering::Relaxed);
    }

    /// Resets every sample to the neutral amplitude.
    pub fn blank(&self) {
        for sample in &self.samples {
            sample.store(NEUTRAL, Ordering::Relaxed);
        }
    }

    /// Copies the current contents into a plain array.
    ///
    /// Used for display and persistence; the copy is not atomic as a whole,
    /// samples written mid-copy may mix old and new values.
    pub fn snapshot(&self) -> [u8; LENGTH] {
        std::array::from_fn(|i| self.samples[i].load(Ordering::Relaxed))
    }
}

impl Default for WaveBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_neutral() {
        let buf = WaveBuffer::new();
        for i in 0..LENGTH {
            assert_eq!(buf.get(i as i64), NEUTRAL);
        }
    }

    #[test]
    fn test_get_wraps_periodically() {
        let buf = WaveBuffer::new();
        buf.set(0, 10);
        buf.set(3, 42);
        buf.set(LENGTH - 1, 200);

        for i in [-2 * LENGTH as i64, -(LENGTH as i64), 0, LENGTH as i64] {
            assert_eq!(buf.get(i), 10);
            assert_eq!(buf.get(i + 3), 42);
        }
        assert_eq!(buf.get(-1), 200);
        assert_eq!(buf.get(LENGTH as i64 - 1), 200);
        assert_eq!(buf.get(2 * LENGTH as i64 - 1), 200);
    }

    #[test]
    fn test_blank_is_total_and_idempotent() {
        let buf = WaveBuffer::new();
        for i in 0..LENGTH {
            buf.set(i, (i % 256) as u8);
        }
        buf.blank();
        assert!(buf.snapshot().iter().all(|&v| v == NEUTRAL));
        buf.blank();
        assert!(buf.snapshot().iter().all(|&v| v == NEUTRAL));
    }

    #[test]
    fn test_snapshot_matches_contents() {
        let buf = WaveBuffer::new();
        for i in 0..LENGTH {
            buf.set(i, (i * 7 % 256) as u8);
        }
        let snap = buf.snapshot();
        for i in 0..LENGTH {
            assert_eq!(snap[i], (i * 7 % 256) as u8);
        }
    }
}
