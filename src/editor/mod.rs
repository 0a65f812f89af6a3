//! Waveform editing core.
//!
//! Owns the shared sample buffer, the gesture-driven edit operations, the
//! periodic smoothing pass, looping audio playback, and the plain-text
//! waveform persistence format.

pub mod audio;
pub mod buffer;
pub mod ops;
pub mod persist;
pub mod smooth;
pub mod ui;

pub use audio::{SampleClock, WavePlayer};
pub use buffer::{WaveBuffer, LENGTH, NEUTRAL};
pub use ops::{EditMode, Gesture, WaveEditor};
pub use smooth::{smooth, SmoothingKind};
pub use ui::{EditorCommand, EditorStatus, WaveTui};
