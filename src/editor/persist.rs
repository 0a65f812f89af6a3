//! Plain-text waveform persistence.
//!
//! The on-disk format is LENGTH lines of decimal integers, one sample per
//! line, in index order, with no header or metadata. Load resets the buffer
//! to neutral before reading so a short or garbled file leaves the tail in a
//! deterministic state.

use crate::editor::buffer::{WaveBuffer, LENGTH};
use anyhow::{anyhow, Result};
use std::fs;
use std::path::Path;

/// Writes the buffer to `path`, one decimal sample per line.
///
/// # Errors
/// - If the file cannot be created or written
pub fn save(buf: &WaveBuffer, path: &Path) -> Result<()> {
    let snapshot = buf.snapshot();
    let mut out = String::with_capacity(LENGTH * 4);
    for v in snapshot {
        out.push_str(&v.to_string());
        out.push('\n');
    }
    fs::write(path, out).map_err(|e| anyhow!("Couldn't open {} for writing: {e}", path.display()))?;
    tracing::info!("Waveform saved to {}", path.display());
    Ok(())
}

/// Loads a waveform from `path` into the buffer.
///
/// The buffer is blanked first, then up to LENGTH integers are assigned in
/// index order with 8-bit wrap and no range validation. Parsing stops at the
/// first malformed token, leaving the remaining samples neutral.
///
/// # Errors
/// - If the file cannot be opened or read
pub fn load(buf: &WaveBuffer, path: &Path) -> Result<()> {
    let content = fs::read_to_string(path)
        .map_err(|e| anyhow!("Couldn't open {}: {e}", path.display()))?;

    buf.blank();
    let mut count = 0usize;
    for (i, token) in content.split_whitespace().take(LENGTH).enumerate() {
        match token.parse::<i64>() {
            Ok(v) => {
                buf.set(i, v as u8);
                count = i + 1;
            }
            Err(_) => {
                tracing::warn!(
                    "Malformed value {:?} at line {} in {}; remaining samples left neutral",
                    token,
                    i + 1,
                    path.display()
                );
                break;
            }
        }
    }

    if count < LENGTH {
        tracing::warn!(
            "{} contained {} of {} samples; tail left neutral",
            path.display(),
            count,
            LENGTH
        );
    } else {
        tracing::info!("Waveform loaded from {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::buffer::NEUTRAL;
    use std::path::PathBuf;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("wavedraw_{}_{}.txt", tag, std::process::id()))
    }

    #[test]
    fn test_save_load_round_trip() {
        let path = temp_path("roundtrip");
        let buf = WaveBuffer::new();
        for i in 0..LENGTH {
            buf.set(i, (i * 13 % 256) as u8);
        }

        save(&buf, &path).unwrap();

        let restored = WaveBuffer::new();
        load(&restored, &path).unwrap();
        assert_eq!(buf.snapshot(), restored.snapshot());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_save_format_is_one_decimal_per_line() {
        let path = temp_path("format");
        let buf = WaveBuffer::new();
        buf.set(0, 0);
        buf.set(1, 255);

        save(&buf, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), LENGTH);
        assert_eq!(lines[0], "0");
        assert_eq!(lines[1], "255");
        assert_eq!(lines[2], "128");
        assert!(content.ends_with('\n'));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_short_file_leaves_tail_neutral() {
        let path = temp_path("short");
        std::fs::write(&path, "1\n2\n3\n").unwrap();

        let buf = WaveBuffer::new();
        buf.set(400, 9);
        load(&buf, &path).unwrap();

        assert_eq!(buf.get(0), 1);
        assert_eq!(buf.get(1), 2);
        assert_eq!(buf.get(2), 3);
        for i in 3..LENGTH {
            assert_eq!(buf.get(i as i64), NEUTRAL, "index {i}");
        }

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_malformed_token_stops_assignment() {
        let path = temp_path("malformed");
        std::fs::write(&path, "10\n20\nbogus\n30\n").unwrap();

        let buf = WaveBuffer::new();
        load(&buf, &path).unwrap();

        assert_eq!(buf.get(0), 10);
        assert_eq!(buf.get(1), 20);
        assert_eq!(buf.get(2), NEUTRAL);
        assert_eq!(buf.get(3), NEUTRAL);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_out_of_range_values_wrap() {
        let path = temp_path("wrap");
        std::fs::write(&path, "300\n-1\n").unwrap();

        let buf = WaveBuffer::new();
        load(&buf, &path).unwrap();

        assert_eq!(buf.get(0), 300i64 as u8); // 44
        assert_eq!(buf.get(1), 255); // -1 wraps

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_is_an_error_and_preserves_buffer() {
        let buf = WaveBuffer::new();
        buf.set(0, 7);
        let err = load(&buf, Path::new("/nonexistent/wavedraw/wave.txt"));
        assert!(err.is_err());
        // Blank only happens after a successful open.
        assert_eq!(buf.get(0), 7);
    }
}
