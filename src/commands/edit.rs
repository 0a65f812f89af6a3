//! Interactive waveform editing session.
//!
//! Runs the control loop: polls the TUI for gestures and commands, applies
//! edits to the shared buffer, fires the periodic smoothing tick, and keeps
//! the status line current. The audio callback reads the same buffer from
//! its own real-time thread for the entire session.

use crate::config::WavedrawConfig;
use crate::editor::{
    smooth, EditorCommand, EditorStatus, WaveBuffer, WaveEditor, WavePlayer, WaveTui,
};
use crate::editor::persist;
use crate::ui::ErrorScreen;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Runs the waveform editor.
///
/// The buffer starts blank (all neutral) and loops through the audio output
/// for the whole session. `file` overrides the configured session file used
/// by the in-editor save and load keys.
///
/// # Errors
/// - If the configuration cannot be loaded
/// - If the audio stream cannot be started
/// - If the terminal UI fails
pub async fn handle_edit(file: Option<PathBuf>) -> Result<(), anyhow::Error> {
    tracing::info!("=== wavedraw editor started ===");

    let config = match WavedrawConfig::load_or_default() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("Failed to load configuration: {err}");
            let error_message = format!(
                "Configuration Error:\n\n{err}\n\nPlease check your ~/.config/wavedraw/wavedraw.toml file and try again."
            );
            let mut error_screen = ErrorScreen::new()?;
            error_screen.show_error(&error_message)?;
            error_screen.cleanup()?;
            return Err(anyhow::anyhow!("Configuration error: {err}"));
        }
    };

    let session_file = file.unwrap_or_else(|| PathBuf::from(&config.editor.file));
    tracing::info!(
        "Configuration loaded: device={}, sample_rate={}Hz, smoothing={} every {}ms, file={}",
        config.audio.device,
        config.audio.sample_rate,
        config.editor.smoothing,
        config.editor.smooth_interval_ms,
        session_file.display()
    );

    let buffer = Arc::new(WaveBuffer::new());
    let mut player = WavePlayer::new(
        Arc::clone(&buffer),
        config.audio.sample_rate,
        config.audio.device.clone(),
    );

    if let Err(e) = player.start() {
        tracing::error!("Failed to start playback: {}", e);
        let error_message = format!(
            "Audio Error:\n\n{e}\n\nPlease check your audio configuration and try again."
        );
        let mut error_screen = ErrorScreen::new()?;
        error_screen.show_error(&error_message)?;
        error_screen.cleanup()?;
        return Err(e);
    }

    let mut tui = WaveTui::new().map_err(|e| anyhow::anyhow!("Failed to initialize UI: {e}"))?;
    let mut editor = WaveEditor::new();

    let mut smoothing_on = true;
    let mut interval_ms = config.editor.smooth_interval_ms.max(1);
    let mut next_tick = Instant::now() + Duration::from_millis(interval_ms);

    tracing::debug!("Entering edit loop");
    let result = run_edit_loop(
        &buffer,
        &mut player,
        &mut tui,
        &mut editor,
        &config,
        &session_file,
        &mut smoothing_on,
        &mut interval_ms,
        &mut next_tick,
    );

    tui.cleanup()
        .map_err(|e| anyhow::anyhow!("Cleanup failed: {e}"))?;

    result?;
    tracing::info!("=== wavedraw editor exited ===");
    Ok(())
}

/// Idle input poll timeout. The actual timeout shrinks to the smoothing
/// deadline so that intervals below this value are still honored.
const INPUT_POLL: Duration = Duration::from_millis(10);

/// After a stall (file I/O, a slow render) missed ticks are replayed up to
/// this many passes, then the deadline resynchronizes.
const MAX_CATCHUP_PASSES: u32 = 8;

/// How long to wait for input before the next smoothing tick is due.
fn input_poll_timeout(smoothing_on: bool, next_tick: Instant, now: Instant) -> Duration {
    if smoothing_on {
        next_tick.saturating_duration_since(now).min(INPUT_POLL)
    } else {
        INPUT_POLL
    }
}

/// Number of smoothing passes due at `now`, advancing the deadline one
/// interval per pass. Bounded: after the cap the deadline resynchronizes
/// to `now + interval` instead of replaying every missed tick.
fn due_smoothing_passes(next_tick: &mut Instant, interval: Duration, now: Instant) -> u32 {
    let mut passes = 0;
    while now >= *next_tick {
        passes += 1;
        *next_tick += interval;
        if passes == MAX_CATCHUP_PASSES {
            *next_tick = now + interval;
            break;
        }
    }
    passes
}

#[allow(clippy::too_many_arguments)]
fn run_edit_loop(
    buffer: &Arc<WaveBuffer>,
    player: &mut WavePlayer,
    tui: &mut WaveTui,
    editor: &mut WaveEditor,
    config: &WavedrawConfig,
    session_file: &Path,
    smoothing_on: &mut bool,
    interval_ms: &mut u64,
    next_tick: &mut Instant,
) -> Result<(), anyhow::Error> {
    loop {
        // The smoothing tick never preempts a gesture in flight; it runs
        // between polls, catching up on ticks missed during a stall.
        if *smoothing_on {
            let interval = Duration::from_millis(*interval_ms);
            let due = due_smoothing_passes(next_tick, interval, Instant::now());
            for _ in 0..due {
                smooth(buffer, config.editor.smoothing);
            }
        }

        let timeout = input_poll_timeout(*smoothing_on, *next_tick, Instant::now());
        match tui.handle_input(timeout) {
            Ok(EditorCommand::Continue) => {}
            Ok(EditorCommand::LiftPen) => editor.lift_pen(),
            Ok(EditorCommand::Gesture(gesture)) => editor.apply(buffer, gesture),
            Ok(EditorCommand::ToggleSmoothing) => {
                *smoothing_on = !*smoothing_on;
                if *smoothing_on {
                    *next_tick = Instant::now();
                }
                tracing::debug!("Smoothing {}", if *smoothing_on { "on" } else { "off" });
            }
            Ok(EditorCommand::FasterSmoothing) => {
                *interval_ms = (*interval_ms - 1).max(1);
                tracing::debug!("Smooth interval: {}ms", interval_ms);
            }
            Ok(EditorCommand::SlowerSmoothing) => {
                *interval_ms += 1;
                tracing::debug!("Smooth interval: {}ms", interval_ms);
            }
            Ok(EditorCommand::ToggleMute) => {
                if let Err(e) = player.toggle_mute() {
                    tracing::warn!("Failed to toggle mute: {}", e);
                }
            }
            Ok(EditorCommand::Save) => match persist::save(buffer, session_file) {
                Ok(()) => tui.set_notice(format!("saved {}", session_file.display())),
                Err(e) => {
                    tracing::error!("Save failed: {}", e);
                    tui.set_notice(format!("save failed: {e}"));
                }
            },
            Ok(EditorCommand::Load) => match persist::load(buffer, session_file) {
                Ok(()) => {
                    editor.lift_pen();
                    tui.set_notice(format!("loaded {}", session_file.display()));
                }
                Err(e) => {
                    tracing::error!("Load failed: {}", e);
                    tui.set_notice(format!("load failed: {e}"));
                }
            },
            Ok(EditorCommand::Quit) => break,
            Err(e) => {
                tracing::error!("Input handling error: {}", e);
                return Err(anyhow::anyhow!("Input handling error: {e}"));
            }
        }

        let status = EditorStatus {
            smoothing: *smoothing_on,
            interval_ms: *interval_ms,
            kind: config.editor.smoothing,
            muted: player.is_muted(),
            file: session_file.display().to_string(),
        };
        tui.render(&buffer.snapshot(), editor.anchor(), &status)
            .map_err(|e| anyhow::anyhow!("Render failed: {e}"))?;
    }
    Ok(())
}
