//! Terminal user interface for the waveform editor.
//!
//! Plots the buffer on a canvas, maps mouse gestures into buffer
//! coordinates, and translates key presses into editor commands. The UI is
//! the input dispatcher: it owns the edit-mode state machine and pre-clamps
//! gesture coordinates into `[0, LENGTH - 1]` x and `[0, 255]` y.

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    style::{Color, Style},
    widgets::canvas::{Canvas, Points},
};
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};

use crate::editor::buffer::LENGTH;
use crate::editor::ops::{EditMode, Gesture};
use crate::editor::smooth::SmoothingKind;

/// How long a footer notice stays visible.
const NOTICE_DURATION: Duration = Duration::from_secs(3);

/// User input translated into an editor command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    /// No actionable input this poll.
    Continue,
    /// Pointer went down: forget the stroke anchor before the next gesture.
    LiftPen,
    /// Apply an edit gesture to the buffer.
    Gesture(Gesture),
    /// Toggle the periodic smoothing tick.
    ToggleSmoothing,
    /// Shorten the smoothing interval.
    FasterSmoothing,
    /// Lengthen the smoothing interval.
    SlowerSmoothing,
    /// Mute or unmute playback.
    ToggleMute,
    /// Save the buffer to the session file.
    Save,
    /// Load the buffer from the session file.
    Load,
    /// Exit the editor.
    Quit,
}

/// Status shown in the footer, assembled by the edit loop.
pub struct EditorStatus {
    pub smoothing: bool,
    pub interval_ms: u64,
    pub kind: SmoothingKind,
    pub muted: bool,
    pub file: String,
}

/// Terminal UI for waveform editing.
pub struct WaveTui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Area the waveform was last plotted into, for mouse coordinate mapping
    plot_area: Rect,
    mode: EditMode,
    notice: Option<(String, Instant)>,
}

impl WaveTui {
    /// Creates the TUI, entering alternate screen mode with mouse capture.
    ///
    /// # Errors
    /// - If raw mode cannot be enabled
    /// - If the terminal cannot be initialized
    pub fn new() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(WaveTui {
            terminal,
            plot_area: Rect::default(),
            mode: EditMode::Idle,
            notice: None,
        })
    }

    /// Draws the waveform plot and status footer.
    ///
    /// # Errors
    /// - If terminal rendering fails
    pub fn render(
        &mut self,
        snapshot: &[u8; LENGTH],
        anchor: Option<(i32, i32)>,
        status: &EditorStatus,
    ) -> anyhow::Result<()> {
        if let Some((_, shown_at)) = &self.notice {
            if shown_at.elapsed() > NOTICE_DURATION {
                self.notice = None;
            }
        }
        let notice = self.notice.as_ref().map(|(msg, _)| msg.clone());
        let mode = self.mode;

        let mut plot_area = self.plot_area;
        self.terminal.draw(|frame| {
            let area = frame.area();
            let footer_height = 1;

            let content_area = Rect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: area.height.saturating_sub(footer_height),
            };
            plot_area = content_area;

            let canvas = Canvas::default()
                .x_bounds([0.0, LENGTH as f64])
                .y_bounds([0.0, 256.0])
                .paint(|ctx| {
                    let coords: Vec<(f64, f64)> = snapshot
                        .iter()
                        .enumerate()
                        .map(|(i, &v)| (i as f64 + 0.5, 255.5 - v as f64))
                        .collect();
                    ctx.draw(&Points {
                        coords: &coords,
                        color: Color::Yellow,
                    });

                    if let Some((ax, ay)) = anchor {
                        ctx.draw(&Points {
                            coords: &[(ax as f64 + 0.5, 255.5 - ay as f64)],
                            color: Color::Red,
                        });
                    }
                })
                .background_color(Color::Rgb(0, 0, 0));

            frame.render_widget(canvas, content_area);

            let footer_area = Rect {
                x: area.x,
                y: area.y + area.height.saturating_sub(footer_height),
                width: area.width,
                height: footer_height,
            };

            let mode_label = match mode {
                EditMode::Idle => "idle",
                EditMode::Stroking => "draw",
                EditMode::Noising => "noise",
                EditMode::Dragging => "drag",
            };
            let smoothing_label = if status.smoothing {
                format!("smooth {}ms {}", status.interval_ms, status.kind)
            } else {
                "smooth off".to_string()
            };
            let indicator = if status.muted {
                Span::styled("▮▮ ", Style::default().fg(Color::Yellow))
            } else {
                Span::styled("▶ ", Style::default().fg(Color::Green))
            };

            let mut spans = vec![
                indicator,
                Span::raw(status.file.clone()),
                Span::raw(" / "),
                Span::raw(smoothing_label),
                Span::raw(" / "),
                Span::raw(mode_label),
            ];
            if let Some(msg) = &notice {
                spans.push(Span::raw(" / "));
                spans.push(Span::styled(
                    msg.clone(),
                    Style::default().fg(Color::Cyan),
                ));
            } else {
                spans.push(Span::raw(
                    " / L draw  R noise  M drag  s smooth  <> speed  m mute  b blank  o save  i load  q quit",
                ));
            }

            let footer = ratatui::widgets::Paragraph::new(Line::from(spans)).style(
                Style::default()
                    .fg(Color::Rgb(185, 207, 212))
                    .bg(Color::Rgb(0, 0, 0)),
            );
            frame.render_widget(footer, footer_area);
        })?;
        self.plot_area = plot_area;

        Ok(())
    }

    /// Shows a transient message in the footer.
    pub fn set_notice(&mut self, msg: impl Into<String>) {
        self.notice = Some((msg.into(), Instant::now()));
    }

    /// Polls for input for at most `timeout` and translates it into an
    /// editor command. The caller caps the timeout at the time remaining
    /// until the next smoothing tick.
    ///
    /// Mouse buttons select the edit mode: left strokes, right injects
    /// noise, middle drags. Pointer-down resets the stroke anchor; motion
    /// while a button is held produces gestures.
    ///
    /// # Errors
    /// - If event polling or reading fails
    pub fn handle_input(&mut self, timeout: Duration) -> anyhow::Result<EditorCommand> {
        if !event::poll(timeout)? {
            return Ok(EditorCommand::Continue);
        }

        match event::read()? {
            Event::Key(key) => Ok(match key.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    tracing::debug!("Quit requested");
                    EditorCommand::Quit
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    tracing::debug!("Ctrl+C pressed: quitting");
                    EditorCommand::Quit
                }
                KeyCode::Char('b') => EditorCommand::Gesture(Gesture::Blank),
                KeyCode::Char('s') => EditorCommand::ToggleSmoothing,
                KeyCode::Char('>') => EditorCommand::FasterSmoothing,
                KeyCode::Char('<') => EditorCommand::SlowerSmoothing,
                KeyCode::Char('m') => EditorCommand::ToggleMute,
                KeyCode::Char('o') => EditorCommand::Save,
                KeyCode::Char('i') => EditorCommand::Load,
                _ => EditorCommand::Continue,
            }),
            Event::Mouse(mouse) => Ok(match mouse.kind {
                MouseEventKind::Down(button) => {
                    self.mode = match button {
                        MouseButton::Left => EditMode::Stroking,
                        MouseButton::Right => EditMode::Noising,
                        MouseButton::Middle => EditMode::Dragging,
                    };
                    EditorCommand::LiftPen
                }
                MouseEventKind::Up(_) => {
                    self.mode = EditMode::Idle;
                    EditorCommand::Continue
                }
                MouseEventKind::Drag(_) => {
                    let (x, y) = self.map_position(mouse.column, mouse.row);
                    match self.mode {
                        EditMode::Stroking => EditorCommand::Gesture(Gesture::StrokeTo { x, y }),
                        EditMode::Noising => EditorCommand::Gesture(Gesture::NoiseAt { x }),
                        EditMode::Dragging => EditorCommand::Gesture(Gesture::DragAt { x, y }),
                        EditMode::Idle => EditorCommand::Continue,
                    }
                }
                _ => EditorCommand::Continue,
            }),
            _ => Ok(EditorCommand::Continue),
        }
    }

    /// Maps a terminal cell position into buffer coordinates, clamping
    /// x into `[0, LENGTH - 1]` and y into `[0, 255]`.
    fn map_position(&self, column: u16, row: u16) -> (i32, i32) {
        let area = self.plot_area;
        let width = area.width.max(1) as i32;
        let height = area.height.max(1) as i32;

        let col = (column as i32 - area.x as i32).clamp(0, width - 1);
        let line = (row as i32 - area.y as i32).clamp(0, height - 1);

        let x = (col * LENGTH as i32 / width).clamp(0, LENGTH as i32 - 1);
        let y = (line * 256 / height).clamp(0, 255);
        (x, y)
    }

    /// Restores the terminal: leaves alternate screen, releases the mouse.
    ///
    /// # Errors
    /// - If terminal mode cannot be disabled
    pub fn cleanup(&mut self) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}
