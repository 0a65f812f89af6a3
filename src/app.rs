//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use crate::commands;
use crate::logging;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use std::process;

/// A terminal-based waveform editor that plays the buffer as a loop
#[derive(Parser)]
#[command(name = "wavedraw")]
#[command(version)]
#[command(about = "Draw a waveform with the mouse while it loops through your speakers")]
#[command(
    long_about = "A terminal-based waveform editor and synthesizer.\n\nA 500-sample 8-bit waveform loops continuously through the audio output\nwhile you reshape it with mouse gestures: draw freehand with the left\nbutton, inject noise with the right, pull samples toward the pointer with\nthe middle. A periodic smoothing pass flattens the wave over time.\n\nDEFAULT COMMAND:\n    If no command is specified, 'edit' is used by default.\n    The edit option (-f) can be used without explicitly saying 'edit'.\n\nEXAMPLES:\n    # Open the editor with the default session file\n    $ wavedraw\n    \n    # Edit a specific waveform file\n    $ wavedraw -f bass.txt\n    $ wavedraw edit -f bass.txt\n    \n    # List audio output devices\n    $ wavedraw list-devices\n    \n    # Edit configuration file\n    $ wavedraw config"
)]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/wavedraw/wavedraw.toml\n    Logs:               ~/.local/state/wavedraw/wavedraw.log.*"
)]
struct Cli {
    /// Waveform file for in-editor save/load (edit default command)
    #[arg(short, long, value_name = "FILE", global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive waveform editor (default)
    ///
    /// Left mouse draws, right injects noise, middle drags toward the
    /// pointer. 's' toggles smoothing, '<'/'>' adjust its speed, 'm' mutes,
    /// 'b' blanks, 'o'/'i' save/load, 'q' quits.
    #[command(visible_alias = "e")]
    Edit {
        /// Waveform file for in-editor save/load
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Open configuration file in your preferred editor
    ///
    /// Edit audio device, sample rate, smoothing settings and the default
    /// session file. Uses $EDITOR environment variable or falls back to
    /// nano/vim.
    #[command(visible_alias = "c")]
    Config,

    /// List available audio output devices
    ///
    /// Shows device IDs, names, and configurations to help configure
    /// the correct output device in wavedraw.toml.
    #[command(name = "list-devices")]
    ListDevices,

    /// Show recent log entries from the application
    ///
    /// Display the last 50 lines of the most recent log file.
    /// Useful for troubleshooting issues.
    Logs,

    /// Generate shell completion script
    ///
    /// Generate completion script for your shell. Save the output to your
    /// shell's completion directory or source it directly.
    ///
    /// Examples:
    ///   wavedraw completions bash > wavedraw.bash
    ///   wavedraw completions zsh > _wavedraw
    ///   wavedraw completions fish > wavedraw.fish
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the main application based on command-line arguments.
///
/// # Errors
/// - If logging initialization fails
/// - If command execution fails
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Handle commands that don't need logging or config setup
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "wavedraw", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::ListDevices) => {
            return match commands::handle_list_devices() {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            };
        }
        Some(Commands::Logs) => {
            return match commands::handle_logs() {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            };
        }
        _ => {}
    }

    // Initialize logging for all other commands; the guard flushes
    // buffered log lines when it drops at the end of the program
    let _guard = logging::init()?;

    // Route to appropriate command handler
    match cli.command {
        None | Some(Commands::Edit { .. }) => {
            // Default command is edit
            // Merge the top-level option with the explicit edit command option;
            // the explicit option takes precedence
            let file = match cli.command {
                Some(Commands::Edit { file }) => file.or(cli.file),
                None => cli.file,
                _ => unreachable!(),
            };
            commands::handle_edit(file).await?;
        }
        Some(Commands::Config) => {
            commands::handle_config()?;
        }
        Some(Commands::Completions { .. }) | Some(Commands::ListDevices) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}
