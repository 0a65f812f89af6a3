//! Application command handlers for wavedraw.
//!
//! This module organizes command handling into separate submodules, each
//! responsible for a specific application command.
//!
//! # Commands
//! - `edit`: Interactive waveform editing with looping playback (default)
//! - `config`: Open configuration file in user's preferred editor
//! - `list_devices`: List available audio output devices
//! - `logs`: Display recent log entries

pub mod config;
pub mod edit;
pub mod list_devices;
pub mod logs;

pub use config::handle_config;
pub use edit::handle_edit;
pub use list_devices::handle_list_devices;
pub use logs::handle_logs;
