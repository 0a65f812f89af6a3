//! Looping audio playback of the waveform buffer.
//!
//! The buffer plays continuously: an output stream pulls one buffer sample
//! per output frame through a circular read cursor, independent of whatever
//! the control loop is writing. The callback only performs relaxed atomic
//! loads; it never blocks, allocates, or takes a lock.

use crate::editor::buffer::{WaveBuffer, LENGTH};
use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::Arc;

#[cfg(target_os = "linux")]
use std::fs::OpenOptions;
#[cfg(target_os = "linux")]
use std::os::unix::io::AsRawFd;

/// Circular read cursor over the waveform buffer.
///
/// Advances by exactly one sample per output byte. The cursor pre-increments,
/// so the first byte rendered comes from index 1.
pub struct SampleClock {
    offset: usize,
}

impl SampleClock {
    pub fn new() -> Self {
        Self { offset: 0 }
    }

    /// Renders the next output byte: the sample under the cursor, shifted
    /// right one bit for volume attenuation, reinterpreted as signed 8-bit
    /// PCM. The unsigned range is not re-centered; a neutral 128 renders as
    /// 64, a small DC component that is part of the instrument's sound.
    pub fn next_byte(&mut self, buf: &WaveBuffer) -> i8 {
        self.offset = (self.offset + 1) % LENGTH;
        (buf.get(self.offset as i64) >> 1) as i8
    }

    /// Fills an output slice, one buffer sample per byte.
    pub fn fill(&mut self, buf: &WaveBuffer, out: &mut [i8]) {
        for byte in out.iter_mut() {
            *byte = self.next_byte(buf);
        }
    }
}

impl Default for SampleClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Plays the shared waveform buffer as a loop on an output device.
pub struct WavePlayer {
    buffer: Arc<WaveBuffer>,
    /// Active output stream (kept alive while playing)
    stream: Option<cpal::Stream>,
    sample_rate: u32,
    /// Device name or "default" to use the system default device
    device_name: String,
    muted: bool,
}

impl WavePlayer {
    /// Creates a player over the shared buffer.
    ///
    /// # Arguments
    /// * `buffer` - The waveform buffer shared with the control loop
    /// * `sample_rate` - Requested playback rate in Hz (reference: 22050)
    /// * `device_name` - Device name/ID, or "default" for the system default
    pub fn new(buffer: Arc<WaveBuffer>, sample_rate: u32, device_name: String) -> Self {
        Self {
            buffer,
            stream: None,
            sample_rate,
            device_name,
            muted: false,
        }
    }

    /// Opens the output device and starts looping playback.
    ///
    /// The device's native i8 format is used when available; otherwise the
    /// exact rendered byte is mapped to f32 as `byte / 128.0` at the device
    /// boundary, which preserves the quantization and DC offset.
    ///
    /// # Errors
    /// - If no output device is available
    /// - If device configuration or stream creation fails
    pub fn start(&mut self) -> Result<()> {
        // Get device while suppressing ALSA library warnings
        let device = suppress_alsa_warnings(|| {
            let host = cpal::default_host();

            if self.device_name == "default" {
                host.default_output_device()
                    .ok_or_else(|| anyhow!("No audio output device available"))
            } else {
                find_device_by_name(&host, &self.device_name)
            }
        })?;

        let device_name = device
            .name()
            .unwrap_or_else(|_| "Unknown device".to_string());
        tracing::info!("Playback device: {}", device_name);

        let supports_i8 = device
            .supported_output_configs()
            .map(|mut configs| configs.any(|c| c.sample_format() == cpal::SampleFormat::I8))
            .unwrap_or(false);

        let config = cpal::StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(self.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        tracing::debug!(
            "Stream configuration: {}Hz mono, native i8: {}",
            self.sample_rate,
            supports_i8
        );

        let buffer = Arc::clone(&self.buffer);
        let mut clock = SampleClock::new();
        let err_fn = |err| {
            tracing::error!("Audio stream error: {}", err);
        };

        let stream = if supports_i8 {
            device.build_output_stream(
                &config,
                move |data: &mut [i8], _: &cpal::OutputCallbackInfo| {
                    clock.fill(&buffer, data);
                },
                err_fn,
                None,
            )?
        } else {
            device.build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for frame in data.iter_mut() {
                        *frame = clock.next_byte(&buffer) as f32 / 128.0;
                    }
                },
                err_fn,
                None,
            )?
        };

        stream.play()?;
        self.stream = Some(stream);

        tracing::debug!("Audio stream started");
        Ok(())
    }

    /// Toggles between muted and playing, returning the new muted state.
    ///
    /// # Errors
    /// - If the underlying stream refuses to pause or resume
    pub fn toggle_mute(&mut self) -> Result<bool> {
        if let Some(stream) = &self.stream {
            if self.muted {
                stream.play()?;
            } else {
                stream.pause()?;
            }
            self.muted = !self.muted;
            tracing::debug!("Playback {}", if self.muted { "muted" } else { "resumed" });
        }
        Ok(self.muted)
    }

    /// Returns whether playback is currently muted.
    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

/// Finds an audio output device by name or numeric index.
///
/// # Arguments
/// * `host` - The cpal audio host
/// * `device_spec` - Either "default", a device name, or a numeric index
///
/// # Errors
/// - If no device with the specified name/index is found
fn find_device_by_name(host: &cpal::Host, device_spec: &str) -> Result<cpal::Device> {
    // Try to parse as a numeric index first
    if let Ok(index) = device_spec.parse::<usize>() {
        let devices: Vec<_> = host
            .output_devices()
            .map_err(|e| anyhow!("Failed to enumerate devices: {e}"))?
            .collect();

        if index < devices.len() {
            return Ok(devices.into_iter().nth(index).unwrap());
        } else {
            return Err(anyhow!(
                "Device index {} is out of range (0-{})",
                index,
                devices.len().saturating_sub(1)
            ));
        }
    }

    // Try to find by name
    let devices = host
        .output_devices()
        .map_err(|e| anyhow!("Failed to enumerate devices: {e}"))?;

    for device in devices {
        if let Ok(name) = device.name() {
            if name == device_spec {
                return Ok(device);
            }
        }
    }

    Err(anyhow!(
        "Audio output device '{device_spec}' not found. Use 'wavedraw list-devices' to see available devices."
    ))
}

/// Temporarily redirects stderr to /dev/null to suppress ALSA library warnings on Linux.
/// On non-Linux platforms, this is a no-op since ALSA doesn't exist.
#[cfg(target_os = "linux")]
fn suppress_alsa_warnings<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let dev_null = OpenOptions::new()
        .write(true)
        .open("/dev/null")
        .map_err(|e| anyhow!("Failed to open /dev/null: {e}"))?;

    let dev_null_fd = dev_null.as_raw_fd();

    let old_stderr = unsafe { libc::dup(libc::STDERR_FILENO) };
    if old_stderr == -1 {
        return Err(anyhow!("Failed to duplicate stderr"));
    }

    let redirect_result = unsafe { libc::dup2(dev_null_fd, libc::STDERR_FILENO) };
    if redirect_result == -1 {
        unsafe { libc::close(old_stderr) };
        return Err(anyhow!("Failed to redirect stderr"));
    }

    let result = f();

    unsafe {
        libc::dup2(old_stderr, libc::STDERR_FILENO);
        libc::close(old_stderr);
    }

    result
}

/// On non-Linux platforms, no stderr suppression is needed since ALSA doesn't exist.
#[cfg(not(target_os = "linux"))]
fn suppress_alsa_warnings<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    f()
}
