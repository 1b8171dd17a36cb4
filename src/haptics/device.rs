//! Serial link to the haptic actuator
//!
//! The actuator is optional. A disconnected device swallows every command so
//! the interaction behaves the same with or without hardware. Writes are
//! fire-and-forget: failures are logged and returned, never retried.

use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::protocol::{Command, UNCHANGED};
use super::serial::{BAUD_RATE, SerialLine};
use super::signal::Signal;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("failed to open haptic device {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {command:?} to haptic device: {source}")]
    Write {
        command: Command,
        source: std::io::Error,
    },
}

/// Handle on the actuator's serial line, possibly absent
#[derive(Default)]
pub struct HapticDevice {
    link: Option<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for HapticDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HapticDevice")
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl HapticDevice {
    /// A device that drops every command
    pub fn disconnected() -> Self {
        Self { link: None }
    }

    /// Open the serial device node, switching a tty to raw 1 Mbaud 8N1
    pub fn open(path: &Path) -> Result<Self, DeviceError> {
        let line = SerialLine::open(path).map_err(|source| DeviceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        if line.is_tty() {
            log::info!(
                "Connected to haptic device at {} ({} baud)",
                path.display(),
                BAUD_RATE
            );
        } else {
            log::info!("Sending haptic commands to {}", path.display());
        }
        Ok(Self::from_writer(line))
    }

    /// Open `path` if given and reachable, otherwise run without a device
    pub fn connect(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("No haptic device configured");
            return Self::disconnected();
        };
        match Self::open(path) {
            Ok(mut device) => {
                device.ping().ok();
                device
            }
            Err(e) => {
                log::warn!("{} - haptics disabled", e);
                Self::disconnected()
            }
        }
    }

    /// Send commands to an arbitrary byte sink
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            link: Some(Box::new(writer)),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    /// Encode and write one command. No-op when disconnected.
    pub fn send(&mut self, command: Command) -> Result<(), DeviceError> {
        let Some(link) = self.link.as_mut() else {
            return Ok(());
        };
        let bytes = command.encode();
        let result = match link.write_all(&bytes) {
            Ok(()) => link.flush(),
            Err(e) => Err(e),
        };
        result.map_err(|source| {
            log::error!("Haptic write failed for {:?}: {}", command, source);
            DeviceError::Write { command, source }
        })
    }

    pub fn ping(&mut self) -> Result<(), DeviceError> {
        self.send(Command::Ping)
    }

    pub fn set_direction(&mut self, angle: i8, speed: u16) -> Result<(), DeviceError> {
        self.send(Command::SetDirection { angle, speed })
    }

    pub fn add_signal(
        &mut self,
        angle: i8,
        pulses: i8,
        signal: Signal,
    ) -> Result<(), DeviceError> {
        self.send(Command::AddSignal {
            angle,
            pulses,
            signal,
        })
    }

    pub fn play(&mut self, play: bool) -> Result<(), DeviceError> {
        self.send(Command::Play(play))
    }

    pub fn clear(&mut self) -> Result<(), DeviceError> {
        self.send(Command::Clear)
    }

    /// Replace whatever is playing with `signal` and start it.
    ///
    /// Three separate writes; stops at the first failure, leaving the device
    /// in whatever state the earlier writes produced.
    pub fn set_signal(
        &mut self,
        angle: i8,
        pulses: i8,
        signal: Signal,
    ) -> Result<(), DeviceError> {
        self.clear()?;
        self.add_signal(angle, pulses, signal)?;
        self.play(true)
    }

    /// `set_signal` keeping the device's current angle and pulse count
    pub fn start_signal(&mut self, signal: Signal) -> Result<(), DeviceError> {
        self.set_signal(UNCHANGED, UNCHANGED, signal)
    }
}
