//! Haptic feedback
//!
//! Signal descriptions, the byte-level actuator protocol, the serial device
//! link, and the state machine that decides what to play each frame.

pub mod controller;
pub mod device;
pub mod protocol;
pub mod serial;
pub mod signal;

pub use controller::{Playing, SignalController, Timing, direction_from_velocity};
pub use device::{DeviceError, HapticDevice};
pub use protocol::{Command, ProtocolError, UNCHANGED};
pub use serial::SerialLine;
pub use signal::{Signal, SignalTable, signal_type};
