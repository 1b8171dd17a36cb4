//! Haptic Rods - drag rods around a 2D surface and feel them
//!
//! Core modules:
//! - `app`: Session state and the per-frame tick
//! - `sim`: Frame-driven interaction (rod geometry, collisions, drag resolution, selection state)
//! - `haptics`: Signal controller, wire protocol and serial device link
//! - `persistence`: Puzzle layout record load/save
//! - `settings`: Timing constants, signal table and device configuration
//! - `intents`: Cross-thread command queue drained once per tick

pub mod app;
pub mod error;
pub mod haptics;
pub mod intents;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use app::AppState;
pub use error::{Error, Result};
pub use settings::Settings;

/// Interaction configuration constants
pub mod consts {
    /// Width of a length-1 rod, in surface pixels
    pub const UNIT_ROD_LENGTH: f32 = 40.0;
    /// Height shared by every rod
    pub const ROD_HEIGHT: f32 = 40.0;
    /// Number of distinct rod lengths (1..=10)
    pub const NB_ROD_LENGTHS: usize = 10;

    /// Frames after selection during which the rod's own signal still plays while colliding
    pub const DEFAULT_GRACE_PERIOD: u32 = 3;
    /// Frames the impulse plays before going quiet
    pub const DEFAULT_IMPULSE_DURATION: u32 = 2;

    /// Default serial device the actuator enumerates as
    pub const DEFAULT_DEVICE_PATH: &str = "/dev/ttyUSB0";
}
