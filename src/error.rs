//! Crate-level error type

use thiserror::Error;

use crate::haptics::DeviceError;
use crate::persistence::LayoutError;
use crate::settings::SettingsError;
use crate::sim::ResolveError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("drag resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
