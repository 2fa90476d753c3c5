//! GATT service for the hive agent.
//!
//! Characteristics are registered in a [`ServiceRegistry`] as read or write
//! [endpoints](endpoint). The registry is transport-agnostic; with the
//! `bluez` feature it is served over BlueZ by [`GattServer`].
//!
//! Every failure below the registry is a typed error. The registry is the
//! one place where errors are logged and collapsed to an empty payload,
//! which is all a BLE client is ever shown.

pub mod boundary;
pub mod endpoint;
mod registry;
mod service;

#[cfg(feature = "bluez")]
mod bluez;

use hivegatt_file_ops::ReadingError;
use hivegatt_transfer::TransferError;
use uuid::Uuid;

#[cfg(feature = "bluez")]
pub use bluez::{GattServer, GattServerConfig};
pub use endpoint::{EndpointFuture, ReadEndpoint, WriteEndpoint};
pub use registry::{Access, CharacteristicEntry, ServiceRegistry};
pub use service::{FRAME_ARTIFACT, ServiceSettings, WAVEFORM_ARTIFACT, build_registry};

/// Errors produced by the GATT server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("reading error: {0}")]
    Reading(#[from] ReadingError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown characteristic {0}")]
    UnknownCharacteristic(Uuid),

    #[error("characteristic {0} does not support this operation")]
    UnsupportedOperation(Uuid),

    #[cfg(feature = "bluez")]
    #[error("Bluetooth error: {0}")]
    Bluetooth(#[from] bluer::Error),
}

impl ServerError {
    /// Stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transfer(e) => e.kind(),
            Self::Reading(ReadingError::Io(_)) | Self::Io(_) => "io_failure",
            Self::Reading(ReadingError::Empty(_)) => "empty_log",
            Self::Reading(ReadingError::SampleTime(_)) => "bad_sample_time",
            Self::UnknownCharacteristic(_) => "unknown_characteristic",
            Self::UnsupportedOperation(_) => "unsupported_operation",
            #[cfg(feature = "bluez")]
            Self::Bluetooth(_) => "bluetooth",
        }
    }
}
