//! Unified error type for serial2ble.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

use defmt::Format;

/// Top-level error type used across the firmware tasks.
#[derive(Debug, Clone, Copy, Format)]
pub enum Error {
    // BLE
    /// The SoftDevice returned a BLE-level error.
    Ble(BleError),

    // Serial
    /// UARTE transfer failed (framing, overrun or DMA error).
    Serial,

    /// Diagnostic line did not fit the status line buffer.
    BufferOverflow,
}

/// Subset of BLE errors we propagate (keeps the enum `Copy`-friendly).
#[derive(Debug, Clone, Copy, Format)]
pub enum BleError {
    /// GATT service or characteristic registration failed.
    Register,
    /// Advertising could not start or was stopped without a connection.
    AdvertiseFailed,
    /// Notification could not be queued (CCCD off, link gone, TX full).
    NotifyFailed,
    /// Connection parameter update request was rejected.
    ConnParamsFailed,
}

// Convenience conversions

impl From<BleError> for Error {
    fn from(e: BleError) -> Self {
        Error::Ble(e)
    }
}
