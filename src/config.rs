//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, buffer sizes, and BLE protocol constants live
//! here so they can be tuned in one place.

// Command loop

/// Pause at the top of every command-loop iteration (ms).
pub const LOOP_TICK_MS: u32 = 10;

/// Extra pause while no host is connected (ms).
pub const DISCONNECTED_IDLE_MS: u32 = 500;

// Serial
//
// UARTE0 at 115200 baud, 8N1, no flow control (nRF52840-DK VCOM):
//
//   RX → P0.08
//   TX → P0.06

/// Received bytes queued for the command loop.
pub const SERIAL_RX_BUFFER: usize = 64;

/// UARTE receive ring filled by DMA between task reads.
pub const UART_RX_RING: usize = 64;

/// UARTE transmit ring.
pub const UART_TX_RING: usize = 128;

/// Capacity of one diagnostic line including the trailing `\r\n`.
pub const STATUS_LINE_MAX: usize = 32;

/// Diagnostic lines queued for the UART TX task.
pub const STATUS_QUEUE_DEPTH: usize = 8;

// BLE

/// GAP device name, shown by the host while pairing.
pub const BLE_DEVICE_NAME: &str = "Serial Mouse";

/// GAP appearance value for a HID mouse.
pub const BLE_APPEARANCE_MOUSE: u16 = 0x03C2;

/// Advertising interval (in 0.625 ms units). 160 = 100 ms.
pub const BLE_ADV_INTERVAL: u32 = 160;

/// BLE connection interval range (in 1.25 ms units).
/// 6 = 7.5 ms (lowest latency for HID).
pub const BLE_CONN_INTERVAL_MIN: u16 = 6;
pub const BLE_CONN_INTERVAL_MAX: u16 = 12;

/// BLE slave latency (number of connection events the peripheral can skip).
pub const BLE_SLAVE_LATENCY: u16 = 0;

/// BLE supervision timeout (in 10 ms units). 400 = 4 s.
pub const BLE_SUP_TIMEOUT: u16 = 400;

/// Maximum number of bonded hosts kept in RAM.
pub const BLE_MAX_BONDS: usize = 4;
