//! HID mouse report sent to the BLE host.
//!
//! Report protocol layout (4 bytes, report ID 1 carried out of band in
//! the Report Reference descriptor):
//! ```text
//! Byte 0: Button bitfield
//!         Bit 0 = Left, Bit 1 = Right, Bit 2 = Middle
//! Byte 1: X displacement (signed, -127..127)
//! Byte 2: Y displacement (signed, -127..127)
//! Byte 3: Scroll wheel  (signed, -127..127)
//! ```
//!
//! Boot protocol drops the wheel byte (3 bytes).

use core::sync::atomic::{AtomicU8, Ordering};

/// Report-protocol mouse report size in bytes.
pub const MOUSE_REPORT_SIZE: usize = 4;

/// Boot-protocol mouse report size in bytes.
pub const BOOT_MOUSE_REPORT_SIZE: usize = 3;

/// Report ID used by the report map and the Report Reference descriptor.
pub const MOUSE_REPORT_ID: u8 = 1;

/// Physical mouse buttons the host understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Bit in the report's button field.
    pub const fn bit(self) -> u8 {
        match self {
            MouseButton::Left => 0x01,
            MouseButton::Right => 0x02,
            MouseButton::Middle => 0x04,
        }
    }
}

/// HID protocol mode selected by the host (Protocol Mode characteristic).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolMode {
    Boot = 0,
    Report = 1,
}

impl ProtocolMode {
    /// Decode a Protocol Mode write. Anything unknown is ignored by HOGP.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ProtocolMode::Boot),
            1 => Some(ProtocolMode::Report),
            _ => None,
        }
    }
}

/// Protocol mode shared between the GATT write handler and the report
/// sender. Starts in report mode and returns to it on every new connection.
#[derive(Debug)]
pub struct ProtocolModeState(AtomicU8);

impl ProtocolModeState {
    pub const fn new() -> Self {
        Self(AtomicU8::new(ProtocolMode::Report as u8))
    }

    pub fn get(&self) -> ProtocolMode {
        ProtocolMode::from_u8(self.0.load(Ordering::Relaxed)).unwrap_or(ProtocolMode::Report)
    }

    /// Apply a host write to the Protocol Mode characteristic. Returns the
    /// new mode, or `None` if the write was empty or out of range.
    pub fn apply_write(&self, data: &[u8]) -> Option<ProtocolMode> {
        let mode = data.first().copied().and_then(ProtocolMode::from_u8)?;
        self.0.store(mode as u8, Ordering::Relaxed);
        Some(mode)
    }

    /// Back to report mode, as required when a host connects.
    pub fn reset(&self) {
        self.0.store(ProtocolMode::Report as u8, Ordering::Relaxed);
    }
}

impl Default for ProtocolModeState {
    fn default() -> Self {
        Self::new()
    }
}

/// Standard HID mouse report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseReport {
    /// Button bitfield (bit 0 = left, bit 1 = right, bit 2 = middle).
    pub buttons: u8,
    /// Relative X movement (signed).
    pub x: i8,
    /// Relative Y movement (signed).
    pub y: i8,
    /// Scroll wheel delta (signed).
    pub wheel: i8,
}

impl MouseReport {
    /// Create an idle (no movement, no buttons) report.
    pub const fn empty() -> Self {
        Self {
            buttons: 0,
            x: 0,
            y: 0,
            wheel: 0,
        }
    }

    /// Relative movement with all buttons released.
    ///
    /// `-128` is clamped to `-127`, the descriptor's logical minimum.
    pub const fn motion(dx: i8, dy: i8) -> Self {
        Self {
            buttons: 0,
            x: clamp_axis(dx),
            y: clamp_axis(dy),
            wheel: 0,
        }
    }

    /// Button held down, no movement.
    pub const fn press(button: MouseButton) -> Self {
        Self {
            buttons: button.bit(),
            x: 0,
            y: 0,
            wheel: 0,
        }
    }

    /// Serialise into a byte slice for the given protocol mode.
    /// Returns the number of bytes written, or 0 if `buf` is too small.
    pub fn serialize_for(&self, mode: ProtocolMode, buf: &mut [u8]) -> usize {
        match mode {
            ProtocolMode::Report => self.serialize(buf),
            ProtocolMode::Boot => self.serialize_boot(buf),
        }
    }

    /// Serialise the 4-byte report-protocol layout.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < MOUSE_REPORT_SIZE {
            return 0;
        }
        buf[0] = self.buttons;
        buf[1] = self.x as u8;
        buf[2] = self.y as u8;
        buf[3] = self.wheel as u8;
        MOUSE_REPORT_SIZE
    }

    /// Serialise the 3-byte boot-protocol layout (no wheel).
    pub fn serialize_boot(&self, buf: &mut [u8]) -> usize {
        if buf.len() < BOOT_MOUSE_REPORT_SIZE {
            return 0;
        }
        buf[0] = self.buttons & 0x07;
        buf[1] = self.x as u8;
        buf[2] = self.y as u8;
        BOOT_MOUSE_REPORT_SIZE
    }

    /// Returns `true` when no buttons are pressed and there is no movement.
    pub fn is_idle(&self) -> bool {
        self.buttons == 0 && self.x == 0 && self.y == 0 && self.wheel == 0
    }
}

const fn clamp_axis(v: i8) -> i8 {
    if v == i8::MIN {
        -127
    } else {
        v
    }
}

// HID report map for a 3-button mouse with scroll wheel

/// HID Report Map served from the Report Map characteristic (0x2A4B).
pub const MOUSE_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x02, // Usage (Mouse)
    0xA1, 0x01, // Collection (Application)
    0x85, MOUSE_REPORT_ID, //   Report ID (1)
    0x09, 0x01, //   Usage (Pointer)
    0xA1, 0x00, //   Collection (Physical)
    //
    //   - Buttons (3 bits + 5 padding) -
    0x05, 0x09, //     Usage Page (Buttons)
    0x19, 0x01, //     Usage Minimum (Button 1)
    0x29, 0x03, //     Usage Maximum (Button 3)
    0x15, 0x00, //     Logical Minimum (0)
    0x25, 0x01, //     Logical Maximum (1)
    0x95, 0x03, //     Report Count (3)
    0x75, 0x01, //     Report Size (1)
    0x81, 0x02, //     Input (Data, Variable, Absolute)
    0x95, 0x01, //     Report Count (1)
    0x75, 0x05, //     Report Size (5)
    0x81, 0x01, //     Input (Constant) - padding
    //
    //   - X, Y displacement -
    0x05, 0x01, //     Usage Page (Generic Desktop)
    0x09, 0x30, //     Usage (X)
    0x09, 0x31, //     Usage (Y)
    0x15, 0x81, //     Logical Minimum (-127)
    0x25, 0x7F, //     Logical Maximum (127)
    0x75, 0x08, //     Report Size (8)
    0x95, 0x02, //     Report Count (2)
    0x81, 0x06, //     Input (Data, Variable, Relative)
    //
    //   - Scroll wheel -
    0x09, 0x38, //     Usage (Wheel)
    0x15, 0x81, //     Logical Minimum (-127)
    0x25, 0x7F, //     Logical Maximum (127)
    0x75, 0x08, //     Report Size (8)
    0x95, 0x01, //     Report Count (1)
    0x81, 0x06, //     Input (Data, Variable, Relative)
    //
    0xC0, //   End Collection (Physical)
    0xC0, // End Collection (Application)
];
