//! HID report types sent over the BLE HID-over-GATT service.

pub mod mouse;
