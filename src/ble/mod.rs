//! Bluetooth Low Energy subsystem.
//!
//! This module drives the Nordic SoftDevice S140 in **Peripheral** role:
//!
//! 1. **HID Server** - registers the HID-over-GATT service and pushes
//!    mouse reports to the host as notifications.
//! 2. **Advertiser** - advertises as a HID mouse, accepts "just works"
//!    pairing, and re-advertises after every disconnect.
//! 3. **Transport** - [`BleMouse`] exposes the session to the command loop
//!    through [`crate::controller::HidTransport`].
//!
//! The current connection lives in a critical-section mutex so the command
//! loop can query it without awaiting.

pub mod adv_data;
pub mod advertiser;
pub mod hid_server;

use core::cell::RefCell;

use crate::controller::HidTransport;
use crate::hid::mouse::{MouseButton, MouseReport};
use defmt::{debug, info};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use hid_server::HidServer;
use nrf_softdevice::ble::Connection;

/// Active host connection, if any.
static LINK: Mutex<CriticalSectionRawMutex, RefCell<Option<Connection>>> =
    Mutex::new(RefCell::new(None));

/// Raised by [`BleMouse::begin`]; the advertiser waits on it once.
static ADVERTISE: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Clone of the live connection handle.
pub fn current_connection() -> Option<Connection> {
    LINK.lock(|link| {
        link.borrow()
            .as_ref()
            .filter(|conn| conn.handle().is_some())
            .cloned()
    })
}

fn set_connection(conn: Option<Connection>) {
    LINK.lock(|link| *link.borrow_mut() = conn);
}

/// BLE HID mouse as seen by the command loop.
pub struct BleMouse {
    server: &'static HidServer,
}

impl BleMouse {
    pub fn new(server: &'static HidServer) -> Self {
        Self { server }
    }

    fn send(&self, report: &MouseReport) {
        let Some(conn) = current_connection() else {
            debug!("No host - report dropped");
            return;
        };
        if let Err(e) = self.server.send(&conn, report) {
            debug!("HID report not delivered: {}", e);
        }
    }
}

impl HidTransport for BleMouse {
    fn begin(&mut self) {
        info!("BLE: HID mouse starting");
        ADVERTISE.signal(());
    }

    fn is_connected(&self) -> bool {
        current_connection().is_some()
    }

    fn move_by(&mut self, dx: i8, dy: i8) {
        self.send(&MouseReport::motion(dx, dy));
    }

    fn click(&mut self, button: MouseButton) {
        self.send(&MouseReport::press(button));
        self.send(&MouseReport::empty());
    }
}
