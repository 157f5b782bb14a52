//! BLE GATT HID Server - the HID-over-GATT service a host subscribes to.
//!
//! Registered characteristics (service UUID 0x1812):
//! 1. Protocol Mode (0x2A4E) - host selects boot or report layout.
//! 2. HID Information (0x2A4A) - HID version, country code, flags.
//! 3. Report Map (0x2A4B) - the mouse report descriptor.
//! 4. HID Control Point (0x2A4C) - suspend / exit suspend.
//! 5. Input Report (0x2A4D) + Report Reference (0x2908).
//! 6. Boot Mouse Input Report (0x2A33).

use crate::error::{BleError, Error};
use crate::hid::mouse::{
    MouseReport, ProtocolMode, ProtocolModeState, BOOT_MOUSE_REPORT_SIZE, MOUSE_REPORT_DESCRIPTOR, MOUSE_REPORT_ID,
    MOUSE_REPORT_SIZE,
};
use defmt::{debug, info, warn};
use nrf_softdevice::ble::gatt_server::builder::ServiceBuilder;
use nrf_softdevice::ble::gatt_server::characteristic::{Attribute, Metadata, Properties};
use nrf_softdevice::ble::gatt_server::{self, WriteOp};
use nrf_softdevice::ble::{Connection, SecurityMode, Uuid};
use nrf_softdevice::Softdevice;

const HID_SERVICE: Uuid = Uuid::new_16(0x1812);
const PROTOCOL_MODE: Uuid = Uuid::new_16(0x2a4e);
const HID_INFORMATION: Uuid = Uuid::new_16(0x2a4a);
const REPORT_MAP: Uuid = Uuid::new_16(0x2a4b);
const HID_CONTROL_POINT: Uuid = Uuid::new_16(0x2a4c);
const HID_REPORT: Uuid = Uuid::new_16(0x2a4d);
const REPORT_REFERENCE: Uuid = Uuid::new_16(0x2908);
const BOOT_MOUSE_INPUT: Uuid = Uuid::new_16(0x2a33);

/// bcdHID 1.11, no country code, RemoteWake | NormallyConnectable.
const HID_INFO_VALUE: [u8; 4] = [0x11, 0x01, 0x00, 0x03];

/// Report Reference: (report ID, type = input).
const REPORT_REFERENCE_VALUE: [u8; 2] = [MOUSE_REPORT_ID, 0x01];

/// Registered handles plus the host-selected protocol mode.
pub struct HidServer {
    protocol_mode_handle: u16,
    control_point_handle: u16,
    report_handle: u16,
    boot_report_handle: u16,
    protocol_mode: ProtocolModeState,
}

impl HidServer {
    /// Register the HID service. Must run before the SoftDevice task starts.
    pub fn new(sd: &mut Softdevice) -> Result<Self, Error> {
        let mut sb = ServiceBuilder::new(sd, HID_SERVICE).map_err(register_failed)?;

        let protocol_mode = sb
            .add_characteristic(
                PROTOCOL_MODE,
                Attribute::new([ProtocolMode::Report as u8]).security(SecurityMode::JustWorks),
                Metadata::new(Properties::new().read().write_without_response()),
            )
            .map_err(register_failed)?
            .build();

        sb.add_characteristic(
            HID_INFORMATION,
            Attribute::new(HID_INFO_VALUE).security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().read()),
        )
        .map_err(register_failed)?
        .build();

        sb.add_characteristic(
            REPORT_MAP,
            Attribute::new(MOUSE_REPORT_DESCRIPTOR).security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().read()),
        )
        .map_err(register_failed)?
        .build();

        let control_point = sb
            .add_characteristic(
                HID_CONTROL_POINT,
                Attribute::new([0u8]).security(SecurityMode::JustWorks),
                Metadata::new(Properties::new().write_without_response()),
            )
            .map_err(register_failed)?
            .build();

        let mut report = sb
            .add_characteristic(
                HID_REPORT,
                Attribute::new([0u8; MOUSE_REPORT_SIZE]).security(SecurityMode::JustWorks),
                Metadata::new(Properties::new().read().notify()),
            )
            .map_err(register_failed)?;
        report
            .add_descriptor(
                REPORT_REFERENCE,
                Attribute::new(REPORT_REFERENCE_VALUE).security(SecurityMode::JustWorks),
            )
            .map_err(register_failed)?;
        let report = report.build();

        let boot_report = sb
            .add_characteristic(
                BOOT_MOUSE_INPUT,
                Attribute::new([0u8; BOOT_MOUSE_REPORT_SIZE]).security(SecurityMode::JustWorks),
                Metadata::new(Properties::new().read().notify()),
            )
            .map_err(register_failed)?
            .build();

        let _service = sb.build();
        info!("HID service registered");

        Ok(Self {
            protocol_mode_handle: protocol_mode.value_handle,
            control_point_handle: control_point.value_handle,
            report_handle: report.value_handle,
            boot_report_handle: boot_report.value_handle,
            protocol_mode: ProtocolModeState::new(),
        })
    }

    /// Protocol mode last written by the host (report mode by default).
    pub fn protocol_mode(&self) -> ProtocolMode {
        self.protocol_mode.get()
    }

    /// Reset per-connection state for a newly connected host. Protocol
    /// Mode goes back to report mode, in RAM and in the attribute table.
    pub fn on_connect(&self, sd: &Softdevice) {
        self.protocol_mode.reset();
        if gatt_server::set_value(sd, self.protocol_mode_handle, &[ProtocolMode::Report as u8])
            .is_err()
        {
            warn!("Protocol Mode attribute not reset");
        }
    }

    /// Notify one mouse report on the characteristic matching the
    /// current protocol mode.
    pub fn send(&self, conn: &Connection, report: &MouseReport) -> Result<(), Error> {
        let mode = self.protocol_mode();
        let handle = match mode {
            ProtocolMode::Report => self.report_handle,
            ProtocolMode::Boot => self.boot_report_handle,
        };

        let mut buf = [0u8; MOUSE_REPORT_SIZE];
        let n = report.serialize_for(mode, &mut buf);

        gatt_server::notify_value(conn, handle, &buf[..n])
            .map_err(|_| Error::from(BleError::NotifyFailed))
    }
}

impl gatt_server::Server for HidServer {
    type Event = ();

    fn on_write(
        &self,
        _conn: &Connection,
        handle: u16,
        _op: WriteOp,
        _offset: usize,
        data: &[u8],
    ) -> Option<Self::Event> {
        if handle == self.protocol_mode_handle {
            if let Some(mode) = self.protocol_mode.apply_write(data) {
                info!("HID protocol mode: {}", mode);
            }
        } else if handle == self.control_point_handle {
            // 0 = suspend, 1 = exit suspend. Nothing to power down here.
            debug!("HID control point: {=[u8]}", data);
        }
        None
    }
}

fn register_failed<E>(_: E) -> Error {
    Error::from(BleError::Register)
}
