//! Advertising and connection lifecycle.
//!
//! Waits for the transport to be started, then loops forever:
//! advertise → accept a host (with "just works" pairing) → serve GATT
//! until the link drops → advertise again.

use core::cell::RefCell;

use crate::ble::adv_data::{self, HID_SERVICE_UUID16};
use crate::ble::hid_server::HidServer;
use crate::ble::{set_connection, ADVERTISE};
use crate::config;
use crate::error::{BleError, Error};
use defmt::{info, warn};
use embassy_time::{Duration, Timer};
use heapless::Vec;
use nrf_softdevice::ble::security::{IoCapabilities, SecurityHandler};
use nrf_softdevice::ble::{
    gatt_server, peripheral, Connection, EncryptionInfo, IdentityKey, MasterId, SecurityMode,
};
use nrf_softdevice::raw;
use nrf_softdevice::Softdevice;
use static_cell::StaticCell;

/// Back-off after a failed advertising attempt.
const RETRY_DELAY: Duration = Duration::from_secs(1);

struct PeerBond {
    master_id: MasterId,
    key: EncryptionInfo,
}

/// In-RAM bond table. Bonds are forgotten on reset.
struct Bonder {
    peers: RefCell<Vec<PeerBond, { config::BLE_MAX_BONDS }>>,
}

impl Bonder {
    fn new() -> Self {
        Self {
            peers: RefCell::new(Vec::new()),
        }
    }
}

impl SecurityHandler for Bonder {
    fn io_capabilities(&self) -> IoCapabilities {
        IoCapabilities::None
    }

    fn can_bond(&self, _conn: &Connection) -> bool {
        true
    }

    fn on_bonded(
        &self,
        _conn: &Connection,
        master_id: MasterId,
        key: EncryptionInfo,
        _peer_id: IdentityKey,
    ) {
        info!("BLE: host bonded");
        let mut peers = self.peers.borrow_mut();
        if let Some(existing) = peers.iter_mut().find(|p| p.master_id == master_id) {
            existing.key = key;
            return;
        }

        if peers.is_full() {
            peers.remove(0);
        }

        let _ = peers.push(PeerBond { master_id, key });
    }

    fn get_key(&self, _conn: &Connection, master_id: MasterId) -> Option<EncryptionInfo> {
        self.peers
            .borrow()
            .iter()
            .find_map(|p| (p.master_id == master_id).then_some(p.key))
    }

    fn on_security_update(&self, _conn: &Connection, mode: SecurityMode) {
        info!("BLE security mode updated: {}", mode);
    }
}

fn bonder() -> &'static Bonder {
    static BONDER: StaticCell<Bonder> = StaticCell::new();
    BONDER.init(Bonder::new())
}

fn conn_params() -> raw::ble_gap_conn_params_t {
    raw::ble_gap_conn_params_t {
        min_conn_interval: config::BLE_CONN_INTERVAL_MIN,
        max_conn_interval: config::BLE_CONN_INTERVAL_MAX,
        slave_latency: config::BLE_SLAVE_LATENCY,
        conn_sup_timeout: config::BLE_SUP_TIMEOUT,
    }
}

/// Advertising / connection task body. Never returns.
pub async fn advertise_task(sd: &'static Softdevice, server: &'static HidServer) -> ! {
    ADVERTISE.wait().await;

    let adv = adv_data::advertisement(&[HID_SERVICE_UUID16], config::BLE_APPEARANCE_MOUSE);
    let scan = adv_data::scan_response(config::BLE_DEVICE_NAME);
    let bonder = bonder();

    info!("BLE: advertising as \"{}\"", config::BLE_DEVICE_NAME);

    loop {
        match serve_one_host(sd, server, &adv, &scan, bonder).await {
            Ok(()) => info!("BLE: advertising again"),
            Err(e) => {
                warn!("BLE: {}", e);
                Timer::after(RETRY_DELAY).await;
            }
        }
    }
}

/// Advertise until a host connects, then serve it until it disconnects.
async fn serve_one_host(
    sd: &'static Softdevice,
    server: &'static HidServer,
    adv: &[u8],
    scan: &[u8],
    bonder: &'static Bonder,
) -> Result<(), Error> {
    let adv_config = peripheral::Config {
        interval: config::BLE_ADV_INTERVAL,
        ..Default::default()
    };
    let advertisement = peripheral::ConnectableAdvertisement::ScannableUndirected {
        adv_data: adv,
        scan_data: scan,
    };

    let conn = peripheral::advertise_pairable(sd, advertisement, &adv_config, bonder)
        .await
        .map_err(|_| BleError::AdvertiseFailed)?;

    info!("BLE: host connected");

    if conn.set_conn_params(conn_params()).is_err() {
        warn!("BLE: {}", Error::from(BleError::ConnParamsFailed));
    }

    server.on_connect(sd);
    set_connection(Some(conn.clone()));
    let reason = gatt_server::run(&conn, server, |_| {}).await;
    set_connection(None);

    info!("BLE: host disconnected ({})", reason);
    Ok(())
}
