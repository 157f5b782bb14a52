//! serial2ble firmware entry point (nRF52840 + S140 SoftDevice).
//!
//! Task layout:
//!
//! - `softdevice_task` - SoftDevice event pump.
//! - `advertise_task` - advertising, pairing and GATT serving.
//! - `uart_rx_task` / `uart_tx_task` - serial command input and status output.
//! - `main` - after setup, runs the command loop itself.

#![no_std]
#![no_main]

mod ble;
mod command;
mod config;
mod controller;
mod error;
mod hid;
mod motion;
mod serial;
mod status;

use core::mem;

use ble::hid_server::HidServer;
use ble::BleMouse;
use controller::Controller;
use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_nrf::interrupt::{self, InterruptExt, Priority};
use embassy_nrf::bind_interrupts;
use embassy_nrf::buffered_uarte::{self, BufferedUarte, BufferedUarteRx, BufferedUarteTx};
use embassy_nrf::peripherals::{TIMER1, UARTE0};
use embassy_nrf::uarte;
use embassy_time::Delay;
use nrf_softdevice::{raw, Softdevice};
use serial::{SerialPort, StatusLog};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    UARTE0_UART0 => buffered_uarte::InterruptHandler<UARTE0>;
});

static HID_SERVER: StaticCell<HidServer> = StaticCell::new();
static UART_RX_RING: StaticCell<[u8; config::UART_RX_RING]> = StaticCell::new();
static UART_TX_RING: StaticCell<[u8; config::UART_TX_RING]> = StaticCell::new();

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn advertise_task(sd: &'static Softdevice, server: &'static HidServer) -> ! {
    ble::advertiser::advertise_task(sd, server).await
}

#[embassy_executor::task]
async fn uart_rx_task(rx: BufferedUarteRx<'static, UARTE0, TIMER1>) -> ! {
    serial::rx_task(rx).await
}

#[embassy_executor::task]
async fn uart_tx_task(tx: BufferedUarteTx<'static, UARTE0>) -> ! {
    serial::tx_task(tx).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("serial2ble starting");

    // Priorities 0, 1 and 4 belong to the SoftDevice.
    let mut nrf_config = embassy_nrf::config::Config::default();
    nrf_config.gpiote_interrupt_priority = Priority::P2;
    nrf_config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(nrf_config);
    interrupt::UARTE0_UART0.set_priority(Priority::P3);

    let mut uart_config = uarte::Config::default();
    uart_config.parity = uarte::Parity::EXCLUDED;
    uart_config.baudrate = uarte::Baudrate::BAUD115200;
    // TIMER0 and PPI channels 17+ belong to the SoftDevice.
    let uart = BufferedUarte::new(
        p.UARTE0,
        p.TIMER1,
        p.PPI_CH0,
        p.PPI_CH1,
        p.PPI_GROUP0,
        Irqs,
        p.P0_08,
        p.P0_06,
        uart_config,
        UART_RX_RING.init([0; config::UART_RX_RING]),
        UART_TX_RING.init([0; config::UART_TX_RING]),
    );
    let (rx, tx) = uart.split();

    let sd = Softdevice::enable(&softdevice_config());
    let server = match HidServer::new(sd) {
        Ok(server) => HID_SERVER.init(server),
        Err(e) => defmt::panic!("HID service setup failed: {}", e),
    };
    let sd: &'static Softdevice = sd;

    unwrap!(spawner.spawn(softdevice_task(sd)));
    unwrap!(spawner.spawn(advertise_task(sd, server)));
    unwrap!(spawner.spawn(uart_rx_task(rx)));
    unwrap!(spawner.spawn(uart_tx_task(tx)));

    info!("All tasks spawned");

    Controller::new(BleMouse::new(server), SerialPort, StatusLog, Delay)
        .run()
        .await
}

fn softdevice_config() -> nrf_softdevice::Config {
    let name = config::BLE_DEVICE_NAME;
    nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 256 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: name.as_ptr() as _,
            current_len: name.len() as u16,
            max_len: name.len() as u16,
            // SAFETY: all-zero permissions = no write access from the host.
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}
