//! Serial subsystem - UARTE0 command input and diagnostic output.
//!
//! UARTE0 runs as a `BufferedUarte`, so reception continues between reads
//! and while the SoftDevice holds the CPU. Two tasks own the halves:
//!
//! - **RX** drains the receive ring into a bounded byte queue. When the
//!   queue is full the task stops draining, bytes wait in the ring, and
//!   input arriving with both full is dropped by the hardware.
//! - **TX** writes diagnostic lines queued by [`StatusLog`].
//!
//! The command loop sees them through [`SerialPort`] (non-blocking read)
//! and [`StatusLog`] (fire-and-forget line output).

use crate::config::{SERIAL_RX_BUFFER, STATUS_LINE_MAX, STATUS_QUEUE_DEPTH};
use crate::controller::{SerialInput, StatusSink};
use crate::error::Error;
use crate::status::Status;
use defmt::{info, trace, warn};
use embassy_nrf::buffered_uarte::{BufferedUarteRx, BufferedUarteTx};
use embassy_nrf::peripherals::{TIMER1, UARTE0};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embedded_io_async::{Read, Write};
use heapless::Vec;

type StatusLine = Vec<u8, STATUS_LINE_MAX>;

static RX_BYTES: Channel<CriticalSectionRawMutex, u8, SERIAL_RX_BUFFER> = Channel::new();
static TX_LINES: Channel<CriticalSectionRawMutex, StatusLine, STATUS_QUEUE_DEPTH> = Channel::new();

/// Receive loop - must be spawned as a dedicated Embassy task.
pub async fn rx_task(mut rx: BufferedUarteRx<'static, UARTE0, TIMER1>) -> ! {
    info!("UART RX task started");

    let mut buf = [0u8; 16];
    loop {
        match rx.read(&mut buf).await {
            Ok(n) => {
                trace!("RX: {} bytes", n);
                for &byte in &buf[..n] {
                    RX_BYTES.send(byte).await;
                }
            }
            Err(e) => warn!("{}: {}", Error::Serial, e),
        }
    }
}

/// Transmit loop - must be spawned as a dedicated Embassy task.
pub async fn tx_task(mut tx: BufferedUarteTx<'static, UARTE0>) -> ! {
    info!("UART TX task started");

    loop {
        let line = TX_LINES.receive().await;
        if let Err(e) = tx.write_all(&line).await {
            warn!("{}: {}", Error::Serial, e);
        }
    }
}

/// Non-blocking view of the receive queue.
pub struct SerialPort;

impl SerialInput for SerialPort {
    fn read_byte(&mut self) -> Option<u8> {
        RX_BYTES.try_receive().ok()
    }
}

/// Writes each status as a `\r\n`-terminated line and mirrors it to defmt.
pub struct StatusLog;

impl StatusSink for StatusLog {
    fn emit(&mut self, status: &Status) {
        info!("status: {}", status);

        let mut line = StatusLine::new();
        if status.encode_line(&mut line).is_err() {
            warn!("{}", Error::BufferOverflow);
            return;
        }
        if TX_LINES.try_send(line).is_err() {
            warn!("Serial TX queue full - dropping status line");
        }
    }
}
