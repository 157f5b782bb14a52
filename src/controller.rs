//! Command loop - polls the serial port and drives the HID transport.
//!
//! The loop owns every collaborator it talks to:
//!
//! - a [`HidTransport`] (the BLE mouse on target, a recorder in tests),
//! - a [`SerialInput`] it reads single bytes from,
//! - a [`StatusSink`] receiving one diagnostic line per handled byte,
//! - an async delay providing the loop tick and burst pauses.
//!
//! ```text
//!   loop:
//!     sleep(tick)
//!     connected? ── no ──▶ sleep(idle)
//!        │ yes
//!        ▼
//!     byte available? ── no ──▶ (next iteration)
//!        │ yes
//!        ▼
//!     dispatch(byte) ──▶ HID reports, then one status line
//! ```

use embedded_hal_async::delay::DelayNs;

use crate::command::{Action, Command};
use crate::config::{DISCONNECTED_IDLE_MS, LOOP_TICK_MS};
use crate::hid::mouse::MouseButton;
use crate::motion::play_burst;
use crate::status::Status;

/// Mouse-side transport. The command loop only queries and sends; the
/// session itself is managed by whoever implements this.
pub trait HidTransport {
    /// Start advertising / accepting a host session.
    fn begin(&mut self);
    /// `true` while a host is connected.
    fn is_connected(&self) -> bool;
    /// Send one relative-motion report.
    fn move_by(&mut self, dx: i8, dy: i8);
    /// Send a press report followed by a release report.
    fn click(&mut self, button: MouseButton);
}

/// Non-blocking byte source.
pub trait SerialInput {
    /// Take one byte if any is waiting.
    fn read_byte(&mut self) -> Option<u8>;
}

/// Destination for diagnostic lines.
pub trait StatusSink {
    fn emit(&mut self, status: &Status);
}

/// Connection state as seen by the command loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    Disconnected,
    Connected,
}

/// Loop pacing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// Pause at the top of each iteration (ms).
    pub tick_ms: u32,
    /// Additional pause while disconnected (ms).
    pub idle_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            tick_ms: LOOP_TICK_MS,
            idle_ms: DISCONNECTED_IDLE_MS,
        }
    }
}

/// Outcome of one loop iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Poll {
    /// No host connected; input left untouched.
    Idle,
    /// Connected, but nothing to read.
    NoInput,
    /// One byte was read and carried out.
    Handled(Command),
}

pub struct Controller<T, S, O, D> {
    transport: T,
    input: S,
    output: O,
    delay: D,
    timing: Timing,
    link: LinkState,
}

impl<T, S, O, D> Controller<T, S, O, D>
where
    T: HidTransport,
    S: SerialInput,
    O: StatusSink,
    D: DelayNs,
{
    pub fn new(transport: T, input: S, output: O, delay: D) -> Self {
        Self {
            transport,
            input,
            output,
            delay,
            timing: Timing::default(),
            link: LinkState::Disconnected,
        }
    }

    /// Override the default loop pacing.
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Print the banner and start the transport.
    pub fn start(&mut self) {
        self.output.emit(&Status::Banner);
        self.transport.begin();
    }

    /// Link state observed on the most recent iteration.
    pub fn link_state(&self) -> LinkState {
        self.link
    }

    /// Run one iteration of the command loop.
    pub async fn poll_once(&mut self) -> Poll {
        self.delay.delay_ms(self.timing.tick_ms).await;

        self.link = if self.transport.is_connected() {
            LinkState::Connected
        } else {
            LinkState::Disconnected
        };

        if self.link == LinkState::Disconnected {
            self.delay.delay_ms(self.timing.idle_ms).await;
            return Poll::Idle;
        }

        match self.input.read_byte() {
            Some(byte) => {
                let command = Command::from_byte(byte);
                self.dispatch(command).await;
                Poll::Handled(command)
            }
            None => Poll::NoInput,
        }
    }

    /// Carry out one command and report it. Assumes a connected host.
    pub async fn dispatch(&mut self, command: Command) -> Status {
        match command {
            Command::Action(Action::Move(direction)) => {
                play_burst(direction.burst(), &mut self.transport, &mut self.delay).await;
            }
            Command::Action(Action::Click(button)) => self.transport.click(button),
            Command::Unknown(_) => {}
        }

        let status = Status::for_command(command);
        self.output.emit(&status);
        status
    }

    /// Start, then poll forever.
    pub async fn run(mut self) -> ! {
        self.start();
        loop {
            self.poll_once().await;
        }
    }
}
