//! Human-readable diagnostic lines written back over the serial port.
//!
//! [`Status::encode_line`] produces the exact bytes sent on the UART: UTF-8
//! text for fixed lines, and the received byte unchanged after
//! `Unknown input: `. The `Display` impl is for logs and shows that byte as
//! a Latin-1 character.

use core::fmt;

use heapless::Vec;

use crate::command::{Action, Command, Direction};
use crate::hid::mouse::MouseButton;

/// Printed once at startup, before the transport is started.
pub const BANNER: &str = "Starting BLE work!";

const UNKNOWN_PREFIX: &str = "Unknown input: ";

/// Line terminator appended to every serial diagnostic.
pub const LINE_END: &[u8] = b"\r\n";

/// One diagnostic line (without line terminator).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    Banner,
    Moved(Direction),
    Clicked(MouseButton),
    Unknown(u8),
}

/// The line buffer was too small for the encoded status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineOverflow;

impl Status {
    /// Status reported once a command has been carried out.
    pub fn for_command(command: Command) -> Self {
        match command {
            Command::Action(Action::Move(direction)) => Status::Moved(direction),
            Command::Action(Action::Click(button)) => Status::Clicked(button),
            Command::Unknown(byte) => Status::Unknown(byte),
        }
    }

    /// Fixed part of the line. For an unknown byte this is the prefix the
    /// byte is echoed after.
    fn text(&self) -> &'static str {
        match self {
            Status::Banner => BANNER,
            Status::Moved(Direction::Up) => "↑",
            Status::Moved(Direction::Down) => "↓",
            Status::Moved(Direction::Left) => "←",
            Status::Moved(Direction::Right) => "→",
            Status::Clicked(MouseButton::Left) => "Click",
            Status::Clicked(MouseButton::Right) => "Right Click",
            Status::Clicked(MouseButton::Middle) => "Middle Click",
            Status::Unknown(_) => UNKNOWN_PREFIX,
        }
    }

    /// Append the serial form of this line, terminator included.
    pub fn encode_line<const N: usize>(&self, out: &mut Vec<u8, N>) -> Result<(), LineOverflow> {
        out.extend_from_slice(self.text().as_bytes()).map_err(|_| LineOverflow)?;
        if let Status::Unknown(byte) = self {
            out.push(*byte).map_err(|_| LineOverflow)?;
        }
        out.extend_from_slice(LINE_END).map_err(|_| LineOverflow)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())?;
        if let Status::Unknown(byte) = self {
            write!(f, "{}", *byte as char)?;
        }
        Ok(())
    }
}
