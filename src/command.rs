//! Serial command set and byte → command lookup.
//!
//! Seven ASCII characters are recognised; every other byte decodes to
//! [`Command::Unknown`] carrying the raw byte so it can be echoed back.
//!
//! ```text
//!          w  - up
//!   a - left     d - right
//!          s  - down
//!
//!   c - left click   r - right click   m - middle click
//! ```

use crate::hid::mouse::MouseButton;

/// Direction of a relative-motion burst.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Something the dispatcher knows how to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Play the motion burst for a direction.
    Move(Direction),
    /// Press and release one button.
    Click(MouseButton),
}

/// One decoded serial byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Action(Action),
    /// Unrecognised byte, kept verbatim for the diagnostic echo.
    Unknown(u8),
}

impl Command {
    /// Decode one serial byte.
    pub fn from_byte(byte: u8) -> Self {
        match KEYMAP.get(byte as usize).copied().flatten() {
            Some(action) => Command::Action(action),
            None => Command::Unknown(byte),
        }
    }
}

/// ASCII-indexed keymap; bytes above 0x7F fall outside and are unknown.
static KEYMAP: [Option<Action>; 128] = build_keymap();

const fn build_keymap() -> [Option<Action>; 128] {
    let mut map: [Option<Action>; 128] = [None; 128];
    map[b'w' as usize] = Some(Action::Move(Direction::Up));
    map[b's' as usize] = Some(Action::Move(Direction::Down));
    map[b'a' as usize] = Some(Action::Move(Direction::Left));
    map[b'd' as usize] = Some(Action::Move(Direction::Right));
    map[b'c' as usize] = Some(Action::Click(MouseButton::Left));
    map[b'r' as usize] = Some(Action::Click(MouseButton::Right));
    map[b'm' as usize] = Some(Action::Click(MouseButton::Middle));
    map
}
