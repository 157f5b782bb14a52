//! Motion bursts - fixed (report, wait) schedules per direction.
//!
//! Every directional command sends two identical relative-motion reports
//! with a pause between them. The schedules are plain tables so the
//! player stays generic.
//!
//! | Direction | Delta      | Pause  |
//! |-----------|------------|--------|
//! | Up        | (0, -127)  | 100 ms |
//! | Down      | (0, +127)  | 100 ms |
//! | Left      | (-50, 0)   | 50 ms  |
//! | Right     | (+50, 0)   | 40 ms  |

use crate::command::Direction;
use crate::controller::HidTransport;
use embedded_hal_async::delay::DelayNs;

/// One entry of a burst schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Send one relative-motion report.
    Move { dx: i8, dy: i8 },
    /// Wait before the next step (ms).
    Pause(u32),
}

const UP: [Step; 3] = [
    Step::Move { dx: 0, dy: -127 },
    Step::Pause(100),
    Step::Move { dx: 0, dy: -127 },
];

const DOWN: [Step; 3] = [
    Step::Move { dx: 0, dy: 127 },
    Step::Pause(100),
    Step::Move { dx: 0, dy: 127 },
];

const LEFT: [Step; 3] = [
    Step::Move { dx: -50, dy: 0 },
    Step::Pause(50),
    Step::Move { dx: -50, dy: 0 },
];

const RIGHT: [Step; 3] = [
    Step::Move { dx: 50, dy: 0 },
    Step::Pause(40),
    Step::Move { dx: 50, dy: 0 },
];

impl Direction {
    /// The burst schedule for this direction.
    pub fn burst(self) -> &'static [Step] {
        match self {
            Direction::Up => &UP,
            Direction::Down => &DOWN,
            Direction::Left => &LEFT,
            Direction::Right => &RIGHT,
        }
    }
}

/// Play a burst to completion.
///
/// There is no cancellation point: a host disconnect mid-burst still runs
/// the remaining pauses and report calls.
pub async fn play_burst<T, D>(steps: &[Step], transport: &mut T, delay: &mut D)
where
    T: HidTransport,
    D: DelayNs,
{
    for step in steps {
        match *step {
            Step::Move { dx, dy } => transport.move_by(dx, dy),
            Step::Pause(ms) => delay.delay_ms(ms).await,
        }
    }
}
