//! Test-only library interface for serial2ble.
//!
//! This module re-exports the pure logic modules that can be tested
//! on the host (no embedded hardware required).
//!
//! Usage: `cargo test`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main].
//! This lib.rs provides a separate entry point for host-based testing.

#![cfg_attr(not(test), no_std)]

pub mod command;
pub mod config;
pub mod controller;
pub mod motion;
pub mod status;

pub mod hid {
    pub mod mouse;

    pub use mouse::{MouseButton, MouseReport, ProtocolMode, ProtocolModeState};
}

pub mod ble {
    pub mod adv_data;
}

// ═══════════════════════════════════════════════════════════════════════════
// Unit Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use embassy_futures::block_on;
    use embedded_hal_async::delay::DelayNs;

    use super::ble::adv_data::*;
    use super::command::{Action, Command, Direction};
    use super::controller::{HidTransport, Timing};
    use super::hid::mouse::*;
    use super::motion::{play_burst, Step};
    use super::status::{LineOverflow, Status};

    #[derive(Clone, Debug, PartialEq)]
    enum Event {
        Move(i8, i8),
        Click(MouseButton),
        Wait(u32),
    }

    struct Recorder {
        log: Rc<RefCell<Vec<Event>>>,
    }

    impl HidTransport for Recorder {
        fn begin(&mut self) {}

        fn is_connected(&self) -> bool {
            true
        }

        fn move_by(&mut self, dx: i8, dy: i8) {
            self.log.borrow_mut().push(Event::Move(dx, dy));
        }

        fn click(&mut self, button: MouseButton) {
            self.log.borrow_mut().push(Event::Click(button));
        }
    }

    impl DelayNs for Recorder {
        async fn delay_ns(&mut self, ns: u32) {
            self.log.borrow_mut().push(Event::Wait(ns / 1_000_000));
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.log.borrow_mut().push(Event::Wait(ms));
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Command Lookup Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn command_decodes_direction_keys() {
        assert_eq!(
            Command::from_byte(b'w'),
            Command::Action(Action::Move(Direction::Up))
        );
        assert_eq!(
            Command::from_byte(b's'),
            Command::Action(Action::Move(Direction::Down))
        );
        assert_eq!(
            Command::from_byte(b'a'),
            Command::Action(Action::Move(Direction::Left))
        );
        assert_eq!(
            Command::from_byte(b'd'),
            Command::Action(Action::Move(Direction::Right))
        );
    }

    #[test]
    fn command_decodes_click_keys() {
        assert_eq!(
            Command::from_byte(b'c'),
            Command::Action(Action::Click(MouseButton::Left))
        );
        assert_eq!(
            Command::from_byte(b'r'),
            Command::Action(Action::Click(MouseButton::Right))
        );
        assert_eq!(
            Command::from_byte(b'm'),
            Command::Action(Action::Click(MouseButton::Middle))
        );
    }

    #[test]
    fn command_lookup_is_case_sensitive() {
        assert_eq!(Command::from_byte(b'W'), Command::Unknown(b'W'));
        assert_eq!(Command::from_byte(b'C'), Command::Unknown(b'C'));
    }

    #[test]
    fn command_line_endings_are_unknown() {
        assert_eq!(Command::from_byte(b'\n'), Command::Unknown(b'\n'));
        assert_eq!(Command::from_byte(b'\r'), Command::Unknown(b'\r'));
    }

    #[test]
    fn command_high_bytes_are_unknown() {
        assert_eq!(Command::from_byte(0x80), Command::Unknown(0x80));
        assert_eq!(Command::from_byte(0xFF), Command::Unknown(0xFF));
    }

    #[test]
    fn command_exactly_seven_bytes_are_recognised() {
        let recognised = (0..=255u8)
            .filter(|&b| matches!(Command::from_byte(b), Command::Action(_)))
            .count();
        assert_eq!(recognised, 7);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Motion Burst Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn burst_up_is_two_full_scale_moves_100ms_apart() {
        assert_eq!(
            Direction::Up.burst(),
            &[
                Step::Move { dx: 0, dy: -127 },
                Step::Pause(100),
                Step::Move { dx: 0, dy: -127 },
            ]
        );
    }

    #[test]
    fn burst_down_mirrors_up() {
        assert_eq!(
            Direction::Down.burst(),
            &[
                Step::Move { dx: 0, dy: 127 },
                Step::Pause(100),
                Step::Move { dx: 0, dy: 127 },
            ]
        );
    }

    #[test]
    fn burst_left_and_right_have_different_pauses() {
        assert_eq!(
            Direction::Left.burst(),
            &[
                Step::Move { dx: -50, dy: 0 },
                Step::Pause(50),
                Step::Move { dx: -50, dy: 0 },
            ]
        );
        assert_eq!(
            Direction::Right.burst(),
            &[
                Step::Move { dx: 50, dy: 0 },
                Step::Pause(40),
                Step::Move { dx: 50, dy: 0 },
            ]
        );
    }

    #[test]
    fn burst_never_ends_with_a_pause() {
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            let steps = direction.burst();
            assert!(matches!(steps.first(), Some(Step::Move { .. })));
            assert!(matches!(steps.last(), Some(Step::Move { .. })));
        }
    }

    #[test]
    fn play_burst_interleaves_reports_and_pauses() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut transport = Recorder { log: log.clone() };
        let mut delay = Recorder { log: log.clone() };

        block_on(play_burst(Direction::Left.burst(), &mut transport, &mut delay));

        assert_eq!(
            *log.borrow(),
            [Event::Move(-50, 0), Event::Wait(50), Event::Move(-50, 0)]
        );
    }

    #[test]
    fn play_burst_empty_schedule_does_nothing() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut transport = Recorder { log: log.clone() };
        let mut delay = Recorder { log: log.clone() };

        block_on(play_burst(&[], &mut transport, &mut delay));

        assert!(log.borrow().is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════
    // Status Line Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn status_motion_glyphs() {
        assert_eq!(format!("{}", Status::Moved(Direction::Up)), "↑");
        assert_eq!(format!("{}", Status::Moved(Direction::Down)), "↓");
        assert_eq!(format!("{}", Status::Moved(Direction::Left)), "←");
        assert_eq!(format!("{}", Status::Moved(Direction::Right)), "→");
    }

    #[test]
    fn status_click_labels() {
        assert_eq!(format!("{}", Status::Clicked(MouseButton::Left)), "Click");
        assert_eq!(
            format!("{}", Status::Clicked(MouseButton::Right)),
            "Right Click"
        );
        assert_eq!(
            format!("{}", Status::Clicked(MouseButton::Middle)),
            "Middle Click"
        );
    }

    #[test]
    fn status_unknown_echoes_character() {
        assert_eq!(format!("{}", Status::Unknown(b'z')), "Unknown input: z");
        assert_eq!(format!("{}", Status::Unknown(b'7')), "Unknown input: 7");
    }

    #[test]
    fn status_banner_text() {
        assert_eq!(format!("{}", Status::Banner), "Starting BLE work!");
    }

    #[test]
    fn status_for_command_matches_action() {
        assert_eq!(
            Status::for_command(Command::from_byte(b's')),
            Status::Moved(Direction::Down)
        );
        assert_eq!(
            Status::for_command(Command::from_byte(b'm')),
            Status::Clicked(MouseButton::Middle)
        );
        assert_eq!(
            Status::for_command(Command::from_byte(b'q')),
            Status::Unknown(b'q')
        );
    }

    #[test]
    fn status_lines_fit_serial_line_buffer() {
        for status in [
            Status::Banner,
            Status::Moved(Direction::Left),
            Status::Clicked(MouseButton::Middle),
            Status::Unknown(0xFF),
        ] {
            let mut line: heapless::Vec<u8, { crate::config::STATUS_LINE_MAX }> =
                heapless::Vec::new();
            assert_eq!(status.encode_line(&mut line), Ok(()));
            assert!(line.ends_with(b"\r\n"));
        }
    }

    #[test]
    fn status_line_encodes_text_as_utf8() {
        let mut line: heapless::Vec<u8, 32> = heapless::Vec::new();
        Status::Moved(Direction::Up).encode_line(&mut line).unwrap();
        assert_eq!(line.as_slice(), "↑\r\n".as_bytes());
    }

    #[test]
    fn status_line_echoes_raw_byte() {
        let mut line: heapless::Vec<u8, 32> = heapless::Vec::new();
        Status::Unknown(0xE9).encode_line(&mut line).unwrap();
        assert_eq!(line.as_slice(), b"Unknown input: \xE9\r\n");

        line.clear();
        Status::Unknown(b'\r').encode_line(&mut line).unwrap();
        assert_eq!(line.as_slice(), b"Unknown input: \r\r\n");
    }

    #[test]
    fn status_line_overflow_is_reported() {
        let mut line: heapless::Vec<u8, 8> = heapless::Vec::new();
        assert_eq!(Status::Banner.encode_line(&mut line), Err(LineOverflow));

        let mut line: heapless::Vec<u8, 16> = heapless::Vec::new();
        assert_eq!(Status::Unknown(b'z').encode_line(&mut line), Err(LineOverflow));
    }

    // ════════════════════════════════════════════════════════════════════════
    // Mouse Report Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn mouse_report_empty() {
        let report = MouseReport::empty();
        assert!(report.is_idle());
        assert_eq!(report, MouseReport::default());
    }

    #[test]
    fn mouse_report_motion_has_no_buttons() {
        let report = MouseReport::motion(50, -127);
        assert_eq!(report.buttons, 0);
        assert_eq!(report.x, 50);
        assert_eq!(report.y, -127);
        assert_eq!(report.wheel, 0);
        assert!(!report.is_idle());
    }

    #[test]
    fn mouse_report_motion_clamps_to_logical_minimum() {
        let report = MouseReport::motion(i8::MIN, i8::MIN);
        assert_eq!(report.x, -127);
        assert_eq!(report.y, -127);
    }

    #[test]
    fn mouse_button_bits() {
        assert_eq!(MouseReport::press(MouseButton::Left).buttons, 0x01);
        assert_eq!(MouseReport::press(MouseButton::Right).buttons, 0x02);
        assert_eq!(MouseReport::press(MouseButton::Middle).buttons, 0x04);
    }

    #[test]
    fn mouse_report_serialize_report_mode() {
        let report = MouseReport::motion(-50, 127);
        let mut buf = [0u8; 4];
        assert_eq!(report.serialize_for(ProtocolMode::Report, &mut buf), 4);
        assert_eq!(buf, [0x00, 0xCE, 0x7F, 0x00]);
    }

    #[test]
    fn mouse_report_serialize_boot_mode_drops_wheel() {
        let report = MouseReport {
            buttons: 0x02,
            x: 10,
            y: -10,
            wheel: 3,
        };
        let mut buf = [0xAAu8; 4];
        assert_eq!(report.serialize_for(ProtocolMode::Boot, &mut buf), 3);
        assert_eq!(buf, [0x02, 10, 0xF6, 0xAA]);
    }

    #[test]
    fn mouse_report_serialize_buffer_too_small() {
        let report = MouseReport::press(MouseButton::Left);
        let mut buf = [0u8; 2];
        assert_eq!(report.serialize(&mut buf), 0);
        assert_eq!(report.serialize_boot(&mut buf), 0);
    }

    #[test]
    fn protocol_mode_from_host_write() {
        assert_eq!(ProtocolMode::from_u8(0), Some(ProtocolMode::Boot));
        assert_eq!(ProtocolMode::from_u8(1), Some(ProtocolMode::Report));
        assert_eq!(ProtocolMode::from_u8(2), None);
    }

    #[test]
    fn protocol_mode_state_defaults_to_report() {
        assert_eq!(ProtocolModeState::new().get(), ProtocolMode::Report);
    }

    #[test]
    fn protocol_mode_state_follows_host_writes() {
        let state = ProtocolModeState::new();

        assert_eq!(state.apply_write(&[0]), Some(ProtocolMode::Boot));
        assert_eq!(state.get(), ProtocolMode::Boot);

        // Empty and out-of-range writes leave the mode alone.
        assert_eq!(state.apply_write(&[]), None);
        assert_eq!(state.apply_write(&[7]), None);
        assert_eq!(state.get(), ProtocolMode::Boot);
    }

    #[test]
    fn protocol_mode_state_resets_for_next_host() {
        let state = ProtocolModeState::new();
        state.apply_write(&[0]);

        // Previous host left boot mode selected; the next one starts in
        // report mode and gets 4-byte reports.
        state.reset();

        assert_eq!(state.get(), ProtocolMode::Report);
        let mut buf = [0u8; MOUSE_REPORT_SIZE];
        let report = MouseReport::motion(5, -5);
        assert_eq!(report.serialize_for(state.get(), &mut buf), MOUSE_REPORT_SIZE);
    }

    #[test]
    fn mouse_descriptor_declares_report_id() {
        assert_eq!(&MOUSE_REPORT_DESCRIPTOR[..4], &[0x05, 0x01, 0x09, 0x02]);
        assert!(MOUSE_REPORT_DESCRIPTOR
            .windows(2)
            .any(|w| w == [0x85, MOUSE_REPORT_ID]));
        assert_eq!(
            &MOUSE_REPORT_DESCRIPTOR[MOUSE_REPORT_DESCRIPTOR.len() - 2..],
            &[0xC0, 0xC0]
        );
    }

    // ════════════════════════════════════════════════════════════════════════
    // Advertising Payload Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn advertisement_for_hid_mouse() {
        let ad = advertisement(&[HID_SERVICE_UUID16], 0x03C2);
        assert_eq!(
            ad.as_slice(),
            &[
                0x02, 0x01, 0x06, // flags
                0x03, 0x03, 0x12, 0x18, // HID service
                0x03, 0x19, 0xC2, 0x03, // appearance: mouse
            ]
        );
    }

    #[test]
    fn advertisement_truncates_service_list() {
        let services = [0x1812u16; 20];
        let ad = advertisement(&services, 0x03C2);
        assert!(ad.len() <= MAX_AD_LEN);
        // Appearance must survive the truncation.
        assert_eq!(&ad[ad.len() - 4..], &[0x03, 0x19, 0xC2, 0x03]);
    }

    #[test]
    fn advertisement_without_services_skips_uuid_list() {
        let ad = advertisement(&[], 0x03C2);
        assert_eq!(ad.as_slice(), &[0x02, 0x01, 0x06, 0x03, 0x19, 0xC2, 0x03]);
    }

    #[test]
    fn scan_response_complete_name() {
        let ad = scan_response("Serial Mouse");
        assert_eq!(ad[0], 13);
        assert_eq!(ad[1], AD_TYPE_COMPLETE_NAME);
        assert_eq!(&ad[2..], b"Serial Mouse");
    }

    #[test]
    fn scan_response_shortens_long_name() {
        let name = "A very long Bluetooth mouse device name";
        let ad = scan_response(name);
        assert_eq!(ad.len(), MAX_AD_LEN);
        assert_eq!(ad[1], AD_TYPE_SHORT_NAME);
        assert_eq!(&ad[2..], &name.as_bytes()[..MAX_AD_LEN - 2]);
    }

    #[test]
    fn scan_response_cuts_on_char_boundary() {
        // 28 ASCII bytes, then a 3-byte glyph straddling the limit.
        let name = "ABCDEFGHIJKLMNOPQRSTUVWXYZab→";
        let ad = scan_response(name);
        assert_eq!(ad[1], AD_TYPE_SHORT_NAME);
        assert_eq!(&ad[2..], b"ABCDEFGHIJKLMNOPQRSTUVWXYZab");
        assert_eq!(ad[0] as usize, ad.len() - 1);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Configuration Tests
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn timing_defaults_come_from_config() {
        let timing = Timing::default();
        assert_eq!(timing.tick_ms, crate::config::LOOP_TICK_MS);
        assert_eq!(timing.idle_ms, crate::config::DISCONNECTED_IDLE_MS);
        assert!(timing.idle_ms > timing.tick_ms);
    }
}
