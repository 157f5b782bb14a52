//! Advertising payload builder.
//!
//! Legacy advertising PDUs carry up to 31 bytes of AD structures, each
//! `[len, type, data...]` where `len` counts the type byte plus data.

use heapless::Vec;

/// Maximum legacy advertising / scan response payload.
pub const MAX_AD_LEN: usize = 31;

/// AD type: Flags.
pub const AD_TYPE_FLAGS: u8 = 0x01;
/// AD type: Complete List of 16-bit Service UUIDs.
pub const AD_TYPE_UUID16_COMPLETE: u8 = 0x03;
/// AD type: Shortened Local Name.
pub const AD_TYPE_SHORT_NAME: u8 = 0x08;
/// AD type: Complete Local Name.
pub const AD_TYPE_COMPLETE_NAME: u8 = 0x09;
/// AD type: Appearance.
pub const AD_TYPE_APPEARANCE: u8 = 0x19;

/// LE General Discoverable | BR/EDR Not Supported.
pub const FLAGS_GENERAL_DISCOVERABLE: u8 = 0x06;

/// HID Service UUID (0x1812).
pub const HID_SERVICE_UUID16: u16 = 0x1812;

pub type AdPayload = Vec<u8, MAX_AD_LEN>;

/// Advertising data: flags, 16-bit service list and appearance.
///
/// Service UUIDs that no longer fit are dropped from the list.
pub fn advertisement(services: &[u16], appearance: u16) -> AdPayload {
    let mut ad = AdPayload::new();
    push_structure(&mut ad, AD_TYPE_FLAGS, &[FLAGS_GENERAL_DISCOVERABLE]);

    // Appearance (4 bytes) is reserved before sizing the UUID list.
    let room = MAX_AD_LEN - ad.len() - 4 - 2;
    let count = services.len().min(room / 2);
    if count > 0 {
        let mut uuids: Vec<u8, MAX_AD_LEN> = Vec::new();
        for uuid in &services[..count] {
            let _ = uuids.extend_from_slice(&uuid.to_le_bytes());
        }
        push_structure(&mut ad, AD_TYPE_UUID16_COMPLETE, &uuids);
    }

    push_structure(&mut ad, AD_TYPE_APPEARANCE, &appearance.to_le_bytes());
    ad
}

/// Scan response carrying the device name.
///
/// Names longer than the payload allows are cut on a UTF-8 boundary and
/// sent as a Shortened Local Name.
pub fn scan_response(name: &str) -> AdPayload {
    let mut ad = AdPayload::new();
    let max = MAX_AD_LEN - 2;

    if name.len() <= max {
        push_structure(&mut ad, AD_TYPE_COMPLETE_NAME, name.as_bytes());
    } else {
        let mut end = max;
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        push_structure(&mut ad, AD_TYPE_SHORT_NAME, &name.as_bytes()[..end]);
    }
    ad
}

fn push_structure(ad: &mut AdPayload, ad_type: u8, data: &[u8]) {
    if ad.len() + 2 + data.len() > MAX_AD_LEN {
        return;
    }
    let _ = ad.push(data.len() as u8 + 1);
    let _ = ad.push(ad_type);
    let _ = ad.extend_from_slice(data);
}
