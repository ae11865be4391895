// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Extension controller register layout and report formats
//!
//! # Register Map
//!
//! - 0x00..: Data report (6 bytes, or 8 in high-resolution mode)
//! - 0xF0: Init register 1 (write 0x55 to disable encryption)
//! - 0xFA..0xFF: Identity (6 bytes)
//! - 0xFB: Init register 2 (write 0x00)
//! - 0xFE: Data format (write 0x03 for classic high resolution)
//!
//! # Identity
//!
//! ```text
//! Bytes             | Device
//! ------------------|---------------------------
//! xx 00 A4 20 00 00 | Nunchuk
//! xx 00 A4 20 01 01 | Classic Controller (Pro)
//! 00 00 A4 20 01 03 | Guitar
//! 01 00 A4 20 01 03 | Drums
//! 03 00 A4 20 01 03 | DJ turntable
//! FF 00 A4 20 00 12 | uDraw tablet
//! FF 00 A4 20 00 13 | Drawsome tablet
//! ```
//!
//! # Button Encoding
//!
//! All buttons use active-low encoding (0 = pressed, 1 = released).

use super::{ClassicFields, DeviceFamily, GuitarFields, NunchukFields};

/// Data report register
pub const REG_DATA: u8 = 0x00;
/// First init register
pub const REG_INIT1: u8 = 0xF0;
/// Identity register
pub const REG_IDENTITY: u8 = 0xFA;
/// Second init register
pub const REG_INIT2: u8 = 0xFB;
/// Data format register
pub const REG_DATA_FORMAT: u8 = 0xFE;

/// Value written to [`REG_INIT1`]
pub const INIT1_VALUE: u8 = 0x55;
/// Value written to [`REG_INIT2`]
pub const INIT2_VALUE: u8 = 0x00;
/// Data format selecting the 8-byte high resolution classic report
pub const FORMAT_HIGH_RES: u8 = 0x03;

/// Size of the identity block
pub const IDENTITY_LEN: usize = 6;
/// Size of a standard data report
pub const STANDARD_REPORT_LEN: usize = 6;
/// Size of a high resolution classic report
pub const HIGH_RES_REPORT_LEN: usize = 8;

/// Identity of a Nunchuk
pub const ID_NUNCHUK: [u8; IDENTITY_LEN] = [0x00, 0x00, 0xA4, 0x20, 0x00, 0x00];
/// Identity of a Classic Controller
pub const ID_CLASSIC: [u8; IDENTITY_LEN] = [0x00, 0x00, 0xA4, 0x20, 0x01, 0x01];
/// Identity of a Classic Controller Pro
pub const ID_CLASSIC_PRO: [u8; IDENTITY_LEN] = [0x01, 0x00, 0xA4, 0x20, 0x01, 0x01];
/// Identity of a guitar
pub const ID_GUITAR: [u8; IDENTITY_LEN] = [0x00, 0x00, 0xA4, 0x20, 0x01, 0x03];
/// Identity of a drum kit
pub const ID_DRUM: [u8; IDENTITY_LEN] = [0x01, 0x00, 0xA4, 0x20, 0x01, 0x03];
/// Identity of a DJ turntable
pub const ID_TURNTABLE: [u8; IDENTITY_LEN] = [0x03, 0x00, 0xA4, 0x20, 0x01, 0x03];
/// Identity of a uDraw tablet
pub const ID_UDRAW: [u8; IDENTITY_LEN] = [0xFF, 0x00, 0xA4, 0x20, 0x00, 0x12];
/// Identity of a Drawsome tablet
pub const ID_DRAWSOME: [u8; IDENTITY_LEN] = [0xFF, 0x00, 0xA4, 0x20, 0x00, 0x13];

/// Identify the attached device from its identity block
///
/// # Examples
///
/// ```
/// use wii_adapter::core::bus::report::{identify, ID_CLASSIC};
/// use wii_adapter::core::bus::DeviceFamily;
///
/// assert_eq!(identify(&ID_CLASSIC), DeviceFamily::Classic);
/// assert_eq!(identify(&[0xFF; 6]), DeviceFamily::None);
/// ```
pub fn identify(id: &[u8; IDENTITY_LEN]) -> DeviceFamily {
    if id.iter().all(|&b| b == 0xFF) || id.iter().all(|&b| b == 0x00) {
        return DeviceFamily::None;
    }

    if id[1] != 0x00 || id[2] != 0xA4 || id[3] != 0x20 {
        return DeviceFamily::Unknown;
    }

    match (id[0], id[4], id[5]) {
        (_, 0x00, 0x00) => DeviceFamily::Nunchuk,
        (_, 0x01, 0x01) => DeviceFamily::Classic,
        (0x00, 0x01, 0x03) => DeviceFamily::Guitar,
        (0x01, 0x01, 0x03) => DeviceFamily::Drum,
        (0x03, 0x01, 0x03) => DeviceFamily::Turntable,
        (0xFF, 0x00, 0x12) => DeviceFamily::UDraw,
        (0xFF, 0x00, 0x13) => DeviceFamily::Drawsome,
        _ => DeviceFamily::Unknown,
    }
}

/// Active-low bit test
#[inline]
fn pressed(byte: u8, bit: u8) -> bool {
    byte & (1 << bit) == 0
}

/// Active-low bit encode (unused bits stay high)
#[inline]
fn release_mask(bits: &[(bool, u8)]) -> u8 {
    bits.iter()
        .filter(|(down, _)| *down)
        .fold(0xFF, |acc, (_, bit)| acc & !(1 << bit))
}

/// Widen an n-bit sample to 8 bits, replicating high bits into the low ones
#[inline]
fn widen(value: u8, bits: u32) -> u8 {
    let value = value as u16;
    ((value << (8 - bits)) | (value >> (2 * bits - 8))) as u8
}

/// Decode the two classic button bytes
fn classic_buttons(fields: &mut ClassicFields, b4: u8, b5: u8) {
    fields.dpad_right = pressed(b4, 7);
    fields.dpad_down = pressed(b4, 6);
    fields.l = pressed(b4, 5);
    fields.minus = pressed(b4, 4);
    fields.home = pressed(b4, 3);
    fields.plus = pressed(b4, 2);
    fields.r = pressed(b4, 1);

    fields.zl = pressed(b5, 7);
    fields.b = pressed(b5, 6);
    fields.y = pressed(b5, 5);
    fields.a = pressed(b5, 4);
    fields.x = pressed(b5, 3);
    fields.zr = pressed(b5, 2);
    fields.dpad_left = pressed(b5, 1);
    fields.dpad_up = pressed(b5, 0);
}

fn classic_button_bytes(fields: &ClassicFields) -> (u8, u8) {
    let b4 = release_mask(&[
        (fields.dpad_right, 7),
        (fields.dpad_down, 6),
        (fields.l, 5),
        (fields.minus, 4),
        (fields.home, 3),
        (fields.plus, 2),
        (fields.r, 1),
    ]);
    let b5 = release_mask(&[
        (fields.zl, 7),
        (fields.b, 6),
        (fields.y, 5),
        (fields.a, 4),
        (fields.x, 3),
        (fields.zr, 2),
        (fields.dpad_left, 1),
        (fields.dpad_up, 0),
    ]);
    (b4, b5)
}

/// Decode a standard 6-byte classic report
///
/// Byte layout:
///
/// ```text
/// Byte | 7      6      5      4      3      2      1      0
/// -----|-------------------------------------------------------
/// 0    | RX<4:3>     | LX<5:0>
/// 1    | RX<2:1>     | LY<5:0>
/// 2    | RX<0> | LT<4:3>     | RY<4:0>
/// 3    | LT<2:0>            | RT<4:0>
/// 4    | BDR    BDD    BLT    B-     BH     B+     BRT    1
/// 5    | BZL    BB     BY     BA     BX     BZR    BDL    BDU
/// ```
///
/// Sticks and triggers are widened to 8 bits.
pub fn decode_classic(data: &[u8; STANDARD_REPORT_LEN]) -> ClassicFields {
    let lx = data[0] & 0x3F;
    let ly = data[1] & 0x3F;
    let rx = ((data[0] & 0xC0) >> 3) | ((data[1] & 0xC0) >> 5) | ((data[2] & 0x80) >> 7);
    let ry = data[2] & 0x1F;
    let lt = ((data[2] & 0x60) >> 2) | ((data[3] & 0xE0) >> 5);
    let rt = data[3] & 0x1F;

    let mut fields = ClassicFields {
        left_x: widen(lx, 6),
        left_y: widen(ly, 6),
        right_x: widen(rx, 5),
        right_y: widen(ry, 5),
        trigger_l: widen(lt, 5),
        trigger_r: widen(rt, 5),
        ..ClassicFields::default()
    };
    classic_buttons(&mut fields, data[4], data[5]);
    fields
}

/// Decode an 8-byte high resolution classic report
///
/// Bytes 0..6 are LX, RX, LY, RY, LT, RT at full 8-bit resolution; bytes 6
/// and 7 carry the same button layout as bytes 4 and 5 of the standard report.
pub fn decode_classic_high_res(data: &[u8; HIGH_RES_REPORT_LEN]) -> ClassicFields {
    let mut fields = ClassicFields {
        left_x: data[0],
        right_x: data[1],
        left_y: data[2],
        right_y: data[3],
        trigger_l: data[4],
        trigger_r: data[5],
        ..ClassicFields::default()
    };
    classic_buttons(&mut fields, data[6], data[7]);
    fields
}

/// Encode an 8-byte high resolution classic report
pub fn encode_classic_high_res(fields: &ClassicFields) -> [u8; HIGH_RES_REPORT_LEN] {
    let (b6, b7) = classic_button_bytes(fields);
    [
        fields.left_x,
        fields.right_x,
        fields.left_y,
        fields.right_y,
        fields.trigger_l,
        fields.trigger_r,
        b6,
        b7,
    ]
}

/// Encode a standard 6-byte classic report (analog values lose precision)
pub fn encode_classic(fields: &ClassicFields) -> [u8; STANDARD_REPORT_LEN] {
    let lx = fields.left_x >> 2;
    let ly = fields.left_y >> 2;
    let rx = fields.right_x >> 3;
    let ry = fields.right_y >> 3;
    let lt = fields.trigger_l >> 3;
    let rt = fields.trigger_r >> 3;
    let (b4, b5) = classic_button_bytes(fields);
    [
        ((rx & 0x18) << 3) | lx,
        ((rx & 0x06) << 5) | ly,
        ((rx & 0x01) << 7) | ((lt & 0x18) << 2) | ry,
        ((lt & 0x07) << 5) | rt,
        b4,
        b5,
    ]
}

/// Decode a 6-byte Nunchuk report
///
/// ```text
/// Byte | Contents
/// -----|-----------------------------------------------
/// 0    | Stick X
/// 1    | Stick Y
/// 2    | Accel X<9:2>
/// 3    | Accel Y<9:2>
/// 4    | Accel Z<9:2>
/// 5    | AZ<1:0> AY<1:0> AX<1:0> BC BZ
/// ```
pub fn decode_nunchuk(data: &[u8; STANDARD_REPORT_LEN]) -> NunchukFields {
    NunchukFields {
        joy_x: data[0],
        joy_y: data[1],
        accel_x: ((data[2] as u16) << 2) | ((data[5] as u16 >> 2) & 0x03),
        accel_y: ((data[3] as u16) << 2) | ((data[5] as u16 >> 4) & 0x03),
        accel_z: ((data[4] as u16) << 2) | ((data[5] as u16 >> 6) & 0x03),
        z: pressed(data[5], 0),
        c: pressed(data[5], 1),
    }
}

/// Encode a 6-byte Nunchuk report
pub fn encode_nunchuk(fields: &NunchukFields) -> [u8; STANDARD_REPORT_LEN] {
    let low_bits = (((fields.accel_z & 0x03) as u8) << 6)
        | (((fields.accel_y & 0x03) as u8) << 4)
        | (((fields.accel_x & 0x03) as u8) << 2);
    let buttons = ((!fields.c as u8) << 1) | (!fields.z as u8);
    [
        fields.joy_x,
        fields.joy_y,
        (fields.accel_x >> 2) as u8,
        (fields.accel_y >> 2) as u8,
        (fields.accel_z >> 2) as u8,
        low_bits | buttons,
    ]
}

/// Decode a 6-byte guitar report
///
/// ```text
/// Byte | 7      6      5      4      3      2      1      0
/// -----|-------------------------------------------------------
/// 0    | -      -      SX<5:0>
/// 1    | -      -      SY<5:0>
/// 2    | -      -      -      TB<4:0>
/// 3    | -      -      -      WB<4:0>
/// 4    | 1      BD     1      B-     1      B+     1      1
/// 5    | BO     BR     BB     BG     BY     1      1      BU
/// ```
pub fn decode_guitar(data: &[u8; STANDARD_REPORT_LEN]) -> GuitarFields {
    GuitarFields {
        joy_x: data[0] & 0x3F,
        joy_y: data[1] & 0x3F,
        touchbar: data[2] & 0x1F,
        whammy: data[3] & 0x1F,
        strum_down: pressed(data[4], 6),
        minus: pressed(data[4], 4),
        plus: pressed(data[4], 2),
        orange: pressed(data[5], 7),
        red: pressed(data[5], 6),
        blue: pressed(data[5], 5),
        green: pressed(data[5], 4),
        yellow: pressed(data[5], 3),
        strum_up: pressed(data[5], 0),
    }
}

/// Encode a 6-byte guitar report
pub fn encode_guitar(fields: &GuitarFields) -> [u8; STANDARD_REPORT_LEN] {
    [
        0xC0 | (fields.joy_x & 0x3F),
        0xC0 | (fields.joy_y & 0x3F),
        0xE0 | (fields.touchbar & 0x1F),
        0xE0 | (fields.whammy & 0x1F),
        release_mask(&[(fields.strum_down, 6), (fields.minus, 4), (fields.plus, 2)]),
        release_mask(&[
            (fields.orange, 7),
            (fields.red, 6),
            (fields.blue, 5),
            (fields.green, 4),
            (fields.yellow, 3),
            (fields.strum_up, 0),
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identify_known_devices() {
        assert_eq!(identify(&ID_NUNCHUK), DeviceFamily::Nunchuk);
        assert_eq!(identify(&ID_CLASSIC), DeviceFamily::Classic);
        assert_eq!(identify(&ID_CLASSIC_PRO), DeviceFamily::Classic);
        assert_eq!(identify(&ID_GUITAR), DeviceFamily::Guitar);
        assert_eq!(identify(&ID_DRUM), DeviceFamily::Drum);
        assert_eq!(identify(&ID_TURNTABLE), DeviceFamily::Turntable);
        assert_eq!(identify(&ID_UDRAW), DeviceFamily::UDraw);
        assert_eq!(identify(&ID_DRAWSOME), DeviceFamily::Drawsome);
    }

    #[test]
    fn test_identify_empty_and_unknown() {
        assert_eq!(identify(&[0xFF; 6]), DeviceFamily::None);
        assert_eq!(identify(&[0x00; 6]), DeviceFamily::None);
        assert_eq!(
            identify(&[0x00, 0x00, 0xA4, 0x20, 0x04, 0x02]),
            DeviceFamily::Unknown
        );
        assert_eq!(
            identify(&[0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC]),
            DeviceFamily::Unknown
        );
    }

    #[test]
    fn test_classic_idle_report() {
        // Sticks centred, triggers released, nothing pressed
        let data = [0x5F, 0xDF, 0x8F, 0x00, 0xFF, 0xFF];
        let fields = decode_classic(&data);

        assert_eq!(fields.left_x >> 2, 0x1F);
        assert_eq!(fields.left_y >> 2, 0x1F);
        assert_eq!(fields.right_x >> 3, 0x0F);
        assert_eq!(fields.right_y >> 3, 0x0F);
        assert_eq!(fields.trigger_l, 0);
        assert_eq!(fields.trigger_r, 0);
        assert!(!fields.a && !fields.b && !fields.home && !fields.dpad_up);
    }

    #[test]
    fn test_classic_buttons_active_low() {
        let mut data = [0x5F, 0xDF, 0x8F, 0x00, 0xFF, 0xFF];
        data[4] &= !(1 << 3); // HOME
        data[5] &= !(1 << 4); // A
        data[5] &= !(1 << 0); // D-Pad up

        let fields = decode_classic(&data);
        assert!(fields.home);
        assert!(fields.a);
        assert!(fields.dpad_up);
        assert!(!fields.b);
        assert!(!fields.dpad_down);
    }

    #[test]
    fn test_classic_full_scale_widening() {
        let fields = decode_classic(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(fields.left_x, 0xFF);
        assert_eq!(fields.right_x, 0xFF);
        assert_eq!(fields.trigger_l, 0xFF);
        assert_eq!(fields.trigger_r, 0xFF);

        let fields = decode_classic(&[0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF]);
        assert_eq!(fields.left_x, 0x00);
        assert_eq!(fields.right_y, 0x00);
    }

    #[test]
    fn test_classic_standard_encoding_matches_decoder() {
        let fields = ClassicFields {
            left_x: 0xA0,
            right_x: 0x38,
            trigger_l: 0x48,
            zr: true,
            minus: true,
            ..ClassicFields::default()
        };
        let decoded = decode_classic(&encode_classic(&fields));
        assert_eq!(decoded.left_x >> 2, fields.left_x >> 2);
        assert_eq!(decoded.right_x >> 3, fields.right_x >> 3);
        assert_eq!(decoded.trigger_l >> 3, fields.trigger_l >> 3);
        assert!(decoded.zr && decoded.minus && !decoded.zl);
    }

    #[test]
    fn test_classic_high_res_layout() {
        let data = [10, 20, 30, 40, 50, 60, 0xFD, 0x7F];
        let fields = decode_classic_high_res(&data);
        assert_eq!(fields.left_x, 10);
        assert_eq!(fields.right_x, 20);
        assert_eq!(fields.left_y, 30);
        assert_eq!(fields.right_y, 40);
        assert_eq!(fields.trigger_l, 50);
        assert_eq!(fields.trigger_r, 60);
        assert!(fields.r);
        assert!(fields.zl);
        assert!(!fields.l);
        assert_eq!(encode_classic_high_res(&fields), data);
    }

    #[test]
    fn test_nunchuk_report() {
        let data = [0x80, 0x7E, 0x80, 0x81, 0xB0, 0b1110_0110];
        let fields = decode_nunchuk(&data);
        assert_eq!(fields.joy_x, 0x80);
        assert_eq!(fields.joy_y, 0x7E);
        assert_eq!(fields.accel_x, (0x80 << 2) | 0b01);
        assert_eq!(fields.accel_y, (0x81 << 2) | 0b10);
        assert_eq!(fields.accel_z, (0xB0 << 2) | 0b11);
        assert!(fields.z);
        assert!(!fields.c);
        assert_eq!(encode_nunchuk(&fields), data);
    }

    #[test]
    fn test_guitar_report() {
        let fields = GuitarFields {
            joy_x: 12,
            whammy: 0x18,
            green: true,
            orange: true,
            strum_down: true,
            plus: true,
            ..GuitarFields::default()
        };
        let data = encode_guitar(&fields);
        assert_eq!(data[4] & (1 << 6), 0, "strum down is active low");
        assert_eq!(data[5] & (1 << 4), 0, "green is active low");
        assert_eq!(decode_guitar(&data), fields);
    }
}
