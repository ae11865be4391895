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

//! Controller decoder
//!
//! Maps a live port's typed fields into a [`RawReport`]: the canonical button
//! and dpad masks plus un-normalized analog readings. The shape is the same
//! for every family; inputs a family does not have stay neutral.
//!
//! # Shoulder Mapping
//!
//! The Classic Controller Pro has digital L/R triggers next to ZL/ZR, while
//! the original Classic Controller has analog L/R triggers whose end-of-travel
//! click sits below ZL/ZR. The mapping of the four shoulder inputs therefore
//! depends on the trigger mode resolved at connection time:
//!
//! ```text
//! Input | Analog triggers | Digital triggers
//! ------|-----------------|-----------------
//! ZL    | L1              | L2
//! ZR    | R1              | R2
//! L     | L2              | L1
//! R     | R2              | R1
//! ```

use super::bus::{ClassicFields, DeviceFamily, ExtensionBus, GuitarFields, NunchukFields};
use super::error::{AdapterError, Result};
use super::frame::{Buttons, Dpad};
use super::normalizer::rescale;

/// Trigger byte reported by controllers without analog triggers
pub const DIGITAL_TRIGGER_SENTINEL: u8 = 0;

/// Guitar stick native range
const GUITAR_STICK_MAX: u8 = 63;

/// Whammy bar travel
const WHAMMY_MIN: u8 = 15;
const WHAMMY_MAX: u8 = 25;

/// Touch-bar byte of guitars built without a touch bar
const NO_TOUCHBAR: u8 = 0;

/// Per-connection device capabilities, resolved from live samples
///
/// Reset to the default on every connection event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Classic triggers report graduated values and the host allows them
    pub analog_triggers: bool,
    /// Guitar has reported touch-bar data since connecting
    pub touchbar: bool,
}

/// One analog axis as read from the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisReading {
    /// The family has no such axis
    Absent,
    /// Stick byte centred near the native midpoint; subject to calibration
    Stick(u8),
    /// Already in output range (e.g. whammy bar); forwarded as is
    Direct(u8),
}

/// One analog trigger as read from the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReading {
    /// The family has no such trigger
    Absent,
    /// Raw trigger byte plus the state of its end-of-travel click
    Analog { raw: u8, click: bool },
}

/// Index of each axis in [`RawReport::axes`]
pub mod axis {
    pub const LEFT_X: usize = 0;
    pub const LEFT_Y: usize = 1;
    pub const RIGHT_X: usize = 2;
    pub const RIGHT_Y: usize = 3;

    /// Vertical axes are inverted on output
    pub const VERTICAL: [bool; 4] = [false, true, false, true];
}

/// Intermediate record between decoding and normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawReport {
    pub dpad: Dpad,
    pub buttons: Buttons,
    /// Left X, left Y, right X, right Y
    pub axes: [AxisReading; 4],
    /// Left, right
    pub triggers: [TriggerReading; 2],
}

impl RawReport {
    /// Report with every input at rest
    pub const fn neutral() -> Self {
        Self {
            dpad: Dpad::empty(),
            buttons: Buttons::empty(),
            axes: [AxisReading::Absent; 4],
            triggers: [TriggerReading::Absent; 2],
        }
    }
}

impl Default for RawReport {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Button accessor used by the mapping tables
type Input<F> = fn(&F) -> bool;

/// Classic face, system and menu buttons
const CLASSIC_BUTTONS: [(Input<ClassicFields>, Buttons); 7] = [
    (|c| c.b, Buttons::B1),
    (|c| c.a, Buttons::B2),
    (|c| c.y, Buttons::B3),
    (|c| c.x, Buttons::B4),
    (|c| c.minus, Buttons::S1),
    (|c| c.plus, Buttons::S2),
    (|c| c.home, Buttons::A1),
];

/// Classic shoulders when the triggers are analog
const CLASSIC_SHOULDERS_ANALOG: [(Input<ClassicFields>, Buttons); 4] = [
    (|c| c.zl, Buttons::L1),
    (|c| c.zr, Buttons::R1),
    (|c| c.l, Buttons::L2),
    (|c| c.r, Buttons::R2),
];

/// Classic shoulders when the triggers are digital
const CLASSIC_SHOULDERS_DIGITAL: [(Input<ClassicFields>, Buttons); 4] = [
    (|c| c.l, Buttons::L1),
    (|c| c.r, Buttons::R1),
    (|c| c.zl, Buttons::L2),
    (|c| c.zr, Buttons::R2),
];

const CLASSIC_DPAD: [(Input<ClassicFields>, Dpad); 4] = [
    (|c| c.dpad_up, Dpad::UP),
    (|c| c.dpad_down, Dpad::DOWN),
    (|c| c.dpad_left, Dpad::LEFT),
    (|c| c.dpad_right, Dpad::RIGHT),
];

const NUNCHUK_BUTTONS: [(Input<NunchukFields>, Buttons); 2] =
    [(|n| n.c, Buttons::B1), (|n| n.z, Buttons::B2)];

const GUITAR_BUTTONS: [(Input<GuitarFields>, Buttons); 7] = [
    (|g| g.green, Buttons::B1),
    (|g| g.red, Buttons::B2),
    (|g| g.blue, Buttons::B3),
    (|g| g.yellow, Buttons::B4),
    (|g| g.orange, Buttons::L1),
    (|g| g.minus, Buttons::S1),
    (|g| g.plus, Buttons::S2),
];

/// Touch-bar frets on the auxiliary bits
const GUITAR_TOUCHBAR: [(Input<GuitarFields>, Buttons); 5] = [
    (GuitarFields::touch_green, Buttons::AUX1),
    (GuitarFields::touch_red, Buttons::AUX2),
    (GuitarFields::touch_yellow, Buttons::AUX3),
    (GuitarFields::touch_blue, Buttons::AUX4),
    (GuitarFields::touch_orange, Buttons::AUX5),
];

const GUITAR_DPAD: [(Input<GuitarFields>, Dpad); 2] =
    [(|g| g.strum_up, Dpad::UP), (|g| g.strum_down, Dpad::DOWN)];

/// Collect every asserted input of a mapping table into one mask
fn collect<F, M>(fields: &F, table: &[(Input<F>, M)]) -> M
where
    M: bitflags::Flags + Copy,
{
    table
        .iter()
        .filter(|(pressed, _)| pressed(fields))
        .fold(M::empty(), |mask, (_, bit)| mask.union(*bit))
}

/// Check whether the attached device reports graduated triggers
///
/// Only the Classic family has analog triggers; a controller with digital
/// triggers reports [`DIGITAL_TRIGGER_SENTINEL`] on at least one of them.
pub fn senses_analog_triggers<B: ExtensionBus>(bus: &B, family: DeviceFamily) -> bool {
    if family != DeviceFamily::Classic {
        return false;
    }
    let classic = bus.classic();
    classic.trigger_l != DIGITAL_TRIGGER_SENTINEL && classic.trigger_r != DIGITAL_TRIGGER_SENTINEL
}

/// Decode a Classic Controller
pub fn decode_classic(fields: &ClassicFields, analog_triggers: bool) -> RawReport {
    let shoulders = if analog_triggers {
        &CLASSIC_SHOULDERS_ANALOG
    } else {
        &CLASSIC_SHOULDERS_DIGITAL
    };

    RawReport {
        dpad: collect(fields, &CLASSIC_DPAD),
        buttons: collect(fields, &CLASSIC_BUTTONS) | collect(fields, shoulders),
        axes: [
            AxisReading::Stick(fields.left_x),
            AxisReading::Stick(fields.left_y),
            AxisReading::Stick(fields.right_x),
            AxisReading::Stick(fields.right_y),
        ],
        triggers: [
            TriggerReading::Analog {
                raw: fields.trigger_l,
                click: fields.l,
            },
            TriggerReading::Analog {
                raw: fields.trigger_r,
                click: fields.r,
            },
        ],
    }
}

/// Decode a Nunchuk
pub fn decode_nunchuk(fields: &NunchukFields) -> RawReport {
    RawReport {
        buttons: collect(fields, &NUNCHUK_BUTTONS),
        axes: [
            AxisReading::Stick(fields.joy_x),
            AxisReading::Stick(fields.joy_y),
            AxisReading::Absent,
            AxisReading::Absent,
        ],
        ..RawReport::neutral()
    }
}

/// Decode a guitar
///
/// The 6-bit stick is widened onto the 8-bit stick scale; the whammy bar is
/// spread over the full right X range. Touch-bar frets are only mapped when
/// `touchbar` is set.
pub fn decode_guitar(fields: &GuitarFields, touchbar: bool) -> RawReport {
    let stick = |v: u8| rescale(v, 0, GUITAR_STICK_MAX, 0, u8::MAX);

    let mut buttons = collect(fields, &GUITAR_BUTTONS);
    if touchbar {
        buttons |= collect(fields, &GUITAR_TOUCHBAR);
    }

    RawReport {
        dpad: collect(fields, &GUITAR_DPAD),
        buttons,
        axes: [
            AxisReading::Stick(stick(fields.joy_x)),
            AxisReading::Stick(stick(fields.joy_y)),
            AxisReading::Direct(rescale(fields.whammy, WHAMMY_MIN, WHAMMY_MAX, 0, u8::MAX)),
            AxisReading::Absent,
        ],
        triggers: [TriggerReading::Absent; 2],
    }
}

/// Decode the current report of a live port
///
/// # Arguments
///
/// * `port` - Port index, used for error reporting
/// * `bus` - Live bus for the port
/// * `family` - Family identified at connection time
/// * `caps` - Capabilities of the port; touch-bar support is latched here
/// * `music_devices` - Whether music-style families are mapped
///
/// # Errors
///
/// Returns [`AdapterError::UnsupportedDevice`] when the family has no
/// mapping table.
pub fn decode<B: ExtensionBus>(
    port: usize,
    bus: &B,
    family: DeviceFamily,
    caps: &mut Capabilities,
    music_devices: bool,
) -> Result<RawReport> {
    match family {
        DeviceFamily::Classic => Ok(decode_classic(&bus.classic(), caps.analog_triggers)),
        DeviceFamily::Nunchuk => Ok(decode_nunchuk(&bus.nunchuk())),
        DeviceFamily::Guitar if music_devices => {
            let fields = bus.guitar();
            if !caps.touchbar && fields.touchbar != NO_TOUCHBAR {
                log::debug!("Port {}: guitar touch bar detected", port);
                caps.touchbar = true;
            }
            Ok(decode_guitar(&fields, caps.touchbar))
        }
        _ => Err(AdapterError::UnsupportedDevice { port, family }),
    }
}
