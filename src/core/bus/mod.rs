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

//! Extension bus capability
//!
//! This module defines the seam between the adapter core and whatever drives
//! the physical extension port. The core never touches bytes on the wire: it
//! asks the bus for liveness (`connect` / `update`), for the attached
//! [`DeviceFamily`], and for typed field snapshots of the last report.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   connect/update    ┌─────────────────────┐
//! │  Port        │ ──────────────────► │  ExtensionBus       │
//! │  session     │ ◄────────────────── │  (ExtensionPort<T>) │
//! └──────────────┘   typed fields      └──────────┬──────────┘
//!                                                 │ register I/O
//!                                      ┌──────────┴──────────┐
//!                                      │  Transport (2-wire) │
//!                                      └─────────────────────┘
//! ```
//!
//! [`ExtensionPort`] is the reference implementation over a byte-level
//! [`Transport`]; tests and the simulator plug a simulated register device
//! underneath it.

mod extension_port;
pub mod report;

pub use extension_port::{BusError, ExtensionPort, Transport, EXTENSION_ADDRESS};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resting value of an 8-bit extension stick axis
pub const RAW_STICK_CENTER: u8 = 127;

/// Resting value of the guitar's 6-bit stick axes
pub const GUITAR_STICK_CENTER: u8 = 32;

/// Touch-bar reading when nothing is touched
pub const TOUCHBAR_IDLE: u8 = 0x0F;

/// Whammy bar reading at rest
pub const WHAMMY_REST: u8 = 0x10;

/// Category of the attached extension controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceFamily {
    /// Nothing answered on the port
    #[default]
    None,
    /// Classic Controller / Classic Controller Pro (dual stick)
    Classic,
    /// Nunchuk (single stick, motion sensing)
    Nunchuk,
    /// Guitar Hero guitar (music)
    Guitar,
    /// Guitar Hero drum kit (music)
    Drum,
    /// DJ Hero turntable (music)
    Turntable,
    /// THQ uDraw tablet
    UDraw,
    /// Drawsome tablet
    Drawsome,
    /// A device answered but its identity is unknown
    Unknown,
}

impl DeviceFamily {
    /// Label shown on the status display
    pub fn label(&self) -> &'static str {
        match self {
            DeviceFamily::None => "NONE",
            DeviceFamily::Classic => "CLASSIC",
            DeviceFamily::Nunchuk => "NUNCHUK",
            DeviceFamily::Guitar => "GUITAR",
            DeviceFamily::Drum => "DRUM",
            DeviceFamily::Turntable => "TURNTABLE",
            DeviceFamily::UDraw => "UDRAW",
            DeviceFamily::Drawsome => "DRAWSOME",
            DeviceFamily::Unknown => "NOT SUPPORTED",
        }
    }
}

impl fmt::Display for DeviceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classic Controller field snapshot
///
/// Buttons are active high here; the wire encoding is active low and is
/// translated by [`report`]. Analog values are 8-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassicFields {
    pub dpad_up: bool,
    pub dpad_down: bool,
    pub dpad_left: bool,
    pub dpad_right: bool,
    pub a: bool,
    pub b: bool,
    pub x: bool,
    pub y: bool,
    /// Left trigger click (end of analog travel)
    pub l: bool,
    /// Right trigger click (end of analog travel)
    pub r: bool,
    pub zl: bool,
    pub zr: bool,
    pub minus: bool,
    pub plus: bool,
    pub home: bool,
    pub left_x: u8,
    pub left_y: u8,
    pub right_x: u8,
    pub right_y: u8,
    /// Left analog trigger (0 on controllers with digital triggers)
    pub trigger_l: u8,
    /// Right analog trigger (0 on controllers with digital triggers)
    pub trigger_r: u8,
}

impl Default for ClassicFields {
    fn default() -> Self {
        Self {
            dpad_up: false,
            dpad_down: false,
            dpad_left: false,
            dpad_right: false,
            a: false,
            b: false,
            x: false,
            y: false,
            l: false,
            r: false,
            zl: false,
            zr: false,
            minus: false,
            plus: false,
            home: false,
            left_x: RAW_STICK_CENTER,
            left_y: RAW_STICK_CENTER,
            right_x: RAW_STICK_CENTER,
            right_y: RAW_STICK_CENTER,
            trigger_l: 0,
            trigger_r: 0,
        }
    }
}

/// Nunchuk field snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NunchukFields {
    pub joy_x: u8,
    pub joy_y: u8,
    /// 10-bit accelerometer readings
    pub accel_x: u16,
    pub accel_y: u16,
    pub accel_z: u16,
    pub c: bool,
    pub z: bool,
}

impl Default for NunchukFields {
    fn default() -> Self {
        Self {
            joy_x: RAW_STICK_CENTER,
            joy_y: RAW_STICK_CENTER,
            accel_x: 512,
            accel_y: 512,
            accel_z: 512,
            c: false,
            z: false,
        }
    }
}

/// Guitar field snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuitarFields {
    /// 6-bit stick X (0..=63)
    pub joy_x: u8,
    /// 6-bit stick Y (0..=63)
    pub joy_y: u8,
    /// 5-bit touch bar position
    pub touchbar: u8,
    /// 5-bit whammy bar position
    pub whammy: u8,
    pub strum_up: bool,
    pub strum_down: bool,
    pub green: bool,
    pub red: bool,
    pub yellow: bool,
    pub blue: bool,
    pub orange: bool,
    pub minus: bool,
    pub plus: bool,
}

impl Default for GuitarFields {
    fn default() -> Self {
        Self {
            joy_x: GUITAR_STICK_CENTER,
            joy_y: GUITAR_STICK_CENTER,
            touchbar: TOUCHBAR_IDLE,
            whammy: WHAMMY_REST,
            strum_up: false,
            strum_down: false,
            green: false,
            red: false,
            yellow: false,
            blue: false,
            orange: false,
            minus: false,
            plus: false,
        }
    }
}

// Touch-bar positions sit between frets; boundary values light two frets.
impl GuitarFields {
    pub fn touch_green(&self) -> bool {
        matches!(self.touchbar, 0x04..=0x07)
    }

    pub fn touch_red(&self) -> bool {
        matches!(self.touchbar, 0x07..=0x0D) && self.touchbar != TOUCHBAR_IDLE
    }

    pub fn touch_yellow(&self) -> bool {
        matches!(self.touchbar, 0x0C..=0x15) && self.touchbar != TOUCHBAR_IDLE
    }

    pub fn touch_blue(&self) -> bool {
        matches!(self.touchbar, 0x14..=0x1A)
    }

    pub fn touch_orange(&self) -> bool {
        matches!(self.touchbar, 0x1A..=0x1F)
    }
}

/// Liveness and field access for one extension port
///
/// Implementations own the transport for a single physical port. Field
/// accessors return the values captured by the most recent successful
/// `connect` or `update`; calling an accessor for a family other than the
/// attached one returns a neutral snapshot.
pub trait ExtensionBus {
    /// Bring up the underlying transport (called once at start-up)
    fn initialize(&mut self);

    /// Try to handshake with a device on the port
    ///
    /// Returns `true` when any device (supported or not) answered.
    fn connect(&mut self) -> bool;

    /// Fetch a fresh report from the connected device
    ///
    /// Returns `false` when the device stopped answering.
    fn update(&mut self) -> bool;

    /// Family identified during the last `connect`
    fn device_family(&self) -> DeviceFamily;

    /// Last report decoded as a Classic Controller
    fn classic(&self) -> ClassicFields;

    /// Last report decoded as a Nunchuk
    fn nunchuk(&self) -> NunchukFields;

    /// Last report decoded as a guitar
    fn guitar(&self) -> GuitarFields;
}
