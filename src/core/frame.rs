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

//! Canonical gamepad frame and change detection
//!
//! Every supported extension controller is reduced to the same fixed-shape
//! report: a 4-bit directional pad, a 16-bit button mask, four stick bytes and
//! two trigger bytes.
//!
//! # Button Layout
//!
//! The bit order is a stable contract with the host report layer:
//!
//! ```text
//! Bit  | Name        | Meaning
//! -----|-------------|--------------------------------------
//! 0    | B1          | Primary action
//! 1    | B2          | Secondary action
//! 2    | B3          | Tertiary action
//! 3    | B4          | Quaternary action
//! 4    | L1          | Left shoulder (outer)
//! 5    | R1          | Right shoulder (outer)
//! 6    | L2          | Left shoulder (inner / trigger pulled)
//! 7    | R2          | Right shoulder (inner / trigger pulled)
//! 8    | S1          | Select equivalent
//! 9    | S2          | Start equivalent
//! 10   | A1          | System / home
//! 11-15| AUX1..AUX5  | Auxiliary (touch-bar frets on music devices)
//! ```
//!
//! Directional pad bit order: up, down, left, right.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Centre value of a canonical stick axis
pub const AXIS_CENTER: u8 = 0x80;

/// Released value of a canonical trigger
pub const TRIGGER_RELEASED: u8 = 0x00;

/// Fully pulled value of a canonical trigger
pub const TRIGGER_PULLED: u8 = 0xFF;

bitflags! {
    /// Canonical button mask (active high)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Buttons: u16 {
        /// Primary action (bit 0)
        const B1 = 1 << 0;
        /// Secondary action (bit 1)
        const B2 = 1 << 1;
        /// Tertiary action (bit 2)
        const B3 = 1 << 2;
        /// Quaternary action (bit 3)
        const B4 = 1 << 3;
        /// Left outer shoulder (bit 4)
        const L1 = 1 << 4;
        /// Right outer shoulder (bit 5)
        const R1 = 1 << 5;
        /// Left inner shoulder (bit 6)
        const L2 = 1 << 6;
        /// Right inner shoulder (bit 7)
        const R2 = 1 << 7;
        /// Select equivalent (bit 8)
        const S1 = 1 << 8;
        /// Start equivalent (bit 9)
        const S2 = 1 << 9;
        /// System / home (bit 10)
        const A1 = 1 << 10;
        /// Auxiliary 1 (bit 11)
        const AUX1 = 1 << 11;
        /// Auxiliary 2 (bit 12)
        const AUX2 = 1 << 12;
        /// Auxiliary 3 (bit 13)
        const AUX3 = 1 << 13;
        /// Auxiliary 4 (bit 14)
        const AUX4 = 1 << 14;
        /// Auxiliary 5 (bit 15)
        const AUX5 = 1 << 15;
    }
}

bitflags! {
    /// Canonical directional pad mask (active high)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Dpad: u8 {
        /// Up (bit 0)
        const UP = 1 << 0;
        /// Down (bit 1)
        const DOWN = 1 << 1;
        /// Left (bit 2)
        const LEFT = 1 << 2;
        /// Right (bit 3)
        const RIGHT = 1 << 3;
    }
}

/// Single highlightable input on the status display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Glyph {
    /// One canonical button bit
    Button(Buttons),
    /// One directional pad bit
    Dpad(Dpad),
}

/// Fixed-shape gamepad report produced for every port
///
/// # Examples
///
/// ```
/// use wii_adapter::core::frame::{CanonicalFrame, AXIS_CENTER};
///
/// let frame = CanonicalFrame::neutral();
/// assert!(frame.buttons.is_empty());
/// assert_eq!(frame.left_x, AXIS_CENTER);
/// assert_eq!(frame.left_trigger, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalFrame {
    /// Directional pad
    pub dpad: Dpad,
    /// Button mask
    pub buttons: Buttons,
    /// Left stick X (0 = left)
    pub left_x: u8,
    /// Left stick Y (255 = up)
    pub left_y: u8,
    /// Right stick X (0 = left)
    pub right_x: u8,
    /// Right stick Y (255 = up)
    pub right_y: u8,
    /// Left trigger (0 = released)
    pub left_trigger: u8,
    /// Right trigger (0 = released)
    pub right_trigger: u8,
}

impl CanonicalFrame {
    /// Frame reported while no usable controller is attached
    ///
    /// Buttons and dpad clear, sticks centred, triggers released.
    pub const fn neutral() -> Self {
        Self {
            dpad: Dpad::empty(),
            buttons: Buttons::empty(),
            left_x: AXIS_CENTER,
            left_y: AXIS_CENTER,
            right_x: AXIS_CENTER,
            right_y: AXIS_CENTER,
            left_trigger: TRIGGER_RELEASED,
            right_trigger: TRIGGER_RELEASED,
        }
    }

    /// Check whether a display glyph is lit in this frame
    pub fn is_lit(&self, glyph: Glyph) -> bool {
        match glyph {
            Glyph::Button(button) => self.buttons.contains(button),
            Glyph::Dpad(direction) => self.dpad.contains(direction),
        }
    }
}

impl Default for CanonicalFrame {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Outcome of comparing two frames
///
/// The two halves are tracked separately: analog-only movement is worth
/// latching but is not reported to the caller as a state change, so stick
/// jitter alone never forces host report traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameDiff {
    /// Buttons or dpad differ
    pub buttons_changed: bool,
    /// Any stick or trigger byte differs
    pub analog_changed: bool,
}

impl FrameDiff {
    /// True when the new frame must replace the stored one
    #[inline]
    pub fn any(&self) -> bool {
        self.buttons_changed || self.analog_changed
    }
}

/// Compare a freshly normalized frame against the last emitted one
///
/// # Examples
///
/// ```
/// use wii_adapter::core::frame::{diff, Buttons, CanonicalFrame};
///
/// let previous = CanonicalFrame::neutral();
/// let mut current = previous;
/// current.left_x = 0x90;
///
/// let d = diff(&previous, &current);
/// assert!(d.analog_changed);
/// assert!(!d.buttons_changed);
///
/// current.buttons |= Buttons::B1;
/// assert!(diff(&previous, &current).buttons_changed);
/// ```
pub fn diff(previous: &CanonicalFrame, current: &CanonicalFrame) -> FrameDiff {
    FrameDiff {
        buttons_changed: previous.buttons != current.buttons || previous.dpad != current.dpad,
        analog_changed: previous.left_x != current.left_x
            || previous.left_y != current.left_y
            || previous.right_x != current.right_x
            || previous.right_y != current.right_y
            || previous.left_trigger != current.left_trigger
            || previous.right_trigger != current.right_trigger,
    }
}

/// Iterate over every glyph whose lit state differs between two frames
pub fn changed_glyphs<'a>(
    previous: &'a CanonicalFrame,
    current: &'a CanonicalFrame,
) -> impl Iterator<Item = (Glyph, bool)> + 'a {
    let buttons = (previous.buttons ^ current.buttons)
        .iter()
        .map(move |b| (Glyph::Button(b), current.buttons.contains(b)));
    let dpad = (previous.dpad ^ current.dpad)
        .iter()
        .map(move |d| (Glyph::Dpad(d), current.dpad.contains(d)));
    buttons.chain(dpad)
}
