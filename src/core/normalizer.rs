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

//! Analog normalizer
//!
//! Turns the un-normalized readings of a [`RawReport`] into the analog half of
//! a [`CanonicalFrame`].
//!
//! # Stick Pipeline (calibrated mode)
//!
//! ```text
//! raw ──► raw - shift ──► clamp [min_valid, max_valid] ──► rescale [0, 255] ──► !v (vertical)
//! ```
//!
//! `shift` is the per-axis drift captured by [`Calibration::capture`] from the
//! first sample after a connection. Sticks rarely rest exactly on the nominal
//! centre, and most never reach the extremes of the byte range, so the valid
//! sub-range is stretched to full scale.
//!
//! In [`AnalogMode::RawPassthrough`] every raw byte is forwarded untouched.

use super::config::AnalogMode;
use super::decoder::{axis, AxisReading, RawReport, TriggerReading};
use super::frame::{CanonicalFrame, AXIS_CENTER, TRIGGER_PULLED, TRIGGER_RELEASED};

/// Analog characteristics of a family of sticks and triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalogProfile {
    /// Nominal resting value of a stick axis
    pub center: u8,
    /// Lowest reading treated as valid travel
    pub min_valid: u8,
    /// Highest reading treated as valid travel
    pub max_valid: u8,
    /// Trigger readings below this are treated as released
    pub trigger_floor: u8,
}

/// Profile shared by every supported extension controller
pub const WII_STICK: AnalogProfile = AnalogProfile {
    center: 127,
    min_valid: 25,
    max_valid: 230,
    trigger_floor: 14,
};

impl Default for AnalogProfile {
    fn default() -> Self {
        WII_STICK
    }
}

/// Per-axis drift captured once per connection
///
/// Each shift is the distance `|raw - center|` of the resting reading from
/// the nominal centre, indexed like [`RawReport::axes`]. Axes that are absent
/// or not sticks get a zero shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Calibration {
    pub shifts: [u8; 4],
}

impl Calibration {
    /// Record the drift of every stick axis in `report`
    ///
    /// # Examples
    ///
    /// ```
    /// use wii_adapter::core::decoder::{AxisReading, RawReport};
    /// use wii_adapter::core::normalizer::{Calibration, WII_STICK};
    ///
    /// let mut report = RawReport::neutral();
    /// report.axes[0] = AxisReading::Stick(137);
    /// report.axes[1] = AxisReading::Stick(120);
    ///
    /// let calibration = Calibration::capture(&report, &WII_STICK);
    /// assert_eq!(calibration.shifts, [10, 7, 0, 0]);
    /// ```
    pub fn capture(report: &RawReport, profile: &AnalogProfile) -> Self {
        let mut shifts = [0u8; 4];
        for (shift, reading) in shifts.iter_mut().zip(report.axes.iter()) {
            if let AxisReading::Stick(raw) = *reading {
                *shift = raw.abs_diff(profile.center);
            }
        }
        Self { shifts }
    }
}

/// Linearly map `value` from `[in_min, in_max]` onto `[out_min, out_max]`
///
/// The input is clamped first, so the result always lies in the output range.
/// Integer arithmetic truncates toward zero, like the classic `map()` helper
/// found on microcontroller toolchains.
///
/// # Examples
///
/// ```
/// use wii_adapter::core::normalizer::rescale;
///
/// assert_eq!(rescale(25, 25, 230, 0, 255), 0);
/// assert_eq!(rescale(230, 25, 230, 0, 255), 255);
/// assert_eq!(rescale(240, 25, 230, 0, 255), 255);
/// assert_eq!(rescale(20, 15, 25, 0, 255), 127);
/// ```
pub fn rescale(value: u8, in_min: u8, in_max: u8, out_min: u8, out_max: u8) -> u8 {
    if in_max <= in_min {
        return out_min;
    }

    let value = i32::from(value.clamp(in_min, in_max));
    let (in_min, in_max) = (i32::from(in_min), i32::from(in_max));
    let (out_min, out_max) = (i32::from(out_min), i32::from(out_max));

    let mapped = (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min;
    // Bounded by the output range, which is itself u8
    mapped.clamp(0, i32::from(u8::MAX)) as u8
}

/// Calibrate one stick axis
///
/// The shift is always subtracted, whichever side of centre the stick rested
/// on; the result saturates at zero before the clamp.
///
/// # Arguments
///
/// * `raw` - Raw stick byte
/// * `shift` - Drift captured at connection time
/// * `profile` - Valid travel of the stick
/// * `vertical` - Invert after rescaling so that higher means up
pub fn normalize_stick(raw: u8, shift: u8, profile: &AnalogProfile, vertical: bool) -> u8 {
    let adjusted = raw
        .saturating_sub(shift)
        .clamp(profile.min_valid, profile.max_valid);
    let scaled = rescale(adjusted, profile.min_valid, profile.max_valid, 0, u8::MAX);

    if vertical {
        !scaled
    } else {
        scaled
    }
}

/// Shape an analog trigger on a trigger-capable controller
///
/// Small readings are dead zone; the end-of-travel click wins over the
/// analog value.
pub fn shape_trigger(raw: u8, click: bool, profile: &AnalogProfile) -> u8 {
    if click {
        TRIGGER_PULLED
    } else if raw < profile.trigger_floor {
        TRIGGER_RELEASED
    } else {
        raw
    }
}

/// Normalize the analog half of a report into a canonical frame
///
/// Buttons and dpad are copied through unchanged.
///
/// # Arguments
///
/// * `report` - Decoded report
/// * `calibration` - Drift captured for the current connection
/// * `mode` - Calibrated or raw passthrough
/// * `analog_triggers` - Whether the controller's triggers are shaped as analog
/// * `profile` - Stick and trigger characteristics
pub fn normalize(
    report: &RawReport,
    calibration: &Calibration,
    mode: AnalogMode,
    analog_triggers: bool,
    profile: &AnalogProfile,
) -> CanonicalFrame {
    let mut axes = [AXIS_CENTER; 4];
    for (index, out) in axes.iter_mut().enumerate() {
        *out = match (report.axes[index], mode) {
            (AxisReading::Absent, _) => AXIS_CENTER,
            (AxisReading::Direct(value), _) => value,
            (AxisReading::Stick(raw), AnalogMode::RawPassthrough) => raw,
            (AxisReading::Stick(raw), AnalogMode::Calibrated) => normalize_stick(
                raw,
                calibration.shifts[index],
                profile,
                axis::VERTICAL[index],
            ),
        };
    }

    // Only analog-trigger-capable controllers are shaped; others forward the byte
    let trigger = |reading: TriggerReading| match (reading, mode) {
        (TriggerReading::Absent, _) => TRIGGER_RELEASED,
        (TriggerReading::Analog { raw, click }, AnalogMode::Calibrated) if analog_triggers => {
            shape_trigger(raw, click, profile)
        }
        (TriggerReading::Analog { raw, .. }, _) => raw,
    };

    CanonicalFrame {
        dpad: report.dpad,
        buttons: report.buttons,
        left_x: axes[axis::LEFT_X],
        left_y: axes[axis::LEFT_Y],
        right_x: axes[axis::RIGHT_X],
        right_y: axes[axis::RIGHT_Y],
        left_trigger: trigger(report.triggers[0]),
        right_trigger: trigger(report.triggers[1]),
    }
}
