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

//! Status display
//!
//! The adapter may drive a small on-device display that shows which
//! controller sits in each port and highlights inputs as they are pressed.
//! The core only talks to it through [`StatusDisplay`]; [`NoDisplay`] is used
//! when nothing is attached and [`LogDisplay`] mirrors updates into the log.

use super::bus::DeviceFamily;
use super::frame::{Buttons, Dpad, Glyph};

/// Sink for identity and glyph updates
pub trait StatusDisplay {
    /// Show which controller is attached to `port`
    ///
    /// [`DeviceFamily::None`] means the port is empty. Implementations redraw
    /// the whole glyph set of the new family (see [`glyph_set`]) unlit.
    fn show_identity(&mut self, port: usize, family: DeviceFamily);

    /// Light or clear one glyph on `port`
    fn set_glyph(&mut self, port: usize, glyph: Glyph, lit: bool);
}

/// Display that ignores every update
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDisplay;

impl StatusDisplay for NoDisplay {
    fn show_identity(&mut self, _port: usize, _family: DeviceFamily) {}

    fn set_glyph(&mut self, _port: usize, _glyph: Glyph, _lit: bool) {}
}

/// Display that reports updates through the `log` facade
///
/// Useful for headless runs; identity changes are logged at info level,
/// glyph changes at debug level.
#[derive(Debug, Clone, Default)]
pub struct LogDisplay {
    identities: [DeviceFamily; 2],
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Family currently shown for `port`
    pub fn identity(&self, port: usize) -> DeviceFamily {
        self.identities.get(port).copied().unwrap_or_default()
    }
}

impl StatusDisplay for LogDisplay {
    fn show_identity(&mut self, port: usize, family: DeviceFamily) {
        if let Some(slot) = self.identities.get_mut(port) {
            *slot = family;
        }
        log::info!(
            "Display: port {} shows {} ({} glyphs)",
            port,
            family,
            glyph_set(family).len()
        );
    }

    fn set_glyph(&mut self, port: usize, glyph: Glyph, lit: bool) {
        let family = self.identity(port);
        log::debug!(
            "Display: port {} {} {}",
            port,
            glyph_label(family, glyph),
            if lit { "on" } else { "off" }
        );
    }
}

const CLASSIC_GLYPHS: [Glyph; 15] = [
    Glyph::Dpad(Dpad::UP),
    Glyph::Dpad(Dpad::DOWN),
    Glyph::Dpad(Dpad::LEFT),
    Glyph::Dpad(Dpad::RIGHT),
    Glyph::Button(Buttons::B1),
    Glyph::Button(Buttons::B2),
    Glyph::Button(Buttons::B3),
    Glyph::Button(Buttons::B4),
    Glyph::Button(Buttons::L1),
    Glyph::Button(Buttons::R1),
    Glyph::Button(Buttons::L2),
    Glyph::Button(Buttons::R2),
    Glyph::Button(Buttons::S1),
    Glyph::Button(Buttons::S2),
    Glyph::Button(Buttons::A1),
];

const NUNCHUK_GLYPHS: [Glyph; 2] = [Glyph::Button(Buttons::B1), Glyph::Button(Buttons::B2)];

const GUITAR_GLYPHS: [Glyph; 14] = [
    Glyph::Dpad(Dpad::UP),
    Glyph::Dpad(Dpad::DOWN),
    Glyph::Button(Buttons::B1),
    Glyph::Button(Buttons::B2),
    Glyph::Button(Buttons::B3),
    Glyph::Button(Buttons::B4),
    Glyph::Button(Buttons::L1),
    Glyph::Button(Buttons::S1),
    Glyph::Button(Buttons::S2),
    Glyph::Button(Buttons::AUX1),
    Glyph::Button(Buttons::AUX2),
    Glyph::Button(Buttons::AUX3),
    Glyph::Button(Buttons::AUX4),
    Glyph::Button(Buttons::AUX5),
];

/// Glyphs a family can light, in display order
///
/// Unsupported families and empty ports have no glyphs.
pub fn glyph_set(family: DeviceFamily) -> &'static [Glyph] {
    match family {
        DeviceFamily::Classic => &CLASSIC_GLYPHS,
        DeviceFamily::Nunchuk => &NUNCHUK_GLYPHS,
        DeviceFamily::Guitar => &GUITAR_GLYPHS,
        _ => &[],
    }
}

/// Label printed on the controller for a glyph
///
/// Classic shoulders keep their canonical names because their mapping depends
/// on the trigger mode.
pub fn glyph_label(family: DeviceFamily, glyph: Glyph) -> &'static str {
    match glyph {
        Glyph::Dpad(d) => match family {
            DeviceFamily::Guitar => native_label(&STRUM_LABELS, d),
            _ => native_label(&DPAD_LABELS, d),
        },
        Glyph::Button(b) => match family {
            DeviceFamily::Nunchuk => native_label(&NUNCHUK_LABELS, b),
            DeviceFamily::Guitar => native_label(&GUITAR_LABELS, b),
            _ => native_label(&CLASSIC_LABELS, b),
        },
    }
}

const DPAD_LABELS: [(Dpad, &str); 4] = [
    (Dpad::UP, "UP"),
    (Dpad::DOWN, "DOWN"),
    (Dpad::LEFT, "LEFT"),
    (Dpad::RIGHT, "RIGHT"),
];

const STRUM_LABELS: [(Dpad, &str); 2] = [(Dpad::UP, "STRUM UP"), (Dpad::DOWN, "STRUM DOWN")];

const CLASSIC_LABELS: [(Buttons, &str); 11] = [
    (Buttons::B1, "B"),
    (Buttons::B2, "A"),
    (Buttons::B3, "Y"),
    (Buttons::B4, "X"),
    (Buttons::L1, "L1"),
    (Buttons::R1, "R1"),
    (Buttons::L2, "L2"),
    (Buttons::R2, "R2"),
    (Buttons::S1, "-"),
    (Buttons::S2, "+"),
    (Buttons::A1, "HOME"),
];

const NUNCHUK_LABELS: [(Buttons, &str); 2] = [(Buttons::B1, "C"), (Buttons::B2, "Z")];

const GUITAR_LABELS: [(Buttons, &str); 12] = [
    (Buttons::B1, "GREEN"),
    (Buttons::B2, "RED"),
    (Buttons::B3, "BLUE"),
    (Buttons::B4, "YELLOW"),
    (Buttons::L1, "ORANGE"),
    (Buttons::S1, "-"),
    (Buttons::S2, "+"),
    (Buttons::AUX1, "TOUCH GREEN"),
    (Buttons::AUX2, "TOUCH RED"),
    (Buttons::AUX3, "TOUCH YELLOW"),
    (Buttons::AUX4, "TOUCH BLUE"),
    (Buttons::AUX5, "TOUCH ORANGE"),
];

fn native_label<M: PartialEq>(table: &[(M, &'static str)], bit: M) -> &'static str {
    table
        .iter()
        .find(|(entry, _)| *entry == bit)
        .map(|(_, label)| *label)
        .unwrap_or("?")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_sets() {
        assert_eq!(glyph_set(DeviceFamily::Nunchuk).len(), 2);
        assert_eq!(glyph_set(DeviceFamily::Classic).len(), 15);
        assert_eq!(glyph_set(DeviceFamily::Guitar).len(), 14);
        assert!(glyph_set(DeviceFamily::None).is_empty());
        assert!(glyph_set(DeviceFamily::Drum).is_empty());
    }

    #[test]
    fn test_every_glyph_has_a_label() {
        for family in [DeviceFamily::Classic, DeviceFamily::Nunchuk, DeviceFamily::Guitar] {
            for &glyph in glyph_set(family) {
                assert_ne!(glyph_label(family, glyph), "?", "{family} {glyph:?}");
            }
        }
    }

    #[test]
    fn test_native_labels() {
        assert_eq!(glyph_label(DeviceFamily::Nunchuk, Glyph::Button(Buttons::B2)), "Z");
        assert_eq!(glyph_label(DeviceFamily::Classic, Glyph::Button(Buttons::A1)), "HOME");
        assert_eq!(glyph_label(DeviceFamily::Guitar, Glyph::Dpad(Dpad::DOWN)), "STRUM DOWN");
        assert_eq!(glyph_label(DeviceFamily::Classic, Glyph::Dpad(Dpad::LEFT)), "LEFT");
    }

    #[test]
    fn test_log_display_tracks_identity() {
        let mut display = LogDisplay::new();
        display.show_identity(1, DeviceFamily::Guitar);
        assert_eq!(display.identity(1), DeviceFamily::Guitar);
        assert_eq!(display.identity(0), DeviceFamily::None);
        assert_eq!(display.identity(7), DeviceFamily::None);

        display.set_glyph(1, Glyph::Button(Buttons::B1), true);
        display.show_identity(1, DeviceFamily::None);
        assert_eq!(display.identity(1), DeviceFamily::None);
    }
}
