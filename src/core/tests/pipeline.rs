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

//! Decode, normalize and change detection through the full poll cycle

use super::{rig, sim};
use crate::core::bus::{ClassicFields, GuitarFields, NunchukFields, RAW_STICK_CENTER};
use crate::core::config::{AdapterConfig, Settings};
use crate::core::frame::{Buttons, CanonicalFrame, Dpad, AXIS_CENTER, TRIGGER_PULLED};
use crate::core::normalizer::{normalize_stick, WII_STICK};
use crate::sim::{SimDevice, SimulatedExtension};
use proptest::prelude::*;

fn music_settings() -> Settings {
    AdapterConfig {
        extended_music_device_support: true,
        ..AdapterConfig::default()
    }
    .resolve()
}

#[test]
fn test_nunchuk_at_rest() {
    let mut adapter = rig(SimulatedExtension::nunchuk(), SimulatedExtension::empty(), Settings::default());
    sim(&mut adapter, 0).set_nunchuk(NunchukFields {
        joy_x: 128,
        joy_y: 128,
        c: false,
        z: false,
        ..NunchukFields::default()
    });
    adapter.poll();
    adapter.poll();

    let frame = adapter.frame(0).unwrap();
    let centre = normalize_stick(RAW_STICK_CENTER, 0, &WII_STICK, false);
    assert!(frame.buttons.is_empty());
    assert!(frame.dpad.is_empty());
    assert_eq!(frame.left_x, centre);
    assert_eq!(frame.left_y, !centre);
    assert_eq!(frame.right_x, AXIS_CENTER);
    assert_eq!(frame.right_y, AXIS_CENTER);
    assert_eq!((frame.left_trigger, frame.right_trigger), (0, 0));
}

#[test]
fn test_nunchuk_buttons() {
    let mut adapter = rig(SimulatedExtension::nunchuk(), SimulatedExtension::empty(), Settings::default());
    adapter.poll();
    sim(&mut adapter, 0).set_nunchuk(NunchukFields {
        c: true,
        z: true,
        ..NunchukFields::default()
    });
    adapter.poll();
    assert_eq!(adapter.frame(0).unwrap().buttons, Buttons::B1 | Buttons::B2);
}

#[test]
fn test_drift_compensation_end_to_end() {
    let center = RAW_STICK_CENTER;
    let mut adapter = rig(SimulatedExtension::classic(), SimulatedExtension::empty(), Settings::default());
    sim(&mut adapter, 0).set_classic(ClassicFields {
        left_x: center + 10,
        ..ClassicFields::default()
    });
    adapter.poll();
    adapter.poll();
    assert_eq!(adapter.port(0).unwrap().calibration().shifts[0], 10);

    sim(&mut adapter, 0).set_classic(ClassicFields {
        left_x: center + 15,
        ..ClassicFields::default()
    });
    adapter.poll();
    assert_eq!(
        adapter.frame(0).unwrap().left_x,
        normalize_stick(center + 5, 0, &WII_STICK, false)
    );
}

#[test]
fn test_identical_samples_do_not_change_state() {
    let mut adapter = rig(SimulatedExtension::classic(), SimulatedExtension::empty(), Settings::default());
    adapter.poll();
    sim(&mut adapter, 0).set_classic(ClassicFields {
        b: true,
        left_x: 180,
        trigger_l: 90,
        trigger_r: 40,
        ..ClassicFields::default()
    });

    let first = adapter.poll();
    assert!(first.any_state_changed);
    let frame = *adapter.frame(0).unwrap();
    adapter.display_mut().clear();

    let second = adapter.poll();
    assert!(!second.any_state_changed);
    assert!(!second.ports[0].diff.any());
    assert_eq!(*adapter.frame(0).unwrap(), frame);
    assert!(adapter.display().glyphs.is_empty());
}

#[test]
fn test_analog_only_change_is_latched_silently() {
    let mut adapter = rig(SimulatedExtension::classic(), SimulatedExtension::empty(), Settings::default());
    adapter.poll();
    adapter.poll();

    sim(&mut adapter, 0).set_classic(ClassicFields {
        right_x: 220,
        ..ClassicFields::default()
    });
    let summary = adapter.poll();
    assert!(!summary.any_state_changed);
    assert!(summary.ports[0].diff.analog_changed);
    assert_eq!(
        adapter.frame(0).unwrap().right_x,
        normalize_stick(220, 0, &WII_STICK, false)
    );
}

#[test]
fn test_analog_trigger_shaping() {
    // Original Classic Controller: triggers rest slightly above zero
    let mut adapter = rig(SimulatedExtension::classic(), SimulatedExtension::empty(), Settings::default());
    adapter.poll();
    adapter.poll();
    assert!(adapter.port(0).unwrap().analog_triggers());

    sim(&mut adapter, 0).set_classic(ClassicFields {
        trigger_l: 10,
        trigger_r: 180,
        r: true,
        ..ClassicFields::default()
    });
    adapter.poll();

    let frame = adapter.frame(0).unwrap();
    assert_eq!(frame.left_trigger, 0);
    assert_eq!(frame.right_trigger, TRIGGER_PULLED);
    assert_eq!(frame.buttons, Buttons::R2);

    sim(&mut adapter, 0).set_classic(ClassicFields {
        trigger_l: 77,
        trigger_r: 4,
        ..ClassicFields::default()
    });
    adapter.poll();
    let frame = adapter.frame(0).unwrap();
    assert_eq!((frame.left_trigger, frame.right_trigger), (77, 0));
}

#[test]
fn test_shoulder_priority_by_trigger_mode() {
    let shoulders = ClassicFields {
        l: true,
        zl: true,
        ..ClassicFields::default()
    };

    let mut analog = rig(SimulatedExtension::classic(), SimulatedExtension::empty(), Settings::default());
    analog.poll();
    analog.poll();
    sim(&mut analog, 0).set_classic(ClassicFields {
        trigger_l: 200,
        trigger_r: 5,
        ..shoulders
    });
    analog.poll();
    assert_eq!(analog.frame(0).unwrap().buttons, Buttons::L1 | Buttons::L2);

    let mut digital = rig(SimulatedExtension::classic_pro(), SimulatedExtension::empty(), Settings::default());
    digital.poll();
    digital.poll();
    assert!(!digital.port(0).unwrap().analog_triggers());
    sim(&mut digital, 0).set_classic(ClassicFields {
        zr: true,
        ..ClassicFields::default()
    });
    digital.poll();
    let frame = digital.frame(0).unwrap();
    assert_eq!(frame.buttons, Buttons::R2);
    assert_eq!(frame.right_trigger, 0);
}

#[test]
fn test_digital_classic_keeps_trigger_travel() {
    // Left trigger reads the digital sentinel when the mode is sensed
    let mut adapter = rig(SimulatedExtension::classic(), SimulatedExtension::empty(), Settings::default());
    sim(&mut adapter, 0).set_classic(ClassicFields {
        trigger_l: 0,
        trigger_r: 40,
        ..ClassicFields::default()
    });
    adapter.poll();
    adapter.poll();
    assert!(!adapter.port(0).unwrap().analog_triggers());
    assert_eq!(adapter.frame(0).unwrap().right_trigger, 40);

    sim(&mut adapter, 0).set_classic(ClassicFields {
        trigger_l: 0,
        trigger_r: 180,
        ..ClassicFields::default()
    });
    let summary = adapter.poll();
    assert!(!summary.any_state_changed);
    assert_eq!(adapter.frame(0).unwrap().right_trigger, 180);
}

#[test]
fn test_classic_full_mapping() {
    let mut adapter = rig(SimulatedExtension::classic_pro(), SimulatedExtension::empty(), Settings::default());
    adapter.poll();
    sim(&mut adapter, 0).set_classic(ClassicFields {
        a: true,
        b: true,
        x: true,
        y: true,
        minus: true,
        plus: true,
        home: true,
        dpad_up: true,
        dpad_right: true,
        ..ClassicFields::default()
    });
    adapter.poll();
    let frame = adapter.frame(0).unwrap();
    assert_eq!(
        frame.buttons,
        Buttons::B1 | Buttons::B2 | Buttons::B3 | Buttons::B4 | Buttons::S1 | Buttons::S2 | Buttons::A1
    );
    assert_eq!(frame.dpad, Dpad::UP | Dpad::RIGHT);
}

#[test]
fn test_guitar_needs_music_support() {
    let mut adapter = rig(SimulatedExtension::guitar(), SimulatedExtension::empty(), Settings::default());
    adapter.poll();
    sim(&mut adapter, 0).set_guitar(GuitarFields {
        green: true,
        ..GuitarFields::default()
    });
    adapter.poll();
    assert_eq!(*adapter.frame(0).unwrap(), CanonicalFrame::neutral());

    let mut adapter = rig(SimulatedExtension::guitar(), SimulatedExtension::empty(), music_settings());
    adapter.poll();
    sim(&mut adapter, 0).set_guitar(GuitarFields {
        green: true,
        yellow: true,
        strum_up: true,
        plus: true,
        touchbar: 0x1C,
        whammy: 25,
        ..GuitarFields::default()
    });
    let summary = adapter.poll();
    assert!(summary.any_state_changed);

    let frame = adapter.frame(0).unwrap();
    assert_eq!(
        frame.buttons,
        Buttons::B1 | Buttons::B4 | Buttons::S2 | Buttons::AUX5
    );
    assert_eq!(frame.dpad, Dpad::UP);
    assert_eq!(frame.right_x, 255);
    assert_eq!(frame.right_y, AXIS_CENTER);
}

#[test]
fn test_raw_passthrough_end_to_end() {
    let settings = AdapterConfig {
        raw_analog_passthrough: true,
        ..AdapterConfig::default()
    }
    .resolve();
    let mut adapter = rig(SimulatedExtension::classic(), SimulatedExtension::empty(), settings);
    adapter.poll();
    sim(&mut adapter, 0).set_classic(ClassicFields {
        left_x: 3,
        left_y: 250,
        right_x: 100,
        right_y: 0,
        trigger_l: 9,
        trigger_r: 99,
        ..ClassicFields::default()
    });
    adapter.poll();

    let frame = adapter.frame(0).unwrap();
    assert_eq!(
        (frame.left_x, frame.left_y, frame.right_x, frame.right_y),
        (3, 250, 100, 0)
    );
    assert_eq!((frame.left_trigger, frame.right_trigger), (9, 99));
}

#[test]
fn test_reattach_different_family() {
    let mut adapter = rig(SimulatedExtension::classic(), SimulatedExtension::empty(), Settings::default());
    adapter.poll();
    adapter.poll();
    assert!(adapter.port(0).unwrap().analog_triggers());

    sim(&mut adapter, 0).detach();
    adapter.poll();
    sim(&mut adapter, 0).attach(SimDevice::Nunchuk);
    adapter.poll();
    adapter.poll();

    let port = adapter.port(0).unwrap();
    assert!(!port.analog_triggers());
    assert_eq!(port.frame().right_x, AXIS_CENTER);
}

proptest! {
    #[test]
    fn prop_calibrated_frames_track_stick_order(a in 0u8..=255, b in 0u8..=255) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let mut adapter = rig(SimulatedExtension::classic_pro(), SimulatedExtension::empty(), Settings::default());
        adapter.poll();
        adapter.poll();

        sim(&mut adapter, 0).set_classic(ClassicFields { left_x: lo, left_y: lo, ..ClassicFields::default() });
        adapter.poll();
        let low = *adapter.frame(0).unwrap();

        sim(&mut adapter, 0).set_classic(ClassicFields { left_x: hi, left_y: hi, ..ClassicFields::default() });
        adapter.poll();
        let high = *adapter.frame(0).unwrap();

        prop_assert!(low.left_x <= high.left_x);
        prop_assert!(low.left_y >= high.left_y);
    }
}
