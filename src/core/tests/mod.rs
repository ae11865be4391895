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

//! End-to-end tests for the adapter core
//!
//! Every test drives a full [`Adapter`] over simulated register devices.

mod pipeline;

use crate::core::adapter::Adapter;
use crate::core::bus::{DeviceFamily, ExtensionPort};
use crate::core::config::Settings;
use crate::core::display::StatusDisplay;
use crate::core::frame::Glyph;
use crate::sim::SimulatedExtension;

/// Display that records every update it receives
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub identities: Vec<(usize, DeviceFamily)>,
    pub glyphs: Vec<(usize, Glyph, bool)>,
}

impl RecordingDisplay {
    pub fn clear(&mut self) {
        self.identities.clear();
        self.glyphs.clear();
    }
}

impl StatusDisplay for RecordingDisplay {
    fn show_identity(&mut self, port: usize, family: DeviceFamily) {
        self.identities.push((port, family));
    }

    fn set_glyph(&mut self, port: usize, glyph: Glyph, lit: bool) {
        self.glyphs.push((port, glyph, lit));
    }
}

pub type TestAdapter = Adapter<ExtensionPort<SimulatedExtension>, RecordingDisplay>;

/// Adapter with the given devices and a recording display
pub fn rig(first: SimulatedExtension, second: SimulatedExtension, settings: Settings) -> TestAdapter {
    Adapter::with_display(
        [ExtensionPort::new(first), ExtensionPort::new(second)],
        RecordingDisplay::default(),
        settings,
    )
}

/// Simulated device behind `port`
pub fn sim(adapter: &mut TestAdapter, port: usize) -> &mut SimulatedExtension {
    adapter.bus_mut(port).unwrap().transport_mut()
}
