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

//! Two-port adapter
//!
//! Owns both [`Port`] sessions together with their buses and the optional
//! status display, and runs one poll cycle at a time.
//!
//! # Example
//!
//! ```
//! use wii_adapter::core::adapter::Adapter;
//! use wii_adapter::core::bus::ExtensionPort;
//! use wii_adapter::core::config::Settings;
//! use wii_adapter::sim::SimulatedExtension;
//!
//! let buses = [
//!     ExtensionPort::new(SimulatedExtension::classic()),
//!     ExtensionPort::new(SimulatedExtension::empty()),
//! ];
//! let mut adapter = Adapter::new(buses, Settings::default());
//!
//! let summary = adapter.poll();
//! assert!(summary.ports[0].event.is_connected());
//! assert_eq!(summary.idle_hint_micros, 1_000);
//! ```

use super::bus::{DeviceFamily, ExtensionBus};
use super::config::{Settings, TOTAL_PORTS};
use super::display::{NoDisplay, StatusDisplay};
use super::error::{AdapterError, Result};
use super::frame::CanonicalFrame;
use super::port::{Port, PortPoll};
use serde::Serialize;

/// Result of one poll cycle over both ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollSummary {
    /// Buttons or dpad changed on at least one port
    ///
    /// Analog-only movement is latched but does not raise this flag.
    pub any_state_changed: bool,

    /// Suggested idle before the next cycle
    pub idle_hint_micros: u32,

    /// Per-port outcome
    pub ports: [PortPoll; TOTAL_PORTS],
}

/// Snapshot of both ports' frames, as handed to the host report layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HostReport {
    pub frames: [CanonicalFrame; TOTAL_PORTS],
}

/// Two-port extension controller adapter
pub struct Adapter<B, D = NoDisplay> {
    ports: [Port; TOTAL_PORTS],
    buses: [B; TOTAL_PORTS],
    display: D,
    settings: Settings,
}

impl<B: ExtensionBus> Adapter<B, NoDisplay> {
    /// Create an adapter without a status display
    pub fn new(buses: [B; TOTAL_PORTS], settings: Settings) -> Self {
        Self::with_display(buses, NoDisplay, settings)
    }
}

impl<B: ExtensionBus, D: StatusDisplay> Adapter<B, D> {
    /// Create an adapter and bring up both buses
    ///
    /// Every port starts empty and the display shows no controller.
    pub fn with_display(mut buses: [B; TOTAL_PORTS], mut display: D, settings: Settings) -> Self {
        for (index, bus) in buses.iter_mut().enumerate() {
            bus.initialize();
            display.show_identity(index, DeviceFamily::None);
        }
        log::debug!("Adapter started with {:?}", settings);

        Self {
            ports: [Port::new(0), Port::new(1)],
            buses,
            display,
            settings,
        }
    }

    /// Run one poll cycle over both ports
    ///
    /// Ports are polled in order; a fault on one port never affects the other.
    pub fn poll(&mut self) -> PollSummary {
        let mut summary = PollSummary::default();
        let mut any_controller = false;

        for (index, (port, bus)) in self.ports.iter_mut().zip(self.buses.iter_mut()).enumerate() {
            let poll = port.poll(bus, &self.settings, &mut self.display);
            summary.any_state_changed |= poll.diff.buttons_changed;
            any_controller |= poll.event.is_connected();
            summary.ports[index] = poll;
        }

        summary.idle_hint_micros = self.settings.idle_hint(any_controller);
        summary
    }

    /// Last emitted frame of `port`
    pub fn frame(&self, port: usize) -> Result<&CanonicalFrame> {
        Ok(self.port(port)?.frame())
    }

    /// Frames of both ports
    pub fn report(&self) -> HostReport {
        HostReport {
            frames: [*self.ports[0].frame(), *self.ports[1].frame()],
        }
    }

    /// Session state of `port`
    pub fn port(&self, port: usize) -> Result<&Port> {
        self.ports
            .get(port)
            .ok_or(AdapterError::InvalidPort { port })
    }

    /// Bus of `port`
    pub fn bus_mut(&mut self, port: usize) -> Result<&mut B> {
        self.buses
            .get_mut(port)
            .ok_or(AdapterError::InvalidPort { port })
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the runtime settings
    ///
    /// Connected ports re-sample their trigger mode on the next poll, so a
    /// change of trigger policy takes effect without a reconnect. Calibration
    /// is kept.
    pub fn apply_settings(&mut self, settings: Settings) {
        log::info!("Applying adapter settings {:?}", settings);
        self.settings = settings;
        for port in self.ports.iter_mut() {
            port.rearm_trigger_detection();
        }
    }
}
