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

//! Port session
//!
//! One [`Port`] tracks a single physical extension slot across polls:
//! connection liveness, the attached family, the calibration captured for the
//! current connection, the resolved trigger mode and the last emitted frame.
//!
//! # State Machine
//!
//! ```text
//!                 connect() ok
//!  NoController ───────────────► Connected
//!      ▲   │ connect() fails          │ update() ok
//!      └───┘                          ▼
//!      ▲                       StillConnected ◄──┐
//!      │                              │  │       │ update() ok
//!      │        update() fails        │  └───────┘
//!      └──────── Disconnected ◄───────┘
//! ```
//!
//! The connecting poll only resets the frame and reports identity; the first
//! sample is decoded on the following poll, which also resolves the trigger
//! mode and captures calibration.

use super::bus::{DeviceFamily, ExtensionBus};
use super::config::{AnalogMode, Settings};
use super::decoder::{self, Capabilities};
use super::display::StatusDisplay;
use super::error::AdapterError;
use super::frame::{self, CanonicalFrame, FrameDiff};
use super::normalizer::{self, Calibration, WII_STICK};
use serde::Serialize;

/// Outcome of polling one port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionEvent {
    /// Nothing attached
    #[default]
    NoController,
    /// A device answered this poll
    Connected,
    /// The device answered again
    StillConnected,
    /// The device stopped answering this poll
    Disconnected,
}

impl ConnectionEvent {
    /// True when a device is attached after the poll
    #[inline]
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionEvent::Connected | ConnectionEvent::StillConnected)
    }
}

/// Per-port result of one poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PortPoll {
    pub event: ConnectionEvent,
    /// Difference between the new frame and the previously emitted one
    pub diff: FrameDiff,
}

/// State of one physical extension slot
#[derive(Debug, Clone)]
pub struct Port {
    /// Slot index (0 or 1)
    index: usize,

    /// Device answered the last poll
    connected: bool,

    /// Family identified at connection time
    family: DeviceFamily,

    /// Drift captured for the current connection
    calibration: Calibration,

    /// Calibration will be captured from the next decoded sample
    calibration_pending: bool,

    /// Trigger mode has been sampled since the last connection event
    trigger_mode_resolved: bool,

    /// Capabilities resolved for the current connection
    caps: Capabilities,

    /// Last emitted frame
    frame: CanonicalFrame,
}

impl Port {
    /// Create an empty port with a neutral frame
    pub fn new(index: usize) -> Self {
        Self {
            index,
            connected: false,
            family: DeviceFamily::None,
            calibration: Calibration::default(),
            calibration_pending: false,
            trigger_mode_resolved: false,
            caps: Capabilities::default(),
            frame: CanonicalFrame::neutral(),
        }
    }

    /// Poll the port once
    ///
    /// Never fails: bus faults fold into [`ConnectionEvent::Disconnected`],
    /// and unsupported devices keep a neutral frame.
    ///
    /// # Arguments
    ///
    /// * `bus` - Bus of this port
    /// * `settings` - Runtime settings
    /// * `display` - Status display notified of identity and glyph changes
    pub fn poll<B, D>(&mut self, bus: &mut B, settings: &Settings, display: &mut D) -> PortPoll
    where
        B: ExtensionBus,
        D: StatusDisplay,
    {
        if !self.connected {
            if !bus.connect() {
                return PortPoll::default();
            }
            let diff = self.on_connect(bus.device_family(), settings, display);
            return PortPoll {
                event: ConnectionEvent::Connected,
                diff,
            };
        }

        if !bus.update() {
            let diff = self.on_disconnect(display);
            return PortPoll {
                event: ConnectionEvent::Disconnected,
                diff,
            };
        }

        PortPoll {
            event: ConnectionEvent::StillConnected,
            diff: self.sample(bus, settings, display),
        }
    }

    fn on_connect<D: StatusDisplay>(
        &mut self,
        family: DeviceFamily,
        settings: &Settings,
        display: &mut D,
    ) -> FrameDiff {
        self.connected = true;
        self.family = family;
        self.calibration = Calibration::default();
        self.calibration_pending = true;
        self.trigger_mode_resolved = false;
        self.caps = Capabilities::default();

        let diff = self.emit(CanonicalFrame::neutral(), display);
        display.show_identity(self.index, family);

        if settings.supports(family) {
            log::info!("Port {}: {} connected", self.index, family);
        } else {
            log::warn!(
                "{}",
                AdapterError::UnsupportedDevice {
                    port: self.index,
                    family
                }
            );
        }
        diff
    }

    fn on_disconnect<D: StatusDisplay>(&mut self, display: &mut D) -> FrameDiff {
        log::warn!("{}", AdapterError::ConnectionLost { port: self.index });

        self.connected = false;
        self.family = DeviceFamily::None;
        self.calibration_pending = false;
        self.trigger_mode_resolved = false;
        self.caps = Capabilities::default();

        let diff = self.emit(CanonicalFrame::neutral(), display);
        display.show_identity(self.index, DeviceFamily::None);
        diff
    }

    /// Decode, normalize and emit one sample from a live device
    fn sample<B, D>(&mut self, bus: &B, settings: &Settings, display: &mut D) -> FrameDiff
    where
        B: ExtensionBus,
        D: StatusDisplay,
    {
        if !self.trigger_mode_resolved {
            let sensed = decoder::senses_analog_triggers(bus, self.family);
            self.caps.analog_triggers = sensed && settings.allow_analog_triggers;
            self.trigger_mode_resolved = true;
            log::debug!(
                "Port {}: analog triggers {} (sensed {}, allowed {})",
                self.index,
                self.caps.analog_triggers,
                sensed,
                settings.allow_analog_triggers
            );
        }

        let report = match decoder::decode(
            self.index,
            bus,
            self.family,
            &mut self.caps,
            settings.music_devices,
        ) {
            Ok(report) => report,
            // Reported once at connection time
            Err(_) => return FrameDiff::default(),
        };

        if self.calibration_pending && settings.analog_mode == AnalogMode::Calibrated {
            self.calibration = Calibration::capture(&report, &WII_STICK);
            self.calibration_pending = false;
            log::debug!(
                "Port {}: calibration shifts {:?}",
                self.index,
                self.calibration.shifts
            );
        }

        let frame = normalizer::normalize(
            &report,
            &self.calibration,
            settings.analog_mode,
            self.caps.analog_triggers,
            &WII_STICK,
        );
        log::trace!("Port {}: {:?}", self.index, frame);

        self.emit(frame, display)
    }

    /// Latch `frame` if it differs from the last emitted one
    fn emit<D: StatusDisplay>(&mut self, frame: CanonicalFrame, display: &mut D) -> FrameDiff {
        let diff = frame::diff(&self.frame, &frame);
        if diff.buttons_changed {
            for (glyph, lit) in frame::changed_glyphs(&self.frame, &frame) {
                display.set_glyph(self.index, glyph, lit);
            }
        }
        if diff.any() {
            self.frame = frame;
        }
        diff
    }

    /// Sample the trigger mode again on the next decoded poll
    pub fn rearm_trigger_detection(&mut self) {
        self.trigger_mode_resolved = false;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn family(&self) -> DeviceFamily {
        self.family
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Calibration will be captured from the next decoded sample
    pub fn calibration_pending(&self) -> bool {
        self.calibration_pending
    }

    pub fn trigger_mode_resolved(&self) -> bool {
        self.trigger_mode_resolved
    }

    /// Triggers are treated as analog for the current connection
    pub fn analog_triggers(&self) -> bool {
        self.caps.analog_triggers
    }

    /// Last emitted frame
    pub fn frame(&self) -> &CanonicalFrame {
        &self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bus::{ClassicFields, ExtensionPort, NunchukFields};
    use crate::core::display::NoDisplay;
    use crate::core::frame::{Buttons, AXIS_CENTER};
    use crate::sim::SimulatedExtension;

    fn live(sim: SimulatedExtension) -> ExtensionPort<SimulatedExtension> {
        let mut bus = ExtensionPort::new(sim);
        bus.initialize();
        bus
    }

    #[test]
    fn test_empty_port_reports_no_controller() {
        let mut port = Port::new(0);
        let mut bus = live(SimulatedExtension::empty());

        let poll = port.poll(&mut bus, &Settings::default(), &mut NoDisplay);
        assert_eq!(poll.event, ConnectionEvent::NoController);
        assert!(!poll.diff.any());
        assert!(!port.is_connected());
    }

    #[test]
    fn test_connecting_poll_does_not_decode() {
        let mut port = Port::new(0);
        let mut bus = live(SimulatedExtension::nunchuk());
        bus.transport_mut().set_nunchuk(NunchukFields {
            c: true,
            ..NunchukFields::default()
        });

        let poll = port.poll(&mut bus, &Settings::default(), &mut NoDisplay);
        assert_eq!(poll.event, ConnectionEvent::Connected);
        assert_eq!(*port.frame(), CanonicalFrame::neutral());
        assert!(port.calibration_pending());
        assert!(!port.trigger_mode_resolved());

        let poll = port.poll(&mut bus, &Settings::default(), &mut NoDisplay);
        assert_eq!(poll.event, ConnectionEvent::StillConnected);
        assert!(poll.diff.buttons_changed);
        assert_eq!(port.frame().buttons, Buttons::B1);
        assert!(!port.calibration_pending());
        assert!(port.trigger_mode_resolved());
    }

    #[test]
    fn test_disconnect_resets_session() {
        let mut port = Port::new(1);
        let mut bus = live(SimulatedExtension::classic());
        bus.transport_mut().set_classic(ClassicFields {
            a: true,
            left_x: 40,
            trigger_l: 80,
            trigger_r: 80,
            ..ClassicFields::default()
        });

        port.poll(&mut bus, &Settings::default(), &mut NoDisplay);
        port.poll(&mut bus, &Settings::default(), &mut NoDisplay);
        assert!(port.analog_triggers());
        assert_eq!(port.frame().buttons, Buttons::B2);

        bus.transport_mut().detach();
        let poll = port.poll(&mut bus, &Settings::default(), &mut NoDisplay);
        assert_eq!(poll.event, ConnectionEvent::Disconnected);
        assert!(poll.diff.buttons_changed);
        assert!(!port.is_connected());
        assert!(!port.analog_triggers());
        assert!(!port.trigger_mode_resolved());
        assert_eq!(port.family(), DeviceFamily::None);
        assert_eq!(port.frame().left_x, AXIS_CENTER);
        assert_eq!(*port.frame(), CanonicalFrame::neutral());

        let poll = port.poll(&mut bus, &Settings::default(), &mut NoDisplay);
        assert_eq!(poll.event, ConnectionEvent::NoController);
    }

    #[test]
    fn test_unsupported_device_stays_neutral() {
        let mut port = Port::new(0);
        let mut bus = live(SimulatedExtension::with_identity(
            crate::core::bus::report::ID_DRUM,
        ));

        assert_eq!(
            port.poll(&mut bus, &Settings::default(), &mut NoDisplay).event,
            ConnectionEvent::Connected
        );
        let poll = port.poll(&mut bus, &Settings::default(), &mut NoDisplay);
        assert_eq!(poll.event, ConnectionEvent::StillConnected);
        assert!(!poll.diff.any());
        assert_eq!(port.family(), DeviceFamily::Drum);
        assert_eq!(*port.frame(), CanonicalFrame::neutral());
    }

    #[test]
    fn test_host_policy_disables_analog_triggers() {
        let mut port = Port::new(0);
        let mut bus = live(SimulatedExtension::classic());
        bus.transport_mut().set_classic(ClassicFields {
            trigger_l: 60,
            trigger_r: 60,
            ..ClassicFields::default()
        });
        let settings = Settings {
            allow_analog_triggers: false,
            ..Settings::default()
        };

        port.poll(&mut bus, &settings, &mut NoDisplay);
        port.poll(&mut bus, &settings, &mut NoDisplay);
        assert!(port.trigger_mode_resolved());
        assert!(!port.analog_triggers());
        assert_eq!(port.frame().left_trigger, 60);
    }

    #[test]
    fn test_rearm_resamples_trigger_mode() {
        let mut port = Port::new(0);
        let mut bus = live(SimulatedExtension::classic());
        bus.transport_mut().set_classic(ClassicFields {
            trigger_l: 0,
            trigger_r: 0,
            ..ClassicFields::default()
        });

        port.poll(&mut bus, &Settings::default(), &mut NoDisplay);
        port.poll(&mut bus, &Settings::default(), &mut NoDisplay);
        assert!(!port.analog_triggers());

        bus.transport_mut().set_classic(ClassicFields {
            trigger_l: 30,
            trigger_r: 30,
            ..ClassicFields::default()
        });
        port.poll(&mut bus, &Settings::default(), &mut NoDisplay);
        assert!(!port.analog_triggers(), "cached until re-armed");

        port.rearm_trigger_detection();
        port.poll(&mut bus, &Settings::default(), &mut NoDisplay);
        assert!(port.analog_triggers());
        assert_eq!(port.frame().left_trigger, 30);
    }
}
