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

//! Simulated extension controllers
//!
//! [`SimulatedExtension`] is a register-level model of an extension
//! controller sitting behind a [`Transport`]. It answers the same init,
//! identity and data-format registers as real hardware and encodes its
//! current field snapshot into wire reports, so the whole adapter can be
//! exercised without a physical bus.
//!
//! # Register Behaviour
//!
//! - Nothing attached: every transaction is NACKed
//! - Attached but not initialized: reads return `0xFF`
//! - `F0 55` then `FB 00`: device initialized
//! - `FE 03`: classic controllers switch to 8-byte reports (clones ignore it)
//! - `FE`: reads back the current data format
//! - `FA`: identity, `00`: data report

pub mod scenario;

use crate::core::bus::report::{
    self, FORMAT_HIGH_RES, HIGH_RES_REPORT_LEN, IDENTITY_LEN, STANDARD_REPORT_LEN,
};
use crate::core::bus::{
    BusError, ClassicFields, GuitarFields, NunchukFields, Transport, EXTENSION_ADDRESS,
};
use serde::{Deserialize, Serialize};

/// Kind of device that can be plugged into a simulated port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimDevice {
    /// Classic Controller (analog triggers)
    Classic,
    /// Classic Controller Pro (digital triggers)
    ClassicPro,
    /// Third-party classic that only speaks the standard 6-byte report
    ClassicClone,
    Nunchuk,
    Guitar,
    Drum,
    Turntable,
    UDraw,
    Drawsome,
    /// Answers with an identity nobody recognizes
    Unknown,
}

/// Resting trigger reading of an original Classic Controller
const CLASSIC_TRIGGER_REST: u8 = 4;

/// Identity reported for [`SimDevice::Unknown`]
const UNKNOWN_IDENTITY: [u8; IDENTITY_LEN] = [0x00, 0x00, 0xA4, 0x20, 0x05, 0x05];

impl SimDevice {
    pub fn identity(&self) -> [u8; IDENTITY_LEN] {
        match self {
            SimDevice::Classic | SimDevice::ClassicClone => report::ID_CLASSIC,
            SimDevice::ClassicPro => report::ID_CLASSIC_PRO,
            SimDevice::Nunchuk => report::ID_NUNCHUK,
            SimDevice::Guitar => report::ID_GUITAR,
            SimDevice::Drum => report::ID_DRUM,
            SimDevice::Turntable => report::ID_TURNTABLE,
            SimDevice::UDraw => report::ID_UDRAW,
            SimDevice::Drawsome => report::ID_DRAWSOME,
            SimDevice::Unknown => UNKNOWN_IDENTITY,
        }
    }

    /// Field snapshot of the device at rest
    fn resting_state(&self) -> SimState {
        match self {
            SimDevice::Classic => SimState::Classic(ClassicFields {
                trigger_l: CLASSIC_TRIGGER_REST,
                trigger_r: CLASSIC_TRIGGER_REST,
                ..ClassicFields::default()
            }),
            SimDevice::ClassicPro | SimDevice::ClassicClone => {
                SimState::Classic(ClassicFields::default())
            }
            SimDevice::Nunchuk => SimState::Nunchuk(NunchukFields::default()),
            SimDevice::Guitar => SimState::Guitar(GuitarFields::default()),
            _ => SimState::Opaque([0xFF; STANDARD_REPORT_LEN]),
        }
    }

    /// Whether the device honours a `FE 03` data format request
    fn accepts_high_res(&self) -> bool {
        !matches!(self, SimDevice::ClassicClone)
    }
}

/// Current inputs of the attached device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SimState {
    Classic(ClassicFields),
    Nunchuk(NunchukFields),
    Guitar(GuitarFields),
    /// Fixed report for families without a field model
    Opaque([u8; STANDARD_REPORT_LEN]),
}

#[derive(Debug, Clone)]
struct Attached {
    identity: [u8; IDENTITY_LEN],
    state: SimState,
    /// `F0 55` seen
    init1: bool,
    /// `FB 00` seen after `F0 55`
    initialized: bool,
    data_format: u8,
    accepts_high_res: bool,
    /// Register selected by the last write
    pointer: u8,
}

impl Attached {
    fn new(identity: [u8; IDENTITY_LEN], state: SimState, accepts_high_res: bool) -> Self {
        Self {
            identity,
            state,
            init1: false,
            initialized: false,
            data_format: 0,
            accepts_high_res,
            pointer: 0,
        }
    }

    fn register_write(&mut self, register: u8, value: u8) {
        match register {
            report::REG_INIT1 => self.init1 = value == report::INIT1_VALUE,
            report::REG_INIT2 => {
                self.initialized = self.init1 && value == report::INIT2_VALUE;
            }
            report::REG_DATA_FORMAT if self.accepts_high_res => self.data_format = value,
            _ => {}
        }
    }

    /// Bytes visible at the current register pointer
    fn register_block(&self) -> ([u8; HIGH_RES_REPORT_LEN], usize) {
        let mut block = [0u8; HIGH_RES_REPORT_LEN];
        match self.pointer {
            report::REG_IDENTITY => {
                block[..IDENTITY_LEN].copy_from_slice(&self.identity);
                (block, IDENTITY_LEN)
            }
            report::REG_DATA_FORMAT => {
                block[0] = self.data_format;
                (block, 1)
            }
            report::REG_DATA => match self.state {
                SimState::Classic(fields) if self.data_format == FORMAT_HIGH_RES => {
                    (report::encode_classic_high_res(&fields), HIGH_RES_REPORT_LEN)
                }
                SimState::Classic(fields) => standard(report::encode_classic(&fields)),
                SimState::Nunchuk(fields) => standard(report::encode_nunchuk(&fields)),
                SimState::Guitar(fields) => standard(report::encode_guitar(&fields)),
                SimState::Opaque(bytes) => standard(bytes),
            },
            _ => (block, 0),
        }
    }
}

fn standard(bytes: [u8; STANDARD_REPORT_LEN]) -> ([u8; HIGH_RES_REPORT_LEN], usize) {
    let mut block = [0u8; HIGH_RES_REPORT_LEN];
    block[..STANDARD_REPORT_LEN].copy_from_slice(&bytes);
    (block, STANDARD_REPORT_LEN)
}

/// Register-level model of one extension port
///
/// # Example
///
/// ```
/// use wii_adapter::core::bus::{ClassicFields, DeviceFamily, ExtensionBus, ExtensionPort};
/// use wii_adapter::sim::SimulatedExtension;
///
/// let mut port = ExtensionPort::new(SimulatedExtension::classic());
/// port.initialize();
/// assert!(port.connect());
/// assert_eq!(port.device_family(), DeviceFamily::Classic);
///
/// port.transport_mut().set_classic(ClassicFields {
///     b: true,
///     ..ClassicFields::default()
/// });
/// assert!(port.update());
/// assert!(port.classic().b);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulatedExtension {
    /// Transport brought up with `begin()`
    begun: bool,
    device: Option<Attached>,
}

impl SimulatedExtension {
    /// Port with nothing plugged in
    pub fn empty() -> Self {
        Self::default()
    }

    /// Port with `device` plugged in
    pub fn with_device(device: SimDevice) -> Self {
        let mut sim = Self::empty();
        sim.attach(device);
        sim
    }

    /// Original Classic Controller with analog triggers at rest
    pub fn classic() -> Self {
        Self::with_device(SimDevice::Classic)
    }

    /// Classic Controller Pro (digital triggers)
    pub fn classic_pro() -> Self {
        Self::with_device(SimDevice::ClassicPro)
    }

    /// Classic clone limited to standard reports
    pub fn classic_clone() -> Self {
        Self::with_device(SimDevice::ClassicClone)
    }

    pub fn nunchuk() -> Self {
        Self::with_device(SimDevice::Nunchuk)
    }

    pub fn guitar() -> Self {
        Self::with_device(SimDevice::Guitar)
    }

    /// Device answering with an arbitrary identity and an idle report
    pub fn with_identity(identity: [u8; IDENTITY_LEN]) -> Self {
        Self {
            begun: false,
            device: Some(Attached::new(
                identity,
                SimState::Opaque([0xFF; STANDARD_REPORT_LEN]),
                true,
            )),
        }
    }

    /// Plug `device` in (replaces whatever was attached)
    pub fn attach(&mut self, device: SimDevice) {
        log::debug!("Simulated {:?} attached", device);
        self.device = Some(Attached::new(
            device.identity(),
            device.resting_state(),
            device.accepts_high_res(),
        ));
    }

    /// Unplug the attached device
    pub fn detach(&mut self) {
        if self.device.take().is_some() {
            log::debug!("Simulated device detached");
        }
    }

    pub fn is_attached(&self) -> bool {
        self.device.is_some()
    }

    /// Data format last requested through `FE`
    pub fn data_format(&self) -> u8 {
        self.device.as_ref().map_or(0, |d| d.data_format)
    }

    pub fn set_classic(&mut self, fields: ClassicFields) {
        self.set_state(SimState::Classic(fields));
    }

    pub fn set_nunchuk(&mut self, fields: NunchukFields) {
        self.set_state(SimState::Nunchuk(fields));
    }

    pub fn set_guitar(&mut self, fields: GuitarFields) {
        self.set_state(SimState::Guitar(fields));
    }

    fn set_state(&mut self, state: SimState) {
        match self.device.as_mut() {
            Some(device) => device.state = state,
            None => log::debug!("Ignoring input update: nothing attached"),
        }
    }

    /// Attached device, or the error an empty bus would raise
    fn device_mut(&mut self, address: u8) -> Result<&mut Attached, BusError> {
        if !self.begun {
            return Err(BusError::Timeout);
        }
        if address != EXTENSION_ADDRESS {
            return Err(BusError::Nack { address });
        }
        self.device.as_mut().ok_or(BusError::Nack { address })
    }
}

impl Transport for SimulatedExtension {
    fn begin(&mut self) {
        self.begun = true;
    }

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), BusError> {
        let device = self.device_mut(address)?;
        if let Some((&register, rest)) = bytes.split_first() {
            device.pointer = register;
            if let Some(&value) = rest.first() {
                device.register_write(register, value);
            }
        }
        Ok(())
    }

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), BusError> {
        let device = self.device_mut(address)?;
        if !device.initialized {
            buffer.fill(0xFF);
            return Ok(());
        }

        let (block, len) = device.register_block();
        if buffer.len() > len {
            return Err(BusError::ShortRead {
                expected: buffer.len(),
                actual: len,
            });
        }
        buffer.copy_from_slice(&block[..buffer.len()]);
        Ok(())
    }
}
