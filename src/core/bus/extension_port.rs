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

//! Extension port over a two-wire register transport
//!
//! Implements [`ExtensionBus`] on top of any byte-level [`Transport`].
//!
//! # Protocol
//!
//! 1. Write `F0 55` then `FB 00` (unencrypted init)
//! 2. Write `FA`, read 6 identity bytes
//! 3. Classic controllers only: write `FE 03` (8-byte high resolution
//!    reports), then read `FE` back; devices that keep the old format are
//!    polled with standard 6-byte reports
//! 4. Per poll: write `00`, read the data report

use super::report::{self, HIGH_RES_REPORT_LEN, IDENTITY_LEN, STANDARD_REPORT_LEN};
use super::{ClassicFields, DeviceFamily, ExtensionBus, GuitarFields, NunchukFields};
use thiserror::Error;

/// Bus address of every extension controller
pub const EXTENSION_ADDRESS: u8 = 0x52;

/// Transport-level failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    /// No device acknowledged the address
    #[error("no acknowledge from device 0x{address:02X}")]
    Nack { address: u8 },

    /// Device released the bus before the requested length was read
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    /// Clock stretching exceeded the transport timeout
    #[error("bus timeout")]
    Timeout,
}

/// Byte-level two-wire bus
///
/// Owns electrical timing and byte retries; callers only see whole
/// transactions succeed or fail.
pub trait Transport {
    /// Configure pins / peripheral
    fn begin(&mut self);

    /// Write `bytes` to the device at `address` (first byte is the register)
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), BusError>;

    /// Read `buffer.len()` bytes from the device's current register pointer
    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), BusError>;
}

/// One physical extension port
///
/// # Example
///
/// ```
/// use wii_adapter::core::bus::{DeviceFamily, ExtensionBus, ExtensionPort};
/// use wii_adapter::sim::SimulatedExtension;
///
/// let mut port = ExtensionPort::new(SimulatedExtension::nunchuk());
/// port.initialize();
/// assert!(port.connect());
/// assert_eq!(port.device_family(), DeviceFamily::Nunchuk);
/// assert!(port.update());
/// ```
#[derive(Debug)]
pub struct ExtensionPort<T> {
    /// Underlying transport
    transport: T,

    /// Family identified by the last successful connect
    family: DeviceFamily,

    /// Classic controller accepted the high resolution format
    high_res: bool,

    /// Last data report (high resolution classic reports use all 8 bytes)
    data: [u8; HIGH_RES_REPORT_LEN],
}

impl<T: Transport> ExtensionPort<T> {
    /// Wrap a transport; nothing is sent until [`ExtensionBus::connect`]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            family: DeviceFamily::None,
            high_res: false,
            data: [0xFF; HIGH_RES_REPORT_LEN],
        }
    }

    /// Access the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the underlying transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Length of the data report for the attached device
    fn report_len(&self) -> usize {
        if self.high_res {
            HIGH_RES_REPORT_LEN
        } else {
            STANDARD_REPORT_LEN
        }
    }

    /// Run the init handshake and return the identified family
    fn handshake(&mut self) -> Result<DeviceFamily, BusError> {
        self.transport.write(
            EXTENSION_ADDRESS,
            &[report::REG_INIT1, report::INIT1_VALUE],
        )?;
        self.transport.write(
            EXTENSION_ADDRESS,
            &[report::REG_INIT2, report::INIT2_VALUE],
        )?;

        let mut id = [0u8; IDENTITY_LEN];
        self.transport
            .write(EXTENSION_ADDRESS, &[report::REG_IDENTITY])?;
        self.transport.read(EXTENSION_ADDRESS, &mut id)?;

        let family = report::identify(&id);
        log::trace!("Extension identity {:02X?} -> {}", id, family);

        if family == DeviceFamily::Classic {
            self.high_res = self.request_high_res()?;
            if !self.high_res {
                log::debug!("Classic controller kept the standard report format");
            }
        }

        Ok(family)
    }

    /// Ask for 8-byte reports and confirm the device switched
    fn request_high_res(&mut self) -> Result<bool, BusError> {
        self.transport.write(
            EXTENSION_ADDRESS,
            &[report::REG_DATA_FORMAT, report::FORMAT_HIGH_RES],
        )?;

        let mut format = [0u8; 1];
        self.transport
            .write(EXTENSION_ADDRESS, &[report::REG_DATA_FORMAT])?;
        self.transport.read(EXTENSION_ADDRESS, &mut format)?;
        Ok(format[0] == report::FORMAT_HIGH_RES)
    }

    /// Read one data report into the cache
    fn read_report(&mut self) -> Result<(), BusError> {
        let len = self.report_len();
        self.transport
            .write(EXTENSION_ADDRESS, &[report::REG_DATA])?;
        self.transport
            .read(EXTENSION_ADDRESS, &mut self.data[..len])?;
        log::trace!("Extension report {:02X?}", &self.data[..len]);
        Ok(())
    }

    fn standard_report(&self) -> [u8; STANDARD_REPORT_LEN] {
        let mut data = [0u8; STANDARD_REPORT_LEN];
        data.copy_from_slice(&self.data[..STANDARD_REPORT_LEN]);
        data
    }
}

impl<T: Transport> ExtensionBus for ExtensionPort<T> {
    fn initialize(&mut self) {
        self.transport.begin();
    }

    fn connect(&mut self) -> bool {
        self.family = DeviceFamily::None;
        self.high_res = false;

        let family = match self.handshake() {
            Ok(DeviceFamily::None) => return false,
            Ok(family) => family,
            Err(e) => {
                log::trace!("Extension handshake failed: {}", e);
                return false;
            }
        };

        self.family = family;
        match self.read_report() {
            Ok(()) => true,
            Err(e) => {
                log::trace!("Extension first report failed: {}", e);
                self.family = DeviceFamily::None;
                false
            }
        }
    }

    fn update(&mut self) -> bool {
        match self.read_report() {
            Ok(()) => true,
            Err(e) => {
                log::trace!("Extension update failed: {}", e);
                false
            }
        }
    }

    fn device_family(&self) -> DeviceFamily {
        self.family
    }

    fn classic(&self) -> ClassicFields {
        if self.family != DeviceFamily::Classic {
            return ClassicFields::default();
        }
        if self.high_res {
            report::decode_classic_high_res(&self.data)
        } else {
            report::decode_classic(&self.standard_report())
        }
    }

    fn nunchuk(&self) -> NunchukFields {
        if self.family != DeviceFamily::Nunchuk {
            return NunchukFields::default();
        }
        report::decode_nunchuk(&self.standard_report())
    }

    fn guitar(&self) -> GuitarFields {
        if self.family != DeviceFamily::Guitar {
            return GuitarFields::default();
        }
        report::decode_guitar(&self.standard_report())
    }
}
