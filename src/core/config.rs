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

//! Adapter configuration
//!
//! [`AdapterConfig`] is the on-disk TOML form. It is resolved once at start-up
//! into [`Settings`], a small `Copy` value that the polling loop passes by
//! reference into every port.
//!
//! ```toml
//! raw_analog_passthrough = false
//! extended_music_device_support = true
//! allow_analog_triggers = true
//! active_idle_micros = 1000
//! disconnected_idle_micros = 50000
//! ```

use super::bus::DeviceFamily;
use super::error::{AdapterError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of physical extension ports
pub const TOTAL_PORTS: usize = 2;

/// Idle hint while at least one controller is connected
pub const DEFAULT_ACTIVE_IDLE_MICROS: u32 = 1_000;

/// Idle hint while no controller is connected
pub const DEFAULT_DISCONNECTED_IDLE_MICROS: u32 = 50_000;

/// Configuration that can be saved/loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Forward raw stick/trigger bytes without calibration
    pub raw_analog_passthrough: bool,

    /// Map guitars instead of reporting them as unsupported
    pub extended_music_device_support: bool,

    /// Host policy: allow graduated trigger values
    pub allow_analog_triggers: bool,

    /// Suggested idle between polls with a controller attached
    pub active_idle_micros: u32,

    /// Suggested idle between polls with no controller attached
    pub disconnected_idle_micros: u32,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            raw_analog_passthrough: false,
            extended_music_device_support: false,
            allow_analog_triggers: true,
            active_idle_micros: DEFAULT_ACTIVE_IDLE_MICROS,
            disconnected_idle_micros: DEFAULT_DISCONNECTED_IDLE_MICROS,
        }
    }
}

impl AdapterConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| AdapterError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Load configuration, falling back to defaults when the file is unusable
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            log::info!("Using default adapter config ({})", e);
            Self::default()
        })
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|source| AdapterError::ConfigWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve into the runtime settings used by the polling loop
    pub fn resolve(&self) -> Settings {
        Settings {
            analog_mode: if self.raw_analog_passthrough {
                AnalogMode::RawPassthrough
            } else {
                AnalogMode::Calibrated
            },
            music_devices: self.extended_music_device_support,
            allow_analog_triggers: self.allow_analog_triggers,
            active_idle_micros: self.active_idle_micros,
            disconnected_idle_micros: self.disconnected_idle_micros,
        }
    }
}

/// Analog processing path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalogMode {
    /// Drift compensation, clamp, rescale and vertical inversion
    #[default]
    Calibrated,
    /// Raw device bytes forwarded untouched
    RawPassthrough,
}

/// Runtime settings resolved from [`AdapterConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub analog_mode: AnalogMode,
    pub music_devices: bool,
    pub allow_analog_triggers: bool,
    pub active_idle_micros: u32,
    pub disconnected_idle_micros: u32,
}

impl Settings {
    /// Whether `family` has a mapping table under these settings
    pub fn supports(&self, family: DeviceFamily) -> bool {
        match family {
            DeviceFamily::Classic | DeviceFamily::Nunchuk => true,
            DeviceFamily::Guitar => self.music_devices,
            _ => false,
        }
    }

    /// Idle hint for the caller of a poll cycle
    #[inline]
    pub fn idle_hint(&self, any_controller: bool) -> u32 {
        if any_controller {
            self.active_idle_micros
        } else {
            self.disconnected_idle_micros
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        AdapterConfig::default().resolve()
    }
}
