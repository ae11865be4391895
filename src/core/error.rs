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

//! Error types for the adapter core
//!
//! None of these errors is fatal to the polling loop. Port-level faults
//! (`ConnectionLost`, `UnsupportedDevice`) are folded into a neutral frame by
//! the port session and only surface through logging; the remaining variants
//! belong to start-up work such as loading configuration or scenarios.

use super::bus::DeviceFamily;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Adapter error
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The bus stopped answering update requests for a connected port
    #[error("controller on port {port} stopped responding")]
    ConnectionLost { port: usize },

    /// The attached device has no mapping table
    #[error("unsupported device on port {port}: {family}")]
    UnsupportedDevice { port: usize, family: DeviceFamily },

    /// Port index outside `0..TOTAL_PORTS`
    #[error("invalid port index {port}")]
    InvalidPort { port: usize },

    /// Configuration or scenario file could not be read
    #[error("failed to read {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration or scenario file could not be written
    #[error("failed to write {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parse failure
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// TOML serialization failure
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Scenario refers to something that cannot be simulated
    #[error("invalid scenario: {0}")]
    Scenario(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AdapterError::ConnectionLost { port: 1 };
        assert_eq!(err.to_string(), "controller on port 1 stopped responding");

        let err = AdapterError::UnsupportedDevice {
            port: 0,
            family: DeviceFamily::Drum,
        };
        assert_eq!(err.to_string(), "unsupported device on port 0: DRUM");

        let err = AdapterError::InvalidPort { port: 7 };
        assert_eq!(err.to_string(), "invalid port index 7");
    }

    #[test]
    fn test_parse_error_conversion() {
        let parse: std::result::Result<toml::Value, _> = toml::from_str("= broken");
        let err: AdapterError = parse.unwrap_err().into();
        assert!(matches!(err, AdapterError::ConfigParse(_)));
    }
}
