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

//! wii-adapter: a two-port Wii extension controller adapter core
//!
//! Polls up to two extension controllers (Classic Controller, Nunchuk, guitar)
//! and reduces their reports to one fixed-shape gamepad frame per port.
//!
//! # Architecture
//!
//! - [`core`]: port sessions, decoding, analog normalization, change detection
//! - [`sim`]: register-level simulated controllers and scripted scenarios
//!
//! # Example
//!
//! ```
//! use wii_adapter::core::adapter::Adapter;
//! use wii_adapter::core::bus::{ClassicFields, ExtensionPort};
//! use wii_adapter::core::config::AdapterConfig;
//! use wii_adapter::core::frame::Buttons;
//! use wii_adapter::sim::SimulatedExtension;
//!
//! let settings = AdapterConfig::default().resolve();
//! let mut adapter = Adapter::new(
//!     [
//!         ExtensionPort::new(SimulatedExtension::classic()),
//!         ExtensionPort::new(SimulatedExtension::empty()),
//!     ],
//!     settings,
//! );
//!
//! adapter.poll(); // connect
//! adapter.bus_mut(0)?.transport_mut().set_classic(ClassicFields {
//!     plus: true,
//!     ..ClassicFields::default()
//! });
//!
//! let summary = adapter.poll();
//! assert!(summary.any_state_changed);
//! assert_eq!(adapter.frame(0)?.buttons, Buttons::S2);
//! # Ok::<(), wii_adapter::AdapterError>(())
//! ```
//!
//! # Error Handling
//!
//! Fallible operations return [`core::error::Result<T>`], an alias for
//! `Result<T, AdapterError>`. The poll loop itself never fails.

pub mod core;
pub mod sim;

// Re-export commonly used types
pub use core::error::{AdapterError, Result};
