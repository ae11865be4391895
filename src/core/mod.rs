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

//! Adapter core
//!
//! # Poll Cycle
//!
//! ```text
//! ExtensionBus ─► Port session ─► decoder ─► normalizer ─► frame::diff ─► host
//!  (liveness)     (state machine)  (RawReport) (CanonicalFrame)  (latch)
//! ```
//!
//! - [`bus`]: extension bus capability and the register-level reference port
//! - [`port`]: per-port connection, calibration and trigger-mode state
//! - [`decoder`]: family-specific field mapping into a [`decoder::RawReport`]
//! - [`normalizer`]: drift compensation and rescaling of analog readings
//! - [`frame`]: canonical frame layout and change detection
//! - [`adapter`]: two-port poll loop
//! - [`display`]: optional status display
//! - [`config`]: configuration file and resolved runtime settings
//! - [`error`]: error types

pub mod adapter;
pub mod bus;
pub mod config;
pub mod decoder;
pub mod display;
pub mod error;
pub mod frame;
pub mod normalizer;
pub mod port;

#[cfg(test)]
mod tests;
