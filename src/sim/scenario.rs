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

//! Scripted input scenarios
//!
//! A scenario is a TOML list of steps replayed against an adapter whose two
//! ports are [`SimulatedExtension`]s. Every step is followed by one poll
//! cycle; `wait` runs additional cycles without touching the inputs.
//!
//! ```toml
//! [[step]]
//! action = "attach"
//! port = 0
//! device = "classic"
//!
//! [[step]]
//! action = "classic"
//! port = 0
//! a = true
//! left_x = 200
//!
//! [[step]]
//! action = "wait"
//! cycles = 3
//!
//! [[step]]
//! action = "detach"
//! port = 0
//! ```

use super::{SimDevice, SimulatedExtension};
use crate::core::adapter::{Adapter, HostReport, PollSummary};
use crate::core::bus::{ClassicFields, ExtensionPort, GuitarFields, NunchukFields};
use crate::core::display::StatusDisplay;
use crate::core::error::{AdapterError, Result};
use serde::Deserialize;
use std::path::Path;

/// Adapter driven by simulated ports
pub type SimAdapter<D> = Adapter<ExtensionPort<SimulatedExtension>, D>;

/// One scripted action
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    /// Plug a device into a port
    Attach { port: usize, device: SimDevice },
    /// Unplug the device from a port
    Detach { port: usize },
    /// Set the inputs of a classic controller
    Classic {
        port: usize,
        #[serde(flatten)]
        fields: ClassicFields,
    },
    /// Set the inputs of a nunchuk
    Nunchuk {
        port: usize,
        #[serde(flatten)]
        fields: NunchukFields,
    },
    /// Set the inputs of a guitar
    Guitar {
        port: usize,
        #[serde(flatten)]
        fields: GuitarFields,
    },
    /// Poll without changing anything
    Wait { cycles: u32 },
}

/// Parsed scenario file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Scenario {
    #[serde(rename = "step", default)]
    pub steps: Vec<Step>,
}

/// What the runner reports after each poll cycle
#[derive(Debug, Clone, Copy)]
pub struct CycleRecord {
    /// Zero-based cycle number
    pub cycle: usize,
    pub summary: PollSummary,
    pub report: HostReport,
}

impl Scenario {
    /// Parse a scenario from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| AdapterError::Scenario(e.to_string()))
    }

    /// Load a scenario file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| AdapterError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Number of poll cycles the scenario runs
    pub fn cycles(&self) -> usize {
        self.steps
            .iter()
            .map(|step| match step {
                Step::Wait { cycles } => *cycles as usize,
                _ => 1,
            })
            .sum()
    }

    /// Replay every step against `adapter`
    ///
    /// `on_cycle` is called after every poll cycle.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::InvalidPort`] when a step names a port that
    /// does not exist; steps before it have already been applied.
    pub fn run<D, F>(&self, adapter: &mut SimAdapter<D>, mut on_cycle: F) -> Result<()>
    where
        D: StatusDisplay,
        F: FnMut(&CycleRecord),
    {
        let mut cycle = 0;
        for step in &self.steps {
            log::debug!("Scenario step {:?}", step);
            let polls = apply(step, adapter)?;
            for _ in 0..polls {
                let summary = adapter.poll();
                on_cycle(&CycleRecord {
                    cycle,
                    summary,
                    report: adapter.report(),
                });
                cycle += 1;
            }
        }
        Ok(())
    }
}

/// Apply one step and return how many cycles to poll afterwards
fn apply<D: StatusDisplay>(step: &Step, adapter: &mut SimAdapter<D>) -> Result<u32> {
    match *step {
        Step::Attach { port, device } => sim(adapter, port)?.attach(device),
        Step::Detach { port } => sim(adapter, port)?.detach(),
        Step::Classic { port, fields } => sim(adapter, port)?.set_classic(fields),
        Step::Nunchuk { port, fields } => sim(adapter, port)?.set_nunchuk(fields),
        Step::Guitar { port, fields } => sim(adapter, port)?.set_guitar(fields),
        Step::Wait { cycles } => return Ok(cycles),
    }
    Ok(1)
}

fn sim<D: StatusDisplay>(adapter: &mut SimAdapter<D>, port: usize) -> Result<&mut SimulatedExtension> {
    Ok(adapter.bus_mut(port)?.transport_mut())
}
