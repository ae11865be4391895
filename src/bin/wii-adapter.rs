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

//! wii-adapter entry point
//!
//! Replays a scripted scenario through two simulated extension ports and
//! prints what the host report layer would receive.

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use wii_adapter::core::adapter::Adapter;
use wii_adapter::core::bus::ExtensionPort;
use wii_adapter::core::config::AdapterConfig;
use wii_adapter::core::display::LogDisplay;
use wii_adapter::core::frame::CanonicalFrame;
use wii_adapter::core::port::ConnectionEvent;
use wii_adapter::sim::scenario::{CycleRecord, Scenario, Step};
use wii_adapter::sim::SimulatedExtension;

/// Default configuration file, next to the working directory
const DEFAULT_CONFIG: &str = "wii-adapter.toml";

#[derive(Parser)]
#[command(
    name = "wii-adapter",
    version,
    about = "Two-port Wii extension controller adapter simulator"
)]
struct Cli {
    /// Adapter configuration file (TOML)
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Scenario to replay (TOML list of [[step]] entries)
    #[arg(long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Print one JSON object per cycle instead of text
    #[arg(long)]
    json: bool,

    /// Idle cycles to run after the scenario
    #[arg(long, default_value = "1", value_name = "N")]
    cycles: u32,

    /// Write the effective configuration to this file and exit
    #[arg(long, value_name = "FILE")]
    write_config: Option<PathBuf>,
}

#[derive(Serialize)]
struct CycleLine<'a> {
    cycle: usize,
    any_state_changed: bool,
    idle_hint_micros: u32,
    events: [ConnectionEvent; 2],
    emitted: [bool; 2],
    frames: &'a [CanonicalFrame; 2],
}

fn print_text(record: &CycleRecord) {
    let summary = &record.summary;
    println!(
        "cycle {:>4}  changed={:<5}  idle={}us",
        record.cycle, summary.any_state_changed, summary.idle_hint_micros
    );
    for (index, (poll, frame)) in summary.ports.iter().zip(record.report.frames.iter()).enumerate() {
        if !poll.diff.any() && poll.event != ConnectionEvent::Connected {
            continue;
        }
        println!(
            "  P{} {:<15} dpad={:04b} buttons={:016b} L=({:3},{:3}) R=({:3},{:3}) T=({:3},{:3})",
            index + 1,
            format!("{:?}", poll.event),
            frame.dpad.bits(),
            frame.buttons.bits(),
            frame.left_x,
            frame.left_y,
            frame.right_x,
            frame.right_y,
            frame.left_trigger,
            frame.right_trigger,
        );
    }
}

fn print_json(record: &CycleRecord) -> Result<(), serde_json::Error> {
    let summary = &record.summary;
    let line = CycleLine {
        cycle: record.cycle,
        any_state_changed: summary.any_state_changed,
        idle_hint_micros: summary.idle_hint_micros,
        events: [summary.ports[0].event, summary.ports[1].event],
        emitted: [summary.ports[0].diff.any(), summary.ports[1].diff.any()],
        frames: &record.report.frames,
    };
    println!("{}", serde_json::to_string(&line)?);
    Ok(())
}

/// Info by default; `filters` (the `RUST_LOG` syntax) take precedence
fn log_builder(filters: Option<&str>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(log::LevelFilter::Info);
    if let Some(filters) = filters {
        builder.parse_filters(filters);
    }
    builder
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging
    let filters = std::env::var(env_logger::DEFAULT_FILTER_ENV).ok();
    log_builder(filters.as_deref()).init();

    let cli = Cli::parse();

    let config = AdapterConfig::load_or_default(&cli.config);
    if let Some(path) = &cli.write_config {
        config.save(path)?;
        log::info!("Configuration written to {}", path.display());
        return Ok(());
    }

    let mut scenario = match &cli.scenario {
        Some(path) => {
            log::info!("Scenario: {}", path.display());
            Scenario::load(path)?
        }
        None => Scenario::default(),
    };
    scenario.steps.push(Step::Wait { cycles: cli.cycles });

    let mut adapter = Adapter::with_display(
        [
            ExtensionPort::new(SimulatedExtension::empty()),
            ExtensionPort::new(SimulatedExtension::empty()),
        ],
        LogDisplay::new(),
        config.resolve(),
    );

    log::info!("Running {} cycles...", scenario.cycles());

    let mut output: Result<(), serde_json::Error> = Ok(());
    scenario.run(&mut adapter, |record| {
        if cli.json {
            if output.is_ok() {
                output = print_json(record);
            }
        } else {
            print_text(record);
        }
    })?;
    output?;

    Ok(())
}
