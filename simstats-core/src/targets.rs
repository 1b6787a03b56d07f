// Copyright 2025 Gibran Rodriguez <brangi000@gmail.com>
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

//! Execution backends and the adapter dispatch table

use crate::benchmarks::RunDescriptor;
use crate::metrics::MetricFrame;
use crate::{Result, SimStatsError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Backends that produce performance measurements
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Target {
    /// Hardware profiler on a real GPU
    Profile,
    /// Cycle-level simulator under development
    Simulate,
    /// Accel-Sim reference simulator
    AccelsimSimulate,
    /// Playground reference simulator
    PlaygroundSimulate,
}

impl Target {
    pub const ALL: [Target; 4] = [
        Target::Profile,
        Target::Simulate,
        Target::AccelsimSimulate,
        Target::PlaygroundSimulate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Target::Profile => "Profile",
            Target::Simulate => "Simulate",
            Target::AccelsimSimulate => "AccelsimSimulate",
            Target::PlaygroundSimulate => "PlaygroundSimulate",
        }
    }

    /// Case-insensitive parse of a descriptor's target field
    pub fn parse(name: &str) -> ParsedTarget {
        match name.to_lowercase().as_str() {
            "profile" => ParsedTarget::Known(Target::Profile),
            "simulate" => ParsedTarget::Known(Target::Simulate),
            "accelsimsimulate" => ParsedTarget::Known(Target::AccelsimSimulate),
            "playgroundsimulate" => ParsedTarget::Known(Target::PlaygroundSimulate),
            _ => ParsedTarget::Unknown(name.to_string()),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of parsing a target string; unrecognized names are kept distinct
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedTarget {
    Known(Target),
    Unknown(String),
}

/// Opaque GPU configuration handed through to adapters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GpuConfig(pub serde_json::Value);

/// Contract every backend implements: turn one run into its metric frame
pub trait BackendAdapter {
    /// Backend this adapter extracts statistics for
    fn target(&self) -> Target;

    /// Extract the metrics for a single benchmark run
    fn collect(&self, config: &GpuConfig, run: &RunDescriptor) -> Result<MetricFrame>;
}

/// Dispatch table from target to its adapter
pub struct AdapterRegistry {
    adapters: HashMap<Target, Box<dyn BackendAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Register an adapter under the target it reports, replacing any
    /// previous adapter for that target.
    pub fn register(&mut self, adapter: Box<dyn BackendAdapter>) {
        let target = adapter.target();
        if self.adapters.insert(target, adapter).is_some() {
            log::debug!("Replaced adapter for {}", target);
        }
    }

    pub fn get(&self, target: Target) -> Result<&dyn BackendAdapter> {
        self.adapters
            .get(&target)
            .map(|a| a.as_ref())
            .ok_or_else(|| SimStatsError::UnsupportedTarget {
                target: target.to_string(),
            })
    }

    /// Registered targets in canonical order
    pub fn targets(&self) -> Vec<Target> {
        Target::ALL
            .iter()
            .copied()
            .filter(|t| self.adapters.contains_key(t))
            .collect()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
