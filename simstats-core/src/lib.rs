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

//! simstats core - cross-backend GPU performance counter reconciliation
//!
//! This crate turns the statistics reported by a hardware profiler, the
//! simulator under development and two reference simulators into directly
//! comparable tables:
//!
//! - Unit correction of backend-specific L2 counters
//! - Combination of per-run metrics into one union-schema table
//! - Gold-run selection and mean aggregation of repeated runs
//! - Pivoted backend-vs-backend comparison views

pub mod aggregate;
pub mod benchmarks;
pub mod combine;
pub mod config;
pub mod error;
pub mod human;
pub mod metrics;
pub mod normalize;
pub mod pipeline;
pub mod pivot;
pub mod select;
pub mod targets;

pub use aggregate::{AggregatedRecord, Aggregator, GroupKey};
pub use benchmarks::{BenchmarkRegistry, RunDescriptor};
pub use combine::{CombinedTable, Combiner, MetricRecord};
pub use config::Config;
pub use error::{Result, SimStatsError};
pub use metrics::{Metric, MetricFrame, MetricValues, ParamValue};
pub use normalize::ScaleNormalizer;
pub use pipeline::{GenerateReport, Pipeline};
pub use pivot::{PivotedView, Pivoter, RowKey};
pub use select::RunSelector;
pub use targets::{AdapterRegistry, BackendAdapter, GpuConfig, Target};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the simstats core library with logging
pub fn init() -> Result<()> {
    // Try to initialize logger, but don't fail if already initialized
    let _ = env_logger::try_init();
    log::info!("simstats core v{} initialized", VERSION);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init() {
        assert!(init().is_ok());
        // repeated initialization is harmless
        assert!(init().is_ok());
    }

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.1.0");
    }
}
