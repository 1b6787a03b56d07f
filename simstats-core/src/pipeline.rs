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

//! Pipeline orchestrating statistics generation and comparison views

use crate::aggregate::Aggregator;
use crate::benchmarks::RunDescriptor;
use crate::combine::{CombinedTable, Combiner};
use crate::config::Config;
use crate::normalize::ScaleNormalizer;
use crate::pivot::{PivotedView, Pivoter};
use crate::select::RunSelector;
use crate::targets::{AdapterRegistry, GpuConfig, ParsedTarget, Target};
use crate::{Result, SimStatsError};
use serde::{Deserialize, Serialize};

/// A descriptor that was skipped during generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRun {
    pub benchmark: String,
    pub target: String,
    pub input_idx: u64,
    pub reason: String,
}

/// Outcome of [`Pipeline::generate`]
#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    pub table: CombinedTable,
    pub skipped: Vec<SkippedRun>,
}

/// Reconciliation pipeline over a set of backend adapters
pub struct Pipeline {
    config: Config,
    adapters: AdapterRegistry,
    gpu: GpuConfig,
}

impl Pipeline {
    /// Create a pipeline; the configuration is validated up front
    pub fn new(config: Config, adapters: AdapterRegistry, gpu: GpuConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            adapters,
            gpu,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Collect, normalize and combine the statistics of every run.
    ///
    /// Runs naming an unknown target are skipped and reported; any other
    /// failure aborts generation.
    pub fn generate(&self, runs: &[RunDescriptor]) -> Result<GenerateReport> {
        log::info!("Generating statistics for {} run(s)", runs.len());

        let normalizer = ScaleNormalizer::new(self.config.normalization.l2_scale.clone());
        let mut combiner = Combiner::new(&self.config.benchmarks);
        let mut skipped = Vec::new();

        for run in runs {
            let target = match Target::parse(&run.target) {
                ParsedTarget::Known(target) => target,
                ParsedTarget::Unknown(name) => {
                    let err = SimStatsError::UnknownTarget {
                        benchmark: run.name.clone(),
                        target: name.clone(),
                    };
                    log::warn!("{}@{}: {}, skipping", run.name, run.input_idx, err);
                    skipped.push(SkippedRun {
                        benchmark: run.name.clone(),
                        target: name,
                        input_idx: run.input_idx,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            log::debug!("[{}] {}@{} {:?}", target, run.name, run.input_idx, run.values);

            let adapter = self.adapters.get(target)?;
            let mut frame = adapter.collect(&self.gpu, run)?;
            for row in frame.rows.iter_mut() {
                row.fill_derived();
            }
            let frame = normalizer.normalize_frame(target, &frame);

            combiner.add_run(&frame, &run.values, target, &run.name, Some(run.input_idx))?;
        }

        if !skipped.is_empty() {
            log::warn!("Skipped {} run(s) with unknown targets", skipped.len());
        }

        Ok(GenerateReport {
            table: combiner.finish(),
            skipped,
        })
    }

    /// Comparison view of one benchmark using the configured target filter
    pub fn view(&self, table: &CombinedTable, benchmark: &str) -> Result<PivotedView> {
        self.view_targets(table, benchmark, self.config.selection.targets.clone())
    }

    /// Comparison view of one benchmark restricted to `targets`
    pub fn view_targets(
        &self,
        table: &CombinedTable,
        benchmark: &str,
        targets: Option<Vec<Target>>,
    ) -> Result<PivotedView> {
        // fail early on unregistered benchmarks, even with no rows to group
        self.config.benchmarks.params(benchmark)?;

        let selector = RunSelector::new(&self.config.selection).with_targets(targets);
        let selected = selector.select(table, benchmark)?;
        let aggregated = Aggregator::new(&self.config.benchmarks).aggregate(&selected)?;
        Pivoter::new().pivot(&aggregated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{Metric, MetricFrame, MetricValues};
    use crate::targets::BackendAdapter;

    struct CyclesAdapter {
        target: Target,
        cycles: f64,
    }

    impl BackendAdapter for CyclesAdapter {
        fn target(&self) -> Target {
            self.target
        }

        fn collect(&self, _config: &GpuConfig, _run: &RunDescriptor) -> Result<MetricFrame> {
            Ok(MetricFrame::single(
                MetricValues::new()
                    .with(Metric::Cycles, self.cycles)
                    .with(Metric::L2ReadHits, 1.0)
                    .with(Metric::L2WriteHits, 2.0),
            ))
        }
    }

    fn pipeline() -> Pipeline {
        let mut adapters = AdapterRegistry::new();
        adapters.register(Box::new(CyclesAdapter {
            target: Target::Profile,
            cycles: 100.0,
        }));
        adapters.register(Box::new(CyclesAdapter {
            target: Target::Simulate,
            cycles: 110.0,
        }));
        Pipeline::new(Config::default(), adapters, GpuConfig::default()).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.selection.gold_mode.clear();
        let result = Pipeline::new(config, AdapterRegistry::new(), GpuConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_generate_derives_and_normalizes() {
        let runs = vec![
            RunDescriptor::new("babelstream", "profile", 0).with_value("size", 1024i64),
            RunDescriptor::new("babelstream", "simulate", 0)
                .with_value("size", 1024i64)
                .with_value("mode", "serial"),
        ];
        let pipeline = pipeline();
        assert_eq!(pipeline.config().normalization.l2_scale.simulate, 4.0);
        let report = pipeline.generate(&runs).unwrap();
        assert!(report.skipped.is_empty());

        let rows = report.table.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].metrics.get(Metric::L2Hits), Some(3.0));
        assert_eq!(rows[1].metrics.get(Metric::L2Hits), Some(12.0));
        assert_eq!(rows[1].metrics.get(Metric::Cycles), Some(110.0));
    }

    #[test]
    fn test_missing_adapter_is_fatal() {
        let runs = vec![RunDescriptor::new("babelstream", "AccelsimSimulate", 0)];
        let result = pipeline().generate(&runs);
        assert!(matches!(result, Err(SimStatsError::UnsupportedTarget { .. })));
    }

    #[test]
    fn test_view_unknown_benchmark() {
        let runs = vec![RunDescriptor::new("babelstream", "simulate", 0).with_value("mode", "serial")];
        let p = pipeline();
        let report = p.generate(&runs).unwrap();
        let result = p.view(&report.table, "nbody");
        assert!(matches!(result, Err(SimStatsError::UnknownBenchmark { .. })));
    }
}
