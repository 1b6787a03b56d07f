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

//! Mean aggregation of repeated runs

use crate::benchmarks::BenchmarkRegistry;
use crate::combine::MetricRecord;
use crate::metrics::{Metric, MetricValues, ParamValue};
use crate::targets::Target;
use crate::{Result, SimStatsError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Identity of a group of repeated runs
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub target: Target,
    pub benchmark: String,
    pub input_id: Option<u64>,
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.input_id {
            Some(id) => write!(f, "[{}] {}@{}", self.target, self.benchmark, id),
            None => write!(f, "[{}] {}@?", self.target, self.benchmark),
        }
    }
}

/// Mean statistics of one (target, benchmark, input_id) group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRecord {
    pub key: GroupKey,
    /// Declared input columns of the benchmark, `None` when missing
    pub inputs: BTreeMap<String, Option<ParamValue>>,
    pub metrics: MetricValues,
    /// Number of runs reduced into this record
    pub runs: usize,
}

/// Arithmetic mean that refuses to produce NaN or infinities
pub fn checked_mean(values: &[f64]) -> std::result::Result<f64, String> {
    if values.is_empty() {
        return Err("mean of zero values".to_string());
    }
    let mut sum = 0.0f64;
    for value in values {
        if !value.is_finite() {
            return Err(format!("invalid operand {}", value));
        }
        sum += value;
        if !sum.is_finite() {
            return Err("overflow while summing".to_string());
        }
    }
    let mean = sum / values.len() as f64;
    if !mean.is_finite() {
        return Err(format!("invalid mean {}", mean));
    }
    Ok(mean)
}

/// Reduces selected rows to one record per group
pub struct Aggregator<'a> {
    registry: &'a BenchmarkRegistry,
}

impl<'a> Aggregator<'a> {
    pub fn new(registry: &'a BenchmarkRegistry) -> Self {
        Self { registry }
    }

    /// Aggregate rows, visiting groups in key order and members in input
    /// order so the result is reproducible.
    pub fn aggregate(&self, rows: &[&MetricRecord]) -> Result<Vec<AggregatedRecord>> {
        let mut groups: BTreeMap<GroupKey, Vec<&MetricRecord>> = BTreeMap::new();
        for &row in rows {
            let key = GroupKey {
                target: row.target,
                benchmark: row.benchmark.clone(),
                input_id: row.input_id,
            };
            groups.entry(key).or_default().push(row);
        }

        let mut aggregated = Vec::with_capacity(groups.len());
        for (key, members) in groups {
            let columns = self.registry.input_columns(&key.benchmark)?;
            let inputs = shared_inputs(&key, &columns, &members)?;
            let metrics = mean_metrics(&key, &members)?;
            log::debug!("{}: reduced {} run(s)", key, members.len());
            aggregated.push(AggregatedRecord {
                key,
                inputs,
                metrics,
                runs: members.len(),
            });
        }

        log::info!(
            "Aggregated {} row(s) into {} group(s)",
            rows.len(),
            aggregated.len()
        );
        Ok(aggregated)
    }
}

/// Input parameters must be constant within a group
fn shared_inputs(
    key: &GroupKey,
    columns: &[String],
    members: &[&MetricRecord],
) -> Result<BTreeMap<String, Option<ParamValue>>> {
    let mut inputs = BTreeMap::new();
    for column in columns {
        let first = members[0].input(column);
        if let Some(other) = members.iter().map(|m| m.input(column)).find(|v| *v != first) {
            return Err(SimStatsError::schema(
                key.to_string(),
                format!(
                    "input column {} differs within group ({:?} vs {:?})",
                    column, first, other
                ),
            ));
        }
        inputs.insert(column.clone(), first.cloned());
    }
    Ok(inputs)
}

fn mean_metrics(key: &GroupKey, members: &[&MetricRecord]) -> Result<MetricValues> {
    let present: BTreeSet<Metric> = members.iter().flat_map(|m| m.metrics.metrics()).collect();

    let mut means = MetricValues::new();
    for metric in present {
        let values: Vec<f64> = members
            .iter()
            .filter_map(|m| m.metrics.get(metric))
            .collect();
        if values.len() != members.len() {
            return Err(SimStatsError::numeric(
                format!("{}/{}", key, metric),
                format!(
                    "metric present in only {} of {} run(s)",
                    values.len(),
                    members.len()
                ),
            ));
        }
        let mean = checked_mean(&values)
            .map_err(|reason| SimStatsError::numeric(format!("{}/{}", key, metric), reason))?;
        means.set(metric, mean);
    }
    Ok(means)
}
