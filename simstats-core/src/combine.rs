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

//! Combination of per-run metric frames into one union-schema table

use crate::benchmarks::{input_column, BenchmarkRegistry, INPUT_MODE_COLUMN};
use crate::metrics::{Metric, MetricFrame, MetricValues, ParamValue};
use crate::targets::Target;
use crate::{Result, SimStatsError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One measured (sub-)run tagged with where it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub target: Target,
    pub benchmark: String,
    /// Missing for rows imported without an input index
    pub input_id: Option<u64>,
    /// Prefixed input columns; only those relevant to this benchmark
    pub inputs: BTreeMap<String, ParamValue>,
    pub metrics: MetricValues,
}

impl MetricRecord {
    /// Value of a prefixed input column, `None` when missing
    pub fn input(&self, column: &str) -> Option<&ParamValue> {
        self.inputs.get(column)
    }

    /// Execution mode of the run, if the backend has one
    pub fn input_mode(&self) -> Option<&ParamValue> {
        self.input(INPUT_MODE_COLUMN)
    }
}

/// Append-only table of combined records with the union of their columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredTable")]
pub struct CombinedTable {
    rows: Vec<MetricRecord>,
    input_columns: BTreeSet<String>,
    metric_columns: BTreeSet<Metric>,
}

/// Serialized table as read back; every row is revalidated on load
#[derive(Deserialize)]
struct StoredTable {
    rows: Vec<MetricRecord>,
    #[serde(default)]
    input_columns: BTreeSet<String>,
    #[serde(default)]
    metric_columns: BTreeSet<Metric>,
}

impl TryFrom<StoredTable> for CombinedTable {
    type Error = SimStatsError;

    fn try_from(stored: StoredTable) -> Result<Self> {
        let mut table = CombinedTable::new();
        for row in stored.rows {
            table.push(row)?;
        }
        // declared columns without values stay part of the schema
        table.input_columns.extend(stored.input_columns);
        table.metric_columns.extend(stored.metric_columns);
        Ok(table)
    }
}

/// A row of the canonical flat on-disk schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRow {
    pub target: Target,
    pub benchmark: String,
    pub input_id: Option<u64>,
    /// Every column of the table; missing values are `null`
    #[serde(flatten)]
    pub columns: BTreeMap<String, Option<serde_json::Value>>,
}

impl CombinedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, widening the column union as needed
    pub fn push(&mut self, record: MetricRecord) -> Result<()> {
        for (metric, value) in record.metrics.iter() {
            if !value.is_finite() || value < 0.0 {
                return Err(SimStatsError::numeric(
                    format!("{}/{}/{}", record.target, record.benchmark, metric),
                    format!("metric values must be finite and non-negative, got {}", value),
                ));
            }
        }
        self.input_columns.extend(record.inputs.keys().cloned());
        self.metric_columns.extend(record.metrics.metrics());
        self.rows.push(record);
        Ok(())
    }

    pub fn rows(&self) -> &[MetricRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn input_columns(&self) -> impl Iterator<Item = &str> {
        self.input_columns.iter().map(|c| c.as_str())
    }

    pub fn metric_columns(&self) -> impl Iterator<Item = Metric> + '_ {
        self.metric_columns.iter().copied()
    }

    /// Flatten into `target, benchmark, input_id, input_*, <metric>*` rows.
    /// Columns a row does not carry are explicit nulls.
    pub fn flat_rows(&self) -> Result<Vec<FlatRow>> {
        self.rows
            .iter()
            .map(|row| {
                let mut columns = BTreeMap::new();
                for column in &self.input_columns {
                    let value = row
                        .input(column)
                        .map(|value| {
                            value.to_json().map_err(|reason| {
                                SimStatsError::numeric(
                                    format!("{}/{}/{}", row.target, row.benchmark, column),
                                    reason,
                                )
                            })
                        })
                        .transpose()?;
                    columns.insert(column.clone(), value);
                }
                for metric in &self.metric_columns {
                    let value = row.metrics.get(*metric).map(serde_json::Value::from);
                    columns.insert(metric.name().to_string(), value);
                }
                Ok(FlatRow {
                    target: row.target,
                    benchmark: row.benchmark.clone(),
                    input_id: row.input_id,
                    columns,
                })
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.flat_rows()?)?)
    }
}

/// Tags metric frames with their run identity and input parameters
pub struct Combiner<'a> {
    registry: &'a BenchmarkRegistry,
    table: CombinedTable,
}

impl<'a> Combiner<'a> {
    pub fn new(registry: &'a BenchmarkRegistry) -> Self {
        Self {
            registry,
            table: CombinedTable::new(),
        }
    }

    /// Cross join the run's single parameter row with every sub-row of its
    /// frame and append the result.
    pub fn add_run(
        &mut self,
        frame: &MetricFrame,
        params: &BTreeMap<String, ParamValue>,
        target: Target,
        benchmark: &str,
        input_id: Option<u64>,
    ) -> Result<usize> {
        let inputs: BTreeMap<String, ParamValue> = params
            .iter()
            .map(|(key, value)| (input_column(key), value.clone()))
            .collect();

        // declared parameters are part of the schema even when a run omits them
        if let Ok(declared) = self.registry.input_columns(benchmark) {
            for column in declared {
                if !inputs.contains_key(&column) {
                    log::debug!("{}@{:?} has no value for {}", benchmark, input_id, column);
                }
                self.table.input_columns.insert(column);
            }
        } else {
            log::debug!("{} is not registered; keeping its inputs as given", benchmark);
        }

        if frame.is_empty() {
            log::warn!(
                "[{}] {}@{:?} produced no metric rows",
                target,
                benchmark,
                input_id
            );
        }

        for metrics in &frame.rows {
            self.table.push(MetricRecord {
                target,
                benchmark: benchmark.to_string(),
                input_id,
                inputs: inputs.clone(),
                metrics: metrics.clone(),
            })?;
        }
        Ok(frame.len())
    }

    pub fn finish(self) -> CombinedTable {
        log::info!(
            "Combined {} row(s) with {} input and {} metric column(s)",
            self.table.len(),
            self.table.input_columns.len(),
            self.table.metric_columns.len()
        );
        self.table
    }
}
