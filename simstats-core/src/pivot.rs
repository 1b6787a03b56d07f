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

//! Backend-vs-backend comparison views
//!
//! Aggregated records are reshaped so that each row is one benchmark
//! configuration and each column is a (metric, target) pair.

use crate::aggregate::AggregatedRecord;
use crate::human::human_readable;
use crate::metrics::{Metric, ParamValue};
use crate::targets::Target;
use crate::{Result, SimStatsError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Row index of a comparison view: benchmark plus its declared inputs
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowKey {
    pub benchmark: String,
    /// Input columns in registry order, `None` when missing
    pub inputs: Vec<(String, Option<ParamValue>)>,
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.benchmark)?;
        for (_, value) in &self.inputs {
            match value {
                Some(value) => write!(f, "/{}", value)?,
                None => write!(f, "/-")?,
            }
        }
        Ok(())
    }
}

/// One cell of a view in long format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatCell {
    pub target: Target,
    pub benchmark: String,
    pub input_id: Option<u64>,
    pub metric: Metric,
    pub value: f64,
}

/// Comparison table indexed by [`RowKey`] with (metric, target) columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotedView {
    metrics: Vec<Metric>,
    targets: Vec<Target>,
    rows: BTreeMap<RowKey, PivotRow>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct PivotRow {
    cells: BTreeMap<(Metric, Target), f64>,
    /// Input id of the aggregated record behind each target
    origins: BTreeMap<Target, Option<u64>>,
}

impl PivotedView {
    /// Metric columns (outer header level) in canonical order
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Target columns (inner header level) in canonical order
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn row_keys(&self) -> impl Iterator<Item = &RowKey> {
        self.rows.keys()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell value; `None` when that backend has no data for the row
    pub fn get(&self, row: &RowKey, metric: Metric, target: Target) -> Option<f64> {
        self.rows
            .get(row)
            .and_then(|r| r.cells.get(&(metric, target)))
            .copied()
    }

    /// Restrict the view to the given metric columns, keeping their order
    pub fn select_metrics(&self, metrics: &[Metric]) -> PivotedView {
        let keep: BTreeSet<Metric> = metrics.iter().copied().collect();
        let rows = self
            .rows
            .iter()
            .map(|(key, row)| {
                let cells = row
                    .cells
                    .iter()
                    .filter(|((m, _), _)| keep.contains(m))
                    .map(|(k, v)| (*k, *v))
                    .collect();
                let row = PivotRow {
                    cells,
                    origins: row.origins.clone(),
                };
                (key.clone(), row)
            })
            .collect();
        PivotedView {
            metrics: metrics
                .iter()
                .copied()
                .filter(|m| self.metrics.contains(m))
                .collect(),
            targets: self.targets.clone(),
            rows,
        }
    }

    /// Unpivot back into one cell per (target, benchmark, input_id, metric)
    pub fn flatten(&self) -> Vec<FlatCell> {
        let mut cells = Vec::new();
        for (key, row) in &self.rows {
            for ((metric, target), value) in &row.cells {
                cells.push(FlatCell {
                    target: *target,
                    benchmark: key.benchmark.clone(),
                    input_id: row.origins.get(target).copied().flatten(),
                    metric: *metric,
                    value: *value,
                });
            }
        }
        cells
    }

    /// Export in long format
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.flatten())?)
    }

    /// Render transposed: one line per (metric, target), one column per row
    /// key. Missing cells are left blank.
    pub fn render(&self) -> String {
        let headers: Vec<String> = self.rows.keys().map(|k| k.to_string()).collect();
        let mut lines: Vec<(String, String, Vec<String>)> = Vec::new();
        for metric in &self.metrics {
            for target in &self.targets {
                let values = self
                    .rows
                    .values()
                    .map(|row| {
                        row.cells
                            .get(&(*metric, *target))
                            .map(|v| human_readable(*v))
                            .unwrap_or_default()
                    })
                    .collect();
                lines.push((metric.to_string(), target.to_string(), values));
            }
        }

        let metric_width = lines.iter().map(|l| l.0.len()).max().unwrap_or(0);
        let target_width = lines.iter().map(|l| l.1.len()).max().unwrap_or(0);
        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                lines
                    .iter()
                    .map(|l| l.2[i].len())
                    .chain(std::iter::once(h.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = format!("{:mw$}  {:tw$}", "", "", mw = metric_width, tw = target_width);
        for (header, width) in headers.iter().zip(&widths) {
            out.push_str(&format!("  {:>w$}", header, w = width));
        }
        out.push('\n');

        let mut previous_metric = String::new();
        for (metric, target, values) in &lines {
            // nested header: print each metric name once
            let label = if *metric == previous_metric { "" } else { metric.as_str() };
            out.push_str(&format!(
                "{:mw$}  {:tw$}",
                label,
                target,
                mw = metric_width,
                tw = target_width
            ));
            for (value, width) in values.iter().zip(&widths) {
                out.push_str(&format!("  {:>w$}", value, w = width));
            }
            out.push('\n');
            previous_metric = metric.clone();
        }
        out
    }
}

impl fmt::Display for PivotedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Reshapes aggregated records into a [`PivotedView`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Pivoter;

impl Pivoter {
    pub fn new() -> Self {
        Self
    }

    /// Pivot records; two records landing on the same row and target are a
    /// consistency error rather than an overwrite.
    pub fn pivot(&self, records: &[AggregatedRecord]) -> Result<PivotedView> {
        let mut rows: BTreeMap<RowKey, PivotRow> = BTreeMap::new();
        let mut metrics = BTreeSet::new();
        let mut targets = BTreeSet::new();

        for record in records {
            let key = RowKey {
                benchmark: record.key.benchmark.clone(),
                inputs: record
                    .inputs
                    .iter()
                    .map(|(c, v)| (c.clone(), v.clone()))
                    .collect(),
            };
            let target = record.key.target;
            let row = rows.entry(key).or_default();

            if let Some(existing) = row.origins.get(&target) {
                return Err(SimStatsError::schema(
                    record.key.to_string(),
                    format!(
                        "input id {:?} maps to the same comparison row as input id {:?}",
                        record.key.input_id, existing
                    ),
                ));
            }
            row.origins.insert(target, record.key.input_id);

            for (metric, value) in record.metrics.iter() {
                row.cells.insert((metric, target), value);
                metrics.insert(metric);
            }
            targets.insert(target);
        }

        log::info!(
            "Pivoted {} record(s) into {} row(s) x {} metric(s) x {} target(s)",
            records.len(),
            rows.len(),
            metrics.len(),
            targets.len()
        );

        Ok(PivotedView {
            metrics: metrics.into_iter().collect(),
            targets: targets.into_iter().collect(),
            rows,
        })
    }
}
