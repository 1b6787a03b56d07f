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

//! Gold-run selection
//!
//! Only the simulator under development has several execution modes. Its
//! serial mode is the one comparable against the single-shot backends,
//! which carry no mode at all.

use crate::combine::{CombinedTable, MetricRecord};
use crate::config::SelectionConfig;
use crate::targets::Target;
use crate::{Result, SimStatsError};

/// Picks the rows of a benchmark that are eligible for aggregation
#[derive(Debug, Clone)]
pub struct RunSelector {
    gold_mode: String,
    targets: Option<Vec<Target>>,
}

impl RunSelector {
    pub fn new(config: &SelectionConfig) -> Self {
        Self {
            gold_mode: config.gold_mode.clone(),
            targets: config.targets.clone(),
        }
    }

    /// Replace the target allow-list
    pub fn with_targets(mut self, targets: Option<Vec<Target>>) -> Self {
        self.targets = targets;
        self
    }

    fn is_gold(&self, row: &MetricRecord) -> bool {
        row.input_mode().and_then(|m| m.as_str()) == Some(self.gold_mode.as_str())
    }

    /// A row is eligible iff it has no mode XOR its mode is the gold mode
    pub fn is_selected(&self, row: &MetricRecord) -> bool {
        let without_mode = row.input_mode().is_none();
        without_mode ^ self.is_gold(row)
    }

    fn is_allowed(&self, target: Target) -> bool {
        self.targets
            .as_ref()
            .map_or(true, |targets| targets.contains(&target))
    }

    /// Rows of `benchmark` eligible for aggregation, in table order.
    ///
    /// Fails when the table holds no gold run at all.
    pub fn select<'t>(
        &self,
        table: &'t CombinedTable,
        benchmark: &str,
    ) -> Result<Vec<&'t MetricRecord>> {
        let gold_rows = table.rows().iter().filter(|r| self.is_gold(r)).count();
        if gold_rows == 0 {
            return Err(SimStatsError::MissingGoldRun {
                benchmark: benchmark.to_string(),
                gold_mode: self.gold_mode.clone(),
            });
        }

        let selected: Vec<_> = table
            .rows()
            .iter()
            .filter(|r| r.benchmark == benchmark)
            .filter(|r| self.is_allowed(r.target))
            .filter(|r| self.is_selected(r))
            .collect();

        log::debug!(
            "Selected {} row(s) of {} ({} gold row(s) in table)",
            selected.len(),
            benchmark,
            gold_rows
        );
        Ok(selected)
    }
}

impl Default for RunSelector {
    fn default() -> Self {
        Self::new(&SelectionConfig::default())
    }
}
