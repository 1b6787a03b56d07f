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

//! Per-backend unit correction of L2 counters
//!
//! The simulator under development counts L2 events per memory
//! sub-partition instead of per aggregate cache, so its raw counts are a
//! fixed factor smaller than the reference backends report.

use crate::combine::MetricRecord;
use crate::config::L2Scale;
use crate::metrics::{MetricFrame, MetricValues};
use crate::targets::Target;

/// Applies the configured L2 correction factor of each backend
#[derive(Debug, Clone, Default)]
pub struct ScaleNormalizer {
    scale: L2Scale,
}

impl ScaleNormalizer {
    pub fn new(scale: L2Scale) -> Self {
        Self { scale }
    }

    pub fn factor(&self, target: Target) -> f64 {
        self.scale.for_target(target)
    }

    /// Scale the L2 counts of one row; every other metric passes through
    pub fn normalize_values(&self, target: Target, values: &MetricValues) -> MetricValues {
        let factor = self.factor(target);
        let mut scaled = values.clone();
        if factor == 1.0 {
            return scaled;
        }
        for (metric, value) in scaled.values_mut() {
            if metric.is_l2_count() {
                *value *= factor;
            }
        }
        scaled
    }

    pub fn normalize_frame(&self, target: Target, frame: &MetricFrame) -> MetricFrame {
        log::debug!(
            "Normalizing {} row(s) of {} with L2 factor {}",
            frame.len(),
            target,
            self.factor(target)
        );
        MetricFrame::new(
            frame
                .rows
                .iter()
                .map(|row| self.normalize_values(target, row))
                .collect(),
        )
    }

    /// Normalize an already-tagged record using its own target
    pub fn normalize_record(&self, record: &MetricRecord) -> MetricRecord {
        MetricRecord {
            metrics: self.normalize_values(record.target, &record.metrics),
            ..record.clone()
        }
    }
}
