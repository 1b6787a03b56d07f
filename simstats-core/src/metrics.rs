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

//! Metric columns and scalar values shared by every pipeline stage

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Fixed set of performance counters reported by every backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    ExecTimeSec,
    Cycles,
    NumBlocks,
    Instructions,
    WarpInst,
    DramReads,
    DramWrites,
    L2Accesses,
    L2ReadHitRate,
    L2WriteHitRate,
    L2ReadMissRate,
    L2WriteMissRate,
    L2ReadHits,
    L2WriteHits,
    L2ReadMisses,
    L2WriteMisses,
    L2Hits,
    L2Misses,
}

impl Metric {
    /// All metric columns in canonical column order
    pub const ALL: [Metric; 18] = [
        Metric::ExecTimeSec,
        Metric::Cycles,
        Metric::NumBlocks,
        Metric::Instructions,
        Metric::WarpInst,
        Metric::DramReads,
        Metric::DramWrites,
        Metric::L2Accesses,
        Metric::L2ReadHitRate,
        Metric::L2WriteHitRate,
        Metric::L2ReadMissRate,
        Metric::L2WriteMissRate,
        Metric::L2ReadHits,
        Metric::L2WriteHits,
        Metric::L2ReadMisses,
        Metric::L2WriteMisses,
        Metric::L2Hits,
        Metric::L2Misses,
    ];

    /// Columns shown by the default comparison view
    pub const VIEW_DEFAULT: [Metric; 8] = [
        Metric::ExecTimeSec,
        Metric::Cycles,
        Metric::Instructions,
        Metric::DramReads,
        Metric::DramWrites,
        Metric::L2Accesses,
        Metric::L2Hits,
        Metric::L2Misses,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::ExecTimeSec => "exec_time_sec",
            Metric::Cycles => "cycles",
            Metric::NumBlocks => "num_blocks",
            Metric::Instructions => "instructions",
            Metric::WarpInst => "warp_inst",
            Metric::DramReads => "dram_reads",
            Metric::DramWrites => "dram_writes",
            Metric::L2Accesses => "l2_accesses",
            Metric::L2ReadHitRate => "l2_read_hit_rate",
            Metric::L2WriteHitRate => "l2_write_hit_rate",
            Metric::L2ReadMissRate => "l2_read_miss_rate",
            Metric::L2WriteMissRate => "l2_write_miss_rate",
            Metric::L2ReadHits => "l2_read_hits",
            Metric::L2WriteHits => "l2_write_hits",
            Metric::L2ReadMisses => "l2_read_misses",
            Metric::L2WriteMisses => "l2_write_misses",
            Metric::L2Hits => "l2_hits",
            Metric::L2Misses => "l2_misses",
        }
    }

    /// Look up a metric by its column name
    pub fn from_name(name: &str) -> Option<Metric> {
        Metric::ALL.iter().copied().find(|m| m.name() == name)
    }

    /// L2 event counts, the columns subject to per-backend unit correction.
    /// Rates are ratios and are scale-free.
    pub fn is_l2_count(&self) -> bool {
        matches!(
            self,
            Metric::L2Accesses
                | Metric::L2ReadHits
                | Metric::L2WriteHits
                | Metric::L2ReadMisses
                | Metric::L2WriteMisses
                | Metric::L2Hits
                | Metric::L2Misses
        )
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scalar benchmark input parameter (data type, size, variant, mode...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    /// Integers above `i64::MAX`
    UInt(u64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// JSON value of the parameter. Non-finite floats have no JSON form.
    pub fn to_json(&self) -> std::result::Result<serde_json::Value, String> {
        match self {
            ParamValue::Float(x) if !x.is_finite() => {
                Err(format!("non-finite parameter value {}", x))
            }
            other => serde_json::to_value(other).map_err(|e| e.to_string()),
        }
    }

    fn as_i128(&self) -> Option<i128> {
        match self {
            ParamValue::Int(i) => Some(i128::from(*i)),
            ParamValue::UInt(u) => Some(i128::from(*u)),
            _ => None,
        }
    }

    // Int and UInt share a rank and compare numerically
    fn rank(&self) -> u8 {
        match self {
            ParamValue::Bool(_) => 0,
            ParamValue::Int(_) | ParamValue::UInt(_) => 1,
            ParamValue::Float(_) => 2,
            ParamValue::Text(_) => 3,
        }
    }
}

// Floats use `total_cmp` so parameters can key groups and pivot rows.
impl PartialEq for ParamValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ParamValue {}

impl PartialOrd for ParamValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ParamValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (ParamValue::Bool(a), ParamValue::Bool(b)) => a.cmp(b),
            (ParamValue::Float(a), ParamValue::Float(b)) => a.total_cmp(b),
            (ParamValue::Text(a), ParamValue::Text(b)) => a.cmp(b),
            _ => match (self.as_i128(), other.as_i128()) {
                (Some(a), Some(b)) => a.cmp(&b),
                _ => self.rank().cmp(&other.rank()),
            },
        }
    }
}

impl Hash for ParamValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            ParamValue::Bool(b) => b.hash(state),
            ParamValue::Int(_) | ParamValue::UInt(_) => self.as_i128().hash(state),
            ParamValue::Float(f) => f.to_bits().hash(state),
            ParamValue::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::UInt(u) => write!(f, "{}", u),
            ParamValue::Float(x) => write!(f, "{}", x),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(ParamValue::UInt(value), ParamValue::Int)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

/// Metric values of a single (sub-)row. Absent metrics are missing, not zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricValues {
    values: BTreeMap<Metric, f64>,
}

impl MetricValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.values.insert(metric, value);
        self
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        self.values.insert(metric, value);
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied()
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.values.contains_key(&metric)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.values.iter().map(|(m, v)| (*m, *v))
    }

    pub fn metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = (&Metric, &mut f64)> {
        self.values.iter_mut()
    }

    /// Fill aggregate L2 hit/miss totals from the read/write split when a
    /// backend only reports the split counters.
    pub fn fill_derived(&mut self) {
        let pairs = [
            (Metric::L2Hits, Metric::L2ReadHits, Metric::L2WriteHits),
            (Metric::L2Misses, Metric::L2ReadMisses, Metric::L2WriteMisses),
        ];
        for (total, read, write) in pairs {
            if self.contains(total) {
                continue;
            }
            if let (Some(r), Some(w)) = (self.get(read), self.get(write)) {
                self.set(total, r + w);
            }
        }
    }
}

impl FromIterator<(Metric, f64)> for MetricValues {
    fn from_iter<I: IntoIterator<Item = (Metric, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Metrics an adapter reports for one run, possibly split into sub-rows
/// (one per kernel launch).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricFrame {
    pub rows: Vec<MetricValues>,
}

impl MetricFrame {
    pub fn new(rows: Vec<MetricValues>) -> Self {
        Self { rows }
    }

    pub fn single(values: MetricValues) -> Self {
        Self { rows: vec![values] }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
