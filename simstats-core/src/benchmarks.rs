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

//! Benchmark run descriptors and the per-benchmark input schema registry

use crate::metrics::ParamValue;
use crate::{Result, SimStatsError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix applied to input parameter names so they never collide with
/// metric columns
pub const INPUT_PREFIX: &str = "input_";

/// Input column carrying the execution mode of a run
pub const INPUT_MODE_COLUMN: &str = "input_mode";

/// Prefix a raw parameter name into its table column name
pub fn input_column(param: &str) -> String {
    format!("{}{}", INPUT_PREFIX, param)
}

/// One materialized benchmark-run configuration as produced by the
/// manifest loader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunDescriptor {
    /// Benchmark name
    pub name: String,
    /// Target name as written in the manifest (parsed case-insensitively)
    pub target: String,
    /// Index of the input configuration for this target
    pub input_idx: u64,
    /// Benchmark-specific input values
    #[serde(default)]
    pub values: BTreeMap<String, ParamValue>,
}

impl RunDescriptor {
    pub fn new(name: impl Into<String>, target: impl Into<String>, input_idx: u64) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            input_idx,
            values: BTreeMap::new(),
        }
    }

    /// Builder-style input value
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

/// Registry of the ordered input parameters that distinguish runs of each
/// benchmark. Parameters not listed (such as the execution mode) take part
/// in combination but not in the comparison index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BenchmarkRegistry {
    params: BTreeMap<String, Vec<String>>,
}

impl BenchmarkRegistry {
    /// Empty registry
    pub fn empty() -> Self {
        Self {
            params: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, benchmark: impl Into<String>, params: Vec<String>) {
        self.params.insert(benchmark.into(), params);
    }

    pub fn contains(&self, benchmark: &str) -> bool {
        self.params.contains_key(benchmark)
    }

    /// Raw (unprefixed) parameter names of a benchmark
    pub fn params(&self, benchmark: &str) -> Result<&[String]> {
        self.params
            .get(benchmark)
            .map(|p| p.as_slice())
            .ok_or_else(|| SimStatsError::UnknownBenchmark {
                benchmark: benchmark.to_string(),
            })
    }

    /// Prefixed input column names of a benchmark, in declaration order
    pub fn input_columns(&self, benchmark: &str) -> Result<Vec<String>> {
        Ok(self
            .params(benchmark)?
            .iter()
            .map(|p| input_column(p))
            .collect())
    }

    pub fn benchmarks(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(|s| s.as_str())
    }

    pub fn validate(&self) -> Result<()> {
        for (benchmark, params) in &self.params {
            if benchmark.is_empty() {
                return Err(SimStatsError::Configuration(
                    "benchmark names must not be empty".to_string(),
                ));
            }
            let mut seen = std::collections::BTreeSet::new();
            for param in params {
                if param.is_empty() || !seen.insert(param.as_str()) {
                    return Err(SimStatsError::Configuration(format!(
                        "invalid or duplicate input parameter {:?} for {}",
                        param, benchmark
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for BenchmarkRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        let builtin: [(&str, &[&str]); 5] = [
            ("vectorAdd", &["dtype", "length"]),
            ("matrixmul", &["dtype", "rows"]),
            ("simple_matrixmul", &["dtype", "m", "n", "p"]),
            ("transpose", &["dim", "variant"]),
            ("babelstream", &["size"]),
        ];
        for (name, params) in builtin {
            registry.register(name, params.iter().map(|p| p.to_string()).collect());
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = BenchmarkRegistry::default();
        assert_eq!(
            registry.input_columns("vectorAdd").unwrap(),
            vec!["input_dtype", "input_length"]
        );
        assert_eq!(registry.params("simple_matrixmul").unwrap().len(), 4);
        assert_eq!(
            registry.benchmarks().collect::<Vec<_>>(),
            vec!["babelstream", "matrixmul", "simple_matrixmul", "transpose", "vectorAdd"]
        );
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn test_unknown_benchmark() {
        let registry = BenchmarkRegistry::default();
        assert!(matches!(
            registry.params("nbody"),
            Err(SimStatsError::UnknownBenchmark { .. })
        ));
    }

    #[test]
    fn test_duplicate_param_rejected() {
        let mut registry = BenchmarkRegistry::empty();
        registry.register("custom", vec!["size".to_string(), "size".to_string()]);
        assert!(registry.validate().is_err());
    }

    #[test]
    fn test_descriptor_deserialize() {
        let json = r#"{"name": "vectorAdd", "target": "Simulate", "input_idx": 2,
                       "values": {"dtype": 32, "length": 100, "mode": "serial"}}"#;
        let run: RunDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(run.input_idx, 2);
        assert_eq!(run.values.get("mode"), Some(&ParamValue::from("serial")));
    }
}
