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

//! Error handling for simstats

use thiserror::Error;

/// Result type alias for simstats operations
pub type Result<T> = std::result::Result<T, SimStatsError>;

/// Error types raised while reconciling backend statistics
#[derive(Error, Debug)]
pub enum SimStatsError {
    /// Non-fatal at pipeline level: the descriptor is skipped and reported.
    #[error("Unknown target {target} for benchmark {benchmark}")]
    UnknownTarget { benchmark: String, target: String },

    #[error("No gold run (input_mode == \"{gold_mode}\") available to compare {benchmark}")]
    MissingGoldRun { benchmark: String, gold_mode: String },

    #[error("Numeric integrity violated for {context}: {reason}")]
    NumericIntegrity { context: String, reason: String },

    #[error("Schema mismatch for {context}: {reason}")]
    SchemaMismatch { context: String, reason: String },

    #[error("Benchmark not registered: {benchmark}")]
    UnknownBenchmark { benchmark: String },

    #[error("No backend adapter registered for target {target}")]
    UnsupportedTarget { target: String },

    #[error("Backend adapter for {target} failed: {message}")]
    Adapter { target: String, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SimStatsError {
    /// Whether the pipeline may skip the offending record and continue
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SimStatsError::UnknownTarget { .. })
    }

    pub(crate) fn numeric(context: impl Into<String>, reason: impl Into<String>) -> Self {
        SimStatsError::NumericIntegrity {
            context: context.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn schema(context: impl Into<String>, reason: impl Into<String>) -> Self {
        SimStatsError::SchemaMismatch {
            context: context.into(),
            reason: reason.into(),
        }
    }
}
