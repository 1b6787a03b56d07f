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

//! Configuration management for simstats

use crate::benchmarks::BenchmarkRegistry;
use crate::targets::Target;
use crate::{Result, SimStatsError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Global configuration for the reconciliation pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub normalization: NormalizationConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub benchmarks: BenchmarkRegistry,
}

/// Unit-correction settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizationConfig {
    #[serde(default)]
    pub l2_scale: L2Scale,
}

/// L2 counter correction factor per backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct L2Scale {
    pub profile: f64,
    /// Sub-partitions per aggregate L2 slice on the simulated GPU
    pub simulate: f64,
    pub accelsim_simulate: f64,
    pub playground_simulate: f64,
}

impl L2Scale {
    /// No correction on any backend
    pub fn identity() -> Self {
        Self {
            profile: 1.0,
            simulate: 1.0,
            accelsim_simulate: 1.0,
            playground_simulate: 1.0,
        }
    }

    pub fn for_target(&self, target: Target) -> f64 {
        match target {
            Target::Profile => self.profile,
            Target::Simulate => self.simulate,
            Target::AccelsimSimulate => self.accelsim_simulate,
            Target::PlaygroundSimulate => self.playground_simulate,
        }
    }
}

impl Default for L2Scale {
    fn default() -> Self {
        Self {
            simulate: 4.0,
            ..Self::identity()
        }
    }
}

/// Run selection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Execution mode treated as the trusted deterministic run
    #[serde(default = "default_gold_mode")]
    pub gold_mode: String,
    /// Restrict comparisons to these backends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<Target>>,
}

fn default_gold_mode() -> String {
    "serial".to_string()
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            gold_mode: default_gold_mode(),
            targets: None,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| SimStatsError::Configuration(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| SimStatsError::Configuration(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration for consistency
    pub fn validate(&self) -> Result<()> {
        for target in Target::ALL {
            let factor = self.normalization.l2_scale.for_target(target);
            if !factor.is_finite() || factor <= 0.0 {
                return Err(SimStatsError::Configuration(format!(
                    "l2 scale for {} must be a positive finite number, got {}",
                    target, factor
                )));
            }
        }

        if self.selection.gold_mode.is_empty() {
            return Err(SimStatsError::Configuration(
                "gold_mode must not be empty".to_string(),
            ));
        }

        if let Some(targets) = &self.selection.targets {
            if targets.is_empty() {
                return Err(SimStatsError::Configuration(
                    "target allow-list must not be empty when given".to_string(),
                ));
            }
        }

        self.benchmarks.validate()
    }

    /// Named presets for known GPU configurations
    pub fn preset(name: &str) -> Result<Self> {
        let mut config = Self::default();

        match name.to_lowercase().as_str() {
            "gtx1080" => {
                config.normalization.l2_scale = L2Scale::default();
            }
            "identity" => {
                config.normalization.l2_scale = L2Scale::identity();
            }
            _ => {
                return Err(SimStatsError::Configuration(format!(
                    "unknown preset: {}",
                    name
                )));
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.normalization.l2_scale.simulate, 4.0);
        assert_eq!(config.selection.gold_mode, "serial");
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.selection.targets = Some(vec![Target::Profile, Target::Simulate]);
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(
            config.normalization.l2_scale,
            deserialized.normalization.l2_scale
        );
        assert_eq!(deserialized.selection.targets, config.selection.targets);
        assert_eq!(deserialized.benchmarks, config.benchmarks);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [normalization.l2_scale]
            simulate = 2.0
            "#,
        )
        .unwrap();
        assert_eq!(config.normalization.l2_scale.simulate, 2.0);
        assert_eq!(config.normalization.l2_scale.profile, 1.0);
        assert_eq!(config.selection.gold_mode, "serial");
        assert!(config.benchmarks.contains("vectorAdd"));
    }

    #[test]
    fn test_config_file_operations() {
        let config = Config::default();
        let temp_file = NamedTempFile::new().unwrap();

        config.save(temp_file.path()).unwrap();
        let loaded = Config::load(temp_file.path()).unwrap();

        assert_eq!(
            config.normalization.l2_scale,
            loaded.normalization.l2_scale
        );
    }

    #[test]
    fn test_invalid_scale() {
        let mut config = Config::default();
        config.normalization.l2_scale.profile = 0.0;
        assert!(config.validate().is_err());

        config.normalization.l2_scale.profile = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_presets() {
        let identity = Config::preset("identity").unwrap();
        assert_eq!(identity.normalization.l2_scale, L2Scale::identity());
        assert!(Config::preset("GTX1080").is_ok());
        assert!(Config::preset("invalid_preset").is_err());
    }
}
