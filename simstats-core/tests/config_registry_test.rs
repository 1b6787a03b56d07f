// Configuration and benchmark registry integration tests
use simstats_core::benchmarks::RunDescriptor;
use simstats_core::config::L2Scale;
use simstats_core::targets::ParsedTarget;
use simstats_core::{
    AdapterRegistry, BackendAdapter, Config, GpuConfig, Metric, MetricFrame, MetricValues,
    ParamValue, Pipeline, Result, Target,
};
use std::io::Write;
use tempfile::NamedTempFile;

struct L2Adapter(Target);

impl BackendAdapter for L2Adapter {
    fn target(&self) -> Target {
        self.0
    }

    fn collect(&self, config: &GpuConfig, _run: &RunDescriptor) -> Result<MetricFrame> {
        let accesses = config.0["l2_accesses"].as_f64().unwrap_or(10.0);
        Ok(MetricFrame::single(
            MetricValues::new().with(Metric::L2Accesses, accesses),
        ))
    }
}

#[test]
fn test_target_names() {
    assert_eq!(Target::parse("profile"), ParsedTarget::Known(Target::Profile));
    assert_eq!(Target::Simulate.name(), "Simulate");
    assert_eq!(Target::ALL.len(), 4);
}

#[test]
fn test_config_from_toml_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[normalization.l2_scale]
simulate = 2.0
playground_simulate = 4.0

[selection]
gold_mode = "serial"
targets = ["Simulate", "PlaygroundSimulate"]

[benchmarks]
nbody = ["bodies", "steps"]
"#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.normalization.l2_scale.simulate, 2.0);
    assert_eq!(config.normalization.l2_scale.accelsim_simulate, 1.0);
    assert_eq!(
        config.selection.targets,
        Some(vec![Target::Simulate, Target::PlaygroundSimulate])
    );
    assert_eq!(
        config.benchmarks.input_columns("nbody").unwrap(),
        vec!["input_bodies", "input_steps"]
    );
    // a [benchmarks] table replaces the built-in registry
    assert!(!config.benchmarks.contains("vectorAdd"));
}

#[test]
fn test_malformed_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[normalization.l2_scale]\nsimulate = \"four\"\n").unwrap();
    assert!(Config::load(file.path()).is_err());
}

#[test]
fn test_custom_benchmark_and_scale() {
    let mut config = Config::default();
    config
        .benchmarks
        .register("nbody", vec!["bodies".to_string()]);
    config.normalization.l2_scale = L2Scale {
        playground_simulate: 3.0,
        ..L2Scale::identity()
    };

    let mut adapters = AdapterRegistry::new();
    for target in Target::ALL {
        adapters.register(Box::new(L2Adapter(target)));
    }
    let gpu = GpuConfig(serde_json::json!({ "l2_accesses": 5.0 }));
    let p = Pipeline::new(config, adapters, gpu).unwrap();

    let runs: Vec<RunDescriptor> = serde_json::from_str(
        r#"[
            {"name": "nbody", "target": "PlaygroundSimulate", "input_idx": 0, "values": {"bodies": 64}},
            {"name": "nbody", "target": "simulate", "input_idx": 0, "values": {"bodies": 64, "mode": "serial"}},
            {"name": "nbody", "target": "trace", "input_idx": 0, "values": {"bodies": 64}}
        ]"#,
    )
    .unwrap();
    let report = p.generate(&runs).unwrap();
    assert_eq!(report.skipped.len(), 1);

    let view = p.view(&report.table, "nbody").unwrap();
    let key = view.row_keys().next().unwrap().clone();
    assert_eq!(
        key.inputs,
        vec![("input_bodies".to_string(), Some(ParamValue::Int(64)))]
    );
    assert_eq!(
        view.get(&key, Metric::L2Accesses, Target::PlaygroundSimulate),
        Some(15.0)
    );
    assert_eq!(view.get(&key, Metric::L2Accesses, Target::Simulate), Some(5.0));
}
