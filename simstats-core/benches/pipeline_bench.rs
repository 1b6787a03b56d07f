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

//! Performance benchmarks for the aggregation and pivot stages

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use simstats_core::{
    Aggregator, BenchmarkRegistry, CombinedTable, Combiner, Metric, MetricFrame, MetricValues,
    ParamValue, Pivoter, RunSelector, Target,
};
use std::collections::BTreeMap;

fn create_table(inputs: u64, repetitions: usize) -> (BenchmarkRegistry, CombinedTable) {
    let registry = BenchmarkRegistry::default();
    let mut combiner = Combiner::new(&registry);

    for target in Target::ALL {
        for input_idx in 0..inputs {
            let mut params = BTreeMap::new();
            params.insert("dtype".to_string(), ParamValue::Int(32));
            params.insert("length".to_string(), ParamValue::Int(1 << input_idx));
            if target == Target::Simulate {
                params.insert("mode".to_string(), ParamValue::from("serial"));
            }

            let rows = (0..repetitions)
                .map(|rep| {
                    Metric::ALL
                        .iter()
                        .map(|m| (*m, (input_idx as usize * 100 + rep) as f64))
                        .collect::<MetricValues>()
                })
                .collect();
            combiner
                .add_run(
                    &MetricFrame::new(rows),
                    &params,
                    target,
                    "vectorAdd",
                    Some(input_idx),
                )
                .expect("valid synthetic metrics");
        }
    }

    let table = combiner.finish();
    (registry, table)
}

fn bench_aggregation(c: &mut Criterion) {
    let (registry, table) = create_table(16, 10);
    let selector = RunSelector::default();

    c.bench_function("aggregate_vector_add_16x10", |b| {
        b.iter(|| {
            let selected = selector.select(black_box(&table), "vectorAdd").unwrap();
            let aggregated = Aggregator::new(&registry).aggregate(&selected).unwrap();
            black_box(aggregated)
        })
    });
}

fn bench_full_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("comparison_view");

    for inputs in [4u64, 16, 32].iter() {
        let (registry, table) = create_table(*inputs, 5);
        let selector = RunSelector::default();

        group.bench_with_input(format!("{}_inputs", inputs), inputs, |b, _| {
            b.iter(|| {
                let selected = selector.select(black_box(&table), "vectorAdd").unwrap();
                let aggregated = Aggregator::new(&registry).aggregate(&selected).unwrap();
                let view = Pivoter::new().pivot(&aggregated).unwrap();
                black_box(view.render())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_aggregation, bench_full_view);
criterion_main!(benches);
