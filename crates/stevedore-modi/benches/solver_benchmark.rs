// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;
use stevedore_core::parallel::Parallelism;
use stevedore_model::{generator::InstanceGenerator, problem::TransportProblem};
use stevedore_modi::{solver::ModiSolverBuilder, vam::Vam};

const SIZES: [usize; 3] = [25, 50, 100];
const DEGREES: [usize; 3] = [1, 2, 4];

fn instance(size: usize) -> TransportProblem<f64> {
    let mut generator = InstanceGenerator::with_default_limits(ChaCha8Rng::seed_from_u64(42));
    generator
        .generate(size, size)
        .unwrap_or_else(|e| panic!("Failed to generate a {0}x{0} instance: {1}", size, e))
}

fn bench_initial_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("vam");
    for size in SIZES {
        let problem = instance(size);
        group.throughput(Throughput::Elements((size * size) as u64));
        for degree in DEGREES {
            let parallelism = Parallelism::with_degree(degree).unwrap();
            group.bench_with_input(
                BenchmarkId::new(format!("{0}x{0}", size), degree),
                &problem,
                |b, problem| b.iter(|| black_box(Vam::new(problem, parallelism.clone()).search())),
            );
        }
    }
    group.finish();
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("modi");
    group.sample_size(10);
    for size in SIZES {
        let problem = instance(size);
        group.throughput(Throughput::Elements((size * size) as u64));
        for degree in DEGREES {
            let solver = ModiSolverBuilder::new().with_degree(degree).unwrap().build();
            group.bench_with_input(
                BenchmarkId::new(format!("{0}x{0}", size), degree),
                &problem,
                |b, problem| {
                    b.iter(|| {
                        let outcome = solver.solve(problem).unwrap();
                        black_box(outcome.total_cost())
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_initial_plan, bench_solve);
criterion_main!(benches);
