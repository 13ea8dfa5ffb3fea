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

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use stevedore_core::parallel::Parallelism;
use stevedore_model::{
    generator::{InstanceGenerator, ValueLimits},
    point::Point,
    problem::TransportProblem,
};
use stevedore_modi::{
    cycle::CycleSearcher,
    perturbation::EpsilonPerturbation,
    potentials::{Potentials, PotentialsCalculator},
    result::ModiOutcome,
    solver::{ModiSolver, ModiSolverBuilder, SolveError},
    vam::Vam,
};

const DEGREES: [usize; 3] = [1, 2, 4];

fn solver(degree: usize) -> ModiSolver {
    ModiSolverBuilder::new()
        .with_degree(degree)
        .unwrap()
        .with_max_pivots(100_000)
        .build()
}

fn generated(seed: u64, sources: usize, destinations: usize) -> TransportProblem<f64> {
    let mut generator = InstanceGenerator::with_default_limits(ChaCha8Rng::seed_from_u64(seed));
    generator.generate(sources, destinations).unwrap()
}

fn assert_feasible_and_optimal(problem: &TransportProblem<f64>, outcome: &ModiOutcome<f64>) {
    let allocation = outcome.allocation();
    let supply: Vec<u64> = problem.supply().iter().map(|&s| u64::from(s)).collect();
    let demand: Vec<u64> = problem.demand().iter().map(|&d| u64::from(d)).collect();
    assert_eq!(allocation.row_sums(), supply);
    assert_eq!(allocation.col_sums(), demand);
    assert_eq!(allocation.count_basic(), problem.basis_size());

    let n = problem.num_destinations();
    for index in 0..problem.num_sources() * n {
        let point = Point::from_index(index, n);
        let reduced = outcome.potentials().reduced_cost(problem, point);
        if allocation.is_basic(point) {
            assert!(reduced.abs() < 1e-9, "basic cell {} has reduced cost {}", point, reduced);
        } else {
            assert!(reduced >= 0.0, "cell {} has reduced cost {}", point, reduced);
        }
    }
}

#[test]
fn test_generated_instances_agree_across_strategies() {
    for (seed, (m, n)) in [(3, 4), (5, 5), (8, 6), (7, 12), (15, 15)].into_iter().enumerate() {
        let problem = generated(seed as u64, m, n);
        let reference = solver(1).solve(&problem).unwrap();
        assert_feasible_and_optimal(&problem, &reference);

        for degree in &DEGREES[1..] {
            let outcome = solver(*degree).solve(&problem).unwrap();
            assert_eq!(
                outcome.allocation().quantities(),
                reference.allocation().quantities(),
                "degree {} disagrees on instance {}",
                degree,
                seed
            );
            assert_eq!(outcome.total_cost(), reference.total_cost());
            assert_eq!(outcome.pivots(), reference.pivots());
            assert_eq!(outcome.potentials(), reference.potentials());
        }
    }
}

#[test]
fn test_initial_plans_agree_across_strategies() {
    for seed in 0..10u64 {
        let problem = generated(100 + seed, 9, 7);
        let reference = Vam::new(&problem, Parallelism::sequential()).search();
        for degree in &DEGREES[1..] {
            let parallelism = Parallelism::with_degree(*degree).unwrap();
            assert_eq!(Vam::new(&problem, parallelism).search(), reference);
        }
    }
}

#[test]
fn test_square_unit_instances_are_repaired_identically() {
    let limits = ValueLimits::new(10..11, 10..11, 1.0..50.0).unwrap();
    for seed in 0..8u64 {
        let mut generator = InstanceGenerator::new(ChaCha8Rng::seed_from_u64(seed), limits.clone());
        let problem: TransportProblem<f64> = generator.generate(6, 6).unwrap();
        assert_eq!(problem.num_sources(), 6);
        assert_eq!(problem.num_destinations(), 6);

        let mut outcomes = Vec::new();
        for degree in DEGREES {
            let parallelism = Parallelism::with_degree(degree).unwrap();
            let mut allocation = Vam::new(&problem, parallelism.clone()).search();
            let missing = problem.basis_size() - allocation.count_basic();
            let mut searcher = CycleSearcher::new(6, 6, parallelism.clone());
            let mut perturbation = EpsilonPerturbation::new(&problem, parallelism);

            let repaired = perturbation.try_perturb(&mut allocation, &mut searcher, missing);
            if repaired {
                assert_eq!(allocation.count_basic(), problem.basis_size());
            }
            outcomes.push((repaired, allocation));
        }
        assert!(outcomes.windows(2).all(|pair| pair[0] == pair[1]));

        let solved: Vec<Result<_, SolveError>> = DEGREES
            .into_iter()
            .map(|degree| solver(degree).solve(&problem).map(|o| o.into_allocation()))
            .collect();
        assert!(solved.windows(2).all(|pair| pair[0] == pair[1]));
    }
}

#[test]
fn test_f32_costs_are_supported() {
    let problem = TransportProblem::<f32>::from_rows(
        &[[8.0f32, 13.0, 4.0, 7.0], [11.0, 14.0, 6.0, 10.0], [6.0, 12.0, 8.0, 9.0]],
        &[12, 17, 11],
        &[10, 10, 10, 10],
    )
    .unwrap();
    for degree in DEGREES {
        let outcome = solver(degree).solve(&problem).unwrap();
        assert_eq!(outcome.total_cost(), 324.0);
    }
}

// Drives the phases one pivot at a time and returns the cost after every pivot.
fn pivot_costs(problem: &TransportProblem<f64>, parallelism: Parallelism) -> Vec<f64> {
    let (m, n) = (problem.num_sources(), problem.num_destinations());
    let mut allocation = Vam::new(problem, parallelism.clone()).search();
    let mut searcher = CycleSearcher::new(m, n, parallelism.clone());
    let missing = problem.basis_size() - allocation.count_basic();
    let mut perturbation = EpsilonPerturbation::new(problem, parallelism.clone());
    assert!(perturbation.try_perturb(&mut allocation, &mut searcher, missing));

    let mut calculator = PotentialsCalculator::new(m, n, parallelism);
    let mut potentials = Potentials::zeros(m, n);
    let mut costs = vec![allocation.total_cost(problem.cost())];
    for _ in 0..10_000 {
        assert_eq!(calculator.calc_potentials(problem, &allocation, &mut potentials), m + n);

        let mut entering: Option<(f64, Point)> = None;
        for index in 0..m * n {
            let point = Point::from_index(index, n);
            if allocation.is_basic(point) {
                continue;
            }
            let reduced = potentials.reduced_cost(problem, point);
            if reduced < -1e-9 && entering.is_none_or(|(best, _)| reduced < best) {
                entering = Some((reduced, point));
            }
        }
        let Some((_, point)) = entering else {
            return costs;
        };

        let cycle = searcher.search_closed(&mut allocation, point).unwrap();
        let outcome = allocation.pivot(cycle);
        assert_eq!(outcome.entering, point);
        assert_eq!(allocation.count_basic(), problem.basis_size());
        costs.push(allocation.total_cost(problem.cost()));
    }
    panic!("no optimum after 10000 pivots");
}

#[test]
fn test_pivots_never_increase_cost() {
    let mut pivots = 0;
    for seed in 0..20u64 {
        let problem = generated(200 + seed, 8, 9);
        let reference = pivot_costs(&problem, Parallelism::sequential());
        for pair in reference.windows(2) {
            assert!(
                pair[1] <= pair[0] + 1e-6,
                "pivot raised cost from {} to {}",
                pair[0],
                pair[1]
            );
        }
        pivots += reference.len() - 1;

        let parallel = pivot_costs(&problem, Parallelism::with_degree(3).unwrap());
        assert_eq!(parallel, reference);
    }
    assert!(pivots > 0);
}
