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

use stevedore_model::problem::TransportProblem;
use stevedore_modi::solver::ModiSolverBuilder;

#[test]
fn test_supply_dominated_instance_with_dummy_source() {
    // Demand short by 700 units is covered by a zero-cost dummy source.
    let problem = TransportProblem::from_rows(
        &[
            [2.0, 4.0, 6.0],
            [3.0, 8.0, 7.0],
            [4.0, 3.0, 8.0],
            [4.0, 6.0, 3.0],
            [2.0, 6.0, 5.0],
            [0.0, 0.0, 0.0],
        ],
        &[75, 345, 180, 90, 210, 700],
        &[850, 300, 450],
    )
    .unwrap();

    for degree in [1, 3] {
        let solver = ModiSolverBuilder::new().with_degree(degree).unwrap().build();
        let outcome = solver.solve(&problem).unwrap();
        assert_eq!(outcome.total_cost(), 2415.0);
        assert_eq!(outcome.allocation().row_sums(), vec![75, 345, 180, 90, 210, 700]);
        assert_eq!(outcome.allocation().col_sums(), vec![850, 300, 450]);
        assert!(outcome.statistics().final_cost <= outcome.statistics().initial_cost);
    }
}

#[test]
fn test_single_lane_problem() {
    let problem = TransportProblem::from_rows(&[[7.0]], &[5], &[5]).unwrap();
    let outcome = ModiSolverBuilder::new().build().solve(&problem).unwrap();
    assert_eq!(outcome.total_cost(), 35.0);
    assert_eq!(outcome.pivots(), 0);
    assert_eq!(outcome.allocation().count_basic(), 1);
}

#[test]
fn test_single_source_problem() {
    let problem = TransportProblem::from_rows(&[[3.0, 1.0, 2.0]], &[9], &[2, 3, 4]).unwrap();
    let outcome = ModiSolverBuilder::new().build().solve(&problem).unwrap();
    assert_eq!(outcome.total_cost(), 17.0);
    assert_eq!(outcome.allocation().count_basic(), 3);
}
