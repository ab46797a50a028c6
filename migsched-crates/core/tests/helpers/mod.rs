#![allow(dead_code, reason = "not every test file uses every helper")]

use std::collections::BTreeSet;

use itertools::Itertools;
use migsched_core::options::SolverOptions;
use migsched_core::options::TaskSchedulerOptions;
use migsched_core::results::IteratedSolution;
use migsched_core::results::Solution;
use migsched_core::termination::Indefinite;
use migsched_core::variables::DomainId;
use migsched_core::Solver;

/// A solver which keeps every solution; the start dominance rule would drop some of them.
pub(crate) fn exhaustive_solver() -> Solver {
    Solver::with_options(SolverOptions {
        task_scheduler: TaskSchedulerOptions {
            start_upper_bound_dominance: false,
            ..TaskSchedulerOptions::default()
        },
        ..SolverOptions::default()
    })
}

/// Enumerates every solution of `solver`, each projected onto `variables`.
pub(crate) fn enumerate_solutions(solver: &mut Solver, variables: &[DomainId]) -> Vec<Vec<i32>> {
    enumerate_full_solutions(solver)
        .into_iter()
        .map(|solution| {
            variables
                .iter()
                .map(|&variable| solution.get_integer_value(variable))
                .collect()
        })
        .collect()
}

pub(crate) fn enumerate_full_solutions(solver: &mut Solver) -> Vec<Solution> {
    let mut brancher = solver.default_brancher();
    let mut termination = Indefinite;
    let mut iterator = solver.get_solution_iterator(&mut brancher, &mut termination);

    let mut solutions = Vec::new();
    loop {
        match iterator.next_solution() {
            IteratedSolution::Solution(solution) => solutions.push(solution),
            IteratedSolution::Finished | IteratedSolution::Unsatisfiable => break,
            IteratedSolution::Unknown => panic!("the search cannot be stopped without a budget"),
        }
    }
    solutions
}

/// Every assignment of values to the given domains which `accept`s.
pub(crate) fn brute_force(
    domains: &[Vec<i32>],
    accept: impl Fn(&[i32]) -> bool,
) -> BTreeSet<Vec<i32>> {
    assert!(!domains.is_empty(), "there must be at least one variable");
    domains
        .iter()
        .map(|domain| domain.iter().copied())
        .multi_cartesian_product()
        .filter(|values| accept(values))
        .collect()
}

/// Asserts that the enumerated solutions are exactly the expected ones, each found once.
pub(crate) fn assert_same_solutions(found: Vec<Vec<i32>>, expected: BTreeSet<Vec<i32>>) {
    let num_found = found.len();
    let found = found.into_iter().collect::<BTreeSet<_>>();
    assert_eq!(num_found, found.len(), "a solution was reported twice");

    let missing = expected.difference(&found).collect::<Vec<_>>();
    let extra = found.difference(&expected).collect::<Vec<_>>();
    assert!(
        missing.is_empty() && extra.is_empty(),
        "missing solutions {missing:?}, unexpected solutions {extra:?}"
    );
}
