#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use helpers::enumerate_full_solutions;
use helpers::enumerate_solutions;
use helpers::exhaustive_solver;
use migsched_core::constraints;
use migsched_core::constraints::ArgConsumingTask;
use migsched_core::constraints::ArgDemandingTask;
use migsched_core::constraints::ArgResource;
use migsched_core::constraints::SchedulingRule;
use migsched_core::constraints::StayingTask;
use migsched_core::results::SatisfactionResult;
use migsched_core::termination::Indefinite;
use migsched_core::termination::SearchBudget;
use migsched_core::variables::DomainId;
use migsched_core::ConstraintOperationError;
use migsched_core::Solver;

/// A single node with capacity 2, open during `[0, 5]`, which hosts one leaving and one arriving
/// virtual machine of usage 2.
fn swap_on_one_node(
    solver: &mut Solver,
    end: (i32, i32),
    start: (i32, i32),
) -> (DomainId, DomainId, SchedulingRule) {
    let end = solver.new_bounded_integer(end.0, end.1);
    let start = solver.new_bounded_integer(start.0, start.1);
    let placement = solver.new_bounded_integer(0, 0);
    let resource = ArgResource {
        capacity: vec![2],
        hosting_start: solver.new_bounded_integer(0, 0),
        hosting_end: solver.new_bounded_integer(5, 5),
    };
    let rule = constraints::task_scheduler(
        vec![resource],
        vec![ArgConsumingTask {
            resource: 0,
            usage: vec![2],
            end,
        }],
        vec![ArgDemandingTask {
            placement,
            usage: vec![2],
            start,
        }],
        vec![None],
    );
    (end, start, rule)
}

#[test]
fn arrival_waits_for_the_departure_on_a_full_node() {
    let mut solver = exhaustive_solver();
    let (end, start, rule) = swap_on_one_node(&mut solver, (0, 5), (0, 5));
    solver
        .add_constraint(rule.clone())
        .post()
        .expect("no conflict at the root");

    let solutions = enumerate_full_solutions(&mut solver);
    assert_eq!(21, solutions.len());
    for solution in solutions.iter() {
        assert!(solution.get_integer_value(start) >= solution.get_integer_value(end));
        assert_eq!(Ok(()), rule.check(solution));
    }
}

#[test]
fn fixed_arrival_bounds_the_departure() {
    let mut solver = Solver::default();
    let (end, _, rule) = swap_on_one_node(&mut solver, (0, 5), (3, 3));
    solver
        .add_constraint(rule)
        .post()
        .expect("no conflict at the root");

    assert_eq!(0, solver.lower_bound(end));
    assert_eq!(3, solver.upper_bound(end));
}

#[test]
fn fixed_departure_delays_the_arrival() {
    let mut solver = Solver::default();
    let (_, start, rule) = swap_on_one_node(&mut solver, (4, 4), (0, 5));
    solver
        .add_constraint(rule)
        .post()
        .expect("no conflict at the root");

    assert_eq!(4, solver.lower_bound(start));
}

#[test]
fn overloaded_node_is_infeasible_at_the_root() {
    let mut solver = Solver::default();
    let (_, _, rule) = swap_on_one_node(&mut solver, (4, 4), (0, 3));

    let result = solver.add_constraint(rule).post();
    assert_eq!(Err(ConstraintOperationError::InfeasiblePropagator), result);
    assert!(solver.is_infeasible());

    let x = solver.new_bounded_integer(0, 1);
    let y = solver.new_bounded_integer(0, 1);
    let result = solver
        .add_constraint(constraints::disjoint(vec![x], vec![y], 2))
        .post();
    assert_eq!(Err(ConstraintOperationError::InfeasibleState), result);

    let mut brancher = solver.default_brancher();
    assert_eq!(
        SatisfactionResult::Unsatisfiable,
        solver.satisfy(&mut brancher, &mut Indefinite)
    );
}

#[test]
fn disjoint_removes_a_taken_value() {
    let mut solver = Solver::default();
    let x = solver.new_bounded_integer(0, 0);
    let y = solver.new_bounded_integer(0, 1);
    let z = solver.new_sparse_integer(vec![0, 2]);

    solver
        .add_constraint(constraints::disjoint(vec![x], vec![y, z], 3))
        .post()
        .expect("no conflict at the root");

    assert_eq!(1, solver.lower_bound(y));
    assert_eq!(2, solver.lower_bound(z));
}

#[test]
fn disjoint_multiple_keeps_values_shared_within_a_group() {
    let mut solver = Solver::default();
    let first = vec![solver.new_bounded_integer(0, 0), solver.new_bounded_integer(0, 1)];
    let second = vec![solver.new_bounded_integer(1, 2)];
    let third = vec![solver.new_bounded_integer(1, 3)];

    solver
        .add_constraint(constraints::disjoint_multiple(
            vec![first.clone(), second.clone(), third.clone()],
            4,
        ))
        .post()
        .expect("no conflict at the root");

    let mut variables = first;
    variables.extend(second);
    variables.extend(third);
    let mut solutions = enumerate_solutions(&mut solver, &variables);
    solutions.sort();
    assert_eq!(
        vec![
            vec![0, 0, 1, 2],
            vec![0, 0, 1, 3],
            vec![0, 0, 2, 1],
            vec![0, 0, 2, 3],
            vec![0, 1, 2, 3],
        ],
        solutions
    );
}

#[test]
fn arrival_starts_after_the_tasks_on_its_host() {
    let mut solver = Solver::default();
    let placement = solver.new_bounded_integer(0, 0);
    let start = solver.new_bounded_integer(0, 10);
    let end = solver.new_bounded_integer(3, 6);

    solver
        .add_constraint(constraints::precedences(
            placement,
            start,
            vec![0],
            vec![end],
        ))
        .post()
        .expect("no conflict at the root");

    assert_eq!(3, solver.lower_bound(start));
}

#[test]
fn host_busy_beyond_the_latest_start_is_avoided() {
    let mut solver = Solver::default();
    let placement = solver.new_bounded_integer(0, 1);
    let start = solver.new_bounded_integer(0, 5);
    let end = solver.new_bounded_integer(8, 9);

    let rule = constraints::precedences(placement, start, vec![0], vec![end]);
    solver
        .add_constraint(rule.clone())
        .post()
        .expect("no conflict at the root");

    assert_eq!(1, solver.lower_bound(placement));
    for solution in enumerate_full_solutions(&mut solver).iter() {
        assert_eq!(Ok(()), rule.check(solution));
    }
}

/// A virtual machine which lives on node 0 and is placed on node 0 again. Nodes 0 and 1 have
/// capacity 3 and are open during `[0, 5]`.
struct Relocation {
    task: StayingTask,
    rules: Vec<SchedulingRule>,
}

fn relocation(solver: &mut Solver, usage_before: i32, usage_after: i32) -> Relocation {
    let schedule_end = solver.new_bounded_integer(5, 5);
    let task = StayingTask {
        current: 0,
        placement: solver.new_bounded_integer(0, 0),
        stays: solver.new_boolean(),
        duration: solver.new_bounded_integer(0, 3),
        non_increasing: usage_after <= usage_before,
        consuming_end: solver.new_bounded_integer(0, 5),
        demanding_start: solver.new_bounded_integer(0, 5),
    };
    let resources = (0..2)
        .map(|_| ArgResource {
            capacity: vec![3],
            hosting_start: solver.new_bounded_integer(0, 0),
            hosting_end: solver.new_bounded_integer(5, 5),
        })
        .collect();

    let rules = vec![
        constraints::task_scheduler(
            resources,
            vec![ArgConsumingTask {
                resource: 0,
                usage: vec![usage_before],
                end: task.consuming_end,
            }],
            vec![ArgDemandingTask {
                placement: task.placement,
                usage: vec![usage_after],
                start: task.demanding_start,
            }],
            vec![Some(0)],
        ),
        constraints::staying_tasks(vec![task], schedule_end),
    ];
    Relocation { task, rules }
}

#[test]
fn growing_entity_which_stays_is_allocated_at_the_end() {
    let mut solver = Solver::default();
    let Relocation { task, rules } = relocation(&mut solver, 1, 2);
    solver
        .add_constraint(rules.clone())
        .post()
        .expect("no conflict at the root");

    assert_eq!(5, solver.lower_bound(task.consuming_end));
    assert_eq!(5, solver.lower_bound(task.demanding_start));
    assert_eq!(1, solver.lower_bound(task.stays));
    assert_eq!(0, solver.upper_bound(task.duration));

    let solutions = enumerate_full_solutions(&mut solver);
    assert_eq!(1, solutions.len());
    for solution in solutions.iter() {
        for rule in rules.iter() {
            assert_eq!(Ok(()), rule.check(solution));
        }
    }
}

#[test]
fn shrinking_entity_which_stays_is_released_immediately() {
    let mut solver = Solver::default();
    let Relocation { task, rules } = relocation(&mut solver, 2, 1);
    solver
        .add_constraint(rules.clone())
        .post()
        .expect("no conflict at the root");

    assert_eq!(0, solver.upper_bound(task.consuming_end));
    assert_eq!(0, solver.upper_bound(task.demanding_start));
    assert_eq!(1, solver.lower_bound(task.stays));

    let solutions = enumerate_full_solutions(&mut solver);
    assert_eq!(1, solutions.len());
    for solution in solutions.iter() {
        for rule in rules.iter() {
            assert_eq!(Ok(()), rule.check(solution));
        }
    }
}

#[test]
fn entity_growing_to_the_full_capacity_is_not_released_early() {
    let mut solver = Solver::default();
    let Relocation { task, rules } = relocation(&mut solver, 1, 3);
    solver
        .add_constraint(rules.clone())
        .post()
        .expect("no conflict at the root");

    assert_eq!(5, solver.lower_bound(task.consuming_end));
    assert_eq!(5, solver.lower_bound(task.demanding_start));

    let solutions = enumerate_full_solutions(&mut solver);
    assert_eq!(1, solutions.len());
    for solution in solutions.iter() {
        for rule in rules.iter() {
            assert_eq!(Ok(()), rule.check(solution));
        }
    }
}

#[test]
fn entity_shrinking_from_the_full_capacity_is_released_before_it_arrives() {
    let mut solver = Solver::default();
    let Relocation { task, rules } = relocation(&mut solver, 3, 1);
    solver
        .add_constraint(rules.clone())
        .post()
        .expect("no conflict at the root");

    assert_eq!(0, solver.upper_bound(task.consuming_end));
    assert_eq!(0, solver.upper_bound(task.demanding_start));

    let solutions = enumerate_full_solutions(&mut solver);
    assert_eq!(1, solutions.len());
    for solution in solutions.iter() {
        assert!(
            solution.get_integer_value(task.consuming_end)
                <= solution.get_integer_value(task.demanding_start)
        );
        for rule in rules.iter() {
            assert_eq!(Ok(()), rule.check(solution));
        }
    }
}

#[test]
fn move_between_aliases_of_a_pool_never_overlaps() {
    let mut solver = exhaustive_solver();
    let horizon = solver.new_bounded_integer(4, 4);
    let end = solver.new_bounded_integer(0, 4);
    let placement = solver.new_bounded_integer(1, 1);
    let start = solver.new_bounded_integer(0, 4);

    let rule = constraints::aliased_cumulatives(
        vec![2],
        vec![0, 1],
        horizon,
        vec![ArgConsumingTask {
            resource: 0,
            usage: vec![2],
            end,
        }],
        vec![ArgDemandingTask {
            placement,
            usage: vec![2],
            start,
        }],
        vec![Some(0)],
    );
    solver
        .add_constraint(rule.clone())
        .post()
        .expect("no conflict at the root");

    let solutions = enumerate_full_solutions(&mut solver);
    assert_eq!(15, solutions.len());
    for solution in solutions.iter() {
        assert!(solution.get_integer_value(start) >= solution.get_integer_value(end));
        assert_eq!(Ok(()), rule.check(solution));
    }
}

#[test]
fn aliased_pool_bounds_the_horizon() {
    let mut solver = Solver::default();
    let horizon = solver.new_bounded_integer(0, 10);
    let first_end = solver.new_bounded_integer(4, 6);
    let second_end = solver.new_bounded_integer(0, 10);

    let rule = constraints::aliased_cumulatives(
        vec![2],
        vec![1, 3],
        horizon,
        vec![
            ArgConsumingTask {
                resource: 1,
                usage: vec![1],
                end: first_end,
            },
            ArgConsumingTask {
                resource: 2,
                usage: vec![1],
                end: second_end,
            },
        ],
        vec![],
        vec![],
    );
    solver
        .add_constraint(rule)
        .post()
        .expect("no conflict at the root");

    assert_eq!(4, solver.lower_bound(horizon));
    // Resource 2 is not an alias of the pool.
    assert_eq!(10, solver.upper_bound(second_end));
}

#[test]
fn exhausted_budget_leaves_the_outcome_unknown() {
    let mut solver = Solver::default();
    let (_, _, rule) = swap_on_one_node(&mut solver, (0, 5), (0, 5));
    solver
        .add_constraint(rule)
        .post()
        .expect("no conflict at the root");

    let mut brancher = solver.default_brancher();
    assert_eq!(
        SatisfactionResult::Unknown,
        solver.satisfy(&mut brancher, &mut SearchBudget::decisions(0))
    );

    // The solver is back at the root and can be solved again.
    let mut brancher = solver.default_brancher();
    assert!(matches!(
        solver.satisfy(&mut brancher, &mut Indefinite),
        SatisfactionResult::Satisfiable(_)
    ));
}
