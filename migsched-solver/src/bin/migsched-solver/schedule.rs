use log::info;
use migsched_solver::branching::Brancher;
use migsched_solver::results::IteratedSolution;
use migsched_solver::results::SatisfactionResult;
use migsched_solver::results::Solution;
use migsched_solver::termination::TerminationCondition;
use migsched_solver::Solver;

use crate::instance::Model;

const MSG_UNKNOWN: &str = "=====UNKNOWN=====";
const MSG_UNSATISFIABLE: &str = "=====UNSATISFIABLE=====";
const MSG_COMPLETE: &str = "==========";
const SOLUTION_SEPARATOR: &str = "----------";

/// Searches for a schedule of `model`, or for every schedule when `all_solutions` is set, and
/// prints what is found.
pub(crate) fn solve(
    solver: &mut Solver,
    model: &Model,
    mut brancher: impl Brancher,
    mut termination: impl TerminationCondition,
    all_solutions: bool,
) {
    if !all_solutions {
        match solver.satisfy(&mut brancher, &mut termination) {
            SatisfactionResult::Satisfiable(solution) => print_schedule(model, &solution),
            SatisfactionResult::Unsatisfiable => println!("{MSG_UNSATISFIABLE}"),
            SatisfactionResult::Unknown => println!("{MSG_UNKNOWN}"),
        }
        solver.log_statistics();
        return;
    }

    let mut num_solutions = 0_u64;
    let closing_message = {
        let mut solution_iterator = solver.get_solution_iterator(&mut brancher, &mut termination);
        loop {
            match solution_iterator.next_solution() {
                IteratedSolution::Solution(solution) => {
                    num_solutions += 1;
                    print_schedule(model, &solution);
                }
                IteratedSolution::Finished => break Some(MSG_COMPLETE),
                IteratedSolution::Unsatisfiable => break Some(MSG_UNSATISFIABLE),
                IteratedSolution::Unknown => break None,
            }
        }
    };
    if let Some(message) = closing_message {
        println!("{message}");
    }
    info!("Found {num_solutions} schedules");
    solver.log_statistics();
}

/// Prints what happens to every entity, followed by the solution separator.
fn print_schedule(model: &Model, solution: &Solution) {
    let resource = |index: usize| model.resource_names[index].as_str();

    for entity in model.entities.iter() {
        let name = entity.name.as_str();
        match (entity.leaving, entity.arriving) {
            (Some((current, end)), Some((placement, start))) => {
                let target = solution.get_integer_value(placement) as usize;
                if target == current {
                    println!("{name} stays on {}", resource(current));
                } else {
                    println!(
                        "{name} moves from {} to {}, leaving at {} and arriving at {}",
                        resource(current),
                        resource(target),
                        solution.get_integer_value(end),
                        solution.get_integer_value(start),
                    );
                }
            }
            (Some((current, end)), None) => println!(
                "{name} leaves {} at {}",
                resource(current),
                solution.get_integer_value(end)
            ),
            (None, Some((placement, start))) => println!(
                "{name} arrives on {} at {}",
                resource(solution.get_integer_value(placement) as usize),
                solution.get_integer_value(start)
            ),
            (None, None) => {}
        }
    }

    println!("{SOLUTION_SEPARATOR}");
}
