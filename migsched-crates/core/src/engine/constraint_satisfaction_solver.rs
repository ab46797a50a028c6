//! The depth-first search which drives propagation.
//!
//! Every decision is an equality `[x == v]` taken on a fresh checkpoint. When propagation runs
//! into a contradiction, the solver restores the previous checkpoint and posts the negation of the
//! decision there. This is repeated until a negation holds, or no decision is left.
use std::time::Instant;

use log::info;
use log::trace;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::termination::TerminationCondition;
use super::SolverStatistics;
use super::State;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Solution;
use crate::branching::Brancher;
use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;
use crate::migsched_assert_eq_simple;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorHandle;
use crate::propagators::TaskSchedulerOptions;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// The checkpoint below which nothing is undone by the search. Every solve opens it on top of the
/// root, so a solve leaves no trace once the solver is restored to the root.
const SEARCH_ROOT: usize = 1;

/// Options which influence the search and the propagators posted on the solver.
#[derive(Debug, Clone, Copy)]
pub struct SolverOptions {
    /// Seeds the random generator handed to the branchers.
    pub random_seed: u64,
    /// Used by every task scheduler and aliased cumulative posted on the solver.
    pub task_scheduler: TaskSchedulerOptions,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            random_seed: 42,
            task_scheduler: TaskSchedulerOptions::default(),
        }
    }
}

/// How a call to the search ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CSPSolverExecutionFlag {
    /// Every variable is fixed; the solution can be read from the current state.
    Feasible,
    Infeasible,
    /// The termination condition fired before a conclusion was reached.
    Timeout,
}

/// The solver which performs the search. Users interact with it through the
/// [`Solver`](crate::Solver).
#[derive(Debug)]
pub struct ConstraintSatisfactionSolver {
    pub(crate) state: State,
    /// The decisions of the current branch, one per checkpoint above [`SEARCH_ROOT`].
    decision_stack: Vec<Predicate>,
    /// Set when the root became inconsistent; nothing can be solved afterwards.
    infeasible_at_root: bool,
    random: SmallRng,
    pub(crate) options: SolverOptions,
    solver_statistics: SolverStatistics,
}

impl Default for ConstraintSatisfactionSolver {
    fn default() -> Self {
        ConstraintSatisfactionSolver::new(SolverOptions::default())
    }
}

impl ConstraintSatisfactionSolver {
    pub fn new(options: SolverOptions) -> Self {
        ConstraintSatisfactionSolver {
            state: State::default(),
            decision_stack: Vec::new(),
            infeasible_at_root: false,
            random: SmallRng::seed_from_u64(options.random_seed),
            options,
            solver_statistics: SolverStatistics::default(),
        }
    }

    pub fn log_statistics(&self, verbose: bool) {
        self.solver_statistics.log(StatisticLogger::default());
        self.state.log_statistics(verbose);
    }

    pub fn is_infeasible(&self) -> bool {
        self.infeasible_at_root
    }
}

/// Variables and propagators.
impl ConstraintSatisfactionSolver {
    pub fn create_new_integer_variable(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: Option<String>,
    ) -> DomainId {
        self.state
            .new_interval_variable(lower_bound, upper_bound, name)
    }

    pub fn create_new_sparse_integer_variable(
        &mut self,
        values: Vec<i32>,
        name: Option<String>,
    ) -> DomainId {
        self.state.new_sparse_variable(values, name)
    }

    pub fn get_lower_bound(&self, variable: DomainId) -> i32 {
        self.state.lower_bound(variable)
    }

    pub fn get_upper_bound(&self, variable: DomainId) -> i32 {
        self.state.upper_bound(variable)
    }

    /// Adds a propagator at the root and propagates it to a fixed point together with the
    /// propagators added before.
    pub fn add_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, ConstraintOperationError>
    where
        Constructor: PropagatorConstructor,
        Constructor::PropagatorImpl: 'static,
    {
        if self.infeasible_at_root {
            return Err(ConstraintOperationError::InfeasibleState);
        }
        self.restore_state_at_root();

        let handle = self.state.add_propagator(constructor);
        if self.state.propagate_to_fixed_point().is_err() {
            self.infeasible_at_root = true;
            info!("Adding a propagator made the root infeasible");
            return Err(ConstraintOperationError::InfeasiblePropagator);
        }

        Ok(handle)
    }

    /// Applies `predicate` at the root.
    pub fn post_at_root(&mut self, predicate: Predicate) -> Result<(), ConstraintOperationError> {
        if self.infeasible_at_root {
            return Err(ConstraintOperationError::InfeasibleState);
        }
        self.restore_state_at_root();

        if self.state.post(predicate).is_err() || self.state.propagate_to_fixed_point().is_err() {
            self.infeasible_at_root = true;
            return Err(ConstraintOperationError::InfeasibleState);
        }
        Ok(())
    }
}

/// Search.
impl ConstraintSatisfactionSolver {
    /// Searches for a solution starting from the root. After [`CSPSolverExecutionFlag::Feasible`]
    /// the state holds the solution until [`ConstraintSatisfactionSolver::restore_state_at_root`]
    /// or [`ConstraintSatisfactionSolver::continue_after_solution`] is called.
    pub(crate) fn solve(
        &mut self,
        brancher: &mut impl Brancher,
        termination: &mut impl TerminationCondition,
    ) -> CSPSolverExecutionFlag {
        if self.infeasible_at_root {
            return CSPSolverExecutionFlag::Infeasible;
        }
        self.restore_state_at_root();
        self.state.new_checkpoint();

        self.timed_search(brancher, termination)
    }

    /// Rejects the current solution and searches for the next one.
    pub(crate) fn continue_after_solution(
        &mut self,
        brancher: &mut impl Brancher,
        termination: &mut impl TerminationCondition,
    ) -> CSPSolverExecutionFlag {
        if !self.backtrack() {
            return CSPSolverExecutionFlag::Infeasible;
        }
        self.timed_search(brancher, termination)
    }

    /// Undoes the search; the domains are as they were after the last posted constraint.
    pub(crate) fn restore_state_at_root(&mut self) {
        self.decision_stack.clear();
        self.state.restore_to(0);
    }

    /// Reads the solution from a state in which every variable is fixed.
    pub(crate) fn get_solution(&self) -> Solution {
        Solution::from_assignments(&self.state.assignments)
    }

    fn timed_search(
        &mut self,
        brancher: &mut impl Brancher,
        termination: &mut impl TerminationCondition,
    ) -> CSPSolverExecutionFlag {
        let start = Instant::now();
        let flag = self.search(brancher, termination);
        self.solver_statistics.time_spent_in_solver += start.elapsed().as_millis() as u64;

        if flag == CSPSolverExecutionFlag::Feasible {
            self.solver_statistics.num_solutions += 1;
            brancher.on_solution(&self.get_solution());
        }
        flag
    }

    fn search(
        &mut self,
        brancher: &mut impl Brancher,
        termination: &mut impl TerminationCondition,
    ) -> CSPSolverExecutionFlag {
        loop {
            if termination.should_stop() {
                info!("Search stopped by the termination condition");
                return CSPSolverExecutionFlag::Timeout;
            }

            if self.state.propagate_to_fixed_point().is_err() {
                self.solver_statistics.num_conflicts += 1;
                termination.conflict_has_been_found();
                if !self.backtrack() {
                    return CSPSolverExecutionFlag::Infeasible;
                }
                continue;
            }

            let mut context = SelectionContext::new(&self.state.assignments, &mut self.random);
            let Some(decision) = brancher.next_decision(&mut context) else {
                return CSPSolverExecutionFlag::Feasible;
            };

            self.solver_statistics.num_decisions += 1;
            termination.decision_has_been_made();

            self.state.new_checkpoint();
            self.decision_stack.push(decision);
            self.solver_statistics.peak_depth = self
                .solver_statistics
                .peak_depth
                .max(self.decision_stack.len() as u64);
            trace!("Decision {decision} at depth {}", self.decision_stack.len());

            if self.state.post(decision).is_err() {
                self.solver_statistics.num_conflicts += 1;
                if !self.backtrack() {
                    return CSPSolverExecutionFlag::Infeasible;
                }
            }
        }
    }

    /// Undoes the most recent decision and posts its negation one level up. Returns `false` when
    /// every decision has been refuted, i.e. the remaining search space is empty.
    fn backtrack(&mut self) -> bool {
        while let Some(decision) = self.decision_stack.pop() {
            let checkpoint = SEARCH_ROOT + self.decision_stack.len();
            self.state.restore_to(checkpoint);
            migsched_assert_eq_simple!(checkpoint, self.state.get_checkpoint());

            trace!("Backtrack to depth {}, refuting {decision}", self.decision_stack.len());
            if self.state.post(!decision).is_ok() {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::CSPSolverExecutionFlag;
    use super::ConstraintSatisfactionSolver;
    use crate::branching::branchers::IndependentVariableValueBrancher;
    use crate::branching::value_selection::InDomainMin;
    use crate::branching::variable_selection::InputOrder;
    use crate::propagators::DisjointMultiplePropagatorArgs;
    use crate::propagators::DisjointPropagatorArgs;
    use crate::termination::Indefinite;
    use crate::termination::SearchBudget;

    #[test]
    fn every_solution_is_enumerated_once() {
        let mut solver = ConstraintSatisfactionSolver::default();
        let x = solver.create_new_integer_variable(0, 2, None);
        let y = solver.create_new_integer_variable(0, 2, None);
        let _ = solver
            .add_propagator(DisjointPropagatorArgs {
                first_group: vec![x].into(),
                second_group: vec![y].into(),
                num_values: 3,
            })
            .unwrap();

        let mut brancher =
            IndependentVariableValueBrancher::new(InputOrder::new(&[x, y]), InDomainMin);
        let mut solutions = vec![];
        let mut flag = solver.solve(&mut brancher, &mut Indefinite);
        while flag == CSPSolverExecutionFlag::Feasible {
            let solution = solver.get_solution();
            solutions.push((solution.get_integer_value(x), solution.get_integer_value(y)));
            flag = solver.continue_after_solution(&mut brancher, &mut Indefinite);
        }

        assert_eq!(CSPSolverExecutionFlag::Infeasible, flag);
        assert_eq!(
            vec![(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)],
            solutions
        );
    }

    #[test]
    fn solving_twice_gives_the_same_first_solution() {
        let mut solver = ConstraintSatisfactionSolver::default();
        let x = solver.create_new_integer_variable(0, 3, None);
        let mut brancher =
            IndependentVariableValueBrancher::new(InputOrder::new(&[x]), InDomainMin);

        assert_eq!(
            CSPSolverExecutionFlag::Feasible,
            solver.solve(&mut brancher, &mut Indefinite)
        );
        assert_eq!(
            CSPSolverExecutionFlag::Feasible,
            solver.continue_after_solution(&mut brancher, &mut Indefinite)
        );
        assert_eq!(1, solver.get_solution().get_integer_value(x));

        assert_eq!(
            CSPSolverExecutionFlag::Feasible,
            solver.solve(&mut brancher, &mut Indefinite)
        );
        assert_eq!(0, solver.get_solution().get_integer_value(x));
        solver.restore_state_at_root();
        assert_eq!(0, solver.get_lower_bound(x));
        assert_eq!(3, solver.get_upper_bound(x));
    }

    #[test]
    fn decision_budget_stops_the_search() {
        let mut solver = ConstraintSatisfactionSolver::default();
        let x = solver.create_new_integer_variable(0, 3, None);
        let mut brancher =
            IndependentVariableValueBrancher::new(InputOrder::new(&[x]), InDomainMin);

        let flag = solver.solve(&mut brancher, &mut SearchBudget::decisions(0));
        assert_eq!(CSPSolverExecutionFlag::Timeout, flag);
    }

    #[test]
    fn conflict_budget_stops_the_search() {
        let mut solver = ConstraintSatisfactionSolver::default();
        let variables = (0..3)
            .map(|_| solver.create_new_integer_variable(0, 1, None))
            .collect::<Vec<_>>();
        // Three variables with pairwise different values out of two.
        let _ = solver
            .add_propagator(DisjointMultiplePropagatorArgs {
                groups: variables
                    .iter()
                    .map(|&variable| vec![variable].into_boxed_slice())
                    .collect(),
                num_values: 2,
            })
            .unwrap();
        let mut brancher =
            IndependentVariableValueBrancher::new(InputOrder::new(&variables), InDomainMin);

        let flag = solver.solve(&mut brancher, &mut SearchBudget::conflicts(1));
        assert_eq!(CSPSolverExecutionFlag::Timeout, flag);

        solver.restore_state_at_root();
        let flag = solver.solve(&mut brancher, &mut Indefinite);
        assert_eq!(CSPSolverExecutionFlag::Infeasible, flag);
    }
}
