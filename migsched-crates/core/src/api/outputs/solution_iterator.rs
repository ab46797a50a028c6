//! Contains the structures corresponding to solution iterations.

use crate::basic_types::Solution;
use crate::branching::Brancher;
use crate::engine::constraint_satisfaction_solver::CSPSolverExecutionFlag;
use crate::termination::TerminationCondition;
use crate::Solver;

/// A struct which allows the retrieval of every solution to a satisfaction problem, one at a
/// time.
///
/// Every solution is found once: after a solution, the search continues as if the solution had
/// been a contradiction. When the iterator is dropped, the solver is restored to the root.
#[derive(Debug)]
pub struct SolutionIterator<'solver, 'brancher, 'termination, B, T> {
    solver: &'solver mut Solver,
    brancher: &'brancher mut B,
    termination: &'termination mut T,
    status: IterationStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum IterationStatus {
    NotStarted,
    /// The state holds the last solution.
    AtSolution,
    /// The search space is exhausted; `true` when a solution was found before.
    Exhausted(bool),
    Terminated,
}

impl<'solver, 'brancher, 'termination, B: Brancher, T: TerminationCondition>
    SolutionIterator<'solver, 'brancher, 'termination, B, T>
{
    pub(crate) fn new(
        solver: &'solver mut Solver,
        brancher: &'brancher mut B,
        termination: &'termination mut T,
    ) -> Self {
        SolutionIterator {
            solver,
            brancher,
            termination,
            status: IterationStatus::NotStarted,
        }
    }

    /// Find a new solution which differs from the solutions found so far. Also calls the
    /// [`Brancher::on_solution`] method of the brancher.
    pub fn next_solution(&mut self) -> IteratedSolution {
        let flag = match self.status {
            IterationStatus::NotStarted => self
                .solver
                .satisfaction_solver
                .solve(self.brancher, self.termination),
            IterationStatus::AtSolution => self
                .solver
                .satisfaction_solver
                .continue_after_solution(self.brancher, self.termination),
            IterationStatus::Exhausted(true) => return IteratedSolution::Finished,
            IterationStatus::Exhausted(false) => return IteratedSolution::Unsatisfiable,
            IterationStatus::Terminated => return IteratedSolution::Unknown,
        };

        match flag {
            CSPSolverExecutionFlag::Feasible => {
                self.status = IterationStatus::AtSolution;
                let solution = self.solver.satisfaction_solver.get_solution();
                self.solver.verify_solution(&solution);
                IteratedSolution::Solution(solution)
            }
            CSPSolverExecutionFlag::Infeasible => {
                let has_solution = self.status == IterationStatus::AtSolution;
                self.status = IterationStatus::Exhausted(has_solution);
                if has_solution {
                    IteratedSolution::Finished
                } else {
                    IteratedSolution::Unsatisfiable
                }
            }
            CSPSolverExecutionFlag::Timeout => {
                self.status = IterationStatus::Terminated;
                IteratedSolution::Unknown
            }
        }
    }
}

impl<B, T> Drop for SolutionIterator<'_, '_, '_, B, T> {
    fn drop(&mut self) {
        self.solver.satisfaction_solver.restore_state_at_root();
    }
}

/// Enum which specifies the status of the call to [`SolutionIterator::next_solution`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IteratedSolution {
    /// A new solution was identified.
    Solution(Solution),

    /// No more solutions exist.
    Finished,

    /// The solver was terminated during search.
    Unknown,

    /// There exists no solution
    Unsatisfiable,
}
