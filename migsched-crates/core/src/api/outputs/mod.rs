pub mod solution_iterator;

use crate::basic_types::Solution;
#[cfg(doc)]
use crate::termination::TerminationCondition;
#[cfg(doc)]
use crate::Solver;

/// The result of a call to [`Solver::satisfy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatisfactionResult {
    /// Indicates that a solution was found. The solver is back at the root, ready for further
    /// use.
    Satisfiable(Solution),
    /// Indicates that there is no solution to the satisfaction problem.
    Unsatisfiable,
    /// Indicates that it is not known whether a solution exists. This is likely due to a
    /// [`TerminationCondition`] triggering.
    Unknown,
}
