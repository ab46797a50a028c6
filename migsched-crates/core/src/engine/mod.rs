pub(crate) mod constraint_satisfaction_solver;
pub(crate) mod cp;
pub(crate) mod predicates;
mod solver_statistics;
mod state;
pub mod termination;
mod variable_names;
pub(crate) mod variables;

pub use constraint_satisfaction_solver::ConstraintSatisfactionSolver;
pub use constraint_satisfaction_solver::SolverOptions;
#[cfg(test)]
pub(crate) use cp::test_solver;
pub use cp::*;
pub(crate) use solver_statistics::SolverStatistics;
pub(crate) use state::State;
pub(crate) use variable_names::VariableNames;
