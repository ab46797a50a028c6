//! Provides several implementations of [`Brancher`]s.

mod branching_strategy;
mod independent_variable_value_brancher;

pub use branching_strategy::BranchingStrategy;
pub use independent_variable_value_brancher::IndependentVariableValueBrancher;
#[cfg(doc)]
use super::Brancher;
