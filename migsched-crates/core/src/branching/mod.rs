//! Contains the structures which decide how the search splits the remaining domains.
//!
//! - A [`Brancher`] produces the next decision through [`Brancher::next_decision`], or reports
//!   that every variable it covers is fixed. An example is the
//!   [`IndependentVariableValueBrancher`].
//! - A [`VariableSelector`] picks the variable to branch on.
//! - A [`ValueSelector`] picks the value the chosen variable is fixed to first.
//!
//! A [`Brancher`] is passed to [`Solver::satisfy`] and [`Solver::get_solution_iterator`].

mod brancher;
pub mod branchers;
mod selection_context;
pub mod value_selection;
pub mod variable_selection;

pub use brancher::*;
pub use selection_context::SelectionContext;

#[cfg(doc)]
use crate::branching::branchers::IndependentVariableValueBrancher;
#[cfg(doc)]
use crate::branching::value_selection::ValueSelector;
#[cfg(doc)]
use crate::branching::variable_selection::VariableSelector;
#[cfg(doc)]
use crate::Solver;
