//! # Migsched
//! Migsched is a library for scheduling the reconfiguration of a datacenter: entities, such as
//! virtual machines, move between resources, such as nodes, and every move has to be timed such
//! that no resource runs out of capacity along the way.
//!
//! The problem is expressed as a constraint satisfaction problem. Variables are created on a
//! [`Solver`], placement rules are added as [`constraints`], and a [`branching::Brancher`]
//! guides the search for a solution.
//!
//! # Example
//! ```rust
//! # use migsched_core::constraints;
//! # use migsched_core::results::SatisfactionResult;
//! # use migsched_core::termination::Indefinite;
//! # use migsched_core::Solver;
//! let mut solver = Solver::default();
//!
//! // An arriving task is placed on node 0 or node 1, after the task leaving its node has ended.
//! let placement = solver.new_bounded_integer(0, 1);
//! let start = solver.new_bounded_integer(0, 10);
//! let leaving_end = solver.new_bounded_integer(3, 6);
//!
//! solver
//!     .add_constraint(constraints::precedences(
//!         placement,
//!         start,
//!         vec![0],
//!         vec![leaving_end],
//!     ))
//!     .post()
//!     .expect("no conflict at the root");
//!
//! let mut brancher = solver.default_brancher();
//! let result = solver.satisfy(&mut brancher, &mut Indefinite);
//! let SatisfactionResult::Satisfiable(solution) = result else {
//!     panic!("the problem has a solution");
//! };
//!
//! if solution.get_integer_value(placement) == 0 {
//!     assert!(solution.get_integer_value(start) >= solution.get_integer_value(leaving_end));
//! }
//! ```
pub mod asserts;
pub(crate) mod basic_types;
pub mod containers;
pub(crate) mod engine;
pub(crate) mod propagation;
pub(crate) mod propagators;

pub mod branching;
pub mod constraints;
pub mod statistics;

pub use convert_case;
pub use rand;

// We declare a private module with public use, so that all exports from API are exports directly
// from the crate.
//
// Example:
// `use migsched_core::Solver;`
// vs.
// `use migsched_core::api::Solver;`
mod api;

pub use api::*;

pub use crate::api::solver::DefaultBrancher;
pub use crate::api::solver::Solver;
pub use crate::basic_types::ConstraintOperationError;
pub use crate::basic_types::Inconsistency;
pub use crate::basic_types::PropagatorConflict;
