//! Defines the constraints that can be added to the [`Solver`].
//!
//! A constraint is a relation over variables. In the solver, constraints are enforced through
//! propagators, and therefore constraints can be viewed as a collection of propagators. The
//! placement rules of a reconfiguration which are enforced by scheduling are each represented by
//! a variant of [`SchedulingRule`].
//!
//! # Example
//! ```
//! # use migsched_core::constraints;
//! # use migsched_core::constraints::ArgConsumingTask;
//! # use migsched_core::constraints::ArgDemandingTask;
//! # use migsched_core::constraints::ArgResource;
//! # use migsched_core::Solver;
//! let mut solver = Solver::default();
//!
//! let opening = solver.new_bounded_integer(0, 0);
//! let closing = solver.new_bounded_integer(10, 10);
//! let end = solver.new_bounded_integer(0, 10);
//! let placement = solver.new_bounded_integer(0, 0);
//! let start = solver.new_bounded_integer(0, 10);
//!
//! // A virtual machine leaves node 0 while another one arrives; only one of them fits.
//! solver
//!     .add_constraint(constraints::task_scheduler(
//!         vec![ArgResource {
//!             capacity: vec![2],
//!             hosting_start: opening,
//!             hosting_end: closing,
//!         }],
//!         vec![ArgConsumingTask {
//!             resource: 0,
//!             usage: vec![2],
//!             end,
//!         }],
//!         vec![ArgDemandingTask {
//!             placement,
//!             usage: vec![2],
//!             start,
//!         }],
//!         vec![None],
//!     ))
//!     .post()
//!     .expect("no conflict at the root");
//! ```

mod constraint_poster;
mod disjoint;
mod precedences;
mod scheduling_rule;
mod staying_tasks;
mod task_scheduler;

pub use constraint_poster::*;
pub use disjoint::*;
pub use precedences::*;
pub use scheduling_rule::*;
pub use staying_tasks::*;
pub use task_scheduler::*;

pub use crate::propagators::ArgConsumingTask;
pub use crate::propagators::ArgDemandingTask;
pub use crate::propagators::ArgResource;
pub use crate::propagators::StayingTask;
use crate::propagation::PropagatorConstructor;
use crate::ConstraintOperationError;
use crate::Solver;

/// A [`Constraint`] is a relation over variables. It disqualifies certain partial assignments of
/// making it into a solution of the problem.
///
/// For example, the [`disjoint`] constraint over two groups of placement variables rejects every
/// assignment in which a value is taken in both groups.
pub trait Constraint {
    /// Add the [`Constraint`] to the [`Solver`].
    ///
    /// This method returns a [`ConstraintOperationError`] if the addition of the [`Constraint`]
    /// led to a root-level conflict.
    fn post(self, solver: &mut Solver) -> Result<(), ConstraintOperationError>;
}

impl<ConcretePropagator> Constraint for ConcretePropagator
where
    ConcretePropagator: PropagatorConstructor + 'static,
{
    fn post(self, solver: &mut Solver) -> Result<(), ConstraintOperationError> {
        let _ = solver.add_propagator(self)?;
        Ok(())
    }
}

impl<C: Constraint> Constraint for Vec<C> {
    fn post(self, solver: &mut Solver) -> Result<(), ConstraintOperationError> {
        self.into_iter().try_for_each(|c| c.post(solver))
    }
}
