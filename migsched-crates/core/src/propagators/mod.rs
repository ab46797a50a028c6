//! Contains the propagators which schedule a datacenter reconfiguration.
//!
//! See [`crate::propagation`] for how propagators are driven by the solver.

pub(crate) mod staying_tasks;

pub(crate) mod disjoint;
pub(crate) mod precedences;
pub(crate) mod task_scheduler;

pub use disjoint::*;
pub use precedences::*;
pub use staying_tasks::*;
pub use task_scheduler::*;
