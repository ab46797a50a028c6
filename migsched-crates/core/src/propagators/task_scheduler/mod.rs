//! Contains the propagators which keep the resource usage of a reconfiguration within capacity.
//!
//! # Theoretical
//!
//! A reconfiguration moves entities (e.g. virtual machines) between resources (e.g. nodes). The
//! occupation of a resource is expressed with two kinds of tasks, each with a fixed usage per
//! dimension:
//! - a *consuming* task is hosted on a known resource, which it occupies from time 0 until its
//!   end variable `e_c`;
//! - a *demanding* task occupies the resource selected by its placement variable `p_d` from its
//!   start variable `s_d` onwards.
//!
//! An entity which is currently hosted and will be hosted again has one task of each kind; the
//! two are *associated*. When both are on the same resource the entity stays, and the usage of
//! the pair is not counted twice.
//!
//! The constraint ensures that at every moment, the usage on a resource does not exceed its
//! capacity in any dimension. Every round rebuilds a minimum and a maximum usage profile from the
//! current bounds, and uses them to:
//! - report a conflict when the minimum profile exceeds the capacity;
//! - bound `e_c` by the first moment at which the consuming task no longer fits;
//! - bound `s_d` from below by the end of the last moment at which a fixed demanding task does not
//!   fit;
//! - optionally bound `s_d` from above by the moment after which the maximum profile fits.
//!
//! # Practical
//!
//! The [`TaskSchedulerPropagator`] runs one [`LocalTaskScheduler`] per resource, where placement
//! value `i` selects resource `i`. The [`AliasedCumulativesPropagator`] runs a single one on a
//! pool of resource identifiers which share one capacity.
//!
//! [`LocalTaskScheduler`]: local_task_scheduler::LocalTaskScheduler
mod aliased_cumulatives;
pub(crate) mod checker;
mod local_task_scheduler;
mod options;
mod profile;
mod scheduler_core;
mod task_scheduler_propagator;
pub(crate) mod tasks;

pub use aliased_cumulatives::*;
pub use options::TaskSchedulerOptions;
pub use task_scheduler_propagator::*;
pub use tasks::ArgConsumingTask;
pub use tasks::ArgDemandingTask;
