//! The interface between propagators and the solver.
//!
//! A propagator is built by a [`PropagatorConstructor`], which subscribes it to the domain events
//! of its variables through the [`PropagatorConstructorContext`]. When one of those events
//! happens, [`Propagator::notify`] is called and the propagator may be enqueued; the solver then
//! calls [`Propagator::propagate`] until no propagator is left in the queue.
pub(crate) mod constructor;
pub(crate) mod contexts;
mod local_id;
mod propagator;
mod propagator_id;
mod propagator_var_id;
pub(crate) mod store;

pub use constructor::PropagatorConstructor;
pub use constructor::PropagatorConstructorContext;
pub use contexts::Domains;
pub use contexts::PropagationContext;
pub use contexts::ReadDomains;
pub use local_id::LocalId;
pub use propagator::EnqueueDecision;
pub use propagator::Priority;
pub use propagator::Propagator;
pub use propagator_id::PropagatorHandle;
pub use propagator_id::PropagatorId;
pub use propagator_var_id::PropagatorVarId;

pub use crate::engine::DomainEvents;
pub use crate::engine::IntDomainEvent;
