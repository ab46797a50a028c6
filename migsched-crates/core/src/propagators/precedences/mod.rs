//! Contains the propagator which serialises a task arriving on a host with the tasks leaving it.
pub(crate) mod checker;
mod precedences_propagator;

pub use precedences_propagator::*;
