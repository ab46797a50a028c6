//! Contains the propagator which keeps groups of placement variables from sharing a value, e.g.
//! two sets of virtual machines which may never run on a common node.
pub(crate) mod checker;
mod disjoint_propagator;

pub use disjoint_propagator::*;
