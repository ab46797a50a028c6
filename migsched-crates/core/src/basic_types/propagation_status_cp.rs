use thiserror::Error;

use crate::engine::EmptyDomain;

/// The result of invoking a propagator. The propagation either succeeds or runs into a
/// contradiction, after which the search has to backtrack.
pub type PropagationStatusCP = Result<(), Inconsistency>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inconsistency {
    /// A narrowing removed the last value of a domain.
    EmptyDomain,
    /// A propagator found its invariant violated without emptying a domain itself.
    Conflict(PropagatorConflict),
}

impl From<EmptyDomain> for Inconsistency {
    fn from(_: EmptyDomain) -> Self {
        Inconsistency::EmptyDomain
    }
}

impl From<PropagatorConflict> for Inconsistency {
    fn from(conflict: PropagatorConflict) -> Self {
        Inconsistency::Conflict(conflict)
    }
}

/// A contradiction stated explicitly by a propagator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PropagatorConflict {
    #[error("usage on resource {resource} exceeds the capacity of dimension {dimension} at time {time}")]
    CapacityExceeded {
        resource: usize,
        dimension: usize,
        time: i32,
    },
    #[error("value {value} is required by group {first_group} and by group {second_group}")]
    SharedValue {
        value: i32,
        first_group: usize,
        second_group: usize,
    },
    #[error("no remaining host lets the task start after the tasks already placed there")]
    NoCompatibleHost,
}
