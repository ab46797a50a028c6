use super::LocalId;
use super::PropagatorId;

/// A subscription of a propagator to one of its variables.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct PropagatorVarId {
    pub(crate) propagator: PropagatorId,
    pub(crate) variable: LocalId,
}
