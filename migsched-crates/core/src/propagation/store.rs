use std::ops::Index;
use std::ops::IndexMut;

use super::Propagator;
use super::PropagatorHandle;
use super::PropagatorId;
use crate::containers::KeyedVec;
use crate::containers::Slot;

/// Owns the propagators of the solver.
#[derive(Default)]
pub(crate) struct PropagatorStore {
    propagators: KeyedVec<PropagatorId, Box<dyn Propagator>>,
}

impl std::fmt::Debug for PropagatorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.propagators.iter().map(|propagator| propagator.name()))
            .finish()
    }
}

impl PropagatorStore {
    pub(crate) fn new_propagator(&mut self) -> Slot<'_, PropagatorId, Box<dyn Propagator>> {
        self.propagators.new_slot()
    }

    pub(crate) fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.propagators
            .get(handle.propagator_id())
            .and_then(|propagator| propagator.downcast_ref())
    }

    pub(crate) fn iter_propagators(&self) -> impl Iterator<Item = &dyn Propagator> + '_ {
        self.propagators.iter().map(|propagator| propagator.as_ref())
    }

    pub(crate) fn iter_propagators_mut(
        &mut self,
    ) -> impl Iterator<Item = &mut Box<dyn Propagator>> + '_ {
        self.propagators.iter_mut()
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = PropagatorId> {
        self.propagators.keys()
    }
}

impl Index<PropagatorId> for PropagatorStore {
    type Output = dyn Propagator;

    fn index(&self, index: PropagatorId) -> &Self::Output {
        self.propagators[index].as_ref()
    }
}

impl IndexMut<PropagatorId> for PropagatorStore {
    fn index_mut(&mut self, index: PropagatorId) -> &mut Self::Output {
        self.propagators[index].as_mut()
    }
}
