use super::contexts::Domains;
use super::LocalId;
use super::Propagator;
use super::PropagatorId;
use super::PropagatorVarId;
use crate::engine::Assignments;
use crate::engine::DomainEvents;
use crate::engine::TrailedInteger;
use crate::engine::TrailedValues;
use crate::engine::WatchListCP;
use crate::engine::variables::DomainId;

/// Creates a fully initialised [`Propagator`] and subscribes it to the events it needs.
pub trait PropagatorConstructor {
    type PropagatorImpl: Propagator;

    fn create(self, context: PropagatorConstructorContext) -> Self::PropagatorImpl;
}

/// Hands a propagator under construction the current domains, room for trailed state, and the
/// subscription mechanism.
#[derive(Debug)]
pub struct PropagatorConstructorContext<'a> {
    watch_list: &'a mut WatchListCP,
    assignments: &'a Assignments,
    trailed_values: &'a mut TrailedValues,
    propagator_id: PropagatorId,
}

impl<'a> PropagatorConstructorContext<'a> {
    pub(crate) fn new(
        watch_list: &'a mut WatchListCP,
        assignments: &'a Assignments,
        trailed_values: &'a mut TrailedValues,
        propagator_id: PropagatorId,
    ) -> Self {
        PropagatorConstructorContext {
            watch_list,
            assignments,
            trailed_values,
            propagator_id,
        }
    }

    pub fn domains(&self) -> Domains<'_> {
        Domains::new(self.assignments, self.trailed_values)
    }

    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    /// Subscribes the propagator to `domain_events` on `var`. [`Propagator::notify`] receives
    /// `local_id` when one of them happens, so every variable needs its own local id.
    pub fn register(&mut self, var: DomainId, domain_events: DomainEvents, local_id: LocalId) {
        let propagator_var = PropagatorVarId {
            propagator: self.propagator_id,
            variable: local_id,
        };
        self.watch_list
            .watch_all(var, domain_events.events(), propagator_var);
    }

    pub fn new_trailed_integer(&mut self, initial_value: i64) -> TrailedInteger {
        self.trailed_values.grow(initial_value)
    }

    pub(crate) fn trailed_values_mut(&mut self) -> &mut TrailedValues {
        self.trailed_values
    }
}
