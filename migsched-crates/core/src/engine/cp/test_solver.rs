#![cfg(test)]
//! Helpers for testing propagators. The [`TestSolver`] sets up a scenario, applies changes the way
//! a search would, and propagates to a fixed point after every change.

use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusCP;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;
use crate::engine::State;
use crate::predicate;
use crate::propagation::DomainEvents;
use crate::propagation::Domains;
use crate::propagation::LocalId;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::PropagatorHandle;
use crate::propagation::PropagatorId;

/// A container for variables and propagators which can be used to test propagators.
#[derive(Debug, Default)]
pub(crate) struct TestSolver {
    state: State,
}

impl TestSolver {
    pub(crate) fn new_variable(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        self.state
            .new_interval_variable(lower_bound, upper_bound, None)
    }

    pub(crate) fn new_sparse_variable(&mut self, values: Vec<i32>) -> DomainId {
        self.state.new_sparse_variable(values, None)
    }

    /// Adds the propagator and propagates to a fixed point.
    pub(crate) fn new_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, Inconsistency>
    where
        Constructor: PropagatorConstructor,
        Constructor::PropagatorImpl: 'static,
    {
        let handle = self.state.add_propagator(constructor);
        self.state.propagate_to_fixed_point()?;
        Ok(handle)
    }

    pub(crate) fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> &P {
        self.state
            .get_propagator(handle)
            .expect("the handle was created by this solver")
    }

    pub(crate) fn lower_bound(&self, var: DomainId) -> i32 {
        self.state.lower_bound(var)
    }

    pub(crate) fn upper_bound(&self, var: DomainId) -> i32 {
        self.state.upper_bound(var)
    }

    pub(crate) fn contains(&self, var: DomainId, value: i32) -> bool {
        self.state.contains(var, value)
    }

    pub(crate) fn fixed_value(&self, var: DomainId) -> Option<i32> {
        self.state.fixed_value(var)
    }

    pub(crate) fn domains(&self) -> Domains<'_> {
        Domains::new(&self.state.assignments, &self.state.trailed_values)
    }

    pub(crate) fn values(&self, var: DomainId) -> Vec<i32> {
        self.state.assignments.get_domain_iterator(var).collect()
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.state.new_checkpoint();
    }

    pub(crate) fn restore_to(&mut self, checkpoint: usize) {
        self.state.restore_to(checkpoint);
    }

    /// Applies `predicate` and propagates. An empty domain is reported as an inconsistency.
    pub(crate) fn post(&mut self, predicate: Predicate) -> Result<(), Inconsistency> {
        let _ = self.state.post(predicate)?;
        self.state.propagate_to_fixed_point()
    }

    pub(crate) fn set_lower_bound(&mut self, var: DomainId, bound: i32) -> Result<(), Inconsistency> {
        self.post(predicate![var >= bound])
    }

    pub(crate) fn set_upper_bound(&mut self, var: DomainId, bound: i32) -> Result<(), Inconsistency> {
        self.post(predicate![var <= bound])
    }

    pub(crate) fn remove(&mut self, var: DomainId, value: i32) -> Result<(), Inconsistency> {
        self.post(predicate![var != value])
    }

    pub(crate) fn assign(&mut self, var: DomainId, value: i32) -> Result<(), Inconsistency> {
        self.post(predicate![var == value])
    }

    /// Asserts that no propagator narrows a domain when it starts over from scratch.
    pub(crate) fn assert_fixed_point(&self) {
        let narrowing = self.state.propagators_off_fixed_point();
        assert!(
            narrowing.is_empty(),
            "{narrowing:?} narrowed a domain after the fixed point"
        );
    }

    /// Hands `action` a context on the current domains, as if it were the propagator with id
    /// `propagator_id`. Changes are kept but not propagated.
    pub(crate) fn with_context<T>(
        &mut self,
        propagator_id: PropagatorId,
        action: impl FnOnce(PropagationContext) -> T,
    ) -> T {
        let context = PropagationContext::new(
            &mut self.state.assignments,
            &mut self.state.trailed_values,
            propagator_id,
        );
        let result = action(context);
        let _ = self.state.assignments.drain_domain_events().count();
        result
    }
}

/// Counts how often it is called; used to test the notification mechanism.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CountingPropagator {
    watched: DomainId,
    pub(crate) num_calls: u32,
}

impl CountingPropagator {
    pub(crate) fn watching(watched: DomainId) -> Self {
        CountingPropagator {
            watched,
            num_calls: 0,
        }
    }
}

impl PropagatorConstructor for CountingPropagator {
    type PropagatorImpl = CountingPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        context.register(self.watched, DomainEvents::ANY_INT, LocalId::from(0));
        self
    }
}

impl Propagator for CountingPropagator {
    fn name(&self) -> &str {
        "Counting"
    }

    fn propagate_from_scratch(&self, _context: PropagationContext) -> PropagationStatusCP {
        Ok(())
    }

    fn propagate(&mut self, _context: PropagationContext) -> PropagationStatusCP {
        self.num_calls += 1;
        Ok(())
    }
}
