use super::PropagatorId;
use crate::engine::Assignments;
use crate::engine::EmptyDomain;
use crate::engine::TrailedInteger;
use crate::engine::TrailedValues;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;

/// Read access to the domains and the trailed values.
pub trait ReadDomains {
    fn assignments(&self) -> &Assignments;

    fn trailed_values(&self) -> &TrailedValues;

    fn lower_bound(&self, var: DomainId) -> i32 {
        self.assignments().get_lower_bound(var)
    }

    fn upper_bound(&self, var: DomainId) -> i32 {
        self.assignments().get_upper_bound(var)
    }

    fn contains(&self, var: DomainId, value: i32) -> bool {
        self.assignments().is_value_in_domain(var, value)
    }

    fn is_fixed(&self, var: DomainId) -> bool {
        self.assignments().is_domain_assigned(var)
    }

    fn is_fixed_to(&self, var: DomainId, value: i32) -> bool {
        self.assignments().is_domain_assigned_to(var, value)
    }

    fn fixed_value(&self, var: DomainId) -> Option<i32> {
        self.assignments().get_assigned_value(var)
    }

    fn domain_size(&self, var: DomainId) -> u32 {
        self.assignments().get_domain_size(var)
    }

    fn iterate_domain(&self, var: DomainId) -> impl Iterator<Item = i32> + '_ {
        self.assignments().get_domain_iterator(var)
    }

    fn read(&self, trailed_integer: TrailedInteger) -> i64 {
        self.trailed_values().read(trailed_integer)
    }
}

/// A read-only view on the state, handed to propagators when they are notified or synchronised.
#[derive(Clone, Copy, Debug)]
pub struct Domains<'a> {
    assignments: &'a Assignments,
    trailed_values: &'a TrailedValues,
}

impl<'a> Domains<'a> {
    pub(crate) fn new(assignments: &'a Assignments, trailed_values: &'a TrailedValues) -> Self {
        Domains {
            assignments,
            trailed_values,
        }
    }
}

impl ReadDomains for Domains<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }

    fn trailed_values(&self) -> &TrailedValues {
        self.trailed_values
    }
}

/// The context in which a propagator narrows domains.
#[derive(Debug)]
pub struct PropagationContext<'a> {
    pub(crate) assignments: &'a mut Assignments,
    pub(crate) trailed_values: &'a mut TrailedValues,
    propagator_id: PropagatorId,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(
        assignments: &'a mut Assignments,
        trailed_values: &'a mut TrailedValues,
        propagator_id: PropagatorId,
    ) -> Self {
        PropagationContext {
            assignments,
            trailed_values,
            propagator_id,
        }
    }

    pub fn propagator_id(&self) -> PropagatorId {
        self.propagator_id
    }

    pub fn as_readonly(&self) -> Domains<'_> {
        Domains::new(self.assignments, self.trailed_values)
    }

    /// Applies `predicate`. Returns whether the domain changed, or [`EmptyDomain`] when no value
    /// would remain.
    pub fn post(&mut self, predicate: Predicate) -> Result<bool, EmptyDomain> {
        self.assignments.post_predicate(predicate)
    }

    pub fn assign_trailed(&mut self, trailed_integer: TrailedInteger, value: i64) {
        self.trailed_values.assign(trailed_integer, value)
    }

    pub fn add_assign_trailed(&mut self, trailed_integer: TrailedInteger, addition: i64) {
        self.trailed_values.add_assign(trailed_integer, addition)
    }

    pub(crate) fn trailed_values_mut(&mut self) -> &mut TrailedValues {
        self.trailed_values
    }

    /// Reborrows the context for a shorter lifetime, so it can be handed to a helper and used
    /// again afterwards.
    pub fn reborrow(&mut self) -> PropagationContext<'_> {
        PropagationContext {
            assignments: self.assignments,
            trailed_values: self.trailed_values,
            propagator_id: self.propagator_id,
        }
    }
}

impl ReadDomains for PropagationContext<'_> {
    fn assignments(&self) -> &Assignments {
        self.assignments
    }

    fn trailed_values(&self) -> &TrailedValues {
        self.trailed_values
    }
}
