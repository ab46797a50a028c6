use super::event_sink::EventSink;
use super::IntDomainEvent;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;
use crate::migsched_assert_moderate;
use crate::migsched_assert_simple;

/// Signals that a narrowing would have removed every value from a domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyDomain;

/// The domains of all integer variables, together with the trail used to restore them.
#[derive(Clone, Debug, Default)]
pub struct Assignments {
    domains: KeyedVec<DomainId, IntegerDomain>,
    trail: Trail<DomainChange>,
    events: EventSink,
}

#[derive(Clone, Debug)]
struct IntegerDomain {
    lower_bound: i32,
    upper_bound: i32,
    size: u32,
    /// The smallest value the domain ever held; index 0 of `is_value_in_domain`.
    offset: i32,
    /// Holes inside the bounds. Values outside the bounds keep whatever flag they had.
    is_value_in_domain: Box<[bool]>,
}

#[derive(Clone, Copy, Debug)]
struct DomainChange {
    domain_id: DomainId,
    old_lower_bound: i32,
    old_upper_bound: i32,
    old_size: u32,
    removed_value: Option<i32>,
}

impl IntegerDomain {
    fn contains(&self, value: i32) -> bool {
        self.lower_bound <= value
            && value <= self.upper_bound
            && self.is_value_in_domain[(value - self.offset) as usize]
    }

    fn is_flagged(&self, value: i32) -> bool {
        self.is_value_in_domain[(value - self.offset) as usize]
    }

    fn count_between(&self, from: i32, to_exclusive: i32) -> u32 {
        (from..to_exclusive)
            .filter(|&value| self.is_flagged(value))
            .count() as u32
    }
}

impl Assignments {
    pub(crate) fn grow(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        migsched_assert_simple!(
            lower_bound <= upper_bound,
            "Cannot create the variable with the empty domain [{lower_bound}, {upper_bound}]"
        );
        let width = (upper_bound - lower_bound + 1) as usize;
        self.events.grow();
        self.domains.push(IntegerDomain {
            lower_bound,
            upper_bound,
            size: width as u32,
            offset: lower_bound,
            is_value_in_domain: vec![true; width].into_boxed_slice(),
        })
    }

    pub(crate) fn create_new_integer_variable_sparse(&mut self, mut values: Vec<i32>) -> DomainId {
        migsched_assert_simple!(
            !values.is_empty(),
            "Cannot create a variable without values"
        );
        values.sort_unstable();
        values.dedup();

        let lower_bound = values[0];
        let upper_bound = values[values.len() - 1];
        let mut is_value_in_domain =
            vec![false; (upper_bound - lower_bound + 1) as usize].into_boxed_slice();
        for &value in values.iter() {
            is_value_in_domain[(value - lower_bound) as usize] = true;
        }

        self.events.grow();
        self.domains.push(IntegerDomain {
            lower_bound,
            upper_bound,
            size: values.len() as u32,
            offset: lower_bound,
            is_value_in_domain,
        })
    }

    pub fn num_domains(&self) -> usize {
        self.domains.len()
    }

    pub fn get_domains(&self) -> impl Iterator<Item = DomainId> {
        self.domains.keys()
    }

    pub fn get_decision_level(&self) -> usize {
        self.trail.get_checkpoint()
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.trail.new_checkpoint()
    }

    pub fn get_lower_bound(&self, domain_id: DomainId) -> i32 {
        self.domains[domain_id].lower_bound
    }

    pub fn get_upper_bound(&self, domain_id: DomainId) -> i32 {
        self.domains[domain_id].upper_bound
    }

    pub fn get_domain_size(&self, domain_id: DomainId) -> u32 {
        self.domains[domain_id].size
    }

    pub fn is_value_in_domain(&self, domain_id: DomainId, value: i32) -> bool {
        self.domains[domain_id].contains(value)
    }

    pub fn is_domain_assigned(&self, domain_id: DomainId) -> bool {
        self.get_lower_bound(domain_id) == self.get_upper_bound(domain_id)
    }

    pub fn is_domain_assigned_to(&self, domain_id: DomainId, value: i32) -> bool {
        self.is_domain_assigned(domain_id) && self.get_lower_bound(domain_id) == value
    }

    pub fn get_assigned_value(&self, domain_id: DomainId) -> Option<i32> {
        self.is_domain_assigned(domain_id)
            .then(|| self.get_lower_bound(domain_id))
    }

    /// Iterates over the values currently in the domain, in increasing order.
    pub fn get_domain_iterator(&self, domain_id: DomainId) -> impl Iterator<Item = i32> + '_ {
        let domain = &self.domains[domain_id];
        (domain.lower_bound..=domain.upper_bound).filter(move |&value| domain.is_flagged(value))
    }

    /// Returns whether `predicate` holds in every remaining value of its domain.
    pub fn is_predicate_satisfied(&self, predicate: Predicate) -> bool {
        let domain_id = predicate.get_domain();
        let value = predicate.get_right_hand_side();
        match predicate {
            Predicate::LowerBound { .. } => self.get_lower_bound(domain_id) >= value,
            Predicate::UpperBound { .. } => self.get_upper_bound(domain_id) <= value,
            Predicate::NotEqual { .. } => !self.is_value_in_domain(domain_id, value),
            Predicate::Equal { .. } => self.is_domain_assigned_to(domain_id, value),
        }
    }

    /// Applies `predicate` to its domain. Returns whether the domain changed.
    pub(crate) fn post_predicate(&mut self, predicate: Predicate) -> Result<bool, EmptyDomain> {
        match predicate {
            Predicate::LowerBound {
                domain_id,
                lower_bound,
            } => self.tighten_lower_bound(domain_id, lower_bound),
            Predicate::UpperBound {
                domain_id,
                upper_bound,
            } => self.tighten_upper_bound(domain_id, upper_bound),
            Predicate::NotEqual {
                domain_id,
                not_equal_constant,
            } => self.remove_value_from_domain(domain_id, not_equal_constant),
            Predicate::Equal {
                domain_id,
                equality_constant,
            } => self.make_assignment(domain_id, equality_constant),
        }
    }

    pub(crate) fn tighten_lower_bound(
        &mut self,
        domain_id: DomainId,
        new_lower_bound: i32,
    ) -> Result<bool, EmptyDomain> {
        let domain = &self.domains[domain_id];
        if new_lower_bound <= domain.lower_bound {
            return Ok(false);
        }
        if new_lower_bound > domain.upper_bound {
            return Err(EmptyDomain);
        }

        // The upper bound is in the domain, so the scan terminates at the latest there.
        let mut lower_bound = new_lower_bound;
        while !domain.is_flagged(lower_bound) {
            lower_bound += 1;
        }
        let removed = domain.count_between(domain.lower_bound, lower_bound);

        self.record_change(domain_id, None);
        let domain = &mut self.domains[domain_id];
        domain.lower_bound = lower_bound;
        domain.size -= removed;

        self.events
            .event_occurred(IntDomainEvent::LowerBound, domain_id);
        self.notify_if_assigned(domain_id);
        Ok(true)
    }

    pub(crate) fn tighten_upper_bound(
        &mut self,
        domain_id: DomainId,
        new_upper_bound: i32,
    ) -> Result<bool, EmptyDomain> {
        let domain = &self.domains[domain_id];
        if new_upper_bound >= domain.upper_bound {
            return Ok(false);
        }
        if new_upper_bound < domain.lower_bound {
            return Err(EmptyDomain);
        }

        let mut upper_bound = new_upper_bound;
        while !domain.is_flagged(upper_bound) {
            upper_bound -= 1;
        }
        let removed = domain.count_between(upper_bound + 1, domain.upper_bound + 1);

        self.record_change(domain_id, None);
        let domain = &mut self.domains[domain_id];
        domain.upper_bound = upper_bound;
        domain.size -= removed;

        self.events
            .event_occurred(IntDomainEvent::UpperBound, domain_id);
        self.notify_if_assigned(domain_id);
        Ok(true)
    }

    pub(crate) fn remove_value_from_domain(
        &mut self,
        domain_id: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        let domain = &self.domains[domain_id];
        if !domain.contains(value) {
            return Ok(false);
        }
        if domain.size == 1 {
            return Err(EmptyDomain);
        }

        if value == domain.lower_bound {
            let _ = self.tighten_lower_bound(domain_id, value + 1)?;
        } else if value == domain.upper_bound {
            let _ = self.tighten_upper_bound(domain_id, value - 1)?;
        } else {
            self.record_change(domain_id, Some(value));
            let domain = &mut self.domains[domain_id];
            domain.is_value_in_domain[(value - domain.offset) as usize] = false;
            domain.size -= 1;
        }

        self.events.event_occurred(IntDomainEvent::Removal, domain_id);
        Ok(true)
    }

    pub(crate) fn make_assignment(
        &mut self,
        domain_id: DomainId,
        value: i32,
    ) -> Result<bool, EmptyDomain> {
        if !self.is_value_in_domain(domain_id, value) {
            return Err(EmptyDomain);
        }
        if self.is_domain_assigned(domain_id) {
            return Ok(false);
        }

        let lower_changed = self.tighten_lower_bound(domain_id, value)?;
        let upper_changed = self.tighten_upper_bound(domain_id, value)?;
        self.events.event_occurred(IntDomainEvent::Removal, domain_id);

        migsched_assert_moderate!(self.is_domain_assigned_to(domain_id, value));
        Ok(lower_changed || upper_changed)
    }

    /// Undoes every change made after `new_decision_level`. Pending events are dropped, since
    /// they describe changes which no longer exist.
    pub(crate) fn synchronise(&mut self, new_decision_level: usize) {
        let domains = &mut self.domains;
        self.trail.synchronise(new_decision_level).for_each(|change| {
            let domain = &mut domains[change.domain_id];
            domain.lower_bound = change.old_lower_bound;
            domain.upper_bound = change.old_upper_bound;
            domain.size = change.old_size;
            if let Some(value) = change.removed_value {
                domain.is_value_in_domain[(value - domain.offset) as usize] = true;
            }
        });
        let _ = self.events.drain().count();
    }

    #[cfg(any(test, feature = "debug-checks"))]
    pub(crate) fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub(crate) fn drain_domain_events(
        &mut self,
    ) -> impl Iterator<Item = (IntDomainEvent, DomainId)> + '_ {
        self.events.drain()
    }

    fn record_change(&mut self, domain_id: DomainId, removed_value: Option<i32>) {
        let domain = &self.domains[domain_id];
        self.trail.push(DomainChange {
            domain_id,
            old_lower_bound: domain.lower_bound,
            old_upper_bound: domain.upper_bound,
            old_size: domain.size,
            removed_value,
        });
    }

    fn notify_if_assigned(&mut self, domain_id: DomainId) {
        if self.is_domain_assigned(domain_id) {
            self.events.event_occurred(IntDomainEvent::Assign, domain_id);
        }
    }
}
