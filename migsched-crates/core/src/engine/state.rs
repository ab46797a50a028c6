use log::trace;

use crate::basic_types::Inconsistency;
use crate::create_statistics_struct;
use crate::engine::predicates::Predicate;
use crate::engine::variables::DomainId;
use crate::engine::Assignments;
use crate::engine::EmptyDomain;
use crate::engine::IntDomainEvent;
use crate::engine::PropagatorQueue;
use crate::engine::TrailedValues;
use crate::engine::VariableNames;
use crate::engine::WatchListCP;
use crate::migsched_assert_eq_simple;
use crate::migsched_assert_simple;
use crate::propagation::store::PropagatorStore;
use crate::propagation::Domains;
use crate::propagation::EnqueueDecision;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::PropagatorHandle;
use crate::propagation::PropagatorId;
use crate::statistics::log_statistic;
use crate::statistics::StatisticLogger;

/// The container of variables and propagators, and the engine which propagates them to a fixed
/// point.
#[derive(Debug)]
pub(crate) struct State {
    /// Propagators live here and are queried when the domains they watch change.
    pub(crate) propagators: PropagatorStore,
    pub(crate) assignments: Assignments,
    /// Values which automatically backtrack together with the domains.
    pub(crate) trailed_values: TrailedValues,
    pub(crate) variable_names: VariableNames,
    /// Dictates the order in which propagators are called.
    propagator_queue: PropagatorQueue,
    watch_list: WatchListCP,
    /// Reused between notification rounds.
    event_buffer: Vec<(IntDomainEvent, DomainId)>,
    statistics: StateStatistics,
}

create_statistics_struct!(StateStatistics {
    num_propagators_called: u64,
    /// The number of domain events produced by propagators.
    num_propagations: u64,
    num_conflicts: u64,
});

impl Default for State {
    fn default() -> Self {
        State {
            propagators: PropagatorStore::default(),
            assignments: Assignments::default(),
            trailed_values: TrailedValues::default(),
            variable_names: VariableNames::default(),
            propagator_queue: PropagatorQueue::default(),
            watch_list: WatchListCP::default(),
            event_buffer: Vec::new(),
            statistics: StateStatistics::default(),
        }
    }
}

impl State {
    pub(crate) fn log_statistics(&self, verbose: bool) {
        log_statistic("variables", self.assignments.num_domains());
        log_statistic("propagators", self.propagators.keys().count());
        log_statistic("failures", self.statistics.num_conflicts);
        log_statistic("propagations", self.statistics.num_propagators_called);
        if verbose {
            log_statistic("domainEvents", self.statistics.num_propagations);
            for (index, propagator) in self.propagators.iter_propagators().enumerate() {
                propagator
                    .log_statistics(StatisticLogger::for_propagator(propagator.name(), index));
            }
        }
    }
}

/// Creation of variables.
impl State {
    pub(crate) fn new_interval_variable(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: Option<String>,
    ) -> DomainId {
        self.watch_list.grow();
        let domain_id = self.assignments.grow(lower_bound, upper_bound);
        if let Some(name) = name {
            self.variable_names.add_integer(domain_id, name);
        }
        domain_id
    }

    pub(crate) fn new_sparse_variable(&mut self, values: Vec<i32>, name: Option<String>) -> DomainId {
        self.watch_list.grow();
        let domain_id = self.assignments.create_new_integer_variable_sparse(values);
        if let Some(name) = name {
            self.variable_names.add_integer(domain_id, name);
        }
        domain_id
    }
}

/// Queries on the domains.
impl State {
    pub(crate) fn lower_bound(&self, variable: DomainId) -> i32 {
        self.assignments.get_lower_bound(variable)
    }

    pub(crate) fn upper_bound(&self, variable: DomainId) -> i32 {
        self.assignments.get_upper_bound(variable)
    }

    pub(crate) fn contains(&self, variable: DomainId, value: i32) -> bool {
        self.assignments.is_value_in_domain(variable, value)
    }

    pub(crate) fn fixed_value(&self, variable: DomainId) -> Option<i32> {
        self.assignments.get_assigned_value(variable)
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.assignments.get_decision_level()
    }
}

/// Operations on propagators.
impl State {
    /// Adds a propagator and enqueues it. The propagator does not run until the next call to
    /// [`State::propagate_to_fixed_point`].
    pub(crate) fn add_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> PropagatorHandle<Constructor::PropagatorImpl>
    where
        Constructor: PropagatorConstructor,
        Constructor::PropagatorImpl: 'static,
    {
        let propagator_id = self.propagators.new_propagator().key();
        let constructor_context = PropagatorConstructorContext::new(
            &mut self.watch_list,
            &self.assignments,
            &mut self.trailed_values,
            propagator_id,
        );
        let propagator = constructor.create(constructor_context);
        let priority = propagator.priority();

        let slot = self.propagators.new_propagator();
        let populated_id = slot.populate(Box::new(propagator));
        migsched_assert_eq_simple!(propagator_id, populated_id);

        self.propagator_queue
            .enqueue_propagator(propagator_id, priority);

        PropagatorHandle::new(propagator_id)
    }

    pub(crate) fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.propagators.get_propagator(handle)
    }
}

/// Operations which modify the domains.
impl State {
    /// Applies `predicate` without propagating. Returns whether a domain changed.
    pub(crate) fn post(&mut self, predicate: Predicate) -> Result<bool, EmptyDomain> {
        self.assignments.post_predicate(predicate)
    }

    /// Creates a checkpoint which [`State::restore_to`] can return to. Only allowed at a fixed
    /// point.
    pub(crate) fn new_checkpoint(&mut self) {
        migsched_assert_simple!(
            self.propagator_queue.is_empty(),
            "Can only create a new checkpoint when all propagation has occurred"
        );
        self.assignments.new_checkpoint();
        self.trailed_values.new_checkpoint();
    }

    /// Undoes every change made after `checkpoint` and lets the propagators resynchronise.
    pub(crate) fn restore_to(&mut self, checkpoint: usize) {
        migsched_assert_simple!(checkpoint <= self.get_checkpoint());
        if checkpoint == self.get_checkpoint() && self.propagator_queue.is_empty() {
            return;
        }

        self.assignments.synchronise(checkpoint);
        self.trailed_values.synchronise(checkpoint);
        self.propagator_queue.clear();

        for propagator in self.propagators.iter_propagators_mut() {
            propagator.synchronise(Domains::new(&self.assignments, &self.trailed_values));
        }
    }

    /// Runs the enqueued propagators, and those enqueued as a consequence, until none is left.
    ///
    /// After an [`Err`] the only meaningful operation is [`State::restore_to`].
    pub(crate) fn propagate_to_fixed_point(&mut self) -> Result<(), Inconsistency> {
        self.notify_propagators_about_domain_events();

        while let Some(propagator_id) = self.propagator_queue.pop() {
            if let Err(inconsistency) = self.propagate(propagator_id) {
                self.statistics.num_conflicts += 1;
                trace!(
                    "{} failed: {inconsistency:?}",
                    self.propagators[propagator_id].name()
                );

                self.propagator_queue.clear();
                let _ = self.assignments.drain_domain_events().count();
                return Err(inconsistency);
            }
            self.notify_propagators_about_domain_events();
        }

        #[cfg(feature = "debug-checks")]
        self.debug_check_fixed_point();

        Ok(())
    }

    fn propagate(&mut self, propagator_id: PropagatorId) -> Result<(), Inconsistency> {
        self.statistics.num_propagators_called += 1;

        let propagator = &mut self.propagators[propagator_id];
        let context = PropagationContext::new(
            &mut self.assignments,
            &mut self.trailed_values,
            propagator_id,
        );
        propagator.propagate(context)
    }

    fn notify_propagators_about_domain_events(&mut self) {
        self.event_buffer.clear();
        self.event_buffer
            .extend(self.assignments.drain_domain_events());
        self.statistics.num_propagations += self.event_buffer.len() as u64;

        for &(event, domain) in self.event_buffer.iter() {
            for watcher in self.watch_list.get_affected_propagators(event, domain) {
                let propagator = &mut self.propagators[watcher.propagator];
                let decision = propagator.notify(
                    Domains::new(&self.assignments, &self.trailed_values),
                    watcher.variable,
                    event,
                );
                if decision == EnqueueDecision::Enqueue {
                    let priority = propagator.priority();
                    self.propagator_queue
                        .enqueue_propagator(watcher.propagator, priority);
                }
            }
        }
    }

    /// The names of the propagators which narrow a domain, or fail, when started from scratch on
    /// the current domains. At a fixed point there are none.
    #[cfg(any(test, feature = "debug-checks"))]
    pub(crate) fn propagators_off_fixed_point(&self) -> Vec<&str> {
        self.propagators
            .keys()
            .filter(|&propagator_id| {
                let mut assignments = self.assignments.clone();
                let mut trailed_values = self.trailed_values.clone();
                let context =
                    PropagationContext::new(&mut assignments, &mut trailed_values, propagator_id);
                let result = self.propagators[propagator_id].propagate_from_scratch(context);
                result.is_err() || assignments.has_pending_events()
            })
            .map(|propagator_id| self.propagators[propagator_id].name())
            .collect()
    }

    #[cfg(feature = "debug-checks")]
    fn debug_check_fixed_point(&self) {
        let narrowing = self.propagators_off_fixed_point();
        assert!(
            narrowing.is_empty(),
            "{narrowing:?} did not reach their fixed point"
        );
    }
}
