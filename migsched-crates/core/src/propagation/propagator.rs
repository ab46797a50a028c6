use downcast_rs::impl_downcast;
use downcast_rs::Downcast;

use super::contexts::Domains;
use super::contexts::PropagationContext;
use super::LocalId;
use crate::basic_types::PropagationStatusCP;
use crate::engine::IntDomainEvent;
#[cfg(doc)]
use crate::propagation::PropagatorConstructorContext;
use crate::statistics::StatisticLogger;

// Allows a `Box<dyn Propagator>` to be cast back to its concrete type through a
// `PropagatorHandle`.
impl_downcast!(Propagator);

/// A propagator removes values from domains which cannot be part of any solution, or reports a
/// contradiction when no value is left.
///
/// Only [`Propagator::name`] and [`Propagator::propagate_from_scratch`] are required. Propagators
/// which keep incremental state implement [`Propagator::propagate`], [`Propagator::notify`] and
/// [`Propagator::synchronise`] as well.
pub trait Propagator: Downcast {
    /// The name of the propagator, used when logging.
    fn name(&self) -> &str;

    /// Propagates using the current domains only, without relying on incrementally maintained
    /// state.
    ///
    /// With the `debug-checks` feature this is invoked after every fixed point, where it must not
    /// narrow any domain.
    fn propagate_from_scratch(&self, context: PropagationContext) -> PropagationStatusCP;

    /// Propagates using the incremental state kept by the propagator. Defaults to
    /// [`Propagator::propagate_from_scratch`].
    ///
    /// Propagators are not required to reach a fixed point themselves: changes they make are
    /// reported back to them like any other change.
    fn propagate(&mut self, context: PropagationContext) -> PropagationStatusCP {
        self.propagate_from_scratch(context)
    }

    /// Called when `event` happened to the variable registered under `local_id` (see
    /// [`PropagatorConstructorContext::register`]). Should only do cheap bookkeeping; the work
    /// belongs in [`Propagator::propagate`].
    fn notify(
        &mut self,
        _domains: Domains,
        _local_id: LocalId,
        _event: IntDomainEvent,
    ) -> EnqueueDecision {
        EnqueueDecision::Enqueue
    }

    /// Called after the search backtracked, so non-trailed bookkeeping can be reset.
    fn synchronise(&mut self, _domains: Domains) {}

    fn priority(&self) -> Priority {
        Priority::VeryLow
    }

    fn log_statistics(&self, _statistic_logger: StatisticLogger) {}
}

/// What to do with a propagator after it has been notified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnqueueDecision {
    Enqueue,
    Skip,
}

/// The order in which enqueued propagators run; cheaper propagators should use a higher priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    High = 0,
    Medium = 1,
    Low = 2,
    VeryLow = 3,
}

impl Priority {
    pub(crate) const NUM_LEVELS: u32 = 4;
}
