use super::local_task_scheduler::LocalTaskScheduler;
use super::scheduler_core::SchedulerCore;
use super::tasks::Membership;
use super::tasks::Tasks;
use super::ArgConsumingTask;
use super::ArgDemandingTask;
use super::TaskSchedulerOptions;
use crate::basic_types::PropagationStatusCP;
use crate::engine::variables::DomainId;
use crate::propagation::Domains;
use crate::propagation::EnqueueDecision;
use crate::propagation::IntDomainEvent;
use crate::propagation::LocalId;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::statistics::StatisticLogger;

/// The arguments of the [`AliasedCumulativesPropagator`].
///
/// A task is on the pool when its resource, or the value of its placement, is one of the
/// `aliases`. Consuming tasks hosted elsewhere are ignored.
#[derive(Clone, Debug)]
pub struct AliasedCumulativesPropagatorArgs {
    /// The capacity of every dimension, shared by all aliases.
    pub capacity: Vec<i32>,
    pub aliases: Vec<i32>,
    /// Every consuming task on the pool ends by the horizon.
    pub horizon: DomainId,
    pub consuming: Vec<ArgConsumingTask>,
    pub demanding: Vec<ArgDemandingTask>,
    /// `associations[d]` is the consuming task of the same entity as demanding task `d`.
    pub associations: Vec<Option<usize>>,
    pub options: TaskSchedulerOptions,
}

impl PropagatorConstructor for AliasedCumulativesPropagatorArgs {
    type PropagatorImpl = AliasedCumulativesPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let AliasedCumulativesPropagatorArgs {
            capacity,
            aliases,
            horizon,
            consuming,
            demanding,
            associations,
            options,
        } = self;

        assert!(!aliases.is_empty(), "a capacity pool needs at least one alias");
        let resource = aliases.iter().copied().min().unwrap_or_default() as usize;

        let tasks = Tasks::new(capacity.len(), consuming, demanding, &associations);
        let pool = LocalTaskScheduler::new(
            resource,
            capacity.into(),
            Membership::new(&aliases),
            None,
            Some(horizon),
            &tasks,
        );

        AliasedCumulativesPropagator {
            core: SchedulerCore::new(tasks, vec![pool], options, &mut context),
        }
    }
}

/// Keeps the usage of several resource identifiers folded into one capacity pool within the
/// shared capacity. Conflicts name the smallest alias as the resource.
#[derive(Debug)]
pub struct AliasedCumulativesPropagator {
    core: SchedulerCore,
}

impl Propagator for AliasedCumulativesPropagator {
    fn name(&self) -> &str {
        "AliasedCumulatives"
    }

    fn propagate_from_scratch(&self, context: PropagationContext) -> PropagationStatusCP {
        self.core.propagate_from_scratch(context)
    }

    fn propagate(&mut self, context: PropagationContext) -> PropagationStatusCP {
        self.core.propagate(context)
    }

    fn notify(
        &mut self,
        domains: Domains,
        local_id: LocalId,
        _event: IntDomainEvent,
    ) -> EnqueueDecision {
        self.core.notify(domains, local_id)
    }

    fn synchronise(&mut self, _domains: Domains) {
        self.core.synchronise();
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.core.log_statistics(statistic_logger);
    }
}
