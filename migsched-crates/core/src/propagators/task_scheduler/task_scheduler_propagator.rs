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

/// A resource instance of the task scheduler. Resource `i` is the one a placement selects with
/// value `i`.
#[derive(Clone, Debug)]
pub struct ArgResource {
    /// The capacity of every dimension.
    pub capacity: Vec<i32>,
    /// The earliest moment a demanding task may arrive on the resource.
    pub hosting_start: DomainId,
    /// The latest moment a consuming task may stay on the resource.
    pub hosting_end: DomainId,
}

/// The arguments of the [`TaskSchedulerPropagator`].
#[derive(Clone, Debug)]
pub struct TaskSchedulerPropagatorArgs {
    pub resources: Vec<ArgResource>,
    pub consuming: Vec<ArgConsumingTask>,
    pub demanding: Vec<ArgDemandingTask>,
    /// `associations[d]` is the consuming task of the same entity as demanding task `d`.
    pub associations: Vec<Option<usize>>,
    pub options: TaskSchedulerOptions,
}

impl PropagatorConstructor for TaskSchedulerPropagatorArgs {
    type PropagatorImpl = TaskSchedulerPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let TaskSchedulerPropagatorArgs {
            resources,
            consuming,
            demanding,
            associations,
            options,
        } = self;

        let num_dimensions = resources
            .first()
            .map(|resource| resource.capacity.len())
            .unwrap_or(0);
        for (index, resource) in resources.iter().enumerate() {
            assert_eq!(
                num_dimensions,
                resource.capacity.len(),
                "the capacity of resource {index} does not cover every dimension"
            );
        }
        for task in consuming.iter() {
            assert!(
                task.resource >= 0 && (task.resource as usize) < resources.len(),
                "consuming task ending at {} is hosted on unknown resource {}",
                task.end,
                task.resource
            );
        }

        let tasks = Tasks::new(num_dimensions, consuming, demanding, &associations);
        let pools = resources
            .into_iter()
            .enumerate()
            .map(|(index, resource)| {
                LocalTaskScheduler::new(
                    index,
                    resource.capacity.into(),
                    Membership::new(&[index as i32]),
                    Some(resource.hosting_start),
                    Some(resource.hosting_end),
                    &tasks,
                )
            })
            .collect();

        TaskSchedulerPropagator {
            core: SchedulerCore::new(tasks, pools, options, &mut context),
        }
    }
}

/// Keeps the usage of every resource instance within its capacity, with one
/// [`LocalTaskScheduler`] per resource.
#[derive(Debug)]
pub struct TaskSchedulerPropagator {
    core: SchedulerCore,
}

impl Propagator for TaskSchedulerPropagator {
    fn name(&self) -> &str {
        "TaskScheduler"
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
