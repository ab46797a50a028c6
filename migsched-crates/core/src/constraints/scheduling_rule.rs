use thiserror::Error;

use super::Constraint;
use crate::basic_types::PropagatorConflict;
use crate::basic_types::Solution;
use crate::engine::variables::DomainId;
use crate::propagators::disjoint::checker::check_disjoint_groups;
use crate::propagators::precedences::checker::check_precedences;
use crate::propagators::staying_tasks::check_staying_task;
use crate::propagators::task_scheduler::checker::check_pool_usage;
use crate::propagators::task_scheduler::tasks::Membership;
use crate::propagators::AliasedCumulativesPropagatorArgs;
use crate::propagators::ArgConsumingTask;
use crate::propagators::ArgDemandingTask;
use crate::propagators::ArgResource;
use crate::propagators::DisjointMultiplePropagatorArgs;
use crate::propagators::DisjointPropagatorArgs;
use crate::propagators::PrecedencesPropagatorArgs;
use crate::propagators::StayingTask;
use crate::propagators::StayingTasksPropagatorArgs;
use crate::propagators::TaskSchedulerPropagatorArgs;
use crate::ConstraintOperationError;
use crate::Solver;

/// The placement rules of a reconfiguration which are enforced by scheduling. Every variant holds
/// what is needed to create its propagator, and can verify a [`Solution`] on its own.
///
/// Rules are created with the functions in [`crate::constraints`], which check their inputs.
#[derive(Clone, Debug)]
pub enum SchedulingRule {
    /// See [`task_scheduler`](super::task_scheduler).
    TaskScheduler {
        resources: Vec<ArgResource>,
        consuming: Vec<ArgConsumingTask>,
        demanding: Vec<ArgDemandingTask>,
        associations: Vec<Option<usize>>,
    },
    /// See [`aliased_cumulatives`](super::aliased_cumulatives).
    AliasedCumulatives {
        capacity: Vec<i32>,
        aliases: Vec<i32>,
        horizon: DomainId,
        consuming: Vec<ArgConsumingTask>,
        demanding: Vec<ArgDemandingTask>,
        associations: Vec<Option<usize>>,
    },
    /// See [`disjoint`](super::disjoint).
    Disjoint {
        first_group: Vec<DomainId>,
        second_group: Vec<DomainId>,
        num_values: usize,
    },
    /// See [`disjoint_multiple`](super::disjoint_multiple).
    DisjointMultiple {
        groups: Vec<Vec<DomainId>>,
        num_values: usize,
    },
    /// See [`precedences`](super::precedences).
    Precedences {
        placement: DomainId,
        start: DomainId,
        other_hosts: Vec<i32>,
        other_ends: Vec<DomainId>,
    },
    /// See [`staying_tasks`](super::staying_tasks).
    StayingTasks {
        tasks: Vec<StayingTask>,
        schedule_end: DomainId,
    },
}

/// The way in which a [`Solution`] breaks a [`SchedulingRule`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum RuleViolation {
    #[error(transparent)]
    Conflict(#[from] PropagatorConflict),
    #[error("a task on resource {resource} lies outside the hosting window of the resource")]
    OutsideHostingWindow { resource: usize },
    #[error("staying task {index} is not scheduled the way its placement requires")]
    StayingTask { index: usize },
}

impl Constraint for SchedulingRule {
    fn post(self, solver: &mut Solver) -> Result<(), ConstraintOperationError> {
        #[cfg(feature = "debug-checks")]
        solver.record_rule(self.clone());

        let options = solver.options().task_scheduler;
        match self {
            SchedulingRule::TaskScheduler {
                resources,
                consuming,
                demanding,
                associations,
            } => {
                let _ = solver.add_propagator(TaskSchedulerPropagatorArgs {
                    resources,
                    consuming,
                    demanding,
                    associations,
                    options,
                })?;
            }
            SchedulingRule::AliasedCumulatives {
                capacity,
                aliases,
                horizon,
                consuming,
                demanding,
                associations,
            } => {
                let _ = solver.add_propagator(AliasedCumulativesPropagatorArgs {
                    capacity,
                    aliases,
                    horizon,
                    consuming,
                    demanding,
                    associations,
                    options,
                })?;
            }
            SchedulingRule::Disjoint {
                first_group,
                second_group,
                num_values,
            } => {
                let _ = solver.add_propagator(DisjointPropagatorArgs {
                    first_group: first_group.into(),
                    second_group: second_group.into(),
                    num_values,
                })?;
            }
            SchedulingRule::DisjointMultiple { groups, num_values } => {
                let _ = solver.add_propagator(DisjointMultiplePropagatorArgs {
                    groups: groups.into_iter().map(Vec::into_boxed_slice).collect(),
                    num_values,
                })?;
            }
            SchedulingRule::Precedences {
                placement,
                start,
                other_hosts,
                other_ends,
            } => {
                let _ = solver.add_propagator(PrecedencesPropagatorArgs {
                    placement,
                    start,
                    other_hosts: other_hosts.into(),
                    other_ends: other_ends.into(),
                })?;
            }
            SchedulingRule::StayingTasks {
                tasks,
                schedule_end,
            } => {
                let _ = solver.add_propagator(StayingTasksPropagatorArgs {
                    tasks,
                    schedule_end,
                })?;
            }
        }
        Ok(())
    }
}

impl SchedulingRule {
    /// Checks that `solution` satisfies the rule.
    pub fn check(&self, solution: &Solution) -> Result<(), RuleViolation> {
        let value_of = |domain_id: DomainId| solution.get_integer_value(domain_id);

        match self {
            SchedulingRule::TaskScheduler {
                resources,
                consuming,
                demanding,
                ..
            } => {
                for (index, resource) in resources.iter().enumerate() {
                    check_pool_usage(
                        index,
                        &resource.capacity,
                        &Membership::new(&[index as i32]),
                        consuming,
                        demanding,
                        value_of,
                    )?;

                    let leaves_late = consuming.iter().any(|task| {
                        task.resource == index as i32
                            && value_of(task.end) > value_of(resource.hosting_end)
                    });
                    let arrives_early = demanding.iter().any(|task| {
                        value_of(task.placement) == index as i32
                            && value_of(task.start) < value_of(resource.hosting_start)
                    });
                    if leaves_late || arrives_early {
                        return Err(RuleViolation::OutsideHostingWindow { resource: index });
                    }
                }
                Ok(())
            }
            SchedulingRule::AliasedCumulatives {
                capacity,
                aliases,
                horizon,
                consuming,
                demanding,
                ..
            } => {
                let members = Membership::new(aliases);
                let resource = aliases.iter().copied().min().unwrap_or_default() as usize;
                check_pool_usage(
                    resource,
                    capacity,
                    &members,
                    consuming,
                    demanding,
                    value_of,
                )?;

                let leaves_late = consuming.iter().any(|task| {
                    members.contains(task.resource) && value_of(task.end) > value_of(*horizon)
                });
                if leaves_late {
                    return Err(RuleViolation::OutsideHostingWindow { resource });
                }
                Ok(())
            }
            SchedulingRule::Disjoint {
                first_group,
                second_group,
                ..
            } => {
                let values = [first_group, second_group]
                    .into_iter()
                    .map(|group| group.iter().map(|&variable| value_of(variable)).collect())
                    .collect::<Vec<Vec<i32>>>();
                Ok(check_disjoint_groups(&values)?)
            }
            SchedulingRule::DisjointMultiple { groups, .. } => {
                let values = groups
                    .iter()
                    .map(|group| group.iter().map(|&variable| value_of(variable)).collect())
                    .collect::<Vec<Vec<i32>>>();
                Ok(check_disjoint_groups(&values)?)
            }
            SchedulingRule::Precedences {
                placement,
                start,
                other_hosts,
                other_ends,
            } => {
                let end_values = other_ends
                    .iter()
                    .map(|&end| value_of(end))
                    .collect::<Vec<_>>();
                Ok(check_precedences(
                    value_of(*placement),
                    value_of(*start),
                    other_hosts,
                    &end_values,
                )?)
            }
            SchedulingRule::StayingTasks {
                tasks,
                schedule_end,
            } => {
                let schedule_end = value_of(*schedule_end);
                match tasks
                    .iter()
                    .position(|task| !check_staying_task(task, schedule_end, value_of))
                {
                    Some(index) => Err(RuleViolation::StayingTask { index }),
                    None => Ok(()),
                }
            }
        }
    }
}
