use super::SchedulingRule;
use crate::engine::variables::DomainId;
use crate::propagators::ArgConsumingTask;
use crate::propagators::ArgDemandingTask;
use crate::propagators::ArgResource;

/// Creates the task scheduler [`Constraint`](super::Constraint), which keeps the usage of every
/// resource instance within its capacity throughout a reconfiguration.
///
/// A consuming task occupies its resource from time 0 until its end; a demanding task occupies
/// the resource selected by its placement, where value `i` selects `resources[i]`, from its start
/// onwards. `associations[d]` names the consuming task of the same entity as demanding task `d`,
/// if the entity is hosted both before and after the reconfiguration.
///
/// The propagation can be tuned through
/// [`SolverOptions::task_scheduler`](crate::options::SolverOptions::task_scheduler).
///
/// Panics when the inputs do not agree with each other: every capacity and every usage must cover
/// the same dimensions, every consuming task must be hosted on one of the `resources`, and the
/// associations must link distinct consuming tasks.
pub fn task_scheduler(
    resources: Vec<ArgResource>,
    consuming: Vec<ArgConsumingTask>,
    demanding: Vec<ArgDemandingTask>,
    associations: Vec<Option<usize>>,
) -> SchedulingRule {
    assert!(
        !resources.is_empty(),
        "the task scheduler needs at least one resource"
    );
    let num_dimensions = resources[0].capacity.len();
    for (index, resource) in resources.iter().enumerate() {
        assert_eq!(
            num_dimensions,
            resource.capacity.len(),
            "the capacity of resource {index} does not cover every dimension"
        );
    }
    check_tasks(num_dimensions, &consuming, &demanding, &associations);

    SchedulingRule::TaskScheduler {
        resources,
        consuming,
        demanding,
        associations,
    }
}

/// Creates the aliased cumulative [`Constraint`](super::Constraint): the resources named by
/// `aliases` form a single pool which shares `capacity`.
///
/// Only tasks hosted on, or placed on, one of the aliases are counted. Every consuming task on the
/// pool ends by `horizon`.
///
/// Panics when `aliases` is empty, or when the tasks do not agree with `capacity` (see
/// [`task_scheduler`]).
pub fn aliased_cumulatives(
    capacity: Vec<i32>,
    aliases: Vec<i32>,
    horizon: DomainId,
    consuming: Vec<ArgConsumingTask>,
    demanding: Vec<ArgDemandingTask>,
    associations: Vec<Option<usize>>,
) -> SchedulingRule {
    assert!(!aliases.is_empty(), "a capacity pool needs at least one alias");
    check_tasks(capacity.len(), &consuming, &demanding, &associations);

    SchedulingRule::AliasedCumulatives {
        capacity,
        aliases,
        horizon,
        consuming,
        demanding,
        associations,
    }
}

fn check_tasks(
    num_dimensions: usize,
    consuming: &[ArgConsumingTask],
    demanding: &[ArgDemandingTask],
    associations: &[Option<usize>],
) {
    assert_eq!(
        demanding.len(),
        associations.len(),
        "there must be one association entry per demanding task"
    );
    let usages = consuming
        .iter()
        .map(|task| &task.usage)
        .chain(demanding.iter().map(|task| &task.usage));
    for usage in usages {
        assert_eq!(
            num_dimensions,
            usage.len(),
            "the capacity does not cover every dimension of usage {usage:?}"
        );
    }

    let mut is_associated = vec![false; consuming.len()];
    for (index, &association) in associations.iter().enumerate() {
        if let Some(consuming_index) = association {
            assert!(
                consuming_index < consuming.len(),
                "demanding task {index} is associated to unknown consuming task {consuming_index}"
            );
            assert!(
                !is_associated[consuming_index],
                "consuming task {consuming_index} is associated more than once"
            );
            is_associated[consuming_index] = true;
        }
    }
}
