use crate::basic_types::PropagationStatusCP;
use crate::engine::variables::DomainId;
use crate::predicate;
use crate::propagation::DomainEvents;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;

/// An entity which is hosted now and will be hosted again, so it either stays on its current
/// resource or moves.
#[derive(Clone, Copy, Debug)]
pub struct StayingTask {
    /// The resource hosting the entity now, i.e. the resource of its consuming task.
    pub current: i32,
    /// The placement of its demanding task.
    pub placement: DomainId,
    /// A 0/1 variable which is 1 exactly when the entity stays.
    pub stays: DomainId,
    /// The duration of the move; 0 when the entity stays.
    pub duration: DomainId,
    /// Whether the entity uses at most as much after the reconfiguration as before, in every
    /// dimension.
    pub non_increasing: bool,
    pub consuming_end: DomainId,
    pub demanding_start: DomainId,
}

/// The arguments of the [`StayingTasksPropagator`].
#[derive(Clone, Debug)]
pub struct StayingTasksPropagatorArgs {
    pub tasks: Vec<StayingTask>,
    /// The moment at which the schedule ends.
    pub schedule_end: DomainId,
}

impl PropagatorConstructor for StayingTasksPropagatorArgs {
    type PropagatorImpl = StayingTasksPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let StayingTasksPropagatorArgs {
            tasks,
            schedule_end,
        } = self;

        let num_tasks = tasks.len() as u32;
        for (index, task) in tasks.iter().enumerate() {
            let index = index as u32;
            context.register(task.placement, DomainEvents::ANY_INT, LocalId::from(index));
            context.register(
                task.consuming_end,
                DomainEvents::BOUNDS,
                LocalId::from(num_tasks + index),
            );
            context.register(
                task.demanding_start,
                DomainEvents::BOUNDS,
                LocalId::from(2 * num_tasks + index),
            );
        }
        context.register(schedule_end, DomainEvents::BOUNDS, LocalId::from(3 * num_tasks));

        StayingTasksPropagator {
            tasks: tasks.into(),
            schedule_end,
        }
    }
}

/// Gives the two tasks of an entity their meaning once it is known whether the entity stays.
///
/// An entity placed on its current resource does not move: it stays, its move takes no time and
/// its consuming task ends exactly when its demanding task starts. When it does not use more than
/// before, the hand-over happens at 0. Otherwise it happens at the end of the schedule, so the
/// consuming task covers the entity until then. An entity which can no longer be placed on its
/// current resource moves, which takes time.
#[derive(Debug)]
pub struct StayingTasksPropagator {
    tasks: Box<[StayingTask]>,
    schedule_end: DomainId,
}

impl StayingTasksPropagator {
    fn filter(&self, context: &mut PropagationContext, task: &StayingTask) -> PropagationStatusCP {
        if context.is_fixed_to(task.placement, task.current) {
            let _ = context.post(predicate![task.stays == 1])?;
            let _ = context.post(predicate![task.duration == 0])?;
            if task.non_increasing {
                let _ = context.post(predicate![task.consuming_end == 0])?;
                make_bounds_equal(context, &[task.consuming_end, task.demanding_start])?;
            } else {
                make_bounds_equal(
                    context,
                    &[task.consuming_end, task.demanding_start, self.schedule_end],
                )?;
            }
        } else if !context.contains(task.placement, task.current) {
            let _ = context.post(predicate![task.stays == 0])?;
            let _ = context.post(predicate![task.duration != 0])?;
        }
        Ok(())
    }
}

/// Narrows every domain in `domain_ids` to the intersection of their bounds.
fn make_bounds_equal(
    context: &mut PropagationContext,
    domain_ids: &[DomainId],
) -> PropagationStatusCP {
    let lower_bound = domain_ids
        .iter()
        .map(|&domain_id| context.lower_bound(domain_id))
        .max()
        .unwrap_or(i32::MIN);
    let upper_bound = domain_ids
        .iter()
        .map(|&domain_id| context.upper_bound(domain_id))
        .min()
        .unwrap_or(i32::MAX);

    for &domain_id in domain_ids {
        let _ = context.post(predicate![domain_id >= lower_bound])?;
        let _ = context.post(predicate![domain_id <= upper_bound])?;
    }
    Ok(())
}

impl Propagator for StayingTasksPropagator {
    fn name(&self) -> &str {
        "StayingTasks"
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn propagate_from_scratch(&self, mut context: PropagationContext) -> PropagationStatusCP {
        self.tasks
            .iter()
            .try_for_each(|task| self.filter(&mut context, task))
    }
}

/// Checks the meaning of staying under fixed values.
pub(crate) fn check_staying_task(
    task: &StayingTask,
    schedule_end: i32,
    value_of: impl Fn(DomainId) -> i32,
) -> bool {
    let stays = value_of(task.placement) == task.current;
    if !stays {
        return value_of(task.stays) == 0 && value_of(task.duration) != 0;
    }

    let hand_over = value_of(task.consuming_end);
    let released = if task.non_increasing {
        hand_over == 0
    } else {
        hand_over == schedule_end
    };
    value_of(task.stays) == 1
        && value_of(task.duration) == 0
        && value_of(task.demanding_start) == hand_over
        && released
}
