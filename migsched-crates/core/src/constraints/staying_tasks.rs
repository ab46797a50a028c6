use super::SchedulingRule;
use crate::engine::variables::DomainId;
use crate::propagators::StayingTask;

/// Creates the [`Constraint`](super::Constraint) which links whether an entity stays on its
/// current resource to its move duration and to the timing of its two tasks.
///
/// An entity which stays neither moves nor takes time, and its consuming task ends when its
/// demanding task starts. That hand-over happens at 0 when it does not use more than before;
/// otherwise it happens at `schedule_end`.
pub fn staying_tasks(tasks: Vec<StayingTask>, schedule_end: DomainId) -> SchedulingRule {
    SchedulingRule::StayingTasks {
        tasks,
        schedule_end,
    }
}
