use super::SchedulingRule;
use crate::engine::variables::DomainId;

/// Creates the [`Constraint`](super::Constraint) which lets the task placed by `placement` start
/// only once every other task hosted on the same resource has ended. Other task `i` is hosted on
/// `other_hosts[i]` and ends at `other_ends[i]`.
///
/// Panics when there are no other tasks, or when `other_hosts` and `other_ends` differ in length.
pub fn precedences(
    placement: DomainId,
    start: DomainId,
    other_hosts: Vec<i32>,
    other_ends: Vec<DomainId>,
) -> SchedulingRule {
    assert!(!other_hosts.is_empty(), "there must be at least one other task");
    assert_eq!(
        other_hosts.len(),
        other_ends.len(),
        "every other task needs both a host and an end"
    );
    SchedulingRule::Precedences {
        placement,
        start,
        other_hosts,
        other_ends,
    }
}
