use super::SchedulingRule;
use crate::engine::variables::DomainId;

/// Creates the [`Constraint`](super::Constraint) which forbids a value to be taken both by a
/// variable of `first_group` and by a variable of `second_group`, e.g. two sets of virtual
/// machines which may never share a node.
///
/// The variables take values in `0..num_values`. Panics when a group is empty.
pub fn disjoint(
    first_group: Vec<DomainId>,
    second_group: Vec<DomainId>,
    num_values: usize,
) -> SchedulingRule {
    assert!(
        !first_group.is_empty() && !second_group.is_empty(),
        "the groups of a disjoint constraint cannot be empty"
    );
    SchedulingRule::Disjoint {
        first_group,
        second_group,
        num_values,
    }
}

/// Creates the [`Constraint`](super::Constraint) which forbids a value to be taken by variables
/// of two different `groups`. Variables of the same group may share a value.
///
/// The variables take values in `0..num_values`. Panics when there are fewer than two groups, or
/// when a group is empty.
pub fn disjoint_multiple(groups: Vec<Vec<DomainId>>, num_values: usize) -> SchedulingRule {
    assert!(groups.len() >= 2, "a disjoint constraint needs at least two groups");
    for (index, group) in groups.iter().enumerate() {
        assert!(!group.is_empty(), "group {index} of the disjoint constraint is empty");
    }
    SchedulingRule::DisjointMultiple { groups, num_values }
}
