use crate::basic_types::PropagatorConflict;

/// Checks that no value is taken by variables of two different groups, given the fixed values of
/// every group.
pub(crate) fn check_disjoint_groups(groups: &[Vec<i32>]) -> Result<(), PropagatorConflict> {
    for (group, values) in groups.iter().enumerate() {
        for (other, other_values) in groups.iter().enumerate().skip(group + 1) {
            if let Some(&value) = values.iter().find(|value| other_values.contains(value)) {
                return Err(PropagatorConflict::SharedValue {
                    value,
                    first_group: group,
                    second_group: other,
                });
            }
        }
    }
    Ok(())
}
