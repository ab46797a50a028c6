use crate::basic_types::PropagatorConflict;

/// Checks that a task on `host` starting at `start` does so after every other task on `host` has
/// ended.
pub(crate) fn check_precedences(
    host: i32,
    start: i32,
    other_hosts: &[i32],
    other_ends: &[i32],
) -> Result<(), PropagatorConflict> {
    let overlaps = other_hosts
        .iter()
        .zip(other_ends)
        .any(|(&other_host, &end)| other_host == host && end > start);
    if overlaps {
        Err(PropagatorConflict::NoCompatibleHost)
    } else {
        Ok(())
    }
}
