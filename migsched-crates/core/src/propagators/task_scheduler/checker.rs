use super::profile::Profile;
use super::tasks::Membership;
use super::ArgConsumingTask;
use super::ArgDemandingTask;
use crate::basic_types::PropagatorConflict;
use crate::engine::variables::DomainId;

/// Replays the usage of one pool under fixed values: a consuming task hosted on a member occupies
/// it on `[0, end)`, and a demanding task placed on a member occupies it from its start onwards.
/// Reports the first moment at which the usage exceeds the capacity.
pub(crate) fn check_pool_usage(
    resource: usize,
    capacity: &[i32],
    members: &Membership,
    consuming: &[ArgConsumingTask],
    demanding: &[ArgDemandingTask],
    value_of: impl Fn(DomainId) -> i32,
) -> Result<(), PropagatorConflict> {
    let mut profile = Profile::default();
    profile.reset(&vec![0; capacity.len()]);

    for task in consuming.iter().filter(|task| members.contains(task.resource)) {
        profile.add_change(0, &task.usage, 1);
        profile.add_change(value_of(task.end), &task.usage, -1);
    }
    for task in demanding
        .iter()
        .filter(|task| members.contains(value_of(task.placement)))
    {
        profile.add_change(value_of(task.start), &task.usage, 1);
    }
    profile.build();

    for index in 0..profile.len() {
        if let Some(dimension) = profile.exceeded_dimension(index, capacity) {
            return Err(PropagatorConflict::CapacityExceeded {
                resource,
                dimension,
                time: profile.time(index),
            });
        }
    }
    Ok(())
}
