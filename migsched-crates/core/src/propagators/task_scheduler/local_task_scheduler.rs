use log::debug;
use log::log_enabled;
use log::Level;

use super::profile::Profile;
use super::tasks::Membership;
use super::tasks::Tasks;
use super::TaskSchedulerOptions;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagatorConflict;
use crate::engine::variables::DomainId;
use crate::predicate;
use crate::propagation::PropagationContext;
use crate::propagation::ReadDomains;

/// Scratch space reused between rounds.
#[derive(Clone, Debug, Default)]
pub(crate) struct ScheduleBuffers {
    /// The demanding tasks fixed on the pool.
    fixed_in: Vec<usize>,
    /// The usage which is present in every completion of the current domains.
    minimum: Profile,
    /// An upper bound on the usage of every completion of the current domains.
    maximum: Profile,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RoundOutcome {
    /// Nothing can change anymore on this pool until the search backtracks.
    Entailed,
    Propagated,
    /// The start tightening was skipped since the free capacity covers every arriving task.
    FastPath,
}

/// Keeps the usage of one capacity pool within its capacity.
///
/// The pool is made of the resources in `members`. Consuming tasks hosted on a member occupy the
/// pool from time 0 until their end; demanding tasks occupy it from their start onwards once their
/// placement takes a member. Every round rebuilds two usage profiles from the current bounds:
/// - the minimum profile holds the usage every completion has: consuming tasks until their
///   earliest end, and fixed demanding tasks from their latest start;
/// - the maximum profile holds the usage no completion exceeds: consuming tasks until their latest
///   end, and every candidate demanding task from its earliest start.
///
/// When a demanding task is placed on the resource of its associated consuming task and the usage
/// grows in some dimension, the release of the consuming task swaps sides: it leaves the minimum
/// profile at its latest end and the maximum profile at its earliest end.
#[derive(Clone, Debug)]
pub(crate) struct LocalTaskScheduler {
    /// Identifies the pool in conflicts and logs.
    pub(crate) resource: usize,
    capacity: Box<[i32]>,
    pub(crate) members: Membership,
    /// The earliest moment a demanding task may arrive.
    pub(crate) hosting_start: Option<DomainId>,
    /// The latest moment a consuming task may stay.
    pub(crate) hosting_end: Option<DomainId>,
    /// The consuming tasks hosted on a member.
    pub(crate) out: Box<[usize]>,
    startup_usage: Box<[i32]>,
}

impl LocalTaskScheduler {
    pub(crate) fn new(
        resource: usize,
        capacity: Box<[i32]>,
        members: Membership,
        hosting_start: Option<DomainId>,
        hosting_end: Option<DomainId>,
        tasks: &Tasks,
    ) -> LocalTaskScheduler {
        let out = tasks
            .consuming
            .iter()
            .enumerate()
            .filter(|(_, task)| members.contains(task.resource))
            .map(|(index, _)| index)
            .collect::<Box<[_]>>();

        let mut startup_usage = vec![0; capacity.len()];
        for &c in out.iter() {
            startup_usage
                .iter_mut()
                .zip(tasks.consuming[c].usage.iter())
                .for_each(|(total, usage)| *total += usage);
        }

        LocalTaskScheduler {
            resource,
            capacity,
            members,
            hosting_start,
            hosting_end,
            out,
            startup_usage: startup_usage.into(),
        }
    }

    /// Runs one round over the given candidates, the demanding tasks whose placement may still
    /// take a member.
    pub(crate) fn schedule(
        &self,
        context: &mut PropagationContext,
        tasks: &Tasks,
        candidates: &[usize],
        options: TaskSchedulerOptions,
        buffers: &mut ScheduleBuffers,
    ) -> Result<RoundOutcome, Inconsistency> {
        buffers.fixed_in.clear();
        buffers.fixed_in.extend(candidates.iter().copied().filter(|&d| {
            self.members
                .is_fixed_inside(tasks.demanding[d].placement, &*context)
        }));

        let fast_path = options.fast_path && self.admit_without_delay(context, tasks, buffers)?;

        self.build_profiles(context, tasks, candidates, buffers)?;
        self.check_capacity(&buffers.minimum)?;

        if buffers.fixed_in.len() == candidates.len()
            && self.is_fully_instantiated(&*context, tasks, &buffers.fixed_in)
        {
            return Ok(RoundOutcome::Entailed);
        }

        self.tighten_end_upper_bounds(context, tasks, &buffers.minimum)?;
        if !fast_path {
            self.tighten_start_lower_bounds(context, tasks, buffers)?;
            if options.start_upper_bound_dominance {
                self.tighten_start_upper_bounds(context, tasks, buffers)?;
            }
        }

        if log_enabled!(Level::Debug) {
            self.log_round(&*context, tasks, buffers);
        }

        Ok(if fast_path {
            RoundOutcome::FastPath
        } else {
            RoundOutcome::Propagated
        })
    }

    /// Whether the consuming task is replaced by its associated demanding task on its own host.
    fn consuming_stays(&self, domains: &impl ReadDomains, tasks: &Tasks, c: usize) -> bool {
        tasks
            .associated_demanding(c)
            .is_some_and(|d| tasks.stays_on_host(c, d, domains))
    }

    /// Whether the demanding task replaces its associated consuming task on the same resource.
    fn demanding_stays(&self, domains: &impl ReadDomains, tasks: &Tasks, d: usize) -> bool {
        tasks
            .associated_consuming(d)
            .is_some_and(|c| tasks.stays_on_host(c, d, domains))
    }

    /// Staying with a usage which grows in at least one dimension.
    fn is_increasing(&self, domains: &impl ReadDomains, tasks: &Tasks, c: usize) -> bool {
        if !self.consuming_stays(domains, tasks, c) {
            return false;
        }
        tasks.associated_demanding(c).is_some_and(|d| {
            tasks.demanding[d]
                .usage
                .iter()
                .zip(tasks.consuming[c].usage.iter())
                .any(|(arriving, leaving)| arriving > leaving)
        })
    }

    /// Applies the fast admission path when the free capacity at time 0 strictly exceeds the
    /// demand of the fixed demanding tasks in every dimension: every free start only has to wait
    /// for the pool to open.
    fn admit_without_delay(
        &self,
        context: &mut PropagationContext,
        tasks: &Tasks,
        buffers: &ScheduleBuffers,
    ) -> Result<bool, Inconsistency> {
        let Some(opening) = self.hosting_start.and_then(|start| context.fixed_value(start)) else {
            return Ok(false);
        };

        let fits = (0..self.capacity.len()).all(|dimension| {
            let demand: i32 = buffers
                .fixed_in
                .iter()
                .map(|&d| tasks.demanding[d].usage[dimension])
                .sum();
            self.capacity[dimension] - self.startup_usage[dimension] > demand
        });
        if !fits {
            return Ok(false);
        }

        for &d in buffers.fixed_in.iter() {
            let start = tasks.demanding[d].start;
            if !context.is_fixed(start) && !self.demanding_stays(&*context, tasks, d) {
                let _ = context.post(predicate![start >= opening])?;
            }
        }
        Ok(true)
    }

    /// Rebuilds both profiles. Along the way the hosting window and the task bounds are aligned:
    /// consuming tasks end before the pool closes, and fixed demanding tasks start after it opens.
    fn build_profiles(
        &self,
        context: &mut PropagationContext,
        tasks: &Tasks,
        candidates: &[usize],
        buffers: &mut ScheduleBuffers,
    ) -> Result<(), Inconsistency> {
        buffers.minimum.reset(&self.startup_usage);
        buffers.maximum.reset(&self.startup_usage);

        let closing = self.hosting_end.map(|end| context.upper_bound(end));
        let mut latest_end = None;
        for &c in self.out.iter() {
            let task = &tasks.consuming[c];
            if let Some(closing) = closing {
                let _ = context.post(predicate![task.end <= closing])?;
            }

            let lower_bound = context.lower_bound(task.end);
            let upper_bound = context.upper_bound(task.end);
            if self.is_increasing(&*context, tasks, c) {
                buffers.maximum.add_change(lower_bound, &task.usage, -1);
                buffers.minimum.add_change(upper_bound, &task.usage, -1);
            } else {
                buffers.minimum.add_change(lower_bound, &task.usage, -1);
                buffers.maximum.add_change(upper_bound, &task.usage, -1);
            }
            latest_end = latest_end.max(Some(lower_bound));
        }
        if let (Some(hosting_end), Some(latest_end)) = (self.hosting_end, latest_end) {
            let _ = context.post(predicate![hosting_end >= latest_end])?;
        }

        let opening = self.hosting_start.map(|start| context.lower_bound(start));
        let mut latest_start = None;
        for &d in candidates {
            let task = &tasks.demanding[d];
            if self.members.is_fixed_inside(task.placement, &*context) {
                if let Some(opening) = opening {
                    let _ = context.post(predicate![task.start >= opening])?;
                }
                let upper_bound = context.upper_bound(task.start);
                buffers.minimum.add_change(upper_bound, &task.usage, 1);
                latest_start = latest_start.max(Some(upper_bound));
            }
            buffers
                .maximum
                .add_change(context.lower_bound(task.start), &task.usage, 1);
        }
        if let (Some(hosting_start), Some(latest_start)) = (self.hosting_start, latest_start) {
            let _ = context.post(predicate![hosting_start <= latest_start])?;
        }

        buffers.minimum.build();
        buffers.maximum.build();
        Ok(())
    }

    fn check_capacity(&self, minimum: &Profile) -> Result<(), PropagatorConflict> {
        for index in 0..minimum.len() {
            if let Some(dimension) = minimum.exceeded_dimension(index, &self.capacity) {
                return Err(PropagatorConflict::CapacityExceeded {
                    resource: self.resource,
                    dimension,
                    time: minimum.time(index),
                });
            }
        }
        Ok(())
    }

    /// Every time variable is fixed. A staying pair is no exception: its hand-over moment is only
    /// settled by [`StayingTasks`](crate::propagators::StayingTasksPropagator).
    fn is_fully_instantiated(
        &self,
        domains: &impl ReadDomains,
        tasks: &Tasks,
        fixed_in: &[usize],
    ) -> bool {
        [self.hosting_start, self.hosting_end]
            .into_iter()
            .flatten()
            .chain(self.out.iter().map(|&c| tasks.consuming[c].end))
            .chain(fixed_in.iter().map(|&d| tasks.demanding[d].start))
            .all(|var| domains.is_fixed(var))
    }

    /// A consuming task cannot be running at a moment where its usage on top of the minimum
    /// profile overflows, so it ends by the first such moment after its earliest end.
    fn tighten_end_upper_bounds(
        &self,
        context: &mut PropagationContext,
        tasks: &Tasks,
        minimum: &Profile,
    ) -> Result<(), Inconsistency> {
        let closing = self.hosting_end.map(|end| context.upper_bound(end));

        for &c in self.out.iter() {
            let task = &tasks.consuming[c];
            if context.is_fixed(task.end) || self.consuming_stays(&*context, tasks, c) {
                continue;
            }

            let lower_bound = context.lower_bound(task.end);
            let upper_bound = context.upper_bound(task.end);
            let overflow = (0..minimum.len())
                .map(|index| (index, minimum.time(index)))
                .take_while(|&(_, time)| time < upper_bound)
                .find(|&(index, time)| {
                    time >= lower_bound
                        && minimum.overflows_with(index, &task.usage, &self.capacity)
                })
                .map(|(_, time)| time);

            let bound = match (overflow, closing) {
                (Some(time), Some(closing)) => time.min(closing),
                (Some(time), None) => time,
                (None, Some(closing)) => closing,
                (None, None) => continue,
            };
            let _ = context.post(predicate![task.end <= bound])?;
        }
        Ok(())
    }

    /// A fixed demanding task cannot be running during a segment where its usage on top of the
    /// minimum profile overflows, so it starts after the last such segment before its latest
    /// start.
    fn tighten_start_lower_bounds(
        &self,
        context: &mut PropagationContext,
        tasks: &Tasks,
        buffers: &ScheduleBuffers,
    ) -> Result<(), Inconsistency> {
        let minimum = &buffers.minimum;

        for &d in buffers.fixed_in.iter() {
            let task = &tasks.demanding[d];
            if context.is_fixed(task.start) || self.demanding_stays(&*context, tasks, d) {
                continue;
            }

            let lower_bound = context.lower_bound(task.start);
            let upper_bound = context.upper_bound(task.start);
            let segment_end = (1..minimum.len())
                .rev()
                .map(|index| (index, minimum.time(index)))
                .take_while(|&(_, time)| time > lower_bound)
                .find(|&(index, time)| {
                    time <= upper_bound
                        && minimum.overflows_with(index - 1, &task.usage, &self.capacity)
                })
                .map(|(_, time)| time);

            if let Some(segment_end) = segment_end {
                let _ = context.post(predicate![task.start >= segment_end])?;
            }
        }
        Ok(())
    }

    /// From the first moment after which the maximum profile stays within the capacity, nothing
    /// can prevent a fixed demanding task from running, so starting later is never needed.
    fn tighten_start_upper_bounds(
        &self,
        context: &mut PropagationContext,
        tasks: &Tasks,
        buffers: &ScheduleBuffers,
    ) -> Result<(), Inconsistency> {
        let maximum = &buffers.maximum;
        let mut settled_from = None;
        for index in (0..maximum.len()).rev() {
            if maximum.exceeded_dimension(index, &self.capacity).is_some() {
                break;
            }
            settled_from = Some(maximum.time(index));
        }
        let Some(settled_from) = settled_from else {
            return Ok(());
        };

        for &d in buffers.fixed_in.iter() {
            let task = &tasks.demanding[d];
            if context.is_fixed(task.start) || self.demanding_stays(&*context, tasks, d) {
                continue;
            }
            let bound = settled_from.max(context.lower_bound(task.start));
            let _ = context.post(predicate![task.start <= bound])?;
        }
        Ok(())
    }

    fn log_round(&self, domains: &impl ReadDomains, tasks: &Tasks, buffers: &ScheduleBuffers) {
        debug!(
            "Resource {} (members {:?}, capacity {:?})",
            self.resource,
            self.members.members(),
            self.capacity
        );
        debug!("  minimum profile: {}", buffers.minimum);
        debug!("  maximum profile: {}", buffers.maximum);
        for &c in self.out.iter() {
            let end = tasks.consuming[c].end;
            debug!(
                "  out {c}: end in [{}, {}]",
                domains.lower_bound(end),
                domains.upper_bound(end)
            );
        }
        for &d in buffers.fixed_in.iter() {
            let start = tasks.demanding[d].start;
            debug!(
                "  in {d}: start in [{}, {}]",
                domains.lower_bound(start),
                domains.upper_bound(start)
            );
        }
    }
}
