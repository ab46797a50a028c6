use super::local_task_scheduler::LocalTaskScheduler;
use super::local_task_scheduler::RoundOutcome;
use super::local_task_scheduler::ScheduleBuffers;
use super::tasks::Tasks;
use super::TaskSchedulerOptions;
use crate::basic_types::PropagationStatusCP;
use crate::create_statistics_struct;
use crate::engine::TrailedInteger;
use crate::engine::TrailedSparseSet;
use crate::propagation::DomainEvents;
use crate::propagation::Domains;
use crate::propagation::EnqueueDecision;
use crate::propagation::LocalId;
use crate::propagation::PropagationContext;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

create_statistics_struct!(SchedulerStatistics {
    /// The number of local rounds which were run.
    num_rounds: u64,
    /// The number of times a pool became entailed.
    num_entailed: u64,
    num_fast_path_rounds: u64,
    num_conflicts: u64,
});

/// The incremental bookkeeping shared by the propagators which run [`LocalTaskScheduler`]s.
///
/// Every pool keeps a trailed set of candidates: the demanding tasks whose placement can still
/// take a member of the pool. Events only mark the pools they can affect, and a propagation call
/// only runs the marked pools which are not entailed.
///
/// Variables are registered under the following local ids, with `n` demanding tasks and `m`
/// consuming tasks:
/// - `[0, n)`: the placements;
/// - `[n, 2n)`: the starts;
/// - `[2n, 2n + m)`: the ends;
/// - `2n + m + 2p` and `2n + m + 2p + 1`: the hosting window of pool `p`.
#[derive(Debug)]
pub(crate) struct SchedulerCore {
    tasks: Tasks,
    pools: Box<[LocalTaskScheduler]>,
    options: TaskSchedulerOptions,
    candidates: Box<[TrailedSparseSet]>,
    /// Set to 1 once nothing can change anymore on the pool.
    entailed: Box<[TrailedInteger]>,
    /// The pools which are initially candidates for each demanding task.
    pools_of_demanding: Box<[Box<[usize]>]>,
    /// The pools hosting each consuming task.
    pools_of_consuming: Box<[Box<[usize]>]>,

    is_dirty: Box<[bool]>,
    dirty: Vec<usize>,
    is_pending: Box<[bool]>,
    /// The demanding tasks whose placement changed since the last call.
    pending_placements: Vec<usize>,

    buffers: ScheduleBuffers,
    candidate_buffer: Vec<usize>,
    statistics: SchedulerStatistics,
}

impl SchedulerCore {
    pub(crate) fn new(
        tasks: Tasks,
        pools: Vec<LocalTaskScheduler>,
        options: TaskSchedulerOptions,
        context: &mut PropagatorConstructorContext,
    ) -> SchedulerCore {
        let num_demanding = tasks.demanding.len();
        let num_consuming = tasks.consuming.len();

        let mut pools_of_demanding = vec![Vec::new(); num_demanding];
        let mut pools_of_consuming = vec![Vec::new(); num_consuming];
        let mut candidates = Vec::with_capacity(pools.len());
        let mut entailed = Vec::with_capacity(pools.len());
        for (index, pool) in pools.iter().enumerate() {
            let members = (0..num_demanding)
                .filter(|&d| {
                    pool.members
                        .intersects(tasks.demanding[d].placement, &context.domains())
                })
                .collect::<Vec<_>>();
            members.iter().for_each(|&d| pools_of_demanding[d].push(index));
            pool.out.iter().for_each(|&c| pools_of_consuming[c].push(index));

            candidates.push(TrailedSparseSet::new(
                num_demanding,
                members,
                context.trailed_values_mut(),
            ));
            entailed.push(context.new_trailed_integer(0));
        }

        for (d, task) in tasks.demanding.iter().enumerate() {
            context.register(
                task.placement,
                DomainEvents::ANY_INT,
                LocalId::from(d as u32),
            );
            context.register(
                task.start,
                DomainEvents::BOUNDS,
                LocalId::from((num_demanding + d) as u32),
            );
        }
        for (c, task) in tasks.consuming.iter().enumerate() {
            context.register(
                task.end,
                DomainEvents::BOUNDS,
                LocalId::from((2 * num_demanding + c) as u32),
            );
        }
        let window_offset = 2 * num_demanding + num_consuming;
        for (index, pool) in pools.iter().enumerate() {
            if let Some(hosting_start) = pool.hosting_start {
                context.register(
                    hosting_start,
                    DomainEvents::BOUNDS,
                    LocalId::from((window_offset + 2 * index) as u32),
                );
            }
            if let Some(hosting_end) = pool.hosting_end {
                context.register(
                    hosting_end,
                    DomainEvents::BOUNDS,
                    LocalId::from((window_offset + 2 * index + 1) as u32),
                );
            }
        }

        let num_pools = pools.len();
        SchedulerCore {
            tasks,
            pools: pools.into(),
            options,
            candidates: candidates.into(),
            entailed: entailed.into(),
            pools_of_demanding: pools_of_demanding.into_iter().map(Vec::into).collect(),
            pools_of_consuming: pools_of_consuming.into_iter().map(Vec::into).collect(),
            is_dirty: vec![true; num_pools].into(),
            dirty: (0..num_pools).collect(),
            is_pending: vec![false; num_demanding].into(),
            pending_placements: Vec::new(),
            buffers: ScheduleBuffers::default(),
            candidate_buffer: Vec::new(),
            statistics: SchedulerStatistics::default(),
        }
    }

    fn mark_dirty(&mut self, pool: usize) {
        if !self.is_dirty[pool] {
            self.is_dirty[pool] = true;
            self.dirty.push(pool);
        }
    }

    pub(crate) fn notify(&mut self, domains: Domains, local_id: LocalId) -> EnqueueDecision {
        let num_demanding = self.tasks.demanding.len();
        let num_consuming = self.tasks.consuming.len();
        let index = local_id.unpack() as usize;

        let any_marked = if index < num_demanding {
            if !self.is_pending[index] {
                self.is_pending[index] = true;
                self.pending_placements.push(index);
            }
            true
        } else if index < 2 * num_demanding {
            let d = index - num_demanding;
            let mut any_marked = false;
            for position in 0..self.pools_of_demanding[d].len() {
                let pool = self.pools_of_demanding[d][position];
                if self.candidates[pool].contains(d, domains.trailed_values()) {
                    self.mark_dirty(pool);
                    any_marked = true;
                }
            }
            any_marked
        } else if index < 2 * num_demanding + num_consuming {
            let c = index - 2 * num_demanding;
            for position in 0..self.pools_of_consuming[c].len() {
                let pool = self.pools_of_consuming[c][position];
                self.mark_dirty(pool);
            }
            !self.pools_of_consuming[c].is_empty()
        } else {
            self.mark_dirty((index - 2 * num_demanding - num_consuming) / 2);
            true
        };

        if any_marked {
            EnqueueDecision::Enqueue
        } else {
            EnqueueDecision::Skip
        }
    }

    pub(crate) fn synchronise(&mut self) {
        self.dirty.iter().for_each(|&pool| self.is_dirty[pool] = false);
        self.dirty.clear();
        self.pending_placements
            .iter()
            .for_each(|&d| self.is_pending[d] = false);
        self.pending_placements.clear();
    }

    /// Drops the demanding tasks whose placement left a pool from its candidates.
    fn process_placements(&mut self, context: &mut PropagationContext) {
        while let Some(d) = self.pending_placements.pop() {
            self.is_pending[d] = false;

            for position in 0..self.pools_of_demanding[d].len() {
                let pool = self.pools_of_demanding[d][position];
                if !self.candidates[pool].contains(d, context.trailed_values()) {
                    continue;
                }
                let placement = self.tasks.demanding[d].placement;
                if !self.pools[pool].members.intersects(placement, &*context) {
                    let _ = self.candidates[pool].remove(d, context.trailed_values_mut());
                }
                self.mark_dirty(pool);
            }

            if let Some(c) = self.tasks.associated_consuming(d) {
                for position in 0..self.pools_of_consuming[c].len() {
                    let pool = self.pools_of_consuming[c][position];
                    self.mark_dirty(pool);
                }
            }
        }
    }

    pub(crate) fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        self.process_placements(&mut context);

        while let Some(pool) = self.dirty.pop() {
            self.is_dirty[pool] = false;
            if context.read(self.entailed[pool]) != 0 {
                continue;
            }

            self.candidate_buffer.clear();
            self.candidate_buffer
                .extend(self.candidates[pool].iter(context.trailed_values()));

            self.statistics.num_rounds += 1;
            let outcome = self.pools[pool].schedule(
                &mut context,
                &self.tasks,
                &self.candidate_buffer,
                self.options,
                &mut self.buffers,
            );
            match outcome {
                Ok(RoundOutcome::Entailed) => {
                    self.statistics.num_entailed += 1;
                    context.assign_trailed(self.entailed[pool], 1);
                }
                Ok(RoundOutcome::FastPath) => self.statistics.num_fast_path_rounds += 1,
                Ok(RoundOutcome::Propagated) => {}
                Err(inconsistency) => {
                    self.statistics.num_conflicts += 1;
                    return Err(inconsistency);
                }
            }
        }

        Ok(())
    }

    /// Runs every pool on candidates recomputed from the domains, ignoring entailment.
    pub(crate) fn propagate_from_scratch(
        &self,
        mut context: PropagationContext,
    ) -> PropagationStatusCP {
        let mut buffers = ScheduleBuffers::default();
        let mut candidates = Vec::new();

        for pool in self.pools.iter() {
            candidates.clear();
            candidates.extend((0..self.tasks.demanding.len()).filter(|&d| {
                pool.members
                    .intersects(self.tasks.demanding[d].placement, &context)
            }));

            let _ = pool.schedule(
                &mut context,
                &self.tasks,
                &candidates,
                self.options,
                &mut buffers,
            )?;
        }
        Ok(())
    }

    pub(crate) fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }

    #[cfg(test)]
    pub(crate) fn num_candidates(&self, pool: usize, domains: &impl ReadDomains) -> usize {
        self.candidates[pool].len(domains.trailed_values())
    }

    #[cfg(test)]
    pub(crate) fn is_entailed(&self, pool: usize, domains: &impl ReadDomains) -> bool {
        domains.read(self.entailed[pool]) != 0
    }
}
