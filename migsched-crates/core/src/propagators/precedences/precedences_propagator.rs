use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusCP;
use crate::basic_types::PropagatorConflict;
use crate::create_statistics_struct;
use crate::engine::variables::DomainId;
use crate::engine::TrailedInteger;
use crate::predicate;
use crate::propagation::DomainEvents;
use crate::propagation::Domains;
use crate::propagation::EnqueueDecision;
use crate::propagation::IntDomainEvent;
use crate::propagation::LocalId;
use crate::propagation::Priority;
use crate::propagation::PropagationContext;
use crate::propagation::Propagator;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorConstructorContext;
use crate::propagation::ReadDomains;
use crate::statistics::Statistic;
use crate::statistics::StatisticLogger;

/// The arguments of the [`PrecedencesPropagator`].
///
/// The task placed by `placement` starts after every other task hosted on the same resource has
/// ended. Other task `i` is hosted on `other_hosts[i]` and ends at `other_ends[i]`.
#[derive(Clone, Debug)]
pub struct PrecedencesPropagatorArgs {
    pub placement: DomainId,
    pub start: DomainId,
    pub other_hosts: Box<[i32]>,
    pub other_ends: Box<[DomainId]>,
}

const PLACEMENT_ID: LocalId = LocalId::from(0);
const START_ID: LocalId = LocalId::from(1);
const FIRST_END_ID: u32 = 2;

impl PropagatorConstructor for PrecedencesPropagatorArgs {
    type PropagatorImpl = PrecedencesPropagator;

    fn create(self, mut context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let PrecedencesPropagatorArgs {
            placement,
            start,
            other_hosts,
            other_ends,
        } = self;

        assert!(!other_hosts.is_empty(), "there must be at least one other task");
        assert_eq!(
            other_hosts.len(),
            other_ends.len(),
            "every other task needs both a host and an end"
        );
        assert!(
            context.domains().lower_bound(placement) >= 0,
            "the placement {placement} can take a negative host"
        );

        // Hosts the placement can never take cannot delay the task.
        let num_hosts = context.domains().upper_bound(placement) as usize + 1;
        let mut ends_by_host = vec![Vec::new(); num_hosts];
        for (index, &host) in other_hosts.iter().enumerate() {
            if host >= 0 && (host as usize) < num_hosts {
                ends_by_host[host as usize].push(index);
            }
        }

        let horizon_lower_bounds = (0..num_hosts)
            .map(|host| {
                let lower_bound = ends_by_host[host]
                    .iter()
                    .map(|&other| context.domains().lower_bound(other_ends[other]))
                    .max()
                    .unwrap_or(0);
                context.new_trailed_integer(i64::from(lower_bound))
            })
            .collect();
        let horizon_upper_bounds = (0..num_hosts)
            .map(|host| {
                let upper_bound = ends_by_host[host]
                    .iter()
                    .map(|&other| context.domains().upper_bound(other_ends[other]))
                    .max()
                    .unwrap_or(0);
                context.new_trailed_integer(i64::from(upper_bound))
            })
            .collect();

        context.register(placement, DomainEvents::ANY_INT, PLACEMENT_ID);
        context.register(start, DomainEvents::BOUNDS, START_ID);
        for (index, &end) in other_ends.iter().enumerate() {
            context.register(
                end,
                DomainEvents::BOUNDS,
                LocalId::from(FIRST_END_ID + index as u32),
            );
        }

        PrecedencesPropagator {
            placement,
            start,
            other_hosts,
            other_ends,
            ends_by_host: ends_by_host.into_iter().map(Vec::into).collect(),
            horizon_lower_bounds,
            horizon_upper_bounds,
            is_stale: vec![false; num_hosts].into(),
            stale_hosts: Vec::new(),
            statistics: PrecedencesStatistics::default(),
        }
    }
}

create_statistics_struct!(PrecedencesStatistics {
    /// The number of times the horizon of a host was recomputed.
    num_horizon_updates: u64,
    num_removed_hosts: u64,
    num_conflicts: u64,
});

/// Delays a task until every other task which shares its host has ended.
///
/// For every host it keeps a horizon in trailed state: the maximum of the lower bounds and the
/// maximum of the upper bounds of the ends of the other tasks on that host. A horizon is only
/// recomputed when the end of one of its tasks changed.
///
/// With the placement fixed to host `h`, the start is at least the lower horizon of `h` and every
/// other task on `h` ends by the latest start. Hosts whose lower horizon lies beyond the latest
/// start are removed from the placement.
#[derive(Debug)]
pub struct PrecedencesPropagator {
    placement: DomainId,
    start: DomainId,
    other_hosts: Box<[i32]>,
    other_ends: Box<[DomainId]>,
    /// Indexed by host; the other tasks on each host the placement could take.
    ends_by_host: Box<[Box<[usize]>]>,
    horizon_lower_bounds: Box<[TrailedInteger]>,
    horizon_upper_bounds: Box<[TrailedInteger]>,

    is_stale: Box<[bool]>,
    /// The hosts with a task whose end changed since the last call.
    stale_hosts: Vec<usize>,

    statistics: PrecedencesStatistics,
}

impl PrecedencesPropagator {
    fn num_hosts(&self) -> usize {
        self.ends_by_host.len()
    }

    fn recompute_horizon(&mut self, context: &mut PropagationContext, host: usize) {
        self.statistics.num_horizon_updates += 1;
        let (lower_bound, upper_bound) =
            horizon_of(&*context, &self.ends_by_host[host], &self.other_ends);
        context.assign_trailed(self.horizon_lower_bounds[host], i64::from(lower_bound));
        context.assign_trailed(self.horizon_upper_bounds[host], i64::from(upper_bound));
    }

    /// Applies the precedences given the horizon of every host.
    fn enforce(
        &self,
        context: &mut PropagationContext,
        horizon: impl Fn(&PropagationContext, usize) -> (i32, i32),
    ) -> Result<u64, Inconsistency> {
        let latest_start = context.upper_bound(self.start);
        // The placement only takes hosts below `num_hosts`, since its domain never grows.
        let incompatible = context
            .iterate_domain(self.placement)
            .filter(|&host| horizon(context, host as usize).0 > latest_start)
            .collect::<Vec<_>>();
        if incompatible.len() == context.domain_size(self.placement) as usize {
            return Err(PropagatorConflict::NoCompatibleHost.into());
        }
        for &host in incompatible.iter() {
            let _ = context.post(predicate![self.placement != host])?;
        }

        if let Some(host) = context.fixed_value(self.placement) {
            let (lower_horizon, upper_horizon) = horizon(context, host as usize);
            let _ = context.post(predicate![self.start >= lower_horizon])?;

            let latest_start = context.upper_bound(self.start);
            if upper_horizon > latest_start {
                for &other in self.ends_by_host[host as usize].iter() {
                    let end = self.other_ends[other];
                    let _ = context.post(predicate![end <= latest_start])?;
                }
            }
        } else {
            let earliest_horizon = context
                .iterate_domain(self.placement)
                .map(|host| horizon(context, host as usize).0)
                .min()
                .unwrap_or(0);
            let _ = context.post(predicate![self.start >= earliest_horizon])?;
        }

        Ok(incompatible.len() as u64)
    }
}

/// The maximum lower bound and the maximum upper bound of the given ends; 0 without ends.
fn horizon_of(domains: &impl ReadDomains, others: &[usize], ends: &[DomainId]) -> (i32, i32) {
    others.iter().fold((0, 0), |(lower_bound, upper_bound), &other| {
        (
            lower_bound.max(domains.lower_bound(ends[other])),
            upper_bound.max(domains.upper_bound(ends[other])),
        )
    })
}

impl Propagator for PrecedencesPropagator {
    fn name(&self) -> &str {
        "Precedences"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn notify(
        &mut self,
        _domains: Domains,
        local_id: LocalId,
        _event: IntDomainEvent,
    ) -> EnqueueDecision {
        if local_id == PLACEMENT_ID || local_id == START_ID {
            return EnqueueDecision::Enqueue;
        }

        let other = (local_id.unpack() - FIRST_END_ID) as usize;
        let host = self.other_hosts[other];
        if host < 0 || host as usize >= self.num_hosts() {
            return EnqueueDecision::Skip;
        }
        if !self.is_stale[host as usize] {
            self.is_stale[host as usize] = true;
            self.stale_hosts.push(host as usize);
        }
        EnqueueDecision::Enqueue
    }

    fn synchronise(&mut self, _domains: Domains) {
        self.stale_hosts
            .iter()
            .for_each(|&host| self.is_stale[host] = false);
        self.stale_hosts.clear();
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        while let Some(host) = self.stale_hosts.pop() {
            self.is_stale[host] = false;
            self.recompute_horizon(&mut context, host);
        }

        let result = self.enforce(&mut context, |context, host| {
            (
                context.read(self.horizon_lower_bounds[host]) as i32,
                context.read(self.horizon_upper_bounds[host]) as i32,
            )
        });
        match result {
            Ok(num_removed_hosts) => {
                self.statistics.num_removed_hosts += num_removed_hosts;
                Ok(())
            }
            Err(inconsistency) => {
                self.statistics.num_conflicts += 1;
                Err(inconsistency)
            }
        }
    }

    fn propagate_from_scratch(&self, mut context: PropagationContext) -> PropagationStatusCP {
        let _ = self.enforce(&mut context, |context, host| {
            horizon_of(context, &self.ends_by_host[host], &self.other_ends)
        })?;
        Ok(())
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}
