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

/// The arguments of the two-group [`DisjointPropagator`]: no value is taken both by a variable of
/// `first_group` and by a variable of `second_group`.
///
/// Every domain has to be a subset of `[0, num_values)`.
#[derive(Clone, Debug)]
pub struct DisjointPropagatorArgs {
    pub first_group: Box<[DomainId]>,
    pub second_group: Box<[DomainId]>,
    pub num_values: usize,
}

/// The arguments of the [`DisjointPropagator`] over any number of groups: no value is taken by
/// variables of two different groups.
///
/// Every domain has to be a subset of `[0, num_values)`.
#[derive(Clone, Debug)]
pub struct DisjointMultiplePropagatorArgs {
    pub groups: Vec<Box<[DomainId]>>,
    pub num_values: usize,
}

impl PropagatorConstructor for DisjointPropagatorArgs {
    type PropagatorImpl = DisjointPropagator;

    fn create(self, context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let DisjointPropagatorArgs {
            first_group,
            second_group,
            num_values,
        } = self;
        DisjointPropagator::new(
            "Disjoint",
            vec![first_group, second_group],
            num_values,
            context,
        )
    }
}

impl PropagatorConstructor for DisjointMultiplePropagatorArgs {
    type PropagatorImpl = DisjointPropagator;

    fn create(self, context: PropagatorConstructorContext) -> Self::PropagatorImpl {
        let DisjointMultiplePropagatorArgs { groups, num_values } = self;
        DisjointPropagator::new("DisjointMultiple", groups, num_values, context)
    }
}

create_statistics_struct!(DisjointStatistics {
    /// The number of values which became required by a group.
    num_required: u64,
    num_removals: u64,
    num_conflicts: u64,
});

/// Keeps groups of variables from sharing a value.
///
/// For every group and value it maintains, in trailed state:
/// - the number of variables of the group whose domain still counts the value;
/// - whether the value is required by the group, i.e. a variable of the group is fixed to it.
///
/// When a value becomes required by a group, it is removed from every variable of the other
/// groups which can still take it. A variable which becomes fixed through such a removal makes its
/// own value required in turn.
#[derive(Debug)]
pub struct DisjointPropagator {
    name: &'static str,
    /// Variables of all groups, one group after the other.
    variables: Box<[DomainId]>,
    /// Group `g` holds the variables at `[offsets[g], offsets[g + 1])`.
    offsets: Box<[usize]>,
    num_values: usize,
    /// Indexed by `group * num_values + value`.
    num_candidates: Box<[TrailedInteger]>,
    /// Indexed by `group * num_values + value`; set to 1 once the value is required.
    required: Box<[TrailedInteger]>,
    /// Indexed by `variable * num_values + value`; set to 1 while the value is counted in
    /// `num_candidates`.
    counted: Box<[TrailedInteger]>,

    is_pending: Box<[bool]>,
    /// The variables which changed since the last call.
    pending: Vec<usize>,
    /// Pairs of value and group whose requirement still has to be enforced.
    work_list: Vec<(i32, usize)>,

    statistics: DisjointStatistics,
}

impl DisjointPropagator {
    fn new(
        name: &'static str,
        groups: Vec<Box<[DomainId]>>,
        num_values: usize,
        mut context: PropagatorConstructorContext,
    ) -> DisjointPropagator {
        assert!(groups.len() >= 2, "there must be at least two groups");
        for (index, group) in groups.iter().enumerate() {
            assert!(!group.is_empty(), "group {index} is empty");
        }

        let mut offsets = Vec::with_capacity(groups.len() + 1);
        offsets.push(0);
        for group in groups.iter() {
            offsets.push(offsets[offsets.len() - 1] + group.len());
        }
        let variables: Box<[DomainId]> = groups
            .into_iter()
            .flat_map(|group| group.into_vec())
            .collect();

        for &variable in variables.iter() {
            let domains = context.domains();
            assert!(
                domains.lower_bound(variable) >= 0
                    && (domains.upper_bound(variable) as usize) < num_values,
                "the domain of {variable} is not a subset of [0, {num_values})"
            );
        }

        let num_groups = offsets.len() - 1;
        let mut candidate_counts = vec![0_i64; num_groups * num_values];
        let mut counted = Vec::with_capacity(variables.len() * num_values);
        for (index, &variable) in variables.iter().enumerate() {
            let group = group_of(&offsets, index);
            for value in 0..num_values {
                let is_candidate = context.domains().contains(variable, value as i32);
                if is_candidate {
                    candidate_counts[group * num_values + value] += 1;
                }
                counted.push(context.new_trailed_integer(i64::from(is_candidate)));
            }
        }
        let num_candidates = candidate_counts
            .into_iter()
            .map(|count| context.new_trailed_integer(count))
            .collect();
        let required = (0..num_groups * num_values)
            .map(|_| context.new_trailed_integer(0))
            .collect();

        for (index, &variable) in variables.iter().enumerate() {
            context.register(variable, DomainEvents::ANY_INT, LocalId::from(index as u32));
        }

        DisjointPropagator {
            name,
            offsets: offsets.into(),
            num_values,
            num_candidates,
            required,
            counted: counted.into(),
            is_pending: vec![true; variables.len()].into(),
            pending: (0..variables.len()).collect(),
            work_list: Vec::new(),
            variables,
            statistics: DisjointStatistics::default(),
        }
    }

    fn num_groups(&self) -> usize {
        self.offsets.len() - 1
    }

    fn is_required(&self, domains: &impl ReadDomains, group: usize, value: i32) -> bool {
        domains.read(self.required[group * self.num_values + value as usize]) != 0
    }

    fn is_candidate(&self, domains: &impl ReadDomains, group: usize, value: i32) -> bool {
        domains.read(self.num_candidates[group * self.num_values + value as usize]) > 0
    }

    fn is_counted(&self, domains: &impl ReadDomains, variable: usize, value: i32) -> bool {
        domains.read(self.counted[variable * self.num_values + value as usize]) != 0
    }

    /// Stops counting `value` as a candidate of `variable`.
    fn uncount(&self, context: &mut PropagationContext, variable: usize, value: i32) {
        let group = group_of(&self.offsets, variable);
        context.assign_trailed(self.counted[variable * self.num_values + value as usize], 0);
        context.add_assign_trailed(
            self.num_candidates[group * self.num_values + value as usize],
            -1,
        );
    }

    /// Brings the counters of `variable` up to date with its domain.
    fn process_variable(&mut self, context: &mut PropagationContext, variable: usize) {
        let domain_id = self.variables[variable];
        for value in 0..self.num_values as i32 {
            if self.is_counted(&*context, variable, value) && !context.contains(domain_id, value) {
                self.uncount(context, variable, value);
            }
        }

        if let Some(value) = context.fixed_value(domain_id) {
            let group = group_of(&self.offsets, variable);
            if !self.is_required(&*context, group, value) {
                self.work_list.push((value, group));
            }
        }
    }

    /// Marks the values on the work list as required and removes them from the other groups.
    fn enforce_required(&mut self, context: &mut PropagationContext) -> PropagationStatusCP {
        while let Some((value, group)) = self.work_list.pop() {
            if self.is_required(&*context, group, value) {
                continue;
            }
            self.statistics.num_required += 1;
            context.assign_trailed(self.required[group * self.num_values + value as usize], 1);

            for other in (0..self.num_groups()).filter(|&other| other != group) {
                if self.is_required(&*context, other, value) {
                    return Err(shared_value(value, group, other).into());
                }
                if !self.is_candidate(&*context, other, value) {
                    continue;
                }

                for variable in self.offsets[other]..self.offsets[other + 1] {
                    if !self.is_counted(&*context, variable, value) {
                        continue;
                    }
                    let domain_id = self.variables[variable];
                    if context.is_fixed_to(domain_id, value) {
                        return Err(shared_value(value, group, other).into());
                    }

                    let _ = context.post(predicate![domain_id != value])?;
                    self.statistics.num_removals += 1;
                    self.uncount(context, variable, value);

                    if let Some(remaining) = context.fixed_value(domain_id) {
                        if !self.is_required(&*context, other, remaining) {
                            self.work_list.push((remaining, other));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// The group holding the variable at `index`.
fn group_of(offsets: &[usize], index: usize) -> usize {
    offsets.partition_point(|&offset| offset <= index) - 1
}

fn shared_value(value: i32, group: usize, other: usize) -> PropagatorConflict {
    PropagatorConflict::SharedValue {
        value,
        first_group: group.min(other),
        second_group: group.max(other),
    }
}

impl Propagator for DisjointPropagator {
    fn name(&self) -> &str {
        self.name
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn notify(
        &mut self,
        _domains: Domains,
        local_id: LocalId,
        _event: IntDomainEvent,
    ) -> EnqueueDecision {
        let variable = local_id.unpack() as usize;
        if !self.is_pending[variable] {
            self.is_pending[variable] = true;
            self.pending.push(variable);
        }
        EnqueueDecision::Enqueue
    }

    fn synchronise(&mut self, _domains: Domains) {
        self.pending
            .iter()
            .for_each(|&variable| self.is_pending[variable] = false);
        self.pending.clear();
        self.work_list.clear();
    }

    fn propagate(&mut self, mut context: PropagationContext) -> PropagationStatusCP {
        while let Some(variable) = self.pending.pop() {
            self.is_pending[variable] = false;
            self.process_variable(&mut context, variable);
        }

        let result = self.enforce_required(&mut context);
        if result.is_err() {
            self.statistics.num_conflicts += 1;
            self.work_list.clear();
        }
        result
    }

    fn propagate_from_scratch(&self, mut context: PropagationContext) -> PropagationStatusCP {
        for group in 0..self.num_groups() {
            let required_values = (self.offsets[group]..self.offsets[group + 1])
                .filter_map(|variable| context.fixed_value(self.variables[variable]))
                .collect::<Vec<_>>();

            for other in (0..self.num_groups()).filter(|&other| other != group) {
                for variable in self.offsets[other]..self.offsets[other + 1] {
                    let domain_id = self.variables[variable];
                    for &value in required_values.iter() {
                        if context.is_fixed_to(domain_id, value) {
                            return Err(shared_value(value, group, other).into());
                        }
                        let _ = context.post(predicate![domain_id != value])?;
                    }
                }
            }
        }
        Ok(())
    }

    fn log_statistics(&self, statistic_logger: StatisticLogger) {
        self.statistics.log(statistic_logger);
    }
}

#[cfg(test)]
mod tests {
    use super::group_of;
    use super::DisjointMultiplePropagatorArgs;
    use super::DisjointPropagatorArgs;
    use crate::basic_types::Inconsistency;
    use crate::basic_types::PropagatorConflict;
    use crate::engine::test_solver::TestSolver;

    #[test]
    fn groups_are_found_by_offset() {
        let offsets = [0, 2, 3, 7];
        assert_eq!(0, group_of(&offsets, 0));
        assert_eq!(0, group_of(&offsets, 1));
        assert_eq!(1, group_of(&offsets, 2));
        assert_eq!(2, group_of(&offsets, 3));
        assert_eq!(2, group_of(&offsets, 6));
    }

    #[test]
    fn fixing_one_group_removes_the_value_from_the_other() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 1);
        let y = solver.new_variable(0, 1);

        let _ = solver
            .new_propagator(DisjointPropagatorArgs {
                first_group: vec![x].into(),
                second_group: vec![y].into(),
                num_values: 2,
            })
            .expect("no conflict");

        solver.assign(x, 0).expect("no conflict");
        assert_eq!(vec![1], solver.values(y));
    }

    #[test]
    fn fixed_values_at_creation_are_enforced() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(2, 2);
        let y = solver.new_variable(0, 3);
        let z = solver.new_variable(0, 3);

        let _ = solver
            .new_propagator(DisjointPropagatorArgs {
                first_group: vec![x].into(),
                second_group: vec![y, z].into(),
                num_values: 4,
            })
            .expect("no conflict");

        assert!(!solver.contains(y, 2));
        assert!(!solver.contains(z, 2));
    }

    #[test]
    fn removals_cascade_through_the_groups() {
        let mut solver = TestSolver::default();
        let a = solver.new_variable(0, 2);
        let b = solver.new_sparse_variable(vec![0, 1]);
        let c = solver.new_variable(0, 2);

        let _ = solver
            .new_propagator(DisjointMultiplePropagatorArgs {
                groups: vec![vec![a].into(), vec![b].into(), vec![c].into()],
                num_values: 3,
            })
            .expect("no conflict");

        solver.assign(a, 0).expect("no conflict");
        assert_eq!(Some(1), solver.fixed_value(b));
        assert_eq!(vec![2], solver.values(c));
    }

    #[test]
    fn sharing_a_value_is_a_conflict() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 2);
        let y = solver.new_variable(0, 2);
        let z = solver.new_variable(0, 2);

        let _ = solver
            .new_propagator(DisjointMultiplePropagatorArgs {
                groups: vec![vec![x].into(), vec![y].into(), vec![z].into()],
                num_values: 3,
            })
            .expect("no conflict");

        solver.assign(x, 0).expect("no conflict");
        solver.assign(y, 1).expect("no conflict");
        assert_eq!(Some(2), solver.fixed_value(z));

        let mut solver = TestSolver::default();
        let x = solver.new_variable(1, 1);
        let y = solver.new_variable(1, 1);
        let result = solver.new_propagator(DisjointPropagatorArgs {
            first_group: vec![x].into(),
            second_group: vec![y].into(),
            num_values: 2,
        });
        assert_eq!(
            Err(Inconsistency::Conflict(PropagatorConflict::SharedValue {
                value: 1,
                first_group: 0,
                second_group: 1,
            })),
            result.map(|_| ())
        );
    }

    #[test]
    fn counters_are_restored_after_backtracking() {
        let mut solver = TestSolver::default();
        let x = solver.new_variable(0, 2);
        let y = solver.new_variable(0, 2);

        let _ = solver
            .new_propagator(DisjointPropagatorArgs {
                first_group: vec![x].into(),
                second_group: vec![y].into(),
                num_values: 3,
            })
            .expect("no conflict");

        solver.new_checkpoint();
        solver.assign(x, 1).expect("no conflict");
        assert_eq!(vec![0, 2], solver.values(y));

        solver.restore_to(0);
        solver.assign(y, 1).expect("no conflict");
        assert_eq!(vec![0, 2], solver.values(x));
    }
}
