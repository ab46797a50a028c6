#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

//! Compares the solutions found by the solver with a brute-force enumeration on small random
//! instances: no solution may be lost to propagation, and every reported solution must hold.

mod helpers;

use helpers::assert_same_solutions;
use helpers::brute_force;
use helpers::enumerate_full_solutions;
use helpers::enumerate_solutions;
use helpers::exhaustive_solver;
use migsched_core::constraints;
use migsched_core::constraints::ArgConsumingTask;
use migsched_core::constraints::ArgDemandingTask;
use migsched_core::constraints::ArgResource;
use migsched_core::constraints::SchedulingRule;
use migsched_core::constraints::StayingTask;
use migsched_core::rand::rngs::SmallRng;
use migsched_core::rand::Rng;
use migsched_core::rand::SeedableRng;
use migsched_core::variables::DomainId;
use migsched_core::Solver;

const NUM_INSTANCES: u64 = 25;
const HORIZON: i32 = 4;

/// The tasks of a random scheduling instance, without any association.
#[derive(Debug)]
struct Tasks {
    num_dimensions: usize,
    /// The resource and the usage of every consuming task.
    consuming: Vec<(i32, Vec<i32>)>,
    demanding: Vec<Vec<i32>>,
}

impl Tasks {
    fn generate(rng: &mut SmallRng, num_resources: i32) -> Tasks {
        let num_dimensions = rng.gen_range(1..=2);
        let num_consuming = rng.gen_range(0..=2);
        let num_demanding = rng.gen_range(1..=3 - num_consuming.min(1));

        let usage = |rng: &mut SmallRng| {
            (0..num_dimensions)
                .map(|_| rng.gen_range(0..=2))
                .collect::<Vec<_>>()
        };
        let consuming = (0..num_consuming)
            .map(|_| (rng.gen_range(0..num_resources), usage(rng)))
            .collect();
        let demanding = (0..num_demanding).map(|_| usage(rng)).collect();

        Tasks {
            num_dimensions,
            consuming,
            demanding,
        }
    }

    fn capacity(&self, rng: &mut SmallRng) -> Vec<i32> {
        (0..self.num_dimensions)
            .map(|_| rng.gen_range(1..=3))
            .collect()
    }

    /// Creates the variables of the tasks: first the consuming ends, then the placement and the
    /// start of every demanding task.
    fn create_variables(
        &self,
        solver: &mut Solver,
        num_resources: i32,
    ) -> (Vec<ArgConsumingTask>, Vec<ArgDemandingTask>, Vec<DomainId>) {
        let mut variables = Vec::new();
        let consuming = self
            .consuming
            .iter()
            .map(|(resource, usage)| {
                let end = solver.new_bounded_integer(0, HORIZON);
                variables.push(end);
                ArgConsumingTask {
                    resource: *resource,
                    usage: usage.clone(),
                    end,
                }
            })
            .collect();
        let demanding = self
            .demanding
            .iter()
            .map(|usage| {
                let placement = solver.new_bounded_integer(0, num_resources - 1);
                let start = solver.new_bounded_integer(0, HORIZON);
                variables.push(placement);
                variables.push(start);
                ArgDemandingTask {
                    placement,
                    usage: usage.clone(),
                    start,
                }
            })
            .collect();
        (consuming, demanding, variables)
    }

    /// The domains of the variables, in the order of [`Tasks::create_variables`].
    fn domains(&self, num_resources: i32) -> Vec<Vec<i32>> {
        let times = (0..=HORIZON).collect::<Vec<_>>();
        let mut domains = vec![times.clone(); self.consuming.len()];
        for _ in self.demanding.iter() {
            domains.push((0..num_resources).collect());
            domains.push(times.clone());
        }
        domains
    }

    /// Whether the pool made of `members` stays within `capacity` under `values`.
    fn fits(&self, values: &[i32], members: &[i32], capacity: &[i32]) -> bool {
        let (ends, arrivals) = values.split_at(self.consuming.len());
        (0..=HORIZON).all(|time| {
            (0..self.num_dimensions).all(|dimension| {
                let leaving: i32 = self
                    .consuming
                    .iter()
                    .zip(ends)
                    .filter(|((resource, _), &end)| members.contains(resource) && time < end)
                    .map(|((_, usage), _)| usage[dimension])
                    .sum();
                let arriving: i32 = self
                    .demanding
                    .iter()
                    .zip(arrivals.chunks(2))
                    .filter(|(_, placement_and_start)| {
                        members.contains(&placement_and_start[0]) && placement_and_start[1] <= time
                    })
                    .map(|(usage, _)| usage[dimension])
                    .sum();
                leaving + arriving <= capacity[dimension]
            })
        })
    }
}

/// Entities which are hosted now and will be hosted again: each has a consuming task on its
/// current resource and an associated demanding task which may stay there or move.
#[derive(Debug)]
struct Relocations {
    num_dimensions: usize,
    /// The current resource, the usage before and the usage after of every entity.
    entities: Vec<(i32, Vec<i32>, Vec<i32>)>,
    /// The usage of an entity which is not hosted yet.
    arriving: Option<Vec<i32>>,
}

/// The decision variables of [`Relocations`] and the arguments of their rules.
struct RelocationVariables {
    consuming: Vec<ArgConsumingTask>,
    demanding: Vec<ArgDemandingTask>,
    associations: Vec<Option<usize>>,
    staying: Vec<StayingTask>,
    schedule_end: DomainId,
    /// The end, placement and start of every entity, then the placement and start of the arriving
    /// entity.
    projected: Vec<DomainId>,
}

impl Relocations {
    fn generate(rng: &mut SmallRng, num_resources: i32, with_arrival: bool) -> Relocations {
        let num_dimensions = rng.gen_range(1..=2);
        let usage = |rng: &mut SmallRng| {
            (0..num_dimensions)
                .map(|_| rng.gen_range(0..=2))
                .collect::<Vec<_>>()
        };

        let num_entities = rng.gen_range(1..=2);
        let entities = (0..num_entities)
            .map(|_| (rng.gen_range(0..num_resources), usage(rng), usage(rng)))
            .collect();
        let arriving = (with_arrival && rng.gen_bool(0.5)).then(|| usage(rng));

        Relocations {
            num_dimensions,
            entities,
            arriving,
        }
    }

    fn capacity(&self, rng: &mut SmallRng) -> Vec<i32> {
        (0..self.num_dimensions)
            .map(|_| rng.gen_range(1..=3))
            .collect()
    }

    fn create_variables(&self, solver: &mut Solver, num_resources: i32) -> RelocationVariables {
        let schedule_end = solver.new_bounded_integer(HORIZON, HORIZON);
        let mut variables = RelocationVariables {
            consuming: Vec::new(),
            demanding: Vec::new(),
            associations: Vec::new(),
            staying: Vec::new(),
            schedule_end,
            projected: Vec::new(),
        };

        for (current, before, after) in self.entities.iter() {
            let end = solver.new_bounded_integer(0, HORIZON);
            let placement = solver.new_bounded_integer(0, num_resources - 1);
            let start = solver.new_bounded_integer(0, HORIZON);
            variables.projected.extend([end, placement, start]);

            variables.associations.push(Some(variables.consuming.len()));
            variables.consuming.push(ArgConsumingTask {
                resource: *current,
                usage: before.clone(),
                end,
            });
            variables.demanding.push(ArgDemandingTask {
                placement,
                usage: after.clone(),
                start,
            });
            variables.staying.push(StayingTask {
                current: *current,
                placement,
                stays: solver.new_boolean(),
                duration: solver.new_bounded_integer(0, 1),
                non_increasing: Self::is_non_increasing(before, after),
                consuming_end: end,
                demanding_start: start,
            });
        }

        if let Some(usage) = self.arriving.as_ref() {
            let placement = solver.new_bounded_integer(0, num_resources - 1);
            let start = solver.new_bounded_integer(0, HORIZON);
            variables.projected.extend([placement, start]);
            variables.associations.push(None);
            variables.demanding.push(ArgDemandingTask {
                placement,
                usage: usage.clone(),
                start,
            });
        }
        variables
    }

    fn is_non_increasing(before: &[i32], after: &[i32]) -> bool {
        after.iter().zip(before).all(|(after, before)| after <= before)
    }

    /// The domains of the projected variables, in the order of
    /// [`RelocationVariables::projected`].
    fn domains(&self, num_resources: i32) -> Vec<Vec<i32>> {
        let times = (0..=HORIZON).collect::<Vec<_>>();
        let resources = (0..num_resources).collect::<Vec<_>>();

        let mut domains = Vec::new();
        for _ in self.entities.iter() {
            domains.extend([times.clone(), resources.clone(), times.clone()]);
        }
        if self.arriving.is_some() {
            domains.extend([resources, times]);
        }
        domains
    }

    /// Whether every entity which stays is handed over at a single moment: at 0 when it does not
    /// grow, at the end of the schedule otherwise.
    fn hands_over(&self, values: &[i32]) -> bool {
        self.entities
            .iter()
            .zip(values.chunks(3))
            .all(|((current, before, after), values)| {
                let (end, placement, start) = (values[0], values[1], values[2]);
                if placement != *current {
                    return true;
                }
                let moment = if Self::is_non_increasing(before, after) {
                    0
                } else {
                    HORIZON
                };
                end == moment && start == moment
            })
    }

    /// Whether the pool made of `members` stays within `capacity` under `values`.
    fn fits(&self, values: &[i32], members: &[i32], capacity: &[i32]) -> bool {
        let (moving, arriving) = values.split_at(3 * self.entities.len());
        (0..=HORIZON).all(|time| {
            (0..self.num_dimensions).all(|dimension| {
                let mut total = 0;
                for ((current, before, after), values) in self.entities.iter().zip(moving.chunks(3))
                {
                    let (end, placement, start) = (values[0], values[1], values[2]);
                    if members.contains(current) && time < end {
                        total += before[dimension];
                    }
                    if members.contains(&placement) && start <= time {
                        total += after[dimension];
                    }
                }
                if let Some(usage) = self.arriving.as_ref() {
                    if members.contains(&arriving[0]) && arriving[1] <= time {
                        total += usage[dimension];
                    }
                }
                total <= capacity[dimension]
            })
        })
    }
}

/// Enumerates every solution, checks it against every rule and projects it onto `variables`.
fn enumerate_checked_solutions(
    solver: &mut Solver,
    rules: &[SchedulingRule],
    variables: &[DomainId],
) -> Vec<Vec<i32>> {
    enumerate_full_solutions(solver)
        .into_iter()
        .map(|solution| {
            for rule in rules.iter() {
                assert_eq!(Ok(()), rule.check(&solution));
            }
            variables
                .iter()
                .map(|&variable| solution.get_integer_value(variable))
                .collect()
        })
        .collect()
}

#[test]
fn task_scheduler_keeps_every_solution_within_capacity() {
    for seed in 0..NUM_INSTANCES {
        let mut rng = SmallRng::seed_from_u64(seed);
        let num_resources = rng.gen_range(1..=2);
        let tasks = Tasks::generate(&mut rng, num_resources);
        let capacities = (0..num_resources)
            .map(|_| tasks.capacity(&mut rng))
            .collect::<Vec<_>>();

        let mut solver = exhaustive_solver();
        let (consuming, demanding, variables) = tasks.create_variables(&mut solver, num_resources);
        let resources = capacities
            .iter()
            .map(|capacity| ArgResource {
                capacity: capacity.clone(),
                hosting_start: solver.new_bounded_integer(0, 0),
                hosting_end: solver.new_bounded_integer(HORIZON, HORIZON),
            })
            .collect();
        let associations = vec![None; demanding.len()];

        let result = solver
            .add_constraint(constraints::task_scheduler(
                resources,
                consuming,
                demanding,
                associations,
            ))
            .post();

        let expected = brute_force(&tasks.domains(num_resources), |values| {
            capacities
                .iter()
                .enumerate()
                .all(|(resource, capacity)| tasks.fits(values, &[resource as i32], capacity))
        });
        if result.is_err() {
            assert!(expected.is_empty(), "instance {seed} is feasible: {tasks:?}");
            continue;
        }
        assert_same_solutions(enumerate_solutions(&mut solver, &variables), expected);
    }
}

#[test]
fn aliased_cumulatives_share_the_capacity_of_the_pool() {
    const NUM_RESOURCES: i32 = 3;
    let aliases = vec![0, 2];

    for seed in 0..NUM_INSTANCES {
        let mut rng = SmallRng::seed_from_u64(seed);
        let tasks = Tasks::generate(&mut rng, NUM_RESOURCES);
        let capacity = tasks.capacity(&mut rng);

        let mut solver = exhaustive_solver();
        let (consuming, demanding, mut variables) =
            tasks.create_variables(&mut solver, NUM_RESOURCES);
        let horizon = solver.new_bounded_integer(0, HORIZON);
        variables.push(horizon);
        let associations = vec![None; demanding.len()];

        let result = solver
            .add_constraint(constraints::aliased_cumulatives(
                capacity.clone(),
                aliases.clone(),
                horizon,
                consuming,
                demanding,
                associations,
            ))
            .post();

        let mut domains = tasks.domains(NUM_RESOURCES);
        domains.push((0..=HORIZON).collect());
        let expected = brute_force(&domains, |values| {
            let (values, horizon) = values.split_at(values.len() - 1);
            let ends_in_time = tasks
                .consuming
                .iter()
                .zip(values)
                .all(|((resource, _), &end)| !aliases.contains(resource) || end <= horizon[0]);
            ends_in_time && tasks.fits(values, &aliases, &capacity)
        });
        if result.is_err() {
            assert!(expected.is_empty(), "instance {seed} is feasible: {tasks:?}");
            continue;
        }
        assert_same_solutions(enumerate_solutions(&mut solver, &variables), expected);
    }
}

#[test]
fn relocations_keep_every_solution_within_capacity() {
    const NUM_RESOURCES: i32 = 2;

    for seed in 0..NUM_INSTANCES {
        let mut rng = SmallRng::seed_from_u64(seed);
        let relocations = Relocations::generate(&mut rng, NUM_RESOURCES, true);
        let capacities = (0..NUM_RESOURCES)
            .map(|_| relocations.capacity(&mut rng))
            .collect::<Vec<_>>();

        let mut solver = exhaustive_solver();
        let variables = relocations.create_variables(&mut solver, NUM_RESOURCES);
        let resources = capacities
            .iter()
            .map(|capacity| ArgResource {
                capacity: capacity.clone(),
                hosting_start: solver.new_bounded_integer(0, 0),
                hosting_end: solver.new_bounded_integer(HORIZON, HORIZON),
            })
            .collect();
        let rules = vec![
            constraints::task_scheduler(
                resources,
                variables.consuming,
                variables.demanding,
                variables.associations,
            ),
            constraints::staying_tasks(variables.staying, variables.schedule_end),
        ];

        let result = solver.add_constraint(rules.clone()).post();

        let expected = brute_force(&relocations.domains(NUM_RESOURCES), |values| {
            relocations.hands_over(values)
                && capacities.iter().enumerate().all(|(resource, capacity)| {
                    relocations.fits(values, &[resource as i32], capacity)
                })
        });
        if result.is_err() {
            assert!(expected.is_empty(), "instance {seed} is feasible: {relocations:?}");
            continue;
        }
        assert_same_solutions(
            enumerate_checked_solutions(&mut solver, &rules, &variables.projected),
            expected,
        );
    }
}

#[test]
fn relocations_between_aliases_share_the_capacity_of_the_pool() {
    const NUM_RESOURCES: i32 = 3;
    let aliases = vec![0, 2];

    for seed in 0..NUM_INSTANCES {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut relocations = Relocations::generate(&mut rng, NUM_RESOURCES, false);
        // The first entity always leaves an alias, so it may stay, move to the other alias or
        // leave the pool.
        relocations.entities[0].0 = aliases[0];
        let capacity = relocations.capacity(&mut rng);

        let mut solver = exhaustive_solver();
        let variables = relocations.create_variables(&mut solver, NUM_RESOURCES);
        let horizon = solver.new_bounded_integer(0, HORIZON);
        let mut projected = variables.projected;
        projected.push(horizon);
        let rules = vec![
            constraints::aliased_cumulatives(
                capacity.clone(),
                aliases.clone(),
                horizon,
                variables.consuming,
                variables.demanding,
                variables.associations,
            ),
            constraints::staying_tasks(variables.staying, variables.schedule_end),
        ];

        let result = solver.add_constraint(rules.clone()).post();

        let mut domains = relocations.domains(NUM_RESOURCES);
        domains.push((0..=HORIZON).collect());
        let expected = brute_force(&domains, |values| {
            let (values, horizon) = values.split_at(values.len() - 1);
            let ends_in_time = relocations
                .entities
                .iter()
                .zip(values.chunks(3))
                .all(|((current, _, _), values)| {
                    !aliases.contains(current) || values[0] <= horizon[0]
                });
            ends_in_time
                && relocations.hands_over(values)
                && relocations.fits(values, &aliases, &capacity)
        });
        if result.is_err() {
            assert!(expected.is_empty(), "instance {seed} is feasible: {relocations:?}");
            continue;
        }
        assert_same_solutions(
            enumerate_checked_solutions(&mut solver, &rules, &projected),
            expected,
        );
    }
}

#[test]
fn disjoint_groups_never_share_a_value() {
    const NUM_VALUES: i32 = 4;

    for seed in 0..NUM_INSTANCES {
        let mut rng = SmallRng::seed_from_u64(seed);
        let num_groups = rng.gen_range(2..=3);
        let group_sizes = (0..num_groups)
            .map(|_| rng.gen_range(1..=2))
            .collect::<Vec<usize>>();
        let domains = group_sizes
            .iter()
            .flat_map(|&size| std::iter::repeat(()).take(size))
            .map(|_| {
                let mut domain = (0..NUM_VALUES)
                    .filter(|_| rng.gen_bool(0.6))
                    .collect::<Vec<_>>();
                if domain.is_empty() {
                    domain.push(rng.gen_range(0..NUM_VALUES));
                }
                domain
            })
            .collect::<Vec<_>>();

        let mut solver = Solver::default();
        let variables = domains
            .iter()
            .map(|domain| solver.new_sparse_integer(domain.clone()))
            .collect::<Vec<_>>();
        let mut remaining = variables.as_slice();
        let groups = group_sizes
            .iter()
            .map(|&size| {
                let (group, rest) = remaining.split_at(size);
                remaining = rest;
                group.to_vec()
            })
            .collect::<Vec<_>>();

        let rule = if num_groups == 2 {
            constraints::disjoint(groups[0].clone(), groups[1].clone(), NUM_VALUES as usize)
        } else {
            constraints::disjoint_multiple(groups.clone(), NUM_VALUES as usize)
        };
        let result = solver.add_constraint(rule).post();

        let group_of = group_sizes
            .iter()
            .enumerate()
            .flat_map(|(group, &size)| std::iter::repeat(group).take(size))
            .collect::<Vec<_>>();
        let expected = brute_force(&domains, |values| {
            values.iter().enumerate().all(|(first, value)| {
                values
                    .iter()
                    .enumerate()
                    .skip(first + 1)
                    .all(|(second, other)| group_of[first] == group_of[second] || value != other)
            })
        });
        if result.is_err() {
            assert!(expected.is_empty(), "instance {seed} is feasible: {domains:?}");
            continue;
        }
        assert_same_solutions(enumerate_solutions(&mut solver, &variables), expected);
    }
}

#[test]
fn precedences_order_the_tasks_sharing_a_host() {
    const NUM_HOSTS: i32 = 3;
    const LATEST: i32 = 5;

    for seed in 0..NUM_INSTANCES {
        let mut rng = SmallRng::seed_from_u64(seed);
        let num_others = rng.gen_range(1..=3);
        let other_hosts = (0..num_others)
            .map(|_| rng.gen_range(0..NUM_HOSTS))
            .collect::<Vec<_>>();
        let end_domains = (0..num_others)
            .map(|_| {
                let lower_bound = rng.gen_range(0..=LATEST);
                let upper_bound = rng.gen_range(lower_bound..=LATEST);
                (lower_bound..=upper_bound).collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let mut solver = Solver::default();
        let placement = solver.new_bounded_integer(0, NUM_HOSTS - 1);
        let start = solver.new_bounded_integer(0, LATEST);
        let other_ends = end_domains
            .iter()
            .map(|domain| solver.new_bounded_integer(domain[0], domain[domain.len() - 1]))
            .collect::<Vec<_>>();
        let result = solver
            .add_constraint(constraints::precedences(
                placement,
                start,
                other_hosts.clone(),
                other_ends.clone(),
            ))
            .post();

        let mut domains = vec![(0..NUM_HOSTS).collect(), (0..=LATEST).collect()];
        domains.extend(end_domains);
        let expected = brute_force(&domains, |values| {
            other_hosts
                .iter()
                .zip(&values[2..])
                .all(|(&host, &end)| host != values[0] || values[1] >= end)
        });
        if result.is_err() {
            assert!(expected.is_empty(), "instance {seed} is feasible");
            continue;
        }

        let mut variables = vec![placement, start];
        variables.extend(other_ends);
        assert_same_solutions(enumerate_solutions(&mut solver, &variables), expected);
    }
}
