//! The JSON description of a reconfiguration, and its translation into variables and rules.
//!
//! An instance names its resources and its entities. An entity which is hosted now has a
//! consuming task on its current resource; an entity which will be hosted after the
//! reconfiguration has a demanding task placed on one of its candidates. An entity with both is
//! a single virtual machine: its two tasks are associated, and whether it stays is linked to its
//! placement.

use fnv::FnvHashMap;
use log::info;
use migsched_solver::constraints;
use migsched_solver::constraints::ArgConsumingTask;
use migsched_solver::constraints::ArgDemandingTask;
use migsched_solver::constraints::ArgResource;
use migsched_solver::constraints::SchedulingRule;
use migsched_solver::constraints::StayingTask;
use migsched_solver::variables::DomainId;
use migsched_solver::ConstraintOperationError;
use migsched_solver::Solver;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Instance {
    /// Every task ends, and starts, within `[0, horizon]`.
    pub(crate) horizon: i32,
    pub(crate) resources: Vec<Resource>,
    /// Groups of resources which share a single capacity.
    #[serde(default)]
    pub(crate) pools: Vec<Pool>,
    pub(crate) entities: Vec<Entity>,
    /// Every rule is a list of groups of entities; entities of different groups never share a
    /// resource after the reconfiguration.
    #[serde(default)]
    pub(crate) disjoint: Vec<Vec<Vec<String>>>,
    #[serde(default)]
    pub(crate) precedences: Vec<Precedence>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Resource {
    pub(crate) name: String,
    pub(crate) capacity: Vec<i32>,
    /// The moment from which entities may arrive; 0 when absent.
    #[serde(default)]
    pub(crate) opens: Option<i32>,
    /// The moment by which every entity has left; the horizon when absent.
    #[serde(default)]
    pub(crate) closes: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Pool {
    pub(crate) capacity: Vec<i32>,
    pub(crate) aliases: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Entity {
    pub(crate) name: String,
    /// Where the entity is hosted now.
    #[serde(default)]
    pub(crate) current: Option<Hosting>,
    /// Where the entity may be hosted after the reconfiguration.
    #[serde(default)]
    pub(crate) next: Option<Placement>,
    /// The time a move takes.
    #[serde(default = "default_move_duration")]
    pub(crate) move_duration: i32,
}

fn default_move_duration() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Hosting {
    pub(crate) resource: String,
    pub(crate) usage: Vec<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Placement {
    pub(crate) candidates: Vec<String>,
    pub(crate) usage: Vec<i32>,
}

/// The arrival of `entity` waits until the entities in `after` have left its resource.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Precedence {
    pub(crate) entity: String,
    pub(crate) after: Vec<String>,
}

#[derive(Debug, Error)]
pub(crate) enum InstanceError {
    #[error("the horizon {0} is negative")]
    NegativeHorizon(i32),
    #[error("the name '{0}' is used more than once")]
    DuplicateName(String),
    #[error("unknown resource '{0}'")]
    UnknownResource(String),
    #[error("unknown entity '{0}'")]
    UnknownEntity(String),
    #[error("'{name}' has {actual} dimensions, expected {expected}")]
    DimensionMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("entity '{0}' has no candidate resource")]
    NoCandidates(String),
    #[error("entity '{0}' must move in a positive amount of time")]
    NonPositiveMoveDuration(String),
    #[error("entity '{0}' is not hosted after the reconfiguration")]
    NotArriving(String),
    #[error("entity '{0}' is not hosted now")]
    NotLeaving(String),
    #[error("a disjoint rule needs at least two non-empty groups")]
    InvalidDisjoint,
    #[error("a pool needs at least one alias")]
    EmptyPool,
    #[error("the instance has no resource")]
    NoResources,
}

/// The variables of one entity.
#[derive(Clone, Debug)]
pub(crate) struct EntityVariables {
    pub(crate) name: String,
    /// The current resource and the end of the consuming task.
    pub(crate) leaving: Option<(usize, DomainId)>,
    /// The placement and the start of the demanding task.
    pub(crate) arriving: Option<(DomainId, DomainId)>,
}

/// The variables created for an instance.
#[derive(Debug)]
pub(crate) struct Model {
    pub(crate) resource_names: Vec<String>,
    pub(crate) entities: Vec<EntityVariables>,
    /// The variables which are not fixed by the instance, in creation order.
    pub(crate) decision_variables: Vec<DomainId>,
}

struct Names<'a> {
    resources: FnvHashMap<&'a str, usize>,
    entities: FnvHashMap<&'a str, usize>,
}

impl<'a> Names<'a> {
    fn index(
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<FnvHashMap<&'a str, usize>, InstanceError> {
        let mut indices = FnvHashMap::default();
        for (index, name) in names.into_iter().enumerate() {
            if indices.insert(name, index).is_some() {
                return Err(InstanceError::DuplicateName(name.to_owned()));
            }
        }
        Ok(indices)
    }

    fn resource(&self, name: &str) -> Result<usize, InstanceError> {
        self.resources
            .get(name)
            .copied()
            .ok_or_else(|| InstanceError::UnknownResource(name.to_owned()))
    }

    fn entity(&self, name: &str) -> Result<usize, InstanceError> {
        self.entities
            .get(name)
            .copied()
            .ok_or_else(|| InstanceError::UnknownEntity(name.to_owned()))
    }
}

fn check_dimensions(name: &str, expected: usize, usage: &[i32]) -> Result<(), InstanceError> {
    if usage.len() != expected {
        return Err(InstanceError::DimensionMismatch {
            name: name.to_owned(),
            expected,
            actual: usage.len(),
        });
    }
    Ok(())
}

impl Instance {
    /// Creates the variables of the instance on `solver` and posts its rules.
    ///
    /// A rule which makes the problem infeasible stops the posting; the search then reports that
    /// there is no schedule.
    pub(crate) fn compile(&self, solver: &mut Solver) -> Result<Model, InstanceError> {
        let (model, rules) = self.create_rules(solver)?;
        for rule in rules {
            match solver.add_constraint(rule).post() {
                Ok(()) => {}
                Err(ConstraintOperationError::InfeasiblePropagator) => {
                    info!("The instance is infeasible before the search starts");
                    break;
                }
                Err(ConstraintOperationError::InfeasibleState) => break,
            }
        }
        Ok(model)
    }

    fn create_rules(
        &self,
        solver: &mut Solver,
    ) -> Result<(Model, Vec<SchedulingRule>), InstanceError> {
        if self.horizon < 0 {
            return Err(InstanceError::NegativeHorizon(self.horizon));
        }
        if self.resources.is_empty() {
            return Err(InstanceError::NoResources);
        }
        let names = Names {
            resources: Names::index(self.resources.iter().map(|r| r.name.as_str()))?,
            entities: Names::index(self.entities.iter().map(|e| e.name.as_str()))?,
        };
        let num_dimensions = self.resources[0].capacity.len();
        for resource in self.resources.iter() {
            check_dimensions(&resource.name, num_dimensions, &resource.capacity)?;
        }

        let schedule_end =
            solver.new_named_bounded_integer(self.horizon, self.horizon, "schedule_end");

        let mut consuming = Vec::new();
        let mut demanding = Vec::new();
        let mut associations = Vec::new();
        let mut staying = Vec::new();
        let mut entities = Vec::new();
        let mut decision_variables = Vec::new();

        for entity in self.entities.iter() {
            let leaving = match &entity.current {
                Some(hosting) => {
                    check_dimensions(&entity.name, num_dimensions, &hosting.usage)?;
                    let resource = names.resource(&hosting.resource)?;
                    let end = solver.new_named_bounded_integer(
                        0,
                        self.horizon,
                        format!("{}.end", entity.name),
                    );
                    decision_variables.push(end);
                    consuming.push(ArgConsumingTask {
                        resource: resource as i32,
                        usage: hosting.usage.clone(),
                        end,
                    });
                    Some((resource, end))
                }
                None => None,
            };

            let arriving = match &entity.next {
                Some(placement) => {
                    check_dimensions(&entity.name, num_dimensions, &placement.usage)?;
                    let candidates = placement
                        .candidates
                        .iter()
                        .map(|name| names.resource(name).map(|index| index as i32))
                        .collect::<Result<Vec<_>, _>>()?;
                    if candidates.is_empty() {
                        return Err(InstanceError::NoCandidates(entity.name.clone()));
                    }

                    let placement_variable = solver.new_named_sparse_integer(
                        candidates,
                        format!("{}.placement", entity.name),
                    );
                    let start = solver.new_named_bounded_integer(
                        0,
                        self.horizon,
                        format!("{}.start", entity.name),
                    );
                    decision_variables.push(placement_variable);
                    decision_variables.push(start);
                    demanding.push(ArgDemandingTask {
                        placement: placement_variable,
                        usage: placement.usage.clone(),
                        start,
                    });
                    associations.push(leaving.map(|_| consuming.len() - 1));
                    Some((placement_variable, start))
                }
                None => None,
            };

            if let (Some(hosting), Some(placement), Some((resource, end)), Some((target, start))) =
                (&entity.current, &entity.next, leaving, arriving)
            {
                if entity.move_duration <= 0 {
                    return Err(InstanceError::NonPositiveMoveDuration(entity.name.clone()));
                }
                let stays =
                    solver.new_named_sparse_integer(vec![0, 1], format!("{}.stays", entity.name));
                let duration = solver.new_named_sparse_integer(
                    vec![0, entity.move_duration],
                    format!("{}.duration", entity.name),
                );
                decision_variables.push(stays);
                decision_variables.push(duration);
                staying.push(StayingTask {
                    current: resource as i32,
                    placement: target,
                    stays,
                    duration,
                    non_increasing: placement
                        .usage
                        .iter()
                        .zip(hosting.usage.iter())
                        .all(|(after, before)| after <= before),
                    consuming_end: end,
                    demanding_start: start,
                });
            }

            entities.push(EntityVariables {
                name: entity.name.clone(),
                leaving,
                arriving,
            });
        }

        let mut rules = Vec::new();
        let resources = self
            .resources
            .iter()
            .map(|resource| ArgResource {
                capacity: resource.capacity.clone(),
                hosting_start: solver.new_named_bounded_integer(
                    resource.opens.unwrap_or(0),
                    resource.opens.unwrap_or(0),
                    format!("{}.opens", resource.name),
                ),
                hosting_end: solver.new_named_bounded_integer(
                    resource.closes.unwrap_or(self.horizon),
                    resource.closes.unwrap_or(self.horizon),
                    format!("{}.closes", resource.name),
                ),
            })
            .collect();
        rules.push(constraints::task_scheduler(
            resources,
            consuming.clone(),
            demanding.clone(),
            associations.clone(),
        ));

        for pool in self.pools.iter() {
            if pool.aliases.is_empty() {
                return Err(InstanceError::EmptyPool);
            }
            check_dimensions("pool", num_dimensions, &pool.capacity)?;
            let aliases = pool
                .aliases
                .iter()
                .map(|name| names.resource(name).map(|index| index as i32))
                .collect::<Result<Vec<_>, _>>()?;
            rules.push(constraints::aliased_cumulatives(
                pool.capacity.clone(),
                aliases,
                schedule_end,
                consuming.clone(),
                demanding.clone(),
                associations.clone(),
            ));
        }

        for groups in self.disjoint.iter() {
            rules.push(self.disjoint_rule(&names, &entities, groups)?);
        }

        for precedence in self.precedences.iter() {
            let arriving = &entities[names.entity(&precedence.entity)?];
            let (placement, start) = arriving
                .arriving
                .ok_or_else(|| InstanceError::NotArriving(arriving.name.clone()))?;

            let mut other_hosts = Vec::new();
            let mut other_ends = Vec::new();
            for name in precedence.after.iter() {
                let other = &entities[names.entity(name)?];
                let (resource, end) = other
                    .leaving
                    .ok_or_else(|| InstanceError::NotLeaving(other.name.clone()))?;
                other_hosts.push(resource as i32);
                other_ends.push(end);
            }
            if other_hosts.is_empty() {
                continue;
            }
            rules.push(constraints::precedences(
                placement,
                start,
                other_hosts,
                other_ends,
            ));
        }

        if !staying.is_empty() {
            rules.push(constraints::staying_tasks(staying, schedule_end));
        }

        let model = Model {
            resource_names: self.resources.iter().map(|r| r.name.clone()).collect(),
            entities,
            decision_variables,
        };
        Ok((model, rules))
    }

    fn disjoint_rule(
        &self,
        names: &Names<'_>,
        entities: &[EntityVariables],
        groups: &[Vec<String>],
    ) -> Result<SchedulingRule, InstanceError> {
        if groups.len() < 2 || groups.iter().any(Vec::is_empty) {
            return Err(InstanceError::InvalidDisjoint);
        }

        let placements = groups
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|name| {
                        let entity = &entities[names.entity(name)?];
                        entity
                            .arriving
                            .map(|(placement, _)| placement)
                            .ok_or_else(|| InstanceError::NotArriving(entity.name.clone()))
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let num_values = self.resources.len();
        Ok(if placements.len() == 2 {
            let mut placements = placements.into_iter();
            let first_group = placements.next().unwrap_or_default();
            let second_group = placements.next().unwrap_or_default();
            constraints::disjoint(first_group, second_group, num_values)
        } else {
            constraints::disjoint_multiple(placements, num_values)
        })
    }
}
