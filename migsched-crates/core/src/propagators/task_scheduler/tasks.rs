use crate::engine::variables::DomainId;
use crate::migsched_assert_simple;
use crate::propagation::ReadDomains;

/// A task which occupies its resource from time 0 until `end`, e.g. a machine leaving its current
/// host.
#[derive(Clone, Debug)]
pub struct ArgConsumingTask {
    /// The resource the task is hosted on.
    pub resource: i32,
    /// The usage of every dimension.
    pub usage: Vec<i32>,
    pub end: DomainId,
}

/// A task which occupies the resource selected by `placement` from `start` onwards, e.g. a machine
/// arriving on its new host.
#[derive(Clone, Debug)]
pub struct ArgDemandingTask {
    pub placement: DomainId,
    /// The usage of every dimension.
    pub usage: Vec<i32>,
    pub start: DomainId,
}

#[derive(Clone, Debug)]
pub(crate) struct ConsumingTask {
    pub(crate) resource: i32,
    pub(crate) usage: Box<[i32]>,
    pub(crate) end: DomainId,
}

#[derive(Clone, Debug)]
pub(crate) struct DemandingTask {
    pub(crate) placement: DomainId,
    pub(crate) usage: Box<[i32]>,
    pub(crate) start: DomainId,
}

/// The tasks of a scheduler together with the associations between them. An association links
/// the consuming and the demanding task of the same entity.
#[derive(Clone, Debug)]
pub(crate) struct Tasks {
    pub(crate) consuming: Box<[ConsumingTask]>,
    pub(crate) demanding: Box<[DemandingTask]>,
    consuming_of: Box<[Option<usize>]>,
    demanding_of: Box<[Option<usize>]>,
}

impl Tasks {
    /// `associations[d]` is the consuming task associated to demanding task `d`, if any.
    ///
    /// Panics when an input is malformed.
    pub(crate) fn new(
        num_dimensions: usize,
        consuming: Vec<ArgConsumingTask>,
        demanding: Vec<ArgDemandingTask>,
        associations: &[Option<usize>],
    ) -> Tasks {
        assert_eq!(
            demanding.len(),
            associations.len(),
            "there must be one association entry per demanding task"
        );
        for task in consuming.iter() {
            assert_eq!(
                num_dimensions,
                task.usage.len(),
                "the usage of consuming task ending at {} does not cover every dimension",
                task.end
            );
            assert!(task.usage.iter().all(|&usage| usage >= 0), "usages cannot be negative");
        }
        for task in demanding.iter() {
            assert_eq!(
                num_dimensions,
                task.usage.len(),
                "the usage of demanding task starting at {} does not cover every dimension",
                task.start
            );
            assert!(task.usage.iter().all(|&usage| usage >= 0), "usages cannot be negative");
        }

        let mut demanding_of = vec![None; consuming.len()];
        for (d, association) in associations.iter().enumerate() {
            if let Some(c) = *association {
                assert!(
                    c < consuming.len(),
                    "demanding task {d} is associated to unknown consuming task {c}"
                );
                assert!(
                    demanding_of[c].is_none(),
                    "consuming task {c} is associated to more than one demanding task"
                );
                demanding_of[c] = Some(d);
            }
        }

        Tasks {
            consuming: consuming
                .into_iter()
                .map(|task| ConsumingTask {
                    resource: task.resource,
                    usage: task.usage.into(),
                    end: task.end,
                })
                .collect(),
            demanding: demanding
                .into_iter()
                .map(|task| DemandingTask {
                    placement: task.placement,
                    usage: task.usage.into(),
                    start: task.start,
                })
                .collect(),
            consuming_of: associations.into(),
            demanding_of: demanding_of.into(),
        }
    }

    pub(crate) fn associated_consuming(&self, demanding: usize) -> Option<usize> {
        self.consuming_of[demanding]
    }

    pub(crate) fn associated_demanding(&self, consuming: usize) -> Option<usize> {
        self.demanding_of[consuming]
    }

    /// Whether demanding task `d` is placed on the very resource which hosts consuming task `c`.
    /// Another member of the same pool does not count: moving between aliases still needs both
    /// tasks to be scheduled.
    pub(crate) fn stays_on_host(&self, c: usize, d: usize, domains: &impl ReadDomains) -> bool {
        domains.is_fixed_to(self.demanding[d].placement, self.consuming[c].resource)
    }
}

/// The resource identifiers which make up one capacity pool.
#[derive(Clone, Debug)]
pub(crate) struct Membership {
    members: Box<[i32]>,
    /// Indexed by resource identifier.
    is_member: Box<[bool]>,
}

impl Membership {
    pub(crate) fn new(members: &[i32]) -> Membership {
        assert!(
            members.iter().all(|&member| member >= 0),
            "resource identifiers cannot be negative"
        );
        let size = members
            .iter()
            .map(|&member| member as usize + 1)
            .max()
            .unwrap_or(0);
        let mut is_member = vec![false; size];
        for &member in members {
            is_member[member as usize] = true;
        }
        migsched_assert_simple!(is_member.iter().filter(|&&flag| flag).count() <= members.len());

        Membership {
            members: members.into(),
            is_member: is_member.into(),
        }
    }

    pub(crate) fn contains(&self, resource: i32) -> bool {
        resource >= 0
            && (resource as usize) < self.is_member.len()
            && self.is_member[resource as usize]
    }

    pub(crate) fn members(&self) -> &[i32] {
        &self.members
    }

    /// Whether `placement` can still take a member.
    pub(crate) fn intersects(&self, placement: DomainId, domains: &impl ReadDomains) -> bool {
        self.members
            .iter()
            .any(|&member| domains.contains(placement, member))
    }

    /// Whether `placement` is fixed to a member.
    pub(crate) fn is_fixed_inside(&self, placement: DomainId, domains: &impl ReadDomains) -> bool {
        domains
            .fixed_value(placement)
            .is_some_and(|value| self.contains(value))
    }
}
