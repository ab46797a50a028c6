use rand::Rng;
use rand::rngs::SmallRng;

use crate::engine::variables::DomainId;
use crate::engine::Assignments;
#[cfg(doc)]
use crate::branching::Brancher;

/// The view on the solver available to a [`Brancher`]: the current domains and a random
/// generator.
#[derive(Debug)]
pub struct SelectionContext<'a> {
    assignments: &'a Assignments,
    random_generator: &'a mut SmallRng,
}

impl<'a> SelectionContext<'a> {
    pub fn new(assignments: &'a Assignments, random_generator: &'a mut SmallRng) -> Self {
        SelectionContext {
            assignments,
            random_generator,
        }
    }

    pub fn random(&mut self) -> &mut SmallRng {
        self.random_generator
    }

    /// A uniformly drawn index below `len`.
    pub fn random_index(&mut self, len: usize) -> usize {
        self.random_generator.gen_range(0..len)
    }

    pub fn lower_bound(&self, var: DomainId) -> i32 {
        self.assignments.get_lower_bound(var)
    }

    pub fn upper_bound(&self, var: DomainId) -> i32 {
        self.assignments.get_upper_bound(var)
    }

    pub fn contains(&self, var: DomainId, value: i32) -> bool {
        self.assignments.is_value_in_domain(var, value)
    }

    pub fn is_integer_fixed(&self, var: DomainId) -> bool {
        self.assignments.is_domain_assigned(var)
    }

    /// The number of values left in the domain of `var`, holes excluded.
    pub fn get_size_of_domain(&self, var: DomainId) -> u32 {
        self.assignments.get_domain_size(var)
    }

    pub fn domain_values(&self, var: DomainId) -> impl Iterator<Item = i32> + '_ {
        self.assignments.get_domain_iterator(var)
    }
}

#[cfg(test)]
impl SelectionContext<'_> {
    /// Creates assignments holding one interval variable per pair of bounds.
    pub(crate) fn create_for_testing(domains: Vec<(i32, i32)>) -> Assignments {
        let mut assignments = Assignments::default();
        for (lower_bound, upper_bound) in domains {
            let _ = assignments.grow(lower_bound, upper_bound);
        }
        assignments
    }
}
