use crate::containers::KeyedVec;
use crate::engine::variables::DomainId;
use crate::engine::Assignments;
use crate::migsched_assert_simple;

/// A snapshot of an assignment in which every variable is fixed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    values: KeyedVec<DomainId, i32>,
}

impl Solution {
    pub(crate) fn from_assignments(assignments: &Assignments) -> Solution {
        let mut values = KeyedVec::default();
        for domain_id in assignments.get_domains() {
            let value = assignments.get_assigned_value(domain_id);
            migsched_assert_simple!(
                value.is_some(),
                "A solution can only be taken when every variable is fixed"
            );
            let _ = values.push(value.unwrap_or_default());
        }
        Solution { values }
    }

    /// The value `domain_id` takes in this solution.
    pub fn get_integer_value(&self, domain_id: DomainId) -> i32 {
        self.values[domain_id]
    }

    pub fn num_domains(&self) -> usize {
        self.values.len()
    }
}
