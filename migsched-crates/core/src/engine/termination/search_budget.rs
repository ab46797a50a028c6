use super::TerminationCondition;

/// Bounds the amount of search by the number of decisions or by the number of conflicts,
/// whichever limit is set.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchBudget {
    max_decisions: Option<u64>,
    max_conflicts: Option<u64>,
    num_decisions: u64,
    num_conflicts: u64,
}

impl SearchBudget {
    /// Stops the search once it has taken `max_decisions` decisions. With 0 only the root is
    /// propagated.
    pub fn decisions(max_decisions: u64) -> SearchBudget {
        SearchBudget {
            max_decisions: Some(max_decisions),
            ..SearchBudget::default()
        }
    }

    /// Stops the search once it has backtracked from `max_conflicts` conflicts.
    pub fn conflicts(max_conflicts: u64) -> SearchBudget {
        SearchBudget {
            max_conflicts: Some(max_conflicts),
            ..SearchBudget::default()
        }
    }
}

fn is_spent(limit: Option<u64>, used: u64) -> bool {
    limit.is_some_and(|limit| used >= limit)
}

impl TerminationCondition for SearchBudget {
    fn should_stop(&mut self) -> bool {
        is_spent(self.max_decisions, self.num_decisions)
            || is_spent(self.max_conflicts, self.num_conflicts)
    }

    fn decision_has_been_made(&mut self) {
        self.num_decisions += 1;
    }

    fn conflict_has_been_found(&mut self) {
        self.num_conflicts += 1;
    }
}
