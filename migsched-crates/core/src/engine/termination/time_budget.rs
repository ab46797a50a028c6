use std::time::Duration;
use std::time::Instant;

use log::info;

use super::TerminationCondition;

/// Triggers once the time budget is spent.
#[derive(Clone, Copy, Debug)]
pub struct TimeBudget {
    budget: Duration,
    /// `None` when the budget reaches beyond what an [`Instant`] can represent.
    deadline: Option<Instant>,
    is_spent: bool,
}

impl TimeBudget {
    /// Gives the solver a time budget, starting now.
    pub fn starting_now(budget: Duration) -> TimeBudget {
        TimeBudget {
            budget,
            deadline: Instant::now().checked_add(budget),
            is_spent: false,
        }
    }
}

impl TerminationCondition for TimeBudget {
    fn should_stop(&mut self) -> bool {
        if !self.is_spent && self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            self.is_spent = true;
            info!("The time budget of {} ms is spent", self.budget.as_millis());
        }
        self.is_spent
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::TimeBudget;
    use crate::termination::TerminationCondition;

    #[test]
    fn empty_budget_is_spent_immediately() {
        let mut budget = TimeBudget::starting_now(Duration::ZERO);
        assert!(budget.should_stop());
        assert!(budget.should_stop());
    }

    #[test]
    fn unbounded_budget_is_never_spent() {
        let mut budget = TimeBudget::starting_now(Duration::MAX);
        assert!(!budget.should_stop());
    }
}
