//! A [`TerminationCondition`] is polled by the solver before every decision and tells it when to
//! give up, even though no definitive conclusion has been reached. Conditions are combined by
//! nesting them in pairs, e.g. `(OsSignal, Option<TimeBudget>)`, and a condition which is not
//! configured is simply `None`.

mod search_budget;
mod time_budget;

pub use search_budget::SearchBudget;
pub use time_budget::TimeBudget;

/// Determines when the solver should give up searching for a schedule.
pub trait TerminationCondition {
    /// Returns `true` when the solver should stop, `false` otherwise.
    fn should_stop(&mut self) -> bool;

    /// Called after every decision of the search.
    fn decision_has_been_made(&mut self) {}

    /// Called every time propagation fails and the search has to backtrack.
    fn conflict_has_been_found(&mut self) {}
}

/// Never triggers; the solver searches until it reaches a conclusion.
#[derive(Clone, Copy, Debug)]
pub struct Indefinite;

impl TerminationCondition for Indefinite {
    fn should_stop(&mut self) -> bool {
        false
    }
}

impl<T: TerminationCondition> TerminationCondition for Option<T> {
    fn should_stop(&mut self) -> bool {
        self.as_mut().is_some_and(T::should_stop)
    }

    fn decision_has_been_made(&mut self) {
        if let Some(condition) = self {
            condition.decision_has_been_made();
        }
    }

    fn conflict_has_been_found(&mut self) {
        if let Some(condition) = self {
            condition.conflict_has_been_found();
        }
    }
}

/// Triggers when either condition triggers. Both conditions are told about every decision and
/// every conflict.
impl<First, Second> TerminationCondition for (First, Second)
where
    First: TerminationCondition,
    Second: TerminationCondition,
{
    fn should_stop(&mut self) -> bool {
        self.0.should_stop() || self.1.should_stop()
    }

    fn decision_has_been_made(&mut self) {
        self.0.decision_has_been_made();
        self.1.decision_has_been_made();
    }

    fn conflict_has_been_found(&mut self) {
        self.0.conflict_has_been_found();
        self.1.conflict_has_been_found();
    }
}

#[cfg(test)]
mod tests {
    use super::Indefinite;
    use super::SearchBudget;
    use super::TerminationCondition;

    #[test]
    fn missing_condition_never_triggers() {
        let mut condition: Option<SearchBudget> = None;
        condition.decision_has_been_made();
        assert!(!condition.should_stop());
    }

    #[test]
    fn pair_triggers_with_either_condition() {
        let mut condition = (Indefinite, Some(SearchBudget::conflicts(2)));
        condition.conflict_has_been_found();
        assert!(!condition.should_stop());

        condition.conflict_has_been_found();
        assert!(condition.should_stop());
    }

    #[test]
    fn both_conditions_of_a_pair_count_decisions() {
        let mut condition = (SearchBudget::decisions(3), SearchBudget::decisions(1));
        condition.decision_has_been_made();
        assert!(condition.should_stop());
        assert!(!condition.0.should_stop());
    }
}
