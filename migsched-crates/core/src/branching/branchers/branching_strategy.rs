use super::IndependentVariableValueBrancher;
use crate::branching::value_selection::InDomainMax;
use crate::branching::value_selection::InDomainMin;
use crate::branching::value_selection::InDomainRandom;
use crate::branching::variable_selection::FirstFail;
use crate::branching::variable_selection::InputOrder;
use crate::branching::Brancher;
use crate::engine::variables::DomainId;

/// The combinations of variable and value selection offered to users of the solver.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum BranchingStrategy {
    /// Branch on the variables in the given order, smallest value first.
    InputOrderMin,
    /// Branch on the variable with the smallest domain, smallest value first.
    #[default]
    FirstFailMin,
    /// Branch on the variable with the smallest domain, largest value first.
    FirstFailMax,
    /// Branch on the variable with the smallest domain, on a random value.
    FirstFailRandom,
}

impl BranchingStrategy {
    /// Creates a brancher covering `variables`.
    pub fn create_brancher(self, variables: &[DomainId]) -> Box<dyn Brancher> {
        match self {
            BranchingStrategy::InputOrderMin => Box::new(IndependentVariableValueBrancher::new(
                InputOrder::new(variables),
                InDomainMin,
            )),
            BranchingStrategy::FirstFailMin => Box::new(IndependentVariableValueBrancher::new(
                FirstFail::new(variables),
                InDomainMin,
            )),
            BranchingStrategy::FirstFailMax => Box::new(IndependentVariableValueBrancher::new(
                FirstFail::new(variables),
                InDomainMax,
            )),
            BranchingStrategy::FirstFailRandom => Box::new(IndependentVariableValueBrancher::new(
                FirstFail::new(variables),
                InDomainRandom,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::BranchingStrategy;
    use crate::branching::SelectionContext;
    use crate::predicate;

    #[test]
    fn first_fail_max_fixes_the_smallest_domain_to_its_maximum() {
        let assignments = SelectionContext::create_for_testing(vec![(0, 9), (2, 4)]);
        let variables = assignments.get_domains().collect::<Vec<_>>();
        let mut random = SmallRng::seed_from_u64(0);
        let mut context = SelectionContext::new(&assignments, &mut random);

        let mut brancher = BranchingStrategy::FirstFailMax.create_brancher(&variables);
        assert_eq!(
            Some(predicate!(variables[1] == 4)),
            brancher.next_decision(&mut context)
        );
    }

    #[test]
    fn no_decision_once_everything_is_fixed() {
        let assignments = SelectionContext::create_for_testing(vec![(1, 1)]);
        let variables = assignments.get_domains().collect::<Vec<_>>();
        let mut random = SmallRng::seed_from_u64(0);
        let mut context = SelectionContext::new(&assignments, &mut random);

        let mut brancher = BranchingStrategy::InputOrderMin.create_brancher(&variables);
        assert_eq!(None, brancher.next_decision(&mut context));
    }
}
