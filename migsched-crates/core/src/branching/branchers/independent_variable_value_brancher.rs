//! A [`Brancher`] which first selects a variable and then a value for it, both chosen
//! independently of each other.

use crate::branching::value_selection::ValueSelector;
use crate::branching::variable_selection::VariableSelector;
use crate::branching::Brancher;
use crate::branching::SelectionContext;
use crate::engine::predicates::Predicate;

/// Combines a [`VariableSelector`] with a [`ValueSelector`]: the variable selector picks the
/// variable, after which the value selector decides what to do with it.
#[derive(Debug)]
pub struct IndependentVariableValueBrancher<VariableSelect, ValueSelect> {
    pub(crate) variable_selector: VariableSelect,
    pub(crate) value_selector: ValueSelect,
}

impl<VariableSelect, ValueSelect> IndependentVariableValueBrancher<VariableSelect, ValueSelect>
where
    VariableSelect: VariableSelector,
    ValueSelect: ValueSelector,
{
    pub fn new(variable_selector: VariableSelect, value_selector: ValueSelect) -> Self {
        IndependentVariableValueBrancher {
            variable_selector,
            value_selector,
        }
    }
}

impl<VariableSelect, ValueSelect> Brancher
    for IndependentVariableValueBrancher<VariableSelect, ValueSelect>
where
    VariableSelect: VariableSelector,
    ValueSelect: ValueSelector,
{
    fn next_decision(&mut self, context: &mut SelectionContext) -> Option<Predicate> {
        self.variable_selector
            .select_variable(context)
            .map(|variable| self.value_selector.select_value(context, variable))
    }
}
