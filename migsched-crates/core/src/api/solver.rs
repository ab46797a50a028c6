use super::outputs::solution_iterator::SolutionIterator;
use super::outputs::SatisfactionResult;
use crate::basic_types::ConstraintOperationError;
use crate::basic_types::Solution;
use crate::branching::branchers::IndependentVariableValueBrancher;
use crate::branching::value_selection::InDomainMin;
use crate::branching::variable_selection::FirstFail;
use crate::branching::Brancher;
use crate::constraints::Constraint;
use crate::constraints::ConstraintPoster;
#[cfg(feature = "debug-checks")]
use crate::constraints::SchedulingRule;
use crate::engine::constraint_satisfaction_solver::CSPSolverExecutionFlag;
use crate::engine::variables::DomainId;
use crate::engine::ConstraintSatisfactionSolver;
use crate::engine::SolverOptions;
use crate::propagation::PropagatorConstructor;
use crate::propagation::PropagatorHandle;
use crate::statistics::log_statistic_postfix;
use crate::statistics::should_log_statistics;
use crate::termination::TerminationCondition;

/// The brancher returned by [`Solver::default_brancher`]: first-fail over every variable, trying
/// the smallest value first.
pub type DefaultBrancher = IndependentVariableValueBrancher<FirstFail, InDomainMin>;

/// The main interaction point which allows the creation of variables, the addition of
/// constraints, and solving problems.
///
/// # Creating Variables
/// Variables are integers; a variable with a domain of two values can be created with
/// [`Solver::new_boolean`].
///
/// ```rust
/// # use migsched_core::Solver;
/// let mut solver = Solver::default();
///
/// let start = solver.new_bounded_integer(0, 10);
/// let placement = solver.new_sparse_integer(vec![0, 2, 5]);
/// let stays = solver.new_boolean();
/// ```
///
/// # Using the Solver
/// ```rust
/// # use migsched_core::constraints;
/// # use migsched_core::results::SatisfactionResult;
/// # use migsched_core::termination::Indefinite;
/// # use migsched_core::Solver;
/// let mut solver = Solver::default();
///
/// let first = solver.new_bounded_integer(0, 1);
/// let second = solver.new_bounded_integer(0, 1);
///
/// solver
///     .add_constraint(constraints::disjoint(vec![first], vec![second], 2))
///     .post()
///     .expect("no conflict at the root");
///
/// let mut brancher = solver.default_brancher();
/// let result = solver.satisfy(&mut brancher, &mut Indefinite);
///
/// let SatisfactionResult::Satisfiable(solution) = result else {
///     panic!("the problem has a solution");
/// };
/// assert_ne!(
///     solution.get_integer_value(first),
///     solution.get_integer_value(second)
/// );
/// ```
#[derive(Debug)]
pub struct Solver {
    pub(crate) satisfaction_solver: ConstraintSatisfactionSolver,
    /// The rules every reported solution is verified against.
    #[cfg(feature = "debug-checks")]
    rules: Vec<SchedulingRule>,
}

impl Default for Solver {
    fn default() -> Self {
        Solver::with_options(SolverOptions::default())
    }
}

impl Solver {
    /// Creates a solver with the provided [`SolverOptions`].
    pub fn with_options(options: SolverOptions) -> Self {
        Solver {
            satisfaction_solver: ConstraintSatisfactionSolver::new(options),
            #[cfg(feature = "debug-checks")]
            rules: Vec::new(),
        }
    }

    pub fn options(&self) -> SolverOptions {
        self.satisfaction_solver.options
    }

    /// Logs the statistics of the search and of every propagator, followed by the closing line
    /// configured with [`configure_statistic_logging`](crate::statistics::configure_statistic_logging).
    pub fn log_statistics(&self) {
        if should_log_statistics() {
            self.satisfaction_solver.log_statistics(true);
            log_statistic_postfix();
        }
    }

    /// Whether a constraint made the root infeasible; nothing can be solved afterwards.
    pub fn is_infeasible(&self) -> bool {
        self.satisfaction_solver.is_infeasible()
    }
}

/// Methods to retrieve information about variables
impl Solver {
    pub fn lower_bound(&self, variable: DomainId) -> i32 {
        self.satisfaction_solver.get_lower_bound(variable)
    }

    pub fn upper_bound(&self, variable: DomainId) -> i32 {
        self.satisfaction_solver.get_upper_bound(variable)
    }

    /// The name the variable was created with, if any.
    pub fn variable_name(&self, variable: DomainId) -> Option<&str> {
        self.satisfaction_solver
            .state
            .variable_names
            .get_int_name(variable)
    }

    pub fn num_variables(&self) -> usize {
        self.satisfaction_solver.state.assignments.num_domains()
    }
}

/// Functions to create and retrieve integer variables.
impl Solver {
    /// Creates an integer variable with the domain `[lower_bound, upper_bound]`.
    pub fn new_bounded_integer(&mut self, lower_bound: i32, upper_bound: i32) -> DomainId {
        self.satisfaction_solver
            .create_new_integer_variable(lower_bound, upper_bound, None)
    }

    /// Creates a named integer variable with the domain `[lower_bound, upper_bound]`.
    pub fn new_named_bounded_integer(
        &mut self,
        lower_bound: i32,
        upper_bound: i32,
        name: impl Into<String>,
    ) -> DomainId {
        self.satisfaction_solver.create_new_integer_variable(
            lower_bound,
            upper_bound,
            Some(name.into()),
        )
    }

    /// Creates an integer variable which can take exactly the provided values.
    pub fn new_sparse_integer(&mut self, values: impl Into<Vec<i32>>) -> DomainId {
        self.satisfaction_solver
            .create_new_sparse_integer_variable(values.into(), None)
    }

    /// Creates a named integer variable which can take exactly the provided values.
    pub fn new_named_sparse_integer(
        &mut self,
        values: impl Into<Vec<i32>>,
        name: impl Into<String>,
    ) -> DomainId {
        self.satisfaction_solver
            .create_new_sparse_integer_variable(values.into(), Some(name.into()))
    }

    /// Creates a variable with the domain `{0, 1}`.
    pub fn new_boolean(&mut self) -> DomainId {
        self.new_bounded_integer(0, 1)
    }
}

/// Functions for solving.
impl Solver {
    /// Searches for a solution. Afterwards the solver is back at the root, so it can be extended
    /// and solved again.
    pub fn satisfy<B: Brancher, T: TerminationCondition>(
        &mut self,
        brancher: &mut B,
        termination: &mut T,
    ) -> SatisfactionResult {
        let flag = self.satisfaction_solver.solve(brancher, termination);
        let result = match flag {
            CSPSolverExecutionFlag::Feasible => {
                let solution = self.satisfaction_solver.get_solution();
                self.verify_solution(&solution);
                SatisfactionResult::Satisfiable(solution)
            }
            CSPSolverExecutionFlag::Infeasible => SatisfactionResult::Unsatisfiable,
            CSPSolverExecutionFlag::Timeout => SatisfactionResult::Unknown,
        };
        self.satisfaction_solver.restore_state_at_root();
        result
    }

    /// Returns an iterator over every solution of the problem.
    pub fn get_solution_iterator<
        'this,
        'brancher,
        'termination,
        B: Brancher,
        T: TerminationCondition,
    >(
        &'this mut self,
        brancher: &'brancher mut B,
        termination: &'termination mut T,
    ) -> SolutionIterator<'this, 'brancher, 'termination, B, T> {
        SolutionIterator::new(self, brancher, termination)
    }

    /// Asserts that `solution` satisfies every rule posted on the solver.
    #[cfg(feature = "debug-checks")]
    pub(crate) fn verify_solution(&self, solution: &Solution) {
        for rule in self.rules.iter() {
            if let Err(violation) = rule.check(solution) {
                panic!("the solver reported a solution which violates {rule:?}: {violation}");
            }
        }
    }

    #[cfg(not(feature = "debug-checks"))]
    pub(crate) fn verify_solution(&self, _solution: &Solution) {}
}

/// Functions for adding new constraints to the solver.
impl Solver {
    /// Add a constraint to the solver. This returns a [`ConstraintPoster`] which enables control
    /// on whether to add the constraint as-is, or to do something else with it.
    ///
    /// ```rust
    /// # use migsched_core::constraints;
    /// # use migsched_core::Solver;
    /// let mut solver = Solver::default();
    ///
    /// let placement = solver.new_bounded_integer(0, 3);
    /// let start = solver.new_bounded_integer(0, 10);
    /// let end = solver.new_bounded_integer(4, 6);
    ///
    /// solver
    ///     .add_constraint(constraints::precedences(placement, start, vec![2], vec![end]))
    ///     .post()
    ///     .expect("no conflict at the root");
    /// ```
    pub fn add_constraint<ConstraintImpl: Constraint>(
        &mut self,
        constraint: ConstraintImpl,
    ) -> ConstraintPoster<'_, ConstraintImpl> {
        ConstraintPoster::new(self, constraint)
    }

    /// Creates an instance of the propagator described by `constructor`, and propagates it at the
    /// root together with everything posted before.
    ///
    /// If the solver is already in a conflicting state, i.e. a previous call to this method
    /// already returned an error, calling this again will not alter the solver in any way, and
    /// [`ConstraintOperationError::InfeasibleState`] is returned.
    pub(crate) fn add_propagator<Constructor>(
        &mut self,
        constructor: Constructor,
    ) -> Result<PropagatorHandle<Constructor::PropagatorImpl>, ConstraintOperationError>
    where
        Constructor: PropagatorConstructor,
        Constructor::PropagatorImpl: 'static,
    {
        self.satisfaction_solver.add_propagator(constructor)
    }

    #[cfg(feature = "debug-checks")]
    pub(crate) fn record_rule(&mut self, rule: SchedulingRule) {
        self.rules.push(rule);
    }
}

/// Functions for creating branchers.
impl Solver {
    /// The [`DefaultBrancher`] over every variable created so far.
    pub fn default_brancher(&self) -> DefaultBrancher {
        let variables = self
            .satisfaction_solver
            .state
            .assignments
            .get_domains()
            .collect::<Vec<_>>();
        IndependentVariableValueBrancher::new(FirstFail::new(&variables), InDomainMin)
    }
}
