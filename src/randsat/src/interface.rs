/* Main Interface */

use crate::clause::{lbool, Lit, Var};

/// Main interface for a solver: it makes it possible to add clauses,
/// allocate variables, and check for satisfiability
///
/// Clauses are sequences of literals; an empty clause makes the problem
/// unsatisfiable, and length-1 clauses are recorded as unit facts.
pub trait SolverInterface {
    fn num_vars(&self) -> u32;
    fn num_clauses(&self) -> u64;
    fn num_learnts(&self) -> u64;
    fn num_conflicts(&self) -> u64;
    fn num_propagations(&self) -> u64;
    fn num_decisions(&self) -> u64;

    /// Is the solver still potentially satisfiable?
    ///
    /// Returns `false` if the empty clause was added or derived.
    fn is_ok(&self) -> bool;

    /// Print some current statistics to standard output.
    fn print_stats(&self);

    /// Creates a new SAT variable in the solver.
    fn new_var_default(&mut self) -> Var;

    /// Obtain the variable of (0-based) index `v_idx`, creating it and every
    /// missing predecessor if needed.
    fn var_of_int(&mut self, v_idx: u32) -> Var;

    /// Add a clause to the solver. Returns `false` if the solver is in
    /// an `UNSAT` state.
    fn add_clause_reuse(&mut self, clause: &mut Vec<Lit>) -> bool;

    /// Add a clause given in the signed-integer convention: literal `n > 0`
    /// is variable `n` positive, `-n` is variable `n` negated. `0` is not a
    /// literal.
    fn add_clause_ints(&mut self, lits: &[i32]) -> bool;

    /// Decide satisfiability of the current clause set.
    ///
    /// Returns `lbool::TRUE` (satisfiable, a model is available through
    /// `get_model`), `lbool::FALSE` (unsatisfiable), or `lbool::UNDEF` if the
    /// callbacks interrupted the search.
    fn solve(&mut self) -> lbool;

    /// Query whole model
    ///
    /// Precondition: last result was `Sat` (ie `lbool::TRUE`)
    fn get_model(&self) -> &[lbool];

    /// Query model for var
    ///
    /// Precondition: last result was `Sat` (ie `lbool::TRUE`)
    fn value_var(&self, v: Var) -> lbool;

    /// Query model for lit
    fn value_lit(&self, l: Lit) -> lbool;
}
