/*****************************************************************************************[lib.rs]
Copyright (c) 2003-2006, Niklas Een, Niklas Sorensson (MiniSat)
Copyright (c) 2007-2010, Niklas Sorensson (MiniSat)
Copyright (c) 2018-2018, Masaki Hara

Permission is hereby granted, free of charge, to any person obtaining a copy of this software and
associated documentation files (the "Software"), to deal in the Software without restriction,
including without limitation the rights to use, copy, modify, merge, publish, distribute,
sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all copies or
substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT
NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM,
DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT
OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
**************************************************************************************************/

//! A conflict-driven clause-learning SAT solver with two-watched-literal
//! propagation, first-UIP learning, backjumping, and random branching.

//======== LOG ============

// stubs when logging is not enabled
#[cfg(not(feature = "logging"))]
#[macro_use]
pub(crate) mod log {
    macro_rules! trace {
        ($( $x:expr ),*) => {};
    }
    macro_rules! debug {
        ($( $x:expr ),*) => {};
    }
    macro_rules! info {
        ($( $x:expr ),*) => {};
    }
}

#[cfg(feature = "logging")]
#[macro_use]
pub extern crate log;

//======== PUBLIC INTERFACE ============

pub mod callbacks;
pub mod clause;
pub mod core;
pub mod dimacs;
pub mod interface;
pub mod intmap;

pub use crate::{
    callbacks::{Basic as BasicCallbacks, Callbacks, Stats as StatsCallbacks},
    clause::{display::Print, lbool, Kind as ClauseKind, LMap, Lit, VMap, Var},
    core::{Solver, SolverOpts},
    interface::SolverInterface,
};

/// Basic solver with basic callbacks
pub type BasicSolver = Solver<BasicCallbacks>;

/// Decide satisfiability of the CNF formula over variables `1..=n_vars` whose
/// clauses are given in the signed-integer convention (`n` means variable `n`,
/// `-n` its negation; `0` is not a literal).
///
/// Returns `lbool::TRUE` or `lbool::FALSE`. For access to the model, build a
/// [`Solver`] and use [`SolverInterface::get_model`] after `solve`.
pub fn solve_cnf(n_vars: u32, clauses: &[Vec<i32>], opts: SolverOpts) -> lbool {
    let mut s = BasicSolver::new(opts, Default::default());
    for i in 0..n_vars {
        s.var_of_int(i);
    }
    for c in clauses {
        s.add_clause_ints(c);
    }
    s.solve()
}
