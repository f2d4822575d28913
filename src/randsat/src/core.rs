/*****************************************************************************************[core.rs]
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

use {
    crate::callbacks::Callbacks,
    crate::clause::{lbool, CRef, ClauseAllocator, Kind, LMap, Lit, OccVec, VMap, Var},
    crate::intmap::IntMapBool,
    crate::interface::SolverInterface,
    std::fmt,
};

/// The main solver structure
///
/// A `Solver` object contains the whole state of the SAT solver: variables,
/// clauses, the trail, and statistics.
///
/// It is parametrized by `Callbacks`
pub struct Solver<Cb: Callbacks> {
    /// If the problem is satisfiable, this vector contains the model (if any).
    model: Vec<lbool>,

    cb: Cb, // the callbacks

    /// List of problem clauses.
    clauses: Vec<CRef>,
    /// List of learnt clauses.
    learnts: Vec<CRef>,

    v: SolverV,
}

/// The current assignments.
struct VarState {
    /// Current assignment for each variable.
    ass: VMap<lbool>,
    /// Stores reason and level for each variable.
    vardata: VMap<VarData>,
    /// Pre-trail record of a length-1 input clause per variable
    /// (`UNDEF` = none). Flushed onto the trail when solving starts.
    unit: VMap<lbool>,

    /// Assignment stack; stores all assigments made in the order they were made.
    trail: Vec<Lit>,
    /// Separator indices for different decision levels in `trail`.
    trail_lim: Vec<i32>,
}

struct SolverV {
    vars: VarState,

    /// `watches[lit]` is the list of clauses currently watching `lit`;
    /// a clause is examined when one of its watched literals becomes false.
    watches: LMap<OccVec<Watcher>>,
    /// If `false`, the constraints are already unsatisfiable. No part of the solver state may be used!
    ok: bool,
    /// Head of queue (as index into the trail -- no more explicit propagation queue in MiniSat).
    qhead: i32,
    /// Next variable to be created.
    next_var: Var,
    ca: ClauseAllocator,

    /// State of the random number generator for branching.
    random_seed: f64,

    // Statistics: (read-only member variable)
    solves: u64,
    decisions: u64,
    propagations: u64,
    conflicts: u64,
    max_literals: u64,
    tot_literals: u64,

    num_clauses: u64,
    num_learnts: u64,
    clauses_literals: u64,
    learnts_literals: u64,

    // Temporaries (to reduce allocation overhead).
    seen: IntMapBool<Var>,
    analyze_toclear: Vec<Lit>,
}

// public API
impl<Cb: Callbacks> SolverInterface for Solver<Cb> {
    fn new_var_default(&mut self) -> Var {
        self.v.new_var()
    }

    fn var_of_int(&mut self, v_idx: u32) -> Var {
        while v_idx >= self.num_vars() {
            self.new_var_default();
        }
        let var = Var::from_idx(v_idx);
        debug_assert_eq!(var.idx(), v_idx);
        var
    }

    // in the API, we can only add clauses at level 0
    fn add_clause_reuse(&mut self, clause: &mut Vec<Lit>) -> bool {
        debug!("add toplevel clause {:?}", clause);
        debug_assert_eq!(
            self.v.decision_level(),
            0,
            "add clause at non-zero decision level"
        );
        if !self.v.ok {
            return false;
        }
        match clause.len() {
            0 => {
                // the empty clause: the formula is trivially unsatisfiable
                self.v.ok = false;
                false
            }
            1 => {
                // record the unit fact without touching the trail; the
                // solve entry point performs the initial propagation
                let l = clause[0];
                let prev = self.v.vars.unit[l.var()];
                let cur = lbool::new(l.sign());
                if prev == lbool::UNDEF {
                    self.v.vars.unit[l.var()] = cur;
                    true
                } else if prev == cur {
                    true
                } else {
                    // contradicting unit clauses: the empty clause follows
                    debug!("contradicting unit clauses on {:?}", l.var());
                    self.v.ok = false;
                    false
                }
            }
            _ => {
                // watch the first two slots; the clause is not inspected for
                // satisfied/falsified literals, duplicates or tautologies
                self.cb.on_new_clause(&clause, Kind::Axiom);
                let cr = self.v.ca.alloc(&clause, false);
                self.clauses.push(cr);
                self.v.attach_clause(cr);
                true
            }
        }
    }

    fn add_clause_ints(&mut self, lits: &[i32]) -> bool {
        let mut clause: Vec<Lit> = lits
            .iter()
            .map(|&l| {
                debug_assert_ne!(l, 0, "0 is not a literal");
                let v = self.var_of_int((l.abs() - 1) as u32);
                Lit::new(v, l > 0)
            })
            .collect();
        self.add_clause_reuse(&mut clause)
    }

    fn solve(&mut self) -> lbool {
        self.solve_internal()
    }

    fn value_var(&self, v: Var) -> lbool {
        self.model
            .get(v.idx() as usize)
            .map_or(lbool::UNDEF, |&v| v)
    }
    fn value_lit(&self, l: Lit) -> lbool {
        self.value_var(l.var()) ^ !l.sign()
    }
    fn get_model(&self) -> &[lbool] {
        &self.model
    }
    fn is_ok(&self) -> bool {
        self.v.ok
    }

    fn num_vars(&self) -> u32 {
        self.v.num_vars()
    }
    fn num_clauses(&self) -> u64 {
        self.v.num_clauses
    }
    fn num_learnts(&self) -> u64 {
        self.v.num_learnts
    }
    fn num_conflicts(&self) -> u64 {
        self.v.conflicts
    }
    fn num_propagations(&self) -> u64 {
        self.v.propagations
    }
    fn num_decisions(&self) -> u64 {
        self.v.decisions
    }

    fn print_stats(&self) {
        println!("c decisions             : {:<12}", self.v.decisions);
        println!("c propagations          : {:<12}", self.v.propagations);
        println!("c conflicts             : {:<12}", self.v.conflicts);
        println!(
            "c conflict literals     : {:<12}   ({:4.2} % deleted)",
            self.v.tot_literals,
            (self.v.max_literals - self.v.tot_literals) as f64 * 100.0
                / self.v.max_literals as f64
        );
    }
}

impl<Cb: Callbacks + Default> Default for Solver<Cb> {
    fn default() -> Self {
        Solver::new(SolverOpts::default(), Default::default())
    }
}

// main algorithm
impl<Cb: Callbacks> Solver<Cb> {
    /// Create a new solver with the given options and callbacks.
    pub fn new(opts: SolverOpts, cb: Cb) -> Self {
        assert!(opts.check());
        Self {
            model: vec![],
            cb,
            clauses: vec![],
            learnts: vec![],
            v: SolverV::new(&opts),
        }
    }

    /// Temporary access to the callbacks
    pub fn cb_mut(&mut self) -> &mut Cb {
        &mut self.cb
    }

    /// Temporary access to the callbacks
    pub fn cb(&self) -> &Cb {
        &self.cb
    }

    pub fn dimacs_model(&self) -> SolverPrintDimacs<Cb> {
        SolverPrintDimacs { s: self }
    }

    /// Main CDCL loop: propagate, recover from conflicts, decide.
    ///
    /// # Output:
    ///
    /// - `lbool::TRUE` if all variables got assigned without an unrecoverable
    ///    conflict; the clause set is satisfiable.
    /// - `lbool::FALSE` if the clause set is unsatisfiable.
    /// - `lbool::UNDEF` if the callbacks asked to stop.
    fn search(&mut self, tmp_learnt: &mut Vec<Lit>) -> lbool {
        debug_assert!(self.v.ok);

        loop {
            if self.cb.stop() {
                debug!("search.interrupted");
                return lbool::UNDEF;
            }

            // boolean propagation
            if let Some(confl) = self.v.propagate() {
                // conflict analysis
                self.v.conflicts += 1;
                if self.v.decision_level() == 0 {
                    return lbool::FALSE;
                }

                let backtrack_lvl = self.v.analyze(confl, tmp_learnt);
                self.v.cancel_until(backtrack_lvl as u32);
                trace!(
                    "learnt clause {:?} (backjump to level {})",
                    tmp_learnt,
                    backtrack_lvl
                );
                self.add_learnt_and_enqueue(tmp_learnt);
            } else {
                debug_assert!(self.check_invariants());

                // no boolean conflict: new variable decision
                let next = self.v.pick_branch_lit();
                if next == Lit::UNDEF {
                    // no unassigned variable left, the trail is a model
                    return lbool::TRUE;
                }

                self.v.decisions += 1;
                self.v.vars.new_decision_level();
                trace!("decide {:?} at level {}", next, self.v.decision_level());
                self.v.vars.unchecked_enqueue(next, CRef::UNDEF);
            }
        }
    }

    /// Install a learnt clause and enqueue its asserting literal.
    ///
    /// Precondition: the trail was unwound to the clause's backjump level,
    /// where slot 0 is unassigned and every other literal is false.
    fn add_learnt_and_enqueue(&mut self, learnt: &[Lit]) {
        debug_assert!(learnt.len() >= 1);
        self.cb.on_new_clause(learnt, Kind::Learnt);

        if learnt.len() == 1 {
            // asserting unit fact, valid at level 0 with no justification
            self.v.vars.unchecked_enqueue(learnt[0], CRef::UNDEF);
        } else {
            // propagate the asserting literal, justified by the new clause
            let cr = self.v.ca.alloc(learnt, true);
            self.learnts.push(cr);
            self.v.attach_clause(cr);
            self.v.vars.unchecked_enqueue(learnt[0], cr);
        }
    }

    /// Main solve method.
    fn solve_internal(&mut self) -> lbool {
        debug_assert_eq!(self.v.decision_level(), 0);
        self.model.clear();
        if !self.v.ok {
            return lbool::FALSE;
        }

        self.v.solves += 1;
        info!("search.start");
        self.cb.on_start();

        // assert the pending unit facts before the first decision
        if !self.v.flush_pending_units() {
            self.v.ok = false;
            self.cb.on_result(lbool::FALSE);
            return lbool::FALSE;
        }

        let mut tmp_learnt: Vec<Lit> = vec![];
        let status = self.search(&mut tmp_learnt);
        self.cb.on_result(status);

        if status == lbool::TRUE {
            // Extend & copy model:
            let num_vars = self.num_vars();
            self.model.resize(num_vars as usize, lbool::UNDEF);
            for i in 0..num_vars {
                self.model[i as usize] = self.v.value(Var::from_idx(i));
            }
        } else if status == lbool::FALSE {
            self.v.ok = false;
        }

        if self.v.decision_level() > 0 {
            self.v.cancel_until(0);
        }
        debug!("res: {:?}", status);
        status
    }

    /// Structural invariants, checked at propagation quiescence in debug
    /// builds: every clause is in exactly the watch lists of its first two
    /// literals, no clause has both watches false, every recorded reason has
    /// the literal it assigned in slot 0, and trail levels are nondecreasing.
    fn check_invariants(&self) -> bool {
        let v = &self.v;
        for &cr in self.clauses.iter().chain(self.learnts.iter()) {
            let c = v.ca.get_ref(cr);
            let (c0, c1) = (c[0], c[1]);
            let in_w0 = v.watches[c0].iter().filter(|w| w.cref == cr).count();
            let in_w1 = v.watches[c1].iter().filter(|w| w.cref == cr).count();
            if c0 != c1 {
                assert_eq!(in_w0, 1, "clause {:?} not watched by {:?}", c.lits(), c0);
                assert_eq!(in_w1, 1, "clause {:?} not watched by {:?}", c.lits(), c1);
            } else {
                // a clause whose two slots hold the same literal keeps both
                // watchers in that literal's list
                assert_eq!(in_w0, 2);
            }
            assert!(
                v.value_lit(c0) != lbool::FALSE || v.value_lit(c1) != lbool::FALSE,
                "both watches of {:?} false at quiescence",
                c.lits()
            );
        }
        let mut prev_level = 0;
        for &p in &v.vars.trail {
            let r = v.reason(p.var());
            if r != CRef::UNDEF {
                assert_eq!(v.ca.get_ref(r)[0], p, "reason of {:?} must assign it", p);
            }
            let lvl = v.level(p.var());
            assert!(lvl >= prev_level, "trail levels must be nondecreasing");
            prev_level = lvl;
        }
        true
    }
}

///
/// Print the model as DIMACS
pub struct SolverPrintDimacs<'a, Cb: Callbacks + 'a> {
    s: &'a Solver<Cb>,
}

mod dimacs_out {
    use super::*;

    impl<'a, Cb: Callbacks> fmt::Display for SolverPrintDimacs<'a, Cb> {
        fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
            write!(out, "v ")?;
            for (i, &val) in self.s.model.iter().enumerate() {
                if val == lbool::TRUE {
                    write!(out, "{} ", i + 1)?
                } else if val == lbool::FALSE {
                    write!(out, "-{} ", i + 1)?
                }
            }
            writeln!(out, "0")
        }
    }
}

impl SolverV {
    #[inline(always)]
    fn num_vars(&self) -> u32 {
        self.next_var.idx()
    }

    #[inline(always)]
    pub fn level(&self, x: Var) -> i32 {
        self.vars.level(x)
    }

    #[inline(always)]
    pub fn value(&self, x: Var) -> lbool {
        self.vars.value(x)
    }

    #[inline(always)]
    pub fn value_lit(&self, x: Lit) -> lbool {
        self.vars.value_lit(x)
    }

    #[inline(always)]
    pub fn decision_level(&self) -> u32 {
        self.vars.decision_level()
    }

    fn new_var(&mut self) -> Var {
        let v = self.next_var;
        self.next_var = Var::from_idx(v.idx() + 1);
        self.watches.reserve_default(Lit::new(v, true));
        self.watches.reserve_default(Lit::new(v, false));
        self.vars.ass.insert_default(v, lbool::UNDEF);
        self.vars.vardata.insert_default(v, VarData::default());
        self.vars.unit.insert_default(v, lbool::UNDEF);
        self.seen.reserve(v);
        v
    }

    /// Pick a literal to make a decision with: a uniformly random variable
    /// (scanning forward with wraparound until an unassigned one is found)
    /// with a uniformly random polarity.
    fn pick_branch_lit(&mut self) -> Lit {
        let n = self.num_vars();
        if n == 0 {
            return Lit::UNDEF;
        }
        let first = utils::irand(&mut self.random_seed, n as i32) as u32;
        let mut next = Var::UNDEF;
        for off in 0..n {
            let idx = first + off;
            let idx = if idx >= n { idx - n } else { idx };
            let v = Var::from_idx(idx);
            if self.value(v) == lbool::UNDEF {
                next = v;
                break;
            }
        }
        if next == Var::UNDEF {
            Lit::UNDEF
        } else {
            Lit::new(next, utils::drand(&mut self.random_seed) < 0.5)
        }
    }

    /// Move pre-trail unit records onto the trail, at level 0.
    ///
    /// Returns `false` if a recorded unit is already falsified.
    fn flush_pending_units(&mut self) -> bool {
        debug_assert_eq!(self.decision_level(), 0);
        for idx in 0..self.num_vars() {
            let v = Var::from_idx(idx);
            let u = self.vars.unit[v];
            if u == lbool::UNDEF {
                continue;
            }
            let p = Lit::new(v, u == lbool::TRUE);
            let val = self.vars.value_lit(p);
            if val == lbool::FALSE {
                return false;
            } else if val == lbool::UNDEF {
                trace!("assert unit fact {:?}", p);
                self.vars.unchecked_enqueue(p, CRef::UNDEF);
            }
        }
        true
    }

    /// Analyze a conflict and produce a learnt clause.
    ///
    /// # Pre-conditions:
    ///
    /// - current decision level must be greater than root level.
    /// - `confl` is falsified by the current trail.
    ///
    /// # Post-conditions:
    ///
    /// - the backjump level is returned.
    /// - `out_learnt[0]` is the asserting literal (negated first UIP).
    /// - if `out_learnt.len() > 1` then `out_learnt[1]` has the greatest
    ///   decision level of the rest of the literals.
    fn analyze(&mut self, confl: CRef, out_learnt: &mut Vec<Lit>) -> i32 {
        debug_assert!(self.decision_level() > 0);
        debug!("analyze.start {:?}", confl);

        out_learnt.clear();
        out_learnt.push(Lit::UNDEF); // leave room for the UIP

        let conflict_level = self.decision_level() as i32;
        let mut path_c = 0;
        let mut p = Lit::UNDEF;
        let mut index = self.vars.trail.len();
        let mut cur = confl;

        loop {
            debug_assert_ne!(cur, CRef::UNDEF, "resolution reached a decision");
            let c = self.ca.get_ref(cur);
            // when resolving with the reason of `p`, slot 0 is `p` itself
            // and cannot appear in the learnt clause: skip it
            let lits = if p == Lit::UNDEF {
                c.lits()
            } else {
                debug_assert_eq!(c[0].var(), p.var());
                &c.lits()[1..]
            };

            for &q in lits {
                let lvl = self.vars.level(q.var());
                debug_assert!(lvl <= conflict_level);
                if !self.seen[q.var()] && lvl > 0 {
                    self.seen.set(q.var(), true);
                    if lvl == conflict_level {
                        // at conflict level: to be eliminated by resolution
                        path_c += 1;
                    } else {
                        out_learnt.push(q); // part of the learnt clause
                    }
                }
            }

            // Select next literal in the trail to look at:
            while !self.seen[self.vars.trail[index - 1].var()] {
                index -= 1;
            }
            index -= 1;
            p = self.vars.trail[index];
            self.seen.set(p.var(), false);
            path_c -= 1;

            if path_c <= 0 {
                break; // `p` is the first unique implication point
            }
            cur = self.reason(p.var());
        }

        debug_assert!(self.value_lit(p) == lbool::TRUE);
        out_learnt[0] = !p;
        trace!("analyze.learnt {:?} (before minimization)", &out_learnt);

        self.max_literals += out_learnt.len() as u64;
        self.minimize_conflict(out_learnt);
        self.tot_literals += out_learnt.len() as u64;

        // Find correct backtrack level:
        let btlevel = if out_learnt.len() == 1 {
            0
        } else {
            let mut max_i = 1;
            let mut max_level = self.level(out_learnt[max_i].var());
            // Find the first literal assigned at the next-highest level:
            for i in 2..out_learnt.len() {
                let level = self.level(out_learnt[i].var());
                if level > max_level {
                    max_i = i;
                    max_level = level;
                }
            }
            // Swap-in this literal at index 1:
            out_learnt.swap(max_i, 1);
            max_level
        };

        // clear the scratch marks
        for &lit in &self.analyze_toclear {
            self.seen.set(lit.var(), false);
        }
        debug_assert!(out_learnt
            .iter()
            .all(|&l| self.value_lit(l) == lbool::FALSE));

        btlevel
    }

    /// Simplify the conflict clause: a literal whose reason consists only of
    /// literals that are already in the clause (or assigned at level 0) is
    /// redundant by self-subsuming resolution.
    fn minimize_conflict(&mut self, out_learnt: &mut Vec<Lit>) {
        self.analyze_toclear.clear();
        self.analyze_toclear.extend_from_slice(&out_learnt);

        let mut j = 1;
        for i in 1..out_learnt.len() {
            let lit = out_learnt[i];
            let x = lit.var();
            let reason = self.reason(x);

            let retain = if reason == CRef::UNDEF {
                // a decision cannot be resolved away
                debug_assert!(self.vars.level(x) > 0);
                true
            } else {
                let c = self.ca.get_ref(reason);
                c.lits()[1..]
                    .iter()
                    .any(|&l| !self.seen[l.var()] && self.vars.level(l.var()) > 0)
            };
            if retain {
                out_learnt[j] = lit;
                j += 1;
            }
        }
        out_learnt.truncate(j);
    }

    /// Propagates all enqueued facts.
    ///
    /// If a conflict arises, the conflicting clause is returned,
    /// otherwise `None`.
    ///
    /// # Post-conditions:
    ///
    /// - the propagation queue is empty, even if there was a conflict.
    fn propagate(&mut self) -> Option<CRef> {
        let mut confl = None;
        let mut num_props: u32 = 0;
        let watches_ptr: *mut LMap<OccVec<Watcher>> = &mut self.watches;

        while (self.qhead as usize) < self.vars.trail.len() {
            // `p` is the next enqueued fact to propagate.
            let p = self.vars.trail[self.qhead as usize];
            self.qhead += 1;
            num_props += 1;

            // the clauses watching `!p` just had that watch falsified
            let false_lit = !p;
            let ws = &mut self.watches[false_lit];
            let mut i: usize = 0;
            let mut j: usize = 0;
            let end: usize = ws.len();
            'clauses: while i < end {
                // Try to avoid inspecting the clause:
                let blocker = ws[i].blocker;
                if self.vars.value_lit(blocker) == lbool::TRUE {
                    ws[j] = ws[i];
                    j += 1;
                    i += 1;
                    continue;
                }

                // Make sure the false literal is in slot 1:
                let cr = ws[i].cref;
                let mut c = self.ca.get_mut(cr);
                if c[0] == false_lit {
                    c[0] = c[1];
                    c[1] = false_lit;
                }
                debug_assert_eq!(c[1], false_lit);
                i += 1;

                // If slot 0 is true, then the clause is already satisfied.
                let first = c[0];
                let w = Watcher::new(cr, first);
                if first != blocker && self.vars.value_lit(first) == lbool::TRUE {
                    ws[j] = w;
                    j += 1;
                    continue;
                }

                // Look for a new literal to watch:
                for k in 2..c.size() {
                    if self.vars.value_lit(c[k]) != lbool::FALSE {
                        c[1] = c[k];
                        c[k] = false_lit;

                        // the clause moves to the list of its new watch;
                        // safe because `c[1] != false_lit`, so the lists are not aliased
                        debug_assert_ne!(c[1], false_lit);
                        unsafe { &mut (&mut *watches_ptr)[c[1]] }.push(w);
                        continue 'clauses;
                    }
                }

                // Did not find a watch -- clause is unit under assignment:
                ws[j] = w;
                j += 1;
                if self.vars.value_lit(first) == lbool::FALSE {
                    // both watches false: conflict
                    confl = Some(cr);
                    self.qhead = self.vars.trail.len() as i32;
                    // Copy the remaining watches:
                    while i < end {
                        ws[j] = ws[i];
                        j += 1;
                        i += 1;
                    }
                } else {
                    // unit implication; `first` sits in slot 0 of its reason
                    self.vars.unchecked_enqueue(first, cr);
                }
            }
            ws.truncate(j);
        }
        self.propagations += num_props as u64;

        confl
    }

    /// Attach a clause to the watcher lists of its first two literals.
    fn attach_clause(&mut self, cr: CRef) {
        let (c0, c1, learnt, size) = {
            let c = self.ca.get_ref(cr);
            debug_assert!(c.size() > 1);
            (c[0], c[1], c.learnt(), c.size())
        };
        self.watches[c0].push(Watcher::new(cr, c1));
        self.watches[c1].push(Watcher::new(cr, c0));
        if learnt {
            self.num_learnts += 1;
            self.learnts_literals += size as u64;
        } else {
            self.num_clauses += 1;
            self.clauses_literals += size as u64;
        }
    }

    /// Revert to the state at given level (keeping all assignment at `level` but not beyond).
    fn cancel_until(&mut self, level: u32) {
        debug_assert!(self.decision_level() > level);
        let trail_lim_level = self.vars.trail_lim[level as usize] as usize;
        for c in (trail_lim_level..self.vars.trail.len()).rev() {
            let x = self.vars.trail[c].var();
            // `vardata` is left as-is; it is meaningless while unassigned
            self.vars.ass[x] = lbool::UNDEF;
        }
        self.qhead = trail_lim_level as i32;
        self.vars.trail.truncate(trail_lim_level);
        self.vars.trail_lim.truncate(level as usize);
    }

    #[inline(always)]
    fn reason(&self, x: Var) -> CRef {
        self.vars.reason(x)
    }

    fn new(opts: &SolverOpts) -> Self {
        Self {
            vars: VarState::new(),
            watches: LMap::new(),
            ok: true,
            qhead: 0,
            next_var: Var::from_idx(0),
            ca: ClauseAllocator::new(),

            random_seed: opts.random_seed,

            solves: 0,
            decisions: 0,
            propagations: 0,
            conflicts: 0,
            max_literals: 0,
            tot_literals: 0,

            num_clauses: 0,
            num_learnts: 0,
            clauses_literals: 0,
            learnts_literals: 0,

            seen: IntMapBool::new(),
            analyze_toclear: vec![],
        }
    }
}

impl VarState {
    fn new() -> Self {
        Self {
            ass: VMap::new(),
            vardata: VMap::new(),
            unit: VMap::new(),
            trail: vec![],
            trail_lim: vec![],
        }
    }

    /// Begins a new decision level.
    fn new_decision_level(&mut self) {
        let lvl = self.trail.len() as i32;
        self.trail_lim.push(lvl);
    }

    #[inline(always)]
    pub fn value(&self, x: Var) -> lbool {
        self.ass[x]
    }

    #[inline(always)]
    fn value_lit(&self, x: Lit) -> lbool {
        self.ass[x.var()] ^ !x.sign()
    }

    #[inline(always)]
    fn level(&self, x: Var) -> i32 {
        self.vardata[x].level
    }

    #[inline(always)]
    fn reason(&self, x: Var) -> CRef {
        self.vardata[x].reason
    }

    #[inline(always)]
    pub fn decision_level(&self) -> u32 {
        self.trail_lim.len() as u32
    }

    fn unchecked_enqueue(&mut self, p: Lit, from: CRef) {
        debug_assert_eq!(
            self.value_lit(p),
            lbool::UNDEF,
            "lit {:?} should be undef",
            p
        );
        self.ass[p.var()] = lbool::new(p.sign());
        self.vardata[p.var()] = VarData::new(from, self.decision_level() as i32);
        self.trail.push(p);
    }
}

#[derive(Debug, Clone, Copy)]
struct VarData {
    reason: CRef,
    level: i32,
}

impl Default for VarData {
    fn default() -> Self {
        Self {
            reason: CRef::UNDEF,
            level: 0,
        }
    }
}

impl VarData {
    #[inline(always)]
    fn new(reason: CRef, level: i32) -> Self {
        Self { reason, level }
    }
}

#[derive(Debug, Clone, Copy)]
struct Watcher {
    cref: CRef,
    blocker: Lit,
}

impl PartialEq for Watcher {
    #[inline(always)]
    fn eq(&self, rhs: &Self) -> bool {
        self.cref == rhs.cref
    }
}
impl Eq for Watcher {}

impl Watcher {
    fn new(cref: CRef, blocker: Lit) -> Self {
        Self { cref, blocker }
    }
}

mod utils {
    /// Generate a random double:
    pub(super) fn drand(seed: &mut f64) -> f64 {
        *seed *= 1389796.0;
        let q = (*seed / 2147483647.0) as i32;
        *seed -= q as f64 * 2147483647.0;
        return *seed / 2147483647.0;
    }

    /// Generate a random integer:
    pub(super) fn irand(seed: &mut f64, size: i32) -> i32 {
        (drand(seed) * size as f64) as i32
    }
}

/// Tunable parameters of the solver.
pub struct SolverOpts {
    /// Seed of the branching RNG; any finite positive value.
    pub random_seed: f64,
}

impl Default for SolverOpts {
    fn default() -> SolverOpts {
        Self {
            random_seed: 91648253.0,
        }
    }
}

impl SolverOpts {
    /// Check that options are valid.
    pub fn check(&self) -> bool {
        0.0 < self.random_seed && self.random_seed < f64::INFINITY
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_drand_stays_in_unit_interval() {
        let mut seed = SolverOpts::default().random_seed;
        for _ in 0..1000 {
            let x = utils::drand(&mut seed);
            assert!(0.0 <= x && x < 1.0, "drand out of range: {}", x);
        }
    }

    #[test]
    fn test_irand_bounds() {
        let mut seed = 42.0;
        for size in 1..50 {
            for _ in 0..100 {
                let x = utils::irand(&mut seed, size);
                assert!(0 <= x && x < size);
            }
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut s1 = 91648253.0;
        let mut s2 = 91648253.0;
        for _ in 0..100 {
            assert_eq!(utils::drand(&mut s1).to_bits(), utils::drand(&mut s2).to_bits());
        }
    }

    #[test]
    fn test_opts_check() {
        assert!(SolverOpts::default().check());
        assert!(!SolverOpts { random_seed: 0.0 }.check());
        assert!(!SolverOpts {
            random_seed: f64::INFINITY
        }
        .check());
    }
}
