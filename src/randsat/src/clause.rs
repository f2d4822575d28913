/*****************************************************************************************[clause.rs]
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

use crate::intmap::{AsIndex, IntMap};
use smallvec::SmallVec;
use std::fmt;
use std::ops;

/// A propositional variable, numbered from 0 internally.
///
/// The external (DIMACS-style) numbering starts at 1; the conversion happens
/// at the API boundary.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(u32);

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0 == !0 {
            write!(f, "UNDEF")
        } else {
            write!(f, "{}", self.0 + 1)
        }
    }
}

impl Var {
    pub const UNDEF: Var = Var(!0);
    #[inline(always)]
    pub(crate) fn from_idx(idx: u32) -> Self {
        debug_assert!(idx < u32::MAX / 2, "Var::from_idx: index too large");
        Var(idx)
    }
    #[inline(always)]
    pub fn idx(&self) -> u32 {
        self.0
    }
}

impl AsIndex for Var {
    fn as_index(self) -> usize {
        self.0 as usize
    }
    fn from_index(index: usize) -> Self {
        Var(index as u32)
    }
}

pub type VMap<V> = IntMap<Var, V>;

/// A literal: a variable together with a polarity, packed as `2*var + neg`.
///
/// `sign() == true` means the positive literal.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lit(u32);

impl Lit {
    pub const UNDEF: Lit = Lit(!1);
    pub const ERROR: Lit = Lit(!0);

    #[inline(always)]
    pub fn new(var: Var, sign: bool) -> Self {
        Lit(var.0 * 2 + (!sign) as u32)
    }
    #[inline(always)]
    pub fn idx(&self) -> u32 {
        self.0
    }
    #[inline(always)]
    pub fn sign(&self) -> bool {
        (self.0 & 1) == 0
    }
    #[inline(always)]
    pub fn var(&self) -> Var {
        Var(self.0 >> 1)
    }
}

impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0 == !0 {
            write!(f, "ERROR")
        } else if self.0 == !1 {
            write!(f, "UNDEF")
        } else {
            write!(f, "{}{}", if self.sign() { "" } else { "-" }, self.0 / 2 + 1)
        }
    }
}

impl ops::Not for Lit {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        Lit(self.0 ^ 1)
    }
}
impl ops::BitXor<bool> for Lit {
    type Output = Self;
    fn bitxor(self, rhs: bool) -> Self {
        Lit(self.0 ^ rhs as u32)
    }
}

impl AsIndex for Lit {
    #[inline(always)]
    fn as_index(self) -> usize {
        self.0 as usize
    }
    #[inline(always)]
    fn from_index(index: usize) -> Self {
        Lit(index as u32)
    }
}

pub type LMap<V> = IntMap<Lit, V>;

#[allow(non_camel_case_types)]
#[derive(Clone, Copy)]
/// A ternary boolean (true, false, undefined) used for partial assignments.
pub struct lbool(u8);

impl fmt::Debug for lbool {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0 == 0 {
            write!(f, "TRUE")
        } else if self.0 == 1 {
            write!(f, "FALSE")
        } else if self.0 <= 3 {
            write!(f, "UNDEF")
        } else {
            // unreachable
            write!(f, "lbool({})", self.0)
        }
    }
}

impl Default for lbool {
    fn default() -> Self {
        lbool::UNDEF
    }
}

impl lbool {
    pub const TRUE: lbool = lbool(0);
    pub const FALSE: lbool = lbool(1);
    pub const UNDEF: lbool = lbool(2);
    pub fn from_u8(v: u8) -> Self {
        debug_assert!(v == (v & 3), "lbool::from_u8: invalid value");
        lbool(v)
    }
    #[inline(always)]
    pub fn new(v: bool) -> Self {
        lbool((!v) as u8)
    }
    #[inline(always)]
    pub fn to_u8(&self) -> u8 {
        self.0
    }
}

// from minisat:
// bool operator == (lbool b) const { return ((b.value&2) & (value&2)) | (!(b.value&2)&(value == b.value)); }
impl PartialEq for lbool {
    #[inline(always)]
    fn eq(&self, rhs: &Self) -> bool {
        self.0 == rhs.0 || (self.0 & rhs.0 & 2) != 0
    }
}

impl Eq for lbool {}

impl ops::Neg for lbool {
    type Output = lbool;

    /// Negation of a `lbool`
    fn neg(self) -> Self {
        lbool(self.0 ^ 1)
    }
}

impl ops::BitXor<bool> for lbool {
    type Output = lbool;

    /// Xor of a lbool with a boolean.
    fn bitxor(self, rhs: bool) -> Self {
        lbool(self.0 ^ rhs as u8)
    }
}
impl ops::BitXorAssign<bool> for lbool {
    fn bitxor_assign(&mut self, rhs: bool) {
        *self = *self ^ rhs;
    }
}

/// Provenance of a clause handed to `Callbacks::on_new_clause`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// A clause given by the caller.
    Axiom,
    /// A clause produced by conflict analysis.
    Learnt,
}

/// A handle to a clause in the allocator.
///
/// Watch lists and `reason` fields store these; they stay valid for the
/// lifetime of the solver since clauses are never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct CRef(u32);

impl CRef {
    pub const UNDEF: Self = CRef(!0);
}

/// Metadata of a clause
///
/// Layout:
/// unsigned learnt : 1;
/// unsigned size   : 31;
#[derive(Clone, Copy)]
pub struct ClauseHeader(u32);

impl fmt::Debug for ClauseHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ClauseHeader")
            .field("learnt", &self.learnt())
            .field("size", &self.size())
            .finish()
    }
}

impl ClauseHeader {
    pub fn new(learnt: bool, size: u32) -> Self {
        debug_assert!(size < (1 << 31));
        ClauseHeader(((learnt as u32) << 31) | size)
    }
    #[inline(always)]
    pub fn learnt(&self) -> bool {
        (self.0 & (1 << 31)) != 0
    }
    #[inline(always)]
    pub fn size(&self) -> u32 {
        self.0 & !(1 << 31)
    }
}

/// Main clause allocator: an arena holding every clause of the solver.
///
/// Clauses are only ever appended; the first two slots of each clause (the
/// watched literals) may be permuted in place by propagation.
#[derive(Debug)]
pub struct ClauseAllocator {
    headers: Vec<ClauseHeader>,
    offsets: Vec<u32>, // start of each clause in `lits`
    lits: Vec<Lit>,
}

impl ClauseAllocator {
    pub fn with_start_cap(n: usize) -> Self {
        Self {
            headers: Vec::with_capacity(n),
            offsets: Vec::with_capacity(n),
            lits: Vec::with_capacity(n),
        }
    }

    pub fn new() -> Self {
        Self::with_start_cap(1024 * 1024)
    }

    /// Number of clauses allocated so far.
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.headers.len(), self.offsets.len());
        self.headers.len()
    }

    /// Total number of literal slots in use.
    pub fn num_lits(&self) -> usize {
        self.lits.len()
    }

    pub(crate) fn alloc(&mut self, clause: &[Lit], learnt: bool) -> CRef {
        debug_assert!(clause.len() >= 2);
        let cid = self.headers.len();
        let offset = self.lits.len();

        self.headers.push(ClauseHeader::new(learnt, clause.len() as u32));
        self.offsets.push(offset as u32);
        self.lits.extend_from_slice(clause);

        CRef(cid as u32)
    }

    /// Get a reference on the clause `cref` points to
    #[inline]
    pub(crate) fn get_ref<'a>(&'a self, cref: CRef) -> ClauseRef<'a> {
        let header = self.headers[cref.0 as usize];
        ClauseRef {
            alloc: self,
            cref,
            header,
        }
    }

    /// Get a mutable reference on the clause `cref` points to
    pub(crate) fn get_mut(&mut self, cref: CRef) -> ClauseMut {
        let header = self.headers[cref.0 as usize];
        ClauseMut {
            alloc: self,
            cref,
            header,
        }
    }
}

#[derive(Debug, Clone, Copy)]
/// A reference to some clause
pub(crate) struct ClauseRef<'a> {
    cref: CRef,
    header: ClauseHeader, // fast access
    alloc: &'a ClauseAllocator,
}

#[derive(Debug)]
/// A mutable reference to some clause, with a temporary lifetime
pub(crate) struct ClauseMut<'a> {
    cref: CRef,
    header: ClauseHeader, // fast access
    alloc: &'a mut ClauseAllocator,
}

impl<'a, 'b> PartialEq<ClauseRef<'b>> for ClauseRef<'a> {
    fn eq(&self, rhs: &ClauseRef<'b>) -> bool {
        self.cref == rhs.cref
    }
}
impl<'a> Eq for ClauseRef<'a> {}

impl<'a> ClauseRef<'a> {
    #[inline(always)]
    pub fn learnt(&self) -> bool {
        self.header.learnt()
    }
    #[inline(always)]
    pub fn size(&self) -> u32 {
        self.header.size()
    }
    #[inline(always)]
    pub fn lits(&self) -> &'a [Lit] {
        let len = self.size() as usize;
        let offset = self.alloc.offsets[self.cref.0 as usize] as usize;
        &self.alloc.lits[offset..offset + len]
    }
}

impl<'a> ClauseMut<'a> {
    #[inline(always)]
    pub fn size(&self) -> u32 {
        self.header.size()
    }
    #[inline(always)]
    pub fn lits(&self) -> &[Lit] {
        let len = self.size() as usize;
        let offset = self.alloc.offsets[self.cref.0 as usize] as usize;
        &self.alloc.lits[offset..offset + len]
    }
    pub fn lits_mut(&mut self) -> &mut [Lit] {
        let len = self.size() as usize;
        let offset = self.alloc.offsets[self.cref.0 as usize] as usize;
        &mut self.alloc.lits[offset..offset + len]
    }
}

impl<'a> ops::Index<u32> for ClauseRef<'a> {
    type Output = Lit;
    fn index(&self, index: u32) -> &Self::Output {
        &self.lits()[index as usize]
    }
}
impl<'a> ops::Index<u32> for ClauseMut<'a> {
    type Output = Lit;
    fn index(&self, index: u32) -> &Self::Output {
        &self.lits()[index as usize]
    }
}
impl<'a> ops::IndexMut<u32> for ClauseMut<'a> {
    #[inline(always)]
    fn index_mut(&mut self, index: u32) -> &mut Self::Output {
        &mut self.lits_mut()[index as usize]
    }
}

/// Watch lists are short most of the time; keep the first few entries inline.
pub type OccVec<V> = SmallVec<[V; 4]>;

/// Anything that can be considered as a list of literals.
pub trait ClauseIterable: fmt::Debug {
    type Item: Copy + Into<Lit>;
    fn items(&self) -> &[Self::Item];
}

/// Any iterable clause can be printed in DIMACS
impl<T: ClauseIterable> display::Print for T {
    // display as DIMACS
    fn fmt_dimacs(&self, out: &mut fmt::Formatter) -> fmt::Result {
        for &x in self.items().iter() {
            let lit: Lit = x.into();
            write!(
                out,
                "{}{} ",
                (if lit.sign() { "" } else { "-" }),
                lit.var().idx() + 1
            )?;
        }
        write!(out, "0")?;
        Ok(())
    }
}

impl<'a> ClauseIterable for ClauseRef<'a> {
    type Item = Lit;
    fn items(&self) -> &[Self::Item] {
        self.lits()
    }
}

impl<'a> ClauseIterable for &'a [Lit] {
    type Item = Lit;
    fn items(&self) -> &[Self::Item] {
        &self
    }
}

impl ClauseIterable for Vec<Lit> {
    type Item = Lit;
    fn items(&self) -> &[Self::Item] {
        &self
    }
}

/// Generic interface for objects printable in DIMACS
pub mod display {
    use std::fmt;

    /// Objects that can be printed in DIMACS syntax
    pub trait Print: Sized {
        fn fmt_dimacs(&self, out: &mut fmt::Formatter) -> fmt::Result;

        /// Any type implementing `Print` can be used in a format string by
        /// just using `x.pp_dimacs()` instead of `x`.
        ///
        /// ```
        /// use randsat::*;
        /// let v: Vec<Lit> = vec![];
        /// format!("as dimacs: {}", v.pp_dimacs());
        /// ```
        fn pp_dimacs(&self) -> PrintWrapper<Self> {
            PrintWrapper(&self)
        }
    }

    /// A wrapper that can be used to display objects in format strings
    pub struct PrintWrapper<'a, T: 'a + Print>(&'a T);

    // Whenever `T` is printable in DIMACS, its wrapper implements Display
    impl<'a, T: Print> fmt::Display for PrintWrapper<'a, T> {
        fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
            self.0.fmt_dimacs(out)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lit_packing() {
        let v = Var::from_idx(3);
        let p = Lit::new(v, true);
        let n = Lit::new(v, false);
        assert_eq!(p.var(), v);
        assert_eq!(n.var(), v);
        assert!(p.sign());
        assert!(!n.sign());
        assert_eq!(!p, n);
        assert_eq!(!!p, p);
        assert_eq!(p ^ true, n);
        assert_eq!(p ^ false, p);
    }

    #[test]
    fn test_eq() {
        for i in 0..4 {
            let a = lbool::from_u8(i);
            for j in 0..4 {
                let b = lbool::from_u8(j);
                let are_eq = (i == 0 && j == 0) || (i == 1 && j == 1) || (i >= 2 && j >= 2);
                assert_eq!(
                    are_eq,
                    a == b,
                    "{:?}[{}] == {:?}[{}] should be {}",
                    a,
                    i,
                    b,
                    j,
                    are_eq
                );
            }
        }
    }

    #[test]
    fn test_not() {
        assert_eq!(-lbool::TRUE, lbool::FALSE);
        assert_eq!(-lbool::FALSE, lbool::TRUE);
        assert_eq!(-lbool::UNDEF, lbool::UNDEF);
    }

    #[test]
    fn test_bitxor() {
        assert_eq!(lbool::TRUE ^ true, lbool::FALSE);
        assert_eq!(lbool::TRUE ^ false, lbool::TRUE);
        assert_eq!(lbool::FALSE ^ true, lbool::TRUE);
        assert_eq!(lbool::FALSE ^ false, lbool::FALSE);
        assert_eq!(lbool::UNDEF ^ true, lbool::UNDEF);
        assert_eq!(lbool::UNDEF ^ false, lbool::UNDEF);
    }

    #[test]
    fn test_alloc_keeps_lits() {
        let mut ca = ClauseAllocator::with_start_cap(16);
        let v = |i| Var::from_idx(i);
        let c0 = vec![Lit::new(v(0), true), Lit::new(v(1), false)];
        let c1 = vec![
            Lit::new(v(2), true),
            Lit::new(v(0), false),
            Lit::new(v(1), true),
        ];
        let r0 = ca.alloc(&c0, false);
        let r1 = ca.alloc(&c1, true);
        assert_eq!(ca.len(), 2);
        assert_eq!(ca.get_ref(r0).lits(), &c0[..]);
        assert_eq!(ca.get_ref(r1).lits(), &c1[..]);
        assert!(!ca.get_ref(r0).learnt());
        assert!(ca.get_ref(r1).learnt());
        // permute the watched slots of r1, as propagation would
        let mut m = ca.get_mut(r1);
        let (a, b) = (m[0], m[1]);
        m[0] = b;
        m[1] = a;
        assert_eq!(ca.get_ref(r1)[0], c1[1]);
        assert_eq!(ca.get_ref(r1)[1], c1[0]);
    }
}
