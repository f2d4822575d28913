/*****************************************************************************************[dimacs.rs]
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

//! Reader for the DIMACS CNF format.
//!
//! The solver core itself does no I/O; this module feeds a file (or any
//! `BufRead`) into anything implementing `SolverInterface`.

use {
    crate::{interface::SolverInterface, Lit},
    std::io::{self, BufRead},
};

/// `parse(input, solver, is_strict)` adds the content of `input` to the solver.
///
/// ## Params
/// - `is_strict` if true, will fail when the number of clauses does not match
///   the declared `p cnf` header
pub fn parse<S: SolverInterface, R: BufRead>(
    input: &mut R,
    solver: &mut S,
    is_strict: bool,
) -> io::Result<()> {
    let mut lits = vec![];
    let mut num_clauses = 0;
    let mut num_read_clauses = 0;
    let mut header_seen = false;
    loop {
        skip_whitespace(input)?;
        match next_byte(input)? {
            Some(b'p') => {
                let mut header = [0; 5];
                input.read_exact(&mut header)?;
                if &header != b"p cnf" {
                    return parse_error(format!("PARSE ERROR! Unexpected char: p"));
                }
                // the variable count is redundant: variables are created on sight
                parse_int(input)?;
                num_clauses = parse_int(input)?;
                header_seen = true;
            }
            Some(b'c') => skip_line(input)?,
            Some(_) => {
                read_clause(input, solver, &mut lits)?;
                solver.add_clause_reuse(&mut lits);
                num_read_clauses += 1;
            }
            None => break,
        }
    }
    if is_strict && header_seen && num_clauses != num_read_clauses {
        return parse_error(format!(
            "PARSE ERROR! DIMACS header mismatch: wrong number of clauses"
        ));
    }
    Ok(())
}

/// Read a zero-terminated clause into `lits`, creating variables on the fly.
fn read_clause<S: SolverInterface, R: BufRead>(
    input: &mut R,
    solver: &mut S,
    lits: &mut Vec<Lit>,
) -> io::Result<()> {
    lits.clear();
    loop {
        let parsed_lit = parse_int(input)?;
        if parsed_lit == 0 {
            return Ok(());
        }
        let var = (parsed_lit.abs() - 1) as u32;
        let lit = Lit::new(solver.var_of_int(var), parsed_lit > 0);
        lits.push(lit);
    }
}

fn parse_int<R: BufRead>(input: &mut R) -> io::Result<i32> {
    skip_whitespace(input)?;
    let ch = next_byte(input)?;
    let neg = if ch == Some(b'+') || ch == Some(b'-') {
        input.consume(1);
        ch == Some(b'-')
    } else {
        false
    };
    match next_byte(input)? {
        Some(ch) if b'0' <= ch && ch <= b'9' => (),
        Some(ch) => {
            return parse_error(format!("PARSE ERROR! Unexpected char: {}", ch as char));
        }
        None => return parse_error(format!("PARSE ERROR! Unexpected EOF")),
    }
    let mut val = 0;
    while let Some(ch) = next_byte(input)? {
        if !(b'0' <= ch && ch <= b'9') {
            break;
        }
        input.consume(1);
        val = val * 10 + (ch - b'0') as i32;
    }
    if neg {
        Ok(-val)
    } else {
        Ok(val)
    }
}

#[inline(always)]
fn is_whitespace(ch: u8) -> bool {
    (b'\x09' <= ch && ch <= b'\x0d') || ch == b' '
}

fn skip_whitespace<R: BufRead>(input: &mut R) -> io::Result<()> {
    while next_byte(input)?.map_or(false, is_whitespace) {
        input.consume(1);
    }
    Ok(())
}

fn skip_line<R: BufRead>(input: &mut R) -> io::Result<()> {
    while let Some(ch) = next_byte(input)? {
        input.consume(1);
        if ch == b'\n' {
            return Ok(());
        }
    }
    Ok(())
}

fn next_byte<R: BufRead>(input: &mut R) -> io::Result<Option<u8>> {
    Ok(input.fill_buf()?.first().map(|&ch| ch))
}

fn parse_error<T>(message: String) -> io::Result<T> {
    Err(io::Error::new(io::ErrorKind::InvalidInput, message))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{lbool, BasicSolver, SolverOpts};

    fn solver() -> BasicSolver {
        BasicSolver::new(SolverOpts::default(), Default::default())
    }

    #[test]
    fn test_parse_and_solve() {
        let mut s = solver();
        let mut input: &[u8] = b"c a comment\np cnf 2 2\n1 2 0\n-1 2 0\n";
        parse(&mut input, &mut s, true).unwrap();
        assert_eq!(s.num_vars(), 2);
        assert_eq!(s.solve(), lbool::TRUE);
        assert_eq!(s.value_lit(Lit::new(crate::Var::from_idx(1), true)), lbool::TRUE);
    }

    #[test]
    fn test_strict_clause_count() {
        let mut s = solver();
        let mut input: &[u8] = b"p cnf 2 3\n1 2 0\n";
        assert!(parse(&mut input, &mut s, true).is_err());
    }

    #[test]
    fn test_lenient_clause_count() {
        let mut s = solver();
        let mut input: &[u8] = b"p cnf 2 3\n1 2 0\n";
        assert!(parse(&mut input, &mut s, false).is_ok());
    }

    #[test]
    fn test_reject_garbage() {
        let mut s = solver();
        let mut input: &[u8] = b"p cnf 1 1\nx y z\n";
        assert!(parse(&mut input, &mut s, false).is_err());
    }
}
