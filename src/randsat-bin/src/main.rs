/*****************************************************************************************[main.rs]
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

extern crate clap;
extern crate cpu_time;
extern crate flate2;
extern crate randsat;

#[cfg(not(feature = "logging"))]
#[macro_use]
pub(crate) mod log {
    macro_rules! debug {
        ($( $x:expr ),*) => {};
    }
}

#[cfg(not(feature = "logging"))]
mod env_logger {
    pub fn init() {}
}

#[cfg(feature = "logging")]
extern crate env_logger;

#[cfg(feature = "logging")]
#[macro_use]
extern crate log;

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::process::exit;
use std::time::Instant;

use clap::{App, Arg};
use flate2::bufread::GzDecoder;
use randsat::{dimacs, lbool, Callbacks, Solver, SolverInterface, SolverOpts};

mod system;

fn main() {
    env_logger::init();
    let exitcode = main2().unwrap_or_else(|err| {
        eprintln!("{}", err);
        exit(1)
    });
    exit(exitcode);
}

/// Callbacks enforcing the optional CPU-time limit
struct CB {
    pub lim: Option<(system::ResourceMeasure, f64)>,
}

impl CB {
    fn new() -> Self {
        CB { lim: None }
    }
}

impl Callbacks for CB {
    fn stop(&self) -> bool {
        match self.lim {
            None => false,
            Some((ref r, max_cpu)) => r.cpu_time() > max_cpu,
        }
    }
}

type MSolver = Solver<CB>; // specialized solver

fn main2() -> io::Result<i32> {
    let matches = App::new("randsat")
        .version("0.1.0")
        .about("CDCL SAT solver with random branching")
        .arg(Arg::with_name("input-file"))
        .arg(Arg::with_name("result-output-file"))
        .arg(
            Arg::with_name("verbosity")
                .long("verb")
                .default_value("1")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("cpu-lim")
                .long("cpu-lim")
                .help("CPU time limit in seconds")
                .default_value("-1.0")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("is-strict")
                .long("strict")
                .help("Fail when the DIMACS header does not match the clause count"),
        )
        .arg(
            Arg::with_name("random-seed")
                .long("rnd-seed")
                .help("Seed of the branching RNG")
                .default_value("91648253.0")
                .takes_value(true),
        )
        .get_matches();

    let mut solver_opts = SolverOpts::default();
    solver_opts.random_seed = matches
        .value_of("random-seed")
        .and_then(|s| s.parse().ok())
        .unwrap_or(solver_opts.random_seed);

    if !solver_opts.check() {
        eprintln!("Invalid option value");
        exit(1);
    }

    let input_file = matches.value_of("input-file");
    let result_output_file = matches.value_of("result-output-file");
    let verbosity = matches
        .value_of("verbosity")
        .unwrap()
        .parse::<i32>()
        .unwrap_or(0);
    if verbosity < 0 || verbosity > 2 {
        eprintln!(
            "ERROR! value <{}> is too small for option \"verb\".",
            verbosity
        );
        exit(1);
    }
    let is_strict = matches.is_present("is-strict");
    let cpu_lim = matches
        .value_of("cpu-lim")
        .and_then(|s| s.parse().ok())
        .filter(|x| *x > 0.);

    // allocate callbacks
    let mut cb = CB::new();
    if let Some(max_cpu) = cpu_lim {
        assert!(max_cpu > 0.);
        cb.lim = Some((system::ResourceMeasure::new(), max_cpu));
    }

    let mut solver = MSolver::new(solver_opts, cb);

    let initial_time = Instant::now();

    if let Some(input_file) = input_file {
        debug!("solve file {}", input_file);
        let file = BufReader::new(File::open(input_file)?);
        read_input_autogz(file, &mut solver, is_strict)?;
    } else {
        println!("c Reading from standard input... Use '--help' for help.");
        let stdin = io::stdin();
        read_input_autogz(stdin.lock(), &mut solver, is_strict)?;
    }

    let mut resfile = if let Some(result_output_file) = result_output_file {
        Some(BufWriter::new(File::create(result_output_file)?))
    } else {
        None
    };

    if verbosity > 0 {
        println!("c number of variables    : {:<12}", solver.num_vars());
        println!("c number of clauses     : {:<12}", solver.num_clauses());
        let duration = Instant::now() - initial_time;
        println!(
            "c parse time            : {:9}.{:02} s",
            duration.as_secs(),
            duration.subsec_nanos() / 10_000_000
        );
    }

    let res = solver.solve();

    if verbosity > 0 {
        solver.print_stats();
    }

    let exit_code = if res == lbool::TRUE {
        println!("s SATISFIABLE");
        print!("{}", solver.dimacs_model());
        if let Some(resfile) = resfile.as_mut() {
            writeln!(resfile, "SAT")?;
            write!(resfile, "{}", solver.dimacs_model())?;
        }
        10
    } else if res == lbool::FALSE {
        println!("s UNSATISFIABLE");
        if let Some(resfile) = resfile.as_mut() {
            writeln!(resfile, "UNSAT")?;
        }
        20
    } else {
        println!("s INDETERMINATE");
        if let Some(resfile) = resfile.as_mut() {
            writeln!(resfile, "INDET")?;
        }
        0
    };
    if let Some(mut resfile) = resfile {
        resfile.flush()?;
    }

    Ok(exit_code)
}

/// Feed `input` to the solver, transparently decompressing gzip (detected by
/// its two magic bytes, so it also works for piped input).
fn read_input_autogz<R: BufRead, S: SolverInterface>(
    mut input: R,
    solver: &mut S,
    is_strict: bool,
) -> io::Result<()> {
    let head = input.fill_buf()?;
    let is_gz = head.len() >= 2 && head[0] == 0x1f && head[1] == 0x8b;
    if is_gz {
        debug!("decompressing gzipped input");
        let mut decoded = BufReader::new(GzDecoder::new(input));
        dimacs::parse(&mut decoded, solver, is_strict)
    } else {
        dimacs::parse(&mut input, solver, is_strict)
    }
}
