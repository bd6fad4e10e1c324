//! Linear programming via two-phase revised simplex.
//!
//! [`solve`] compiles the problem into standard form, runs Phase I to
//! drive artificial columns to zero (skipped when none exist), then runs
//! Phase II on the real objective with artificials forbidden from
//! re-entering, and maps the result back to the original variables.

use faer::Col;
use log::debug;

use crate::model::{BoundOverrides, Problem, Solution, SolveOptions};
use crate::{E, I, Status};

pub mod standard_form;

pub(crate) mod recover;
pub(crate) mod simplex;

use standard_form::StandardForm;

/// Solves a linear program. Integer flags on variables are ignored here;
/// use [`crate::mip::solve_mip`] to enforce them.
///
/// Structural defects (unknown variables, inconsistent bounds) surface as
/// an infeasible solution carrying the diagnostic message; no error
/// crosses this boundary.
pub fn solve(problem: &Problem, opts: &SolveOptions) -> Solution {
    solve_bounded(problem, &BoundOverrides::default(), opts)
}

/// [`solve`] with bound tightenings layered over the problem, for
/// branch-and-bound nodes.
pub(crate) fn solve_bounded(
    problem: &Problem,
    overrides: &BoundOverrides,
    opts: &SolveOptions,
) -> Solution {
    let sf = match standard_form::compile_bounded(problem, overrides) {
        Ok(sf) => sf,
        Err(err) => return Solution::abnormal(Status::Infeasible, 0, err.to_string()),
    };

    let phase1 = phase_one(&sf, opts);
    let mut iterations = phase1.iterations;
    let basis = match phase1.outcome {
        PhaseOneOutcome::Feasible(basis) => basis,
        PhaseOneOutcome::Infeasible => {
            return Solution::abnormal(Status::Infeasible, iterations, "Infeasible.");
        }
        PhaseOneOutcome::IterationLimit => {
            return Solution::abnormal(
                Status::IterationLimit,
                iterations,
                "Hit iteration limit in Phase I.",
            );
        }
        PhaseOneOutcome::Unbounded => {
            // The auxiliary objective is bounded by construction; reaching
            // this means the model is malformed.
            return Solution::abnormal(
                Status::Infeasible,
                iterations,
                "Phase I detected unbounded auxiliary problem (likely modelling error).",
            );
        }
    };

    debug!(
        "phase II: {} rows, {} columns, {} forbidden artificials",
        sf.n_rows(),
        sf.n_cols(),
        sf.artificials.len()
    );
    let remaining = opts.max_iters.saturating_sub(iterations).max(1);
    let mut forbidden = vec![false; sf.n_cols()];
    for &j in &sf.artificials {
        forbidden[j] = true;
    }
    let run = simplex::run(&sf.a, &sf.b, &sf.c, &basis, opts, &forbidden, remaining);
    iterations += run.iterations;

    match run.status {
        Status::Optimal => recover::map_solution(&sf, &run, opts, iterations),
        Status::Unbounded => Solution::abnormal(Status::Unbounded, iterations, "Unbounded."),
        Status::IterationLimit => Solution::abnormal(
            Status::IterationLimit,
            iterations,
            "Hit iteration limit in Phase II.",
        ),
        // The pivot loop itself never reports infeasibility.
        Status::Infeasible => Solution::abnormal(Status::Infeasible, iterations, "Infeasible."),
    }
}

enum PhaseOneOutcome {
    Feasible(Vec<I>),
    Infeasible,
    Unbounded,
    IterationLimit,
}

struct PhaseOne {
    outcome: PhaseOneOutcome,
    iterations: usize,
}

/// Phase I: maximize `-sum(artificials)`. A zero optimum hands a feasible
/// basis to Phase II; anything above tolerance is infeasibility.
fn phase_one(sf: &StandardForm, opts: &SolveOptions) -> PhaseOne {
    if sf.artificials.is_empty() || sf.n_rows() == 0 {
        return PhaseOne {
            outcome: PhaseOneOutcome::Feasible(sf.basis.clone()),
            iterations: 0,
        };
    }

    let mut c1 = Col::zeros(sf.n_cols());
    for &j in &sf.artificials {
        c1[j] = -1.0;
    }
    let forbidden = vec![false; sf.n_cols()];
    let run = simplex::run(&sf.a, &sf.b, &c1, &sf.basis, opts, &forbidden, opts.max_iters);

    let outcome = match run.status {
        Status::Optimal => {
            let residual: E = sf.artificials.iter().map(|&j| run.x[j]).sum();
            if residual > opts.tol {
                debug!("phase I residual {residual:e}: infeasible");
                PhaseOneOutcome::Infeasible
            } else {
                PhaseOneOutcome::Feasible(run.basis)
            }
        }
        Status::Unbounded => PhaseOneOutcome::Unbounded,
        Status::IterationLimit => PhaseOneOutcome::IterationLimit,
        Status::Infeasible => PhaseOneOutcome::Infeasible,
    };
    PhaseOne {
        outcome,
        iterations: run.iterations,
    }
}
