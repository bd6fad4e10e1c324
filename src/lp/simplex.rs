//! Revised simplex pivoting core.
//!
//! Works on one standard-form cost vector at a time; the two-phase driver
//! in the parent module runs it once for the auxiliary Phase I objective
//! and once for the real one. The core is written as a maximization:
//! callers hand it a sense-normalized cost vector.

use faer::{Col, Mat};
use log::trace;

use crate::linalg::lu::solve_square;
use crate::linalg::ops::{clamp_small, dot};
use crate::model::{PivotRule, SolveOptions};
use crate::{E, I, Status};

/// State returned by a pivoting run.
///
/// `status` is one of `Optimal`, `Unbounded`, or `IterationLimit`; the
/// numerical fields always reflect the last basis visited.
#[derive(Debug, Clone)]
pub(crate) struct SimplexRun {
    pub status: Status,
    pub basis: Vec<I>,
    pub x: Col<E>,
    pub objective: E,
    pub duals: Col<E>,
    pub reduced_costs: Col<E>,
    pub iterations: usize,
}

/// Runs the pivoting loop from the given basis.
///
/// `forbidden` masks columns that may never enter the basis (artificials
/// during Phase II). `max_iterations` bounds the number of pivots; it is
/// clamped to at least one.
pub(crate) fn run(
    a: &Mat<E>,
    b: &Col<E>,
    c: &Col<E>,
    basis: &[I],
    opts: &SolveOptions,
    forbidden: &[bool],
    max_iterations: usize,
) -> SimplexRun {
    let tol = opts.tol;
    let (m, n) = (a.nrows(), a.ncols());
    let max_iter = max_iterations.max(1);
    let mut basis = basis.to_vec();
    let mut iterations = 0usize;

    if m == 0 {
        return run_unconstrained(c, basis, forbidden, tol);
    }

    loop {
        let bmat = Mat::from_fn(m, m, |i, k| a[(i, basis[k])]);

        let mut xb = solve_square(bmat.as_ref(), b.as_ref());
        clamp_small(&mut xb, tol);
        if (0..m).any(|i| xb[i] < -tol) {
            for i in 0..m {
                if xb[i] < 0.0 {
                    xb[i] = 0.0;
                }
            }
        }

        let cb = Col::from_fn(m, |i| c[basis[i]]);
        let y = solve_square(bmat.as_ref().transpose(), cb.as_ref());

        let mut reduced = Col::from_fn(n, |j| c[j] - dot(a.as_ref().col(j), y.as_ref()));
        clamp_small(&mut reduced, tol);
        let mut in_basis = vec![false; n];
        for &j in &basis {
            in_basis[j] = true;
            reduced[j] = 0.0;
        }

        let entering = select_entering(&reduced, &in_basis, forbidden, opts.pivot_rule, tol);

        let Some(entering) = entering else {
            // No improving column: current vertex is optimal.
            let mut x = Col::zeros(n);
            for i in 0..m {
                x[basis[i]] = xb[i];
            }
            return SimplexRun {
                status: Status::Optimal,
                basis,
                objective: dot(cb.as_ref(), xb.as_ref()),
                x,
                duals: y,
                reduced_costs: reduced,
                iterations,
            };
        };

        if iterations >= max_iter {
            let mut x = Col::zeros(n);
            for i in 0..m {
                x[basis[i]] = xb[i];
            }
            return SimplexRun {
                status: Status::IterationLimit,
                basis,
                objective: dot(cb.as_ref(), xb.as_ref()),
                x,
                duals: y,
                reduced_costs: reduced,
                iterations,
            };
        }

        let col = a.as_ref().col(entering).to_owned();
        let mut d = solve_square(bmat.as_ref(), col.as_ref());
        clamp_small(&mut d, tol);

        let pivot_row = select_leaving(&xb, &d, &basis, opts.pivot_rule, tol);
        let Some(pivot_row) = pivot_row else {
            // Entering column improves forever.
            return SimplexRun {
                status: Status::Unbounded,
                basis,
                objective: E::INFINITY,
                x: Col::zeros(n),
                duals: y,
                reduced_costs: reduced,
                iterations,
            };
        };

        trace!(
            "pivot {iterations}: column {entering} enters, column {} leaves row {pivot_row}",
            basis[pivot_row]
        );
        basis[pivot_row] = entering;
        iterations += 1;
    }
}

/// Degenerate `m = 0` problem: no constraints at all. Any improving
/// column is unbounded; otherwise x = 0 is optimal.
fn run_unconstrained(c: &Col<E>, basis: Vec<I>, forbidden: &[bool], tol: E) -> SimplexRun {
    let n = c.nrows();
    if (0..n).any(|j| !forbidden[j] && c[j] > tol) {
        return SimplexRun {
            status: Status::Unbounded,
            basis,
            objective: E::INFINITY,
            x: Col::zeros(n),
            duals: Col::zeros(0),
            reduced_costs: c.clone(),
            iterations: 0,
        };
    }
    let mut reduced = c.clone();
    clamp_small(&mut reduced, tol);
    SimplexRun {
        status: Status::Optimal,
        basis,
        objective: 0.0,
        x: Col::zeros(n),
        duals: Col::zeros(0),
        reduced_costs: reduced,
        iterations: 0,
    }
}

/// Picks the entering column among non-basic, non-forbidden candidates
/// with reduced cost above tolerance. Dantzig takes the largest reduced
/// cost (first on ties), Bland the smallest index.
fn select_entering(
    reduced: &Col<E>,
    in_basis: &[bool],
    forbidden: &[bool],
    rule: PivotRule,
    tol: E,
) -> Option<I> {
    let candidates = (0..reduced.nrows()).filter(|&j| !in_basis[j] && !forbidden[j] && reduced[j] > tol);
    match rule {
        PivotRule::Bland => candidates.min(),
        PivotRule::Dantzig => {
            let mut best: Option<I> = None;
            for j in candidates {
                match best {
                    Some(b) if reduced[j] <= reduced[b] => {}
                    _ => best = Some(j),
                }
            }
            best
        }
    }
}

/// Minimum-ratio test. Under Bland, ties on the ratio break toward the
/// smallest leaving basic column index; under Dantzig the first minimum
/// wins.
fn select_leaving(
    xb: &Col<E>,
    d: &Col<E>,
    basis: &[I],
    rule: PivotRule,
    tol: E,
) -> Option<I> {
    let mut pivot: Option<(E, I)> = None;
    for i in 0..d.nrows() {
        if d[i] <= tol {
            continue;
        }
        let theta = xb[i] / d[i];
        let better = match (rule, pivot) {
            (_, None) => true,
            (PivotRule::Dantzig, Some((best, _))) => theta < best,
            (PivotRule::Bland, Some((best, row))) => {
                theta < best || (theta == best && basis[i] < basis[row])
            }
        };
        if better {
            pivot = Some((theta, i));
        }
    }
    pivot.map(|(_, row)| row)
}
