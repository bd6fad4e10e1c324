//! Dense linear solves for simplex basis systems.
//!
//! Basis matrices are invertible by construction, so a dense LU with
//! partial pivoting is the workhorse. Floating-point degeneracy can still
//! produce a numerically singular basis; those solves fall back to a
//! least-squares solution instead of surfacing non-finite values.

use faer::linalg::solvers::{Solve, SolveLstsq};
use faer::{Col, ColRef, MatRef};

use crate::E;

/// Solves the square system `mat * x = rhs`.
///
/// Uses LU with partial pivoting, falling back to a column-pivoted QR
/// least-squares solve when the factorization yields non-finite entries.
pub fn solve_square(mat: MatRef<'_, E>, rhs: ColRef<'_, E>) -> Col<E> {
    let sol = mat.partial_piv_lu().solve(rhs.as_mat());
    if sol.col(0).iter().all(|v| v.is_finite()) {
        return sol.col(0).to_owned();
    }

    let sol = mat.col_piv_qr().solve_lstsq(rhs.as_mat());
    sol.col(0).to_owned()
}
