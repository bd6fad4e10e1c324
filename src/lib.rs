//! Linear and mixed-integer linear optimization.
//!
//! The crate accepts a declarative problem description ([`model::Problem`])
//! and solves it with a two-phase revised simplex ([`lp::solve`]) or, when
//! integer variables are present, a branch-and-bound search over LP
//! relaxations ([`mip::solve_mip`]).

use serde::{Deserialize, Serialize};

pub type E = f64;
pub type I = usize;

pub mod linalg;
pub mod lp;
pub mod mip;
pub mod model;

#[cfg(test)]
pub mod tests;

pub use lp::solve;
pub use mip::solve_mip;
pub use model::{
    Cmp, Constraint, LinearExpr, LinearTerm, PivotRule, Problem, Sense, Solution, SolveOptions,
    Variable,
};

/// Status codes for optimization solvers.
///
/// Rendered as snake_case strings (`"iteration_limit"`, ...) at the
/// serialization boundary.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// An optimal solution was found.
    Optimal,
    /// The problem is infeasible.
    Infeasible,
    /// The problem is unbounded.
    Unbounded,
    /// The solver stopped due to an iteration limit.
    IterationLimit,
}
