//! Value types for declaring linear and mixed-integer programs.
//!
//! A [`Problem`] is immutable once constructed: solvers read it, they never
//! modify it. Branch-and-bound layers its bound tightenings on top through
//! [`BoundOverrides`] instead of copying the problem per node.

use std::collections::{BTreeMap, HashMap};

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{E, Status};

/// Optimization direction.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sense {
    #[display("min")]
    Min,
    #[display("max")]
    Max,
}

impl Sense {
    /// Sign that turns "better" into "greater": +1 for max, -1 for min.
    pub fn factor(self) -> E {
        match self {
            Self::Max => 1.0,
            Self::Min => -1.0,
        }
    }
}

/// Constraint comparator.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cmp {
    #[display("<=")]
    #[serde(rename = "<=")]
    Le,
    #[display(">=")]
    #[serde(rename = ">=")]
    Ge,
    #[display("==")]
    #[serde(rename = "==")]
    Eq,
}

/// A decision variable.
///
/// `None` bounds mean unspecified: an unspecified lower bound makes the
/// variable free, an unspecified upper bound means +infinity. Infinite
/// float values are accepted in serialized documents and normalized away
/// during standardization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(default)]
    pub lb: Option<E>,
    #[serde(default)]
    pub ub: Option<E>,
    #[serde(default)]
    pub integer: bool,
}

impl Variable {
    /// A continuous variable with the given bounds.
    pub fn continuous(name: impl Into<String>, lb: Option<E>, ub: Option<E>) -> Self {
        Self {
            name: name.into(),
            lb,
            ub,
            integer: false,
        }
    }

    /// An integer variable with the given bounds.
    pub fn integer(name: impl Into<String>, lb: Option<E>, ub: Option<E>) -> Self {
        Self {
            name: name.into(),
            lb,
            ub,
            integer: true,
        }
    }
}

/// One `coef * var` term of a linear expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearTerm {
    pub var: String,
    pub coef: E,
}

impl LinearTerm {
    pub fn new(var: impl Into<String>, coef: E) -> Self {
        Self {
            var: var.into(),
            coef,
        }
    }
}

/// A linear expression: sum of terms plus an affine constant.
///
/// Repeated variables are allowed; the semantics is the algebraic sum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearExpr {
    #[serde(default)]
    pub terms: Vec<LinearTerm>,
    #[serde(default)]
    pub constant: E,
}

impl LinearExpr {
    pub fn new(terms: Vec<LinearTerm>, constant: E) -> Self {
        Self { terms, constant }
    }

    /// Expression over `(variable, coefficient)` pairs with no constant.
    pub fn terms(pairs: &[(&str, E)]) -> Self {
        Self {
            terms: pairs
                .iter()
                .map(|&(var, coef)| LinearTerm::new(var, coef))
                .collect(),
            constant: 0.0,
        }
    }

    /// Evaluates the expression under the given assignment. Missing
    /// variables contribute zero.
    pub fn evaluate(&self, values: &BTreeMap<String, E>) -> E {
        self.terms.iter().fold(self.constant, |acc, term| {
            acc + term.coef * values.get(&term.var).copied().unwrap_or(0.0)
        })
    }
}

/// A named linear constraint `lhs cmp rhs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub name: String,
    pub lhs: LinearExpr,
    pub cmp: Cmp,
    pub rhs: E,
}

impl Constraint {
    pub fn new(name: impl Into<String>, lhs: LinearExpr, cmp: Cmp, rhs: E) -> Self {
        Self {
            name: name.into(),
            lhs,
            cmp,
            rhs,
        }
    }
}

/// A complete problem description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub name: String,
    pub sense: Sense,
    pub objective: LinearExpr,
    pub variables: Vec<Variable>,
    pub constraints: Vec<Constraint>,
}

impl Problem {
    pub fn new(
        name: impl Into<String>,
        sense: Sense,
        objective: LinearExpr,
        variables: Vec<Variable>,
        constraints: Vec<Constraint>,
    ) -> Self {
        Self {
            name: name.into(),
            sense,
            objective,
            variables,
            constraints,
        }
    }
}

/// Entering-column strategy for the simplex core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PivotRule {
    /// Largest reduced cost; fast in practice, may cycle on degenerate bases.
    #[default]
    Dantzig,
    /// Smallest index entering and leaving; provably cycle-free.
    Bland,
}

/// Knobs recognized by every solve entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// Upper bound on total pivots across Phase I and Phase II.
    pub max_iters: usize,
    /// Tolerance used in all comparisons: degeneracy, optimality,
    /// integrality, pruning.
    pub tol: E,
    pub pivot_rule: PivotRule,
    /// When false the solution's `duals` field is absent.
    pub return_duals: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_iters: 10_000,
            tol: 1e-9,
            pivot_rule: PivotRule::default(),
            return_duals: true,
        }
    }
}

/// Result of a solve.
///
/// Numerical fields are populated only when `status` is
/// [`Status::Optimal`]; `duals` additionally requires
/// [`SolveOptions::return_duals`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub status: Status,
    pub objective_value: Option<E>,
    pub x: Option<BTreeMap<String, E>>,
    pub reduced_costs: Option<BTreeMap<String, E>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duals: Option<BTreeMap<String, E>>,
    pub iterations: usize,
    #[serde(default)]
    pub message: String,
}

impl Solution {
    /// A solution with no numerical fields, carrying only a status and a
    /// diagnostic message.
    pub(crate) fn abnormal(status: Status, iterations: usize, message: impl Into<String>) -> Self {
        Self {
            status,
            objective_value: None,
            x: None,
            reduced_costs: None,
            duals: None,
            iterations,
            message: message.into(),
        }
    }
}

/// Per-variable bound tightenings layered over an immutable [`Problem`].
///
/// Branch-and-bound nodes clone this small map instead of the whole
/// problem; the standard-form compiler reads bounds through it.
#[derive(Debug, Clone, Default)]
pub struct BoundOverrides {
    lbs: HashMap<String, E>,
    ubs: HashMap<String, E>,
}

impl BoundOverrides {
    /// The variable's bounds with overrides applied. An override can only
    /// tighten: lower bounds take the max, upper bounds the min.
    pub fn effective(&self, var: &Variable) -> (Option<E>, Option<E>) {
        let lb = match (var.lb, self.lbs.get(&var.name).copied()) {
            (Some(declared), Some(tightened)) => Some(declared.max(tightened)),
            (declared, tightened) => tightened.or(declared),
        };
        let ub = match (var.ub, self.ubs.get(&var.name).copied()) {
            (Some(declared), Some(tightened)) => Some(declared.min(tightened)),
            (declared, tightened) => tightened.or(declared),
        };
        (lb, ub)
    }

    pub fn set_lb(&mut self, name: impl Into<String>, value: E) {
        let _ = self.lbs.insert(name.into(), value);
    }

    pub fn set_ub(&mut self, name: impl Into<String>, value: E) {
        let _ = self.ubs.insert(name.into(), value);
    }
}
