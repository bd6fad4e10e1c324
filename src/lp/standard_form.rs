//! Conversion of user problems into simplex standard form.
//!
//! The compiler rewrites a general problem (free variables, finite or
//! infinite bounds, `<=`/`>=`/`==` rows, affine constants, min or max
//! sense) into `A x = b, x >= 0` with `b >= 0` and an initial basis of
//! slack and artificial columns, one per row. Metadata recorded alongside
//! the matrix lets the solution mapper reconstruct original-space values.

use std::collections::HashMap;

use derive_more::{Display, Error};
use faer::{Col, Mat};

use crate::model::{BoundOverrides, Cmp, LinearTerm, Problem, Sense};
use crate::{E, I};

/// Rhs values this close to zero are treated as exact zeros.
const RHS_SNAP: E = 1e-12;

/// Structural errors caught before any numerical work.
#[derive(Debug, Display, Error, Clone, PartialEq)]
pub enum StandardFormError {
    #[display("Variable {name} has inconsistent bounds (lb {lb} > ub {ub}).")]
    InconsistentBounds { name: String, lb: E, ub: E },

    #[display("Objective references unknown variable '{var}'.")]
    UnknownObjectiveVariable { var: String },

    #[display("Constraint '{constraint}' references unknown variable '{var}'.")]
    UnknownConstraintVariable { constraint: String, var: String },

    #[display("Constraint '{constraint}' yields negative right-hand side after standardization.")]
    NegativeRhs { constraint: String },
}

/// Role of a standard-form column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Structural,
    Slack,
    Surplus,
    Artificial,
}

/// A labeled standard-form column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

/// How an original variable is reconstructed from standard columns:
/// `value = offset + sum(coef * x_std[col])`.
#[derive(Debug, Clone, PartialEq)]
pub struct VarImage {
    pub name: String,
    pub components: Vec<(I, E)>,
    pub offset: E,
}

/// The canonical problem `max c'x  s.t.  A x = b, x >= 0` plus the
/// metadata needed to map results back to the original space.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardForm {
    pub a: Mat<E>,
    pub b: Col<E>,
    /// Sense-normalized costs: the original coefficients for max problems,
    /// negated for min problems.
    pub c: Col<E>,
    /// Initial basis, one slack or artificial column per row.
    pub basis: Vec<I>,
    pub sense: Sense,
    pub columns: Vec<Column>,
    /// Images of the original variables, in declaration order.
    pub images: Vec<VarImage>,
    /// Row labels: model constraints first, then synthesized bound rows.
    pub row_names: Vec<String>,
    pub artificials: Vec<I>,
    /// Constant absorbed from the objective expression and bound shifts.
    pub objective_constant: E,
}

impl StandardForm {
    pub fn n_rows(&self) -> usize {
        self.b.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }
}

/// Compiles a problem into standard form.
pub fn compile(problem: &Problem) -> Result<StandardForm, StandardFormError> {
    compile_bounded(problem, &BoundOverrides::default())
}

/// Compiles with per-variable bound tightenings layered over the problem.
/// Branch-and-bound nodes use this instead of cloning the problem.
pub(crate) fn compile_bounded(
    problem: &Problem,
    overrides: &BoundOverrides,
) -> Result<StandardForm, StandardFormError> {
    let mut builder = Builder::default();

    // Structural columns from the original variables. Finite lower bounds
    // are shifted out; free variables split into a difference of two
    // non-negative columns. Upper bounds synthesize extra `<=` rows.
    let mut bound_rows: Vec<RowSpec> = Vec::new();
    let mut image_index: HashMap<String, usize> = HashMap::new();
    for var in &problem.variables {
        let (lb, ub) = overrides.effective(var);
        let lb = lb.filter(|v| !v.is_infinite());
        let ub = ub.filter(|v| !v.is_infinite());
        if let (Some(lb), Some(ub)) = (lb, ub)
            && lb > ub
        {
            return Err(StandardFormError::InconsistentBounds {
                name: var.name.clone(),
                lb,
                ub,
            });
        }

        let image = match lb {
            None => {
                let pos = builder.add_column(format!("{}__pos", var.name), ColumnKind::Structural);
                let neg = builder.add_column(format!("{}__neg", var.name), ColumnKind::Structural);
                VarImage {
                    name: var.name.clone(),
                    components: vec![(pos, 1.0), (neg, -1.0)],
                    offset: 0.0,
                }
            }
            Some(lb) => {
                let idx = builder.add_column(var.name.clone(), ColumnKind::Structural);
                VarImage {
                    name: var.name.clone(),
                    components: vec![(idx, 1.0)],
                    offset: lb,
                }
            }
        };
        let _ = image_index.insert(var.name.clone(), builder.images.len());
        builder.images.push(image);

        if let Some(ub) = ub {
            bound_rows.push(RowSpec {
                name: format!("bound_{}_ub", var.name),
                terms: vec![LinearTerm::new(var.name.clone(), 1.0)],
                constant: 0.0,
                cmp: Cmp::Le,
                rhs: ub,
            });
        }
    }

    // Objective rewrite: offsets fold into the scalar constant, the rest
    // distributes over the image columns.
    let mut objective_constant = problem.objective.constant;
    for term in &problem.objective.terms {
        let image = image_index
            .get(&term.var)
            .map(|&i| &builder.images[i])
            .ok_or_else(|| StandardFormError::UnknownObjectiveVariable {
                var: term.var.clone(),
            })?;
        objective_constant += term.coef * image.offset;
        for &(idx, coef) in &image.components {
            builder.objective_raw[idx] += term.coef * coef;
        }
    }

    // Constraint rewrite: model rows first, then synthesized bound rows.
    let model_rows = problem.constraints.iter().map(|cons| RowSpec {
        name: cons.name.clone(),
        terms: cons.lhs.terms.clone(),
        constant: cons.lhs.constant,
        cmp: cons.cmp,
        rhs: cons.rhs,
    });
    for row in model_rows.chain(bound_rows) {
        builder.add_row(row, &image_index)?;
    }

    let (m, n) = (builder.rows.len(), builder.columns.len());
    let a = Mat::from_fn(m, n, |i, j| {
        builder.rows[i].get(&j).copied().unwrap_or(0.0)
    });
    let b = Col::from_fn(m, |i| builder.rhs[i]);
    let c = match problem.sense {
        Sense::Max => Col::from_fn(n, |j| builder.objective_raw[j]),
        Sense::Min => Col::from_fn(n, |j| -builder.objective_raw[j]),
    };

    Ok(StandardForm {
        a,
        b,
        c,
        basis: builder.basis,
        sense: problem.sense,
        columns: builder.columns,
        images: builder.images,
        row_names: builder.row_names,
        artificials: builder.artificials,
        objective_constant,
    })
}

/// A constraint row before slack introduction, in original-variable terms.
struct RowSpec {
    name: String,
    terms: Vec<LinearTerm>,
    constant: E,
    cmp: Cmp,
    rhs: E,
}

#[derive(Default)]
struct Builder {
    columns: Vec<Column>,
    objective_raw: Vec<E>,
    images: Vec<VarImage>,
    rows: Vec<HashMap<I, E>>,
    rhs: Vec<E>,
    row_names: Vec<String>,
    basis: Vec<I>,
    artificials: Vec<I>,
}

impl Builder {
    fn add_column(&mut self, name: String, kind: ColumnKind) -> I {
        self.columns.push(Column { name, kind });
        self.objective_raw.push(0.0);
        self.columns.len() - 1
    }

    fn add_row(
        &mut self,
        row: RowSpec,
        image_index: &HashMap<String, usize>,
    ) -> Result<(), StandardFormError> {
        let mut entries: HashMap<I, E> = HashMap::new();
        let mut shift = row.constant;
        for term in &row.terms {
            let image = image_index
                .get(&term.var)
                .map(|&i| &self.images[i])
                .ok_or_else(|| StandardFormError::UnknownConstraintVariable {
                    constraint: row.name.clone(),
                    var: term.var.clone(),
                })?;
            shift += term.coef * image.offset;
            for &(idx, coef) in &image.components {
                *entries.entry(idx).or_insert(0.0) += term.coef * coef;
            }
        }

        let mut rhs = row.rhs - shift;
        let mut cmp = row.cmp;
        if rhs < 0.0 {
            for value in entries.values_mut() {
                *value = -*value;
            }
            rhs = -rhs;
            cmp = match cmp {
                Cmp::Le => Cmp::Ge,
                Cmp::Ge => Cmp::Le,
                Cmp::Eq => Cmp::Eq,
            };
        }
        if rhs < 0.0 && rhs.abs() > RHS_SNAP {
            return Err(StandardFormError::NegativeRhs {
                constraint: row.name,
            });
        }
        if rhs.abs() <= RHS_SNAP {
            rhs = 0.0;
        }

        match cmp {
            Cmp::Le => {
                let slack = self.add_column(format!("slack_{}", row.name), ColumnKind::Slack);
                let _ = entries.insert(slack, 1.0);
                self.basis.push(slack);
            }
            Cmp::Ge => {
                let surplus =
                    self.add_column(format!("surplus_{}", row.name), ColumnKind::Surplus);
                let _ = entries.insert(surplus, -1.0);
                let artificial =
                    self.add_column(format!("artificial_{}", row.name), ColumnKind::Artificial);
                let _ = entries.insert(artificial, 1.0);
                self.basis.push(artificial);
                self.artificials.push(artificial);
            }
            Cmp::Eq => {
                let artificial =
                    self.add_column(format!("artificial_{}", row.name), ColumnKind::Artificial);
                let _ = entries.insert(artificial, 1.0);
                self.basis.push(artificial);
                self.artificials.push(artificial);
            }
        }

        self.rows.push(entries);
        self.rhs.push(rhs);
        self.row_names.push(row.name);
        Ok(())
    }
}
