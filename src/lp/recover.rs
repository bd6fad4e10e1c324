//! Mapping standard-space results back to the original model.

use std::collections::BTreeMap;

use crate::lp::simplex::SimplexRun;
use crate::lp::standard_form::StandardForm;
use crate::model::{Sense, Solution, SolveOptions};
use crate::{E, Status};

/// Reconstructed values this close to zero are reported as exact zeros.
const SNAP: E = 1e-12;

fn snap(value: E) -> E {
    if value.abs() < SNAP { 0.0 } else { value }
}

/// Builds the user-facing solution from an optimal Phase II run.
///
/// Primal values and reduced costs come from each variable's image
/// (`offset + sum(coef * std_value)`); duals are the simplex multipliers
/// keyed by row label. Duals and reduced costs are reported in the
/// internal maximization convention: min-sense problems see the negated
/// textbook multipliers.
pub(crate) fn map_solution(
    sf: &StandardForm,
    run: &SimplexRun,
    opts: &SolveOptions,
    iterations: usize,
) -> Solution {
    let mut x = BTreeMap::new();
    let mut reduced_costs = BTreeMap::new();
    for image in &sf.images {
        let mut value = image.offset;
        let mut reduced = 0.0;
        for &(idx, coef) in &image.components {
            value += coef * run.x[idx];
            reduced += coef * run.reduced_costs[idx];
        }
        let _ = x.insert(image.name.clone(), snap(value));
        let _ = reduced_costs.insert(image.name.clone(), snap(reduced));
    }

    let duals = (opts.return_duals && run.duals.nrows() > 0).then(|| {
        sf.row_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), snap(run.duals[i])))
            .collect()
    });

    let objective_value = match sf.sense {
        Sense::Max => sf.objective_constant + run.objective,
        Sense::Min => sf.objective_constant - run.objective,
    };

    Solution {
        status: Status::Optimal,
        objective_value: Some(objective_value),
        x: Some(x),
        reduced_costs: Some(reduced_costs),
        duals,
        iterations,
        message: String::new(),
    }
}
