//! Universal solver properties checked across the scenario corpus.

use std::collections::BTreeMap;

use crate::model::{Cmp, Problem, Sense, Solution, SolveOptions, Variable};
use crate::tests::{balanced_pair, binary_packing, diet_toy, shared_cap};
use crate::{E, Status, lp, mip};

const TOL: E = 1e-6;

fn assert_feasibility_witness(problem: &Problem, solution: &Solution) {
    let values = solution.x.as_ref().expect("optimal solution carries x");
    for var in &problem.variables {
        let value = values[&var.name];
        if let Some(lb) = var.lb {
            assert!(value >= lb - TOL, "{}: {value} below lb {lb}", var.name);
        }
        if let Some(ub) = var.ub {
            assert!(value <= ub + TOL, "{}: {value} above ub {ub}", var.name);
        }
    }
    for cons in &problem.constraints {
        let lhs = cons.lhs.evaluate(values);
        let holds = match cons.cmp {
            Cmp::Le => lhs <= cons.rhs + TOL,
            Cmp::Ge => lhs >= cons.rhs - TOL,
            Cmp::Eq => (lhs - cons.rhs).abs() <= TOL,
        };
        assert!(holds, "{}: {lhs} {} {}", cons.name, cons.cmp, cons.rhs);
    }
}

fn assert_objective_consistency(problem: &Problem, solution: &Solution) {
    let values = solution.x.as_ref().unwrap();
    let recomputed = problem.objective.evaluate(values);
    assert!((recomputed - solution.objective_value.unwrap()).abs() < TOL);
}

fn negated(problem: &Problem) -> Problem {
    let mut flipped = problem.clone();
    flipped.sense = match problem.sense {
        Sense::Min => Sense::Max,
        Sense::Max => Sense::Min,
    };
    for term in &mut flipped.objective.terms {
        term.coef = -term.coef;
    }
    flipped.objective.constant = -flipped.objective.constant;
    flipped
}

#[test]
fn test_feasibility_and_objective_witnesses() {
    for problem in [diet_toy(), balanced_pair(), shared_cap()] {
        let solution = lp::solve(&problem, &SolveOptions::default());
        assert_eq!(solution.status, Status::Optimal, "{}", problem.name);
        assert_feasibility_witness(&problem, &solution);
        assert_objective_consistency(&problem, &solution);
    }
}

#[test]
fn test_sense_symmetry() {
    for problem in [diet_toy(), shared_cap()] {
        let original = lp::solve(&problem, &SolveOptions::default());
        let mirrored = lp::solve(&negated(&problem), &SolveOptions::default());

        assert_eq!(original.status, Status::Optimal);
        assert_eq!(mirrored.status, Status::Optimal);
        assert!(
            (original.objective_value.unwrap() + mirrored.objective_value.unwrap()).abs() < TOL
        );
        let x = original.x.unwrap();
        let x_mirrored = mirrored.x.unwrap();
        for (name, value) in &x {
            assert!((value - x_mirrored[name]).abs() < TOL);
        }
    }
}

#[test]
fn test_integer_feasibility() {
    let solution = mip::solve_mip(&binary_packing(), &SolveOptions::default());
    assert_eq!(solution.status, Status::Optimal);
    let x = solution.x.as_ref().unwrap();
    for (name, value) in x {
        assert!(
            (value - value.round()).abs() <= TOL,
            "{name} = {value} is fractional"
        );
    }
    assert_feasibility_witness(&binary_packing(), &solution);
}

#[test]
fn test_idempotence() {
    let problem = diet_toy();
    let first = lp::solve(&problem, &SolveOptions::default());
    let second = lp::solve(&problem, &SolveOptions::default());

    assert_eq!(first.status, second.status);
    assert_eq!(first.iterations, second.iterations);
    assert!(
        (first.objective_value.unwrap() - second.objective_value.unwrap()).abs() < TOL
    );
    assert_eq!(first.x, second.x);
    assert_eq!(first.duals, second.duals);
}

#[test]
fn test_monotone_tightening() {
    // Tightening a bound can never improve the optimum in the sense
    // direction.
    let base = shared_cap();
    let mut tightened = base.clone();
    tightened.variables[0] = Variable::continuous("x", Some(0.0), Some(1.0));

    let loose = lp::solve(&base, &SolveOptions::default());
    let tight = lp::solve(&tightened, &SolveOptions::default());
    assert_eq!(loose.status, Status::Optimal);
    assert_eq!(tight.status, Status::Optimal);
    assert!(tight.objective_value.unwrap() <= loose.objective_value.unwrap() + TOL);
}

#[test]
fn test_solution_document_shape() {
    // The serialized form exposes snake_case statuses and keeps maps
    // keyed by variable and constraint names.
    let solution = lp::solve(&diet_toy(), &SolveOptions::default());
    let doc = serde_json::to_value(&solution).unwrap();
    assert_eq!(doc["status"], "optimal");
    assert!(doc["x"].get("x").is_some());
    assert!(doc["duals"].get("c1").is_some());

    let parsed: Solution = serde_json::from_value(doc).unwrap();
    assert_eq!(parsed, solution);
}

#[test]
fn test_mip_aggregates_iterations_across_nodes() {
    let lp_only = lp::solve(&binary_packing(), &SolveOptions::default());
    let searched = mip::solve_mip(&binary_packing(), &SolveOptions::default());
    assert!(searched.iterations >= lp_only.iterations);
}

#[test]
fn test_missing_variables_default_to_zero_in_witness() {
    // Regression guard for the witness helper itself.
    let expr = crate::model::LinearExpr::terms(&[("absent", 2.0)]);
    assert_eq!(expr.evaluate(&BTreeMap::new()), 0.0);
}
