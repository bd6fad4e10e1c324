//! Branch-and-bound search over LP relaxations.
//!
//! Depth-first: each node solves its relaxation, prunes against the
//! incumbent, and branches on the most-fractional integer variable with
//! `x <= floor` and `x >= ceil` children. Nodes carry only a small
//! bound-override map layered over the shared problem, never a copy of
//! the problem itself.

use log::debug;

use crate::lp;
use crate::model::{BoundOverrides, Problem, Solution, SolveOptions};
use crate::{E, Status};

/// Node budget: `20 * |integer variables|`, clamped to `[64, 1024]`.
const NODES_PER_INTEGER: usize = 20;
const NODE_FLOOR: usize = 64;
const NODE_CEILING: usize = 1024;

/// Bound comparisons in branching use this slack.
const BOUND_EPS: E = 1e-9;

/// Solves a mixed-integer linear program.
///
/// Problems without integer-flagged variables are handed to the LP
/// solver unchanged. The returned solution never carries duals or
/// reduced costs; branch-and-bound certifies only the primal incumbent.
pub fn solve_mip(problem: &Problem, opts: &SolveOptions) -> Solution {
    if !problem.variables.iter().any(|v| v.integer) {
        return lp::solve(problem, opts);
    }

    let node_opts = SolveOptions {
        return_duals: false,
        ..opts.clone()
    };
    let sense_factor = problem.sense.factor();
    let n_integer = problem.variables.iter().filter(|v| v.integer).count();
    let max_nodes = (n_integer * NODES_PER_INTEGER).clamp(NODE_FLOOR, NODE_CEILING);

    let mut incumbent: Option<Solution> = None;
    let mut incumbent_value: Option<E> = None;
    let mut total_iterations = 0usize;
    let mut nodes_explored = 0usize;
    let mut stack: Vec<(BoundOverrides, usize)> = vec![(BoundOverrides::default(), 0)];

    while nodes_explored < max_nodes {
        let Some((bounds, depth)) = stack.pop() else {
            break;
        };
        let relaxation = lp::solve_bounded(problem, &bounds, &node_opts);
        total_iterations += relaxation.iterations;
        nodes_explored += 1;

        match relaxation.status {
            Status::Infeasible | Status::IterationLimit => continue,
            Status::Unbounded => {
                return Solution::abnormal(
                    Status::Unbounded,
                    total_iterations,
                    "LP relaxation unbounded; MILP appears unbounded.",
                );
            }
            Status::Optimal => {}
        }
        let Some(node_value) = relaxation.objective_value else {
            continue;
        };

        if let Some(best) = incumbent_value
            && sense_factor * node_value <= sense_factor * best + opts.tol
        {
            debug!("node {nodes_explored} (depth {depth}) pruned by bound {best}");
            continue;
        }

        let Some((branch_var, value)) = select_fractional(problem, &relaxation, opts.tol) else {
            debug!("node {nodes_explored} (depth {depth}) integer-feasible at {node_value}");
            incumbent = Some(relaxation);
            incumbent_value = Some(node_value);
            continue;
        };

        let left = tighten_ub(problem, &bounds, &branch_var, value.floor());
        let right = tighten_lb(problem, &bounds, &branch_var, value.ceil());
        if let Some(right) = right {
            stack.push((right, depth + 1));
        }
        if let Some(left) = left {
            stack.push((left, depth + 1));
        }
    }

    let Some(incumbent) = incumbent else {
        return if nodes_explored >= max_nodes {
            Solution::abnormal(
                Status::IterationLimit,
                total_iterations,
                "Reached branch limit before finding feasible integer solution.",
            )
        } else {
            Solution::abnormal(
                Status::Infeasible,
                total_iterations,
                "No feasible integer assignment found.",
            )
        };
    };

    Solution {
        status: Status::Optimal,
        objective_value: incumbent.objective_value,
        x: incumbent.x,
        reduced_costs: None,
        duals: None,
        iterations: total_iterations,
        message: format!("Explored nodes: {nodes_explored}"),
    }
}

/// Picks the integer variable with the largest fractional part above
/// tolerance, requiring each new best to improve by more than `tol / 10`
/// so near-ties resolve toward declaration order.
fn select_fractional(problem: &Problem, relaxation: &Solution, tol: E) -> Option<(String, E)> {
    let values = relaxation.x.as_ref()?;
    let mut best: Option<(String, E)> = None;
    let mut best_gap = 0.0;
    for var in problem.variables.iter().filter(|v| v.integer) {
        let Some(&value) = values.get(&var.name) else {
            continue;
        };
        let gap = (value - value.round()).abs();
        if gap > tol && gap > best_gap + tol * 0.1 {
            best_gap = gap;
            best = Some((var.name.clone(), value));
        }
    }
    best
}

/// The left child `var <= floor(value)`. `None` when the tightening is
/// redundant against the current bound or contradicts the lower bound.
fn tighten_ub(
    problem: &Problem,
    bounds: &BoundOverrides,
    name: &str,
    value: E,
) -> Option<BoundOverrides> {
    let var = problem.variables.iter().find(|v| v.name == name)?;
    let (lb, ub) = bounds.effective(var);
    if let Some(ub) = ub
        && ub <= value + BOUND_EPS
    {
        return None;
    }
    let new_ub = ub.map_or(value, |ub| ub.min(value));
    if let Some(lb) = lb
        && lb > new_ub + BOUND_EPS
    {
        return None;
    }
    let mut child = bounds.clone();
    child.set_ub(name, new_ub);
    Some(child)
}

/// The right child `var >= ceil(value)`; same skip rules as [`tighten_ub`].
fn tighten_lb(
    problem: &Problem,
    bounds: &BoundOverrides,
    name: &str,
    value: E,
) -> Option<BoundOverrides> {
    let var = problem.variables.iter().find(|v| v.name == name)?;
    let (lb, ub) = bounds.effective(var);
    if let Some(lb) = lb
        && lb >= value - BOUND_EPS
    {
        return None;
    }
    let new_lb = lb.map_or(value, |lb| lb.max(value));
    if let Some(ub) = ub
        && new_lb > ub + BOUND_EPS
    {
        return None;
    }
    let mut child = bounds.clone();
    child.set_lb(name, new_lb);
    Some(child)
}
