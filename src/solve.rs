//! Solver boundary.
//!
//! Translates an [`LpModel`] into `good_lp` terms, runs the backend, and
//! maps the outcome back onto the model's own variable handles. The rest
//! of the crate never constructs solver types; this module is the only
//! place the engine choice (pure-Rust `microlp`) is visible.
//!
//! Infeasibility is an error, never a zero-valued solution, so callers can
//! tell "no feasible schedule" apart from an optimal plan that happens to
//! plant nothing.

use good_lp::{constraint, default_solver, variable, variables, Expression, SolverModel};
use good_lp::{ResolutionError, Solution as _};
use thiserror::Error;
use tracing::debug;

use crate::lp::{Comparison, LinearExpr, LpModel, VarId};

/// Tolerance for checking constraints that carry no variable terms.
const TRIVIAL_TOL: f64 = 1e-9;

/// Solver failure.
#[derive(Debug, Error)]
pub enum SolveError {
    /// No assignment satisfies the constraint set.
    #[error("no feasible schedule satisfies the constraint set")]
    Infeasible,
    /// The objective can grow without bound; a resource constraint is
    /// missing from the model.
    #[error("the model is unbounded")]
    Unbounded,
    /// Any other backend failure.
    #[error("solver failure: {0}")]
    Backend(String),
}

/// A solved model: one value per variable, plus the realized objective.
#[derive(Debug, Clone)]
pub struct Solution {
    values: Vec<f64>,
    objective: f64,
}

impl Solution {
    /// Value assigned to a variable.
    pub fn value(&self, var: VarId) -> f64 {
        self.values[var.index()]
    }

    /// All values, indexed by [`VarId::index`].
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Realized objective value.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Evaluates an arbitrary expression against this solution, e.g. the
    /// builder's `total_yield` or `total_nitrogen` aggregates.
    pub fn evaluate(&self, expr: &LinearExpr) -> f64 {
        expr.evaluate(&self.values)
    }
}

/// Solves the model, maximizing its objective.
pub fn solve(model: &LpModel) -> Result<Solution, SolveError> {
    let mut vars = variables!();
    let lp_vars: Vec<good_lp::Variable> = (0..model.variable_count())
        .map(|_| vars.add(variable().min(0.0)))
        .collect();

    let objective = to_expression(model.objective(), &lp_vars);
    let mut problem = vars.maximise(objective).using(default_solver);

    for c in model.constraints() {
        // A constraint with no variable terms cannot be handed to the
        // backend; check it directly. An unsatisfied one (e.g. a greywater
        // floor with no tolerant crops) makes the whole model infeasible.
        if c.lhs.is_constant() {
            let lhs = c.lhs.constant();
            let holds = match c.op {
                Comparison::LessEq => lhs <= c.rhs + TRIVIAL_TOL,
                Comparison::Equal => (lhs - c.rhs).abs() <= TRIVIAL_TOL,
                Comparison::GreaterEq => lhs >= c.rhs - TRIVIAL_TOL,
            };
            if !holds {
                debug!(constraint = %c.name, "trivially unsatisfiable constraint");
                return Err(SolveError::Infeasible);
            }
            continue;
        }

        let lhs = to_expression(&c.lhs, &lp_vars);
        problem = problem.with(match c.op {
            Comparison::LessEq => constraint::leq(lhs, c.rhs),
            Comparison::Equal => constraint::eq(lhs, c.rhs),
            Comparison::GreaterEq => constraint::geq(lhs, c.rhs),
        });
    }

    let solved = problem.solve().map_err(|e| match e {
        ResolutionError::Infeasible => SolveError::Infeasible,
        ResolutionError::Unbounded => SolveError::Unbounded,
        other => SolveError::Backend(other.to_string()),
    })?;

    let values: Vec<f64> = lp_vars.iter().map(|&v| solved.value(v)).collect();
    let objective = model.objective().evaluate(&values);
    debug!(objective, "model solved");

    Ok(Solution { values, objective })
}

fn to_expression(expr: &LinearExpr, lp_vars: &[good_lp::Variable]) -> Expression {
    let mut out = Expression::from(expr.constant());
    for (var, coeff) in expr.terms() {
        out += coeff * lp_vars[var.index()];
    }
    out
}
