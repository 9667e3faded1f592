//! Linear-program primitives.
//!
//! The model object handed across the solver boundary: a variable pool,
//! one maximized objective expression, and an ordered list of named
//! constraints. Expressions are inspectable (term coefficients, evaluation
//! against a value vector) so constraint arithmetic can be tested without
//! invoking a solver.
//!
//! Every variable is continuous with a lower bound of zero, the only
//! variable domain the garden formulation needs.
//!
//! # Reference
//! Williams (2013), "Model Building in Mathematical Programming", Ch. 1-3

use std::collections::HashMap;
use std::ops::{Add, AddAssign, Mul};

/// Handle to a decision variable within one [`LpModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of the variable in the model's pool (and in any solution
    /// value vector).
    pub fn index(self) -> usize {
        self.0
    }
}

/// A linear expression: `Σ coeff · var + constant`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: HashMap<VarId, f64>,
    constant: f64,
}

impl LinearExpr {
    /// The zero expression.
    pub fn zero() -> Self {
        Self::default()
    }

    /// A single-term expression.
    pub fn term(var: VarId, coeff: f64) -> Self {
        let mut expr = Self::zero();
        expr.add_term(var, coeff);
        expr
    }

    /// The unweighted sum of a set of variables.
    pub fn sum(vars: impl IntoIterator<Item = VarId>) -> Self {
        let mut expr = Self::zero();
        for var in vars {
            expr.add_term(var, 1.0);
        }
        expr
    }

    /// Accumulates `coeff · var` into the expression.
    pub fn add_term(&mut self, var: VarId, coeff: f64) {
        *self.terms.entry(var).or_insert(0.0) += coeff;
    }

    /// Coefficient of `var`, zero when absent.
    pub fn coeff(&self, var: VarId) -> f64 {
        self.terms.get(&var).copied().unwrap_or(0.0)
    }

    /// The constant offset.
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Whether the expression references `var` with a non-zero coefficient.
    pub fn contains(&self, var: VarId) -> bool {
        self.coeff(var) != 0.0
    }

    /// Whether the expression carries no variable terms at all.
    pub fn is_constant(&self) -> bool {
        self.terms.values().all(|&c| c == 0.0)
    }

    /// Number of stored variable terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Iterates over `(variable, coefficient)` pairs in no particular order.
    pub fn terms(&self) -> impl Iterator<Item = (VarId, f64)> + '_ {
        self.terms.iter().map(|(&v, &c)| (v, c))
    }

    /// Evaluates the expression against per-variable values indexed by
    /// [`VarId::index`].
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.constant
            + self
                .terms
                .iter()
                .map(|(var, coeff)| coeff * values[var.index()])
                .sum::<f64>()
    }
}

impl From<VarId> for LinearExpr {
    fn from(var: VarId) -> Self {
        Self::term(var, 1.0)
    }
}

impl Add for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: LinearExpr) -> LinearExpr {
        self += rhs;
        self
    }
}

impl AddAssign for LinearExpr {
    fn add_assign(&mut self, rhs: LinearExpr) {
        for (var, coeff) in rhs.terms {
            *self.terms.entry(var).or_insert(0.0) += coeff;
        }
        self.constant += rhs.constant;
    }
}

impl Add<f64> for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: f64) -> LinearExpr {
        self.constant += rhs;
        self
    }
}

impl Mul<f64> for LinearExpr {
    type Output = LinearExpr;

    fn mul(mut self, factor: f64) -> LinearExpr {
        for coeff in self.terms.values_mut() {
            *coeff *= factor;
        }
        self.constant *= factor;
        self
    }
}

/// Relational operator of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `lhs <= rhs`
    LessEq,
    /// `lhs == rhs`
    Equal,
    /// `lhs >= rhs`
    GreaterEq,
}

/// A named linear constraint: `lhs op rhs`.
///
/// The name identifies crop/week/kind for diagnosis; it has no effect on
/// the solve.
#[derive(Debug, Clone)]
pub struct Constraint {
    /// Diagnostic identifier, unique within a model by convention.
    pub name: String,
    /// Left-hand linear expression.
    pub lhs: LinearExpr,
    /// Relational operator.
    pub op: Comparison,
    /// Right-hand constant.
    pub rhs: f64,
}

impl Constraint {
    /// Creates a `lhs <= rhs` constraint.
    pub fn less_eq(name: impl Into<String>, lhs: LinearExpr, rhs: f64) -> Self {
        Self {
            name: name.into(),
            lhs,
            op: Comparison::LessEq,
            rhs,
        }
    }

    /// Creates a `lhs == rhs` constraint.
    pub fn equal(name: impl Into<String>, lhs: LinearExpr, rhs: f64) -> Self {
        Self {
            name: name.into(),
            lhs,
            op: Comparison::Equal,
            rhs,
        }
    }

    /// Creates a `lhs >= rhs` constraint.
    pub fn greater_eq(name: impl Into<String>, lhs: LinearExpr, rhs: f64) -> Self {
        Self {
            name: name.into(),
            lhs,
            op: Comparison::GreaterEq,
            rhs,
        }
    }

    /// Whether the constraint holds for the given values within `tol`.
    pub fn holds(&self, values: &[f64], tol: f64) -> bool {
        let lhs = self.lhs.evaluate(values);
        match self.op {
            Comparison::LessEq => lhs <= self.rhs + tol,
            Comparison::Equal => (lhs - self.rhs).abs() <= tol,
            Comparison::GreaterEq => lhs >= self.rhs - tol,
        }
    }
}

/// A complete linear program: variables, maximized objective, constraints.
#[derive(Debug, Clone, Default)]
pub struct LpModel {
    names: Vec<String>,
    objective: LinearExpr,
    constraints: Vec<Constraint>,
}

impl LpModel {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a continuous, non-negative variable and returns its handle.
    pub fn add_variable(&mut self, name: impl Into<String>) -> VarId {
        let id = VarId(self.names.len());
        self.names.push(name.into());
        id
    }

    /// Diagnostic name of a variable.
    pub fn variable_name(&self, var: VarId) -> &str {
        &self.names[var.index()]
    }

    /// Number of registered variables.
    pub fn variable_count(&self) -> usize {
        self.names.len()
    }

    /// Sets the expression to maximize.
    pub fn set_objective(&mut self, objective: LinearExpr) {
        self.objective = objective;
    }

    /// The maximized objective expression.
    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    /// Appends a constraint, preserving insertion order.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Constraints in insertion order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Looks up a constraint by its diagnostic name.
    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.name == name)
    }
}
