//! Linear expressions and constraints over binary variables.

use std::fmt;

/// Handle of a variable registered with a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    #[inline]
    pub const fn new(index: usize) -> Self {
        VarId(index)
    }

    /// Registration order of the variable, starting at zero.
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// A sum of weighted variables.
///
/// Terms are kept in insertion order; the same variable may appear more than
/// once and the coefficients then add up on evaluation.
///
/// # Examples
///
/// ```
/// use welfaresel_core::lp::{LinearExpr, VarId};
///
/// let a = VarId::new(0);
/// let b = VarId::new(1);
/// let expr = LinearExpr::new().with_term(a, 2.0).with_term(b, -1.0);
///
/// assert_eq!(expr.evaluate(|_| 1.0), 1.0);
/// assert_eq!(expr.evaluate(|v| if v == a { 1.0 } else { 0.0 }), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of `vars`, each with coefficient 1.
    pub fn sum<I: IntoIterator<Item = VarId>>(vars: I) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
        }
    }

    /// Adds `coefficient * var`.
    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        self.terms.push((var, coefficient));
    }

    pub fn with_term(mut self, var: VarId, coefficient: f64) -> Self {
        self.add_term(var, coefficient);
        self
    }

    /// Returns the expression with every coefficient multiplied by `factor`.
    pub fn scaled(mut self, factor: f64) -> Self {
        for (_, coefficient) in &mut self.terms {
            *coefficient *= factor;
        }
        self
    }

    /// Appends every term of `other`.
    pub fn extend(&mut self, other: LinearExpr) {
        self.terms.extend(other.terms);
    }

    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Total coefficient of `var`.
    pub fn coefficient(&self, var: VarId) -> f64 {
        self.terms
            .iter()
            .filter(|(v, _)| *v == var)
            .map(|(_, c)| c)
            .sum()
    }

    /// Evaluates the expression under a variable assignment.
    pub fn evaluate<F: Fn(VarId) -> f64>(&self, value_of: F) -> f64 {
        self.terms.iter().map(|(v, c)| c * value_of(*v)).sum()
    }

    /// `self <= rhs`
    pub fn leq(self, rhs: f64) -> LinearConstraint {
        LinearConstraint::new(self, Comparison::LessEq, rhs)
    }

    /// `self >= rhs`
    pub fn geq(self, rhs: f64) -> LinearConstraint {
        LinearConstraint::new(self, Comparison::GreaterEq, rhs)
    }

    /// `self == rhs`
    pub fn equals(self, rhs: f64) -> LinearConstraint {
        LinearConstraint::new(self, Comparison::Equal, rhs)
    }
}

/// Relation between a constraint's expression and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    LessEq,
    GreaterEq,
    Equal,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparison::LessEq => f.write_str("<="),
            Comparison::GreaterEq => f.write_str(">="),
            Comparison::Equal => f.write_str("=="),
        }
    }
}

/// A linear constraint `expr <cmp> rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub expr: LinearExpr,
    pub comparison: Comparison,
    pub rhs: f64,
    /// Label used in logs and debugging output.
    pub name: Option<String>,
}

impl LinearConstraint {
    pub fn new(expr: LinearExpr, comparison: Comparison, rhs: f64) -> Self {
        Self {
            expr,
            comparison,
            rhs,
            name: None,
        }
    }

    /// Attaches a label.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns true if the assignment satisfies the constraint within `tolerance`.
    pub fn is_satisfied_by<F: Fn(VarId) -> f64>(&self, value_of: F, tolerance: f64) -> bool {
        let lhs = self.expr.evaluate(value_of);
        match self.comparison {
            Comparison::LessEq => lhs <= self.rhs + tolerance,
            Comparison::GreaterEq => lhs >= self.rhs - tolerance,
            Comparison::Equal => (lhs - self.rhs).abs() <= tolerance,
        }
    }
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sense {
    #[default]
    Maximize,
    Minimize,
}
