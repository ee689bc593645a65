//! Column expressions and row filters
//!
//! Derived quantities and sample selections are written as small expression
//! trees instead of operator overloads on columns:
//!
//! - [`ColumnExpr`] computes a numeric value per row (column references,
//!   constants and `+ - * / pow` arithmetic)
//! - [`RowFilter`] selects rows by comparing expressions, combined with
//!   `and`, `or` and `not`
//!
//! Both are plain data: they serialize with `serde`, so a research
//! definition file can carry them, and they are evaluated later against any
//! [`Table`](crate::table::Table).
//!
//! # Examples
//!
//! ```
//! use shastra_catalog::expr::ColumnExpr;
//!
//! let density = ColumnExpr::column("mass").divided_by(ColumnExpr::column("radius").pow(3.0));
//! assert_eq!(density.to_string(), "mass / (radius ** 3)");
//!
//! let filter = density.clone().gt(1.0).and(ColumnExpr::column("mass").le(10.0));
//! assert_eq!(filter.to_string(), "(mass / (radius ** 3) > 1) and (mass <= 10)");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A per-row numeric expression over table columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnExpr {
    /// Values of a named column.
    Column(String),
    /// The same value for every row.
    Const(f64),
    /// Arithmetic negation.
    Neg(Box<ColumnExpr>),
    /// Element-wise binary arithmetic.
    Binary {
        op: BinaryOp,
        lhs: Box<ColumnExpr>,
        rhs: Box<ColumnExpr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "**",
        }
    }

    #[must_use]
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Sub => lhs - rhs,
            Self::Mul => lhs * rhs,
            Self::Div => lhs / rhs,
            Self::Pow => lhs.powf(rhs),
        }
    }
}

impl From<f64> for ColumnExpr {
    fn from(value: f64) -> Self {
        Self::Const(value)
    }
}

impl ColumnExpr {
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column(name.into())
    }

    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::Const(value)
    }

    fn binary(self, op: BinaryOp, rhs: impl Into<ColumnExpr>) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(self),
            rhs: Box::new(rhs.into()),
        }
    }

    #[must_use]
    pub fn plus(self, rhs: impl Into<ColumnExpr>) -> Self {
        self.binary(BinaryOp::Add, rhs)
    }

    #[must_use]
    pub fn minus(self, rhs: impl Into<ColumnExpr>) -> Self {
        self.binary(BinaryOp::Sub, rhs)
    }

    #[must_use]
    pub fn times(self, rhs: impl Into<ColumnExpr>) -> Self {
        self.binary(BinaryOp::Mul, rhs)
    }

    #[must_use]
    pub fn divided_by(self, rhs: impl Into<ColumnExpr>) -> Self {
        self.binary(BinaryOp::Div, rhs)
    }

    #[must_use]
    pub fn pow(self, rhs: impl Into<ColumnExpr>) -> Self {
        self.binary(BinaryOp::Pow, rhs)
    }

    #[must_use]
    pub fn negated(self) -> Self {
        Self::Neg(Box::new(self))
    }

    fn compare(self, op: CompareOp, rhs: impl Into<ColumnExpr>) -> RowFilter {
        RowFilter::Compare {
            op,
            lhs: self,
            rhs: rhs.into(),
        }
    }

    #[must_use]
    pub fn lt(self, rhs: impl Into<ColumnExpr>) -> RowFilter {
        self.compare(CompareOp::Lt, rhs)
    }

    #[must_use]
    pub fn le(self, rhs: impl Into<ColumnExpr>) -> RowFilter {
        self.compare(CompareOp::Le, rhs)
    }

    #[must_use]
    pub fn gt(self, rhs: impl Into<ColumnExpr>) -> RowFilter {
        self.compare(CompareOp::Gt, rhs)
    }

    #[must_use]
    pub fn ge(self, rhs: impl Into<ColumnExpr>) -> RowFilter {
        self.compare(CompareOp::Ge, rhs)
    }

    #[must_use]
    pub fn equals(self, rhs: impl Into<ColumnExpr>) -> RowFilter {
        self.compare(CompareOp::Eq, rhs)
    }

    #[must_use]
    pub fn not_equals(self, rhs: impl Into<ColumnExpr>) -> RowFilter {
        self.compare(CompareOp::Ne, rhs)
    }

    /// Names of every column the expression reads, in first-use order.
    #[must_use]
    pub fn referenced_columns(&self) -> Vec<&str> {
        let mut names = vec![];
        self.collect_columns(&mut names);
        names
    }

    fn collect_columns<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Self::Column(name) => {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
            Self::Const(_) => {}
            Self::Neg(inner) => inner.collect_columns(names),
            Self::Binary { lhs, rhs, .. } => {
                lhs.collect_columns(names);
                rhs.collect_columns(names);
            }
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary { .. } => write!(f, "({self})"),
            _ => write!(f, "{self}"),
        }
    }
}

impl fmt::Display for ColumnExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(name) => f.write_str(name),
            Self::Const(value) => write!(f, "{value}"),
            Self::Neg(inner) => {
                f.write_str("-")?;
                inner.fmt_operand(f)
            }
            Self::Binary { op, lhs, rhs } => {
                lhs.fmt_operand(f)?;
                write!(f, " {} ", op.symbol())?;
                rhs.fmt_operand(f)
            }
        }
    }
}

/// A per-row boolean predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowFilter {
    Compare {
        op: CompareOp,
        lhs: ColumnExpr,
        rhs: ColumnExpr,
    },
    And(Box<RowFilter>, Box<RowFilter>),
    Or(Box<RowFilter>, Box<RowFilter>),
    Not(Box<RowFilter>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl CompareOp {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
        }
    }

    /// Comparisons involving NaN are false, except `Ne`.
    #[expect(clippy::float_cmp)]
    #[must_use]
    pub fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
            Self::Gt => lhs > rhs,
            Self::Ge => lhs >= rhs,
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
        }
    }
}

impl RowFilter {
    #[must_use]
    pub fn and(self, other: RowFilter) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn or(self, other: RowFilter) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn invert(self) -> Self {
        Self::Not(Box::new(self))
    }
}

impl fmt::Display for RowFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare { op, lhs, rhs } => write!(f, "{lhs} {} {rhs}", op.symbol()),
            Self::And(lhs, rhs) => write!(f, "({lhs}) and ({rhs})"),
            Self::Or(lhs, rhs) => write!(f, "({lhs}) or ({rhs})"),
            Self::Not(inner) => write!(f, "not ({inner})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        let sum = ColumnExpr::column("a").plus(ColumnExpr::column("b"));
        assert_eq!(sum.to_string(), "a + b");
        let scaled = ColumnExpr::column("mass").divided_by(2.0);
        assert_eq!(scaled.to_string(), "mass / 2");
        let nested = sum.times(ColumnExpr::column("c").negated());
        assert_eq!(nested.to_string(), "(a + b) * -c");
    }

    #[test]
    fn test_referenced_columns() {
        let expr = ColumnExpr::column("a")
            .plus(ColumnExpr::column("b"))
            .times(ColumnExpr::column("a"));
        assert_eq!(expr.referenced_columns(), ["a", "b"]);
        assert!(ColumnExpr::constant(1.0).referenced_columns().is_empty());
    }

    #[test]
    fn test_compare_op_nan() {
        assert!(!CompareOp::Lt.apply(f64::NAN, 1.0));
        assert!(!CompareOp::Eq.apply(f64::NAN, f64::NAN));
        assert!(CompareOp::Ne.apply(f64::NAN, 1.0));
    }

    #[test]
    fn test_json_form() {
        let filter = ColumnExpr::column("z").lt(0.1).invert();
        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(
            json,
            r#"{"not":{"compare":{"op":"lt","lhs":{"column":"z"},"rhs":{"const":0.1}}}}"#
        );
        let parsed: RowFilter = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, filter);
    }
}
