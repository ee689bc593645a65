//! Table access for sample studies
//!
//! [`Table`] is the read-only interface studies use to reach catalog data:
//! row identifiers, named numeric columns, and the derived operations
//! built on them (expression evaluation, row filtering, value extraction
//! for a set of identifiers). [`Catalog`] is the in-memory implementation.
//!
//! # Catalog files
//!
//! A catalog deserializes from a column-oriented document. `null` entries
//! become NaN and primary-key values are trimmed of surrounding whitespace:
//!
//! ```json
//! {
//!   "primary_key": "objid",
//!   "ids": ["J0001", "J0002", "J0003"],
//!   "columns": {
//!     "mass": [10.2, null, 11.0],
//!     "redshift": [0.02, 0.05, 0.04]
//!   }
//! }
//! ```

use std::{
    collections::{BTreeMap, HashSet},
    fmt,
};

use serde::{Deserialize, Serialize};

use crate::{
    CatalogError,
    expr::{BinaryOp, ColumnExpr, RowFilter},
};

/// Read access to a keyed table of numeric columns.
///
/// Implementors provide the row identifiers and whole columns; everything
/// else is derived from those two.
pub trait Table {
    /// Name of the primary-key column.
    fn primary_key(&self) -> &str;

    /// Primary-key value of every row, in row order.
    fn row_ids(&self) -> &[String];

    /// Every value of the named column, in row order.
    fn column(&self, name: &str) -> Result<&[f64], CatalogError>;

    fn len(&self) -> usize {
        self.row_ids().len()
    }

    fn is_empty(&self) -> bool {
        self.row_ids().is_empty()
    }

    /// Indices of the rows whose identifier is in `ids`, in row order.
    fn rows_where_id_in(&self, ids: &HashSet<&str>) -> Vec<usize> {
        self.row_ids()
            .iter()
            .enumerate()
            .filter(|(_, id)| ids.contains(id.as_str()))
            .map(|(row, _)| row)
            .collect()
    }

    /// Values of `column` at the given rows.
    fn read_column(&self, rows: &[usize], column: &str) -> Result<Vec<f64>, CatalogError> {
        let values = self.column(column)?;
        Ok(rows.iter().map(|&row| values[row]).collect())
    }

    /// Evaluates `expr` for every row.
    ///
    /// Division fails with [`CatalogError::DivisionByZero`] if any divisor
    /// element is exactly zero.
    fn evaluate(&self, expr: &ColumnExpr) -> Result<Vec<f64>, CatalogError> {
        match expr {
            ColumnExpr::Column(name) => Ok(self.column(name)?.to_vec()),
            ColumnExpr::Const(value) => Ok(vec![*value; self.len()]),
            ColumnExpr::Neg(inner) => {
                let mut values = self.evaluate(inner)?;
                values.iter_mut().for_each(|v| *v = -*v);
                Ok(values)
            }
            ColumnExpr::Binary { op, lhs, rhs } => {
                let lhs_values = self.evaluate(lhs)?;
                let rhs_values = self.evaluate(rhs)?;
                if *op == BinaryOp::Div && rhs_values.contains(&0.0) {
                    return Err(CatalogError::DivisionByZero {
                        expr: expr.to_string(),
                    });
                }
                Ok(lhs_values
                    .into_iter()
                    .zip(rhs_values)
                    .map(|(l, r)| op.apply(l, r))
                    .collect())
            }
        }
    }

    /// Values of `expr` at the given rows.
    fn read_expr(&self, rows: &[usize], expr: &ColumnExpr) -> Result<Vec<f64>, CatalogError> {
        if let ColumnExpr::Column(name) = expr {
            return self.read_column(rows, name);
        }
        let values = self.evaluate(expr)?;
        Ok(rows.iter().map(|&row| values[row]).collect())
    }

    /// Evaluates `filter` for every row.
    fn mask(&self, filter: &RowFilter) -> Result<Vec<bool>, CatalogError> {
        match filter {
            RowFilter::Compare { op, lhs, rhs } => {
                let lhs = self.evaluate(lhs)?;
                let rhs = self.evaluate(rhs)?;
                Ok(lhs.into_iter().zip(rhs).map(|(l, r)| op.apply(l, r)).collect())
            }
            RowFilter::And(lhs, rhs) => {
                let lhs = self.mask(lhs)?;
                let rhs = self.mask(rhs)?;
                Ok(lhs.into_iter().zip(rhs).map(|(l, r)| l && r).collect())
            }
            RowFilter::Or(lhs, rhs) => {
                let lhs = self.mask(lhs)?;
                let rhs = self.mask(rhs)?;
                Ok(lhs.into_iter().zip(rhs).map(|(l, r)| l || r).collect())
            }
            RowFilter::Not(inner) => Ok(self.mask(inner)?.into_iter().map(|m| !m).collect()),
        }
    }

    /// Indices of the rows matching `filter`, in row order.
    fn filter_rows(&self, filter: &RowFilter) -> Result<Vec<usize>, CatalogError> {
        Ok(self
            .mask(filter)?
            .into_iter()
            .enumerate()
            .filter_map(|(row, keep)| keep.then_some(row))
            .collect())
    }

    /// Identifiers of the given rows.
    fn ids_of(&self, rows: &[usize]) -> Vec<String> {
        let ids = self.row_ids();
        rows.iter().map(|&row| ids[row].clone()).collect()
    }
}

impl<T> Table for &T
where
    T: Table + ?Sized,
{
    fn primary_key(&self) -> &str {
        (**self).primary_key()
    }

    fn row_ids(&self) -> &[String] {
        (**self).row_ids()
    }

    fn column(&self, name: &str) -> Result<&[f64], CatalogError> {
        (**self).column(name)
    }
}

/// An in-memory, column-oriented catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CatalogData", into = "CatalogData")]
pub struct Catalog {
    primary_key: String,
    ids: Vec<String>,
    columns: BTreeMap<String, Vec<f64>>,
}

/// Serialized form of a [`Catalog`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    pub primary_key: String,
    pub ids: Vec<String>,
    #[serde(default)]
    pub columns: BTreeMap<String, Vec<Option<f64>>>,
}

impl TryFrom<CatalogData> for Catalog {
    type Error = CatalogError;

    fn try_from(data: CatalogData) -> Result<Self, Self::Error> {
        let mut catalog = Catalog::new(data.primary_key, data.ids);
        for (name, values) in data.columns {
            let values = values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
            catalog.insert_column(name, values)?;
        }
        Ok(catalog)
    }
}

impl From<Catalog> for CatalogData {
    fn from(catalog: Catalog) -> Self {
        Self {
            primary_key: catalog.primary_key,
            ids: catalog.ids,
            columns: catalog
                .columns
                .into_iter()
                .map(|(name, values)| {
                    let values = values
                        .into_iter()
                        .map(|v| (!v.is_nan()).then_some(v))
                        .collect();
                    (name, values)
                })
                .collect(),
        }
    }
}

impl Catalog {
    /// Creates a catalog with the given row identifiers and no columns.
    ///
    /// Identifiers are trimmed of surrounding whitespace.
    pub fn new<I, S>(primary_key: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            primary_key: primary_key.into(),
            ids: ids.into_iter().map(|id| id.as_ref().trim().to_owned()).collect(),
            columns: BTreeMap::new(),
        }
    }

    /// Adds a column, builder style.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Self, CatalogError> {
        self.insert_column(name, values)?;
        Ok(self)
    }

    /// Adds a column. The column must have one value per row and must not
    /// already exist.
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), CatalogError> {
        let name = name.into();
        if values.len() != self.ids.len() {
            return Err(CatalogError::LengthMismatch {
                name,
                expected: self.ids.len(),
                got: values.len(),
            });
        }
        if self.columns.contains_key(&name) {
            return Err(CatalogError::DuplicateColumn { name });
        }
        self.columns.insert(name, values);
        Ok(())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.keys().map(String::as_str)
    }
}

impl Table for Catalog {
    fn primary_key(&self) -> &str {
        &self.primary_key
    }

    fn row_ids(&self) -> &[String] {
        &self.ids
    }

    fn column(&self, name: &str) -> Result<&[f64], CatalogError> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| CatalogError::MissingColumn {
                name: name.to_owned(),
            })
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "catalog (primary key: {}, {} rows, columns: {})",
            self.primary_key,
            self.ids.len(),
            self.columns.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
        )
    }
}
