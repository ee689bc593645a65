//! Named samples of catalog rows
//!
//! A [`Sample`] is an immutable, named list of primary-key values. Samples
//! are built explicitly, either from a known list of identifiers or by
//! filtering a table, and are then handed to a
//! [`ResearchSession`](crate::session::ResearchSession) as its main sample
//! or one of its controls.
//!
//! # Examples
//!
//! ```
//! use shastra_catalog::{expr::ColumnExpr, table::Catalog};
//! use shastra_research::sample::Sample;
//!
//! let catalog = Catalog::new("objid", ["a", "b", "c"])
//!     .with_column("redshift", vec![0.01, 0.2, 0.03])
//!     .unwrap();
//! let nearby = Sample::from_filter("nearby", &catalog, &ColumnExpr::column("redshift").lt(0.1))
//!     .unwrap();
//! assert_eq!(nearby.ids(), ["a", "c"]);
//! ```

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};
use shastra_catalog::{CatalogError, expr::RowFilter, table::Table};

/// A named set of row identifiers.
///
/// Identifiers are expected to be unique but this is not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    name: String,
    ids: Vec<String>,
}

impl Sample {
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a sample from the rows of `table` matching `filter`, in row
    /// order.
    pub fn from_filter<T>(
        name: impl Into<String>,
        table: &T,
        filter: &RowFilter,
    ) -> Result<Self, CatalogError>
    where
        T: Table + ?Sized,
    {
        let rows = table.filter_rows(filter)?;
        Ok(Self::new(name, table.ids_of(&rows)))
    }

    /// Builds a sample holding every row of `table`.
    #[must_use]
    pub fn all<T>(name: impl Into<String>, table: &T) -> Self
    where
        T: Table + ?Sized,
    {
        Self::new(name, table.row_ids().iter().cloned())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub(crate) fn id_set(&self) -> HashSet<&str> {
        self.ids.iter().map(String::as_str).collect()
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} objects)", self.name, self.ids.len())
    }
}
