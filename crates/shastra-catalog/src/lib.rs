//! In-memory catalog tables for sample studies.
//!
//! A catalog is a column-oriented table of `f64` values keyed by a string
//! primary key, one row per catalog object. It is the data source that
//! samples and parameters are resolved against.
//!
//! # Modules
//!
//! - [`table`]: The [`Table`](table::Table) access trait and the
//!   [`Catalog`](table::Catalog) implementation
//! - [`expr`]: Column expressions and row filters evaluated against a table
//!
//! # Examples
//!
//! ```
//! use shastra_catalog::{expr::ColumnExpr, table::{Catalog, Table as _}};
//!
//! let catalog = Catalog::new("objid", ["a", "b", "c"])
//!     .with_column("mass", vec![1.0, 2.0, 3.0])
//!     .unwrap();
//!
//! let heavy = catalog
//!     .filter_rows(&ColumnExpr::column("mass").gt(1.5))
//!     .unwrap();
//! assert_eq!(catalog.ids_of(&heavy), ["b", "c"]);
//! ```

pub mod expr;
pub mod table;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum CatalogError {
    #[display("column '{name}' not found")]
    MissingColumn { name: String },
    #[display("column '{name}' already exists")]
    DuplicateColumn { name: String },
    #[display("column '{name}' has {got} values, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    #[display("division by zero in '{expr}'")]
    DivisionByZero { expr: String },
}
