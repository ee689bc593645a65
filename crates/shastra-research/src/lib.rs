//! Main-versus-control sample studies over a catalog.
//!
//! This crate binds the numeric kernels of [`shastra_stats`] to catalog data
//! from [`shastra_catalog`]:
//!
//! - [`sample`]: Named sets of catalog identifiers
//! - [`parameter`]: Parameters bound to column expressions
//! - [`config`]: Bootstrap, batch and NaN handling settings
//! - [`session`]: The [`ResearchSession`](session::ResearchSession) that
//!   resolves samples to values and reports statistics and comparisons
//!
//! Unknown parameter and sample names fail with
//! [`ResearchError::ParameterNotFound`] and
//! [`ResearchError::SampleNotFound`]. Catalog errors propagate unchanged.

pub mod config;
mod error;
pub mod parameter;
pub mod sample;
pub mod session;

pub use self::error::ResearchError;
