//! Research definition file format
//!
//! A research definition names the catalog file, the main and control
//! samples and the parameters to study:
//!
//! ```json
//! {
//!   "catalog": "galaxies.json",
//!   "main": { "name": "hosts", "ids": ["J0012", "J0345"] },
//!   "controls": [
//!     { "name": "field", "filter": { "compare": { "op": "lt", "lhs": { "column": "z" }, "rhs": { "const": 0.1 } } } }
//!   ],
//!   "parameters": [
//!     { "name": "mass", "expr": { "column": "mass" } }
//!   ],
//!   "config": { "bootstrap": { "resamples": 5000, "seed": 1 } }
//! }
//! ```
//!
//! The catalog path is resolved relative to the definition file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use shastra_catalog::{
    expr::RowFilter,
    table::{Catalog, Table as _},
};
use shastra_research::{
    config::ResearchConfig, parameter::ParameterRegistry, sample::Sample,
    session::ResearchSession,
};

use crate::util;

#[derive(Debug, Clone, Deserialize)]
pub struct ResearchDefinition {
    pub catalog: PathBuf,
    pub main: SampleDefinition,
    #[serde(default)]
    pub controls: Vec<SampleDefinition>,
    pub parameters: ParameterRegistry,
    #[serde(default)]
    pub config: ResearchConfig,
}

/// A sample given either by explicit identifiers or by a row filter.
///
/// With neither, the sample covers the whole catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct SampleDefinition {
    pub name: String,
    #[serde(default)]
    pub ids: Option<Vec<String>>,
    #[serde(default)]
    pub filter: Option<RowFilter>,
}

impl SampleDefinition {
    pub fn resolve(&self, catalog: &Catalog) -> anyhow::Result<Sample> {
        match (&self.ids, &self.filter) {
            (Some(_), Some(_)) => {
                anyhow::bail!("sample '{}' has both 'ids' and 'filter'", self.name)
            }
            (Some(ids), None) => Ok(Sample::new(&self.name, ids.iter().map(|id| id.trim()))),
            (None, Some(filter)) => Sample::from_filter(&self.name, catalog, filter)
                .with_context(|| format!("Failed to select sample '{}'", self.name)),
            (None, None) => Ok(Sample::all(&self.name, catalog)),
        }
    }
}

impl ResearchDefinition {
    pub fn read<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let mut definition: Self = util::read_json_file("research definition", path)?;
        if definition.catalog.is_relative()
            && let Some(dir) = path.parent()
        {
            definition.catalog = dir.join(&definition.catalog);
        }
        Ok(definition)
    }

    /// Loads the catalog and builds the session.
    pub fn into_session(self) -> anyhow::Result<ResearchSession<Catalog>> {
        let catalog: Catalog = util::read_json_file("catalog", &self.catalog)?;
        eprintln!(
            "Loaded catalog {} ({} rows)",
            self.catalog.display(),
            catalog.len()
        );

        let main = self.main.resolve(&catalog)?;
        let controls = self
            .controls
            .iter()
            .map(|control| control.resolve(&catalog))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let mut session =
            ResearchSession::new(catalog, main, self.parameters).with_config(self.config);
        for control in controls {
            session.add_control(control)?;
        }
        Ok(session)
    }
}
