//! Named parameters bound to catalog expressions
//!
//! A parameter is the unit of analysis: "mass", "redshift" or a derived
//! quantity such as `mass / radius ** 3`. The registry keeps parameters in
//! insertion order so that "all parameters" reports are stable.

use serde::{Deserialize, Serialize};
use shastra_catalog::expr::ColumnExpr;

use crate::ResearchError;

/// A parameter name bound to the expression that produces its values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub expr: ColumnExpr,
}

impl Parameter {
    #[must_use]
    pub fn new(name: impl Into<String>, expr: ColumnExpr) -> Self {
        Self {
            name: name.into(),
            expr,
        }
    }

    /// A parameter reading the column of the same name.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        let name = name.into();
        let expr = ColumnExpr::column(name.clone());
        Self { name, expr }
    }
}

/// Ordered set of uniquely named parameters.
///
/// # Examples
///
/// ```
/// use shastra_catalog::expr::ColumnExpr;
/// use shastra_research::parameter::{Parameter, ParameterRegistry};
///
/// let mut registry = ParameterRegistry::new();
/// registry.insert(Parameter::column("mass")).unwrap();
/// registry
///     .insert(Parameter::new("log_mass", ColumnExpr::column("mass").pow(0.5)))
///     .unwrap();
/// assert_eq!(registry.names().collect::<Vec<_>>(), ["mass", "log_mass"]);
/// assert!(registry.get("radius").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Parameter>", into = "Vec<Parameter>")]
pub struct ParameterRegistry {
    parameters: Vec<Parameter>,
}

impl ParameterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a parameter, rejecting a name that is already taken.
    pub fn insert(&mut self, parameter: Parameter) -> Result<(), ResearchError> {
        if self.contains(&parameter.name) {
            return Err(ResearchError::DuplicateParameter {
                name: parameter.name,
            });
        }
        self.parameters.push(parameter);
        Ok(())
    }

    pub fn with(mut self, parameter: Parameter) -> Result<Self, ResearchError> {
        self.insert(parameter)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Result<&Parameter, ResearchError> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ResearchError::ParameterNotFound {
                name: name.to_owned(),
            })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> + '_ {
        self.parameters.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.parameters.iter().map(|p| p.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl TryFrom<Vec<Parameter>> for ParameterRegistry {
    type Error = ResearchError;

    fn try_from(parameters: Vec<Parameter>) -> Result<Self, Self::Error> {
        parameters
            .into_iter()
            .try_fold(Self::new(), ParameterRegistry::with)
    }
}

impl From<ParameterRegistry> for Vec<Parameter> {
    fn from(registry: ParameterRegistry) -> Self {
        registry.parameters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = ParameterRegistry::new();
        registry.insert(Parameter::column("mass")).unwrap();
        let err = registry.insert(Parameter::column("mass")).unwrap_err();
        assert_eq!(
            err,
            ResearchError::DuplicateParameter {
                name: "mass".to_owned()
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_is_not_found() {
        let registry = ParameterRegistry::new();
        let err = registry.get("mass").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "parameter 'mass' is not registered");
    }

    #[test]
    fn test_deserialize_keeps_order() {
        let json = r#"[
            {"name": "z", "expr": {"column": "redshift"}},
            {"name": "a", "expr": {"column": "mass"}}
        ]"#;
        let registry: ParameterRegistry = serde_json::from_str(json).unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), ["z", "a"]);
        assert_eq!(
            registry.get("z").unwrap().expr,
            ColumnExpr::column("redshift")
        );
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let json = r#"[
            {"name": "a", "expr": {"column": "mass"}},
            {"name": "a", "expr": {"const": 1.0}}
        ]"#;
        assert!(serde_json::from_str::<ParameterRegistry>(json).is_err());
    }
}
