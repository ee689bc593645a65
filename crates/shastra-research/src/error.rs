use shastra_catalog::CatalogError;
use shastra_stats::StatsError;

/// Errors raised while resolving or analyzing samples.
///
/// Table errors are passed through unchanged as [`ResearchError::Catalog`]
/// and kernel input errors as [`ResearchError::Stats`]. Wrapped errors are
/// part of the message rather than a separate source.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ResearchError {
    #[display("parameter '{name}' is not registered")]
    ParameterNotFound { name: String },
    #[display("sample '{name}' is not part of this study")]
    SampleNotFound { name: String },
    #[display("parameter '{name}' is already registered")]
    DuplicateParameter { name: String },
    #[display("a sample named '{name}' is already registered")]
    DuplicateSampleName { name: String },
    #[display("main sample '{name}' cannot also be a control")]
    MainSampleAsControl { name: String },
    #[display("{_0}")]
    Stats(#[error(not(source))] StatsError),
    #[display("{_0}")]
    Catalog(#[error(not(source))] CatalogError),
    #[display("sample '{sample}': {source}")]
    InSample {
        sample: String,
        #[error(not(source))]
        source: Box<ResearchError>,
    },
}

impl ResearchError {
    pub(crate) fn in_sample(self, sample: &str) -> Self {
        Self::InSample {
            sample: sample.to_owned(),
            source: Box::new(self),
        }
    }

    /// Whether the error is a lookup failure (unknown parameter or sample).
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::ParameterNotFound { .. } | Self::SampleNotFound { .. } => true,
            Self::InSample { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

impl From<StatsError> for ResearchError {
    fn from(err: StatsError) -> Self {
        Self::Stats(err)
    }
}

impl From<CatalogError> for ResearchError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}
