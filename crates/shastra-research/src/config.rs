use serde::{Deserialize, Serialize};
use shastra_stats::bootstrap::BootstrapConfig;

/// What a batch operation does when one sample fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    /// Abort the batch with the first error.
    #[default]
    FailFast,
    /// Record the failure and continue with the next sample.
    SkipFailures,
}

/// How NaN values read from the catalog are treated before statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NanPolicy {
    /// Drop NaN values and count them.
    #[default]
    Omit,
    /// Fail with [`StatsError::NonFinite`](shastra_stats::StatsError::NonFinite).
    Reject,
}

impl NanPolicy {
    /// Applies the policy, returning the retained values and the number of
    /// omitted NaNs.
    #[must_use]
    pub fn apply(self, values: Vec<f64>) -> (Vec<f64>, usize) {
        match self {
            Self::Omit => {
                let total = values.len();
                let kept = values
                    .into_iter()
                    .filter(|v| !v.is_nan())
                    .collect::<Vec<_>>();
                let omitted = total - kept.len();
                (kept, omitted)
            }
            // Non-finite values are rejected by the kernels
            Self::Reject => (values, 0),
        }
    }
}

/// Settings shared by every operation of a
/// [`ResearchSession`](crate::session::ResearchSession).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    pub bootstrap: BootstrapConfig,
    pub batch_policy: BatchPolicy,
    pub nan_policy: NanPolicy,
}
