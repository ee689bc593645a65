use serde::Serialize;

/// Errors raised by the statistical kernels when their input cannot produce
/// a meaningful result.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum StatsError {
    #[display("input contains no values")]
    EmptyInput,
    #[display("not enough values: got {got}, need at least {min}")]
    TooFewValues { got: usize, min: usize },
    #[display("not enough samples: got {got}, need at least {min}")]
    TooFewSamples { got: usize, min: usize },
    #[display("input contains a non-finite value at index {index}")]
    NonFinite { index: usize },
    #[display("number of bootstrap resamples must be at least 1")]
    InvalidResampleCount,
    #[display("statistically degenerate input: {_0}")]
    Degenerate(#[error(not(source))] DegenerateKind),
}

/// Why a result is statistically undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
pub enum DegenerateKind {
    /// Every pooled observation has the same value.
    #[display("all observations are identical")]
    AllIdentical,
}

/// Which side of a two-sample comparison a warning refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
pub enum SampleSide {
    #[display("first")]
    First,
    #[display("second")]
    Second,
}

/// A result that was computed but should not be trusted at face value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, derive_more::Display)]
pub enum StatsWarning {
    /// One sample has fewer than two distinct values.
    #[display("{_0} sample has fewer than two distinct values")]
    ConstantSample(SampleSide),
    /// Every value is the same, so the spread and its bootstrap uncertainty
    /// are all zero.
    #[display("sample has fewer than two distinct values; spread estimates are zero")]
    ConstantValues,
    /// The Anderson–Darling statistic lies below every tabulated critical
    /// value, so the reported significance level is the table maximum.
    #[display("significance level capped at {_0}")]
    SignificanceCapped(f64),
    /// The Anderson–Darling statistic lies above every tabulated critical
    /// value, so the reported significance level is the table minimum.
    #[display("significance level floored at {_0}")]
    SignificanceFloored(f64),
}

/// Returns an error naming the first non-finite element, if any.
pub(crate) fn ensure_finite(values: &[f64]) -> Result<(), StatsError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(StatsError::NonFinite { index }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite(&[1.0, 2.0]).is_ok());
        assert_eq!(
            ensure_finite(&[1.0, f64::NAN, f64::INFINITY]),
            Err(StatsError::NonFinite { index: 1 })
        );
    }

    #[test]
    fn test_display() {
        let err = StatsError::TooFewValues { got: 1, min: 2 };
        assert_eq!(err.to_string(), "not enough values: got 1, need at least 2");
        let warning = StatsWarning::ConstantSample(SampleSide::Second);
        assert_eq!(
            warning.to_string(),
            "second sample has fewer than two distinct values"
        );
    }
}
