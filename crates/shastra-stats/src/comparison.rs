//! Two-sample distribution comparison.
//!
//! Runs the Kolmogorov–Smirnov and Anderson–Darling tests on the same pair
//! of value arrays. The two tests are independent; they only share their
//! input.

use serde::Serialize;

use crate::{
    SampleSide, StatsError, StatsWarning,
    anderson::{self, SignificanceClamp},
    descriptive::count_distinct,
    ks,
};

/// Minimum number of values per sample.
pub const MIN_SAMPLE_LEN: usize = 2;

/// Outcome of comparing two samples.
///
/// `warnings` lists conditions under which the numbers are statistically
/// weak: a sample with a single distinct value, or an Anderson–Darling
/// significance level clamped to the edge of its table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub ks_statistic: f64,
    pub ks_p_value: f64,
    pub ad_statistic: f64,
    pub ad_significance_level: f64,
    pub warnings: Vec<StatsWarning>,
}

impl ComparisonResult {
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, StatsWarning::ConstantSample(_)))
    }
}

/// Compares the distributions of `a` and `b`.
///
/// # Errors
///
/// * [`StatsError::EmptyInput`] if either sample is empty
/// * [`StatsError::TooFewValues`] if either sample has a single value
/// * [`StatsError::NonFinite`] if either contains NaN or infinity
/// * [`StatsError::Degenerate`] if every value in both samples is the same
///
/// # Examples
///
/// ```
/// use shastra_stats::comparison::compare;
///
/// let result = compare(&[1.0, 1.0, 1.0, 1.0], &[5.0, 5.0, 5.0, 5.0]).unwrap();
/// assert_eq!(result.ks_statistic, 1.0);
/// assert!(result.is_degenerate());
/// ```
pub fn compare(a: &[f64], b: &[f64]) -> Result<ComparisonResult, StatsError> {
    for values in [a, b] {
        if values.is_empty() {
            return Err(StatsError::EmptyInput);
        }
        if values.len() < MIN_SAMPLE_LEN {
            return Err(StatsError::TooFewValues {
                got: values.len(),
                min: MIN_SAMPLE_LEN,
            });
        }
    }

    let ks = ks::ks_2samp(a, b)?;
    let ad = anderson::anderson_ksamp(&[a, b])?;

    let mut warnings = vec![];
    for (values, side) in [(a, SampleSide::First), (b, SampleSide::Second)] {
        if count_distinct(values) < 2 {
            warnings.push(StatsWarning::ConstantSample(side));
        }
    }
    match ad.clamp {
        Some(SignificanceClamp::Capped) => {
            warnings.push(StatsWarning::SignificanceCapped(ad.significance_level));
        }
        Some(SignificanceClamp::Floored) => {
            warnings.push(StatsWarning::SignificanceFloored(ad.significance_level));
        }
        None => {}
    }

    Ok(ComparisonResult {
        ks_statistic: ks.statistic,
        ks_p_value: ks.p_value,
        ad_statistic: ad.statistic,
        ad_significance_level: ad.significance_level,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use crate::DegenerateKind;

    use super::*;

    #[test]
    fn test_self_comparison() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let result = compare(&values, &values).unwrap();
        assert_eq!(result.ks_statistic, 0.0);
        assert_eq!(result.ks_p_value, 1.0);
        assert_eq!(result.ad_significance_level, 0.25);
        assert_eq!(result.warnings, vec![StatsWarning::SignificanceCapped(0.25)]);
    }

    #[test]
    fn test_constant_disjoint_samples() {
        let result = compare(&[1.0; 4], &[5.0; 4]).unwrap();
        assert_eq!(result.ks_statistic, 1.0);
        assert!(result.ks_p_value < 0.02);
        assert!(result.warnings.contains(&StatsWarning::ConstantSample(SampleSide::First)));
        assert!(result.warnings.contains(&StatsWarning::ConstantSample(SampleSide::Second)));
        assert!(result.is_degenerate());
    }

    #[test]
    fn test_symmetric_ks() {
        let a = [3.1, 0.2, 4.4, 1.0, 2.2, 5.9];
        let b = [1.5, 2.5, 6.5, 7.0];
        let ab = compare(&a, &b).unwrap();
        let ba = compare(&b, &a).unwrap();
        assert_eq!(ab.ks_statistic, ba.ks_statistic);
        assert_eq!(ab.ks_p_value, ba.ks_p_value);
    }

    #[test]
    fn test_inputs_not_mutated() {
        let a = vec![3.0, 1.0, 2.0];
        let b = vec![9.0, 7.0, 8.0];
        let _ = compare(&a, &b).unwrap();
        assert_eq!(a, [3.0, 1.0, 2.0]);
        assert_eq!(b, [9.0, 7.0, 8.0]);
    }

    #[test]
    fn test_rejects_too_small() {
        assert_eq!(compare(&[], &[1.0, 2.0]), Err(StatsError::EmptyInput));
        assert_eq!(
            compare(&[1.0, 2.0], &[3.0]),
            Err(StatsError::TooFewValues { got: 1, min: 2 })
        );
        assert_eq!(
            compare(&[2.0, 2.0], &[2.0, 2.0]),
            Err(StatsError::Degenerate(DegenerateKind::AllIdentical))
        );
    }
}
