//! k-sample Anderson–Darling test (Scholz & Stephens, 1987).
//!
//! Tests the null hypothesis that k samples come from the same continuous
//! distribution. Compared with Kolmogorov–Smirnov, the statistic weights
//! the ECDF differences so that disagreements in the tails count more.
//!
//! The midrank form of the statistic is used, which stays valid when the
//! pooled data contain ties. The statistic is standardized as
//! `T = (A² - (k - 1)) / σ_N` and its significance level is read off the
//! tabulated critical values.
//!
//! # Significance level clamping
//!
//! Critical values are only tabulated between the 25 % and 0.1 % levels.
//! Statistics outside that range report the nearest table edge (0.25 or
//! 0.001) together with a [`SignificanceClamp`], so a 0.25 means
//! "at least 0.25" and a 0.001 means "at most 0.001".

use serde::Serialize;

use crate::{DegenerateKind, StatsError, error::ensure_finite};

/// Significance levels matching the rows of the critical value table.
pub const SIGNIFICANCE_LEVELS: [f64; 7] = [0.25, 0.10, 0.05, 0.025, 0.01, 0.005, 0.001];

// Interpolation coefficients for the critical values,
// `b0 + b1 / sqrt(m) + b2 / m` with `m = k - 1`.
const B0: [f64; 7] = [0.675, 1.281, 1.645, 1.96, 2.326, 2.573, 3.085];
const B1: [f64; 7] = [-0.245, 0.25, 0.678, 1.149, 1.822, 2.364, 3.615];
const B2: [f64; 7] = [-0.105, -0.305, -0.362, -0.396, -0.426, -0.437, -0.466];

/// Minimum pooled observation count for which the variance of the statistic
/// is defined.
const MIN_POOLED: usize = 4;

/// Whether the reported significance level sits at a table edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SignificanceClamp {
    /// The true level is at least the reported 0.25.
    Capped,
    /// The true level is at most the reported 0.001.
    Floored,
}

/// Outcome of a k-sample Anderson–Darling test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AndersonDarlingResult {
    /// Standardized statistic `T`.
    pub statistic: f64,
    /// Unstandardized midrank statistic `A²_akN`.
    pub raw_statistic: f64,
    /// Critical values of `T` for each of [`SIGNIFICANCE_LEVELS`].
    pub critical_values: [f64; 7],
    /// Approximate significance level. Table edges are flagged by `clamp`.
    pub significance_level: f64,
    /// Set when `significance_level` is a table edge rather than an
    /// interpolated value.
    pub clamp: Option<SignificanceClamp>,
}

/// Runs the k-sample Anderson–Darling test on `samples`.
///
/// # Errors
///
/// * [`StatsError::TooFewSamples`] with fewer than two samples
/// * [`StatsError::EmptyInput`] if any sample is empty
/// * [`StatsError::NonFinite`] if any value is NaN or infinite
/// * [`StatsError::TooFewValues`] with fewer than four pooled observations
/// * [`StatsError::Degenerate`] if all pooled observations are identical
///
/// # Examples
///
/// ```
/// use shastra_stats::anderson::anderson_ksamp;
///
/// let a = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let b = [11.0, 12.0, 13.0, 14.0, 15.0];
/// let result = anderson_ksamp(&[&a, &b]).unwrap();
/// assert!(result.clamp.is_none());
/// assert!(result.significance_level < 0.01);
/// ```
pub fn anderson_ksamp(samples: &[&[f64]]) -> Result<AndersonDarlingResult, StatsError> {
    let k = samples.len();
    if k < 2 {
        return Err(StatsError::TooFewSamples { got: k, min: 2 });
    }
    for sample in samples {
        if sample.is_empty() {
            return Err(StatsError::EmptyInput);
        }
        ensure_finite(sample)?;
    }

    let sorted_samples = samples
        .iter()
        .map(|sample| {
            let mut sorted = sample.to_vec();
            sorted.sort_by(f64::total_cmp);
            sorted
        })
        .collect::<Vec<_>>();
    let mut pooled = sorted_samples.concat();
    pooled.sort_by(f64::total_cmp);
    let total = pooled.len();
    if total < MIN_POOLED {
        return Err(StatsError::TooFewValues {
            got: total,
            min: MIN_POOLED,
        });
    }
    let mut distinct = pooled.clone();
    distinct.dedup();
    if distinct.len() < 2 {
        return Err(StatsError::Degenerate(DegenerateKind::AllIdentical));
    }

    let raw_statistic = midrank_statistic(&sorted_samples, &pooled, &distinct);
    let sigma = statistic_std(&sorted_samples, total);
    #[expect(clippy::cast_precision_loss)]
    let m = (k - 1) as f64;
    let statistic = (raw_statistic - m) / sigma;

    let critical_values = std::array::from_fn(|i| B0[i] + B1[i] / m.sqrt() + B2[i] / m);
    let (significance_level, clamp) = significance_level(statistic, &critical_values);

    Ok(AndersonDarlingResult {
        statistic,
        raw_statistic,
        critical_values,
        significance_level,
        clamp,
    })
}

/// `A²_akN`, the midrank statistic that accounts for ties.
#[expect(clippy::cast_precision_loss)]
fn midrank_statistic(sorted_samples: &[Vec<f64>], pooled: &[f64], distinct: &[f64]) -> f64 {
    let n_total = pooled.len() as f64;

    // Per distinct value: multiplicity `l_j` and midrank position `B_j`.
    let (ties, midranks): (Vec<f64>, Vec<f64>) = distinct
        .iter()
        .map(|&z| {
            let left = pooled.partition_point(|&v| v < z);
            let right = pooled.partition_point(|&v| v <= z);
            let tie = (right - left) as f64;
            (tie, left as f64 + tie / 2.0)
        })
        .unzip();

    let mut statistic = 0.0;
    for sample in sorted_samples {
        let n_i = sample.len() as f64;
        let mut inner = 0.0;
        for ((&z, &tie), &midrank) in distinct.iter().zip(&ties).zip(&midranks) {
            let left = sample.partition_point(|&v| v < z);
            let right = sample.partition_point(|&v| v <= z);
            let m_ij = right as f64 - (right - left) as f64 / 2.0;
            let numerator = (n_total * m_ij - midrank * n_i).powi(2);
            let denominator = midrank * (n_total - midrank) - n_total * tie / 4.0;
            inner += tie / n_total * numerator / denominator;
        }
        statistic += inner / n_i;
    }
    statistic * (n_total - 1.0) / n_total
}

/// Standard deviation of `A²_akN` under the null hypothesis.
#[expect(clippy::cast_precision_loss)]
fn statistic_std(sorted_samples: &[Vec<f64>], total: usize) -> f64 {
    let k = sorted_samples.len() as f64;
    let n = total as f64;
    let h_sum = sorted_samples
        .iter()
        .map(|s| 1.0 / s.len() as f64)
        .sum::<f64>();

    // Running sums of 1/j for j = N-1 down to 2.
    let mut tail = Vec::with_capacity(total - 2);
    let mut acc = 0.0;
    for j in (2..total).rev() {
        acc += 1.0 / j as f64;
        tail.push(acc);
    }
    let h = acc + 1.0;
    let g = tail
        .iter()
        .zip(2..total)
        .map(|(t, j)| t / j as f64)
        .sum::<f64>();

    let a = (4.0 * g - 6.0) * (k - 1.0) + (10.0 - 6.0 * g) * h_sum;
    let b = (2.0 * g - 4.0) * k * k + 8.0 * h * k + (2.0 * g - 14.0 * h - 4.0) * h_sum
        - 8.0 * h
        + 4.0 * g
        - 6.0;
    let c = (6.0 * h + 2.0 * g - 2.0) * k * k
        + (4.0 * h - 4.0 * g + 6.0) * k
        + (2.0 * h - 6.0) * h_sum
        + 4.0 * h;
    let d = (2.0 * h + 6.0) * k * k - 4.0 * h * k;

    let variance = (a * n.powi(3) + b * n * n + c * n + d) / ((n - 1.0) * (n - 2.0) * (n - 3.0));
    variance.sqrt()
}

/// Interpolates `ln(level)` quadratically over the critical values.
///
/// Statistics outside the tabulated range report the table edge with a
/// clamp flag. Inside the range the fitted value is returned as is, so it
/// may lie slightly outside `[0.001, 0.25]`.
fn significance_level(
    statistic: f64,
    critical_values: &[f64; 7],
) -> (f64, Option<SignificanceClamp>) {
    let max_level = SIGNIFICANCE_LEVELS[0];
    let min_level = SIGNIFICANCE_LEVELS[SIGNIFICANCE_LEVELS.len() - 1];
    if statistic < critical_values[0] {
        return (max_level, Some(SignificanceClamp::Capped));
    }
    if statistic > critical_values[critical_values.len() - 1] {
        return (min_level, Some(SignificanceClamp::Floored));
    }

    let log_levels = SIGNIFICANCE_LEVELS.map(f64::ln);
    let [c2, c1, c0] = quadratic_fit(critical_values, &log_levels);
    let level = (c2 * statistic * statistic + c1 * statistic + c0).exp();
    (level, None)
}

/// Least-squares fit of `y = c2 x² + c1 x + c0`, returned as `[c2, c1, c0]`.
#[expect(clippy::cast_precision_loss)]
fn quadratic_fit(xs: &[f64], ys: &[f64]) -> [f64; 3] {
    // Normal equations: moments of x up to the 4th power.
    let mut sx = [0.0; 5];
    let mut sxy = [0.0; 3];
    for (&x, &y) in xs.iter().zip(ys) {
        let mut p = 1.0;
        for (power, s) in sx.iter_mut().enumerate() {
            *s += p;
            if power < 3 {
                sxy[power] += p * y;
            }
            p *= x;
        }
    }
    debug_assert!((sx[0] - xs.len() as f64).abs() < f64::EPSILON);

    let matrix = [
        [sx[4], sx[3], sx[2]],
        [sx[3], sx[2], sx[1]],
        [sx[2], sx[1], sx[0]],
    ];
    let rhs = [sxy[2], sxy[1], sxy[0]];
    let det = determinant(&matrix);
    std::array::from_fn(|col| {
        let mut replaced = matrix;
        for (row, value) in replaced.iter_mut().zip(rhs) {
            row[col] = value;
        }
        determinant(&replaced) / det
    })
}

fn determinant(m: &[[f64; 3]; 3]) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic_fit_recovers_exact_polynomial() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = xs.map(|x| 2.0 * x * x - 3.0 * x + 0.5);
        let [c2, c1, c0] = quadratic_fit(&xs, &ys);
        assert!((c2 - 2.0).abs() < 1e-9);
        assert!((c1 + 3.0).abs() < 1e-9);
        assert!((c0 - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_two_sample_critical_values() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [1.5, 2.5, 3.5, 4.5];
        let result = anderson_ksamp(&[&a, &b]).unwrap();
        let expected = [0.325, 1.226, 1.961, 2.713, 3.722, 4.5, 6.234];
        for (got, want) in result.critical_values.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9);
        }
    }

    #[test]
    fn test_similar_samples_are_capped() {
        let a = [1.0, 3.0, 5.0, 7.0, 9.0, 11.0];
        let b = [2.0, 4.0, 6.0, 8.0, 10.0, 12.0];
        let result = anderson_ksamp(&[&a, &b]).unwrap();
        assert_eq!(result.significance_level, 0.25);
        assert_eq!(result.clamp, Some(SignificanceClamp::Capped));
    }

    #[test]
    fn test_separated_samples_are_floored() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let b = [21.0, 22.0, 23.0, 24.0, 25.0, 26.0, 27.0, 28.0];
        let result = anderson_ksamp(&[&a, &b]).unwrap();
        assert_eq!(result.significance_level, 0.001);
        assert_eq!(result.clamp, Some(SignificanceClamp::Floored));
        assert!(result.statistic > result.critical_values[6]);
    }

    #[test]
    fn test_disjoint_constant_samples() {
        // Two distinct pooled values: A²_akN = 7 for four against four.
        let result = anderson_ksamp(&[&[1.0; 4], &[5.0; 4]]).unwrap();
        assert!((result.raw_statistic - 7.0).abs() < 1e-9);
        assert!(result.statistic.is_finite());
    }

    #[test]
    fn test_symmetric() {
        let a = [0.2, 0.8, 1.1, 2.5, 3.3];
        let b = [0.5, 1.9, 2.0, 4.4, 5.1, 6.0];
        let ab = anderson_ksamp(&[&a, &b]).unwrap();
        let ba = anderson_ksamp(&[&b, &a]).unwrap();
        assert!((ab.statistic - ba.statistic).abs() < 1e-12);
        assert!((ab.significance_level - ba.significance_level).abs() < 1e-12);
    }

    #[test]
    fn test_interpolated_level_in_range() {
        // Partially overlapping samples land inside the tabulated range.
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let b = [4.0, 5.5, 6.5, 7.5, 8.5, 9.5, 10.5, 11.5, 12.5, 13.5];
        let result = anderson_ksamp(&[&a, &b]).unwrap();
        assert_eq!(result.clamp, None);
        // T ≈ 2.39 lies between the 5 % and 2.5 % critical values.
        assert!(result.significance_level > 0.025);
        assert!(result.significance_level < 0.05);
    }

    #[test]
    fn test_fitted_level_is_not_clamped() {
        let critical_values = std::array::from_fn(|i| B0[i] + B1[i] + B2[i]);
        // The fit passes just above 0.001 at the last critical value.
        let (level, clamp) = significance_level(critical_values[6], &critical_values);
        assert_eq!(clamp, None);
        assert!((level - 0.001_016_307).abs() < 1e-8);
        assert!(level > 0.001);

        let (level, clamp) = significance_level(critical_values[0], &critical_values);
        assert_eq!(clamp, None);
        assert!((level - 0.243_298_269).abs() < 1e-8);
    }

    #[test]
    fn test_rejects_degenerate_input() {
        assert_eq!(
            anderson_ksamp(&[&[1.0, 2.0]]),
            Err(StatsError::TooFewSamples { got: 1, min: 2 })
        );
        assert_eq!(
            anderson_ksamp(&[&[1.0, 2.0], &[]]),
            Err(StatsError::EmptyInput)
        );
        assert_eq!(
            anderson_ksamp(&[&[1.0], &[2.0, 3.0]]),
            Err(StatsError::TooFewValues { got: 3, min: 4 })
        );
        assert_eq!(
            anderson_ksamp(&[&[2.0, 2.0], &[2.0, 2.0]]),
            Err(StatsError::Degenerate(DegenerateKind::AllIdentical))
        );
    }

    #[test]
    fn test_three_samples() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [2.0, 3.0, 4.0, 5.0];
        let c = [10.0, 11.0, 12.0, 13.0];
        let result = anderson_ksamp(&[&a, &b, &c]).unwrap();
        assert!(result.statistic > 0.0);
        let m = 2.0_f64;
        let expected = 0.675 - 0.245 / m.sqrt() - 0.105 / m;
        assert!((result.critical_values[0] - expected).abs() < 1e-12);
    }
}
