//! Heuristic prior parameter estimation
//!
//! Segments the observed series into before/during/after season phases around half the
//! value range and turns the segment boundaries into a model-specific starting guess
//! for the optimizer. The guess is deliberately rough, its only job is to land inside
//! the optimizer's basin of attraction.

use crate::data::ObservationSeries;
use crate::error::FitError;
use crate::float_trait::Float;
use crate::models::{DoubleSModel, NPARAMS};

/// Index span of a season phase, first and last qualifying sample
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Span {
    first: usize,
    last: usize,
}

/// Derive an initial parameter vector from the raw series
///
/// The series is segmented at half the `y` range: samples at or above it form the
/// `during` (growing season) phase, lower samples to the left and right form `before`
/// and `after`. Means over the contiguous span of each phase give the base level and
/// the two amplitudes; the phase boundary samples give the transition controls, mapped
/// per model variant. A flat series cannot be segmented and yields
/// [`FitError::FlatSeries`].
pub fn estimate<T>(
    series: &mut ObservationSeries<'_, T>,
    model: DoubleSModel,
) -> Result<[T; NPARAMS], FitError>
where
    T: Float,
{
    if series.is_plateau() || series.get_y_chi2().is_zero() {
        return Err(FitError::FlatSeries);
    }

    let half_range = (series.y.get_max() - series.y.get_min()) * T::half();
    let n = series.lenu();
    let x = series.x.as_slice();
    let y = series.y.as_slice();

    let during = span_where(0..n, |i| y[i] >= half_range)
        .unwrap_or_else(|| single_span(argmax(y, 0..n)));
    let before = span_where(0..during.first, |i| {
        x[i] < x[during.first] && y[i] <= half_range
    })
    .unwrap_or_else(|| single_span(0));
    let after = span_where(during.last + 1..n, |i| {
        x[i] > x[during.last] && y[i] <= half_range
    })
    .unwrap_or_else(|| single_span(n - 1));

    // first and last samples attaining the seasonal maximum
    let during_max = {
        let first = argmax(y, during.first..during.last + 1);
        let last = (during.first..during.last + 1)
            .rev()
            .find(|&i| y[i] == y[first])
            .expect("the maximum attains itself");
        Span { first, last }
    };

    let mean_before = mean(y, before);
    let mean_during = mean(y, during);
    let mean_after = mean(y, after);

    let base = mean_before;
    let amplitude1 = mean_during - mean_before;
    let amplitude2 = mean_after - mean_during;

    let (p2, p3, p5, p6) = match model {
        DoubleSModel::Gaussian(_) => (
            x[during.first],
            (x[during_max.first] - x[before.last]) / T::three(),
            x[during.last],
            (x[after.first] - x[during_max.last]) / T::three(),
        ),
        DoubleSModel::HyperbolicTangent(_) => (
            (x[before.last] + x[during.first]) * T::half(),
            edge_slope(x, y, before.last, during.first, T::one()),
            (x[during.last] + x[after.first]) * T::half(),
            edge_slope(x, y, during.last, after.first, -T::one()),
        ),
        DoubleSModel::Logistic(_) => (
            (x[before.last] + x[during.first]) * T::half(),
            T::two() * edge_slope(x, y, before.last, during.first, T::one()),
            (x[during.last] + x[after.first]) * T::half(),
            T::two() * edge_slope(x, y, during.last, after.first, -T::one()),
        ),
        DoubleSModel::Sine(_) => (
            x[before.last],
            x[during_max.first],
            x[during_max.last],
            x[after.first],
        ),
    };

    Ok([base, amplitude1, p2, p3, amplitude2, p5, p6])
}

/// First and last index of `range` satisfying the predicate, `None` when none does
fn span_where(range: std::ops::Range<usize>, predicate: impl Fn(usize) -> bool) -> Option<Span> {
    let first = range.clone().find(|&i| predicate(i))?;
    let last = range.rev().find(|&i| predicate(i))?;
    Some(Span { first, last })
}

fn single_span(index: usize) -> Span {
    Span {
        first: index,
        last: index,
    }
}

fn argmax<T: Float>(y: &[T], range: std::ops::Range<usize>) -> usize {
    let mut imax = range.start;
    for i in range {
        if y[i] > y[imax] {
            imax = i;
        }
    }
    imax
}

/// Mean of `y` over the contiguous index range of the span
///
/// Interior samples failing the phase predicate still contribute.
fn mean<T: Float>(y: &[T], span: Span) -> T {
    let slice = &y[span.first..=span.last];
    let len: T = T::from_f64(slice.len() as f64);
    slice.iter().fold(T::zero(), |acc, &v| acc + v) / len
}

/// Finite-difference slope across a phase boundary
///
/// A degenerate boundary (both indices at the same abscissa, possible after an empty
/// partition fallback) yields a unit slope with the transition's sign rather than a
/// division by zero.
fn edge_slope<T: Float>(x: &[T], y: &[T], low: usize, high: usize, fallback: T) -> T {
    let dx = x[high] - x[low];
    if dx.is_zero() {
        fallback
    } else {
        (y[high] - y[low]) / dx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::{FitStatus, Marquardt};
    use crate::models::{DoubleSModelTrait, Gaussian, HyperbolicTangent, Logistic, Sine};
    use crate::tests::*;

    use approx::{assert_abs_diff_eq, assert_relative_eq};

    /// Two low plateaus around one high plateau, x = 0..19
    fn two_plateau_series() -> ObservationSeries<'static, f64> {
        let x: Vec<_> = linspace(0.0, 19.0, 20);
        let y: Vec<_> = x
            .iter()
            .map(|&xi| if (10.0..=15.0).contains(&xi) { 2.4 } else { 0.3 })
            .collect();
        ObservationSeries::new_without_weights(x, y).unwrap()
    }

    #[test]
    fn amplitudes_on_two_plateaus() {
        let mut series = two_plateau_series();
        for model in DoubleSModel::all() {
            let prior = estimate(&mut series, model).unwrap();
            assert_relative_eq!(prior[0], 0.3, epsilon = 1e-12);
            assert_relative_eq!(prior[1], 2.1, epsilon = 1e-12);
            assert_relative_eq!(prior[4], -2.1, epsilon = 1e-12);
            assert!(prior[1] > 0.0);
            assert!(prior[4] < 0.0);
        }
    }

    #[test]
    fn sine_prior_windows_are_ordered() {
        let mut series = two_plateau_series();
        let prior = estimate(&mut series, Sine.into()).unwrap();
        assert_eq!(&prior[2..4], &[9.0, 10.0]);
        assert_eq!(&prior[5..7], &[15.0, 16.0]);
        assert!(prior[2] < prior[3] && prior[3] <= prior[5] && prior[5] < prior[6]);
    }

    #[test]
    fn gaussian_prior_phases_and_spreads() {
        let mut series = two_plateau_series();
        let prior = estimate(&mut series, Gaussian.into()).unwrap();
        assert_relative_eq!(prior[2], 10.0, epsilon = 1e-12);
        assert_relative_eq!(prior[3], 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(prior[5], 15.0, epsilon = 1e-12);
        assert_relative_eq!(prior[6], 1.0 / 3.0, epsilon = 1e-12);
        // the phases are ordered, the spreads are positive
        assert!(prior[2] <= prior[5]);
        assert!(prior[3] > 0.0 && prior[6] > 0.0);
    }

    #[test]
    fn tanh_and_logistic_prior_slopes() {
        let mut series = two_plateau_series();

        let tanh = estimate(&mut series, HyperbolicTangent.into()).unwrap();
        assert_relative_eq!(tanh[2], 9.5, epsilon = 1e-12);
        assert_relative_eq!(tanh[3], 2.1, epsilon = 1e-12);
        assert_relative_eq!(tanh[5], 15.5, epsilon = 1e-12);
        assert_relative_eq!(tanh[6], -2.1, epsilon = 1e-12);

        let logistic = estimate(&mut series, Logistic.into()).unwrap();
        assert_eq!(&logistic[..3], &tanh[..3]);
        assert_relative_eq!(logistic[3], 2.0 * tanh[3], epsilon = 1e-12);
        assert_relative_eq!(logistic[6], 2.0 * tanh[6], epsilon = 1e-12);
    }

    #[test]
    fn flat_series_cannot_be_segmented() {
        let x: Vec<_> = linspace(0.0, 19.0, 20);
        let y = vec![1.5; 20];
        let mut series = ObservationSeries::new_without_weights(x, y).unwrap();
        assert_eq!(
            estimate(&mut series, Logistic.into()).unwrap_err(),
            FitError::FlatSeries
        );
    }

    #[test]
    fn series_ending_high_uses_fallback_edge() {
        // monotone rise, the "after" partition is empty
        let x: Vec<_> = linspace(0.0, 19.0, 20);
        let model: DoubleSModel = Logistic.into();
        let param_true = [0.0_f64, 5.0, 5.0, 1.0, 0.0, -5.0, 1.0];
        let y: Vec<_> = x.iter().map(|&xi| model.value(xi, &param_true)).collect();
        let mut series = ObservationSeries::new_without_weights(x, y).unwrap();
        let prior = estimate(&mut series, model).unwrap();
        assert!(prior.iter().all(|v| v.is_finite()));
        // the fallback falling edge sits at the end of the series with a downward slope
        assert_relative_eq!(prior[5], 19.0, epsilon = 1e-12);
        assert!(prior[6] < 0.0);
    }

    #[test]
    fn end_to_end_logistic_season() {
        let mut rng = StdRng::seed_from_u64(42);
        let x: Vec<_> = linspace(0.0, 19.0, 20);
        let model: DoubleSModel = Logistic.into();
        let param_true = [0.0, 5.0, 5.0, 1.0, 0.0, -5.0, 1.0];
        let y: Vec<_> = x
            .iter()
            .map(|&xi| model.value(xi, &param_true) + 0.05 * rng.sample::<f64, _>(StandardNormal))
            .collect();
        let mut series = ObservationSeries::new_without_weights(x, y).unwrap();

        let prior = estimate(&mut series, model).unwrap();
        let result = Marquardt::default().fit(&series, model, prior).unwrap();

        assert_eq!(result.status, FitStatus::Converged);
        assert!(result.chi2 < 0.5);
        // p4 is zero in truth, its transition controls are not identifiable
        assert_abs_diff_eq!(result.param[0], param_true[0], epsilon = 0.3);
        assert_relative_eq!(result.param[1], param_true[1], max_relative = 0.05);
        assert_relative_eq!(result.param[2], param_true[2], max_relative = 0.05);
        assert_relative_eq!(result.param[3], param_true[3], max_relative = 0.05);
        assert_abs_diff_eq!(result.param[4], param_true[4], epsilon = 0.3);
    }
}
