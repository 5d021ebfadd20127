use crate::data::data_sample::DataSample;
use crate::error::FitError;
use crate::float_trait::Float;

use conv::prelude::*;
use ndarray::Zip;
use ndarray_stats::SummaryStatisticsExt;

/// Domain minimum number of samples required for a double-S fit
pub const MIN_SERIES_LENGTH: usize = 10;

/// Weighted observation series to fit a double-S model to
///
/// Holds the `(x, y, w)` triplet: abscissas (conventionally increasing), measured
/// values and non-negative weights. A zero weight excludes the sample from the fit
/// objective. The series is read-only for the duration of a fit; the struct caches
/// derived statistics, that's why a mutable reference is required for prior estimation.
#[derive(Clone, Debug)]
pub struct ObservationSeries<'a, T>
where
    T: Float,
{
    pub x: DataSample<'a, T>,
    pub y: DataSample<'a, T>,
    pub w: DataSample<'a, T>,
    y_weighted_mean: Option<T>,
    y_chi2: Option<T>,
    plateau: Option<bool>,
}

impl<'a, T> ObservationSeries<'a, T>
where
    T: Float,
{
    /// Construct [`ObservationSeries`] from array-like objects
    ///
    /// `x` is the abscissa, `y` is the measured value, `w` is weights. Input arrays
    /// could be [`ndarray::Array1`], [`ndarray::ArrayView1`], 1-D [`ndarray::CowArray`],
    /// or `&[T]`. All arrays must have the same length of at least
    /// [`MIN_SERIES_LENGTH`], values must be finite and weights non-negative.
    pub fn new(
        x: impl Into<DataSample<'a, T>>,
        y: impl Into<DataSample<'a, T>>,
        w: impl Into<DataSample<'a, T>>,
    ) -> Result<Self, FitError> {
        let x = x.into();
        let y = y.into();
        let w = w.into();

        if x.sample.len() != y.sample.len() {
            return Err(FitError::MismatchedLengths {
                x_len: x.sample.len(),
                y_len: y.sample.len(),
            });
        }
        if w.sample.len() != x.sample.len() {
            return Err(FitError::MismatchedWeights {
                w_len: w.sample.len(),
                len: x.sample.len(),
            });
        }
        if x.sample.len() < MIN_SERIES_LENGTH {
            return Err(FitError::ShortSeries {
                actual: x.sample.len(),
                minimum: MIN_SERIES_LENGTH,
            });
        }
        if x.sample.iter().any(|v| !v.is_finite()) {
            return Err(FitError::NonFiniteInput("x"));
        }
        if y.sample.iter().any(|v| !v.is_finite()) {
            return Err(FitError::NonFiniteInput("y"));
        }
        if let Some(index) = w
            .sample
            .iter()
            .position(|&v| !v.is_finite() || v < T::zero())
        {
            return Err(FitError::InvalidWeight { index });
        }

        Ok(Self {
            x,
            y,
            w,
            y_weighted_mean: None,
            y_chi2: None,
            plateau: None,
        })
    }

    /// Construct [`ObservationSeries`] with unity weights
    pub fn new_without_weights(
        x: impl Into<DataSample<'a, T>>,
        y: impl Into<DataSample<'a, T>>,
    ) -> Result<Self, FitError> {
        let x = x.into();
        let w = vec![T::one(); x.sample.len()];
        Self::new(x, y, w)
    }

    /// Series length
    #[inline]
    pub fn lenu(&self) -> usize {
        self.x.sample.len()
    }

    /// Float approximating series length
    pub fn lenf(&self) -> T {
        self.lenu().approx().unwrap()
    }

    /// Explicit single-to-double precision cast
    ///
    /// Copies the series into owned `f64` arrays; caller-owned buffers are never
    /// mutated in place.
    pub fn to_double(&self) -> ObservationSeries<'static, f64> {
        let x = self.x.sample.mapv(|v| v.into_f64());
        let y = self.y.sample.mapv(|v| v.into_f64());
        let w = self.w.sample.mapv(|v| v.into_f64());
        ObservationSeries::new(x, y, w).expect("a valid series stays valid after the cast")
    }

    pub fn get_y_weighted_mean(&mut self) -> T {
        match self.y_weighted_mean {
            Some(x) => x,
            None => {
                let value = self.y.sample.weighted_mean(&self.w.sample).unwrap();
                self.y_weighted_mean = Some(value);
                value
            }
        }
    }

    /// Weighted sum of squared deviations of `y` from its weighted mean
    pub fn get_y_chi2(&mut self) -> T {
        match self.y_chi2 {
            Some(x) => x,
            None => {
                let y_weighted_mean = self.get_y_weighted_mean();
                let y_chi2 = Zip::from(&self.y.sample).and(&self.w.sample).fold(
                    T::zero(),
                    |chi2, &y, &w| chi2 + (y - y_weighted_mean).powi(2) * w,
                );
                if y_chi2.is_zero() {
                    self.plateau = Some(true);
                }
                self.y_chi2 = Some(y_chi2);
                y_chi2
            }
        }
    }

    pub fn is_plateau(&mut self) -> bool {
        match self.plateau {
            Some(x) => x,
            None => {
                let plateau = self.y.is_all_same();
                self.plateau = Some(plateau);
                plateau
            }
        }
    }
}
