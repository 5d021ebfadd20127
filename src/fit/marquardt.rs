use crate::data::ObservationSeries;
use crate::error::FitError;
use crate::fit::numeric::numeric_derivatives;
use crate::fit::solve::{SolveStatus, solve_normal_equations};
use crate::fit::{FitResult, FitStatus};
use crate::float_trait::Float;
use crate::models::{DoubleSModel, DoubleSModelTrait, NPARAMS};

use conv::prelude::*;
use ndarray::Zip;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const INITIAL_LAMBDA: f64 = 1e-3;
const LAMBDA_UP: f64 = 10.0;
const LAMBDA_DOWN: f64 = 0.1;
/// Damping escalations stop and the run is declared diverged past this factor
const LAMBDA_MAX: f64 = 1e10;

/// How the optimizer obtains the model Jacobian
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum DerivativeMode {
    /// Exact analytic partial derivatives of the model
    Analytic,
    /// Central finite differences of the model value
    Numeric,
}

/// Damped Gauss-Newton (Marquardt) weighted nonlinear least-squares optimizer
///
/// Consumes an [`ObservationSeries`], a [`DoubleSModel`] and a prior parameter vector,
/// and iterates to a posterior [`FitResult`]. See the [module docs](crate::fit) for
/// the iteration scheme.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename = "Marquardt")]
pub struct Marquardt {
    pub max_iterations: u16,
    pub tolerance: f64,
    pub derivatives: DerivativeMode,
}

impl Marquardt {
    pub fn new(max_iterations: u16, tolerance: f64, derivatives: DerivativeMode) -> Self {
        assert!(tolerance > 0.0, "tolerance must be positive");
        Self {
            max_iterations,
            tolerance,
            derivatives,
        }
    }

    #[inline]
    pub fn default_max_iterations() -> u16 {
        20
    }

    #[inline]
    pub fn default_tolerance() -> f64 {
        1e-3
    }

    #[inline]
    pub fn default_derivatives() -> DerivativeMode {
        DerivativeMode::Analytic
    }

    /// Run the fit starting from `prior`
    ///
    /// The returned [`FitResult`] carries the best-effort posterior for every status;
    /// only unrecognized linear-solver outcomes produce an `Err`.
    pub fn fit<T>(
        &self,
        series: &ObservationSeries<'_, T>,
        model: DoubleSModel,
        prior: [T; NPARAMS],
    ) -> Result<FitResult<T>, FitError>
    where
        T: Float,
    {
        if prior.iter().any(|v| !v.is_finite()) {
            return Err(FitError::NonFiniteInput("prior parameters"));
        }

        let tolerance = T::from_f64(self.tolerance);
        let lambda_up = T::from_f64(LAMBDA_UP);
        let lambda_down = T::from_f64(LAMBDA_DOWN);
        let lambda_max = T::from_f64(LAMBDA_MAX);

        let mut state = OptimizerState {
            param: prior,
            chi2: chi2(series, model, &prior),
            lambda: T::from_f64(INITIAL_LAMBDA),
            iterations: 0,
        };

        let mut status = FitStatus::MaxIterationsReached;
        'iterations: for iteration in 1..=self.max_iterations {
            state.iterations = iteration;
            let (hessian, gradient) = self.normal_equations(series, model, &state.param)?;

            // Retry the step with escalated damping until chi-square stops growing
            loop {
                let damped = damp(&hessian, state.lambda);
                if let SolveStatus::Solved(delta) = solve_normal_equations(damped, gradient) {
                    if delta.iter().any(|v| !v.is_finite()) {
                        return Err(FitError::UnknownSolverStatus(
                            "non-finite parameter update",
                        ));
                    }
                    let mut trial = state.param;
                    for (p, d) in trial.iter_mut().zip(delta.iter()) {
                        *p = *p + *d;
                    }
                    let trial_chi2 = chi2(series, model, &trial);
                    if trial_chi2.is_finite() {
                        if trial_chi2 <= state.chi2 {
                            let delta_chi2 = state.chi2 - trial_chi2;
                            state.param = trial;
                            state.chi2 = trial_chi2;
                            state.lambda = state.lambda * lambda_down;
                            if delta_chi2 < tolerance {
                                status = FitStatus::Converged;
                                break 'iterations;
                            }
                            continue 'iterations;
                        }
                        // A rejected step that worsens chi-square by less than the
                        // tolerance means no damped step can improve the fit anymore:
                        // the current parameters already sit at the reachable minimum
                        if trial_chi2 - state.chi2 < tolerance {
                            status = FitStatus::Converged;
                            break 'iterations;
                        }
                    }
                }
                state.lambda = state.lambda * lambda_up;
                if state.lambda > lambda_max {
                    status = FitStatus::Diverged;
                    break 'iterations;
                }
            }
        }

        let nparams: T = NPARAMS.approx().unwrap();
        let dof = T::max(T::one(), series.lenf() - nparams);
        Ok(FitResult {
            param: state.param,
            iterations: state.iterations,
            chi2: state.chi2,
            standard_error: (state.chi2 / dof).sqrt(),
            status,
        })
    }

    /// Accumulate `J^T W J` and `J^T W r`, upper triangle mirrored
    #[allow(clippy::type_complexity)]
    fn normal_equations<T>(
        &self,
        series: &ObservationSeries<'_, T>,
        model: DoubleSModel,
        param: &[T; NPARAMS],
    ) -> Result<([[T; NPARAMS]; NPARAMS], [T; NPARAMS]), FitError>
    where
        T: Float,
    {
        let mut hessian = [[T::zero(); NPARAMS]; NPARAMS];
        let mut gradient = [T::zero(); NPARAMS];
        let mut jac = [T::zero(); NPARAMS];

        Zip::from(&series.x.sample)
            .and(&series.y.sample)
            .and(&series.w.sample)
            .for_each(|&x, &y, &w| {
                if w.is_zero() {
                    return;
                }
                match self.derivatives {
                    DerivativeMode::Analytic => model.derivatives(x, param, &mut jac),
                    DerivativeMode::Numeric => numeric_derivatives(&model, x, param, &mut jac),
                }
                let residual = y - model.value(x, param);
                for i in 0..NPARAMS {
                    gradient[i] = gradient[i] + w * jac[i] * residual;
                    for j in i..NPARAMS {
                        hessian[i][j] = hessian[i][j] + w * jac[i] * jac[j];
                    }
                }
            });
        for i in 1..NPARAMS {
            for j in 0..i {
                hessian[i][j] = hessian[j][i];
            }
        }

        let finite = gradient.iter().all(|v| v.is_finite())
            && hessian.iter().flatten().all(|v| v.is_finite());
        if !finite {
            return Err(FitError::UnknownSolverStatus("non-finite normal equations"));
        }
        Ok((hessian, gradient))
    }
}

impl Default for Marquardt {
    fn default() -> Self {
        Self::new(
            Self::default_max_iterations(),
            Self::default_tolerance(),
            Self::default_derivatives(),
        )
    }
}

/// Transient per-run optimizer state
struct OptimizerState<T> {
    param: [T; NPARAMS],
    chi2: T,
    lambda: T,
    iterations: u16,
}

/// Weighted chi-square of the model against the series
pub fn chi2<T>(series: &ObservationSeries<'_, T>, model: DoubleSModel, param: &[T; NPARAMS]) -> T
where
    T: Float,
{
    Zip::from(&series.x.sample)
        .and(&series.y.sample)
        .and(&series.w.sample)
        .fold(T::zero(), |acc, &x, &y, &w| {
            let residual = y - model.value(x, param);
            acc + w * residual.powi(2)
        })
}

/// Scale the diagonal by `1 + lambda`, the Marquardt damping
fn damp<T>(hessian: &[[T; NPARAMS]; NPARAMS], lambda: T) -> [[T; NPARAMS]; NPARAMS]
where
    T: Float,
{
    let mut damped = *hessian;
    for (i, row) in damped.iter_mut().enumerate() {
        row[i] = row[i] * (T::one() + lambda);
    }
    damped
}
