//! Weighted nonlinear least-squares fitting of double-S models
//!
//! # Overview
//!
//! The optimizer minimizes the weighted chi-square
//!
//! ```text
//! chi2 = sum_i w_i * (y_i - f(x_i; p))^2
//! ```
//!
//! over the seven model parameters with a damped Gauss-Newton (Marquardt) iteration:
//! each step solves the damped normal equations
//!
//! ```text
//! (J^T W J + lambda * diag(J^T W J)) dp = J^T W r
//! ```
//!
//! and accepts the update only when chi-square does not grow, shrinking the damping
//! factor on acceptance and escalating it on rejection. Samples with zero weight drop
//! out of every sum, so they cannot influence the fit.
//!
//! The Jacobian comes from the model's analytic derivatives by default;
//! [`DerivativeMode::Numeric`] switches to central finite differences of the model
//! value, which is functionally interchangeable but slower and less precise.
//!
//! # Outcomes
//!
//! A run always produces the best parameters seen so far. The terminal
//! [`FitStatus`] tells how it ended:
//!
//! - [`Converged`](FitStatus::Converged): a step, accepted or rejected, changed
//!   chi-square by less than the tolerance;
//! - [`MaxIterationsReached`](FitStatus::MaxIterationsReached): the iteration budget
//!   ran out first;
//! - [`Diverged`](FitStatus::Diverged): chi-square kept growing, or the normal
//!   equations stayed singular, across all damping escalations.
//!
//! Only an unrecognized outcome of the linear-solve machinery (a non-finite update or
//! non-finite normal equations) is an error,
//! [`FitError::UnknownSolverStatus`](crate::FitError::UnknownSolverStatus); it is
//! surfaced, never coerced into one of the statuses above.

use crate::float_trait::Float;
use crate::models::NPARAMS;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

mod marquardt;
pub use marquardt::{DerivativeMode, Marquardt};

pub(crate) mod numeric;

mod solve;

/// How a fit run terminated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum FitStatus {
    /// Chi-square change of a step fell below the tolerance
    Converged,
    /// Chi-square kept growing across repeated damping escalations
    Diverged,
    /// Tolerance was not met within the iteration budget
    MaxIterationsReached,
}

/// Outcome of a fit run
///
/// Carries the posterior parameters even for non-converged statuses, so callers can
/// inspect the best-effort fit and retry with different priors, laxer tolerance or a
/// larger iteration budget.
#[derive(Clone, Debug)]
pub struct FitResult<T> {
    /// Posterior parameter vector
    pub param: [T; NPARAMS],
    /// Iterations actually used
    pub iterations: u16,
    /// Final weighted chi-square
    pub chi2: T,
    /// Weighted RMS residual, `sqrt(chi2 / max(1, n - 7))`
    pub standard_error: T,
    pub status: FitStatus,
}

impl<T> FitResult<T>
where
    T: Float,
{
    #[inline]
    pub fn is_converged(&self) -> bool {
        self.status == FitStatus::Converged
    }
}
