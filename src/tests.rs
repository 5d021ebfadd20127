//! Shared test helpers

pub use rand::rngs::StdRng;
pub use rand::{Rng, SeedableRng};
pub use rand_distr::StandardNormal;

use crate::fit::numeric::numeric_derivatives;
use crate::models::{DoubleSModel, DoubleSModelTrait, NPARAMS};

use approx::assert_relative_eq;
use ndarray::Array1;

pub fn linspace<T: crate::Float>(start: T, end: T, n: usize) -> Vec<T> {
    Array1::linspace(start, end, n).to_vec()
}

/// Assert the analytic Jacobian row agrees with central finite differences at every `x`
pub fn check_model_derivatives(
    model: DoubleSModel,
    param: [f64; NPARAMS],
    xs: &[f64],
    tol: f64,
) {
    for &x in xs {
        let mut analytic = [0.0; NPARAMS];
        model.derivatives(x, &param, &mut analytic);
        let mut numeric = [0.0; NPARAMS];
        numeric_derivatives(&model, x, &param, &mut numeric);
        assert_relative_eq!(
            &analytic[..],
            &numeric[..],
            max_relative = tol,
            epsilon = tol
        );
    }
}
