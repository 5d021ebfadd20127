use crate::float_trait::Float;
use crate::models::{DoubleSModel, DoubleSModelTrait, NPARAMS};

/// Central finite-difference approximation of the model Jacobian row at `x`
///
/// Functionally interchangeable with the analytic derivatives, slower and accurate to
/// roughly the two-thirds power of the machine epsilon.
pub(crate) fn numeric_derivatives<T>(
    model: &DoubleSModel,
    x: T,
    param: &[T; NPARAMS],
    jac: &mut [T; NPARAMS],
) where
    T: Float,
{
    let step_scale = T::epsilon().cbrt();
    for i in 0..NPARAMS {
        let h = step_scale * T::max(T::one(), param[i].abs());
        let mut plus = *param;
        plus[i] = param[i] + h;
        let mut minus = *param;
        minus[i] = param[i] - h;
        jac[i] = (model.value(x, &plus) - model.value(x, &minus)) / (h + h);
    }
}
