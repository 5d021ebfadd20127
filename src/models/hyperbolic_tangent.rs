use crate::float_trait::Float;
use crate::models::{DoubleSModelTrait, NPARAMS};

use macro_const::macro_const;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

macro_const! {
    const DOC: &str = r#"
Hyperbolic-tangent double-S model

$$
f(x) = p_0 + p_1 \frac{\tanh((x - p_2) p_3) + 1}{2} + p_4 \frac{\tanh((x - p_5) p_6) + 1}{2},
$$

a smooth shape without hard phase windows: each component approaches zero and its
amplitude asymptotically around the transition centered at the phase parameter, with
the shape parameter controlling the slope.
"#;
}

#[doc = DOC!()]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct HyperbolicTangent;

impl HyperbolicTangent {
    pub fn doc() -> &'static str {
        DOC
    }

    #[inline]
    fn ramp<T: Float>(x: T, amplitude: T, phase: T, slope: T) -> T {
        amplitude * (T::tanh((x - phase) * slope) + T::one()) * T::half()
    }
}

impl DoubleSModelTrait for HyperbolicTangent {
    fn components<T: Float>(&self, x: T, param: &[T; NPARAMS]) -> (T, T) {
        let [_p0, p1, p2, p3, p4, p5, p6] = *param;
        (
            Self::ramp(x, p1, p2, p3),
            Self::ramp(x, p4, p5, p6),
        )
    }

    fn derivatives<T: Float>(&self, x: T, param: &[T; NPARAMS], jac: &mut [T; NPARAMS]) {
        let [_p0, p1, p2, p3, p4, p5, p6] = *param;
        let cosh1_2 = T::cosh((x - p2) * p3).powi(2);
        let cosh2_2 = T::cosh((x - p5) * p6).powi(2);

        jac[0] = T::one();
        jac[1] = (T::tanh((x - p2) * p3) + T::one()) * T::half();
        jac[2] = -p1 * p3 / (T::two() * cosh1_2);
        jac[3] = p1 * (x - p2) / (T::two() * cosh1_2);
        jac[4] = (T::tanh((x - p5) * p6) + T::one()) * T::half();
        jac[5] = -p4 * p6 / (T::two() * cosh2_2);
        jac[6] = p4 * (x - p5) / (T::two() * cosh2_2);
    }
}
