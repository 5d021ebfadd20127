use crate::float_trait::Float;
use crate::models::{DoubleSModelTrait, NPARAMS};

use macro_const::macro_const;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

macro_const! {
    const DOC: &str = r#"
Half-Gaussian double-S model

Each component is a Gaussian-shaped ramp clamped at its amplitude,

$$
\mathrm{comp}_1(x) =
\begin{cases}
p_1 e^{-(x - p_2)^2 / (2 p_3^2)}, & x < p_2, \\\\
p_1, & x \ge p_2,
\end{cases}
$$

and symmetrically for the second component with $(p_4, p_5, p_6)$. The phase parameter
is where the ramp reaches the amplitude and the spread parameter controls how wide the
transition is; the junction is continuous with a continuous first derivative.
"#;
}

#[doc = DOC!()]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Gaussian;

impl Gaussian {
    pub fn doc() -> &'static str {
        DOC
    }

    #[inline]
    fn ramp<T: Float>(x: T, amplitude: T, phase: T, spread: T) -> T {
        let d = x - phase;
        if d >= T::zero() {
            amplitude
        } else {
            amplitude * T::exp(-d.powi(2) / (T::two() * spread.powi(2)))
        }
    }

    /// `(d/d amplitude, d/d phase, d/d spread)` of a single ramp
    ///
    /// A zero spread degenerates the ramp into a step whose phase and spread
    /// derivatives vanish on both sides.
    #[inline]
    fn ramp_derivatives<T: Float>(x: T, amplitude: T, phase: T, spread: T) -> (T, T, T) {
        let d = x - phase;
        if d >= T::zero() {
            (T::one(), T::zero(), T::zero())
        } else if spread.is_zero() {
            (T::zero(), T::zero(), T::zero())
        } else {
            let g = T::exp(-d.powi(2) / (T::two() * spread.powi(2)));
            (
                g,
                amplitude * g * d / spread.powi(2),
                amplitude * g * d.powi(2) / spread.powi(3),
            )
        }
    }
}

impl DoubleSModelTrait for Gaussian {
    fn components<T: Float>(&self, x: T, param: &[T; NPARAMS]) -> (T, T) {
        let [_p0, p1, p2, p3, p4, p5, p6] = *param;
        (Self::ramp(x, p1, p2, p3), Self::ramp(x, p4, p5, p6))
    }

    fn derivatives<T: Float>(&self, x: T, param: &[T; NPARAMS], jac: &mut [T; NPARAMS]) {
        let [_p0, p1, p2, p3, p4, p5, p6] = *param;
        let (d_amp1, d_phase1, d_spread1) = Self::ramp_derivatives(x, p1, p2, p3);
        let (d_amp2, d_phase2, d_spread2) = Self::ramp_derivatives(x, p4, p5, p6);

        jac[0] = T::one();
        jac[1] = d_amp1;
        jac[2] = d_phase1;
        jac[3] = d_spread1;
        jac[4] = d_amp2;
        jac[5] = d_phase2;
        jac[6] = d_spread2;
    }
}
