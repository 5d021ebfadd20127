use crate::float_trait::Float;
use crate::models::{DoubleSModelTrait, NPARAMS};

use macro_const::macro_const;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

macro_const! {
    const DOC: &str = r#"
Raised-sine double-S model

Piecewise shape with hard phase windows: each component is zero up to the window start,
equals its amplitude from the window end on, and ramps through a raised sine strictly
inside the window,

$$
\mathrm{comp}_1(x) = p_1 \frac{\sin(-\pi/2 + \pi (x - p_2)/(p_3 - p_2)) + 1}{2},
\quad p_2 < x < p_3,
$$

and symmetrically for the second component over $(p_5, p_6)$.
"#;
}

#[doc = DOC!()]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Sine;

impl Sine {
    pub fn doc() -> &'static str {
        DOC
    }

    #[inline]
    fn ramp<T: Float>(x: T, amplitude: T, lo: T, hi: T) -> T {
        if x <= lo {
            T::zero()
        } else if x >= hi {
            amplitude
        } else {
            let phase = -T::FRAC_PI_2() + T::PI() * (x - lo) / (hi - lo);
            amplitude * (T::sin(phase) + T::one()) * T::half()
        }
    }

    /// `(d/d amplitude, d/d lo, d/d hi)` of a single ramp, zero outside the window
    #[inline]
    fn ramp_derivatives<T: Float>(x: T, amplitude: T, lo: T, hi: T) -> (T, T, T) {
        if x <= lo {
            (T::zero(), T::zero(), T::zero())
        } else if x >= hi {
            (T::one(), T::zero(), T::zero())
        } else {
            let angle = T::PI() * (x - lo) / (hi - lo);
            let gap_2 = (hi - lo).powi(2);
            (
                (T::one() - T::cos(angle)) * T::half(),
                T::PI() * amplitude * (x - hi) * T::sin(angle) / (T::two() * gap_2),
                -T::PI() * amplitude * (x - lo) * T::sin(angle) / (T::two() * gap_2),
            )
        }
    }
}

impl DoubleSModelTrait for Sine {
    fn components<T: Float>(&self, x: T, param: &[T; NPARAMS]) -> (T, T) {
        let [_p0, p1, p2, p3, p4, p5, p6] = *param;
        (Self::ramp(x, p1, p2, p3), Self::ramp(x, p4, p5, p6))
    }

    fn derivatives<T: Float>(&self, x: T, param: &[T; NPARAMS], jac: &mut [T; NPARAMS]) {
        let [_p0, p1, p2, p3, p4, p5, p6] = *param;
        let (d_amp1, d_lo1, d_hi1) = Self::ramp_derivatives(x, p1, p2, p3);
        let (d_amp2, d_lo2, d_hi2) = Self::ramp_derivatives(x, p4, p5, p6);

        jac[0] = T::one();
        jac[1] = d_amp1;
        jac[2] = d_lo1;
        jac[3] = d_hi1;
        jac[4] = d_amp2;
        jac[5] = d_lo2;
        jac[6] = d_hi2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;

    use approx::assert_relative_eq;

    #[test]
    fn sine_plateaus_and_midpoint() {
        let param = [0.2, 2.0, 5.0, 9.0, -1.6, 14.0, 18.0];
        let model = Sine;
        // window boundaries included in the plateaus
        assert_relative_eq!(model.value(5.0, &param), 0.2, epsilon = 1e-12);
        assert_relative_eq!(model.value(9.0, &param), 2.2, epsilon = 1e-12);
        // raised sine passes half the amplitude mid-window
        assert_relative_eq!(model.value(7.0, &param), 1.2, epsilon = 1e-12);
        assert_relative_eq!(model.value(16.0, &param), 2.2 - 0.8, epsilon = 1e-12);
        // both plateaus saturated
        assert_relative_eq!(model.value(19.0, &param), 0.6, epsilon = 1e-12);
    }

    #[test]
    fn sine_is_zero_slope_outside_windows() {
        let param = [0.2, 2.0, 5.0, 9.0, -1.6, 14.0, 18.0];
        let mut jac = [0.0; NPARAMS];
        Sine.derivatives(3.0, &param, &mut jac);
        assert_eq!(&jac[1..4], &[0.0; 3]);
        Sine.derivatives(11.0, &param, &mut jac);
        assert_eq!(jac[1], 1.0);
        assert_eq!(&jac[2..4], &[0.0; 2]);
        assert_eq!(&jac[4..], &[0.0; 3]);
    }

    #[test]
    fn sine_derivatives_match_numeric() {
        // abscissas strictly inside or outside the windows, away from the kinks
        check_model_derivatives(
            Sine.into(),
            [0.3, 2.1, 4.0, 9.0, -2.1, 13.0, 18.0],
            &[1.0, 5.5, 7.0, 8.5, 11.0, 14.5, 16.0, 19.5],
            1e-6,
        );
    }
}
