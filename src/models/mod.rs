//! The double-S model family
//!
//! Every model evaluates `value = p0 + comp1(x) + comp2(x)`: a base level plus two
//! additive S-shaped components, each ramping from zero to its amplitude across a
//! phase window. The seven parameters share index meaning across all variants:
//!
//! - `p0`: base level,
//! - `p1`: amplitude of the first (rising) component,
//! - `p2`, `p3`: phase/shape controls of the rising transition,
//! - `p4`: amplitude of the second (falling) component,
//! - `p5`, `p6`: phase/shape controls of the falling transition.
//!
//! [`DoubleSModel`] is the registry: each enum variant carries its model struct and
//! dispatches [`DoubleSModelTrait`], so the identifier-to-(function, derivative)
//! mapping is total by construction. External string identifiers go through
//! [`FromStr`](std::str::FromStr) and fail with
//! [`FitError::UnknownModel`](crate::FitError::UnknownModel) before any numeric work.

use crate::error::FitError;
use crate::float_trait::Float;

use enum_dispatch::enum_dispatch;
use ndarray::{Array1, ArrayView1, Zip};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

mod gaussian;
pub use gaussian::Gaussian;

mod hyperbolic_tangent;
pub use hyperbolic_tangent::HyperbolicTangent;

mod logistic;
pub use logistic::Logistic;

mod sine;
pub use sine::Sine;

/// Number of double-S model parameters
pub const NPARAMS: usize = 7;

/// Shared contract of the double-S model variants
#[enum_dispatch]
pub trait DoubleSModelTrait {
    /// Both additive S-components at `x`, base level excluded
    fn components<T: Float>(&self, x: T, param: &[T; NPARAMS]) -> (T, T);

    /// Analytic partial derivatives of the model value w.r.t. every parameter
    fn derivatives<T: Float>(&self, x: T, param: &[T; NPARAMS], jac: &mut [T; NPARAMS]);

    /// Model value at `x`
    fn value<T: Float>(&self, x: T, param: &[T; NPARAMS]) -> T {
        let (comp1, comp2) = self.components(x, param);
        param[0] + comp1 + comp2
    }
}

/// Double-S model registry
///
/// The identifier enum and the model lookup table in one: every variant holds the
/// struct implementing [`DoubleSModelTrait`] for the corresponding shape.
#[enum_dispatch(DoubleSModelTrait)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[non_exhaustive]
pub enum DoubleSModel {
    Gaussian(Gaussian),
    HyperbolicTangent(HyperbolicTangent),
    Logistic(Logistic),
    Sine(Sine),
}

impl DoubleSModel {
    /// All model variants in registry order
    pub const fn all() -> [Self; 4] {
        [
            Self::Gaussian(Gaussian),
            Self::HyperbolicTangent(HyperbolicTangent),
            Self::Logistic(Logistic),
            Self::Sine(Sine),
        ]
    }

    /// Vectorized evaluation over a whole abscissa array
    ///
    /// Returns the combined curve and both component curves in one call; together with
    /// the iteration count and chi-square of a
    /// [`FitResult`](crate::fit::FitResult) this is everything an external plot
    /// renderer consumes.
    pub fn sample<T: Float>(&self, x: ArrayView1<'_, T>, param: &[T; NPARAMS]) -> ModelCurves<T> {
        let (comp1, comp2): (Vec<T>, Vec<T>) =
            x.iter().map(|&xi| self.components(xi, param)).unzip();
        let comp1: Array1<T> = comp1.into();
        let comp2: Array1<T> = comp2.into();
        let value = Zip::from(&comp1)
            .and(&comp2)
            .map_collect(|&c1, &c2| param[0] + c1 + c2);
        ModelCurves {
            value,
            comp1,
            comp2,
        }
    }
}

impl std::str::FromStr for DoubleSModel {
    type Err = FitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "gaussian" => Gaussian.into(),
            "hyperbolic-tangent" | "tanh" => HyperbolicTangent.into(),
            "logistic" => Logistic.into(),
            "sine" => Sine.into(),
            _ => return Err(FitError::UnknownModel(s.to_owned())),
        })
    }
}

/// Combined and component curves sampled over an abscissa array
///
/// The numeric payload handed to external visualization collaborators.
#[derive(Clone, Debug)]
pub struct ModelCurves<T> {
    pub value: Array1<T>,
    pub comp1: Array1<T>,
    pub comp2: Array1<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn model_from_str() {
        assert_eq!(
            "tanh".parse::<DoubleSModel>().unwrap(),
            DoubleSModel::HyperbolicTangent(HyperbolicTangent),
        );
        assert_eq!(
            "sine".parse::<DoubleSModel>().unwrap(),
            DoubleSModel::Sine(Sine),
        );
        assert_eq!(
            "parabola".parse::<DoubleSModel>().unwrap_err(),
            FitError::UnknownModel("parabola".into()),
        );
    }

    #[test]
    fn sample_matches_scalar_evaluation() {
        let param = [0.3, 2.1, 5.0, 1.0, -2.1, 15.0, 1.0];
        let x: Array1<f64> = Array1::linspace(0.0, 19.0, 20);
        for model in DoubleSModel::all() {
            let curves = model.sample(x.view(), &param);
            for (i, &xi) in x.iter().enumerate() {
                let (c1, c2) = model.components(xi, &param);
                assert_relative_eq!(curves.comp1[i], c1);
                assert_relative_eq!(curves.comp2[i], c2);
                assert_relative_eq!(curves.value[i], model.value(xi, &param));
                assert_relative_eq!(curves.value[i], param[0] + c1 + c2);
            }
        }
    }

    #[test]
    fn model_serialization_round_trip() {
        for model in DoubleSModel::all() {
            let json = serde_json::to_string(&model).unwrap();
            let back: DoubleSModel = serde_json::from_str(&json).unwrap();
            assert_eq!(model, back);
        }
    }
}
