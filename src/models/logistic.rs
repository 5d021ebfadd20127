use crate::float_trait::Float;
use crate::models::{DoubleSModelTrait, NPARAMS};

use macro_const::macro_const;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

macro_const! {
    const DOC: &str = r#"
Logistic double-S model

$$
f(x) = p_0 + \frac{p_1}{1 + e^{-(x - p_2) p_3}} + \frac{p_4}{1 + e^{-(x - p_5) p_6}},
$$

the same asymptotic shape as the hyperbolic-tangent variant in logistic-sigmoid form.
Evaluated through a saturating sigmoid, so extreme arguments stay finite.
"#;
}

#[doc = DOC!()]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Logistic;

impl Logistic {
    pub fn doc() -> &'static str {
        DOC
    }
}

impl DoubleSModelTrait for Logistic {
    fn components<T: Float>(&self, x: T, param: &[T; NPARAMS]) -> (T, T) {
        let [_p0, p1, p2, p3, p4, p5, p6] = *param;
        (
            p1 * T::logistic((x - p2) * p3),
            p4 * T::logistic((x - p5) * p6),
        )
    }

    fn derivatives<T: Float>(&self, x: T, param: &[T; NPARAMS], jac: &mut [T; NPARAMS]) {
        let [_p0, p1, p2, p3, p4, p5, p6] = *param;
        let s1 = T::logistic((x - p2) * p3);
        let s2 = T::logistic((x - p5) * p6);
        // e / (1 + e)^2 written as s (1 - s) to avoid inf/inf for saturated arguments
        let bell1 = s1 * (T::one() - s1);
        let bell2 = s2 * (T::one() - s2);

        jac[0] = T::one();
        jac[1] = s1;
        jac[2] = -p1 * p3 * bell1;
        jac[3] = p1 * (x - p2) * bell1;
        jac[4] = s2;
        jac[5] = -p4 * p6 * bell2;
        jac[6] = p4 * (x - p5) * bell2;
    }
}
