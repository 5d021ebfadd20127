#![doc = include_str!("../README.md")]

pub mod data;
pub use data::{DataSample, MIN_SERIES_LENGTH, ObservationSeries};

mod error;
pub use error::FitError;

pub mod fit;
pub use fit::{DerivativeMode, FitResult, FitStatus, Marquardt};

mod float_trait;
pub use float_trait::Float;

pub mod models;
pub use models::{
    DoubleSModel, DoubleSModelTrait, Gaussian, HyperbolicTangent, Logistic, ModelCurves, NPARAMS,
    Sine,
};

pub mod prior;

#[cfg(test)]
mod tests;

mod types;
pub use types::CowArray1;

pub use ndarray;
