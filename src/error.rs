/// Error returned from series construction, prior estimation and curve fitting
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FitError {
    #[error("series length {actual} is smaller than the minimum required length {minimum}")]
    ShortSeries { actual: usize, minimum: usize },

    #[error("x and y arrays must have the same length: {x_len} vs {y_len}")]
    MismatchedLengths { x_len: usize, y_len: usize },

    #[error("weights array length {w_len} does not match the series length {len}")]
    MismatchedWeights { w_len: usize, len: usize },

    #[error("weight at index {index} is negative or not finite")]
    InvalidWeight { index: usize },

    #[error("non-finite value in the {0} array")]
    NonFiniteInput(&'static str),

    #[error("unknown double-S model identifier: {0}")]
    UnknownModel(String),

    #[error("prior estimation is undefined for a flat series")]
    FlatSeries,

    #[error("linear solver produced an unrecognized result: {0}")]
    UnknownSolverStatus(&'static str),
}
