mod data_sample;
pub use data_sample::DataSample;

mod series;
pub use series::{MIN_SERIES_LENGTH, ObservationSeries};
