mod analysis_config;
mod drtpt_app;
mod error;
pub mod output;
pub mod pipeline;

pub use analysis_config::{
    AnalysisConfig, PopulationConfig, StopsConfig, TripsConfig, DEFAULT_PIPELINE_CAPACITY,
};
pub use drtpt_app::{DrtptApp, DrtptOperation};
pub use error::AppError;
