//! Pipeline module - loading, exploratory analysis, subset search and projection

pub mod correlation;
pub mod cv;
pub mod error;
pub mod loader;
pub mod missing;
pub mod model;
pub mod predict;
pub mod ranking;
pub mod subsets;
pub mod table;

pub use correlation::*;
pub use cv::*;
pub use error::{EvalError, EvalResult};
pub use loader::*;
pub use missing::*;
pub use model::{PipelineConfig, RegressionPipeline};
pub use predict::*;
pub use ranking::*;
pub use subsets::*;
