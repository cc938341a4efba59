//! gbscale: Grain-Boundary Scaling Library
//!
//! Relates canonical material properties to a grain-boundary energy scaling
//! coefficient through exploratory correlation analysis and a cross-validated
//! search over feature subsets for a standardize → impute → linear-regression
//! pipeline.
//!
//! The steps compose explicitly:
//! load tables → enumerate subsets → rank → filter → fit-and-predict.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
