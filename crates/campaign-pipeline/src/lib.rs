//! # Campaign Pipeline
//!
//! The sequential analysis run: validate, generate, score, draw, record.

pub mod runner;

pub use runner::{AnalysisPipeline, PipelineReport, RunStatus};
