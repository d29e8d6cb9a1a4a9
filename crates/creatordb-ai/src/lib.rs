//! Completion-provider boundary and creator-analysis pipeline: prompt
//! assembly, structural validation, and the time-based freshness cache.

pub mod cache;
pub mod client;
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod types;
pub mod validate;

pub use client::AnthropicClient;
pub use error::AnalysisError;
pub use pipeline::{
    check_stored_analysis, run_creator_analysis, AnalysisKey, AnalysisOptions, AnalysisOutcome,
};
pub use types::{Competency, CreatorAnalysis, IconType, UniqueTrait};
