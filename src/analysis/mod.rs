// src/analysis/mod.rs
pub mod analyzer;
pub mod prompts;
pub mod rubric;
pub mod scoring;
pub mod types;

pub use analyzer::{Analysis, AnalysisError, Analyzer};
pub use scoring::{summarize, ScoreSummary};
pub use types::{
    AnalysisReport, LinkedInAnalysisRequest, ResumeAnalysisRequest, SectionScore, Source, Tier,
};
