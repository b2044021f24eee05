// src/analysis/analyzer.rs
use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::prompts;
use super::rubric::{Rubric, LINKEDIN, RESUME};
use super::types::{
    AnalysisReport, LinkedInAnalysisRequest, ResumeAnalysisRequest, Source, Tier,
};
use crate::core::{extract_json, CompletionBackend, CompletionError, CompletionRequest, ExtractError};
use crate::environment::LimitSettings;
use crate::utils::{non_blank, normalize_job_role};

const MISSING_RESUME_INPUT: &str = "Missing resumeText or jobRole";
const MISSING_LINKEDIN_INPUT: &str = "Missing linkedInText or jobRole";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{0}")]
    MissingInput(&'static str),

    #[error("{field} exceeds the {limit} character limit")]
    InputTooLong { field: &'static str, limit: usize },

    #[error("API key not configured")]
    NotConfigured,

    #[error("Grok API error: {detail}")]
    Upstream {
        detail: String,
        #[source]
        source: CompletionError,
    },

    #[error("Failed to parse AI response. Please try again.")]
    Unparseable(#[source] ExtractError),

    #[error("Failed to parse AI response. Please try again.")]
    Incomplete(&'static str),
}

impl AnalysisError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AnalysisError::MissingInput(_) => "MISSING_INPUT",
            AnalysisError::InputTooLong { .. } => "INPUT_TOO_LONG",
            AnalysisError::NotConfigured => "SERVICE_CONFIG_ERROR",
            AnalysisError::Upstream { .. } => "API_ERROR",
            AnalysisError::Unparseable(_) => "PARSE_ERROR",
            AnalysisError::Incomplete(_) => "INCOMPLETE_ANALYSIS",
        }
    }

    /// Whether the caller, rather than the service, is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::MissingInput(_) | AnalysisError::InputTooLong { .. }
        )
    }
}

impl From<CompletionError> for AnalysisError {
    fn from(e: CompletionError) -> Self {
        match e {
            CompletionError::MissingApiKey => AnalysisError::NotConfigured,
            // A reply without message text is a bad completion, not an outage
            CompletionError::EmptyContent => AnalysisError::Unparseable(ExtractError::Empty),
            other => {
                let detail = other
                    .status()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unavailable".to_string());
                AnalysisError::Upstream {
                    detail,
                    source: other,
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub source: Source,
    pub tier: Tier,
    pub report: AnalysisReport,
}

#[derive(Clone)]
pub struct Analyzer {
    backend: Arc<dyn CompletionBackend>,
    limits: LimitSettings,
}

impl Analyzer {
    pub fn new(backend: Arc<dyn CompletionBackend>, limits: LimitSettings) -> Self {
        Self { backend, limits }
    }

    pub async fn analyze_resume_free(
        &self,
        request: &ResumeAnalysisRequest,
    ) -> Result<Analysis, AnalysisError> {
        let (text, role) = self.required_input(
            request.resume_text.as_deref(),
            request.job_role.as_deref(),
            "resumeText",
            MISSING_RESUME_INPUT,
        )?;

        info!("Analyzing resume for role: {}", role);
        let completion = prompts::resume_free(text, &role);
        self.run(Source::Resume, Tier::Free, completion).await
    }

    pub async fn analyze_resume_paid(
        &self,
        request: &ResumeAnalysisRequest,
    ) -> Result<Analysis, AnalysisError> {
        let (text, role) = self.required_input(
            request.resume_text.as_deref(),
            request.job_role.as_deref(),
            "resumeText",
            MISSING_RESUME_INPUT,
        )?;

        let wants_specific = request.is_specific_job.unwrap_or(false);
        let job_description = non_blank(request.job_description.as_deref());
        if let Some(jd) = job_description {
            self.check_length("jobDescription", jd)?;
        }

        // A job description only counts when the caller asked for specific matching.
        let job_description = match (wants_specific, job_description) {
            (true, Some(jd)) => Some(jd),
            (true, None) => {
                warn!("Specific job analysis requested without a job description, running general analysis");
                None
            }
            (false, _) => None,
        };

        info!(
            "Analyzing resume (PAID) for role: {}, Specific Job: {}",
            role,
            job_description.is_some()
        );
        let completion = prompts::resume_paid(text, &role, job_description);
        self.run(Source::Resume, Tier::Paid, completion).await
    }

    pub async fn analyze_linkedin_free(
        &self,
        request: &LinkedInAnalysisRequest,
    ) -> Result<Analysis, AnalysisError> {
        let (text, role) = self.required_input(
            request.linkedin_text.as_deref(),
            request.job_role.as_deref(),
            "linkedInText",
            MISSING_LINKEDIN_INPUT,
        )?;

        info!("Analyzing LinkedIn profile for role: {}", role);
        let completion = prompts::linkedin_free(text, &role);
        self.run(Source::LinkedIn, Tier::Free, completion).await
    }

    pub async fn analyze_linkedin_paid(
        &self,
        request: &LinkedInAnalysisRequest,
    ) -> Result<Analysis, AnalysisError> {
        let (text, role) = self.required_input(
            request.linkedin_text.as_deref(),
            request.job_role.as_deref(),
            "linkedInText",
            MISSING_LINKEDIN_INPUT,
        )?;

        info!("Analyzing LinkedIn profile (PAID) for role: {}", role);
        let completion = prompts::linkedin_paid(text, &role);
        self.run(Source::LinkedIn, Tier::Paid, completion).await
    }

    fn required_input<'a>(
        &self,
        text: Option<&'a str>,
        role: Option<&'a str>,
        text_field: &'static str,
        missing: &'static str,
    ) -> Result<(&'a str, String), AnalysisError> {
        let (Some(text), Some(role)) = (non_blank(text), non_blank(role)) else {
            return Err(AnalysisError::MissingInput(missing));
        };

        self.check_length(text_field, text)?;
        self.check_length("jobRole", role)?;
        Ok((text, normalize_job_role(role)))
    }

    fn check_length(&self, field: &'static str, value: &str) -> Result<(), AnalysisError> {
        let limit = self.limits.max_input_chars;
        if value.chars().count() > limit {
            return Err(AnalysisError::InputTooLong { field, limit });
        }
        Ok(())
    }

    async fn run(
        &self,
        source: Source,
        tier: Tier,
        completion: CompletionRequest,
    ) -> Result<Analysis, AnalysisError> {
        let span = info_span!(
            "analysis",
            request_id = %Uuid::new_v4(),
            source = source.label(),
            tier = tier.as_str()
        );

        async move {
            let raw = self.backend.complete(&completion).await.map_err(|e| {
                error!("Completion failed: {}", e);
                AnalysisError::from(e)
            })?;

            let report: AnalysisReport = extract_json(&raw).map_err(|e| {
                error!("Failed to parse completion: {}", e);
                AnalysisError::Unparseable(e)
            })?;

            let report = normalize(report, rubric_for(source));
            check_deliverables(&report, source, tier)?;

            info!(
                "Analysis complete: total score {} across {} sections",
                report.total_score,
                report.sections.len()
            );
            Ok(Analysis {
                source,
                tier,
                report,
            })
        }
        .instrument(span)
        .await
    }
}

pub fn rubric_for(source: Source) -> &'static Rubric {
    match source {
        Source::Resume => &RESUME,
        Source::LinkedIn => &LINKEDIN,
    }
}

/// Brings model output in line with the rubric: canonical section names and
/// maxima, scores clamped to their maxima, percentages clamped to 100.
/// An unknown section that arrived without a maximum takes its score as one.
/// When every rubric section was scored, the total is their sum.
pub fn normalize(mut report: AnalysisReport, rubric: &Rubric) -> AnalysisReport {
    let mut seen = HashSet::new();

    for section in &mut report.sections {
        if let Some(known) = rubric.find(&section.name) {
            if section.max_score != 0 && section.max_score != known.max_score {
                warn!(
                    "Section '{}' reported max {} but rubric max is {}",
                    known.name, section.max_score, known.max_score
                );
            }
            section.name = known.name.to_string();
            section.max_score = known.max_score;
            seen.insert(known.name);
        } else if section.max_score == 0 {
            section.max_score = section.score;
        }
        section.score = section.score.min(section.max_score);
    }

    if seen.len() == rubric.sections.len() {
        let mut counted = HashSet::new();
        report.total_score = report
            .sections
            .iter()
            .filter(|s| counted.insert(s.name.clone()) && rubric.find(&s.name).is_some())
            .map(|s| s.score)
            .sum();
    }
    report.total_score = report.total_score.min(100);

    for pct in [
        &mut report.ats_compatibility,
        &mut report.linked_in_compatibility,
        &mut report.keyword_match_percentage,
    ]
    .into_iter()
    .flatten()
    {
        *pct = (*pct).min(100);
    }

    report
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

pub fn check_deliverables(
    report: &AnalysisReport,
    source: Source,
    tier: Tier,
) -> Result<(), AnalysisError> {
    let missing = if report.sections.is_empty() {
        Some("sections")
    } else {
        match (source, tier) {
            (_, Tier::Free) => None,
            (_, Tier::Paid) if is_blank(&report.cover_letter) => Some("coverLetter"),
            (Source::Resume, Tier::Paid) if is_blank(&report.optimized_resume) => {
                Some("optimizedResume")
            }
            (Source::LinkedIn, Tier::Paid) if report.headlines.is_empty() => Some("headlines"),
            (Source::LinkedIn, Tier::Paid) if report.summaries.is_empty() => Some("summaries"),
            _ => None,
        }
    };

    match missing {
        Some(field) => {
            error!("Completion is missing required field: {}", field);
            Err(AnalysisError::Incomplete(field))
        }
        None => Ok(()),
    }
}
