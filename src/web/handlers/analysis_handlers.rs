// src/web/handlers/analysis_handlers.rs

use crate::analysis::{
    Analysis, AnalysisError, Analyzer, LinkedInAnalysisRequest, ResumeAnalysisRequest,
};
use crate::web::types::{
    AnalysisResponse, StandardErrorResponse, StandardRequest, WithConversationId,
};

use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info, warn};

pub type ApiError = Custom<Json<StandardErrorResponse>>;
pub type ApiResult = Result<Json<AnalysisResponse>, ApiError>;

pub async fn analyze_resume_handler(
    request: Json<StandardRequest<ResumeAnalysisRequest>>,
    analyzer: &State<Analyzer>,
) -> ApiResult {
    let conversation_id = request.conversation_id();
    let result = analyzer.analyze_resume_free(&request.data).await;
    respond(result, conversation_id, "/analyze-resume")
}

pub async fn analyze_resume_paid_handler(
    request: Json<StandardRequest<ResumeAnalysisRequest>>,
    analyzer: &State<Analyzer>,
) -> ApiResult {
    let conversation_id = request.conversation_id();
    let result = analyzer.analyze_resume_paid(&request.data).await;
    respond(result, conversation_id, "/analyze-resume-paid")
}

pub async fn analyze_linkedin_handler(
    request: Json<StandardRequest<LinkedInAnalysisRequest>>,
    analyzer: &State<Analyzer>,
) -> ApiResult {
    let conversation_id = request.conversation_id();
    let result = analyzer.analyze_linkedin_free(&request.data).await;
    respond(result, conversation_id, "/analyze-linkedin")
}

pub async fn analyze_linkedin_paid_handler(
    request: Json<StandardRequest<LinkedInAnalysisRequest>>,
    analyzer: &State<Analyzer>,
) -> ApiResult {
    let conversation_id = request.conversation_id();
    let result = analyzer.analyze_linkedin_paid(&request.data).await;
    respond(result, conversation_id, "/analyze-linkedin-paid")
}

fn respond(
    result: Result<Analysis, AnalysisError>,
    conversation_id: Option<String>,
    endpoint: &str,
) -> ApiResult {
    match result {
        Ok(analysis) => {
            info!(
                "{} succeeded: {} {} analysis scored {}",
                endpoint,
                analysis.tier.as_str(),
                analysis.source.label(),
                analysis.report.total_score
            );
            Ok(Json(AnalysisResponse::from_analysis(
                analysis,
                conversation_id,
            )))
        }
        Err(e) => {
            if e.is_client_error() {
                warn!("Rejected request to {}: {}", endpoint, e);
            } else {
                error!("Error in {}: {}", endpoint, e);
            }
            Err(error_response(&e, conversation_id))
        }
    }
}

pub fn error_response(error: &AnalysisError, conversation_id: Option<String>) -> ApiError {
    let status = if error.is_client_error() {
        Status::BadRequest
    } else {
        Status::InternalServerError
    };

    Custom(
        status,
        Json(StandardErrorResponse::new(
            error.to_string(),
            error.error_code().to_string(),
            suggestions_for(error),
            conversation_id,
        )),
    )
}

fn suggestions_for(error: &AnalysisError) -> Vec<String> {
    let suggestions: &[&str] = match error {
        AnalysisError::MissingInput(_) => &[
            "Paste the full text of your document",
            "Enter the job role you are targeting",
        ],
        AnalysisError::InputTooLong { .. } => &[
            "Remove images, tables and repeated sections from the text",
            "Submit only the most recent and relevant experience",
        ],
        AnalysisError::NotConfigured => &["Contact system administrator"],
        AnalysisError::Upstream { .. } => &[
            "The AI analysis service is temporarily unavailable",
            "Try again in a few moments",
            "Contact support if the problem persists",
        ],
        AnalysisError::Unparseable(_) | AnalysisError::Incomplete(_) => &[
            "Try again in a few moments",
            "Contact support if the problem persists",
        ],
    };

    suggestions.iter().map(|s| s.to_string()).collect()
}
