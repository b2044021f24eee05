// src/web/types.rs - request and response envelopes for the analysis API

use rocket::serde::{Deserialize, Serialize};

use crate::analysis::{summarize, Analysis, AnalysisReport, ScoreSummary, Tier};
use crate::analysis::scoring::section_band;

pub struct ServerConfig {
    pub model: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub model: String,
    pub timestamp: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct AnalysisResponse {
    pub success: bool,
    #[serde(rename = "type")]
    pub tier: Tier,
    pub data: AnalysisReport,
    pub score_summary: ScoreSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_format: Option<DisplayFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DisplayFormat {
    #[serde(rename = "type")]
    pub format_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<DisplaySection>>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DisplaySection {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<String>>,
}

// Request types with conversation_id support
#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardRequest<T> {
    #[serde(flatten)]
    pub data: T,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

// Helper trait for extracting conversation_id
pub trait WithConversationId {
    fn conversation_id(&self) -> Option<String>;
}

impl<T> WithConversationId for StandardRequest<T> {
    fn conversation_id(&self) -> Option<String> {
        self.conversation_id.clone()
    }
}

impl AnalysisResponse {
    pub fn from_analysis(analysis: Analysis, conversation_id: Option<String>) -> Self {
        let display_format = create_display_format(&analysis.report);
        Self {
            success: true,
            tier: analysis.tier,
            score_summary: summarize(&analysis.report),
            data: analysis.report,
            display_format: Some(display_format),
            conversation_id,
        }
    }
}

impl StandardErrorResponse {
    pub fn new(
        error: String,
        error_code: String,
        suggestions: Vec<String>,
        conversation_id: Option<String>,
    ) -> Self {
        Self {
            success: false,
            error,
            error_code,
            suggestions,
            conversation_id,
        }
    }
}

/// One display section per scored rubric section
fn create_display_format(report: &AnalysisReport) -> DisplayFormat {
    let sections = report
        .sections
        .iter()
        .map(|section| DisplaySection {
            title: section.name.clone(),
            content: format!("{}/{}", section.score, section.max_score),
            score: Some(section_band(section.score, section.max_score).to_string()),
            points: section.advice().map(|advice| vec![advice.to_string()]),
        })
        .collect();

    DisplayFormat {
        format_type: "analysis".to_string(),
        sections: Some(sections),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ResumeAnalysisRequest, SectionScore, Source};
    use serde_json::{from_str, to_value, Value};

    #[test]
    fn test_standard_request_flattens_payload() {
        let request: StandardRequest<ResumeAnalysisRequest> = from_str(
            r#"{"resumeText": "cv", "jobRole": "Account Executive", "conversation_id": "c-1"}"#,
        )
        .unwrap();
        assert_eq!(request.data.resume_text.as_deref(), Some("cv"));
        assert_eq!(request.conversation_id(), Some("c-1".to_string()));
    }

    #[test]
    fn test_analysis_response_shape() {
        let analysis = Analysis {
            source: Source::Resume,
            tier: Tier::Free,
            report: AnalysisReport {
                total_score: 62,
                sections: vec![SectionScore {
                    name: "Job Match Score".to_string(),
                    score: 25,
                    max_score: 30,
                    suggestion: Some("Add role keywords.".to_string()),
                    detailed_suggestion: None,
                }],
                missing_skills: vec!["SQL".to_string()],
                strengths: vec![],
                ats_compatibility: Some(70),
                linked_in_compatibility: None,
                missing_tools: vec![],
                keyword_match_percentage: None,
                missing_keywords: vec![],
                optimized_resume: None,
                cover_letter: None,
                headlines: vec![],
                summaries: vec![],
            },
        };

        let value: Value = to_value(AnalysisResponse::from_analysis(analysis, None)).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["type"], "free");
        assert_eq!(value["data"]["totalScore"], 62);
        assert_eq!(value["score_summary"]["label"], "Good");
        assert_eq!(value["score_summary"]["projected_score"], 94);
        assert_eq!(value["display_format"]["sections"][0]["content"], "25/30");
        assert_eq!(value["display_format"]["sections"][0]["score"], "strong");
        assert!(value.get("conversation_id").is_none());
    }
}
