// src/analysis/types.rs
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

/// What kind of document is being scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Source {
    Resume,
    #[value(name = "linkedin")]
    LinkedIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Paid,
}

impl Source {
    pub fn label(&self) -> &'static str {
        match self {
            Source::Resume => "resume",
            Source::LinkedIn => "LinkedIn profile",
        }
    }
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Paid => "paid",
        }
    }
}

// Request fields are optional so that a missing field becomes a validation
// error with a readable message rather than a body-parsing failure.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysisRequest {
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub job_role: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub is_specific_job: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInAnalysisRequest {
    #[serde(default, rename = "linkedInText")]
    pub linkedin_text: Option<String>,
    #[serde(default)]
    pub job_role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionScore {
    pub name: String,
    #[serde(deserialize_with = "lenient_score")]
    pub score: u32,
    /// Zero when the model left it out; filled in during normalization
    #[serde(default, deserialize_with = "lenient_score")]
    pub max_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_suggestion: Option<String>,
}

impl SectionScore {
    pub fn advice(&self) -> Option<&str> {
        self.detailed_suggestion
            .as_deref()
            .or(self.suggestion.as_deref())
    }
}

/// Model output for every analysis flavour; tier-specific fields stay empty
/// when the flavour does not ask for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    #[serde(deserialize_with = "lenient_score")]
    pub total_score: u32,
    pub sections: Vec<SectionScore>,
    #[serde(default)]
    pub missing_skills: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strengths: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub ats_compatibility: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub linked_in_compatibility: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_tools: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub keyword_match_percentage: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimized_resume: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headlines: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub summaries: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

fn number_to_score(raw: RawNumber) -> Result<u32, String> {
    let value = match raw {
        RawNumber::Int(v) => v as f64,
        RawNumber::Float(v) => v,
        RawNumber::Text(s) => {
            let trimmed = s.trim().trim_end_matches('%').trim();
            trimmed
                .parse::<f64>()
                .map_err(|_| format!("expected a number, found {:?}", s))?
        }
    };

    if !value.is_finite() {
        return Err(format!("score is not finite: {}", value));
    }
    Ok(value.round().max(0.0) as u32)
}

/// Accepts 72, 72.4, "72" and "72%"
fn lenient_score<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawNumber::deserialize(deserializer)?;
    number_to_score(raw).map_err(serde::de::Error::custom)
}

fn lenient_opt_score<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawNumber>::deserialize(deserializer)? {
        Some(raw) => number_to_score(raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_uses_camel_case() {
        let request: ResumeAnalysisRequest = serde_json::from_value(json!({
            "resumeText": "text",
            "jobRole": "Product Manager",
            "isSpecificJob": true
        }))
        .unwrap();
        assert_eq!(request.resume_text.as_deref(), Some("text"));
        assert_eq!(request.is_specific_job, Some(true));
        assert!(request.job_description.is_none());

        let linkedin: LinkedInAnalysisRequest =
            serde_json::from_value(json!({"linkedInText": "profile"})).unwrap();
        assert_eq!(linkedin.linkedin_text.as_deref(), Some("profile"));
        assert!(linkedin.job_role.is_none());
    }

    #[test]
    fn test_report_accepts_loose_numbers() {
        let report: AnalysisReport = serde_json::from_value(json!({
            "totalScore": "72%",
            "sections": [
                {"name": "Formatting", "score": 2.6, "maxScore": "3", "suggestion": "Fine."},
                {"name": "Education", "score": -1, "maxScore": 1}
            ],
            "linkedInCompatibility": 85.2
        }))
        .unwrap();

        assert_eq!(report.total_score, 72);
        assert_eq!(report.sections[0].score, 3);
        assert_eq!(report.sections[0].max_score, 3);
        assert_eq!(report.sections[1].score, 0);
        assert_eq!(report.linked_in_compatibility, Some(85));
        assert!(report.missing_skills.is_empty());
        assert!(report.ats_compatibility.is_none());
    }

    #[test]
    fn test_section_without_max_score_still_parses() {
        let report: AnalysisReport = serde_json::from_value(json!({
            "totalScore": 70,
            "sections": [{"name": "Headline Optimization", "score": 4, "suggestion": "x"}],
            "missingSkills": []
        }))
        .unwrap();
        assert_eq!(report.sections[0].score, 4);
        assert_eq!(report.sections[0].max_score, 0);
    }

    #[test]
    fn test_report_rejects_non_numeric_score() {
        let result: Result<AnalysisReport, _> = serde_json::from_value(json!({
            "totalScore": "high",
            "sections": []
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_report_serializes_only_present_fields() {
        let report = AnalysisReport {
            total_score: 80,
            sections: vec![],
            missing_skills: vec!["Rust".to_string()],
            strengths: vec![],
            ats_compatibility: Some(90),
            linked_in_compatibility: None,
            missing_tools: vec![],
            keyword_match_percentage: None,
            missing_keywords: vec![],
            optimized_resume: None,
            cover_letter: None,
            headlines: vec![],
            summaries: vec![],
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(
            value,
            json!({
                "totalScore": 80,
                "sections": [],
                "missingSkills": ["Rust"],
                "atsCompatibility": 90
            })
        );
    }
}
