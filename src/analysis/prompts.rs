// src/analysis/prompts.rs
//! Prompt text for the four analysis flavours

use super::rubric::{Rubric, LINKEDIN, RESUME};
use crate::core::CompletionRequest;

const JSON_ONLY: &str = "Always return valid JSON only, no markdown formatting.";

const RESUME_SYSTEM_FREE: &str = "You are an expert ATS resume analyzer.";
const RESUME_SYSTEM_PAID: &str =
    "You are an expert ATS resume analyzer and professional resume writer.";
const LINKEDIN_SYSTEM_FREE: &str = "You are an expert LinkedIn profile optimizer.";
const LINKEDIN_SYSTEM_PAID: &str =
    "You are an expert LinkedIn profile optimizer and professional writer.";

fn system(persona: &str) -> String {
    format!("{} {}", persona, JSON_ONLY)
}

/// Example section lines for the expected JSON, one per rubric section
fn section_examples(rubric: &Rubric, advice_key: &str, advice: &str) -> String {
    rubric
        .sections
        .iter()
        .map(|s| {
            format!(
                "    {{\"name\": \"{}\", \"score\": {}, \"maxScore\": {}, \"{}\": \"{}\"}}",
                s.name,
                (s.max_score * 3 + 3) / 4,
                s.max_score,
                advice_key,
                advice
            )
        })
        .collect::<Vec<_>>()
        .join(",\n")
}

pub fn resume_free(resume_text: &str, job_role: &str) -> CompletionRequest {
    let prompt = format!(
        r#"You are an expert ATS (Applicant Tracking System) resume analyzer. Analyze the following resume for a "{role}" position.

RESUME TEXT:
{text}

{rubric}
Provide a FREE analysis with:
1. Total score out of 100
2. Individual scores for each section (with max points shown)
3. Basic improvement suggestion for each section (1-2 sentences)
4. 3-5 missing skills relevant to {role} (provide actual number based on gap analysis)
5. Top 3 key strengths found in the resume
6. ATS compatibility percentage (0-100%)

Return ONLY valid JSON in this exact format:
{{
  "totalScore": 75,
  "sections": [
{sections}
  ],
  "missingSkills": ["Skill 1", "Skill 2", "Skill 3", "Skill 4"],
  "strengths": ["Strength 1", "Strength 2", "Strength 3"],
  "atsCompatibility": 85
}}"#,
        role = job_role,
        text = resume_text,
        rubric = RESUME.render(job_role),
        sections = section_examples(&RESUME, "suggestion", "One or two sentence improvement."),
    );

    CompletionRequest {
        system: system(RESUME_SYSTEM_FREE),
        prompt,
    }
}

/// Paid resume analysis. With a job description the analysis targets that
/// exact posting and adds keyword matching.
pub fn resume_paid(
    resume_text: &str,
    job_role: &str,
    job_description: Option<&str>,
) -> CompletionRequest {
    let specific = job_description.is_some();
    let from_jd = if specific { " FROM THE JOB DESCRIPTION" } else { "" };

    let jd_section = match job_description {
        Some(jd) => format!(
            "\n\nJOB DESCRIPTION:\n{}\n\nIMPORTANT: This is a SPECIFIC JOB MATCHING analysis. Analyze the resume against THIS EXACT job description. Provide keyword match percentage, identify ALL required skills from the job description that are missing in the resume, and tailor all suggestions to help the candidate match THIS specific job posting.",
            jd
        ),
        None => String::new(),
    };

    let mut deliverables = vec![
        "Total score out of 100".to_string(),
        "Individual scores for each section (with max points shown)".to_string(),
        "DETAILED improvement suggestions for each section (3-5 sentences with specific examples)".to_string(),
        format!("ALL missing skills relevant to {}{} (provide actual number based on gap analysis - let AI decide how many are needed)", job_role, from_jd),
        format!("ALL missing tools relevant to {}{} (provide actual number based on gap analysis - let AI decide how many are needed)", job_role, from_jd),
        format!(
            "A completely rewritten, optimized resume based on findings{}",
            if specific { " tailored to match the specific job description" } else { "" }
        ),
        format!(
            "A tailored cover letter based on the analysis{}",
            if specific { " addressing the specific company and role from the job description" } else { "" }
        ),
    ];
    if specific {
        deliverables.push("Keyword match percentage showing how well the resume matches the job description (0-100%)".to_string());
        deliverables.push("List of exact keywords from the job description that are missing in the resume".to_string());
    }

    let prompt = format!(
        r#"You are an expert ATS (Applicant Tracking System) resume analyzer. Analyze the following resume for a "{role}" position with PREMIUM DETAILED analysis.

RESUME TEXT:
{text}{jd_section}

{rubric}
Provide a PREMIUM PAID analysis with:
{deliverables}

Return ONLY valid JSON in this exact format:
{{
  "totalScore": 75,{keyword_pct}
  "sections": [
{sections}
  ],
  "missingSkills": ["Skill1", "Skill2", ... (AI decides count based on actual gaps)],
  "missingTools": ["Tool1", "Tool2", ... (AI decides count based on actual gaps)],{missing_keywords}
  "optimizedResume": "FULL REWRITTEN RESUME TEXT HERE - properly formatted, ATS-optimized, with all suggestions implemented",
  "coverLetter": "FULL TAILORED COVER LETTER HERE - addresses the role, highlights key achievements, shows enthusiasm"
}}"#,
        role = job_role,
        text = resume_text,
        jd_section = jd_section,
        rubric = RESUME.render(job_role),
        deliverables = numbered(&deliverables),
        keyword_pct = if specific { "\n  \"keywordMatchPercentage\": 78," } else { "" },
        missing_keywords = if specific {
            "\n  \"missingKeywords\": [\"Keyword1\", \"Keyword2\", \"Keyword3\", ... (keywords from job description not in resume)],"
        } else {
            ""
        },
        sections = section_examples(
            &RESUME,
            "detailedSuggestion",
            "Three to five sentences with specific examples."
        ),
    );

    CompletionRequest {
        system: system(RESUME_SYSTEM_PAID),
        prompt,
    }
}

pub fn linkedin_free(profile_text: &str, job_role: &str) -> CompletionRequest {
    let prompt = format!(
        r#"You are an expert LinkedIn profile optimizer. Analyze the following LinkedIn profile for a "{role}" position.

LINKEDIN PROFILE TEXT:
{text}

{rubric}
Provide a FREE analysis with:
1. Total score out of 100
2. Individual scores for each section (with max points shown)
3. Basic improvement suggestion for each section (1-2 sentences)
4. 3-5 missing skills relevant to {role} (provide actual number based on gap analysis)
5. Top 3 key strengths found in the profile
6. LinkedIn profile compatibility percentage (0-100%)

Return ONLY valid JSON in this exact format:
{{
  "totalScore": 75,
  "sections": [
{sections}
  ],
  "missingSkills": ["Skill 1", "Skill 2", "Skill 3", "Skill 4"],
  "strengths": ["Strength 1", "Strength 2", "Strength 3"],
  "linkedInCompatibility": 85
}}"#,
        role = job_role,
        text = profile_text,
        rubric = LINKEDIN.render(job_role),
        sections = section_examples(&LINKEDIN, "suggestion", "One or two sentence improvement."),
    );

    CompletionRequest {
        system: system(LINKEDIN_SYSTEM_FREE),
        prompt,
    }
}

pub fn linkedin_paid(profile_text: &str, job_role: &str) -> CompletionRequest {
    let prompt = format!(
        r#"You are an expert LinkedIn profile optimizer and professional writer. Analyze the following LinkedIn profile for a "{role}" position with PREMIUM DETAILED analysis.

LINKEDIN PROFILE TEXT:
{text}

{rubric}
Provide a PREMIUM PAID analysis with:
1. Total score out of 100
2. Individual scores for each section (with max points shown)
3. DETAILED improvement suggestions for each section (3-5 sentences with specific examples)
4. ALL missing skills relevant to {role} (provide actual number based on gap analysis - let AI decide how many are needed)
5. ALL missing tools relevant to {role} (provide actual number based on gap analysis - let AI decide how many are needed)
6. THREE compelling headline options optimized for {role} (each 120-220 characters)
7. TWO complete About/Summary section rewrites optimized for {role} (each 1200-1500 characters)
8. A tailored cover letter based on the LinkedIn profile analysis

Return ONLY valid JSON in this exact format:
{{
  "totalScore": 75,
  "sections": [
{sections}
  ],
  "missingSkills": ["Skill1", "Skill2", ... (AI decides count based on actual gaps)],
  "missingTools": ["Tool1", "Tool2", ... (AI decides count based on actual gaps)],
  "headlines": [
    "Headline Option 1 - Optimized for {role}",
    "Headline Option 2 - Optimized for {role}",
    "Headline Option 3 - Optimized for {role}"
  ],
  "summaries": [
    "Full About/Summary Option 1 - Complete rewrite optimized for {role} with keywords and compelling narrative",
    "Full About/Summary Option 2 - Alternative rewrite with different angle but equally optimized for {role}"
  ],
  "coverLetter": "FULL TAILORED COVER LETTER HERE - addresses the role, highlights key achievements from LinkedIn profile, shows enthusiasm"
}}"#,
        role = job_role,
        text = profile_text,
        rubric = LINKEDIN.render(job_role),
        sections = section_examples(
            &LINKEDIN,
            "detailedSuggestion",
            "Three to five sentences with specific examples."
        ),
    );

    CompletionRequest {
        system: system(LINKEDIN_SYSTEM_PAID),
        prompt,
    }
}

fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_free_prompt() {
        let request = resume_free("Jane Doe\nRust developer", "DevOps Engineer");
        assert!(request.system.contains("ATS resume analyzer"));
        assert!(request.system.ends_with(JSON_ONLY));
        assert!(request.prompt.contains("for a \"DevOps Engineer\" position"));
        assert!(request.prompt.contains("RESUME TEXT:\nJane Doe\nRust developer"));
        assert!(request.prompt.contains("\"atsCompatibility\": 85"));
        assert!(request.prompt.contains("{\"name\": \"Job Match Score\", \"score\": 23, \"maxScore\": 30"));
        assert!(!request.prompt.contains("optimizedResume"));
    }

    #[test]
    fn test_resume_paid_general_has_no_keyword_matching() {
        let request = resume_paid("resume", "Data Scientist", None);
        assert!(request.prompt.contains("\"optimizedResume\""));
        assert!(request.prompt.contains("7. A tailored cover letter based on the analysis\n"));
        assert!(!request.prompt.contains("JOB DESCRIPTION"));
        assert!(!request.prompt.contains("keywordMatchPercentage"));
        assert!(!request.prompt.contains("missingKeywords"));
    }

    #[test]
    fn test_resume_paid_specific_job() {
        let request = resume_paid("resume", "Data Scientist", Some("We need PyTorch."));
        assert!(request.prompt.contains("JOB DESCRIPTION:\nWe need PyTorch."));
        assert!(request.prompt.contains("\"keywordMatchPercentage\": 78,"));
        assert!(request.prompt.contains("\"missingKeywords\""));
        assert!(request.prompt.contains("9. List of exact keywords from the job description"));
        assert!(request
            .prompt
            .contains("ALL missing skills relevant to Data Scientist FROM THE JOB DESCRIPTION"));
    }

    #[test]
    fn test_linkedin_prompts() {
        let free = linkedin_free("profile", "HR Manager");
        assert!(free.prompt.contains("LINKEDIN SCORING SYSTEM (Total = 100 points):"));
        assert!(free.prompt.contains("\"linkedInCompatibility\": 85"));

        let paid = linkedin_paid("profile", "HR Manager");
        assert!(paid.system.contains("professional writer"));
        assert!(paid.prompt.contains("Headline Option 3 - Optimized for HR Manager"));
        assert!(paid.prompt.contains("\"detailedSuggestion\""));
    }
}
