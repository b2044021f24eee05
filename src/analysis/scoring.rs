// src/analysis/scoring.rs
use serde::Serialize;

use super::types::AnalysisReport;

/// Ceiling for the score a fully optimised document is projected to reach
const PROJECTED_CEILING: u32 = 98;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoreSummary {
    pub total_score: u32,
    pub label: &'static str,
    pub projected_score: u32,
    pub points_available: u32,
}

pub fn score_label(total: u32) -> &'static str {
    if total >= 80 {
        "Excellent"
    } else if total >= 60 {
        "Good"
    } else if total >= 40 {
        "Fair"
    } else {
        "Needs Improvement"
    }
}

pub fn section_band(score: u32, max_score: u32) -> &'static str {
    if max_score == 0 {
        return "weak";
    }
    let percentage = score as f64 / max_score as f64 * 100.0;
    if percentage >= 80.0 {
        "strong"
    } else if percentage >= 60.0 {
        "moderate"
    } else {
        "weak"
    }
}

/// Score the document could reach after applying every suggestion:
/// 85% of the remaining gap, capped at 98 and never below the current score.
pub fn projected_score(total: u32) -> u32 {
    let total = total.min(100);
    let gain = (100 - total) * 85 / 100;
    (total + gain).min(PROJECTED_CEILING).max(total)
}

pub fn summarize(report: &AnalysisReport) -> ScoreSummary {
    let projected = projected_score(report.total_score);
    ScoreSummary {
        total_score: report.total_score,
        label: score_label(report.total_score),
        projected_score: projected,
        points_available: projected - report.total_score.min(projected),
    }
}
