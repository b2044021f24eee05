// src/utils.rs
use anyhow::{Context, Result};
use std::path::Path;

const PREVIEW_CHARS: usize = 200;

/// First characters of a model response, for log lines
pub fn preview(text: &str) -> &str {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Trimmed value of an optional form field; blank counts as absent
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Collapse runs of whitespace in short single-line fields such as job roles
pub fn normalize_job_role(role: &str) -> String {
    role.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Read file content as string with proper error context
pub async fn read_file_content(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "é".repeat(300);
        assert_eq!(preview(&long).chars().count(), 200);
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  Data Scientist ")), Some("Data Scientist"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_normalize_job_role() {
        assert_eq!(normalize_job_role("  Senior   DevOps\nEngineer "), "Senior DevOps Engineer");
    }
}
