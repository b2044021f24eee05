// src/analysis/rubric.rs
//! Scoring rubrics shared by prompt construction and report validation

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RubricSection {
    pub name: &'static str,
    pub max_score: u32,
    pub criteria: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Rubric {
    pub title: &'static str,
    pub sections: &'static [RubricSection],
}

const fn section(name: &'static str, max_score: u32, criteria: &'static str) -> RubricSection {
    RubricSection {
        name,
        max_score,
        criteria,
    }
}

// `{role}` in criteria is replaced with the requested job role when rendered.
pub const RESUME: Rubric = Rubric {
    title: "SCORING SYSTEM",
    sections: &[
        section("Job Match Score", 30, "Keyword + semantic match to {role}"),
        section("Achievements/Impact Score", 20, "Quantifiable results and impact"),
        section("Experience Quality Score", 15, "Relevance and quality of experience"),
        section("ATS Parsing/Compatibility", 12, "Format, structure, parsing friendliness"),
        section("Skills Match Score", 10, "Hard skills relevant to {role}"),
        section("Readability & Clarity", 5, "Clear, concise language"),
        section("Professional Summary", 3, "Quality of summary/objective"),
        section("Formatting", 3, "Layout, consistency, visual appeal"),
        section("Contact Info", 1, "Complete and professional contact details"),
        section("Education", 1, "Relevant education credentials"),
    ],
};

pub const LINKEDIN: Rubric = Rubric {
    title: "LINKEDIN SCORING SYSTEM",
    sections: &[
        section("Experience Relevance & Quality", 25, "Most important, match role responsibilities"),
        section("Skills Match (Role-Based)", 20, "Hard skills + role keywords"),
        section("About/Summary Optimization", 15, "Strong keyword + relevance indicator"),
        section("Achievements / Impact Metrics", 12, "Drives hiring decisions"),
        section("Keywords + Role SEO Match", 10, "Ranking power for LinkedIn search"),
        section("Headline Optimization", 6, "Very impactful in PDF + SEO"),
        section("Education Quality & Relevance", 4, "Important but not heavy-weight"),
        section("Certifications (if relevant)", 4, "Matters for tech/finance roles"),
        section("Contact Info + Custom URL", 2, "Basic completeness"),
        section("Projects / Volunteer / Extras", 2, "Bonus credibility"),
    ],
};

impl Rubric {
    pub fn total(&self) -> u32 {
        self.sections.iter().map(|s| s.max_score).sum()
    }

    /// Case-insensitive lookup; models sometimes change capitalisation
    pub fn find(&self, name: &str) -> Option<&RubricSection> {
        let name = name.trim();
        self.sections
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn max_for(&self, name: &str) -> Option<u32> {
        self.find(name).map(|s| s.max_score)
    }

    /// Numbered rubric block embedded in prompts
    pub fn render(&self, role: &str) -> String {
        let mut block = format!("{} (Total = {} points):\n", self.title, self.total());
        for (i, s) in self.sections.iter().enumerate() {
            let points = if s.max_score == 1 { "point" } else { "points" };
            block.push_str(&format!(
                "{}. {}: {} {} - {}\n",
                i + 1,
                s.name,
                s.max_score,
                points,
                s.criteria.replace("{role}", role)
            ));
        }
        block
    }
}
