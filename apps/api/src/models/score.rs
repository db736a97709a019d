use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed maximum of each sub-score. A perfect match on every dimension scores
/// `total()`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoreCaps {
    pub skills: f64,
    pub experience: f64,
    pub keywords: f64,
}

impl Default for ScoreCaps {
    fn default() -> Self {
        Self {
            skills: 60.0,
            experience: 25.0,
            keywords: 15.0,
        }
    }
}

impl ScoreCaps {
    pub fn total(&self) -> f64 {
        self.skills + self.experience + self.keywords
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    HighlyRecommended,
    Recommended,
    MaybeConsider,
    NotRecommended,
}

impl Recommendation {
    /// Bands are fractions of the maximum score: 85%, 70%, 50%.
    /// An ineligible resume is never recommended.
    pub fn classify(total_score: f64, max_score: f64, eligible: bool) -> Self {
        if !eligible || max_score <= 0.0 {
            return Recommendation::NotRecommended;
        }
        match total_score / max_score {
            r if r >= 0.85 => Recommendation::HighlyRecommended,
            r if r >= 0.70 => Recommendation::Recommended,
            r if r >= 0.50 => Recommendation::MaybeConsider,
            _ => Recommendation::NotRecommended,
        }
    }
}

/// Result of scoring one resume against one criteria set. Never mutated; a
/// re-score produces a new value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResumeScore {
    pub resume_id: Uuid,
    pub criteria_id: Uuid,
    /// Always `skills_score + experience_score + keyword_score`.
    pub total_score: f64,
    pub skills_score: f64,
    pub experience_score: f64,
    pub keyword_score: f64,
    pub matching_skills: Vec<String>,
    /// Mandatory skills the resume lacks. Non-empty means disqualified.
    pub missing_skills: Vec<String>,
    pub matched_keywords: Vec<String>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub eligible: bool,
    pub recommendation: Recommendation,
}
