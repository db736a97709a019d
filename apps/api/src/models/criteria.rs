use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One weighted skill requirement inside a criteria set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CriteriaSkill {
    pub skill_name: String,
    /// Relative importance. Only the ratio to the other skill weights matters.
    pub weight: f64,
    #[serde(default)]
    pub mandatory: bool,
}

/// A job's scoring configuration. Read-only while resumes are scored against it;
/// editing it invalidates scores computed earlier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CriteriaSet {
    pub id: Uuid,
    pub job_id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    pub skills: Vec<CriteriaSkill>,
    #[serde(default)]
    pub min_experience_years: f64,
    #[serde(default)]
    pub experience_weight: f64,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl CriteriaSet {
    pub fn total_skill_weight(&self) -> f64 {
        self.skills.iter().map(|s| s.weight).sum()
    }

    pub fn mandatory_skills(&self) -> impl Iterator<Item = &CriteriaSkill> {
        self.skills.iter().filter(|s| s.mandatory)
    }
}
