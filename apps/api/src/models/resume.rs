use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A structured education line as produced by the parsing service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EducationEntry {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

/// Education arrives either as free text or as a structured entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EducationRecord {
    Text(String),
    Entry(EducationEntry),
}

impl EducationRecord {
    pub fn as_text(&self) -> String {
        match self {
            EducationRecord::Text(text) => text.clone(),
            EducationRecord::Entry(entry) => {
                let mut parts = vec![entry.degree.as_str()];
                if let Some(field) = entry.field.as_deref() {
                    parts.push(field);
                }
                if let Some(institution) = entry.institution.as_deref() {
                    parts.push(institution);
                }
                parts
                    .into_iter()
                    .filter(|p| !p.trim().is_empty())
                    .collect::<Vec<_>>()
                    .join(" ")
            }
        }
    }
}

/// Candidate snapshot handed to the scorer. Fields are already extracted by the
/// parsing collaborator; the scorer never reads raw documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resume {
    pub id: Uuid,
    pub candidate_id: Uuid,
    #[serde(default)]
    pub job_id: Option<Uuid>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_years: Option<f64>,
    #[serde(default)]
    pub education: Vec<EducationRecord>,
    #[serde(default)]
    pub summary: Option<String>,
}

impl Resume {
    /// Missing experience counts as zero years.
    pub fn experience_years_or_zero(&self) -> f64 {
        self.experience_years.unwrap_or(0.0)
    }

    /// Free text searched for criteria keywords: summary, education, then skills.
    pub fn searchable_text(&self) -> String {
        let mut chunks: Vec<String> = Vec::new();
        if let Some(summary) = self.summary.as_deref() {
            chunks.push(summary.to_string());
        }
        chunks.extend(self.education.iter().map(EducationRecord::as_text));
        chunks.extend(self.skills.iter().cloned());
        chunks.join("\n")
    }
}
