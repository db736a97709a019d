use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::criteria::CriteriaSet;
use crate::models::score::ScoreCaps;
use crate::scoring::normalize::{normalize_skill, normalize_text};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Every problem found in a payload, not just the first one.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
#[error("{} invalid field(s): {}", .violations.len(), summarize(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Default)]
struct Violations(Vec<FieldViolation>);

impl Violations {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldViolation {
            field: field.into(),
            message: message.into(),
        });
    }

    fn check_non_negative(&mut self, field: impl Into<String>, value: f64) {
        if !value.is_finite() {
            self.push(field, "must be a finite number");
        } else if value < 0.0 {
            self.push(field, "must be >= 0");
        }
    }

    fn into_result(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations: self.0 })
        }
    }
}

/// Checks that a criteria set is well-formed before anything is scored against it.
///
/// Rules:
/// - at least one skill
/// - skill names non-blank and unique after normalization (case, whitespace, aliases)
/// - skill weights, `min_experience_years` and `experience_weight` finite and >= 0
/// - the total skill weight finite as well (huge weights can overflow the sum)
/// - keywords non-blank (a blank keyword would match every resume)
pub fn validate_criteria(criteria: &CriteriaSet) -> Result<(), ValidationError> {
    let mut violations = Violations::default();

    if criteria.skills.is_empty() {
        violations.push("skills", "at least one skill is required");
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    for (i, skill) in criteria.skills.iter().enumerate() {
        let normalized = normalize_skill(&skill.skill_name);
        if normalized.is_empty() {
            violations.push(format!("skills[{i}].skill_name"), "must not be blank");
        } else if let Some(first) = seen.get(&normalized) {
            violations.push(
                format!("skills[{i}].skill_name"),
                format!(
                    "duplicates skills[{first}] ('{}')",
                    criteria.skills[*first].skill_name.trim()
                ),
            );
        } else {
            seen.insert(normalized, i);
        }

        violations.check_non_negative(format!("skills[{i}].weight"), skill.weight);
    }

    let weights_ok = criteria
        .skills
        .iter()
        .all(|s| s.weight.is_finite() && s.weight >= 0.0);
    if weights_ok && !criteria.total_skill_weight().is_finite() {
        violations.push("skills", "sum of skill weights must be a finite number");
    }

    violations.check_non_negative("min_experience_years", criteria.min_experience_years);
    violations.check_non_negative("experience_weight", criteria.experience_weight);

    for (i, keyword) in criteria.keywords.iter().enumerate() {
        if normalize_text(keyword).is_empty() {
            violations.push(format!("keywords[{i}]"), "must not be blank");
        }
    }

    violations.into_result()
}

/// Checks the per-dimension caps loaded from configuration.
pub fn validate_caps(caps: &ScoreCaps) -> Result<(), ValidationError> {
    let mut violations = Violations::default();
    violations.check_non_negative("caps.skills", caps.skills);
    violations.check_non_negative("caps.experience", caps.experience);
    violations.check_non_negative("caps.keywords", caps.keywords);
    if violations.0.is_empty() && caps.total() <= 0.0 {
        violations.push("caps", "at least one cap must be positive");
    }
    violations.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::criteria::CriteriaSkill;
    use uuid::Uuid;

    fn skill(name: &str, weight: f64, mandatory: bool) -> CriteriaSkill {
        CriteriaSkill {
            skill_name: name.to_string(),
            weight,
            mandatory,
        }
    }

    fn criteria(skills: Vec<CriteriaSkill>) -> CriteriaSet {
        CriteriaSet {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            name: None,
            skills,
            min_experience_years: 2.0,
            experience_weight: 20.0,
            keywords: vec!["mentoring".to_string()],
        }
    }

    #[test]
    fn test_valid_criteria_passes() {
        let c = criteria(vec![skill("Python", 50.0, true), skill("AWS", 50.0, false)]);
        assert!(validate_criteria(&c).is_ok());
    }

    #[test]
    fn test_zero_weights_are_allowed() {
        let c = criteria(vec![skill("Python", 0.0, false)]);
        assert!(validate_criteria(&c).is_ok());
    }

    #[test]
    fn test_empty_skills_rejected() {
        let err = validate_criteria(&criteria(vec![])).unwrap_err();
        assert!(err.has_field("skills"));
    }

    #[test]
    fn test_collects_every_violation() {
        let mut c = criteria(vec![
            skill("  ", 10.0, false),
            skill("Java", -1.0, true),
            skill("java", 5.0, false),
        ]);
        c.min_experience_years = -3.0;
        c.experience_weight = f64::NAN;
        c.keywords.push(" ".to_string());

        let err = validate_criteria(&c).unwrap_err();
        assert_eq!(err.violations.len(), 6, "{err}");
        assert!(err.has_field("skills[0].skill_name"));
        assert!(err.has_field("skills[1].weight"));
        assert!(err.has_field("skills[2].skill_name"));
        assert!(err.has_field("min_experience_years"));
        assert!(err.has_field("experience_weight"));
        assert!(err.has_field("keywords[1]"));
    }

    #[test]
    fn test_duplicate_detection_is_case_insensitive() {
        let c = criteria(vec![skill("Docker", 1.0, false), skill(" DOCKER ", 1.0, false)]);
        let err = validate_criteria(&c).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert!(err.violations[0].message.contains("skills[0]"));
    }

    #[test]
    fn test_alias_spellings_count_as_duplicates() {
        let c = criteria(vec![skill("JavaScript", 1.0, false), skill("JS", 1.0, false)]);
        assert!(validate_criteria(&c).is_err());
    }

    #[test]
    fn test_infinite_weight_rejected() {
        let c = criteria(vec![skill("Rust", f64::INFINITY, false)]);
        let err = validate_criteria(&c).unwrap_err();
        assert_eq!(err.violations[0].message, "must be a finite number");
    }

    #[test]
    fn test_overflowing_weight_sum_rejected() {
        let c = criteria(vec![skill("Rust", 1e308, false), skill("Go", 1e308, true)]);
        let err = validate_criteria(&c).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert!(err.has_field("skills"));
        assert_eq!(
            err.violations[0].message,
            "sum of skill weights must be a finite number"
        );
    }

    #[test]
    fn test_large_finite_weight_sum_accepted() {
        let c = criteria(vec![skill("Rust", 1e307, false), skill("Go", 1e307, true)]);
        assert!(validate_criteria(&c).is_ok());
    }

    #[test]
    fn test_error_message_lists_fields() {
        let err = validate_criteria(&criteria(vec![])).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("1 invalid field(s)"));
        assert!(message.contains("skills at least one skill is required"));
    }

    #[test]
    fn test_default_caps_valid() {
        assert!(validate_caps(&ScoreCaps::default()).is_ok());
    }

    #[test]
    fn test_negative_and_all_zero_caps_rejected() {
        let negative = ScoreCaps {
            skills: -1.0,
            experience: 25.0,
            keywords: 15.0,
        };
        assert!(validate_caps(&negative).unwrap_err().has_field("caps.skills"));

        let zero = ScoreCaps {
            skills: 0.0,
            experience: 0.0,
            keywords: 0.0,
        };
        assert!(validate_caps(&zero).unwrap_err().has_field("caps"));
    }
}
