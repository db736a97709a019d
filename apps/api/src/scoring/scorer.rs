//! Resume scoring: pluggable, trait-based scorer that measures one resume
//! against one job's criteria set.
//!
//! Default: `WeightedScorer` (pure, deterministic, no I/O).
//! `AppState` holds an `Arc<dyn ResumeScorer>` so batch ranking and the
//! handlers never depend on a concrete backend.

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use crate::models::criteria::CriteriaSet;
use crate::models::resume::Resume;
use crate::models::score::{Recommendation, ResumeScore, ScoreCaps};
use crate::scoring::feedback::{build_improvements, build_strengths, MatchSummary};
use crate::scoring::normalize::{normalize_skill, normalize_text};
use crate::scoring::validation::{validate_criteria, ValidationError};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScoringError {
    #[error("criteria validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid {subject}: {reason}")]
    InvalidInput {
        subject: &'static str,
        reason: String,
    },
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching ranking or
/// handler code. Implementations must be pure: batch ranking calls
/// `score_resume` from several worker threads at once.
pub trait ResumeScorer: Send + Sync {
    /// Label reported to API callers, for transparency.
    fn backend(&self) -> &'static str;

    fn caps(&self) -> ScoreCaps;

    fn score_resume(
        &self,
        criteria: &CriteriaSet,
        resume: &Resume,
    ) -> Result<ResumeScore, ScoringError>;
}

// ────────────────────────────────────────────────────────────────────────────
// WeightedScorer (default implementation)
// ────────────────────────────────────────────────────────────────────────────

/// Weighted skills / experience / keyword scorer.
///
/// Algorithm:
/// 1. Skills: every criteria skill found in the resume (after normalization)
///    awards its weight. `skills_score = awarded / Σweights × caps.skills`,
///    0 when all weights are 0. Absent mandatory skills disqualify.
/// 2. Experience: fraction = 1 when the minimum is met or is 0, else
///    `years / min`. `experience_score = fraction × caps.experience`, 0 when
///    `experience_weight` is 0.
/// 3. Keywords: distinct keywords found as case-insensitive substrings of the
///    resume text. `keyword_score = matched / total × caps.keywords`.
/// 4. Sub-scores are rounded to 2 decimals; `total_score` is their sum.
#[derive(Debug, Clone, Default)]
pub struct WeightedScorer {
    caps: ScoreCaps,
}

impl WeightedScorer {
    pub fn new(caps: ScoreCaps) -> Self {
        Self { caps }
    }
}

impl ResumeScorer for WeightedScorer {
    fn backend(&self) -> &'static str {
        "weighted"
    }

    fn caps(&self) -> ScoreCaps {
        self.caps
    }

    fn score_resume(
        &self,
        criteria: &CriteriaSet,
        resume: &Resume,
    ) -> Result<ResumeScore, ScoringError> {
        validate_criteria(criteria).map_err(|e| ScoringError::InvalidInput {
            subject: "criteria",
            reason: e.to_string(),
        })?;
        check_resume(resume)?;

        let score = compute_weighted_score(&self.caps, criteria, resume);
        debug!(
            resume_id = %score.resume_id,
            criteria_id = %score.criteria_id,
            total_score = score.total_score,
            eligible = score.eligible,
            "resume scored"
        );
        Ok(score)
    }
}

fn check_resume(resume: &Resume) -> Result<(), ScoringError> {
    if let Some(years) = resume.experience_years {
        if !years.is_finite() || years < 0.0 {
            return Err(ScoringError::InvalidInput {
                subject: "resume",
                reason: format!("experience_years must be a finite number >= 0, got {years}"),
            });
        }
    }
    if let Some(i) = resume.skills.iter().position(|s| s.trim().is_empty()) {
        return Err(ScoringError::InvalidInput {
            subject: "resume",
            reason: format!("skills[{i}] must not be blank"),
        });
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Core weighted algorithm
// ────────────────────────────────────────────────────────────────────────────

fn compute_weighted_score(
    caps: &ScoreCaps,
    criteria: &CriteriaSet,
    resume: &Resume,
) -> ResumeScore {
    let resume_skills: HashSet<String> =
        resume.skills.iter().map(|s| normalize_skill(s)).collect();

    let mut matching_skills = Vec::new();
    let mut missing_skills = Vec::new();
    let mut unmatched_optional_skills = Vec::new();
    let mut awarded = 0.0_f64;

    for skill in &criteria.skills {
        let display = skill.skill_name.trim().to_string();
        if resume_skills.contains(&normalize_skill(&skill.skill_name)) {
            awarded += skill.weight;
            matching_skills.push(display);
        } else if skill.mandatory {
            missing_skills.push(display);
        } else {
            unmatched_optional_skills.push(display);
        }
    }

    let skills_score = round2(scale(awarded, criteria.total_skill_weight(), caps.skills));

    let years = resume.experience_years_or_zero();
    let fraction = experience_fraction(years, criteria.min_experience_years);
    let experience_score = round2(scale(
        fraction * criteria.experience_weight,
        criteria.experience_weight,
        caps.experience,
    ));

    let (matched_keywords, keyword_count) =
        match_keywords(&criteria.keywords, &resume.searchable_text());
    let keyword_score = round2(scale(
        matched_keywords.len() as f64,
        keyword_count as f64,
        caps.keywords,
    ));

    let total_score = skills_score + experience_score + keyword_score;
    let eligible = missing_skills.is_empty();

    let summary = MatchSummary {
        matching_skills: &matching_skills,
        missing_skills: &missing_skills,
        unmatched_optional_skills: &unmatched_optional_skills,
        experience_years: years,
        min_experience_years: criteria.min_experience_years,
        matched_keywords: &matched_keywords,
        keyword_count,
    };
    let strengths = build_strengths(&summary);
    let improvements = build_improvements(&summary);

    ResumeScore {
        resume_id: resume.id,
        criteria_id: criteria.id,
        total_score,
        skills_score,
        experience_score,
        keyword_score,
        matching_skills,
        missing_skills,
        matched_keywords,
        strengths,
        improvements,
        eligible,
        recommendation: Recommendation::classify(total_score, caps.total(), eligible),
    }
}

/// Share of the experience requirement met, in [0, 1]. A zero minimum is
/// always satisfied.
fn experience_fraction(years: f64, min_years: f64) -> f64 {
    if min_years <= 0.0 || years >= min_years {
        1.0
    } else {
        (years / min_years).clamp(0.0, 1.0)
    }
}

/// Returns the matched keywords (first spelling, criteria order) and the number
/// of distinct keywords considered.
fn match_keywords(keywords: &[String], text: &str) -> (Vec<String>, usize) {
    let haystack = normalize_text(text);
    let mut seen = HashSet::new();
    let mut matched = Vec::new();

    for keyword in keywords {
        let needle = normalize_text(keyword);
        if needle.is_empty() || !seen.insert(needle.clone()) {
            continue;
        }
        if haystack.contains(&needle) {
            matched.push(keyword.trim().to_string());
        }
    }

    (matched, seen.len())
}

fn scale(points: f64, possible: f64, cap: f64) -> f64 {
    if possible > 0.0 {
        (points / possible).clamp(0.0, 1.0) * cap
    } else {
        0.0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
