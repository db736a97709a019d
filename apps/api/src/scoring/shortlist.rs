//! Shortlist: batch-scores a job's resumes and ranks them.
//!
//! Resumes are scored in parallel on the rayon pool; the final order comes
//! from a deterministic sort, so results never depend on thread scheduling.
//! Callers on the async runtime must run this inside
//! `tokio::task::spawn_blocking`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::criteria::CriteriaSet;
use crate::models::resume::Resume;
use crate::models::score::ResumeScore;
use crate::scoring::scorer::{ResumeScorer, ScoringError};
use crate::scoring::validation::{validate_criteria, FieldViolation, ValidationError};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Cooperative cancellation flag, checked between individual resumes.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShortlistOptions {
    /// Minimum `total_score` to be shortlisted. `None` keeps every eligible resume.
    pub threshold: Option<f64>,
    /// Maximum shortlist length. `None` or 0 means unlimited.
    pub max_results: Option<usize>,
}

/// A resume that could not be scored. Reported separately, never ranked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringFailure {
    pub resume_id: Uuid,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShortlistSummary {
    pub total: usize,
    pub scored: usize,
    pub eligible: usize,
    pub shortlisted: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShortlistOutcome {
    pub criteria_id: Uuid,
    /// Eligible resumes that pass the threshold, best first.
    pub shortlist: Vec<ResumeScore>,
    /// Every successful score, disqualified ones included, best first. Kept for audit.
    pub ranked: Vec<ResumeScore>,
    pub failures: Vec<ScoringFailure>,
    /// Resumes left unscored because the batch was cancelled.
    pub skipped: Vec<Uuid>,
    pub cancelled: bool,
    pub summary: ShortlistSummary,
}

enum Slot {
    Scored(ResumeScore),
    Failed(ScoringFailure),
    Skipped(Uuid),
}

// ────────────────────────────────────────────────────────────────────────────
// Ranking algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Scores every resume against `criteria` and returns the ranked shortlist.
///
/// Algorithm:
/// 1. Validate criteria and options once; on failure nothing is scored
/// 2. Score resumes independently in parallel; failures are isolated
/// 3. Sort all scores by descending `total_score`, ties by ascending resume id
/// 4. Shortlist = eligible scores at or above the threshold, truncated to `max_results`
pub fn rank_and_shortlist(
    scorer: &dyn ResumeScorer,
    criteria: &CriteriaSet,
    resumes: &[Resume],
    options: &ShortlistOptions,
    cancel: &CancelToken,
) -> Result<ShortlistOutcome, ScoringError> {
    validate_criteria(criteria)?;
    validate_options(options)?;

    let slots: Vec<Slot> = resumes
        .par_iter()
        .map(|resume| {
            if cancel.is_cancelled() {
                return Slot::Skipped(resume.id);
            }
            match scorer.score_resume(criteria, resume) {
                Ok(score) => Slot::Scored(score),
                Err(e) => {
                    warn!(resume_id = %resume.id, error = %e, "resume could not be scored");
                    Slot::Failed(ScoringFailure {
                        resume_id: resume.id,
                        reason: e.to_string(),
                    })
                }
            }
        })
        .collect();

    let mut ranked = Vec::new();
    let mut failures = Vec::new();
    let mut skipped = Vec::new();
    for slot in slots {
        match slot {
            Slot::Scored(score) => ranked.push(score),
            Slot::Failed(failure) => failures.push(failure),
            Slot::Skipped(id) => skipped.push(id),
        }
    }

    sort_ranked(&mut ranked);
    let shortlist = select_shortlist(&ranked, options);

    let summary = ShortlistSummary {
        total: resumes.len(),
        scored: ranked.len(),
        eligible: ranked.iter().filter(|s| s.eligible).count(),
        shortlisted: shortlist.len(),
        failed: failures.len(),
        skipped: skipped.len(),
    };
    let cancelled = !skipped.is_empty();

    info!(
        criteria_id = %criteria.id,
        total = summary.total,
        scored = summary.scored,
        eligible = summary.eligible,
        shortlisted = summary.shortlisted,
        failed = summary.failed,
        skipped = summary.skipped,
        "shortlist computed"
    );

    Ok(ShortlistOutcome {
        criteria_id: criteria.id,
        shortlist,
        ranked,
        failures,
        skipped,
        cancelled,
        summary,
    })
}

/// Descending total score, then ascending resume id.
pub fn sort_ranked(scores: &mut [ResumeScore]) {
    scores.sort_by(|a, b| {
        b.total_score
            .total_cmp(&a.total_score)
            .then_with(|| a.resume_id.cmp(&b.resume_id))
    });
}

fn select_shortlist(ranked: &[ResumeScore], options: &ShortlistOptions) -> Vec<ResumeScore> {
    let limit = match options.max_results {
        Some(0) | None => usize::MAX,
        Some(n) => n,
    };

    ranked
        .iter()
        .filter(|s| s.eligible)
        .filter(|s| options.threshold.map_or(true, |t| s.total_score >= t))
        .take(limit)
        .cloned()
        .collect()
}

fn validate_options(options: &ShortlistOptions) -> Result<(), ValidationError> {
    match options.threshold {
        Some(t) if !t.is_finite() || t < 0.0 => Err(ValidationError {
            violations: vec![FieldViolation {
                field: "threshold".to_string(),
                message: "must be a finite number >= 0".to_string(),
            }],
        }),
        _ => Ok(()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::criteria::CriteriaSkill;
    use crate::scoring::scorer::WeightedScorer;

    fn criteria() -> CriteriaSet {
        CriteriaSet {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            name: None,
            skills: vec![
                CriteriaSkill {
                    skill_name: "Rust".to_string(),
                    weight: 60.0,
                    mandatory: true,
                },
                CriteriaSkill {
                    skill_name: "Postgres".to_string(),
                    weight: 40.0,
                    mandatory: false,
                },
            ],
            min_experience_years: 4.0,
            experience_weight: 25.0,
            keywords: vec!["open source".to_string()],
        }
    }

    fn resume(id: u128, skills: &[&str], years: f64) -> Resume {
        Resume {
            id: Uuid::from_u128(id),
            candidate_id: Uuid::from_u128(1000 + id),
            job_id: None,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            experience_years: Some(years),
            education: vec![],
            summary: None,
        }
    }

    fn run(resumes: &[Resume], options: &ShortlistOptions) -> ShortlistOutcome {
        rank_and_shortlist(
            &WeightedScorer::default(),
            &criteria(),
            resumes,
            options,
            &CancelToken::new(),
        )
        .unwrap()
    }

    fn ids(scores: &[ResumeScore]) -> Vec<u128> {
        scores.iter().map(|s| s.resume_id.as_u128()).collect()
    }

    #[test]
    fn test_ranked_descending_by_total() {
        let resumes = vec![
            resume(1, &["Rust"], 1.0),
            resume(2, &["Rust", "Postgres"], 6.0),
            resume(3, &["Rust", "Postgres"], 2.0),
        ];
        let outcome = run(&resumes, &ShortlistOptions::default());
        assert_eq!(ids(&outcome.ranked), vec![2, 3, 1]);
        assert_eq!(ids(&outcome.shortlist), vec![2, 3, 1]);
    }

    #[test]
    fn test_ties_broken_by_ascending_id() {
        let resumes = vec![
            resume(9, &["Rust"], 4.0),
            resume(3, &["Rust"], 4.0),
            resume(5, &["Rust"], 4.0),
        ];
        let outcome = run(&resumes, &ShortlistOptions::default());
        assert_eq!(ids(&outcome.ranked), vec![3, 5, 9]);
    }

    #[test]
    fn test_ineligible_kept_for_audit_but_not_shortlisted() {
        let resumes = vec![
            resume(1, &["Postgres"], 10.0),
            resume(2, &["Rust"], 1.0),
        ];
        let outcome = run(&resumes, &ShortlistOptions::default());
        assert_eq!(ids(&outcome.ranked), vec![1, 2]);
        assert_eq!(ids(&outcome.shortlist), vec![2]);
        assert_eq!(outcome.summary.eligible, 1);
        assert!(!outcome.ranked[0].eligible);
    }

    #[test]
    fn test_malformed_resume_isolated() {
        let mut broken = resume(2, &["Rust"], 3.0);
        broken.experience_years = Some(f64::NAN);
        let resumes = vec![resume(1, &["Rust"], 3.0), broken, resume(3, &["Rust"], 5.0)];

        let outcome = run(&resumes, &ShortlistOptions::default());
        assert_eq!(ids(&outcome.ranked), vec![3, 1]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].resume_id, Uuid::from_u128(2));
        assert!(outcome.failures[0].reason.contains("experience_years"));
        assert_eq!(outcome.summary.failed, 1);
        assert!(!outcome.cancelled);
    }

    #[test]
    fn test_threshold_and_max_results() {
        let resumes = vec![
            resume(1, &["Rust", "Postgres"], 6.0),
            resume(2, &["Rust", "Postgres"], 5.0),
            resume(3, &["Rust"], 0.0),
        ];
        let options = ShortlistOptions {
            threshold: Some(50.0),
            max_results: Some(1),
        };
        let outcome = run(&resumes, &options);
        assert_eq!(outcome.ranked.len(), 3);
        assert_eq!(ids(&outcome.shortlist), vec![1]);
    }

    #[test]
    fn test_max_results_zero_means_unlimited() {
        let resumes = vec![resume(1, &["Rust"], 1.0), resume(2, &["Rust"], 2.0)];
        let options = ShortlistOptions {
            threshold: None,
            max_results: Some(0),
        };
        assert_eq!(run(&resumes, &options).shortlist.len(), 2);
    }

    #[test]
    fn test_invalid_criteria_scores_nothing() {
        let mut c = criteria();
        c.skills[0].weight = -5.0;
        let err = rank_and_shortlist(
            &WeightedScorer::default(),
            &c,
            &[resume(1, &["Rust"], 1.0)],
            &ShortlistOptions::default(),
            &CancelToken::new(),
        )
        .unwrap_err();
        match err {
            ScoringError::Validation(v) => assert!(v.has_field("skills[0].weight")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_overflowing_weights_rejected_before_ranking() {
        let mut c = criteria();
        c.skills[0].weight = 1e308;
        c.skills[1].weight = 1e308;
        let err = rank_and_shortlist(
            &WeightedScorer::default(),
            &c,
            &[resume(1, &["Rust", "Postgres"], 6.0), resume(2, &[], 0.0)],
            &ShortlistOptions::default(),
            &CancelToken::new(),
        )
        .unwrap_err();
        match err {
            ScoringError::Validation(v) => assert!(v.has_field("skills")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let err = rank_and_shortlist(
            &WeightedScorer::default(),
            &criteria(),
            &[],
            &ShortlistOptions {
                threshold: Some(f64::NAN),
                max_results: None,
            },
            &CancelToken::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ScoringError::Validation(_)));
    }

    #[test]
    fn test_cancelled_batch_skips_remaining() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let resumes = vec![resume(1, &["Rust"], 1.0), resume(2, &["Rust"], 2.0)];

        let outcome = rank_and_shortlist(
            &WeightedScorer::default(),
            &criteria(),
            &resumes,
            &ShortlistOptions::default(),
            &cancel,
        )
        .unwrap();
        assert!(outcome.cancelled);
        assert!(outcome.ranked.is_empty());
        assert_eq!(outcome.skipped, vec![Uuid::from_u128(1), Uuid::from_u128(2)]);
    }

    #[test]
    fn test_empty_batch() {
        let outcome = run(&[], &ShortlistOptions::default());
        assert!(outcome.shortlist.is_empty());
        assert_eq!(outcome.summary, ShortlistSummary::default());
    }

    #[test]
    fn test_ranking_is_reproducible() {
        let resumes: Vec<Resume> = (1..=40)
            .map(|i| resume(i, &["Rust"], (i % 7) as f64))
            .collect();
        let first = run(&resumes, &ShortlistOptions::default());
        let second = run(&resumes, &ShortlistOptions::default());
        assert_eq!(ids(&first.ranked), ids(&second.ranked));
    }
}
