//! Axum route handlers for the Scoring API.

use std::sync::Arc;

use anyhow::Context;
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::models::criteria::CriteriaSet;
use crate::models::resume::Resume;
use crate::models::score::ResumeScore;
use crate::scoring::shortlist::{
    rank_and_shortlist, CancelToken, ShortlistOptions, ShortlistOutcome,
};
use crate::scoring::validation::{validate_criteria, FieldViolation, ValidationError};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ValidateCriteriaResponse {
    pub valid: bool,
}

/// Both fields are optional so that an explicit `null` is reported as invalid
/// input instead of a generic JSON rejection.
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub criteria: Option<CriteriaSet>,
    pub resume: Option<Resume>,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub score: ResumeScore,
    pub scorer_backend: String,
}

#[derive(Debug, Deserialize)]
pub struct ShortlistRequest {
    pub criteria: Option<CriteriaSet>,
    #[serde(default)]
    pub resumes: Vec<Resume>,
    pub threshold: Option<f64>,
    pub max_results: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ShortlistResponse {
    #[serde(flatten)]
    pub outcome: ShortlistOutcome,
    pub scorer_backend: String,
    pub generated_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/criteria/validate
///
/// Checks a criteria set and reports every violation at once.
pub async fn handle_validate_criteria(
    Json(criteria): Json<CriteriaSet>,
) -> Result<Json<ValidateCriteriaResponse>, AppError> {
    validate_criteria(&criteria)?;
    Ok(Json(ValidateCriteriaResponse { valid: true }))
}

/// POST /api/v1/scores
///
/// Scores one resume against one criteria set. Cheap enough to run inline.
/// Criteria are checked first so a bad set reports every violation, like
/// the validate and shortlist endpoints do.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let criteria = request
        .criteria
        .ok_or_else(|| AppError::InvalidInput("criteria is required".to_string()))?;
    let resume = request
        .resume
        .ok_or_else(|| AppError::InvalidInput("resume is required".to_string()))?;

    validate_criteria(&criteria)?;
    let score = state.scorer.score_resume(&criteria, &resume)?;

    Ok(Json(ScoreResponse {
        score,
        scorer_backend: state.scorer.backend().to_string(),
    }))
}

/// POST /api/v1/shortlist
///
/// Ranks a batch of resumes. Scoring runs on the blocking pool; a watchdog
/// cancels the batch after `SHORTLIST_TIMEOUT_MS` and the partial outcome is
/// returned with `cancelled = true`.
pub async fn handle_shortlist(
    State(state): State<AppState>,
    Json(request): Json<ShortlistRequest>,
) -> Result<Json<ShortlistResponse>, AppError> {
    let criteria = request
        .criteria
        .ok_or_else(|| AppError::InvalidInput("criteria is required".to_string()))?;

    let max_batch = state.config.shortlist_max_batch;
    if request.resumes.len() > max_batch {
        return Err(AppError::Validation(ValidationError {
            violations: vec![FieldViolation {
                field: "resumes".to_string(),
                message: format!("at most {max_batch} resumes per request"),
            }],
        }));
    }

    let options = ShortlistOptions {
        threshold: request.threshold.or(state.config.default_threshold),
        max_results: request.max_results,
    };
    let resumes = request.resumes;

    let cancel = CancelToken::new();
    let watchdog = {
        let cancel = cancel.clone();
        let timeout = state.config.shortlist_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            cancel.cancel();
        })
    };

    let scorer = Arc::clone(&state.scorer);
    let scorer_backend = scorer.backend().to_string();
    let result = tokio::task::spawn_blocking(move || {
        rank_and_shortlist(scorer.as_ref(), &criteria, &resumes, &options, &cancel)
    })
    .await
    .context("shortlist worker failed");
    watchdog.abort();

    let outcome = result??;
    if outcome.cancelled {
        warn!(
            criteria_id = %outcome.criteria_id,
            skipped = outcome.summary.skipped,
            "shortlist timed out; returning partial ranking"
        );
    }

    Ok(Json(ShortlistResponse {
        outcome,
        scorer_backend,
        generated_at: Utc::now(),
    }))
}
