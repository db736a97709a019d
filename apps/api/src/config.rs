use std::str::FromStr;
use std::time::Duration;

use anyhow::{ensure, Context, Result};

use crate::models::score::ScoreCaps;
use crate::scoring::validation::validate_caps;

/// Application configuration loaded from environment variables.
/// Every variable has a default; startup fails only on unparsable values.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub score_caps: ScoreCaps,
    pub shortlist_timeout: Duration,
    pub shortlist_max_batch: usize,
    /// Applied when a shortlist request does not carry its own threshold.
    pub default_threshold: Option<f64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ScoreCaps::default();
        let score_caps = ScoreCaps {
            skills: parse_or(&lookup, "SCORE_CAP_SKILLS", defaults.skills)?,
            experience: parse_or(&lookup, "SCORE_CAP_EXPERIENCE", defaults.experience)?,
            keywords: parse_or(&lookup, "SCORE_CAP_KEYWORDS", defaults.keywords)?,
        };
        validate_caps(&score_caps).context("Invalid SCORE_CAP_* configuration")?;

        let default_threshold = lookup("SHORTLIST_DEFAULT_THRESHOLD")
            .map(|raw| raw.trim().parse::<f64>())
            .transpose()
            .context("SHORTLIST_DEFAULT_THRESHOLD must be a number")?;
        if let Some(t) = default_threshold {
            ensure!(
                t.is_finite() && t >= 0.0,
                "SHORTLIST_DEFAULT_THRESHOLD must be a finite number >= 0"
            );
        }

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            score_caps,
            shortlist_timeout: Duration::from_millis(parse_or(
                &lookup,
                "SHORTLIST_TIMEOUT_MS",
                10_000,
            )?),
            shortlist_max_batch: parse_or(&lookup, "SHORTLIST_MAX_BATCH", 5_000)?,
            default_threshold,
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
