//! Expansion knobs with the defaults the service runs with.
//!
//! [`ExpansionConfig`] bounds the work a single expansion may do: how many
//! fetches run at once, how long each may take, how many first-round results
//! are expanded again, and how large the suggestion set may grow.

use std::env;
use std::time::Duration;

use crate::suggest::DEFAULT_ENDPOINT;

use super::engine::ExpandError;

/// Fetches allowed in flight at once within a round.
pub const DEFAULT_CONCURRENCY: usize = 20;
/// Per-fetch timeout.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);
/// First-round results expanded again in round two.
pub const ROUND_TWO_SEEDS: usize = 50;
/// Upper bound on the suggestion set, seed included.
pub const MAX_SUGGESTIONS: usize = 1000;
/// After this, no new fetches start and the expansion returns what it has.
pub const EXPANSION_DEADLINE: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct ExpansionConfig {
    /// Autocomplete endpoint queried for every variant.
    pub endpoint: String,
    pub concurrency: usize,
    pub fetch_timeout: Duration,
    /// Set to 0 to skip round two entirely.
    pub round_two_seeds: usize,
    pub max_suggestions: usize,
    /// Soft limit on a whole expansion; `None` lets it run until every fetch settles.
    pub deadline: Option<Duration>,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            fetch_timeout: FETCH_TIMEOUT,
            round_two_seeds: ROUND_TWO_SEEDS,
            max_suggestions: MAX_SUGGESTIONS,
            deadline: Some(EXPANSION_DEADLINE),
        }
    }
}

impl ExpansionConfig {
    /// Defaults overridden by `KWEXPAND_ENDPOINT` and `KWEXPAND_CONCURRENCY` when set.
    pub fn from_env() -> Result<Self, ExpandError> {
        let mut config = Self::default();

        if let Some(endpoint) = env::var("KWEXPAND_ENDPOINT")
            .ok()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
        {
            config.endpoint = endpoint;
        }

        if let Ok(raw) = env::var("KWEXPAND_CONCURRENCY") {
            config.concurrency = raw.trim().parse().map_err(|_| {
                ExpandError::Config(format!(
                    "KWEXPAND_CONCURRENCY must be a positive integer, got '{raw}'"
                ))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ExpandError> {
        if self.endpoint.trim().is_empty() {
            return Err(ExpandError::Config("endpoint must not be empty".into()));
        }
        if self.concurrency == 0 {
            return Err(ExpandError::Config(
                "concurrency must be greater than 0".into(),
            ));
        }
        if self.fetch_timeout.is_zero() {
            return Err(ExpandError::Config(
                "fetch_timeout must be greater than 0".into(),
            ));
        }
        if self.max_suggestions == 0 {
            return Err(ExpandError::Config(
                "max_suggestions must be greater than 0".into(),
            ));
        }
        if self.deadline.is_some_and(|d| d.is_zero()) {
            return Err(ExpandError::Config(
                "deadline must be greater than 0 when set".into(),
            ));
        }
        Ok(())
    }
}
