use std::collections::BTreeMap;

use futures::stream::{self, StreamExt};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::suggest::{SuggestClient, SuggestError, SuggestSource};

use super::config::ExpansionConfig;
use super::filter::RelevanceFilter;
use super::set::SuggestionSet;
use super::variants::variants;

#[derive(Debug, thiserror::Error)]
pub enum ExpandError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to build suggestion client: {0}")]
    Client(#[from] SuggestError),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct RoundStats {
    completed: usize,
    failed: usize,
    added: usize,
    deadline_hit: bool,
}

impl RoundStats {
    fn absorb(
        &mut self,
        set: &mut SuggestionSet,
        query: &str,
        outcome: Result<Vec<String>, SuggestError>,
    ) {
        match outcome {
            Ok(suggestions) => self.added += set.merge(suggestions),
            Err(e) => {
                self.failed += 1;
                warn!(query = %query, error = %e, "suggestion fetch failed");
            }
        }
    }
}

/// Two-round keyword expansion over a [`SuggestSource`].
///
/// Each call to [`Expander::generate`] owns its own suggestion set; the
/// source (and its connection pool) is the only thing shared between calls.
#[derive(Debug, Clone)]
pub struct Expander<S = SuggestClient> {
    source: S,
    config: ExpansionConfig,
}

impl Expander<SuggestClient> {
    pub fn new(config: ExpansionConfig) -> Result<Self, ExpandError> {
        config.validate()?;
        let source = SuggestClient::new(&config.endpoint, config.fetch_timeout)?;
        Ok(Self { source, config })
    }
}

impl<S: SuggestSource> Expander<S> {
    pub fn with_source(source: S, config: ExpansionConfig) -> Result<Self, ExpandError> {
        config.validate()?;
        Ok(Self { source, config })
    }

    /// Expands `seed` into a sorted, deduplicated list of related keywords.
    ///
    /// Upstream failures only shrink the result. When the configured deadline
    /// elapses no further fetches start and whatever was collected so far is
    /// filtered and returned. A blank seed yields an empty list without
    /// touching the network.
    pub async fn generate(&self, seed: &str) -> Result<Vec<String>, ExpandError> {
        let seed = seed.trim();
        if seed.is_empty() {
            return Ok(Vec::new());
        }

        let deadline = self.config.deadline.map(|limit| Instant::now() + limit);
        Ok(self.expand(seed, deadline).await)
    }

    async fn expand(&self, seed: &str, deadline: Option<Instant>) -> Vec<String> {
        info!(seed = %seed, "expansion started");

        let mut set = SuggestionSet::new(seed, self.config.max_suggestions);

        let first = self.run_round(variants(seed), &mut set, deadline).await;
        info!(
            round = 1,
            completed = first.completed,
            failed = first.failed,
            added = first.added,
            total = set.len(),
            "round complete"
        );

        let round_two = set.round_two_seeds(seed, self.config.round_two_seeds);
        let second = self.run_round(round_two, &mut set, deadline).await;
        info!(
            round = 2,
            completed = second.completed,
            failed = second.failed,
            added = second.added,
            total = set.len(),
            "round complete"
        );

        if first.deadline_hit || second.deadline_hit {
            warn!(seed = %seed, total = set.len(), "expansion deadline reached, returning partial results");
        }

        let candidates = set.len();
        let keywords = RelevanceFilter::new(seed).apply(set.into_suggestions());
        info!(seed = %seed, candidates, keywords = keywords.len(), "expansion complete");
        keywords
    }

    /// Fetches suggestions for every query with at most `concurrency` in flight.
    ///
    /// Fetches settle in any order, but results are merged in dispatch order so
    /// that insertion order, and with it the round-two seed choice, depends only
    /// on upstream responses. Stops dispatching once the set is full or the
    /// deadline passes.
    async fn run_round(
        &self,
        queries: Vec<String>,
        set: &mut SuggestionSet,
        deadline: Option<Instant>,
    ) -> RoundStats {
        let mut stats = RoundStats::default();
        if queries.is_empty() || set.is_full() {
            return stats;
        }
        if deadline.is_some_and(|at| Instant::now() >= at) {
            stats.deadline_hit = true;
            return stats;
        }

        let source = &self.source;
        let mut fetches = stream::iter(queries.into_iter().enumerate())
            .map(|(index, query)| async move {
                let outcome = source.suggest(&query).await;
                (index, query, outcome)
            })
            .buffer_unordered(self.config.concurrency);

        // Settled fetches wait here until every earlier one has been merged.
        let mut settled = BTreeMap::new();
        let mut next_index = 0;

        loop {
            let item = match deadline {
                Some(at) => match tokio::time::timeout_at(at, fetches.next()).await {
                    Ok(item) => item,
                    Err(_) => {
                        stats.deadline_hit = true;
                        break;
                    }
                },
                None => fetches.next().await,
            };
            let Some((index, query, outcome)) = item else {
                break;
            };

            stats.completed += 1;
            settled.insert(index, (query, outcome));

            while let Some((query, outcome)) = settled.remove(&next_index) {
                next_index += 1;
                stats.absorb(set, &query, outcome);
                if set.is_full() {
                    debug!(cap = self.config.max_suggestions, "suggestion cap reached");
                    return stats;
                }
            }
        }

        // Cut off by the deadline: keep what already settled behind a pending fetch.
        for (query, outcome) in settled.into_values() {
            stats.absorb(set, &query, outcome);
            if set.is_full() {
                break;
            }
        }

        stats
    }
}
