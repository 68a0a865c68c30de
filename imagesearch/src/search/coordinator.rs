//! Search coordinator: latest request wins.

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::request::{SearchOutcome, SearchRequest, SearchResolution};
use crate::config::EngineConfig;
use crate::stamp::{Generation, GenerationCounter};

/// Issues search requests and decides which outcomes get applied.
///
/// Each non-empty term gets a fresh [`Generation`]. An outcome is applied
/// only if its generation is the latest issued one; cancelling the previous
/// request is best-effort and never relied upon.
#[derive(Debug)]
pub struct SearchCoordinator {
    generations: GenerationCounter,
    limit: usize,
    overfetch_margin: usize,
    /// Cancellation of the current request while it has not completed.
    in_flight: Option<CancellationToken>,
}

impl SearchCoordinator {
    /// Creates a coordinator keeping `limit` results and asking the source
    /// for `overfetch_margin` more.
    pub fn new(limit: usize, overfetch_margin: usize) -> Self {
        Self {
            generations: GenerationCounter::new(),
            limit,
            overfetch_margin,
            in_flight: None,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.limit(), config.overfetch_margin())
    }

    /// Starts a search for `term`, superseding any search in flight.
    ///
    /// Returns `None` for an empty term, in which case nothing changes.
    /// Any other term, whitespace included, is passed to the source as-is.
    pub fn set_search_term(&mut self, term: &str) -> Option<SearchRequest> {
        if term.is_empty() {
            trace!("Ignoring empty search term");
            return None;
        }

        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }

        let generation = self.generations.advance();
        let cancellation = CancellationToken::new();
        self.in_flight = Some(cancellation.clone());

        debug!(
            generation = %generation,
            term = term,
            fetch_limit = self.fetch_limit(),
            "Search issued"
        );

        Some(SearchRequest {
            term: term.to_string(),
            limit: self.limit,
            fetch_limit: self.fetch_limit(),
            generation,
            cancellation,
        })
    }

    /// Resolves a finished search against the latest issued generation.
    pub fn complete(&mut self, outcome: SearchOutcome) -> SearchResolution {
        let current = self.generations.current();
        if outcome.generation != current || self.in_flight.is_none() {
            trace!(
                generation = %outcome.generation,
                current = %current,
                "Discarding superseded search outcome"
            );
            return SearchResolution::Stale {
                generation: outcome.generation,
                current,
            };
        }

        self.in_flight = None;

        match outcome.result {
            Ok(mut urls) => {
                let received = urls.len();
                urls.truncate(self.limit);
                debug!(
                    generation = %outcome.generation,
                    received = received,
                    kept = urls.len(),
                    "Search applied"
                );
                SearchResolution::Apply {
                    generation: outcome.generation,
                    urls,
                }
            }
            Err(error) => SearchResolution::Failed {
                generation: outcome.generation,
                error,
            },
        }
    }

    /// Cancels the search in flight without issuing a new one.
    ///
    /// Its outcome, if it still arrives, resolves as stale.
    pub fn cancel_in_flight(&mut self) {
        if let Some(cancellation) = self.in_flight.take() {
            cancellation.cancel();
        }
    }

    /// The latest issued generation.
    pub fn current_generation(&self) -> Generation {
        self.generations.current()
    }

    /// Shared handle on the generation counter for search workers.
    pub fn generations(&self) -> GenerationCounter {
        self.generations.clone()
    }

    /// Returns true while the current search has not completed.
    pub fn is_searching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Number of results requested from the source.
    pub fn fetch_limit(&self) -> usize {
        self.limit + self.overfetch_margin
    }
}
