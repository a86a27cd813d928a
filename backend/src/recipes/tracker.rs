//! Search ordering
//!
//! Searches are not cancelled when a newer one starts, so completions can
//! arrive out of order. Each search takes a ticket with a monotonically
//! increasing generation; only the result of the most recently started
//! search is kept.

use meal_planner_shared::RecipeSearchResponse;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

/// Generation stamp handed out when a search starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket(u64);

impl SearchTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct SearchTracker {
    generation: AtomicU64,
    latest: Mutex<Option<(u64, RecipeSearchResponse)>>,
}

impl SearchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a new search; every earlier ticket becomes stale
    pub fn begin(&self) -> SearchTicket {
        SearchTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Record a completed search; returns false when a newer search has
    /// started since the ticket was issued
    pub async fn complete(&self, ticket: SearchTicket, response: RecipeSearchResponse) -> bool {
        let mut latest = self.latest.lock().await;
        if ticket.0 != self.generation.load(Ordering::SeqCst) {
            debug!(generation = ticket.0, "Dropping stale search result");
            return false;
        }
        *latest = Some((ticket.0, response));
        true
    }

    /// Result of the most recently started search, once it has completed
    pub async fn latest(&self) -> Option<RecipeSearchResponse> {
        self.latest
            .lock()
            .await
            .as_ref()
            .map(|(_, response)| response.clone())
    }
}
