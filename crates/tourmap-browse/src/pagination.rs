//! Incremental pagination over filter-scoped sessions.
//!
//! One [`PaginationController`] owns one session at a time. A session is
//! created when a filter context is first observed, mutated only by a
//! completed or failed page fetch, and discarded outright when the context
//! changes. The `in_flight` flag is the sole guard against overlapping
//! fetches: within a session, page N+1 is never requested before page N's
//! outcome is observed. A response that arrives after its session was
//! superseded is detected by generation comparison and silently discarded.
//!
//! The internal mutex is held only for state transitions, never across an
//! await.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tourmap_client::{normalize_page, ClientError, Page, PageQuery, TourClient};
use tourmap_core::{sort_items, FilterContext, TourItem};

/// Lifecycle phase of a pagination session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Loading,
    Ready,
    LoadingMore,
    Failed,
}

/// Outcome of a [`PaginationController::reset`], `load_next`, or `retry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The fetch completed; `appended` new items were merged.
    Completed { appended: usize },
    /// Nothing was fetched: the session is exhausted or a fetch is already
    /// in flight. Not an error.
    Skipped,
    /// The response arrived after the session was superseded and was
    /// discarded without merging.
    Superseded,
    /// The context asked for a keyword search with a blank keyword; no
    /// request was made.
    MissingKeyword,
}

struct SessionState {
    context: FilterContext,
    items: Vec<TourItem>,
    seen: HashSet<String>,
    current_page: u32,
    total_count: Option<u64>,
    exhausted: bool,
    in_flight: bool,
    phase: SessionPhase,
    generation: u64,
}

impl SessionState {
    fn fresh(context: FilterContext, generation: u64) -> Self {
        Self {
            context,
            items: Vec::new(),
            seen: HashSet::new(),
            current_page: 0,
            total_count: None,
            exhausted: false,
            in_flight: false,
            phase: SessionPhase::Idle,
            generation,
        }
    }
}

/// Renderer-facing snapshot of the current session.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub context: FilterContext,
    pub items: Vec<TourItem>,
    pub current_page: u32,
    pub total_count: Option<u64>,
    pub exhausted: bool,
    pub in_flight: bool,
    pub phase: SessionPhase,
}

pub struct PaginationController {
    client: Arc<TourClient>,
    page_size: u32,
    state: Mutex<SessionState>,
}

impl PaginationController {
    #[must_use]
    pub fn new(client: Arc<TourClient>, page_size: u32) -> Self {
        let mut initial = SessionState::fresh(FilterContext::default(), 0);
        // Before the first reset there is nothing to page through.
        initial.exhausted = true;
        Self {
            client,
            page_size,
            state: Mutex::new(initial),
        }
    }

    /// Discards any session for a different context, creates a fresh one,
    /// and fetches page 1.
    ///
    /// A context whose keyword is present but blank is rejected without a
    /// network call ([`LoadOutcome::MissingKeyword`]); the fresh session
    /// stays idle and empty.
    ///
    /// # Errors
    ///
    /// Propagates the [`ClientError`] of a failed page-1 fetch after
    /// recording it in the session (`phase = Failed`, `exhausted = true`).
    pub async fn reset(&self, context: FilterContext) -> Result<LoadOutcome, ClientError> {
        let generation = {
            let mut state = self.lock();
            let generation = state.generation + 1;
            *state = SessionState::fresh(context.clone(), generation);
            if context.has_blank_keyword() {
                // A rejected context must not become pageable later.
                state.exhausted = true;
                return Ok(LoadOutcome::MissingKeyword);
            }
            state.in_flight = true;
            state.phase = SessionPhase::Loading;
            generation
        };

        let result = self.fetch(&context, 1).await;
        self.complete(generation, 1, result)
    }

    /// Fetches the next page of the current session.
    ///
    /// No-op ([`LoadOutcome::Skipped`]) while a fetch is in flight or after
    /// exhaustion; this guard is unconditional and protects against
    /// duplicate fetches from rapid scroll events.
    ///
    /// # Errors
    ///
    /// Propagates the [`ClientError`] of a failed fetch after recording it
    /// in the session. Accumulated items are never rolled back.
    pub async fn load_next(&self) -> Result<LoadOutcome, ClientError> {
        let (generation, context, next_page) = {
            let mut state = self.lock();
            if state.exhausted || state.in_flight {
                return Ok(LoadOutcome::Skipped);
            }
            state.in_flight = true;
            state.phase = SessionPhase::LoadingMore;
            (
                state.generation,
                state.context.clone(),
                state.current_page + 1,
            )
        };

        let result = self.fetch(&context, next_page).await;
        self.complete(generation, next_page, result)
    }

    /// One-shot retry after a failure: clears the defensive exhaustion and
    /// re-fetches the page that failed. No-op unless the session is in
    /// [`SessionPhase::Failed`].
    ///
    /// # Errors
    ///
    /// Propagates the [`ClientError`] of the retried fetch.
    pub async fn retry(&self) -> Result<LoadOutcome, ClientError> {
        let (generation, context, next_page) = {
            let mut state = self.lock();
            if state.phase != SessionPhase::Failed || state.in_flight {
                return Ok(LoadOutcome::Skipped);
            }
            state.exhausted = false;
            state.in_flight = true;
            state.phase = if state.current_page == 0 {
                SessionPhase::Loading
            } else {
                SessionPhase::LoadingMore
            };
            (
                state.generation,
                state.context.clone(),
                state.current_page + 1,
            )
        };

        let result = self.fetch(&context, next_page).await;
        self.complete(generation, next_page, result)
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        SessionSnapshot {
            context: state.context.clone(),
            items: state.items.clone(),
            current_page: state.current_page,
            total_count: state.total_count,
            exhausted: state.exhausted,
            in_flight: state.in_flight,
            phase: state.phase,
        }
    }

    async fn fetch(
        &self,
        context: &FilterContext,
        page_no: u32,
    ) -> Result<Page<TourItem>, ClientError> {
        let page = PageQuery {
            page_no,
            num_of_rows: self.page_size,
        };
        let raw = match context.trimmed_keyword() {
            Some(keyword) => {
                self.client
                    .search_keyword(
                        keyword,
                        page,
                        context.area_code.as_deref(),
                        context.sole_content_type(),
                        context.sort,
                    )
                    .await?
            }
            None => {
                self.client
                    .area_based_list(
                        page,
                        context.area_code.as_deref(),
                        context.sole_content_type(),
                        context.sort,
                    )
                    .await?
            }
        };
        Ok(normalize_page(raw))
    }

    /// Applies a fetch outcome to the session, unless the session was
    /// superseded while the fetch was in flight.
    fn complete(
        &self,
        generation: u64,
        requested_page: u32,
        result: Result<Page<TourItem>, ClientError>,
    ) -> Result<LoadOutcome, ClientError> {
        let mut state = self.lock();
        if state.generation != generation {
            tracing::debug!(
                generation,
                current = state.generation,
                "discarding page response from a superseded session"
            );
            return Ok(LoadOutcome::Superseded);
        }
        state.in_flight = false;

        match result {
            Ok(page) => {
                let page_empty = page.items.is_empty();
                // Sort the page before merging; the upstream ordering is
                // not stable across pages for every arrangement.
                let sorted = sort_items(&page.items, state.context.sort);
                let mut appended = 0;
                for item in sorted {
                    if !state.context.matches_category(item.category) {
                        continue;
                    }
                    if state.seen.insert(item.id.clone()) {
                        state.items.push(item);
                        appended += 1;
                    }
                }
                state.current_page = requested_page;
                // Some endpoints omit totalCount, which deserializes as 0;
                // alongside a non-empty page that means unknown, not
                // known-zero, so only the empty page can end the session.
                let known_total = (page.total_count > 0).then_some(page.total_count);
                state.total_count = known_total;
                let accumulated = u64::try_from(state.items.len()).unwrap_or(u64::MAX);
                state.exhausted =
                    page_empty || known_total.is_some_and(|total| accumulated >= total);
                state.phase = SessionPhase::Ready;
                Ok(LoadOutcome::Completed { appended })
            }
            Err(err) => {
                // Stop auto-fetching; the caller gets a one-shot retry
                // affordance instead. Accumulated items stay.
                state.exhausted = true;
                state.phase = SessionPhase::Failed;
                Err(err)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
