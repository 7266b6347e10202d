//! Stateful trip search that pages backwards and forwards in time
//!
//! The loader remembers the query it started from, the earliest and latest
//! trip start time delivered so far and the content hash of every trip it
//! has handed out. Later pages are anchored at the window edges and stripped
//! of trips the caller has already seen.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::cancel::CancelSignal;
use crate::client::{OjpClient, TripQuery, TripTime};
use crate::config::MAX_PAGE_SIZE;
use crate::error::OjpError;
use crate::hash::TripHash;
use crate::model::{NumberOfResults, TripDelivery, TripResult};

#[derive(Debug, Default)]
struct LoaderState {
    min_seen_start_time: Option<DateTime<Utc>>,
    max_seen_start_time: Option<DateTime<Utc>>,
    seen: HashSet<TripHash>,
    template: Option<TripQuery>,
    page_size: u32,
}

impl LoaderState {
    fn clear_window(&mut self) {
        self.min_seen_start_time = None;
        self.max_seen_start_time = None;
        self.seen.clear();
    }

    /// Keep unseen full trips passing `keep`, recording them as seen
    fn absorb(
        &mut self,
        results: Vec<TripResult>,
        keep: impl Fn(DateTime<Utc>) -> bool,
    ) -> Vec<TripResult> {
        let mut accepted = Vec::with_capacity(results.len());
        for result in results {
            let Some(trip) = result.trip() else {
                continue;
            };
            if !keep(trip.start_time) {
                continue;
            }
            if !self.seen.insert(trip.content_hash()) {
                continue;
            }
            let start = trip.start_time;
            self.min_seen_start_time =
                Some(self.min_seen_start_time.map_or(start, |min| min.min(start)));
            self.max_seen_start_time =
                Some(self.max_seen_start_time.map_or(start, |max| max.max(start)));
            accepted.push(result);
        }
        accepted
    }
}

enum Direction {
    Previous,
    Next,
}

/// Paginated trip loader
///
/// All loads on one instance are serialized: the state lock is held from
/// the moment a load starts until its page has been committed.
#[derive(Debug)]
pub struct PaginatedTripLoader {
    client: OjpClient,
    state: Mutex<LoaderState>,
}

impl PaginatedTripLoader {
    #[must_use]
    pub fn new(client: OjpClient) -> Self {
        Self {
            client,
            state: Mutex::new(LoaderState::default()),
        }
    }

    /// Start a new search, replacing any previous one
    ///
    /// The policy decides the page size used by later loads.
    ///
    /// # Errors
    ///
    /// Returns [`OjpError::InvalidRequest`] if the policy asks for zero or
    /// more than [`MAX_PAGE_SIZE`] trips. Otherwise returns an error if the
    /// request fails or `cancel` fires before the page is committed. State is
    /// left untouched on error.
    #[instrument(skip(self, template, cancel))]
    pub async fn load_trips(
        &self,
        template: TripQuery,
        policy: NumberOfResults,
        mut cancel: CancelSignal,
    ) -> Result<TripDelivery, OjpError> {
        let count = policy.count();
        if count == 0 || count > MAX_PAGE_SIZE {
            return Err(OjpError::InvalidRequest(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}, got {count}"
            )));
        }

        let mut state = self.state.lock().await;

        let mut query = template;
        query.params.number_of_results = Some(policy);
        let delivery = self.query(&query, &mut cancel).await?;

        state.clear_window();
        state.page_size = count;
        state.template = Some(query);
        let delivery = commit(&mut state, delivery, |_| true);
        info!(
            trips = delivery.trip_results.len(),
            page_size = state.page_size,
            "Trip search started"
        );
        Ok(delivery)
    }

    /// Trips departing before the earliest one seen so far
    ///
    /// # Errors
    ///
    /// Returns [`OjpError::NotImplemented`] if no search has been started or
    /// nothing has been seen yet, otherwise as [`load_trips`](Self::load_trips).
    #[instrument(skip(self, cancel))]
    pub async fn load_previous(&self, cancel: CancelSignal) -> Result<TripDelivery, OjpError> {
        self.load_page(Direction::Previous, cancel).await
    }

    /// Trips departing after the latest one seen so far
    ///
    /// # Errors
    ///
    /// Same as [`load_previous`](Self::load_previous).
    #[instrument(skip(self, cancel))]
    pub async fn load_next(&self, cancel: CancelSignal) -> Result<TripDelivery, OjpError> {
        self.load_page(Direction::Next, cancel).await
    }

    /// Forget the window and seen trips, keeping the search itself
    pub async fn reset(&self) {
        self.state.lock().await.clear_window();
        debug!("Trip window reset");
    }

    pub async fn min_seen_start_time(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.min_seen_start_time
    }

    pub async fn max_seen_start_time(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.max_seen_start_time
    }

    /// Number of distinct trips delivered since the last reset
    pub async fn seen_count(&self) -> usize {
        self.state.lock().await.seen.len()
    }

    pub async fn page_size(&self) -> u32 {
        self.state.lock().await.page_size
    }

    pub async fn has_template(&self) -> bool {
        self.state.lock().await.template.is_some()
    }

    async fn load_page(
        &self,
        direction: Direction,
        mut cancel: CancelSignal,
    ) -> Result<TripDelivery, OjpError> {
        let mut state = self.state.lock().await;

        let Some(template) = state.template.as_ref() else {
            return Err(OjpError::NotImplemented(
                "no trip search has been started".to_string(),
            ));
        };
        let (edge, policy) = match direction {
            Direction::Previous => (
                state.min_seen_start_time,
                NumberOfResults::Before(state.page_size),
            ),
            Direction::Next => (
                state.max_seen_start_time,
                NumberOfResults::After(state.page_size),
            ),
        };
        let Some(edge) = edge else {
            return Err(OjpError::NotImplemented(
                "no trips seen to page from".to_string(),
            ));
        };

        let mut query = template.at(TripTime::Departure(edge));
        query.params.number_of_results = Some(policy);
        debug!(%edge, ?policy, "Loading adjacent trip page");
        let delivery = self.query(&query, &mut cancel).await?;

        let delivery = match direction {
            Direction::Previous => commit(&mut state, delivery, |start| start <= edge),
            Direction::Next => commit(&mut state, delivery, |start| start >= edge),
        };
        info!(
            trips = delivery.trip_results.len(),
            seen = state.seen.len(),
            "Trip page loaded"
        );
        Ok(delivery)
    }

    /// Run one request, racing it against `cancel`
    async fn query(
        &self,
        query: &TripQuery,
        cancel: &mut CancelSignal,
    ) -> Result<TripDelivery, OjpError> {
        if cancel.is_cancelled() {
            return Err(OjpError::cancelled());
        }
        let delivery = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(OjpError::cancelled()),
            result = self.client.trips(query) => result,
        }?;
        if cancel.is_cancelled() {
            debug!("Trip load cancelled after response arrived");
            return Err(OjpError::cancelled());
        }
        Ok(delivery)
    }
}

fn commit(
    state: &mut LoaderState,
    delivery: TripDelivery,
    keep: impl Fn(DateTime<Utc>) -> bool,
) -> TripDelivery {
    let received = delivery.trip_results.len();
    let trip_results = state.absorb(delivery.trip_results, keep);
    debug!(received, kept = trip_results.len(), "Filtered trip page");
    TripDelivery {
        trip_results,
        ..delivery
    }
}
