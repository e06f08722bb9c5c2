//! Search session: paging state, the single in-flight guard, and events.
//!
//! # Design
//! `SearchCoordinator` never performs I/O. Each operation that needs the
//! gateway returns the `HttpRequest` to run (or `None` when the call is a
//! no-op) and the host reports back through `complete_search` or
//! `complete_venue_fetch`. Outcomes reach the UI through a `SearchDelegate`.
//!
//! Only one search or page request may be outstanding. While it is, new
//! searches and page requests are ignored; nothing can cancel it. Venue
//! fetches are independent of the session and are never gated.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::client::VenueClient;
use crate::deeplink::DeepLink;
use crate::display::flatten_items;
use crate::error::{GatewayFailure, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{Coordinate, Item, Venue};

/// Receives everything the coordinator has to report.
pub trait SearchDelegate {
    /// A new text or location search is about to be sent. Not fired for
    /// page requests.
    fn on_search_starting(&mut self);

    /// The search input was cleared and any displayed results are stale.
    fn on_search_cleared(&mut self);

    /// The full list to display. For page requests this is the caller's
    /// current items followed by the new page.
    fn on_results(&mut self, items: Vec<Item>);

    /// A page request came back empty: there are no more pages.
    fn on_results_limit_reached(&mut self);

    /// A new search came back empty.
    fn on_no_results(&mut self);

    /// A search or page request failed.
    fn on_error(&mut self);

    fn on_venue_fetched(&mut self, venue: Venue);

    fn on_venue_fetch_error(&mut self);
}

/// One delegate callback, recorded as data.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    SearchStarting,
    SearchCleared,
    Results(Vec<Item>),
    ResultsLimitReached,
    NoResults,
    Error,
    VenueFetched(Venue),
    VenueFetchError,
}

/// A delegate that queues events for the host to drain.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<SearchEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pop(&mut self) -> Option<SearchEvent> {
        self.events.pop_front()
    }

    pub fn drain(&mut self) -> Vec<SearchEvent> {
        self.events.drain(..).collect()
    }

    /// Queued events, oldest first, without consuming them.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &SearchEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl SearchDelegate for EventQueue {
    fn on_search_starting(&mut self) {
        self.events.push_back(SearchEvent::SearchStarting);
    }

    fn on_search_cleared(&mut self) {
        self.events.push_back(SearchEvent::SearchCleared);
    }

    fn on_results(&mut self, items: Vec<Item>) {
        self.events.push_back(SearchEvent::Results(items));
    }

    fn on_results_limit_reached(&mut self) {
        self.events.push_back(SearchEvent::ResultsLimitReached);
    }

    fn on_no_results(&mut self) {
        self.events.push_back(SearchEvent::NoResults);
    }

    fn on_error(&mut self) {
        self.events.push_back(SearchEvent::Error);
    }

    fn on_venue_fetched(&mut self, venue: Venue) {
        self.events.push_back(SearchEvent::VenueFetched(venue));
    }

    fn on_venue_fetch_error(&mut self) {
        self.events.push_back(SearchEvent::VenueFetchError);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Searching,
}

/// What the outstanding request was issued for.
#[derive(Debug)]
enum Pending {
    NewSearch,
    Page { current_items: Vec<Item> },
}

pub struct SearchCoordinator<D: SearchDelegate> {
    client: VenueClient,
    delegate: D,
    offset: usize,
    active_location: Option<Coordinate>,
    last_term: Option<String>,
    pending: Option<Pending>,
}

impl<D: SearchDelegate> SearchCoordinator<D> {
    pub fn new(client: VenueClient, delegate: D) -> Self {
        Self {
            client,
            delegate,
            offset: 0,
            active_location: None,
            last_term: None,
            pending: None,
        }
    }

    pub fn state(&self) -> SearchState {
        if self.pending.is_some() {
            SearchState::Searching
        } else {
            SearchState::Idle
        }
    }

    pub fn is_searching(&self) -> bool {
        self.state() == SearchState::Searching
    }

    /// Offset of the most recent search or page request.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn active_location(&self) -> Option<Coordinate> {
        self.active_location
    }

    pub fn last_term(&self) -> Option<&str> {
        self.last_term.as_deref()
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    pub fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }

    /// Start a new search for venues near a place name.
    ///
    /// Ignored while a request is outstanding or when `term` is blank.
    pub fn start_text_search(&mut self, term: &str) -> Option<HttpRequest> {
        if self.is_searching() {
            debug!(term, "text search ignored: request in flight");
            return None;
        }
        if term.trim().is_empty() {
            return None;
        }

        self.offset = 0;
        self.active_location = None;
        self.last_term = Some(term.to_string());
        self.pending = Some(Pending::NewSearch);
        self.delegate.on_search_starting();
        debug!(term, "starting text search");
        Some(self.client.build_search_by_text(term, 0))
    }

    /// Start a new search around `at`. Ignored while a request is
    /// outstanding.
    pub fn start_location_search(&mut self, at: Coordinate) -> Option<HttpRequest> {
        if self.is_searching() {
            debug!("location search ignored: request in flight");
            return None;
        }

        self.offset = 0;
        self.active_location = Some(at);
        self.pending = Some(Pending::NewSearch);
        self.delegate.on_search_starting();
        debug!(lat = at.latitude, lon = at.longitude, "starting location search");
        Some(self.client.build_search_by_location(at, 0))
    }

    /// Request the page after `current_items` for the active search.
    ///
    /// Continues the location search if one is active, otherwise the last
    /// text search. Ignored while a request is outstanding or when no search
    /// has been made yet.
    pub fn page_forward(&mut self, current_items: Vec<Item>) -> Option<HttpRequest> {
        if self.is_searching() {
            debug!("page request ignored: request in flight");
            return None;
        }

        let offset = current_items.len();
        let request = if let Some(at) = self.active_location {
            self.client.build_search_by_location(at, offset)
        } else if let Some(term) = self.last_term.as_deref() {
            self.client.build_search_by_text(term, offset)
        } else {
            return None;
        };

        self.offset = offset;
        self.pending = Some(Pending::Page { current_items });
        debug!(offset, "requesting next page");
        Some(request)
    }

    /// Report the outcome of the request returned by `start_*_search` or
    /// `page_forward`.
    pub fn complete_search(&mut self, outcome: Result<HttpResponse, TransportError>) {
        let Some(pending) = self.pending.take() else {
            warn!("search completion with no request in flight; ignoring");
            return;
        };

        let groups = outcome
            .map_err(GatewayFailure::from)
            .and_then(|response| self.client.parse_search(response).map_err(GatewayFailure::from));
        let new_items = match groups {
            Ok(groups) => flatten_items(groups),
            Err(error) => {
                warn!(%error, offset = self.offset, "venue search failed");
                self.delegate.on_error();
                return;
            }
        };

        match pending {
            Pending::NewSearch if new_items.is_empty() => self.delegate.on_no_results(),
            Pending::NewSearch => self.delegate.on_results(new_items),
            Pending::Page { .. } if new_items.is_empty() => {
                self.delegate.on_results_limit_reached()
            }
            Pending::Page { mut current_items } => {
                current_items.extend(new_items);
                self.delegate.on_results(current_items);
            }
        }
    }

    /// Build the request for a single venue. Independent of any search.
    pub fn fetch_venue_by_id(&self, id: &str) -> HttpRequest {
        self.client.build_fetch_venue(id)
    }

    pub fn complete_venue_fetch(&mut self, outcome: Result<HttpResponse, TransportError>) {
        let venue = outcome
            .map_err(GatewayFailure::from)
            .and_then(|response| self.client.parse_venue(response).map_err(GatewayFailure::from));
        match venue {
            Ok(venue) => self.delegate.on_venue_fetched(venue),
            Err(error) => {
                warn!(%error, "venue fetch failed");
                self.delegate.on_venue_fetch_error();
            }
        }
    }

    /// The search input changed. Clearing it tells the delegate to drop the
    /// displayed results.
    pub fn search_text_changed(&mut self, text: &str) {
        if text.is_empty() {
            self.delegate.on_search_cleared();
        }
    }

    /// The user started editing an empty search input while location results
    /// are shown, so those results are cleared out of the way.
    pub fn search_editing_began(&mut self, text: &str) {
        if self.active_location.is_some() && text.is_empty() {
            self.delegate.on_search_cleared();
        }
    }

    /// Dispatch a deep link: `/search?term=` starts a text search and
    /// `/venue/<id>` fetches a venue. Returns the request to run, if any.
    pub fn handle_deep_link(&mut self, link: &str) -> Option<HttpRequest> {
        match DeepLink::parse(link)? {
            DeepLink::Search { term } => self.start_text_search(&term),
            DeepLink::Venue { id } => Some(self.fetch_venue_by_id(&id)),
        }
    }
}
