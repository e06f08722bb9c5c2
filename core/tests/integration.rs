//! Full search session against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives a `SearchCoordinator`
//! through text search, paging, the end of results, a location search and
//! venue fetches over real HTTP using ureq, the way a host app would.

use venues_core::{
    Coordinate, EventQueue, GatewayConfig, HttpRequest, HttpResponse, Item, SearchCoordinator,
    SearchEvent, SearchState, TransportError, VenueClient,
};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses come back as data and the core decides what they mean.
fn execute(req: HttpRequest) -> Result<HttpResponse, TransportError> {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut request = agent.get(&req.url);
    for (k, v) in &req.headers {
        request = request.header(k, v);
    }
    let mut response = request
        .call()
        .map_err(|e| TransportError::new(e.to_string()))?;

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();
    Ok(HttpResponse::new(status, body))
}

fn start_mock_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn coordinator(base_url: &str) -> SearchCoordinator<EventQueue> {
    let config = GatewayConfig::new("test-id", "test-secret").with_base_url(base_url);
    SearchCoordinator::new(VenueClient::new(config).unwrap(), EventQueue::new())
}

fn expect_results(events: Vec<SearchEvent>) -> Vec<Item> {
    match events.as_slice() {
        [.., SearchEvent::Results(items)] => items.clone(),
        other => panic!("expected results, got {other:?}"),
    }
}

fn venue_id(item: &Item) -> &str {
    item.venue.as_ref().unwrap().id.as_deref().unwrap()
}

#[test]
fn search_session_lifecycle() {
    let base_url = start_mock_server();
    let mut c = coordinator(&base_url);

    // Step 1: new text search returns the first page of 30.
    let req = c.start_text_search("Melbourne").unwrap();
    assert!(c.start_text_search("Sydney").is_none(), "gated while in flight");
    c.complete_search(execute(req));
    let events = c.delegate_mut().drain();
    assert_eq!(events[0], SearchEvent::SearchStarting);
    let items = expect_results(events);
    assert_eq!(items.len(), 30);
    assert_eq!(venue_id(&items[0]), "melbourne-001");
    assert_eq!(c.state(), SearchState::Idle);

    // Step 2: the mapped graph carries photos and display data.
    let venue = items[0].venue.as_ref().unwrap();
    let photo = venue.photos.as_ref().unwrap().first_venue_photo().unwrap();
    assert!(photo.is_public());
    assert_eq!(
        photo.thumbnail_url().unwrap().as_str(),
        "https://igx.4sqi.net/img/general/cap100/melbourne-001.jpg"
    );
    assert_eq!(
        venue.location.as_ref().unwrap().display_address(),
        "1 Collins St\nMelbourne 3000"
    );

    // Step 3: page forward appends the remaining 5.
    let req = c.page_forward(items).unwrap();
    assert_eq!(c.offset(), 30);
    c.complete_search(execute(req));
    let items = expect_results(c.delegate_mut().drain());
    assert_eq!(items.len(), 35);
    assert_eq!(venue_id(&items[29]), "melbourne-030");
    assert_eq!(venue_id(&items[34]), "melbourne-035");

    // Step 4: paging past the end reaches the limit.
    let req = c.page_forward(items.clone()).unwrap();
    c.complete_search(execute(req));
    assert_eq!(c.delegate_mut().drain(), vec![SearchEvent::ResultsLimitReached]);

    // Step 5: a place with no venues is "no results", not an error.
    let req = c.start_text_search("Hobart").unwrap();
    c.complete_search(execute(req));
    assert_eq!(
        c.delegate_mut().drain(),
        vec![SearchEvent::SearchStarting, SearchEvent::NoResults]
    );

    // Step 6: an ungeocodable place is an error and the session recovers.
    let req = c.start_text_search("Atlantis").unwrap();
    c.complete_search(execute(req));
    assert_eq!(
        c.delegate_mut().drain(),
        vec![SearchEvent::SearchStarting, SearchEvent::Error]
    );
    assert_eq!(c.state(), SearchState::Idle);

    // Step 7: location search, then paging stays on the location.
    let req = c.start_location_search(Coordinate::new(-37.81, 144.96)).unwrap();
    c.complete_search(execute(req));
    let items = expect_results(c.delegate_mut().drain());
    assert_eq!(items.len(), 30);
    let req = c.page_forward(items).unwrap();
    assert!(req.url.contains("ll="));
    c.complete_search(execute(req));
    let items = expect_results(c.delegate_mut().drain());
    assert_eq!(items.len(), 38);

    // Step 8: venue fetch by deep link.
    let req = c.handle_deep_link("/venue/sydney-003").unwrap();
    c.complete_venue_fetch(execute(req));
    match c.delegate_mut().drain().as_slice() {
        [SearchEvent::VenueFetched(venue)] => {
            assert_eq!(venue.possessive_name().as_deref(), Some("Sydney Cafe 3's"));
            assert_eq!(venue.hours.as_ref().unwrap().is_open, Some(false));
        }
        other => panic!("expected venue, got {other:?}"),
    }

    // Step 9: unknown venue reports a fetch error.
    let req = c.fetch_venue_by_id("missing");
    c.complete_venue_fetch(execute(req));
    assert_eq!(c.delegate_mut().drain(), vec![SearchEvent::VenueFetchError]);
}

#[test]
fn unreachable_gateway_is_reported_as_error() {
    // Bind and drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let mut c = coordinator(&format!("http://{addr}"));

    let req = c.start_text_search("Melbourne").unwrap();
    let outcome = execute(req);
    assert!(outcome.is_err());
    c.complete_search(outcome);
    assert_eq!(
        c.delegate_mut().drain(),
        vec![SearchEvent::SearchStarting, SearchEvent::Error]
    );
    assert!(c.start_text_search("Melbourne").is_some());
}
