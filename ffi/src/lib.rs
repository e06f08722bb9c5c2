//! C-ABI wrapper around `venues-core`.
//!
//! # Overview
//! Exposes a venue search session through `extern "C"` functions so a
//! native app can drive paging, venue fetches and deep links while doing
//! the HTTP itself.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Operations that need the gateway return an `FfiHttpRequest` (or null
//!   when the session ignores the call). Its `kind` names the completion
//!   function the host reports back to.
//! - Outcomes are queued and drained one at a time with `venues_next_event`.
//! - The C caller owns all returned pointers and must call the matching
//!   `venues_free_*` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use venues_core::{
    Coordinate, DeepLink, EventQueue, GatewayConfig, HttpResponse, SearchCoordinator,
    TransportError, VenueClient,
};

use types::*;

/// Borrow a C string as `&str`. Null or invalid UTF-8 yields `None`.
fn str_arg<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

fn into_handle(config: GatewayConfig) -> *mut FfiCoordinator {
    match VenueClient::new(config) {
        Ok(client) => {
            let inner = SearchCoordinator::new(client, EventQueue::new());
            Box::into_raw(Box::new(FfiCoordinator::new(inner)))
        }
        Err(_) => std::ptr::null_mut(),
    }
}

fn request_or_null(
    req: Option<venues_core::HttpRequest>,
    kind: FfiRequestKind,
) -> *mut FfiHttpRequest {
    req.map_or(std::ptr::null_mut(), |r| FfiHttpRequest::from_core(r, kind))
}

// ---------------------------------------------------------------------------
// Session lifecycle
// ---------------------------------------------------------------------------

/// Create a search session.
///
/// `base_url` and `api_version` may be null to use the production defaults.
/// Returns null if `client_id` or `client_secret` is null, `base_url` is
/// not an absolute URL, or `api_version` is not `YYYYMMDD`. Free with
/// `venues_coordinator_free`.
#[unsafe(no_mangle)]
pub extern "C" fn venues_coordinator_new(
    base_url: *const c_char,
    client_id: *const c_char,
    client_secret: *const c_char,
    api_version: *const c_char,
) -> *mut FfiCoordinator {
    catch_unwind(|| {
        let (Some(id), Some(secret)) = (str_arg(client_id), str_arg(client_secret)) else {
            return std::ptr::null_mut();
        };
        let mut config = GatewayConfig::new(id, secret);
        if let Some(url) = str_arg(base_url) {
            config = config.with_base_url(url);
        }
        if let Some(version) = str_arg(api_version) {
            config.api_version = version.to_string();
        }
        into_handle(config)
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a search session from `VENUES_*` environment variables (and a
/// `.env` file if present). Returns null if the configuration is invalid.
#[unsafe(no_mangle)]
pub extern "C" fn venues_coordinator_from_env() -> *mut FfiCoordinator {
    catch_unwind(|| match GatewayConfig::from_env() {
        Ok(config) => into_handle(config),
        Err(_) => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a session. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn venues_coordinator_free(coordinator: *mut FfiCoordinator) {
    if !coordinator.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(coordinator) });
        });
    }
}

/// True while a search or page request is outstanding.
#[unsafe(no_mangle)]
pub extern "C" fn venues_is_searching(coordinator: *const FfiCoordinator) -> bool {
    catch_unwind(|| {
        if coordinator.is_null() {
            return false;
        }
        unsafe { &*coordinator }.inner.is_searching()
    })
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Start a search for venues near `term`.
///
/// Returns null if a request is already outstanding, `term` is blank, or an
/// argument is null.
#[unsafe(no_mangle)]
pub extern "C" fn venues_start_text_search(
    coordinator: *mut FfiCoordinator,
    term: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if coordinator.is_null() {
            return std::ptr::null_mut();
        }
        let Some(term) = str_arg(term) else {
            return std::ptr::null_mut();
        };
        let handle = unsafe { &mut *coordinator };
        let req = handle.inner.start_text_search(term);
        if req.is_some() {
            handle.last_results.clear();
        }
        request_or_null(req, FfiRequestKind::Search)
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Start a search around a coordinate. Returns null if a request is already
/// outstanding.
#[unsafe(no_mangle)]
pub extern "C" fn venues_start_location_search(
    coordinator: *mut FfiCoordinator,
    latitude: f64,
    longitude: f64,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if coordinator.is_null() {
            return std::ptr::null_mut();
        }
        let handle = unsafe { &mut *coordinator };
        let req = handle
            .inner
            .start_location_search(Coordinate::new(latitude, longitude));
        if req.is_some() {
            handle.last_results.clear();
        }
        request_or_null(req, FfiRequestKind::Search)
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Request the next page after the most recently reported results.
///
/// Returns null if a request is outstanding or no search has been made.
#[unsafe(no_mangle)]
pub extern "C" fn venues_page_forward(coordinator: *mut FfiCoordinator) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if coordinator.is_null() {
            return std::ptr::null_mut();
        }
        let handle = unsafe { &mut *coordinator };
        let req = handle.inner.page_forward(handle.last_results.clone());
        request_or_null(req, FfiRequestKind::Search)
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request for a single venue. Never gated by an outstanding
/// search.
#[unsafe(no_mangle)]
pub extern "C" fn venues_fetch_venue(
    coordinator: *const FfiCoordinator,
    id: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if coordinator.is_null() {
            return std::ptr::null_mut();
        }
        let Some(id) = str_arg(id) else {
            return std::ptr::null_mut();
        };
        let handle = unsafe { &*coordinator };
        FfiHttpRequest::from_core(handle.inner.fetch_venue_by_id(id), FfiRequestKind::Venue)
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Dispatch a deep link such as `/search?term=melbourne` or `/venue/<id>`.
///
/// Returns null if the link is not recognised or the search it names is
/// ignored.
#[unsafe(no_mangle)]
pub extern "C" fn venues_handle_deep_link(
    coordinator: *mut FfiCoordinator,
    link: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if coordinator.is_null() {
            return std::ptr::null_mut();
        }
        let Some(link) = str_arg(link) else {
            return std::ptr::null_mut();
        };
        let kind = match DeepLink::parse(link) {
            Some(DeepLink::Search { .. }) => FfiRequestKind::Search,
            Some(DeepLink::Venue { .. }) => FfiRequestKind::Venue,
            None => return std::ptr::null_mut(),
        };
        let handle = unsafe { &mut *coordinator };
        let req = handle.inner.handle_deep_link(link);
        if req.is_some() && kind == FfiRequestKind::Search {
            handle.last_results.clear();
        }
        request_or_null(req, kind)
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Completions
// ---------------------------------------------------------------------------

fn response(status: u16, body: *const c_char) -> HttpResponse {
    HttpResponse::new(status, str_arg(body).unwrap_or(""))
}

fn transport_error(message: *const c_char) -> TransportError {
    TransportError::new(str_arg(message).unwrap_or("transport failed"))
}

/// Report the response to a `Search` request. `body` may be null.
#[unsafe(no_mangle)]
pub extern "C" fn venues_complete_search(
    coordinator: *mut FfiCoordinator,
    status: u16,
    body: *const c_char,
) {
    if coordinator.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let handle = unsafe { &mut *coordinator };
        let queued = handle.inner.delegate().len();
        handle.inner.complete_search(Ok(response(status, body)));
        handle.record_results(queued);
    });
}

/// Report that a `Search` request got no response at all. `message` may be
/// null.
#[unsafe(no_mangle)]
pub extern "C" fn venues_complete_search_failed(
    coordinator: *mut FfiCoordinator,
    message: *const c_char,
) {
    if coordinator.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let handle = unsafe { &mut *coordinator };
        handle.inner.complete_search(Err(transport_error(message)));
    });
}

/// Report the response to a `Venue` request. `body` may be null.
#[unsafe(no_mangle)]
pub extern "C" fn venues_complete_venue_fetch(
    coordinator: *mut FfiCoordinator,
    status: u16,
    body: *const c_char,
) {
    if coordinator.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let handle = unsafe { &mut *coordinator };
        handle.inner.complete_venue_fetch(Ok(response(status, body)));
    });
}

/// Report that a `Venue` request got no response at all.
#[unsafe(no_mangle)]
pub extern "C" fn venues_complete_venue_fetch_failed(
    coordinator: *mut FfiCoordinator,
    message: *const c_char,
) {
    if coordinator.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let handle = unsafe { &mut *coordinator };
        handle.inner.complete_venue_fetch(Err(transport_error(message)));
    });
}

/// The input text changed; an empty `text` clears the displayed results.
#[unsafe(no_mangle)]
pub extern "C" fn venues_search_text_changed(
    coordinator: *mut FfiCoordinator,
    text: *const c_char,
) {
    if coordinator.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let handle = unsafe { &mut *coordinator };
        handle.inner.search_text_changed(str_arg(text).unwrap_or(""));
    });
}

/// Editing began on the search input.
#[unsafe(no_mangle)]
pub extern "C" fn venues_search_editing_began(
    coordinator: *mut FfiCoordinator,
    text: *const c_char,
) {
    if coordinator.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let handle = unsafe { &mut *coordinator };
        handle.inner.search_editing_began(str_arg(text).unwrap_or(""));
    });
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Pop the oldest queued event, or null when there is none.
/// Free with `venues_free_event`.
#[unsafe(no_mangle)]
pub extern "C" fn venues_next_event(coordinator: *mut FfiCoordinator) -> *mut FfiEvent {
    catch_unwind(|| {
        if coordinator.is_null() {
            return std::ptr::null_mut();
        }
        let handle = unsafe { &mut *coordinator };
        handle
            .inner
            .delegate_mut()
            .pop()
            .map_or(std::ptr::null_mut(), FfiEvent::from_core)
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a request returned by any request function. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn venues_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { FfiHttpRequest::free(req) });
}

/// Free an event returned by `venues_next_event`, including its payload.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn venues_free_event(event: *mut FfiEvent) {
    if event.is_null() {
        return;
    }
    let _ = catch_unwind(|| unsafe { FfiEvent::free(event) });
}

/// Free a C string allocated by this library, e.g. one the caller detached
/// from an event by nulling its field. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn venues_free_string(s: *mut c_char) {
    let _ = catch_unwind(|| free_c_string(s));
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
