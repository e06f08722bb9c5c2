//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! tagged enums with explicit discriminants. Conversion functions live here
//! to keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use venues_core::{EventQueue, HttpMethod, Item, SearchCoordinator, SearchEvent, Venue};

/// Opaque handle to a search session. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiCoordinator {
    pub(crate) inner: SearchCoordinator<EventQueue>,
    /// The list most recently reported through a results event. Page
    /// requests continue from here.
    pub(crate) last_results: Vec<Item>,
}

impl FfiCoordinator {
    pub(crate) fn new(inner: SearchCoordinator<EventQueue>) -> Self {
        Self {
            inner,
            last_results: Vec::new(),
        }
    }

    /// Remember the results list reported by the events queued at index
    /// `since` or later. Older undrained events belong to earlier requests
    /// and are ignored.
    pub(crate) fn record_results(&mut self, since: usize) {
        let latest = self
            .inner
            .delegate()
            .iter()
            .skip(since)
            .filter_map(|event| match event {
                SearchEvent::Results(items) => Some(items),
                _ => None,
            })
            .last();
        if let Some(items) = latest {
            self.last_results = items.clone();
        }
    }
}

/// Copy a Rust string into a heap-allocated C string. Interior NULs yield an
/// empty string.
pub(crate) fn c_string(s: impl Into<String>) -> *mut c_char {
    CString::new(s.into()).unwrap_or_default().into_raw()
}

fn c_string_opt(s: Option<impl Into<String>>) -> *mut c_char {
    s.map_or(std::ptr::null_mut(), c_string)
}

/// Free a C string produced by `c_string`. Null is ignored.
pub(crate) fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Hand a `Vec` to C as a pointer plus length. Empty vectors become null.
fn into_raw_parts<T>(mut v: Vec<T>) -> (*mut T, u32) {
    let len = v.len() as u32;
    if v.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    v.shrink_to_fit();
    let ptr = v.as_mut_ptr();
    std::mem::forget(v);
    (ptr, len)
}

/// Take back a `Vec` created by `into_raw_parts`.
///
/// # Safety
///
/// `ptr` and `len` must come from `into_raw_parts` and not be reused.
unsafe fn from_raw_parts<T>(ptr: *mut T, len: u32) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    unsafe { Vec::from_raw_parts(ptr, len as usize, len as usize) }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

/// Which completion function the response belongs to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiRequestKind {
    /// Report through `venues_complete_search*`.
    Search = 0,
    /// Report through `venues_complete_venue_fetch*`.
    Venue = 1,
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// The C caller executes the request and reports the response through the
/// completion function named by `kind`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub kind: FfiRequestKind,
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: venues_core::HttpRequest, kind: FfiRequestKind) -> *mut Self {
        let headers: Vec<FfiHeader> = req
            .headers
            .into_iter()
            .map(|(k, v)| FfiHeader {
                key: c_string(k),
                value: c_string(v),
            })
            .collect();
        let (headers, headers_len) = into_raw_parts(headers);

        Box::into_raw(Box::new(FfiHttpRequest {
            kind,
            method: req.method.into(),
            url: c_string(req.url),
            headers,
            headers_len,
        }))
    }

    /// Release a request created by `from_core`.
    ///
    /// # Safety
    ///
    /// `req` must come from `from_core` and not be freed twice.
    pub(crate) unsafe fn free(req: *mut Self) {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.url);
        for h in unsafe { from_raw_parts(req.headers, req.headers_len) } {
            free_c_string(h.key);
            free_c_string(h.value);
        }
    }
}

// ---------------------------------------------------------------------------
// Venue types
// ---------------------------------------------------------------------------

/// A venue flattened for display. Absent strings are null.
#[repr(C)]
pub struct FfiVenue {
    pub id: *mut c_char,
    pub name: *mut c_char,
    /// "Lune's", "Chris'".
    pub possessive_name: *mut c_char,
    /// Address lines joined by newlines; empty when unknown.
    pub address: *mut c_char,
    pub thumbnail_url: *mut c_char,
    pub photo_url: *mut c_char,
    pub hours_status: *mut c_char,
    /// -1 = unknown, 0 = closed, 1 = open.
    pub is_open: i32,
}

impl FfiVenue {
    pub(crate) fn from_core(venue: Venue) -> Self {
        let photo = venue.photos.as_ref().and_then(|p| p.first_venue_photo());
        let thumbnail_url = photo.and_then(|p| p.thumbnail_url()).map(String::from);
        let photo_url = photo.and_then(|p| p.url()).map(String::from);
        let address = venue
            .location
            .as_ref()
            .map(|l| l.display_address())
            .unwrap_or_default();
        let possessive_name = venue.possessive_name();
        let (hours_status, is_open) = match venue.hours {
            Some(h) => (h.status, h.is_open.map_or(-1, i32::from)),
            None => (None, -1),
        };

        FfiVenue {
            id: c_string_opt(venue.id),
            name: c_string_opt(venue.name),
            possessive_name: c_string_opt(possessive_name),
            address: c_string(address),
            thumbnail_url: c_string_opt(thumbnail_url),
            photo_url: c_string_opt(photo_url),
            hours_status: c_string_opt(hours_status),
            is_open,
        }
    }

    /// Free the C-string fields (but not the struct itself).
    fn free_fields(&self) {
        free_c_string(self.id);
        free_c_string(self.name);
        free_c_string(self.possessive_name);
        free_c_string(self.address);
        free_c_string(self.thumbnail_url);
        free_c_string(self.photo_url);
        free_c_string(self.hours_status);
    }
}

/// The venues of a results list, in display order.
#[repr(C)]
pub struct FfiVenueList {
    pub items: *mut FfiVenue,
    pub len: u32,
}

impl FfiVenueList {
    /// Items without a venue still take a slot so indices match the list the
    /// session pages from.
    fn from_items(items: Vec<Item>) -> Self {
        let venues: Vec<FfiVenue> = items
            .into_iter()
            .map(|item| FfiVenue::from_core(item.venue.unwrap_or_default()))
            .collect();
        let (items, len) = into_raw_parts(venues);
        FfiVenueList { items, len }
    }
}

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// Tag that tells the caller (and `venues_free_event`) what `data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiEventTag {
    SearchStarting = 0,
    SearchCleared = 1,
    /// `data` is an `FfiVenueList`.
    Results = 2,
    ResultsLimitReached = 3,
    NoResults = 4,
    Error = 5,
    /// `data` is an `FfiVenue`.
    VenueFetched = 6,
    VenueFetchError = 7,
}

/// One session event. `data` is null except for `Results` and
/// `VenueFetched`.
#[repr(C)]
pub struct FfiEvent {
    pub tag: FfiEventTag,
    pub data: *mut c_void,
}

impl FfiEvent {
    pub(crate) fn from_core(event: SearchEvent) -> *mut Self {
        let (tag, data) = match event {
            SearchEvent::SearchStarting => (FfiEventTag::SearchStarting, std::ptr::null_mut()),
            SearchEvent::SearchCleared => (FfiEventTag::SearchCleared, std::ptr::null_mut()),
            SearchEvent::Results(items) => (
                FfiEventTag::Results,
                Box::into_raw(Box::new(FfiVenueList::from_items(items))) as *mut c_void,
            ),
            SearchEvent::ResultsLimitReached => {
                (FfiEventTag::ResultsLimitReached, std::ptr::null_mut())
            }
            SearchEvent::NoResults => (FfiEventTag::NoResults, std::ptr::null_mut()),
            SearchEvent::Error => (FfiEventTag::Error, std::ptr::null_mut()),
            SearchEvent::VenueFetched(venue) => (
                FfiEventTag::VenueFetched,
                Box::into_raw(Box::new(FfiVenue::from_core(venue))) as *mut c_void,
            ),
            SearchEvent::VenueFetchError => (FfiEventTag::VenueFetchError, std::ptr::null_mut()),
        };
        Box::into_raw(Box::new(FfiEvent { tag, data }))
    }

    /// Release an event created by `from_core`, using `tag` to free `data`.
    ///
    /// # Safety
    ///
    /// `event` must come from `from_core` and not be freed twice.
    pub(crate) unsafe fn free(event: *mut Self) {
        let event = unsafe { Box::from_raw(event) };
        if event.data.is_null() {
            return;
        }
        match event.tag {
            FfiEventTag::Results => {
                let list = unsafe { Box::from_raw(event.data as *mut FfiVenueList) };
                for venue in unsafe { from_raw_parts(list.items, list.len) } {
                    venue.free_fields();
                }
            }
            FfiEventTag::VenueFetched => {
                let venue = unsafe { Box::from_raw(event.data as *mut FfiVenue) };
                venue.free_fields();
            }
            _ => {}
        }
    }
}
