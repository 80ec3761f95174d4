//! C-ABI wrapper around `trips-core`.
//!
//! # Overview
//! Lets a view layer written in any language with a C FFI drive the trip
//! store: it asks for requests, executes them with its own HTTP stack, and
//! hands the responses back to be parsed and applied to the store.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `trips_build_*` mirror `TripClient::build_*` 1:1.
//! - `trips_store_apply_*` parse a response and feed the outcome to the
//!   store in one call, returning an `FfiOutcome` describing the request.
//! - The C caller owns all returned pointers and must call the matching
//!   `trips_free_*` function to release them.

pub mod types;

use std::os::raw::c_char;
use std::panic::catch_unwind;

use trips_core::{ApiError, Phase, RequestTag, TripAction};

use types::*;

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Create a `TripClient` bound to `base_url`.
///
/// Returns null if `base_url` is null or not valid UTF-8.
/// Free with `trips_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn trips_client_new(base_url: *const c_char) -> *mut FfiTripClient {
    catch_unwind(|| match from_c_str(base_url) {
        Some(url) => Box::into_raw(Box::new(FfiTripClient {
            inner: trips_core::TripClient::new(url),
        })),
        None => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `trips_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn trips_client_free(client: *mut FfiTripClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

/// Create an empty store. Free with `trips_store_free`.
#[unsafe(no_mangle)]
pub extern "C" fn trips_store_new() -> *mut FfiTripStore {
    catch_unwind(|| {
        Box::into_raw(Box::new(FfiTripStore {
            inner: trips_core::TripStore::new(),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a store created by `trips_store_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn trips_store_free(store: *mut FfiTripStore) {
    if !store.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(store) });
        });
    }
}

/// Create an empty country search. Free with `trips_search_free`.
#[unsafe(no_mangle)]
pub extern "C" fn trips_search_new() -> *mut FfiCountrySearch {
    catch_unwind(|| {
        Box::into_raw(Box::new(FfiCountrySearch {
            inner: trips_core::CountrySearch::new(),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a search created by `trips_search_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn trips_search_free(search: *mut FfiCountrySearch) {
    if !search.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(search) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build the GET /trips request. Returns null if `client` is null.
#[unsafe(no_mangle)]
pub extern "C" fn trips_build_list_trips(client: *const FfiTripClient) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_list_trips())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the POST /trips request for `draft`.
///
/// Returns null if `client` or `draft` is null, or if serialization fails.
#[unsafe(no_mangle)]
pub extern "C" fn trips_build_create_trip(
    client: *const FfiTripClient,
    draft: *const FfiTripDraft,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || draft.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let draft = unsafe { &*draft }.to_core();
        match client.inner.build_create_trip(&draft) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the PUT /trips/{id} request carrying every field of `draft`.
///
/// Returns null if `client` or `draft` is null, or if serialization fails.
#[unsafe(no_mangle)]
pub extern "C" fn trips_build_update_trip(
    client: *const FfiTripClient,
    id: i64,
    draft: *const FfiTripDraft,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || draft.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let draft = unsafe { &*draft }.to_core();
        match client.inner.build_update_trip(id, &draft) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the DELETE /trips/{id} request. Returns null if `client` is null.
#[unsafe(no_mangle)]
pub extern "C" fn trips_build_delete_trip(
    client: *const FfiTripClient,
    id: i64,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_delete_trip(id))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the GET /countries?q= request. Returns null if an argument is null.
#[unsafe(no_mangle)]
pub extern "C" fn trips_build_search_countries(
    client: *const FfiTripClient,
    query: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        let Some(query) = from_c_str(query) else {
            return std::ptr::null_mut();
        };
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_search_countries(query))
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Store transitions
// ---------------------------------------------------------------------------

/// Mark a fetch as started and return its tag. Pass the tag back to
/// `trips_store_apply_list` (or `trips_store_fail`) when it settles.
///
/// Returns 0 if `store` is null.
#[unsafe(no_mangle)]
pub extern "C" fn trips_store_begin_fetch(store: *mut FfiTripStore) -> u64 {
    catch_unwind(|| {
        if store.is_null() {
            return 0;
        }
        let store = unsafe { &mut *store };
        let tag = store.inner.next_fetch_tag();
        store.inner.apply(TripAction::Fetch {
            tag,
            phase: Phase::Pending,
        });
        tag.0
    })
    .unwrap_or(0)
}

/// Shared body of the `trips_store_apply_*` functions: null checks, response
/// conversion, and mapping the applied result to an `FfiOutcome`.
fn apply_response<F>(
    store: *mut FfiTripStore,
    client: *const FfiTripClient,
    response: *const FfiHttpResponse,
    apply: F,
) -> *mut FfiOutcome
where
    F: FnOnce(
        &mut trips_core::TripStore,
        &trips_core::TripClient,
        trips_core::HttpResponse,
    ) -> Result<(), ApiError>,
{
    if store.is_null() {
        return FfiOutcome::null_arg("store");
    }
    if client.is_null() {
        return FfiOutcome::null_arg("client");
    }
    if response.is_null() {
        return FfiOutcome::null_arg("response");
    }
    let store = unsafe { &mut *store };
    let client = unsafe { &*client };
    let response = unsafe { &*response }.to_core();
    match apply(&mut store.inner, &client.inner, response) {
        Ok(()) => FfiOutcome::ok(),
        Err(err) => FfiOutcome::from_error(&err),
    }
}

/// Settle an intent's outcome into the store and pass the error through.
fn settle<V>(
    store: &mut trips_core::TripStore,
    outcome: Result<V, ApiError>,
    action: impl FnOnce(Phase<V>) -> TripAction,
) -> Result<(), ApiError> {
    match outcome {
        Ok(value) => {
            store.apply(action(Phase::Fulfilled(value)));
            Ok(())
        }
        Err(err) => {
            store.apply(action(Phase::Rejected(err.to_string())));
            Err(err)
        }
    }
}

/// Apply a GET /trips response for the fetch tagged `tag`.
///
/// If a newer fetch has started since `tag` was issued, the response is
/// ignored and the store is left as it was. The outcome still reports how
/// the request itself went, so `Ok` does not mean the list was replaced.
#[unsafe(no_mangle)]
pub extern "C" fn trips_store_apply_list(
    store: *mut FfiTripStore,
    client: *const FfiTripClient,
    tag: u64,
    response: *const FfiHttpResponse,
) -> *mut FfiOutcome {
    catch_unwind(|| {
        apply_response(store, client, response, |store, client, resp| {
            let outcome = client.parse_list_trips(resp);
            settle(store, outcome, |phase| TripAction::Fetch {
                tag: RequestTag(tag),
                phase,
            })
        })
    })
    .unwrap_or_else(|_| FfiOutcome::panic("panic in trips_store_apply_list"))
}

/// Apply a POST /trips response.
#[unsafe(no_mangle)]
pub extern "C" fn trips_store_apply_create(
    store: *mut FfiTripStore,
    client: *const FfiTripClient,
    response: *const FfiHttpResponse,
) -> *mut FfiOutcome {
    catch_unwind(|| {
        apply_response(store, client, response, |store, client, resp| {
            settle(store, client.parse_create_trip(resp), TripAction::Create)
        })
    })
    .unwrap_or_else(|_| FfiOutcome::panic("panic in trips_store_apply_create"))
}

/// Apply a PUT /trips/{id} response.
#[unsafe(no_mangle)]
pub extern "C" fn trips_store_apply_update(
    store: *mut FfiTripStore,
    client: *const FfiTripClient,
    response: *const FfiHttpResponse,
) -> *mut FfiOutcome {
    catch_unwind(|| {
        apply_response(store, client, response, |store, client, resp| {
            settle(store, client.parse_update_trip(resp), TripAction::Update)
        })
    })
    .unwrap_or_else(|_| FfiOutcome::panic("panic in trips_store_apply_update"))
}

/// Apply a DELETE /trips/{id} response for the trip `id` that was sent.
#[unsafe(no_mangle)]
pub extern "C" fn trips_store_apply_delete(
    store: *mut FfiTripStore,
    client: *const FfiTripClient,
    id: i64,
    response: *const FfiHttpResponse,
) -> *mut FfiOutcome {
    catch_unwind(|| {
        apply_response(store, client, response, |store, client, resp| {
            settle(store, client.parse_delete_trip(resp, id), TripAction::Delete)
        })
    })
    .unwrap_or_else(|_| FfiOutcome::panic("panic in trips_store_apply_delete"))
}

/// Record that the host could not complete a request at all (no response).
/// `tag` is only read for `FfiIntent::Fetch`. A null `message` is recorded
/// as "request failed".
#[unsafe(no_mangle)]
pub extern "C" fn trips_store_fail(
    store: *mut FfiTripStore,
    intent: FfiIntent,
    tag: u64,
    message: *const c_char,
) {
    if store.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let store = unsafe { &mut *store };
        let message = from_c_str(message).unwrap_or("request failed").to_string();
        let action = match intent {
            FfiIntent::Fetch => TripAction::Fetch {
                tag: RequestTag(tag),
                phase: Phase::Rejected(message),
            },
            FfiIntent::Create => TripAction::Create(Phase::Rejected(message)),
            FfiIntent::Update => TripAction::Update(Phase::Rejected(message)),
            FfiIntent::Delete => TripAction::Delete(Phase::Rejected(message)),
        };
        store.inner.apply(action);
    });
}

// ---------------------------------------------------------------------------
// Store reads
// ---------------------------------------------------------------------------

/// Whether a fetch is outstanding. False for a null store.
#[unsafe(no_mangle)]
pub extern "C" fn trips_store_is_loading(store: *const FfiTripStore) -> bool {
    if store.is_null() {
        return false;
    }
    catch_unwind(|| unsafe { &*store }.inner.is_loading()).unwrap_or(false)
}

/// The last fetch error, or null if there is none.
/// Free a non-null result with `trips_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn trips_store_error(store: *const FfiTripStore) -> *mut c_char {
    if store.is_null() {
        return std::ptr::null_mut();
    }
    catch_unwind(|| {
        unsafe { &*store }
            .inner
            .error()
            .map_or(std::ptr::null_mut(), to_c_string)
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Copy of the current items, in display order.
/// Returns null for a null store. Free with `trips_free_trip_list`.
#[unsafe(no_mangle)]
pub extern "C" fn trips_store_items(store: *const FfiTripStore) -> *mut FfiTripList {
    if store.is_null() {
        return std::ptr::null_mut();
    }
    catch_unwind(|| FfiTripList::from_core(unsafe { &*store }.inner.items()))
        .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Country search
// ---------------------------------------------------------------------------

/// Set the query. Returns true when the host should build and send a
/// search request for it; a blank query clears the suggestions instead.
#[unsafe(no_mangle)]
pub extern "C" fn trips_search_set_query(
    search: *mut FfiCountrySearch,
    query: *const c_char,
) -> bool {
    if search.is_null() {
        return false;
    }
    catch_unwind(|| {
        let search = unsafe { &mut *search };
        search.inner.set_query(from_c_str(query).unwrap_or(""))
    })
    .unwrap_or(false)
}

/// Apply a /countries response for `query`. Failures are swallowed and
/// leave the suggestions empty. A null `response` counts as a failure.
#[unsafe(no_mangle)]
pub extern "C" fn trips_search_apply(
    search: *mut FfiCountrySearch,
    client: *const FfiTripClient,
    query: *const c_char,
    response: *const FfiHttpResponse,
) {
    if search.is_null() || client.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let search = unsafe { &mut *search };
        let client = unsafe { &*client };
        let query = from_c_str(query).unwrap_or("");
        let outcome = if response.is_null() {
            Err("no response".to_string())
        } else {
            client
                .inner
                .parse_search_countries(unsafe { &*response }.to_core())
                .map_err(|e| e.to_string())
        };
        search.inner.apply_results(query, outcome);
    });
}

/// Copy of the current suggestions. Free with `trips_free_country_list`.
#[unsafe(no_mangle)]
pub extern "C" fn trips_search_results(search: *const FfiCountrySearch) -> *mut FfiCountryList {
    if search.is_null() {
        return std::ptr::null_mut();
    }
    catch_unwind(|| FfiCountryList::from_core(unsafe { &*search }.inner.results()))
        .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a request returned by any `trips_build_*` function. Safe with null.
#[unsafe(no_mangle)]
pub extern "C" fn trips_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        drop_c_string(req.path);
        drop_c_string(req.body);
        for h in from_raw_parts(req.headers, req.headers_len) {
            drop_c_string(h.key);
            drop_c_string(h.value);
        }
    });
}

/// Free an outcome returned by any `trips_store_apply_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn trips_free_outcome(outcome: *mut FfiOutcome) {
    if outcome.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let outcome = unsafe { Box::from_raw(outcome) };
        drop_c_string(outcome.error_message);
    });
}

/// Free a list returned by `trips_store_items`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn trips_free_trip_list(list: *mut FfiTripList) {
    if list.is_null() {
        return;
    }
    let _ = catch_unwind(|| FfiTripList::free(unsafe { Box::from_raw(list) }));
}

/// Free a list returned by `trips_search_results`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn trips_free_country_list(list: *mut FfiCountryList) {
    if list.is_null() {
        return;
    }
    let _ = catch_unwind(|| FfiCountryList::free(unsafe { Box::from_raw(list) }));
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn trips_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| drop_c_string(s));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
