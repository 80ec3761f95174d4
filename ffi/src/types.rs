//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible fields: `*mut c_char`
//! instead of `String`, pointer + length instead of `Vec`, and enums with
//! explicit discriminants. Strings handed to C never contain interior NULs;
//! any that appear in data are dropped on the way out.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use trips_core::{ApiError, Country, HttpMethod, HttpRequest, Trip, TripDraft};

/// Opaque handle to a `TripClient`.
pub struct FfiTripClient {
    pub(crate) inner: trips_core::TripClient,
}

/// Opaque handle to a `TripStore`.
pub struct FfiTripStore {
    pub(crate) inner: trips_core::TripStore,
}

/// Opaque handle to a `CountrySearch`.
pub struct FfiCountrySearch {
    pub(crate) inner: trips_core::CountrySearch,
}

/// Copy `s` into a heap C string owned by the caller.
pub(crate) fn to_c_string(s: &str) -> *mut c_char {
    let clean: String = s.chars().filter(|&c| c != '\0').collect();
    CString::new(clean).unwrap_or_default().into_raw()
}

/// Borrow a caller-owned C string. Null and invalid UTF-8 read as `None`.
pub(crate) fn from_c_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

/// Release a string produced by `to_c_string`. Null is ignored.
pub(crate) fn drop_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

/// Hand a vector to C as pointer + length. Empty vectors become null.
pub(crate) fn into_raw_parts<T>(items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let len = items.len() as u32;
    let mut boxed = items.into_boxed_slice();
    let ptr = boxed.as_mut_ptr();
    std::mem::forget(boxed);
    (ptr, len)
}

/// Take back a vector given out by `into_raw_parts`.
pub(crate) fn from_raw_parts<T>(ptr: *mut T, len: u32) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    let slice = std::ptr::slice_from_raw_parts_mut(ptr, len as usize);
    unsafe { Box::from_raw(slice) }.into_vec()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request for the host to execute. Free with `trips_free_request`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let headers: Vec<FfiHeader> = req
            .headers
            .iter()
            .map(|(k, v)| FfiHeader {
                key: to_c_string(k),
                value: to_c_string(v),
            })
            .collect();
        let (headers, headers_len) = into_raw_parts(headers);
        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            path: to_c_string(&req.path),
            headers,
            headers_len,
            body: req.body.as_deref().map_or(std::ptr::null_mut(), to_c_string),
        }))
    }
}

/// An HTTP response built by the host on its own stack. The FFI layer reads
/// but never frees these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

impl FfiHttpResponse {
    pub(crate) fn to_core(&self) -> trips_core::HttpResponse {
        trips_core::HttpResponse::new(self.status, from_c_str(self.body).unwrap_or(""))
    }
}

/// Trip fields supplied by the host for create/update. Caller-owned; null
/// fields read as empty strings.
#[repr(C)]
pub struct FfiTripDraft {
    pub name: *const c_char,
    pub country: *const c_char,
    pub start_date: *const c_char,
    pub end_date: *const c_char,
    pub notes: *const c_char,
}

impl FfiTripDraft {
    pub(crate) fn to_core(&self) -> TripDraft {
        let read = |p: *const c_char| from_c_str(p).unwrap_or("").to_string();
        TripDraft {
            name: read(self.name),
            country: read(self.country),
            start_date: read(self.start_date),
            end_date: read(self.end_date),
            notes: read(self.notes),
        }
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiOutcome`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NotFound = 1,
    Http = 2,
    Deserialization = 3,
    Serialization = 4,
    Transport = 5,
    Panic = 6,
    NullArg = 7,
}

/// Which intent a host-side failure belongs to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiIntent {
    Fetch = 0,
    Create = 1,
    Update = 2,
    Delete = 3,
}

/// Result of applying a response to the store. The store has already been
/// updated; this only tells the host how the request went.
#[repr(C)]
pub struct FfiOutcome {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
}

impl FfiOutcome {
    pub(crate) fn ok() -> *mut Self {
        Box::into_raw(Box::new(FfiOutcome {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
        }))
    }

    pub(crate) fn from_error(err: &ApiError) -> *mut Self {
        let (error_code, http_status) = match err {
            ApiError::NotFound => (FfiErrorCode::NotFound, 404),
            ApiError::Http { status, .. } => (FfiErrorCode::Http, *status),
            ApiError::Deserialization(_) => (FfiErrorCode::Deserialization, 0),
            ApiError::Serialization(_) => (FfiErrorCode::Serialization, 0),
            ApiError::Transport(_) => (FfiErrorCode::Transport, 0),
        };
        Box::into_raw(Box::new(FfiOutcome {
            error_code,
            error_message: to_c_string(&err.to_string()),
            http_status,
        }))
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiOutcome {
            error_code: FfiErrorCode::NullArg,
            error_message: to_c_string(&format!("null argument: {name}")),
            http_status: 0,
        }))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiOutcome {
            error_code: FfiErrorCode::Panic,
            error_message: to_c_string(msg),
            http_status: 0,
        }))
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// A trip exposed to C. `has_id` is false for drafts, in which case `id`
/// is 0 and meaningless.
#[repr(C)]
pub struct FfiTrip {
    pub has_id: bool,
    pub id: i64,
    pub name: *mut c_char,
    pub country: *mut c_char,
    pub start_date: *mut c_char,
    pub end_date: *mut c_char,
    pub notes: *mut c_char,
}

impl FfiTrip {
    fn from_core(trip: &Trip) -> Self {
        FfiTrip {
            has_id: trip.id.is_some(),
            id: trip.id.unwrap_or_default(),
            name: to_c_string(&trip.name),
            country: to_c_string(&trip.country),
            start_date: to_c_string(&trip.start_date),
            end_date: to_c_string(&trip.end_date),
            notes: to_c_string(&trip.notes),
        }
    }

    fn free_fields(&self) {
        drop_c_string(self.name);
        drop_c_string(self.country);
        drop_c_string(self.start_date);
        drop_c_string(self.end_date);
        drop_c_string(self.notes);
    }
}

/// A copy of the store's items. Free with `trips_free_trip_list`.
#[repr(C)]
pub struct FfiTripList {
    pub items: *mut FfiTrip,
    pub len: u32,
}

impl FfiTripList {
    pub(crate) fn from_core(trips: &[Trip]) -> *mut Self {
        let (items, len) = into_raw_parts(trips.iter().map(FfiTrip::from_core).collect());
        Box::into_raw(Box::new(FfiTripList { items, len }))
    }

    pub(crate) fn free(list: Box<Self>) {
        for trip in from_raw_parts(list.items, list.len) {
            trip.free_fields();
        }
    }
}

/// A country suggestion exposed to C.
#[repr(C)]
pub struct FfiCountry {
    pub name: *mut c_char,
    pub cca2: *mut c_char,
    pub flag: *mut c_char,
}

/// A copy of the current suggestions. Free with `trips_free_country_list`.
#[repr(C)]
pub struct FfiCountryList {
    pub items: *mut FfiCountry,
    pub len: u32,
}

impl FfiCountryList {
    pub(crate) fn from_core(countries: &[Country]) -> *mut Self {
        let converted = countries
            .iter()
            .map(|c| FfiCountry {
                name: to_c_string(&c.name),
                cca2: to_c_string(&c.cca2),
                flag: to_c_string(&c.flag),
            })
            .collect();
        let (items, len) = into_raw_parts(converted);
        Box::into_raw(Box::new(FfiCountryList { items, len }))
    }

    pub(crate) fn free(list: Box<Self>) {
        for country in from_raw_parts(list.items, list.len) {
            drop_c_string(country.name);
            drop_c_string(country.cca2);
            drop_c_string(country.flag);
        }
    }
}
