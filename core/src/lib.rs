//! Client core for the trips service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and keeps the local list of
//! trips in sync with the backend through a small reducer.
//!
//! # Design
//! - `TripClient` is stateless; it holds only `base_url`.
//! - `TripStore` is the single owner of the trip list and its loading/error
//!   flags. Every change goes through `TripStore::apply`.
//! - `Dispatcher` runs an intent through a host-provided `Transport` and
//!   feeds each phase to the store.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod search;
pub mod store;
pub mod types;

pub use client::TripClient;
pub use config::ClientConfig;
pub use dispatch::{Dispatcher, Transport};
pub use error::{ApiError, ConfigError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use search::CountrySearch;
pub use store::{Phase, RequestTag, TripAction, TripState, TripStore};
pub use types::{Country, Trip, TripDraft, TripId, TripPatch};
