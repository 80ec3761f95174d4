//! Stateless HTTP request builder and response parser for the trips API.
//!
//! # Design
//! `TripClient` holds only a `base_url`. Each endpoint is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`. The round-trip in between belongs to a
//! `Transport`, so this module stays deterministic and free of I/O.
//!
//! Any 2xx status counts as success. The backend answers POST with 201 in
//! some deployments and 200 in others.

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Country, Trip, TripDraft, TripId};

/// Synchronous, stateless client for the trips API.
#[derive(Debug, Clone)]
pub struct TripClient {
    base_url: String,
}

impl TripClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url)
    }

    pub fn build_list_trips(&self) -> HttpRequest {
        HttpRequest::bare(HttpMethod::Get, format!("{}/trips", self.base_url))
    }

    pub fn build_create_trip(&self, draft: &TripDraft) -> Result<HttpRequest, ApiError> {
        let body = to_json(draft)?;
        Ok(HttpRequest::json(
            HttpMethod::Post,
            format!("{}/trips", self.base_url),
            body,
        ))
    }

    pub fn build_update_trip(&self, id: TripId, draft: &TripDraft) -> Result<HttpRequest, ApiError> {
        let body = to_json(draft)?;
        Ok(HttpRequest::json(
            HttpMethod::Put,
            format!("{}/trips/{id}", self.base_url),
            body,
        ))
    }

    pub fn build_delete_trip(&self, id: TripId) -> HttpRequest {
        HttpRequest::bare(HttpMethod::Delete, format!("{}/trips/{id}", self.base_url))
    }

    pub fn build_search_countries(&self, query: &str) -> HttpRequest {
        let q: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        HttpRequest::bare(
            HttpMethod::Get,
            format!("{}/countries?q={q}", self.base_url),
        )
    }

    pub fn parse_list_trips(&self, response: HttpResponse) -> Result<Vec<Trip>, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }

    pub fn parse_create_trip(&self, response: HttpResponse) -> Result<Trip, ApiError> {
        check_status(&response)?;
        saved_trip(&response.body)
    }

    pub fn parse_update_trip(&self, response: HttpResponse) -> Result<Trip, ApiError> {
        check_status(&response)?;
        saved_trip(&response.body)
    }

    /// The body is ignored; the removed id is the one the caller sent.
    pub fn parse_delete_trip(&self, response: HttpResponse, id: TripId) -> Result<TripId, ApiError> {
        check_status(&response)?;
        Ok(id)
    }

    pub fn parse_search_countries(&self, response: HttpResponse) -> Result<Vec<Country>, ApiError> {
        check_status(&response)?;
        from_json(&response.body)
    }
}

/// Map non-2xx status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn from_json<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// A saved trip must carry its server id.
fn saved_trip(body: &str) -> Result<Trip, ApiError> {
    let trip: Trip = from_json(body)?;
    if trip.id.is_none() {
        return Err(ApiError::Deserialization("saved trip has no id".to_string()));
    }
    Ok(trip)
}
