//! Domain DTOs for the trips API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.
//!
//! A `Trip` without an `id` is a draft. The backend accepts drafts as
//! `TripDraft` bodies on both POST and PUT, so update always sends the full
//! set of fields. `TripPatch` exists for callers that only know which fields
//! changed.

use serde::{Deserialize, Serialize};

/// Server-assigned trip identifier.
pub type TripId = i64;

/// A trip record. `id` is `None` until the backend persists it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Trip {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TripId>,
    pub name: String,
    pub country: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub notes: String,
}

impl Trip {
    /// Strip the id, producing the body the backend expects.
    pub fn to_draft(&self) -> TripDraft {
        TripDraft {
            name: self.name.clone(),
            country: self.country.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// Request payload for creating or replacing a trip.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TripDraft {
    pub name: String,
    pub country: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub notes: String,
}

impl TripDraft {
    /// Attach a server id, as the backend does on save.
    pub fn with_id(self, id: TripId) -> Trip {
        Trip {
            id: Some(id),
            name: self.name,
            country: self.country,
            start_date: self.start_date,
            end_date: self.end_date,
            notes: self.notes,
        }
    }
}

/// Field-level changes to an existing trip. Omitted fields keep the value of
/// the trip the patch is applied to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TripPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TripPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.country.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.notes.is_none()
    }

    /// Merge onto `base`, yielding the full body for PUT.
    pub fn apply_to(self, base: &Trip) -> TripDraft {
        let mut draft = base.to_draft();
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(country) = self.country {
            draft.country = country;
        }
        if let Some(start_date) = self.start_date {
            draft.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            draft.end_date = end_date;
        }
        if let Some(notes) = self.notes {
            draft.notes = notes;
        }
        draft
    }
}

/// A country suggestion from `/countries`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Country {
    pub name: String,
    /// ISO 3166-1 alpha-2 code.
    pub cca2: String,
    pub flag: String,
}
