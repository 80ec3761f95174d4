//! The trip store: in-memory trips plus their sync status.
//!
//! # Design
//! Every intent (fetch, create, update, delete) settles in three phases, and
//! `TripStore::apply` is the only place state changes. Create and update
//! share `upsert`: replace the item with the same id, else insert at the head
//! so new records show first.
//!
//! Fetches are tagged with a monotonic `RequestTag`. An outcome older than the
//! newest pending fetch is dropped, so a slow response can never overwrite a
//! newer list. Create/update/delete are untagged and last writer wins.
//!
//! Create/update/delete failures never reach `TripState::error`; only fetch
//! failures do. The caller gets the error back from `Dispatcher`.

use tracing::{debug, warn};

use crate::types::{Trip, TripId};

/// Outcome of one asynchronous intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase<T> {
    Pending,
    Fulfilled(T),
    Rejected(String),
}

/// Sequence number attached to fetch-all requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTag(pub u64);

/// Everything the reducer understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripAction {
    Fetch { tag: RequestTag, phase: Phase<Vec<Trip>> },
    Create(Phase<Trip>),
    Update(Phase<Trip>),
    Delete(Phase<TripId>),
}

impl TripAction {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            TripAction::Fetch { .. } => "fetch",
            TripAction::Create(_) => "create",
            TripAction::Update(_) => "update",
            TripAction::Delete(_) => "delete",
        }
    }
}

/// The state a view renders from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripState {
    pub items: Vec<Trip>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Owner of `TripState`. Lives at the view root and is passed by `&mut`.
#[derive(Debug, Clone, Default)]
pub struct TripStore {
    state: TripState,
    last_tag: u64,
    newest_fetch: Option<RequestTag>,
}

impl TripStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TripState {
        &self.state
    }

    pub fn items(&self) -> &[Trip] {
        &self.state.items
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn get(&self, id: TripId) -> Option<&Trip> {
        self.state.items.iter().find(|t| t.id == Some(id))
    }

    /// Issue the tag for a new fetch-all request.
    pub fn next_fetch_tag(&mut self) -> RequestTag {
        self.last_tag += 1;
        RequestTag(self.last_tag)
    }

    pub fn apply(&mut self, action: TripAction) {
        debug!(action = action.name(), "applying trip action");
        match action {
            TripAction::Fetch { tag, phase } => self.apply_fetch(tag, phase),
            TripAction::Create(phase) | TripAction::Update(phase) => match phase {
                Phase::Pending => {}
                Phase::Fulfilled(saved) => upsert(&mut self.state.items, saved),
                Phase::Rejected(message) => warn!(%message, "saving trip failed"),
            },
            TripAction::Delete(phase) => match phase {
                Phase::Pending => {}
                Phase::Fulfilled(id) => self.state.items.retain(|t| t.id != Some(id)),
                Phase::Rejected(message) => warn!(%message, "deleting trip failed"),
            },
        }
    }

    fn apply_fetch(&mut self, tag: RequestTag, phase: Phase<Vec<Trip>>) {
        if let Phase::Pending = phase {
            if let Some(newest) = self.newest_fetch {
                if tag < newest {
                    debug!(tag = tag.0, newest = newest.0, "ignoring start of stale fetch");
                    return;
                }
            }
            self.newest_fetch = self.newest_fetch.max(Some(tag));
            self.last_tag = self.last_tag.max(tag.0);
            self.state.loading = true;
            self.state.error = None;
            return;
        }

        if let Some(newest) = self.newest_fetch {
            if tag < newest {
                debug!(tag = tag.0, newest = newest.0, "dropping stale fetch outcome");
                return;
            }
        }
        self.newest_fetch = Some(tag);
        self.last_tag = self.last_tag.max(tag.0);
        self.state.loading = false;

        match phase {
            Phase::Fulfilled(list) => self.state.items = list,
            Phase::Rejected(message) => {
                warn!(%message, "fetching trips failed");
                self.state.error = Some(message);
            }
            Phase::Pending => {}
        }
    }
}

/// Replace the trip with `saved.id`, or insert it at the head.
fn upsert(items: &mut Vec<Trip>, saved: Trip) {
    match items.iter().position(|t| t.id == saved.id) {
        Some(index) => items[index] = saved,
        None => items.insert(0, saved),
    }
}
