//! Runs intents end to end: pending, round-trip, then fulfilled or rejected.
//!
//! # Design
//! The network stays outside this crate. A host implements `Transport` with
//! whatever HTTP stack it has; `Dispatcher` glues `TripClient` and the store
//! together around it. Calls are fire-once with no retries or timeouts.

use tracing::debug;

use crate::client::TripClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::search::CountrySearch;
use crate::store::{Phase, TripAction, TripStore};
use crate::types::{Trip, TripDraft, TripId};

/// Executes one HTTP round-trip for the core.
///
/// Non-2xx responses are data, not errors: return them as `HttpResponse`
/// and let `TripClient` interpret the status. Only failures to get a response
/// at all belong in `Err`, usually as `ApiError::Transport`.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

pub struct Dispatcher<T> {
    client: TripClient,
    transport: T,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(client: TripClient, transport: T) -> Self {
        Self { client, transport }
    }

    /// Reload the whole list. The failure is also recorded in the store.
    pub fn fetch_all(&self, store: &mut TripStore) -> Result<(), ApiError> {
        let tag = store.next_fetch_tag();
        store.apply(TripAction::Fetch {
            tag,
            phase: Phase::Pending,
        });
        let outcome = self
            .send(self.client.build_list_trips())
            .and_then(|resp| self.client.parse_list_trips(resp));
        match outcome {
            Ok(list) => {
                debug!(count = list.len(), "fetched trips");
                store.apply(TripAction::Fetch {
                    tag,
                    phase: Phase::Fulfilled(list),
                });
                Ok(())
            }
            Err(err) => {
                store.apply(TripAction::Fetch {
                    tag,
                    phase: Phase::Rejected(err.to_string()),
                });
                Err(err)
            }
        }
    }

    pub fn create(&self, store: &mut TripStore, draft: &TripDraft) -> Result<Trip, ApiError> {
        store.apply(TripAction::Create(Phase::Pending));
        let outcome = self
            .client
            .build_create_trip(draft)
            .and_then(|req| self.send(req))
            .and_then(|resp| self.client.parse_create_trip(resp));
        settle(store, outcome, TripAction::Create)
    }

    pub fn update(
        &self,
        store: &mut TripStore,
        id: TripId,
        draft: &TripDraft,
    ) -> Result<Trip, ApiError> {
        store.apply(TripAction::Update(Phase::Pending));
        let outcome = self
            .client
            .build_update_trip(id, draft)
            .and_then(|req| self.send(req))
            .and_then(|resp| self.client.parse_update_trip(resp));
        settle(store, outcome, TripAction::Update)
    }

    pub fn delete(&self, store: &mut TripStore, id: TripId) -> Result<TripId, ApiError> {
        store.apply(TripAction::Delete(Phase::Pending));
        let outcome = self
            .send(self.client.build_delete_trip(id))
            .and_then(|resp| self.client.parse_delete_trip(resp, id));
        settle(store, outcome, TripAction::Delete)
    }

    /// Update the query and, when it is not blank, load suggestions.
    /// Failures are swallowed; the suggestion list just stays empty.
    pub fn search_countries(&self, search: &mut CountrySearch, query: &str) {
        if !search.set_query(query) {
            return;
        }
        let outcome = self
            .send(self.client.build_search_countries(query))
            .and_then(|resp| self.client.parse_search_countries(resp))
            .map_err(|err| err.to_string());
        search.apply_results(query, outcome);
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), path = %request.path, "sending request");
        let response = self.transport.execute(request)?;
        if !response.is_success() {
            debug!(status = response.status, "request returned an error status");
        }
        Ok(response)
    }
}

fn settle<V: Clone>(
    store: &mut TripStore,
    outcome: Result<V, ApiError>,
    action: fn(Phase<V>) -> TripAction,
) -> Result<V, ApiError> {
    match outcome {
        Ok(value) => {
            store.apply(action(Phase::Fulfilled(value.clone())));
            Ok(value)
        }
        Err(err) => {
            store.apply(action(Phase::Rejected(err.to_string())));
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::http::HttpMethod;

    /// Replays canned outcomes and records every request it saw.
    #[derive(Default)]
    struct Scripted {
        replies: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl Scripted {
        fn reply(self, outcome: Result<HttpResponse, ApiError>) -> Self {
            self.replies.borrow_mut().push_back(outcome);
            self
        }
    }

    impl Transport for Scripted {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.borrow_mut().push(request);
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Transport("no scripted reply".into())))
        }
    }

    fn dispatcher(transport: &Scripted) -> Dispatcher<&Scripted> {
        Dispatcher::new(TripClient::new("http://localhost:8000"), transport)
    }

    fn draft(name: &str) -> TripDraft {
        TripDraft {
            name: name.to_string(),
            country: "Italy".to_string(),
            start_date: "2024-06-01".to_string(),
            end_date: "2024-06-10".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn fetch_all_success_fills_store() {
        let transport = Scripted::default().reply(Ok(HttpResponse::new(
            200,
            r#"[{"id":1,"name":"Paris","country":"France","start_date":"a","end_date":"b","notes":""}]"#,
        )));
        let mut store = TripStore::new();
        dispatcher(&transport).fetch_all(&mut store).unwrap();
        assert_eq!(store.items().len(), 1);
        assert!(!store.is_loading());
        assert_eq!(transport.seen.borrow()[0].method, HttpMethod::Get);
    }

    #[test]
    fn fetch_all_transport_error_lands_in_store() {
        let transport =
            Scripted::default().reply(Err(ApiError::Transport("Network Error".into())));
        let mut store = TripStore::new();
        let err = dispatcher(&transport).fetch_all(&mut store).unwrap_err();
        assert_eq!(err, ApiError::Transport("Network Error".into()));
        assert_eq!(store.error(), Some("Network Error"));
        assert!(!store.is_loading());
    }

    #[test]
    fn create_failure_is_returned_but_not_stored() {
        let transport = Scripted::default().reply(Ok(HttpResponse::new(500, "boom")));
        let mut store = TripStore::new();
        let err = dispatcher(&transport)
            .create(&mut store, &draft("Rome"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 500, .. }));
        assert!(store.error().is_none());
        assert!(store.items().is_empty());
    }

    #[test]
    fn create_then_update_then_delete() {
        let saved = r#"{"id":2,"name":"Rome","country":"Italy","start_date":"2024-06-01","end_date":"2024-06-10","notes":""}"#;
        let renamed = r#"{"id":2,"name":"Roma","country":"Italy","start_date":"2024-06-01","end_date":"2024-06-10","notes":""}"#;
        let transport = Scripted::default()
            .reply(Ok(HttpResponse::new(201, saved)))
            .reply(Ok(HttpResponse::new(200, renamed)))
            .reply(Ok(HttpResponse::new(200, r#"{"deleted":2}"#)));
        let d = dispatcher(&transport);
        let mut store = TripStore::new();

        let created = d.create(&mut store, &draft("Rome")).unwrap();
        assert_eq!(created.id, Some(2));
        d.update(&mut store, 2, &draft("Roma")).unwrap();
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].name, "Roma");
        assert_eq!(d.delete(&mut store, 2).unwrap(), 2);
        assert!(store.items().is_empty());

        let seen = transport.seen.borrow();
        assert_eq!(seen[1].path, "http://localhost:8000/trips/2");
        assert_eq!(seen[2].method, HttpMethod::Delete);
    }

    #[test]
    fn blank_search_sends_nothing() {
        let transport = Scripted::default();
        let mut search = CountrySearch::new();
        dispatcher(&transport).search_countries(&mut search, "");
        assert!(transport.seen.borrow().is_empty());
    }

    #[test]
    fn search_failure_is_swallowed() {
        let transport = Scripted::default().reply(Ok(HttpResponse::new(502, "bad gateway")));
        let mut search = CountrySearch::new();
        dispatcher(&transport).search_countries(&mut search, "spa");
        assert!(search.results().is_empty());
        assert_eq!(search.query(), "spa");
    }

    #[test]
    fn search_success_fills_results() {
        let transport = Scripted::default().reply(Ok(HttpResponse::new(
            200,
            r#"[{"name":"Spain","cca2":"ES","flag":"🇪🇸"}]"#,
        )));
        let mut search = CountrySearch::new();
        dispatcher(&transport).search_countries(&mut search, "spa");
        assert_eq!(search.results()[0].name, "Spain");
        assert_eq!(
            transport.seen.borrow()[0].path,
            "http://localhost:8000/countries?q=spa"
        );
    }
}
