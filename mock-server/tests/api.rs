use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Country, Trip};
use tower::{Service, ServiceExt};

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn delete(uri: &str) -> Request<String> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(String::new())
        .unwrap()
}

const LISBON: &str = r#"{"name":"Lisbon","country":"Portugal","start_date":"2024-03-01","end_date":"2024-03-04","notes":"tram 28"}"#;

// --- misc ---

#[tokio::test]
async fn health_reports_ok() {
    let resp = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "ok": true }));
}

#[tokio::test]
async fn root_reports_version() {
    let resp = app().oneshot(get("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert!(body["version"].is_string());
}

// --- countries ---

#[tokio::test]
async fn countries_without_query_lists_all() {
    let resp = app().oneshot(get("/countries")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let countries: Vec<Country> = body_json(resp).await;
    assert_eq!(countries.len(), 15);
}

#[tokio::test]
async fn countries_filters_by_name() {
    let resp = app().oneshot(get("/countries?q=united+k")).await.unwrap();
    let countries: Vec<Country> = body_json(resp).await;
    assert_eq!(countries.len(), 1);
    assert_eq!(countries[0].cca2, "GB");
}

#[tokio::test]
async fn countries_unknown_query_is_empty() {
    let resp = app().oneshot(get("/countries?q=uruguay")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let countries: Vec<Country> = body_json(resp).await;
    assert!(countries.is_empty());
}

// --- trips ---

#[tokio::test]
async fn list_trips_empty() {
    let resp = app().oneshot(get("/trips")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let trips: Vec<Trip> = body_json(resp).await;
    assert!(trips.is_empty());
}

#[tokio::test]
async fn create_trip_returns_201_with_id() {
    let resp = app()
        .oneshot(json_request("POST", "/trips", LISBON))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let trip: Trip = body_json(resp).await;
    assert_eq!(trip.id, 1);
    assert_eq!(trip.name, "Lisbon");
    assert_eq!(trip.notes, "tram 28");
}

#[tokio::test]
async fn create_trip_missing_fields_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/trips", r#"{"name":"Nowhere"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn update_trip_not_found() {
    let resp = app()
        .oneshot(json_request("PUT", "/trips/99", LISBON))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_trip_bad_id_returns_400() {
    let resp = app()
        .oneshot(json_request("PUT", "/trips/not-a-number", LISBON))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_trip_not_found() {
    let resp = app().oneshot(delete("/trips/99")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    let mut app = app().into_service();

    // two creates
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/trips", LISBON))
        .await
        .unwrap();
    let first: Trip = body_json(resp).await;
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/trips",
            r#"{"name":"Kyoto","country":"Japan","start_date":"2024-10-01","end_date":"2024-10-09"}"#,
        ))
        .await
        .unwrap();
    let second: Trip = body_json(resp).await;
    assert_eq!(second.id, first.id + 1);
    assert_eq!(second.notes, "");

    // list is newest first
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/trips"))
        .await
        .unwrap();
    let trips: Vec<Trip> = body_json(resp).await;
    let ids: Vec<_> = trips.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    // update replaces every field
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/trips/{}", first.id),
            r#"{"name":"Porto","country":"Portugal","start_date":"2024-03-02","end_date":"2024-03-05"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Trip = body_json(resp).await;
    assert_eq!(updated.id, first.id);
    assert_eq!(updated.name, "Porto");
    assert_eq!(updated.notes, "");

    // delete echoes the id
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(delete(&format!("/trips/{}", first.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body["deleted"], first.id);

    // second delete is a 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(delete(&format!("/trips/{}", first.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // only the second trip remains
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/trips"))
        .await
        .unwrap();
    let trips: Vec<Trip> = body_json(resp).await;
    assert_eq!(trips, vec![second]);
}
