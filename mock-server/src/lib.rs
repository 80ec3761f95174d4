//! In-memory stand-in for the trips backend.
//!
//! Same routes and payload shapes as the real API, minus the database: ids are
//! handed out sequentially from 1 and everything lives in a `BTreeMap`.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub start_date: String,
    pub end_date: String,
    pub notes: String,
}

#[derive(Deserialize)]
pub struct TripIn {
    pub name: String,
    pub country: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub notes: String,
}

impl TripIn {
    fn into_trip(self, id: i64) -> Trip {
        Trip {
            id,
            name: self.name,
            country: self.country,
            start_date: self.start_date,
            end_date: self.end_date,
            notes: self.notes,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    pub cca2: String,
    pub flag: String,
}

#[derive(Deserialize)]
pub struct CountryQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Default)]
pub struct Inventory {
    next_id: i64,
    trips: BTreeMap<i64, Trip>,
}

pub type Db = Arc<RwLock<Inventory>>;

const COUNTRIES: &[(&str, &str, &str)] = &[
    ("Spain", "ES", "🇪🇸"),
    ("France", "FR", "🇫🇷"),
    ("Germany", "DE", "🇩🇪"),
    ("Italy", "IT", "🇮🇹"),
    ("Portugal", "PT", "🇵🇹"),
    ("Mexico", "MX", "🇲🇽"),
    ("Argentina", "AR", "🇦🇷"),
    ("Brazil", "BR", "🇧🇷"),
    ("United States", "US", "🇺🇸"),
    ("Canada", "CA", "🇨🇦"),
    ("United Kingdom", "GB", "🇬🇧"),
    ("Japan", "JP", "🇯🇵"),
    ("Australia", "AU", "🇦🇺"),
    ("Netherlands", "NL", "🇳🇱"),
    ("Switzerland", "CH", "🇨🇭"),
];

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Inventory::default()));
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/countries", get(countries))
        .route("/trips", get(list_trips).post(create_trip))
        .route("/trips/{id}", put(update_trip).delete(delete_trip))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "trips API is running", "version": env!("CARGO_PKG_VERSION") }))
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// Case-insensitive substring match on the country name; an empty `q` lists
/// all. Whitespace is matched literally.
pub fn search_countries(q: &str) -> Vec<Country> {
    let needle = q.to_lowercase();
    COUNTRIES
        .iter()
        .filter(|(name, _, _)| needle.is_empty() || name.to_lowercase().contains(&needle))
        .map(|(name, cca2, flag)| Country {
            name: name.to_string(),
            cca2: cca2.to_string(),
            flag: flag.to_string(),
        })
        .collect()
}

async fn countries(Query(query): Query<CountryQuery>) -> Json<Vec<Country>> {
    Json(search_countries(&query.q))
}

/// Newest first.
async fn list_trips(State(db): State<Db>) -> Json<Vec<Trip>> {
    let inventory = db.read().await;
    Json(inventory.trips.values().rev().cloned().collect())
}

async fn create_trip(
    State(db): State<Db>,
    Json(input): Json<TripIn>,
) -> (StatusCode, Json<Trip>) {
    let mut inventory = db.write().await;
    inventory.next_id += 1;
    let trip = input.into_trip(inventory.next_id);
    inventory.trips.insert(trip.id, trip.clone());
    debug!(id = trip.id, "trip created");
    (StatusCode::CREATED, Json(trip))
}

async fn update_trip(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<TripIn>,
) -> Result<Json<Trip>, StatusCode> {
    let mut inventory = db.write().await;
    let slot = inventory.trips.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    *slot = input.into_trip(id);
    Ok(Json(slot.clone()))
}

async fn delete_trip(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, StatusCode> {
    let mut inventory = db.write().await;
    inventory
        .trips
        .remove(&id)
        .map(|_| Json(json!({ "deleted": id })))
        .ok_or(StatusCode::NOT_FOUND)
}
