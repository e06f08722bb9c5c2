//! A stand-in for the two Foursquare v2 endpoints the client uses.
//!
//! Serves `/v2/venues/explore` and `/v2/venues/{id}` over a fixed in-memory
//! catalogue so tests can exercise paging and venue fetches over real HTTP.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const DEFAULT_LIMIT: usize = 30;
const PHOTO_PREFIX: &str = "https://igx.4sqi.net/img/general/";

/// Cities and how many venues each has in the catalogue.
pub const CITIES: [(&str, usize); 3] = [("Melbourne", 35), ("Sydney", 3), ("Hobart", 0)];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CatalogueVenue {
    pub id: String,
    pub name: String,
    pub city: String,
    pub address: Vec<String>,
    pub is_open: bool,
}

pub type Catalogue = Arc<Vec<CatalogueVenue>>;

#[derive(Debug, Deserialize)]
pub struct ExploreParams {
    pub client_id: Option<String>,
    pub near: Option<String>,
    pub ll: Option<String>,
    #[serde(default)]
    pub offset: usize,
    pub limit: Option<usize>,
    #[serde(rename = "venuePhotos")]
    pub venue_photos: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct CredentialParams {
    pub client_id: Option<String>,
}

pub fn catalogue() -> Catalogue {
    let venues = CITIES
        .iter()
        .flat_map(|(city, count)| {
            (1..=*count).map(move |i| CatalogueVenue {
                id: format!("{}-{i:03}", city.to_lowercase()),
                name: format!("{city} Cafe {i}"),
                city: city.to_string(),
                address: vec![format!("{i} Collins St"), format!("{city} 3000")],
                is_open: i % 2 == 0,
            })
        })
        .collect();
    Arc::new(venues)
}

pub fn app() -> Router {
    Router::new()
        .route("/v2/venues/explore", get(explore))
        .route("/v2/venues/{id}", get(venue))
        .with_state(catalogue())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn explore(
    State(catalogue): State<Catalogue>,
    Query(params): Query<ExploreParams>,
) -> (StatusCode, Json<Value>) {
    if params.client_id.as_deref().is_none_or(str::is_empty) {
        return error(StatusCode::BAD_REQUEST, "invalid_auth", "Missing access credentials.");
    }

    let matches: Vec<&CatalogueVenue> = match (&params.near, &params.ll) {
        (Some(near), _) => {
            let known = CITIES.iter().any(|(city, _)| city.eq_ignore_ascii_case(near));
            if !known {
                return error(
                    StatusCode::BAD_REQUEST,
                    "failed_geocode",
                    &format!("Couldn't geocode param near: {near}"),
                );
            }
            catalogue
                .iter()
                .filter(|v| v.city.eq_ignore_ascii_case(near))
                .collect()
        }
        (None, Some(_)) => catalogue.iter().collect(),
        (None, None) => {
            return error(
                StatusCode::BAD_REQUEST,
                "param_error",
                "Must provide parameters (ll and radius) or (sw and ne) or (near and radius)",
            )
        }
    };

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    let with_photos = params.venue_photos == Some(1);
    let items: Vec<Value> = matches
        .into_iter()
        .skip(params.offset)
        .take(limit)
        .map(|v| {
            json!({
                "reasons": {"count": 0, "items": []},
                "venue": venue_json(v, with_photos),
                "tips": [{"text": format!("Try the coffee at {}", v.name), "likes": {"count": 3}}]
            })
        })
        .collect();
    tracing::debug!(offset = params.offset, returned = items.len(), "explore");

    let body = json!({
        "meta": {"code": 200},
        "response": {
            "totalResults": items.len(),
            "groups": [{"type": "Recommended Places", "name": "recommended", "items": items}]
        }
    });
    (StatusCode::OK, Json(body))
}

async fn venue(
    State(catalogue): State<Catalogue>,
    Path(id): Path<String>,
    Query(params): Query<CredentialParams>,
) -> (StatusCode, Json<Value>) {
    if params.client_id.as_deref().is_none_or(str::is_empty) {
        return error(StatusCode::BAD_REQUEST, "invalid_auth", "Missing access credentials.");
    }
    match catalogue.iter().find(|v| v.id == id) {
        Some(v) => (
            StatusCode::OK,
            Json(json!({"meta": {"code": 200}, "response": {"venue": venue_json(v, true)}})),
        ),
        None => error(
            StatusCode::NOT_FOUND,
            "param_error",
            &format!("Value {id} is invalid for venue id"),
        ),
    }
}

fn venue_json(v: &CatalogueVenue, with_photos: bool) -> Value {
    let mut venue = json!({
        "id": v.id,
        "name": v.name,
        "location": {"city": v.city, "formattedAddress": v.address},
        "hours": {
            "status": if v.is_open { "Open until 10:00 PM" } else { "Closed until 7:00 AM" },
            "isOpen": v.is_open
        }
    });
    if with_photos {
        venue["photos"] = json!({
            "count": 1,
            "groups": [{
                "type": "venue",
                "name": "Venue photos",
                "items": [{"prefix": PHOTO_PREFIX, "suffix": format!("/{}.jpg", v.id), "visibility": "public"}]
            }]
        });
    }
    venue
}

fn error(status: StatusCode, error_type: &str, detail: &str) -> (StatusCode, Json<Value>) {
    let body = json!({
        "meta": {"code": status.as_u16(), "errorType": error_type, "errorDetail": detail},
        "response": {}
    });
    (status, Json(body))
}
