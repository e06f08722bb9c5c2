//! Client core for a venue-search app backed by the Foursquare v2 API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The host executes the actual
//! HTTP round-trip, which keeps the core deterministic and testable and lets a
//! mobile app drive it through the C ABI in `venues-ffi`.
//!
//! # Design
//! - `mapper` hydrates untyped JSON into the models in `types`, guided by the
//!   static field tables in `schema`. It never fails; malformed fields are
//!   simply left unset.
//! - `VenueClient` is stateless: it composes explore/venue URLs and parses
//!   responses through the mapper.
//! - `SearchCoordinator` owns paging state and the single in-flight guard and
//!   reports through a `SearchDelegate`.

pub mod client;
pub mod config;
pub mod coordinator;
pub mod deeplink;
pub mod display;
pub mod error;
pub mod http;
pub mod mapper;
pub mod schema;
pub mod types;

pub use client::VenueClient;
pub use config::GatewayConfig;
pub use coordinator::{EventQueue, SearchCoordinator, SearchDelegate, SearchEvent, SearchState};
pub use deeplink::DeepLink;
pub use display::flatten_items;
pub use error::{ApiError, ConfigError, GatewayFailure, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use mapper::{map, map_model, FieldValue, Model, Record};
pub use schema::{FieldDecl, FieldKind, ModelType, ScalarKind, TypeDescriptor};
pub use types::{
    ApiEnvelope, Coordinate, Group, Hours, Item, Like, Location, Photo, PhotoCollection,
    PhotoGroup, Response, Tip, Venue,
};
