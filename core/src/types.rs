//! Domain models for the venue API.
//!
//! # Design
//! Every field is optional: the gateway omits keys freely and the mapper
//! leaves anything missing or malformed unset. Each model declares its JSON
//! fields in `schema.rs` and builds itself from a mapped `Record` here, so the
//! key names live in exactly two places that the tests keep in step.
//! Models serialize with the gateway's key names so a host can cache or
//! forward them as JSON.

use serde::{Deserialize, Serialize};

use crate::mapper::{Model, Record};
use crate::schema::ModelType;

/// Top level of every gateway body: `{"meta": ..., "response": ...}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope {
    pub response: Option<Response>,
}

/// The `response` object: `groups` for explore searches, `venue` for a
/// single-venue fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub groups: Option<Vec<Group>>,
    pub venue: Option<Venue>,
}

/// A named bucket of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
    pub items: Option<Vec<Item>>,
}

/// One search result: a venue plus the tips shown alongside it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub venue: Option<Venue>,
    pub tips: Option<Vec<Tip>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub id: Option<String>,
    pub name: Option<String>,
    pub location: Option<Location>,
    pub hours: Option<Hours>,
    pub url: Option<String>,
    pub photos: Option<PhotoCollection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub formatted_address: Option<Vec<String>>,
}

/// Current opening-hours status of a venue.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hours {
    pub status: Option<String>,
    pub is_open: Option<bool>,
}

/// Photo metadata. The image URL is `prefix + <size> + suffix`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub visibility: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoCollection {
    pub groups: Option<Vec<PhotoGroup>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoGroup {
    pub name: Option<String>,
    pub items: Option<Vec<Photo>>,
}

/// A user-submitted tip attached to a search result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tip {
    pub likes: Option<Like>,
    pub photo: Option<Photo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub count: Option<i64>,
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl Model for ApiEnvelope {
    const TYPE: ModelType = ModelType::ApiEnvelope;

    fn from_record(mut record: Record) -> Self {
        Self {
            response: record.take_object("response"),
        }
    }
}

impl Model for Response {
    const TYPE: ModelType = ModelType::Response;

    fn from_record(mut record: Record) -> Self {
        Self {
            groups: record.take_sequence("groups"),
            venue: record.take_object("venue"),
        }
    }
}

impl Model for Group {
    const TYPE: ModelType = ModelType::Group;

    fn from_record(mut record: Record) -> Self {
        Self {
            kind: record.take_string("type"),
            name: record.take_string("name"),
            items: record.take_sequence("items"),
        }
    }
}

impl Model for Item {
    const TYPE: ModelType = ModelType::Item;

    fn from_record(mut record: Record) -> Self {
        Self {
            venue: record.take_object("venue"),
            tips: record.take_sequence("tips"),
        }
    }
}

impl Model for Venue {
    const TYPE: ModelType = ModelType::Venue;

    fn from_record(mut record: Record) -> Self {
        Self {
            id: record.take_string("id"),
            name: record.take_string("name"),
            location: record.take_object("location"),
            hours: record.take_object("hours"),
            url: record.take_string("url"),
            photos: record.take_object("photos"),
        }
    }
}

impl Model for Location {
    const TYPE: ModelType = ModelType::Location;

    fn from_record(mut record: Record) -> Self {
        Self {
            formatted_address: record.take_string_list("formattedAddress"),
        }
    }
}

impl Model for Hours {
    const TYPE: ModelType = ModelType::Hours;

    fn from_record(mut record: Record) -> Self {
        Self {
            status: record.take_string("status"),
            is_open: record.take_bool("isOpen"),
        }
    }
}

impl Model for Photo {
    const TYPE: ModelType = ModelType::Photo;

    fn from_record(mut record: Record) -> Self {
        Self {
            prefix: record.take_string("prefix"),
            suffix: record.take_string("suffix"),
            visibility: record.take_string("visibility"),
        }
    }
}

impl Model for PhotoCollection {
    const TYPE: ModelType = ModelType::PhotoCollection;

    fn from_record(mut record: Record) -> Self {
        Self {
            groups: record.take_sequence("groups"),
        }
    }
}

impl Model for PhotoGroup {
    const TYPE: ModelType = ModelType::PhotoGroup;

    fn from_record(mut record: Record) -> Self {
        Self {
            name: record.take_string("name"),
            items: record.take_sequence("items"),
        }
    }
}

impl Model for Tip {
    const TYPE: ModelType = ModelType::Tip;

    fn from_record(mut record: Record) -> Self {
        Self {
            likes: record.take_object("likes"),
            photo: record.take_object("photo"),
        }
    }
}

impl Model for Like {
    const TYPE: ModelType = ModelType::Like;

    fn from_record(mut record: Record) -> Self {
        Self {
            count: record.take_integer("count"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::map_model;
    use serde_json::json;

    #[test]
    fn explore_body_maps_into_full_graph() {
        let body = json!({
            "meta": {"code": 200},
            "response": {
                "headerLocation": "Melbourne",
                "groups": [{
                    "type": "Recommended Places",
                    "name": "recommended",
                    "items": [{
                        "reasons": {"count": 0},
                        "venue": {
                            "id": "4b058804f964a520d1c422e3",
                            "name": "Hardware Societe",
                            "location": {"formattedAddress": ["120 Hardware St", "Melbourne VIC 3000"]},
                            "hours": {"status": "Open until 3:00 PM", "isOpen": true},
                            "photos": {"count": 1, "groups": [{
                                "name": "Venue photos",
                                "items": [{"prefix": "https://igx.4sqi.net/img/general/", "suffix": "/1.jpg", "visibility": "public"}]
                            }]}
                        },
                        "tips": [{"text": "Get the baked eggs", "likes": {"count": 4}}]
                    }]
                }]
            }
        });

        let envelope: ApiEnvelope = map_model(&body);
        let groups = envelope.response.unwrap().groups.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].kind.as_deref(), Some("Recommended Places"));

        let item = &groups[0].items.as_ref().unwrap()[0];
        let venue = item.venue.as_ref().unwrap();
        assert_eq!(venue.name.as_deref(), Some("Hardware Societe"));
        assert_eq!(
            venue.location.as_ref().unwrap().formatted_address.as_ref().unwrap().len(),
            2
        );
        assert_eq!(venue.hours.as_ref().unwrap().is_open, Some(true));
        let photo_groups = venue.photos.as_ref().unwrap().groups.as_ref().unwrap();
        assert_eq!(photo_groups[0].items.as_ref().unwrap()[0].visibility.as_deref(), Some("public"));

        let tip = &item.tips.as_ref().unwrap()[0];
        assert_eq!(tip.likes.as_ref().unwrap().count, Some(4));
        assert!(tip.photo.is_none());
    }

    #[test]
    fn venue_body_maps_venue_and_leaves_groups_unset() {
        let body = json!({"response": {"venue": {"id": "abc", "name": "Lune", "rating": 9.4}}});
        let envelope: ApiEnvelope = map_model(&body);
        let response = envelope.response.unwrap();
        assert!(response.groups.is_none());
        assert_eq!(response.venue.unwrap().id.as_deref(), Some("abc"));
    }

    #[test]
    fn malformed_sibling_does_not_abort_mapping() {
        let body = json!({
            "id": "v1",
            "name": "Cumulus Inc",
            "location": "not an object",
            "hours": {"isOpen": "yes", "status": "Closed"},
            "photos": [],
            "url": 42
        });
        let venue: Venue = map_model(&body);
        assert_eq!(venue.id.as_deref(), Some("v1"));
        assert_eq!(venue.name.as_deref(), Some("Cumulus Inc"));
        assert!(venue.location.is_none());
        assert!(venue.photos.is_none());
        assert!(venue.url.is_none());
        let hours = venue.hours.unwrap();
        assert_eq!(hours.status.as_deref(), Some("Closed"));
        assert!(hours.is_open.is_none());
    }

    #[test]
    fn group_items_map_one_item_per_object_in_order() {
        let body = json!({"items": [
            {"venue": {"id": "1"}},
            {"venue": {"id": "2"}},
            {"venue": {"id": "3"}}
        ]});
        let group: Group = map_model(&body);
        let ids: Vec<_> = group
            .items
            .unwrap()
            .into_iter()
            .map(|i| i.venue.unwrap().id.unwrap())
            .collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn mapped_venue_serializes_with_gateway_keys() {
        let venue: Venue = map_model(&json!({
            "id": "v1",
            "location": {"formattedAddress": ["1 Main St"]},
            "hours": {"isOpen": false}
        }));
        let out = serde_json::to_value(&venue).unwrap();
        assert_eq!(out["location"]["formattedAddress"][0], "1 Main St");
        assert_eq!(out["hours"]["isOpen"], false);
        assert!(out["name"].is_null());

        let group = Group {
            kind: Some("Recommended Places".to_string()),
            ..Group::default()
        };
        assert_eq!(serde_json::to_value(&group).unwrap()["type"], "Recommended Places");
    }
}
