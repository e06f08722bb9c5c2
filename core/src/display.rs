//! Presentation helpers derived from the domain models.

use url::Url;

use crate::types::{Group, Item, Location, Photo, PhotoCollection, Venue};

const THUMBNAIL_SIZE: &str = "cap100";
const FULL_SIZE: &str = "300x300";
const VENUE_PHOTOS_GROUP: &str = "venue photos";

impl Venue {
    /// "Lune" becomes "Lune's"; "Chris" becomes "Chris'".
    pub fn possessive_name(&self) -> Option<String> {
        let name = self.name.as_deref()?;
        if name.to_lowercase().ends_with('s') {
            Some(format!("{name}'"))
        } else {
            Some(format!("{name}'s"))
        }
    }
}

impl Photo {
    pub fn is_public(&self) -> bool {
        self.visibility
            .as_deref()
            .is_some_and(|v| v.eq_ignore_ascii_case("public"))
    }

    /// URL of the photo capped at 100px on its longest side.
    pub fn thumbnail_url(&self) -> Option<Url> {
        self.sized_url(THUMBNAIL_SIZE)
    }

    /// URL of the photo at 300x300.
    pub fn url(&self) -> Option<Url> {
        self.sized_url(FULL_SIZE)
    }

    fn sized_url(&self, size: &str) -> Option<Url> {
        let prefix = self.prefix.as_deref()?;
        let suffix = self.suffix.as_deref()?;
        Url::parse(&format!("{prefix}{size}{suffix}")).ok()
    }
}

impl Location {
    /// Address lines joined by newlines, or an empty string.
    pub fn display_address(&self) -> String {
        self.formatted_address
            .as_deref()
            .map(|lines| lines.join("\n"))
            .unwrap_or_default()
    }
}

impl PhotoCollection {
    /// Photos from the first group named "venue photos", compared
    /// case-insensitively.
    pub fn venue_photos(&self) -> Option<&[Photo]> {
        self.groups
            .as_deref()?
            .iter()
            .find(|g| {
                g.name
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase() == VENUE_PHOTOS_GROUP)
            })?
            .items
            .as_deref()
    }

    pub fn first_venue_photo(&self) -> Option<&Photo> {
        self.venue_photos()?.first()
    }
}

/// All items across `groups`, in group order then item order.
pub fn flatten_items(groups: Vec<Group>) -> Vec<Item> {
    groups
        .into_iter()
        .filter_map(|g| g.items)
        .flatten()
        .collect()
}
